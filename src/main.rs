use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use folgelink::config::Settings;
use folgelink::formatter::format_all_links;
use folgelink::grammar::IdPattern;
use folgelink::hierarchy::compute_level;

/// Batch front end for the folgelink core. The editor integration drives
/// the same library through its event handlers; this binary covers one-off
/// runs over existing notes.
#[derive(Parser)]
#[command(name = "folgelink", version, about = "Folgezettel wikilink aliasing")]
struct Cli {
    /// Vault root; settings are read from its `.folgelink` file
    #[arg(long)]
    vault: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Alias every closed wikilink in a file (or stdin) and print the result
    Format {
        /// File to rewrite; stdin when omitted
        file: Option<PathBuf>,
    },
    /// Print the outline level of each given name
    Levels { names: Vec<String> },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let root = match cli.vault {
        Some(root) => root,
        None => std::env::current_dir().context("Can't determine working directory")?,
    };
    let settings = Settings::new(&root)?;

    match cli.command {
        Command::Format { file } => {
            let text = match &file {
                Some(path) => fs::read_to_string(path)
                    .with_context(|| format!("Can't read {}", path.display()))?,
                None => {
                    let mut text = String::new();
                    io::stdin().read_to_string(&mut text)?;
                    text
                }
            };

            let pattern = IdPattern::resolve(&settings);
            let stdout = io::stdout();
            let mut out = stdout.lock();
            for line in text.split_inclusive('\n') {
                let (line, newline) = match line.strip_suffix('\n') {
                    Some(stripped) => (stripped, "\n"),
                    None => (line, ""),
                };
                write!(out, "{}{}", format_all_links(line, &pattern), newline)?;
            }
        }
        Command::Levels { names } => {
            for name in names {
                println!("{}\t{}", compute_level(&name), name);
            }
        }
    }

    Ok(())
}
