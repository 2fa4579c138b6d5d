use std::path::Path;

use anyhow::anyhow;
use config::{Config, File};
use serde::Deserialize;

use crate::grammar::FOLGEZETTEL_PATTERN;

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    /// Which identifier grammar link contents are matched against
    pub id_format: IdFormat,
    /// Capturing sub-pattern used when `id_format` is `Custom`
    pub custom_pattern: String,
    pub enable_indentation: bool,
    /// Folders whose entries participate in indentation; empty means all
    pub include_folders: Vec<String>,
    /// Folders (and their descendants) never indented
    pub exclude_folders: Vec<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub enum IdFormat {
    Folgezettel,
    Timestamp,
    Custom,
}

impl Settings {
    pub fn new(root_dir: &Path) -> anyhow::Result<Settings> {
        let expanded = shellexpand::tilde("~/.config/folgelink/settings");
        let settings = Config::builder()
            .add_source(File::with_name(&expanded).required(false))
            .add_source(
                File::with_name(&format!(
                    "{}/.folgelink",
                    root_dir
                        .to_str()
                        .ok_or(anyhow!("Can't convert root_dir to str"))?
                ))
                .required(false),
            )
            .set_default("id_format", "Folgezettel")?
            .set_default("custom_pattern", FOLGEZETTEL_PATTERN)?
            .set_default("enable_indentation", true)?
            .set_default("include_folders", Vec::<String>::new())?
            .set_default("exclude_folders", Vec::<String>::new())?
            .build()
            .map_err(|err| anyhow!("Build err: {err}"))?;

        let settings = settings.try_deserialize::<Settings>()?;

        anyhow::Ok(settings)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            id_format: IdFormat::Folgezettel,
            custom_pattern: FOLGEZETTEL_PATTERN.to_string(),
            enable_indentation: true,
            include_folders: vec![],
            exclude_folders: vec![],
        }
    }
}
