//! Wikilink alias formatting.
//!
//! When a link such as `[[1a2 Some Title]]` is completed or pasted, the
//! identifier prefix is appended as a display alias, producing
//! `[[1a2 Some Title|1a2]]`. The rewrite happens exactly once: a link that
//! already carries an alias, a heading reference or a block reference is
//! left alone, so re-running the formatter over its own output is a no-op.
//!
//! # Entry points
//!
//! The host forwards editing events to an [`Autoformatter`]:
//!
//! | Event | Handler | Fires when |
//! |-------|---------|------------|
//! | paste | [`Autoformatter::handle_paste`] | pasted text contains `[[` |
//! | text change | [`Autoformatter::handle_change`] | text before the cursor ends with `]]` |
//!
//! Both locate a span on the cursor line and route through [`format_link`],
//! which is a pure function and usable on its own.
//!
//! # Reentrancy
//!
//! Rewriting a line makes the host emit the same change notification the
//! formatter listens on. The [`Autoformatter`] holds a [`ReentrancyGuard`]
//! for the duration of its own mutation and `handle_change` does nothing
//! while the guard is held; a host that dispatches change events itself can
//! share the guard via [`Autoformatter::guard`] and perform the same check
//! in its dispatch layer. The guard is released on every exit path,
//! including panics, so a failed rewrite never blocks later events.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::debug;

use crate::config::{IdFormat, Settings};
use crate::grammar::IdPattern;

/// Cursor position on the editing surface. `ch` is a byte offset into the
/// line's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub line: usize,
    pub ch: usize,
}

/// The host's editing surface, reduced to the operations the formatter
/// needs. Implemented over an in-memory buffer in tests.
pub trait EditorSurface {
    fn cursor(&self) -> Cursor;
    fn line(&self, line: usize) -> Option<String>;
    fn set_line(&mut self, line: usize, text: String);
}

/// Flag marking a formatter-initiated mutation, so the change notification
/// it causes is not reprocessed as a user edit. Atomic so that a host with
/// its own event threads can share it safely.
#[derive(Debug, Default)]
pub struct ReentrancyGuard {
    held: AtomicBool,
}

impl ReentrancyGuard {
    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::Acquire)
    }

    fn hold(&self) -> GuardHold<'_> {
        self.held.store(true, Ordering::Release);
        GuardHold { guard: self }
    }
}

/// Keeps the guard held for a scope; releases on drop, unwinding included.
struct GuardHold<'a> {
    guard: &'a ReentrancyGuard,
}

impl Drop for GuardHold<'_> {
    fn drop(&mut self) {
        self.guard.held.store(false, Ordering::Release);
    }
}

/// Rewrite the wikilink span `[span_start, span_end)` of `line_text` to
/// carry its identifier as an alias.
///
/// The span must start at an opening `[[`. Returns the full rewritten line,
/// or `None` when the span is left untouched:
///
/// - the span already contains `|` (an explicit alias is never overridden)
/// - no closing `]]` inside the span (the link is still being typed)
/// - the inner content contains `#` or `^` (heading and block references
///   are already specialized)
/// - the inner content does not start with an identifier
///
/// The replacement is `[[<inner>|<identifier>]]` spliced over the span.
pub fn format_link(
    line_text: &str,
    span_start: usize,
    span_end: usize,
    pattern: &IdPattern,
) -> Option<String> {
    let span = line_text.get(span_start..span_end)?;

    if span.contains('|') {
        return None;
    }

    let (inner, _) = span.strip_prefix("[[")?.split_once("]]")?;

    if inner.contains('#') || inner.contains('^') {
        return None;
    }

    let identifier = pattern.identifier_of(inner)?;

    Some(format!(
        "{}[[{}|{}]]{}",
        &line_text[..span_start],
        inner,
        identifier,
        &line_text[span_end..]
    ))
}

/// Rewrite every closed, unaliased link on a line.
///
/// The editor paths rewrite exactly one span per event; this whole-line
/// variant backs batch use such as the `folgelink format` command.
pub fn format_all_links(line_text: &str, pattern: &IdPattern) -> String {
    let mut out = String::with_capacity(line_text.len());
    let mut pos = 0;

    while let Some(open) = line_text[pos..].find("[[") {
        let start = pos + open;
        let Some(close) = line_text[start..].find("]]") else {
            break;
        };
        let end = start + close + 2;

        out.push_str(&line_text[pos..start]);
        let link = &line_text[start..end];
        match format_link(link, 0, link.len(), pattern) {
            Some(rewritten) => out.push_str(&rewritten),
            None => out.push_str(link),
        }
        pos = end;
    }

    out.push_str(&line_text[pos..]);
    out
}

/// Event-driven front end of [`format_link`].
///
/// Owns the reentrancy guard and a compiled-pattern cache; the grammar is
/// recompiled only when the grammar-relevant settings fields change, never
/// per keystroke. Settings are read on every call, so a configuration
/// change takes effect on the next event.
#[derive(Debug, Default)]
pub struct Autoformatter {
    guard: Arc<ReentrancyGuard>,
    cache: Option<CachedPattern>,
}

#[derive(Debug)]
struct CachedPattern {
    id_format: IdFormat,
    custom_pattern: String,
    pattern: IdPattern,
}

impl Autoformatter {
    pub fn new() -> Autoformatter {
        Autoformatter::default()
    }

    /// The shared reentrancy flag, for hosts that gate their own event
    /// dispatch on it.
    pub fn guard(&self) -> Arc<ReentrancyGuard> {
        Arc::clone(&self.guard)
    }

    pub fn is_formatting(&self) -> bool {
        self.guard.is_held()
    }

    /// Paste handler. Fires once per paste whose text contains `[[`; the
    /// span runs from the nearest opening marker before the cursor to the
    /// cursor itself.
    ///
    /// Returns whether a rewrite was applied.
    pub fn handle_paste(
        &mut self,
        surface: &mut dyn EditorSurface,
        pasted: &str,
        settings: &Settings,
    ) -> bool {
        if !pasted.contains("[[") {
            return false;
        }

        let cursor = surface.cursor();
        let Some(line) = surface.line(cursor.line) else {
            return false;
        };
        let Some(start) = line.get(..cursor.ch).and_then(|before| before.rfind("[[")) else {
            return false;
        };

        self.rewrite(surface, cursor.line, start, cursor.ch, settings)
    }

    /// Change handler, called on every text-change notification. Fires only
    /// when the text before the cursor ends with `]]` (a link was just
    /// completed) and the located span is not yet aliased or specialized.
    ///
    /// Does nothing while the guard is held; the notification is then the
    /// formatter's own mutation coming back around.
    pub fn handle_change(&mut self, surface: &mut dyn EditorSurface, settings: &Settings) -> bool {
        if self.guard.is_held() {
            return false;
        }

        let cursor = surface.cursor();
        let Some(line) = surface.line(cursor.line) else {
            return false;
        };
        let Some(before) = line.get(..cursor.ch) else {
            return false;
        };

        if !before.ends_with("]]") {
            return false;
        }
        let Some(start) = before.rfind("[[") else {
            return false;
        };

        let span = &before[start..];
        if span.contains('|') || span.contains('#') || span.contains('^') {
            return false;
        }

        self.rewrite(surface, cursor.line, start, cursor.ch, settings)
    }

    fn rewrite(
        &mut self,
        surface: &mut dyn EditorSurface,
        line_nr: usize,
        span_start: usize,
        span_end: usize,
        settings: &Settings,
    ) -> bool {
        let Some(line) = surface.line(line_nr) else {
            return false;
        };

        let pattern = self.pattern_for(settings);
        let Some(new_line) = format_link(&line, span_start, span_end, &pattern) else {
            return false;
        };

        debug!("aliasing link on line {line_nr} at {span_start}..{span_end}");

        let _hold = self.guard.hold();
        surface.set_line(line_nr, new_line);
        true
    }

    /// Compiled grammar for the current settings, reusing the cached one
    /// when the selector and custom pattern are unchanged.
    fn pattern_for(&mut self, settings: &Settings) -> IdPattern {
        match &self.cache {
            Some(cached)
                if cached.id_format == settings.id_format
                    && cached.custom_pattern == settings.custom_pattern =>
            {
                cached.pattern.clone()
            }
            _ => {
                let pattern = IdPattern::resolve(settings);
                self.cache = Some(CachedPattern {
                    id_format: settings.id_format.clone(),
                    custom_pattern: settings.custom_pattern.clone(),
                    pattern: pattern.clone(),
                });
                pattern
            }
        }
    }
}
