//! Shared test utilities for folgelink.
//!
//! In-memory fakes for the host capability traits, so the core is
//! exercised without a live editor or file listing. Only compiled when
//! running tests.

use std::collections::HashMap;
use std::sync::Arc;

use crate::formatter::{Cursor, EditorSurface, ReentrancyGuard};
use crate::hierarchy::{ListingEntry, ListingSurface};

/// An editing surface backed by a plain line buffer.
///
/// Optionally observes a [`ReentrancyGuard`] and records whether it was
/// held at the moment `set_line` ran, which is when a real host would
/// dispatch the formatter's own change notification.
pub struct FakeEditor {
    lines: Vec<String>,
    cursor: Cursor,
    observed_guard: Option<Arc<ReentrancyGuard>>,
    guard_held_during_set_line: Option<bool>,
}

impl FakeEditor {
    pub fn new(lines: &[&str], cursor: Cursor) -> FakeEditor {
        FakeEditor {
            lines: lines.iter().map(|line| line.to_string()).collect(),
            cursor,
            observed_guard: None,
            guard_held_during_set_line: None,
        }
    }

    pub fn line_text(&self, line: usize) -> &str {
        &self.lines[line]
    }

    pub fn move_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
    }

    /// Record the guard state seen by the next `set_line` call.
    pub fn observe_guard(&mut self, guard: Arc<ReentrancyGuard>) {
        self.observed_guard = Some(guard);
    }

    pub fn guard_held_during_set_line(&self) -> Option<bool> {
        self.guard_held_during_set_line
    }
}

impl EditorSurface for FakeEditor {
    fn cursor(&self) -> Cursor {
        self.cursor
    }

    fn line(&self, line: usize) -> Option<String> {
        self.lines.get(line).cloned()
    }

    fn set_line(&mut self, line: usize, text: String) {
        if let Some(guard) = &self.observed_guard {
            self.guard_held_during_set_line = Some(guard.is_held());
        }
        if let Some(slot) = self.lines.get_mut(line) {
            *slot = text;
        }
    }
}

/// A file listing holding entries and the indent level applied to each.
pub struct FakeListing {
    entries: Vec<ListingEntry>,
    indents: HashMap<String, usize>,
}

impl FakeListing {
    pub fn new(entries: &[(&str, &str)]) -> FakeListing {
        FakeListing {
            entries: entries
                .iter()
                .map(|(path, label)| ListingEntry {
                    path: path.to_string(),
                    label: label.to_string(),
                })
                .collect(),
            indents: HashMap::new(),
        }
    }

    pub fn indent_of(&self, path: &str) -> Option<usize> {
        self.indents.get(path).copied()
    }
}

impl ListingSurface for FakeListing {
    fn entries(&self) -> Vec<ListingEntry> {
        self.entries.clone()
    }

    fn apply_indent(&mut self, path: &str, level: usize) {
        self.indents.insert(path.to_string(), level);
    }

    fn clear_indent(&mut self, path: &str) {
        self.indents.remove(path);
    }
}
