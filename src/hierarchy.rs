//! Outline depth derived from folgezettel file names.
//!
//! Folgezettel identifiers encode nesting by alternating digit and letter
//! runs, with dash-separated branches: `1` is a root note, `1a` its child,
//! `1a1` a grandchild, `1-1a2b` a branch two levels into the `1-1` line.
//! The host's file listing forwards each visible entry here and maps the
//! returned level to a visual indent class.

use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::Settings;

/// Display-depth ceiling for indent classes. [`compute_level`] itself is
/// unbounded; the cap is applied when refreshing a listing.
pub const MAX_INDENT_LEVEL: usize = 10;

/// Compute the nesting depth encoded in a name's identifier prefix.
///
/// Every dash adds one level, and within each dash-segment every change
/// between digit and letter runs adds another. Names without a leading
/// digit have no identifier and sit at level 0.
///
/// ```
/// use folgelink::hierarchy::compute_level;
///
/// assert_eq!(compute_level("1 Title"), 0);
/// assert_eq!(compute_level("1a Title"), 1);
/// assert_eq!(compute_level("1-4a1 Title"), 3);
/// ```
pub fn compute_level(name: &str) -> usize {
    static ID_PREFIX_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^(?<id>[0-9]+[a-z0-9]*(?:-[a-z0-9]+)*)").unwrap());

    let Some(captures) = ID_PREFIX_RE.captures(name) else {
        return 0;
    };
    let id = &captures["id"];

    let segments = id.split('-').collect_vec();
    let branches = segments.len() - 1;

    // Within a segment, each digit<->letter boundary is one more level.
    let alternations: usize = segments
        .iter()
        .map(|segment| {
            segment
                .chars()
                .tuple_windows()
                .filter(|(prev, next)| prev.is_ascii_digit() != next.is_ascii_digit())
                .count()
        })
        .sum();

    branches + alternations
}

/// Decide whether an entry under `path` participates in indentation.
///
/// Exclusion wins over inclusion: a path equal to, or a strict descendant
/// of, an excluded folder is never indented. A non-empty include list then
/// admits exact matches only; sub-paths are not auto-included.
pub fn should_indent(path: &str, include: &[String], exclude: &[String]) -> bool {
    let excluded = exclude.iter().any(|folder| {
        path == folder
            || (path.starts_with(folder.as_str()) && path[folder.len()..].starts_with('/'))
    });
    if excluded {
        return false;
    }

    if !include.is_empty() && !include.iter().any(|folder| folder == path) {
        return false;
    }

    true
}

/// One visible entry of the host's file listing: its vault-relative path
/// and the label the listing displays for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub path: String,
    pub label: String,
}

impl ListingEntry {
    /// The folder the entry sits in; entries at the vault root have an
    /// empty folder.
    pub fn folder(&self) -> &str {
        self.path.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
    }
}

/// The host's file-listing surface. Applying an indent level replaces any
/// level applied earlier; clearing removes it.
pub trait ListingSurface {
    fn entries(&self) -> Vec<ListingEntry>;
    fn apply_indent(&mut self, path: &str, level: usize);
    fn clear_indent(&mut self, path: &str);
}

/// Reapply indentation across every visible entry.
///
/// Previously applied indents are cleared first, so toggling the feature
/// off or moving a folder onto the exclude list takes effect on the next
/// refresh. Applied levels are capped at [`MAX_INDENT_LEVEL`]. Folder
/// membership is filtered on the entry's containing folder.
pub fn refresh_listing(surface: &mut dyn ListingSurface, settings: &Settings) {
    for entry in surface.entries() {
        surface.clear_indent(&entry.path);

        if !settings.enable_indentation {
            continue;
        }
        if !should_indent(
            entry.folder(),
            &settings.include_folders,
            &settings.exclude_folders,
        ) {
            continue;
        }

        let level = compute_level(&entry.label).min(MAX_INDENT_LEVEL);
        if level > 0 {
            surface.apply_indent(&entry.path, level);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::FakeListing;

    #[test]
    fn test_compute_level_counts_alternations_and_branches() {
        assert_eq!(compute_level("1 Title"), 0);
        assert_eq!(compute_level("1a Title"), 1);
        assert_eq!(compute_level("1a1 Title"), 2);
        assert_eq!(compute_level("1-1a Title"), 2);
        assert_eq!(compute_level("1-4a1 Title"), 3);
    }

    #[test]
    fn test_compute_level_without_identifier_is_zero() {
        assert_eq!(compute_level("Title"), 0);
        assert_eq!(compute_level(""), 0);
        assert_eq!(compute_level("a1 Title"), 0);
    }

    #[test]
    fn test_compute_level_deep_identifiers() {
        assert_eq!(compute_level("1a2b Note"), 3);
        assert_eq!(compute_level("12 Note"), 0);
        assert_eq!(compute_level("1-1-1 Note"), 2);
    }

    #[test]
    fn test_should_indent_exclusion_wins() {
        let include = vec!["Journal".to_string()];
        let exclude = vec!["Journal".to_string()];

        assert!(!should_indent("Journal", &include, &exclude));
    }

    #[test]
    fn test_should_indent_excludes_descendants() {
        let exclude = vec!["Journal".to_string()];

        assert!(!should_indent("Journal/2024", &[], &exclude));
        // A sibling that merely shares the prefix is not excluded.
        assert!(should_indent("Journaling", &[], &exclude));
    }

    #[test]
    fn test_should_indent_include_list_is_exact() {
        let include = vec!["Zetteln".to_string()];

        assert!(should_indent("Zetteln", &include, &[]));
        assert!(!should_indent("Zetteln/Sub", &include, &[]));
        assert!(!should_indent("Other", &include, &[]));
    }

    #[test]
    fn test_should_indent_defaults_to_true() {
        assert!(should_indent("Anywhere/Note", &[], &[]));
    }

    #[test]
    fn test_refresh_listing_applies_capped_levels() {
        let mut listing = FakeListing::new(&[
            ("Zetteln/1 Root.md", "1 Root"),
            ("Zetteln/1a Child.md", "1a Child"),
            ("Zetteln/1a2b3c4d5e6f Deep.md", "1a2b3c4d5e6f Deep"),
        ]);

        refresh_listing(&mut listing, &Settings::default());

        assert_eq!(listing.indent_of("Zetteln/1 Root.md"), None);
        assert_eq!(listing.indent_of("Zetteln/1a Child.md"), Some(1));
        // Eleven alternations, capped to the display ceiling.
        assert_eq!(
            listing.indent_of("Zetteln/1a2b3c4d5e6f Deep.md"),
            Some(MAX_INDENT_LEVEL)
        );
    }

    #[test]
    fn test_refresh_listing_clears_when_disabled() {
        let mut listing = FakeListing::new(&[("Zetteln/1a Child.md", "1a Child")]);

        refresh_listing(&mut listing, &Settings::default());
        assert_eq!(listing.indent_of("Zetteln/1a Child.md"), Some(1));

        let disabled = Settings {
            enable_indentation: false,
            ..Settings::default()
        };
        refresh_listing(&mut listing, &disabled);
        assert_eq!(listing.indent_of("Zetteln/1a Child.md"), None);
    }

    #[test]
    fn test_refresh_listing_respects_exclusions() {
        let mut listing = FakeListing::new(&[
            ("Journal/1a Daily.md", "1a Daily"),
            ("Zetteln/1a Note.md", "1a Note"),
        ]);
        let settings = Settings {
            exclude_folders: vec!["Journal".to_string()],
            ..Settings::default()
        };

        refresh_listing(&mut listing, &settings);

        assert_eq!(listing.indent_of("Journal/1a Daily.md"), None);
        assert_eq!(listing.indent_of("Zetteln/1a Note.md"), Some(1));
    }
}
