//! folgelink: wikilink aliasing and outline indentation for Markdown vaults
//!
//! This crate provides the core of folgelink, a text-annotation engine for
//! note vaults whose files carry structured identifier prefixes in the
//! folgezettel tradition (`1`, `1a`, `1a2`, `1-1a2b`, ...).
//!
//! # Overview
//!
//! Two cooperating components:
//!
//! - **Link formatting**: when a wikilink to an identifier-titled note is
//!   completed or pasted, the identifier is appended as a display alias —
//!   `[[1a2 Some Title]]` becomes `[[1a2 Some Title|1a2]]` — exactly once,
//!   without disturbing surrounding text.
//! - **Outline indentation**: each file-listing entry is assigned a depth
//!   computed from its identifier prefix, so the listing reads as an
//!   outline.
//!
//! # Architecture
//!
//! - [`formatter`]: the aliasing transform and its event-driven front end
//! - [`grammar`]: configurable identifier grammar resolution
//! - [`hierarchy`]: nesting depth, path filtering, listing refresh
//! - [`config`]: configuration loading and defaults
//!
//! The host's editing and listing surfaces are capability traits
//! ([`formatter::EditorSurface`], [`hierarchy::ListingSurface`]) injected
//! into the core, which itself never touches a live UI.
//!
//! # Usage
//!
//! ```
//! use folgelink::config::Settings;
//! use folgelink::formatter::format_link;
//! use folgelink::grammar::IdPattern;
//!
//! let pattern = IdPattern::resolve(&Settings::default());
//! let line = "See [[1a2 Some Title]] for more.";
//! assert_eq!(
//!     format_link(line, 4, 22, &pattern).as_deref(),
//!     Some("See [[1a2 Some Title|1a2]] for more.")
//! );
//! ```

// Core text transform
pub mod formatter;
pub mod grammar;

// Outline indentation
pub mod hierarchy;

// Configuration
pub mod config;

// Test utilities (only available in test builds)
#[cfg(test)]
pub mod test_utils;
