//! User settings consumed by the engine.
//!
//! Settings arrive as JSON from the host. [`Settings::from_json`] is the
//! boundary: malformed JSON, missing required keys and invalid values are
//! rejected here, and the ontology field lists are normalized, so the rest
//! of the crate only ever sees validated settings.

pub mod history;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::layout::CompactTuning;
use crate::ontology::normalize_field_name;
use crate::render::StyleSettings;
use crate::{Error, Result};

pub use history::{NavigationHistory, HistoryEntry, MAX_HISTORY};

/// Field-name lists of the relationship ontology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hierarchy {
    pub parents: Vec<String>,
    pub children: Vec<String>,
    /// Plain friends, drawn in the left column.
    #[serde(alias = "friends")]
    pub left_friends: Vec<String>,
    #[serde(default)]
    pub right_friends: Vec<String>,
    #[serde(default)]
    pub previous: Vec<String>,
    #[serde(default)]
    pub next: Vec<String>,
}

impl Default for Hierarchy {
    fn default() -> Self {
        let list = |names: &[&str]| names.iter().map(|s| s.to_string()).collect();
        Self {
            parents: list(&["Parent", "Parents", "up", "u", "North", "origin", "inception", "source"]),
            children: list(&["Children", "Child", "down", "d", "South", "leads to", "contributes to"]),
            left_friends: list(&["Friends", "Friend", "Jump", "Jumps", "j", "similar", "supports"]),
            right_friends: list(&["opposes", "disables", "cons", "alternatives", "alternative"]),
            previous: list(&["Previous", "Prev", "West", "w", "Before"]),
            next: list(&["Next", "n", "East", "e", "After"]),
        }
    }
}

impl Hierarchy {
    /// Lowercase-with-dashes, trimmed, empties and duplicates dropped,
    /// order preserved.
    pub fn normalized(&self) -> Self {
        fn norm(names: &[String]) -> Vec<String> {
            let mut out: Vec<String> = Vec::with_capacity(names.len());
            for name in names.iter().map(|n| normalize_field_name(n)) {
                if !name.is_empty() && !out.contains(&name) {
                    out.push(name);
                }
            }
            out
        }
        Self {
            parents: norm(&self.parents),
            children: norm(&self.children),
            left_friends: norm(&self.left_friends),
            right_friends: norm(&self.right_friends),
            previous: norm(&self.previous),
            next: norm(&self.next),
        }
    }
}

fn default_max_item_count() -> usize { 30 }
fn default_true() -> bool { true }
fn default_output_path() -> String { "pagegraph.md".into() }
fn default_refresh_interval_ms() -> u64 { 5_000 }

/// Validated engine settings. Immutable once handed to an `IndexContext`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub hierarchy: Hierarchy,
    /// Path prefixes never shown in a neighbourhood.
    #[serde(default)]
    pub exclusions: Vec<String>,
    /// Per-region cap on neighbours.
    #[serde(default = "default_max_item_count")]
    pub max_item_count: usize,
    #[serde(default = "default_true")]
    pub show_inferred_nodes: bool,
    #[serde(default = "default_true")]
    pub show_virtual_nodes: bool,
    #[serde(default = "default_true")]
    pub show_attachments: bool,
    #[serde(default)]
    pub show_folder_nodes: bool,
    #[serde(default)]
    pub show_tag_nodes: bool,
    #[serde(default = "default_true")]
    pub show_page_nodes: bool,
    /// Plain links become friends instead of parent/child.
    #[serde(default)]
    pub infer_all_links_as_friends: bool,
    /// Plain links make the target a parent instead of a child.
    #[serde(default)]
    pub inverse_infer: bool,
    #[serde(default)]
    pub compact_view: bool,
    #[serde(default)]
    pub compact_tuning: CompactTuning,
    /// The drawing the view writes to; never linked to itself.
    #[serde(default = "default_output_path")]
    pub output_path: String,
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,
    #[serde(default)]
    pub styles: StyleSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            hierarchy: Hierarchy::default().normalized(),
            exclusions: Vec::new(),
            max_item_count: default_max_item_count(),
            show_inferred_nodes: true,
            show_virtual_nodes: true,
            show_attachments: true,
            show_folder_nodes: false,
            show_tag_nodes: false,
            show_page_nodes: true,
            infer_all_links_as_friends: false,
            inverse_infer: false,
            compact_view: false,
            compact_tuning: CompactTuning::default(),
            output_path: default_output_path(),
            refresh_interval_ms: default_refresh_interval_ms(),
            styles: StyleSettings::default(),
        }
    }
}

impl Settings {
    /// Parse, validate and normalize settings JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validated()
    }

    /// Read and validate a settings file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Validate values and normalize the ontology.
    pub fn validated(mut self) -> Result<Self> {
        if self.max_item_count == 0 {
            return Err(Error::Config("max_item_count must be at least 1".into()));
        }
        if self.refresh_interval_ms == 0 {
            return Err(Error::Config("refresh_interval_ms must be positive".into()));
        }
        let base = &self.styles.base;
        if base.font_size <= 0.0 || base.max_label_length == 0 {
            return Err(Error::Config(
                "base style needs a positive font_size and max_label_length".into(),
            ));
        }
        self.hierarchy = self.hierarchy.normalized();
        self.exclusions.retain(|prefix| !prefix.trim().is_empty());
        Ok(self)
    }

    /// True when `path` starts with one of the exclusion prefixes.
    pub fn is_excluded(&self, path: &str) -> bool {
        self.exclusions.iter().any(|prefix| path.starts_with(prefix.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_json() {
        let json = r#"{"hierarchy": {"parents": ["Parent Page"], "children": ["Child"], "friends": ["Friend"]}}"#;
        let settings = Settings::from_json(json).unwrap();
        assert_eq!(settings.hierarchy.parents, vec!["parent-page"]);
        assert_eq!(settings.hierarchy.left_friends, vec!["friend"]);
        assert!(settings.hierarchy.next.is_empty());
        assert_eq!(settings.max_item_count, 30);
        assert!(settings.show_inferred_nodes);
        assert!(!settings.show_folder_nodes);
    }

    #[test]
    fn missing_hierarchy_is_rejected() {
        let err = Settings::from_json(r#"{"max_item_count": 5}"#).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn zero_item_count_is_rejected() {
        let json = r#"{"hierarchy": {"parents": [], "children": [], "friends": []}, "max_item_count": 0}"#;
        assert!(matches!(Settings::from_json(json), Err(Error::Config(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Settings::load("/nonexistent/pagegraph-settings.json").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn exclusions_match_prefixes() {
        let settings = Settings {
            exclusions: vec!["templates/".into(), " ".into()],
            ..Settings::default()
        }
        .validated()
        .unwrap();
        assert_eq!(settings.exclusions.len(), 1);
        assert!(settings.is_excluded("templates/daily.md"));
        assert!(!settings.is_excluded("notes/templates.md"));
    }
}
