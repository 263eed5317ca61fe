//! Field values as the metadata index hands them over.

use serde::{Deserialize, Serialize};

/// A named field's value: one link, a list of links, or free text that may
/// embed `[[wiki links]]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum FieldValue {
    Single(String),
    Many(Vec<String>),
    RawText(String),
}

impl FieldValue {
    /// Link targets in the value, normalized once: brackets, aliases and
    /// headings stripped, empties dropped.
    pub fn links(&self) -> Vec<String> {
        match self {
            FieldValue::Single(link) => single_link(link).into_iter().collect(),
            FieldValue::Many(links) => links.iter().flat_map(|l| single_link(l)).collect(),
            FieldValue::RawText(text) => extract_wiki_links(text),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Single(s.to_string())
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(v: Vec<&str>) -> Self {
        FieldValue::Many(v.into_iter().map(String::from).collect())
    }
}

fn single_link(value: &str) -> Vec<String> {
    if value.contains("[[") {
        extract_wiki_links(value)
    } else {
        link_target(value).into_iter().collect()
    }
}

/// `target#heading|alias` → `target`
fn link_target(inner: &str) -> Option<String> {
    let end = inner.find(['|', '#']).unwrap_or(inner.len());
    let target = inner[..end].trim();
    (!target.is_empty()).then(|| target.to_string())
}

/// All `[[...]]` targets in `text`, in order of appearance.
pub fn extract_wiki_links(text: &str) -> Vec<String> {
    let mut links = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find("[[") {
        let after = &rest[start + 2..];
        let Some(end) = after.find("]]") else {
            break;
        };
        if let Some(target) = link_target(&after[..end]) {
            links.push(target);
        }
        rest = &after[end + 2..];
    }
    links
}
