//! In-memory metadata index.
//!
//! This is the reference implementation of `MetadataIndex`: a vault held in
//! plain maps. Links are resolved when they are added, so files must be
//! added before the links pointing at them.
//!
//! Use this index for:
//! - Testing the registry, resolver, layout and scene end to end
//! - Embedding the engine where the host hands over a metadata snapshot

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, Ordering};

use hashbrown::HashMap;

use crate::model::page::file_name;
use crate::ontology::FieldValue;
use super::{LinkMap, MetadataIndex, UnresolvedMap};

/// In-memory vault metadata.
#[derive(Debug, Default)]
pub struct MemoryIndex {
    files: BTreeSet<String>,
    resolved: LinkMap,
    unresolved: UnresolvedMap,
    fields: HashMap<String, Vec<(String, FieldValue)>>,
    tags: HashMap<String, Vec<String>>,
    reindexing: AtomicBool,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&mut self, path: impl Into<String>) -> &mut Self {
        self.files.insert(path.into());
        self
    }

    /// Record a plain link written in `source`. Unresolvable text becomes an
    /// unresolved link.
    pub fn add_link(&mut self, source: &str, link: &str) -> &mut Self {
        match self.resolve_link(link, source) {
            Some(target) => {
                *self
                    .resolved
                    .entry(source.to_string())
                    .or_default()
                    .entry(target)
                    .or_insert(0) += 1;
            }
            None => {
                self.unresolved
                    .entry(source.to_string())
                    .or_default()
                    .insert(strip_link_suffix(link).to_string());
            }
        }
        self
    }

    /// Add a named field. The field's links count as plain links too, the
    /// way a host index sees them in the document body.
    pub fn add_field(&mut self, path: &str, name: &str, value: FieldValue) -> &mut Self {
        for link in value.links() {
            self.add_link(path, &link);
        }
        self.fields
            .entry(path.to_string())
            .or_default()
            .push((name.to_string(), value));
        self
    }

    pub fn add_tag(&mut self, path: &str, tag: &str) -> &mut Self {
        let tag = tag.trim_start_matches('#').to_string();
        let tags = self.tags.entry(path.to_string()).or_default();
        if !tags.contains(&tag) {
            tags.push(tag);
        }
        self
    }

    pub fn set_reindexing(&self, reindexing: bool) {
        self.reindexing.store(reindexing, Ordering::SeqCst);
    }
}

/// `target#heading|alias` → `target`
fn strip_link_suffix(link: &str) -> &str {
    let end = link.find(['#', '|']).unwrap_or(link.len());
    link[..end].trim()
}

fn parent_dir(path: &str) -> Option<&str> {
    path.rsplit_once('/').map(|(dir, _)| dir)
}

impl MetadataIndex for MemoryIndex {
    fn files(&self) -> Vec<String> {
        self.files.iter().cloned().collect()
    }

    fn resolved_links(&self) -> &LinkMap {
        &self.resolved
    }

    fn unresolved_links(&self) -> &UnresolvedMap {
        &self.unresolved
    }

    fn backlinks(&self, path: &str) -> Vec<String> {
        let mut sources: Vec<String> = self
            .resolved
            .iter()
            .filter(|(_, targets)| targets.contains_key(path))
            .map(|(source, _)| source.clone())
            .collect();
        sources.sort();
        sources
    }

    fn fields(&self, path: &str) -> Vec<(String, FieldValue)> {
        self.fields.get(path).cloned().unwrap_or_default()
    }

    fn tags(&self, path: &str) -> Vec<String> {
        self.tags.get(path).cloned().unwrap_or_default()
    }

    fn tag_index(&self) -> BTreeMap<String, Vec<String>> {
        let mut index: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (path, tags) in &self.tags {
            for tag in tags {
                index.entry(tag.clone()).or_default().push(path.clone());
            }
        }
        for files in index.values_mut() {
            files.sort();
        }
        index
    }

    /// Exact path, path + `.md`, relative to the source folder, then the
    /// first file whose name matches case-insensitively.
    fn resolve_link(&self, link: &str, source: &str) -> Option<String> {
        let link = strip_link_suffix(link);
        if link.is_empty() {
            return None;
        }
        let with_md = format!("{link}.md");
        for candidate in [link, with_md.as_str()] {
            if self.files.contains(candidate) {
                return Some(candidate.to_string());
            }
        }
        if let Some(dir) = parent_dir(source) {
            for candidate in [format!("{dir}/{link}"), format!("{dir}/{with_md}")] {
                if self.files.contains(&candidate) {
                    return Some(candidate);
                }
            }
        }
        let wanted = file_name(link).to_lowercase();
        self.files
            .iter()
            .find(|path| {
                let name = file_name(path).to_lowercase();
                name == wanted || name.strip_suffix(".md") == Some(wanted.as_str())
            })
            .cloned()
    }

    fn is_reindexing(&self) -> bool {
        self.reindexing.load(Ordering::SeqCst)
    }
}
