//! Page: one identity in the knowledge base.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use super::{FriendSide, LinkDirection, Relation, RelationKind, RelationType};

/// Path prefix of folder pages.
pub const FOLDER_PREFIX: &str = "folder:";
/// Path prefix of tag pages.
pub const TAG_PREFIX: &str = "tag:#";

/// Backing file of a page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileRef {
    pub path: String,
    /// Lowercase extension without the dot, empty when there is none.
    pub extension: String,
}

impl FileRef {
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let extension = file_name(&path)
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default();
        Self { path, extension }
    }

    pub fn is_markdown(&self) -> bool {
        self.extension == "md"
    }
}

/// A node identity: file, folder, tag, or an unresolved (virtual) reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub path: String,
    pub file: Option<FileRef>,
    pub name: String,
    pub is_folder: bool,
    pub is_tag: bool,
    pub is_virtual: bool,
    pub is_attachment: bool,
    /// neighbour path → relation
    pub neighbours: HashMap<String, Relation>,
    /// Field links have been materialized for this page.
    pub field_index_ready: bool,
}

impl Page {
    fn bare(path: String, name: String) -> Self {
        Self {
            path,
            file: None,
            name,
            is_folder: false,
            is_tag: false,
            is_virtual: false,
            is_attachment: false,
            neighbours: HashMap::new(),
            field_index_ready: false,
        }
    }

    /// A page backed by a file in the vault.
    pub fn file(path: impl Into<String>) -> Self {
        let file = FileRef::new(path);
        let base = file_name(&file.path);
        let name = if file.is_markdown() {
            base.strip_suffix(".md").unwrap_or(base).to_string()
        } else {
            base.to_string()
        };
        let mut page = Self::bare(file.path.clone(), name);
        page.is_attachment = !file.is_markdown();
        page.file = Some(file);
        page
    }

    /// A referenced path with no backing file yet.
    pub fn virtual_page(path: impl Into<String>) -> Self {
        let path = path.into();
        let name = file_name(&path).to_string();
        let mut page = Self::bare(path, name);
        page.is_virtual = true;
        page
    }

    pub fn folder(dir: &str) -> Self {
        let name = file_name(dir).to_string();
        let mut page = Self::bare(folder_path(dir), name);
        page.is_folder = true;
        page
    }

    /// `tag` is given without the leading `#`.
    pub fn tag(tag: &str) -> Self {
        let mut page = Self::bare(tag_path(tag), format!("#{tag}"));
        page.is_tag = true;
        page
    }

    /// A regular markdown page (not a folder, tag, attachment or virtual page).
    pub fn is_page(&self) -> bool {
        !(self.is_folder || self.is_tag || self.is_virtual || self.is_attachment)
    }

    /// Record a neighbour. Self references are ignored; returns whether the
    /// relation was written.
    pub(crate) fn record(
        &mut self,
        target: &str,
        kind: RelationKind,
        relation_type: RelationType,
        direction: LinkDirection,
        definition: Option<&str>,
        side: Option<FriendSide>,
    ) -> bool {
        if target == self.path {
            return false;
        }
        self.neighbours
            .entry(target.to_string())
            .or_insert_with(|| Relation::new(target, direction))
            .merge(kind, relation_type, direction, definition, side);
        true
    }

    pub fn relation(&self, target: &str) -> Option<&Relation> {
        self.neighbours.get(target)
    }
}

pub fn folder_path(dir: &str) -> String {
    format!("{FOLDER_PREFIX}{dir}")
}

pub fn tag_path(tag: &str) -> String {
    format!("{TAG_PREFIX}{tag}")
}

/// Last `/`-separated segment.
pub fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_names_by_kind() {
        assert_eq!(Page::file("notes/Rust.md").name, "Rust");
        let img = Page::file("assets/Diagram.PNG");
        assert_eq!(img.name, "Diagram.PNG");
        assert!(img.is_attachment);
        assert_eq!(Page::folder("notes/lang").name, "lang");
        assert_eq!(Page::folder("notes/lang").path, "folder:notes/lang");
        assert_eq!(Page::tag("lang/rust").name, "#lang/rust");
        assert!(Page::virtual_page("Missing").is_virtual);
        assert!(Page::file("a.md").is_page());
    }

    #[test]
    fn self_reference_is_ignored() {
        let mut page = Page::file("A.md");
        let written = page.record(
            "A.md",
            RelationKind::Parent,
            RelationType::Defined,
            LinkDirection::To,
            None,
            None,
        );
        assert!(!written);
        assert!(page.neighbours.is_empty());
    }
}
