//! Index build: metadata index → `Pages`.
//!
//! ```text
//! files ──────────────► Page per file
//! folders ────────────► folder pages, DEFINED "file-tree" parent/child
//! tag index ──────────► tag pages,    DEFINED "tag-tree"  parent/child
//! resolved links ─────► INFERRED parent/child (or friend)
//! unresolved links ───► virtual pages + INFERRED relations
//! ```
//!
//! Ontology fields are not read here; they are materialized lazily per page
//! when the page is rendered (`Pages::add_field_links_to_page`).

use tracing::info;

use crate::context::IndexContext;
use crate::model::page::{folder_path, tag_path};
use crate::model::{LinkDirection, Page, RelationType};
use crate::registry::Pages;
use crate::settings::Settings;
use super::MetadataIndex;

/// Provenance of folder containment relations.
pub const FILE_TREE: &str = "file-tree";
/// Provenance of tag membership relations.
pub const TAG_TREE: &str = "tag-tree";

/// Counters of one index build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildStats {
    pub files: usize,
    pub folders: usize,
    pub tags: usize,
    pub virtual_pages: usize,
    pub inferred_links: usize,
}

/// Build the registry from scratch.
pub fn build_pages<I>(index: &I, ctx: IndexContext) -> (Pages, BuildStats)
where
    I: MetadataIndex + ?Sized,
{
    let settings = ctx.snapshot();
    let mut pages = Pages::new(ctx);
    let mut stats = BuildStats::default();

    // --- 1. Files ---
    let files = index.files();
    for file in &files {
        if pages.add(Page::file(file.as_str())) {
            stats.files += 1;
        }
    }

    // --- 2. Folder tree ---
    for file in &files {
        stats.folders += add_folder_chain(&mut pages, file);
    }

    // --- 3. Tag tree ---
    for (tag, tagged) in index.tag_index() {
        stats.tags += add_tag_chain(&mut pages, &tag);
        let tag_page = tag_path(&tag);
        for file in tagged {
            pages.add_parent(&file, &tag_page, RelationType::Defined, LinkDirection::From, Some(TAG_TREE));
            pages.add_child(&tag_page, &file, RelationType::Defined, LinkDirection::To, Some(TAG_TREE));
        }
    }

    // --- 4. Resolved links, in a stable order ---
    let mut resolved: Vec<(&String, &String)> = index
        .resolved_links()
        .iter()
        .flat_map(|(source, targets)| targets.keys().map(move |target| (source, target)))
        .collect();
    resolved.sort();
    for (source, target) in resolved {
        if infer_link(&mut pages, &settings, source, target) {
            stats.inferred_links += 1;
        }
    }

    // --- 5. Unresolved links become virtual pages ---
    let mut unresolved: Vec<(&String, &String)> = index
        .unresolved_links()
        .iter()
        .flat_map(|(source, targets)| targets.iter().map(move |target| (source, target)))
        .collect();
    unresolved.sort();
    for (source, target) in unresolved {
        if pages.add(Page::virtual_page(target.as_str())) {
            stats.virtual_pages += 1;
        }
        if infer_link(&mut pages, &settings, source, target) {
            stats.inferred_links += 1;
        }
    }

    info!(
        files = stats.files,
        folders = stats.folders,
        tags = stats.tags,
        virtual_pages = stats.virtual_pages,
        inferred_links = stats.inferred_links,
        "page index built"
    );
    (pages, stats)
}

/// Record a plain link from `source` to `target` on both endpoints.
fn infer_link(pages: &mut Pages, settings: &Settings, source: &str, target: &str) -> bool {
    use LinkDirection::{From, To};
    use RelationType::Inferred;

    if settings.infer_all_links_as_friends {
        pages.add_friend(source, target, Inferred, To, None)
            & pages.add_friend(target, source, Inferred, From, None)
    } else if settings.inverse_infer {
        pages.add_parent(source, target, Inferred, To, None)
            & pages.add_child(target, source, Inferred, From, None)
    } else {
        pages.add_child(source, target, Inferred, To, None)
            & pages.add_parent(target, source, Inferred, From, None)
    }
}

/// Folder pages from the file's directory up to the root. Returns the number
/// of folder pages created.
fn add_folder_chain(pages: &mut Pages, file: &str) -> usize {
    let mut created = 0;
    let mut child = file.to_string();
    let mut rest = file;
    while let Some((dir, _)) = rest.rsplit_once('/') {
        let folder = folder_path(dir);
        if pages.add(Page::folder(dir)) {
            created += 1;
        }
        pages.add_parent(&child, &folder, RelationType::Defined, LinkDirection::From, Some(FILE_TREE));
        pages.add_child(&folder, &child, RelationType::Defined, LinkDirection::To, Some(FILE_TREE));
        child = folder;
        rest = dir;
    }
    created
}

/// Tag pages for `a/b/c`, `a/b` and `a`, each nested under the next.
fn add_tag_chain(pages: &mut Pages, tag: &str) -> usize {
    let mut created = 0;
    let mut current = tag;
    if pages.add(Page::tag(current)) {
        created += 1;
    }
    while let Some((parent, _)) = current.rsplit_once('/') {
        if pages.add(Page::tag(parent)) {
            created += 1;
        }
        let (child_path, parent_path) = (tag_path(current), tag_path(parent));
        pages.add_parent(&child_path, &parent_path, RelationType::Defined, LinkDirection::From, Some(TAG_TREE));
        pages.add_child(&parent_path, &child_path, RelationType::Defined, LinkDirection::To, Some(TAG_TREE));
        current = parent;
    }
    created
}
