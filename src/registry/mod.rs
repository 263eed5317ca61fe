//! # Relation Registry
//!
//! `Pages` owns every `Page` of one index build together with the settings
//! snapshot it was built under. All relation writes go through
//! [`Pages::add_parent`], [`Pages::add_child`] and [`Pages::add_friend`];
//! all reads go through [`PageRef`], which applies the classification rules
//! and the visibility toggles at query time.

use std::collections::BTreeMap;

use hashbrown::HashMap;
use tracing::{debug, warn};

use crate::context::IndexContext;
use crate::index::MetadataIndex;
use crate::model::*;
use crate::ontology::OntologyResolver;

// ============================================================================
// Pages
// ============================================================================

/// Every page of the current index, keyed by path.
#[derive(Debug, Clone)]
pub struct Pages {
    pages: HashMap<String, Page>,
    ctx: IndexContext,
}

impl Pages {
    pub fn new(ctx: IndexContext) -> Self {
        Self { pages: HashMap::new(), ctx }
    }

    pub fn context(&self) -> &IndexContext {
        &self.ctx
    }

    /// Insert a page unless one with the same path exists. Returns whether
    /// it was inserted.
    pub fn add(&mut self, page: Page) -> bool {
        if self.pages.contains_key(&page.path) {
            return false;
        }
        self.pages.insert(page.path.clone(), page);
        true
    }

    pub fn page(&self, path: &str) -> Option<&Page> {
        self.pages.get(path)
    }

    /// Query handle for a page.
    pub fn get(&self, path: &str) -> Option<PageRef<'_>> {
        self.pages.get(path).map(|page| PageRef { page, pages: self })
    }

    pub fn contains(&self, path: &str) -> bool {
        self.pages.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.pages.keys().map(String::as_str)
    }

    // ========================================================================
    // Recording
    // ========================================================================

    /// Record `parent` as a parent of `page`.
    pub fn add_parent(
        &mut self,
        page: &str,
        parent: &str,
        relation_type: RelationType,
        direction: LinkDirection,
        definition: Option<&str>,
    ) -> bool {
        self.add_relation(page, parent, RelationKind::Parent, relation_type, direction, definition, None)
    }

    /// Record `child` as a child of `page`.
    pub fn add_child(
        &mut self,
        page: &str,
        child: &str,
        relation_type: RelationType,
        direction: LinkDirection,
        definition: Option<&str>,
    ) -> bool {
        self.add_relation(page, child, RelationKind::Child, relation_type, direction, definition, None)
    }

    /// Record `friend` as a (left-column) friend of `page`.
    pub fn add_friend(
        &mut self,
        page: &str,
        friend: &str,
        relation_type: RelationType,
        direction: LinkDirection,
        definition: Option<&str>,
    ) -> bool {
        self.add_friend_on(FriendSide::Left, page, friend, relation_type, direction, definition)
    }

    /// Record a friend placed on `side` of `page`.
    pub fn add_friend_on(
        &mut self,
        side: FriendSide,
        page: &str,
        friend: &str,
        relation_type: RelationType,
        direction: LinkDirection,
        definition: Option<&str>,
    ) -> bool {
        self.add_relation(page, friend, RelationKind::Friend, relation_type, direction, definition, Some(side))
    }

    #[allow(clippy::too_many_arguments)]
    fn add_relation(
        &mut self,
        page: &str,
        target: &str,
        kind: RelationKind,
        relation_type: RelationType,
        direction: LinkDirection,
        definition: Option<&str>,
        side: Option<FriendSide>,
    ) -> bool {
        let output = self.ctx.output_path();
        if page == target || page == output || target == output {
            return false;
        }
        if !self.pages.contains_key(target) {
            warn!(source = page, target, ?kind, "relation target is not indexed, skipping");
            return false;
        }
        match self.pages.get_mut(page) {
            Some(owner) => owner.record(target, kind, relation_type, direction, definition, side),
            None => {
                warn!(source = page, target, ?kind, "relation source is not indexed, skipping");
                false
            }
        }
    }

    // ========================================================================
    // Lazy field materialization
    // ========================================================================

    /// Turn the page's ontology fields into DEFINED relations. Runs at most
    /// once per page and index build.
    pub fn add_field_links_to_page<I>(&mut self, index: &I, path: &str)
    where
        I: MetadataIndex + ?Sized,
    {
        match self.pages.get_mut(path) {
            Some(page) if page.field_index_ready => return,
            Some(page) => page.field_index_ready = true,
            None => return,
        }
        let resolver = OntologyResolver::new(&self.ctx.settings().hierarchy);
        let written = resolver.resolve_page(self, index, path);
        debug!(path, written, "materialized field links");
    }
}

// ============================================================================
// Queries
// ============================================================================

/// A classified neighbour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbour<'a> {
    pub page: &'a Page,
    pub relation_type: RelationType,
}

impl Neighbour<'_> {
    pub fn is_inferred(&self) -> bool {
        self.relation_type == RelationType::Inferred
    }
}

/// Read-only view of one page inside its registry.
#[derive(Debug, Clone, Copy)]
pub struct PageRef<'a> {
    page: &'a Page,
    pages: &'a Pages,
}

impl<'a> PageRef<'a> {
    pub fn page(&self) -> &'a Page {
        self.page
    }

    pub fn path(&self) -> &'a str {
        &self.page.path
    }

    pub fn parents(&self) -> Vec<Neighbour<'a>> {
        self.collect(|rel| is_parent(rel))
    }

    pub fn children(&self) -> Vec<Neighbour<'a>> {
        self.collect(|rel| is_child(rel))
    }

    /// Friends on either side.
    pub fn friends(&self) -> Vec<Neighbour<'a>> {
        self.collect(|rel| is_friend(rel))
    }

    /// Plain and previous friends.
    pub fn left_friends(&self) -> Vec<Neighbour<'a>> {
        self.collect(|rel| is_friend(rel).filter(|_| friend_side(rel).is_left_column()))
    }

    /// Right and next friends.
    pub fn right_friends(&self) -> Vec<Neighbour<'a>> {
        self.collect(|rel| is_friend(rel).filter(|_| !friend_side(rel).is_left_column()))
    }

    /// Other children of this page's parents. DEFINED wins when a sibling is
    /// reachable through several parents.
    pub fn siblings(&self) -> Vec<Neighbour<'a>> {
        let mut found: BTreeMap<&'a str, Neighbour<'a>> = BTreeMap::new();
        for parent in self.parents() {
            let parent = PageRef { page: parent.page, pages: self.pages };
            for child in parent.children() {
                if child.page.path == self.page.path {
                    continue;
                }
                found
                    .entry(child.page.path.as_str())
                    .and_modify(|known| {
                        if child.relation_type == RelationType::Defined {
                            known.relation_type = RelationType::Defined;
                        }
                    })
                    .or_insert(child);
            }
        }
        let mut siblings: Vec<_> = found.into_values().collect();
        sort_neighbours(&mut siblings);
        siblings
    }

    pub fn parent_count(&self) -> usize {
        self.parents().len()
    }

    pub fn child_count(&self) -> usize {
        self.children().len()
    }

    pub fn friend_count(&self) -> usize {
        self.friends().len()
    }

    pub fn has_parents(&self) -> bool {
        self.any(is_parent)
    }

    pub fn has_children(&self) -> bool {
        self.any(is_child)
    }

    pub fn has_friends(&self) -> bool {
        self.any(is_friend)
    }

    /// Raw, unclassified relation record to `target`.
    pub fn relation_to(&self, target: &str) -> Option<&'a Relation> {
        self.page.neighbours.get(target)
    }

    fn any(&self, classify: fn(&Relation) -> Option<RelationType>) -> bool {
        self.page
            .neighbours
            .values()
            .any(|rel| self.admit(rel, classify(rel)).is_some())
    }

    fn collect<F>(&self, classify: F) -> Vec<Neighbour<'a>>
    where
        F: Fn(&Relation) -> Option<RelationType>,
    {
        let mut out: Vec<_> = self
            .page
            .neighbours
            .values()
            .filter_map(|rel| self.admit(rel, classify(rel)))
            .collect();
        sort_neighbours(&mut out);
        out
    }

    /// Inferred toggle plus page-kind visibility toggles.
    fn admit(&self, rel: &Relation, relation_type: Option<RelationType>) -> Option<Neighbour<'a>> {
        let relation_type = relation_type?;
        let settings = self.pages.ctx.settings();
        if relation_type == RelationType::Inferred && !settings.show_inferred_nodes {
            return None;
        }
        let target = self.pages.pages.get(&rel.target)?;
        let visible = (settings.show_virtual_nodes || !target.is_virtual)
            && (settings.show_attachments || !target.is_attachment)
            && (settings.show_folder_nodes || !target.is_folder)
            && (settings.show_tag_nodes || !target.is_tag)
            && (settings.show_page_nodes || !target.is_page());
        visible.then_some(Neighbour { page: target, relation_type })
    }
}

fn friend_side(rel: &Relation) -> FriendSide {
    rel.friend_side.unwrap_or(FriendSide::Left)
}

/// Case-insensitive name, then path.
fn sort_neighbours(list: &mut [Neighbour<'_>]) {
    list.sort_by(|a, b| {
        a.page
            .name
            .to_lowercase()
            .cmp(&b.page.name.to_lowercase())
            .then_with(|| a.page.path.cmp(&b.page.path))
    });
}

// ============================================================================
// Tests
// ============================================================================
