//! # Ontology Resolver
//!
//! Turns a page's named fields into DEFINED relations, using the field-name
//! lists of the configured hierarchy. Every relation is written on both
//! endpoints so each page's local view is complete on its own.

pub mod field;

use smallvec::SmallVec;
use tracing::warn;

use crate::index::MetadataIndex;
use crate::model::{FriendSide, LinkDirection, RelationType};
use crate::registry::Pages;
use crate::settings::Hierarchy;

pub use field::{extract_wiki_links, FieldValue};

/// `"Parent Page "` → `"parent-page"`
pub fn normalize_field_name(name: &str) -> String {
    name.trim()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}

/// What a field declares its targets to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OntologyRole {
    Parent,
    Child,
    LeftFriend,
    RightFriend,
    Previous,
    Next,
}

/// Maps field names to roles and writes the resulting relations.
#[derive(Debug, Clone)]
pub struct OntologyResolver {
    hierarchy: Hierarchy,
}

impl OntologyResolver {
    pub fn new(hierarchy: &Hierarchy) -> Self {
        Self { hierarchy: hierarchy.normalized() }
    }

    /// Every role the field is listed under. Conflicts are kept and settled
    /// at query time.
    pub fn roles(&self, field_name: &str) -> SmallVec<[OntologyRole; 2]> {
        let name = normalize_field_name(field_name);
        let h = &self.hierarchy;
        [
            (&h.parents, OntologyRole::Parent),
            (&h.children, OntologyRole::Child),
            (&h.left_friends, OntologyRole::LeftFriend),
            (&h.right_friends, OntologyRole::RightFriend),
            (&h.previous, OntologyRole::Previous),
            (&h.next, OntologyRole::Next),
        ]
        .into_iter()
        .filter(|(names, _)| names.contains(&name))
        .map(|(_, role)| role)
        .collect()
    }

    /// Record the DEFINED relations declared by `path`'s fields. Returns the
    /// number of relation writes.
    pub fn resolve_page<I>(&self, pages: &mut Pages, index: &I, path: &str) -> usize
    where
        I: MetadataIndex + ?Sized,
    {
        let mut written = 0;
        for (field, value) in index.fields(path) {
            let roles = self.roles(&field);
            if roles.is_empty() {
                continue;
            }
            for link in value.links() {
                let Some(target) = resolve_target(pages, index, &link, path) else {
                    warn!(source = path, field = field.as_str(), link = link.as_str(), "field link does not resolve to a page, skipping");
                    continue;
                };
                for role in &roles {
                    written += record(pages, path, &target, *role, &field);
                }
            }
        }
        written
    }
}

/// Index resolution first, then a page keyed by the raw text (virtual pages).
fn resolve_target<I>(pages: &Pages, index: &I, link: &str, source: &str) -> Option<String>
where
    I: MetadataIndex + ?Sized,
{
    index
        .resolve_link(link, source)
        .filter(|path| pages.contains(path))
        .or_else(|| pages.contains(link).then(|| link.to_string()))
}

/// Symmetric write: `page` declares `target` in `role`.
fn record(pages: &mut Pages, page: &str, target: &str, role: OntologyRole, field: &str) -> usize {
    use LinkDirection::{From, To};
    use RelationType::Defined;

    let def = Some(field);
    let pair = match role {
        OntologyRole::Parent => (
            pages.add_parent(page, target, Defined, To, def),
            pages.add_child(target, page, Defined, From, def),
        ),
        OntologyRole::Child => (
            pages.add_child(page, target, Defined, To, def),
            pages.add_parent(target, page, Defined, From, def),
        ),
        OntologyRole::LeftFriend => friend_pair(pages, FriendSide::Left, page, target, def),
        OntologyRole::RightFriend => friend_pair(pages, FriendSide::Right, page, target, def),
        OntologyRole::Previous => friend_pair(pages, FriendSide::Previous, page, target, def),
        OntologyRole::Next => friend_pair(pages, FriendSide::Next, page, target, def),
    };
    usize::from(pair.0) + usize::from(pair.1)
}

fn friend_pair(
    pages: &mut Pages,
    side: FriendSide,
    page: &str,
    target: &str,
    def: Option<&str>,
) -> (bool, bool) {
    (
        pages.add_friend_on(side, page, target, RelationType::Defined, LinkDirection::To, def),
        pages.add_friend_on(side.mirrored(), target, page, RelationType::Defined, LinkDirection::From, def),
    )
}
