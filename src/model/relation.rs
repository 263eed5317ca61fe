//! Relation (pairwise neighbour record) between two pages.
//!
//! A `Relation` is owned by one page and describes what the `target` page is
//! to it. Records are additive: every write goes through [`Relation::merge`],
//! which is built on the pure [`merge_relation_type`] and [`merge_direction`]
//! functions. Classification into parent/child/friend happens at query time
//! via [`is_parent`], [`is_child`] and [`is_friend`].

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// How a relation was established.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationType {
    /// Declared through a configured ontology field, a tag or a folder.
    Defined,
    /// Derived from a plain link or backlink.
    Inferred,
}

/// Which page originally pointed at which, from the owning page's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkDirection {
    /// The owning page links to the target.
    To,
    /// The target links to the owning page.
    From,
    Both,
}

/// The kind of neighbour a write records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationKind {
    Parent,
    Child,
    Friend,
}

/// Placement of a friend in the extended ontology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FriendSide {
    Left,
    Right,
    Previous,
    Next,
}

impl FriendSide {
    /// The side the same relation takes when written from the target page.
    pub fn mirrored(self) -> Self {
        match self {
            FriendSide::Left => FriendSide::Left,
            FriendSide::Right => FriendSide::Right,
            FriendSide::Previous => FriendSide::Next,
            FriendSide::Next => FriendSide::Previous,
        }
    }

    /// Left-column friends: plain friends and previous pages.
    pub fn is_left_column(self) -> bool {
        matches!(self, FriendSide::Left | FriendSide::Previous)
    }
}

/// DEFINED is sticky: it is never downgraded, and an INFERRED record is
/// upgraded as soon as a DEFINED observation arrives.
pub fn merge_relation_type(old: Option<RelationType>, new: RelationType) -> RelationType {
    match (old, new) {
        (Some(RelationType::Defined), _) => RelationType::Defined,
        (_, new) => new,
    }
}

/// The first direction observed is kept; a second, different one makes the
/// record `Both`.
pub fn merge_direction(old: LinkDirection, new: LinkDirection) -> LinkDirection {
    if old == new || old == LinkDirection::Both {
        old
    } else {
        LinkDirection::Both
    }
}

/// One classification (parent, child or friend) on a relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationRecord {
    pub relation_type: RelationType,
    /// Field names (or `tag-tree` / `file-tree`) that produced this record.
    pub definitions: SmallVec<[String; 2]>,
}

impl RelationRecord {
    fn new(relation_type: RelationType, definition: Option<&str>) -> Self {
        let mut definitions = SmallVec::new();
        if let Some(def) = definition.filter(|d| !d.is_empty()) {
            definitions.push(def.to_string());
        }
        Self { relation_type, definitions }
    }

    fn merge(&mut self, relation_type: RelationType, definition: Option<&str>) {
        self.relation_type = merge_relation_type(Some(self.relation_type), relation_type);
        if let Some(def) = definition.filter(|d| !d.is_empty()) {
            if !self.definitions.iter().any(|d| d == def) {
                self.definitions.push(def.to_string());
            }
        }
    }

    /// Provenance as shown to users, e.g. `"parent, up"`.
    pub fn definition(&self) -> String {
        self.definitions.join(", ")
    }

    pub fn is_defined(&self) -> bool {
        self.relation_type == RelationType::Defined
    }

    pub fn is_inferred(&self) -> bool {
        self.relation_type == RelationType::Inferred
    }
}

/// Directed record from the owning page to `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    /// Path of the neighbour page.
    pub target: String,
    pub parent: Option<RelationRecord>,
    pub child: Option<RelationRecord>,
    pub friend: Option<RelationRecord>,
    /// Meaningful only while `friend` is set.
    pub friend_side: Option<FriendSide>,
    pub direction: LinkDirection,
}

impl Relation {
    pub fn new(target: impl Into<String>, direction: LinkDirection) -> Self {
        Self {
            target: target.into(),
            parent: None,
            child: None,
            friend: None,
            friend_side: None,
            direction,
        }
    }

    /// The single write path for all relation updates.
    pub fn merge(
        &mut self,
        kind: RelationKind,
        relation_type: RelationType,
        direction: LinkDirection,
        definition: Option<&str>,
        side: Option<FriendSide>,
    ) {
        let slot = match kind {
            RelationKind::Parent => &mut self.parent,
            RelationKind::Child => &mut self.child,
            RelationKind::Friend => &mut self.friend,
        };
        let upgraded = match slot {
            Some(record) => {
                let was_inferred = record.is_inferred();
                record.merge(relation_type, definition);
                was_inferred && record.is_defined()
            }
            None => {
                *slot = Some(RelationRecord::new(relation_type, definition));
                true
            }
        };

        if kind == RelationKind::Friend {
            let side = side.unwrap_or(FriendSide::Left);
            if self.friend_side.is_none() || upgraded {
                self.friend_side = Some(side);
            }
        }
        self.direction = merge_direction(self.direction, direction);
    }

    pub fn is_parent(&self) -> Option<RelationType> {
        is_parent(self)
    }

    pub fn is_child(&self) -> Option<RelationType> {
        is_child(self)
    }

    pub fn is_friend(&self) -> Option<RelationType> {
        is_friend(self)
    }
}

fn defined(record: &Option<RelationRecord>) -> bool {
    record.as_ref().is_some_and(RelationRecord::is_defined)
}

fn inferred(record: &Option<RelationRecord>) -> bool {
    record.as_ref().is_some_and(RelationRecord::is_inferred)
}

/// Explicit classification of another kind suppresses this one.
pub fn is_child(relation: &Relation) -> Option<RelationType> {
    if defined(&relation.child) && !defined(&relation.parent) && !defined(&relation.friend) {
        return Some(RelationType::Defined);
    }
    if inferred(&relation.child) && relation.parent.is_none() && !defined(&relation.friend) {
        return Some(RelationType::Inferred);
    }
    None
}

pub fn is_parent(relation: &Relation) -> Option<RelationType> {
    if defined(&relation.parent) && !defined(&relation.child) && !defined(&relation.friend) {
        return Some(RelationType::Defined);
    }
    if inferred(&relation.parent) && relation.child.is_none() && !defined(&relation.friend) {
        return Some(RelationType::Inferred);
    }
    None
}

/// Mutual inferred parent/child collapses to an inferred friendship.
pub fn is_friend(relation: &Relation) -> Option<RelationType> {
    if defined(&relation.friend) {
        return Some(RelationType::Defined);
    }
    let mutual = inferred(&relation.parent) && inferred(&relation.child) && relation.friend.is_none();
    let plain = inferred(&relation.friend) && !defined(&relation.parent) && !defined(&relation.child);
    if mutual || plain {
        return Some(RelationType::Inferred);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rel() -> Relation {
        Relation::new("B", LinkDirection::To)
    }

    #[test]
    fn defined_is_sticky() {
        assert_eq!(merge_relation_type(None, RelationType::Inferred), RelationType::Inferred);
        assert_eq!(
            merge_relation_type(Some(RelationType::Inferred), RelationType::Defined),
            RelationType::Defined
        );
        assert_eq!(
            merge_relation_type(Some(RelationType::Defined), RelationType::Inferred),
            RelationType::Defined
        );
    }

    #[test]
    fn direction_accumulates_to_both() {
        use LinkDirection::*;
        assert_eq!(merge_direction(To, To), To);
        assert_eq!(merge_direction(To, From), Both);
        assert_eq!(merge_direction(Both, To), Both);
        assert_eq!(merge_direction(From, Both), Both);
    }

    #[test]
    fn definitions_are_deduplicated() {
        let mut r = rel();
        r.merge(RelationKind::Parent, RelationType::Defined, LinkDirection::To, Some("parent"), None);
        r.merge(RelationKind::Parent, RelationType::Defined, LinkDirection::To, Some("up"), None);
        r.merge(RelationKind::Parent, RelationType::Defined, LinkDirection::To, Some("parent"), None);
        assert_eq!(r.parent.as_ref().unwrap().definition(), "parent, up");
    }

    #[test]
    fn mutual_inference_is_friendship() {
        let mut r = rel();
        r.merge(RelationKind::Parent, RelationType::Inferred, LinkDirection::From, None, None);
        r.merge(RelationKind::Child, RelationType::Inferred, LinkDirection::To, None, None);
        assert_eq!(r.is_friend(), Some(RelationType::Inferred));
        assert_eq!(r.is_parent(), None);
        assert_eq!(r.is_child(), None);
        assert_eq!(r.direction, LinkDirection::Both);
    }

    #[test]
    fn defined_child_suppresses_inferred_parent() {
        let mut r = rel();
        r.merge(RelationKind::Parent, RelationType::Inferred, LinkDirection::From, None, None);
        r.merge(RelationKind::Child, RelationType::Defined, LinkDirection::To, Some("children"), None);
        assert_eq!(r.is_child(), Some(RelationType::Defined));
        assert_eq!(r.is_parent(), None);
        assert_eq!(r.is_friend(), None);
    }

    #[test]
    fn conflicting_defined_kinds_cancel_out() {
        let mut r = rel();
        r.merge(RelationKind::Parent, RelationType::Defined, LinkDirection::To, Some("parent"), None);
        r.merge(RelationKind::Child, RelationType::Defined, LinkDirection::To, Some("child"), None);
        assert_eq!(r.is_parent(), None);
        assert_eq!(r.is_child(), None);

        r.merge(RelationKind::Friend, RelationType::Defined, LinkDirection::To, Some("friend"), None);
        assert_eq!(r.is_friend(), Some(RelationType::Defined));
    }

    #[test]
    fn friend_side_follows_defined_upgrade() {
        let mut r = rel();
        r.merge(RelationKind::Friend, RelationType::Inferred, LinkDirection::To, None, Some(FriendSide::Left));
        r.merge(RelationKind::Friend, RelationType::Inferred, LinkDirection::To, None, Some(FriendSide::Right));
        assert_eq!(r.friend_side, Some(FriendSide::Left));
        r.merge(RelationKind::Friend, RelationType::Defined, LinkDirection::To, Some("next"), Some(FriendSide::Next));
        assert_eq!(r.friend_side, Some(FriendSide::Next));
    }
}
