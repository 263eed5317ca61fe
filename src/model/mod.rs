//! # Page Graph Model
//!
//! Plain data that crosses every boundary: registry ↔ scene ↔ layout ↔ renderer.
//!
//! Design rule: no index, renderer or settings access here.
//! Pure data: no I/O, no async.

pub mod page;
pub mod relation;
pub mod node;
pub mod link;
pub mod geometry;

pub use page::{Page, FileRef, FOLDER_PREFIX, TAG_PREFIX};
pub use relation::{
    Relation, RelationRecord, RelationType, RelationKind, LinkDirection, FriendSide,
    merge_relation_type, merge_direction, is_parent, is_child, is_friend,
};
pub use node::{Gates, Node};
pub use link::{link_key, Link, Role};
pub use geometry::{Point, Size};
