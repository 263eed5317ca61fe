//! Property tests for relation merging.
//!
//! Observations are random (kind, type, direction) triples; the laws must
//! hold for every sequence.

use pagegraph::model::{is_child, is_friend, is_parent, RelationRecord};
use pagegraph::{LinkDirection, Relation, RelationKind, RelationType};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

type Observation = (RelationKind, RelationType, LinkDirection);

fn observation() -> impl Strategy<Value = Observation> {
    (
        prop_oneof![
            Just(RelationKind::Parent),
            Just(RelationKind::Child),
            Just(RelationKind::Friend),
        ],
        prop_oneof![Just(RelationType::Defined), Just(RelationType::Inferred)],
        prop_oneof![
            Just(LinkDirection::To),
            Just(LinkDirection::From),
            Just(LinkDirection::Both),
        ],
    )
}

fn apply<'a>(observations: impl IntoIterator<Item = &'a Observation>) -> Relation {
    let mut iter = observations.into_iter().peekable();
    let first = iter.peek().map(|o| o.2).unwrap_or(LinkDirection::To);
    let mut rel = Relation::new("B.md", first);
    for (kind, relation_type, direction) in iter {
        rel.merge(*kind, *relation_type, *direction, None, None);
    }
    rel
}

type Kinds = Option<RelationType>;

/// Everything order can not change: record types, direction and the
/// resulting classification.
fn summary(rel: &Relation) -> (Kinds, Kinds, Kinds, LinkDirection, Kinds, Kinds, Kinds) {
    let kind = |r: &Option<RelationRecord>| r.as_ref().map(|r| r.relation_type);
    (
        kind(&rel.parent),
        kind(&rel.child),
        kind(&rel.friend),
        rel.direction,
        is_parent(rel),
        is_child(rel),
        is_friend(rel),
    )
}

proptest! {
    #[test]
    fn repeating_every_observation_changes_nothing(obs in prop::collection::vec(observation(), 1..12)) {
        let once = apply(&obs);
        let doubled: Vec<Observation> = obs.iter().flat_map(|o| [*o, *o]).collect();
        assert_eq!(apply(&doubled), once);
    }

    #[test]
    fn order_does_not_matter(obs in prop::collection::vec(observation(), 1..12)) {
        let forward = apply(&obs);
        let backward = apply(obs.iter().rev());
        assert_eq!(summary(&forward), summary(&backward));
    }

    #[test]
    fn defined_child_is_never_downgraded(
        before in prop::collection::vec(observation(), 0..6),
        after in prop::collection::vec(observation(), 0..6),
    ) {
        let defined_child = (RelationKind::Child, RelationType::Defined, LinkDirection::To);
        let all: Vec<Observation> = before.iter().chain([&defined_child]).chain(after.iter()).cloned().collect();
        let rel = apply(&all);
        assert_eq!(rel.child.as_ref().map(|r| r.relation_type), Some(RelationType::Defined));
    }

    #[test]
    fn no_pair_is_both_parent_and_child(obs in prop::collection::vec(observation(), 1..12)) {
        let rel = apply(&obs);
        prop_assert!(!(is_parent(&rel).is_some() && is_child(&rel).is_some()));
    }
}
