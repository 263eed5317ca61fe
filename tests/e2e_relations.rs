//! End-to-end tests for relation building and classification.
//!
//! Each test exercises: MemoryIndex -> build_pages -> field materialization
//! -> PageRef queries.

use pagegraph::{
    build_pages, FieldValue, IndexContext, MemoryIndex, Pages, RelationType, Settings,
};
use pretty_assertions::assert_eq;

fn build(index: &MemoryIndex, settings: Settings) -> Pages {
    build_pages(index, IndexContext::new(settings)).0
}

fn neighbours(list: Vec<pagegraph::Neighbour<'_>>) -> Vec<(String, RelationType)> {
    list.into_iter().map(|n| (n.page.path.clone(), n.relation_type)).collect()
}

// ============================================================================
// 1. Declared fields
// ============================================================================

#[test]
fn parent_field_is_defined_on_both_ends() {
    let mut index = MemoryIndex::new();
    index.add_file("A.md").add_file("B.md");
    index.add_field("A.md", "Parent", FieldValue::RawText("[[B]]".into()));

    let mut pages = build(&index, Settings::default());
    pages.add_field_links_to_page(&index, "A.md");

    let a = pages.get("A.md").unwrap();
    let b = pages.get("B.md").unwrap();
    assert_eq!(neighbours(a.parents()), vec![("B.md".to_string(), RelationType::Defined)]);
    assert_eq!(neighbours(b.children()), vec![("A.md".to_string(), RelationType::Defined)]);
    assert_eq!(a.relation_to("B.md").unwrap().parent.as_ref().unwrap().definition(), "Parent");
}

#[test]
fn field_materialization_runs_once() {
    let mut index = MemoryIndex::new();
    index.add_file("A.md").add_file("B.md").add_file("C.md");
    index.add_field("A.md", "up", FieldValue::from("[[B]]"));

    let mut pages = build(&index, Settings::default());
    pages.add_field_links_to_page(&index, "A.md");

    // a field added after materialization is not picked up until a rebuild
    index.add_field("A.md", "up", FieldValue::from("[[C]]"));
    pages.add_field_links_to_page(&index, "A.md");
    assert_eq!(pages.get("A.md").unwrap().parent_count(), 1);

    let mut rebuilt = build(&index, Settings::default());
    rebuilt.add_field_links_to_page(&index, "A.md");
    assert_eq!(rebuilt.get("A.md").unwrap().parent_count(), 2);
}

#[test]
fn defined_field_upgrades_an_inferred_link() {
    let mut index = MemoryIndex::new();
    index.add_file("A.md").add_file("B.md");
    index.add_link("A.md", "B");
    index.add_field("A.md", "Children", FieldValue::from(vec!["[[B]]"]));

    let mut pages = build(&index, Settings::default());
    assert_eq!(neighbours(pages.get("A.md").unwrap().children()), vec![("B.md".to_string(), RelationType::Inferred)]);

    pages.add_field_links_to_page(&index, "A.md");
    assert_eq!(neighbours(pages.get("A.md").unwrap().children()), vec![("B.md".to_string(), RelationType::Defined)]);
}

#[test]
fn next_and_previous_are_mirrored_friends() {
    let mut index = MemoryIndex::new();
    index.add_file("Ch1.md").add_file("Ch2.md");
    index.add_field("Ch2.md", "Previous", FieldValue::from("[[Ch1]]"));

    let mut pages = build(&index, Settings::default());
    pages.add_field_links_to_page(&index, "Ch2.md");

    let ch1 = pages.get("Ch1.md").unwrap();
    let ch2 = pages.get("Ch2.md").unwrap();
    assert_eq!(ch2.left_friends()[0].page.path, "Ch1.md");
    assert_eq!(ch1.right_friends()[0].page.path, "Ch2.md");
    assert!(ch1.left_friends().is_empty());
}

// ============================================================================
// 2. Plain links
// ============================================================================

#[test]
fn mutual_plain_links_are_inferred_friends() {
    let mut index = MemoryIndex::new();
    index.add_file("X.md").add_file("Y.md");
    index.add_link("X.md", "Y").add_link("Y.md", "X");

    let pages = build(&index, Settings::default());
    for (from, to) in [("X.md", "Y.md"), ("Y.md", "X.md")] {
        let page = pages.get(from).unwrap();
        let rel = page.relation_to(to).unwrap();
        assert_eq!(rel.is_friend(), Some(RelationType::Inferred), "{from} -> {to}");
        assert_eq!(rel.is_parent(), None);
        assert_eq!(rel.is_child(), None);
        assert_eq!(neighbours(page.friends()), vec![(to.to_string(), RelationType::Inferred)]);
    }
}

#[test]
fn link_inference_modes() {
    let mut index = MemoryIndex::new();
    index.add_file("S.md").add_file("T.md");
    index.add_link("S.md", "T");

    let plain = build(&index, Settings::default());
    assert_eq!(plain.get("S.md").unwrap().children()[0].page.path, "T.md");
    assert_eq!(plain.get("T.md").unwrap().parents()[0].page.path, "S.md");

    let inverse = build(&index, Settings { inverse_infer: true, ..Settings::default() });
    assert_eq!(inverse.get("S.md").unwrap().parents()[0].page.path, "T.md");
    assert_eq!(inverse.get("T.md").unwrap().children()[0].page.path, "S.md");

    let friends = build(&index, Settings { infer_all_links_as_friends: true, ..Settings::default() });
    assert_eq!(friends.get("S.md").unwrap().friend_count(), 1);
    assert_eq!(friends.get("T.md").unwrap().friend_count(), 1);
    assert!(!friends.get("S.md").unwrap().has_children());
}

#[test]
fn unresolved_links_point_at_virtual_pages() {
    let mut index = MemoryIndex::new();
    index.add_file("A.md");
    index.add_link("A.md", "Someday");

    let pages = build(&index, Settings::default());
    let ghost = pages.page("Someday").unwrap();
    assert!(ghost.is_virtual);
    assert_eq!(pages.get("A.md").unwrap().children()[0].page.path, "Someday");

    let hidden = build(&index, Settings { show_virtual_nodes: false, ..Settings::default() });
    assert!(hidden.get("A.md").unwrap().children().is_empty());
}

// ============================================================================
// 3. Tags and folders
// ============================================================================

#[test]
fn tags_and_folders_are_defined_parents_when_shown() {
    let mut index = MemoryIndex::new();
    index.add_file("notes/A.md");
    index.add_tag("notes/A.md", "lang/rust");

    let settings = Settings {
        show_folder_nodes: true,
        show_tag_nodes: true,
        ..Settings::default()
    };
    let pages = build(&index, settings);
    let a = pages.get("notes/A.md").unwrap();
    assert_eq!(
        neighbours(a.parents()),
        vec![
            ("tag:#lang/rust".to_string(), RelationType::Defined),
            ("folder:notes".to_string(), RelationType::Defined),
        ]
    );
    let rust = pages.get("tag:#lang/rust").unwrap();
    assert_eq!(rust.parents()[0].page.path, "tag:#lang");

    let default = build(&index, Settings::default());
    assert!(default.get("notes/A.md").unwrap().parents().is_empty());
}

// ============================================================================
// 4. Rejected writes
// ============================================================================

#[test]
fn self_links_and_the_output_drawing_never_become_relations() {
    let mut index = MemoryIndex::new();
    index.add_file("A.md").add_file("pagegraph.md");
    index.add_link("A.md", "A").add_link("pagegraph.md", "A").add_link("A.md", "pagegraph");
    index.add_field("A.md", "Parent", FieldValue::from("[[A]]"));

    let mut pages = build(&index, Settings::default());
    pages.add_field_links_to_page(&index, "A.md");
    assert!(pages.page("A.md").unwrap().neighbours.is_empty());
    assert!(pages.page("pagegraph.md").unwrap().neighbours.is_empty());
}
