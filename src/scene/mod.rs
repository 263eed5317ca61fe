//! # Neighbourhood Assembler
//!
//! Picks the bounded neighbourhood of one focal page and hands it to the
//! layout engine and the canvas.
//!
//! ## Pipeline
//!
//! | Step | What |
//! |------|------|
//! | materialize | field links of the focal page, its backlinks and neighbours |
//! | select | parents, children, friends; filtered, de-duplicated, capped |
//! | siblings | children of parents minus everything already shown |
//! | links | relations among visible nodes only, one per unordered pair |
//! | draw | layout per region, nodes, arrows, z-order with arrows first |
//!
//! An unknown focal page aborts the render and leaves the canvas alone.

pub mod regions;
pub mod draw;

use hashbrown::HashSet;
use tracing::{debug, info};

use crate::index::MetadataIndex;
use crate::model::{is_child, is_friend, is_parent, link_key, Gates, Link, Node, Page, RelationType, Role};
use crate::registry::{Neighbour, PageRef, Pages};
use crate::render::CanvasRenderer;
use crate::settings::Settings;
use crate::Result;

pub use draw::{draw, DrawnScene};
pub use regions::{region_specs, Metrics, RegionSpecs};

/// The visible neighbourhood of one page, before layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbourhood {
    pub central: Node,
    pub parents: Vec<Node>,
    pub children: Vec<Node>,
    pub left_friends: Vec<Node>,
    pub right_friends: Vec<Node>,
    pub siblings: Vec<Node>,
    pub links: Vec<Link>,
}

impl Neighbourhood {
    /// All nodes in layout order: centre, children, friends, parents, siblings.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        std::iter::once(&self.central)
            .chain(&self.children)
            .chain(&self.left_friends)
            .chain(&self.right_friends)
            .chain(&self.parents)
            .chain(&self.siblings)
    }

    pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        std::iter::once(&mut self.central)
            .chain(&mut self.children)
            .chain(&mut self.left_friends)
            .chain(&mut self.right_friends)
            .chain(&mut self.parents)
            .chain(&mut self.siblings)
    }

    pub fn node(&self, path: &str) -> Option<&Node> {
        self.nodes().find(|n| n.path == path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.node(path).is_some()
    }

    /// Central node included.
    pub fn node_count(&self) -> usize {
        self.nodes().count()
    }
}

/// Assemble the neighbourhood of `focal`. `None` when the page is not in the
/// registry.
pub fn assemble<I>(pages: &mut Pages, index: &I, focal: &str) -> Option<Neighbourhood>
where
    I: MetadataIndex + ?Sized,
{
    if !pages.contains(focal) {
        info!(path = focal, "focal page is not indexed, render aborted");
        return None;
    }
    materialize(pages, index, focal);
    let pages: &Pages = pages;

    let settings = pages.context().snapshot();
    let page = pages.get(focal)?;
    let mut selector = Selector::new(&settings, focal);

    let parents = selector.take(page.parents());
    let children = selector.take(page.children());
    let left_friends = selector.take(page.left_friends());
    let right_friends = selector.take(page.right_friends());
    let siblings = selector.take(page.siblings());

    let build = |list: &[Neighbour<'_>], sibling: bool, gate_on_left: bool| -> Vec<Node> {
        list.iter()
            .map(|n| {
                let mut node = make_node(pages, n.page, n.is_inferred(), sibling, false, &settings);
                node.friend_gate_on_left = gate_on_left;
                node
            })
            .collect()
    };

    let mut scene = Neighbourhood {
        central: make_node(pages, page.page(), false, false, true, &settings),
        parents: build(&parents, false, false),
        children: build(&children, false, false),
        left_friends: build(&left_friends, false, false),
        right_friends: build(&right_friends, false, true),
        siblings: build(&siblings, true, false),
        links: Vec::new(),
    };
    scene.links = collect_links(pages, &scene, &settings);

    debug!(
        path = focal,
        parents = scene.parents.len(),
        children = scene.children.len(),
        friends = scene.left_friends.len() + scene.right_friends.len(),
        siblings = scene.siblings.len(),
        links = scene.links.len(),
        "assembled neighbourhood"
    );
    Some(scene)
}

/// Assemble and draw `focal`. Returns `false` when the page is unknown; the
/// canvas is not touched in that case.
pub fn render_page<I, R>(pages: &mut Pages, index: &I, renderer: &mut R, focal: &str) -> Result<bool>
where
    I: MetadataIndex + ?Sized,
    R: CanvasRenderer + ?Sized,
{
    let Some(mut scene) = assemble(pages, index, focal) else {
        return Ok(false);
    };
    let settings = pages.context().snapshot();
    draw(renderer, &mut scene, &settings)?;
    Ok(true)
}

/// Field links are resolved lazily; the ones that can touch the focal page
/// must be in place before querying. Siblings and gates read the
/// neighbours' own relations, so the pass reaches two hops out.
fn materialize<I>(pages: &mut Pages, index: &I, focal: &str)
where
    I: MetadataIndex + ?Sized,
{
    pages.add_field_links_to_page(index, focal);
    for source in index.backlinks(focal) {
        pages.add_field_links_to_page(index, &source);
    }
    let first_hop = neighbour_paths(pages, focal);
    for path in &first_hop {
        pages.add_field_links_to_page(index, path);
    }
    for path in &first_hop {
        for second in neighbour_paths(pages, path) {
            pages.add_field_links_to_page(index, &second);
        }
    }
}

fn neighbour_paths(pages: &Pages, path: &str) -> Vec<String> {
    let mut paths: Vec<String> = pages
        .page(path)
        .map(|p| p.neighbours.keys().cloned().collect())
        .unwrap_or_default();
    paths.sort();
    paths
}

// ============================================================================
// Selection
// ============================================================================

/// Region-by-region filter. A page lands in the first region that claims it.
struct Selector<'s> {
    settings: &'s Settings,
    shown: HashSet<String>,
}

impl<'s> Selector<'s> {
    fn new(settings: &'s Settings, focal: &str) -> Self {
        let mut shown = HashSet::new();
        shown.insert(focal.to_string());
        Self { settings, shown }
    }

    /// Drop the focal page, excluded paths and pages already claimed, then
    /// cap. Input order is the registry's stable name order.
    fn take<'a>(&mut self, candidates: Vec<Neighbour<'a>>) -> Vec<Neighbour<'a>> {
        let mut kept: Vec<Neighbour<'a>> = candidates
            .into_iter()
            .filter(|n| !self.settings.is_excluded(&n.page.path))
            .filter(|n| !self.shown.contains(&n.page.path))
            .collect();
        kept.truncate(self.settings.max_item_count);
        for n in &kept {
            self.shown.insert(n.page.path.clone());
        }
        kept
    }
}

fn make_node(
    pages: &Pages,
    page: &Page,
    is_inferred: bool,
    is_sibling: bool,
    is_central: bool,
    settings: &Settings,
) -> Node {
    let style = settings.styles.node_style(page, is_inferred, is_sibling, is_central);
    let mut node = Node::new(page, style);
    node.is_inferred = is_inferred;
    node.is_sibling = is_sibling;
    node.is_central = is_central;
    node.gates = pages.get(&page.path).map(gates_of).unwrap_or_default();
    node
}

fn gates_of(page: PageRef<'_>) -> Gates {
    Gates {
        parents: page.has_parents(),
        children: page.has_children(),
        friends: page.has_friends(),
    }
}

// ============================================================================
// Links
// ============================================================================

/// One link per unordered pair of visible nodes that share a relation.
fn collect_links(pages: &Pages, scene: &Neighbourhood, settings: &Settings) -> Vec<Link> {
    let visible: HashSet<&str> = scene.nodes().map(|n| n.path.as_str()).collect();
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut links = Vec::new();

    for node in scene.nodes() {
        let Some(page) = pages.page(&node.path) else { continue };
        let mut targets: Vec<&str> = page
            .neighbours
            .keys()
            .map(String::as_str)
            .filter(|t| visible.contains(t))
            .collect();
        targets.sort_unstable();

        for target in targets {
            let Some(rel) = page.relation(target) else { continue };
            let classified = is_parent(rel)
                .map(|t| (Role::Parent, t))
                .or_else(|| is_child(rel).map(|t| (Role::Child, t)))
                .or_else(|| is_friend(rel).map(|t| (Role::Friend, t)));
            let Some((role, relation_type)) = classified else { continue };
            let is_inferred = relation_type == RelationType::Inferred;
            if is_inferred && !settings.show_inferred_nodes {
                continue;
            }
            if !seen.insert(link_key(&node.path, target)) {
                continue;
            }
            links.push(Link {
                source: node.path.clone(),
                target: target.to_string(),
                role,
                is_inferred,
                style: settings.styles.link_style(is_inferred),
            });
        }
    }
    links
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::IndexContext;
    use crate::index::{build_pages, MemoryIndex};
    use crate::ontology::FieldValue;

    fn registry(index: &MemoryIndex, settings: Settings) -> Pages {
        build_pages(index, IndexContext::new(settings)).0
    }

    fn paths(nodes: &[Node]) -> Vec<&str> {
        nodes.iter().map(|n| n.path.as_str()).collect()
    }

    #[test]
    fn unknown_focal_page_aborts() {
        let index = MemoryIndex::new();
        let mut pages = registry(&index, Settings::default());
        assert!(assemble(&mut pages, &index, "Gone.md").is_none());
    }

    #[test]
    fn field_links_from_backlinks_are_materialized() {
        let mut index = MemoryIndex::new();
        index.add_file("Hub.md").add_file("Spoke.md");
        index.add_field("Spoke.md", "Parent", FieldValue::from("[[Hub]]"));
        let mut pages = registry(&index, Settings::default());

        let scene = assemble(&mut pages, &index, "Hub.md").unwrap();
        assert_eq!(paths(&scene.children), vec!["Spoke.md"]);
        assert!(!scene.children[0].is_inferred);
        assert!(scene.central.is_central);
        assert!(scene.central.gates.children);
        assert!(!scene.central.gates.parents);
    }

    #[test]
    fn a_page_is_claimed_by_the_first_region() {
        let mut index = MemoryIndex::new();
        index.add_file("A.md").add_file("B.md").add_file("C.md");
        index.add_field("A.md", "Parent", FieldValue::from("[[B]]"));
        index.add_field("A.md", "Child", FieldValue::from("[[C]]"));
        index.add_field("C.md", "Parent", FieldValue::from("[[B]]"));
        let mut pages = registry(&index, Settings::default());

        let scene = assemble(&mut pages, &index, "A.md").unwrap();
        assert_eq!(paths(&scene.parents), vec!["B.md"]);
        assert_eq!(paths(&scene.children), vec!["C.md"]);
        assert!(scene.siblings.is_empty());
        assert_eq!(scene.node_count(), 3);
        assert_eq!(scene.links.len(), 3);
    }

    #[test]
    fn exclusions_apply_to_every_region() {
        let mut index = MemoryIndex::new();
        index.add_file("A.md").add_file("P.md").add_file("archive/S.md");
        index.add_field("A.md", "Parent", FieldValue::from("[[P]]"));
        index.add_field("archive/S.md", "Parent", FieldValue::from("[[P]]"));
        let settings = Settings { exclusions: vec!["archive/".into()], ..Settings::default() };
        let mut pages = registry(&index, settings);

        let scene = assemble(&mut pages, &index, "A.md").unwrap();
        assert!(scene.siblings.is_empty());
        assert!(!scene.contains("archive/S.md"));
    }

    #[test]
    fn sibling_fields_are_materialized_two_hops_out() {
        let mut index = MemoryIndex::new();
        index.add_file("A.md").add_file("P.md").add_file("S.md");
        index.add_field("A.md", "Parent", FieldValue::from("[[P]]"));
        index.add_field("S.md", "Parent", FieldValue::from("[[P]]"));

        let mut fresh = registry(&index, Settings::default());
        let first = assemble(&mut fresh, &index, "A.md").unwrap();
        assert_eq!(paths(&first.parents), vec!["P.md"]);
        assert_eq!(paths(&first.siblings), vec!["S.md"]);
        assert!(first.node("P.md").unwrap().gates.children);

        // visiting S first must not change what A shows
        let mut visited = registry(&index, Settings::default());
        assemble(&mut visited, &index, "S.md").unwrap();
        let again = assemble(&mut visited, &index, "A.md").unwrap();
        assert_eq!(paths(&again.siblings), paths(&first.siblings));
    }

    #[test]
    fn links_are_deduplicated_and_local() {
        let mut index = MemoryIndex::new();
        index.add_file("X.md").add_file("Y.md").add_file("Far.md");
        index.add_link("X.md", "Y").add_link("Y.md", "X").add_link("Y.md", "Far");
        let mut pages = registry(&index, Settings::default());

        let scene = assemble(&mut pages, &index, "X.md").unwrap();
        assert_eq!(paths(&scene.left_friends), vec!["Y.md"]);
        assert_eq!(scene.links.len(), 1);
        assert_eq!(scene.links[0].role, Role::Friend);
        assert!(scene.links[0].is_inferred);
        assert!(!scene.contains("Far.md"));
    }
}
