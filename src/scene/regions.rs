//! Region geometry around the central node.
//!
//! Everything is expressed in node widths and node heights, measured once
//! per render from the base style.

use crate::layout::{LayoutSpecification, Region};
use crate::render::{CanvasRenderer, NodeStyle};
use super::Neighbourhood;

/// Regions switch to wider grids past this many nodes.
pub const WIDE_REGION_THRESHOLD: usize = 10;

/// Parents and children sit this many node heights from the centre.
const HIERARCHY_OFFSET: f64 = 2.5;
/// Row pitch in node heights.
const ROW_SPACING: f64 = 1.5;

/// Nominal node box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    pub node_width: f64,
    pub node_height: f64,
}

impl Metrics {
    /// A full-length label of `m`s in the base style, plus padding.
    pub fn measure<R>(renderer: &mut R, base: &NodeStyle) -> Self
    where
        R: CanvasRenderer + ?Sized,
    {
        renderer.set_style(&base.text_context());
        let text = renderer.measure_text(&"m".repeat(base.max_label_length));
        Self {
            node_width: text.width + 2.0 * base.padding,
            node_height: text.height + 2.0 * base.padding,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionSpecs {
    pub center: LayoutSpecification,
    pub parents: LayoutSpecification,
    pub children: LayoutSpecification,
    pub left_friends: LayoutSpecification,
    pub right_friends: LayoutSpecification,
    pub siblings: LayoutSpecification,
}

pub fn region_specs(scene: &Neighbourhood, metrics: Metrics) -> RegionSpecs {
    let Metrics { node_width: nw, node_height: nh } = metrics;
    let base = LayoutSpecification {
        region: Region::Center,
        columns: 1,
        origo_x: 0.0,
        origo_y: 0.0,
        top: None,
        bottom: None,
        column_width: nw,
        row_height: nh * ROW_SPACING,
    };

    let children_cols = if scene.children.len() > WIDE_REGION_THRESHOLD { 5 } else { 3 };
    let siblings_cols = if scene.siblings.len() > WIDE_REGION_THRESHOLD { 3 } else { 1 };
    // one parent is drawn in a single column, so siblings can move closer
    let sibling_base = if scene.parents.len() == 1 { 1 } else { 3 };
    let friends_x = ((children_cols + 1) / 2) as f64 * nw + 0.5 * nw;

    RegionSpecs {
        center: base,
        parents: LayoutSpecification {
            region: Region::Parents,
            columns: 3,
            origo_y: -HIERARCHY_OFFSET * nh,
            bottom: Some(-2.0 * nh),
            ..base
        },
        children: LayoutSpecification {
            region: Region::Children,
            columns: children_cols,
            origo_y: HIERARCHY_OFFSET * nh,
            top: Some(2.0 * nh),
            ..base
        },
        left_friends: LayoutSpecification {
            region: Region::LeftFriends,
            origo_x: -friends_x,
            ..base
        },
        right_friends: LayoutSpecification {
            region: Region::RightFriends,
            origo_x: friends_x,
            ..base
        },
        siblings: LayoutSpecification {
            region: Region::Siblings,
            columns: siblings_cols,
            origo_x: ((sibling_base + siblings_cols) as f64 / 2.0 + 0.5) * nw,
            origo_y: -HIERARCHY_OFFSET * nh,
            bottom: Some(-nh),
            ..base
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Node, Page};

    const METRICS: Metrics = Metrics { node_width: 100.0, node_height: 40.0 };

    fn nodes(prefix: &str, n: usize) -> Vec<Node> {
        (0..n)
            .map(|i| Node::new(&Page::file(format!("{prefix}{i}.md")), NodeStyle::default()))
            .collect()
    }

    fn scene(parents: usize, children: usize, siblings: usize) -> Neighbourhood {
        Neighbourhood {
            central: Node::new(&Page::file("C.md"), NodeStyle::default()),
            parents: nodes("p", parents),
            children: nodes("c", children),
            left_friends: Vec::new(),
            right_friends: Vec::new(),
            siblings: nodes("s", siblings),
            links: Vec::new(),
        }
    }

    #[test]
    fn children_widen_past_ten() {
        assert_eq!(region_specs(&scene(1, 10, 0), METRICS).children.columns, 3);
        let wide = region_specs(&scene(1, 11, 0), METRICS);
        assert_eq!(wide.children.columns, 5);
        assert_eq!(wide.left_friends.origo_x, -350.0);
        assert_eq!(wide.right_friends.origo_x, 350.0);
    }

    #[test]
    fn siblings_move_closer_with_one_parent() {
        assert_eq!(region_specs(&scene(1, 0, 2), METRICS).siblings.origo_x, 150.0);
        assert_eq!(region_specs(&scene(2, 0, 2), METRICS).siblings.origo_x, 250.0);
        let many = region_specs(&scene(2, 0, 11), METRICS).siblings;
        assert_eq!(many.columns, 3);
        assert_eq!(many.origo_x, 350.0);
    }

    #[test]
    fn hierarchy_regions_are_clamped_clear_of_the_centre() {
        let specs = region_specs(&scene(3, 3, 0), METRICS);
        assert_eq!(specs.parents.bottom, Some(-80.0));
        assert_eq!(specs.children.top, Some(80.0));
        assert_eq!(specs.center.origo_x, 0.0);
        assert_eq!(specs.left_friends.origo_x, -250.0);
    }
}
