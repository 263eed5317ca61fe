//! Node: the render-time wrapper around a page.

use serde::{Deserialize, Serialize};

use crate::render::NodeStyle;
use super::{Page, Point};

/// Which gates of a node have something behind them. A gate is filled when
/// the page has at least one visible neighbour of that kind, shown or not.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gates {
    pub parents: bool,
    pub children: bool,
    pub friends: bool,
}

/// A page as drawn in one render pass. Created fresh per render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub path: String,
    pub title: String,
    /// `title` truncated to the style's `max_label_length`.
    pub label: String,
    pub is_inferred: bool,
    pub is_central: bool,
    pub is_sibling: bool,
    /// Draw the friend gate on the left edge (nodes right of the centre).
    pub friend_gate_on_left: bool,
    pub gates: Gates,
    pub style: NodeStyle,
    /// Measured label width, used by compact layouts.
    pub label_width: f64,
    pub center: Point,
}

impl Node {
    pub fn new(page: &Page, style: NodeStyle) -> Self {
        let title = page.name.clone();
        let label = style.label_for(&title);
        Self {
            path: page.path.clone(),
            title,
            label,
            is_inferred: false,
            is_central: false,
            is_sibling: false,
            friend_gate_on_left: false,
            gates: Gates::default(),
            style,
            label_width: 0.0,
            center: Point::ORIGIN,
        }
    }

    pub fn set_center(&mut self, center: Point) {
        self.center = center;
    }

    /// Drawn width: label plus padding on both sides.
    pub fn width(&self) -> f64 {
        self.label_width + 2.0 * self.style.padding
    }

    /// Lowercased title, the layout sort key.
    pub fn sort_key(&self) -> String {
        self.title.to_lowercase()
    }
}
