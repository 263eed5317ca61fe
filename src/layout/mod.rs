//! # Layout Engine
//!
//! Places the nodes of one region around the region's origin.
//!
//! - **Grid**: fixed-width columns, sorted by title, a partial last row
//!   centred with a parity-aware row vector.
//! - **Compact**: rows packed by measured label width and re-centred, with
//!   a per-region offset correction taken from the widest label.
//!
//! Layout is pure: same nodes and specification, same coordinates.

pub mod vector;
pub mod compact;

use serde::{Deserialize, Serialize};

use crate::model::{Node, Point};

pub use vector::{row_vector, generate_even, generate_odd, RowVector};

/// Named layout area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    Center,
    Parents,
    Children,
    LeftFriends,
    RightFriends,
    Siblings,
}

/// Empirical compact-mode constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompactTuning {
    /// Gap between packed nodes, as a share of the nominal row width.
    pub gap_ratio: f64,
    pub sibling_factor: f64,
    pub friend_factor: f64,
    pub hierarchy_factor: f64,
}

impl Default for CompactTuning {
    fn default() -> Self {
        Self {
            gap_ratio: 0.1,
            sibling_factor: 0.5,
            friend_factor: 0.5,
            hierarchy_factor: 0.2,
        }
    }
}

impl CompactTuning {
    /// Horizontal shift of a region, keeping its widest label clear of the
    /// central column.
    pub fn correction(&self, region: Region, max_node_width: f64) -> f64 {
        match region {
            Region::Center => 0.0,
            Region::Siblings => self.sibling_factor * max_node_width,
            Region::LeftFriends => -self.friend_factor * max_node_width,
            Region::RightFriends => self.friend_factor * max_node_width,
            Region::Parents | Region::Children => -self.hierarchy_factor * max_node_width,
        }
    }
}

/// Geometry of one region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutSpecification {
    pub region: Region,
    pub columns: usize,
    pub origo_x: f64,
    pub origo_y: f64,
    /// The block never starts above this line.
    pub top: Option<f64>,
    /// The block never ends below this line.
    pub bottom: Option<f64>,
    pub column_width: f64,
    pub row_height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LayoutMode {
    Grid,
    Compact(CompactTuning),
}

/// Lays out one region.
#[derive(Debug, Clone)]
pub struct Layout {
    spec: LayoutSpecification,
}

impl Layout {
    pub fn new(spec: LayoutSpecification) -> Self {
        Self { spec }
    }

    pub fn spec(&self) -> &LayoutSpecification {
        &self.spec
    }

    /// Sort `nodes` by title and assign their centres. Returns the number of
    /// rows; an empty region is left untouched.
    pub fn render(&self, nodes: &mut [Node], mode: LayoutMode) -> usize {
        if nodes.is_empty() {
            return 0;
        }
        nodes.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()).then_with(|| a.path.cmp(&b.path)));
        match mode {
            LayoutMode::Grid => self.grid(nodes),
            LayoutMode::Compact(tuning) => self.compact(nodes, &tuning),
        }
    }

    /// Rows of item indexes with explicit gaps.
    pub fn grid_rows(&self, item_count: usize) -> Vec<RowVector> {
        let columns = self.columns();
        let row_count = item_count.div_ceil(columns);
        (0..row_count)
            .map(|row| {
                let first = row * columns;
                let in_row = (item_count - first).min(columns);
                row_vector(in_row, columns)
                    .into_iter()
                    .map(|slot| slot.map(|idx| first + idx))
                    .collect()
            })
            .collect()
    }

    fn grid(&self, nodes: &mut [Node]) -> usize {
        let rows = self.grid_rows(nodes.len());
        let top = self.block_top(rows.len());
        for (row, slots) in rows.iter().enumerate() {
            let y = top + (row as f64 + 0.5) * self.spec.row_height;
            for (slot, idx) in slots.iter().enumerate() {
                let Some(idx) = idx else { continue };
                let x = if self.columns() == 1 {
                    self.spec.origo_x
                } else {
                    let mid = (slots.len() as f64 - 1.0) / 2.0;
                    self.spec.origo_x + (slot as f64 - mid) * self.spec.column_width
                };
                nodes[*idx].set_center(Point::new(x, y));
            }
        }
        rows.len()
    }

    fn compact(&self, nodes: &mut [Node], tuning: &CompactTuning) -> usize {
        let widths: Vec<f64> = nodes.iter().map(Node::width).collect();
        let max_width = widths.iter().cloned().fold(0.0, f64::max);
        let origo_x = self.spec.origo_x + tuning.correction(self.spec.region, max_width);

        let rows = if self.columns() == 1 {
            (0..nodes.len()).map(|i| vec![i]).collect()
        } else {
            let nominal = self.columns() as f64 * self.spec.column_width;
            compact::pack_rows(&widths, nominal, tuning.gap_ratio * nominal)
        };
        let gap = tuning.gap_ratio * self.columns() as f64 * self.spec.column_width;

        let top = self.block_top(rows.len());
        for (row, members) in rows.iter().enumerate() {
            let y = top + (row as f64 + 0.5) * self.spec.row_height;
            let row_widths: Vec<f64> = members.iter().map(|&i| widths[i]).collect();
            let offsets = compact::center_row(&row_widths, gap);
            for (&idx, dx) in members.iter().zip(offsets) {
                nodes[idx].set_center(Point::new(origo_x + dx, y));
            }
        }
        rows.len()
    }

    /// Top edge of a block of `rows`, centred on `origo_y` unless a clamp
    /// would be crossed.
    fn block_top(&self, rows: usize) -> f64 {
        let height = rows as f64 * self.spec.row_height;
        let mut top = self.spec.origo_y - height / 2.0;
        if let Some(limit) = self.spec.top {
            if top < limit {
                top = limit;
            }
        }
        if let Some(limit) = self.spec.bottom {
            if top + height > limit {
                top = limit - height;
            }
        }
        top
    }

    fn columns(&self) -> usize {
        self.spec.columns.max(1)
    }
}
