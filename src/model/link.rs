//! Link: a drawn edge between two nodes.

use serde::{Deserialize, Serialize};

use crate::render::LinkStyle;

/// Visual role of a link, seen from `source`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// `target` is a parent of `source`.
    Parent,
    /// `target` is a child of `source`.
    Child,
    Friend,
}

/// Ordered pair of node paths plus role and style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub source: String,
    pub target: String,
    pub role: Role,
    pub is_inferred: bool,
    pub style: LinkStyle,
}

impl Link {
    /// Unordered pair key: `A→B` and `B→A` collapse to one link.
    pub fn key(&self) -> (String, String) {
        link_key(&self.source, &self.target)
    }
}

pub fn link_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_unordered() {
        assert_eq!(link_key("a", "b"), link_key("b", "a"));
        assert_ne!(link_key("a", "b"), link_key("a", "c"));
    }
}
