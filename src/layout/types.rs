//! Data structures for layout computation.

use serde::Serialize;
use std::collections::HashMap;

/// A positioned table rectangle. `x`/`y` is the top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutNode {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// The settled layout, one node per table in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Layout {
    pub nodes: Vec<LayoutNode>,
}

/// A simulated body. Position and velocity refer to the rectangle center.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub width: f64,
    pub height: f64,
}

/// A spring between two bodies, by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    pub source: usize,
    pub target: usize,
}

impl LayoutNode {
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn overlaps(&self, other: &LayoutNode) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

impl Layout {
    pub fn node(&self, id: &str) -> Option<&LayoutNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn positions(&self) -> HashMap<&str, &LayoutNode> {
        self.nodes.iter().map(|n| (n.id.as_str(), n)).collect()
    }
}

impl Body {
    pub fn new(id: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            x: 0.0,
            y: 0.0,
            vx: 0.0,
            vy: 0.0,
            width,
            height,
        }
    }

    pub fn to_layout_node(&self) -> LayoutNode {
        LayoutNode {
            id: self.id.clone(),
            x: self.x - self.width / 2.0,
            y: self.y - self.height / 2.0,
            width: self.width,
            height: self.height,
        }
    }
}
