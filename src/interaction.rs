//! Hover and anchor state derived from the model and live positions.
//!
//! Nothing here is patched incrementally: edges are rebuilt from positions
//! whenever a table moves, and the highlight state is rebuilt from scratch
//! on every hover transition.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use crate::ast::{Cardinality, Schema};
use crate::layout::LayoutNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandleRole {
    Source,
    Target,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorSides {
    pub source: Side,
    pub target: Side,
}

/// Connection point of an edge on a table: `<column>[-<side>]-<role>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Handle {
    pub column: String,
    pub side: Option<Side>,
    pub role: HandleRole,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HandleError {
    #[error("handle id {0:?} does not end in -source or -target")]
    MissingRole(String),
    #[error("handle id {0:?} has no column name")]
    EmptyColumn(String),
}

/// A relationship as drawn: endpoint tables plus the handles it attaches to.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub source_handle: Handle,
    pub target_handle: Handle,
    pub cardinality: Cardinality,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum HoverState {
    #[default]
    Idle,
    Hovering(String),
}

/// Everything the surface needs to emphasise the hovered table's neighbourhood.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightState {
    pub hovered: Option<String>,
    pub edges: BTreeSet<String>,
    pub columns: BTreeMap<String, BTreeSet<String>>,
    /// Tables sharing an edge with the hovered table, and the hovered table itself.
    pub related: BTreeSet<String>,
}

impl Side {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl HandleRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Target => "target",
        }
    }
}

/// Source anchors on its right edge when it sits left of the target, and
/// on its left edge otherwise.
pub fn anchor_sides(source: &LayoutNode, target: &LayoutNode) -> AnchorSides {
    if source.x < target.x {
        AnchorSides {
            source: Side::Right,
            target: Side::Left,
        }
    } else {
        AnchorSides {
            source: Side::Left,
            target: Side::Right,
        }
    }
}

impl Handle {
    pub fn new(column: impl Into<String>, side: Option<Side>, role: HandleRole) -> Self {
        Self {
            column: column.into(),
            side,
            role,
        }
    }

    /// Recover a handle from any of its id forms: `<column>-source`,
    /// `<column>-target`, `<column>-left-source`, `<column>-right-target`
    /// (and the remaining side/role pairs).
    pub fn parse(id: &str) -> Result<Self, HandleError> {
        let (rest, role) = if let Some(rest) = id.strip_suffix("-source") {
            (rest, HandleRole::Source)
        } else if let Some(rest) = id.strip_suffix("-target") {
            (rest, HandleRole::Target)
        } else {
            return Err(HandleError::MissingRole(id.to_string()));
        };

        let (column, side) = if let Some(column) = rest.strip_suffix("-left") {
            (column, Some(Side::Left))
        } else if let Some(column) = rest.strip_suffix("-right") {
            (column, Some(Side::Right))
        } else {
            (rest, None)
        };

        if column.is_empty() {
            return Err(HandleError::EmptyColumn(id.to_string()));
        }
        Ok(Self::new(column, side, role))
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.side {
            Some(side) => write!(f, "{}-{}-{}", self.column, side.as_str(), self.role.as_str()),
            None => write!(f, "{}-{}", self.column, self.role.as_str()),
        }
    }
}

impl FromStr for Handle {
    type Err = HandleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Handle {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Handle {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let id = String::deserialize(deserializer)?;
        Self::parse(&id).map_err(serde::de::Error::custom)
    }
}

/// Build drawable edges for every relationship, choosing anchor sides from
/// current positions. Edges whose endpoints have no position keep side-less
/// handles; dropping or detaching them is up to the rendering surface.
pub fn build_edges(schema: &Schema, positions: &HashMap<&str, &LayoutNode>) -> Vec<Edge> {
    schema
        .relationships
        .iter()
        .enumerate()
        .map(|(i, rel)| {
            let sides = match (
                positions.get(rel.from.table.as_str()),
                positions.get(rel.to.table.as_str()),
            ) {
                (Some(s), Some(t)) => Some(anchor_sides(s, t)),
                _ => None,
            };

            Edge {
                id: format!("e{i}-{}-{}", rel.from, rel.to),
                source: rel.from.table.clone(),
                target: rel.to.table.clone(),
                source_handle: Handle::new(
                    &rel.from.column,
                    sides.map(|s| s.source),
                    HandleRole::Source,
                ),
                target_handle: Handle::new(
                    &rel.to.column,
                    sides.map(|s| s.target),
                    HandleRole::Target,
                ),
                cardinality: rel.cardinality,
            }
        })
        .collect()
}

/// Compute the full highlight state for a hovered table, or the idle state.
pub fn highlight(hovered: Option<&str>, edges: &[Edge]) -> HighlightState {
    let Some(table) = hovered else {
        return HighlightState::default();
    };

    let mut state = HighlightState {
        hovered: Some(table.to_string()),
        ..Default::default()
    };
    state.related.insert(table.to_string());

    for edge in edges.iter().filter(|e| e.source == table || e.target == table) {
        state.edges.insert(edge.id.clone());
        for (owner, handle) in [
            (&edge.source, &edge.source_handle),
            (&edge.target, &edge.target_handle),
        ] {
            state
                .columns
                .entry(owner.clone())
                .or_default()
                .insert(handle.column.clone());
            state.related.insert(owner.clone());
        }
    }

    state
}

impl HighlightState {
    pub fn is_idle(&self) -> bool {
        self.hovered.is_none()
    }

    /// Whether a table stays at full emphasis. Everything does while idle.
    pub fn is_related(&self, table: &str) -> bool {
        self.is_idle() || self.related.contains(table)
    }

    pub fn is_edge_highlighted(&self, edge_id: &str) -> bool {
        self.edges.contains(edge_id)
    }

    pub fn columns_of(&self, table: &str) -> impl Iterator<Item = &str> {
        self.columns
            .get(table)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }
}

impl HoverState {
    pub fn enter(&mut self, table: impl Into<String>) {
        *self = Self::Hovering(table.into());
    }

    pub fn leave(&mut self) {
        *self = Self::Idle;
    }

    pub fn hovered(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Hovering(table) => Some(table),
        }
    }
}
