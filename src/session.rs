//! A live diagram: one schema generation plus the positions and hover state
//! the user manipulates on top of it.

use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::ast::Schema;
use crate::config::DiagramConfig;
use crate::graph::AdjacencyIndex;
use crate::interaction::{Edge, HighlightState, HoverState, build_edges, highlight};
use crate::layout::{LayoutEngine, LayoutNode};
use crate::parser::{Diagnostic, parse_with_diagnostics};
use crate::placement::snap_to_grid_with;
use crate::scene::{Scene, SceneInput};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("Unknown table: {0}")]
    UnknownTable(String),
}

/// Owner of all mutable diagram state.
#[derive(Debug, Clone)]
pub struct Diagram {
    config: DiagramConfig,
    schema: Schema,
    diagnostics: Vec<Diagnostic>,
    adjacency: AdjacencyIndex,
    positions: Vec<LayoutNode>,
    edges: Vec<Edge>,
    hover: HoverState,
    highlight: HighlightState,
}

impl Default for Diagram {
    fn default() -> Self {
        Self::new(DiagramConfig::default())
    }
}

impl Diagram {
    /// An empty diagram; call [`Diagram::set_text`] to load a schema.
    pub fn new(config: DiagramConfig) -> Self {
        Self {
            config,
            schema: Schema::default(),
            diagnostics: Vec::new(),
            adjacency: AdjacencyIndex::default(),
            positions: Vec::new(),
            edges: Vec::new(),
            hover: HoverState::default(),
            highlight: HighlightState::default(),
        }
    }

    pub fn from_text(text: &str, config: DiagramConfig) -> Self {
        let mut diagram = Self::new(config);
        diagram.set_text(text);
        diagram
    }

    /// Replace the schema text. Runs the whole pipeline again and discards
    /// manual placements and hover.
    pub fn set_text(&mut self, text: &str) {
        let (schema, diagnostics) = parse_with_diagnostics(text);
        for d in &diagnostics {
            debug!(line = d.line, error = %d.error, "skipped statement");
        }
        for end in schema.dangling_references() {
            warn!(endpoint = %end, "relationship endpoint names an unknown table or column");
        }

        let engine = LayoutEngine::new(self.config.layout.clone(), self.config.metrics);
        self.positions = engine.layout(&schema).nodes;
        self.adjacency = AdjacencyIndex::build(&schema);
        self.schema = schema;
        self.diagnostics = diagnostics;
        self.hover.leave();
        self.highlight = HighlightState::default();
        self.rebuild_edges();

        info!(
            tables = self.schema.tables.len(),
            relationships = self.schema.relationships.len(),
            diagnostics = self.diagnostics.len(),
            "diagram loaded"
        );
    }

    /// Enter hover on a table, or leave hover with `None`.
    pub fn hover(&mut self, table: Option<&str>) -> &HighlightState {
        match table {
            Some(table) => self.hover.enter(table),
            None => self.hover.leave(),
        }
        self.highlight = highlight(self.hover.hovered(), &self.edges);
        &self.highlight
    }

    /// Move a table while it is being dragged. Coordinates are kept as given.
    pub fn drag(&mut self, id: &str, x: f64, y: f64) -> Result<(), SessionError> {
        self.move_node(id, x, y)
    }

    /// Finish a drag: snap the drop point to the grid and keep it.
    pub fn drop_node(&mut self, id: &str, x: f64, y: f64) -> Result<(f64, f64), SessionError> {
        let (sx, sy) = snap_to_grid_with(self.config.grid_size, x, y);
        self.move_node(id, sx, sy)?;
        debug!(%id, x = sx, y = sy, "table dropped");
        Ok((sx, sy))
    }

    pub fn scene(&self) -> Scene {
        Scene::build(&SceneInput {
            schema: &self.schema,
            adjacency: &self.adjacency,
            positions: &self.positions,
            edges: &self.edges,
            highlight: &self.highlight,
            style: &self.config.style,
        })
    }

    pub fn position(&self, id: &str) -> Option<&LayoutNode> {
        self.positions.iter().find(|n| n.id == id)
    }

    pub fn positions(&self) -> &[LayoutNode] {
        &self.positions
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn adjacency(&self) -> &AdjacencyIndex {
        &self.adjacency
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn hover_state(&self) -> &HoverState {
        &self.hover
    }

    pub fn highlight_state(&self) -> &HighlightState {
        &self.highlight
    }

    pub fn config(&self) -> &DiagramConfig {
        &self.config
    }

    fn move_node(&mut self, id: &str, x: f64, y: f64) -> Result<(), SessionError> {
        let node = self
            .positions
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or_else(|| SessionError::UnknownTable(id.to_string()))?;
        node.x = x;
        node.y = y;
        // Anchor sides follow positions; edge ids and highlight do not.
        self.rebuild_edges();
        Ok(())
    }

    fn rebuild_edges(&mut self) {
        let positions: HashMap<&str, &LayoutNode> =
            self.positions.iter().map(|n| (n.id.as_str(), n)).collect();
        self.edges = build_edges(&self.schema, &positions);
    }
}
