//! Renderable nodes and edges handed to the drawing surface.

use serde::Serialize;
use std::collections::HashMap;

use crate::ast::{Column, Schema};
use crate::config::StyleConfig;
use crate::graph::AdjacencyIndex;
use crate::interaction::{Edge, Handle, HighlightState};
use crate::layout::LayoutNode;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Scene {
    pub nodes: Vec<RenderNode>,
    pub edges: Vec<RenderEdge>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderNode {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub columns: Vec<Column>,
    pub header_color: String,
    pub highlighted_columns: Vec<String>,
    /// Columns that get connection handles.
    pub columns_with_relations: Vec<String>,
    pub opacity: f64,
    pub grayscale: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderEdge {
    pub id: String,
    pub source_table_id: String,
    pub target_table_id: String,
    pub source_anchor: Handle,
    pub target_anchor: Handle,
    pub label: &'static str,
    pub stroke_width: f64,
    pub color: String,
    pub opacity: f64,
    pub animated: bool,
}

/// Inputs for one scene build. All of them are owned elsewhere.
pub struct SceneInput<'a> {
    pub schema: &'a Schema,
    pub adjacency: &'a AdjacencyIndex,
    pub positions: &'a [LayoutNode],
    pub edges: &'a [Edge],
    pub highlight: &'a HighlightState,
    pub style: &'a StyleConfig,
}

impl Scene {
    pub fn build(input: &SceneInput<'_>) -> Self {
        let positions: HashMap<&str, &LayoutNode> = input
            .positions
            .iter()
            .map(|n| (n.id.as_str(), n))
            .collect();
        let highlight = input.highlight;

        let nodes = input
            .schema
            .tables
            .iter()
            .filter_map(|table| {
                let pos = positions.get(table.name.as_str())?;
                let related = highlight.is_related(&table.name);
                Some(RenderNode {
                    id: table.name.clone(),
                    x: pos.x,
                    y: pos.y,
                    width: pos.width,
                    height: pos.height,
                    columns: table.columns.clone(),
                    header_color: table.header_color.clone(),
                    highlighted_columns: highlight
                        .columns_of(&table.name)
                        .map(str::to_string)
                        .collect(),
                    columns_with_relations: input
                        .adjacency
                        .columns(&table.name)
                        .map(str::to_string)
                        .collect(),
                    opacity: if related { 1.0 } else { input.style.dimmed_opacity },
                    grayscale: !related,
                })
            })
            .collect();

        let edges = input
            .edges
            .iter()
            .map(|edge| render_edge(edge, highlight, input.style))
            .collect();

        Scene { nodes, edges }
    }

    pub fn node(&self, id: &str) -> Option<&RenderNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

fn render_edge(edge: &Edge, highlight: &HighlightState, style: &StyleConfig) -> RenderEdge {
    let active = highlight.is_edge_highlighted(&edge.id);
    let (stroke_width, color, opacity) = if active {
        (style.highlight_stroke_width, &style.highlight_color, 1.0)
    } else if highlight.is_idle() {
        (style.edge_stroke_width, &style.edge_color, 1.0)
    } else {
        (
            style.edge_stroke_width,
            &style.edge_color,
            style.dimmed_edge_opacity,
        )
    };

    RenderEdge {
        id: edge.id.clone(),
        source_table_id: edge.source.clone(),
        target_table_id: edge.target.clone(),
        source_anchor: edge.source_handle.clone(),
        target_anchor: edge.target_handle.clone(),
        label: edge.cardinality.label(),
        stroke_width,
        color: color.clone(),
        opacity,
        animated: active,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interaction::{build_edges, highlight};
    use crate::parser::parse;

    fn fixture() -> (Schema, Vec<LayoutNode>) {
        let schema = parse(
            r#"
            Table users [headercolor: #111111] {
              id int [pk]
              name text
            }
            Table posts {
              id int [pk]
              user_id int [ref: > users.id]
            }
            Table audit {
              id int
            }
            "#,
        );
        let positions = ["users", "posts", "audit"]
            .iter()
            .enumerate()
            .map(|(i, id)| LayoutNode {
                id: id.to_string(),
                x: i as f64 * 400.0,
                y: 0.0,
                width: 250.0,
                height: 96.0,
            })
            .collect();
        (schema, positions)
    }

    fn build(schema: &Schema, positions: &[LayoutNode], hovered: Option<&str>) -> Scene {
        let adjacency = AdjacencyIndex::build(schema);
        let map = positions.iter().map(|n| (n.id.as_str(), n)).collect();
        let edges = build_edges(schema, &map);
        let state = highlight(hovered, &edges);
        Scene::build(&SceneInput {
            schema,
            adjacency: &adjacency,
            positions,
            edges: &edges,
            highlight: &state,
            style: &StyleConfig::default(),
        })
    }

    #[test]
    fn test_idle_scene() {
        let (schema, positions) = fixture();
        let scene = build(&schema, &positions, None);

        assert_eq!(scene.nodes.len(), 3);
        let users = scene.node("users").unwrap();
        assert_eq!(users.header_color, "#111111");
        assert_eq!(users.columns_with_relations, vec!["id"]);
        assert!(users.highlighted_columns.is_empty());
        assert!(scene.nodes.iter().all(|n| n.opacity == 1.0 && !n.grayscale));

        let edge = &scene.edges[0];
        assert_eq!(edge.label, "(n) -> (1)");
        assert_eq!(edge.source_table_id, "posts");
        assert_eq!(edge.target_table_id, "users");
        assert_eq!(edge.source_anchor.to_string(), "user_id-left-source");
        assert_eq!(edge.target_anchor.to_string(), "id-right-target");
        assert!(!edge.animated);
        assert_eq!(edge.opacity, 1.0);
    }

    #[test]
    fn test_hover_dims_unrelated() {
        let (schema, positions) = fixture();
        let style = StyleConfig::default();
        let scene = build(&schema, &positions, Some("users"));

        let users = scene.node("users").unwrap();
        assert_eq!(users.highlighted_columns, vec!["id"]);
        assert_eq!(scene.node("posts").unwrap().highlighted_columns, vec!["user_id"]);

        let audit = scene.node("audit").unwrap();
        assert!(audit.grayscale);
        assert_eq!(audit.opacity, style.dimmed_opacity);

        let edge = &scene.edges[0];
        assert!(edge.animated);
        assert_eq!(edge.stroke_width, style.highlight_stroke_width);
        assert_eq!(edge.color, style.highlight_color);
    }

    #[test]
    fn test_hover_isolated_dims_edges() {
        let (schema, positions) = fixture();
        let scene = build(&schema, &positions, Some("audit"));
        let edge = &scene.edges[0];
        assert!(!edge.animated);
        assert_eq!(edge.opacity, StyleConfig::default().dimmed_edge_opacity);
        assert!(scene.node("users").unwrap().grayscale);
        assert!(!scene.node("audit").unwrap().grayscale);
    }

    #[test]
    fn test_scene_json_shape() {
        let (schema, positions) = fixture();
        let scene = build(&schema, &positions, None);
        let json = serde_json::to_value(&scene).unwrap();

        let node = &json["nodes"][0];
        assert_eq!(node["headerColor"], "#111111");
        assert_eq!(node["columns"][0]["type"], "int");
        assert_eq!(node["columns"][0]["isPrimary"], true);
        assert!(node["columnsWithRelations"].is_array());

        let edge = &json["edges"][0];
        assert_eq!(edge["sourceAnchor"], "user_id-left-source");
        assert_eq!(edge["label"], "(n) -> (1)");
        assert_eq!(edge["strokeWidth"], 1.0);
    }
}
