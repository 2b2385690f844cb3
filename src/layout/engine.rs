//! Layout engine core implementation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

use crate::ast::Schema;
use crate::measure::TableMetrics;

use super::forces::{CenterForce, CollideForce, Force, LinkForce, ManyBodyForce};
use super::simulation::Simulation;
use super::types::{Body, Layout, Link};

/// Tunables for the force simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub iterations: usize,
    pub link_distance: f64,
    /// Many-body strength; negative values repel.
    pub charge_strength: f64,
    pub collide_padding: f64,
    pub collide_strength: f64,
    pub collide_iterations: usize,
    /// Point the centering force pulls the diagram toward (expected viewport center).
    pub center_x: f64,
    pub center_y: f64,
    pub alpha_min: f64,
    pub velocity_decay: f64,
    pub seed: u64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            iterations: 300,
            link_distance: 360.0,
            charge_strength: -1000.0,
            collide_padding: 40.0,
            collide_strength: 1.0,
            collide_iterations: 2,
            center_x: 600.0,
            center_y: 400.0,
            alpha_min: 0.001,
            velocity_decay: 0.4,
            seed: 0x5EED,
        }
    }
}

/// Layout engine configuration and computation.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    pub(crate) config: LayoutConfig,
    pub(crate) metrics: TableMetrics,
}

impl LayoutEngine {
    pub fn new(config: LayoutConfig, metrics: TableMetrics) -> Self {
        Self { config, metrics }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// The standard force set: link springs, repulsion, centering and collision.
    pub fn default_forces(&self) -> Vec<Box<dyn Force>> {
        let c = &self.config;
        vec![
            Box::new(LinkForce::new(c.link_distance)),
            Box::new(ManyBodyForce::new(c.charge_strength)),
            Box::new(CenterForce::new(c.center_x, c.center_y)),
            Box::new(CollideForce::new(
                c.collide_padding,
                c.collide_strength,
                c.collide_iterations,
            )),
        ]
    }

    /// Compute layout for the given schema.
    pub fn layout(&self, schema: &Schema) -> Layout {
        self.layout_with_forces(schema, self.default_forces())
    }

    /// Compute layout with a caller-supplied force set.
    pub fn layout_with_forces(&self, schema: &Schema, forces: Vec<Box<dyn Force>>) -> Layout {
        let bodies = build_bodies(schema, &self.metrics);
        let links = build_links(schema, &bodies);
        let (body_count, link_count) = (bodies.len(), links.len());

        let mut sim = Simulation::new(
            bodies,
            links,
            (self.config.center_x, self.config.center_y),
            self.config.seed,
        )
        .with_cooling(self.config.alpha_min, self.config.iterations)
        .with_velocity_decay(self.config.velocity_decay);

        for force in forces {
            sim.add_force(force);
        }
        sim.run(self.config.iterations);

        info!(
            tables = body_count,
            links = link_count,
            iterations = self.config.iterations,
            "layout settled"
        );

        Layout {
            nodes: sim.into_bodies().iter().map(Body::to_layout_node).collect(),
        }
    }
}

/// One body per table, sized from its column count.
pub fn build_bodies(schema: &Schema, metrics: &TableMetrics) -> Vec<Body> {
    schema
        .tables
        .iter()
        .map(|t| {
            let (w, h) = metrics.node_size(t.columns.len());
            Body::new(t.name.clone(), w, h)
        })
        .collect()
}

/// One link per relationship between two distinct, existing tables.
/// Parallel relationships produce parallel links.
pub fn build_links(schema: &Schema, bodies: &[Body]) -> Vec<Link> {
    let index: HashMap<&str, usize> = bodies
        .iter()
        .enumerate()
        .map(|(i, b)| (b.id.as_str(), i))
        .collect();

    schema
        .relationships
        .iter()
        .filter_map(|rel| {
            let source = index.get(rel.from.table.as_str());
            let target = index.get(rel.to.table.as_str());
            match (source, target) {
                (Some(&source), Some(&target)) if source != target => {
                    Some(Link { source, target })
                }
                (Some(_), Some(_)) => None,
                _ => {
                    debug!(from = %rel.from, to = %rel.to, "relationship has no body, skipping link");
                    None
                }
            }
        })
        .collect()
}
