//! Force-directed table layout.
//!
//! Every table becomes a body sized by [`TableMetrics`](crate::measure::TableMetrics),
//! every relationship between two existing tables a spring, and the
//! simulation runs a fixed number of ticks before positions are read off.

mod engine;
pub mod forces;
mod simulation;
mod types;

pub use engine::{LayoutConfig, LayoutEngine, build_bodies, build_links};
pub use forces::Force;
pub use simulation::Simulation;
pub use types::{Body, Layout, LayoutNode, Link};
