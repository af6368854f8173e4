//! Force-directed layout engine for knowledge graphs.
//!
//! Browser-independent: the components in `crate::components` feed it pointer
//! events and viewport sizes and paint whatever [`Simulation::graph`] holds.
//! [`Vec2`] drives the continuously animated canvas, [`Vec3`] the
//! pre-laid-out orbit view.

pub mod clamp;
pub mod config;
pub mod error;
pub mod graph;
pub mod interaction;
pub mod scheduler;
pub mod simulation;
pub mod solver;
pub mod types;
pub mod vector;

pub use clamp::clamp;
pub use config::{Bounds, SimulationConfig};
pub use error::{EngineError, GraphError};
pub use graph::{Edge, Graph, Node, Viewport};
pub use interaction::{Interaction, hit_test, pick};
pub use scheduler::{CancellationToken, Frame, Mode, Scheduler, Surface};
pub use simulation::Simulation;
pub use solver::step;
pub use types::{Category, Difficulty, GraphData, GraphEdge, GraphNode, GraphStats};
pub use vector::{Vec2, Vec3, Vector};
