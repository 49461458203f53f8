//! Physics for worlds built from square panes that embed each other, often
//! recursively. An entity's position is a trace through the embeddings plus
//! coordinates in the innermost pane, and everything it touches is resolved
//! within a bounded window of nesting around that trace.

pub mod blocks;
pub mod config;
pub mod debug;
pub mod entity;
pub mod geometry;
pub mod levels;
pub mod movement;
pub mod pane;
pub mod physics;
pub mod physics_core;
pub mod scale;
pub mod simulation;
pub mod surroundings;
pub mod trace;
pub mod view;
pub mod world;

pub use config::{EntityTemplate, PhysicsConfig, StartupConfig};
pub use entity::{Capabilities, Control, Entity, EntityId};
pub use pane::{Inlay, Pane, PaneId, PANE_SIZE};
pub use physics::{SimulationPlugin, SimulationSet};
pub use simulation::Simulation;
pub use trace::{Context, Trace, TraceStep};
pub use world::World;
