//! Side-scrolling shooter - Simulation Core
//!
//! A deterministic, fixed-timestep ECS simulation of a 2D platformer-shooter:
//! gravity and tile collision, patrolling AI, projectiles, camera scroll and
//! the animation state they drive. Rendering, assets and raw input stay
//! outside; they talk to the core through `SimWorld` and `Snapshot`.
//! Uses `bevy_ecs` for the entity-component-system architecture.

pub mod animation;
pub mod api;
pub mod camera;
pub mod components;
pub mod config;
pub mod error;
pub mod systems;
pub mod tiles;
pub mod world;

pub use animation::{Action, Animation, FrameCounts, FrameTable};
pub use api::SimWorld;
pub use camera::{Camera, ScrollDelta};
pub use components::*;
pub use config::{SimConfig, SoldierStats};
pub use error::LoadError;
pub use systems::*;
pub use tiles::{LevelGrid, Spawn, Tile, TileKind, TileWorld};
pub use world::Snapshot;
