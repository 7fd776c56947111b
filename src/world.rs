//! Render-sink snapshot types.
//!
//! The `Snapshot` struct is a serializable, screen-space view of the
//! simulation that a renderer can draw without touching the ECS world.
//! World positions are kept alongside for tooling.

use crate::animation::Animation;
use crate::camera::Camera;
use crate::components::*;
use crate::systems::ai::AiState;
use crate::systems::intent::Brain;
use crate::tiles::{TileKind, TileWorld};
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// Snapshot of a single soldier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub id: u32,
    pub role: String,
    /// World-space top-left.
    pub x: f32,
    pub y: f32,
    pub vy: f32,
    /// Screen-space draw rectangle.
    pub draw: Rect,
    pub health: f32,
    pub health_max: f32,
    /// `health / health_max` in `[0, 1]`, for health bars.
    pub health_fraction: f32,
    pub ammo: u32,
    pub alive: bool,
    pub action: String,
    pub frame_index: usize,
    /// Draw the sprite flipped horizontally.
    pub mirrored: bool,
    /// Behaviour state of AI soldiers, `None` for the player.
    pub ai_state: Option<AiState>,
}

/// Snapshot of a projectile in flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileSnapshot {
    pub draw: Rect,
    pub mirrored: bool,
}

/// Snapshot of a visible tile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileSnapshot {
    pub sprite: i32,
    pub kind: TileKind,
    pub draw: Rect,
}

/// Complete frame for the renderer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Current simulation tick.
    pub tick: u64,
    /// Camera offset in world units.
    pub scroll: f32,
    pub player_alive: bool,
    /// Player first, then enemies in spawn order.
    pub entities: Vec<EntitySnapshot>,
    pub projectiles: Vec<ProjectileSnapshot>,
    /// Obstacles and decorations overlapping the viewport.
    pub tiles: Vec<TileSnapshot>,
}

impl Snapshot {
    /// Create a snapshot from the ECS world.
    pub fn from_world(world: &mut World, tick: u64) -> Self {
        let camera = world.get_resource::<Camera>().copied().unwrap_or_default();

        let mut query = world.query::<(
            Entity,
            &Role,
            &Position,
            &Velocity,
            &Hitbox,
            &Facing,
            &Health,
            &Arsenal,
            &Animation,
            &Brain,
        )>();
        let mut soldiers: Vec<_> = query.iter(world).collect();
        soldiers.sort_by_key(|(entity, role, ..)| (**role != Role::Player, *entity));

        let entities: Vec<EntitySnapshot> = soldiers
            .into_iter()
            .map(
                |(entity, role, pos, vel, hitbox, facing, health, arsenal, anim, brain)| EntitySnapshot {
                    id: entity.index(),
                    role: role.as_str().to_string(),
                    x: pos.x,
                    y: pos.y,
                    vy: vel.vy,
                    draw: camera.to_screen(&hitbox.rect_at(pos)),
                    health: health.current,
                    health_max: health.max,
                    health_fraction: health.fraction(),
                    ammo: arsenal.ammo,
                    alive: health.is_alive(),
                    action: anim.action.as_str().to_string(),
                    frame_index: anim.frame_index,
                    mirrored: facing.is_mirrored(),
                    ai_state: brain.as_ai().map(|ai| ai.state),
                },
            )
            .collect();

        let player_alive = entities
            .iter()
            .any(|e| e.role == Role::Player.as_str() && e.alive);

        let mut projectile_query = world.query::<(&Projectile, &Position, &Hitbox)>();
        let projectiles = projectile_query
            .iter(world)
            .map(|(projectile, pos, hitbox)| ProjectileSnapshot {
                draw: camera.to_screen(&hitbox.rect_at(pos)),
                mirrored: projectile.direction.is_mirrored(),
            })
            .collect();

        let tiles = world
            .get_resource::<TileWorld>()
            .map(|tiles| {
                tiles
                    .tiles_in_span(camera.scroll, camera.screen_width)
                    .map(|tile| TileSnapshot {
                        sprite: tile.sprite,
                        kind: tile.kind,
                        draw: camera.to_screen(&tile.rect),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            tick,
            scroll: camera.scroll,
            player_alive,
            entities,
            projectiles,
            tiles,
        }
    }

    /// Serialize snapshot to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize snapshot to pretty JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
