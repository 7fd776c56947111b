//! Public API for the simulation.
//!
//! This module provides the main interface for a renderer or any other
//! client to drive the simulation.
//!
//! ## Fixed Timestep
//!
//! The simulation uses a fixed timestep internally (default 60 Hz). When
//! `step(dt)` is called, the simulation accumulates time and runs fixed
//! updates as needed. `tick()` runs exactly one. Either way the result only
//! depends on the level, the config seed and the input sequence.

use crate::animation::FrameTable;
use crate::camera::{Camera, ScrollDelta};
use crate::components::*;
use crate::config::SimConfig;
use crate::error::LoadError;
use crate::systems::*;
use crate::tiles::{LevelGrid, TileWorld};
use crate::world::Snapshot;
use bevy_ecs::prelude::*;
use tracing::info;

/// The main simulation world container.
///
/// Holds the ECS world and schedule, providing a clean API for:
/// - Loading a level
/// - Stepping the simulation forward
/// - Feeding player input
/// - Extracting render snapshots
pub struct SimWorld {
    world: World,
    schedule: Schedule,
    tick: u64,
    player: Entity,
    /// Accumulated time for fixed timestep.
    time_accumulator: f32,
}

impl SimWorld {
    /// Load a level and spawn its soldiers.
    ///
    /// Soldiers stand centred on their marker tile. Enemies start facing
    /// right and patrol one tile width in each direction. A config with a
    /// non-positive timestep or screen size is rejected here.
    pub fn load(grid: &LevelGrid, config: SimConfig, frames: FrameTable) -> Result<Self, LoadError> {
        config.validate()?;
        let tiles = TileWorld::from_grid(grid, config.screen_height)?;
        let camera = Camera::new(config.screen_width, config.screen_height, tiles.level_width());
        let mut world = World::new();

        let stats = config.player;
        let hitbox = Hitbox::new(stats.width, stats.height);
        let position = tiles.spawn_position(tiles.player_spawn(), &hitbox);
        let player = world
            .spawn(SoldierBundle::new(Role::Player, stats, position, Brain::player()))
            .id();

        let stats = config.enemy;
        let hitbox = Hitbox::new(stats.width, stats.height);
        for &spawn in tiles.enemy_spawns() {
            let position = tiles.spawn_position(spawn, &hitbox);
            let controller = AiController::new(
                hitbox.rect_at(&position),
                Facing::Right,
                tiles.tile_size,
                &config,
            );
            world.spawn(SoldierBundle::new(Role::Enemy, stats, position, Brain::ai(controller)));
        }

        info!(
            rows = tiles.rows,
            cols = tiles.cols,
            tile_size = tiles.tile_size,
            obstacles = tiles.obstacles().len(),
            enemies = tiles.enemy_spawns().len(),
            "level loaded"
        );

        // Core resources
        world.insert_resource(SimTick(0));
        world.insert_resource(SimRng::seeded(config.seed));
        world.insert_resource(InputState::default());
        world.insert_resource(ScrollDelta::default());
        world.insert_resource(camera);
        world.insert_resource(tiles);
        world.insert_resource(frames);
        world.insert_resource(config);

        // One chain: each system sees the effects of the previous ones this tick.
        let mut schedule = Schedule::default();
        schedule.add_systems(
            (
                intent_system,
                firing_system,
                movement_system,
                projectile_system,
                vitals_system,
                animation_system,
                cooldown_system,
                camera_system,
            )
                .chain(),
        );

        Ok(Self {
            world,
            schedule,
            tick: 0,
            player,
            time_accumulator: 0.0,
        })
    }

    /// Step the simulation forward by `dt` seconds.
    ///
    /// Uses fixed timestep internally - accumulates time and runs fixed updates
    /// as needed. Returns the number of fixed updates that ran.
    pub fn step(&mut self, dt: f32) -> u32 {
        let fixed_dt = self.world.resource::<SimConfig>().fixed_timestep;

        self.time_accumulator += dt;

        let mut ran = 0;
        while self.time_accumulator >= fixed_dt {
            self.tick();
            self.time_accumulator -= fixed_dt;
            ran += 1;
        }
        ran
    }

    /// Run a single fixed timestep update.
    pub fn tick(&mut self) {
        self.world.resource_mut::<SimTick>().increment();
        self.schedule.run(&mut self.world);
        self.tick += 1;
    }

    /// Replace the current input state. Held keys stay held until changed.
    pub fn set_input(&mut self, input: InputState) {
        *self.world.resource_mut::<InputState>() = input;
    }

    /// Trigger a jump on the next tick.
    pub fn press_jump(&mut self) {
        self.world.resource_mut::<InputState>().jump = true;
    }

    /// The player entity. It stays valid after death.
    pub fn player(&self) -> Entity {
        self.player
    }

    /// Enemy entities in spawn order.
    pub fn enemies(&mut self) -> Vec<Entity> {
        let mut query = self.world.query::<(Entity, &Role)>();
        let mut enemies: Vec<Entity> = query
            .iter(&self.world)
            .filter(|(_, role)| **role == Role::Enemy)
            .map(|(entity, _)| entity)
            .collect();
        enemies.sort();
        enemies
    }

    /// Number of projectiles in flight.
    pub fn projectile_count(&mut self) -> usize {
        let mut query = self.world.query::<&Projectile>();
        query.iter(&self.world).count()
    }

    /// Current camera offset in world units.
    pub fn scroll(&self) -> f32 {
        self.world.resource::<Camera>().scroll
    }

    /// Get the current tick number.
    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Get a snapshot of the current simulation state.
    pub fn snapshot(&mut self) -> Snapshot {
        Snapshot::from_world(&mut self.world, self.tick)
    }

    /// Get the snapshot as a JSON string.
    pub fn snapshot_json(&mut self) -> String {
        self.snapshot().to_json().unwrap_or_else(|_| "{}".to_string())
    }

    /// Get the underlying ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Get mutable access to the underlying ECS world.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}
