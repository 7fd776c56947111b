//! Simulation tuning.
//!
//! Every gameplay constant lives here so a level can be replayed with a
//! different feel without touching system code.

use crate::components::Role;
use crate::error::LoadError;
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// Per-role soldier parameters applied at spawn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SoldierStats {
    /// Horizontal pixels per tick.
    pub speed: f32,
    pub ammo: u32,
    pub health: f32,
    pub width: f32,
    pub height: f32,
}

impl SoldierStats {
    pub fn player() -> Self {
        Self {
            speed: 5.0,
            ammo: 20,
            health: 100.0,
            width: 24.0,
            height: 38.0,
        }
    }

    pub fn enemy() -> Self {
        Self {
            speed: 2.0,
            ..Self::player()
        }
    }
}

/// Configuration for the whole simulation.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Fixed timestep in seconds (1/60 = 60 Hz).
    pub fixed_timestep: f32,
    pub screen_width: f32,
    pub screen_height: f32,
    /// Downward acceleration added to vertical velocity every tick.
    pub gravity: f32,
    /// Maximum downward velocity.
    pub terminal_velocity: f32,
    /// Vertical velocity set when a jump starts (negative is up).
    pub jump_impulse: f32,
    /// Distance from either viewport edge at which the player scrolls the camera.
    pub scroll_threshold: f32,
    /// Ticks between two shots of the same soldier.
    pub shoot_cooldown: u32,
    pub projectile_speed: f32,
    pub projectile_width: f32,
    pub projectile_height: f32,
    /// Forward offset of a new projectile, as a fraction of the shooter's width.
    pub projectile_spawn_offset: f32,
    pub damage_to_player: f32,
    pub damage_to_enemy: f32,
    /// AI starts idling with a chance of 1 in `idle_chance` per tick.
    pub idle_chance: u32,
    pub idle_ticks: u32,
    pub vision_width: f32,
    pub vision_height: f32,
    /// Horizontal distance from the soldier's centre to the vision window's centre.
    pub vision_offset: f32,
    /// Ticks between animation frames (100 ms at 60 Hz).
    pub animation_cooldown: u64,
    pub player: SoldierStats,
    pub enemy: SoldierStats,
    /// Seed for the AI random source.
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            fixed_timestep: 1.0 / 60.0,
            screen_width: 800.0,
            screen_height: 640.0,
            gravity: 0.75,
            terminal_velocity: 10.0,
            jump_impulse: -13.0,
            scroll_threshold: 200.0,
            shoot_cooldown: 20,
            projectile_speed: 10.0,
            projectile_width: 10.0,
            projectile_height: 6.0,
            projectile_spawn_offset: 0.75,
            damage_to_player: 5.0,
            damage_to_enemy: 25.0,
            idle_chance: 200,
            idle_ticks: 50,
            vision_width: 150.0,
            vision_height: 20.0,
            vision_offset: 75.0,
            animation_cooldown: 6,
            player: SoldierStats::player(),
            enemy: SoldierStats::enemy(),
            seed: 0x5eed,
        }
    }
}

impl SimConfig {
    pub fn stats(&self, role: Role) -> SoldierStats {
        match role {
            Role::Player => self.player,
            Role::Enemy => self.enemy,
        }
    }

    /// Reject values the simulation cannot run with. NaN fails every check.
    pub fn validate(&self) -> Result<(), LoadError> {
        let positive = [
            ("fixed_timestep", self.fixed_timestep),
            ("screen_width", self.screen_width),
            ("screen_height", self.screen_height),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(LoadError::InvalidConfig { field });
            }
        }
        Ok(())
    }

    /// Damage a projectile deals to a soldier of the given role.
    pub fn damage_for(&self, role: Role) -> f32 {
        match role {
            Role::Player => self.damage_to_player,
            Role::Enemy => self.damage_to_enemy,
        }
    }
}
