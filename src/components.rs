//! ECS Components for the shooter simulation.
//!
//! Components are pure data containers attached to entities.
//! All game logic lives in systems that query these components.

use crate::animation::Animation;
use crate::config::{SimConfig, SoldierStats};
use crate::systems::intent::Brain;
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

// ============================================================================
// GEOMETRY
// ============================================================================

/// Axis-aligned rectangle, `(x, y)` is the top-left corner, y grows downward.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width, never negative.
    pub w: f32,
    /// Height, never negative.
    pub h: f32,
}

impl Rect {
    /// Rectangle with its top-left corner at `(x, y)`.
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Rectangle of the given size centred on `(cx, cy)`.
    pub fn centered(cx: f32, cy: f32, w: f32, h: f32) -> Self {
        Self::new(cx - w / 2.0, cy - h / 2.0, w, h)
    }

    /// Smallest x covered.
    pub fn left(&self) -> f32 {
        self.x
    }

    /// One past the largest x covered.
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    /// Smallest y covered (highest on screen).
    pub fn top(&self) -> f32 {
        self.y
    }

    /// One past the largest y covered. Soldiers stand on this edge.
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// Horizontal midpoint.
    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    /// Vertical midpoint.
    pub fn center_y(&self) -> f32 {
        self.y + self.h / 2.0
    }

    /// Same size, moved by `(dx, dy)`. Used for collision probes.
    pub fn offset(&self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.w, self.h)
    }

    /// Strict overlap test: rectangles that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

// ============================================================================
// SPATIAL COMPONENTS
// ============================================================================

/// World-space position of the top-left corner of an entity's hitbox.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    /// Create a new position.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Per-tick motion: `vx` is the horizontal delta actually applied last tick,
/// `vy` is the vertical velocity integrated by gravity.
#[derive(Component, Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Velocity {
    /// Horizontal step applied on the last tick, after collision.
    pub vx: f32,
    /// Vertical velocity, positive is down. Clamped to terminal velocity.
    pub vy: f32,
}

/// Fixed bounding size, set at spawn.
#[derive(Component, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Hitbox {
    pub width: f32,
    pub height: f32,
}

impl Hitbox {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// World-space rectangle of this hitbox at `pos`.
    pub fn rect_at(&self, pos: &Position) -> Rect {
        Rect::new(pos.x, pos.y, self.width, self.height)
    }
}

/// Horizontal direction an entity faces or travels in.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// -1.0 for left, +1.0 for right.
    pub fn sign(&self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    /// The opposite direction.
    pub fn reversed(&self) -> Self {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }

    /// Sprites face right; left-facing entities are drawn mirrored.
    pub fn is_mirrored(&self) -> bool {
        *self == Facing::Left
    }
}

/// Locomotion state consumed by the movement system.
#[derive(Component, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Motion {
    /// Horizontal pixels per tick. Zeroed on death.
    pub speed: f32,
    /// No ground contact at the end of the last move. Blocks jumping.
    pub in_air: bool,
}

// ============================================================================
// IDENTITY COMPONENTS
// ============================================================================

/// Which side a soldier is on. The player is the only camera-driving entity.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Player,
    Enemy,
}

impl Role {
    /// Role name as used in snapshots and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Player => "Player",
            Role::Enemy => "Enemy",
        }
    }
}

// ============================================================================
// COMBAT COMPONENTS
// ============================================================================

/// Health of a soldier. `alive` only ever goes from true to false.
#[derive(Component, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Health {
    /// Current hit points, clamped at 0.
    pub current: f32,
    /// Hit points at spawn.
    pub max: f32,
    /// Resolved once per tick by the vitals system.
    pub alive: bool,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self {
            current: max,
            max,
            alive: true,
        }
    }

    /// Get health as a fraction (0.0 to 1.0).
    pub fn fraction(&self) -> f32 {
        if self.max <= 0.0 {
            0.0
        } else {
            (self.current / self.max).clamp(0.0, 1.0)
        }
    }

    /// Check if the soldier is still alive.
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Apply damage. Health never drops below zero.
    pub fn damage(&mut self, amount: f32) {
        self.current = (self.current - amount).max(0.0);
    }

    /// Resolve the alive flag from current health.
    /// Returns true only on the tick the soldier dies.
    pub fn check_alive(&mut self) -> bool {
        if self.alive && self.current <= 0.0 {
            self.current = 0.0;
            self.alive = false;
            return true;
        }
        false
    }
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0)
    }
}

/// Ammunition and fire-rate gate.
#[derive(Component, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Arsenal {
    /// Rounds left.
    pub ammo: u32,
    /// Rounds at spawn.
    pub start_ammo: u32,
    /// Ticks left before the next shot is allowed.
    pub cooldown: u32,
}

impl Arsenal {
    pub fn new(ammo: u32) -> Self {
        Self {
            ammo,
            start_ammo: ammo,
            cooldown: 0,
        }
    }

    /// Cooldown expired and at least one round left.
    pub fn can_shoot(&self) -> bool {
        self.cooldown == 0 && self.ammo > 0
    }

    /// Count the cooldown down by one tick, stopping at zero.
    pub fn tick_cooldown(&mut self) {
        self.cooldown = self.cooldown.saturating_sub(1);
    }
}

/// Movement and shoot requests for the current tick.
///
/// `jump` is sticky: it stays requested until the movement system starts a
/// jump from the ground.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveIntent {
    pub left: bool,
    /// Wins over `left` when both are set.
    pub right: bool,
    pub jump: bool,
    /// Fire if the arsenal allows it.
    pub shoot: bool,
}

/// A straight-line projectile. It does not remember who fired it.
#[derive(Component, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Projectile {
    /// Travel direction, fixed at spawn.
    pub direction: Facing,
    /// Horizontal pixels per tick.
    pub speed: f32,
}

// ============================================================================
// BUNDLE HELPERS
// ============================================================================

/// Bundle for spawning a soldier (player or enemy).
#[derive(Bundle)]
pub struct SoldierBundle {
    pub role: Role,
    pub position: Position,
    pub velocity: Velocity,
    pub hitbox: Hitbox,
    pub facing: Facing,
    pub motion: Motion,
    pub health: Health,
    pub arsenal: Arsenal,
    pub intent: MoveIntent,
    pub animation: Animation,
    pub brain: Brain,
}

impl SoldierBundle {
    pub fn new(role: Role, stats: SoldierStats, position: Position, brain: Brain) -> Self {
        Self {
            role,
            position,
            velocity: Velocity::default(),
            hitbox: Hitbox::new(stats.width, stats.height),
            facing: Facing::Right,
            motion: Motion {
                speed: stats.speed,
                in_air: false,
            },
            health: Health::new(stats.health),
            arsenal: Arsenal::new(stats.ammo),
            intent: MoveIntent::default(),
            animation: Animation::default(),
            brain,
        }
    }
}

/// Bundle for spawning a projectile.
#[derive(Bundle)]
pub struct ProjectileBundle {
    pub projectile: Projectile,
    pub position: Position,
    pub hitbox: Hitbox,
}

impl ProjectileBundle {
    /// Projectile centred on `(cx, cy)`, travelling in `direction`.
    pub fn new(cx: f32, cy: f32, direction: Facing, config: &SimConfig) -> Self {
        let rect = Rect::centered(cx, cy, config.projectile_width, config.projectile_height);
        Self {
            projectile: Projectile {
                direction,
                speed: config.projectile_speed,
            },
            position: Position::new(rect.x, rect.y),
            hitbox: Hitbox::new(rect.w, rect.h),
        }
    }
}
