//! Camera scroll.
//!
//! Everything in the simulation lives in world coordinates. The camera keeps
//! one horizontal offset and converts to screen space only when something
//! is read out for drawing or for viewport-edge checks.

use crate::components::Rect;
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// World-to-screen mapping.
#[derive(Resource, Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Camera {
    /// World x of the viewport's left edge.
    pub scroll: f32,
    pub screen_width: f32,
    pub screen_height: f32,
    /// Total width of the level in world units.
    pub level_width: f32,
}

impl Camera {
    pub fn new(screen_width: f32, screen_height: f32, level_width: f32) -> Self {
        Self {
            scroll: 0.0,
            screen_width,
            screen_height,
            level_width,
        }
    }

    pub fn to_screen(&self, rect: &Rect) -> Rect {
        rect.offset(-self.scroll, 0.0)
    }

    /// Level width still off-screen to the right.
    pub fn can_scroll_right(&self) -> bool {
        self.scroll < self.level_width - self.screen_width
    }

    /// Whether a world x coordinate lies within the viewport's horizontal span.
    pub fn is_on_screen(&self, world_x: f32) -> bool {
        let screen_x = world_x - self.scroll;
        (0.0..=self.screen_width).contains(&screen_x)
    }

    /// Fold a tick's scroll delta into the offset. The delta is expressed the
    /// way a renderer sees it: negative when the world shifts left.
    pub fn apply(&mut self, delta: ScrollDelta) {
        self.scroll -= delta.0;
    }
}

/// Scroll produced by the player's movement this tick.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrollDelta(pub f32);
