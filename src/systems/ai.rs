//! AI controller for enemy soldiers.
//!
//! A small state machine: patrol back and forth, occasionally stop to idle,
//! and stand still shooting whenever the player walks into the vision window.
//!
//! ## Tick order
//! `next_intent` runs during the intent pass, before movement. Patrol
//! bookkeeping (distance counter, vision window, turn-around) is deferred to
//! `after_move` so it sees the soldier's final position for the tick.

use crate::animation::Action;
use crate::components::{Facing, Rect};
use crate::config::SimConfig;
use crate::systems::intent::{Intent, IntentContext, IntentSource};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Behaviour state, as evaluated on the most recent tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AiState {
    #[default]
    Patrol,
    Idle,
    Engage,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiController {
    pub state: AiState,
    /// Distance walked since the last turn-around, in ticks of movement.
    pub patrol_counter: i32,
    /// Counter value past which the patrol turns around (one tile width).
    pub patrol_distance: f32,
    pub idling: bool,
    pub idle_counter: u32,
    /// Detection window ahead of the soldier.
    pub vision: Rect,
    /// Set when this tick's intent was a patrol step.
    patrolled: bool,
}

impl AiController {
    pub fn new(body: Rect, facing: Facing, patrol_distance: f32, config: &SimConfig) -> Self {
        Self {
            state: AiState::Patrol,
            patrol_counter: 0,
            patrol_distance,
            idling: false,
            idle_counter: 0,
            vision: vision_window(body, facing, config),
            patrolled: false,
        }
    }

    fn transition(&mut self, to: AiState) {
        if self.state != to {
            trace!(from = ?self.state, to = ?to, "ai state change");
            self.state = to;
        }
    }
}

/// Vision window centred `vision_offset` ahead of the body's centre.
pub fn vision_window(body: Rect, facing: Facing, config: &SimConfig) -> Rect {
    Rect::centered(
        body.center_x() + config.vision_offset * facing.sign(),
        body.center_y(),
        config.vision_width,
        config.vision_height,
    )
}

impl IntentSource for AiController {
    fn next_intent(&mut self, ctx: &IntentContext<'_>, rng: &mut dyn RngCore) -> Intent {
        self.patrolled = false;
        let config = ctx.config;

        // No decisions once the player is gone.
        let Some(player) = ctx.player else {
            return Intent::default();
        };

        if !self.idling && config.idle_chance > 0 && rng.gen_range(1..=config.idle_chance) == 1
        {
            self.idling = true;
            self.idle_counter = config.idle_ticks;
        }

        if self.vision.intersects(&player) {
            self.transition(AiState::Engage);
            return Intent {
                shoot: true,
                pose: Some(Action::Idle),
                ..Default::default()
            };
        }

        if self.idling {
            self.transition(AiState::Idle);
            self.idle_counter = self.idle_counter.saturating_sub(1);
            if self.idle_counter == 0 {
                self.idling = false;
            }
            return Intent {
                pose: Some(Action::Idle),
                ..Default::default()
            };
        }

        self.transition(AiState::Patrol);
        self.patrolled = true;
        let right = ctx.facing == Facing::Right;
        Intent {
            left: !right,
            right,
            pose: Some(Action::Run),
            ..Default::default()
        }
    }

    fn on_wall_contact(&mut self) -> bool {
        self.patrol_counter = 0;
        true
    }

    fn after_move(&mut self, facing: &mut Facing, body: Rect, config: &SimConfig) {
        if !self.patrolled {
            return;
        }
        self.patrol_counter += 1;
        self.vision = vision_window(body, *facing, config);
        if self.patrol_counter as f32 > self.patrol_distance {
            *facing = facing.reversed();
            self.patrol_counter = -self.patrol_counter;
        }
    }
}
