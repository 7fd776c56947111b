//! Animation state machine.
//!
//! Maps a soldier's action and the elapsed ticks to a frame index. Frame
//! counts come from a `FrameTable` validated once at startup, so the core
//! only ever indexes `(action, frame_index)` into known-good data.

use crate::components::Role;
use crate::error::LoadError;
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// Visual action of a soldier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Action {
    #[default]
    Idle = 0,
    Run = 1,
    Jump = 2,
    Death = 3,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Idle => "Idle",
            Action::Run => "Run",
            Action::Jump => "Jump",
            Action::Death => "Death",
        }
    }
}

/// Number of frames per action for one sprite set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameCounts {
    pub idle: usize,
    pub run: usize,
    pub jump: usize,
    pub death: usize,
}

impl FrameCounts {
    pub fn get(&self, action: Action) -> usize {
        match action {
            Action::Idle => self.idle,
            Action::Run => self.run,
            Action::Jump => self.jump,
            Action::Death => self.death,
        }
    }
}

impl Default for FrameCounts {
    fn default() -> Self {
        Self {
            idle: 5,
            run: 6,
            jump: 1,
            death: 8,
        }
    }
}

/// Validated per-role frame counts, supplied by the asset loader.
#[derive(Resource, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FrameTable {
    player: FrameCounts,
    enemy: FrameCounts,
}

impl FrameTable {
    pub fn new(player: FrameCounts, enemy: FrameCounts) -> Result<Self, LoadError> {
        for (role, counts) in [(Role::Player, &player), (Role::Enemy, &enemy)] {
            for action in [Action::Idle, Action::Run, Action::Jump, Action::Death] {
                if counts.get(action) == 0 {
                    return Err(LoadError::EmptyAnimation { role, action });
                }
            }
        }
        Ok(Self { player, enemy })
    }

    pub fn frames(&self, role: Role, action: Action) -> usize {
        match role {
            Role::Player => self.player.get(action),
            Role::Enemy => self.enemy.get(action),
        }
    }
}

impl Default for FrameTable {
    fn default() -> Self {
        Self {
            player: FrameCounts::default(),
            enemy: FrameCounts::default(),
        }
    }
}

/// Current action, frame and the tick the frame last advanced.
#[derive(Component, Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Animation {
    pub action: Action,
    pub frame_index: usize,
    pub last_advance: u64,
}

impl Animation {
    /// Switch to `action`, restarting at frame 0. Death is terminal.
    pub fn set_action(&mut self, action: Action, now: u64) {
        if self.action == Action::Death || self.action == action {
            return;
        }
        self.action = action;
        self.frame_index = 0;
        self.last_advance = now;
    }

    /// Enter Death regardless of the current action.
    pub fn force_death(&mut self, now: u64) {
        if self.action != Action::Death {
            self.action = Action::Death;
            self.frame_index = 0;
            self.last_advance = now;
        }
    }

    /// Step the frame if the cooldown elapsed. Death holds its last frame,
    /// every other action loops.
    pub fn advance(&mut self, now: u64, cooldown: u64, frame_count: usize) {
        if now.saturating_sub(self.last_advance) >= cooldown {
            self.frame_index += 1;
            self.last_advance = now;
        }
        if self.frame_index >= frame_count {
            self.frame_index = if self.action == Action::Death {
                frame_count.saturating_sub(1)
            } else {
                0
            };
        }
    }
}
