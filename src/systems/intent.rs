//! Behaviour-intent sources.
//!
//! Player input and the AI both produce the same per-tick `Intent`; the
//! movement and firing systems consume the resulting `MoveIntent` without
//! knowing which source filled it in.

use crate::animation::{Action, Animation};
use crate::components::*;
use crate::config::SimConfig;
use crate::systems::ai::AiController;
use crate::systems::clock::{SimRng, SimTick};
use bevy_ecs::prelude::*;
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Discrete input state delivered by the input collaborator.
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    pub move_left: bool,
    pub move_right: bool,
    /// Jump trigger, consumed by the next intent pass.
    pub jump: bool,
    pub shoot: bool,
}

/// What a source wants its soldier to do this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Intent {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub shoot: bool,
    /// Visual action to request, if the source drives the animation.
    pub pose: Option<Action>,
}

/// Read-only view a source decides from.
pub struct IntentContext<'a> {
    pub body: Rect,
    pub facing: Facing,
    pub in_air: bool,
    /// Rectangle of the living player, if there is one.
    pub player: Option<Rect>,
    pub input: &'a InputState,
    pub config: &'a SimConfig,
}

/// Anything that can steer a soldier.
pub trait IntentSource {
    fn next_intent(&mut self, ctx: &IntentContext<'_>, rng: &mut dyn RngCore) -> Intent;

    /// Horizontal movement was blocked by terrain. Return true to turn around.
    fn on_wall_contact(&mut self) -> bool {
        false
    }

    /// Called once the soldier's position for the tick is final.
    fn after_move(&mut self, _facing: &mut Facing, _body: Rect, _config: &SimConfig) {}
}

/// Adapter from `InputState` to intents.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerInput;

impl IntentSource for PlayerInput {
    fn next_intent(&mut self, ctx: &IntentContext<'_>, _rng: &mut dyn RngCore) -> Intent {
        let input = ctx.input;
        let pose = if ctx.in_air {
            Action::Jump
        } else if input.move_left || input.move_right {
            Action::Run
        } else {
            Action::Idle
        };
        Intent {
            left: input.move_left,
            right: input.move_right,
            jump: input.jump,
            shoot: input.shoot,
            pose: Some(pose),
        }
    }
}

/// The intent source attached to a soldier.
#[derive(Component, Debug, Clone)]
pub enum Brain {
    Player(PlayerInput),
    Ai(AiController),
}

impl Brain {
    pub fn player() -> Self {
        Brain::Player(PlayerInput)
    }

    pub fn ai(controller: AiController) -> Self {
        Brain::Ai(controller)
    }

    pub fn as_ai(&self) -> Option<&AiController> {
        match self {
            Brain::Ai(ai) => Some(ai),
            Brain::Player(_) => None,
        }
    }
}

impl IntentSource for Brain {
    fn next_intent(&mut self, ctx: &IntentContext<'_>, rng: &mut dyn RngCore) -> Intent {
        match self {
            Brain::Player(p) => p.next_intent(ctx, rng),
            Brain::Ai(ai) => ai.next_intent(ctx, rng),
        }
    }

    fn on_wall_contact(&mut self) -> bool {
        match self {
            Brain::Player(p) => p.on_wall_contact(),
            Brain::Ai(ai) => ai.on_wall_contact(),
        }
    }

    fn after_move(&mut self, facing: &mut Facing, body: Rect, config: &SimConfig) {
        match self {
            Brain::Player(p) => p.after_move(facing, body, config),
            Brain::Ai(ai) => ai.after_move(facing, body, config),
        }
    }
}

/// Fold a fresh intent into the soldier's persistent `MoveIntent`.
/// Jump stays latched until movement consumes it.
pub fn apply_intent(target: &mut MoveIntent, intent: &Intent) {
    target.left = intent.left;
    target.right = intent.right;
    target.shoot = intent.shoot;
    target.jump |= intent.jump;
}

/// System that asks every living soldier's brain for this tick's intent.
///
/// ## Data Access
/// - Reads: SimConfig, SimTick, Position, Hitbox, Facing, Motion, Health, Role
/// - Writes: InputState (jump trigger), SimRng, Brain, MoveIntent, Animation
pub fn intent_system(
    config: Res<SimConfig>,
    tick: Res<SimTick>,
    mut input: ResMut<InputState>,
    mut rng: ResMut<SimRng>,
    players: Query<(&Position, &Hitbox, &Health, &Role)>,
    mut soldiers: Query<(
        &Position,
        &Hitbox,
        &Facing,
        &Motion,
        &Health,
        &mut Brain,
        &mut MoveIntent,
        &mut Animation,
    )>,
) {
    let player = players
        .iter()
        .find(|(_, _, health, role)| **role == Role::Player && health.is_alive())
        .map(|(pos, hitbox, _, _)| hitbox.rect_at(pos));

    for (pos, hitbox, facing, motion, health, mut brain, mut move_intent, mut anim) in
        soldiers.iter_mut()
    {
        if !health.is_alive() {
            *move_intent = MoveIntent::default();
            continue;
        }

        let ctx = IntentContext {
            body: hitbox.rect_at(pos),
            facing: *facing,
            in_air: motion.in_air,
            player,
            input: &input,
            config: &config,
        };
        let intent = brain.next_intent(&ctx, &mut rng.0);
        apply_intent(&mut move_intent, &intent);
        if let Some(pose) = intent.pose {
            anim.set_action(pose, tick.0);
        }
    }

    input.jump = false;
}
