//! Per-tick bookkeeping that runs after combat: animation frames and the
//! shooting cooldown.

use crate::animation::{Animation, FrameTable};
use crate::components::{Arsenal, Role};
use crate::config::SimConfig;
use crate::systems::clock::SimTick;
use bevy_ecs::prelude::*;

/// System that advances every soldier's animation frame.
///
/// Frames step once `animation_cooldown` ticks have passed since the last
/// step. Death holds its final frame.
pub fn animation_system(
    config: Res<SimConfig>,
    tick: Res<SimTick>,
    frames: Res<FrameTable>,
    mut query: Query<(&Role, &mut Animation)>,
) {
    for (role, mut anim) in query.iter_mut() {
        let count = frames.frames(*role, anim.action);
        anim.advance(tick.0, config.animation_cooldown, count);
    }
}

/// System that counts shooting cooldowns down toward zero.
pub fn cooldown_system(mut query: Query<&mut Arsenal>) {
    for mut arsenal in query.iter_mut() {
        arsenal.tick_cooldown();
    }
}
