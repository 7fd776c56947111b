//! Camera follow.

use crate::camera::{Camera, ScrollDelta};
use bevy_ecs::prelude::*;
use tracing::trace;

/// System that folds the tick's scroll delta into the camera offset.
/// Runs last so every other system saw the same offset this tick.
pub fn camera_system(delta: Res<ScrollDelta>, mut camera: ResMut<Camera>) {
    if delta.0 != 0.0 {
        camera.apply(*delta);
        trace!(scroll = camera.scroll, "camera moved");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_follows_delta() {
        let mut world = World::new();
        world.insert_resource(Camera::new(800.0, 640.0, 2400.0));
        world.insert_resource(ScrollDelta(-5.0));

        let mut schedule = Schedule::default();
        schedule.add_systems(camera_system);
        schedule.run(&mut world);
        schedule.run(&mut world);

        assert_eq!(world.resource::<Camera>().scroll, 10.0);
    }
}
