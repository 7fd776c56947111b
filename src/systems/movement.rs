//! Movement system - gravity, jumping and axis-separated tile collision.
//!
//! Each living soldier integrates one tick of motion from its `MoveIntent`:
//! horizontal step, jump impulse, gravity clamped to terminal velocity, then
//! collision against every obstacle tile, horizontal pass first. The player
//! is additionally held inside the viewport and drives the camera scroll.

use crate::camera::{Camera, ScrollDelta};
use crate::components::*;
use crate::config::SimConfig;
use crate::systems::intent::{Brain, IntentSource};
use crate::tiles::TileWorld;
use bevy_ecs::prelude::*;

/// Mutable view of one soldier's physics state.
pub struct Body<'a> {
    pub position: &'a mut Position,
    pub velocity: &'a mut Velocity,
    pub motion: &'a mut Motion,
    pub intent: &'a mut MoveIntent,
    pub facing: &'a mut Facing,
    pub hitbox: Hitbox,
}

/// Advance one soldier by one tick.
///
/// `camera` is only passed for the camera-driving soldier; it enables the
/// viewport clamp and scrolling. Returns the scroll delta this soldier
/// produced (negated horizontal step, or 0.0).
pub fn move_body(
    body: Body<'_>,
    brain: &mut dyn IntentSource,
    camera: Option<&Camera>,
    tiles: &TileWorld,
    config: &SimConfig,
) -> f32 {
    let Body {
        position,
        velocity,
        motion,
        intent,
        facing,
        hitbox,
    } = body;
    let rect = hitbox.rect_at(position);

    // Right is evaluated second and wins when both are held.
    let mut dx = 0.0;
    if intent.left {
        dx = -motion.speed;
        *facing = Facing::Left;
    }
    if intent.right {
        dx = motion.speed;
        *facing = Facing::Right;
    }

    if intent.jump && !motion.in_air {
        velocity.vy = config.jump_impulse;
        intent.jump = false;
        motion.in_air = true;
    }

    velocity.vy = (velocity.vy + config.gravity).min(config.terminal_velocity);
    let dy = velocity.vy;

    // Horizontal pass: one wall contact per tick, however many tiles touch.
    if dx != 0.0 && tiles.hits_obstacle(&rect.offset(dx, 0.0)) {
        dx = 0.0;
        if brain.on_wall_contact() {
            *facing = facing.reversed();
        }
    }

    // Vertical pass. Snap to the tile edge instead of adding a delta so a
    // resting soldier's bottom sits exactly on the tile top.
    let rising = velocity.vy < 0.0;
    let probe = rect.offset(0.0, dy);
    let mut snap_y = None;
    let mut landed = false;
    for tile in tiles.obstacles_hit(&probe) {
        if rising {
            snap_y = Some(tile.rect.bottom());
        } else {
            snap_y = Some(tile.rect.top() - hitbox.height);
            landed = true;
        }
        velocity.vy = 0.0;
    }
    motion.in_air = !landed;

    if let Some(camera) = camera {
        let screen = camera.to_screen(&rect);
        if screen.left() + dx < 0.0 || screen.right() + dx > camera.screen_width {
            dx = 0.0;
        }
    }

    position.x += dx;
    position.y = snap_y.unwrap_or(position.y + dy);
    velocity.vx = dx;

    let moved = hitbox.rect_at(position);
    let mut scroll = 0.0;
    if let Some(camera) = camera {
        let screen = camera.to_screen(&moved);
        let threshold = config.scroll_threshold;
        let past_right = screen.right() > camera.screen_width - threshold && camera.can_scroll_right();
        let past_left = screen.left() < threshold && camera.scroll > dx.abs();
        if past_right || past_left {
            scroll = -dx;
        }
    }

    brain.after_move(facing, moved, config);
    scroll
}

/// System that moves every living soldier and records the player's scroll.
///
/// ## Data Access
/// - Reads: SimConfig, TileWorld, Camera, Role, Hitbox, Health
/// - Writes: ScrollDelta, Position, Velocity, Motion, MoveIntent, Facing, Brain
pub fn movement_system(
    config: Res<SimConfig>,
    tiles: Res<TileWorld>,
    camera: Res<Camera>,
    mut scroll: ResMut<ScrollDelta>,
    mut query: Query<(
        &Role,
        &Hitbox,
        &Health,
        &mut Position,
        &mut Velocity,
        &mut Motion,
        &mut MoveIntent,
        &mut Facing,
        &mut Brain,
    )>,
) {
    scroll.0 = 0.0;
    for (role, hitbox, health, mut position, mut velocity, mut motion, mut intent, mut facing, mut brain) in
        query.iter_mut()
    {
        if !health.is_alive() {
            continue;
        }
        let is_player = *role == Role::Player;
        let body = Body {
            position: &mut position,
            velocity: &mut velocity,
            motion: &mut motion,
            intent: &mut intent,
            facing: &mut facing,
            hitbox: *hitbox,
        };
        let delta = move_body(
            body,
            &mut *brain,
            is_player.then_some(&*camera),
            &tiles,
            &config,
        );
        if is_player {
            scroll.0 += delta;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::ai::AiController;
    use crate::systems::intent::PlayerInput;
    use crate::tiles::LevelGrid;

    const FLOOR_TOP: f32 = 600.0;

    /// 16 x 60 level, 40 px tiles, solid floor on the last row.
    fn level(edit: impl FnOnce(&mut LevelGrid)) -> TileWorld {
        let mut grid = LevelGrid::empty(16, 60);
        grid.fill_row(15, 1);
        grid.set(0, 0, 15);
        edit(&mut grid);
        TileWorld::from_grid(&grid, 640.0).unwrap()
    }

    struct Rig {
        position: Position,
        velocity: Velocity,
        motion: Motion,
        intent: MoveIntent,
        facing: Facing,
        hitbox: Hitbox,
    }

    impl Rig {
        fn at(x: f32, y: f32) -> Self {
            Self {
                position: Position::new(x, y),
                velocity: Velocity::default(),
                motion: Motion {
                    speed: 5.0,
                    in_air: false,
                },
                intent: MoveIntent::default(),
                facing: Facing::Right,
                hitbox: Hitbox::new(24.0, 38.0),
            }
        }

        fn standing(x: f32) -> Self {
            Self::at(x, FLOOR_TOP - 38.0)
        }

        fn step(
            &mut self,
            brain: &mut dyn IntentSource,
            camera: Option<&Camera>,
            tiles: &TileWorld,
            config: &SimConfig,
        ) -> f32 {
            move_body(
                Body {
                    position: &mut self.position,
                    velocity: &mut self.velocity,
                    motion: &mut self.motion,
                    intent: &mut self.intent,
                    facing: &mut self.facing,
                    hitbox: self.hitbox,
                },
                brain,
                camera,
                tiles,
                config,
            )
        }

        fn rect(&self) -> Rect {
            self.hitbox.rect_at(&self.position)
        }
    }

    #[test]
    fn test_gravity_clamps_at_terminal_velocity() {
        let config = SimConfig::default();
        let tiles = level(|g| g.fill_row(15, -1));
        let mut rig = Rig::at(400.0, 0.0);
        for tick in 0..200 {
            rig.step(&mut PlayerInput, None, &tiles, &config);
            assert!(rig.velocity.vy <= 10.0);
            if tick > 20 {
                assert_eq!(rig.velocity.vy, 10.0);
            }
        }
    }

    #[test]
    fn test_near_terminal_velocity_clamps_to_ten() {
        let config = SimConfig::default();
        let tiles = level(|g| g.fill_row(15, -1));
        let mut rig = Rig::at(400.0, 0.0);
        rig.velocity.vy = 9.5;
        rig.step(&mut PlayerInput, None, &tiles, &config);
        assert_eq!(rig.velocity.vy, 10.0);
        assert_eq!(rig.position.y, 10.0);
    }

    #[test]
    fn test_jump_only_from_ground() {
        let config = SimConfig::default();
        let tiles = level(|_| {});
        let mut rig = Rig::standing(400.0);
        rig.intent.jump = true;
        rig.step(&mut PlayerInput, None, &tiles, &config);
        assert!(!rig.intent.jump, "impulse consumes the request");
        assert_eq!(rig.velocity.vy, -13.0 + 0.75);
        assert!(rig.motion.in_air);

        // Airborne: request stays pending, no second impulse.
        rig.intent.jump = true;
        let vy_before = rig.velocity.vy;
        rig.step(&mut PlayerInput, None, &tiles, &config);
        assert!(rig.intent.jump);
        assert_eq!(rig.velocity.vy, vy_before + 0.75);
    }

    #[test]
    fn test_lands_on_floor() {
        let config = SimConfig::default();
        let tiles = level(|_| {});
        let mut rig = Rig::at(400.0, 300.0);
        rig.motion.in_air = true;
        for _ in 0..60 {
            rig.step(&mut PlayerInput, None, &tiles, &config);
        }
        assert_eq!(rig.rect().bottom(), FLOOR_TOP);
        assert_eq!(rig.velocity.vy, 0.0);
        assert!(!rig.motion.in_air);
    }

    #[test]
    fn test_walks_along_floor() {
        let config = SimConfig::default();
        let tiles = level(|_| {});
        let mut rig = Rig::standing(400.0);
        rig.intent.right = true;
        for _ in 0..10 {
            rig.step(&mut PlayerInput, None, &tiles, &config);
        }
        assert_eq!(rig.position.x, 450.0);
        assert_eq!(rig.rect().bottom(), FLOOR_TOP);
    }

    #[test]
    fn test_right_overrides_left() {
        let config = SimConfig::default();
        let tiles = level(|_| {});
        let mut rig = Rig::standing(400.0);
        rig.intent.left = true;
        rig.intent.right = true;
        rig.step(&mut PlayerInput, None, &tiles, &config);
        assert_eq!(rig.position.x, 405.0);
        assert_eq!(rig.facing, Facing::Right);
    }

    #[test]
    fn test_head_bump_stops_rise() {
        let config = SimConfig::default();
        // Ceiling tile directly above the standing soldier (row 13 spans 520..560).
        let tiles = level(|g| g.set(13, 10, 2));
        let mut rig = Rig::standing(408.0);
        rig.intent.jump = true;
        rig.step(&mut PlayerInput, None, &tiles, &config);
        assert_eq!(rig.position.y, 560.0);
        assert_eq!(rig.velocity.vy, 0.0);
        assert!(rig.motion.in_air);
    }

    #[test]
    fn test_wall_blocks_horizontal_motion() {
        let config = SimConfig::default();
        let tiles = level(|g| {
            g.set(14, 12, 1);
            g.set(13, 12, 1);
        });
        let mut rig = Rig::standing(450.0);
        rig.intent.right = true;
        for _ in 0..20 {
            rig.step(&mut PlayerInput, None, &tiles, &config);
            let rect = rig.rect();
            assert!(tiles.obstacles().iter().all(|t| !t.rect.intersects(&rect)));
        }
        assert!(rig.rect().right() <= 480.0);
        assert_eq!(rig.velocity.vx, 0.0);
    }

    #[test]
    fn test_ai_turns_once_per_wall_contact() {
        let config = SimConfig::default();
        // Two stacked wall tiles; the soldier overlaps both rows.
        let tiles = level(|g| {
            g.set(14, 12, 1);
            g.set(13, 12, 1);
            g.set(12, 12, 1);
        });
        let mut rig = Rig::at(454.0, 550.0);
        rig.motion.in_air = true;
        rig.intent.right = true;
        let mut ai = AiController::new(rig.rect(), Facing::Right, 40.0, &config);
        ai.patrol_counter = 10;

        rig.step(&mut ai, None, &tiles, &config);
        assert_eq!(rig.facing, Facing::Left);
        assert_eq!(rig.position.x, 454.0);
        assert_eq!(ai.patrol_counter, 0);
    }

    #[test]
    fn test_player_held_inside_viewport() {
        let config = SimConfig::default();
        let tiles = level(|_| {});
        let camera = Camera::new(800.0, 640.0, tiles.level_width());
        let mut rig = Rig::standing(3.0);
        rig.intent.left = true;
        let scroll = rig.step(&mut PlayerInput, Some(&camera), &tiles, &config);
        assert_eq!(rig.position.x, 3.0);
        assert_eq!(scroll, 0.0);
    }

    #[test]
    fn test_player_scrolls_past_threshold() {
        let config = SimConfig::default();
        let tiles = level(|_| {});
        let camera = Camera::new(800.0, 640.0, tiles.level_width());
        // Threshold line at 600.
        let mut rig = Rig::standing(571.0);
        rig.intent.right = true;
        let scroll = rig.step(&mut PlayerInput, Some(&camera), &tiles, &config);
        assert_eq!(scroll, 0.0, "right edge on the line is not past it");
        let scroll = rig.step(&mut PlayerInput, Some(&camera), &tiles, &config);
        assert_eq!(scroll, -5.0);
        assert_eq!(rig.position.x, 581.0);
    }

    #[test]
    fn test_no_left_scroll_at_level_start() {
        let config = SimConfig::default();
        let tiles = level(|_| {});
        let camera = Camera::new(800.0, 640.0, tiles.level_width());
        let mut rig = Rig::standing(100.0);
        rig.intent.left = true;
        let scroll = rig.step(&mut PlayerInput, Some(&camera), &tiles, &config);
        assert_eq!(scroll, 0.0);
        assert_eq!(rig.position.x, 95.0);
    }

    #[test]
    fn test_movement_system_skips_dead_and_records_scroll() {
        let config = SimConfig::default();
        let tiles = level(|_| {});
        let mut world = World::new();
        world.insert_resource(Camera::new(800.0, 640.0, tiles.level_width()));
        world.insert_resource(ScrollDelta::default());
        world.insert_resource(tiles);
        world.insert_resource(config.clone());

        let player = world
            .spawn(SoldierBundle::new(
                Role::Player,
                config.player,
                Position::new(576.0, FLOOR_TOP - 38.0),
                Brain::player(),
            ))
            .id();
        world.get_mut::<MoveIntent>(player).unwrap().right = true;

        let body = Rect::new(300.0, 100.0, 24.0, 38.0);
        let mut dead = SoldierBundle::new(
            Role::Enemy,
            config.enemy,
            Position::new(300.0, 100.0),
            Brain::ai(AiController::new(body, Facing::Right, 40.0, &config)),
        );
        dead.health.current = 0.0;
        dead.health.alive = false;
        let dead = world.spawn(dead).id();

        let mut schedule = Schedule::default();
        schedule.add_systems(movement_system);
        schedule.run(&mut world);

        assert_eq!(world.resource::<ScrollDelta>().0, -5.0);
        assert_eq!(world.get::<Position>(dead).unwrap().y, 100.0);
    }
}
