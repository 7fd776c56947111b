//! Combat systems - shooting, projectile flight and death resolution.
//!
//! ## Tick order
//! 1. `firing_system` turns shoot intents into projectiles (cooldown and ammo gated).
//! 2. `projectile_system` moves projectiles and resolves their hits.
//! 3. `vitals_system` turns zero health into death.
//!
//! Projectiles never look soldiers up by identity. The projectile pass builds
//! a `TargetIndex` of living soldiers and talks to it through the
//! `DamageTargets` capability, so friendly fire falls out naturally.

use crate::animation::Animation;
use crate::camera::Camera;
use crate::components::*;
use crate::config::SimConfig;
use crate::systems::clock::SimTick;
use crate::tiles::TileWorld;
use bevy_ecs::prelude::*;
use tracing::{debug, info};

// ============================================================================
// SHOOTING
// ============================================================================

/// Fire one projectile if the cooldown has expired and ammo remains.
///
/// On success the cooldown restarts and one round is spent. The projectile is
/// centred a fraction of the shooter's width ahead of the shooter's centre.
pub fn try_shoot(
    arsenal: &mut Arsenal,
    body: Rect,
    facing: Facing,
    config: &SimConfig,
) -> Option<ProjectileBundle> {
    if !arsenal.can_shoot() {
        return None;
    }
    arsenal.cooldown = config.shoot_cooldown;
    arsenal.ammo -= 1;
    let cx = body.center_x() + config.projectile_spawn_offset * body.w * facing.sign();
    Some(ProjectileBundle::new(cx, body.center_y(), facing, config))
}

/// System that spawns projectiles for every living soldier asking to shoot.
///
/// Dead soldiers never fire. Spawning goes through `Commands`, so the new
/// projectiles first move in `projectile_system` later in the same tick.
///
/// ## Data Access
/// - Reads: SimConfig, MoveIntent, Health, Position, Hitbox, Facing
/// - Writes: Arsenal (cooldown, ammo), spawns Projectile entities
pub fn firing_system(
    mut commands: Commands,
    config: Res<SimConfig>,
    mut query: Query<(&MoveIntent, &Health, &Position, &Hitbox, &Facing, &mut Arsenal)>,
) {
    for (intent, health, pos, hitbox, facing, mut arsenal) in query.iter_mut() {
        if !health.is_alive() || !intent.shoot {
            continue;
        }
        if let Some(projectile) = try_shoot(&mut arsenal, hitbox.rect_at(pos), *facing, &config) {
            commands.spawn(projectile);
        }
    }
}

// ============================================================================
// PROJECTILES
// ============================================================================

/// A living soldier a projectile may strike.
#[derive(Debug, Clone, Copy)]
pub struct Target {
    pub entity: Entity,
    /// Decides the damage dealt and the hit priority.
    pub role: Role,
    /// World-space hitbox at the start of the projectile pass.
    pub rect: Rect,
}

/// Capability handed to projectiles: find living soldiers in an area and
/// damage them.
pub trait DamageTargets {
    /// Living targets overlapping `area`, in hit-priority order.
    fn living_within(&self, area: &Rect) -> Vec<Target>;

    /// Deal `amount` damage to `target`.
    fn apply_damage(&mut self, target: Entity, amount: f32);
}

/// Snapshot of living soldiers for one projectile pass.
///
/// Alive flags only change in `vitals_system`, after the projectile pass, so
/// the snapshot stays exact for the whole pass. Damage is queued and applied
/// once the pass is done.
#[derive(Debug, Default)]
pub struct TargetIndex {
    targets: Vec<Target>,
    pending: Vec<(Entity, f32)>,
}

impl TargetIndex {
    /// Player first, then everyone else in spawn order.
    pub fn new(mut targets: Vec<Target>) -> Self {
        targets.sort_by_key(|t| (t.role != Role::Player, t.entity));
        Self {
            targets,
            pending: Vec::new(),
        }
    }

    /// Damage queued during the pass, in the order it was dealt.
    pub fn into_damage(self) -> Vec<(Entity, f32)> {
        self.pending
    }
}

impl DamageTargets for TargetIndex {
    fn living_within(&self, area: &Rect) -> Vec<Target> {
        self.targets
            .iter()
            .filter(|t| t.rect.intersects(area))
            .copied()
            .collect()
    }

    fn apply_damage(&mut self, target: Entity, amount: f32) {
        self.pending.push((target, amount));
    }
}

/// Why a projectile left the simulation, if it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileFate {
    /// Still in flight.
    Flying,
    /// Left edge crossed out of the viewport.
    OffScreen,
    /// Overlapped an obstacle tile.
    HitTerrain,
    /// Damaged this soldier.
    HitSoldier(Entity),
}

/// Move one projectile a tick and resolve what it runs into.
///
/// A projectile damages at most one soldier: the first target reported by
/// `targets`. Leaving the screen is checked first, then terrain.
pub fn advance_projectile(
    projectile: &Projectile,
    position: &mut Position,
    hitbox: &Hitbox,
    tiles: &TileWorld,
    camera: &Camera,
    config: &SimConfig,
    targets: &mut dyn DamageTargets,
) -> ProjectileFate {
    position.x += projectile.direction.sign() * projectile.speed;
    let rect = hitbox.rect_at(position);

    if !camera.is_on_screen(rect.x) {
        return ProjectileFate::OffScreen;
    }
    if tiles.hits_obstacle(&rect) {
        return ProjectileFate::HitTerrain;
    }
    if let Some(target) = targets.living_within(&rect).first() {
        targets.apply_damage(target.entity, config.damage_for(target.role));
        return ProjectileFate::HitSoldier(target.entity);
    }
    ProjectileFate::Flying
}

/// System that advances all projectiles and applies their damage.
///
/// ## Data Access
/// - Reads: SimConfig, TileWorld, Camera, Projectile, Hitbox, Role
/// - Writes: Position (projectiles), Health (soldiers)
pub fn projectile_system(
    mut commands: Commands,
    config: Res<SimConfig>,
    tiles: Res<TileWorld>,
    camera: Res<Camera>,
    mut projectiles: Query<(Entity, &Projectile, &Hitbox, &mut Position)>,
    mut soldiers: Query<(Entity, &Role, &Hitbox, &Position, &mut Health), Without<Projectile>>,
) {
    let living = soldiers
        .iter()
        .filter(|(_, _, _, _, health)| health.is_alive())
        .map(|(entity, role, hitbox, pos, _)| Target {
            entity,
            role: *role,
            rect: hitbox.rect_at(pos),
        })
        .collect();
    let mut index = TargetIndex::new(living);

    for (entity, projectile, hitbox, mut position) in projectiles.iter_mut() {
        let fate = advance_projectile(
            projectile,
            &mut position,
            hitbox,
            &tiles,
            &camera,
            &config,
            &mut index,
        );
        match fate {
            ProjectileFate::Flying => {}
            ProjectileFate::HitSoldier(target) => {
                debug!(projectile = ?entity, target = ?target, "projectile hit");
                commands.entity(entity).despawn();
            }
            other => {
                debug!(projectile = ?entity, fate = ?other, "projectile removed");
                commands.entity(entity).despawn();
            }
        }
    }

    for (target, amount) in index.into_damage() {
        if let Ok((_, _, _, _, mut health)) = soldiers.get_mut(target) {
            health.damage(amount);
        }
    }
}

// ============================================================================
// VITALS
// ============================================================================

/// System that resolves deaths. A soldier whose health reached zero is
/// marked dead, stops moving and enters the Death animation for good.
///
/// ## Data Access
/// - Reads: SimTick, Role
/// - Writes: Health (alive flag), Motion, MoveIntent, Animation
pub fn vitals_system(
    tick: Res<SimTick>,
    mut query: Query<(
        Entity,
        &Role,
        &mut Health,
        &mut Motion,
        &mut MoveIntent,
        &mut Animation,
    )>,
) {
    for (entity, role, mut health, mut motion, mut intent, mut anim) in query.iter_mut() {
        if health.check_alive() {
            motion.speed = 0.0;
            *intent = MoveIntent::default();
            anim.force_death(tick.0);
            info!(entity = ?entity, role = role.as_str(), "soldier died");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Action;
    use crate::systems::intent::Brain;
    use crate::tiles::LevelGrid;

    fn open_level() -> TileWorld {
        let mut grid = LevelGrid::empty(16, 60);
        grid.fill_row(15, 1);
        grid.set(0, 0, 15);
        grid.set(13, 19, 3);
        TileWorld::from_grid(&grid, 640.0).unwrap()
    }

    fn setup_world() -> World {
        let config = SimConfig::default();
        let tiles = open_level();
        let mut world = World::new();
        world.insert_resource(Camera::new(800.0, 640.0, tiles.level_width()));
        world.insert_resource(tiles);
        world.insert_resource(config);
        world.insert_resource(SimTick(0));
        world
    }

    fn soldier(world: &mut World, role: Role, x: f32) -> Entity {
        let stats = world.resource::<SimConfig>().stats(role);
        world
            .spawn(SoldierBundle::new(
                role,
                stats,
                Position::new(x, 562.0),
                Brain::player(),
            ))
            .id()
    }

    fn projectile(world: &mut World, cx: f32, cy: f32, direction: Facing) -> Entity {
        let bundle = ProjectileBundle::new(cx, cy, direction, world.resource::<SimConfig>());
        world.spawn(bundle).id()
    }

    fn run_projectiles(world: &mut World) {
        let mut schedule = Schedule::default();
        schedule.add_systems(projectile_system);
        schedule.run(world);
    }

    #[test]
    fn test_twenty_shots_then_empty() {
        let config = SimConfig::default();
        let mut arsenal = Arsenal::new(20);
        let body = Rect::new(100.0, 100.0, 24.0, 38.0);

        let mut spawned = 0;
        for _ in 0..20 {
            if try_shoot(&mut arsenal, body, Facing::Right, &config).is_some() {
                spawned += 1;
            }
            assert_eq!(arsenal.cooldown, 20);
            arsenal.cooldown = 0;
        }
        assert_eq!(spawned, 20);
        assert_eq!(arsenal.ammo, 0);

        let before = (arsenal.ammo, arsenal.cooldown);
        assert!(try_shoot(&mut arsenal, body, Facing::Right, &config).is_none());
        assert_eq!((arsenal.ammo, arsenal.cooldown), before);
    }

    #[test]
    fn test_cooldown_blocks_shot() {
        let config = SimConfig::default();
        let mut arsenal = Arsenal::new(5);
        let body = Rect::new(100.0, 100.0, 24.0, 38.0);
        assert!(try_shoot(&mut arsenal, body, Facing::Left, &config).is_some());
        assert!(try_shoot(&mut arsenal, body, Facing::Left, &config).is_none());
        assert_eq!(arsenal.ammo, 4);
    }

    #[test]
    fn test_projectile_spawns_ahead_of_shooter() {
        let config = SimConfig::default();
        let mut arsenal = Arsenal::new(5);
        let body = Rect::new(100.0, 100.0, 24.0, 38.0);
        let bundle = try_shoot(&mut arsenal, body, Facing::Left, &config).unwrap();
        let rect = bundle.hitbox.rect_at(&bundle.position);
        assert_eq!(rect.center_x(), 112.0 - 18.0);
        assert_eq!(rect.center_y(), 119.0);
        assert_eq!(bundle.projectile.direction, Facing::Left);
    }

    #[test]
    fn test_projectile_damages_enemy_once() {
        let mut world = setup_world();
        let a = soldier(&mut world, Role::Enemy, 400.0);
        let b = soldier(&mut world, Role::Enemy, 400.0);
        let shot = projectile(&mut world, 395.0, 580.0, Facing::Right);

        run_projectiles(&mut world);

        assert!(world.get_entity(shot).is_err());
        let hurt: Vec<f32> = [a, b]
            .iter()
            .map(|e| world.get::<Health>(*e).unwrap().current)
            .collect();
        assert_eq!(hurt, vec![75.0, 100.0], "first target only");
    }

    #[test]
    fn test_player_takes_small_damage_and_is_hit_first() {
        let mut world = setup_world();
        let enemy = soldier(&mut world, Role::Enemy, 400.0);
        let player = soldier(&mut world, Role::Player, 400.0);
        projectile(&mut world, 395.0, 580.0, Facing::Right);

        run_projectiles(&mut world);

        assert_eq!(world.get::<Health>(player).unwrap().current, 95.0);
        assert_eq!(world.get::<Health>(enemy).unwrap().current, 100.0);
    }

    #[test]
    fn test_projectile_passes_dead_soldiers() {
        let mut world = setup_world();
        let corpse = soldier(&mut world, Role::Enemy, 400.0);
        {
            let mut health = world.get_mut::<Health>(corpse).unwrap();
            health.current = 0.0;
            health.alive = false;
        }
        let shot = projectile(&mut world, 395.0, 580.0, Facing::Right);

        run_projectiles(&mut world);

        assert!(world.get_entity(shot).is_ok());
        assert_eq!(world.get::<Health>(corpse).unwrap().current, 0.0);
    }

    #[test]
    fn test_projectile_stops_at_terrain() {
        let mut world = setup_world();
        // Tile (13, 19) spans x 760..800, y 520..560.
        let shot = projectile(&mut world, 752.0, 540.0, Facing::Right);
        run_projectiles(&mut world);
        assert!(world.get_entity(shot).is_err());
    }

    #[test]
    fn test_projectile_removed_when_leaving_screen() {
        let mut world = setup_world();
        let left = projectile(&mut world, 9.0, 300.0, Facing::Left);
        let right = projectile(&mut world, 798.0, 300.0, Facing::Right);
        let inside = projectile(&mut world, 400.0, 300.0, Facing::Right);
        run_projectiles(&mut world);
        assert!(world.get_entity(left).is_err());
        assert!(world.get_entity(right).is_err());
        assert!(world.get_entity(inside).is_ok());
    }

    #[test]
    fn test_lethal_damage_resolves_to_death() {
        let mut world = setup_world();
        let enemy = soldier(&mut world, Role::Enemy, 400.0);
        world.get_mut::<Health>(enemy).unwrap().current = 5.0;
        projectile(&mut world, 395.0, 580.0, Facing::Right);

        let mut schedule = Schedule::default();
        schedule.add_systems((projectile_system, vitals_system).chain());
        schedule.run(&mut world);

        let health = world.get::<Health>(enemy).unwrap();
        assert_eq!(health.current, 0.0);
        assert!(!health.is_alive());
        assert_eq!(world.get::<Animation>(enemy).unwrap().action, Action::Death);
        assert_eq!(world.get::<Motion>(enemy).unwrap().speed, 0.0);

        // Dying is a one-time transition.
        schedule.run(&mut world);
        assert!(!world.get::<Health>(enemy).unwrap().is_alive());
    }
}
