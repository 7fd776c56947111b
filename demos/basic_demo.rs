//! Basic demonstration of the shooter simulation.
//!
//! Run with: cargo run --example basic_demo
//! Set RUST_LOG=shooter_sim=debug to see hits and despawns.

use shooter_sim::{FrameTable, InputState, LevelGrid, SimConfig, SimWorld};

fn main() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    println!("=== Side-scrolling Shooter - Simulation Demo ===\n");

    let grid = demo_level();
    let mut sim = match SimWorld::load(&grid, SimConfig::default(), FrameTable::default()) {
        Ok(sim) => sim,
        Err(err) => {
            eprintln!("failed to load level: {err}");
            return;
        }
    };

    println!("Initial state:");
    print_snapshot(&mut sim);

    // Walk right, jump every second, fire in bursts.
    println!("\nRunning 600 ticks (10 seconds at 60 Hz)...\n");
    for tick in 0..600u32 {
        sim.set_input(InputState {
            move_right: true,
            shoot: tick % 40 < 2,
            ..Default::default()
        });
        if tick % 60 == 30 {
            sim.press_jump();
        }
        sim.step(1.0 / 60.0);

        if (tick + 1) % 120 == 0 {
            println!("--- Tick {} (scroll={:.1}) ---", sim.current_tick(), sim.scroll());
            print_snapshot(&mut sim);
        }
    }

    println!("\n=== Final State (JSON) ===\n");
    match sim.snapshot().to_json_pretty() {
        Ok(json) => println!("{json}"),
        Err(err) => eprintln!("failed to serialize snapshot: {err}"),
    }
}

/// 16 rows by 80 columns: floor, a few walls and platforms, enemies spread out.
fn demo_level() -> LevelGrid {
    let mut grid = LevelGrid::empty(16, 80);
    grid.fill_row(15, 1);
    grid.set(14, 2, 15);
    for col in [18, 37, 55] {
        grid.set(14, col, 0);
    }
    for col in 24..28 {
        grid.set(11, col, 4);
    }
    for col in [12, 30, 45, 62, 70] {
        grid.set(14, col, 16);
    }
    grid.set(14, 8, 11);
    grid.set(14, 50, 17);
    grid.set(14, 78, 20);
    grid
}

fn print_snapshot(sim: &mut SimWorld) {
    let snapshot = sim.snapshot();

    for entity in &snapshot.entities {
        println!(
            "  {:>6} #{}: world=({:.1}, {:.1}) screen_x={:.1} hp={:.0} ammo={} [{} {}]{}",
            entity.role,
            entity.id,
            entity.x,
            entity.y,
            entity.draw.x,
            entity.health,
            entity.ammo,
            entity.action,
            entity.frame_index,
            if entity.alive { "" } else { " dead" },
        );
    }
    println!(
        "  projectiles={} visible tiles={}",
        snapshot.projectiles.len(),
        snapshot.tiles.len()
    );
}
