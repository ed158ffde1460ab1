//! Minimal sweepsim run: construct, step, inspect.

use sweepsim::{Config, World};

fn main() {
    let config = Config::default();
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.log_level.as_str()),
    )
    .init();

    // Create world with seeded RNG for reproducibility
    let mut world = World::new_with_seed(config, 42);

    println!("Initial state:");
    println!(
        "  Grid: {}x{}",
        world.config.world.width, world.config.world.height
    );
    println!("  Cleaners: {}", world.cleaners.len());
    println!("  Dirt: {}", world.dirt_remaining());
    println!();

    let max_steps = 100_000;
    while world.running && world.time < max_steps {
        world.step();

        // Print progress every 50 steps
        if world.time % 50 == 0 {
            println!("{}", world.stats.summary());
        }
    }

    println!();
    println!("Final state:");
    println!("  Steps: {}", world.time);
    println!("  Total cleaned: {}", world.total_cleaned());
    println!("  Dirt remaining: {}", world.dirt_remaining());
    println!("  Gini: {:.3}", world.gini());
    println!("  Stopped: {}", !world.running);
}
