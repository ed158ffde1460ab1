//! # SWEEPSIM
//!
//! Grid-based cleaning-robot simulator with inequality metrics.
//!
//! Cleaner agents wander a toroidal grid in randomized order, removing dirt
//! agents from the cells they land on. The run stops once every dirt agent
//! placed at construction has been cleaned. Each step records the total
//! cleaned count, the per-cleaner counts, and the Gini coefficient over
//! them.
//!
//! ## Features
//!
//! - **Explicit**: no global state; construct a world, step it, inspect it
//! - **Reproducible**: all randomness flows from one seedable RNG
//! - **Observable**: per-step stats history plus serializable snapshots for
//!   external renderers
//! - **Configurable**: YAML configuration files
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sweepsim::{Config, World};
//!
//! // Create world with default config (10x10 grid, 3 cleaners, 10 dirt)
//! let config = Config::default();
//! let mut world = World::new_with_seed(config, 42);
//!
//! // Step until all dirt is cleaned, with a ceiling to guarantee termination
//! world.run(100_000);
//!
//! println!("Stopped after {} steps", world.time);
//! println!("Gini: {:.3}", world.gini());
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use sweepsim::Config;
//!
//! let mut config = Config::default();
//! config.world.width = 20;
//! config.agents.dirt = 40;
//! assert!(config.validate().is_ok());
//! ```

pub mod agent;
pub mod config;
pub mod grid;
pub mod schedule;
pub mod stats;
pub mod world;

// Re-export main types
pub use config::Config;
pub use world::World;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run a quick benchmark
pub fn benchmark(max_steps: u64, cleaners: usize, dirt: usize) -> BenchmarkResult {
    use std::time::Instant;

    let mut config = Config::default();
    config.agents.cleaners = cleaners;
    config.agents.dirt = dirt;

    let mut world = World::new(config);

    let start = Instant::now();
    world.run(max_steps);
    let elapsed = start.elapsed();

    BenchmarkResult {
        steps: world.time,
        cleaners,
        dirt,
        total_cleaned: world.total_cleaned(),
        stopped: !world.running,
        elapsed_secs: elapsed.as_secs_f64(),
        steps_per_second: world.time as f64 / elapsed.as_secs_f64(),
    }
}

/// Benchmark result
#[derive(Debug, Clone)]
pub struct BenchmarkResult {
    pub steps: u64,
    pub cleaners: usize,
    pub dirt: usize,
    pub total_cleaned: u64,
    pub stopped: bool,
    pub elapsed_secs: f64,
    pub steps_per_second: f64,
}

impl std::fmt::Display for BenchmarkResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Benchmark Results ===")?;
        writeln!(f, "Steps: {}", self.steps)?;
        writeln!(f, "Cleaners: {}", self.cleaners)?;
        writeln!(f, "Dirt: {} -> {} cleaned", self.dirt, self.total_cleaned)?;
        writeln!(f, "Stopped: {}", self.stopped)?;
        writeln!(f, "Time: {:.3}s", self.elapsed_secs)?;
        writeln!(f, "Speed: {:.1} steps/s", self.steps_per_second)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_quick_simulation() {
        let config = Config::default();
        let mut world = World::new_with_seed(config, 42);

        world.run(100);

        assert!(world.time <= 100);
        assert!(world.time > 0);
    }

    #[test]
    fn test_benchmark() {
        let result = benchmark(100, 3, 10);

        assert!(result.steps <= 100);
        assert!(result.steps_per_second > 0.0);
    }
}
