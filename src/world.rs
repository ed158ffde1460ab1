//! World state and the simulation step loop.

use crate::agent::{AgentId, AgentKind, CleanerAgent, DirtAgent};
use crate::config::Config;
use crate::grid::Grid;
use crate::schedule::Schedule;
use crate::stats::{self, Stats, StatsHistory};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// The simulation world.
///
/// Owns the grid, both agent schedules, and the shared seeded RNG. The run
/// state moves from running to stopped exactly once, when the cumulative
/// cleaned count reaches the configured dirt population; a stopped world
/// ignores further `step()` calls.
pub struct World {
    // Environment
    pub grid: Grid,

    // Populations
    pub cleaners: Schedule<CleanerAgent>,
    pub dirt: Schedule<DirtAgent>,

    // State
    pub time: u64,
    pub running: bool,

    // Configuration
    pub config: Config,

    // Statistics
    pub stats: Stats,
    pub stats_history: StatsHistory,

    // Stop threshold: the initial dirt population
    dirt_target: u64,

    // Random number generator (seeded for reproducibility)
    rng: ChaCha8Rng,
    seed: u64,
}

impl World {
    /// Create a new world with the given configuration
    pub fn new(config: Config) -> Self {
        let seed = rand::thread_rng().gen();
        Self::new_with_seed(config, seed)
    }

    /// Create a new world with a specific seed for reproducibility
    pub fn new_with_seed(config: Config, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut grid = Grid::new(config.world.width, config.world.height);

        let mut cleaners = Schedule::new();
        let mut dirt = Schedule::new();
        let mut next_id: AgentId = 0;

        // Cleaners all start in the origin cell.
        for _ in 0..config.agents.cleaners {
            let agent = CleanerAgent::new(next_id);
            next_id += 1;
            grid.place(agent.occupant(), (0, 0));
            cleaners.add(agent);
        }

        // Dirt is scattered uniformly.
        for _ in 0..config.agents.dirt {
            let agent = DirtAgent::new(next_id);
            next_id += 1;
            let x = rng.gen_range(0..grid.width() as i32);
            let y = rng.gen_range(0..grid.height() as i32);
            grid.place(agent.occupant(), (x, y));
            dirt.add(agent);
        }

        let dirt_target = config.agents.dirt as u64;
        let stats_history = StatsHistory::new(config.logging.stats_interval);

        Self {
            grid,
            cleaners,
            dirt,
            time: 0,
            running: true,
            config,
            stats: Stats::new(),
            stats_history,
            dirt_target,
            rng,
            seed,
        }
    }

    /// Main simulation step. No-op once the world has stopped.
    pub fn step(&mut self) {
        if !self.running {
            return;
        }

        // Phase 1: Snapshot metrics for the current state
        self.record_stats();

        // Phase 2: Activate cleaners; dirt has no behavior and is never stepped
        self.cleaners.step(&mut self.grid, &mut self.rng);

        // Phase 3: Drop cleaned dirt from its schedule
        let grid = &self.grid;
        self.dirt.retain(|d| grid.contains(d.id));

        self.time += 1;

        // Phase 4: Stop once every dirt agent placed at start has been cleaned
        if self.total_cleaned() == self.dirt_target {
            self.running = false;
            log::info!(
                "all {} dirt agents cleaned after {} steps",
                self.dirt_target,
                self.time
            );
        }
    }

    /// Step until the world stops or the ceiling is reached. The ceiling
    /// guarantees termination independently of the stop condition.
    pub fn run(&mut self, max_steps: u64) {
        for _ in 0..max_steps {
            if !self.running {
                break;
            }
            self.step();
        }
    }

    /// Run with a callback invoked after every step, for external consumers
    /// that render or record per-step state.
    pub fn run_with_callback<F>(&mut self, max_steps: u64, mut callback: F)
    where
        F: FnMut(&World, u64),
    {
        for i in 0..max_steps {
            if !self.running {
                break;
            }
            self.step();
            callback(self, i);
        }
    }

    /// Sum of all cleaners' cleaned counters.
    pub fn total_cleaned(&self) -> u64 {
        stats::total_cleaned(self.cleaners.agents())
    }

    /// Gini coefficient over the per-cleaner cleaned counts.
    pub fn gini(&self) -> f64 {
        let counts: Vec<u64> = self.cleaners.iter().map(|c| c.cleaned).collect();
        stats::gini(&counts)
    }

    /// Dirt agents still on the grid.
    pub fn dirt_remaining(&self) -> usize {
        self.dirt.len()
    }

    /// The stop threshold: the dirt population placed at construction.
    pub fn dirt_target(&self) -> u64 {
        self.dirt_target
    }

    /// Get seed for reproducibility
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Serializable view of the world for external renderers.
    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot::from_world(self)
    }

    fn record_stats(&mut self) {
        self.stats.time = self.time;
        self.stats.update(self.cleaners.agents(), self.dirt.len());

        if self.time % self.stats_history.interval == 0 {
            log::debug!("recording stats at step {}", self.time);
            self.stats_history.record(self.stats.clone());
        }
    }
}

/// Per-step view of the world consumed by renderers and chart recorders.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub time: u64,
    pub running: bool,
    pub width: usize,
    pub height: usize,
    pub total_cleaned: u64,
    pub gini: f64,
    pub agents: Vec<AgentView>,
}

/// One agent's position and state inside a snapshot.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AgentView {
    pub id: AgentId,
    pub kind: AgentKind,
    pub x: i32,
    pub y: i32,
    /// Cleaned count; `None` for dirt agents.
    pub cleaned: Option<u64>,
}

impl WorldSnapshot {
    /// Capture the current world state.
    pub fn from_world(world: &World) -> Self {
        let mut agents = Vec::with_capacity(world.grid.agent_count());

        for cleaner in world.cleaners.iter() {
            let (x, y) = world
                .grid
                .position_of(cleaner.id)
                .unwrap_or_else(|| panic!("cleaner {} is not on the grid", cleaner.id));
            agents.push(AgentView {
                id: cleaner.id,
                kind: AgentKind::Cleaner,
                x,
                y,
                cleaned: Some(cleaner.cleaned),
            });
        }

        for dirt in world.dirt.iter() {
            let (x, y) = world
                .grid
                .position_of(dirt.id)
                .unwrap_or_else(|| panic!("dirt {} is not on the grid", dirt.id));
            agents.push(AgentView {
                id: dirt.id,
                kind: AgentKind::Dirt,
                x,
                y,
                cleaned: None,
            });
        }

        Self {
            time: world.time,
            running: world.running,
            width: world.grid.width(),
            height: world.grid.height(),
            total_cleaned: world.total_cleaned(),
            gini: world.gini(),
            agents,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config::default()
    }

    #[test]
    fn test_world_creation() {
        let world = World::new_with_seed(test_config(), 42);

        assert_eq!(world.cleaners.len(), 3);
        assert_eq!(world.dirt_remaining(), 10);
        assert_eq!(world.grid.agent_count(), 13);
        assert_eq!(world.time, 0);
        assert!(world.running);

        // All cleaners start at the origin.
        let origin_cleaners = world
            .grid
            .contents_of((0, 0))
            .iter()
            .filter(|o| o.kind == AgentKind::Cleaner)
            .count();
        assert_eq!(origin_cleaners, 3);
    }

    #[test]
    fn test_step_advances_time_and_keeps_cleaners() {
        let mut world = World::new_with_seed(test_config(), 42);
        world.step();

        assert_eq!(world.time, 1);
        assert_eq!(world.cleaners.len(), 3);
        assert_eq!(world.grid.count_kind(AgentKind::Cleaner), 3);
        assert!(world.dirt_remaining() <= 10);
    }

    #[test]
    fn test_dirt_schedule_tracks_grid_presence() {
        let mut world = World::new_with_seed(test_config(), 42);
        world.run(5_000);

        for dirt in world.dirt.iter() {
            assert!(world.grid.contains(dirt.id));
        }
        assert_eq!(world.dirt_remaining(), world.grid.count_kind(AgentKind::Dirt));
    }

    #[test]
    fn test_zero_dirt_stops_at_first_step() {
        let mut config = test_config();
        config.agents.dirt = 0;
        let mut world = World::new_with_seed(config, 42);

        assert!(world.running);
        world.step();

        assert_eq!(world.time, 1);
        assert!(!world.running);
        assert_eq!(world.total_cleaned(), 0);
    }

    #[test]
    fn test_stopped_world_ignores_steps() {
        let mut config = test_config();
        config.agents.dirt = 0;
        let mut world = World::new_with_seed(config, 42);

        world.step();
        assert!(!world.running);

        let stopped_at = world.time;
        world.step();
        world.run(100);
        assert_eq!(world.time, stopped_at);
    }

    #[test]
    fn test_cleaned_counters_monotonic() {
        let mut world = World::new_with_seed(test_config(), 123);
        let mut previous: Vec<u64> = world.cleaners.iter().map(|c| c.cleaned).collect();

        for _ in 0..500 {
            if !world.running {
                break;
            }
            world.step();
            let current: Vec<u64> = world.cleaners.iter().map(|c| c.cleaned).collect();
            for (before, after) in previous.iter().zip(&current) {
                assert!(after >= before, "cleaned counter decreased");
            }
            previous = current;
        }
    }

    #[test]
    fn test_stats_recorded_every_interval() {
        let mut config = test_config();
        config.logging.stats_interval = 5;
        let mut world = World::new_with_seed(config, 42);

        world.run(20);
        let times: Vec<u64> = world.stats_history.snapshots.iter().map(|s| s.time).collect();
        // A snapshot is taken before each step whose time is a multiple of 5.
        let expected: Vec<u64> = (0..world.time).filter(|t| t % 5 == 0).collect();
        assert_eq!(times, expected);
    }

    #[test]
    fn test_snapshot_reflects_world() {
        let world = World::new_with_seed(test_config(), 42);
        let snapshot = world.snapshot();

        assert_eq!(snapshot.time, 0);
        assert!(snapshot.running);
        assert_eq!(snapshot.width, 10);
        assert_eq!(snapshot.height, 10);
        assert_eq!(snapshot.agents.len(), 13);
        assert_eq!(snapshot.total_cleaned, 0);
        assert_eq!(snapshot.gini, 0.0);

        let dirt_views = snapshot
            .agents
            .iter()
            .filter(|a| a.kind == AgentKind::Dirt)
            .count();
        assert_eq!(dirt_views, 10);
        for view in &snapshot.agents {
            assert!(view.x >= 0 && view.x < 10);
            assert!(view.y >= 0 && view.y < 10);
            match view.kind {
                AgentKind::Cleaner => assert_eq!(view.cleaned, Some(0)),
                AgentKind::Dirt => assert_eq!(view.cleaned, None),
            }
        }
    }

    #[test]
    fn test_reproducibility() {
        let mut world1 = World::new_with_seed(test_config(), 99);
        let mut world2 = World::new_with_seed(test_config(), 99);

        world1.run(200);
        world2.run(200);

        assert_eq!(world1.time, world2.time);
        assert_eq!(world1.total_cleaned(), world2.total_cleaned());

        let snap1 = serde_json::to_string(&world1.snapshot()).unwrap();
        let snap2 = serde_json::to_string(&world2.snapshot()).unwrap();
        assert_eq!(snap1, snap2);
    }
}
