//! Metrics and per-step statistics.

use crate::agent::{AgentId, CleanerAgent};
use serde::{Deserialize, Serialize};

/// Gini coefficient over a distribution of non-negative counts.
///
/// Computed over the ascending-sorted values `x[0..N-1]` as `1 + 1/N - 2B`
/// with `B = (Σ x[i]·(N−i)) / (N·Σx)`, index zero-based. The degenerate
/// cases (empty input, or all values zero) return 0.0 by convention: a run
/// where nothing has been cleaned yet reads as perfectly equal.
pub fn gini(values: &[u64]) -> f64 {
    let n = values.len();
    if n == 0 {
        return 0.0;
    }
    let total: u64 = values.iter().sum();
    if total == 0 {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_unstable();

    let weighted: f64 = sorted
        .iter()
        .enumerate()
        .map(|(i, &x)| x as f64 * (n - i) as f64)
        .sum();
    let b = weighted / (n as f64 * total as f64);
    1.0 + 1.0 / n as f64 - 2.0 * b
}

/// Sum of cleaned counters across a cleaner population.
pub fn total_cleaned(cleaners: &[CleanerAgent]) -> u64 {
    cleaners.iter().map(|c| c.cleaned).sum()
}

/// Per-cleaner cleaned count, as recorded each step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentCount {
    pub id: AgentId,
    pub cleaned: u64,
}

/// Statistics snapshot for a simulation step
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Stats {
    /// Simulation time the snapshot was taken at
    pub time: u64,
    /// Cleaner population size
    pub cleaners: usize,
    /// Dirt agents still on the grid
    pub dirt_remaining: usize,
    /// Sum of all cleaned counters
    pub total_cleaned: u64,
    /// Gini coefficient over per-cleaner cleaned counts
    pub gini: f64,
    /// Per-cleaner counts backing the Gini computation
    pub per_agent: Vec<AgentCount>,
}

impl Stats {
    /// Create new empty stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Update from the current population state.
    pub fn update(&mut self, cleaners: &[CleanerAgent], dirt_remaining: usize) {
        self.cleaners = cleaners.len();
        self.dirt_remaining = dirt_remaining;
        self.total_cleaned = total_cleaned(cleaners);

        let counts: Vec<u64> = cleaners.iter().map(|c| c.cleaned).collect();
        self.gini = gini(&counts);
        self.per_agent = cleaners
            .iter()
            .map(|c| AgentCount {
                id: c.id,
                cleaned: c.cleaned,
            })
            .collect();
    }

    /// Format stats as a one-line summary
    pub fn summary(&self) -> String {
        format!(
            "T:{:6} | Cleaners:{:3} | Dirt:{:4} | Cleaned:{:4} | Gini:{:.3}",
            self.time, self.cleaners, self.dirt_remaining, self.total_cleaned, self.gini
        )
    }

    /// Save stats to JSON file
    pub fn save_json(&self, path: &str) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
    }

    /// Load stats from JSON file
    pub fn load_json(path: &str) -> std::io::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}

/// Historical statistics tracker
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StatsHistory {
    /// All recorded stats snapshots
    pub snapshots: Vec<Stats>,
    /// Recording interval in steps
    pub interval: u64,
}

impl StatsHistory {
    /// Create new history with recording interval
    pub fn new(interval: u64) -> Self {
        Self {
            snapshots: Vec::new(),
            interval,
        }
    }

    /// Record a stats snapshot
    pub fn record(&mut self, stats: Stats) {
        self.snapshots.push(stats);
    }

    /// Gini coefficient over time
    pub fn gini_series(&self) -> Vec<(u64, f64)> {
        self.snapshots.iter().map(|s| (s.time, s.gini)).collect()
    }

    /// Total cleaned count over time
    pub fn cleaned_series(&self) -> Vec<(u64, u64)> {
        self.snapshots
            .iter()
            .map(|s| (s.time, s.total_cleaned))
            .collect()
    }

    /// One cleaner's count over time
    pub fn agent_series(&self, id: AgentId) -> Vec<(u64, u64)> {
        self.snapshots
            .iter()
            .filter_map(|s| {
                s.per_agent
                    .iter()
                    .find(|a| a.id == id)
                    .map(|a| (s.time, a.cleaned))
            })
            .collect()
    }

    /// Save history to file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let json = serde_json::to_string(self)?;
        std::fs::write(path, json)
    }

    /// Load history from file
    pub fn load(path: &str) -> std::io::Result<Self> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}
