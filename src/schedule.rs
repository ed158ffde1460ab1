//! Random-activation scheduling.

use crate::agent::{Agent, AgentId};
use crate::grid::Grid;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;

/// Drives one tick over a homogeneous agent population.
///
/// Visit order is re-shuffled on every pass from the caller's RNG, so runs
/// are reproducible exactly when that RNG is seeded. The order is fixed from
/// a snapshot taken at the start of the pass: agents removed mid-pass are
/// skipped, agents added mid-pass wait for the next pass.
pub struct Schedule<A: Agent> {
    agents: Vec<A>,
    index: HashMap<AgentId, usize>,
}

impl<A: Agent> Schedule<A> {
    pub fn new() -> Self {
        Self {
            agents: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register an agent. Duplicate ids are a contract violation.
    pub fn add(&mut self, agent: A) {
        let id = agent.id();
        assert!(
            !self.index.contains_key(&id),
            "duplicate agent id {id} registered"
        );
        self.index.insert(id, self.agents.len());
        self.agents.push(agent);
    }

    /// Unregister and return an agent.
    ///
    /// Panics if the id is not scheduled.
    pub fn remove(&mut self, id: AgentId) -> A {
        let slot = self
            .index
            .remove(&id)
            .unwrap_or_else(|| panic!("agent {id} is not scheduled"));
        let agent = self.agents.swap_remove(slot);
        if let Some(moved) = self.agents.get(slot) {
            self.index.insert(moved.id(), slot);
        }
        agent
    }

    /// Keep only the agents matching the predicate.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&A) -> bool,
    {
        self.agents.retain(|agent| keep(agent));
        self.index = self
            .agents
            .iter()
            .enumerate()
            .map(|(slot, agent)| (agent.id(), slot))
            .collect();
    }

    /// Visit every agent registered at the start of the pass exactly once,
    /// in a freshly shuffled order, invoking its behavior.
    pub fn step(&mut self, grid: &mut Grid, rng: &mut ChaCha8Rng) {
        let mut order: Vec<AgentId> = self.agents.iter().map(|a| a.id()).collect();
        order.shuffle(rng);
        for id in order {
            if let Some(&slot) = self.index.get(&id) {
                self.agents[slot].act(grid, rng);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn contains(&self, id: AgentId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn get(&self, id: AgentId) -> Option<&A> {
        self.index.get(&id).map(|&slot| &self.agents[slot])
    }

    /// All registered agents, in registration-slot order.
    pub fn agents(&self) -> &[A] {
        &self.agents
    }

    pub fn iter(&self) -> std::slice::Iter<'_, A> {
        self.agents.iter()
    }
}

impl<A: Agent> Default for Schedule<A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentKind;
    use rand::SeedableRng;

    /// Counts its own activations; never touches the grid.
    struct TickCounter {
        id: AgentId,
        ticks: u32,
    }

    impl Agent for TickCounter {
        fn id(&self) -> AgentId {
            self.id
        }

        fn kind(&self) -> AgentKind {
            AgentKind::Cleaner
        }

        fn act(&mut self, _grid: &mut Grid, _rng: &mut ChaCha8Rng) {
            self.ticks += 1;
        }
    }

    fn counters(n: u64) -> Schedule<TickCounter> {
        let mut schedule = Schedule::new();
        for id in 0..n {
            schedule.add(TickCounter { id, ticks: 0 });
        }
        schedule
    }

    #[test]
    fn test_add_and_lookup() {
        let schedule = counters(3);
        assert_eq!(schedule.len(), 3);
        assert!(schedule.contains(1));
        assert!(!schedule.contains(9));
        assert_eq!(schedule.get(2).map(|a| a.id), Some(2));
    }

    #[test]
    #[should_panic(expected = "duplicate agent id")]
    fn test_duplicate_id_panics() {
        let mut schedule = counters(2);
        schedule.add(TickCounter { id: 1, ticks: 0 });
    }

    #[test]
    fn test_step_visits_each_agent_exactly_once() {
        let mut schedule = counters(10);
        let mut grid = Grid::new(3, 3);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        schedule.step(&mut grid, &mut rng);
        for agent in schedule.iter() {
            assert_eq!(agent.ticks, 1);
        }

        schedule.step(&mut grid, &mut rng);
        for agent in schedule.iter() {
            assert_eq!(agent.ticks, 2);
        }
    }

    #[test]
    fn test_remove_keeps_index_consistent() {
        let mut schedule = counters(4);
        let removed = schedule.remove(1);
        assert_eq!(removed.id, 1);
        assert_eq!(schedule.len(), 3);
        assert!(!schedule.contains(1));

        // Lookups still resolve after the swap-removal reshuffled slots.
        for id in [0, 2, 3] {
            assert_eq!(schedule.get(id).map(|a| a.id), Some(id));
        }
    }

    #[test]
    #[should_panic(expected = "is not scheduled")]
    fn test_remove_unknown_id_panics() {
        let mut schedule = counters(2);
        schedule.remove(5);
    }

    #[test]
    fn test_retain_drops_unmatched_agents() {
        let mut schedule = counters(6);
        schedule.retain(|agent| agent.id % 2 == 0);

        assert_eq!(schedule.len(), 3);
        for id in [0, 2, 4] {
            assert_eq!(schedule.get(id).map(|a| a.id), Some(id));
        }

        let mut grid = Grid::new(3, 3);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        schedule.step(&mut grid, &mut rng);
        for agent in schedule.iter() {
            assert_eq!(agent.ticks, 1);
        }
    }
}
