//! Agent kinds and per-tick behavior.

use crate::grid::{Grid, Occupant};
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Unique agent identifier
pub type AgentId = u64;

/// Tag distinguishing the two agent populations on the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentKind {
    Cleaner,
    Dirt,
}

/// One tick of behavior for a scheduled agent.
///
/// The scheduler is generic over this trait. An agent sees the grid and the
/// world's shared RNG, nothing else; the world itself is not visible from
/// inside a tick.
pub trait Agent {
    fn id(&self) -> AgentId;
    fn kind(&self) -> AgentKind;
    fn act(&mut self, grid: &mut Grid, rng: &mut ChaCha8Rng);
}

/// A mobile cleaner. Each tick it moves to a random Moore-adjacent cell and
/// removes one dirt occupant from that cell if any is present.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CleanerAgent {
    pub id: AgentId,
    /// Dirt agents removed by this cleaner so far.
    pub cleaned: u64,
}

impl CleanerAgent {
    pub fn new(id: AgentId) -> Self {
        Self { id, cleaned: 0 }
    }

    /// Grid entry for this agent.
    pub fn occupant(&self) -> Occupant {
        Occupant {
            id: self.id,
            kind: AgentKind::Cleaner,
        }
    }

    /// Move to one of the 8 Moore-adjacent cells, chosen uniformly from the
    /// shared RNG. On degenerate grids the wrapped neighborhood may collapse
    /// to fewer cells (including the current one).
    fn random_move(&self, grid: &mut Grid, rng: &mut ChaCha8Rng) {
        let position = grid
            .position_of(self.id)
            .unwrap_or_else(|| panic!("cleaner {} is not on the grid", self.id));
        let options = grid.neighborhood(position, false);
        if let Some(&target) = options.choose(rng) {
            grid.move_agent(self.id, target);
        }
    }

    /// Remove one dirt occupant from the current cell, if any. Ties between
    /// several dirt occupants break to the first in the cell's contents.
    fn clean(&mut self, grid: &mut Grid) {
        let position = grid
            .position_of(self.id)
            .unwrap_or_else(|| panic!("cleaner {} is not on the grid", self.id));
        let found = grid
            .contents_of(position)
            .iter()
            .find(|o| o.kind == AgentKind::Dirt)
            .map(|o| o.id);
        if let Some(dirt_id) = found {
            grid.remove(dirt_id);
            self.cleaned += 1;
        }
    }
}

impl Agent for CleanerAgent {
    fn id(&self) -> AgentId {
        self.id
    }

    fn kind(&self) -> AgentKind {
        AgentKind::Cleaner
    }

    /// Both phases run every tick, move first.
    fn act(&mut self, grid: &mut Grid, rng: &mut ChaCha8Rng) {
        self.random_move(grid, rng);
        self.clean(grid);
    }
}

/// A static dirt marker. Exists purely as an occupant to be removed; it has
/// no state beyond identity and its tick is a no-op.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DirtAgent {
    pub id: AgentId,
}

impl DirtAgent {
    pub fn new(id: AgentId) -> Self {
        Self { id }
    }

    /// Grid entry for this agent.
    pub fn occupant(&self) -> Occupant {
        Occupant {
            id: self.id,
            kind: AgentKind::Dirt,
        }
    }
}

impl Agent for DirtAgent {
    fn id(&self) -> AgentId {
        self.id
    }

    fn kind(&self) -> AgentKind {
        AgentKind::Dirt
    }

    fn act(&mut self, _grid: &mut Grid, _rng: &mut ChaCha8Rng) {}
}
