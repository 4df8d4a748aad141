use core::fmt;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// No solver result yet.
    Pending,
    Win,
    Lose,
    /// The solver failed on this problem.
    Error,
}

impl Outcome {
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Pending)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Win => "WIN",
            Self::Lose => "LOSE",
            Self::Error => "ERROR",
        }
    }
}

impl Default for Outcome {
    fn default() -> Self {
        Self::Pending
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    id: u32,
    grid: Grid,
    moves: MoveList,
    outcome: Outcome,
}

impl Problem {
    /// A freshly generated problem, not yet run through the solver.
    pub fn new(id: u32, grid: Grid) -> Self {
        Self {
            id,
            grid,
            moves: MoveList::new(),
            outcome: Outcome::Pending,
        }
    }

    /// Attaches the solver's trace and outcome in one step. The grid is carried over untouched.
    pub fn resolve(self, moves: MoveList, outcome: Outcome) -> Self {
        Self {
            moves,
            outcome,
            ..self
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn moves(&self) -> &MoveList {
        &self.moves
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn total_moves(&self) -> usize {
        self.moves.len()
    }
}
