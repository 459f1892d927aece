//! Error types for puzzle validation and search.

use crate::puzzle::Bucket;

/// Reasons a puzzle definition is rejected before any search runs
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidSpec {
    #[error("bucket {bucket} must have a positive capacity")]
    ZeroCapacity { bucket: Bucket },

    #[error("goal must be a positive number of liters")]
    ZeroGoal,

    #[error("unknown bucket name {0:?} (expected one of: one, two, a, b, 1, 2)")]
    UnknownBucket(String),
}

/// Errors returned by the solver
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SolveError {
    #[error("invalid puzzle: {0}")]
    InvalidSpec(#[from] InvalidSpec),

    #[error("no sequence of moves measures {goal} liters with buckets of {capacity_one} and {capacity_two}")]
    NoSolution {
        goal: u32,
        capacity_one: u32,
        capacity_two: u32,
    },

    #[error("search gave up after discovering {limit} states")]
    StateBudgetExceeded { limit: usize },
}

impl SolveError {
    /// Short machine-readable tag used in JSON output
    pub fn kind(&self) -> &'static str {
        match self {
            SolveError::InvalidSpec(_) => "invalid_spec",
            SolveError::NoSolution { .. } => "no_solution",
            SolveError::StateBudgetExceeded { .. } => "state_budget_exceeded",
        }
    }
}
