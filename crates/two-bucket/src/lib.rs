//! Solver library for the two-bucket water puzzle.
//!
//! Given two buckets of fixed capacity, the bucket that must be filled
//! first and a goal amount, this crate finds the minimum number of fill,
//! empty and pour moves that leaves the goal amount in either bucket.

pub mod error;
pub mod moves;
pub mod puzzle;
pub mod rules;
pub mod solver;

// Re-export main types
pub use error::{InvalidSpec, SolveError};
pub use moves::{successors, Action};
pub use puzzle::{Bucket, BucketStats, PuzzleSpec, State};
pub use rules::{check_reachable, gcd, is_forbidden};
pub use solver::{solve, solve_with_config, SearchStatistics, Solution, SolverConfig, Step};
