//! Puzzle rules that prune the search space.
//!
//! The forbidden-state rule removes one configuration from the graph
//! entirely. The reachability checks reject puzzles that no search could
//! solve, so the solver can skip the search.

use crate::error::SolveError;
use crate::puzzle::{PuzzleSpec, State};

/// Check whether a move may land on `state`.
///
/// After any action the start bucket may not be empty while the other
/// bucket is full. The opening fill is never subject to this rule.
pub fn is_forbidden(state: State, spec: &PuzzleSpec) -> bool {
    let start = spec.start_bucket;
    let other = start.other();
    state.level(start) == 0 && state.level(other) == spec.capacity(other)
}

/// Greatest common divisor
pub fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Reject puzzles whose goal can never be measured.
///
/// Every reachable level is a multiple of `gcd(capacity_one, capacity_two)`
/// and no bucket can hold more than its capacity. Passing this check does
/// not guarantee a solution, because the forbidden-state rule may still
/// cut the goal off.
pub fn check_reachable(spec: &PuzzleSpec) -> Result<(), SolveError> {
    let no_solution = || SolveError::NoSolution {
        goal: spec.goal,
        capacity_one: spec.capacity_one,
        capacity_two: spec.capacity_two,
    };

    if spec.goal > spec.capacity_one.max(spec.capacity_two) {
        return Err(no_solution());
    }

    let divisor = gcd(spec.capacity_one, spec.capacity_two);
    if divisor != 0 && spec.goal % divisor != 0 {
        return Err(no_solution());
    }

    Ok(())
}
