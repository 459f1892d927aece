//! The unit actions of the puzzle and successor generation.
//!
//! Every action costs exactly one move. Successors are always produced in
//! the same canonical order so that ties between equally short solutions
//! resolve the same way on every run.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::puzzle::{Bucket, PuzzleSpec, State};

/// A single move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Empty(Bucket),
    Fill(Bucket),
    Pour { from: Bucket, to: Bucket },
}

/// Canonical generation order: empty one, empty two, fill one, fill two,
/// pour one into two, pour two into one
pub const CANONICAL_ORDER: [Action; 6] = [
    Action::Empty(Bucket::One),
    Action::Empty(Bucket::Two),
    Action::Fill(Bucket::One),
    Action::Fill(Bucket::Two),
    Action::Pour {
        from: Bucket::One,
        to: Bucket::Two,
    },
    Action::Pour {
        from: Bucket::Two,
        to: Bucket::One,
    },
];

/// Successor list; at most six entries so it never leaves the stack
pub type Successors = SmallVec<[(Action, State); 6]>;

impl Action {
    /// Apply this action to `state`.
    ///
    /// Returns `None` when the action does nothing: emptying an empty
    /// bucket, filling a full one, or pouring from an empty bucket or into
    /// a full one.
    pub fn apply(self, state: State, spec: &PuzzleSpec) -> Option<State> {
        match self {
            Action::Empty(bucket) => {
                if state.level(bucket) == 0 {
                    return None;
                }
                Some(with_level(state, bucket, 0))
            }
            Action::Fill(bucket) => {
                let capacity = spec.capacity(bucket);
                if state.level(bucket) >= capacity {
                    return None;
                }
                Some(with_level(state, bucket, capacity))
            }
            Action::Pour { from, to } => {
                if from == to {
                    return None;
                }
                let available = state.level(from);
                let room = spec.capacity(to).saturating_sub(state.level(to));
                if available == 0 || room == 0 {
                    return None;
                }
                let amount = available.min(room);
                let drained = with_level(state, from, available - amount);
                Some(with_level(drained, to, state.level(to) + amount))
            }
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Empty(bucket) => write!(f, "empty bucket {}", bucket),
            Action::Fill(bucket) => write!(f, "fill bucket {}", bucket),
            Action::Pour { from, to } => write!(f, "pour bucket {} into bucket {}", from, to),
        }
    }
}

fn with_level(state: State, bucket: Bucket, level: u32) -> State {
    match bucket {
        Bucket::One => State::new(level, state.two),
        Bucket::Two => State::new(state.one, level),
    }
}

/// All states reachable from `state` in one move, in canonical order.
///
/// The forbidden-state rule is not applied here; see `rules::is_forbidden`.
pub fn successors(state: State, spec: &PuzzleSpec) -> Successors {
    CANONICAL_ORDER
        .iter()
        .filter_map(|&action| action.apply(state, spec).map(|next| (action, next)))
        .collect()
}
