//! Breadth-first search for the shortest sequence of moves.
//!
//! The search runs level by level from the state left by the mandatory
//! first fill. A state's move count is fixed when it is first enqueued, so
//! the first dequeued state holding the goal is a minimal answer and the
//! search stops there.

use std::collections::{HashMap, HashSet, VecDeque};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::SolveError;
use crate::moves::{successors, Action};
use crate::puzzle::{Bucket, BucketStats, PuzzleSpec, State};
use crate::rules::{check_reachable, is_forbidden};

/// Configuration for the solver
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Give up after discovering this many states (unlimited when `None`)
    pub max_states: Option<usize>,
    /// Keep backpointers so the winning sequence of moves can be reported
    pub record_trace: bool,
    /// Run the capacity and gcd checks before searching
    pub early_checks: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_states: None,
            record_trace: false,
            early_checks: true,
        }
    }
}

/// Counters collected during one search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchStatistics {
    /// States taken off the queue
    pub states_expanded: usize,
    /// States ever put on the queue, the opening fill included
    pub states_discovered: usize,
    /// Moves discarded because they landed on the forbidden state
    pub forbidden_rejections: usize,
}

/// One move of a reported solution and the levels it leaves behind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub action: Action,
    pub state: State,
}

/// Full result of a search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub stats: BucketStats,
    pub search: SearchStatistics,
    /// Every move from the first fill to the goal, when requested
    pub trace: Option<Vec<Step>>,
}

/// A state annotated with the number of moves taken to reach it
#[derive(Debug, Clone, Copy)]
struct SearchNode {
    state: State,
    moves: u32,
}

/// Solve a puzzle with the default configuration.
///
/// Returns the minimum number of moves, the bucket that ends up holding
/// the goal and the level of the other bucket.
pub fn solve(spec: &PuzzleSpec) -> Result<BucketStats, SolveError> {
    solve_with_config(spec, &SolverConfig::default()).map(|solution| solution.stats)
}

/// Solve a puzzle, also reporting search statistics and optionally the
/// winning sequence of moves.
pub fn solve_with_config(
    spec: &PuzzleSpec,
    config: &SolverConfig,
) -> Result<Solution, SolveError> {
    spec.validate()?;
    if config.early_checks {
        check_reachable(spec)?;
    }

    debug!(
        capacity_one = spec.capacity_one,
        capacity_two = spec.capacity_two,
        goal = spec.goal,
        start = %spec.start_bucket,
        "starting search"
    );

    let mut search = SearchStatistics::default();
    let opening = spec.opening_state();

    // Both buckets empty is where the puzzle begins, so it never needs a visit
    let mut visited: HashSet<State> = HashSet::new();
    visited.insert(State::EMPTY);
    visited.insert(opening);

    let mut parents: HashMap<State, (Action, State)> = HashMap::new();

    let mut queue: VecDeque<SearchNode> = VecDeque::new();
    discover(&mut search, config)?;
    queue.push_back(SearchNode {
        state: opening,
        moves: 1,
    });

    while let Some(node) = queue.pop_front() {
        search.states_expanded += 1;
        trace!(state = %node.state, moves = node.moves, "expanding");

        if let Some(stats) = goal_reached(node, spec.goal) {
            debug!(
                moves = stats.moves,
                goal_bucket = %stats.goal_bucket,
                expanded = search.states_expanded,
                discovered = search.states_discovered,
                "goal reached"
            );
            let trace = config
                .record_trace
                .then(|| reconstruct_trace(spec, &parents, node.state));
            return Ok(Solution {
                stats,
                search,
                trace,
            });
        }

        for (action, next) in successors(node.state, spec) {
            if is_forbidden(next, spec) {
                search.forbidden_rejections += 1;
                continue;
            }
            if !visited.insert(next) {
                continue;
            }

            discover(&mut search, config)?;
            if config.record_trace {
                parents.insert(next, (action, node.state));
            }
            queue.push_back(SearchNode {
                state: next,
                moves: node.moves + 1,
            });
        }
    }

    debug!(
        expanded = search.states_expanded,
        forbidden = search.forbidden_rejections,
        "search exhausted"
    );
    Err(SolveError::NoSolution {
        goal: spec.goal,
        capacity_one: spec.capacity_one,
        capacity_two: spec.capacity_two,
    })
}

/// Count a newly enqueued state against the configured budget
fn discover(search: &mut SearchStatistics, config: &SolverConfig) -> Result<(), SolveError> {
    search.states_discovered += 1;
    match config.max_states {
        Some(limit) if search.states_discovered > limit => {
            debug!(limit, "state budget exceeded");
            Err(SolveError::StateBudgetExceeded { limit })
        }
        _ => Ok(()),
    }
}

/// Goal test; bucket one wins when both hold the goal
fn goal_reached(node: SearchNode, goal: u32) -> Option<BucketStats> {
    let (goal_bucket, other_bucket) = if node.state.one == goal {
        (Bucket::One, node.state.two)
    } else if node.state.two == goal {
        (Bucket::Two, node.state.one)
    } else {
        return None;
    };

    Some(BucketStats {
        moves: node.moves,
        goal_bucket,
        other_bucket,
    })
}

/// Walk backpointers from `end` to the opening fill
fn reconstruct_trace(
    spec: &PuzzleSpec,
    parents: &HashMap<State, (Action, State)>,
    end: State,
) -> Vec<Step> {
    let mut steps = Vec::new();
    let mut cursor = end;
    while let Some(&(action, previous)) = parents.get(&cursor) {
        steps.push(Step {
            action,
            state: cursor,
        });
        cursor = previous;
    }
    steps.push(Step {
        action: Action::Fill(spec.start_bucket),
        state: cursor,
    });
    steps.reverse();
    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn puzzle(capacity_one: u32, capacity_two: u32, goal: u32, start: Bucket) -> PuzzleSpec {
        PuzzleSpec::new(capacity_one, capacity_two, goal, start).unwrap()
    }

    fn expect(
        capacity_one: u32,
        capacity_two: u32,
        goal: u32,
        start: Bucket,
        moves: u32,
        goal_bucket: Bucket,
        other_bucket: u32,
    ) {
        assert_eq!(
            solve(&puzzle(capacity_one, capacity_two, goal, start)),
            Ok(BucketStats {
                moves,
                goal_bucket,
                other_bucket,
            })
        );
    }

    #[test]
    fn test_three_and_five_start_with_one() {
        expect(3, 5, 1, Bucket::One, 4, Bucket::One, 5);
    }

    #[test]
    fn test_three_and_five_start_with_two() {
        expect(3, 5, 1, Bucket::Two, 8, Bucket::Two, 3);
    }

    #[test]
    fn test_seven_and_eleven() {
        expect(7, 11, 2, Bucket::One, 14, Bucket::One, 11);
        expect(7, 11, 2, Bucket::Two, 18, Bucket::Two, 7);
    }

    #[test]
    fn test_goal_equal_to_start_bucket() {
        expect(1, 3, 3, Bucket::Two, 1, Bucket::Two, 0);
        expect(5, 3, 5, Bucket::One, 1, Bucket::One, 0);
        expect(1, 1, 1, Bucket::One, 1, Bucket::One, 0);
    }

    #[test]
    fn test_goal_equal_to_other_bucket() {
        expect(2, 3, 3, Bucket::One, 2, Bucket::Two, 2);
        expect(3, 5, 3, Bucket::Two, 2, Bucket::One, 5);
    }

    #[test]
    fn test_same_buckets_different_goal() {
        expect(6, 15, 9, Bucket::One, 10, Bucket::Two, 0);
    }

    #[test]
    fn test_other_known_answers() {
        expect(3, 5, 4, Bucket::One, 8, Bucket::Two, 0);
        expect(5, 3, 4, Bucket::One, 6, Bucket::One, 3);
        expect(5, 3, 4, Bucket::Two, 8, Bucket::One, 0);
        expect(8, 5, 3, Bucket::One, 2, Bucket::One, 5);
        expect(4, 9, 7, Bucket::Two, 14, Bucket::Two, 4);
    }

    #[test]
    fn test_unreachable_goals() {
        for (one, two, goal) in [(6, 15, 5), (2, 6, 5), (3, 5, 6)] {
            let result = solve(&puzzle(one, two, goal, Bucket::One));
            assert_eq!(
                result,
                Err(SolveError::NoSolution {
                    goal,
                    capacity_one: one,
                    capacity_two: two,
                })
            );
        }
    }

    #[test]
    fn test_unreachable_without_early_checks() {
        let config = SolverConfig {
            early_checks: false,
            ..Default::default()
        };
        let result = solve_with_config(&puzzle(2, 6, 5, Bucket::One), &config);
        assert!(matches!(result, Err(SolveError::NoSolution { goal: 5, .. })));
    }

    #[test]
    fn test_invalid_spec_rejected() {
        let spec = PuzzleSpec {
            capacity_one: 0,
            capacity_two: 5,
            goal: 1,
            start_bucket: Bucket::One,
        };
        assert!(matches!(solve(&spec), Err(SolveError::InvalidSpec(_))));
    }

    #[test]
    fn test_search_statistics() {
        let solution =
            solve_with_config(&puzzle(3, 5, 1, Bucket::One), &SolverConfig::default()).unwrap();
        assert_eq!(
            solution.search,
            SearchStatistics {
                states_expanded: 5,
                states_discovered: 5,
                forbidden_rejections: 2,
            }
        );
        assert!(solution.trace.is_none());
    }

    #[test]
    fn test_trace_start_with_one() {
        let config = SolverConfig {
            record_trace: true,
            ..Default::default()
        };
        let solution = solve_with_config(&puzzle(3, 5, 1, Bucket::One), &config).unwrap();
        let pour = Action::Pour {
            from: Bucket::One,
            to: Bucket::Two,
        };

        assert_eq!(
            solution.trace,
            Some(vec![
                Step {
                    action: Action::Fill(Bucket::One),
                    state: State::new(3, 0),
                },
                Step {
                    action: pour,
                    state: State::new(0, 3),
                },
                Step {
                    action: Action::Fill(Bucket::One),
                    state: State::new(3, 3),
                },
                Step {
                    action: pour,
                    state: State::new(1, 5),
                },
            ])
        );
    }

    #[test]
    fn test_trace_length_matches_moves() {
        let config = SolverConfig {
            record_trace: true,
            ..Default::default()
        };
        let spec = puzzle(3, 5, 1, Bucket::Two);
        let solution = solve_with_config(&spec, &config).unwrap();
        let trace = solution.trace.unwrap();

        assert_eq!(trace.len(), 8);
        assert_eq!(trace[0].state, State::new(0, 5));
        assert_eq!(trace[7].state, State::new(3, 1));
        assert!(trace.iter().skip(1).all(|step| !is_forbidden(step.state, &spec)));
    }

    #[test]
    fn test_state_budget() {
        let config = SolverConfig {
            max_states: Some(3),
            ..Default::default()
        };
        let result = solve_with_config(&puzzle(7, 11, 2, Bucket::One), &config);
        assert_eq!(result, Err(SolveError::StateBudgetExceeded { limit: 3 }));

        let config = SolverConfig {
            max_states: Some(1),
            ..Default::default()
        };
        assert!(solve_with_config(&puzzle(5, 3, 5, Bucket::One), &config).is_ok());
    }

    /// Every state reachable from the opening fill without ever landing on
    /// the forbidden state; both buckets empty is left out because the
    /// search starts out having seen it
    fn reachable_states(spec: &PuzzleSpec) -> HashSet<State> {
        let mut seen = HashSet::from([spec.opening_state()]);
        let mut pending = vec![spec.opening_state()];
        while let Some(state) = pending.pop() {
            for (_, next) in successors(state, spec) {
                if !is_forbidden(next, spec) && seen.insert(next) {
                    pending.push(next);
                }
            }
        }
        seen.remove(&State::EMPTY);
        seen
    }

    #[test]
    fn test_forbidden_state_never_discovered() {
        let no_early_checks = |max_states| SolverConfig {
            max_states,
            early_checks: false,
            ..Default::default()
        };

        let spec = puzzle(2, 6, 5, Bucket::One);
        let reachable = reachable_states(&spec);
        assert_eq!(reachable.len(), 6);
        assert!(!reachable.contains(&State::new(0, 6)));

        // The whole space fits in exactly that many discoveries, one fewer
        // does not, so the forbidden state was never enqueued
        let exhausted = solve_with_config(&spec, &no_early_checks(Some(6)));
        assert!(matches!(exhausted, Err(SolveError::NoSolution { .. })));
        let short = solve_with_config(&spec, &no_early_checks(Some(5)));
        assert_eq!(short, Err(SolveError::StateBudgetExceeded { limit: 5 }));

        // Without the rule (3, 5) from bucket one would reach 15 states
        let spec = puzzle(3, 5, 6, Bucket::One);
        assert_eq!(reachable_states(&spec).len(), 14);
        let exhausted = solve_with_config(&spec, &no_early_checks(Some(14)));
        assert!(matches!(exhausted, Err(SolveError::NoSolution { .. })));
        let short = solve_with_config(&spec, &no_early_checks(Some(13)));
        assert_eq!(short, Err(SolveError::StateBudgetExceeded { limit: 13 }));
    }

    #[test]
    fn test_idempotent() {
        let spec = puzzle(7, 11, 2, Bucket::Two);
        assert_eq!(solve(&spec), solve(&spec));
    }

    /// Minimum moves computed from the sets of states reachable in exactly
    /// `k` moves, without any visited bookkeeping
    fn minimum_moves_by_levels(spec: &PuzzleSpec) -> Option<u32> {
        let mut level: HashSet<State> = HashSet::from([spec.opening_state()]);
        for moves in 1..=spec.state_space_size() as u32 + 1 {
            if level
                .iter()
                .any(|state| state.one == spec.goal || state.two == spec.goal)
            {
                return Some(moves);
            }
            level = level
                .iter()
                .flat_map(|&state| successors(state, spec))
                .map(|(_, next)| next)
                .filter(|&next| !is_forbidden(next, spec))
                .collect();
        }
        None
    }

    fn any_bucket() -> impl Strategy<Value = Bucket> {
        prop_oneof![Just(Bucket::One), Just(Bucket::Two)]
    }

    proptest! {
        #[test]
        fn prop_matches_level_search(
            capacity_one in 1u32..=7,
            capacity_two in 1u32..=7,
            goal in 1u32..=8,
            start in any_bucket(),
        ) {
            let spec = puzzle(capacity_one, capacity_two, goal, start);
            let expected = minimum_moves_by_levels(&spec);
            let actual = solve(&spec).ok().map(|stats| stats.moves);
            prop_assert_eq!(actual, expected);
        }

        #[test]
        fn prop_early_checks_agree_with_exhaustion(
            capacity_one in 1u32..=9,
            capacity_two in 1u32..=9,
            goal in 1u32..=10,
            start in any_bucket(),
        ) {
            let spec = puzzle(capacity_one, capacity_two, goal, start);
            let fast = solve(&spec);
            let slow = solve_with_config(&spec, &SolverConfig {
                early_checks: false,
                ..Default::default()
            })
            .map(|solution| solution.stats);
            prop_assert_eq!(fast, slow);
        }

        #[test]
        fn prop_answer_is_never_forbidden(
            capacity_one in 1u32..=9,
            capacity_two in 1u32..=9,
            goal in 1u32..=9,
            start in any_bucket(),
        ) {
            let spec = puzzle(capacity_one, capacity_two, goal, start);
            if let Ok(stats) = solve(&spec) {
                let end = stats.final_state(spec.goal);
                prop_assert!(stats.moves >= 1);
                prop_assert!(end.one <= capacity_one && end.two <= capacity_two);
                prop_assert!(!is_forbidden(end, &spec));
            }
        }
    }
}
