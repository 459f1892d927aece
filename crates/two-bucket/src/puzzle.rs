//! Puzzle representation types.
//!
//! These types deserialize directly from the JSON puzzle format accepted by
//! the command line (`{"bucketOne": 3, "bucketTwo": 5, "goal": 1,
//! "startBucket": "one"}`) and serialize the answer in the same casing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{InvalidSpec, SolveError};

/// One of the two buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Bucket {
    One,
    Two,
}

impl Bucket {
    /// The bucket that is not `self`
    pub fn other(self) -> Bucket {
        match self {
            Bucket::One => Bucket::Two,
            Bucket::Two => Bucket::One,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Bucket::One => "one",
            Bucket::Two => "two",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Bucket {
    type Err = InvalidSpec;

    /// Accepts `one`/`two`, `a`/`b` and `1`/`2`, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "one" | "a" | "1" => Ok(Bucket::One),
            "two" | "b" | "2" => Ok(Bucket::Two),
            _ => Err(InvalidSpec::UnknownBucket(s.to_string())),
        }
    }
}

impl TryFrom<String> for Bucket {
    type Error = InvalidSpec;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Liters held in each bucket at one point of the search.
///
/// Identity is the pair of levels only; how many moves it took to get here
/// is tracked separately by the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct State {
    pub one: u32,
    pub two: u32,
}

impl State {
    pub const EMPTY: State = State { one: 0, two: 0 };

    pub fn new(one: u32, two: u32) -> Self {
        Self { one, two }
    }

    /// Liters currently in `bucket`
    pub fn level(&self, bucket: Bucket) -> u32 {
        match bucket {
            Bucket::One => self.one,
            Bucket::Two => self.two,
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.one, self.two)
    }
}

/// The complete puzzle definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleSpec {
    #[serde(rename = "bucketOne")]
    pub capacity_one: u32,
    #[serde(rename = "bucketTwo")]
    pub capacity_two: u32,
    pub goal: u32,
    #[serde(rename = "startBucket")]
    pub start_bucket: Bucket,
}

impl PuzzleSpec {
    /// Build a validated puzzle
    pub fn new(
        capacity_one: u32,
        capacity_two: u32,
        goal: u32,
        start_bucket: Bucket,
    ) -> Result<Self, SolveError> {
        let spec = Self {
            capacity_one,
            capacity_two,
            goal,
            start_bucket,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Parse a puzzle from its JSON form. Capacities and goal are checked
    /// later by `validate`.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Reject zero capacities and a zero goal
    pub fn validate(&self) -> Result<(), InvalidSpec> {
        if self.capacity_one == 0 {
            return Err(InvalidSpec::ZeroCapacity { bucket: Bucket::One });
        }
        if self.capacity_two == 0 {
            return Err(InvalidSpec::ZeroCapacity { bucket: Bucket::Two });
        }
        if self.goal == 0 {
            return Err(InvalidSpec::ZeroGoal);
        }
        Ok(())
    }

    pub fn capacity(&self, bucket: Bucket) -> u32 {
        match bucket {
            Bucket::One => self.capacity_one,
            Bucket::Two => self.capacity_two,
        }
    }

    /// The state after the mandatory first fill of the start bucket
    pub fn opening_state(&self) -> State {
        match self.start_bucket {
            Bucket::One => State::new(self.capacity_one, 0),
            Bucket::Two => State::new(0, self.capacity_two),
        }
    }

    /// Upper bound on the number of distinct states, saturating at
    /// `u64::MAX` for the largest capacities
    pub fn state_space_size(&self) -> u64 {
        (u64::from(self.capacity_one) + 1).saturating_mul(u64::from(self.capacity_two) + 1)
    }
}

/// The answer to a puzzle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketStats {
    /// Total number of moves, including the first fill
    pub moves: u32,
    /// Which bucket ends up holding the goal
    pub goal_bucket: Bucket,
    /// Liters left in the other bucket
    pub other_bucket: u32,
}

impl BucketStats {
    /// Reconstruct the final levels this answer describes
    pub fn final_state(&self, goal: u32) -> State {
        match self.goal_bucket {
            Bucket::One => State::new(goal, self.other_bucket),
            Bucket::Two => State::new(self.other_bucket, goal),
        }
    }
}
