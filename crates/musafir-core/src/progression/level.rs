//! Level state machine.
//!
//! ```text
//! One --(points > 100)--> Two --(points > 300)--> Three
//! ```
//!
//! Transitions are edge-triggered: they are evaluated once per recorded
//! effort, against the level held before that effort, so a single effort
//! moves the level by at most one step. `Three` is terminal.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Points must strictly exceed this to leave level one.
pub const LEVEL_TWO_THRESHOLD: u32 = 100;
/// Points must strictly exceed this to leave level two.
pub const LEVEL_THREE_THRESHOLD: u32 = 300;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Level {
    #[default]
    One,
    Two,
    Three,
}

impl Level {
    pub fn as_u8(&self) -> u8 {
        match self {
            Level::One => 1,
            Level::Two => 2,
            Level::Three => 3,
        }
    }

    /// Level after an effort that brought the cumulative total to `points`.
    pub fn advance(self, points: u32) -> Level {
        match self {
            Level::One if points > LEVEL_TWO_THRESHOLD => Level::Two,
            Level::Two if points > LEVEL_THREE_THRESHOLD => Level::Three,
            other => other,
        }
    }

    /// Threshold guarding the outgoing transition, if any.
    pub fn next_threshold(&self) -> Option<u32> {
        match self {
            Level::One => Some(LEVEL_TWO_THRESHOLD),
            Level::Two => Some(LEVEL_THREE_THRESHOLD),
            Level::Three => None,
        }
    }

    /// Stage at 0-based `stage_index` is unlocked iff the level exceeds it.
    pub fn unlocks_stage(&self, stage_index: usize) -> bool {
        usize::from(self.as_u8()) > stage_index
    }
}

impl TryFrom<u8> for Level {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Level::One),
            2 => Ok(Level::Two),
            3 => Ok(Level::Three),
            other => Err(format!("level must be 1, 2 or 3 (got {other})")),
        }
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level.as_u8()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_is_strict() {
        assert_eq!(Level::One.advance(100), Level::One);
        assert_eq!(Level::One.advance(101), Level::Two);
        assert_eq!(Level::Two.advance(300), Level::Two);
        assert_eq!(Level::Two.advance(301), Level::Three);
    }

    #[test]
    fn at_most_one_step() {
        assert_eq!(Level::One.advance(10_000), Level::Two);
    }

    #[test]
    fn three_is_terminal() {
        assert_eq!(Level::Three.advance(u32::MAX), Level::Three);
        assert_eq!(Level::Three.next_threshold(), None);
    }

    #[test]
    fn stage_unlocks() {
        assert!(Level::One.unlocks_stage(0));
        assert!(!Level::One.unlocks_stage(1));
        assert!(Level::Two.unlocks_stage(1));
        assert!(!Level::Two.unlocks_stage(2));
        assert!(Level::Three.unlocks_stage(2));
    }

    #[test]
    fn serializes_as_number() {
        assert_eq!(serde_json::to_string(&Level::Two).unwrap(), "2");
        let parsed: Level = serde_json::from_str("3").unwrap();
        assert_eq!(parsed, Level::Three);
        assert!(serde_json::from_str::<Level>("4").is_err());
    }
}
