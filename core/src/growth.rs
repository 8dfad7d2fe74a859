//! Growth stages.
//!
//! Age is always re-derived from `now - birth`, never accumulated,
//! so repeated partial advances cannot drift.

use crate::types::{Timestamp, MS_PER_PET_DAY};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthStage {
    Egg,
    Chick,
    Teen,
    Adult,
}

/// First pet day of each stage, ascending. Ranges are half-open and
/// contiguous: each stage runs until the next one starts.
const STAGE_TABLE: [(u64, GrowthStage); 4] = [
    (0,  GrowthStage::Egg),
    (6,  GrowthStage::Chick),
    (11, GrowthStage::Teen),
    (21, GrowthStage::Adult),
];

impl GrowthStage {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Egg   => "egg",
            Self::Chick => "chick",
            Self::Teen  => "teen",
            Self::Adult => "adult",
        }
    }

    /// First pet day on which this stage applies.
    pub fn starts_at_day(&self) -> u64 {
        STAGE_TABLE
            .iter()
            .find(|(_, stage)| stage == self)
            .map(|(day, _)| *day)
            .unwrap_or(0)
    }
}

impl fmt::Display for GrowthStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Map an age to its stage. Total over every non-negative age.
pub fn resolve_stage(age_in_days: u64) -> GrowthStage {
    STAGE_TABLE
        .iter()
        .rev()
        .find(|(start, _)| age_in_days >= *start)
        .map(|(_, stage)| *stage)
        .unwrap_or(GrowthStage::Egg)
}

/// Whole pet days between birth and `now`. Zero if `now` precedes birth.
pub fn age_in_days(birth: Timestamp, now: Timestamp) -> u64 {
    let ms = (now - birth).num_milliseconds().max(0);
    (ms / MS_PER_PET_DAY) as u64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageTransition {
    pub from: GrowthStage,
    pub to:   GrowthStage,
}

pub fn detect_transition(previous: GrowthStage, next: GrowthStage) -> Option<StageTransition> {
    (previous != next).then_some(StageTransition { from: previous, to: next })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_are_half_open() {
        assert_eq!(resolve_stage(0), GrowthStage::Egg);
        assert_eq!(resolve_stage(5), GrowthStage::Egg);
        assert_eq!(resolve_stage(6), GrowthStage::Chick);
        assert_eq!(resolve_stage(10), GrowthStage::Chick);
        assert_eq!(resolve_stage(11), GrowthStage::Teen);
        assert_eq!(resolve_stage(20), GrowthStage::Teen);
        assert_eq!(resolve_stage(21), GrowthStage::Adult);
        assert_eq!(resolve_stage(u64::MAX), GrowthStage::Adult);
    }

    #[test]
    fn table_is_contiguous_and_ordered() {
        assert_eq!(STAGE_TABLE[0].0, 0, "table must start at day 0");
        for pair in STAGE_TABLE.windows(2) {
            assert!(pair[0].0 < pair[1].0, "start days must strictly increase");
            assert!(pair[0].1 < pair[1].1, "stages must be listed in life order");
        }
        for (day, stage) in STAGE_TABLE {
            assert_eq!(stage.starts_at_day(), day);
        }
    }

    #[test]
    fn transition_only_on_change() {
        assert_eq!(detect_transition(GrowthStage::Egg, GrowthStage::Egg), None);
        assert_eq!(
            detect_transition(GrowthStage::Egg, GrowthStage::Teen),
            Some(StageTransition { from: GrowthStage::Egg, to: GrowthStage::Teen })
        );
    }
}
