//! The pet snapshot: the single value the engine consumes and produces.
//!
//! RULE: A snapshot is never partially mutated in front of the caller.
//! Every engine call takes `&PetSnapshot` and returns a complete new one.
//! The host owns persistence; this module only defines the value and its
//! JSON form.

use crate::{
    achievement::AchievementLedger,
    config::MoodConfig,
    error::{SimError, SimResult},
    growth::{age_in_days, resolve_stage, GrowthStage},
    mood::{resolve_mood, Mood},
    stats::Stats,
    types::Timestamp,
};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activity {
    Eating,
    Playing,
    Cleaning,
    Sleeping,
}

impl Activity {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Eating   => "eating",
            Self::Playing  => "playing",
            Self::Cleaning => "cleaning",
            Self::Sleeping => "sleeping",
        }
    }

    /// Timed activities end on their own; sleep only ends when rested or toggled.
    pub fn is_timed(&self) -> bool {
        !matches!(self, Self::Sleeping)
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityState {
    pub activity: Activity,
    /// Set for timed activities, `None` while sleeping.
    pub ends_at:  Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetSnapshot {
    pub stats:            Stats,
    pub birth:            Timestamp,
    /// Written only by interactions.
    pub last_interaction: Timestamp,
    /// The last `now` decay was applied up to. Written only by decay.
    pub last_visited:     Timestamp,
    pub activity:         Option<ActivityState>,
    pub growth_stage:     GrowthStage,
    pub mood:             Mood,
    pub age_in_days:      u64,
    pub achievements:     AchievementLedger,
}

impl PetSnapshot {
    /// A newly hatched pet with default stats, born at `now`.
    pub fn hatch(now: Timestamp, mood_config: &MoodConfig) -> Self {
        let stats = Stats::default();
        Self {
            mood: resolve_mood(&stats, None, mood_config),
            stats,
            birth: now,
            last_interaction: now,
            last_visited: now,
            activity: None,
            growth_stage: GrowthStage::Egg,
            age_in_days: 0,
            achievements: AchievementLedger::default(),
        }
    }

    pub fn current_activity(&self) -> Option<Activity> {
        self.activity.as_ref().map(|a| a.activity)
    }

    pub fn is_sleeping(&self) -> bool {
        self.current_activity() == Some(Activity::Sleeping)
    }

    /// Reject values that no sequence of engine calls could have produced.
    pub fn validate(&self) -> SimResult<()> {
        if let Some((stat, value)) = self.stats.first_out_of_range() {
            return Err(SimError::corrupt(format!("stat {stat} out of range: {value}")));
        }
        if self.last_visited < self.birth {
            return Err(SimError::corrupt(format!(
                "last_visited {} precedes birth {}",
                self.last_visited, self.birth
            )));
        }
        if self.last_interaction < self.birth {
            return Err(SimError::corrupt(format!(
                "last_interaction {} precedes birth {}",
                self.last_interaction, self.birth
            )));
        }
        if let Some(state) = &self.activity {
            match (state.activity.is_timed(), state.ends_at) {
                (true, None) => {
                    return Err(SimError::corrupt(format!(
                        "timed activity {} has no end time",
                        state.activity
                    )));
                }
                (false, Some(_)) => {
                    return Err(SimError::corrupt("sleep must not carry an end time"));
                }
                _ => {}
            }
        }
        let expected_age = age_in_days(self.birth, self.last_visited);
        if self.age_in_days != expected_age {
            return Err(SimError::corrupt(format!(
                "age_in_days {} does not match elapsed life of {expected_age} days",
                self.age_in_days
            )));
        }
        let expected_stage = resolve_stage(self.age_in_days);
        if self.growth_stage != expected_stage {
            return Err(SimError::corrupt(format!(
                "growth stage {} does not match age {} (expected {expected_stage})",
                self.growth_stage, self.age_in_days
            )));
        }
        Ok(())
    }

    /// Parse and validate persisted JSON. Any failure is `CorruptSnapshot`.
    pub fn from_json(json: &str) -> SimResult<Self> {
        let snapshot: PetSnapshot = serde_json::from_str(json)
            .map_err(|e| SimError::corrupt(format!("unreadable snapshot: {e}")))?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn to_json(&self) -> SimResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}
