//! Achievements.
//!
//! Every predicate is a pure function of the snapshot. The counters the
//! predicates read live inside the snapshot too, so replaying the same
//! calls from the same start state unlocks the same achievements in the
//! same order.

use crate::{
    config::AchievementConfig,
    growth::GrowthStage,
    snapshot::PetSnapshot,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Declaration order is notification order. Append only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementId {
    FirstMeal,
    Hatched,
    GrownUp,
    BestFriends,
    Survivor,
    Gourmet,
    Playmate,
    SqueakyClean,
    SweetDreams,
    PeakCondition,
}

impl AchievementId {
    pub const ALL: [AchievementId; 10] = [
        AchievementId::FirstMeal,
        AchievementId::Hatched,
        AchievementId::GrownUp,
        AchievementId::BestFriends,
        AchievementId::Survivor,
        AchievementId::Gourmet,
        AchievementId::Playmate,
        AchievementId::SqueakyClean,
        AchievementId::SweetDreams,
        AchievementId::PeakCondition,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::FirstMeal     => "first_meal",
            Self::Hatched       => "hatched",
            Self::GrownUp       => "grown_up",
            Self::BestFriends   => "best_friends",
            Self::Survivor      => "survivor",
            Self::Gourmet       => "gourmet",
            Self::Playmate      => "playmate",
            Self::SqueakyClean  => "squeaky_clean",
            Self::SweetDreams   => "sweet_dreams",
            Self::PeakCondition => "peak_condition",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::FirstMeal     => "First Meal",
            Self::Hatched       => "Hatched!",
            Self::GrownUp       => "All Grown Up",
            Self::BestFriends   => "Best Friends",
            Self::Survivor      => "Survivor",
            Self::Gourmet       => "Gourmet",
            Self::Playmate      => "Playmate",
            Self::SqueakyClean  => "Squeaky Clean",
            Self::SweetDreams   => "Sweet Dreams",
            Self::PeakCondition => "Peak Condition",
        }
    }

    fn is_met(&self, pet: &PetSnapshot, config: &AchievementConfig) -> bool {
        let counters = &pet.achievements.counters;
        match self {
            Self::FirstMeal     => counters.feeds >= 1,
            Self::Hatched       => pet.growth_stage >= GrowthStage::Chick,
            Self::GrownUp       => pet.growth_stage == GrowthStage::Adult,
            Self::BestFriends   => pet.stats.bond >= config.best_friends_bond,
            Self::Survivor      => {
                pet.stats.health > 0.0 && pet.age_in_days >= config.survivor_days
            }
            Self::Gourmet       => counters.feeds >= config.gourmet_feeds,
            Self::Playmate      => counters.plays >= config.playmate_plays,
            Self::SqueakyClean  => counters.cleans >= config.squeaky_clean_cleans,
            Self::SweetDreams   => counters.sleeps >= config.sweet_dreams_sleeps,
            Self::PeakCondition => pet.stats.all_at_least(config.peak_condition_floor),
        }
    }
}

impl fmt::Display for AchievementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Cumulative counters used as predicate inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareCounters {
    pub feeds:             u64,
    pub plays:             u64,
    pub cleans:            u64,
    /// Counted when sleep starts, not when it ends.
    pub sleeps:            u64,
    pub interactions:      u64,
    /// Pet day health ran out. Nothing restores health, so this is set once.
    pub health_depleted_on_day: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementLedger {
    pub unlocked: BTreeSet<AchievementId>,
    pub counters: CareCounters,
}

impl AchievementLedger {
    pub fn has(&self, id: AchievementId) -> bool {
        self.unlocked.contains(&id)
    }
}

/// Unlock every achievement whose predicate now holds.
///
/// Already-unlocked achievements are skipped. The returned list follows
/// declaration order.
pub fn evaluate(pet: &PetSnapshot, config: &AchievementConfig) -> (PetSnapshot, Vec<AchievementId>) {
    let newly_unlocked: Vec<AchievementId> = AchievementId::ALL
        .into_iter()
        .filter(|id| !pet.achievements.has(*id) && id.is_met(pet, config))
        .collect();

    let mut next = pet.clone();
    next.achievements.unlocked.extend(newly_unlocked.iter().copied());
    (next, newly_unlocked)
}
