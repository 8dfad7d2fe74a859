//! Mood: the discrete display state derived from stats.

use crate::{
    config::MoodConfig,
    event::PetEvent,
    snapshot::{Activity, PetSnapshot},
    stats::{Stat, Stats},
};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mood {
    Sick,
    Hungry,
    Dirty,
    Tired,
    Sad,
    Happy,
    Neutral,
    Sleeping,
}

/// Low-stat moods, most urgent first. When several stats are low at
/// once the first match wins.
const PRIORITY: [(Stat, Mood); 5] = [
    (Stat::Health,      Mood::Sick),
    (Stat::Hunger,      Mood::Hungry),
    (Stat::Cleanliness, Mood::Dirty),
    (Stat::Energy,      Mood::Tired),
    (Stat::Happiness,   Mood::Sad),
];

impl Mood {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sick     => "sick",
            Self::Hungry   => "hungry",
            Self::Dirty    => "dirty",
            Self::Tired    => "tired",
            Self::Sad      => "sad",
            Self::Happy    => "happy",
            Self::Neutral  => "neutral",
            Self::Sleeping => "sleeping",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sleep overrides the display mood but never the stats underneath.
pub fn resolve_mood(stats: &Stats, activity: Option<Activity>, config: &MoodConfig) -> Mood {
    if activity == Some(Activity::Sleeping) {
        return Mood::Sleeping;
    }
    if let Some((_, mood)) = PRIORITY
        .iter()
        .find(|(stat, _)| stats.get(*stat) < config.low_threshold)
    {
        return *mood;
    }
    if stats.happiness >= config.happy_threshold {
        Mood::Happy
    } else {
        Mood::Neutral
    }
}

/// Recompute the cached mood and report the edge if it moved.
pub(crate) fn refresh_mood(pet: &mut PetSnapshot, config: &MoodConfig, events: &mut Vec<PetEvent>) {
    let mood = resolve_mood(&pet.stats, pet.current_activity(), config);
    if mood != pet.mood {
        events.push(PetEvent::MoodChanged { from: pet.mood, to: mood });
        pet.mood = mood;
    }
}
