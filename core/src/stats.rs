//! The stat model: which stats a pet has and the [0, 100] bound they live in.
//!
//! Values are real numbers internally and are only rounded for display.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const STAT_MIN: f64 = 0.0;
pub const STAT_MAX: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    Hunger,
    Energy,
    Happiness,
    Health,
    Cleanliness,
    Bond,
}

impl Stat {
    pub const ALL: [Stat; 6] = [
        Stat::Hunger,
        Stat::Energy,
        Stat::Happiness,
        Stat::Health,
        Stat::Cleanliness,
        Stat::Bond,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Hunger      => "hunger",
            Self::Energy      => "energy",
            Self::Happiness   => "happiness",
            Self::Health      => "health",
            Self::Cleanliness => "cleanliness",
            Self::Bond        => "bond",
        }
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub fn clamp_stat(value: f64) -> f64 {
    value.clamp(STAT_MIN, STAT_MAX)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub hunger:      f64,
    pub energy:      f64,
    pub happiness:   f64,
    pub health:      f64,
    pub cleanliness: f64,
    pub bond:        f64,
}

impl Default for Stats {
    /// The stats of a freshly hatched pet.
    fn default() -> Self {
        Self {
            hunger:      80.0,
            energy:      75.0,
            happiness:   90.0,
            health:      85.0,
            cleanliness: 70.0,
            bond:        50.0,
        }
    }
}

impl Stats {
    pub fn get(&self, stat: Stat) -> f64 {
        match stat {
            Stat::Hunger      => self.hunger,
            Stat::Energy      => self.energy,
            Stat::Happiness   => self.happiness,
            Stat::Health      => self.health,
            Stat::Cleanliness => self.cleanliness,
            Stat::Bond        => self.bond,
        }
    }

    fn slot(&mut self, stat: Stat) -> &mut f64 {
        match stat {
            Stat::Hunger      => &mut self.hunger,
            Stat::Energy      => &mut self.energy,
            Stat::Happiness   => &mut self.happiness,
            Stat::Health      => &mut self.health,
            Stat::Cleanliness => &mut self.cleanliness,
            Stat::Bond        => &mut self.bond,
        }
    }

    /// Set a stat, clamped to [0, 100].
    pub fn set(&mut self, stat: Stat, value: f64) {
        *self.slot(stat) = clamp_stat(value);
    }

    /// Add a (possibly negative) delta, clamped to [0, 100].
    pub fn add(&mut self, stat: Stat, delta: f64) {
        let slot = self.slot(stat);
        *slot = clamp_stat(*slot + delta);
    }

    pub fn iter(&self) -> impl Iterator<Item = (Stat, f64)> + '_ {
        Stat::ALL.into_iter().map(move |s| (s, self.get(s)))
    }

    /// Display value, rounded to a whole point.
    pub fn rounded(&self, stat: Stat) -> u8 {
        clamp_stat(self.get(stat)).round() as u8
    }

    pub fn all_at_least(&self, floor: f64) -> bool {
        self.iter().all(|(_, v)| v >= floor)
    }

    /// First stat that is non-finite or outside [0, 100], if any.
    pub fn first_out_of_range(&self) -> Option<(Stat, f64)> {
        self.iter()
            .find(|(_, v)| !v.is_finite() || *v < STAT_MIN || *v > STAT_MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mutations_clamp_to_bounds() {
        let mut stats = Stats::default();
        stats.add(Stat::Hunger, 500.0);
        stats.add(Stat::Energy, -500.0);
        stats.set(Stat::Bond, 101.5);
        assert_eq!(stats.hunger, 100.0);
        assert_eq!(stats.energy, 0.0);
        assert_eq!(stats.bond, 100.0);
        assert!(stats.first_out_of_range().is_none());
    }

    #[test]
    fn out_of_range_detects_nan() {
        let stats = Stats { health: f64::NAN, ..Stats::default() };
        assert_eq!(stats.first_out_of_range().map(|(s, _)| s), Some(Stat::Health));
    }
}
