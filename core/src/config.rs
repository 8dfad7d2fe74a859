//! Tuning for the simulation. Every rate and threshold the engine uses
//! lives here so it can be retuned from `data/pet_config.json`
//! without touching engine code.
//!
//! In tests, use `PetConfig::default()`.

use crate::{
    error::{SimError, SimResult},
    interaction::InteractionKind,
    stats::{Stat, STAT_MAX, STAT_MIN},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One rate per stat, in points per real minute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatRates {
    pub hunger:      f64,
    pub energy:      f64,
    pub happiness:   f64,
    pub health:      f64,
    pub cleanliness: f64,
    pub bond:        f64,
}

impl StatRates {
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
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecayConfig {
    pub per_minute: StatRates,
    /// Extra health drain per minute for each of hunger/cleanliness sitting at 0.
    pub neglect_health_per_minute: f64,
    /// Minutes without interaction after which bond starts to fall.
    pub bond_neglect_window_minutes: f64,
    /// Bond regained per minute while the pet is awake and attended.
    pub bond_recovery_per_minute: f64,
    /// Energy restored per minute while asleep (replaces the energy drain).
    pub sleep_energy_per_minute: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodConfig {
    /// A stat strictly below this shows its negative mood.
    pub low_threshold: f64,
    /// Happiness at or above this shows "happy" when nothing is low.
    pub happy_threshold: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionEffect {
    /// Added to the stat, then clamped.
    #[serde(default)]
    pub deltas: BTreeMap<Stat, f64>,
    /// Stat is set to this value outright, after deltas.
    #[serde(default)]
    pub overrides: BTreeMap<Stat, f64>,
    /// The interaction is blocked while the stat is below the minimum.
    #[serde(default)]
    pub requires_at_least: BTreeMap<Stat, f64>,
    pub duration_ms: i64,
}

/// Effects of the timed interactions. Sleep is a toggle and has no entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InteractionTable {
    pub feed:  InteractionEffect,
    pub play:  InteractionEffect,
    pub clean: InteractionEffect,
}

impl InteractionTable {
    pub fn effect(&self, kind: InteractionKind) -> Option<&InteractionEffect> {
        match kind {
            InteractionKind::Feed  => Some(&self.feed),
            InteractionKind::Play  => Some(&self.play),
            InteractionKind::Clean => Some(&self.clean),
            InteractionKind::Sleep => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AchievementConfig {
    pub gourmet_feeds:        u64,
    pub playmate_plays:       u64,
    pub squeaky_clean_cleans: u64,
    pub sweet_dreams_sleeps:  u64,
    pub best_friends_bond:    f64,
    pub survivor_days:        u64,
    pub peak_condition_floor: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetConfig {
    pub decay:        DecayConfig,
    pub mood:         MoodConfig,
    pub interactions: InteractionTable,
    pub achievements: AchievementConfig,
}

impl Default for PetConfig {
    fn default() -> Self {
        Self {
            decay: DecayConfig {
                per_minute: StatRates {
                    hunger:      1.2,
                    energy:      1.0,
                    happiness:   0.8,
                    health:      0.2,
                    cleanliness: 0.6,
                    bond:        0.2,
                },
                neglect_health_per_minute:   1.0,
                bond_neglect_window_minutes: 30.0,
                bond_recovery_per_minute:    0.25,
                sleep_energy_per_minute:     4.0,
            },
            mood: MoodConfig {
                low_threshold:   20.0,
                happy_threshold: 70.0,
            },
            interactions: InteractionTable {
                feed: InteractionEffect {
                    deltas: [(Stat::Hunger, 20.0), (Stat::Energy, 5.0)].into(),
                    overrides: BTreeMap::new(),
                    requires_at_least: BTreeMap::new(),
                    duration_ms: 3_000,
                },
                play: InteractionEffect {
                    deltas: [
                        (Stat::Happiness, 25.0),
                        (Stat::Energy, -15.0),
                        (Stat::Hunger, -10.0),
                    ]
                    .into(),
                    overrides: BTreeMap::new(),
                    requires_at_least: [(Stat::Energy, 10.0)].into(),
                    duration_ms: 3_000,
                },
                clean: InteractionEffect {
                    deltas: [(Stat::Happiness, -5.0)].into(),
                    overrides: [(Stat::Cleanliness, 100.0)].into(),
                    requires_at_least: BTreeMap::new(),
                    duration_ms: 3_000,
                },
            },
            achievements: AchievementConfig {
                gourmet_feeds:        50,
                playmate_plays:       25,
                squeaky_clean_cleans: 25,
                sweet_dreams_sleeps:  10,
                best_friends_bond:    90.0,
                survivor_days:        7,
                peak_condition_floor: 80.0,
            },
        }
    }
}

impl PetConfig {
    /// Load and validate a JSON config file.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: PetConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> SimResult<()> {
        let d = &self.decay;
        for stat in Stat::ALL {
            non_negative(&format!("decay.per_minute.{stat}"), d.per_minute.get(stat))?;
        }
        non_negative("decay.neglect_health_per_minute", d.neglect_health_per_minute)?;
        non_negative("decay.bond_neglect_window_minutes", d.bond_neglect_window_minutes)?;
        non_negative("decay.bond_recovery_per_minute", d.bond_recovery_per_minute)?;
        non_negative("decay.sleep_energy_per_minute", d.sleep_energy_per_minute)?;

        in_stat_range("mood.low_threshold", self.mood.low_threshold)?;
        in_stat_range("mood.happy_threshold", self.mood.happy_threshold)?;

        for kind in InteractionKind::TIMED {
            let Some(effect) = self.interactions.effect(kind) else { continue };
            if effect.duration_ms <= 0 {
                return Err(invalid(format!(
                    "interactions.{kind}.duration_ms must be positive, got {}",
                    effect.duration_ms
                )));
            }
            for (stat, value) in &effect.overrides {
                in_stat_range(&format!("interactions.{kind}.overrides.{stat}"), *value)?;
            }
            for (stat, value) in &effect.requires_at_least {
                in_stat_range(&format!("interactions.{kind}.requires_at_least.{stat}"), *value)?;
            }
            if let Some((stat, _)) = effect.deltas.iter().find(|(_, v)| !v.is_finite()) {
                return Err(invalid(format!("interactions.{kind}.deltas.{stat} is not finite")));
            }
        }

        in_stat_range("achievements.best_friends_bond", self.achievements.best_friends_bond)?;
        in_stat_range(
            "achievements.peak_condition_floor",
            self.achievements.peak_condition_floor,
        )?;
        Ok(())
    }
}

fn invalid(reason: String) -> SimError {
    SimError::InvalidConfig { reason }
}

fn non_negative(field: &str, value: f64) -> SimResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(format!("{field} must be a finite non-negative number, got {value}")))
    }
}

fn in_stat_range(field: &str, value: f64) -> SimResult<()> {
    if value.is_finite() && (STAT_MIN..=STAT_MAX).contains(&value) {
        Ok(())
    } else {
        Err(invalid(format!("{field} must be within [0, 100], got {value}")))
    }
}
