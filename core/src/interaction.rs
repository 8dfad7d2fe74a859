//! Interactions: the user-driven half of the simulation.
//!
//! `apply` expects a pet that has already been decayed up to `now`;
//! the facade guarantees that, so effects are never computed on stale
//! stats and an expired activity never blocks a request.

use crate::{
    config::PetConfig,
    error::{SimError, SimResult},
    event::{PetEvent, WakeReason},
    mood::refresh_mood,
    snapshot::{Activity, ActivityState, PetSnapshot},
    stats::Stat,
    types::Timestamp,
};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionKind {
    Feed,
    Play,
    Clean,
    /// Toggle: starts sleep when awake, ends it when asleep.
    Sleep,
}

impl InteractionKind {
    pub const ALL: [InteractionKind; 4] = [
        InteractionKind::Feed,
        InteractionKind::Play,
        InteractionKind::Clean,
        InteractionKind::Sleep,
    ];

    /// Kinds with a fixed-duration effect-table entry.
    pub const TIMED: [InteractionKind; 3] = [
        InteractionKind::Feed,
        InteractionKind::Play,
        InteractionKind::Clean,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Feed  => "feed",
            Self::Play  => "play",
            Self::Clean => "clean",
            Self::Sleep => "sleep",
        }
    }

    pub fn activity(&self) -> Activity {
        match self {
            Self::Feed  => Activity::Eating,
            Self::Play  => Activity::Playing,
            Self::Clean => Activity::Cleaning,
            Self::Sleep => Activity::Sleeping,
        }
    }
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum BlockReason {
    Sleeping,
    StatTooLow { stat: Stat, minimum: f64 },
    /// Sleep cannot start over a running timed activity.
    Busy,
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sleeping                   => f.write_str("pet is sleeping"),
            Self::StatTooLow { stat, minimum } => write!(f, "{stat} below {minimum}"),
            Self::Busy                       => f.write_str("another activity is running"),
        }
    }
}

/// Whether `kind` may be requested right now.
pub fn check(pet: &PetSnapshot, kind: InteractionKind, config: &PetConfig) -> Result<(), BlockReason> {
    let Some(effect) = config.interactions.effect(kind) else {
        return match pet.current_activity() {
            Some(activity) if activity.is_timed() => Err(BlockReason::Busy),
            _ => Ok(()),
        };
    };
    if pet.is_sleeping() {
        return Err(BlockReason::Sleeping);
    }
    match effect
        .requires_at_least
        .iter()
        .find(|(stat, minimum)| pet.stats.get(**stat) < **minimum)
    {
        Some((stat, minimum)) => Err(BlockReason::StatTooLow { stat: *stat, minimum: *minimum }),
        None => Ok(()),
    }
}

/// Per-kind availability, for rendering enabled/disabled actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    pub feed:  bool,
    pub play:  bool,
    pub clean: bool,
    pub sleep: bool,
}

impl Availability {
    pub fn is_available(&self, kind: InteractionKind) -> bool {
        match kind {
            InteractionKind::Feed  => self.feed,
            InteractionKind::Play  => self.play,
            InteractionKind::Clean => self.clean,
            InteractionKind::Sleep => self.sleep,
        }
    }
}

pub fn availability(pet: &PetSnapshot, config: &PetConfig) -> Availability {
    let ok = |kind| check(pet, kind, config).is_ok();
    Availability {
        feed:  ok(InteractionKind::Feed),
        play:  ok(InteractionKind::Play),
        clean: ok(InteractionKind::Clean),
        sleep: ok(InteractionKind::Sleep),
    }
}

/// Validate and apply one interaction at `now`.
///
/// A blocked request returns `InteractionBlocked` and produces no snapshot.
pub fn apply(
    pet:    &PetSnapshot,
    kind:   InteractionKind,
    now:    Timestamp,
    config: &PetConfig,
) -> SimResult<(PetSnapshot, Vec<PetEvent>)> {
    check(pet, kind, config).map_err(|reason| SimError::InteractionBlocked {
        kind,
        reason,
        current_activity: pet.current_activity(),
    })?;

    let mut next = pet.clone();
    let mut events = Vec::new();
    let counters = &mut next.achievements.counters;

    match config.interactions.effect(kind) {
        None if pet.is_sleeping() => {
            next.activity = None;
            events.push(PetEvent::WokeUp { reason: WakeReason::Toggled, at: now });
        }
        None => {
            next.activity = Some(ActivityState { activity: Activity::Sleeping, ends_at: None });
            counters.sleeps += 1;
            counters.interactions += 1;
            events.push(PetEvent::InteractionApplied { kind, at: now });
        }
        Some(effect) => {
            for (stat, delta) in &effect.deltas {
                next.stats.add(*stat, *delta);
            }
            for (stat, value) in &effect.overrides {
                next.stats.set(*stat, *value);
            }
            next.activity = Some(ActivityState {
                activity: kind.activity(),
                ends_at:  Some(now + Duration::milliseconds(effect.duration_ms)),
            });
            match kind {
                InteractionKind::Feed  => counters.feeds += 1,
                InteractionKind::Play  => counters.plays += 1,
                InteractionKind::Clean => counters.cleans += 1,
                InteractionKind::Sleep => {}
            }
            counters.interactions += 1;
            events.push(PetEvent::InteractionApplied { kind, at: now });
        }
    }

    next.last_interaction = now;
    refresh_mood(&mut next, &config.mood, &mut events);
    log::debug!("{kind} at {now}: activity={:?} mood={}", next.current_activity(), next.mood);
    Ok((next, events))
}
