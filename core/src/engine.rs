//! The simulation facade: the one entry point a host calls.
//!
//! PIPELINE (fixed, every call):
//!   1. Validate the incoming snapshot.
//!   2. Decay up to `now`           (decay.rs)
//!   3. Apply the interaction, if any (interaction.rs)
//!   4. Evaluate achievements        (achievement.rs)
//!
//! RULES:
//!   - The engine owns no timers and never reads a clock on its own.
//!   - Inputs are borrowed, outputs are new values. An error means the
//!     caller's snapshot is still the current one.
//!   - Events come back in the order they happened within the call.

use crate::{
    achievement,
    clock::Clock,
    config::PetConfig,
    decay::decay,
    error::{SimError, SimResult},
    event::PetEvent,
    interaction::{self, Availability, InteractionKind},
    snapshot::PetSnapshot,
    store::SnapshotStore,
    types::Timestamp,
};

/// A new snapshot plus what happened on the way to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub snapshot: PetSnapshot,
    pub events:   Vec<PetEvent>,
}

pub struct PetEngine {
    config: PetConfig,
}

impl PetEngine {
    pub fn new(config: PetConfig) -> SimResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PetConfig {
        &self.config
    }

    /// A fresh pet born at `now`.
    pub fn hatch(&self, now: Timestamp) -> PetSnapshot {
        PetSnapshot::hatch(now, &self.config.mood)
    }

    /// Bring `pet` up to `now`. Used by the tick source and for offline catch-up.
    pub fn advance(&self, pet: &PetSnapshot, now: Timestamp) -> SimResult<Step> {
        pet.validate()?;
        let elapsed = elapsed_ms(pet, now)?;
        let (decayed, mut events) = decay(pet, elapsed, &self.config)?;
        let snapshot = self.award(decayed, &mut events);
        Ok(Step { snapshot, events })
    }

    /// Decay up to `now`, then apply `kind`.
    pub fn interact(
        &self,
        pet:  &PetSnapshot,
        kind: InteractionKind,
        now:  Timestamp,
    ) -> SimResult<Step> {
        pet.validate()?;
        let elapsed = elapsed_ms(pet, now)?;
        let (decayed, mut events) = decay(pet, elapsed, &self.config)?;
        let (interacted, interaction_events) =
            interaction::apply(&decayed, kind, now, &self.config)?;
        events.extend(interaction_events);
        let snapshot = self.award(interacted, &mut events);
        Ok(Step { snapshot, events })
    }

    pub fn advance_with(&self, pet: &PetSnapshot, clock: &dyn Clock) -> SimResult<Step> {
        self.advance(pet, clock.now())
    }

    pub fn interact_with(
        &self,
        pet:   &PetSnapshot,
        kind:  InteractionKind,
        clock: &dyn Clock,
    ) -> SimResult<Step> {
        self.interact(pet, kind, clock.now())
    }

    /// What the user may do with `pet` as it stands.
    pub fn availability(&self, pet: &PetSnapshot) -> Availability {
        interaction::availability(pet, &self.config)
    }

    /// Startup flow: load the saved pet (or hatch one if there is none or
    /// it is corrupt), catch up on offline decay, and save the result.
    pub fn resume<S: SnapshotStore>(
        &self,
        store:  &S,
        pet_id: &str,
        now:    Timestamp,
    ) -> SimResult<Step> {
        let pet = match store.load(pet_id) {
            Ok(Some(pet)) => pet,
            Ok(None) => {
                log::info!("no saved pet '{pet_id}', hatching a new one");
                self.hatch(now)
            }
            Err(SimError::CorruptSnapshot { reason }) => {
                log::warn!("saved pet '{pet_id}' is corrupt ({reason}), hatching a new one");
                self.hatch(now)
            }
            Err(e) => return Err(e),
        };
        let step = self.advance(&pet, now)?;
        store.save(pet_id, &step.snapshot)?;
        Ok(step)
    }

    fn award(&self, pet: PetSnapshot, events: &mut Vec<PetEvent>) -> PetSnapshot {
        let (awarded, unlocked) = achievement::evaluate(&pet, &self.config.achievements);
        for id in unlocked {
            log::info!("achievement unlocked: {}", id.title());
            events.push(PetEvent::AchievementUnlocked { id });
        }
        awarded
    }
}

fn elapsed_ms(pet: &PetSnapshot, now: Timestamp) -> SimResult<i64> {
    let elapsed = (now - pet.last_visited).num_milliseconds();
    if elapsed < 0 {
        log::warn!(
            "clock went backwards: last visited {}, now {now}; ignoring call",
            pet.last_visited
        );
        return Err(SimError::InvalidElapsedTime { last_visited: pet.last_visited, now });
    }
    Ok(elapsed)
}
