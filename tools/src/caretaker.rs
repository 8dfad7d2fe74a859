//! A simulated caretaker for headless runs.
//!
//! RULE: All randomness in a run flows through this one seeded PCG
//! stream, so the same seed and the same start pet replay identically.

use pet_core::{interaction::Availability, mood::Mood, InteractionKind, PetSnapshot};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

pub struct Caretaker {
    rng:           Pcg64Mcg,
    /// Chance per tick that the caretaker looks at the pet at all.
    attentiveness: f64,
}

impl Caretaker {
    pub fn new(seed: u64, attentiveness: f64) -> Self {
        Self {
            rng: Pcg64Mcg::seed_from_u64(seed),
            attentiveness: attentiveness.clamp(0.0, 1.0),
        }
    }

    /// What the caretaker does this tick, if anything.
    pub fn choose(&mut self, pet: &PetSnapshot, available: &Availability) -> Option<InteractionKind> {
        if !self.rng.gen_bool(self.attentiveness) {
            return None;
        }
        let wanted = match pet.mood {
            Mood::Hungry              => InteractionKind::Feed,
            // Health never comes back; the best a caretaker can do is stop
            // the neglect drain from whichever need is closer to empty.
            Mood::Sick if pet.stats.cleanliness < pet.stats.hunger => InteractionKind::Clean,
            Mood::Sick                => InteractionKind::Feed,
            Mood::Dirty               => InteractionKind::Clean,
            Mood::Tired               => InteractionKind::Sleep,
            Mood::Sad | Mood::Neutral => InteractionKind::Play,
            // Sometimes play with a happy pet anyway; let a sleeping one rest.
            Mood::Happy if self.rng.gen_bool(0.1) => InteractionKind::Play,
            Mood::Happy | Mood::Sleeping => return None,
        };
        available.is_available(wanted).then_some(wanted)
    }
}
