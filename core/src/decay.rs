//! Decay: what happens to a pet while nobody touches it.
//!
//! Every time-based transition is resolved here from the elapsed interval
//! alone: stat drain, sleep recovery, timed activities ending, waking up,
//! age and stage. Coupled effects are computed from the exact instant
//! their trigger fires inside the interval (hunger hitting 0, energy
//! saturating, the bond window running out), so one large catch-up step
//! and many small ticks land on the same snapshot.

use crate::{
    config::PetConfig,
    error::{SimError, SimResult},
    event::{PetEvent, WakeReason},
    growth::{age_in_days, detect_transition, resolve_stage},
    mood::refresh_mood,
    snapshot::PetSnapshot,
    stats::{clamp_stat, Stat, STAT_MAX},
    types::{add_minutes, minutes_between, MS_PER_PET_DAY},
};
use chrono::Duration;

/// Apply `elapsed_ms` of decay to `pet`, starting from its `last_visited`.
///
/// Zero elapsed time changes nothing but re-derived state, so calling
/// twice with the same `now` is a no-op the second time. Negative
/// elapsed time (a clock that went backwards) is rejected.
pub fn decay(
    pet:        &PetSnapshot,
    elapsed_ms: i64,
    config:     &PetConfig,
) -> SimResult<(PetSnapshot, Vec<PetEvent>)> {
    let from = pet.last_visited;
    if elapsed_ms < 0 {
        return Err(SimError::InvalidElapsedTime {
            last_visited: from,
            now:          from + Duration::milliseconds(elapsed_ms),
        });
    }
    let now = from + Duration::milliseconds(elapsed_ms);
    let minutes = elapsed_ms as f64 / MS_PER_PET_DAY as f64;
    let d = &config.decay;
    let rates = &d.per_minute;

    let mut next = pet.clone();
    let mut events = Vec::new();

    if let Some(state) = &pet.activity {
        if let Some(ends_at) = state.ends_at {
            if state.activity.is_timed() && now >= ends_at {
                events.push(PetEvent::ActivityEnded { activity: state.activity, at: ends_at });
                next.activity = None;
            }
        }
    }

    // A sleeping pet restores energy until full, then wakes and drains normally.
    let to_full = minutes_until(STAT_MAX - pet.stats.energy, d.sleep_energy_per_minute);
    let rested = pet.is_sleeping() && minutes >= to_full;
    let asleep = if pet.is_sleeping() { minutes.min(to_full) } else { 0.0 };
    let awake = minutes - asleep;

    let mut energy = clamp_stat(pet.stats.energy + d.sleep_energy_per_minute * asleep);
    if rested {
        energy = STAT_MAX;
        let at = add_minutes(from, asleep);
        events.push(PetEvent::WokeUp { reason: WakeReason::Rested, at });
        next.activity = None;
    }
    next.stats.set(Stat::Energy, energy - rates.energy * awake);

    for stat in [Stat::Hunger, Stat::Happiness, Stat::Cleanliness] {
        next.stats.add(stat, -rates.get(stat) * minutes);
    }

    // Health: base drain plus neglect drain for every minute hunger or
    // cleanliness spends at 0.
    let knees = [
        minutes_until(pet.stats.hunger, rates.hunger),
        minutes_until(pet.stats.cleanliness, rates.cleanliness),
    ];
    let neglected: f64 = knees.iter().map(|k| (minutes - k).max(0.0)).sum();
    next.stats.add(
        Stat::Health,
        -(rates.health * minutes + d.neglect_health_per_minute * neglected),
    );
    if pet.stats.health > 0.0 && next.stats.health <= 0.0 {
        let at_minute =
            time_to_drain(pet.stats.health, rates.health, d.neglect_health_per_minute, knees)
                .unwrap_or(minutes)
                .min(minutes);
        let at = add_minutes(from, at_minute);
        next.achievements.counters.health_depleted_on_day = Some(age_in_days(pet.birth, at));
        log::info!("health depleted at {at}");
        events.push(PetEvent::HealthDepleted { at });
    }

    // Bond fades while asleep and once the interaction window has run out;
    // in between it slowly recovers. Segments are applied in time order.
    let neglect_from = (minutes_between(from, pet.last_interaction)
        + d.bond_neglect_window_minutes)
        .clamp(asleep, minutes);
    let mut bond = clamp_stat(pet.stats.bond - rates.bond * asleep);
    bond = clamp_stat(bond + d.bond_recovery_per_minute * (neglect_from - asleep));
    bond -= rates.bond * (minutes - neglect_from);
    next.stats.set(Stat::Bond, bond);

    next.last_visited = now;
    next.age_in_days = age_in_days(pet.birth, now);
    let stage = resolve_stage(next.age_in_days);
    if let Some(t) = detect_transition(pet.growth_stage, stage) {
        log::info!("grew from {} to {} at day {}", t.from, t.to, next.age_in_days);
        events.push(PetEvent::StageChanged {
            from:        t.from,
            to:          t.to,
            age_in_days: next.age_in_days,
        });
    }
    next.growth_stage = stage;
    refresh_mood(&mut next, &config.mood, &mut events);

    log::debug!(
        "decay {minutes:.3} min -> hunger={:.1} energy={:.1} happiness={:.1} health={:.1} \
         cleanliness={:.1} bond={:.1} day={}",
        next.stats.hunger,
        next.stats.energy,
        next.stats.happiness,
        next.stats.health,
        next.stats.cleanliness,
        next.stats.bond,
        next.age_in_days,
    );

    Ok((next, events))
}

/// Minutes until `amount` is used up at `rate` per minute.
fn minutes_until(amount: f64, rate: f64) -> f64 {
    if amount <= 0.0 {
        0.0
    } else if rate <= 0.0 {
        f64::INFINITY
    } else {
        amount / rate
    }
}

/// Minutes until a drain of `base` per minute, steepened by `extra` at
/// each knee, has removed `amount`. `None` if it never does.
fn time_to_drain(amount: f64, base: f64, extra: f64, mut knees: [f64; 2]) -> Option<f64> {
    knees.sort_by(f64::total_cmp);
    let mut t = 0.0;
    let mut drained = 0.0;
    let mut slope = base;
    for knee in knees.into_iter().filter(|k| k.is_finite()) {
        if knee > t {
            let segment = slope * (knee - t);
            if drained + segment >= amount && slope > 0.0 {
                return Some(t + (amount - drained) / slope);
            }
            drained += segment;
            t = knee;
        }
        slope += extra;
    }
    (slope > 0.0).then(|| t + (amount - drained) / slope)
}
