//! Achievement tests: predicates, idempotence, notification order.

use chrono::{Duration, TimeZone, Utc};
use pet_core::{
    achievement::{evaluate, AchievementId},
    config::PetConfig,
    event::PetEvent,
    stats::Stat,
    types::Timestamp,
    InteractionKind, PetEngine, Step,
};

fn t0() -> Timestamp {
    Utc.timestamp_millis_opt(1_700_000_000_000).unwrap()
}

fn engine() -> PetEngine {
    PetEngine::new(PetConfig::default()).expect("default config is valid")
}

fn unlocked(step: &Step) -> Vec<AchievementId> {
    step.events
        .iter()
        .filter_map(|e| match e {
            PetEvent::AchievementUnlocked { id } => Some(*id),
            _ => None,
        })
        .collect()
}

#[test]
fn first_meal_unlocks_exactly_once() {
    let engine = engine();
    let first = engine.interact(&engine.hatch(t0()), InteractionKind::Feed, t0()).unwrap();
    assert_eq!(unlocked(&first), vec![AchievementId::FirstMeal]);
    assert!(first.snapshot.achievements.has(AchievementId::FirstMeal));

    let second = engine
        .interact(&first.snapshot, InteractionKind::Feed, t0() + Duration::seconds(5))
        .unwrap();
    assert!(unlocked(&second).is_empty(), "re-unlocked: {:?}", unlocked(&second));
}

#[test]
fn simultaneous_unlocks_follow_declaration_order() {
    let engine = engine();
    let step = engine.advance(&engine.hatch(t0()), t0() + Duration::minutes(21)).unwrap();

    assert_eq!(
        unlocked(&step),
        vec![AchievementId::Hatched, AchievementId::GrownUp, AchievementId::Survivor]
    );
}

#[test]
fn peak_condition_needs_every_stat_high() {
    let engine = engine();
    let mut pet = engine.hatch(t0());
    for stat in Stat::ALL {
        pet.stats.set(stat, 85.0);
    }
    let step = engine.advance(&pet, t0()).unwrap();
    assert_eq!(unlocked(&step), vec![AchievementId::PeakCondition]);

    let mut almost = engine.hatch(t0());
    for stat in Stat::ALL {
        almost.stats.set(stat, 85.0);
    }
    almost.stats.set(Stat::Bond, 79.9);
    assert!(unlocked(&engine.advance(&almost, t0()).unwrap()).is_empty());
}

#[test]
fn best_friends_at_high_bond() {
    let engine = engine();
    let mut pet = engine.hatch(t0());
    pet.stats.set(Stat::Bond, 95.0);
    let step = engine.advance(&pet, t0()).unwrap();
    assert_eq!(unlocked(&step), vec![AchievementId::BestFriends]);
}

#[test]
fn gourmet_after_fifty_meals() {
    let engine = engine();
    let mut pet = engine.hatch(t0());

    for i in 0..50 {
        let step = engine
            .interact(&pet, InteractionKind::Feed, t0() + Duration::seconds(i))
            .unwrap();
        let got = unlocked(&step);
        match i {
            0  => assert_eq!(got, vec![AchievementId::FirstMeal]),
            49 => assert_eq!(got, vec![AchievementId::Gourmet]),
            _  => assert!(got.is_empty(), "meal {i} unlocked {got:?}"),
        }
        pet = step.snapshot;
    }
    assert_eq!(pet.achievements.counters.feeds, 50);
}

#[test]
fn sweet_dreams_after_ten_naps() {
    let engine = engine();
    let mut pet = engine.hatch(t0());

    for i in 0..10 {
        let start = t0() + Duration::seconds(20 * i);
        pet = engine.interact(&pet, InteractionKind::Sleep, start).unwrap().snapshot;
        pet = engine
            .interact(&pet, InteractionKind::Sleep, start + Duration::seconds(10))
            .unwrap()
            .snapshot;
    }
    assert_eq!(pet.achievements.counters.sleeps, 10);
    assert!(pet.achievements.has(AchievementId::SweetDreams));
}

#[test]
fn survivor_is_lost_once_health_runs_out() {
    let engine = engine();
    let mut pet = engine.hatch(t0());
    pet.stats.set(Stat::Hunger, 0.0);
    pet.stats.set(Stat::Cleanliness, 0.0);
    pet.stats.set(Stat::Health, 11.0);

    let step = engine.advance(&pet, t0() + Duration::minutes(20)).unwrap();
    assert_eq!(step.snapshot.stats.health, 0.0);
    assert_eq!(step.snapshot.achievements.counters.health_depleted_on_day, Some(5));
    assert!(
        !step.snapshot.achievements.has(AchievementId::Survivor),
        "a pet whose health ran out is not a survivor"
    );
}

#[test]
fn health_depletion_is_recorded_once() {
    let engine = engine();
    let mut pet = engine.hatch(t0());
    pet.stats.set(Stat::Hunger, 0.0);
    pet.stats.set(Stat::Cleanliness, 0.0);
    pet.stats.set(Stat::Health, 11.0);

    let first = engine.advance(&pet, t0() + Duration::minutes(20)).unwrap();
    let later = engine.advance(&first.snapshot, t0() + Duration::minutes(40)).unwrap();

    assert!(!later.events.iter().any(|e| matches!(e, PetEvent::HealthDepleted { .. })));
    assert_eq!(later.snapshot.achievements.counters.health_depleted_on_day, Some(5));
    assert!(!later.snapshot.achievements.has(AchievementId::Survivor));
}

#[test]
fn evaluation_is_idempotent() {
    let config = PetConfig::default();
    let engine = engine();
    let pet = engine.advance(&engine.hatch(t0()), t0() + Duration::minutes(8)).unwrap().snapshot;

    let (again, newly) = evaluate(&pet, &config.achievements);
    assert!(newly.is_empty(), "already-evaluated pet unlocked {newly:?}");
    assert_eq!(again, pet);
}
