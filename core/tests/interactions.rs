//! Interaction tests: effects, activity windows, the sleep toggle, blocking.

use chrono::{Duration, TimeZone, Utc};
use pet_core::{
    config::PetConfig,
    event::{PetEvent, WakeReason},
    interaction::BlockReason,
    mood::Mood,
    snapshot::Activity,
    stats::Stat,
    types::Timestamp,
    InteractionKind, PetEngine, SimError,
};

fn t0() -> Timestamp {
    Utc.timestamp_millis_opt(1_700_000_000_000).unwrap()
}

fn engine() -> PetEngine {
    PetEngine::new(PetConfig::default()).expect("default config is valid")
}

#[test]
fn feeding_a_fresh_pet() {
    let engine = engine();
    let pet = engine.hatch(t0());

    let step = engine.interact(&pet, InteractionKind::Feed, t0()).unwrap();
    let fed = &step.snapshot;

    assert_eq!(fed.stats.hunger, 100.0, "80 + 20");
    assert_eq!(fed.stats.energy, 80.0, "75 + 5");
    assert_eq!(fed.current_activity(), Some(Activity::Eating));
    assert_eq!(
        fed.activity.as_ref().and_then(|a| a.ends_at),
        Some(t0() + Duration::milliseconds(3_000))
    );
    assert_eq!(fed.last_interaction, t0());
    assert_eq!(fed.achievements.counters.feeds, 1);
    assert_eq!(fed.achievements.counters.interactions, 1);
    assert!(step.events.contains(&PetEvent::InteractionApplied {
        kind: InteractionKind::Feed,
        at:   t0(),
    }));
}

#[test]
fn feeding_clamps_at_full() {
    let engine = engine();
    let pet = engine.interact(&engine.hatch(t0()), InteractionKind::Feed, t0()).unwrap().snapshot;
    let again = engine.interact(&pet, InteractionKind::Feed, t0()).unwrap().snapshot;
    assert_eq!(again.stats.hunger, 100.0);
}

#[test]
fn interactions_see_decayed_stats() {
    let engine = engine();
    let pet = engine.hatch(t0());

    let step = engine
        .interact(&pet, InteractionKind::Feed, t0() + Duration::minutes(10))
        .unwrap();
    // 80 - 12 from ten minutes of decay, then + 20.
    assert!((step.snapshot.stats.hunger - 88.0).abs() < 1e-9);
    assert_eq!(step.snapshot.last_visited, t0() + Duration::minutes(10));
}

#[test]
fn play_and_clean_apply_their_tables() {
    let engine = engine();
    let pet = engine.hatch(t0());

    let played = engine.interact(&pet, InteractionKind::Play, t0()).unwrap().snapshot;
    assert_eq!(played.stats.happiness, 100.0, "90 + 25 clamps");
    assert_eq!(played.stats.energy, 60.0);
    assert_eq!(played.stats.hunger, 70.0);
    assert_eq!(played.current_activity(), Some(Activity::Playing));

    let cleaned = engine.interact(&played, InteractionKind::Clean, t0()).unwrap().snapshot;
    assert_eq!(cleaned.stats.cleanliness, 100.0);
    assert_eq!(cleaned.stats.happiness, 95.0);
    assert_eq!(cleaned.current_activity(), Some(Activity::Cleaning));
    assert_eq!(cleaned.achievements.counters.plays, 1);
    assert_eq!(cleaned.achievements.counters.cleans, 1);
}

#[test]
fn play_is_blocked_when_too_tired() {
    let engine = engine();
    let mut pet = engine.hatch(t0());
    pet.stats.set(Stat::Energy, 5.0);

    let err = engine.interact(&pet, InteractionKind::Play, t0()).unwrap_err();
    match err {
        SimError::InteractionBlocked { kind, reason, .. } => {
            assert_eq!(kind, InteractionKind::Play);
            assert_eq!(reason, BlockReason::StatTooLow { stat: Stat::Energy, minimum: 10.0 });
        }
        other => panic!("expected InteractionBlocked, got {other:?}"),
    }
}

#[test]
fn timed_activity_clears_on_the_next_advance() {
    let engine = engine();
    let fed = engine
        .interact(&engine.hatch(t0()), InteractionKind::Feed, t0())
        .unwrap()
        .snapshot;

    let early = engine.advance(&fed, t0() + Duration::milliseconds(2_999)).unwrap();
    assert_eq!(early.snapshot.current_activity(), Some(Activity::Eating));

    let done = engine.advance(&early.snapshot, t0() + Duration::milliseconds(3_000)).unwrap();
    assert_eq!(done.snapshot.activity, None);
    assert!(done.events.contains(&PetEvent::ActivityEnded {
        activity: Activity::Eating,
        at:       t0() + Duration::milliseconds(3_000),
    }));
}

#[test]
fn sleeping_restores_energy() {
    let engine = engine();
    let asleep = engine
        .interact(&engine.hatch(t0()), InteractionKind::Sleep, t0())
        .unwrap()
        .snapshot;
    assert_eq!(asleep.current_activity(), Some(Activity::Sleeping));
    assert_eq!(asleep.activity.as_ref().and_then(|a| a.ends_at), None);
    assert_eq!(asleep.mood, Mood::Sleeping);

    let later = engine.advance(&asleep, t0() + Duration::minutes(1)).unwrap().snapshot;
    assert!(
        later.stats.energy > asleep.stats.energy,
        "energy should rise while asleep: {} -> {}",
        asleep.stats.energy,
        later.stats.energy
    );
    assert_eq!(later.stats.energy, 79.0);
    assert_eq!(later.current_activity(), Some(Activity::Sleeping));
}

#[test]
fn sleep_ends_when_fully_rested() {
    let engine = engine();
    let asleep = engine
        .interact(&engine.hatch(t0()), InteractionKind::Sleep, t0())
        .unwrap()
        .snapshot;

    // 25 missing points at 4/min: rested after 6.25 minutes, awake for the rest.
    let step = engine.advance(&asleep, t0() + Duration::minutes(10)).unwrap();
    assert_eq!(step.snapshot.activity, None);
    assert!(step.events.contains(&PetEvent::WokeUp {
        reason: WakeReason::Rested,
        at:     t0() + Duration::milliseconds(375_000),
    }));
    assert_eq!(step.snapshot.stats.energy, 100.0 - 3.75);
    assert_ne!(step.snapshot.mood, Mood::Sleeping);
}

#[test]
fn sleep_is_a_toggle() {
    let engine = engine();
    let asleep = engine
        .interact(&engine.hatch(t0()), InteractionKind::Sleep, t0())
        .unwrap()
        .snapshot;

    let woken = engine
        .interact(&asleep, InteractionKind::Sleep, t0() + Duration::minutes(1))
        .unwrap();
    assert_eq!(woken.snapshot.activity, None);
    assert!(woken.events.contains(&PetEvent::WokeUp {
        reason: WakeReason::Toggled,
        at:     t0() + Duration::minutes(1),
    }));
    assert_eq!(woken.snapshot.achievements.counters.sleeps, 1, "only starting sleep counts");
    assert_eq!(woken.snapshot.last_interaction, t0() + Duration::minutes(1));
}

#[test]
fn play_while_sleeping_is_blocked_and_leaves_pet_untouched() {
    let engine = engine();
    let asleep = engine
        .interact(&engine.hatch(t0()), InteractionKind::Sleep, t0())
        .unwrap()
        .snapshot;
    let before = asleep.clone();

    let err = engine
        .interact(&asleep, InteractionKind::Play, t0() + Duration::seconds(30))
        .unwrap_err();
    match err {
        SimError::InteractionBlocked { kind, reason, current_activity } => {
            assert_eq!(kind, InteractionKind::Play);
            assert_eq!(reason, BlockReason::Sleeping);
            assert_eq!(current_activity, Some(Activity::Sleeping));
        }
        other => panic!("expected InteractionBlocked, got {other:?}"),
    }
    assert!(engine
        .interact(&asleep, InteractionKind::Feed, t0() + Duration::seconds(30))
        .is_err_and(|e| e.is_blocked()));
    assert_eq!(asleep, before);
}

#[test]
fn sleep_cannot_start_over_a_running_activity() {
    let engine = engine();
    let fed = engine
        .interact(&engine.hatch(t0()), InteractionKind::Feed, t0())
        .unwrap()
        .snapshot;

    let err = engine
        .interact(&fed, InteractionKind::Sleep, t0() + Duration::seconds(1))
        .unwrap_err();
    assert!(
        matches!(err, SimError::InteractionBlocked { reason: BlockReason::Busy, .. }),
        "got {err:?}"
    );

    // Once the meal is over, sleep is allowed.
    let asleep = engine
        .interact(&fed, InteractionKind::Sleep, t0() + Duration::seconds(3))
        .unwrap();
    assert_eq!(asleep.snapshot.current_activity(), Some(Activity::Sleeping));
}

#[test]
fn timed_activities_replace_each_other() {
    let engine = engine();
    let fed = engine
        .interact(&engine.hatch(t0()), InteractionKind::Feed, t0())
        .unwrap()
        .snapshot;
    let playing = engine
        .interact(&fed, InteractionKind::Play, t0() + Duration::seconds(1))
        .unwrap()
        .snapshot;
    assert_eq!(playing.current_activity(), Some(Activity::Playing));
    assert_eq!(
        playing.activity.as_ref().and_then(|a| a.ends_at),
        Some(t0() + Duration::seconds(4))
    );
}

#[test]
fn availability_tracks_sleep() {
    let engine = engine();
    let pet = engine.hatch(t0());
    let awake = engine.availability(&pet);
    for kind in InteractionKind::ALL {
        assert!(awake.is_available(kind), "{kind} should be available on a fresh pet");
    }

    let asleep = engine.interact(&pet, InteractionKind::Sleep, t0()).unwrap().snapshot;
    let a = engine.availability(&asleep);
    assert!(!a.feed && !a.play && !a.clean);
    assert!(a.sleep, "waking up is always allowed");
}

#[test]
fn interacting_in_the_past_is_rejected() {
    let engine = engine();
    let pet = engine.advance(&engine.hatch(t0()), t0() + Duration::minutes(2)).unwrap().snapshot;
    let err = engine
        .interact(&pet, InteractionKind::Feed, t0() + Duration::minutes(1))
        .unwrap_err();
    assert!(matches!(err, SimError::InvalidElapsedTime { .. }), "got {err:?}");
}
