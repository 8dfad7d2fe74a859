//! pet-runner: headless host for the pet simulation.
//!
//! Usage:
//!   pet-runner --seed 42 --minutes 120 --step 30 --db pet.db --pet rex
//!   pet-runner --ipc-mode --db pet.db --pet rex

mod caretaker;

use anyhow::Result;
use caretaker::Caretaker;
use pet_core::{
    clock::{Clock, ManualClock, SystemClock},
    config::PetConfig,
    event::PetEvent,
    store::{SimStore, SnapshotStore},
    stats::Stat,
    types::Timestamp,
    InteractionKind, PetEngine, PetSnapshot, SimError, Step,
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    Advance,
    Interact { kind: InteractionKind },
    Quit,
}

#[derive(serde::Serialize)]
struct UiState<'a> {
    pet:          &'a PetSnapshot,
    availability: pet_core::interaction::Availability,
    events:       &'a [PetEvent],
    error:        Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let minutes = parse_arg(&args, "--minutes", 120u64);
    let step_secs = parse_arg(&args, "--step", 30u64).max(1);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let db = str_arg(&args, "--db").unwrap_or(":memory:");
    let config_path = str_arg(&args, "--config").unwrap_or("./data/pet_config.json");
    let pet_id = str_arg(&args, "--pet")
        .map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let config = if std::path::Path::new(config_path).exists() {
        PetConfig::load(config_path)?
    } else {
        log::warn!("{config_path} not found, using built-in defaults");
        PetConfig::default()
    };
    let engine = PetEngine::new(config)?;

    let store = SimStore::open(db)?;
    store.migrate()?;

    if ipc_mode {
        return run_ipc_loop(&engine, &store, &pet_id);
    }

    println!("Virtual pet: pet-runner");
    println!("  pet:      {pet_id}");
    println!("  seed:     {seed}");
    println!("  minutes:  {minutes}");
    println!("  step:     {step_secs}s");
    println!("  db:       {db}");
    println!();

    let clock = ManualClock::new(SystemClock.now());
    let mut caretaker = Caretaker::new(seed, 0.35);
    let mut pet = record(&store, &pet_id, clock.now(), engine.resume(&store, &pet_id, clock.now())?)?;
    let mut blocked = 0u64;

    let ticks = minutes * 60 / step_secs;
    for _ in 0..ticks {
        let now = clock.advance_ms(step_secs as i64 * 1_000);
        pet = record(&store, &pet_id, now, engine.advance(&pet, now)?)?;

        let Some(kind) = caretaker.choose(&pet, &engine.availability(&pet)) else { continue };
        match engine.interact(&pet, kind, now) {
            Ok(step) => pet = record(&store, &pet_id, now, step)?,
            Err(e) if e.is_blocked() => {
                blocked += 1;
                log::debug!("caretaker denied: {e}");
            }
            Err(e) => return Err(e.into()),
        }
    }

    print_summary(&store, &pet_id, &pet, blocked)
}

/// Persist a step and report its events; returns the new snapshot.
fn record(store: &SimStore, pet_id: &str, now: Timestamp, step: Step) -> Result<PetSnapshot> {
    for event in &step.events {
        match event {
            PetEvent::StageChanged { to, age_in_days, .. } => {
                log::info!("day {age_in_days}: grew into a {to}")
            }
            PetEvent::AchievementUnlocked { id } => log::info!("achievement: {}", id.title()),
            other => log::debug!("{other:?}"),
        }
    }
    store.append_events(pet_id, now, &step.events)?;
    store.save(pet_id, &step.snapshot)?;
    Ok(step.snapshot)
}

fn run_ipc_loop(engine: &PetEngine, store: &SimStore, pet_id: &str) -> Result<()> {
    let clock = SystemClock;
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    let mut pet = record(store, pet_id, clock.now(), engine.resume(store, pet_id, clock.now())?)?;

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                let err_json = serde_json::json!({ "error": e.to_string() });
                writeln!(stdout, "{}", err_json)?;
                stdout.flush()?;
                continue;
            }
        };

        let result = match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GetState => Ok(Step { snapshot: pet.clone(), events: Vec::new() }),
            IpcCommand::Advance => engine.advance_with(&pet, &clock),
            IpcCommand::Interact { kind } => engine.interact_with(&pet, kind, &clock),
        };

        let (events, error) = match result {
            Ok(step) => {
                let events = step.events.clone();
                pet = record(store, pet_id, clock.now(), step)?;
                (events, None)
            }
            Err(e @ (SimError::InteractionBlocked { .. } | SimError::InvalidElapsedTime { .. })) => {
                (Vec::new(), Some(e.to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        let state = UiState {
            pet:          &pet,
            availability: engine.availability(&pet),
            events:       &events,
            error,
        };
        writeln!(stdout, "{}", serde_json::to_string(&state)?)?;
        stdout.flush()?;
    }
    Ok(())
}

fn print_summary(store: &SimStore, pet_id: &str, pet: &PetSnapshot, blocked: u64) -> Result<()> {
    let counters = &pet.achievements.counters;

    println!("=== RUN SUMMARY ===");
    println!("  age:            {} days ({})", pet.age_in_days, pet.growth_stage);
    println!("  mood:           {}", pet.mood);
    for stat in Stat::ALL {
        println!("  {:<15} {}", format!("{stat}:"), pet.stats.rounded(stat));
    }
    println!("  feeds:          {}", counters.feeds);
    println!("  plays:          {}", counters.plays);
    println!("  cleans:         {}", counters.cleans);
    println!("  naps:           {}", counters.sleeps);
    println!("  denied:         {blocked}");
    match counters.health_depleted_on_day {
        Some(day) => println!("  health lost:    day {day}"),
        None      => println!("  health lost:    never"),
    }
    println!("  events logged:  {}", store.event_count(pet_id)?);

    println!();
    println!("=== ACHIEVEMENTS ===");
    if pet.achievements.unlocked.is_empty() {
        println!("  (none yet)");
    } else {
        for id in &pet.achievements.unlocked {
            println!("  {}", id.title());
        }
    }
    Ok(())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

fn str_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2).find(|w| w[0] == flag).map(|w| w[1].as_str())
}
