use std::sync::mpsc;

use clap::Subcommand;
use serde::{Deserialize, Serialize};

use sessionflow_core::clock::{self, now_ms};
use sessionflow_core::storage::Database;
use sessionflow_core::{
    builtin_exercises, cue_for_event, find_exercise, BreathSequencer, Config, Event, KvStore,
    SessionKind, Ticker,
};

const SEQUENCER_KEY: &str = "breath_sequencer";

#[derive(Subcommand)]
pub enum BreatheAction {
    /// List the built-in breathing exercises
    List,
    /// Start an exercise by id (see `breathe list`)
    Start { exercise: String },
    /// Print current sequencer state as JSON
    Status,
    /// Abandon the current exercise
    Reset,
    /// Run an exercise live, printing phase changes until it completes
    Run { exercise: String },
}

#[derive(Serialize, Deserialize)]
struct StoredSequencer {
    sequencer: BreathSequencer,
    saved_at_ms: u64,
    started_at: chrono::DateTime<chrono::Utc>,
}

fn load_stored(db: &Database) -> Option<StoredSequencer> {
    let json = db.kv_get(SEQUENCER_KEY).ok()??;
    serde_json::from_str(&json).ok()
}

fn save_stored(
    db: &mut Database,
    stored: &mut StoredSequencer,
) -> Result<(), Box<dyn std::error::Error>> {
    stored.saved_at_ms = now_ms();
    let json = serde_json::to_string(stored)?;
    db.kv_set(SEQUENCER_KEY, &json)?;
    Ok(())
}

/// Log the finished run once the sequencer reports completion.
fn handle_events(
    db: &Database,
    stored: &StoredSequencer,
    events: &[Event],
) -> Result<(), Box<dyn std::error::Error>> {
    for event in events {
        if let Event::ExerciseCompleted { exercise, cycles, at } = event {
            let duration_secs = find_exercise(exercise)
                .map(|e| e.pattern.total_ms() / 1000 * u64::from(*cycles))
                .unwrap_or(0);
            db.record_session(
                SessionKind::Breathing,
                exercise,
                duration_secs,
                0,
                stored.started_at,
                *at,
            )?;
        }
    }
    Ok(())
}

fn print_event(event: &Event) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(event)?);
    Ok(())
}

pub fn run(action: BreatheAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        BreatheAction::List => {
            for exercise in builtin_exercises() {
                let p = &exercise.pattern;
                println!(
                    "{:20} {} ({})  {}-{}-{}-{}s x{}  [{}]",
                    exercise.id,
                    exercise.name,
                    exercise.name_he,
                    p.inhale_ms as f64 / 1000.0,
                    p.hold_ms as f64 / 1000.0,
                    p.exhale_ms as f64 / 1000.0,
                    p.hold_after_ms as f64 / 1000.0,
                    exercise.cycles,
                    serde_json::to_value(exercise.level)?.as_str().unwrap_or(""),
                );
            }
            Ok(())
        }
        BreatheAction::Start { exercise } => {
            let Some(found) = find_exercise(&exercise) else {
                return Err(format!("unknown exercise: {exercise}").into());
            };
            let mut db = Database::open()?;
            let mut stored = StoredSequencer {
                sequencer: BreathSequencer::new(&found),
                saved_at_ms: now_ms(),
                started_at: chrono::Utc::now(),
            };
            match stored.sequencer.start() {
                Some(event) => print_event(&event)?,
                None => print_event(&stored.sequencer.snapshot())?,
            }
            save_stored(&mut db, &mut stored)
        }
        BreatheAction::Status => {
            let mut db = Database::open()?;
            match load_stored(&db) {
                Some(mut stored) => {
                    let delta = now_ms().saturating_sub(stored.saved_at_ms);
                    let events = stored.sequencer.tick(delta);
                    handle_events(&db, &stored, &events)?;
                    for event in &events {
                        print_event(event)?;
                    }
                    print_event(&stored.sequencer.snapshot())?;
                    save_stored(&mut db, &mut stored)
                }
                None => {
                    println!("{{\"type\": \"no_exercise\"}}");
                    Ok(())
                }
            }
        }
        BreatheAction::Reset => {
            let mut db = Database::open()?;
            if let Some(mut stored) = load_stored(&db) {
                stored.sequencer.reset();
                save_stored(&mut db, &mut stored)?;
            }
            println!("{{\"type\": \"exercise_reset\"}}");
            Ok(())
        }
        BreatheAction::Run { exercise } => {
            let Some(found) = find_exercise(&exercise) else {
                return Err(format!("unknown exercise: {exercise}").into());
            };
            let config = Config::load_or_default();
            let mut db = Database::open()?;
            let mut stored = StoredSequencer {
                sequencer: BreathSequencer::new(&found),
                saved_at_ms: now_ms(),
                started_at: chrono::Utc::now(),
            };
            if let Some(event) = stored.sequencer.start() {
                print_event(&event)?;
            }
            run_live(&db, &mut stored, config.notifications.sound_enabled)?;
            save_stored(&mut db, &mut stored)
        }
    }
}

/// Drive the sequencer off the 100 ms ticker until the run completes.
fn run_live(
    db: &Database,
    stored: &mut StoredSequencer,
    sound_enabled: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (tx, rx) = mpsc::channel();
    let ticker = Ticker::spawn(clock::BREATH_TICK, move |delta_ms| {
        let _ = tx.send(delta_ms);
    });

    while let Ok(delta_ms) = rx.recv() {
        let events = stored.sequencer.tick(delta_ms);
        handle_events(db, stored, &events)?;
        for event in &events {
            print_event(event)?;
            if let Some(cue) = cue_for_event(event, sound_enabled) {
                println!("{}", serde_json::to_string(&cue)?);
            }
        }
        if !stored.sequencer.is_active() {
            break;
        }
    }

    drop(ticker);
    Ok(())
}
