use std::sync::mpsc;

use clap::Subcommand;
use serde::{Deserialize, Serialize};

use sessionflow_core::clock::{self, now_ms};
use sessionflow_core::storage::Database;
use sessionflow_core::{
    cue_for_event, Config, CountdownEngine, Event, KvStore, SessionInfo, SessionKind, Ticker,
    TimerStatus,
};

const ENGINE_KEY: &str = "countdown_engine";

#[derive(Subcommand)]
pub enum SessionAction {
    /// Start the session countdown
    Start {
        /// Session length in minutes (defaults to the configured duration)
        #[arg(long)]
        minutes: Option<u32>,
        /// Patient name shown next to the countdown
        #[arg(long)]
        patient: Option<String>,
        /// Appointment title shown next to the countdown
        #[arg(long)]
        appointment: Option<String>,
    },
    /// Pause the countdown
    Pause,
    /// Resume a paused countdown
    Resume,
    /// Reset to idle
    Reset,
    /// Add minutes while in warning or ended
    Extend {
        #[arg(long, default_value = "5")]
        minutes: u32,
    },
    /// Print current timer state as JSON
    Status,
    /// Run a session live, printing events until it ends
    Run {
        #[arg(long)]
        minutes: Option<u32>,
        #[arg(long)]
        patient: Option<String>,
    },
}

/// Engine plus the bookkeeping the stateless CLI needs between invocations:
/// when it was last saved (to feed the missed wall-clock delta) and what to
/// write to the session log on completion.
#[derive(Serialize, Deserialize)]
struct StoredEngine {
    engine: CountdownEngine,
    saved_at_ms: u64,
    #[serde(default)]
    started_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    extended_min: u64,
}

impl Default for StoredEngine {
    fn default() -> Self {
        let config = Config::load_or_default();
        Self {
            engine: CountdownEngine::new(u64::from(config.timer.default_duration_min) * 60),
            saved_at_ms: now_ms(),
            started_at: None,
            extended_min: 0,
        }
    }
}

fn load_stored(db: &Database) -> StoredEngine {
    if let Ok(Some(json)) = db.kv_get(ENGINE_KEY) {
        if let Ok(stored) = serde_json::from_str::<StoredEngine>(&json) {
            return stored;
        }
    }
    StoredEngine::default()
}

fn save_stored(db: &mut Database, stored: &mut StoredEngine) -> Result<(), Box<dyn std::error::Error>> {
    stored.saved_at_ms = now_ms();
    let json = serde_json::to_string(stored)?;
    db.kv_set(ENGINE_KEY, &json)?;
    Ok(())
}

/// Log the completed session once the countdown reports it ended.
fn handle_events(
    db: &Database,
    stored: &StoredEngine,
    events: &[Event],
) -> Result<(), Box<dyn std::error::Error>> {
    for event in events {
        if let Event::TimerEnded { at } = event {
            let label = stored
                .engine
                .session()
                .and_then(|s| s.patient_name.clone())
                .unwrap_or_default();
            db.record_session(
                SessionKind::Clinical,
                &label,
                stored.engine.total_secs(),
                stored.extended_min,
                stored.started_at.unwrap_or(*at),
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

pub fn run(action: SessionAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let mut db = Database::open()?;
    let mut stored = load_stored(&db);

    // Account for the wall-clock time since the last invocation.
    let delta = now_ms().saturating_sub(stored.saved_at_ms);
    let catch_up = stored.engine.tick(delta);
    handle_events(&db, &stored, &catch_up)?;
    for event in &catch_up {
        print_event(event)?;
    }

    match action {
        SessionAction::Start {
            minutes,
            patient,
            appointment,
        } => {
            let minutes = minutes.unwrap_or(config.timer.default_duration_min);
            let session = (patient.is_some() || appointment.is_some()).then(|| SessionInfo {
                patient_name: patient,
                appointment_title: appointment,
            });
            match stored.engine.start(u64::from(minutes) * 60, session) {
                Some(event) => {
                    stored.started_at = Some(chrono::Utc::now());
                    stored.extended_min = 0;
                    print_event(&event)?;
                }
                None => print_event(&stored.engine.snapshot())?,
            }
        }
        SessionAction::Pause => match stored.engine.pause() {
            Some(event) => print_event(&event)?,
            None => print_event(&stored.engine.snapshot())?,
        },
        SessionAction::Resume => match stored.engine.resume() {
            Some(event) => print_event(&event)?,
            None => print_event(&stored.engine.snapshot())?,
        },
        SessionAction::Reset => {
            stored.engine.reset();
            stored.started_at = None;
            stored.extended_min = 0;
            println!("{{\"type\": \"timer_reset\"}}");
        }
        SessionAction::Extend { minutes } => match stored.engine.extend(minutes) {
            Some(event) => {
                stored.extended_min += u64::from(minutes);
                print_event(&event)?;
            }
            None => print_event(&stored.engine.snapshot())?,
        },
        SessionAction::Status => {
            print_event(&stored.engine.snapshot())?;
        }
        SessionAction::Run { minutes, patient } => {
            let minutes = minutes.unwrap_or(config.timer.default_duration_min);
            stored.engine.reset();
            let session = patient.map(|name| SessionInfo {
                patient_name: Some(name),
                appointment_title: None,
            });
            if let Some(event) = stored.engine.start(u64::from(minutes) * 60, session) {
                stored.started_at = Some(chrono::Utc::now());
                stored.extended_min = 0;
                print_event(&event)?;
            }
            run_live(&db, &mut stored, config.notifications.sound_enabled)?;
        }
    }

    save_stored(&mut db, &mut stored)?;
    Ok(())
}

/// Drive the engine off the one-second ticker until it ends. Dropping the
/// ticker on the way out cancels the tick thread.
fn run_live(
    db: &Database,
    stored: &mut StoredEngine,
    sound_enabled: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (tx, rx) = mpsc::channel();
    let ticker = Ticker::spawn(clock::SESSION_TICK, move |delta_ms| {
        let _ = tx.send(delta_ms);
    });

    while let Ok(delta_ms) = rx.recv() {
        let events = stored.engine.tick(delta_ms);
        handle_events(db, stored, &events)?;
        for event in &events {
            print_event(event)?;
            if let Some(cue) = cue_for_event(event, sound_enabled) {
                println!("{}", serde_json::to_string(&cue)?);
            }
        }
        if stored.engine.status() == TimerStatus::Ended {
            break;
        }
    }

    drop(ticker);
    Ok(())
}
