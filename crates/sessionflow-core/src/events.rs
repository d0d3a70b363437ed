use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::breathing::BreathPhase;
use crate::timer::{SessionInfo, TimerStatus};

/// Every phase-boundary crossing and command produces an Event.
/// The host view consumes them to drive audio, haptics and UI updates;
/// steady ticks inside a phase produce nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        duration_secs: u64,
        session: Option<SessionInfo>,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    /// Practitioner tapped an extension preset while in warning/ended.
    TimerExtended {
        added_min: u32,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// Remaining time crossed the five-minute boundary. Fires exactly once
    /// per crossing.
    WarningReached {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerEnded {
        at: DateTime<Utc>,
    },
    ExerciseStarted {
        exercise: String,
        cycle_target: u32,
        at: DateTime<Utc>,
    },
    /// The sequencer entered a new breathing phase.
    PhaseChanged {
        phase: BreathPhase,
        cycle: u32,
        at: DateTime<Utc>,
    },
    CycleCompleted {
        cycle: u32,
        cycle_target: u32,
        at: DateTime<Utc>,
    },
    /// All cycles done; the sequencer is back at terminal idle.
    ExerciseCompleted {
        exercise: String,
        cycles: u32,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        status: TimerStatus,
        remaining_secs: u64,
        total_secs: u64,
        progress_pct: f64,
        session: Option<SessionInfo>,
        at: DateTime<Utc>,
    },
    BreathSnapshot {
        exercise: String,
        phase: BreathPhase,
        cycle: u32,
        cycle_target: u32,
        phase_progress: f64,
        at: DateTime<Utc>,
    },
}
