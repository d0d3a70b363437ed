//! # Sessionflow Core Library
//!
//! Core logic for Sessionflow, the clinic session timer: a countdown for
//! time-boxing clinical visits and a phase sequencer for guided
//! vagus-stimulation breathing exercises. The CLI binary and any GUI shell
//! are thin layers over this library.
//!
//! ## Architecture
//!
//! - **Countdown Engine**: a wall-clock-delta state machine; the caller
//!   feeds elapsed milliseconds via `tick()`, normally from a [`Ticker`]
//! - **Breath Sequencer**: cycles inhale/hold/exhale phases from the
//!   built-in exercise catalog, skipping empty phases
//! - **Feedback**: pure mapping from boundary events to haptic/tone cues
//! - **Storage**: SQLite session log and kv store, TOML configuration,
//!   and the persisted widget record
//!
//! ## Key Components
//!
//! - [`CountdownEngine`]: session countdown state machine
//! - [`BreathSequencer`]: breathing phase state machine
//! - [`Database`]: session log and kv persistence
//! - [`Config`]: application configuration management

pub mod breathing;
pub mod clock;
pub mod error;
pub mod events;
pub mod feedback;
pub mod storage;
pub mod timer;

pub use breathing::{
    builtin_exercises, find_exercise, BreathPhase, BreathSequencer, BreathingExercise,
    ExerciseLevel, PhasePattern,
};
pub use clock::Ticker;
pub use error::{ConfigError, CoreError, StorageError};
pub use events::Event;
pub use feedback::{cue_for_event, Beep, FeedbackCue, HapticCue};
pub use storage::{
    Config, Database, KvStore, MemoryStore, SessionKind, Stats, WidgetPosition, WidgetState,
};
pub use timer::{CountdownEngine, Language, SessionInfo, TimerStatus, WARNING_BEFORE_END_SECS};
