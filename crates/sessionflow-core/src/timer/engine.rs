//! Session countdown engine.
//!
//! The engine is a wall-clock-delta state machine. It owns no clock and no
//! thread - the caller feeds it elapsed milliseconds via `tick()`, normally
//! from a [`Ticker`](crate::clock::Ticker) at one-second period. Computing
//! progress from measured deltas rather than tick counts keeps the countdown
//! honest when tick delivery is irregular.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> (Paused | Warning) -> Ended
//! ```
//!
//! The warning transition fires when the remaining time crosses the
//! five-minute boundary from above, exactly once per crossing. A single
//! oversized delta that carries the countdown past both the warning boundary
//! and zero emits both events in order.
//!
//! Invalid commands (`pause()` while idle, `start()` while running) are
//! silent no-ops returning `None`.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::events::Event;

/// Remaining time at which a running session flips to `Warning`.
pub const WARNING_BEFORE_END_SECS: u64 = 5 * 60;

const WARNING_BEFORE_END_MS: u64 = WARNING_BEFORE_END_SECS * 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    Idle,
    Running,
    Paused,
    /// Under five minutes remain; still counting down.
    Warning,
    Ended,
}

/// Who the session is with, shown next to the countdown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionInfo {
    #[serde(default)]
    pub patient_name: Option<String>,
    #[serde(default)]
    pub appointment_title: Option<String>,
}

/// Core countdown engine for a single clinical session.
///
/// Serializable so a host can persist it between process invocations and
/// resume by feeding the missed wall-clock delta.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountdownEngine {
    status: TimerStatus,
    /// Selected session length in milliseconds; grows on `extend()`.
    total_ms: u64,
    /// Accumulated running time in milliseconds, clamped to `total_ms`.
    elapsed_ms: u64,
    #[serde(default)]
    session: Option<SessionInfo>,
}

impl CountdownEngine {
    /// Create an idle engine with the given session length.
    pub fn new(duration_secs: u64) -> Self {
        Self {
            status: TimerStatus::Idle,
            total_ms: duration_secs.saturating_mul(1000),
            elapsed_ms: 0,
            session: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn total_secs(&self) -> u64 {
        self.total_ms / 1000
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_ms / 1000
    }

    pub fn remaining_ms(&self) -> u64 {
        self.total_ms.saturating_sub(self.elapsed_ms)
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_ms() / 1000
    }

    pub fn session(&self) -> Option<&SessionInfo> {
        self.session.as_ref()
    }

    /// 0.0 .. 1.0 progress through the session.
    pub fn progress(&self) -> f64 {
        if self.total_ms == 0 {
            return 0.0;
        }
        self.elapsed_ms as f64 / self.total_ms as f64
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            status: self.status,
            remaining_secs: self.remaining_secs(),
            total_secs: self.total_secs(),
            progress_pct: self.progress() * 100.0,
            session: self.session.clone(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin the countdown. Only valid from `Idle`; a no-op otherwise.
    pub fn start(&mut self, duration_secs: u64, session: Option<SessionInfo>) -> Option<Event> {
        if self.status != TimerStatus::Idle || duration_secs == 0 {
            return None;
        }
        self.total_ms = duration_secs.saturating_mul(1000);
        self.elapsed_ms = 0;
        self.session = session;
        self.status = TimerStatus::Running;
        Some(Event::TimerStarted {
            duration_secs,
            session: self.session.clone(),
            at: Utc::now(),
        })
    }

    /// Freeze the countdown. Valid from `Running` or `Warning`.
    pub fn pause(&mut self) -> Option<Event> {
        match self.status {
            TimerStatus::Running | TimerStatus::Warning => {
                self.status = TimerStatus::Paused;
                Some(Event::TimerPaused {
                    remaining_secs: self.remaining_secs(),
                    at: Utc::now(),
                })
            }
            _ => None,
        }
    }

    /// Continue from `Paused`, restoring `Running` or `Warning` from the
    /// remaining time.
    pub fn resume(&mut self) -> Option<Event> {
        if self.status != TimerStatus::Paused {
            return None;
        }
        self.status = self.status_for_remaining();
        Some(Event::TimerResumed {
            remaining_secs: self.remaining_secs(),
            at: Utc::now(),
        })
    }

    /// Clear all runtime state back to `Idle`. Valid from any state; the
    /// selected duration is kept.
    pub fn reset(&mut self) -> Option<Event> {
        self.status = TimerStatus::Idle;
        self.elapsed_ms = 0;
        self.session = None;
        Some(Event::TimerReset { at: Utc::now() })
    }

    /// Add minutes to the session total. Valid from `Warning` or `Ended`;
    /// the countdown goes back to `Running` and the next tick performs the
    /// warning crossing again if applicable.
    pub fn extend(&mut self, minutes: u32) -> Option<Event> {
        if minutes == 0 {
            return None;
        }
        match self.status {
            TimerStatus::Warning | TimerStatus::Ended => {
                self.total_ms = self.total_ms.saturating_add(u64::from(minutes) * 60_000);
                self.status = TimerStatus::Running;
                Some(Event::TimerExtended {
                    added_min: minutes,
                    remaining_secs: self.remaining_secs(),
                    at: Utc::now(),
                })
            }
            _ => None,
        }
    }

    /// Change the selected duration. Only honored while `Idle`.
    pub fn set_duration(&mut self, duration_secs: u64) {
        if self.status == TimerStatus::Idle && duration_secs > 0 {
            self.total_ms = duration_secs.saturating_mul(1000);
            self.elapsed_ms = 0;
        }
    }

    /// Advance the countdown by a measured wall-clock delta. No-op unless
    /// `Running` or `Warning`. Returns the boundary events the delta
    /// produced, in order.
    pub fn tick(&mut self, delta_ms: u64) -> Vec<Event> {
        let mut events = Vec::new();
        if !matches!(self.status, TimerStatus::Running | TimerStatus::Warning) {
            return events;
        }

        let prev_remaining = self.remaining_ms();
        self.elapsed_ms = self.elapsed_ms.saturating_add(delta_ms).min(self.total_ms);
        let remaining = self.remaining_ms();

        if self.status == TimerStatus::Running
            && prev_remaining > WARNING_BEFORE_END_MS
            && remaining <= WARNING_BEFORE_END_MS
        {
            self.status = TimerStatus::Warning;
            events.push(Event::WarningReached {
                remaining_secs: remaining / 1000,
                at: Utc::now(),
            });
        }

        if remaining == 0 {
            self.status = TimerStatus::Ended;
            events.push(Event::TimerEnded { at: Utc::now() });
        }

        events
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn status_for_remaining(&self) -> TimerStatus {
        let remaining = self.remaining_ms();
        if remaining == 0 {
            TimerStatus::Ended
        } else if remaining > WARNING_BEFORE_END_MS {
            TimerStatus::Running
        } else {
            TimerStatus::Warning
        }
    }
}

impl Default for CountdownEngine {
    /// Idle engine at the default 40-minute session length.
    fn default() -> Self {
        Self::new(40 * 60)
    }
}
