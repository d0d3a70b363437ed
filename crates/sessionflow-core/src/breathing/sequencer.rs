//! Breathing phase sequencer.
//!
//! Cycles `inhale -> [hold] -> exhale -> [hold_after]` for a configured
//! number of repetitions, then returns to terminal `Idle`. Like the
//! countdown engine it is driven by wall-clock deltas from the caller,
//! normally at 100 ms period so phase progress animates smoothly.
//!
//! Zero-duration phases are never entered. Phase advancement iterates
//! linearly through the cycle, so consecutive zero-length phases and
//! arbitrarily large deltas are consumed without recursion.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::exercise::{BreathPhase, BreathingExercise, PhasePattern};
use crate::events::Event;

/// Phase-cycling state machine for one guided breathing run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreathSequencer {
    exercise_id: String,
    pattern: PhasePattern,
    cycle_target: u32,
    phase: BreathPhase,
    elapsed_in_phase_ms: u64,
    current_cycle: u32,
}

impl BreathSequencer {
    pub fn new(exercise: &BreathingExercise) -> Self {
        Self {
            exercise_id: exercise.id.clone(),
            pattern: exercise.pattern,
            cycle_target: exercise.cycles,
            phase: BreathPhase::Idle,
            elapsed_in_phase_ms: 0,
            current_cycle: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn exercise_id(&self) -> &str {
        &self.exercise_id
    }

    pub fn phase(&self) -> BreathPhase {
        self.phase
    }

    pub fn current_cycle(&self) -> u32 {
        self.current_cycle
    }

    pub fn cycle_target(&self) -> u32 {
        self.cycle_target
    }

    pub fn is_active(&self) -> bool {
        self.phase != BreathPhase::Idle
    }

    /// 0.0 .. 1.0 progress within the current phase.
    pub fn phase_progress(&self) -> f64 {
        let duration = self.pattern.duration_of(self.phase);
        if duration == 0 {
            return 0.0;
        }
        (self.elapsed_in_phase_ms as f64 / duration as f64).min(1.0)
    }

    pub fn snapshot(&self) -> Event {
        Event::BreathSnapshot {
            exercise: self.exercise_id.clone(),
            phase: self.phase,
            cycle: self.current_cycle,
            cycle_target: self.cycle_target,
            phase_progress: self.phase_progress(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin the run at the first non-empty phase. No-op unless idle, and
    /// refused outright for a pattern with no positive phase (nothing to
    /// cycle through).
    pub fn start(&mut self) -> Option<Event> {
        if self.phase != BreathPhase::Idle
            || self.pattern.total_ms() == 0
            || self.cycle_target == 0
        {
            return None;
        }
        self.current_cycle = 0;
        self.elapsed_in_phase_ms = 0;
        self.phase = self.first_phase();
        Some(Event::ExerciseStarted {
            exercise: self.exercise_id.clone(),
            cycle_target: self.cycle_target,
            at: Utc::now(),
        })
    }

    /// Abandon the run and return to idle. Valid from any state.
    pub fn reset(&mut self) {
        self.phase = BreathPhase::Idle;
        self.elapsed_in_phase_ms = 0;
        self.current_cycle = 0;
    }

    /// Advance by a measured wall-clock delta, emitting one event per phase
    /// boundary crossed. A delta spanning several phases (a backgrounded
    /// tab catching up) yields all of them in order.
    pub fn tick(&mut self, mut delta_ms: u64) -> Vec<Event> {
        let mut events = Vec::new();
        if self.phase == BreathPhase::Idle {
            return events;
        }

        while delta_ms > 0 {
            let duration = self.pattern.duration_of(self.phase);
            let left = duration.saturating_sub(self.elapsed_in_phase_ms);
            if delta_ms < left {
                self.elapsed_in_phase_ms += delta_ms;
                break;
            }
            delta_ms -= left;
            if !self.advance(&mut events) {
                break;
            }
        }
        events
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn first_phase(&self) -> BreathPhase {
        for phase in [
            BreathPhase::Inhale,
            BreathPhase::Hold,
            BreathPhase::Exhale,
            BreathPhase::HoldAfter,
        ] {
            if self.pattern.duration_of(phase) > 0 {
                return phase;
            }
        }
        BreathPhase::Idle
    }

    /// Move to the next non-empty phase, handling cycle boundaries.
    /// Returns false once the run has reached terminal idle.
    fn advance(&mut self, events: &mut Vec<Event>) -> bool {
        self.elapsed_in_phase_ms = 0;
        let mut next = self.phase;
        loop {
            next = match next {
                BreathPhase::Inhale => BreathPhase::Hold,
                BreathPhase::Hold => BreathPhase::Exhale,
                BreathPhase::Exhale => BreathPhase::HoldAfter,
                BreathPhase::HoldAfter | BreathPhase::Idle => {
                    self.current_cycle += 1;
                    events.push(Event::CycleCompleted {
                        cycle: self.current_cycle,
                        cycle_target: self.cycle_target,
                        at: Utc::now(),
                    });
                    if self.current_cycle >= self.cycle_target {
                        self.phase = BreathPhase::Idle;
                        events.push(Event::ExerciseCompleted {
                            exercise: self.exercise_id.clone(),
                            cycles: self.current_cycle,
                            at: Utc::now(),
                        });
                        return false;
                    }
                    BreathPhase::Inhale
                }
            };
            if self.pattern.duration_of(next) > 0 {
                self.phase = next;
                events.push(Event::PhaseChanged {
                    phase: next,
                    cycle: self.current_cycle,
                    at: Utc::now(),
                });
                return true;
            }
        }
    }
}
