//! Notification and haptic cues.
//!
//! Pure mapping from boundary events to the side effects the host should
//! render: vibration patterns and beep sequences. Because the engines only
//! emit events on phase-boundary crossings, a cue fires exactly once per
//! crossing and never on steady ticks.
//!
//! The phase-to-intensity mapping (light on inhale, medium on holds, heavy
//! on exhale) is a fixed design choice, not configurable.

use serde::{Deserialize, Serialize};

use crate::breathing::BreathPhase;
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HapticCue {
    Light,
    Medium,
    Heavy,
    Start,
    Pause,
    Resume,
    End,
    Reset,
}

impl HapticCue {
    /// Vibration pattern in milliseconds, alternating on/off.
    pub fn pattern(self) -> &'static [u64] {
        match self {
            HapticCue::Light => &[10],
            HapticCue::Medium => &[25],
            HapticCue::Heavy => &[50],
            HapticCue::Start => &[50, 100, 50],
            HapticCue::Pause => &[30, 50, 30],
            HapticCue::Resume => &[20, 30, 20, 30],
            HapticCue::End => &[100, 50, 100],
            HapticCue::Reset => &[15, 30, 15, 30, 15],
        }
    }

    /// Fixed intensity per breathing phase. Idle has no cue.
    pub fn for_phase(phase: BreathPhase) -> Option<Self> {
        match phase {
            BreathPhase::Inhale => Some(HapticCue::Light),
            BreathPhase::Hold | BreathPhase::HoldAfter => Some(HapticCue::Medium),
            BreathPhase::Exhale => Some(HapticCue::Heavy),
            BreathPhase::Idle => None,
        }
    }
}

/// One oscillator beep the host should schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Beep {
    pub offset_ms: u64,
    pub freq_hz: u32,
    pub duration_ms: u64,
}

const fn beep(offset_ms: u64, freq_hz: u32, duration_ms: u64) -> Beep {
    Beep {
        offset_ms,
        freq_hz,
        duration_ms,
    }
}

/// Rising triple beep at the five-minute warning.
pub const WARNING_TONE: [Beep; 3] = [
    beep(0, 660, 300),
    beep(400, 660, 300),
    beep(800, 880, 300),
];

/// Five-beep ramp when the session ends.
pub const END_TONE: [Beep; 5] = [
    beep(0, 880, 200),
    beep(250, 880, 200),
    beep(500, 1100, 200),
    beep(750, 1100, 200),
    beep(1000, 1320, 400),
];

/// The side effects one event should produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackCue {
    pub haptic: Option<HapticCue>,
    pub tone: Vec<Beep>,
}

/// Map a boundary event to its cue. Returns `None` when sound is disabled
/// or the event carries no side effect (snapshots, cycle bookkeeping).
pub fn cue_for_event(event: &Event, sound_enabled: bool) -> Option<FeedbackCue> {
    if !sound_enabled {
        return None;
    }
    let cue = match event {
        Event::TimerStarted { .. } => FeedbackCue {
            haptic: Some(HapticCue::Start),
            tone: Vec::new(),
        },
        Event::TimerPaused { .. } => FeedbackCue {
            haptic: Some(HapticCue::Pause),
            tone: Vec::new(),
        },
        Event::TimerResumed { .. } | Event::TimerExtended { .. } => FeedbackCue {
            haptic: Some(HapticCue::Resume),
            tone: Vec::new(),
        },
        Event::TimerReset { .. } => FeedbackCue {
            haptic: Some(HapticCue::Reset),
            tone: Vec::new(),
        },
        Event::WarningReached { .. } => FeedbackCue {
            haptic: None,
            tone: WARNING_TONE.to_vec(),
        },
        Event::TimerEnded { .. } => FeedbackCue {
            haptic: Some(HapticCue::End),
            tone: END_TONE.to_vec(),
        },
        Event::PhaseChanged { phase, .. } => FeedbackCue {
            haptic: HapticCue::for_phase(*phase),
            tone: Vec::new(),
        },
        Event::ExerciseCompleted { .. } => FeedbackCue {
            haptic: Some(HapticCue::End),
            tone: Vec::new(),
        },
        _ => return None,
    };
    Some(cue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn phase_intensities_are_fixed() {
        assert_eq!(
            HapticCue::for_phase(BreathPhase::Inhale),
            Some(HapticCue::Light)
        );
        assert_eq!(
            HapticCue::for_phase(BreathPhase::Hold),
            Some(HapticCue::Medium)
        );
        assert_eq!(
            HapticCue::for_phase(BreathPhase::Exhale),
            Some(HapticCue::Heavy)
        );
        assert_eq!(HapticCue::for_phase(BreathPhase::Idle), None);
    }

    #[test]
    fn sound_disabled_gates_everything() {
        let event = Event::TimerEnded { at: Utc::now() };
        assert!(cue_for_event(&event, false).is_none());
        assert!(cue_for_event(&event, true).is_some());
    }

    #[test]
    fn warning_tone_is_rising_triple_beep() {
        assert_eq!(WARNING_TONE.len(), 3);
        assert_eq!(WARNING_TONE[0].freq_hz, 660);
        assert_eq!(WARNING_TONE[2].freq_hz, 880);
    }

    #[test]
    fn end_tone_ramps_to_highest_pitch() {
        assert_eq!(END_TONE.len(), 5);
        assert!(END_TONE.windows(2).all(|w| w[0].freq_hz <= w[1].freq_hz));
        assert_eq!(END_TONE[4].freq_hz, 1320);
    }

    #[test]
    fn bookkeeping_events_have_no_cue() {
        let event = Event::CycleCompleted {
            cycle: 1,
            cycle_target: 4,
            at: Utc::now(),
        };
        assert!(cue_for_event(&event, true).is_none());
    }

    #[test]
    fn ended_session_vibrates_and_beeps() {
        let cue = cue_for_event(&Event::TimerEnded { at: Utc::now() }, true).unwrap();
        assert_eq!(cue.haptic, Some(HapticCue::End));
        assert_eq!(cue.tone.len(), 5);
        assert_eq!(HapticCue::End.pattern(), &[100, 50, 100]);
    }
}
