//! Derived presentation values: countdown text, progress, bilingual labels.
//!
//! Everything here is a pure function of engine/sequencer state. The clinic
//! UI is bilingual (English/Hebrew), so labels come in both.

use serde::{Deserialize, Serialize};

use crate::breathing::BreathPhase;
use crate::timer::TimerStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    He,
}

/// `mm:ss` countdown text. Minutes grow past 59 for long sessions.
pub fn format_clock(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Elapsed fraction as a 0..100 percentage, clamped.
pub fn progress_pct(elapsed_secs: u64, total_secs: u64) -> f64 {
    if total_secs == 0 {
        return 0.0;
    }
    (elapsed_secs as f64 / total_secs as f64 * 100.0).min(100.0)
}

pub fn status_label(status: TimerStatus, language: Language) -> &'static str {
    match (status, language) {
        (TimerStatus::Idle, Language::En) => "Ready",
        (TimerStatus::Idle, Language::He) => "מוכנים?",
        (TimerStatus::Running, Language::En) => "Running",
        (TimerStatus::Running, Language::He) => "פעיל",
        (TimerStatus::Paused, Language::En) => "Paused",
        (TimerStatus::Paused, Language::He) => "מושהה",
        (TimerStatus::Warning, Language::En) => "5 min warning!",
        (TimerStatus::Warning, Language::He) => "נותרו 5 דקות!",
        (TimerStatus::Ended, Language::En) => "Time's up!",
        (TimerStatus::Ended, Language::He) => "הזמן נגמר!",
    }
}

pub fn phase_label(phase: BreathPhase, language: Language) -> &'static str {
    match (phase, language) {
        (BreathPhase::Idle, Language::En) => "Ready?",
        (BreathPhase::Idle, Language::He) => "מוכנים?",
        (BreathPhase::Inhale, Language::En) => "Inhale...",
        (BreathPhase::Inhale, Language::He) => "שאפו...",
        (BreathPhase::Hold | BreathPhase::HoldAfter, Language::En) => "Hold...",
        (BreathPhase::Hold | BreathPhase::HoldAfter, Language::He) => "החזיקו...",
        (BreathPhase::Exhale, Language::En) => "Exhale...",
        (BreathPhase::Exhale, Language::He) => "נשפו...",
    }
}
