mod display;
mod engine;

pub use display::{format_clock, phase_label, progress_pct, status_label, Language};
pub use engine::{CountdownEngine, SessionInfo, TimerStatus, WARNING_BEFORE_END_SECS};
