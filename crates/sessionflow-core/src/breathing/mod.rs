mod exercise;
mod sequencer;

pub use exercise::{
    builtin_exercises, find_exercise, BreathPhase, BreathingExercise, ExerciseLevel, PhasePattern,
};
pub use sequencer::BreathSequencer;
