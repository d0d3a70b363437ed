//! Full breathing-exercise runs at the 100 ms tick rate.

use sessionflow_core::{find_exercise, BreathPhase, BreathSequencer, Event};

fn run_to_completion(seq: &mut BreathSequencer, max_ticks: u32) -> Vec<Event> {
    let mut events = Vec::new();
    for _ in 0..max_ticks {
        events.extend(seq.tick(100));
        if !seq.is_active() {
            break;
        }
    }
    events
}

fn count_phase(events: &[Event], wanted: BreathPhase) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, Event::PhaseChanged { phase, .. } if *phase == wanted))
        .count()
}

#[test]
fn four_seven_eight_full_run() {
    let mut seq = BreathSequencer::new(&find_exercise("4-7-8").unwrap());
    assert!(seq.start().is_some());

    // 4 cycles x (4+7+8)s = 76s of phase time.
    let events = run_to_completion(&mut seq, 800);

    assert_eq!(count_phase(&events, BreathPhase::Hold), 4);
    assert_eq!(count_phase(&events, BreathPhase::Exhale), 4);
    assert_eq!(count_phase(&events, BreathPhase::Inhale), 3);
    assert_eq!(count_phase(&events, BreathPhase::HoldAfter), 0);

    let cycles = events
        .iter()
        .filter(|e| matches!(e, Event::CycleCompleted { .. }))
        .count();
    assert_eq!(cycles, 4);

    match events.last() {
        Some(Event::ExerciseCompleted { exercise, cycles, .. }) => {
            assert_eq!(exercise, "4-7-8");
            assert_eq!(*cycles, 4);
        }
        other => panic!("Expected ExerciseCompleted, got {other:?}"),
    }
}

#[test]
fn box_breathing_visits_all_four_phases() {
    let mut seq = BreathSequencer::new(&find_exercise("box-breathing").unwrap());
    seq.start();

    // 8 cycles x 16s.
    let events = run_to_completion(&mut seq, 1400);

    assert_eq!(count_phase(&events, BreathPhase::Hold), 8);
    assert_eq!(count_phase(&events, BreathPhase::Exhale), 8);
    assert_eq!(count_phase(&events, BreathPhase::HoldAfter), 8);
    assert_eq!(count_phase(&events, BreathPhase::Inhale), 7);
    assert!(!seq.is_active());
}

#[test]
fn diaphragmatic_skips_both_holds() {
    let mut seq = BreathSequencer::new(&find_exercise("diaphragmatic").unwrap());
    seq.start();

    // 10 cycles x 10s.
    let events = run_to_completion(&mut seq, 1100);

    assert_eq!(count_phase(&events, BreathPhase::Hold), 0);
    assert_eq!(count_phase(&events, BreathPhase::HoldAfter), 0);
    assert_eq!(count_phase(&events, BreathPhase::Exhale), 10);
    assert!(!seq.is_active());
}

#[test]
fn sequencer_state_survives_serde_mid_cycle() {
    let mut seq = BreathSequencer::new(&find_exercise("box-breathing").unwrap());
    seq.start();
    seq.tick(6_000); // into the first hold

    let json = serde_json::to_string(&seq).unwrap();
    let mut restored: BreathSequencer = serde_json::from_str(&json).unwrap();
    assert_eq!(restored.phase(), seq.phase());
    assert_eq!(restored.current_cycle(), seq.current_cycle());

    let events = run_to_completion(&mut restored, 1400);
    assert!(events
        .iter()
        .any(|e| matches!(e, Event::ExerciseCompleted { .. })));
}
