//! End-to-end countdown scenarios driven tick by tick.

use sessionflow_core::{CountdownEngine, Event, SessionInfo, TimerStatus};

fn tick_seconds(engine: &mut CountdownEngine, seconds: u64) -> Vec<Event> {
    let mut events = Vec::new();
    for _ in 0..seconds {
        events.extend(engine.tick(1000));
    }
    events
}

#[test]
fn forty_five_minute_session_with_ten_minute_extension() {
    let mut engine = CountdownEngine::new(2700);
    engine.start(2700, None);

    // 40 minutes in: the five-minute warning lands exactly on the boundary.
    let events = tick_seconds(&mut engine, 2400);
    assert_eq!(engine.status(), TimerStatus::Warning);
    assert_eq!(engine.remaining_secs(), 300);
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, Event::WarningReached { .. }))
            .count(),
        1
    );

    engine.extend(10);
    assert_eq!(engine.remaining_secs(), 900);
    assert_eq!(engine.status(), TimerStatus::Running);

    let events = tick_seconds(&mut engine, 900);
    assert_eq!(engine.status(), TimerStatus::Ended);
    assert_eq!(engine.remaining_secs(), 0);
    assert!(events.iter().any(|e| matches!(e, Event::TimerEnded { .. })));

    // Once ended the countdown stays put.
    assert!(tick_seconds(&mut engine, 60).is_empty());
    assert_eq!(engine.remaining_secs(), 0);
}

#[test]
fn pause_mid_session_and_finish() {
    let mut engine = CountdownEngine::new(1800);
    engine.start(
        1800,
        Some(SessionInfo {
            patient_name: Some("Noa Levi".into()),
            appointment_title: Some("Acupuncture follow-up".into()),
        }),
    );

    tick_seconds(&mut engine, 600);
    engine.pause();

    // A long paused stretch accrues nothing.
    tick_seconds(&mut engine, 1200);
    assert_eq!(engine.remaining_secs(), 1200);

    engine.resume();
    tick_seconds(&mut engine, 1200);
    assert_eq!(engine.status(), TimerStatus::Ended);
    assert_eq!(
        engine.session().and_then(|s| s.patient_name.as_deref()),
        Some("Noa Levi")
    );
}

#[test]
fn extend_from_ended_reaches_exactly_five_minutes() {
    let mut engine = CountdownEngine::new(1800);
    engine.start(1800, None);
    engine.tick(1_800_000);
    assert_eq!(engine.status(), TimerStatus::Ended);

    engine.extend(5);
    assert_eq!(engine.remaining_secs(), 300);
    assert_eq!(engine.status(), TimerStatus::Running);

    let events = tick_seconds(&mut engine, 300);
    assert!(events.iter().any(|e| matches!(e, Event::TimerEnded { .. })));
}

#[test]
fn persisted_engine_resumes_across_process_boundary() {
    let mut engine = CountdownEngine::new(2700);
    engine.start(2700, None);
    tick_seconds(&mut engine, 100);

    // Simulate a host shutdown and restart: serialize, restore, then feed
    // the wall-clock time that passed while the process was gone.
    let stored = serde_json::to_string(&engine).unwrap();
    let mut restored: CountdownEngine = serde_json::from_str(&stored).unwrap();
    assert_eq!(restored.remaining_secs(), 2600);

    let events = restored.tick(2_400_000);
    assert_eq!(restored.status(), TimerStatus::Warning);
    assert_eq!(restored.remaining_secs(), 200);
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, Event::WarningReached { .. }))
            .count(),
        1
    );
}
