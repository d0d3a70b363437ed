//! On-disk storage round trips through a temporary directory.

use chrono::Utc;
use sessionflow_core::{Database, KvStore, SessionKind, WidgetPosition, WidgetState};

#[test]
fn database_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sessionflow.db");

    {
        let mut db = Database::open_at(&path).unwrap();
        let now = Utc::now();
        db.record_session(SessionKind::Clinical, "Dana", 2700, 10, now, now)
            .unwrap();
        db.kv_set("countdown_engine", "{\"status\":\"idle\"}").unwrap();
    }

    let db = Database::open_at(&path).unwrap();
    let stats = db.stats_all().unwrap();
    assert_eq!(stats.total_sessions, 1);
    assert_eq!(stats.total_clinical_min, 45);
    assert_eq!(
        db.kv_get("countdown_engine").unwrap().as_deref(),
        Some("{\"status\":\"idle\"}")
    );
}

#[test]
fn widget_state_round_trips_through_database_kv() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sessionflow.db");
    let mut db = Database::open_at(&path).unwrap();

    let mut state = WidgetState::load(&db);
    assert_eq!(state.extension_presets, vec![5, 10, 15]);

    state.position = Some(WidgetPosition { x: 120, y: 40 });
    state.add_preset(20);
    state.save(&mut db).unwrap();

    let reopened = Database::open_at(&path).unwrap();
    let loaded = WidgetState::load(&reopened);
    assert_eq!(loaded.position, Some(WidgetPosition { x: 120, y: 40 }));
    assert_eq!(loaded.extension_presets, vec![5, 10, 15, 20]);
}

#[test]
fn corrupt_widget_record_recovers_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sessionflow.db");
    let mut db = Database::open_at(&path).unwrap();

    db.kv_set(sessionflow_core::storage::WIDGET_STATE_KEY, "}}garbage")
        .unwrap();
    let state = WidgetState::load(&db);
    assert_eq!(state, WidgetState::default());
}
