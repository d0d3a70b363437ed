//! Persisted widget state: extension presets and screen position.
//!
//! A single JSON record under a fixed key in any [`KvStore`]. Missing or
//! corrupt data silently falls back to defaults; writes are last-write-wins
//! (one active practitioner per device).

use serde::{Deserialize, Serialize};

use super::KvStore;
use crate::error::Result;

/// Fixed namespaced key for the widget record.
pub const WIDGET_STATE_KEY: &str = "sessionflow.widget";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetPosition {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetState {
    /// One-tap extension offers (minutes) shown near/at zero. Never empty.
    #[serde(default = "default_extension_presets")]
    pub extension_presets: Vec<u32>,
    #[serde(default)]
    pub position: Option<WidgetPosition>,
}

fn default_extension_presets() -> Vec<u32> {
    vec![5, 10, 15]
}

impl Default for WidgetState {
    fn default() -> Self {
        Self {
            extension_presets: default_extension_presets(),
            position: None,
        }
    }
}

impl WidgetState {
    /// Load from the store, falling back to defaults on missing or corrupt
    /// data. Never fails.
    pub fn load(store: &impl KvStore) -> Self {
        match store.kv_get(WIDGET_STATE_KEY) {
            Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_default(),
            _ => Self::default(),
        }
    }

    /// Persist to the store.
    pub fn save(&self, store: &mut impl KvStore) -> Result<()> {
        let json = serde_json::to_string(self)?;
        store.kv_set(WIDGET_STATE_KEY, &json)?;
        Ok(())
    }

    /// Add an extension preset, keeping the list sorted and deduplicated.
    /// Zero minutes is ignored.
    pub fn add_preset(&mut self, minutes: u32) {
        if minutes == 0 || self.extension_presets.contains(&minutes) {
            return;
        }
        self.extension_presets.push(minutes);
        self.extension_presets.sort_unstable();
    }

    /// Remove an extension preset. Refuses to empty the list (the extend
    /// control must always have something to offer); returns whether the
    /// preset was removed.
    pub fn remove_preset(&mut self, minutes: u32) -> bool {
        if self.extension_presets.len() <= 1 {
            return false;
        }
        let before = self.extension_presets.len();
        self.extension_presets.retain(|&m| m != minutes);
        self.extension_presets.len() < before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn missing_record_falls_back_to_defaults() {
        let store = MemoryStore::default();
        let state = WidgetState::load(&store);
        assert_eq!(state.extension_presets, vec![5, 10, 15]);
        assert!(state.position.is_none());
    }

    #[test]
    fn corrupt_record_falls_back_to_defaults() {
        let mut store = MemoryStore::default();
        store.kv_set(WIDGET_STATE_KEY, "{not json").unwrap();
        let state = WidgetState::load(&store);
        assert_eq!(state, WidgetState::default());
    }

    #[test]
    fn save_load_roundtrip() {
        let mut store = MemoryStore::default();
        let mut state = WidgetState::default();
        state.position = Some(WidgetPosition { x: 24, y: -8 });
        state.add_preset(20);
        state.save(&mut store).unwrap();

        let loaded = WidgetState::load(&store);
        assert_eq!(loaded, state);
        assert_eq!(loaded.extension_presets, vec![5, 10, 15, 20]);
    }

    #[test]
    fn add_preset_dedups_and_sorts() {
        let mut state = WidgetState::default();
        state.add_preset(10);
        state.add_preset(3);
        state.add_preset(0);
        assert_eq!(state.extension_presets, vec![3, 5, 10, 15]);
    }

    #[test]
    fn cannot_remove_last_preset() {
        let mut state = WidgetState {
            extension_presets: vec![5],
            position: None,
        };
        assert!(!state.remove_preset(5));
        assert_eq!(state.extension_presets, vec![5]);

        state.add_preset(10);
        assert!(state.remove_preset(5));
        assert_eq!(state.extension_presets, vec![10]);
    }
}
