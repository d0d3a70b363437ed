mod config;
pub mod database;
mod widget;

pub use config::{Config, NotificationsConfig, TimerConfig};
pub use database::{Database, SessionKind, SessionRecord, Stats};
pub use widget::{WidgetPosition, WidgetState, WIDGET_STATE_KEY};

use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::StorageError;

/// Returns `~/.config/sessionflow[-dev]/` based on SESSIONFLOW_ENV.
///
/// Set SESSIONFLOW_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if the config directory cannot be created.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("SESSIONFLOW_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("sessionflow-dev")
    } else {
        base_dir.join("sessionflow")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Key-value persistence seam. The database implements it on its `kv`
/// table; tests swap in [`MemoryStore`].
pub trait KvStore {
    fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn kv_set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-memory store for tests and ephemeral hosts.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl KvStore for MemoryStore {
    fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn kv_set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
