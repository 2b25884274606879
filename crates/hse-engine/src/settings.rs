//! # System Settings
//!
//! The key→value configuration records consumed by the policies: the
//! self-service edit window and the statutory retention period. Records
//! are created lazily on first read with their documented default,
//! updated in place by an admin, and never deleted.
//!
//! Every policy evaluation reads the store again — there is no cached
//! value anywhere. An admin lowering `SESSION_EDIT_WINDOW` takes effect
//! on the very next authorization, including for sessions already past
//! the old window. Correctness over latency.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::warn;

use hse_core::Timestamp;

/// Key of the edit-window setting, in minutes.
pub const SESSION_EDIT_WINDOW: &str = "SESSION_EDIT_WINDOW";

/// Key of the retention-period setting, in years.
pub const DATA_RETENTION_YEARS: &str = "DATA_RETENTION_YEARS";

/// Default edit window: one hour of self-service correction.
pub const DEFAULT_EDIT_WINDOW_MINUTES: i64 = 60;

/// Default retention period: five school years.
pub const DEFAULT_RETENTION_YEARS: u32 = 5;

/// The settings an admin may write through the API, with their defaults.
pub const KNOWN_KEYS: [(&str, &str); 2] = [
    (SESSION_EDIT_WINDOW, "60"),
    (DATA_RETENTION_YEARS, "5"),
];

/// One persisted configuration record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemSetting {
    /// Setting key (e.g. `SESSION_EDIT_WINDOW`).
    pub key: String,
    /// Raw string value; numeric settings are parsed on read.
    pub value: String,
    /// Last write instant (or lazy-creation instant).
    pub updated_at: Timestamp,
    /// Display name of the last writer; `None` for lazily created defaults.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
}

/// Store of configuration records, keyed by setting key.
#[derive(Debug)]
pub struct SettingsStore {
    data: Arc<RwLock<HashMap<String, SystemSetting>>>,
}

impl SettingsStore {
    /// Create an empty settings store. Known settings materialize on
    /// first read.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Fetch a setting without materializing it.
    pub fn get(&self, key: &str) -> Option<SystemSetting> {
        self.data.read().get(key).cloned()
    }

    /// Fetch a setting, creating it with `default` on first read.
    pub fn get_or_init(&self, key: &str, default: &str) -> SystemSetting {
        if let Some(existing) = self.get(key) {
            return existing;
        }
        let mut guard = self.data.write();
        // Re-check under the write lock; another reader may have
        // materialized it meanwhile.
        guard
            .entry(key.to_string())
            .or_insert_with(|| SystemSetting {
                key: key.to_string(),
                value: default.to_string(),
                updated_at: Timestamp::now(),
                updated_by: None,
            })
            .clone()
    }

    /// Write a setting in place, creating it if needed.
    pub fn set(&self, key: &str, value: &str, actor: &str) -> SystemSetting {
        let mut guard = self.data.write();
        let setting = SystemSetting {
            key: key.to_string(),
            value: value.to_string(),
            updated_at: Timestamp::now(),
            updated_by: Some(actor.to_string()),
        };
        guard.insert(key.to_string(), setting.clone());
        setting
    }

    /// All settings, sorted by key.
    pub fn list(&self) -> Vec<SystemSetting> {
        let mut settings: Vec<SystemSetting> = self.data.read().values().cloned().collect();
        settings.sort_by(|a, b| a.key.cmp(&b.key));
        settings
    }

    /// Current edit window in minutes. Fresh read; lazily created with
    /// the default of 60. A corrupted stored value falls back to the
    /// default rather than freezing the workflow.
    pub fn edit_window_minutes(&self) -> i64 {
        let setting = self.get_or_init(SESSION_EDIT_WINDOW, "60");
        match setting.value.parse::<i64>() {
            Ok(minutes) if minutes >= 0 => minutes,
            _ => {
                warn!(
                    key = SESSION_EDIT_WINDOW,
                    value = %setting.value,
                    "unparseable setting value, using default"
                );
                DEFAULT_EDIT_WINDOW_MINUTES
            }
        }
    }

    /// Current retention period in years. Fresh read; lazily created
    /// with the default of 5.
    pub fn retention_years(&self) -> u32 {
        let setting = self.get_or_init(DATA_RETENTION_YEARS, "5");
        match setting.value.parse::<u32>() {
            Ok(years) => years,
            Err(_) => {
                warn!(
                    key = DATA_RETENTION_YEARS,
                    value = %setting.value,
                    "unparseable setting value, using default"
                );
                DEFAULT_RETENTION_YEARS
            }
        }
    }
}

impl Clone for SettingsStore {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new()
    }
}
