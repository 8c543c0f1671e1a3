use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::undo_stack::DEFAULT_MAX_LEVELS;
use crate::EditorError;

pub const DEFAULT_CONFIG_NAME: &str = "pagecraft.config.json";

/// Editor store configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorConfig {
    /// Maximum undo steps kept (0 = unlimited)
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Window in which edits to the same prop merge into one undo step
    /// (0 = every edit is its own step)
    #[serde(default)]
    pub coalesce_window_ms: u64,

    /// Select a component as soon as it is added
    #[serde(default)]
    pub auto_select_on_add: bool,
}

fn default_history_limit() -> usize {
    DEFAULT_MAX_LEVELS
}

impl EditorConfig {
    /// Load config from a directory, falling back to defaults if absent
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, EditorError> {
        let config_path = dir.as_ref().join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Self::from_json(&content)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_json(json: &str) -> Result<Self, EditorError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn coalesce_window(&self) -> Option<Duration> {
        (self.coalesce_window_ms > 0).then(|| Duration::from_millis(self.coalesce_window_ms))
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    pub fn with_coalesce_window(mut self, window: Duration) -> Self {
        self.coalesce_window_ms = window.as_millis() as u64;
        self
    }

    pub fn with_auto_select_on_add(mut self, enabled: bool) -> Self {
        self.auto_select_on_add = enabled;
        self
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
            coalesce_window_ms: 0,
            auto_select_on_add: false,
        }
    }
}
