//! Editor settings, read from the `editor` section of `clause.config.json`

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::debounce::DebounceScope;

pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EditorConfig {
    /// Quiet period before a changed clause is reparsed
    pub debounce_ms: u64,

    pub debounce_scope: DebounceScope,

    /// Upper bound for formula regeneration; unset waits indefinitely
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regeneration_timeout_ms: Option<u64>,

    /// Report reparse outcomes without rewriting the document
    pub read_only: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            debounce_scope: DebounceScope::default(),
            regeneration_timeout_ms: None,
            read_only: false,
        }
    }
}

impl EditorConfig {
    pub fn debounce_period(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn regeneration_timeout(&self) -> Option<Duration> {
        self.regeneration_timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_fields_missing() {
        let config: EditorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EditorConfig::default());
        assert_eq!(config.debounce_period(), Duration::from_millis(500));
        assert_eq!(config.regeneration_timeout(), None);
    }

    #[test]
    fn test_camel_case_fields() {
        let config: EditorConfig = serde_json::from_str(
            r#"{ "debounceMs": 250, "debounceScope": "perFragment", "regenerationTimeoutMs": 2000, "readOnly": true }"#,
        )
        .unwrap();

        assert_eq!(config.debounce_period(), Duration::from_millis(250));
        assert_eq!(config.debounce_scope, DebounceScope::PerFragment);
        assert_eq!(config.regeneration_timeout(), Some(Duration::from_secs(2)));
        assert!(config.read_only);
    }
}
