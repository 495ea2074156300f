//! Session configuration.

use serde::Deserialize;
use std::path::PathBuf;

/// Default file used by `save_default` / `load_default`.
pub const DEFAULT_STATE_FILE: &str = "session_state.json";

/// Tab bound by `StateManager::global`.
pub const DEFAULT_TAB: &str = "global";

const ENV_STATE_FILE: &str = "TABSTATE_FILE";
const ENV_DEFAULT_TAB: &str = "TABSTATE_DEFAULT_TAB";

/// Settings shared by every tab of a session.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StateConfig {
    /// Where `save_default` writes and `load_default` reads.
    pub state_file: PathBuf,
    /// Tab used when no tab name is given.
    pub default_tab: String,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            state_file: PathBuf::from(DEFAULT_STATE_FILE),
            default_tab: DEFAULT_TAB.to_string(),
        }
    }
}

impl StateConfig {
    /// Defaults overridden by `TABSTATE_FILE` and `TABSTATE_DEFAULT_TAB`.
    ///
    /// Empty or whitespace-only variables are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(file) = non_empty(lookup(ENV_STATE_FILE)) {
            config.state_file = PathBuf::from(file);
        }
        if let Some(tab) = non_empty(lookup(ENV_DEFAULT_TAB)) {
            config.default_tab = tab;
        }
        config
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let config = StateConfig::default();
        assert_eq!(config.state_file, PathBuf::from("session_state.json"));
        assert_eq!(config.default_tab, "global");
    }

    #[test]
    fn lookup_overrides_and_ignores_blank_values() {
        let config = StateConfig::from_lookup(|name| match name {
            "TABSTATE_FILE" => Some(" /var/lib/app/state.json ".to_string()),
            "TABSTATE_DEFAULT_TAB" => Some("   ".to_string()),
            _ => None,
        });
        assert_eq!(config.state_file, PathBuf::from("/var/lib/app/state.json"));
        assert_eq!(config.default_tab, "global");
    }

    #[test]
    fn deserializes_partial_config() {
        let config: StateConfig =
            serde_json::from_str(r#"{"default_tab": "overview"}"#).expect("config should parse");
        assert_eq!(config.default_tab, "overview");
        assert_eq!(config.state_file, PathBuf::from(DEFAULT_STATE_FILE));
    }
}
