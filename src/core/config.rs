//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.todo-tui/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::state::{Behavior, UpdateSource};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TodoConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub behavior: BehaviorConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ServerConfig {
    pub api_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct UiConfig {
    pub status_timeout_secs: Option<u64>,
    pub description_preview_chars: Option<usize>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct BehaviorConfig {
    pub update_source: Option<UpdateSource>,
    pub cancel_edit_on_delete: Option<bool>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_API_URL: &str = "http://localhost:5000/todos";
pub const DEFAULT_STATUS_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_DESCRIPTION_PREVIEW_CHARS: usize = 50;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub api_url: String,
    pub status_timeout: Duration,
    pub description_preview_chars: usize,
    pub behavior: Behavior,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.todo-tui/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".todo-tui").join("config.toml"))
}

/// Load config from `~/.todo-tui/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `TodoConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<TodoConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(TodoConfig::default());
        }
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<TodoConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(TodoConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: TodoConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# todo-tui configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [server]
# api_url = "http://localhost:5000/todos"   # Or TODO_API_URL env var, or --api-url

# [ui]
# status_timeout_secs = 5                    # Or TODO_STATUS_TIMEOUT_SECS env var
# description_preview_chars = 50

# [behavior]
# update_source = "form"                     # "form" or "server"
# cancel_edit_on_delete = true
"#;

    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            warn!("Failed to create config directory: {}", e);
            return;
        }
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_api_url` is the `--api-url` flag (None = not specified).
pub fn resolve(config: &TodoConfig, cli_api_url: Option<&str>) -> ResolvedConfig {
    resolve_with_env(config, cli_api_url, |key| std::env::var(key).ok())
}

/// [`resolve`] with the environment lookup supplied by the caller.
pub fn resolve_with_env(
    config: &TodoConfig,
    cli_api_url: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // API URL: CLI → env → config → default
    let api_url = cli_api_url
        .map(|s| s.to_string())
        .or_else(|| env("TODO_API_URL"))
        .or_else(|| config.server.api_url.clone())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());

    // Status timeout: env → config → default
    let status_timeout_secs = env("TODO_STATUS_TIMEOUT_SECS")
        .and_then(|raw| match raw.parse::<u64>() {
            Ok(secs) => Some(secs),
            Err(e) => {
                warn!("Ignoring TODO_STATUS_TIMEOUT_SECS={:?}: {}", raw, e);
                None
            }
        })
        .or(config.ui.status_timeout_secs)
        .unwrap_or(DEFAULT_STATUS_TIMEOUT_SECS);

    let defaults = Behavior::default();
    let behavior = Behavior {
        update_source: config
            .behavior
            .update_source
            .unwrap_or(defaults.update_source),
        cancel_edit_on_delete: config
            .behavior
            .cancel_edit_on_delete
            .unwrap_or(defaults.cancel_edit_on_delete),
    };

    let resolved = ResolvedConfig {
        api_url,
        status_timeout: Duration::from_secs(status_timeout_secs),
        description_preview_chars: config
            .ui
            .description_preview_chars
            .unwrap_or(DEFAULT_DESCRIPTION_PREVIEW_CHARS),
        behavior,
    };
    debug!("Resolved config: {:?}", resolved);
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn env_of(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    fn file_config() -> TodoConfig {
        TodoConfig {
            server: ServerConfig {
                api_url: Some("http://config-host/todos".to_string()),
            },
            ui: UiConfig {
                status_timeout_secs: Some(9),
                description_preview_chars: None,
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_resolve_env_overrides_file() {
        let env = env_of(&[
            ("TODO_API_URL", "http://env-host/todos"),
            ("TODO_STATUS_TIMEOUT_SECS", "2"),
        ]);
        let resolved = resolve_with_env(&file_config(), None, env);
        assert_eq!(resolved.api_url, "http://env-host/todos");
        assert_eq!(resolved.status_timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_resolve_cli_beats_env() {
        let env = env_of(&[("TODO_API_URL", "http://env-host/todos")]);
        let resolved = resolve_with_env(&file_config(), Some("http://cli-host/todos"), env);
        assert_eq!(resolved.api_url, "http://cli-host/todos");
    }

    #[test]
    fn test_resolve_unparsable_env_timeout_falls_back() {
        let env = env_of(&[("TODO_STATUS_TIMEOUT_SECS", "soon")]);
        let resolved = resolve_with_env(&file_config(), None, &env);
        assert_eq!(resolved.status_timeout, Duration::from_secs(9));

        let resolved = resolve_with_env(&TodoConfig::default(), None, &env);
        assert_eq!(
            resolved.status_timeout,
            Duration::from_secs(DEFAULT_STATUS_TIMEOUT_SECS)
        );
        assert_eq!(resolved.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_default_config() {
        let config = TodoConfig::default();
        assert!(config.server.api_url.is_none());
        assert!(config.behavior.update_source.is_none());
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let config = TodoConfig::default();
        let resolved = resolve_with_env(&config, None, no_env);
        assert_eq!(resolved.status_timeout, Duration::from_secs(5));
        assert_eq!(resolved.description_preview_chars, 50);
        assert_eq!(resolved.behavior.update_source, UpdateSource::Form);
        assert!(resolved.behavior.cancel_edit_on_delete);
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let config = TodoConfig {
            ui: UiConfig {
                status_timeout_secs: None,
                description_preview_chars: Some(20),
            },
            behavior: BehaviorConfig {
                update_source: Some(UpdateSource::Server),
                cancel_edit_on_delete: Some(false),
            },
            ..Default::default()
        };
        let resolved = resolve_with_env(&config, None, no_env);
        assert_eq!(resolved.description_preview_chars, 20);
        assert_eq!(resolved.behavior.update_source, UpdateSource::Server);
        assert!(!resolved.behavior.cancel_edit_on_delete);
    }

    #[test]
    fn test_resolve_cli_api_url_wins() {
        let config = TodoConfig {
            server: ServerConfig {
                api_url: Some("http://config-host/todos".to_string()),
            },
            ..Default::default()
        };
        let resolved = resolve_with_env(&config, Some("http://cli-host:8080/todos"), no_env);
        assert_eq!(resolved.api_url, "http://cli-host:8080/todos");
    }

    #[test]
    fn test_toml_parses_all_sections() {
        let toml_str = r#"
[server]
api_url = "http://192.168.1.10:5000/todos"

[ui]
status_timeout_secs = 3
description_preview_chars = 80

[behavior]
update_source = "server"
cancel_edit_on_delete = false
"#;
        let config: TodoConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.server.api_url.as_deref(),
            Some("http://192.168.1.10:5000/todos")
        );
        assert_eq!(config.ui.status_timeout_secs, Some(3));
        assert_eq!(config.ui.description_preview_chars, Some(80));
        assert_eq!(config.behavior.update_source, Some(UpdateSource::Server));
        assert_eq!(config.behavior.cancel_edit_on_delete, Some(false));
    }

    #[test]
    fn test_sparse_toml_parses() {
        let toml_str = r#"
[behavior]
cancel_edit_on_delete = false
"#;
        let config: TodoConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.behavior.cancel_edit_on_delete, Some(false));
        assert!(config.behavior.update_source.is_none());
        assert!(config.server.api_url.is_none());
        assert!(config.ui.status_timeout_secs.is_none());
    }

    #[test]
    fn test_unknown_update_source_is_a_parse_error() {
        let toml_str = r#"
[behavior]
update_source = "both"
"#;
        assert!(toml::from_str::<TodoConfig>(toml_str).is_err());
    }

    #[test]
    fn test_load_config_from_missing_file_writes_template() {
        let dir = std::env::temp_dir().join(format!("todo-tui-config-{}", std::process::id()));
        let path = dir.join("config.toml");
        let _ = fs::remove_dir_all(&dir);

        let config = load_config_from(&path).unwrap();
        assert!(config.server.api_url.is_none());

        // The generated template is all comments, so it loads as defaults.
        let contents = fs::read_to_string(&path).unwrap();
        assert!(contents.contains("# api_url"));
        let reloaded = load_config_from(&path).unwrap();
        assert!(reloaded.server.api_url.is_none());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_load_config_from_malformed_file() {
        let dir = std::env::temp_dir().join(format!("todo-tui-bad-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        fs::write(&path, "[server\napi_url = ").unwrap();

        assert!(matches!(load_config_from(&path), Err(ConfigError::Parse(_))));

        let _ = fs::remove_dir_all(&dir);
    }
}
