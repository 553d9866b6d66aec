// Configuration for the chat client
//
// Configuration is loaded in order of precedence:
// 1. Environment variables (highest priority)
// 2. Config file (~/.config/rpchat/config.toml)
// 3. Built-in defaults (lowest priority)
//
// CLI arguments are applied on top by main after parsing.

use crate::template::TemplateSet;
use serde::Deserialize;
use std::path::PathBuf;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    pub level: String,

    /// Also write logs to daily-rotated files
    pub file_enabled: bool,

    /// Directory for log files
    pub file_dir: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_enabled: false,
            file_dir: PathBuf::from("./logs"),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// WebSocket endpoint of the chat server
    pub endpoint: String,

    /// Whether to run the TUI (disabled = print rendered entries to stdout)
    pub enable_tui: bool,

    /// Demo mode: feed scripted events instead of connecting
    pub demo_mode: bool,

    /// Display templates for join/part/msg entries
    pub templates: TemplateSet,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Logging settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
struct FileLogging {
    level: Option<String>,
    file_enabled: Option<bool>,
    file_dir: Option<String>,
}

/// Config file structure (subset of Config that makes sense to persist)
#[derive(Debug, Deserialize, Default)]
struct FileConfig {
    endpoint: Option<String>,

    /// Optional [templates] section
    templates: Option<TemplateSet>,

    /// Optional [logging] section
    logging: Option<FileLogging>,
}

impl Config {
    /// Get the config file path: ~/.config/rpchat/config.toml
    /// Uses Unix-style ~/.config on all platforms for consistency
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("rpchat").join("config.toml"))
    }

    /// Create config template if it doesn't exist
    /// Called during startup to help users discover configuration options
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };

        // Don't overwrite existing config
        if path.exists() {
            return;
        }

        // Create parent directory
        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return; // Silently fail - config is optional
            }
        }

        let template = r#"# rpchat configuration
# Uncomment and modify options as needed

# Chat server endpoint (default: ws://127.0.0.1:4321)
# endpoint = "ws://127.0.0.1:4321"

# Display templates. Placeholders: {{ts}}, {{user}}, {{chan}} / {{msg}}
# [templates]
# join = "--> {{user}} joined {{chan}}"
# part = "<-- {{user}} left {{chan}}"
# msg = "<{{user}}> {{msg}}"

# Logging configuration
# [logging]
# level = "info"        # trace, debug, info, warn, error (RUST_LOG overrides)
# file_enabled = false  # also write daily-rotated log files
# file_dir = "./logs"
"#;

        // Write template (ignore errors - config is optional)
        let _ = std::fs::write(&path, template);
    }

    /// Load file config if it exists
    fn load_file_config() -> FileConfig {
        let Some(path) = Self::config_path() else {
            return FileConfig::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
                eprintln!("Warning: Failed to parse {}: {}", path.display(), e);
                FileConfig::default()
            }),
            Err(_) => FileConfig::default(), // File doesn't exist, use defaults
        }
    }

    /// Serialize config to TOML string (single source of truth for format)
    pub fn to_toml(&self) -> String {
        format!(
            r#"# rpchat configuration

# Chat server endpoint
endpoint = "{endpoint}"

# Display templates. Placeholders: {{{{ts}}}}, {{{{user}}}}, {{{{chan}}}} / {{{{msg}}}}
[templates]
join = "{join}"
part = "{part}"
msg = "{msg}"

# Logging configuration (RUST_LOG env var overrides)
[logging]
level = "{log_level}"
file_enabled = {file_enabled}
file_dir = "{file_dir}"
"#,
            endpoint = self.endpoint,
            join = self.templates.join,
            part = self.templates.part,
            msg = self.templates.msg,
            log_level = self.logging.level,
            file_enabled = self.logging.file_enabled,
            file_dir = self.logging.file_dir.display(),
        )
    }

    /// Load configuration: env vars -> file -> defaults
    pub fn from_env() -> Self {
        let file = Self::load_file_config();

        // Endpoint: env > file > default (the example server's port)
        let endpoint = std::env::var("RPCHAT_ENDPOINT")
            .ok()
            .or(file.endpoint)
            .unwrap_or_else(|| "ws://127.0.0.1:4321".to_string());

        // TUI toggle: env only (runtime flag)
        let enable_tui = std::env::var("RPCHAT_NO_TUI")
            .map(|v| v != "1" && v.to_lowercase() != "true")
            .unwrap_or(true);

        // Demo mode: env only (runtime flag)
        let demo_mode = std::env::var("RPCHAT_DEMO")
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(false);

        // Templates: file only; missing keys fall back per-template
        let templates = file.templates.unwrap_or_default();

        // Logging settings: file only (RUST_LOG env var handled at init)
        let file_logging = file.logging.unwrap_or_default();
        let defaults = LoggingConfig::default();
        let logging = LoggingConfig {
            level: file_logging.level.unwrap_or(defaults.level),
            file_enabled: file_logging.file_enabled.unwrap_or(defaults.file_enabled),
            file_dir: file_logging
                .file_dir
                .map(PathBuf::from)
                .unwrap_or(defaults.file_dir),
        };

        Self {
            endpoint,
            enable_tui,
            demo_mode,
            templates,
            logging,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: "ws://127.0.0.1:4321".to_string(),
            enable_tui: true,
            demo_mode: false,
            templates: TemplateSet::default(),
            logging: LoggingConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_the_example_server() {
        let config = Config::default();
        assert_eq!(config.endpoint, "ws://127.0.0.1:4321");
        assert!(config.enable_tui);
        assert!(!config.demo_mode);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn file_config_parses_partial_sections() {
        let parsed: FileConfig = toml::from_str(
            r#"
            endpoint = "ws://chat.example.net:4321"

            [templates]
            msg = "{{user}} says {{msg}}"

            [logging]
            level = "debug"
            "#,
        )
        .unwrap();

        assert_eq!(parsed.endpoint.as_deref(), Some("ws://chat.example.net:4321"));
        let templates = parsed.templates.unwrap();
        assert_eq!(templates.msg, "{{user}} says {{msg}}");
        // Unset templates fall back to their defaults
        assert_eq!(templates.join, TemplateSet::default().join);
        assert_eq!(parsed.logging.unwrap().level.as_deref(), Some("debug"));
    }

    #[test]
    fn to_toml_round_trips_through_the_file_parser() {
        let mut config = Config::default();
        config.endpoint = "ws://elsewhere:9000".to_string();
        config.templates.msg = "{{user}}: {{msg}}".to_string();

        let parsed: FileConfig = toml::from_str(&config.to_toml()).unwrap();
        assert_eq!(parsed.endpoint.as_deref(), Some("ws://elsewhere:9000"));
        assert_eq!(parsed.templates.unwrap().msg, "{{user}}: {{msg}}");
    }
}
