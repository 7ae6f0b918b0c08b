//! Configuration loading, defaults and persistence.
//!
//! Configuration is resolved in order of precedence (highest wins):
//!
//! 1. **Environment variables** — `KODI_HOST`, `KODI_PORT`
//! 2. **Config file** — path via `--config <path>`, or
//!    `$XDG_CONFIG_HOME/kodiremote/kodiremote.toml`
//! 3. **Compiled defaults** — see each field's default value below
//!
//! The TOML file mirrors the struct hierarchy:
//!
//! ```toml
//! [server]
//! host = "192.168.1.20"
//! port = 8080
//! timeout_ms = 10000   # 0 disables the timeout
//!
//! [logging]
//! level = "warn"
//! ```
//!
//! `krm --host=<addr> --port=<port>` writes this file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_DIR: &str = "kodiremote";
const CONFIG_FILE: &str = "kodiremote.toml";

/// Top-level configuration, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where Kodi's JSON-RPC HTTP interface listens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host name or address of the Kodi box. Empty until configured.
    #[serde(default)]
    pub host: String,
    /// Web server port (default 8080). Override with `KODI_PORT`.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Connect and request timeout in milliseconds (default 10 000, 0 = none).
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// tracing filter level (default `warn`). Overridden by `RUST_LOG` env var.
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_port() -> u16 {
    8080
}
fn default_timeout_ms() -> u64 {
    10_000
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: default_port(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl ServerConfig {
    /// `http://{host}:{port}/jsonrpc`
    pub fn endpoint(&self) -> String {
        format!("http://{}:{}/jsonrpc", self.host, self.port)
    }
}

/// Default config file location, if the platform has a config directory.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(CONFIG_DIR).join(CONFIG_FILE))
}

impl Config {
    /// Load the file alone: a missing file yields the defaults, an
    /// unreadable or invalid one is an error.
    ///
    /// This is what `--host`/`--port` update and save back, so environment
    /// overrides are not applied here.
    pub fn load_file(path: Option<&Path>) -> Result<Self, String> {
        match path {
            Some(p) if p.exists() => Self::read(p),
            _ => Ok(Config::default()),
        }
    }

    /// Apply `KODI_HOST` / `KODI_PORT` on top of the file values.
    pub fn with_env_overrides(self) -> Result<Self, String> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        if let Some(host) = var("KODI_HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("KODI_PORT") {
            self.server.port = port
                .parse()
                .map_err(|e| format!("Invalid KODI_PORT '{}': {}", port, e))?;
        }
        Ok(self)
    }

    fn read(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {}: {}", path.display(), e))?;
        toml::from_str(&content)
            .map_err(|e| format!("Failed to parse config file {}: {}", path.display(), e))
    }

    /// Write the configuration as TOML, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .map_err(|e| format!("Failed to create {}: {}", dir.display(), e))?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;
        std::fs::write(path, content)
            .map_err(|e| format!("Failed to write config file {}: {}", path.display(), e))
    }
}
