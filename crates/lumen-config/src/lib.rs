//! Shared configuration for the lumen CLI.
//!
//! TOML profiles layered with environment overrides, inventory document
//! loading, and translation to `lumen_core::HandlerConfig`. The CLI adds
//! `GlobalOpts`-aware wrappers on top.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use lumen_core::{ConnectionDefaults, HandlerConfig, Inventory};

/// Highest connection priority a device accepts.
pub const MAX_PRIORITY: u32 = 65_535;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to load inventory {path}: {reason}")]
    Inventory { path: PathBuf, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named inventory profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

/// A named profile: which devices to talk to and how to create
/// connections on them.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Inventory document (TOML or JSON).
    pub inventory: Option<PathBuf>,

    /// Override connection priority.
    pub priority: Option<u32>,

    /// Override connection permanence.
    pub permanent: Option<bool>,

    /// Override connection timeout, in seconds.
    pub timeout: Option<u32>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "lumen", "lumen").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("lumen");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file, then `LUMEN_` environment variables.
///
/// Nested keys use a double underscore: `LUMEN_DEFAULTS__OUTPUT=json`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("LUMEN_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Inventory ───────────────────────────────────────────────────────

/// Read an inventory document. `.json` files are parsed as JSON,
/// anything else as TOML.
pub fn load_inventory(path: &Path) -> Result<Inventory, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Inventory {
        path: path.to_owned(),
        reason: e.to_string(),
    })?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let parsed = if is_json {
        serde_json::from_str(&text).map_err(|e| e.to_string())
    } else {
        toml::from_str(&text).map_err(|e| e.to_string())
    };

    parsed.map_err(|reason| ConfigError::Inventory {
        path: path.to_owned(),
        reason,
    })
}

// ── Translation ─────────────────────────────────────────────────────

/// Build a `HandlerConfig` from a profile's connection overrides.
pub fn profile_to_handler_config(profile: &Profile) -> Result<HandlerConfig, ConfigError> {
    let defaults = ConnectionDefaults::default();
    let connection = ConnectionDefaults {
        priority: profile.priority.unwrap_or(defaults.priority),
        permanent: profile.permanent.unwrap_or(defaults.permanent),
        timeout_secs: profile.timeout.unwrap_or(defaults.timeout_secs),
    };

    if connection.priority > MAX_PRIORITY {
        return Err(ConfigError::Validation {
            field: "priority".into(),
            reason: format!("must be at most {MAX_PRIORITY}, got {}", connection.priority),
        });
    }
    if connection.permanent && connection.timeout_secs > 0 {
        return Err(ConfigError::Validation {
            field: "timeout".into(),
            reason: "only impermanent connections can time out".into(),
        });
    }

    Ok(HandlerConfig { connection })
}
