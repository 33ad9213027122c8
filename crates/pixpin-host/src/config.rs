//! Client configuration.
//!
//! Layers, lowest priority first:
//! 1. A preset ([`Profile`])
//! 2. JSON config file: `PIXPIN_CONFIG`, else `<config_dir>/pixpin/config.json`
//! 3. Environment: `PIXPIN_EXECUTABLE`, `PIXPIN_TIMEOUT_MS`,
//!    `PIXPIN_STARTUP_DELAY_MS`, `PIXPIN_LOG_SCRIPTS`
//! 4. Command-line flags, applied by the caller
//!
//! Empty environment values are ignored.

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use pixpin_core::types::ShotAction;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

pub const ENV_CONFIG: &str = "PIXPIN_CONFIG";
pub const ENV_EXECUTABLE: &str = "PIXPIN_EXECUTABLE";
pub const ENV_TIMEOUT_MS: &str = "PIXPIN_TIMEOUT_MS";
pub const ENV_STARTUP_DELAY_MS: &str = "PIXPIN_STARTUP_DELAY_MS";
pub const ENV_LOG_SCRIPTS: &str = "PIXPIN_LOG_SCRIPTS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid value '{value}' for {var}: {reason}")]
    InvalidEnv {
        var: &'static str,
        value: String,
        reason: String,
    },
    #[error("unknown profile '{0}' (expected default, development or production)")]
    UnknownProfile(String),
}

/// Named presets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Profile {
    #[default]
    Default,
    /// Logs every script, raises errors, generous timeout.
    Development,
    /// Quiet, swallows failures, short timeout.
    Production,
}

impl FromStr for Profile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" => Ok(Profile::Default),
            "development" | "dev" => Ok(Profile::Development),
            "production" | "prod" => Ok(Profile::Production),
            _ => Err(ConfigError::UnknownProfile(s.to_string())),
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Profile::Default => write!(f, "default"),
            Profile::Development => write!(f, "development"),
            Profile::Production => write!(f, "production"),
        }
    }
}

/// Settings for [`crate::PixPinClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Launched when no running instance can be detected.
    pub executable_path: PathBuf,
    /// Name looked up in the process table.
    pub process_name: String,
    pub execution_timeout: Duration,
    /// Pause after starting PixPin before it is used.
    pub startup_delay: Duration,
    /// Start PixPin before dispatching when it is not running.
    pub auto_start: bool,
    /// When false, dispatch failures are logged and swallowed.
    pub raise_errors: bool,
    pub log_scripts: bool,
    pub default_shot_action: ShotAction,
    pub default_save_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            executable_path: PathBuf::from("pixpin.exe"),
            process_name: "pixpin".to_string(),
            execution_timeout: Duration::from_millis(30_000),
            startup_delay: Duration::from_millis(2000),
            auto_start: true,
            raise_errors: true,
            log_scripts: false,
            default_shot_action: ShotAction::Copy,
            default_save_path: None,
        }
    }
}

/// On-disk form; every field optional so files only override what they name.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    executable_path: Option<PathBuf>,
    process_name: Option<String>,
    execution_timeout_ms: Option<u64>,
    startup_delay_ms: Option<u64>,
    auto_start: Option<bool>,
    raise_errors: Option<bool>,
    log_scripts: Option<bool>,
    default_shot_action: Option<ShotAction>,
    default_save_path: Option<PathBuf>,
}

impl ClientConfig {
    pub fn development() -> Self {
        Self {
            log_scripts: true,
            raise_errors: true,
            execution_timeout: Duration::from_millis(60_000),
            ..Self::default()
        }
    }

    pub fn production() -> Self {
        Self {
            log_scripts: false,
            raise_errors: false,
            execution_timeout: Duration::from_millis(10_000),
            ..Self::default()
        }
    }

    pub fn for_profile(profile: Profile) -> Self {
        match profile {
            Profile::Default => Self::default(),
            Profile::Development => Self::development(),
            Profile::Production => Self::production(),
        }
    }

    /// Preset, then config file, then environment.
    pub fn load(profile: Profile) -> Result<Self, ConfigError> {
        let mut config = Self::for_profile(profile);

        match env_value(ENV_CONFIG) {
            // An explicitly named file must exist.
            Some(path) => config.apply_file(Path::new(&path))?,
            None => {
                if let Some(path) = default_config_path().filter(|p| p.is_file()) {
                    config.apply_file(&path)?;
                }
            }
        }

        config.apply_env()?;
        Ok(config)
    }

    pub fn apply_file(&mut self, path: &Path) -> Result<(), ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: ConfigFile =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        debug!("Loaded config from {}", path.display());

        if let Some(v) = file.executable_path {
            self.executable_path = v;
        }
        if let Some(v) = file.process_name {
            self.process_name = v;
        }
        if let Some(ms) = file.execution_timeout_ms {
            self.execution_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = file.startup_delay_ms {
            self.startup_delay = Duration::from_millis(ms);
        }
        if let Some(v) = file.auto_start {
            self.auto_start = v;
        }
        if let Some(v) = file.raise_errors {
            self.raise_errors = v;
        }
        if let Some(v) = file.log_scripts {
            self.log_scripts = v;
        }
        if let Some(v) = file.default_shot_action {
            self.default_shot_action = v;
        }
        if file.default_save_path.is_some() {
            self.default_save_path = file.default_save_path;
        }
        Ok(())
    }

    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        if let Some(path) = env_value(ENV_EXECUTABLE) {
            self.executable_path = PathBuf::from(path);
        }
        if let Some(ms) = env_millis(ENV_TIMEOUT_MS)? {
            self.execution_timeout = ms;
        }
        if let Some(ms) = env_millis(ENV_STARTUP_DELAY_MS)? {
            self.startup_delay = ms;
        }
        if let Some(value) = env_value(ENV_LOG_SCRIPTS) {
            self.log_scripts = parse_flag(ENV_LOG_SCRIPTS, &value)?;
        }
        Ok(())
    }
}

/// Default config file location.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("pixpin").join("config.json"))
}

/// Read an environment variable, ignoring unset and empty values.
fn env_value(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.is_empty())
}

fn env_millis(name: &'static str) -> Result<Option<Duration>, ConfigError> {
    let Some(value) = env_value(name) else {
        return Ok(None);
    };
    value
        .trim()
        .parse::<u64>()
        .map(|ms| Some(Duration::from_millis(ms)))
        .map_err(|e| ConfigError::InvalidEnv {
            var: name,
            value: value.clone(),
            reason: e.to_string(),
        })
}

fn parse_flag(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidEnv {
            var,
            value: value.to_string(),
            reason: "expected true or false".to_string(),
        }),
    }
}
