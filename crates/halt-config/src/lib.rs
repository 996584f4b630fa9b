//! Configuration for the halt debugger client.
//!
//! Configuration is read from a TOML file (usually `halt.toml` next to the
//! program being debugged). Every section is optional:
//!
//! ```toml
//! [logging]
//! level = "debug"
//! json = false
//! stderr = true
//! file = "/tmp/halt.log"
//!
//! [session]
//! step_timeout_secs = 0.5
//! trace_history_limit = 10000
//!
//! [[session.predicates]]
//! name = "AND"
//! kind = "compound"
//! ```

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use halt_proto::{PredicateCatalog, PredicateMapping};
use parking_lot::ReentrantMutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod logging;

pub use logging::{init_tracing, LoggingConfig};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct HaltConfig {
    /// Global logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Debugging session settings.
    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Delay the engine waits between steps while running, in seconds.
    #[serde(default)]
    pub step_timeout_secs: f64,

    /// Maximum number of trace payloads kept in memory. `0` keeps all of them.
    #[serde(default = "SessionConfig::default_trace_history_limit")]
    pub trace_history_limit: usize,

    /// Overrides the predicate catalog normally fetched from the engine.
    #[serde(default)]
    pub predicates: Option<Vec<PredicateMapping>>,
}

impl SessionConfig {
    fn default_trace_history_limit() -> usize {
        100_000
    }

    /// The configured predicate catalog, or the built-in one.
    pub fn catalog(&self) -> PredicateCatalog {
        match &self.predicates {
            Some(predicates) => PredicateCatalog::new(predicates.clone()),
            None => PredicateCatalog::builtin(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            step_timeout_secs: 0.0,
            trace_history_limit: Self::default_trace_history_limit(),
            predicates: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse toml config: {0}")]
    Toml(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        // The default `Display` embeds a snippet of the input; keep only the message.
        ConfigError::Toml(err.message().to_string())
    }
}

/// Non-fatal problems found while validating a loaded config.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    LoggingLevelInvalid { value: String },
    StepTimeoutInvalid { value: String },
    DuplicatePredicate { name: String },
    EmptyPredicateName,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigWarning::LoggingLevelInvalid { value } => {
                write!(f, "logging.level `{value}` is not a valid filter; using `info`")
            }
            ConfigWarning::StepTimeoutInvalid { value } => write!(
                f,
                "session.step_timeout_secs must be a finite, non-negative number (got {value})"
            ),
            ConfigWarning::DuplicatePredicate { name } => write!(
                f,
                "session.predicates lists `{name}` more than once; the first entry wins"
            ),
            ConfigWarning::EmptyPredicateName => {
                f.write_str("session.predicates contains an entry with an empty name")
            }
        }
    }
}

impl HaltConfig {
    /// Load a config file from TOML.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::load_from_str(&text)
    }

    pub fn load_from_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a config from a TOML string and return validation warnings.
    pub fn load_from_str_with_warnings(
        text: &str,
    ) -> Result<(Self, Vec<ConfigWarning>), ConfigError> {
        let config = Self::load_from_str(text)?;
        let warnings = config.validate();
        Ok((config, warnings))
    }

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if !self.logging.level_is_valid() {
            warnings.push(ConfigWarning::LoggingLevelInvalid {
                value: self.logging.level.clone(),
            });
        }

        let timeout = self.session.step_timeout_secs;
        if !timeout.is_finite() || timeout < 0.0 {
            warnings.push(ConfigWarning::StepTimeoutInvalid {
                value: timeout.to_string(),
            });
        }

        if let Some(predicates) = &self.session.predicates {
            let mut seen = HashSet::new();
            for mapping in predicates {
                if mapping.name.is_empty() {
                    warnings.push(ConfigWarning::EmptyPredicateName);
                } else if !seen.insert(mapping.name.as_str()) {
                    warnings.push(ConfigWarning::DuplicatePredicate {
                        name: mapping.name.clone(),
                    });
                }
            }
        }

        warnings
    }
}

pub const HALT_CONFIG_ENV_VAR: &str = "HALT_CONFIG_PATH";

const CONFIG_FILE_NAMES: [&str; 2] = ["halt.toml", ".halt.toml"];

static CONFIG_ENV_LOCK: ReentrantMutex<()> = parking_lot::const_reentrant_mutex(());

/// Runs `f` while no config discovery can read [`HALT_CONFIG_ENV_VAR`].
///
/// Tests that set the variable must do it inside this lock.
pub fn with_config_env_lock<R>(f: impl FnOnce() -> R) -> R {
    let _guard = CONFIG_ENV_LOCK.lock();
    f()
}

/// Finds the config file for `root`.
///
/// [`HALT_CONFIG_ENV_VAR`] wins when set (relative paths resolve against
/// `root`); otherwise the first of `halt.toml`, `.halt.toml` present in `root`.
pub fn discover_config_path(root: &Path) -> Option<PathBuf> {
    let path = with_config_env_lock(|| match std::env::var_os(HALT_CONFIG_ENV_VAR) {
        Some(value) => Some(root.join(value)),
        None => CONFIG_FILE_NAMES
            .iter()
            .map(|name| root.join(name))
            .find(|path| path.is_file()),
    })?;
    Some(path.canonicalize().unwrap_or(path))
}

/// Result of [`load_for_root`].
#[derive(Clone, Debug, PartialEq)]
pub struct LoadedConfig {
    pub config: HaltConfig,
    /// The file the config came from; `None` when defaults were used.
    pub path: Option<PathBuf>,
    pub warnings: Vec<ConfigWarning>,
}

/// Discovers and loads the configuration for `root`.
///
/// Warnings are returned rather than logged, since callers usually install
/// the tracing subscriber from the loaded config first.
pub fn load_for_root(root: &Path) -> Result<LoadedConfig, ConfigError> {
    let Some(path) = discover_config_path(root) else {
        return Ok(LoadedConfig {
            config: HaltConfig::default(),
            path: None,
            warnings: Vec::new(),
        });
    };

    let config = HaltConfig::load_from_path(&path)?;
    let warnings = config.validate();
    Ok(LoadedConfig {
        config,
        path: Some(path),
        warnings,
    })
}
