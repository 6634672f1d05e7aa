//! Driver configuration read from `~/.piwalk/config.toml`.
//!
//! ```toml
//! [run]
//! delay_ms = 50
//! view_radius = 3
//! dump_registers = true
//! pi_file = "${HOME}/digits/pi.txt"
//! bounds = [{ x = 0, y = 0 }, { x = 200, y = 80 }]
//! ```
//!
//! Every key is optional; the driver's flags take precedence over anything
//! set here.

use std::{
    env, fs, io,
    path::{Path, PathBuf},
};

use piwalk_types::Position;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Default, Deserialize)]
pub struct PiwalkConfig {
    pub run: Option<RunConfig>,
}

/// Settings for a program run.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Pause between steps, in milliseconds.
    pub delay_ms: Option<u64>,
    /// Radius of the neighborhood view; absent disables the view.
    pub view_radius: Option<u32>,
    #[serde(default)]
    pub dump_registers: bool,
    /// Replacement π-digit file. `${VAR}` references are expanded.
    pub pi_file: Option<String>,
    /// Two opposite corners of the cursor's bounding box.
    pub bounds: Option<[Position; 2]>,
}

impl RunConfig {
    /// `pi_file` with environment references expanded.
    #[must_use]
    pub fn pi_file_path(&self) -> Option<PathBuf> {
        self.pi_file
            .as_deref()
            .map(|raw| PathBuf::from(expand_env_vars(raw)))
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config at {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl ConfigError {
    #[must_use]
    pub fn path(&self) -> &PathBuf {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => path,
        }
    }
}

/// Expand `${VAR}` references. Unset variables expand to nothing; an unclosed
/// `${` is kept literally.
#[must_use]
pub fn expand_env_vars(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            out.push_str(&rest[start..]);
            return out;
        };
        let var = &after[..end];
        if !var.is_empty() {
            out.push_str(&env::var(var).unwrap_or_default());
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

impl PiwalkConfig {
    /// Load the user config. A missing file is not an error.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let Some(path) = config_path() else {
            return Ok(None);
        };
        if !path.exists() {
            return Ok(None);
        }
        Self::load_from(&path).map(Some)
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(config),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    /// The `[run]` table, or defaults when it is absent.
    #[must_use]
    pub fn run(&self) -> RunConfig {
        self.run.clone().unwrap_or_default()
    }
}

#[must_use]
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".piwalk").join("config.toml"))
}
