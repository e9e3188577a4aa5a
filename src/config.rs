//! Run configuration.
//!
//! Settings come from an optional TOML file and are then overridden by
//! command-line flags:
//!
//! ```toml
//! eras = ["2018", "2021"]
//! filter = "closure"
//! color = "never"
//! summary = true
//! ```

use std::fs;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::demos::Era;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub eras: Vec<Era>,
    pub filter: Option<String>,
    pub color: ColorChoice,
    pub summary: bool,
    pub json: bool,
}

/// Command-line values layered on top of a loaded [`RunConfig`].
///
/// Empty or absent values leave the file's setting alone. The boolean flags
/// can only switch a setting on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub eras: Vec<Era>,
    pub filter: Option<String>,
    pub color: Option<ColorChoice>,
    pub summary: bool,
    pub json: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            eras: Era::ALL.to_vec(),
            filter: None,
            color: ColorChoice::Auto,
            summary: false,
            json: false,
        }
    }
}

impl RunConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// A config running a single era with default settings.
    pub fn for_era(era: Era) -> Self {
        RunConfig {
            eras: vec![era],
            ..RunConfig::default()
        }
    }

    pub fn apply_overrides(&mut self, overrides: Overrides) {
        if !overrides.eras.is_empty() {
            self.eras = overrides.eras;
        }
        if overrides.filter.is_some() {
            self.filter = overrides.filter;
        }
        if let Some(color) = overrides.color {
            self.color = color;
        }
        self.summary |= overrides.summary;
        self.json |= overrides.json;
    }

    /// Whether status markers should be colored on stdout.
    pub fn use_color(&self) -> bool {
        match self.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => {
                std::env::var_os("NO_COLOR").is_none() && io::stdout().is_terminal()
            }
        }
    }
}
