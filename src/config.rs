use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::Error;

/// Maximum list/dictionary nesting accepted by default.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Decoding limits and policies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub max_depth: usize,
    /// Accept bytes after the top-level value instead of failing with
    /// `TrailingData`.
    pub allow_trailing_data: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            allow_trailing_data: false,
        }
    }
}

impl Config {
    pub fn from_toml_str(contents: &str) -> Result<Self, Error> {
        Ok(toml::from_str(contents)?)
    }

    /// Reads a TOML config file, falling back to defaults when it doesn't exist.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            Self::from_toml_str(&contents)
        } else {
            log::debug!("no config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }
}
