//! # Configuration
//!
//! Optional TOML profile for default cipher settings, so repeated
//! invocations don't need `--cipher`/`--key` on every command line.
//!
//! ```toml
//! [cipher]
//! method = "xor"
//! key = "hunter2"
//! ```
//!
//! Command-line flags always override the profile.

use std::fs;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::cipher::CipherMethod;

/// Load and parse a TOML configuration file into any deserializable type.
///
/// # Arguments
/// - `path`: path to the TOML file
///
/// # Returns
/// - `Ok(T)`: the parsed configuration
/// - `Err`: the file could not be read or did not parse
pub fn load_config<T>(path: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    let content = fs::read_to_string(path)?;
    let config = toml::from_str(&content)?;
    Ok(config)
}

/// Profile settings for the command-line tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StegoConfig {
    /// Default cipher applied when no flags are given.
    #[serde(default)]
    pub cipher: CipherSettings,
}

/// The `[cipher]` section of the profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CipherSettings {
    /// Cipher method to apply by default.
    #[serde(default)]
    pub method: CipherMethod,
    /// Key for methods that take one.
    #[serde(default)]
    pub key: String,
}

impl StegoConfig {
    /// Load the profile from a TOML file.
    pub fn from_file(path: &str) -> Result<Self> {
        load_config(path)
    }
}
