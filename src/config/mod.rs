// Author: Dustin Pilgrim
// License: MIT

use std::fmt;
use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr, eyre};
use rune_cfg::RuneConfig;

use crate::ldebug;

pub mod model;
pub mod parser;

pub use model::{LullConfig, Overrides};

/// Where the effective configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Builtin,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::File(p) => write!(f, "{}", p.display()),
            ConfigSource::Builtin => write!(f, "built-in defaults"),
        }
    }
}

pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("lull").join("lull.rune"))
}

pub fn system_config_path() -> PathBuf {
    PathBuf::from("/etc/lull/lull.rune")
}

/// Picks the config file to load: an explicit path, then the user and system
/// locations, then the built-in defaults.
pub fn resolve_config_source(explicit: Option<&Path>) -> Result<ConfigSource> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(eyre!("config file {} does not exist", path.display()));
        }
        return Ok(ConfigSource::File(path.to_path_buf()));
    }

    if let Some(user) = user_config_path() {
        if user.exists() {
            return Ok(ConfigSource::File(user));
        }
    }

    let system = system_config_path();
    if system.exists() {
        return Ok(ConfigSource::File(system));
    }

    Ok(ConfigSource::Builtin)
}

pub fn load_from_path(path: &Path) -> Result<LullConfig> {
    let config = RuneConfig::from_file(path)
        .map_err(|e| eyre!("{}", e))
        .wrap_err_with(|| format!("failed to load config from {}", path.display()))?;
    parser::parse_lull_config(&config)
        .wrap_err_with(|| format!("invalid config in {}", path.display()))
}

pub fn load(explicit: Option<&Path>) -> Result<(LullConfig, ConfigSource)> {
    let source = resolve_config_source(explicit)?;

    let cfg = match &source {
        ConfigSource::File(path) => load_from_path(path)?,
        ConfigSource::Builtin => parser::parse_str(parser::BUILTIN_CONFIG)
            .wrap_err("failed to parse internal default config")?,
    };

    ldebug!("Config", "Loaded config from: {}", source);
    Ok((cfg, source))
}
