// Author: Dustin Pilgrim
// License: MIT

use std::time::Duration;

use eyre::{Result, eyre};
use rune_cfg::RuneConfig;

use crate::{
    config::model::LullConfig,
    core::error::{ConfigError, Error},
    ldebug,
};

pub const BUILTIN_CONFIG: &str = include_str!("../../assets/lull.rune");

fn get_u64(config: &RuneConfig, key: &str) -> Option<u64> {
    config
        .get::<u64>(&format!("lull.{key}"))
        .or_else(|_| config.get::<u64>(&format!("lull.{}", key.replace('_', "-"))))
        .ok()
}

fn get_bool(config: &RuneConfig, key: &str) -> Option<bool> {
    config
        .get::<bool>(&format!("lull.{key}"))
        .or_else(|_| config.get::<bool>(&format!("lull.{}", key.replace('_', "-"))))
        .ok()
}

/// Parses the `lull` block, falling back to defaults for missing keys.
pub fn parse_lull_config(config: &RuneConfig) -> Result<LullConfig> {
    let defaults = LullConfig::default();

    let timeout = match get_u64(config, "timeout_ms") {
        Some(ms) => Duration::from_millis(ms),
        None => get_u64(config, "timeout_seconds")
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout),
    };

    if timeout.is_zero() {
        return Err(eyre::Report::new(Error::InvalidConfig(ConfigError::ZeroTimeout)));
    }

    let auto_hide = get_bool(config, "auto_hide").unwrap_or(defaults.auto_hide);
    let auto_start = get_bool(config, "auto_start").unwrap_or(defaults.auto_start);

    let transition = get_u64(config, "transition_ms")
        .map(Duration::from_millis)
        .unwrap_or(defaults.transition);

    let cfg = LullConfig {
        timeout,
        auto_hide,
        auto_start,
        transition,
    };

    ldebug!("Config", "Parsed config:");
    ldebug!("Config", "  timeout = {:?}", cfg.timeout);
    ldebug!("Config", "  auto_hide = {:?}", cfg.auto_hide);
    ldebug!("Config", "  auto_start = {:?}", cfg.auto_start);
    ldebug!("Config", "  transition = {:?}", cfg.transition);

    Ok(cfg)
}

pub fn parse_str(text: &str) -> Result<LullConfig> {
    let config = RuneConfig::from_str(text)
        .map_err(|e| eyre!("failed to parse configuration: {}", e))?;
    parse_lull_config(&config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_config_matches_defaults() {
        let cfg = parse_str(BUILTIN_CONFIG).unwrap();
        assert_eq!(cfg, LullConfig::default());
    }

    #[test]
    fn file_values_override_defaults() {
        let cfg = parse_str(
            "lull:\n  timeout_seconds 12\n  auto_hide false\n  transition_ms 0\nend\n",
        )
        .unwrap();

        assert_eq!(cfg.timeout, Duration::from_secs(12));
        assert!(!cfg.auto_hide);
        assert!(cfg.auto_start);
        assert_eq!(cfg.transition, Duration::ZERO);
    }

    #[test]
    fn timeout_ms_wins_over_seconds() {
        let cfg = parse_str("lull:\n  timeout_seconds 12\n  timeout_ms 750\nend\n").unwrap();
        assert_eq!(cfg.timeout, Duration::from_millis(750));
    }

    #[test]
    fn kebab_case_keys_are_accepted() {
        let cfg = parse_str("lull:\n  auto-start false\nend\n").unwrap();
        assert!(!cfg.auto_start);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = parse_str("lull:\n  timeout_seconds 0\nend\n").unwrap_err();
        assert_eq!(
            err.downcast_ref::<Error>(),
            Some(&Error::InvalidConfig(ConfigError::ZeroTimeout))
        );
    }
}
