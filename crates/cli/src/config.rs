use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use tracing::debug;

use upkeep_core::Config;

use crate::cli::CliArgs;

/// Return the default config file path: ~/.config/upkeep/config.toml
pub fn default_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .context("could not determine user config directory")?
        .join("upkeep");
    Ok(config_dir.join("config.toml"))
}

/// Load config from the given path, or the default path.
/// A missing default file yields defaults; a missing explicit file is an error.
pub fn load_file(path: Option<&str>) -> Result<Config> {
    let config_path = match path {
        Some(p) => PathBuf::from(p),
        None => match default_config_path() {
            Ok(p) => p,
            Err(e) => {
                debug!(error = %e, "No config directory, using defaults");
                return Ok(Config::default());
            }
        },
    };

    if config_path.exists() {
        debug!(?config_path, "Loading config");
        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("failed to read config: {}", config_path.display()))?;
        parse(&content)
            .with_context(|| format!("failed to parse config: {}", config_path.display()))
    } else if path.is_some() {
        bail!("config file not found: {}", config_path.display());
    } else {
        debug!(?config_path, "Config file not found, using defaults");
        Ok(Config::default())
    }
}

pub fn parse(content: &str) -> Result<Config> {
    Ok(toml::from_str(content)?)
}

/// Resolve the active config.
/// Priority: CLI flags > environment (profiled) > config file > built-in defaults.
pub fn resolve(args: &CliArgs) -> Result<Config> {
    let file = load_file(args.config.as_deref())?;
    let profile = args.profile.clone().unwrap_or_else(|| file.profile.clone());
    let mut config = file.with_env(&profile);
    apply_overrides(&mut config, args);
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn apply_overrides(config: &mut Config, args: &CliArgs) {
    if let Some(t) = args.temp_threshold {
        config.rules.temp_threshold = t;
    }
    if let Some(t) = args.vibration_threshold {
        config.rules.vibration_threshold = t;
    }
    if let Some(t) = args.pressure_threshold {
        config.rules.pressure_threshold = t;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = parse(
            r#"
[rules]
temp_threshold = 85.0

[training]
seed = 7
"#,
        )
        .unwrap();
        assert_eq!(config.rules.temp_threshold, 85.0);
        assert_eq!(config.rules.vibration_threshold, 0.9);
        assert_eq!(config.training.seed, 7);
        assert_eq!(config.training.test_fraction, 0.3);
        assert_eq!(config.risk.temp_reference, 100.0);
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(parse("").unwrap(), Config::default());
    }

    #[test]
    fn toml_roundtrip() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert_eq!(parse(&toml_str).unwrap(), config);
    }

    #[test]
    fn flags_override_thresholds() {
        let args = CliArgs::parse_from(["upkeep", "--pressure-threshold", "35"]);
        let mut config = Config::default();
        apply_overrides(&mut config, &args);
        assert_eq!(config.rules.pressure_threshold, 35.0);
        assert_eq!(config.rules.temp_threshold, 90.0);
    }

    #[test]
    fn env_profile_selects_prefixed_keys() {
        // Unique names so parallel tests never observe these vars.
        std::env::set_var("CLIPROFILETEST_TEMP_THRESHOLD", "50");
        std::env::set_var("CLIPROFILETEST_SPLIT_SEED", "11");
        let args = CliArgs::parse_from(["upkeep", "--profile", "cliprofiletest"]);
        let config = resolve(&args).unwrap();
        assert_eq!(config.profile, "CLIPROFILETEST");
        assert_eq!(config.rules.temp_threshold, 50.0);
        assert_eq!(config.training.seed, 11);
        assert_eq!(config.rules.vibration_threshold, 0.9);
        assert!(Config::available_profiles().contains(&"CLIPROFILETEST".to_string()));
        std::env::remove_var("CLIPROFILETEST_TEMP_THRESHOLD");
        std::env::remove_var("CLIPROFILETEST_SPLIT_SEED");
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        assert!(load_file(Some("/nonexistent/upkeep/config.toml")).is_err());
    }
}
