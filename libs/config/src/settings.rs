//! Layered settings for StableSwap binaries
//!
//! Sources are applied in order, later ones winning:
//! 1. Built-in defaults
//! 2. Optional TOML file
//! 3. Environment variables prefixed with `STABLESWAP_`, nested keys joined
//!    with `__` (e.g. `STABLESWAP_SOLVER__MAX_D_ITERATIONS=64`)

use anyhow::{bail, Context, Result};
use config_crate::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use stableswap_amm::{SolverLimits, MAX_ITERATIONS};
use std::path::Path;
use tracing::{debug, info};

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "STABLESWAP";

/// Top-level settings document
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct StableSwapConfig {
    pub solver: SolverSettings,
    pub logging: LoggingSettings,
}

/// Newton iteration caps
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SolverSettings {
    pub max_d_iterations: u32,
    pub max_y_iterations: u32,
}

/// Log output settings for the binaries
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive, overridden by `RUST_LOG`
    pub level: String,
    /// Emit JSON lines instead of plain text
    pub json: bool,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            max_d_iterations: u32::from(MAX_ITERATIONS),
            max_y_iterations: u32::from(MAX_ITERATIONS),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

fn iteration_cap(name: &str, value: u32) -> Result<u8> {
    if value == 0 {
        bail!("solver.{name} must be at least 1");
    }
    u8::try_from(value)
        .with_context(|| format!("solver.{name} = {value} exceeds the cap of {MAX_ITERATIONS}"))
}

impl SolverSettings {
    /// Validated iteration limits for the invariant solver
    pub fn limits(&self) -> Result<SolverLimits> {
        Ok(SolverLimits {
            max_d_iterations: iteration_cap("max_d_iterations", self.max_d_iterations)?,
            max_y_iterations: iteration_cap("max_y_iterations", self.max_y_iterations)?,
        })
    }
}

impl StableSwapConfig {
    /// Load settings from an optional TOML file plus environment overrides
    ///
    /// A path that is given but missing is an error; with no path only the
    /// defaults and the environment apply.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            info!("Loading configuration from {:?}", path);
            builder = builder.add_source(
                File::from(path)
                    .format(FileFormat::Toml)
                    .required(true),
            );
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to build configuration")?;
        let settings: Self = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        settings.validate()?;
        debug!(?settings, "Configuration loaded");
        Ok(settings)
    }

    /// Parse settings from TOML text, without environment overrides
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()
            .context("Failed to parse configuration")?;
        let settings: Self = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        self.solver.limits()?;
        if self.logging.level.trim().is_empty() {
            bail!("logging.level must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_without_sources() {
        let settings = StableSwapConfig::from_toml_str("").unwrap();
        assert_eq!(settings, StableSwapConfig::default());
        assert_eq!(settings.solver.limits().unwrap(), SolverLimits::default());
        assert_eq!(settings.logging.level, "info");
        assert!(!settings.logging.json);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("stableswap.toml");

        let config_content = r#"
[solver]
max_d_iterations = 64
max_y_iterations = 32

[logging]
level = "debug"
json = true
"#;
        fs::write(&config_path, config_content).unwrap();

        let settings = StableSwapConfig::load(Some(&config_path)).unwrap();
        assert_eq!(
            settings.solver.limits().unwrap(),
            SolverLimits {
                max_d_iterations: 64,
                max_y_iterations: 32,
            }
        );
        assert_eq!(settings.logging.level, "debug");
        assert!(settings.logging.json);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let settings =
            StableSwapConfig::from_toml_str("[solver]\nmax_y_iterations = 10\n").unwrap();
        assert_eq!(settings.solver.max_d_iterations, 255);
        assert_eq!(settings.solver.max_y_iterations, 10);
        assert_eq!(settings.logging, LoggingSettings::default());
    }

    #[test]
    fn test_rejects_invalid_caps() {
        let err =
            StableSwapConfig::from_toml_str("[solver]\nmax_d_iterations = 0\n").unwrap_err();
        assert!(err.to_string().contains("max_d_iterations"));

        let err =
            StableSwapConfig::from_toml_str("[solver]\nmax_y_iterations = 300\n").unwrap_err();
        assert!(err.to_string().contains("max_y_iterations"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(StableSwapConfig::load(Some(&dir.path().join("absent.toml"))).is_err());
    }
}
