//! Advisor configuration.
//!
//! Loaded from a TOML file:
//! 1. `$SPARKADVISOR_CONFIG` if set
//! 2. `<config dir>/sparkadvisor/config.toml` (via `dirs::config_dir`)
//!
//! A missing file is not an error; every setting has a default.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cable::{default_rules, load_rules, CableAdvisor};
use crate::cost::{CostParser, ParserOptions};
use crate::error::AdvisorError;

pub const CONFIG_ENV: &str = "SPARKADVISOR_CONFIG";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AdvisorConfig {
    /// Custom cable rule table; the embedded table is used when unset
    pub cable_rules: Option<PathBuf>,
    /// tracing filter directive used when `RUST_LOG` is unset (e.g. "sparkadvisor=debug")
    pub log_filter: Option<String>,
    pub cost: ParserOptions,
}

impl AdvisorConfig {
    /// Default location of the config file, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("sparkadvisor").join("config.toml"))
    }

    /// Resolve the config path from the environment, then the platform default.
    pub fn resolve_path() -> Option<PathBuf> {
        std::env::var_os(CONFIG_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(Self::default_path)
    }

    /// Load from the resolved path, falling back to defaults when no file exists.
    pub fn load() -> Result<Self, AdvisorError> {
        match Self::resolve_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            Some(path) => {
                debug!("No config at {:?}, using defaults", path);
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, AdvisorError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, AdvisorError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), AdvisorError> {
        if !self.cost.default_vat_rate.is_finite() || self.cost.default_vat_rate < 0.0 {
            return Err(AdvisorError::Config(format!(
                "cost.default_vat_rate must be a non-negative number, got {}",
                self.cost.default_vat_rate
            )));
        }
        if !self.cost.discrepancy_tolerance.is_finite() || self.cost.discrepancy_tolerance < 0.0 {
            return Err(AdvisorError::Config(format!(
                "cost.discrepancy_tolerance must be a non-negative number, got {}",
                self.cost.discrepancy_tolerance
            )));
        }
        Ok(())
    }

    /// Build a cable advisor from the configured rule table.
    pub fn cable_advisor(&self) -> Result<CableAdvisor, AdvisorError> {
        let rules = match &self.cable_rules {
            Some(path) => load_rules(path)?,
            None => default_rules(),
        };
        Ok(CableAdvisor::new(rules))
    }

    pub fn cost_parser(&self) -> CostParser {
        CostParser::new(self.cost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config = AdvisorConfig::from_toml("").unwrap();
        assert_eq!(config, AdvisorConfig::default());
        assert_eq!(config.cost.default_vat_rate, 20.0);
        assert_eq!(config.cost.discrepancy_tolerance, 0.01);
        assert!(config.cable_rules.is_none());
    }

    #[test]
    fn test_partial_cost_table() {
        let config = AdvisorConfig::from_toml("[cost]\ndefault_vat_rate = 5.0\n").unwrap();
        assert_eq!(config.cost.default_vat_rate, 5.0);
        assert_eq!(config.cost.discrepancy_tolerance, 0.01);
    }

    #[test]
    fn test_negative_vat_rejected() {
        let err = AdvisorConfig::from_toml("[cost]\ndefault_vat_rate = -1.0\n").unwrap_err();
        assert!(matches!(err, AdvisorError::Config(_)));
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(AdvisorConfig::from_toml("cable_rule = \"typo.toml\"\n").is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "log_filter = \"sparkadvisor=debug\"").unwrap();
        writeln!(file, "[cost]").unwrap();
        writeln!(file, "discrepancy_tolerance = 1.0").unwrap();

        let config = AdvisorConfig::from_file(file.path()).unwrap();
        assert_eq!(config.log_filter.as_deref(), Some("sparkadvisor=debug"));
        assert_eq!(config.cost_parser().options().discrepancy_tolerance, 1.0);
    }

    #[test]
    fn test_missing_rules_file_is_error() {
        let config = AdvisorConfig {
            cable_rules: Some(PathBuf::from("/nonexistent/cable_rules.toml")),
            ..Default::default()
        };
        assert!(matches!(config.cable_advisor(), Err(AdvisorError::Io(_))));
    }

    #[test]
    fn test_default_advisor_uses_embedded_rules() {
        let advisor = AdvisorConfig::default().cable_advisor().unwrap();
        assert_eq!(advisor.rules().rules.len(), default_rules().rules.len());
    }
}
