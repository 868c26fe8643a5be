use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::helper_functions::config_path;

pub const DEFAULT_ANTIBIOTICS: [&str; 5] = ["CIP", "CAZ", "MER", "C/T", "TOB"];

/// How firing regulator sub-loci are combined with the main locus score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegulatorPolicy {
    /// Only the first sub-locus with a firing record counts.
    #[default]
    FirstFiring,
    /// Every sub-locus with a firing record counts, each at most once.
    SumFiring,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Antibiotics reported even when nothing scores them, in report order.
    pub antibiotics: Vec<String>,
    pub regulator_policy: RegulatorPolicy,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            antibiotics: DEFAULT_ANTIBIOTICS.iter().map(|s| s.to_string()).collect(),
            regulator_policy: RegulatorPolicy::default(),
        }
    }
}

impl ScoringConfig {
    pub fn load(path: &Path) -> Result<Self> {
        info!("Reading scoring config from {}", path.display());
        let file = File::open(path)
            .with_context(|| format!("failed to open scoring config {}", path.display()))?;
        serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("invalid scoring config {}", path.display()))
    }

    /// Config named by `RESISTANCE_SCORER_CONFIG`, or the defaults when unset.
    pub fn from_env() -> Result<Self> {
        match config_path() {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_track_panel_antibiotics() {
        let config = ScoringConfig::default();
        assert_eq!(config.antibiotics, vec!["CIP", "CAZ", "MER", "C/T", "TOB"]);
        assert_eq!(config.regulator_policy, RegulatorPolicy::FirstFiring);
    }

    #[test]
    fn load_fills_missing_fields_with_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"regulator_policy": "sum_firing"}}"#).unwrap();

        let config = ScoringConfig::load(file.path()).unwrap();
        assert_eq!(config.regulator_policy, RegulatorPolicy::SumFiring);
        assert_eq!(config.antibiotics.len(), 5);
    }

    #[test]
    fn load_reports_path_on_bad_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = ScoringConfig::load(file.path()).unwrap_err();
        assert!(format!("{err}").contains("invalid scoring config"));
    }
}
