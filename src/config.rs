use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::strength::Strength;

/// Bounds on the size of a proof tree.
/// A request that would exceed a bound is treated as making no progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchLimits {
    // How deeply subproofs may nest below the root.
    pub max_subproof_depth: usize,

    // Lines across the whole tree.
    pub max_lines: usize,

    // Subproofs across the whole tree.
    pub max_subproofs: usize,

    // Subgoals held by any single proof.
    pub max_subgoals: usize,
}

impl Default for SearchLimits {
    fn default() -> Self {
        SearchLimits {
            max_subproof_depth: 6,
            max_lines: 5000,
            max_subproofs: 1500,
            max_subgoals: 100,
        }
    }
}

/// Settings for one derivation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeriverConfig {
    // The strength the search starts at.
    pub start: Strength,

    // The strongest system the search escalates to.
    pub stop: Strength,

    pub limits: SearchLimits,

    // Whether to prune lines and subproofs the final derivation does not use.
    pub minimize: bool,
}

impl Default for DeriverConfig {
    fn default() -> Self {
        DeriverConfig {
            start: Strength::WEAKEST,
            stop: Strength::STRONGEST,
            limits: SearchLimits::default(),
            minimize: true,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("the search starts at {start}, which is past where it stops, {stop}")]
    EmptyWindow { start: Strength, stop: Strength },
}

impl DeriverConfig {
    /// Reads a JSON config. Missing fields take their default values.
    pub fn load(path: &Path) -> Result<DeriverConfig, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: DeriverConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.start > self.stop {
            return Err(ConfigError::EmptyWindow {
                start: self.start,
                stop: self.stop,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::strength::{Inferential, Modal};

    #[test]
    fn test_partial_config_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"stop": {{"inferential": "Minimal", "modal": "KD"}}, "limits": {{"max_lines": 40}}}}"#
        )
        .unwrap();
        let config = DeriverConfig::load(file.path()).unwrap();
        assert_eq!(config.start, Strength::WEAKEST);
        assert_eq!(config.stop, Strength::new(Inferential::Minimal, Modal::KD));
        assert_eq!(config.limits.max_lines, 40);
        assert_eq!(config.limits.max_subproof_depth, 6);
        assert!(config.minimize);
    }

    #[test]
    fn test_rejects_empty_window() {
        let config = DeriverConfig {
            start: Strength::STRONGEST,
            stop: Strength::WEAKEST,
            ..DeriverConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyWindow { .. })
        ));
    }

    #[test]
    fn test_bad_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();
        assert!(matches!(
            DeriverConfig::load(file.path()),
            Err(ConfigError::Json(_))
        ));
    }
}
