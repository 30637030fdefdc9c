//! On-disk defaults for aligner tolerance and gap penalties

use crate::AlignError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default numeric tolerance and gap penalties an embedding application can
/// ship as a `.toml` profile instead of constructing a `GapPenalties`
/// literal at every call site. The aligner core itself never reads this from
/// an implicit path; callers load it explicitly and hand the values to
/// `ScoreModel`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlignerDefaults {
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
    #[serde(default)]
    pub gaps: GapDefaults,
}

/// Mirrors `score_model::GapPenalties`'s twelve open/extend x left/internal/
/// right x insertion/deletion rates, so a non-uniform default profile can
/// round-trip through a `.toml` file rather than collapsing to one open and
/// one extend rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GapDefaults {
    #[serde(default = "default_open")]
    pub open_left_insertion: f64,
    #[serde(default = "default_open")]
    pub open_internal_insertion: f64,
    #[serde(default = "default_open")]
    pub open_right_insertion: f64,
    #[serde(default = "default_open")]
    pub open_left_deletion: f64,
    #[serde(default = "default_open")]
    pub open_internal_deletion: f64,
    #[serde(default = "default_open")]
    pub open_right_deletion: f64,
    #[serde(default = "default_extend")]
    pub extend_left_insertion: f64,
    #[serde(default = "default_extend")]
    pub extend_internal_insertion: f64,
    #[serde(default = "default_extend")]
    pub extend_right_insertion: f64,
    #[serde(default = "default_extend")]
    pub extend_left_deletion: f64,
    #[serde(default = "default_extend")]
    pub extend_internal_deletion: f64,
    #[serde(default = "default_extend")]
    pub extend_right_deletion: f64,
}

fn default_epsilon() -> f64 {
    1e-6
}
fn default_open() -> f64 {
    10.0
}
fn default_extend() -> f64 {
    1.0
}

impl Default for AlignerDefaults {
    fn default() -> Self {
        Self {
            epsilon: default_epsilon(),
            gaps: GapDefaults::default(),
        }
    }
}

impl Default for GapDefaults {
    fn default() -> Self {
        Self {
            open_left_insertion: default_open(),
            open_internal_insertion: default_open(),
            open_right_insertion: default_open(),
            open_left_deletion: default_open(),
            open_internal_deletion: default_open(),
            open_right_deletion: default_open(),
            extend_left_insertion: default_extend(),
            extend_internal_insertion: default_extend(),
            extend_right_insertion: default_extend(),
            extend_left_deletion: default_extend(),
            extend_internal_deletion: default_extend(),
            extend_right_deletion: default_extend(),
        }
    }
}

pub fn default_config() -> AlignerDefaults {
    AlignerDefaults::default()
}

pub fn load_defaults<P: AsRef<Path>>(path: P) -> Result<AlignerDefaults, AlignError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| AlignError::Validation(format!("failed to read config: {e}")))?;
    toml::from_str(&contents).map_err(|e| AlignError::Validation(format!("failed to parse config: {e}")))
}

pub fn save_defaults<P: AsRef<Path>>(path: P, config: &AlignerDefaults) -> Result<(), AlignError> {
    let contents = toml::to_string_pretty(config)
        .map_err(|e| AlignError::Validation(format!("failed to serialize config: {e}")))?;
    std::fs::write(path, contents)
        .map_err(|e| AlignError::Validation(format!("failed to write config: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = AlignerDefaults::default();
        assert_eq!(config.epsilon, 1e-6);
        assert_eq!(config.gaps.open_internal_insertion, 10.0);
        assert_eq!(config.gaps.extend_internal_insertion, 1.0);
        assert_eq!(config.gaps.open_right_deletion, 10.0);
    }

    #[test]
    fn test_round_trip() {
        let mut config = AlignerDefaults::default();
        config.epsilon = 1e-3;
        config.gaps.open_internal_insertion = 20.0;
        config.gaps.open_right_insertion = 30.0;
        config.gaps.extend_left_deletion = 4.0;

        let file = NamedTempFile::new().unwrap();
        save_defaults(file.path(), &config).unwrap();
        let loaded = load_defaults(file.path()).unwrap();

        assert_eq!(loaded.epsilon, 1e-3);
        assert_eq!(loaded.gaps.open_internal_insertion, 20.0);
        assert_eq!(loaded.gaps.open_right_insertion, 30.0);
        assert_eq!(loaded.gaps.extend_left_deletion, 4.0);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "epsilon = 0.01\n").unwrap();
        let loaded = load_defaults(file.path()).unwrap();

        assert_eq!(loaded.epsilon, 0.01);
        assert_eq!(loaded.gaps.open_internal_insertion, default_open());
        assert_eq!(loaded.gaps.extend_right_deletion, default_extend());
    }
}
