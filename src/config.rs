//! Run configuration.
//!
//! Every field has a compiled default, so an empty TOML document is a
//! valid configuration:
//!
//! ```toml
//! default_days_off = 3
//! backend = "microlp"
//!
//! [scores]
//! unable_score = 0.0
//! high_score = 1.0
//! low_reset_score = 0.3
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;

/// How worker cells left empty are treated during mismatch resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingPolicy {
    /// Unset cells are never reset; they count as `unable_score` afterwards.
    #[default]
    PreserveUnset,
    /// Unset cells become `unable_score` first and may be reset like zeros.
    TreatAsUnable,
}

/// Score domain and cleaning policy for preference sheets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreConfig {
    /// Marks a worker as unable or unavailable. Lower values are raised to it.
    pub unable_score: f64,
    /// Upper bound of the domain. Higher values are lowered to it.
    pub high_score: f64,
    /// Replacement for worker cells marked unable where the manager disagrees.
    pub low_reset_score: f64,
    /// Floor worker scores (discrete preference domains).
    pub floor_worker_scores: bool,
    pub missing_policy: MissingPolicy,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        Self {
            unable_score: 0.0,
            high_score: 1.0,
            low_reset_score: 0.3,
            floor_worker_scores: false,
            missing_policy: MissingPolicy::PreserveUnset,
        }
    }
}

/// Top-level configuration of a roster run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    pub scores: ScoreConfig,
    /// Rest days per horizon for workers without an override.
    pub default_days_off: usize,
    /// Pin `x[w,j,d] = 0` wherever the merged preference is zero.
    pub forbid_incapable: bool,
    /// Name of the solving engine passed to [`crate::lp::create_engine`].
    pub backend: String,
    /// Where the cleaned worker sheets are written for the duration of a run.
    pub cleaned_artifact: Option<PathBuf>,
    /// Where the roster CSV is written after a successful solve.
    pub roster_output: Option<PathBuf>,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            scores: ScoreConfig::default(),
            default_days_off: 3,
            forbid_incapable: false,
            backend: crate::lp::DEFAULT_BACKEND.to_string(),
            cleaned_artifact: None,
            roster_output: None,
        }
    }
}

impl RosterConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml(toml_str: &str) -> Result<Self, ScheduleError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ScheduleError::ConfigParse {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a TOML file.
    pub fn load(path: &Path) -> Result<Self, ScheduleError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ScheduleError::io(path, e))?;
        let config: Self = toml::from_str(&content).map_err(|e| ScheduleError::ConfigParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<(), ScheduleError> {
        let s = &self.scores;
        if !s.unable_score.is_finite() || !s.high_score.is_finite() {
            return Err(config_error("scores", "scores must be finite"));
        }
        if s.unable_score >= s.high_score {
            return Err(config_error(
                "scores.high_score",
                "must be greater than scores.unable_score",
            ));
        }
        if !(s.low_reset_score > s.unable_score && s.low_reset_score <= s.high_score) {
            return Err(config_error(
                "scores.low_reset_score",
                "must lie in (unable_score, high_score]",
            ));
        }
        if self.backend.trim().is_empty() {
            return Err(config_error("backend", "must not be empty"));
        }
        Ok(())
    }
}

fn config_error(field: &str, message: &str) -> ScheduleError {
    ScheduleError::Config {
        field: field.to_string(),
        message: message.to_string(),
    }
}
