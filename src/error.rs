//! Error types for roster construction.
//!
//! Only conditions that abort a run are errors. Dropped pairing rows,
//! unknown days-off names and non-numeric overrides are logged and
//! skipped; an infeasible model is reported through
//! [`Outcome::Unsolved`](crate::milp::Outcome), not through this type.

use std::path::PathBuf;

/// Errors raised while ingesting, building, or decoding a roster.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    /// Worker and manager sheets disagree in shape or identifiers.
    #[error("schema mismatch in {worker}'s sheet: {reason}")]
    SchemaMismatch { worker: String, reason: String },

    /// The requested solving engine could not be constructed.
    #[error("solving engine '{backend}' is unavailable")]
    EngineUnavailable { backend: String },

    /// The solved values violate an invariant the model guarantees.
    #[error("inconsistent solution on day '{day}': {detail}")]
    InconsistentSolution { day: String, detail: String },

    /// A configuration value is out of range.
    #[error("invalid config field {field}: {message}")]
    Config { field: String, message: String },

    /// A configuration file could not be parsed.
    #[error("failed to parse config {path}: {message}")]
    ConfigParse { path: String, message: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ScheduleError {
    pub(crate) fn schema(worker: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            worker: worker.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_mismatch_names_worker() {
        let err = ScheduleError::schema("Rob", "day columns differ");
        assert_eq!(
            err.to_string(),
            "schema mismatch in Rob's sheet: day columns differ"
        );
    }

    #[test]
    fn test_engine_unavailable_message() {
        let err = ScheduleError::EngineUnavailable {
            backend: "scip".into(),
        };
        assert!(err.to_string().contains("'scip'"));
    }
}
