//! Input bundle for one roster run.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{PairingRow, WorkerSheet};
use crate::error::ScheduleError;

/// A days-off override cell as it appears in the override table.
///
/// Cells are kept untyped so that a stray entry (text, a blank cell read
/// as `null`, a boolean) can be reported and skipped instead of failing
/// deserialization of the whole bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OverrideValue {
    Integer(i64),
    Float(f64),
    Text(String),
    /// Any other JSON value.
    Other(serde_json::Value),
}

impl From<i64> for OverrideValue {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<&str> for OverrideValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

/// Everything a roster run reads: both sets of preference sheets,
/// pairing rows and days-off overrides.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterInput {
    /// Worker-submitted sheets; their order fixes the worker index.
    pub worker_sheets: Vec<WorkerSheet>,
    /// Manager-submitted sheets, matched to workers by name.
    pub manager_sheets: Vec<WorkerSheet>,
    pub pairings: Vec<PairingRow>,
    pub days_off: BTreeMap<String, OverrideValue>,
}

impl RosterInput {
    pub fn new(worker_sheets: Vec<WorkerSheet>, manager_sheets: Vec<WorkerSheet>) -> Self {
        Self {
            worker_sheets,
            manager_sheets,
            ..Self::default()
        }
    }

    /// Adds pairing rows.
    pub fn with_pairings(mut self, pairings: Vec<PairingRow>) -> Self {
        self.pairings = pairings;
        self
    }

    /// Adds a days-off override.
    pub fn with_days_off(
        mut self,
        worker: impl Into<String>,
        value: impl Into<OverrideValue>,
    ) -> Self {
        self.days_off.insert(worker.into(), value.into());
        self
    }

    /// Parses a JSON bundle.
    pub fn from_json(json: &str) -> Result<Self, ScheduleError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a JSON bundle from disk.
    pub fn from_json_file(path: &Path) -> Result<Self, ScheduleError> {
        let content = std::fs::read_to_string(path).map_err(|e| ScheduleError::io(path, e))?;
        Self::from_json(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PairingKind;

    #[test]
    fn test_override_value_untagged() {
        let values: BTreeMap<String, OverrideValue> =
            serde_json::from_str(r#"{"a": 2, "b": 2.5, "c": "two"}"#).unwrap();
        assert_eq!(values["a"], OverrideValue::Integer(2));
        assert_eq!(values["b"], OverrideValue::Float(2.5));
        assert_eq!(values["c"], OverrideValue::Text("two".into()));
    }

    #[test]
    fn test_blank_and_boolean_overrides_deserialize() {
        let input =
            RosterInput::from_json(r#"{"days_off": {"Amber": null, "Rob": true}}"#).unwrap();
        assert_eq!(input.days_off["Amber"], OverrideValue::Other(serde_json::Value::Null));
        assert_eq!(input.days_off["Rob"], OverrideValue::Other(serde_json::Value::Bool(true)));
    }

    #[test]
    fn test_bundle_from_json() {
        let input = RosterInput::from_json(
            r#"{
                "worker_sheets": [
                    {"worker": "Amber", "table": {
                        "job_names": ["KL"], "day_names": ["Mon", "Tue"],
                        "cells": [[0.6, null]]
                    }}
                ],
                "pairings": [{"worker_a": "Amber", "worker_b": "Rob", "kind": "must_converge"}],
                "days_off": {"Amber": 1}
            }"#,
        )
        .unwrap();
        assert_eq!(input.worker_sheets.len(), 1);
        assert_eq!(input.worker_sheets[0].table.get(0, 0), Some(0.6));
        assert_eq!(input.worker_sheets[0].table.get(0, 1), None);
        assert!(input.manager_sheets.is_empty());
        assert_eq!(input.pairings[0].kind, PairingKind::MustConverge);
        assert_eq!(input.days_off["Amber"], OverrideValue::Integer(1));
    }

    #[test]
    fn test_bundle_rejects_malformed_json() {
        assert!(matches!(
            RosterInput::from_json("{\"worker_sheets\": 3}"),
            Err(ScheduleError::Json(_))
        ));
    }

    #[test]
    fn test_builder() {
        let input = RosterInput::default()
            .with_days_off("Rob", 2)
            .with_days_off("Elinor", "lots");
        assert_eq!(input.days_off.len(), 2);
        assert_eq!(input.days_off["Elinor"], OverrideValue::Text("lots".into()));
    }
}
