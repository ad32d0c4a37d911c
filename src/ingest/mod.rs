//! Preference ingestion.
//!
//! Turns the raw worker and manager sheets into a single merged
//! preference tensor:
//!
//! 1. Validate sheet structure ([`crate::validation`]); any problem aborts.
//! 2. Clamp each side into `[unable_score, high_score]`.
//! 3. Optionally floor worker scores (discrete preference domains).
//! 4. Reset worker cells marked unable where the manager records a
//!    capability to `low_reset_score`.
//! 5. Multiply: `merged = worker * manager`.
//!
//! Missing manager cells always count as `unable_score`. Missing worker
//! cells follow [`MissingPolicy`].

mod artifact;

pub use artifact::ScopedArtifact;

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::config::{MissingPolicy, ScoreConfig};
use crate::error::ScheduleError;
use crate::models::{Grid3, MergedTensor, PreferenceTable, WorkerSheet};
use crate::validation::validate_sheets;

/// Result of a successful ingestion.
#[derive(Debug, Clone)]
pub struct Ingestion {
    /// Merged preference weights indexed `(worker, job, day)`.
    pub tensor: MergedTensor,
    /// Cleaned worker-side sheets, in worker order.
    pub cleaned: Vec<WorkerSheet>,
    /// Every worker-side cell the cleaning changed.
    pub corrections: Vec<Correction>,
}

/// How a worker cell was changed during cleaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectionKind {
    /// Below `unable_score`; raised to it.
    RaisedToUnable,
    /// Above `high_score`; lowered to it.
    LoweredToHigh,
    /// Fractional score floored.
    Floored,
    /// Marked unable although the manager records a capability.
    CapabilityReset,
}

/// A single worker-side cell adjustment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correction {
    pub worker: String,
    pub job: String,
    pub day: String,
    pub kind: CorrectionKind,
    /// Value before this adjustment (`None` = unset).
    pub before: Option<f64>,
    pub after: f64,
}

/// Validates, cleans and merges preference sheets.
#[derive(Debug, Clone, Default)]
pub struct PreferenceIngestor {
    scores: ScoreConfig,
}

impl PreferenceIngestor {
    pub fn new(scores: ScoreConfig) -> Self {
        Self { scores }
    }

    pub fn scores(&self) -> &ScoreConfig {
        &self.scores
    }

    /// Ingests one worker sheet set and its manager counterpart.
    ///
    /// # Errors
    /// [`ScheduleError::SchemaMismatch`] naming the first malformed worker.
    /// No tensor is produced in that case.
    pub fn ingest(
        &self,
        worker_sheets: &[WorkerSheet],
        manager_sheets: &[WorkerSheet],
    ) -> Result<Ingestion, ScheduleError> {
        if let Err(errors) = validate_sheets(worker_sheets, manager_sheets) {
            for e in &errors {
                tracing::error!(worker = %e.worker, kind = ?e.kind, "{}", e.message);
            }
            let first = &errors[0];
            return Err(ScheduleError::schema(&first.worker, &first.message));
        }

        let known: HashSet<&str> = worker_sheets.iter().map(|s| s.worker.as_str()).collect();
        for extra in manager_sheets.iter().filter(|s| !known.contains(s.worker.as_str())) {
            tracing::warn!(
                worker = %extra.worker,
                "manager sheet has no matching worker sheet; ignored"
            );
        }
        let managers: HashMap<&str, &PreferenceTable> = manager_sheets
            .iter()
            .map(|s| (s.worker.as_str(), &s.table))
            .collect();

        let worker_names: Vec<String> = worker_sheets.iter().map(|s| s.worker.clone()).collect();
        let (job_names, day_names) = worker_sheets
            .first()
            .map(|s| (s.table.job_names.clone(), s.table.day_names.clone()))
            .unwrap_or_default();

        let mut weights = Grid3::filled(worker_names.len(), job_names.len(), day_names.len(), 0.0);
        let mut cleaned = Vec::with_capacity(worker_sheets.len());
        let mut corrections = Vec::new();

        for (w, sheet) in worker_sheets.iter().enumerate() {
            // Validation guarantees the manager sheet exists.
            let manager = managers[sheet.worker.as_str()];
            let before = corrections.len();
            let table =
                self.clean_sheet(sheet, manager, &mut corrections, |j, d, merged| {
                    weights[(w, j, d)] = merged;
                });
            let resets = corrections[before..]
                .iter()
                .filter(|c| c.kind == CorrectionKind::CapabilityReset)
                .count();
            if resets > 0 {
                tracing::warn!(
                    worker = %sheet.worker,
                    cells = resets,
                    reset_to = self.scores.low_reset_score,
                    "worker marked trained jobs as unable; scores reset"
                );
            }
            cleaned.push(WorkerSheet::new(sheet.worker.clone(), table));
        }

        tracing::debug!(
            workers = worker_names.len(),
            jobs = job_names.len(),
            days = day_names.len(),
            corrections = corrections.len(),
            "preferences merged"
        );

        Ok(Ingestion {
            tensor: MergedTensor::new(worker_names, job_names, day_names, weights),
            cleaned,
            corrections,
        })
    }

    /// Cleans one worker sheet, reporting each merged weight through `emit`.
    fn clean_sheet(
        &self,
        sheet: &WorkerSheet,
        manager: &PreferenceTable,
        corrections: &mut Vec<Correction>,
        mut emit: impl FnMut(usize, usize, f64),
    ) -> PreferenceTable {
        let s = &self.scores;
        let table = &sheet.table;
        let mut out = PreferenceTable::new(table.job_names.clone(), table.day_names.clone());

        for j in 0..table.job_names.len() {
            for d in 0..table.day_names.len() {
                let mut record = |kind, before: Option<f64>, after: f64| {
                    corrections.push(Correction {
                        worker: sheet.worker.clone(),
                        job: table.job_names[j].clone(),
                        day: table.day_names[d].clone(),
                        kind,
                        before,
                        after,
                    });
                };

                let manager_score = self.clamp(manager.get(j, d).filter(|v| !v.is_nan()));
                let raw = table.get(j, d).filter(|v| !v.is_nan());

                let (mut score, resettable) = match raw {
                    None => (s.unable_score, s.missing_policy == MissingPolicy::TreatAsUnable),
                    Some(v) => {
                        let mut score = v;
                        if score < s.unable_score {
                            score = s.unable_score;
                            record(CorrectionKind::RaisedToUnable, Some(v), score);
                        } else if score > s.high_score {
                            score = s.high_score;
                            record(CorrectionKind::LoweredToHigh, Some(v), score);
                        }
                        if s.floor_worker_scores && score.fract() != 0.0 {
                            let floored = score.floor().max(s.unable_score);
                            record(CorrectionKind::Floored, Some(score), floored);
                            score = floored;
                        }
                        (score, true)
                    }
                };

                if resettable && score == s.unable_score && manager_score != s.unable_score {
                    let before = raw.map(|_| score);
                    record(CorrectionKind::CapabilityReset, before, s.low_reset_score);
                    score = s.low_reset_score;
                }

                let keep_unset = raw.is_none() && !resettable;
                out.set(j, d, (!keep_unset).then_some(score));
                emit(j, d, score * manager_score);
            }
        }
        out
    }

    /// Clamps a side's score into the domain; missing becomes `unable_score`.
    fn clamp(&self, value: Option<f64>) -> f64 {
        value
            .unwrap_or(self.scores.unable_score)
            .clamp(self.scores.unable_score, self.scores.high_score)
    }
}
