//! Roster quality metrics (KPIs).
//!
//! Computes coverage and fairness indicators from a solved roster.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Fill Rate | Filled slots / (jobs × days) |
//! | Unfilled Slots | Slots left without a worker |
//! | Total Happiness | Σ merged weight over assignments |
//! | Avg Happiness | Total happiness / assignments |
//! | Min Worker Happiness | Lowest per-worker happiness sum |
//! | Days Worked | Assignments per worker |

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::milp::SolvedRoster;

/// Roster performance indicators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterKpi {
    /// Fraction of job-day slots filled (0.0..=1.0).
    pub fill_rate: f64,
    pub unfilled_slots: usize,
    pub total_happiness: f64,
    /// Mean merged weight per assignment; 0 when nobody is assigned.
    pub avg_happiness: f64,
    /// Lowest happiness sum across workers; 0 for an empty roster.
    pub min_worker_happiness: f64,
    pub days_worked_by_worker: HashMap<String, usize>,
    pub happiness_by_worker: HashMap<String, f64>,
}

impl RosterKpi {
    /// Computes KPIs from a solved roster.
    ///
    /// # Arguments
    /// * `solved` - The decoded roster.
    /// * `worker_names` - Every rostered worker, including those never assigned.
    pub fn calculate(solved: &SolvedRoster, worker_names: &[String]) -> Self {
        let mut days_worked: HashMap<String, usize> =
            worker_names.iter().map(|n| (n.clone(), 0)).collect();
        let mut happiness: HashMap<String, f64> =
            worker_names.iter().map(|n| (n.clone(), 0.0)).collect();

        for a in &solved.assignments {
            let Some(name) = worker_names.get(a.worker) else {
                continue;
            };
            *days_worked.entry(name.clone()).or_insert(0) += 1;
            *happiness.entry(name.clone()).or_insert(0.0) += a.happiness;
        }

        let roster = &solved.roster;
        let slots = roster.filled_count() + roster.unfilled_count();
        let fill_rate = if slots == 0 {
            1.0
        } else {
            roster.filled_count() as f64 / slots as f64
        };

        let avg_happiness = if solved.assignments.is_empty() {
            0.0
        } else {
            solved.total_happiness / solved.assignments.len() as f64
        };

        let min_worker_happiness = happiness
            .values()
            .copied()
            .fold(None, |min: Option<f64>, h| Some(min.map_or(h, |m| m.min(h))))
            .unwrap_or(0.0);

        Self {
            fill_rate,
            unfilled_slots: roster.unfilled_count(),
            total_happiness: solved.total_happiness,
            avg_happiness,
            min_worker_happiness,
            days_worked_by_worker: days_worked,
            happiness_by_worker: happiness,
        }
    }

    /// Whether the roster meets the given quality thresholds.
    pub fn meets_thresholds(&self, min_fill_rate: f64, min_avg_happiness: f64) -> bool {
        self.fill_rate >= min_fill_rate && self.avg_happiness >= min_avg_happiness
    }
}
