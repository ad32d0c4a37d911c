//! Solution decoding.
//!
//! Reads solved variable values back into a day × job [`Roster`]. A value
//! above 0.5 marks an assignment. The capacity and exclusivity rows make
//! a double booking impossible in a correct solve, but the decoder still
//! checks both and reports a violation as an error rather than writing a
//! corrupt roster.

use serde::{Deserialize, Serialize};

use super::{ConstraintCategory, RosterModel};
use crate::error::ScheduleError;
use crate::lp::{SolveStatus, SolvingEngine};
use crate::models::{Assignment, Roster};

/// Threshold above which a boolean variable counts as set.
const ASSIGNED_THRESHOLD: f64 = 0.5;

/// Categories most often responsible for infeasibility, most likely first.
const SUSPECT_RANKING: [ConstraintCategory; 3] = [
    ConstraintCategory::MustConverge,
    ConstraintCategory::MustDiverge,
    ConstraintCategory::WorkloadCeiling,
];

/// Result of decoding a solved model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Outcome {
    Solved(SolvedRoster),
    Unsolved(UnsolvedReport),
}

impl Outcome {
    pub fn roster(&self) -> Option<&Roster> {
        match self {
            Self::Solved(s) => Some(&s.roster),
            Self::Unsolved(_) => None,
        }
    }

    pub fn status(&self) -> SolveStatus {
        match self {
            Self::Solved(s) => s.status,
            Self::Unsolved(u) => u.status,
        }
    }
}

/// A roster decoded from an optimal or feasible solution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolvedRoster {
    pub status: SolveStatus,
    pub roster: Roster,
    /// Every `(w, j, d)` whose variable exceeded the threshold, ordered by
    /// day, then worker.
    pub assignments: Vec<Assignment>,
    /// Workers off duty, per day.
    pub off_duty: Vec<Vec<String>>,
    /// `Σ merged` over `assignments`.
    pub total_happiness: f64,
    /// Objective value reported by the engine.
    pub objective_value: f64,
}

/// Diagnostic produced when no roster exists.
///
/// The ranking is a fixed heuristic, not an infeasibility certificate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnsolvedReport {
    pub status: SolveStatus,
    /// Constraint categories to relax first.
    pub suspects: Vec<ConstraintCategory>,
}

impl UnsolvedReport {
    fn new(status: SolveStatus, forbid_incapable: bool) -> Self {
        let mut suspects = SUSPECT_RANKING.to_vec();
        if forbid_incapable {
            suspects.push(ConstraintCategory::IncapableExclusion);
        }
        Self { status, suspects }
    }

    /// Human-readable relaxation hint.
    pub fn message(&self) -> String {
        let ranked: Vec<String> = self.suspects.iter().map(|c| c.to_string()).collect();
        format!(
            "No roster found ({}). Try relaxing, in order: {}",
            self.status,
            ranked.join(", ")
        )
    }
}

/// Decodes the engine's values for `model` under `status`.
///
/// # Errors
/// [`ScheduleError::InconsistentSolution`] if a worker holds two jobs on
/// one day or a job holds two workers on one day.
pub fn decode<E: SolvingEngine>(
    model: &RosterModel<E>,
    status: SolveStatus,
) -> Result<Outcome, ScheduleError> {
    if !status.has_solution() {
        let forbid_incapable = model
            .constraints_in(ConstraintCategory::IncapableExclusion)
            .next()
            .is_some();
        let report = UnsolvedReport::new(status, forbid_incapable);
        tracing::warn!(%status, "{}", report.message());
        return Ok(Outcome::Unsolved(report));
    }

    let t = model.tensor();
    let engine = model.engine();
    let mut roster = Roster::new(t.day_names.clone(), t.job_names.clone());
    let mut assignments = Vec::new();
    let mut off_duty = Vec::with_capacity(t.num_days());
    let mut total_happiness = 0.0;

    for d in 0..t.num_days() {
        let mut off_today = Vec::new();
        for w in 0..t.num_workers() {
            let held: Vec<usize> = (0..t.num_jobs())
                .filter(|&j| engine.value_of(model.var(w, j, d)) > ASSIGNED_THRESHOLD)
                .collect();

            match held.as_slice() {
                [] => off_today.push(t.worker_names[w].clone()),
                &[j] => {
                    if let Some(previous) = roster.assign(d, j, t.worker_names[w].clone()) {
                        return Err(ScheduleError::InconsistentSolution {
                            day: t.day_names[d].clone(),
                            detail: format!(
                                "job '{}' assigned to both {} and {}",
                                t.job_names[j], previous, t.worker_names[w]
                            ),
                        });
                    }
                    let happiness = t.weight(w, j, d);
                    total_happiness += happiness;
                    assignments.push(Assignment {
                        worker: w,
                        job: j,
                        day: d,
                        happiness,
                    });
                }
                many => {
                    let jobs: Vec<&str> = many.iter().map(|&j| t.job_names[j].as_str()).collect();
                    return Err(ScheduleError::InconsistentSolution {
                        day: t.day_names[d].clone(),
                        detail: format!(
                            "{} holds {} jobs: {}",
                            t.worker_names[w],
                            jobs.len(),
                            jobs.join(", ")
                        ),
                    });
                }
            }
        }
        off_duty.push(off_today);
    }

    tracing::info!(
        %status,
        assignments = assignments.len(),
        unfilled = roster.unfilled_count(),
        total_happiness,
        "roster decoded"
    );

    Ok(Outcome::Solved(SolvedRoster {
        status,
        roster,
        assignments,
        off_duty,
        total_happiness,
        objective_value: engine.objective_value(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lp::{GoodLpEngine, LinearExpr, Relation, Sense, VarHandle};
    use crate::milp::RosterModelBuilder;
    use crate::models::{MergedTensor, PairingKind, PairingRequest};

    /// Engine returning preset values without solving.
    struct FixedEngine {
        count: usize,
        values: Vec<f64>,
        status: SolveStatus,
    }

    impl FixedEngine {
        fn new(values: Vec<f64>, status: SolveStatus) -> Self {
            Self {
                count: 0,
                values,
                status,
            }
        }
    }

    impl SolvingEngine for FixedEngine {
        fn name(&self) -> &str {
            "fixed"
        }

        fn new_bool_var(&mut self) -> VarHandle {
            self.count += 1;
            VarHandle(self.count - 1)
        }

        fn add_constraint(&mut self, _: LinearExpr, _: Relation, _: f64) {}

        fn set_objective(&mut self, _: LinearExpr, _: Sense) {}

        fn solve(&mut self) -> SolveStatus {
            self.status
        }

        fn value_of(&self, var: VarHandle) -> f64 {
            self.values[var.index()]
        }

        fn objective_value(&self) -> f64 {
            -1.0
        }
    }

    fn tensor() -> MergedTensor {
        let mut t =
            MergedTensor::uniform(["Amber", "Nearn", "Rob"], ["KL", "Field"], ["Mon", "Tue"], 0.5);
        t.set_weight(2, 1, 1, 0.9);
        t
    }

    /// Values for a 3×2×2 arena from `(w, j, d)` triples set to `v`.
    fn values(set: &[(usize, usize, usize)], v: f64) -> Vec<f64> {
        let mut out = vec![0.0; 12];
        for &(w, j, d) in set {
            out[(w * 2 + j) * 2 + d] = v;
        }
        out
    }

    #[test]
    fn test_round_trip_assignments() {
        let set = [(0, 0, 0), (1, 1, 0), (2, 1, 1)];
        let t = tensor();
        let engine = FixedEngine::new(values(&set, 0.98), SolveStatus::Feasible);
        let mut model = RosterModelBuilder::new(&t).build(engine);
        let status = model.solve();
        let outcome = decode(&model, status).unwrap();
        let Outcome::Solved(solved) = outcome else {
            panic!("expected a roster");
        };

        let mut decoded: Vec<(usize, usize, usize)> =
            solved.assignments.iter().map(|a| (a.worker, a.job, a.day)).collect();
        decoded.sort_unstable();
        assert_eq!(decoded, set.to_vec());
        assert!((solved.total_happiness - (0.5 + 0.5 + 0.9)).abs() < 1e-12);
        assert_eq!(solved.status, SolveStatus::Feasible);
        assert_eq!(solved.objective_value, -1.0);

        assert_eq!(solved.roster.worker_at(0, 0), Some("Amber"));
        assert_eq!(solved.roster.worker_at(0, 1), Some("Nearn"));
        assert_eq!(solved.roster.worker_at(1, 0), None);
        assert_eq!(solved.roster.worker_at(1, 1), Some("Rob"));
        assert_eq!(solved.off_duty[0], vec!["Rob".to_string()]);
        assert_eq!(solved.off_duty[1], vec!["Amber".to_string(), "Nearn".to_string()]);
    }

    #[test]
    fn test_threshold_is_strict() {
        let t = tensor();
        let engine = FixedEngine::new(values(&[(0, 0, 0)], 0.5), SolveStatus::Optimal);
        let model = RosterModelBuilder::new(&t).build(engine);
        let outcome = decode(&model, SolveStatus::Optimal).unwrap();
        let Outcome::Solved(solved) = outcome else {
            panic!("expected a roster");
        };
        assert!(solved.assignments.is_empty());
        assert_eq!(solved.roster.filled_count(), 0);
    }

    #[test]
    fn test_worker_double_booked() {
        let t = tensor();
        let model = RosterModelBuilder::new(&t)
            .build(FixedEngine::new(values(&[(1, 0, 1), (1, 1, 1)], 1.0), SolveStatus::Optimal));
        let err = decode(&model, SolveStatus::Optimal).unwrap_err();
        match err {
            ScheduleError::InconsistentSolution { day, detail } => {
                assert_eq!(day, "Tue");
                assert!(detail.contains("Nearn"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_job_double_booked() {
        let t = tensor();
        let model = RosterModelBuilder::new(&t)
            .build(FixedEngine::new(values(&[(0, 1, 0), (2, 1, 0)], 1.0), SolveStatus::Optimal));
        let err = decode(&model, SolveStatus::Optimal).unwrap_err();
        assert!(matches!(
            err,
            ScheduleError::InconsistentSolution { ref detail, .. } if detail.contains("Field")
        ));
    }

    #[test]
    fn test_unsolved_report_ranking() {
        let t = tensor();
        let engine = FixedEngine::new(vec![0.0; 12], SolveStatus::Infeasible);
        let model = RosterModelBuilder::new(&t).build(engine);
        let outcome = decode(&model, SolveStatus::Infeasible).unwrap();
        assert!(outcome.roster().is_none());
        assert_eq!(outcome.status(), SolveStatus::Infeasible);
        let Outcome::Unsolved(report) = outcome else {
            panic!("expected no roster");
        };
        assert!(report.suspects[0].is_pairing());
        assert!(report.suspects[1].is_pairing());
        assert_eq!(report.suspects[2], ConstraintCategory::WorkloadCeiling);
        assert!(report.message().starts_with("No roster found (INFEASIBLE)"));
    }

    #[test]
    fn test_error_status_lists_incapable_exclusion() {
        let mut t = tensor();
        t.set_weight(0, 0, 0, 0.0);
        let model = RosterModelBuilder::new(&t)
            .with_forbid_incapable(true)
            .build(FixedEngine::new(vec![0.0; 12], SolveStatus::Error));
        let Outcome::Unsolved(report) = decode(&model, SolveStatus::Error).unwrap() else {
            panic!("expected no roster");
        };
        assert_eq!(report.suspects.last(), Some(&ConstraintCategory::IncapableExclusion));
    }

    #[test]
    fn test_contradictory_pairing_is_infeasible() {
        // One job: Amber and Rob can never work the same day, so converge
        // plus diverge has no solution.
        let t = MergedTensor::uniform(["Amber", "Rob"], ["KL"], ["Mon"], 0.5);
        let pair = |kind| PairingRequest {
            worker_a: 0,
            worker_b: 1,
            kind,
        };
        let mut model = RosterModelBuilder::new(&t)
            .with_pairings(vec![pair(PairingKind::MustConverge), pair(PairingKind::MustDiverge)])
            .build(GoodLpEngine::new());
        let status = model.solve();
        assert_eq!(status, SolveStatus::Infeasible);
        assert!(decode(&model, status).unwrap().roster().is_none());
    }
}
