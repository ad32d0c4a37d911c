//! MILP roster formulation.
//!
//! Builds a mixed-integer model from the merged preference tensor,
//! days-off quotas and pairing requests, solves it through any
//! [`SolvingEngine`], and decodes the result into a [`Roster`].
//!
//! # Formulation
//!
//! One boolean `x[w,j,d]` per worker × job × day, stored in a dense
//! [`VarArena`]. With `on(w,d) = Σ_j x[w,j,d]`:
//!
//! | Category | Constraint |
//! |----------|------------|
//! | `DailyCapacity` | `on(w,d) <= 1` |
//! | `JobExclusivity` | `Σ_w x[w,j,d] <= 1` |
//! | `WorkloadCeiling` | `Σ_d on(w,d) <= days - days_off[w]` |
//! | `MustDiverge` | `on(a,d) + on(b,d) >= 1` |
//! | `MustConverge` | `on(a,d) - on(b,d) >= 0` and `on(b,d) - on(a,d) >= 0` |
//! | `IncapableExclusion` | `x[w,j,d] <= 0` where `merged == 0` (opt-in) |
//!
//! Objective: maximize `Σ merged[w][j][d] · x[w,j,d]`.
//!
//! A zero merged weight is only an objective coefficient unless
//! `IncapableExclusion` is enabled; the engine may still place a worker on
//! such a cell when the other constraints require it.
//!
//! [`Roster`]: crate::models::Roster

mod decode;

pub use decode::{decode, Outcome, SolvedRoster, UnsolvedReport};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ScheduleError;
use crate::lp::{create_engine, LinearExpr, Relation, Sense, SolveStatus, SolvingEngine, VarHandle};
use crate::models::{Grid3, MergedTensor, PairingKind, PairingRequest};

/// Dense `(worker, job, day)` → variable arena.
pub type VarArena = Grid3<VarHandle>;

/// Constraint family a model row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConstraintCategory {
    DailyCapacity,
    JobExclusivity,
    WorkloadCeiling,
    MustDiverge,
    MustConverge,
    IncapableExclusion,
}

impl ConstraintCategory {
    /// Whether the row comes from a pairing request.
    pub fn is_pairing(self) -> bool {
        matches!(self, Self::MustDiverge | Self::MustConverge)
    }
}

impl fmt::Display for ConstraintCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::DailyCapacity => "daily capacity",
            Self::JobExclusivity => "job exclusivity",
            Self::WorkloadCeiling => "workload ceiling",
            Self::MustDiverge => "must-diverge pairing",
            Self::MustConverge => "must-converge pairing",
            Self::IncapableExclusion => "incapable exclusion",
        })
    }
}

/// A constraint as emitted to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintRecord {
    pub category: ConstraintCategory,
    pub expr: LinearExpr,
    pub relation: Relation,
    pub bound: f64,
}

impl ConstraintRecord {
    /// Whether the record holds for the given variable values.
    pub fn is_satisfied(&self, value_of: impl Fn(VarHandle) -> f64, tolerance: f64) -> bool {
        self.relation
            .holds(self.expr.eval(value_of), self.bound, tolerance)
    }
}

/// Builds a roster model from scheduling inputs.
///
/// # Example
/// ```
/// use u_roster::lp::GoodLpEngine;
/// use u_roster::milp::RosterModelBuilder;
/// use u_roster::models::MergedTensor;
///
/// let tensor = MergedTensor::uniform(["Amber", "Rob"], ["Field"], ["Mon", "Tue"], 0.5);
/// let model = RosterModelBuilder::new(&tensor)
///     .with_days_off(vec![1, 0])
///     .build(GoodLpEngine::new());
/// assert_eq!(model.variable_count(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct RosterModelBuilder<'a> {
    tensor: &'a MergedTensor,
    days_off: Vec<usize>,
    pairings: Vec<PairingRequest>,
    forbid_incapable: bool,
}

impl<'a> RosterModelBuilder<'a> {
    /// Creates a builder with no rest days and no pairings.
    pub fn new(tensor: &'a MergedTensor) -> Self {
        Self {
            tensor,
            days_off: vec![0; tensor.num_workers()],
            pairings: Vec::new(),
            forbid_incapable: false,
        }
    }

    /// Sets the per-worker days-off quotas (indexed like the tensor's workers).
    pub fn with_days_off(mut self, days_off: Vec<usize>) -> Self {
        self.days_off = days_off;
        self
    }

    /// Sets resolved pairing requests.
    pub fn with_pairings(mut self, pairings: Vec<PairingRequest>) -> Self {
        self.pairings = pairings;
        self
    }

    /// Pins `x[w,j,d] = 0` wherever the merged weight is zero.
    pub fn with_forbid_incapable(mut self, forbid: bool) -> Self {
        self.forbid_incapable = forbid;
        self
    }

    /// Builds the model on the named backend.
    ///
    /// # Errors
    /// [`ScheduleError::EngineUnavailable`] if the backend cannot be
    /// constructed; no variable is created in that case.
    pub fn build_with_backend(
        &self,
        backend: &str,
    ) -> Result<RosterModel<Box<dyn SolvingEngine>>, ScheduleError> {
        let engine = create_engine(backend)?;
        Ok(self.build(engine))
    }

    /// Builds the model on `engine`.
    pub fn build<E: SolvingEngine>(&self, mut engine: E) -> RosterModel<E> {
        let t = self.tensor;
        let (workers, jobs, days) = (t.num_workers(), t.num_jobs(), t.num_days());

        let vars = Grid3::from_fn(workers, jobs, days, |_, _, _| engine.new_bool_var());
        let mut model = RosterModel {
            engine,
            vars,
            tensor: t.clone(),
            days_off: (0..workers)
                .map(|w| self.days_off.get(w).copied().unwrap_or(0).min(days))
                .collect(),
            constraints: Vec::new(),
            objective: LinearExpr::new(),
            status: None,
        };

        // 1. At most one job per worker per day
        for w in 0..workers {
            for d in 0..days {
                let expr = model.on_duty(w, d);
                model.emit(ConstraintCategory::DailyCapacity, expr, Relation::LessEq, 1.0);
            }
        }

        // 2. At most one worker per job per day
        for j in 0..jobs {
            for d in 0..days {
                let expr = LinearExpr::sum((0..workers).map(|w| model.vars[(w, j, d)]));
                model.emit(ConstraintCategory::JobExclusivity, expr, Relation::LessEq, 1.0);
            }
        }

        // 3. Workload ceiling
        for w in 0..workers {
            let expr = LinearExpr::sum(
                (0..jobs).flat_map(|j| (0..days).map(move |d| (j, d)))
                    .map(|(j, d)| model.vars[(w, j, d)]),
            );
            let ceiling = (days - model.days_off[w]) as f64;
            model.emit(ConstraintCategory::WorkloadCeiling, expr, Relation::LessEq, ceiling);
        }

        // 4-5. Pairings
        for pair in &self.pairings {
            if pair.worker_a >= workers || pair.worker_b >= workers {
                tracing::warn!(?pair, workers, "pairing index outside roster; skipped");
                continue;
            }
            for d in 0..days {
                let a = model.on_duty(pair.worker_a, d);
                let b = model.on_duty(pair.worker_b, d);
                match pair.kind {
                    PairingKind::MustDiverge => {
                        let mut expr = a;
                        expr.extend_scaled(&b, 1.0);
                        model.emit(ConstraintCategory::MustDiverge, expr, Relation::GreaterEq, 1.0);
                    }
                    PairingKind::MustConverge => {
                        let mut forward = a.clone();
                        forward.extend_scaled(&b, -1.0);
                        let mut backward = b;
                        backward.extend_scaled(&a, -1.0);
                        for expr in [forward, backward] {
                            model.emit(
                                ConstraintCategory::MustConverge,
                                expr,
                                Relation::GreaterEq,
                                0.0,
                            );
                        }
                    }
                }
            }
        }

        // 6. Optional hard exclusion of zero-weight cells
        if self.forbid_incapable {
            let zero_cells: Vec<VarHandle> = t
                .weights()
                .iter()
                .filter(|(_, &weight)| weight == 0.0)
                .map(|((w, j, d), _)| model.vars[(w, j, d)])
                .collect();
            for var in zero_cells {
                model.emit(
                    ConstraintCategory::IncapableExclusion,
                    LinearExpr::sum([var]),
                    Relation::LessEq,
                    0.0,
                );
            }
        }

        // Objective: total merged preference
        let mut objective = LinearExpr::new();
        for ((w, j, d), &weight) in t.weights().iter() {
            if weight != 0.0 {
                objective.add_term(model.vars[(w, j, d)], weight);
            }
        }
        model.engine.set_objective(objective.clone(), Sense::Maximize);
        model.objective = objective;

        tracing::debug!(
            engine = model.engine.name(),
            variables = model.vars.len(),
            constraints = model.constraints.len(),
            pairings = self.pairings.len(),
            "roster model built"
        );
        model
    }
}

/// A built roster model bound to its engine.
///
/// Owns its variables, constraints and a copy of the tensor it was built
/// from; nothing is shared across models.
pub struct RosterModel<E: SolvingEngine> {
    engine: E,
    vars: VarArena,
    tensor: MergedTensor,
    days_off: Vec<usize>,
    constraints: Vec<ConstraintRecord>,
    objective: LinearExpr,
    status: Option<SolveStatus>,
}

impl<E: SolvingEngine> RosterModel<E> {
    fn emit(
        &mut self,
        category: ConstraintCategory,
        expr: LinearExpr,
        relation: Relation,
        bound: f64,
    ) {
        self.engine.add_constraint(expr.clone(), relation, bound);
        self.constraints.push(ConstraintRecord {
            category,
            expr,
            relation,
            bound,
        });
    }

    /// `Σ_j x[w,j,d]`.
    pub fn on_duty(&self, w: usize, d: usize) -> LinearExpr {
        LinearExpr::sum((0..self.tensor.num_jobs()).map(|j| self.vars[(w, j, d)]))
    }

    /// Runs the engine. Blocks until it reports a terminal status.
    pub fn solve(&mut self) -> SolveStatus {
        tracing::info!(
            engine = self.engine.name(),
            variables = self.vars.len(),
            constraints = self.constraints.len(),
            "solving roster model"
        );
        let status = self.engine.solve();
        match status {
            SolveStatus::Optimal | SolveStatus::Feasible => tracing::info!(
                %status,
                objective = self.engine.objective_value(),
                "roster solved"
            ),
            SolveStatus::Infeasible | SolveStatus::Error => {
                tracing::warn!(%status, "no roster found")
            }
        }
        self.status = Some(status);
        status
    }

    /// Status of the last solve, if any.
    pub fn status(&self) -> Option<SolveStatus> {
        self.status
    }

    /// Variable for `(w, j, d)`.
    pub fn var(&self, w: usize, j: usize, d: usize) -> VarHandle {
        self.vars[(w, j, d)]
    }

    pub fn vars(&self) -> &VarArena {
        &self.vars
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn tensor(&self) -> &MergedTensor {
        &self.tensor
    }

    /// Effective days-off quota per worker (clamped to the horizon).
    pub fn days_off(&self) -> &[usize] {
        &self.days_off
    }

    pub fn objective(&self) -> &LinearExpr {
        &self.objective
    }

    pub fn variable_count(&self) -> usize {
        self.vars.len()
    }

    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    pub fn constraints(&self) -> &[ConstraintRecord] {
        &self.constraints
    }

    /// Constraints of one category, in emission order.
    pub fn constraints_in(
        &self,
        category: ConstraintCategory,
    ) -> impl Iterator<Item = &ConstraintRecord> {
        self.constraints.iter().filter(move |c| c.category == category)
    }

    /// Constraints the engine's current values violate.
    pub fn violated_constraints(&self, tolerance: f64) -> Vec<&ConstraintRecord> {
        self.constraints
            .iter()
            .filter(|c| !c.is_satisfied(|v| self.engine.value_of(v), tolerance))
            .collect()
    }
}

impl<E: SolvingEngine> fmt::Debug for RosterModel<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RosterModel")
            .field("engine", &self.engine.name())
            .field("variables", &self.vars.len())
            .field("constraints", &self.constraints.len())
            .field("status", &self.status)
            .finish()
    }
}
