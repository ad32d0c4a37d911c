//! Solving-engine abstraction.
//!
//! The roster model is expressed against [`SolvingEngine`], a minimal
//! mixed-integer linear interface: boolean variables, linear constraints,
//! a linear objective and a blocking `solve`. Any MILP backend satisfying
//! it can be substituted without touching model construction.
//!
//! The bundled backend ([`GoodLpEngine`]) runs the pure-Rust `microlp`
//! solver through `good_lp`.

mod microlp;

pub use microlp::GoodLpEngine;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ScheduleError;

/// Backend used when none is configured.
pub const DEFAULT_BACKEND: &str = "microlp";

/// Opaque handle to an engine variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VarHandle(pub(crate) usize);

impl VarHandle {
    /// Position of the variable in creation order.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// A linear expression `Σ coef·var + constant`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinearExpr {
    pub terms: Vec<(VarHandle, f64)>,
    pub constant: f64,
}

impl LinearExpr {
    pub fn new() -> Self {
        Self::default()
    }

    /// `Σ 1·var` over `vars`.
    pub fn sum(vars: impl IntoIterator<Item = VarHandle>) -> Self {
        Self {
            terms: vars.into_iter().map(|v| (v, 1.0)).collect(),
            constant: 0.0,
        }
    }

    /// Adds `coef·var`.
    pub fn add_term(&mut self, var: VarHandle, coef: f64) -> &mut Self {
        self.terms.push((var, coef));
        self
    }

    /// Builder form of [`Self::add_term`].
    pub fn with_term(mut self, var: VarHandle, coef: f64) -> Self {
        self.terms.push((var, coef));
        self
    }

    /// Appends every term of `other` scaled by `factor`.
    pub fn extend_scaled(&mut self, other: &LinearExpr, factor: f64) -> &mut Self {
        self.terms
            .extend(other.terms.iter().map(|&(v, c)| (v, c * factor)));
        self.constant += other.constant * factor;
        self
    }

    /// Evaluates the expression with the given variable values.
    pub fn eval(&self, value_of: impl Fn(VarHandle) -> f64) -> f64 {
        self.terms
            .iter()
            .map(|&(v, c)| c * value_of(v))
            .sum::<f64>()
            + self.constant
    }
}

/// Relation between an expression and its bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Relation {
    LessEq,
    GreaterEq,
    Equal,
}

impl Relation {
    /// Whether `lhs (relation) rhs` holds within `tolerance`.
    pub fn holds(self, lhs: f64, rhs: f64, tolerance: f64) -> bool {
        match self {
            Self::LessEq => lhs <= rhs + tolerance,
            Self::GreaterEq => lhs >= rhs - tolerance,
            Self::Equal => (lhs - rhs).abs() <= tolerance,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::LessEq => "<=",
            Self::GreaterEq => ">=",
            Self::Equal => "==",
        })
    }
}

/// Optimization direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sense {
    Maximize,
    Minimize,
}

/// Terminal status reported by an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveStatus {
    /// Proven optimal.
    Optimal,
    /// Feasible but not proven optimal (e.g. stopped early).
    Feasible,
    Infeasible,
    /// The engine failed (unbounded, numerical trouble, internal error).
    Error,
}

impl SolveStatus {
    /// Whether variable values are available.
    pub fn has_solution(self) -> bool {
        matches!(self, Self::Optimal | Self::Feasible)
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Optimal => "OPTIMAL",
            Self::Feasible => "FEASIBLE",
            Self::Infeasible => "INFEASIBLE",
            Self::Error => "ERROR",
        })
    }
}

/// A mixed-integer linear solving engine.
///
/// Values are only meaningful after [`solve`](Self::solve) returned a
/// status for which [`SolveStatus::has_solution`] holds.
pub trait SolvingEngine {
    /// Backend name, for logging.
    fn name(&self) -> &str;

    /// Creates a variable restricted to `{0, 1}`.
    fn new_bool_var(&mut self) -> VarHandle;

    /// Adds `expr (relation) bound`.
    fn add_constraint(&mut self, expr: LinearExpr, relation: Relation, bound: f64);

    /// Replaces the objective.
    fn set_objective(&mut self, expr: LinearExpr, sense: Sense);

    /// Solves the model. Blocks until a terminal status is reached.
    fn solve(&mut self) -> SolveStatus;

    /// Value of a variable in the last solution.
    fn value_of(&self, var: VarHandle) -> f64;

    /// Objective value of the last solution.
    fn objective_value(&self) -> f64;
}

impl<E: SolvingEngine + ?Sized> SolvingEngine for Box<E> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn new_bool_var(&mut self) -> VarHandle {
        (**self).new_bool_var()
    }

    fn add_constraint(&mut self, expr: LinearExpr, relation: Relation, bound: f64) {
        (**self).add_constraint(expr, relation, bound)
    }

    fn set_objective(&mut self, expr: LinearExpr, sense: Sense) {
        (**self).set_objective(expr, sense)
    }

    fn solve(&mut self) -> SolveStatus {
        (**self).solve()
    }

    fn value_of(&self, var: VarHandle) -> f64 {
        (**self).value_of(var)
    }

    fn objective_value(&self) -> f64 {
        (**self).objective_value()
    }
}

/// Constructs a solving engine by backend name.
///
/// # Errors
/// [`ScheduleError::EngineUnavailable`] for a backend this build does not
/// provide.
pub fn create_engine(backend: &str) -> Result<Box<dyn SolvingEngine>, ScheduleError> {
    match backend.trim().to_ascii_lowercase().as_str() {
        "microlp" | "default" => Ok(Box::new(GoodLpEngine::new())),
        _ => Err(ScheduleError::EngineUnavailable {
            backend: backend.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expr_eval() {
        let a = VarHandle(0);
        let b = VarHandle(1);
        let mut expr = LinearExpr::sum([a, b]);
        expr.add_term(b, -3.0);
        expr.constant = 0.5;
        let value = expr.eval(|v| if v == a { 1.0 } else { 2.0 });
        assert!((value - (1.0 + 2.0 - 6.0 + 0.5)).abs() < 1e-12);
    }

    #[test]
    fn test_extend_scaled() {
        let a = VarHandle(0);
        let b = VarHandle(1);
        let mut lhs = LinearExpr::sum([a]);
        lhs.extend_scaled(&LinearExpr::sum([b]), -1.0);
        assert_eq!(lhs.terms, vec![(a, 1.0), (b, -1.0)]);
    }

    #[test]
    fn test_relation_holds() {
        assert!(Relation::LessEq.holds(1.0, 1.0, 0.0));
        assert!(!Relation::LessEq.holds(1.1, 1.0, 1e-6));
        assert!(Relation::GreaterEq.holds(0.999_999_9, 1.0, 1e-6));
        assert!(Relation::Equal.holds(2.0, 2.0, 1e-9));
        assert!(!Relation::Equal.holds(1.0, 0.0, 1e-9));
    }

    #[test]
    fn test_status_has_solution() {
        assert!(SolveStatus::Optimal.has_solution());
        assert!(SolveStatus::Feasible.has_solution());
        assert!(!SolveStatus::Infeasible.has_solution());
        assert!(!SolveStatus::Error.has_solution());
        assert_eq!(SolveStatus::Infeasible.to_string(), "INFEASIBLE");
    }

    #[test]
    fn test_create_engine() {
        assert_eq!(create_engine("microlp").unwrap().name(), "microlp");
        assert_eq!(create_engine(" Default ").unwrap().name(), "microlp");
        assert!(matches!(
            create_engine("scip"),
            Err(ScheduleError::EngineUnavailable { ref backend }) if backend == "scip"
        ));
    }
}
