//! `good_lp` backend running the pure-Rust `microlp` solver.
//!
//! Variables, constraints and the objective are recorded as plain data
//! and translated into a `good_lp` problem when [`SolvingEngine::solve`]
//! is called. `microlp` solves to proven optimality, so a successful
//! solve always reports [`SolveStatus::Optimal`].

use good_lp::{
    constraint, variable, Expression, ProblemVariables, ResolutionError, Solution, SolverModel,
    Variable,
};

use super::{LinearExpr, Relation, Sense, SolveStatus, SolvingEngine, VarHandle};

/// MILP engine backed by `good_lp` + `microlp`.
#[derive(Debug, Clone)]
pub struct GoodLpEngine {
    num_vars: usize,
    constraints: Vec<(LinearExpr, Relation, f64)>,
    objective: LinearExpr,
    sense: Sense,
    values: Vec<f64>,
    objective_value: f64,
}

impl Default for GoodLpEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl GoodLpEngine {
    pub fn new() -> Self {
        Self {
            num_vars: 0,
            constraints: Vec::new(),
            objective: LinearExpr::new(),
            sense: Sense::Maximize,
            values: Vec::new(),
            objective_value: 0.0,
        }
    }

    /// Number of variables created so far.
    pub fn variable_count(&self) -> usize {
        self.num_vars
    }

    /// Number of constraints added so far.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    fn to_expression(expr: &LinearExpr, vars: &[Variable]) -> Expression {
        let mut out = Expression::from(expr.constant);
        for &(v, coef) in &expr.terms {
            out += vars[v.0] * coef;
        }
        out
    }
}

impl SolvingEngine for GoodLpEngine {
    fn name(&self) -> &str {
        "microlp"
    }

    fn new_bool_var(&mut self) -> VarHandle {
        let handle = VarHandle(self.num_vars);
        self.num_vars += 1;
        handle
    }

    fn add_constraint(&mut self, expr: LinearExpr, relation: Relation, bound: f64) {
        self.constraints.push((expr, relation, bound));
    }

    fn set_objective(&mut self, expr: LinearExpr, sense: Sense) {
        self.objective = expr;
        self.sense = sense;
    }

    fn solve(&mut self) -> SolveStatus {
        self.values.clear();
        self.objective_value = 0.0;

        let mut problem_vars = ProblemVariables::new();
        let vars: Vec<Variable> = (0..self.num_vars)
            .map(|_| problem_vars.add(variable().binary()))
            .collect();

        let objective = Self::to_expression(&self.objective, &vars);
        let unsolved = match self.sense {
            Sense::Maximize => problem_vars.maximise(objective),
            Sense::Minimize => problem_vars.minimise(objective),
        };
        let mut problem = unsolved.using(good_lp::microlp);
        for (expr, relation, bound) in &self.constraints {
            let lhs = Self::to_expression(expr, &vars);
            let c = match relation {
                Relation::LessEq => constraint::leq(lhs, *bound),
                Relation::GreaterEq => constraint::geq(lhs, *bound),
                Relation::Equal => constraint::eq(lhs, *bound),
            };
            problem.add_constraint(c);
        }

        match problem.solve() {
            Ok(solution) => {
                self.values = vars.iter().map(|&v| solution.value(v)).collect();
                let values = &self.values;
                self.objective_value = self.objective.eval(|h| values[h.0]);
                SolveStatus::Optimal
            }
            Err(ResolutionError::Infeasible) => SolveStatus::Infeasible,
            Err(e) => {
                tracing::warn!(engine = "microlp", error = %e, "solver failed");
                SolveStatus::Error
            }
        }
    }

    fn value_of(&self, var: VarHandle) -> f64 {
        self.values.get(var.0).copied().unwrap_or(0.0)
    }

    fn objective_value(&self) -> f64 {
        self.objective_value
    }
}
