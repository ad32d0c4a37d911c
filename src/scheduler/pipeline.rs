//! End-to-end roster pipeline.
//!
//! # Algorithm
//!
//! 1. Validate, clean and merge preference sheets.
//! 2. Persist the cleaned sheets if an artifact path is configured; the
//!    file is removed when the run ends, whatever the outcome.
//! 3. Resolve pairing rows and days-off overrides against the worker list.
//! 4. Build the MILP, solve it, and decode the solution.
//! 5. Write the roster CSV and compute KPIs when a roster exists.

use crate::config::RosterConfig;
use crate::days_off::resolve_days_off;
use crate::error::ScheduleError;
use crate::ingest::{Correction, PreferenceIngestor, ScopedArtifact};
use crate::lp::SolvingEngine;
use crate::milp::{decode, Outcome, RosterModel, RosterModelBuilder};
use crate::models::RosterInput;
use crate::pairing;

use super::RosterKpi;

/// Everything a run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub outcome: Outcome,
    /// Worker-side cells changed during cleaning.
    pub corrections: Vec<Correction>,
    /// Present only when a roster was found.
    pub kpi: Option<RosterKpi>,
}

/// Runs the full roster pipeline.
///
/// # Example
///
/// ```
/// use u_roster::config::RosterConfig;
/// use u_roster::models::{PreferenceTable, RosterInput, WorkerSheet};
/// use u_roster::scheduler::RosterScheduler;
///
/// let sheet = |name: &str, score| {
///     WorkerSheet::new(name, PreferenceTable::uniform(["Field"], ["Mon"], score))
/// };
/// let input = RosterInput::new(vec![sheet("Amber", 1.0)], vec![sheet("Amber", 0.8)]);
/// let config = RosterConfig {
///     default_days_off: 0,
///     ..RosterConfig::default()
/// };
///
/// let report = RosterScheduler::new(config).run(&input).unwrap();
/// let roster = report.outcome.roster().unwrap();
/// assert_eq!(roster.worker_at(0, 0), Some("Amber"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RosterScheduler {
    config: RosterConfig,
}

impl RosterScheduler {
    pub fn new(config: RosterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RosterConfig {
        &self.config
    }

    /// Runs on the configured backend.
    ///
    /// # Errors
    /// - [`ScheduleError::Config`] for an invalid configuration
    /// - [`ScheduleError::SchemaMismatch`] for malformed sheets
    /// - [`ScheduleError::EngineUnavailable`] for an unknown backend
    /// - [`ScheduleError::InconsistentSolution`] if decoding fails
    /// - I/O errors writing the artifact or the roster CSV
    pub fn run(&self, input: &RosterInput) -> Result<RunReport, ScheduleError> {
        let backend = self.config.backend.as_str();
        self.run_inner(input, |builder| builder.build_with_backend(backend))
    }

    /// Runs on a caller-supplied engine, ignoring the configured backend.
    pub fn run_with_engine<E: SolvingEngine>(
        &self,
        input: &RosterInput,
        engine: E,
    ) -> Result<RunReport, ScheduleError> {
        self.run_inner(input, move |builder| Ok(builder.build(engine)))
    }

    fn run_inner<E, F>(&self, input: &RosterInput, build: F) -> Result<RunReport, ScheduleError>
    where
        E: SolvingEngine,
        F: FnOnce(&RosterModelBuilder<'_>) -> Result<RosterModel<E>, ScheduleError>,
    {
        self.config.validate()?;

        let ingestion = PreferenceIngestor::new(self.config.scores.clone())
            .ingest(&input.worker_sheets, &input.manager_sheets)?;
        let tensor = &ingestion.tensor;
        tracing::info!(
            workers = tensor.num_workers(),
            jobs = tensor.num_jobs(),
            days = tensor.num_days(),
            corrections = ingestion.corrections.len(),
            "preferences ingested"
        );

        // Held until the end of the run; dropping removes the file.
        let _artifact = match &self.config.cleaned_artifact {
            Some(path) => Some(ScopedArtifact::create(path, &ingestion.cleaned)?),
            None => None,
        };

        let pairings = pairing::resolve(&input.pairings, &tensor.worker_names);
        let days_off = resolve_days_off(
            &input.days_off,
            &tensor.worker_names,
            self.config.default_days_off,
            tensor.num_days(),
        );

        let builder = RosterModelBuilder::new(tensor)
            .with_days_off(days_off)
            .with_pairings(pairings)
            .with_forbid_incapable(self.config.forbid_incapable);
        let mut model = build(&builder)?;
        let status = model.solve();
        let outcome = decode(&model, status)?;

        let kpi = match &outcome {
            Outcome::Solved(solved) => {
                if let Some(path) = &self.config.roster_output {
                    solved.roster.write_csv(path)?;
                    tracing::info!(path = %path.display(), "roster written");
                }
                Some(RosterKpi::calculate(solved, &tensor.worker_names))
            }
            Outcome::Unsolved(_) => None,
        };

        Ok(RunReport {
            outcome,
            corrections: ingestion.corrections,
            kpi,
        })
    }
}
