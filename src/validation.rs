//! Input validation for preference sheets.
//!
//! Checks structural integrity of worker and manager sheets before any
//! cleaning happens. Detects:
//! - Duplicate worker names, on the worker or the manager side
//! - Workers without a manager sheet
//! - Worker/manager disagreement in job rows, day columns or shape
//! - Rows whose cell count differs from the declared day columns
//! - Workers whose job/day identifiers differ from the first worker's
//!
//! All problems are collected so that a single pass reports every
//! malformed sheet.

use crate::models::{PreferenceTable, WorkerSheet};
use std::collections::{HashMap, HashSet};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error tied to one worker's sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Worker whose sheet is malformed.
    pub worker: String,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two worker sheets, or two manager sheets, share the same name.
    DuplicateWorker,
    /// A worker has no manager sheet.
    MissingManagerSheet,
    /// Worker and manager job rows differ.
    JobIndexMismatch,
    /// Worker and manager day columns differ.
    DayIndexMismatch,
    /// A row does not have one cell per day column, or the row count
    /// differs from the job list.
    ShapeMismatch,
    /// A worker's jobs or days differ from the first worker's.
    InconsistentHorizon,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, worker: &str, message: impl Into<String>) -> Self {
        Self {
            kind,
            worker: worker.to_string(),
            message: message.into(),
        }
    }
}

/// Validates worker sheets against manager sheets.
///
/// Checks:
/// 1. No duplicate worker names on either side
/// 2. Every worker has a manager sheet
/// 3. Each table's cells match its declared job/day identifiers
/// 4. Worker and manager tables share job rows, day columns and shape
/// 5. Every worker shares the job rows and day columns of the first worker
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues,
/// manager-side duplicates first, then in worker order.
pub fn validate_sheets(
    worker_sheets: &[WorkerSheet],
    manager_sheets: &[WorkerSheet],
) -> ValidationResult {
    let mut errors = Vec::new();

    let mut managers: HashMap<&str, &PreferenceTable> = HashMap::new();
    for sheet in manager_sheets {
        let name = sheet.worker.as_str();
        if managers.insert(name, &sheet.table).is_some() {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateWorker,
                name,
                format!("Duplicate manager sheet: {name}"),
            ));
        }
    }

    let mut seen = HashSet::new();
    let reference = worker_sheets.first().map(|s| &s.table);

    for sheet in worker_sheets {
        let name = sheet.worker.as_str();
        if !seen.insert(name) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateWorker,
                name,
                format!("Duplicate worker sheet: {name}"),
            ));
            continue;
        }

        check_table_shape(name, "worker", &sheet.table, &mut errors);

        match managers.get(name) {
            None => errors.push(ValidationError::new(
                ValidationErrorKind::MissingManagerSheet,
                name,
                format!("No manager sheet for worker '{name}'"),
            )),
            Some(manager) => {
                check_table_shape(name, "manager", manager, &mut errors);
                if sheet.table.job_names != manager.job_names {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::JobIndexMismatch,
                        name,
                        format!(
                            "Job rows differ: worker {:?}, manager {:?}",
                            sheet.table.job_names, manager.job_names
                        ),
                    ));
                }
                if sheet.table.day_names != manager.day_names {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::DayIndexMismatch,
                        name,
                        format!(
                            "Day columns differ: worker {:?}, manager {:?}",
                            sheet.table.day_names, manager.day_names
                        ),
                    ));
                }
            }
        }

        if let Some(first) = reference {
            if first.job_names != sheet.table.job_names
                || first.day_names != sheet.table.day_names
            {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InconsistentHorizon,
                    name,
                    format!("Jobs or days of '{name}' differ from the first worker's sheet"),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_table_shape(
    worker: &str,
    side: &str,
    table: &PreferenceTable,
    errors: &mut Vec<ValidationError>,
) {
    let (jobs, days) = table.shape();
    if table.cells.len() != jobs {
        errors.push(ValidationError::new(
            ValidationErrorKind::ShapeMismatch,
            worker,
            format!("{side} table has {} rows for {jobs} jobs", table.cells.len()),
        ));
    }
    for (j, row) in table.cells.iter().enumerate() {
        if row.len() != days {
            errors.push(ValidationError::new(
                ValidationErrorKind::ShapeMismatch,
                worker,
                format!("{side} row {j} has {} cells for {days} days", row.len()),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> PreferenceTable {
        PreferenceTable::uniform(["KL", "Field"], ["Mon", "Tue"], 0.5)
    }

    fn sheets(names: &[&str]) -> Vec<WorkerSheet> {
        names.iter().map(|n| WorkerSheet::new(*n, table())).collect()
    }

    #[test]
    fn test_valid_input() {
        let workers = sheets(&["Amber", "Rob"]);
        let managers = sheets(&["Rob", "Amber"]);
        assert!(validate_sheets(&workers, &managers).is_ok());
    }

    #[test]
    fn test_duplicate_worker() {
        let workers = sheets(&["Amber", "Amber"]);
        let managers = sheets(&["Amber"]);
        let errors = validate_sheets(&workers, &managers).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateWorker && e.worker == "Amber"));
    }

    #[test]
    fn test_duplicate_manager_sheet() {
        let workers = sheets(&["Amber", "Rob"]);
        let managers = sheets(&["Amber", "Rob", "Rob"]);
        let errors = validate_sheets(&workers, &managers).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::DuplicateWorker);
        assert_eq!(errors[0].worker, "Rob");
        assert!(errors[0].message.contains("manager"));
    }

    #[test]
    fn test_missing_manager_sheet() {
        let workers = sheets(&["Amber", "Rob"]);
        let managers = sheets(&["Amber"]);
        let errors = validate_sheets(&workers, &managers).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::MissingManagerSheet);
        assert_eq!(errors[0].worker, "Rob");
    }

    #[test]
    fn test_day_column_mismatch() {
        let workers = sheets(&["Amber"]);
        let managers = vec![WorkerSheet::new(
            "Amber",
            PreferenceTable::uniform(["KL", "Field"], ["Mon", "Wed"], 0.5),
        )];
        let errors = validate_sheets(&workers, &managers).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DayIndexMismatch));
    }

    #[test]
    fn test_job_row_mismatch() {
        let workers = sheets(&["Amber"]);
        let managers = vec![WorkerSheet::new(
            "Amber",
            PreferenceTable::uniform(["Field", "KL"], ["Mon", "Tue"], 0.5),
        )];
        let errors = validate_sheets(&workers, &managers).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::JobIndexMismatch));
    }

    #[test]
    fn test_ragged_row() {
        let mut bad = table();
        bad.cells[1].pop();
        let workers = vec![WorkerSheet::new("Rob", bad)];
        let managers = sheets(&["Rob"]);
        let errors = validate_sheets(&workers, &managers).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::ShapeMismatch && e.message.contains("row 1")));
    }

    #[test]
    fn test_inconsistent_horizon_between_workers() {
        let other = PreferenceTable::uniform(["KL", "Field"], ["Mon", "Tue", "Wed"], 0.5);
        let workers = vec![
            WorkerSheet::new("Amber", table()),
            WorkerSheet::new("Rob", other.clone()),
        ];
        let managers = vec![
            WorkerSheet::new("Amber", table()),
            WorkerSheet::new("Rob", other),
        ];
        let errors = validate_sheets(&workers, &managers).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::InconsistentHorizon);
        assert_eq!(errors[0].worker, "Rob");
    }

    #[test]
    fn test_multiple_errors() {
        let mut bad = table();
        bad.cells.pop();
        let workers = vec![WorkerSheet::new("Amber", bad), WorkerSheet::new("Rob", table())];
        let managers = sheets(&["Amber"]);
        let errors = validate_sheets(&workers, &managers).unwrap_err();
        assert!(errors.len() >= 2);
    }
}
