//! Roster (solution) model.
//!
//! A roster is a day × job table whose cells hold the assigned worker's
//! name, or `None` when the slot stays unfilled.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ScheduleError;

/// A decoded worker-job-day assignment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub worker: usize,
    pub job: usize,
    pub day: usize,
    /// Merged preference weight realized by this assignment.
    pub happiness: f64,
}

/// A day × job roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    pub day_names: Vec<String>,
    pub job_names: Vec<String>,
    /// `cells[day][job]`; `None` = unassigned.
    cells: Vec<Vec<Option<String>>>,
}

impl Roster {
    /// Creates a roster with every slot unassigned.
    pub fn new(day_names: Vec<String>, job_names: Vec<String>) -> Self {
        let cells = vec![vec![None; job_names.len()]; day_names.len()];
        Self {
            day_names,
            job_names,
            cells,
        }
    }

    /// Places `worker` into the slot, returning the previous occupant.
    pub fn assign(&mut self, day: usize, job: usize, worker: impl Into<String>) -> Option<String> {
        self.cells[day][job].replace(worker.into())
    }

    /// Worker holding a slot.
    pub fn worker_at(&self, day: usize, job: usize) -> Option<&str> {
        self.cells
            .get(day)
            .and_then(|row| row.get(job))
            .and_then(|c| c.as_deref())
    }

    /// Names of all workers on duty on a day, in job order.
    pub fn workers_on(&self, day: usize) -> Vec<&str> {
        self.cells
            .get(day)
            .map(|row| row.iter().filter_map(|c| c.as_deref()).collect())
            .unwrap_or_default()
    }

    /// Number of filled slots.
    pub fn filled_count(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_some()).count()
    }

    /// Number of slots left unassigned.
    pub fn unfilled_count(&self) -> usize {
        self.cells.iter().flatten().filter(|c| c.is_none()).count()
    }

    /// Renders the roster as CSV: one row per job, one column per day,
    /// blank cells for unassigned slots.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        let header: Vec<String> = std::iter::once(String::new())
            .chain(self.day_names.iter().map(|d| csv_field(d)))
            .collect();
        out.push_str(&header.join(","));
        out.push('\n');
        for (j, job) in self.job_names.iter().enumerate() {
            let mut row = vec![csv_field(job)];
            for d in 0..self.day_names.len() {
                row.push(self.worker_at(d, j).map(csv_field).unwrap_or_default());
            }
            out.push_str(&row.join(","));
            out.push('\n');
        }
        out
    }

    /// Writes [`Self::to_csv`] to `path`.
    pub fn write_csv(&self, path: &Path) -> Result<(), ScheduleError> {
        std::fs::write(path, self.to_csv()).map_err(|e| ScheduleError::io(path, e))
    }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_roster() -> Roster {
        let mut r = Roster::new(
            vec!["Mon".into(), "Tue".into()],
            vec!["Konalani".into(), "Hilltop Opener".into()],
        );
        r.assign(0, 0, "Amber");
        r.assign(0, 1, "Rob");
        r.assign(1, 1, "Elinor");
        r
    }

    #[test]
    fn test_worker_lookup() {
        let r = sample_roster();
        assert_eq!(r.worker_at(0, 1), Some("Rob"));
        assert_eq!(r.worker_at(1, 0), None);
        assert_eq!(r.worker_at(9, 0), None);
        assert_eq!(r.workers_on(0), vec!["Amber", "Rob"]);
        assert_eq!(r.filled_count(), 3);
        assert_eq!(r.unfilled_count(), 1);
    }

    #[test]
    fn test_assign_returns_previous() {
        let mut r = sample_roster();
        assert_eq!(r.assign(0, 0, "Mariam"), Some("Amber".to_string()));
        assert_eq!(r.assign(1, 0, "Nearn"), None);
    }

    #[test]
    fn test_csv_layout() {
        let csv = sample_roster().to_csv();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], ",Mon,Tue");
        assert_eq!(lines[1], "Konalani,Amber,");
        assert_eq!(lines[2], "Hilltop Opener,Rob,Elinor");
    }

    #[test]
    fn test_csv_quoting() {
        let mut r = Roster::new(vec!["Sat, late".into()], vec!["Field".into()]);
        r.assign(0, 0, "O\"Neil");
        let csv = r.to_csv();
        assert!(csv.starts_with(",\"Sat, late\"\n"));
        assert!(csv.contains("Field,\"O\"\"Neil\""));
    }

    #[test]
    fn test_write_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.csv");
        sample_roster().write_csv(&path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, sample_roster().to_csv());
    }
}
