//! Preference sheets and the merged preference tensor.
//!
//! Workers and managers each submit one [`PreferenceTable`] per worker:
//! rows are jobs, columns are days, and each cell is a desirability
//! score. An empty cell (`None`) is an explicit "unset" marker, distinct
//! from a score equal to the unable score.

use serde::{Deserialize, Serialize};

use super::Grid3;

/// A job × day score table for one worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferenceTable {
    /// Row identifiers.
    pub job_names: Vec<String>,
    /// Column identifiers.
    pub day_names: Vec<String>,
    /// `cells[job][day]`; `None` = unset.
    pub cells: Vec<Vec<Option<f64>>>,
}

impl PreferenceTable {
    /// Creates a table with every cell unset.
    pub fn new<J, D>(job_names: J, day_names: D) -> Self
    where
        J: IntoIterator,
        J::Item: Into<String>,
        D: IntoIterator,
        D::Item: Into<String>,
    {
        let job_names: Vec<String> = job_names.into_iter().map(Into::into).collect();
        let day_names: Vec<String> = day_names.into_iter().map(Into::into).collect();
        let cells = vec![vec![None; day_names.len()]; job_names.len()];
        Self {
            job_names,
            day_names,
            cells,
        }
    }

    /// Creates a table with every cell set to `score`.
    pub fn uniform<J, D>(job_names: J, day_names: D, score: f64) -> Self
    where
        J: IntoIterator,
        J::Item: Into<String>,
        D: IntoIterator,
        D::Item: Into<String>,
    {
        let mut table = Self::new(job_names, day_names);
        for row in &mut table.cells {
            row.fill(Some(score));
        }
        table
    }

    /// Builder: sets one cell by position.
    pub fn with_cell(mut self, job: usize, day: usize, score: Option<f64>) -> Self {
        self.set(job, day, score);
        self
    }

    /// Builder: sets a whole job row, one value per day.
    pub fn with_row(mut self, job: usize, scores: &[Option<f64>]) -> Self {
        if let Some(row) = self.cells.get_mut(job) {
            *row = scores.to_vec();
        }
        self
    }

    /// Sets one cell. Out-of-range positions are ignored.
    pub fn set(&mut self, job: usize, day: usize, score: Option<f64>) {
        if let Some(cell) = self.cells.get_mut(job).and_then(|row| row.get_mut(day)) {
            *cell = score;
        }
    }

    /// Returns a cell (`None` if unset or out of range).
    pub fn get(&self, job: usize, day: usize) -> Option<f64> {
        self.cells.get(job).and_then(|row| row.get(day)).copied().flatten()
    }

    /// Declared `(jobs, days)` shape.
    pub fn shape(&self) -> (usize, usize) {
        (self.job_names.len(), self.day_names.len())
    }

    /// Multiplies every set cell by `factor`.
    ///
    /// Used to bring a sheet filled out on another scale (e.g. 0–10)
    /// into the configured score domain before ingestion.
    pub fn scaled(&self, factor: f64) -> Self {
        let cells = self
            .cells
            .iter()
            .map(|row| row.iter().map(|c| c.map(|v| v * factor)).collect())
            .collect();
        Self {
            job_names: self.job_names.clone(),
            day_names: self.day_names.clone(),
            cells,
        }
    }
}

/// One worker's preference table, keyed by the worker's name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerSheet {
    pub worker: String,
    pub table: PreferenceTable,
}

impl WorkerSheet {
    pub fn new(worker: impl Into<String>, table: PreferenceTable) -> Self {
        Self {
            worker: worker.into(),
            table,
        }
    }
}

/// Merged worker × manager preference weights.
///
/// `weight(w, j, d)` is the product of the cleaned worker score and the
/// clamped manager score; it is the objective coefficient of `x[w,j,d]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedTensor {
    pub worker_names: Vec<String>,
    pub job_names: Vec<String>,
    pub day_names: Vec<String>,
    weights: Grid3<f64>,
}

impl MergedTensor {
    /// Wraps a weight grid with its name orderings.
    ///
    /// # Panics
    /// Panics if the grid dimensions disagree with the name lists.
    pub fn new(
        worker_names: Vec<String>,
        job_names: Vec<String>,
        day_names: Vec<String>,
        weights: Grid3<f64>,
    ) -> Self {
        assert_eq!(
            weights.dims(),
            (worker_names.len(), job_names.len(), day_names.len()),
            "weight grid does not match name orderings"
        );
        Self {
            worker_names,
            job_names,
            day_names,
            weights,
        }
    }

    /// A tensor with the same weight everywhere.
    pub fn uniform<W, J, D>(worker_names: W, job_names: J, day_names: D, weight: f64) -> Self
    where
        W: IntoIterator,
        W::Item: Into<String>,
        J: IntoIterator,
        J::Item: Into<String>,
        D: IntoIterator,
        D::Item: Into<String>,
    {
        let worker_names: Vec<String> = worker_names.into_iter().map(Into::into).collect();
        let job_names: Vec<String> = job_names.into_iter().map(Into::into).collect();
        let day_names: Vec<String> = day_names.into_iter().map(Into::into).collect();
        let weights = Grid3::filled(worker_names.len(), job_names.len(), day_names.len(), weight);
        Self::new(worker_names, job_names, day_names, weights)
    }

    #[inline]
    pub fn num_workers(&self) -> usize {
        self.worker_names.len()
    }

    #[inline]
    pub fn num_jobs(&self) -> usize {
        self.job_names.len()
    }

    #[inline]
    pub fn num_days(&self) -> usize {
        self.day_names.len()
    }

    /// Merged weight of assigning worker `w` to job `j` on day `d`.
    #[inline]
    pub fn weight(&self, w: usize, j: usize, d: usize) -> f64 {
        self.weights[(w, j, d)]
    }

    /// Sets one weight.
    pub fn set_weight(&mut self, w: usize, j: usize, d: usize, weight: f64) {
        self.weights[(w, j, d)] = weight;
    }

    /// Underlying dense grid.
    pub fn weights(&self) -> &Grid3<f64> {
        &self.weights
    }

    /// Position of a worker by name.
    pub fn worker_index(&self, name: &str) -> Option<usize> {
        self.worker_names.iter().position(|n| n == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_builders() {
        let t = PreferenceTable::new(["KL", "Field"], ["Mon", "Tue", "Wed"])
            .with_cell(0, 1, Some(0.6))
            .with_row(1, &[Some(0.1), None, Some(0.9)]);
        assert_eq!(t.shape(), (2, 3));
        assert_eq!(t.get(0, 0), None);
        assert_eq!(t.get(0, 1), Some(0.6));
        assert_eq!(t.get(1, 2), Some(0.9));
        assert_eq!(t.get(1, 1), None);
        assert_eq!(t.get(5, 5), None);
    }

    #[test]
    fn test_uniform_table() {
        let t = PreferenceTable::uniform(["A"], ["Mon", "Tue"], 0.5);
        assert!(t.cells.iter().flatten().all(|c| *c == Some(0.5)));
    }

    #[test]
    fn test_scaled_keeps_unset() {
        let t = PreferenceTable::new(["A"], ["Mon", "Tue"]).with_cell(0, 0, Some(0.3));
        let s = t.scaled(10.0);
        assert!((s.get(0, 0).unwrap() - 3.0).abs() < 1e-12);
        assert_eq!(s.get(0, 1), None);
        assert_eq!(s.job_names, t.job_names);
    }

    #[test]
    fn test_merged_tensor_access() {
        let mut m = MergedTensor::uniform(["Amber", "Rob"], ["KL"], ["Mon", "Tue"], 0.25);
        assert_eq!(m.num_workers(), 2);
        assert_eq!(m.num_jobs(), 1);
        assert_eq!(m.num_days(), 2);
        m.set_weight(1, 0, 1, 0.9);
        assert!((m.weight(1, 0, 1) - 0.9).abs() < 1e-12);
        assert!((m.weight(0, 0, 0) - 0.25).abs() < 1e-12);
        assert_eq!(m.worker_index("Rob"), Some(1));
        assert_eq!(m.worker_index("Nobody"), None);
    }

    #[test]
    #[should_panic(expected = "weight grid")]
    fn test_merged_tensor_dimension_check() {
        let _ = MergedTensor::new(
            vec!["A".into()],
            vec!["J".into()],
            vec!["Mon".into()],
            Grid3::filled(2, 1, 1, 0.0),
        );
    }
}
