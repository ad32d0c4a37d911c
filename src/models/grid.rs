//! Dense three-dimensional arena.
//!
//! Backs both the merged preference tensor and the decision-variable
//! arena. Coordinates are `(worker, job, day)`; storage is row-major with
//! the day index varying fastest.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// A dense `workers × jobs × days` grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid3<T> {
    workers: usize,
    jobs: usize,
    days: usize,
    data: Vec<T>,
}

impl<T> Grid3<T> {
    /// Builds a grid by evaluating `f` at every coordinate, in storage order.
    pub fn from_fn(
        workers: usize,
        jobs: usize,
        days: usize,
        mut f: impl FnMut(usize, usize, usize) -> T,
    ) -> Self {
        let mut data = Vec::with_capacity(workers * jobs * days);
        for w in 0..workers {
            for j in 0..jobs {
                for d in 0..days {
                    data.push(f(w, j, d));
                }
            }
        }
        Self {
            workers,
            jobs,
            days,
            data,
        }
    }

    /// `(workers, jobs, days)`.
    #[inline]
    pub fn dims(&self) -> (usize, usize, usize) {
        (self.workers, self.jobs, self.days)
    }

    /// Number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether any dimension is zero.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    fn offset(&self, w: usize, j: usize, d: usize) -> Option<usize> {
        (w < self.workers && j < self.jobs && d < self.days)
            .then(|| (w * self.jobs + j) * self.days + d)
    }

    /// Returns the cell at `(w, j, d)`, or `None` when out of bounds.
    pub fn get(&self, w: usize, j: usize, d: usize) -> Option<&T> {
        self.offset(w, j, d).map(|i| &self.data[i])
    }

    /// Mutable access to the cell at `(w, j, d)`.
    pub fn get_mut(&mut self, w: usize, j: usize, d: usize) -> Option<&mut T> {
        self.offset(w, j, d).map(move |i| &mut self.data[i])
    }

    /// Iterates `((w, j, d), &cell)` in storage order.
    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize, usize), &T)> + '_ {
        let (jobs, days) = (self.jobs, self.days);
        self.data.iter().enumerate().map(move |(i, v)| {
            let d = i % days;
            let j = (i / days) % jobs;
            let w = i / (days * jobs);
            ((w, j, d), v)
        })
    }
}

impl<T: Clone> Grid3<T> {
    /// A grid with every cell set to `value`.
    pub fn filled(workers: usize, jobs: usize, days: usize, value: T) -> Self {
        Self {
            workers,
            jobs,
            days,
            data: vec![value; workers * jobs * days],
        }
    }
}

impl<T> Index<(usize, usize, usize)> for Grid3<T> {
    type Output = T;

    fn index(&self, (w, j, d): (usize, usize, usize)) -> &T {
        match self.offset(w, j, d) {
            Some(i) => &self.data[i],
            None => panic!(
                "grid index ({w}, {j}, {d}) out of bounds {:?}",
                self.dims()
            ),
        }
    }
}

impl<T> IndexMut<(usize, usize, usize)> for Grid3<T> {
    fn index_mut(&mut self, (w, j, d): (usize, usize, usize)) -> &mut T {
        let dims = self.dims();
        match self.offset(w, j, d) {
            Some(i) => &mut self.data[i],
            None => panic!("grid index ({w}, {j}, {d}) out of bounds {dims:?}"),
        }
    }
}
