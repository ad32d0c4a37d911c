//! Worker pairing requests.
//!
//! A pairing couples the daily on/off status of two workers. Rows arrive
//! by name ([`PairingRow`]) and are resolved against the roster into
//! index-based [`PairingRequest`]s by [`crate::pairing::resolve`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of coupling between two workers' daily on-duty indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairingKind {
    /// The two workers may not both be off on the same day.
    MustDiverge,
    /// The two workers are either both working or both off each day.
    MustConverge,
}

impl PairingKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::MustDiverge => "must_diverge",
            Self::MustConverge => "must_converge",
        }
    }
}

impl fmt::Display for PairingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PairingKind {
    type Err = String;

    /// Accepts `diverge`, `must_diverge`, `converge`, `must_converge`
    /// (case-insensitive, `-` and spaces treated as `_`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .map(|c| match c {
                '-' | ' ' => '_',
                c => c.to_ascii_lowercase(),
            })
            .collect();
        match normalized.as_str() {
            "diverge" | "must_diverge" => Ok(Self::MustDiverge),
            "converge" | "must_converge" => Ok(Self::MustConverge),
            _ => Err(format!("unknown pairing kind '{s}'")),
        }
    }
}

/// A raw pairing row: two worker names and the requested coupling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairingRow {
    pub worker_a: String,
    pub worker_b: String,
    pub kind: PairingKind,
}

impl PairingRow {
    pub fn new(
        worker_a: impl Into<String>,
        worker_b: impl Into<String>,
        kind: PairingKind,
    ) -> Self {
        Self {
            worker_a: worker_a.into(),
            worker_b: worker_b.into(),
            kind,
        }
    }

    pub fn diverge(worker_a: impl Into<String>, worker_b: impl Into<String>) -> Self {
        Self::new(worker_a, worker_b, PairingKind::MustDiverge)
    }

    pub fn converge(worker_a: impl Into<String>, worker_b: impl Into<String>) -> Self {
        Self::new(worker_a, worker_b, PairingKind::MustConverge)
    }
}

/// A pairing resolved to roster worker indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairingRequest {
    pub worker_a: usize,
    pub worker_b: usize,
    pub kind: PairingKind,
}
