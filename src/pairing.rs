//! Pairing request resolution.
//!
//! Translates name-based pairing rows into index-based requests. A row
//! naming a worker outside the roster is dropped with a warning; the rest
//! still apply. Requests are neither deduplicated nor checked against each
//! other: contradictory pairs surface as an infeasible model at solve time.

use std::collections::HashMap;

use crate::models::{PairingRequest, PairingRow};

/// Resolves pairing rows against the roster's worker names.
///
/// The returned requests preserve input order.
pub fn resolve(rows: &[PairingRow], worker_names: &[String]) -> Vec<PairingRequest> {
    let index: HashMap<&str, usize> = worker_names
        .iter()
        .enumerate()
        .map(|(i, n)| (n.as_str(), i))
        .collect();

    let mut requests = Vec::with_capacity(rows.len());
    for row in rows {
        let a = index.get(row.worker_a.as_str());
        let b = index.get(row.worker_b.as_str());
        match (a, b) {
            (Some(&worker_a), Some(&worker_b)) => requests.push(PairingRequest {
                worker_a,
                worker_b,
                kind: row.kind,
            }),
            _ => {
                let unknown: Vec<&str> = [(&row.worker_a, a), (&row.worker_b, b)]
                    .into_iter()
                    .filter(|(_, idx)| idx.is_none())
                    .map(|(name, _)| name.as_str())
                    .collect();
                tracing::warn!(
                    worker_a = %row.worker_a,
                    worker_b = %row.worker_b,
                    kind = %row.kind,
                    unknown = ?unknown,
                    "pairing row references unknown worker; dropped"
                );
            }
        }
    }

    tracing::debug!(rows = rows.len(), resolved = requests.len(), "pairings resolved");
    requests
}
