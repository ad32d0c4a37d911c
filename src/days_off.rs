//! Days-off quota resolution.
//!
//! Each worker rests `default_days_off` days per horizon unless the
//! override table says otherwise. Quotas are clamped to
//! `0..=total_days`; a quota equal to `total_days` pins the worker off
//! for the whole horizon.

use std::collections::{BTreeMap, HashMap};

use crate::models::OverrideValue;

/// Resolves the per-worker days-off quota, indexed like `worker_names`.
///
/// - Integral values are clamped into range.
/// - Fractional values are floored, then clamped.
/// - Text that parses as a number is treated like the number; anything
///   else (other text, blank cells, booleans) is ignored with a warning
///   and the default applies.
/// - Overrides for unknown workers are dropped with a warning.
pub fn resolve_days_off(
    overrides: &BTreeMap<String, OverrideValue>,
    worker_names: &[String],
    default_days_off: usize,
    total_days: usize,
) -> Vec<usize> {
    let default = default_days_off.min(total_days);
    if default != default_days_off {
        tracing::warn!(
            default_days_off,
            total_days,
            "default days off exceeds horizon; clamped"
        );
    }

    let index: HashMap<&str, usize> = worker_names
        .iter()
        .enumerate()
        .map(|(i, n)| (n.as_str(), i))
        .collect();
    let mut days_off = vec![default; worker_names.len()];

    for (worker, value) in overrides {
        let Some(&w) = index.get(worker.as_str()) else {
            tracing::warn!(worker = %worker, "days-off override for unknown worker; dropped");
            continue;
        };
        let Some(requested) = numeric(value) else {
            tracing::warn!(
                worker = %worker,
                value = ?value,
                default,
                "non-numeric days-off override; using default"
            );
            continue;
        };
        let clamped = requested.clamp(0, total_days as i64) as usize;
        if clamped as i64 != requested {
            tracing::warn!(
                worker = %worker,
                requested,
                clamped,
                "days-off override outside 0..={total_days}; clamped"
            );
        }
        days_off[w] = clamped;
    }

    days_off
}

fn numeric(value: &OverrideValue) -> Option<i64> {
    match value {
        OverrideValue::Integer(v) => Some(*v),
        OverrideValue::Float(v) => floored(*v),
        OverrideValue::Text(s) => {
            let s = s.trim();
            s.parse().ok().or_else(|| s.parse().ok().and_then(floored))
        }
        OverrideValue::Other(_) => None,
    }
}

fn floored(v: f64) -> Option<i64> {
    v.is_finite().then(|| v.floor() as i64)
}
