//! Roster pipeline and KPI evaluation.
//!
//! `RosterScheduler` wires ingestion, pairing and days-off resolution,
//! model construction, solving and decoding into one call.
//!
//! # KPI
//!
//! `RosterKpi` computes coverage and fairness metrics: fill rate, unfilled
//! slots, happiness totals and days worked per worker.

mod kpi;
mod pipeline;

pub use kpi::RosterKpi;
pub use pipeline::{RosterScheduler, RunReport};
