//! Preference-weighted weekly rostering for the U-Engine ecosystem.
//!
//! Turns per-worker preference sheets, manager capability sheets, pairing
//! requests and rest-day quotas into a day × job roster that maximizes
//! total merged preference, by building and solving a mixed-integer
//! linear program.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `PreferenceTable`, `WorkerSheet`,
//!   `MergedTensor`, `PairingRow`, `RosterInput`, `Roster`
//! - **`validation`**: Sheet integrity checks (duplicates, shapes, identifiers)
//! - **`ingest`**: Cleaning and merging of worker/manager sheets
//! - **`pairing`**, **`days_off`**: Name-keyed inputs resolved to worker indices
//! - **`lp`**: Solving-engine trait and the bundled `good_lp` backend
//! - **`milp`**: Model construction and solution decoding
//! - **`scheduler`**: End-to-end pipeline and roster KPIs
//! - **`config`**: TOML configuration
//!
//! # Logging
//!
//! The crate emits `tracing` events and installs no subscriber.
//!
//! # References
//!
//! - Wolsey (2020), "Integer Programming", Ch. 1: Formulations
//! - Ernst et al. (2004), "Staff scheduling and rostering: A review"

pub mod config;
pub mod days_off;
pub mod error;
pub mod ingest;
pub mod lp;
pub mod milp;
pub mod models;
pub mod pairing;
pub mod scheduler;
pub mod validation;

pub use config::RosterConfig;
pub use error::ScheduleError;
pub use scheduler::{RosterScheduler, RunReport};
