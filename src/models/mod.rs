//! Rostering domain models.
//!
//! Provides the data types flowing through a roster run: the raw
//! preference sheets submitted by workers and managers, the merged
//! preference tensor, pairing requests, days-off overrides and the
//! decoded roster.
//!
//! # Index Convention
//!
//! Every dense structure is indexed `(worker, job, day)` by position:
//! workers in sheet order, jobs in row order, days in column order.
//!
//! | Name | Rows | Columns |
//! |------|------|---------|
//! | `PreferenceTable` | jobs | days |
//! | `Roster` | days | jobs |

mod grid;
mod input;
mod pairing;
mod preference;
mod roster;

pub use grid::Grid3;
pub use input::{OverrideValue, RosterInput};
pub use pairing::{PairingKind, PairingRequest, PairingRow};
pub use preference::{MergedTensor, PreferenceTable, WorkerSheet};
pub use roster::{Assignment, Roster};
