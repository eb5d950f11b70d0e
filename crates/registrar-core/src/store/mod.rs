//! Local snapshot store for record collections.
//!
//! Each collection is written as pretty JSON to `<name>.json` in the store
//! directory, wrapped with the time it was saved. Snapshots older than a day
//! are reported as stale.
//!
//! Stored collections:
//! - Students, staff, relations
//! - Courses, sections, academic years
//! - Attendance records (one file per day), time excusals
//! - Label sets, bank accounts and transactions

pub mod manager;

pub use manager::{Collection, Imported, RecordStore, Snapshot, SnapshotAges};
