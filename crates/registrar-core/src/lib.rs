//! Core library for the OFS registrar record schema.
//!
//! - [`models`]: typed shapes for every record the registrar backend exchanges
//! - [`validate`]: invariant checks over decoded records
//! - [`kind`]: lookup of record shapes by their wire type name
//! - [`store`]: local JSON snapshots of record collections
//! - [`config`]: persisted user configuration

pub mod config;
pub mod error;
pub mod kind;
pub mod models;
pub mod store;
pub mod utils;
pub mod validate;

pub use config::Config;
pub use error::SchemaError;
pub use kind::{Checked, RecordKind};
pub use store::{Collection, RecordStore, Snapshot};
pub use validate::{Report, Severity, Validate, Violation};
