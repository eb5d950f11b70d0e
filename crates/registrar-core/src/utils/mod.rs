//! Utility functions for the string-encoded dates carried by records.

pub mod dates;

pub use dates::{format_date, parse_date};
