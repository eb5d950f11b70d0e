//! Invariant checks over decoded records.
//!
//! Decoding already enforces field presence, types and closed literal sets.
//! `Validate` covers what the type system cannot: non-empty identifiers,
//! mapping keys that agree with their entries, date ranges in order, and the
//! homogeneity of the backend's array/map unions.

mod rules;

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Dotted path to the offending field, e.g. `section.students[s1].ID`
    pub path: String,
    pub severity: Severity,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "<root>" } else { &self.path };
        write!(f, "{} at {}: {}", self.severity, path, self.message)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub violations: Vec<Violation>,
}

impl Report {
    pub fn error(&mut self, path: &str, message: impl Into<String>) {
        self.push(path, Severity::Error, message.into());
    }

    pub fn warn(&mut self, path: &str, message: impl Into<String>) {
        self.push(path, Severity::Warning, message.into());
    }

    fn push(&mut self, path: &str, severity: Severity, message: String) {
        self.violations.push(Violation {
            path: path.to_string(),
            severity,
            message,
        });
    }

    /// True when no error-severity violation was found; warnings are allowed.
    pub fn is_valid(&self) -> bool {
        self.errors().next().is_none()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(|v| v.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(|v| v.severity == Severity::Warning)
    }

    /// Fold another report in, prefixing its paths.
    pub fn merge(&mut self, prefix: &str, other: Report) {
        for mut violation in other.violations {
            violation.path = if violation.path.is_empty() {
                prefix.to_string()
            } else if violation.path.starts_with('[') {
                format!("{}{}", prefix, violation.path)
            } else {
                field(prefix, &violation.path)
            };
            self.violations.push(violation);
        }
    }
}

/// A record that can check its own invariants.
pub trait Validate {
    /// Append violations under `path`. Leaf shapes without rules keep the default.
    fn validate_at(&self, _path: &str, _report: &mut Report) {}

    fn validate(&self) -> Report {
        let mut report = Report::default();
        self.validate_at("", &mut report);
        report
    }
}

/// Values stored in a keyed mapping, where the key duplicates an entry field.
pub trait MapEntry {
    /// The key this entry expects to be stored under, if it has one.
    fn expected_key(&self) -> Option<&str>;
}

impl<T: Validate> Validate for Vec<T> {
    fn validate_at(&self, path: &str, report: &mut Report) {
        for (i, item) in self.iter().enumerate() {
            item.validate_at(&format!("{}[{}]", path, i), report);
        }
    }
}

impl<T: Validate> Validate for Option<T> {
    fn validate_at(&self, path: &str, report: &mut Report) {
        if let Some(inner) = self {
            inner.validate_at(path, report);
        }
    }
}

impl<T: Validate + MapEntry> Validate for BTreeMap<String, T> {
    fn validate_at(&self, path: &str, report: &mut Report) {
        for (key, entry) in self {
            let entry_path = format!("{}[{}]", path, key);
            if let Some(expected) = entry.expected_key() {
                if expected != key {
                    report.warn(
                        &entry_path,
                        format!("key {:?} does not match entry identifier {:?}", key, expected),
                    );
                }
            }
            entry.validate_at(&entry_path, report);
        }
    }
}

pub(crate) fn field(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", path, name)
    }
}
