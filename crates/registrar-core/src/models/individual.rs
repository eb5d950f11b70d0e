//! Minimal "reference" shapes for people (ID plus display name) and their
//! role-specific extensions.
//!
//! Extensions embed the base shape by value and flatten it on the wire, so a
//! `SectionIndividual` document is also a valid `SimpleIndividual` document.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::person::{StaffMember, Student};
use super::wire::present;

/// Records addressable by their own `ID` field.
pub trait Identified {
    fn id(&self) -> &str;
}

/// Collect records into a mapping keyed by their own `ID`.
pub fn keyed<T: Identified>(items: impl IntoIterator<Item = T>) -> BTreeMap<String, T> {
    items
        .into_iter()
        .map(|item| (item.id().to_string(), item))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct SimpleIndividual {
    #[serde(rename = "ID")]
    pub id: String,
    pub name: String,
}

impl SimpleIndividual {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl Identified for SimpleIndividual {
    fn id(&self) -> &str {
        &self.id
    }
}

impl From<&Student> for SimpleIndividual {
    fn from(student: &Student) -> Self {
        Self::new(student.id.clone(), student.name.clone())
    }
}

impl From<&StaffMember> for SimpleIndividual {
    fn from(staff: &StaffMember) -> Self {
        Self::new(staff.id.clone(), staff.name.clone())
    }
}

/// A student's place in a section, with the dates they joined and left.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct SectionIndividual {
    #[serde(flatten)]
    pub individual: SimpleIndividual,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub enrolled: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub withdrawn: Option<String>,
}

impl SectionIndividual {
    pub fn is_withdrawn(&self) -> bool {
        self.withdrawn.is_some()
    }
}

impl From<SimpleIndividual> for SectionIndividual {
    fn from(individual: SimpleIndividual) -> Self {
        Self {
            individual,
            enrolled: None,
            withdrawn: None,
        }
    }
}

impl Identified for SectionIndividual {
    fn id(&self) -> &str {
        &self.individual.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct SimpleEmailIndividual {
    #[serde(flatten)]
    pub individual: SimpleIndividual,
    pub email: String,
}

impl From<&Student> for SimpleEmailIndividual {
    fn from(student: &Student) -> Self {
        Self {
            individual: student.into(),
            email: student.email.clone(),
        }
    }
}

impl From<&StaffMember> for SimpleEmailIndividual {
    fn from(staff: &StaffMember) -> Self {
        Self {
            individual: staff.into(),
            email: staff.email.clone(),
        }
    }
}

impl Identified for SimpleEmailIndividual {
    fn id(&self) -> &str {
        &self.individual.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct SimpleStudent {
    #[serde(flatten)]
    pub individual: SimpleIndividual,
    pub grade: i32,
}

impl Identified for SimpleStudent {
    fn id(&self) -> &str {
        &self.individual.id
    }
}

pub type SimpleList = BTreeMap<String, SimpleIndividual>;

pub type SimpleSectionList = BTreeMap<String, SectionIndividual>;
