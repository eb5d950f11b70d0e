//! Mailing labels and the saved cohorts used to generate them.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::wire::present;

string_enum! {
    pub enum LabelSetType {
        Current = "current",
        Archived = "archived",
    }
}

string_enum! {
    pub enum StudentType {
        International = "international",
        Domestic = "domestic",
    }
}

string_enum! {
    pub enum EnrollmentType {
        New = "new",
        Returning = "returning",
    }
}

string_enum! {
    pub enum BoardingStatus {
        Day = "Day",
        Boarding = "Boarding",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct Label {
    pub name: String,
    pub address: String,
}

/// Fields shared by every saved label set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "camelCase")]
pub struct LabelSet {
    pub user: String,
    pub name: String,
    #[serde(rename = "type")]
    pub set_type: LabelSetType,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub student_type: Option<StudentType>,
}

/// Families of currently enrolled students, filtered by grade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "camelCase")]
pub struct CurrentFamiliesLabelSet {
    #[serde(flatten)]
    pub set: LabelSet,
    pub grades: Vec<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub enrollment_type: Option<EnrollmentType>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub boarding_status: Option<BoardingStatus>,
}

/// Alumni families, filtered by graduating class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "camelCase")]
pub struct ArchivedLabeledSet {
    #[serde(flatten)]
    pub set: LabelSet,
    pub class_of: Vec<i32>,
}

/// A saved label set of either specialization, chosen by its `type` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(untagged)]
pub enum AnyLabelSet {
    Current(CurrentFamiliesLabelSet),
    Archived(ArchivedLabeledSet),
}

impl AnyLabelSet {
    pub fn set(&self) -> &LabelSet {
        match self {
            AnyLabelSet::Current(current) => &current.set,
            AnyLabelSet::Archived(archived) => &archived.set,
        }
    }

    pub fn set_type(&self) -> LabelSetType {
        match self {
            AnyLabelSet::Current(_) => LabelSetType::Current,
            AnyLabelSet::Archived(_) => LabelSetType::Archived,
        }
    }
}

impl<'de> Deserialize<'de> for AnyLabelSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let set_type = value
            .get("type")
            .cloned()
            .ok_or_else(|| D::Error::missing_field("type"))?;
        let set_type: LabelSetType = serde_json::from_value(set_type).map_err(D::Error::custom)?;
        match set_type {
            LabelSetType::Current => serde_json::from_value(value).map(AnyLabelSet::Current),
            LabelSetType::Archived => serde_json::from_value(value).map(AnyLabelSet::Archived),
        }
        .map_err(D::Error::custom)
    }
}
