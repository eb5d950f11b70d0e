//! Audit-log entries describing changes to sections and other records.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::academic::Section;
use super::individual::SimpleIndividual;
use super::wire::{has_any, present};

string_enum! {
    pub enum SectionChangeType {
        StudentWithdrawl = "student-withdrawl",
        StudentEnrollment = "student-enrollment",
        StudentRemoval = "student-removal",
        TeacherAdded = "teacher-added",
        TeacherRemoved = "teacher-removed",
        NameChanged = "name-changed",
        SchoolChanged = "school-changed",
        PeriodChanged = "period-changed",
        TermsChanged = "terms-changed",
        SectionCreated = "section-created",
        SectionDeleted = "section-deleted",
        RoomChanged = "room-changed",
    }
}

impl SectionChangeType {
    /// Changes that concern a person joining or leaving the section.
    pub fn concerns_individual(&self) -> bool {
        matches!(
            self,
            SectionChangeType::StudentWithdrawl
                | SectionChangeType::StudentEnrollment
                | SectionChangeType::StudentRemoval
                | SectionChangeType::TeacherAdded
                | SectionChangeType::TeacherRemoved
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct SectionIndividualChange {
    #[serde(rename = "sectionID")]
    pub section_id: String,
    #[serde(rename = "type")]
    pub change_type: SectionChangeType,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub individual: Option<SimpleIndividual>,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "camelCase")]
pub struct SectionPropChange {
    #[serde(rename = "type")]
    pub change_type: SectionChangeType,
    #[serde(rename = "sectionID")]
    pub section_id: String,
    pub date: String,
    pub property: String,
    pub previous_value: Value,
    pub new_value: Value,
}

/// One entry of `SectionUpdate::changes`.
///
/// An entry carrying any of `property`, `previousValue` or `newValue` is a
/// property change and must be complete; anything else is read as an
/// individual change.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(untagged)]
pub enum SectionChange {
    Property(SectionPropChange),
    Individual(SectionIndividualChange),
}

impl SectionChange {
    pub fn section_id(&self) -> &str {
        match self {
            SectionChange::Property(change) => &change.section_id,
            SectionChange::Individual(change) => &change.section_id,
        }
    }

    pub fn change_type(&self) -> SectionChangeType {
        match self {
            SectionChange::Property(change) => change.change_type,
            SectionChange::Individual(change) => change.change_type,
        }
    }

    pub fn date(&self) -> &str {
        match self {
            SectionChange::Property(change) => &change.date,
            SectionChange::Individual(change) => &change.date,
        }
    }
}

impl<'de> Deserialize<'de> for SectionChange {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        if has_any(&value, &["property", "previousValue", "newValue"]) {
            serde_json::from_value(value).map(SectionChange::Property)
        } else {
            serde_json::from_value(value).map(SectionChange::Individual)
        }
        .map_err(D::Error::custom)
    }
}

impl From<SectionPropChange> for SectionChange {
    fn from(change: SectionPropChange) -> Self {
        SectionChange::Property(change)
    }
}

impl From<SectionIndividualChange> for SectionChange {
    fn from(change: SectionIndividualChange) -> Self {
        SectionChange::Individual(change)
    }
}

/// A section snapshot with the changes applied to reach it.
/// `changes` holds either property changes or individual changes, never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct SectionUpdate {
    pub section: Section,
    pub changes: Vec<SectionChange>,
}

impl SectionUpdate {
    /// True when every change is of the same variant (vacuously true when empty).
    pub fn is_homogeneous(&self) -> bool {
        let properties = self
            .changes
            .iter()
            .filter(|c| matches!(c, SectionChange::Property(_)))
            .count();
        properties == 0 || properties == self.changes.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "camelCase")]
pub struct PropUpdate {
    pub prop_name: String,
    pub prop_value: Value,
}

/// A batch of property writes against one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct RecordUpdate {
    #[serde(rename = "ID")]
    pub id: String,
    pub updates: Vec<PropUpdate>,
}

impl RecordUpdate {
    pub fn value_of(&self, prop_name: &str) -> Option<&Value> {
        self.updates
            .iter()
            .rev()
            .find(|u| u.prop_name == prop_name)
            .map(|u| &u.prop_value)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_section_change_variants() {
        let prop: SectionChange = serde_json::from_value(json!({
            "type": "period-changed", "sectionID": "sec-1", "date": "2024-09-04",
            "property": "period", "previousValue": "B", "newValue": "C"
        }))
        .unwrap();
        assert!(matches!(prop, SectionChange::Property(ref c) if c.new_value == json!("C")));
        assert_eq!(prop.change_type(), SectionChangeType::PeriodChanged);

        let person: SectionChange = serde_json::from_value(json!({
            "type": "student-enrollment", "sectionID": "sec-1", "date": "2024-09-04",
            "individual": {"ID": "s1", "name": "Jane Doe"}
        }))
        .unwrap();
        assert!(matches!(person, SectionChange::Individual(_)));
        assert!(person.change_type().concerns_individual());
        assert_eq!(person.section_id(), "sec-1");
    }

    #[test]
    fn test_prop_change_keeps_null_values() {
        let value = json!({
            "type": "room-changed", "sectionID": "sec-1", "date": "2024-09-04",
            "property": "room", "previousValue": null, "newValue": {"ID": "r1", "name": "Room 1"}
        });
        let change: SectionPropChange = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(change.previous_value, Value::Null);
        assert_eq!(serde_json::to_value(&change).unwrap(), value);
    }

    #[test]
    fn test_prop_change_requires_values() {
        let result = serde_json::from_value::<SectionPropChange>(json!({
            "type": "room-changed", "sectionID": "sec-1", "date": "2024-09-04", "property": "room"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_incomplete_property_change_is_rejected() {
        let result = serde_json::from_value::<SectionChange>(json!({
            "type": "period-changed", "sectionID": "sec-1", "date": "2024-09-04",
            "property": "period", "previousValue": "A"
        }));
        let err = result.unwrap_err();
        assert!(err.to_string().contains("newValue"), "{err}");

        let result = serde_json::from_value::<SectionChange>(json!({
            "type": "period-changed", "sectionID": "sec-1", "date": "2024-09-04",
            "previousValue": "A", "newValue": "B"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_record_update_latest_value_wins() {
        let update: RecordUpdate = serde_json::from_value(json!({
            "ID": "s1",
            "updates": [
                {"propName": "boarder", "propValue": "Day"},
                {"propName": "classOf", "propValue": 2026},
                {"propName": "boarder", "propValue": "Boarding"}
            ]
        }))
        .unwrap();
        assert_eq!(update.value_of("boarder"), Some(&json!("Boarding")));
        assert_eq!(update.value_of("classOf"), Some(&json!(2026)));
        assert_eq!(update.value_of("email"), None);
    }
}
