//! Attendance marks, daily records, excusals and related logs.

use std::collections::BTreeMap;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::academic::Section;
use super::individual::SimpleIndividual;
use super::person::Student;
use super::schedule::PeriodObj;
use super::wire::{has_any, number, present};

string_enum! {
    pub enum AttendanceCode {
        AbsentExcused = "ABS-X",
        AbsentUnexcused = "ABS-U",
        Cut = "ABS-CUT",
        LateExcused = "LT-X",
        LateUnexcused = "LT-U",
        Nurse = "Nurse",
        Counselor = "Counselor",
        Absent = "ABS",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct AttendanceMark {
    pub code: AttendanceCode,
    pub comment: String,
    pub period: String,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub section: Option<String>,
}

/// A deferred server-side write standing in for a concrete value.
///
/// Encoded as an object tagged by `@fieldValue`, e.g. `{"@fieldValue": "delete"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(tag = "@fieldValue", rename_all = "camelCase")]
pub enum FieldValue {
    Delete,
    ServerTimestamp,
    ArrayUnion { elements: Vec<Value> },
    ArrayRemove { elements: Vec<Value> },
    Increment {
        #[serde(serialize_with = "number")]
        operand: f64,
    },
}

/// One slot of a `MarkList`: a resolved mark or a pending write.
///
/// Objects tagged with `@fieldValue` decode as `Pending`; all others must be
/// a valid mark.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(untagged)]
pub enum MarkEntry {
    Mark(AttendanceMark),
    Pending(FieldValue),
}

impl MarkEntry {
    pub fn mark(&self) -> Option<&AttendanceMark> {
        match self {
            MarkEntry::Mark(mark) => Some(mark),
            MarkEntry::Pending(_) => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, MarkEntry::Pending(_))
    }
}

impl<'de> Deserialize<'de> for MarkEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        if has_any(&value, &["@fieldValue"]) {
            serde_json::from_value(value).map(MarkEntry::Pending)
        } else {
            serde_json::from_value(value).map(MarkEntry::Mark)
        }
        .map_err(D::Error::custom)
    }
}

impl From<AttendanceMark> for MarkEntry {
    fn from(mark: AttendanceMark) -> Self {
        MarkEntry::Mark(mark)
    }
}

impl From<FieldValue> for MarkEntry {
    fn from(value: FieldValue) -> Self {
        MarkEntry::Pending(value)
    }
}

/// Marks keyed by period.
pub type MarkList = BTreeMap<String, MarkEntry>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct CalculatedExcusalPeriods {
    pub periods: MarkList,
    pub fields: Vec<FieldValue>,
}

/// One student's marks for one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    #[serde(rename = "ID")]
    pub id: String,
    pub name: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub is_boarder: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub is_all_day: Option<bool>,
    pub periods: MarkList,
}

impl AttendanceRecord {
    /// Resolved marks, skipping pending writes.
    pub fn marks(&self) -> impl Iterator<Item = &AttendanceMark> {
        self.periods.values().filter_map(MarkEntry::mark)
    }

    pub fn has_pending_writes(&self) -> bool {
        self.periods.values().any(MarkEntry::is_pending)
    }

    pub fn mark_for(&self, period: &str) -> Option<&AttendanceMark> {
        self.periods.get(period).and_then(MarkEntry::mark)
    }
}

/// An exemption from attendance over a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "camelCase")]
pub struct TimeExcusal {
    #[serde(rename = "ID")]
    pub id: String,
    pub name: String,
    pub start: String,
    pub end: String,
    pub comment: String,
    pub code: AttendanceCode,
    pub included_days: Vec<String>,
    pub edited: String,
    pub edited_by: String,
    pub uid: String,
}

impl TimeExcusal {
    pub fn includes_day(&self, date: &str) -> bool {
        self.included_days.iter().any(|d| d == date)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct TimeExcusalRequirements {
    pub student: Student,
    pub sections: Vec<Section>,
    pub schedules: Vec<Vec<PeriodObj>>,
}

/// Request for another teacher to cover a section's period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "camelCase")]
pub struct CoverageRequest {
    pub approval_type: String,
    pub covered_by: String,
    #[serde(rename = "sectionID")]
    pub section_id: String,
    pub period: String,
    pub section_name: String,
    pub teacher_name: String,
    pub teacher_email: String,
    pub date_string: String,
    pub email_sent: bool,
}

/// Dorm room inspection result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct InspectionRecord {
    pub reasons: String,
    pub dorm: String,
    pub datestring: String,
    #[serde(rename = "ID")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub uid: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "camelCase")]
pub struct NurseRecord {
    pub student: SimpleIndividual,
    pub date: String,
    pub time_in: String,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub time_out: Option<String>,
    pub checked_in: bool,
}

impl NurseRecord {
    /// Still in the nurse's office.
    pub fn is_open(&self) -> bool {
        self.checked_in && self.time_out.is_none()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_mark_list_mixes_marks_and_pending_writes() {
        let record: AttendanceRecord = serde_json::from_value(json!({
            "ID": "s1",
            "name": "Jane Doe",
            "date": "2024-09-04",
            "isBoarder": true,
            "periods": {
                "A": {"code": "LT-U", "comment": "bus", "period": "A"},
                "B": {"@fieldValue": "delete"},
                "C": {"code": "ABS-X", "comment": "", "period": "C", "section": "sec-1"}
            }
        }))
        .unwrap();

        assert!(record.has_pending_writes());
        assert_eq!(record.marks().count(), 2);
        assert_eq!(
            record.mark_for("A").map(|m| m.code),
            Some(AttendanceCode::LateUnexcused)
        );
        assert!(record.mark_for("B").is_none());
        assert_eq!(record.periods["B"], MarkEntry::Pending(FieldValue::Delete));
    }

    #[test]
    fn test_field_value_encoding() {
        let cases = vec![
            (FieldValue::Delete, json!({"@fieldValue": "delete"})),
            (FieldValue::ServerTimestamp, json!({"@fieldValue": "serverTimestamp"})),
            (
                FieldValue::ArrayUnion { elements: vec![json!("2024-09-04")] },
                json!({"@fieldValue": "arrayUnion", "elements": ["2024-09-04"]}),
            ),
            (
                FieldValue::Increment { operand: 1.0 },
                json!({"@fieldValue": "increment", "operand": 1}),
            ),
            (
                FieldValue::Increment { operand: 0.25 },
                json!({"@fieldValue": "increment", "operand": 0.25}),
            ),
        ];
        for (value, expected) in cases {
            assert_eq!(serde_json::to_value(&value).unwrap(), expected);
            assert_eq!(serde_json::from_value::<FieldValue>(expected).unwrap(), value);
        }
    }

    #[test]
    fn test_unknown_mark_shape_rejected() {
        let result = serde_json::from_value::<MarkEntry>(json!({"code": "TARDY", "comment": "", "period": "A"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_tagged_slot_must_be_valid_field_value() {
        let result = serde_json::from_value::<MarkEntry>(json!({
            "@fieldValue": "truncate", "code": "ABS", "comment": "", "period": "A"
        }));
        assert!(result.is_err());

        let result = serde_json::from_value::<MarkEntry>(json!({"@fieldValue": "increment"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_nurse_record_open() {
        let record: NurseRecord = serde_json::from_value(json!({
            "student": {"ID": "s1", "name": "Jane Doe"},
            "date": "2024-09-04",
            "timeIn": "10:12",
            "reason": "headache",
            "checkedIn": true
        }))
        .unwrap();
        assert!(record.is_open());
    }
}
