//! Scheduled and triggered background tasks.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::wire::present;
use crate::utils::parse_date;

string_enum! {
    pub enum RepeatFrequency {
        Daily = "daily",
        Weekdays = "weekdays",
        Weekly = "weekly",
        Monthly = "monthly",
    }
}

string_enum! {
    pub enum TaskStatus {
        Scheduled = "scheduled",
        Complete = "complete",
        Error = "error",
    }
}

string_enum! {
    /// Record types whose creation can trigger a task.
    pub enum CreateTrigger {
        Section = "Section",
        Student = "Student",
        Course = "Course",
        StaffMember = "StaffMember",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "camelCase")]
pub struct RepeatedTask {
    #[serde(rename = "ID")]
    pub id: String,
    pub repeat_frequency: RepeatFrequency,
    pub function_name: String,
    pub active: bool,
    pub start_date: String,
    pub end_date: String,
    pub options: Value,
}

impl RepeatedTask {
    /// Active and, when both bounds parse, within its date window.
    pub fn runs_on(&self, day: chrono::NaiveDate) -> bool {
        if !self.active {
            return false;
        }
        let after_start = parse_date(&self.start_date).map_or(true, |start| start <= day);
        let before_end = parse_date(&self.end_date).map_or(true, |end| day <= end);
        after_start && before_end
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "camelCase")]
pub struct OneTimeTask {
    #[serde(rename = "ID")]
    pub id: String,
    pub status: TaskStatus,
    pub function_name: String,
    pub trigger_time: String,
    pub is_repeat: bool,
    #[serde(rename = "repeatID", default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub repeat_id: Option<String>,
    pub options: Value,
}

impl OneTimeTask {
    pub fn is_pending(&self) -> bool {
        self.status == TaskStatus::Scheduled
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct OnCreateTask {
    #[serde(rename = "type")]
    pub trigger: CreateTrigger,
}

/// Section-creation task; `type` is always `Section`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "camelCase")]
pub struct OnCreateSectionTask {
    #[serde(flatten)]
    pub task: OnCreateTask,
    /// Course IDs
    pub teachers_included_on_feedbacks: Vec<String>,
}

impl OnCreateSectionTask {
    pub fn new(teachers_included_on_feedbacks: Vec<String>) -> Self {
        Self {
            task: OnCreateTask {
                trigger: CreateTrigger::Section,
            },
            teachers_included_on_feedbacks,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_repeated_task_window() {
        let mut task: RepeatedTask = serde_json::from_value(json!({
            "ID": "rt-1", "repeatFrequency": "weekdays", "functionName": "sendAttendanceDigest",
            "active": true, "startDate": "2024-09-01", "endDate": "2025-06-01",
            "options": {"school": "OFS-US"}
        }))
        .unwrap();
        let day = |s| parse_date(s).unwrap();
        assert!(task.runs_on(day("2024-10-01")));
        assert!(!task.runs_on(day("2025-07-01")));
        task.end_date = String::new();
        assert!(task.runs_on(day("2025-07-01")));
        task.active = false;
        assert!(!task.runs_on(day("2024-10-01")));
    }

    #[test]
    fn test_one_time_task_optional_repeat_id() {
        let task: OneTimeTask = serde_json::from_value(json!({
            "ID": "ot-1", "status": "scheduled", "functionName": "archiveSections",
            "triggerTime": "2025-06-10T04:00:00Z", "isRepeat": false, "options": null
        }))
        .unwrap();
        assert!(task.is_pending());
        assert_eq!(task.repeat_id, None);
        assert_eq!(task.options, Value::Null);
    }

    #[test]
    fn test_on_create_section_task() {
        let task = OnCreateSectionTask::new(vec!["ENG-9".to_string()]);
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value, json!({"type": "Section", "teachersIncludedOnFeedbacks": ["ENG-9"]}));

        let base: OnCreateTask = serde_json::from_value(value).unwrap();
        assert_eq!(base.trigger, CreateTrigger::Section);

        let base_only = json!({"type": "Course"});
        assert!(serde_json::from_value::<OnCreateTask>(base_only.clone()).is_ok());
        assert!(serde_json::from_value::<OnCreateSectionTask>(base_only).is_err());
    }
}
