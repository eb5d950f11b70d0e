//! Bell schedule: periods and schedule days.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::academic::{School, SchoolBoolean, TermList};
use super::wire::present;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "camelCase")]
pub struct PeriodMetaItem {
    pub period: String,
    pub school: SchoolBoolean,
    pub terms: TermList,
    pub advisor: bool,
    pub academic_year: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "camelCase")]
pub struct PeriodObj {
    pub period: String,
    pub start: String,
    pub end: String,
    pub school: SchoolBoolean,
    pub terms: TermList,
    pub advisor: bool,
    pub academic_year: String,
}

impl PeriodObj {
    /// The period without its clock times.
    pub fn meta(&self) -> PeriodMetaItem {
        PeriodMetaItem {
            period: self.period.clone(),
            school: self.school,
            terms: self.terms,
            advisor: self.advisor,
            academic_year: self.academic_year.clone(),
        }
    }

    pub fn meets_for(&self, school: School) -> bool {
        self.school.includes(school)
    }
}

pub type PeriodList = BTreeMap<String, PeriodObj>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDay {
    #[serde(rename = "dayID", default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub day_id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub date: Option<String>,
    pub periods: PeriodList,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub is_closed: Option<bool>,
    pub school: School,
    pub academic_year: String,
    pub terms: TermList,
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub day_name: Option<String>,
}

impl ScheduleDay {
    pub fn is_closed(&self) -> bool {
        self.is_closed == Some(true)
    }

    /// Periods in schedule order (by start time string, then period key).
    pub fn ordered_periods(&self) -> Vec<&PeriodObj> {
        let mut periods: Vec<&PeriodObj> = self.periods.values().collect();
        periods.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.period.cmp(&b.period)));
        periods
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn period(name: &str, start: &str) -> serde_json::Value {
        json!({
            "period": name, "start": start, "end": "15:00",
            "school": {"OFS-US": true}, "terms": {"T1": true},
            "advisor": false, "academicYear": "2024-2025"
        })
    }

    #[test]
    fn test_schedule_day_periods_ordered() {
        let day: ScheduleDay = serde_json::from_value(json!({
            "dayID": 3,
            "periods": {"C": period("C", "10:40"), "A": period("A", "08:15"), "B": period("B", "09:30")},
            "school": "OFS-US",
            "academicYear": "2024-2025",
            "terms": {"T1": true},
            "ID": "2024-09-04-US"
        }))
        .unwrap();
        assert!(!day.is_closed());
        assert_eq!(day.date, None);
        let order: Vec<&str> = day.ordered_periods().iter().map(|p| p.period.as_str()).collect();
        assert_eq!(order, vec!["A", "B", "C"]);
        assert!(day.periods["A"].meets_for(School::UpperSchool));
        assert!(!day.periods["A"].meets_for(School::MiddleSchool));
    }

    #[test]
    fn test_period_meta_drops_times() {
        let obj: PeriodObj = serde_json::from_value(period("A", "08:15")).unwrap();
        let meta = serde_json::to_value(obj.meta()).unwrap();
        assert!(meta.get("start").is_none());
        assert_eq!(meta["period"], "A");
    }

    #[test]
    fn test_time_range() {
        let range: TimeRange = serde_json::from_value(json!({
            "start": "2024-09-04T08:15:00Z",
            "end": "2024-09-04T09:05:00Z"
        }))
        .unwrap();
        assert_eq!(range.duration(), Duration::minutes(50));
        assert!(range.contains(range.start + Duration::minutes(10)));
        assert!(!range.contains(range.end + Duration::seconds(1)));
    }
}
