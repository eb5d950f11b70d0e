//! Students, staff, and the name/address blocks they share.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::wire::present;
use crate::utils::parse_date;

string_enum! {
    /// Permission tags granted to staff accounts.
    pub enum Role {
        Any = "any",
        // Admin roles
        SuperAdmin = "superAdmin",
        RegistrarLabelAdmin = "registrarLabelAdmin",
        StaffManagementAdmin = "staffManagementAdmin",
        StudentManagementAdmin = "studentManagementAdmin",
        ScheduleAdmin = "scheduleAdmin",
        SectionAdmin = "sectionAdmin",
        CourseAdmin = "courseAdmin",
        RegistrarReportingAdmin = "registrarReportingAdmin",
        ReportCardAdmin = "reportCardAdmin",
        FeedbackManagementAdmin = "feedbackManagementAdmin",
        // Feedback
        FeedbackProcessor = "feedbackProcessor",
        FeedbackViewer = "feedbackViewer",
        FeedbackReminder = "feedbackReminder",
        // Report cards
        TranscriptAdmin = "transcriptAdmin",
        ClassroomTeacher = "classroomTeacher",
        Coach = "coach",
        // Labels
        LabelAdmin = "labelAdmin",
        LabelUser = "labelUser",
        // Student management
        StudentInfoEdit = "studentInfoEdit",
        StudentImport = "studentImport",
        StudentStatusEdit = "studentStatusEdit",
    }
}

string_enum! {
    /// Why a student or relation left the school.
    pub enum DepartureType {
        Dismissed = "dismissed",
        Graduated = "graduated",
        MidYearWithdrawl = "mid-year withdrawl",
        NotReturning = "not returning",
        NotInvitedBack = "not invited back",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "camelCase")]
pub struct Name {
    pub first_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub middle_name: Option<String>,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub suffix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub nick_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub title: Option<String>,
}

impl Name {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            middle_name: None,
            last_name: last_name.into(),
            suffix: None,
            nick_name: None,
            title: None,
        }
    }

    /// "First Middle Last Suffix", skipping empty parts
    pub fn full_name(&self) -> String {
        [
            Some(self.first_name.as_str()),
            self.middle_name.as_deref(),
            Some(self.last_name.as_str()),
            self.suffix.as_deref(),
        ]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }

    /// "Last, First (Nick)" for sorted rosters; the nickname is shown only when it differs
    pub fn display_name(&self) -> String {
        let nick = self
            .nick_name
            .as_deref()
            .filter(|n| !n.is_empty() && *n != self.first_name);
        match nick {
            Some(n) => format!("{}, {} ({})", self.last_name, self.first_name, n),
            None => format!("{}, {}", self.last_name, self.first_name),
        }
    }

    pub fn short_name(&self) -> String {
        let first = self
            .nick_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.first_name);
        format!("{} {}", first, self.last_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub city: String,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub district: Option<String>,
    pub postal: String,
    pub state: String,
    pub street1: String,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub street2: Option<String>,
    #[serde(rename = "type")]
    pub address_type: String,
}

impl Address {
    /// Format the address as a single line.
    pub fn formatted(&self) -> Option<String> {
        let street: Vec<&str> = [Some(self.street1.as_str()), self.street2.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        let city = self.city.trim();
        if street.is_empty() && city.is_empty() {
            return None;
        }

        let mut parts = Vec::new();
        if !street.is_empty() {
            parts.push(street.join(" "));
        }
        if !city.is_empty() {
            parts.push(city.to_string());
        }
        let region = format!("{} {}", self.state.trim(), self.postal.trim());
        if !region.trim().is_empty() {
            parts.push(region.trim().to_string());
        }
        if !self.country.trim().is_empty() {
            parts.push(self.country.trim().to_string());
        }
        Some(parts.join(", "))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct PermissionsObj {
    #[serde(rename = "type")]
    pub permission_type: String,
    pub allowed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub restriction: Option<String>,
}

/// Off-campus travel permissions on file for a student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct Permissions {
    pub home: PermissionsObj,
    pub bike: PermissionsObj,
    pub walk: PermissionsObj,
    pub car: PermissionsObj,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "camelCase")]
pub struct Departure {
    pub departure_date: String,
    pub departure_reason: DepartureType,
}

/// One continuous enrollment period, closed by a departure once the student leaves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub enrollment_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub departure: Option<Departure>,
}

impl Enrollment {
    pub fn start_date(&self) -> Option<NaiveDate> {
        parse_date(&self.enrollment_date)
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.departure
            .as_ref()
            .and_then(|d| parse_date(&d.departure_date))
    }

    pub fn is_open(&self) -> bool {
        self.departure.is_none()
    }

    /// True when `day` falls on or after the enrollment date and before the departure.
    pub fn covers(&self, day: NaiveDate) -> bool {
        let Some(start) = self.start_date() else {
            return false;
        };
        if day < start {
            return false;
        }
        match (&self.departure, self.end_date()) {
            (None, _) => true,
            (Some(_), Some(end)) => day < end,
            // A departure with an unreadable date still closes the period
            (Some(_), None) => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub address: Address,
    pub birth_date: String,
    pub boarder: String,
    pub class_of: i32,
    pub current_school: String,
    pub current_student: bool,
    pub email: String,
    pub gender: String,
    #[serde(rename = "ID")]
    pub id: String,
    pub name_obj: Name,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub cell_phone: Option<String>,
    pub feedback_emails: Vec<String>,
    pub permissions: Permissions,
    pub enrolled_years: Vec<String>,
    pub enrollments: Vec<Enrollment>,
}

impl Student {
    pub fn date_of_birth(&self) -> Option<NaiveDate> {
        parse_date(&self.birth_date)
    }

    /// The most recent enrollment that has not ended.
    pub fn current_enrollment(&self) -> Option<&Enrollment> {
        self.enrollments.iter().rev().find(|e| e.is_open())
    }

    /// The most recent departure on record, if any.
    pub fn last_departure(&self) -> Option<&Departure> {
        self.enrollments
            .iter()
            .rev()
            .find_map(|e| e.departure.as_ref())
    }

    pub fn is_enrolled_on(&self, day: NaiveDate) -> bool {
        self.enrollments.iter().any(|e| e.covers(day))
    }

    pub fn was_enrolled_in(&self, academic_year: &str) -> bool {
        self.enrolled_years.iter().any(|y| y == academic_year)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "camelCase")]
pub struct StaffMember {
    pub name_obj: Name,
    pub name: String,
    pub email: String,
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub cell_phone: Option<String>,
    pub current_staff: bool,
    pub roles: Vec<Role>,
}

impl StaffMember {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    pub fn has_any_role(&self, roles: &[Role]) -> bool {
        roles.iter().any(|r| self.has_role(*r))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enrollment(start: &str, departed: Option<&str>) -> Enrollment {
        Enrollment {
            enrollment_date: start.to_string(),
            departure: departed.map(|d| Departure {
                departure_date: d.to_string(),
                departure_reason: DepartureType::NotReturning,
            }),
        }
    }

    fn day(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_name_formats() {
        let mut name = Name::new("Margaret", "Hollins");
        name.middle_name = Some("Ann".to_string());
        name.nick_name = Some("Meg".to_string());
        assert_eq!(name.full_name(), "Margaret Ann Hollins");
        assert_eq!(name.display_name(), "Hollins, Margaret (Meg)");
        assert_eq!(name.short_name(), "Meg Hollins");

        name.nick_name = Some("Margaret".to_string());
        assert_eq!(name.display_name(), "Hollins, Margaret");
    }

    #[test]
    fn test_name_optional_fields_absent_on_output() {
        let json = serde_json::to_value(Name::new("Ada", "Lovelace")).unwrap();
        assert_eq!(json, serde_json::json!({"firstName": "Ada", "lastName": "Lovelace"}));
    }

    #[test]
    fn test_address_formatted() {
        let address = Address {
            city: "Barnesville".to_string(),
            country: "USA".to_string(),
            district: None,
            postal: "43713".to_string(),
            state: "OH".to_string(),
            street1: "61830 Sandy Ridge Rd".to_string(),
            street2: None,
            address_type: "home".to_string(),
        };
        assert_eq!(
            address.formatted().as_deref(),
            Some("61830 Sandy Ridge Rd, Barnesville, OH 43713, USA")
        );

        let blank = Address {
            city: String::new(),
            street1: " ".to_string(),
            ..address
        };
        assert_eq!(blank.formatted(), None);
    }

    #[test]
    fn test_enrollment_covers() {
        let open = enrollment("2022-08-20", None);
        assert!(open.covers(day("2022-08-20")));
        assert!(open.covers(day("2030-01-01")));
        assert!(!open.covers(day("2022-08-19")));

        let closed = enrollment("2022-08-20", Some("2023-01-15"));
        assert!(closed.covers(day("2023-01-14")));
        assert!(!closed.covers(day("2023-01-15")));
    }

    #[test]
    fn test_student_enrollment_queries() {
        let json = serde_json::json!({
            "address": {"city": "Barnesville", "country": "USA", "postal": "43713",
                        "state": "OH", "street1": "1 Main St", "type": "home"},
            "birthDate": "2008-04-02",
            "boarder": "Boarding",
            "classOf": 2026,
            "currentSchool": "OFS-US",
            "currentStudent": true,
            "email": "jdoe@example.org",
            "gender": "F",
            "ID": "stu-1",
            "nameObj": {"firstName": "Jane", "lastName": "Doe"},
            "name": "Jane Doe",
            "feedbackEmails": ["parent@example.org"],
            "permissions": {
                "home": {"type": "home", "allowed": true},
                "bike": {"type": "bike", "allowed": false, "restriction": "helmet"},
                "walk": {"type": "walk", "allowed": true},
                "car": {"type": "car", "allowed": false}
            },
            "enrolledYears": ["2021-2022", "2023-2024"],
            "enrollments": [
                {"enrollmentDate": "2021-08-20",
                 "departure": {"departureDate": "2022-06-01", "departureReason": "mid-year withdrawl"}},
                {"enrollmentDate": "2023-08-20"}
            ]
        });
        let student: Student = serde_json::from_value(json).unwrap();

        assert_eq!(student.date_of_birth(), Some(day("2008-04-02")));
        assert_eq!(
            student.current_enrollment().map(|e| e.enrollment_date.as_str()),
            Some("2023-08-20")
        );
        assert_eq!(
            student.last_departure().map(|d| d.departure_reason),
            Some(DepartureType::MidYearWithdrawl)
        );
        assert!(student.is_enrolled_on(day("2022-01-10")));
        assert!(!student.is_enrolled_on(day("2022-12-01")));
        assert!(student.is_enrolled_on(day("2024-02-01")));
        assert!(student.was_enrolled_in("2021-2022"));
        assert!(!student.was_enrolled_in("2022-2023"));
    }

    #[test]
    fn test_staff_roles() {
        let staff: StaffMember = serde_json::from_value(serde_json::json!({
            "nameObj": {"firstName": "Ruth", "lastName": "Penn"},
            "name": "Ruth Penn",
            "email": "rpenn@example.org",
            "ID": "staff-9",
            "currentStaff": true,
            "roles": ["classroomTeacher", "feedbackManagementAdmin"]
        }))
        .unwrap();
        assert!(staff.has_role(Role::ClassroomTeacher));
        assert!(!staff.has_role(Role::SuperAdmin));
        assert!(staff.has_any_role(&[Role::Coach, Role::FeedbackManagementAdmin]));
    }

    #[test]
    fn test_staff_rejects_unknown_role() {
        let result = serde_json::from_value::<StaffMember>(serde_json::json!({
            "nameObj": {"firstName": "Ruth", "lastName": "Penn"},
            "name": "Ruth Penn",
            "email": "rpenn@example.org",
            "ID": "staff-9",
            "currentStaff": true,
            "roles": ["SuperAdmin"]
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_role_literals_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for role in Role::ALL {
            assert!(seen.insert(role.as_str()), "duplicate role {role}");
        }
        assert_eq!(Role::ALL.len(), 22);
    }
}
