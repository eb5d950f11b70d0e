//! Courses, sections, terms and academic years.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::individual::{keyed, SectionIndividual, SimpleIndividual, SimpleList, SimpleSectionList};
use super::wire::{number, present};
use crate::error::SchemaError;
use crate::utils::{format_date, parse_date};

string_enum! {
    /// Campus codes.
    pub enum School {
        UpperSchool = "OFS-US",
        MiddleSchool = "OFS-MS",
    }
}

string_enum! {
    /// Which students a course requirement applies to.
    pub enum Requirement {
        International = "international",
        All = "all",
    }
}

string_enum! {
    /// The three terms of an academic year.
    pub enum TermKey {
        T1 = "T1",
        T2 = "T2",
        T3 = "T3",
    }
}

/// Per-campus flags; absent means the campus is not addressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct SchoolBoolean {
    #[serde(
        rename = "OFS-US",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present"
    )]
    pub upper_school: Option<bool>,
    #[serde(
        rename = "OFS-MS",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present"
    )]
    pub middle_school: Option<bool>,
}

impl SchoolBoolean {
    pub fn get(&self, school: School) -> Option<bool> {
        match school {
            School::UpperSchool => self.upper_school,
            School::MiddleSchool => self.middle_school,
        }
    }

    pub fn includes(&self, school: School) -> bool {
        self.get(school) == Some(true)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "camelCase")]
pub struct Prerequisite {
    #[serde(rename = "courseID")]
    pub course_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub min_grade: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "camelCase")]
pub struct Course {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "courseID")]
    pub course_id: String,
    pub name: String,
    pub department: String,
    #[serde(serialize_with = "number")]
    pub term_length: f64,
    #[serde(serialize_with = "number")]
    pub credit: f64,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub requirement: Option<Vec<Requirement>>,
    pub can_retake_for_credit: bool,
    pub active: bool,
    pub school: School,
    pub prerequisites: Vec<Prerequisite>,
}

impl Course {
    pub fn is_required_for(&self, requirement: Requirement) -> bool {
        self.requirement
            .as_ref()
            .is_some_and(|reqs| reqs.contains(&requirement))
    }
}

/// A +1/-1 adjustment to a section's head count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i8", into = "i8")]
pub enum SectionCountDelta {
    Decrement,
    Increment,
}

impl TryFrom<i8> for SectionCountDelta {
    type Error = String;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(SectionCountDelta::Decrement),
            1 => Ok(SectionCountDelta::Increment),
            other => Err(format!("section count delta must be -1 or 1, got {}", other)),
        }
    }
}

impl From<SectionCountDelta> for i8 {
    fn from(delta: SectionCountDelta) -> Self {
        match delta {
            SectionCountDelta::Decrement => -1,
            SectionCountDelta::Increment => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct SectionCountType {
    #[serde(rename = "sectionID")]
    pub section_id: String,
    #[cfg_attr(feature = "ts", ts(type = "-1 | 1"))]
    pub value: SectionCountDelta,
}

/// Which terms an entity applies to. An absent flag means "not applicable", not false.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct TermList {
    #[serde(rename = "T1", default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub t1: Option<bool>,
    #[serde(rename = "T2", default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub t2: Option<bool>,
    #[serde(rename = "T3", default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub t3: Option<bool>,
}

impl TermList {
    /// A list flagging exactly the given terms as `true`.
    pub fn from_keys(keys: impl IntoIterator<Item = TermKey>) -> Self {
        let mut list = TermList::default();
        for key in keys {
            list.set(key, true);
        }
        list
    }

    pub fn get(&self, key: TermKey) -> Option<bool> {
        match key {
            TermKey::T1 => self.t1,
            TermKey::T2 => self.t2,
            TermKey::T3 => self.t3,
        }
    }

    pub fn set(&mut self, key: TermKey, value: bool) {
        let slot = match key {
            TermKey::T1 => &mut self.t1,
            TermKey::T2 => &mut self.t2,
            TermKey::T3 => &mut self.t3,
        };
        *slot = Some(value);
    }

    pub fn contains(&self, key: TermKey) -> bool {
        self.get(key) == Some(true)
    }

    /// Terms flagged `true`, in order.
    pub fn keys(&self) -> Vec<TermKey> {
        TermKey::ALL
            .iter()
            .copied()
            .filter(|key| self.contains(*key))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct Term {
    pub name: String,
    pub start: String,
    pub end: String,
}

impl Term {
    pub fn start_date(&self) -> Option<NaiveDate> {
        parse_date(&self.start)
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        parse_date(&self.end)
    }

    /// Inclusive on both ends; false when either bound is unreadable
    pub fn contains(&self, day: NaiveDate) -> bool {
        match (self.start_date(), self.end_date()) {
            (Some(start), Some(end)) => start <= day && day <= end,
            _ => false,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} - {})",
            self.name,
            format_date(&self.start),
            format_date(&self.end)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct AcademicYear {
    pub year: String,
    #[serde(rename = "T1")]
    pub t1: Term,
    #[serde(rename = "T2")]
    pub t2: Term,
    #[serde(rename = "T3")]
    pub t3: Term,
}

impl AcademicYear {
    pub fn term(&self, key: TermKey) -> &Term {
        match key {
            TermKey::T1 => &self.t1,
            TermKey::T2 => &self.t2,
            TermKey::T3 => &self.t3,
        }
    }

    pub fn terms(&self) -> impl Iterator<Item = (TermKey, &Term)> {
        TermKey::ALL.iter().map(move |key| (*key, self.term(*key)))
    }

    /// The term whose dates contain `day`, if any.
    pub fn term_on(&self, day: NaiveDate) -> Option<TermKey> {
        self.terms()
            .find(|(_, term)| term.contains(day))
            .map(|(key, _)| key)
    }
}

/// A scheduled instance of a course for an academic year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "camelCase")]
pub struct Section {
    #[serde(rename = "ID")]
    pub id: String,
    pub period: String,
    pub teachers: SimpleList,
    pub students: SimpleSectionList,
    pub academic_year: String,
    pub name: String,
    #[serde(rename = "courseID")]
    pub course_id: String,
    pub section_num: i32,
    pub terms: TermList,
    pub room: SimpleIndividual,
    pub school: School,
    pub feedback_only: bool,
    pub year_long: bool,
}

impl Section {
    pub fn to_simple(&self) -> SimpleSection {
        SimpleSection {
            id: self.id.clone(),
            course_id: self.course_id.clone(),
            name: self.name.clone(),
            period: self.period.clone(),
            teachers: self.teachers.clone(),
            terms: self.terms,
        }
    }

    /// Students who have not withdrawn.
    pub fn enrolled_students(&self) -> impl Iterator<Item = &SectionIndividual> {
        self.students.values().filter(|s| !s.is_withdrawn())
    }

    pub fn teacher_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.teachers.values().map(|t| t.name.as_str()).collect();
        names.sort_unstable();
        names
    }

    pub fn has_teacher(&self, staff_id: &str) -> bool {
        self.teachers.contains_key(staff_id)
    }
}

/// A section as submitted for creation: people as arrays, terms by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "camelCase")]
pub struct NewSection {
    #[serde(rename = "ID")]
    pub id: String,
    pub period: String,
    pub teachers: Vec<SimpleIndividual>,
    pub students: Vec<SimpleIndividual>,
    pub academic_year: String,
    pub name: String,
    #[serde(rename = "courseID")]
    pub course_id: String,
    pub section_num: i32,
    pub terms: Vec<String>,
    pub room: SimpleIndividual,
    pub school: School,
    pub feedback_only: bool,
    pub year_long: bool,
}

impl NewSection {
    /// Convert into the stored `Section` shape, keying people by their own `ID`.
    /// Fails on a term name other than T1, T2 or T3.
    pub fn into_section(self) -> Result<Section, SchemaError> {
        let keys = self
            .terms
            .iter()
            .map(|term| {
                term.parse::<TermKey>()
                    .map_err(|_| SchemaError::UnknownTerm(term.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Section {
            id: self.id,
            period: self.period,
            teachers: keyed(self.teachers),
            students: keyed(self.students.into_iter().map(SectionIndividual::from)),
            academic_year: self.academic_year,
            name: self.name,
            course_id: self.course_id,
            section_num: self.section_num,
            terms: TermList::from_keys(keys),
            room: self.room,
            school: self.school,
            feedback_only: self.feedback_only,
            year_long: self.year_long,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct SimpleSection {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "courseID")]
    pub course_id: String,
    pub name: String,
    pub period: String,
    pub teachers: SimpleList,
    pub terms: TermList,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct CourseGroup {
    #[serde(rename = "ID")]
    pub id: String,
    pub name: String,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct PeriodGroup {
    #[serde(rename = "ID")]
    pub id: String,
    pub name: String,
    pub sections: Vec<Section>,
}
