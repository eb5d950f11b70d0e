//! Report cards and teacher feedback.

use serde::{Deserialize, Serialize};

use super::academic::{School, SimpleSection};
use super::individual::{SimpleIndividual, SimpleStudent};
use super::wire::present;

string_enum! {
    /// Letter and pass/fail marks.
    pub enum Grade {
        APlus = "A+",
        A = "A",
        AMinus = "A-",
        BPlus = "B+",
        B = "B",
        BMinus = "B-",
        CPlus = "C+",
        C = "C",
        CMinus = "C-",
        DPlus = "D+",
        D = "D",
        DMinus = "D-",
        F = "F",
        Pass = "P",
        Incomplete = "I",
        Credit = "CR",
    }
}

string_enum! {
    /// Grading-period columns: mid-term and end-of-term marks plus the year mark.
    pub enum MarkingColumn {
        Mt1 = "MT1",
        T1 = "T1",
        Mt2 = "MT2",
        T2 = "T2",
        Mt3 = "MT3",
        T3 = "T3",
        Year = "Year",
    }
}

impl MarkingColumn {
    pub fn is_midterm(&self) -> bool {
        matches!(self, MarkingColumn::Mt1 | MarkingColumn::Mt2 | MarkingColumn::Mt3)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "camelCase")]
pub struct ClassReport {
    #[serde(rename = "ID")]
    pub id: String,
    pub section: SimpleSection,
    pub mark: Grade,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub comment: Option<String>,
    pub student: SimpleStudent,
    pub academic_year: String,
    pub marking_column: MarkingColumn,
    pub school: School,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "camelCase")]
pub struct ClassNote {
    #[serde(rename = "courseID")]
    pub course_id: String,
    pub marking_column: MarkingColumn,
    pub academic_year: String,
    pub note: String,
    #[serde(rename = "ID")]
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct StudentReport {
    pub student: SimpleStudent,
    pub reports: Vec<ClassReport>,
}

impl StudentReport {
    pub fn reports_in(&self, column: MarkingColumn) -> impl Iterator<Item = &ClassReport> {
        self.reports.iter().filter(move |r| r.marking_column == column)
    }
}

/// A teacher comment about a student, reviewed before it is sent home.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "camelCase")]
pub struct FeedbackForm {
    pub course_name: String,
    pub period: String,
    #[serde(rename = "sectionID")]
    pub section_id: String,
    pub school: School,
    pub student: SimpleIndividual,
    pub date: String,
    pub comment: String,
    pub processed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub rejected: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub rejection_reason: Option<String>,
    pub teacher: SimpleIndividual,
    pub emails: Vec<String>,
    #[serde(rename = "ID")]
    pub id: String,
}

impl FeedbackForm {
    pub fn is_rejected(&self) -> bool {
        self.rejected == Some(true)
    }

    /// Not yet processed and not rejected.
    pub fn awaiting_review(&self) -> bool {
        !self.processed && !self.is_rejected()
    }
}

/// Sections a teacher still owes feedback for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct FeedbackReminder {
    pub sections: Vec<SimpleSection>,
    #[serde(rename = "ID")]
    pub id: String,
    pub name: String,
}
