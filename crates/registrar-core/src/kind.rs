//! Lookup of record shapes by wire type name.
//!
//! Lets untyped JSON be decoded, validated and normalized when the record
//! type is only known at runtime, e.g. from a command-line argument.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::SchemaError;
use crate::models::*;
use crate::validate::{Report, Validate};

/// Result of checking one record against its kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Checked {
    pub kind: RecordKind,
    pub report: Report,
    /// The record re-encoded from its typed form
    pub normalized: Value,
}

impl Checked {
    pub fn is_valid(&self) -> bool {
        self.report.is_valid()
    }
}

macro_rules! record_kinds {
    ($($variant:ident = $name:literal => $ty:ty),+ $(,)?) => {
        /// Every record shape, named as on the wire.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum RecordKind {
            $($variant),+
        }

        impl RecordKind {
            pub const ALL: &'static [RecordKind] = &[$(RecordKind::$variant),+];

            pub fn name(&self) -> &'static str {
                match self {
                    $(RecordKind::$variant => $name),+
                }
            }

            /// Decode `value` as this kind, validate it and re-encode it.
            pub fn check(&self, value: Value) -> Result<Checked, SchemaError> {
                match self {
                    $(RecordKind::$variant => check_as::<$ty>(*self, value)),+
                }
            }
        }

        impl FromStr for RecordKind {
            type Err = SchemaError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(RecordKind::$variant),)+
                    _ => Err(SchemaError::UnknownKind(s.to_string())),
                }
            }
        }
    };
}

record_kinds! {
    // People
    Role = "Role" => Role,
    DepartureType = "DepartureType" => DepartureType,
    Name = "Name" => Name,
    Address = "Address" => Address,
    PermissionsObj = "PermissionsObj" => PermissionsObj,
    Permissions = "Permissions" => Permissions,
    Departure = "Departure" => Departure,
    Enrollment = "Enrollment" => Enrollment,
    Student = "Student" => Student,
    StaffMember = "StaffMember" => StaffMember,
    SimpleIndividual = "SimpleIndividual" => SimpleIndividual,
    SectionIndividual = "SectionIndividual" => SectionIndividual,
    SimpleEmailIndividual = "SimpleEmailIndividual" => SimpleEmailIndividual,
    SimpleStudent = "SimpleStudent" => SimpleStudent,
    SimpleList = "SimpleList" => SimpleList,
    SimpleSectionList = "SimpleSectionList" => SimpleSectionList,
    SimpleRelation = "SimpleRelation" => SimpleRelation,
    DepartedRelation = "DepartedRelation" => DepartedRelation,
    RelationList = "RelationList" => RelationList,
    RelationDepartureList = "RelationDepartureList" => RelationDepartureList,
    Relation = "Relation" => Relation,
    BooleanList = "BooleanList" => BooleanList,

    // Academics
    School = "School" => School,
    Requirement = "Requirement" => Requirement,
    TermKey = "TermKey" => TermKey,
    Course = "Course" => Course,
    Prerequisite = "Prerequisite" => Prerequisite,
    SectionCountType = "SectionCountType" => SectionCountType,
    Section = "Section" => Section,
    NewSection = "NewSection" => NewSection,
    SimpleSection = "SimpleSection" => SimpleSection,
    TermList = "TermList" => TermList,
    Term = "Term" => Term,
    AcademicYear = "AcademicYear" => AcademicYear,
    CourseGroup = "CourseGroup" => CourseGroup,
    PeriodGroup = "PeriodGroup" => PeriodGroup,
    SchoolBoolean = "SchoolBoolean" => SchoolBoolean,
    PeriodMetaItem = "PeriodMetaItem" => PeriodMetaItem,
    PeriodObj = "PeriodObj" => PeriodObj,
    PeriodList = "PeriodList" => PeriodList,
    ScheduleDay = "ScheduleDay" => ScheduleDay,
    TimeRange = "TimeRange" => TimeRange,

    // Attendance
    AttendanceCode = "AttendanceCode" => AttendanceCode,
    AttendanceMark = "AttendanceMark" => AttendanceMark,
    FieldValue = "FieldValue" => FieldValue,
    MarkList = "MarkList" => MarkList,
    CalculatedExcusalPeriods = "CalculatedExcusalPeriods" => CalculatedExcusalPeriods,
    AttendanceRecord = "AttendanceRecord" => AttendanceRecord,
    TimeExcusal = "TimeExcusal" => TimeExcusal,
    TimeExcusalRequirements = "TimeExcusalRequirements" => TimeExcusalRequirements,
    CoverageRequest = "CoverageRequest" => CoverageRequest,
    InspectionRecord = "InspectionRecord" => InspectionRecord,
    NurseRecord = "NurseRecord" => NurseRecord,

    // Reporting
    Grade = "Grade" => Grade,
    MarkingColumn = "MarkingColumn" => MarkingColumn,
    ClassReport = "ClassReport" => ClassReport,
    ClassNote = "ClassNote" => ClassNote,
    StudentReport = "StudentReport" => StudentReport,
    FeedbackForm = "FeedbackForm" => FeedbackForm,
    FeedbackReminder = "FeedbackReminder" => FeedbackReminder,

    // Change records
    SectionChangeType = "SectionChangeType" => SectionChangeType,
    SectionIndividualChange = "SectionIndividualChange" => SectionIndividualChange,
    SectionPropChange = "SectionPropChange" => SectionPropChange,
    SectionUpdate = "SectionUpdate" => SectionUpdate,
    PropUpdate = "PropUpdate" => PropUpdate,
    RecordUpdate = "RecordUpdate" => RecordUpdate,

    // Tasks
    RepeatFrequency = "RepeatFrequency" => RepeatFrequency,
    TaskStatus = "TaskStatus" => TaskStatus,
    CreateTrigger = "CreateTrigger" => CreateTrigger,
    RepeatedTask = "RepeatedTask" => RepeatedTask,
    OneTimeTask = "OneTimeTask" => OneTimeTask,
    OnCreateTask = "OnCreateTask" => OnCreateTask,
    OnCreateSectionTask = "onCreateSectionTask" => OnCreateSectionTask,

    // Labels
    LabelSetType = "LabelSetType" => LabelSetType,
    StudentType = "StudentType" => StudentType,
    EnrollmentType = "EnrollmentType" => EnrollmentType,
    BoardingStatus = "BoardingStatus" => BoardingStatus,
    Label = "Label" => Label,
    LabelSet = "LabelSet" => LabelSet,
    CurrentFamiliesLabelSet = "CurrentFamiliesLabelSet" => CurrentFamiliesLabelSet,
    ArchivedLabeledSet = "ArchivedLabeledSet" => ArchivedLabeledSet,
    AnyLabelSet = "AnyLabelSet" => AnyLabelSet,

    // Banking
    BankAccountType = "BankAccountType" => BankAccountType,
    BankTransaction = "BankTransaction" => BankTransaction,
    BankAccount = "BankAccount" => BankAccount,

    // Application
    ModuleInfo = "ModuleInfo" => ModuleInfo,
    MailgunOptions = "MailgunOptions" => MailgunOptions,
}

fn check_as<T>(kind: RecordKind, value: Value) -> Result<Checked, SchemaError>
where
    T: DeserializeOwned + Serialize + Validate,
{
    let record: T = serde_json::from_value(value).map_err(|source| SchemaError::Decode {
        kind: kind.name(),
        source,
    })?;
    let report = record.validate();
    let normalized = serde_json::to_value(&record).map_err(|source| SchemaError::Encode {
        kind: kind.name(),
        source,
    })?;

    debug!(
        kind = kind.name(),
        violations = report.violations.len(),
        valid = report.is_valid(),
        "Checked record"
    );
    Ok(Checked {
        kind,
        report,
        normalized,
    })
}

impl RecordKind {
    /// Check raw JSON text.
    pub fn check_str(&self, json: &str) -> Result<Checked, SchemaError> {
        let value: Value = serde_json::from_str(json).map_err(|source| SchemaError::Decode {
            kind: self.name(),
            source,
        })?;
        self.check(value)
    }

    /// Check every element of a JSON array; stops at the first decode failure.
    pub fn check_each(&self, value: Value) -> Result<Vec<Checked>, SchemaError> {
        match value {
            Value::Array(items) => items.into_iter().map(|item| self.check(item)).collect(),
            _ => Err(SchemaError::NotAnArray { kind: self.name() }),
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for RecordKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}
