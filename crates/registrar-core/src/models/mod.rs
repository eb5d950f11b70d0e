//! Record shapes exchanged with the registrar backend.
//!
//! - People: `Student`, `StaffMember`, `Relation` and the `SimpleIndividual`
//!   reference family
//! - Academics: `Course`, `Section`, `AcademicYear`, `Term`, periods and schedule days
//! - Attendance: `AttendanceRecord`, `MarkList`, `TimeExcusal`
//! - Reporting: `ClassReport`, `StudentReport`, `FeedbackForm`
//! - Change logs: `SectionUpdate`, `RecordUpdate`
//! - Automation: `RepeatedTask`, `OneTimeTask`, `OnCreateTask`
//! - Labels, banking and application metadata
//!
//! Wire names are the backend's camelCase names. Optional fields are omitted
//! when absent and may not be `null`.

#[macro_use]
mod macros;
mod wire;

pub mod academic;
pub mod app;
pub mod attendance;
pub mod bank;
pub mod change;
pub mod individual;
pub mod label;
pub mod person;
pub mod relation;
pub mod report;
pub mod schedule;
pub mod task;

pub use academic::{
    AcademicYear, Course, CourseGroup, NewSection, PeriodGroup, Prerequisite, Requirement, School,
    SchoolBoolean, Section, SectionCountDelta, SectionCountType, SimpleSection, Term, TermKey,
    TermList,
};
pub use app::{MailgunOptions, ModuleInfo};
pub use attendance::{
    AttendanceCode, AttendanceMark, AttendanceRecord, CalculatedExcusalPeriods, CoverageRequest,
    FieldValue, InspectionRecord, MarkEntry, MarkList, NurseRecord, TimeExcusal,
    TimeExcusalRequirements,
};
pub use bank::{BankAccount, BankAccountType, BankTransaction};
pub use change::{
    PropUpdate, RecordUpdate, SectionChange, SectionChangeType, SectionIndividualChange,
    SectionPropChange, SectionUpdate,
};
pub use individual::{
    keyed, Identified, SectionIndividual, SimpleEmailIndividual, SimpleIndividual, SimpleList,
    SimpleSectionList, SimpleStudent,
};
pub use label::{
    AnyLabelSet, ArchivedLabeledSet, BoardingStatus, CurrentFamiliesLabelSet, EnrollmentType,
    Label, LabelSet, LabelSetType, StudentType,
};
pub use person::{
    Address, Departure, DepartureType, Enrollment, Name, Permissions, PermissionsObj, Role,
    StaffMember, Student,
};
pub use relation::{
    BooleanList, DepartedRelation, Relation, RelationDepartureList, RelationEntry, RelationList,
    SimpleRelation,
};
pub use report::{ClassNote, ClassReport, FeedbackForm, FeedbackReminder, Grade, MarkingColumn, StudentReport};
pub use schedule::{PeriodList, PeriodMetaItem, PeriodObj, ScheduleDay, TimeRange};
pub use task::{
    CreateTrigger, OnCreateSectionTask, OnCreateTask, OneTimeTask, RepeatFrequency, RepeatedTask,
    TaskStatus,
};
