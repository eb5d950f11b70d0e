use crate::models::*;
use crate::utils::parse_date;

use super::{field, MapEntry, Report, Severity, Validate};

/// Shapes with nothing to check beyond what decoding enforces.
macro_rules! no_rules {
    ($($ty:ty),+ $(,)?) => {
        $(impl Validate for $ty {})+
    };
}

no_rules!(
    bool,
    Role,
    DepartureType,
    AttendanceCode,
    School,
    Requirement,
    Grade,
    MarkingColumn,
    SectionChangeType,
    FieldValue,
    Name,
    Address,
    Permissions,
    PermissionsObj,
    Departure,
    Prerequisite,
    TermList,
    SchoolBoolean,
    PeriodMetaItem,
    AttendanceMark,
    Label,
    LabelSet,
    MailgunOptions,
    ModuleInfo,
    PropUpdate,
    OnCreateTask,
    TermKey,
    LabelSetType,
    StudentType,
    EnrollmentType,
    BoardingStatus,
    RepeatFrequency,
    TaskStatus,
    CreateTrigger,
    BankAccountType,
);

fn require(report: &mut Report, path: &str, name: &str, value: &str) {
    if value.trim().is_empty() {
        report.error(&field(path, name), "must not be empty");
    }
}

/// Report `start` after `end` when both parse as dates.
fn check_order(
    report: &mut Report,
    path: &str,
    (start_name, start): (&str, &str),
    (end_name, end): (&str, &str),
    severity: Severity,
) {
    if let (Some(s), Some(e)) = (parse_date(start), parse_date(end)) {
        if s > e {
            let message = format!("{} {} is after {} {}", start_name, start, end_name, end);
            match severity {
                Severity::Error => report.error(&field(path, start_name), message),
                Severity::Warning => report.warn(&field(path, start_name), message),
            }
        }
    }
}

// ===== Map entries =====

impl MapEntry for bool {
    fn expected_key(&self) -> Option<&str> {
        None
    }
}

impl MapEntry for SimpleIndividual {
    fn expected_key(&self) -> Option<&str> {
        Some(self.id())
    }
}

impl MapEntry for SectionIndividual {
    fn expected_key(&self) -> Option<&str> {
        Some(self.id())
    }
}

impl MapEntry for SimpleRelation {
    fn expected_key(&self) -> Option<&str> {
        Some(self.id())
    }
}

impl MapEntry for DepartedRelation {
    fn expected_key(&self) -> Option<&str> {
        Some(self.id())
    }
}

impl MapEntry for RelationEntry {
    fn expected_key(&self) -> Option<&str> {
        Some(self.id())
    }
}

impl MapEntry for PeriodObj {
    fn expected_key(&self) -> Option<&str> {
        Some(self.period.as_str())
    }
}

impl MapEntry for MarkEntry {
    fn expected_key(&self) -> Option<&str> {
        self.mark().map(|m| m.period.as_str())
    }
}

// ===== People =====

impl Validate for SimpleIndividual {
    fn validate_at(&self, path: &str, report: &mut Report) {
        require(report, path, "ID", &self.id);
        require(report, path, "name", &self.name);
    }
}

impl Validate for SectionIndividual {
    fn validate_at(&self, path: &str, report: &mut Report) {
        self.individual.validate_at(path, report);
        if let (Some(enrolled), Some(withdrawn)) = (&self.enrolled, &self.withdrawn) {
            check_order(
                report,
                path,
                ("enrolled", enrolled),
                ("withdrawn", withdrawn),
                Severity::Warning,
            );
        }
    }
}

impl Validate for SimpleEmailIndividual {
    fn validate_at(&self, path: &str, report: &mut Report) {
        self.individual.validate_at(path, report);
    }
}

impl Validate for SimpleStudent {
    fn validate_at(&self, path: &str, report: &mut Report) {
        self.individual.validate_at(path, report);
    }
}

impl Validate for Enrollment {
    fn validate_at(&self, path: &str, report: &mut Report) {
        if let Some(departure) = &self.departure {
            check_order(
                report,
                path,
                ("enrollmentDate", &self.enrollment_date),
                ("departureDate", &departure.departure_date),
                Severity::Warning,
            );
        }
    }
}

impl Validate for Student {
    fn validate_at(&self, path: &str, report: &mut Report) {
        require(report, path, "ID", &self.id);
        require(report, path, "name", &self.name);
        self.enrollments.validate_at(&field(path, "enrollments"), report);
    }
}

impl Validate for StaffMember {
    fn validate_at(&self, path: &str, report: &mut Report) {
        require(report, path, "ID", &self.id);
        require(report, path, "name", &self.name);
    }
}

impl Validate for SimpleRelation {
    fn validate_at(&self, path: &str, report: &mut Report) {
        self.individual.validate_at(path, report);
    }
}

impl Validate for DepartedRelation {
    fn validate_at(&self, path: &str, report: &mut Report) {
        self.relation.validate_at(path, report);
    }
}

impl Validate for RelationEntry {
    fn validate_at(&self, path: &str, report: &mut Report) {
        match self {
            RelationEntry::Departed(departed) => departed.validate_at(path, report),
            RelationEntry::Current(current) => current.validate_at(path, report),
        }
    }
}

impl Validate for Relation {
    fn validate_at(&self, path: &str, report: &mut Report) {
        require(report, path, "ID", &self.id);
        require(report, path, "name", &self.name);

        let relations_path = field(path, "relations");
        let departed = self
            .relations
            .values()
            .filter(|e| e.departure().is_some())
            .count();
        if departed > 0 && departed < self.relations.len() {
            report.error(
                &relations_path,
                format!(
                    "mixes {} departed and {} current relations",
                    departed,
                    self.relations.len() - departed
                ),
            );
        }
        self.relations.validate_at(&relations_path, report);
        self.non_student_relations
            .validate_at(&field(path, "nonStudentRelations"), report);
    }
}

// ===== Academics =====

impl Validate for Course {
    fn validate_at(&self, path: &str, report: &mut Report) {
        require(report, path, "ID", &self.id);
        require(report, path, "name", &self.name);
        require(report, path, "courseID", &self.course_id);
    }
}

impl Validate for SectionCountType {
    fn validate_at(&self, path: &str, report: &mut Report) {
        require(report, path, "sectionID", &self.section_id);
    }
}

impl Validate for Section {
    fn validate_at(&self, path: &str, report: &mut Report) {
        require(report, path, "ID", &self.id);
        require(report, path, "name", &self.name);
        self.teachers.validate_at(&field(path, "teachers"), report);
        self.students.validate_at(&field(path, "students"), report);
        self.room.validate_at(&field(path, "room"), report);
    }
}

impl Validate for NewSection {
    fn validate_at(&self, path: &str, report: &mut Report) {
        require(report, path, "ID", &self.id);
        require(report, path, "name", &self.name);
        self.teachers.validate_at(&field(path, "teachers"), report);
        self.students.validate_at(&field(path, "students"), report);
        self.room.validate_at(&field(path, "room"), report);
        for (i, term) in self.terms.iter().enumerate() {
            if term.parse::<TermKey>().is_err() {
                report.error(
                    &format!("{}[{}]", field(path, "terms"), i),
                    format!("unknown term {:?}", term),
                );
            }
        }
    }
}

impl Validate for SimpleSection {
    fn validate_at(&self, path: &str, report: &mut Report) {
        require(report, path, "ID", &self.id);
        require(report, path, "name", &self.name);
        self.teachers.validate_at(&field(path, "teachers"), report);
    }
}

impl Validate for Term {
    fn validate_at(&self, path: &str, report: &mut Report) {
        check_order(
            report,
            path,
            ("start", &self.start),
            ("end", &self.end),
            Severity::Error,
        );
    }
}

impl Validate for AcademicYear {
    fn validate_at(&self, path: &str, report: &mut Report) {
        for (key, term) in self.terms() {
            term.validate_at(&field(path, key.as_str()), report);
        }
        for pair in TermKey::ALL.windows(2) {
            let (earlier, later) = (self.term(pair[0]), self.term(pair[1]));
            if let (Some(end), Some(start)) = (earlier.end_date(), later.start_date()) {
                if start <= end {
                    report.warn(
                        &field(path, pair[1].as_str()),
                        format!("starts before {} ends", pair[0]),
                    );
                }
            }
        }
    }
}

impl Validate for CourseGroup {
    fn validate_at(&self, path: &str, report: &mut Report) {
        require(report, path, "ID", &self.id);
        require(report, path, "name", &self.name);
        self.sections.validate_at(&field(path, "sections"), report);
    }
}

impl Validate for PeriodGroup {
    fn validate_at(&self, path: &str, report: &mut Report) {
        require(report, path, "ID", &self.id);
        require(report, path, "name", &self.name);
        self.sections.validate_at(&field(path, "sections"), report);
    }
}

// ===== Schedule =====

impl Validate for PeriodObj {
    fn validate_at(&self, path: &str, report: &mut Report) {
        require(report, path, "period", &self.period);
    }
}

impl Validate for ScheduleDay {
    fn validate_at(&self, path: &str, report: &mut Report) {
        require(report, path, "ID", &self.id);
        self.periods.validate_at(&field(path, "periods"), report);
    }
}

impl Validate for TimeRange {
    fn validate_at(&self, path: &str, report: &mut Report) {
        if self.start > self.end {
            report.error(
                &field(path, "start"),
                format!("start {} is after end {}", self.start, self.end),
            );
        }
    }
}

// ===== Attendance =====

impl Validate for MarkEntry {
    fn validate_at(&self, path: &str, report: &mut Report) {
        if let MarkEntry::Mark(mark) = self {
            mark.validate_at(path, report);
        }
    }
}

impl Validate for AttendanceRecord {
    fn validate_at(&self, path: &str, report: &mut Report) {
        require(report, path, "ID", &self.id);
        require(report, path, "name", &self.name);
        self.periods.validate_at(&field(path, "periods"), report);
    }
}

impl Validate for CalculatedExcusalPeriods {
    fn validate_at(&self, path: &str, report: &mut Report) {
        self.periods.validate_at(&field(path, "periods"), report);
    }
}

impl Validate for TimeExcusal {
    fn validate_at(&self, path: &str, report: &mut Report) {
        require(report, path, "ID", &self.id);
        require(report, path, "name", &self.name);
        check_order(
            report,
            path,
            ("start", &self.start),
            ("end", &self.end),
            Severity::Error,
        );
    }
}

impl Validate for TimeExcusalRequirements {
    fn validate_at(&self, path: &str, report: &mut Report) {
        self.student.validate_at(&field(path, "student"), report);
        self.sections.validate_at(&field(path, "sections"), report);
        self.schedules.validate_at(&field(path, "schedules"), report);
    }
}

impl Validate for CoverageRequest {
    fn validate_at(&self, path: &str, report: &mut Report) {
        require(report, path, "sectionID", &self.section_id);
    }
}

impl Validate for InspectionRecord {
    fn validate_at(&self, path: &str, report: &mut Report) {
        require(report, path, "ID", &self.id);
        require(report, path, "name", &self.name);
    }
}

impl Validate for NurseRecord {
    fn validate_at(&self, path: &str, report: &mut Report) {
        self.student.validate_at(&field(path, "student"), report);
    }
}

// ===== Reporting =====

impl Validate for ClassReport {
    fn validate_at(&self, path: &str, report: &mut Report) {
        require(report, path, "ID", &self.id);
        self.section.validate_at(&field(path, "section"), report);
        self.student.validate_at(&field(path, "student"), report);
    }
}

impl Validate for ClassNote {
    fn validate_at(&self, path: &str, report: &mut Report) {
        require(report, path, "ID", &self.id);
        require(report, path, "courseID", &self.course_id);
    }
}

impl Validate for StudentReport {
    fn validate_at(&self, path: &str, report: &mut Report) {
        self.student.validate_at(&field(path, "student"), report);
        let reports_path = field(path, "reports");
        self.reports.validate_at(&reports_path, report);
        for (i, class_report) in self.reports.iter().enumerate() {
            if class_report.student.id() != self.student.id() {
                report.warn(
                    &format!("{}[{}].student.ID", reports_path, i),
                    format!(
                        "report belongs to {:?}, not {:?}",
                        class_report.student.id(),
                        self.student.id()
                    ),
                );
            }
        }
    }
}

impl Validate for FeedbackForm {
    fn validate_at(&self, path: &str, report: &mut Report) {
        require(report, path, "ID", &self.id);
        self.student.validate_at(&field(path, "student"), report);
        self.teacher.validate_at(&field(path, "teacher"), report);
    }
}

impl Validate for FeedbackReminder {
    fn validate_at(&self, path: &str, report: &mut Report) {
        require(report, path, "ID", &self.id);
        require(report, path, "name", &self.name);
        self.sections.validate_at(&field(path, "sections"), report);
    }
}

// ===== Change records =====

impl Validate for SectionIndividualChange {
    fn validate_at(&self, path: &str, report: &mut Report) {
        require(report, path, "sectionID", &self.section_id);
        self.individual.validate_at(&field(path, "individual"), report);
    }
}

impl Validate for SectionPropChange {
    fn validate_at(&self, path: &str, report: &mut Report) {
        require(report, path, "sectionID", &self.section_id);
        require(report, path, "property", &self.property);
    }
}

impl Validate for SectionChange {
    fn validate_at(&self, path: &str, report: &mut Report) {
        match self {
            SectionChange::Property(change) => change.validate_at(path, report),
            SectionChange::Individual(change) => change.validate_at(path, report),
        }
    }
}

impl Validate for SectionUpdate {
    fn validate_at(&self, path: &str, report: &mut Report) {
        self.section.validate_at(&field(path, "section"), report);

        let changes_path = field(path, "changes");
        if !self.is_homogeneous() {
            report.error(
                &changes_path,
                "mixes property changes and individual changes",
            );
        }
        self.changes.validate_at(&changes_path, report);
        for (i, change) in self.changes.iter().enumerate() {
            if change.section_id() != self.section.id {
                report.warn(
                    &format!("{}[{}].sectionID", changes_path, i),
                    format!(
                        "change targets section {:?}, update is for {:?}",
                        change.section_id(),
                        self.section.id
                    ),
                );
            }
        }
    }
}

impl Validate for RecordUpdate {
    fn validate_at(&self, path: &str, report: &mut Report) {
        require(report, path, "ID", &self.id);
    }
}

// ===== Tasks =====

impl Validate for RepeatedTask {
    fn validate_at(&self, path: &str, report: &mut Report) {
        require(report, path, "ID", &self.id);
        require(report, path, "functionName", &self.function_name);
        check_order(
            report,
            path,
            ("startDate", &self.start_date),
            ("endDate", &self.end_date),
            Severity::Warning,
        );
    }
}

impl Validate for OneTimeTask {
    fn validate_at(&self, path: &str, report: &mut Report) {
        require(report, path, "ID", &self.id);
        require(report, path, "functionName", &self.function_name);
        if self.is_repeat && self.repeat_id.is_none() {
            report.warn(&field(path, "repeatID"), "repeat task without a repeatID");
        }
    }
}

impl Validate for OnCreateSectionTask {
    fn validate_at(&self, path: &str, report: &mut Report) {
        if self.task.trigger != CreateTrigger::Section {
            report.error(
                &field(path, "type"),
                format!("expected \"Section\", found {:?}", self.task.trigger.as_str()),
            );
        }
    }
}

// ===== Labels =====

fn expect_set_type(report: &mut Report, path: &str, set: &LabelSet, expected: LabelSetType) {
    if set.set_type != expected {
        report.error(
            &field(path, "type"),
            format!("expected {:?}, found {:?}", expected.as_str(), set.set_type.as_str()),
        );
    }
}

impl Validate for CurrentFamiliesLabelSet {
    fn validate_at(&self, path: &str, report: &mut Report) {
        expect_set_type(report, path, &self.set, LabelSetType::Current);
    }
}

impl Validate for ArchivedLabeledSet {
    fn validate_at(&self, path: &str, report: &mut Report) {
        expect_set_type(report, path, &self.set, LabelSetType::Archived);
    }
}

impl Validate for AnyLabelSet {
    fn validate_at(&self, path: &str, report: &mut Report) {
        match self {
            AnyLabelSet::Current(set) => set.validate_at(path, report),
            AnyLabelSet::Archived(set) => set.validate_at(path, report),
        }
    }
}

// ===== Banking =====

impl Validate for BankTransaction {
    fn validate_at(&self, path: &str, report: &mut Report) {
        require(report, path, "ID", &self.id);
    }
}

impl Validate for BankAccount {
    fn validate_at(&self, path: &str, report: &mut Report) {
        require(report, path, "ID", &self.id);
        require(report, path, "name", &self.name);
        self.authorized_users
            .validate_at(&field(path, "authorizedUsers"), report);
    }
}
