use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::SchemaError;
use crate::kind::RecordKind;
use crate::models::{
    AcademicYear, AnyLabelSet, AttendanceRecord, BankAccount, BankTransaction, Course, Relation,
    Section, StaffMember, Student, TimeExcusal,
};
use crate::validate::Report;

/// Snapshots older than a day are stale.
const STALE_MINUTES: i64 = 24 * 60;

const ATTENDANCE_PREFIX: &str = "attendance";

/// A stored collection of records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Students,
    Staff,
    Relations,
    Courses,
    Sections,
    AcademicYears,
    /// One day's attendance records
    Attendance(NaiveDate),
    TimeExcusals,
    LabelSets,
    BankAccounts,
    BankTransactions,
}

impl Collection {
    /// Collections that are not keyed by date.
    pub const FIXED: &'static [Collection] = &[
        Collection::Students,
        Collection::Staff,
        Collection::Relations,
        Collection::Courses,
        Collection::Sections,
        Collection::AcademicYears,
        Collection::TimeExcusals,
        Collection::LabelSets,
        Collection::BankAccounts,
        Collection::BankTransactions,
    ];

    fn fixed_name(&self) -> Option<&'static str> {
        let name = match self {
            Collection::Students => "students",
            Collection::Staff => "staff",
            Collection::Relations => "relations",
            Collection::Courses => "courses",
            Collection::Sections => "sections",
            Collection::AcademicYears => "academic_years",
            Collection::TimeExcusals => "time_excusals",
            Collection::LabelSets => "label_sets",
            Collection::BankAccounts => "bank_accounts",
            Collection::BankTransactions => "bank_transactions",
            Collection::Attendance(_) => return None,
        };
        Some(name)
    }

    /// File name without the `.json` extension.
    pub fn file_stem(&self) -> String {
        match self {
            Collection::Attendance(day) => {
                format!("{}_{}", ATTENDANCE_PREFIX, day.format("%Y-%m-%d"))
            }
            other => other.fixed_name().unwrap_or_default().to_string(),
        }
    }

    pub fn from_file_stem(stem: &str) -> Option<Self> {
        if let Some(day) = stem
            .strip_prefix(ATTENDANCE_PREFIX)
            .and_then(|rest| rest.strip_prefix('_'))
        {
            return parse_day(day).map(Collection::Attendance);
        }
        Self::FIXED
            .iter()
            .copied()
            .find(|c| c.fixed_name() == Some(stem))
    }

    /// The record kind each element of the collection has.
    pub fn kind(&self) -> RecordKind {
        match self {
            Collection::Students => RecordKind::Student,
            Collection::Staff => RecordKind::StaffMember,
            Collection::Relations => RecordKind::Relation,
            Collection::Courses => RecordKind::Course,
            Collection::Sections => RecordKind::Section,
            Collection::AcademicYears => RecordKind::AcademicYear,
            Collection::Attendance(_) => RecordKind::AttendanceRecord,
            Collection::TimeExcusals => RecordKind::TimeExcusal,
            Collection::LabelSets => RecordKind::AnyLabelSet,
            Collection::BankAccounts => RecordKind::BankAccount,
            Collection::BankTransactions => RecordKind::BankTransaction,
        }
    }
}

fn parse_day(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Written as `students`, `sections`, ... or `attendance:YYYY-MM-DD`.
impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Collection::Attendance(day) => {
                write!(f, "{}:{}", ATTENDANCE_PREFIX, day.format("%Y-%m-%d"))
            }
            other => f.write_str(other.fixed_name().unwrap_or_default()),
        }
    }
}

impl FromStr for Collection {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(day) = s
            .strip_prefix(ATTENDANCE_PREFIX)
            .and_then(|rest| rest.strip_prefix(':'))
        {
            return parse_day(day)
                .map(Collection::Attendance)
                .ok_or_else(|| SchemaError::UnknownCollection(s.to_string()));
        }
        Self::FIXED
            .iter()
            .copied()
            .find(|c| c.fixed_name() == Some(s))
            .ok_or_else(|| SchemaError::UnknownCollection(s.to_string()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot<T> {
    pub records: T,
    pub saved_at: DateTime<Utc>,
}

impl<T> Snapshot<T> {
    pub fn new(records: T) -> Self {
        Self {
            records,
            saved_at: Utc::now(),
        }
    }

    pub fn age_minutes(&self) -> i64 {
        (Utc::now() - self.saved_at).num_minutes()
    }

    pub fn age_display(&self) -> String {
        let minutes = self.age_minutes();
        if minutes < 1 {
            // Clock skew shows as "just now" too
            "just now".to_string()
        } else if minutes < 60 {
            format!("{}m ago", minutes)
        } else if minutes < 1440 {
            let hours = minutes / 60;
            if minutes % 60 >= 30 {
                format!("{}h ago", hours + 1)
            } else {
                format!("{}h ago", hours)
            }
        } else {
            let days = minutes / 1440;
            if (minutes % 1440) / 60 >= 12 {
                format!("{}d ago", days + 1)
            } else {
                format!("{}d ago", days)
            }
        }
    }

    pub fn is_stale(&self) -> bool {
        self.age_minutes() > STALE_MINUTES
    }
}

/// Outcome of [`RecordStore::import`].
#[derive(Debug, Clone, PartialEq)]
pub struct Imported {
    pub count: usize,
    /// Violations across all records, prefixed with the record index
    pub report: Report,
    /// False when any record had an error; nothing is written then
    pub saved: bool,
}

pub struct RecordStore {
    dir: PathBuf,
}

impl RecordStore {
    pub fn new(dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create store directory: {}", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, collection: &Collection) -> PathBuf {
        self.dir.join(format!("{}.json", collection.file_stem()))
    }

    pub fn load<T: DeserializeOwned>(&self, collection: &Collection) -> Result<Option<Snapshot<T>>> {
        let path = self.path(collection);
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read snapshot: {}", collection))?;

        let snapshot: Snapshot<T> = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse snapshot: {}", collection))?;

        Ok(Some(snapshot))
    }

    pub fn save<T: Serialize>(&self, collection: &Collection, records: &T) -> Result<()> {
        let snapshot = Snapshot::new(records);
        let path = self.path(collection);
        let contents = serde_json::to_string_pretty(&snapshot)
            .with_context(|| format!("Failed to encode snapshot: {}", collection))?;
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write snapshot: {}", path.display()))?;
        debug!(collection = %collection, path = %path.display(), "Saved snapshot");
        Ok(())
    }

    /// Check an array of untyped records against the collection's kind and
    /// store their normalized form. Decode failures are errors; records with
    /// error-severity violations leave the store untouched.
    pub fn import(&self, collection: &Collection, records: Value) -> Result<Imported> {
        let kind = collection.kind();
        let checked = kind
            .check_each(records)
            .with_context(|| format!("Failed to import {}", collection))?;

        let mut report = Report::default();
        let mut normalized = Vec::with_capacity(checked.len());
        for (i, record) in checked.into_iter().enumerate() {
            report.merge(&format!("[{}]", i), record.report);
            normalized.push(record.normalized);
        }

        let count = normalized.len();
        let saved = report.is_valid();
        if saved {
            self.save(collection, &normalized)?;
            info!(collection = %collection, count, "Imported records");
        } else {
            info!(
                collection = %collection,
                errors = report.errors().count(),
                "Import rejected"
            );
        }

        Ok(Imported {
            count,
            report,
            saved,
        })
    }

    /// Collections present in the store directory, sorted.
    pub fn collections(&self) -> Result<Vec<Collection>> {
        let entries = std::fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to list store: {}", self.dir.display()))?;

        let mut found = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match Collection::from_file_stem(stem) {
                Some(collection) => found.push(collection),
                None => debug!(file = %path.display(), "Skipping unrecognized file"),
            }
        }
        found.sort();
        Ok(found)
    }

    // ===== People =====

    pub fn load_students(&self) -> Result<Option<Snapshot<Vec<Student>>>> {
        self.load(&Collection::Students)
    }

    pub fn save_students(&self, students: &[Student]) -> Result<()> {
        self.save(&Collection::Students, &students)
    }

    pub fn load_staff(&self) -> Result<Option<Snapshot<Vec<StaffMember>>>> {
        self.load(&Collection::Staff)
    }

    pub fn save_staff(&self, staff: &[StaffMember]) -> Result<()> {
        self.save(&Collection::Staff, &staff)
    }

    pub fn load_relations(&self) -> Result<Option<Snapshot<Vec<Relation>>>> {
        self.load(&Collection::Relations)
    }

    pub fn save_relations(&self, relations: &[Relation]) -> Result<()> {
        self.save(&Collection::Relations, &relations)
    }

    // ===== Academics =====

    pub fn load_courses(&self) -> Result<Option<Snapshot<Vec<Course>>>> {
        self.load(&Collection::Courses)
    }

    pub fn save_courses(&self, courses: &[Course]) -> Result<()> {
        self.save(&Collection::Courses, &courses)
    }

    pub fn load_sections(&self) -> Result<Option<Snapshot<Vec<Section>>>> {
        self.load(&Collection::Sections)
    }

    pub fn save_sections(&self, sections: &[Section]) -> Result<()> {
        self.save(&Collection::Sections, &sections)
    }

    pub fn load_academic_years(&self) -> Result<Option<Snapshot<Vec<AcademicYear>>>> {
        self.load(&Collection::AcademicYears)
    }

    pub fn save_academic_years(&self, years: &[AcademicYear]) -> Result<()> {
        self.save(&Collection::AcademicYears, &years)
    }

    // ===== Attendance =====

    pub fn load_attendance(&self, day: NaiveDate) -> Result<Option<Snapshot<Vec<AttendanceRecord>>>> {
        self.load(&Collection::Attendance(day))
    }

    pub fn save_attendance(&self, day: NaiveDate, records: &[AttendanceRecord]) -> Result<()> {
        self.save(&Collection::Attendance(day), &records)
    }

    pub fn load_time_excusals(&self) -> Result<Option<Snapshot<Vec<TimeExcusal>>>> {
        self.load(&Collection::TimeExcusals)
    }

    pub fn save_time_excusals(&self, excusals: &[TimeExcusal]) -> Result<()> {
        self.save(&Collection::TimeExcusals, &excusals)
    }

    // ===== Labels =====

    pub fn load_label_sets(&self) -> Result<Option<Snapshot<Vec<AnyLabelSet>>>> {
        self.load(&Collection::LabelSets)
    }

    pub fn save_label_sets(&self, sets: &[AnyLabelSet]) -> Result<()> {
        self.save(&Collection::LabelSets, &sets)
    }

    // ===== Banking =====

    pub fn load_bank_accounts(&self) -> Result<Option<Snapshot<Vec<BankAccount>>>> {
        self.load(&Collection::BankAccounts)
    }

    pub fn save_bank_accounts(&self, accounts: &[BankAccount]) -> Result<()> {
        self.save(&Collection::BankAccounts, &accounts)
    }

    pub fn load_bank_transactions(&self) -> Result<Option<Snapshot<Vec<BankTransaction>>>> {
        self.load(&Collection::BankTransactions)
    }

    pub fn save_bank_transactions(&self, transactions: &[BankTransaction]) -> Result<()> {
        self.save(&Collection::BankTransactions, &transactions)
    }

    // ===== Snapshot age =====

    /// Load a snapshot for its age only, logging failures instead of returning them.
    fn snapshot_age(&self, collection: Collection) -> Option<Snapshot<()>> {
        match self.load::<Value>(&collection) {
            Ok(Some(snapshot)) => Some(Snapshot {
                records: (),
                saved_at: snapshot.saved_at,
            }),
            Ok(None) => None,
            Err(e) => {
                debug!(collection = %collection, error = %e, "Failed to load snapshot for age");
                None
            }
        }
    }

    pub fn age_of(&self, collection: Collection) -> Option<String> {
        self.snapshot_age(collection).map(|s| s.age_display())
    }

    pub fn ages(&self) -> SnapshotAges {
        SnapshotAges {
            students: self.age_of(Collection::Students),
            staff: self.age_of(Collection::Staff),
            relations: self.age_of(Collection::Relations),
            courses: self.age_of(Collection::Courses),
            sections: self.age_of(Collection::Sections),
            academic_years: self.age_of(Collection::AcademicYears),
        }
    }

    /// Missing or unreadable snapshots count as stale.
    pub fn is_stale(&self, collection: Collection) -> bool {
        self.snapshot_age(collection).map_or(true, |s| s.is_stale())
    }

    /// Check whether any of the core collections is stale.
    pub fn any_stale(&self) -> bool {
        [
            Collection::Students,
            Collection::Staff,
            Collection::Courses,
            Collection::Sections,
            Collection::AcademicYears,
        ]
        .into_iter()
        .any(|collection| self.is_stale(collection))
    }
}

#[derive(Debug, Default)]
pub struct SnapshotAges {
    pub students: Option<String>,
    pub staff: Option<String>,
    pub relations: Option<String>,
    pub courses: Option<String>,
    pub sections: Option<String>,
    pub academic_years: Option<String>,
}

impl SnapshotAges {
    pub fn roster_age(&self) -> String {
        self.students
            .clone()
            .or_else(|| self.staff.clone())
            .unwrap_or_else(|| "never".to_string())
    }

    pub fn schedule_age(&self) -> String {
        self.sections
            .clone()
            .or_else(|| self.courses.clone())
            .unwrap_or_else(|| "never".to_string())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;
    use crate::models::{School, SimpleIndividual, TermList};

    fn store() -> (TempDir, RecordStore) {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::new(dir.path().join("store")).unwrap();
        (dir, store)
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn section(id: &str) -> Section {
        Section {
            id: id.to_string(),
            period: "A".to_string(),
            teachers: Default::default(),
            students: Default::default(),
            academic_year: "2024-2025".to_string(),
            name: "Chemistry".to_string(),
            course_id: "SCI-201".to_string(),
            section_num: 2,
            terms: TermList::default(),
            room: SimpleIndividual::new("r3", "Lab"),
            school: School::UpperSchool,
            feedback_only: false,
            year_long: true,
        }
    }

    #[test]
    fn test_snapshot_age_display() {
        let mut snapshot = Snapshot::new(vec![1]);
        assert_eq!(snapshot.age_display(), "just now");

        snapshot.saved_at = Utc::now() - Duration::minutes(5);
        assert_eq!(snapshot.age_display(), "5m ago");

        snapshot.saved_at = Utc::now() - Duration::minutes(95);
        assert_eq!(snapshot.age_display(), "2h ago");

        snapshot.saved_at = Utc::now() - Duration::hours(80);
        assert_eq!(snapshot.age_display(), "3d ago");

        snapshot.saved_at = Utc::now() + Duration::minutes(10);
        assert_eq!(snapshot.age_display(), "just now");
    }

    #[test]
    fn test_snapshot_is_stale() {
        let mut snapshot = Snapshot::new(());
        assert!(!snapshot.is_stale());
        snapshot.saved_at = Utc::now() - Duration::hours(23);
        assert!(!snapshot.is_stale());
        snapshot.saved_at = Utc::now() - Duration::hours(25);
        assert!(snapshot.is_stale());
    }

    #[test]
    fn test_collection_names() {
        assert_eq!("sections".parse::<Collection>().unwrap(), Collection::Sections);
        let attendance: Collection = "attendance:2024-09-04".parse().unwrap();
        assert_eq!(attendance, Collection::Attendance(day("2024-09-04")));
        assert_eq!(attendance.file_stem(), "attendance_2024-09-04");
        assert_eq!(attendance.to_string(), "attendance:2024-09-04");
        assert_eq!(Collection::from_file_stem("attendance_2024-09-04"), Some(attendance));

        assert!("attendance:yesterday".parse::<Collection>().is_err());
        assert!("Sections".parse::<Collection>().is_err());
        for collection in Collection::FIXED {
            assert_eq!(Collection::from_file_stem(&collection.file_stem()), Some(*collection));
        }
    }

    #[test]
    fn test_missing_collection_is_none() {
        let (_dir, store) = store();
        assert!(store.load_sections().unwrap().is_none());
        assert!(store.age_of(Collection::Sections).is_none());
        assert!(store.any_stale());
    }

    #[test]
    fn test_save_and_load_typed() {
        let (_dir, store) = store();
        store.save_sections(&[section("sec-1"), section("sec-2")]).unwrap();

        let loaded = store.load_sections().unwrap().unwrap();
        assert_eq!(loaded.records.len(), 2);
        assert_eq!(loaded.records[1].id, "sec-2");
        assert_eq!(store.ages().schedule_age(), "just now");
        assert_eq!(store.ages().roster_age(), "never");
    }

    #[test]
    fn test_corrupt_snapshot_is_error() {
        let (_dir, store) = store();
        std::fs::write(store.dir().join("courses.json"), "{ nope").unwrap();
        let err = store.load_courses().unwrap_err();
        assert!(err.to_string().contains("courses"));
        assert!(store.is_stale(Collection::Courses));
    }

    #[test]
    fn test_collections_lists_known_files() {
        let (_dir, store) = store();
        store.save_sections(&[]).unwrap();
        store.save_attendance(day("2024-09-04"), &[]).unwrap();
        std::fs::write(store.dir().join("notes.txt"), "").unwrap();
        std::fs::write(store.dir().join("unknown.json"), "{}").unwrap();

        let found = store.collections().unwrap();
        assert_eq!(
            found,
            vec![Collection::Sections, Collection::Attendance(day("2024-09-04"))]
        );
    }

    #[test]
    fn test_import_saves_normalized_records() {
        let (_dir, store) = store();
        let records = json!([{
            "ID": "s1", "name": "Jane Doe", "date": "2024-09-04",
            "periods": {"A": {"code": "ABS", "comment": "", "period": "A"}},
            "legacyField": 1
        }]);
        let collection = Collection::Attendance(day("2024-09-04"));
        let imported = store.import(&collection, records).unwrap();
        assert!(imported.saved);
        assert_eq!(imported.count, 1);

        let loaded = store.load_attendance(day("2024-09-04")).unwrap().unwrap();
        assert_eq!(loaded.records[0].name, "Jane Doe");
        let raw = store.load::<Value>(&collection).unwrap().unwrap();
        assert!(raw.records[0].get("legacyField").is_none());
    }

    #[test]
    fn test_import_rejects_invalid_records() {
        let (_dir, store) = store();
        let records = json!([
            {"ID": "t1", "name": "Ruth Penn", "start": "2024-09-04", "end": "2024-09-06",
             "comment": "", "code": "ABS-X", "includedDays": [], "edited": "", "editedBy": "", "uid": ""},
            {"ID": "", "name": "Bo Lee", "start": "2024-09-04", "end": "2024-09-06",
             "comment": "", "code": "ABS-X", "includedDays": [], "edited": "", "editedBy": "", "uid": ""}
        ]);
        let imported = store.import(&Collection::TimeExcusals, records).unwrap();
        assert!(!imported.saved);
        assert_eq!(imported.report.errors().next().unwrap().path, "[1].ID");
        assert!(store.load_time_excusals().unwrap().is_none());
    }

    #[test]
    fn test_import_decode_failure_is_error() {
        let (_dir, store) = store();
        assert!(store.import(&Collection::Courses, json!({"not": "an array"})).is_err());
        assert!(store.import(&Collection::Courses, json!([{"ID": "c1"}])).is_err());
    }
}
