//! Timetable snapshot and query indices.
//!
//! A [`Timetable`] is an immutable, validated snapshot of one semester's
//! teachers, classes, rooms, periods, subjects, and schedule entries.
//! It is built once per context switch and never mutated; the engine only
//! queries it.
//!
//! # Indices
//!
//! | Query | Index |
//! |-------|-------|
//! | `schedules_for_teacher_on_day` | (teacher, day) → entries, period order |
//! | `subjects_teaching` | class → subjects (any element of `class_ids`) |
//! | `period_number_of` | canonical `period_no`, resolved at load |

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Result, SubstituteError};
use crate::models::{
    ClassGroup, ClassId, Period, PeriodId, RawScheduleEntry, RawSubject, Room, RoomId,
    ScheduleEntry, ScheduleId, Subject, SubjectId, Teacher, TeacherId,
};
use crate::validation::{validate_records, IntegrityIssue, IntegrityIssueKind};

/// Raw records as delivered by the timetable loader.
///
/// Field names follow the upstream JSON; schedule entries may name their
/// period in several ways (see [`RawScheduleEntry`]).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TimetableSnapshot {
    pub teachers: Vec<Teacher>,
    pub classes: Vec<ClassGroup>,
    pub rooms: Vec<Room>,
    pub periods: Vec<Period>,
    pub subjects: Vec<RawSubject>,
    #[serde(alias = "schedule_entries")]
    pub schedules: Vec<RawScheduleEntry>,
}

impl TimetableSnapshot {
    /// Parses a snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| SubstituteError::InvalidInput(format!("malformed timetable JSON: {e}")))
    }
}

/// Validated, indexed timetable for one semester.
#[derive(Debug, Clone)]
pub struct Timetable {
    teachers: Vec<Teacher>,
    classes: Vec<ClassGroup>,
    rooms: Vec<Room>,
    periods: Vec<Period>,
    subjects: Vec<Subject>,
    entries: Vec<ScheduleEntry>,

    teacher_index: HashMap<TeacherId, usize>,
    class_index: HashMap<ClassId, usize>,
    room_index: HashMap<RoomId, usize>,
    period_index: HashMap<u8, usize>,
    subject_index: HashMap<SubjectId, usize>,
    entry_index: HashMap<ScheduleId, usize>,
    subjects_by_class: HashMap<ClassId, Vec<usize>>,
    entries_by_teacher_day: HashMap<(TeacherId, u8), Vec<usize>>,
}

impl Timetable {
    /// Normalizes, validates, and indexes a raw snapshot.
    ///
    /// Period fields and subject class lists are normalized here, once.
    /// Any integrity issue aborts the load with `DataIntegrity`.
    pub fn load(snapshot: TimetableSnapshot) -> Result<Self> {
        let TimetableSnapshot {
            teachers,
            classes,
            rooms,
            periods,
            subjects: raw_subjects,
            schedules: raw_entries,
        } = snapshot;

        let mut issues = Vec::new();

        let mut subjects = Vec::with_capacity(raw_subjects.len());
        for raw in raw_subjects {
            let id = raw.id;
            match raw.normalize() {
                Some(s) => subjects.push(s),
                None => issues.push(IntegrityIssue::new(
                    IntegrityIssueKind::SubjectWithoutClass,
                    format!("Subject {id} has no class"),
                )),
            }
        }

        let period_no_by_id: HashMap<PeriodId, u8> =
            periods.iter().map(|p| (p.id, p.period_no)).collect();
        let mut entries = Vec::with_capacity(raw_entries.len());
        for raw in &raw_entries {
            match raw.resolve(&period_no_by_id) {
                Some(e) => entries.push(e),
                None => issues.push(IntegrityIssue::new(
                    IntegrityIssueKind::UnresolvedPeriod,
                    format!("Schedule entry {} has no resolvable period", raw.id),
                )),
            }
        }

        if let Err(mut more) =
            validate_records(&teachers, &classes, &rooms, &periods, &subjects, &entries)
        {
            issues.append(&mut more);
        }

        if !issues.is_empty() {
            warn!(issues = issues.len(), "timetable snapshot rejected");
            return Err(SubstituteError::DataIntegrity(issues));
        }

        Ok(Self::index(teachers, classes, rooms, periods, subjects, entries))
    }

    /// Validates and indexes already-typed records.
    pub fn new(
        teachers: Vec<Teacher>,
        classes: Vec<ClassGroup>,
        rooms: Vec<Room>,
        periods: Vec<Period>,
        subjects: Vec<Subject>,
        entries: Vec<ScheduleEntry>,
    ) -> Result<Self> {
        if let Err(issues) =
            validate_records(&teachers, &classes, &rooms, &periods, &subjects, &entries)
        {
            warn!(issues = issues.len(), "timetable records rejected");
            return Err(SubstituteError::DataIntegrity(issues));
        }
        Ok(Self::index(teachers, classes, rooms, periods, subjects, entries))
    }

    fn index(
        teachers: Vec<Teacher>,
        classes: Vec<ClassGroup>,
        rooms: Vec<Room>,
        periods: Vec<Period>,
        subjects: Vec<Subject>,
        entries: Vec<ScheduleEntry>,
    ) -> Self {
        let teacher_index = teachers.iter().enumerate().map(|(i, t)| (t.id, i)).collect();
        let class_index = classes.iter().enumerate().map(|(i, c)| (c.id, i)).collect();
        let room_index = rooms.iter().enumerate().map(|(i, r)| (r.id, i)).collect();
        let period_index = periods
            .iter()
            .enumerate()
            .map(|(i, p)| (p.period_no, i))
            .collect();
        let subject_index: HashMap<SubjectId, usize> =
            subjects.iter().enumerate().map(|(i, s)| (s.id, i)).collect();
        let entry_index = entries.iter().enumerate().map(|(i, e)| (e.id, i)).collect();

        let mut subjects_by_class: HashMap<ClassId, Vec<usize>> = HashMap::new();
        for (i, subject) in subjects.iter().enumerate() {
            for &class_id in &subject.class_ids {
                subjects_by_class.entry(class_id).or_default().push(i);
            }
        }

        let mut entries_by_teacher_day: HashMap<(TeacherId, u8), Vec<usize>> = HashMap::new();
        for (i, entry) in entries.iter().enumerate() {
            if let Some(&s) = subject_index.get(&entry.subject_id) {
                entries_by_teacher_day
                    .entry((subjects[s].teacher_id, entry.day_of_week))
                    .or_default()
                    .push(i);
            }
        }
        // Stable: ties keep snapshot order.
        for list in entries_by_teacher_day.values_mut() {
            list.sort_by_key(|&i| entries[i].period_no);
        }

        debug!(
            teachers = teachers.len(),
            subjects = subjects.len(),
            entries = entries.len(),
            "timetable indexed"
        );

        Self {
            teachers,
            classes,
            rooms,
            periods,
            subjects,
            entries,
            teacher_index,
            class_index,
            room_index,
            period_index,
            subject_index,
            entry_index,
            subjects_by_class,
            entries_by_teacher_day,
        }
    }

    // ======================== Core queries ========================

    /// All entries taught by `teacher_id` on `day_of_week`, in period order.
    pub fn schedules_for_teacher_on_day(
        &self,
        teacher_id: TeacherId,
        day_of_week: u8,
    ) -> impl Iterator<Item = &ScheduleEntry> + '_ {
        self.entries_by_teacher_day
            .get(&(teacher_id, day_of_week))
            .into_iter()
            .flatten()
            .map(move |&i| &self.entries[i])
    }

    /// Subjects taught to `class_id`, including shared subjects that list
    /// it among several classes.
    pub fn subjects_teaching(&self, class_id: ClassId) -> impl Iterator<Item = &Subject> + '_ {
        self.subjects_by_class
            .get(&class_id)
            .into_iter()
            .flatten()
            .map(move |&i| &self.subjects[i])
    }

    /// Canonical period number of an entry.
    #[inline]
    pub fn period_number_of(&self, entry: &ScheduleEntry) -> u8 {
        entry.period_no
    }

    /// Number of periods `teacher_id` teaches on `day_of_week`.
    pub fn daily_load(&self, teacher_id: TeacherId, day_of_week: u8) -> usize {
        self.entries_by_teacher_day
            .get(&(teacher_id, day_of_week))
            .map_or(0, Vec::len)
    }

    /// Whether `teacher_id` teaches any subject to `class_id`.
    pub fn teaches_class(&self, teacher_id: TeacherId, class_id: ClassId) -> bool {
        self.subjects_teaching(class_id)
            .any(|s| s.teacher_id == teacher_id)
    }

    /// Teacher normally teaching an entry.
    pub fn teacher_of(&self, entry: &ScheduleEntry) -> Option<TeacherId> {
        self.subject(entry.subject_id).map(|s| s.teacher_id)
    }

    // ======================== Lookups ========================

    /// All teachers, in roster order.
    pub fn teachers(&self) -> &[Teacher] {
        &self.teachers
    }

    /// All class groups.
    pub fn classes(&self) -> &[ClassGroup] {
        &self.classes
    }

    /// All periods.
    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    /// All subjects.
    pub fn subjects(&self) -> &[Subject] {
        &self.subjects
    }

    /// All schedule entries, in snapshot order.
    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    pub fn teacher(&self, id: TeacherId) -> Option<&Teacher> {
        self.teacher_index.get(&id).map(|&i| &self.teachers[i])
    }

    pub fn class_group(&self, id: ClassId) -> Option<&ClassGroup> {
        self.class_index.get(&id).map(|&i| &self.classes[i])
    }

    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.room_index.get(&id).map(|&i| &self.rooms[i])
    }

    /// Period by ordinal.
    pub fn period(&self, period_no: u8) -> Option<&Period> {
        self.period_index.get(&period_no).map(|&i| &self.periods[i])
    }

    pub fn subject(&self, id: SubjectId) -> Option<&Subject> {
        self.subject_index.get(&id).map(|&i| &self.subjects[i])
    }

    pub fn entry(&self, id: ScheduleId) -> Option<&ScheduleEntry> {
        self.entry_index.get(&id).map(|&i| &self.entries[i])
    }
}
