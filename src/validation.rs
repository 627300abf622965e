//! Timetable snapshot integrity checks.
//!
//! Checks referential integrity of a snapshot before it is indexed, so
//! that dangling ids are reported at load time instead of being
//! discovered mid-run. Detects:
//! - Duplicate IDs within each entity kind
//! - Schedule entries referencing unknown subjects, classes, or rooms
//! - Subjects referencing unknown teachers or classes
//! - Day numbers outside 1..=7
//!
//! All issues are collected; validation never stops at the first one.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::calendar::{MONDAY, SUNDAY};
use crate::models::{ClassGroup, Period, Room, ScheduleEntry, Subject, Teacher};

/// Validation result.
pub type ValidationResult = Result<(), Vec<IntegrityIssue>>;

/// A single integrity problem in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityIssue {
    /// Issue category.
    pub kind: IntegrityIssueKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of integrity issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntegrityIssueKind {
    /// Two entities of the same kind share an ID.
    DuplicateId,
    /// A schedule entry references a subject that doesn't exist.
    UnknownSubject,
    /// A schedule entry or subject references a class that doesn't exist.
    UnknownClass,
    /// A subject references a teacher that doesn't exist.
    UnknownTeacher,
    /// A schedule entry references a room that doesn't exist.
    UnknownRoom,
    /// A schedule entry carries no usable period field.
    UnresolvedPeriod,
    /// A schedule entry has a day number outside 1..=7.
    InvalidDayOfWeek,
    /// A subject names no class at all.
    SubjectWithoutClass,
}

impl IntegrityIssue {
    pub(crate) fn new(kind: IntegrityIssueKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

/// Validates typed timetable records.
///
/// Checks:
/// 1. No duplicate IDs for teachers, classes, rooms, periods, subjects, entries
/// 2. No duplicate period ordinals
/// 3. Every subject's teacher and classes exist
/// 4. Every entry's subject, class, and room (if any) exist
/// 5. Every entry's day is within 1..=7
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(issues)` with every detected issue.
pub fn validate_records(
    teachers: &[Teacher],
    classes: &[ClassGroup],
    rooms: &[Room],
    periods: &[Period],
    subjects: &[Subject],
    entries: &[ScheduleEntry],
) -> ValidationResult {
    let mut issues = Vec::new();

    let teacher_ids = collect_ids(teachers.iter().map(|t| t.id), "teacher", &mut issues);
    let class_ids = collect_ids(classes.iter().map(|c| c.id), "class", &mut issues);
    let room_ids = collect_ids(rooms.iter().map(|r| r.id), "room", &mut issues);
    collect_ids(periods.iter().map(|p| p.id), "period", &mut issues);
    collect_ids(periods.iter().map(|p| u32::from(p.period_no)), "period number", &mut issues);
    let subject_ids = collect_ids(subjects.iter().map(|s| s.id), "subject", &mut issues);
    collect_ids(entries.iter().map(|e| e.id), "schedule entry", &mut issues);

    for subject in subjects {
        if !teacher_ids.contains(&subject.teacher_id) {
            issues.push(IntegrityIssue::new(
                IntegrityIssueKind::UnknownTeacher,
                format!(
                    "Subject {} references unknown teacher {}",
                    subject.id, subject.teacher_id
                ),
            ));
        }
        if subject.class_ids.is_empty() {
            issues.push(IntegrityIssue::new(
                IntegrityIssueKind::SubjectWithoutClass,
                format!("Subject {} has no class", subject.id),
            ));
        }
        for class_id in &subject.class_ids {
            if !class_ids.contains(class_id) {
                issues.push(IntegrityIssue::new(
                    IntegrityIssueKind::UnknownClass,
                    format!("Subject {} references unknown class {class_id}", subject.id),
                ));
            }
        }
    }

    for entry in entries {
        if !subject_ids.contains(&entry.subject_id) {
            issues.push(IntegrityIssue::new(
                IntegrityIssueKind::UnknownSubject,
                format!(
                    "Schedule entry {} references unknown subject {}",
                    entry.id, entry.subject_id
                ),
            ));
        }
        if !class_ids.contains(&entry.class_id) {
            issues.push(IntegrityIssue::new(
                IntegrityIssueKind::UnknownClass,
                format!(
                    "Schedule entry {} references unknown class {}",
                    entry.id, entry.class_id
                ),
            ));
        }
        if let Some(room_id) = entry.room_id {
            if !room_ids.contains(&room_id) {
                issues.push(IntegrityIssue::new(
                    IntegrityIssueKind::UnknownRoom,
                    format!("Schedule entry {} references unknown room {room_id}", entry.id),
                ));
            }
        }
        if !(MONDAY..=SUNDAY).contains(&entry.day_of_week) {
            issues.push(IntegrityIssue::new(
                IntegrityIssueKind::InvalidDayOfWeek,
                format!(
                    "Schedule entry {} has day_of_week {}",
                    entry.id, entry.day_of_week
                ),
            ));
        }
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

fn collect_ids(
    ids: impl Iterator<Item = u32>,
    what: &str,
    issues: &mut Vec<IntegrityIssue>,
) -> HashSet<u32> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            issues.push(IntegrityIssue::new(
                IntegrityIssueKind::DuplicateId,
                format!("Duplicate {what} ID: {id}"),
            ));
        }
    }
    seen
}
