//! Day report: who was absent and who covered which period.
//!
//! Joins substitution records (or a live [`AssignmentSession`]) against
//! the timetable to produce display-ready rows with subject, class, room
//! and teacher names resolved.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::{ScheduleEntry, ScheduleId, SubstitutionAssignment, TeacherId};
use crate::session::AssignmentSession;
use crate::timetable::Timetable;

/// One covered (or uncovered) period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoveredPeriod {
    pub schedule_id: ScheduleId,
    pub period_no: u8,
    pub subject_name: String,
    pub class_name: String,
    pub room_name: Option<String>,
    /// `None` when the period was left unassigned.
    pub substitute_teacher_id: Option<TeacherId>,
    pub substitute_name: Option<String>,
}

/// Periods of one absent teacher, in period order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbsentTeacherReport {
    pub teacher_id: TeacherId,
    pub teacher_name: String,
    pub periods: Vec<CoveredPeriod>,
}

/// Substitution overview for one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayReport {
    pub date: NaiveDate,
    /// Absent teachers in order of first appearance.
    pub absent_teachers: Vec<AbsentTeacherReport>,
}

impl DayReport {
    /// Builds the report from stored assignments.
    ///
    /// Assignments of other dates are ignored. Assignments whose schedule
    /// entry is no longer in the timetable are skipped with a warning.
    pub fn build(
        timetable: &Timetable,
        date: NaiveDate,
        assignments: &[SubstitutionAssignment],
    ) -> Self {
        let mut report = ReportBuilder::new(timetable, date);
        for a in assignments.iter().filter(|a| a.absent_date == date) {
            match timetable.entry(a.schedule_id) {
                Some(entry) => {
                    report.push(a.absent_teacher_id, entry, Some(a.substitute_teacher_id))
                }
                None => warn!(
                    schedule_id = a.schedule_id,
                    %date,
                    "assignment references unknown schedule entry"
                ),
            }
        }
        report.finish()
    }

    /// Builds the report from a session's current choices, including
    /// periods still unassigned.
    pub fn from_session(timetable: &Timetable, session: &AssignmentSession) -> Self {
        let mut report = ReportBuilder::new(timetable, session.date());
        for teacher_id in session.absent_teacher_ids() {
            report.teacher(*teacher_id);
        }
        for rec in session.recommendations() {
            report.push(
                rec.absent_teacher_id,
                &rec.entry,
                session.choice(rec.schedule_id()),
            );
        }
        report.finish()
    }

    /// Total number of periods in the report.
    pub fn period_count(&self) -> usize {
        self.absent_teachers.iter().map(|t| t.periods.len()).sum()
    }

    /// Periods left without a substitute.
    pub fn uncovered(&self) -> impl Iterator<Item = &CoveredPeriod> + '_ {
        self.absent_teachers
            .iter()
            .flat_map(|t| t.periods.iter())
            .filter(|p| p.substitute_teacher_id.is_none())
    }
}

struct ReportBuilder<'a> {
    timetable: &'a Timetable,
    date: NaiveDate,
    teachers: Vec<AbsentTeacherReport>,
    position: HashMap<TeacherId, usize>,
}

impl<'a> ReportBuilder<'a> {
    fn new(timetable: &'a Timetable, date: NaiveDate) -> Self {
        Self {
            timetable,
            date,
            teachers: Vec::new(),
            position: HashMap::new(),
        }
    }

    fn teacher_name(&self, id: TeacherId) -> String {
        self.timetable
            .teacher(id)
            .map(|t| t.name.clone())
            .unwrap_or_default()
    }

    fn teacher(&mut self, teacher_id: TeacherId) -> usize {
        if let Some(&i) = self.position.get(&teacher_id) {
            return i;
        }
        let teacher_name = self.teacher_name(teacher_id);
        self.teachers.push(AbsentTeacherReport {
            teacher_id,
            teacher_name,
            periods: Vec::new(),
        });
        let i = self.teachers.len() - 1;
        self.position.insert(teacher_id, i);
        i
    }

    fn push(&mut self, absent: TeacherId, entry: &ScheduleEntry, substitute: Option<TeacherId>) {
        let tt = self.timetable;
        let row = CoveredPeriod {
            schedule_id: entry.id,
            period_no: tt.period_number_of(entry),
            subject_name: tt
                .subject(entry.subject_id)
                .map(|s| s.name.clone())
                .unwrap_or_default(),
            class_name: tt
                .class_group(entry.class_id)
                .map(|c| c.name.clone())
                .unwrap_or_default(),
            room_name: entry
                .room_id
                .and_then(|r| tt.room(r))
                .map(|r| r.name.clone()),
            substitute_teacher_id: substitute,
            substitute_name: substitute.and_then(|t| tt.teacher(t)).map(|t| t.name.clone()),
        };
        let i = self.teacher(absent);
        self.teachers[i].periods.push(row);
    }

    fn finish(mut self) -> DayReport {
        for t in &mut self.teachers {
            t.periods.sort_by_key(|p| p.period_no);
        }
        DayReport {
            date: self.date,
            absent_teachers: self.teachers,
        }
    }
}
