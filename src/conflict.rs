//! Conflict detection.
//!
//! A teacher is busy at (day, period) iff one of their own schedule
//! entries for that day sits in that period. The detector holds no state
//! and caches nothing: the same teacher can be free in one period and
//! busy in the next.

use crate::models::TeacherId;
use crate::timetable::Timetable;

/// Answers "is this teacher already teaching at this slot?".
#[derive(Debug, Clone, Copy)]
pub struct ConflictDetector<'a> {
    timetable: &'a Timetable,
}

impl<'a> ConflictDetector<'a> {
    /// Creates a detector over a timetable.
    pub fn new(timetable: &'a Timetable) -> Self {
        Self { timetable }
    }

    /// Whether `teacher_id` teaches at (`day_of_week`, `period_no`).
    pub fn is_busy(&self, teacher_id: TeacherId, day_of_week: u8, period_no: u8) -> bool {
        self.timetable
            .schedules_for_teacher_on_day(teacher_id, day_of_week)
            .any(|e| self.timetable.period_number_of(e) == period_no)
    }

    /// Whether `teacher_id` is free at (`day_of_week`, `period_no`).
    #[inline]
    pub fn is_free(&self, teacher_id: TeacherId, day_of_week: u8, period_no: u8) -> bool {
        !self.is_busy(teacher_id, day_of_week, period_no)
    }
}
