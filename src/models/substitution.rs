//! Substitution records.
//!
//! One [`Substitution`] exists per (absent teacher, date); one
//! [`SubstitutionAssignment`] per covered period. The set of assignments
//! for a substitution is its "periods covered" detail.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{ScheduleId, SubstitutionId, TeacherId};

/// An absence of one teacher on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Substitution {
    /// Identifier assigned by persistence (`None` until stored).
    pub id: Option<SubstitutionId>,
    /// The absent teacher.
    pub absent_teacher_id: TeacherId,
    /// Date of absence.
    pub absent_date: NaiveDate,
    /// Free-text reason.
    pub reason: Option<String>,
}

/// Coverage of one schedule entry by a substitute on the absence date.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubstitutionAssignment {
    /// The covered schedule entry.
    pub schedule_id: ScheduleId,
    /// Teacher normally teaching the entry.
    pub absent_teacher_id: TeacherId,
    /// Teacher covering it.
    pub substitute_teacher_id: TeacherId,
    /// Date of absence.
    pub absent_date: NaiveDate,
}

impl Substitution {
    /// Creates an unsaved substitution record.
    pub fn new(absent_teacher_id: TeacherId, absent_date: NaiveDate) -> Self {
        Self {
            id: None,
            absent_teacher_id,
            absent_date,
            reason: None,
        }
    }

    /// Sets the reason.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

impl SubstitutionAssignment {
    /// Creates an assignment record.
    pub fn new(
        schedule_id: ScheduleId,
        absent_teacher_id: TeacherId,
        substitute_teacher_id: TeacherId,
        absent_date: NaiveDate,
    ) -> Self {
        Self {
            schedule_id,
            absent_teacher_id,
            substitute_teacher_id,
            absent_date,
        }
    }
}
