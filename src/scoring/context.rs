//! Scoring context for candidate rule evaluation.

use std::collections::HashMap;

use crate::models::{ClassId, ScheduleEntry, TeacherId};
use crate::timetable::Timetable;

/// Historical substitution count per teacher for the current term.
///
/// Missing teachers count as zero.
pub type SubstitutionCounts = HashMap<TeacherId, u32>;

/// Everything a rule may look at when scoring one candidate for one
/// affected period.
#[derive(Debug, Clone, Copy)]
pub struct ScoringContext<'a> {
    /// Timetable snapshot.
    pub timetable: &'a Timetable,
    /// The affected schedule entry being covered.
    pub entry: &'a ScheduleEntry,
    /// Historical substitution counts.
    pub history: &'a SubstitutionCounts,
}

impl<'a> ScoringContext<'a> {
    /// Creates a context for covering `entry`.
    pub fn new(
        timetable: &'a Timetable,
        entry: &'a ScheduleEntry,
        history: &'a SubstitutionCounts,
    ) -> Self {
        Self {
            timetable,
            entry,
            history,
        }
    }

    /// Class of the affected entry.
    #[inline]
    pub fn class_id(&self) -> ClassId {
        self.entry.class_id
    }

    /// Weekday of the affected entry.
    #[inline]
    pub fn day_of_week(&self) -> u8 {
        self.entry.day_of_week
    }

    /// Whether the candidate already teaches the affected class.
    pub fn teaches_class(&self, candidate: TeacherId) -> bool {
        self.timetable.teaches_class(candidate, self.class_id())
    }

    /// Periods the candidate teaches on the affected weekday.
    pub fn periods_today(&self, candidate: TeacherId) -> usize {
        self.timetable.daily_load(candidate, self.day_of_week())
    }

    /// Candidate's substitutions so far this term.
    pub fn previous_substitutions(&self, candidate: TeacherId) -> u32 {
        self.history.get(&candidate).copied().unwrap_or(0)
    }
}
