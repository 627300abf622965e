//! Submission step.
//!
//! Converts finalized choices into persistence-ready records:
//! - one [`Substitution`] per absent teacher with at least one covered period
//! - one [`SubstitutionAssignment`] per period with a chosen substitute
//!
//! Validation is strict. Any choice that names an unknown period, a
//! teacher outside the period's candidate list, or a teacher already
//! covering another entry in the same period rejects the whole
//! submission; invalid choices are never silently dropped. No I/O
//! happens here.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SubstituteError};
use crate::models::calendar::weekday_of;
use crate::models::{ScheduleId, Substitution, SubstitutionAssignment, TeacherId};
use crate::recommendation::Recommendation;

/// Persistence-ready records for one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    /// Date of absence.
    pub date: NaiveDate,
    /// One record per absent teacher with covered periods.
    pub substitutions: Vec<Substitution>,
    /// One record per covered period, in recommendation order.
    pub assignments: Vec<SubstitutionAssignment>,
}

impl Submission {
    /// Whether nothing would be persisted.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Assignments covering `absent_teacher_id`'s periods.
    pub fn periods_covered(&self, absent_teacher_id: TeacherId) -> Vec<&SubstitutionAssignment> {
        self.assignments
            .iter()
            .filter(|a| a.absent_teacher_id == absent_teacher_id)
            .collect()
    }
}

/// Builds a [`Submission`] from recommendations and final choices.
///
/// Choices map a schedule id to a substitute (`None` = unassigned).
/// Recommendations without a choice are left unassigned.
#[derive(Debug, Clone)]
pub struct SubmissionBuilder<'a> {
    date: NaiveDate,
    recommendations: &'a [Recommendation],
    absent_teacher_ids: Vec<TeacherId>,
    choices: BTreeMap<ScheduleId, Option<TeacherId>>,
    reasons: HashMap<TeacherId, String>,
    default_reason: Option<String>,
}

impl<'a> SubmissionBuilder<'a> {
    /// Creates a builder for the day's recommendations.
    pub fn new(date: NaiveDate, recommendations: &'a [Recommendation]) -> Self {
        Self {
            date,
            recommendations,
            absent_teacher_ids: Vec::new(),
            choices: BTreeMap::new(),
            reasons: HashMap::new(),
            default_reason: None,
        }
    }

    /// Sets the absent teachers of the run.
    pub fn with_absent_teachers(mut self, ids: impl IntoIterator<Item = TeacherId>) -> Self {
        self.absent_teacher_ids = ids.into_iter().collect();
        self
    }

    /// Sets all final choices.
    pub fn with_choices(mut self, choices: BTreeMap<ScheduleId, Option<TeacherId>>) -> Self {
        self.choices = choices;
        self
    }

    /// Sets one final choice.
    pub fn with_choice(mut self, schedule_id: ScheduleId, teacher_id: Option<TeacherId>) -> Self {
        self.choices.insert(schedule_id, teacher_id);
        self
    }

    /// Sets the reason for one absent teacher.
    pub fn with_reason(mut self, teacher_id: TeacherId, reason: impl Into<String>) -> Self {
        self.reasons.insert(teacher_id, reason.into());
        self
    }

    /// Sets the reason used when a teacher has none.
    pub fn with_default_reason(mut self, reason: Option<String>) -> Self {
        self.default_reason = reason;
        self
    }

    /// Validates the choices and builds the records.
    ///
    /// # Errors
    /// `InvalidInput` if:
    /// - no absent teacher is given
    /// - a recommendation belongs to a teacher outside the absent set, or
    ///   to another weekday than `date`
    /// - a choice names a schedule id not among the recommendations
    /// - a chosen teacher is not in that period's candidate list
    /// - one teacher is chosen for two entries in the same period
    /// - a reason is given for a teacher who is not absent
    pub fn build(self) -> Result<Submission> {
        if self.absent_teacher_ids.is_empty() {
            return Err(SubstituteError::InvalidInput(
                "at least one absent teacher is required".into(),
            ));
        }
        let absent: HashSet<TeacherId> = self.absent_teacher_ids.iter().copied().collect();
        let day = weekday_of(self.date);

        let mut by_schedule: HashMap<ScheduleId, &Recommendation> = HashMap::new();
        for rec in self.recommendations {
            if !absent.contains(&rec.absent_teacher_id) {
                return Err(SubstituteError::InvalidInput(format!(
                    "schedule {} belongs to teacher {}, who is not marked absent",
                    rec.schedule_id(),
                    rec.absent_teacher_id
                )));
            }
            if rec.entry.day_of_week != day {
                return Err(SubstituteError::InvalidInput(format!(
                    "schedule {} is on weekday {}, but {} is weekday {day}",
                    rec.schedule_id(),
                    rec.entry.day_of_week,
                    self.date
                )));
            }
            by_schedule.insert(rec.schedule_id(), rec);
        }

        let mut booked: HashMap<(TeacherId, u8), ScheduleId> = HashMap::new();
        for (&schedule_id, &choice) in &self.choices {
            let rec = by_schedule.get(&schedule_id).ok_or_else(|| {
                SubstituteError::InvalidInput(format!(
                    "schedule {schedule_id} is not among the day's recommendations"
                ))
            })?;
            let Some(teacher_id) = choice else {
                continue;
            };
            if !rec.has_candidate(teacher_id) {
                return Err(SubstituteError::InvalidInput(format!(
                    "teacher {teacher_id} is not a candidate for schedule {schedule_id}"
                )));
            }
            if let Some(other) = booked.insert((teacher_id, rec.period_no), schedule_id) {
                return Err(SubstituteError::InvalidInput(format!(
                    "teacher {teacher_id} chosen for schedules {other} and {schedule_id} in period {}",
                    rec.period_no
                )));
            }
        }

        if let Some(teacher_id) = self.reasons.keys().find(|&&t| !absent.contains(&t)) {
            return Err(SubstituteError::InvalidInput(format!(
                "reason given for teacher {teacher_id}, who is not marked absent"
            )));
        }

        let mut assignments = Vec::new();
        let mut substitutions: Vec<Substitution> = Vec::new();
        for rec in self.recommendations {
            let Some(substitute) = self.choices.get(&rec.schedule_id()).copied().flatten() else {
                continue;
            };
            assignments.push(SubstitutionAssignment::new(
                rec.schedule_id(),
                rec.absent_teacher_id,
                substitute,
                self.date,
            ));
            if !substitutions
                .iter()
                .any(|s| s.absent_teacher_id == rec.absent_teacher_id)
            {
                let sub = Substitution::new(rec.absent_teacher_id, self.date);
                let reason = self
                    .reasons
                    .get(&rec.absent_teacher_id)
                    .or(self.default_reason.as_ref());
                substitutions.push(match reason {
                    Some(reason) => sub.with_reason(reason.as_str()),
                    None => sub,
                });
            }
        }

        debug!(
            date = %self.date,
            substitutions = substitutions.len(),
            assignments = assignments.len(),
            "submission built"
        );

        Ok(Submission {
            date: self.date,
            substitutions,
            assignments,
        })
    }
}

/// Builds a submission without reasons.
///
/// Shorthand for [`SubmissionBuilder`] with absent teachers and choices.
pub fn build_submission(
    date: NaiveDate,
    absent_teacher_ids: &[TeacherId],
    recommendations: &[Recommendation],
    final_choices: &BTreeMap<ScheduleId, Option<TeacherId>>,
) -> Result<Submission> {
    SubmissionBuilder::new(date, recommendations)
        .with_absent_teachers(absent_teacher_ids.iter().copied())
        .with_choices(final_choices.clone())
        .build()
}
