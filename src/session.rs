//! Caller-owned assignment session.
//!
//! Holds the recommendations of one engine run together with the
//! current substitute choice for each affected period. Choices start at
//! the engine's defaults and are edited through [`AssignmentSession::choose`]
//! and [`AssignmentSession::clear`], which validate every edit against the
//! period's candidate list. The session is a plain value: nothing in the
//! crate keeps a reference to it.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::error::{Result, SubstituteError};
use crate::models::calendar::weekday_of;
use crate::models::{ScheduleId, TeacherId};
use crate::recommendation::Recommendation;
use crate::submission::{Submission, SubmissionBuilder};

/// Recommendations plus the caller's current choices for one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentSession {
    date: NaiveDate,
    absent_teacher_ids: Vec<TeacherId>,
    recommendations: Vec<Recommendation>,
    choices: BTreeMap<ScheduleId, Option<TeacherId>>,
}

impl AssignmentSession {
    /// Creates a session with every period set to its default.
    pub fn new(
        date: NaiveDate,
        absent_teacher_ids: Vec<TeacherId>,
        recommendations: Vec<Recommendation>,
    ) -> Self {
        let choices = recommendations
            .iter()
            .map(|r| (r.schedule_id(), r.default_teacher))
            .collect();
        Self {
            date,
            absent_teacher_ids,
            recommendations,
            choices,
        }
    }

    /// Date of absence.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Weekday number of the date.
    pub fn day_of_week(&self) -> u8 {
        weekday_of(self.date)
    }

    /// Absent teachers, in selection order.
    pub fn absent_teacher_ids(&self) -> &[TeacherId] {
        &self.absent_teacher_ids
    }

    /// Recommendations, in engine order.
    pub fn recommendations(&self) -> &[Recommendation] {
        &self.recommendations
    }

    /// Recommendation for one affected entry.
    pub fn recommendation(&self, schedule_id: ScheduleId) -> Option<&Recommendation> {
        self.recommendations
            .iter()
            .find(|r| r.schedule_id() == schedule_id)
    }

    /// Whether the run found nothing to cover.
    pub fn is_empty(&self) -> bool {
        self.recommendations.is_empty()
    }

    /// Current choice for a period.
    pub fn choice(&self, schedule_id: ScheduleId) -> Option<TeacherId> {
        self.choices.get(&schedule_id).copied().flatten()
    }

    /// All current choices (`None` = left unassigned).
    pub fn final_choices(&self) -> &BTreeMap<ScheduleId, Option<TeacherId>> {
        &self.choices
    }

    /// Overrides the substitute for a period.
    ///
    /// # Errors
    /// `InvalidInput` if the period is not part of this session, the
    /// teacher is not in its candidate list, or the teacher is already
    /// chosen for another entry in the same period.
    pub fn choose(&mut self, schedule_id: ScheduleId, teacher_id: TeacherId) -> Result<()> {
        let rec = self.recommendation(schedule_id).ok_or_else(|| {
            SubstituteError::InvalidInput(format!("schedule {schedule_id} is not in this session"))
        })?;
        if !rec.has_candidate(teacher_id) {
            return Err(SubstituteError::InvalidInput(format!(
                "teacher {teacher_id} is not a candidate for schedule {schedule_id}"
            )));
        }
        let period_no = rec.period_no;
        if let Some(other) = self.recommendations.iter().find(|r| {
            r.schedule_id() != schedule_id
                && r.period_no == period_no
                && self.choice(r.schedule_id()) == Some(teacher_id)
        }) {
            return Err(SubstituteError::InvalidInput(format!(
                "teacher {teacher_id} already covers schedule {} in period {period_no}",
                other.schedule_id()
            )));
        }
        self.choices.insert(schedule_id, Some(teacher_id));
        Ok(())
    }

    /// Leaves a period unassigned.
    pub fn clear(&mut self, schedule_id: ScheduleId) -> Result<()> {
        match self.choices.get_mut(&schedule_id) {
            Some(choice) => {
                *choice = None;
                Ok(())
            }
            None => Err(SubstituteError::InvalidInput(format!(
                "schedule {schedule_id} is not in this session"
            ))),
        }
    }

    /// Restores every period to the engine's default.
    pub fn reset(&mut self) {
        for rec in &self.recommendations {
            self.choices.insert(rec.schedule_id(), rec.default_teacher);
        }
    }

    /// Periods currently without a substitute.
    pub fn unresolved(&self) -> Vec<&Recommendation> {
        self.recommendations
            .iter()
            .filter(|r| self.choice(r.schedule_id()).is_none())
            .collect()
    }

    /// Periods `teacher_id` currently covers.
    pub fn periods_covered_by(&self, teacher_id: TeacherId) -> Vec<u8> {
        self.recommendations
            .iter()
            .filter(|r| self.choice(r.schedule_id()) == Some(teacher_id))
            .map(|r| r.period_no)
            .collect()
    }

    /// Builds persistence-ready records from the current choices.
    pub fn submission(&self, config: &EngineConfig) -> Result<Submission> {
        self.submission_builder(config).build()
    }

    /// Submission builder pre-filled from this session, for adding reasons.
    pub fn submission_builder(&self, config: &EngineConfig) -> SubmissionBuilder<'_> {
        SubmissionBuilder::new(self.date, &self.recommendations)
            .with_absent_teachers(self.absent_teacher_ids.iter().copied())
            .with_choices(self.choices.clone())
            .with_default_reason(config.default_reason.clone())
    }
}
