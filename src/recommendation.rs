//! Per-period recommendation output.

use serde::{Deserialize, Serialize};

use crate::models::{ScheduleEntry, ScheduleId, TeacherId};
use crate::scoring::RankedCandidate;

/// The engine's proposal for one affected period.
///
/// `candidates` is the full ranked list of free teachers (not a top-N);
/// the caller may override `default_teacher` with any of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    /// The affected schedule entry.
    pub entry: ScheduleEntry,
    /// Teacher normally teaching the entry.
    pub absent_teacher_id: TeacherId,
    /// Canonical period number of the entry.
    pub period_no: u8,
    /// Free candidates, best first.
    pub candidates: Vec<RankedCandidate>,
    /// Pre-selected substitute, if any candidate is available.
    pub default_teacher: Option<TeacherId>,
}

impl Recommendation {
    /// Schedule id of the affected entry.
    #[inline]
    pub fn schedule_id(&self) -> ScheduleId {
        self.entry.id
    }

    /// Whether no teacher is free for this period.
    ///
    /// Not an error: the caller must resolve the period manually.
    pub fn is_unresolvable(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Whether `teacher_id` is in the candidate list.
    pub fn has_candidate(&self, teacher_id: TeacherId) -> bool {
        self.candidate(teacher_id).is_some()
    }

    /// Candidate entry for `teacher_id`.
    pub fn candidate(&self, teacher_id: TeacherId) -> Option<&RankedCandidate> {
        self.candidates.iter().find(|c| c.teacher_id == teacher_id)
    }

    /// Warning text for an unresolvable period.
    pub fn warning(&self) -> Option<String> {
        self.is_unresolvable().then(|| {
            format!(
                "no teacher available for period {} (schedule {}, class {})",
                self.period_no, self.entry.id, self.entry.class_id
            )
        })
    }
}
