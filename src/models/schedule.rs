//! Schedule entry model.
//!
//! A schedule entry places one subject for one class into a
//! (day, period) slot of the weekly grid. For a fixed
//! (class, day, period) there is at most one entry; the engine relies on
//! that but does not check it.
//!
//! # Period normalization
//! Upstream sources disagree on how an entry names its period: `period`,
//! `period_number`, `period_no`, or only a raw `period_id`. The raw record
//! keeps all of them; [`RawScheduleEntry::resolve`] collapses them into
//! the single canonical `period_no` once, at load time.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{ClassId, PeriodId, RoomId, ScheduleId, SubjectId};

/// A normalized schedule entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// Unique entry identifier.
    pub id: ScheduleId,
    /// Subject taught in this slot.
    pub subject_id: SubjectId,
    /// Class group taught in this slot.
    pub class_id: ClassId,
    /// Day of week (1 = Monday … 7 = Sunday).
    pub day_of_week: u8,
    /// Canonical period ordinal.
    pub period_no: u8,
    /// Room, if assigned.
    pub room_id: Option<RoomId>,
}

/// A schedule entry as produced by upstream sources.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawScheduleEntry {
    pub id: ScheduleId,
    pub subject_id: SubjectId,
    pub class_id: ClassId,
    pub day_of_week: u8,
    #[serde(default)]
    pub period: Option<u8>,
    #[serde(default)]
    pub period_number: Option<u8>,
    #[serde(default)]
    pub period_no: Option<u8>,
    #[serde(default)]
    pub period_id: Option<PeriodId>,
    #[serde(default)]
    pub room_id: Option<RoomId>,
}

impl ScheduleEntry {
    /// Creates a schedule entry without a room.
    pub fn new(
        id: ScheduleId,
        subject_id: SubjectId,
        class_id: ClassId,
        day_of_week: u8,
        period_no: u8,
    ) -> Self {
        Self {
            id,
            subject_id,
            class_id,
            day_of_week,
            period_no,
            room_id: None,
        }
    }

    /// Sets the room.
    pub fn with_room(mut self, room_id: RoomId) -> Self {
        self.room_id = Some(room_id);
        self
    }
}

impl RawScheduleEntry {
    /// Canonical period number of this record.
    ///
    /// Precedence: `period`, `period_number`, `period_no`, then `period_id`
    /// looked up in `period_no_by_id`. Zero counts as absent.
    pub fn period_no(&self, period_no_by_id: &HashMap<PeriodId, u8>) -> Option<u8> {
        [self.period, self.period_number, self.period_no]
            .into_iter()
            .flatten()
            .find(|&p| p > 0)
            .or_else(|| {
                self.period_id
                    .and_then(|pid| period_no_by_id.get(&pid).copied())
                    .filter(|&p| p > 0)
            })
    }

    /// Resolves this record into a normalized entry.
    ///
    /// Returns `None` if no period field could be resolved.
    pub fn resolve(&self, period_no_by_id: &HashMap<PeriodId, u8>) -> Option<ScheduleEntry> {
        let period_no = self.period_no(period_no_by_id)?;
        Some(ScheduleEntry {
            id: self.id,
            subject_id: self.subject_id,
            class_id: self.class_id,
            day_of_week: self.day_of_week,
            period_no,
            room_id: self.room_id,
        })
    }
}

impl From<ScheduleEntry> for RawScheduleEntry {
    fn from(e: ScheduleEntry) -> Self {
        Self {
            id: e.id,
            subject_id: e.subject_id,
            class_id: e.class_id,
            day_of_week: e.day_of_week,
            period: None,
            period_number: None,
            period_no: Some(e.period_no),
            period_id: None,
            room_id: e.room_id,
        }
    }
}
