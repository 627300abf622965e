//! Period model.
//!
//! Periods define the period axis of the weekly grid. Schedule entries
//! refer to a period by its ordinal (`period_no`); some upstream sources
//! refer to it by raw period id instead, which is why the id is kept.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::PeriodId;

/// A teaching period within a school day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    /// Unique period identifier.
    pub id: PeriodId,
    /// Ordinal within the day (1 = first period).
    #[serde(alias = "period_number")]
    pub period_no: u8,
    /// Start time, if known.
    #[serde(default)]
    pub start_time: Option<NaiveTime>,
    /// End time, if known.
    #[serde(default)]
    pub end_time: Option<NaiveTime>,
}

impl Period {
    /// Creates a period without times.
    pub fn new(id: PeriodId, period_no: u8) -> Self {
        Self {
            id,
            period_no,
            start_time: None,
            end_time: None,
        }
    }

    /// Sets start and end times.
    pub fn with_times(mut self, start: NaiveTime, end: NaiveTime) -> Self {
        self.start_time = Some(start);
        self.end_time = Some(end);
        self
    }

    /// Length of the period in minutes, if both times are known.
    pub fn duration_minutes(&self) -> Option<i64> {
        match (self.start_time, self.end_time) {
            (Some(s), Some(e)) => Some((e - s).num_minutes()),
            _ => None,
        }
    }
}
