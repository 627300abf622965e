//! Timetable domain models.
//!
//! Entities are read-only within one engine run. Identifiers are opaque
//! integers assigned by upstream collaborators.
//!
//! # Raw vs. normalized records
//!
//! | Raw (as loaded) | Normalized | Normalization |
//! |-----------------|------------|---------------|
//! | `RawSubject` | `Subject` | `class_id` + `class_ids` merged into one list |
//! | `RawScheduleEntry` | `ScheduleEntry` | period fields collapsed into `period_no` |

pub mod calendar;
mod period;
mod roster;
mod schedule;
mod subject;
mod substitution;

pub use period::Period;
pub use roster::{ClassGroup, Room, RoomType, Teacher};
pub use schedule::{RawScheduleEntry, ScheduleEntry};
pub use subject::{RawSubject, Subject};
pub use substitution::{Substitution, SubstitutionAssignment};

/// Teacher identifier.
pub type TeacherId = u32;
/// Class group identifier.
pub type ClassId = u32;
/// Subject identifier.
pub type SubjectId = u32;
/// Room identifier.
pub type RoomId = u32;
/// Period identifier (not the period ordinal).
pub type PeriodId = u32;
/// Schedule entry identifier.
pub type ScheduleId = u32;
/// Substitution record identifier.
pub type SubstitutionId = u64;
