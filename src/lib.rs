//! Substitute-teacher assignment for school timetables.
//!
//! Given a weekly timetable snapshot, a date, and the teachers absent on
//! that date, finds every class period that loses its teacher and ranks
//! the teachers who are free to cover it. The caller reviews the ranked
//! candidates, adjusts the choices, and turns them into substitution
//! records for persistence.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Teacher`, `ClassGroup`, `Room`, `Period`,
//!   `Subject`, `ScheduleEntry`, `Substitution`, `SubstitutionAssignment`
//! - **`timetable`**: Snapshot loading, normalization, and indexed queries
//! - **`validation`**: Referential integrity checks over snapshot records
//! - **`conflict`**: Busy/free checks for a teacher in a (day, period) slot
//! - **`scoring`**: Weighted candidate rules (continuity, day load, history)
//! - **`engine`**: Affected-period detection and candidate ranking
//! - **`session`**: Caller-owned choices over one engine run
//! - **`submission`**: Choices to persistence-ready records
//! - **`store`**: Persistence seam with an in-memory implementation
//! - **`stats`**, **`report`**: History aggregation and day overviews
//! - **`config`**, **`error`**: Engine tuning and the crate error type
//!
//! # Architecture
//!
//! The core is pure: it reads an immutable [`Timetable`] and returns
//! values. Persistence and history live behind [`store::SubstitutionStore`];
//! their output feeds back into the next run as
//! [`AssignmentRequest::with_history`].
//!
//! ```text
//! TimetableSnapshot ─load─▶ Timetable ─┐
//!                                       ├─▶ AssignmentEngine ─▶ AssignmentSession
//! AssignmentRequest (date, absent) ─────┘                            │ choose / clear
//!                                                                     ▼
//!                     SubstitutionStore ◀─commit─ Submission ◀── build
//! ```

pub mod config;
pub mod conflict;
pub mod engine;
pub mod error;
pub mod models;
pub mod recommendation;
pub mod report;
pub mod scoring;
pub mod session;
pub mod stats;
pub mod store;
pub mod submission;
pub mod timetable;
pub mod validation;

pub use config::EngineConfig;
pub use conflict::ConflictDetector;
pub use engine::{AssignmentEngine, AssignmentRequest};
pub use error::{ErrorKind, Result, SubstituteError};
pub use recommendation::Recommendation;
pub use report::DayReport;
pub use session::AssignmentSession;
pub use stats::{leaderboard, recorded_dates, substitution_counts};
pub use store::{CommitPolicy, CommitReceipt, InMemoryStore, StoreError, SubstitutionStore};
pub use submission::{build_submission, Submission, SubmissionBuilder};
pub use timetable::{Timetable, TimetableSnapshot};
