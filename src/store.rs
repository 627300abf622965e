//! Persistence seam.
//!
//! The core never performs I/O; a host persists a [`Submission`] through
//! a [`SubstitutionStore`]. Implementations must apply a bundle
//! atomically and keep at most one [`Substitution`] per
//! (absent teacher, date).
//!
//! [`InMemoryStore`] is the reference implementation: it checks the whole
//! bundle before applying anything.
//!
//! # Commit policies
//!
//! | Policy | Date already has records |
//! |--------|--------------------------|
//! | `RejectExisting` | fail with `DuplicateDate`, nothing written |
//! | `ReplaceDate` | delete every record of that date, then insert |

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use thiserror::Error;
use tracing::info;

use crate::models::{
    ScheduleId, Substitution, SubstitutionAssignment, SubstitutionId, TeacherId,
};
use crate::submission::Submission;

/// Persistence error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("substitutions already recorded for {date} (absent teachers: {teachers:?})")]
    DuplicateDate {
        date: NaiveDate,
        teachers: Vec<TeacherId>,
    },

    #[error("teacher {teacher} appears twice as absent on {date}")]
    DuplicateSubstitution { teacher: TeacherId, date: NaiveDate },

    #[error("schedule {schedule_id} is covered twice on {date}")]
    DuplicateAssignment {
        schedule_id: ScheduleId,
        date: NaiveDate,
    },

    #[error("assignment for schedule {schedule_id} has no substitution record for teacher {teacher}")]
    OrphanAssignment {
        schedule_id: ScheduleId,
        teacher: TeacherId,
    },

    #[error("record dated {found} in a bundle for {expected}")]
    DateMismatch {
        expected: NaiveDate,
        found: NaiveDate,
    },
}

/// What to do when the date already has records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CommitPolicy {
    /// Refuse the bundle.
    #[default]
    RejectExisting,
    /// Replace all records of the date.
    ReplaceDate,
}

/// Result of a successful commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitReceipt {
    /// Ids given to the new substitution records, in bundle order.
    pub substitution_ids: Vec<SubstitutionId>,
    /// Number of assignment records written.
    pub assignment_count: usize,
    /// Number of assignment records deleted by `ReplaceDate`.
    pub replaced: usize,
}

/// Storage for substitution records.
pub trait SubstitutionStore {
    /// Substitution records of one date.
    fn existing_for_date(&self, date: NaiveDate) -> Vec<Substitution>;

    /// Applies a bundle atomically.
    fn commit(
        &mut self,
        submission: &Submission,
        policy: CommitPolicy,
    ) -> Result<CommitReceipt, StoreError>;

    /// Every stored assignment (history for stats).
    fn assignments(&self) -> Vec<SubstitutionAssignment>;
}

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    next_id: SubstitutionId,
    substitutions: BTreeMap<(NaiveDate, TeacherId), Substitution>,
    assignments: Vec<SubstitutionAssignment>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored substitution records.
    pub fn substitution_count(&self) -> usize {
        self.substitutions.len()
    }

    fn check_bundle(submission: &Submission) -> Result<(), StoreError> {
        let date = submission.date;
        let mut teachers = HashSet::new();
        for sub in &submission.substitutions {
            if sub.absent_date != date {
                return Err(StoreError::DateMismatch {
                    expected: date,
                    found: sub.absent_date,
                });
            }
            if !teachers.insert(sub.absent_teacher_id) {
                return Err(StoreError::DuplicateSubstitution {
                    teacher: sub.absent_teacher_id,
                    date,
                });
            }
        }
        let mut covered = HashSet::new();
        for a in &submission.assignments {
            if a.absent_date != date {
                return Err(StoreError::DateMismatch {
                    expected: date,
                    found: a.absent_date,
                });
            }
            if !covered.insert(a.schedule_id) {
                return Err(StoreError::DuplicateAssignment {
                    schedule_id: a.schedule_id,
                    date,
                });
            }
            if !teachers.contains(&a.absent_teacher_id) {
                return Err(StoreError::OrphanAssignment {
                    schedule_id: a.schedule_id,
                    teacher: a.absent_teacher_id,
                });
            }
        }
        Ok(())
    }
}

impl SubstitutionStore for InMemoryStore {
    fn existing_for_date(&self, date: NaiveDate) -> Vec<Substitution> {
        self.substitutions
            .range((date, TeacherId::MIN)..=(date, TeacherId::MAX))
            .map(|(_, s)| s.clone())
            .collect()
    }

    fn commit(
        &mut self,
        submission: &Submission,
        policy: CommitPolicy,
    ) -> Result<CommitReceipt, StoreError> {
        Self::check_bundle(submission)?;

        let date = submission.date;
        let existing = self.existing_for_date(date);
        let mut replaced = 0;
        if !existing.is_empty() {
            match policy {
                CommitPolicy::RejectExisting => {
                    return Err(StoreError::DuplicateDate {
                        date,
                        teachers: existing.iter().map(|s| s.absent_teacher_id).collect(),
                    });
                }
                CommitPolicy::ReplaceDate => {
                    for s in &existing {
                        self.substitutions.remove(&(date, s.absent_teacher_id));
                    }
                    let before = self.assignments.len();
                    self.assignments.retain(|a| a.absent_date != date);
                    replaced = before - self.assignments.len();
                }
            }
        }

        let mut substitution_ids = Vec::with_capacity(submission.substitutions.len());
        for sub in &submission.substitutions {
            self.next_id += 1;
            let mut stored = sub.clone();
            stored.id = Some(self.next_id);
            substitution_ids.push(self.next_id);
            self.substitutions
                .insert((date, sub.absent_teacher_id), stored);
        }
        self.assignments
            .extend(submission.assignments.iter().cloned());

        info!(
            %date,
            substitutions = substitution_ids.len(),
            assignments = submission.assignments.len(),
            replaced,
            "substitutions committed"
        );

        Ok(CommitReceipt {
            substitution_ids,
            assignment_count: submission.assignments.len(),
            replaced,
        })
    }

    fn assignments(&self) -> Vec<SubstitutionAssignment> {
        self.assignments.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
    }

    fn bundle(date: NaiveDate, absent: TeacherId, covered: &[(ScheduleId, TeacherId)]) -> Submission {
        Submission {
            date,
            substitutions: vec![Substitution::new(absent, date)],
            assignments: covered
                .iter()
                .map(|&(s, t)| SubstitutionAssignment::new(s, absent, t, date))
                .collect(),
        }
    }

    #[test]
    fn test_commit_assigns_ids() {
        let mut store = InMemoryStore::new();
        let receipt = store
            .commit(&bundle(monday(), 1, &[(500, 2), (501, 3)]), CommitPolicy::default())
            .unwrap();
        assert_eq!(receipt.substitution_ids, vec![1]);
        assert_eq!(receipt.assignment_count, 2);
        assert_eq!(store.existing_for_date(monday())[0].id, Some(1));
        assert_eq!(store.assignments().len(), 2);
    }

    #[test]
    fn test_duplicate_date_rejected_atomically() {
        let mut store = InMemoryStore::new();
        store
            .commit(&bundle(monday(), 1, &[(500, 2)]), CommitPolicy::RejectExisting)
            .unwrap();
        let err = store
            .commit(&bundle(monday(), 4, &[(600, 2)]), CommitPolicy::RejectExisting)
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::DuplicateDate {
                date: monday(),
                teachers: vec![1]
            }
        );
        assert_eq!(store.substitution_count(), 1);
        assert_eq!(store.assignments().len(), 1);
    }

    #[test]
    fn test_replace_date() {
        let mut store = InMemoryStore::new();
        let tuesday = monday().succ_opt().unwrap();
        store
            .commit(&bundle(monday(), 1, &[(500, 2), (501, 3)]), CommitPolicy::default())
            .unwrap();
        store
            .commit(&bundle(tuesday, 1, &[(510, 2)]), CommitPolicy::default())
            .unwrap();
        let receipt = store
            .commit(&bundle(monday(), 4, &[(600, 3)]), CommitPolicy::ReplaceDate)
            .unwrap();
        assert_eq!(receipt.replaced, 2);
        let monday_subs = store.existing_for_date(monday());
        assert_eq!(monday_subs.len(), 1);
        assert_eq!(monday_subs[0].absent_teacher_id, 4);
        assert_eq!(store.existing_for_date(tuesday).len(), 1);
        assert_eq!(store.assignments().len(), 2);
    }

    #[test]
    fn test_orphan_assignment_rejected() {
        let mut store = InMemoryStore::new();
        let mut b = bundle(monday(), 1, &[(500, 2)]);
        b.assignments[0].absent_teacher_id = 9;
        let err = store.commit(&b, CommitPolicy::default()).unwrap_err();
        assert!(matches!(err, StoreError::OrphanAssignment { schedule_id: 500, .. }));
        assert_eq!(store.substitution_count(), 0);
    }

    #[test]
    fn test_duplicate_records_in_bundle_rejected() {
        let mut store = InMemoryStore::new();
        let mut b = bundle(monday(), 1, &[(500, 2), (500, 3)]);
        assert!(matches!(
            store.commit(&b, CommitPolicy::default()),
            Err(StoreError::DuplicateAssignment { .. })
        ));
        b.assignments.pop();
        b.substitutions.push(Substitution::new(1, monday()));
        assert!(matches!(
            store.commit(&b, CommitPolicy::default()),
            Err(StoreError::DuplicateSubstitution { .. })
        ));
    }

    #[test]
    fn test_date_mismatch_rejected() {
        let mut store = InMemoryStore::new();
        let mut b = bundle(monday(), 1, &[(500, 2)]);
        b.assignments[0].absent_date = monday().succ_opt().unwrap();
        assert!(matches!(
            store.commit(&b, CommitPolicy::default()),
            Err(StoreError::DateMismatch { .. })
        ));
    }
}
