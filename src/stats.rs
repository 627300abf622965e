//! Substitution statistics.
//!
//! Aggregates stored [`SubstitutionAssignment`] history. The counts feed
//! back into the engine as [`AssignmentRequest`](crate::engine::AssignmentRequest)
//! history, closing the fairness loop.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Substitution count | Assignments a teacher covered |
//! | Leaderboard | Roster ordered by count, busiest first |
//! | Recorded dates | Dates with assignments, newest first |

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{SubstitutionAssignment, TeacherId};
use crate::scoring::SubstitutionCounts;
use crate::timetable::Timetable;

/// Counts how many periods each teacher covered.
pub fn substitution_counts(assignments: &[SubstitutionAssignment]) -> SubstitutionCounts {
    let mut counts = SubstitutionCounts::new();
    for a in assignments {
        *counts.entry(a.substitute_teacher_id).or_insert(0) += 1;
    }
    counts
}

/// Counts restricted to a date range (inclusive), e.g. one term.
pub fn substitution_counts_between(
    assignments: &[SubstitutionAssignment],
    from: NaiveDate,
    to: NaiveDate,
) -> SubstitutionCounts {
    let mut counts = SubstitutionCounts::new();
    for a in assignments
        .iter()
        .filter(|a| a.absent_date >= from && a.absent_date <= to)
    {
        *counts.entry(a.substitute_teacher_id).or_insert(0) += 1;
    }
    counts
}

/// One row of the substitution leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub teacher_id: TeacherId,
    pub name: String,
    pub subject_group: String,
    pub substitution_count: u32,
}

/// Every rostered teacher with their count, busiest first.
///
/// Teachers with no history appear with zero. Ties keep roster order.
pub fn leaderboard(timetable: &Timetable, counts: &SubstitutionCounts) -> Vec<LeaderboardEntry> {
    let mut rows: Vec<LeaderboardEntry> = timetable
        .teachers()
        .iter()
        .map(|t| LeaderboardEntry {
            teacher_id: t.id,
            name: t.name.clone(),
            subject_group: t.subject_group.clone(),
            substitution_count: counts.get(&t.id).copied().unwrap_or(0),
        })
        .collect();
    rows.sort_by(|a, b| b.substitution_count.cmp(&a.substitution_count));
    rows
}

/// Dates with at least one assignment and their assignment count,
/// newest first.
pub fn recorded_dates(assignments: &[SubstitutionAssignment]) -> Vec<(NaiveDate, usize)> {
    let mut by_date: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for a in assignments {
        *by_date.entry(a.absent_date).or_insert(0) += 1;
    }
    by_date.into_iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Teacher;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn history() -> Vec<SubstitutionAssignment> {
        vec![
            SubstitutionAssignment::new(500, 1, 2, day(3)),
            SubstitutionAssignment::new(501, 1, 3, day(3)),
            SubstitutionAssignment::new(502, 1, 3, day(4)),
            SubstitutionAssignment::new(503, 4, 3, day(10)),
        ]
    }

    #[test]
    fn test_substitution_counts() {
        let counts = substitution_counts(&history());
        assert_eq!(counts.get(&2), Some(&1));
        assert_eq!(counts.get(&3), Some(&3));
        assert_eq!(counts.get(&1), None);
    }

    #[test]
    fn test_counts_between() {
        let counts = substitution_counts_between(&history(), day(3), day(4));
        assert_eq!(counts.get(&3), Some(&2));
    }

    #[test]
    fn test_leaderboard_order() {
        let tt = Timetable::new(
            vec![
                Teacher::new(1, "T1"),
                Teacher::new(2, "T2").with_subject_group("Math"),
                Teacher::new(3, "T3"),
                Teacher::new(4, "T4"),
            ],
            vec![],
            vec![],
            vec![],
            vec![],
            vec![],
        )
        .unwrap();
        let rows = leaderboard(&tt, &substitution_counts(&history()));
        let order: Vec<_> = rows
            .iter()
            .map(|r| (r.teacher_id, r.substitution_count))
            .collect();
        assert_eq!(order, vec![(3, 3), (2, 1), (1, 0), (4, 0)]);
        assert_eq!(rows[1].subject_group, "Math");
    }

    #[test]
    fn test_recorded_dates_newest_first() {
        assert_eq!(
            recorded_dates(&history()),
            vec![(day(10), 1), (day(4), 1), (day(3), 2)]
        );
        assert!(recorded_dates(&[]).is_empty());
    }
}
