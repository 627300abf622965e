//! Built-in candidate rules.
//!
//! | Rule | Raw score | Default weight |
//! |------|-----------|----------------|
//! | `Continuity` | -1 if the candidate teaches the class, else 0 | 1000 |
//! | `DayLoad` | periods taught that weekday | 10 |
//! | `SubstitutionHistory` | substitutions so far this term | 5 |
//!
//! Continuity dominates by a wide margin; among continuity-equal
//! candidates the lighter day wins; among load-equal candidates the one
//! substituted least often wins.

use super::{CandidateRule, RuleScore, ScoringContext};
use crate::models::TeacherId;

/// Prefers candidates who already teach the affected class group.
///
/// Matches any subject of the candidate whose class list contains the
/// affected class, not only single-class subjects.
#[derive(Debug, Clone, Copy)]
pub struct Continuity;

impl CandidateRule for Continuity {
    fn name(&self) -> &'static str {
        "CONTINUITY"
    }

    fn evaluate(&self, candidate: TeacherId, context: &ScoringContext<'_>) -> RuleScore {
        if context.teaches_class(candidate) {
            -1
        } else {
            0
        }
    }

    fn description(&self) -> &'static str {
        "Already teaches this class"
    }
}

/// Prefers candidates with fewer periods of their own that day.
#[derive(Debug, Clone, Copy)]
pub struct DayLoad;

impl CandidateRule for DayLoad {
    fn name(&self) -> &'static str {
        "DAY_LOAD"
    }

    fn evaluate(&self, candidate: TeacherId, context: &ScoringContext<'_>) -> RuleScore {
        context.periods_today(candidate) as RuleScore
    }

    fn description(&self) -> &'static str {
        "Periods scheduled that weekday"
    }
}

/// Prefers candidates who have substituted least often this term.
#[derive(Debug, Clone, Copy)]
pub struct SubstitutionHistory;

impl CandidateRule for SubstitutionHistory {
    fn name(&self) -> &'static str {
        "HISTORY"
    }

    fn evaluate(&self, candidate: TeacherId, context: &ScoringContext<'_>) -> RuleScore {
        RuleScore::from(context.previous_substitutions(candidate))
    }

    fn description(&self) -> &'static str {
        "Substitutions so far this term"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClassGroup, Period, ScheduleEntry, Subject, Teacher};
    use crate::scoring::SubstitutionCounts;
    use crate::timetable::Timetable;

    fn timetable() -> Timetable {
        Timetable::new(
            vec![Teacher::new(1, "absent"), Teacher::new(2, "T2"), Teacher::new(3, "T3")],
            vec![ClassGroup::new(10, "A"), ClassGroup::new(11, "B")],
            vec![],
            vec![Period::new(1, 1), Period::new(2, 2), Period::new(3, 3)],
            vec![
                Subject::new(50, 1, 10),
                // T2 teaches a subject shared by B and A.
                Subject::new(51, 2, 11).with_class(10),
            ],
            vec![
                ScheduleEntry::new(500, 50, 10, 1, 1),
                ScheduleEntry::new(501, 51, 11, 1, 2),
                ScheduleEntry::new(502, 51, 10, 1, 3),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_continuity_matches_shared_subject() {
        let tt = timetable();
        let history = SubstitutionCounts::new();
        let entry = tt.entry(500).unwrap();
        let ctx = ScoringContext::new(&tt, entry, &history);
        assert_eq!(Continuity.evaluate(2, &ctx), -1);
        assert_eq!(Continuity.evaluate(3, &ctx), 0);
    }

    #[test]
    fn test_day_load() {
        let tt = timetable();
        let history = SubstitutionCounts::new();
        let ctx = ScoringContext::new(&tt, tt.entry(500).unwrap(), &history);
        assert_eq!(DayLoad.evaluate(2, &ctx), 2);
        assert_eq!(DayLoad.evaluate(3, &ctx), 0);
    }

    #[test]
    fn test_history_defaults_to_zero() {
        let tt = timetable();
        let mut history = SubstitutionCounts::new();
        history.insert(3, 4);
        let ctx = ScoringContext::new(&tt, tt.entry(500).unwrap(), &history);
        assert_eq!(SubstitutionHistory.evaluate(3, &ctx), 4);
        assert_eq!(SubstitutionHistory.evaluate(2, &ctx), 0);
    }
}
