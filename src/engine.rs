//! Substitute assignment engine.
//!
//! # Algorithm
//!
//! 1. `day = weekday(date)`.
//! 2. Affected entries: every entry any absent teacher teaches that day,
//!    absent teachers in input order, each teacher's entries in period order.
//! 3. Pool: every non-absent teacher, in roster order.
//! 4. For each affected entry, in order:
//!    a. Available: pool members free at that period and not already
//!       defaulted earlier in this run.
//!    b. Rank available candidates by score (stable).
//!    c. Default = best candidate, if any.
//!    d. Record the default before moving on.
//! 5. Return recommendations in processing order.
//!
//! The "already defaulted" set lives only inside one call; the engine
//! itself holds no run state and can be reused freely.
//!
//! # Complexity
//! O(a * p * k) where a=affected entries, p=pool size, k=entries per teacher per day.

use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::conflict::ConflictDetector;
use crate::error::{Result, SubstituteError};
use crate::models::calendar::{is_school_day, parse_date, weekday_of};
use crate::models::{ScheduleEntry, TeacherId};
use crate::recommendation::Recommendation;
use crate::scoring::{CandidateScorer, ScoringContext, SubstitutionCounts};
use crate::session::AssignmentSession;
use crate::timetable::Timetable;

/// Input for one engine run.
#[derive(Debug, Clone)]
pub struct AssignmentRequest {
    /// Date of absence.
    pub date: NaiveDate,
    /// Absent teachers, in selection order.
    pub absent_teacher_ids: Vec<TeacherId>,
    /// Substitutions so far this term per teacher.
    pub history: SubstitutionCounts,
}

impl AssignmentRequest {
    /// Creates a request. Duplicate ids are collapsed, first occurrence wins.
    pub fn new(date: NaiveDate, absent_teacher_ids: impl IntoIterator<Item = TeacherId>) -> Self {
        let mut seen = HashSet::new();
        let absent_teacher_ids = absent_teacher_ids
            .into_iter()
            .filter(|id| seen.insert(*id))
            .collect();
        Self {
            date,
            absent_teacher_ids,
            history: SubstitutionCounts::new(),
        }
    }

    /// Creates a request from an ISO `YYYY-MM-DD` date.
    ///
    /// # Errors
    /// `InvalidInput` if the date is malformed.
    pub fn parse(
        date: &str,
        absent_teacher_ids: impl IntoIterator<Item = TeacherId>,
    ) -> Result<Self> {
        Ok(Self::new(parse_date(date)?, absent_teacher_ids))
    }

    /// Sets historical substitution counts.
    pub fn with_history(mut self, history: SubstitutionCounts) -> Self {
        self.history = history;
        self
    }

    /// Sets one teacher's historical substitution count.
    pub fn with_substitution_count(mut self, teacher_id: TeacherId, count: u32) -> Self {
        self.history.insert(teacher_id, count);
        self
    }

    /// Weekday number of the request date.
    pub fn day_of_week(&self) -> u8 {
        weekday_of(self.date)
    }
}

/// Greedy per-period substitute assignment.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use u_substitute::models::{ClassGroup, Period, ScheduleEntry, Subject, Teacher};
/// use u_substitute::{AssignmentEngine, AssignmentRequest, Timetable};
///
/// let timetable = Timetable::new(
///     vec![Teacher::new(1, "Absent"), Teacher::new(2, "Free")],
///     vec![ClassGroup::new(10, "M.1/1")],
///     vec![],
///     vec![Period::new(1, 1)],
///     vec![Subject::new(50, 1, 10)],
///     vec![ScheduleEntry::new(500, 50, 10, 1, 1)],
/// ).unwrap();
///
/// // 2024-06-03 is a Monday.
/// let date = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
/// let engine = AssignmentEngine::new();
/// let recs = engine.recommend(&timetable, &AssignmentRequest::new(date, [1])).unwrap();
///
/// assert_eq!(recs.len(), 1);
/// assert_eq!(recs[0].default_teacher, Some(2));
/// ```
#[derive(Debug, Clone)]
pub struct AssignmentEngine {
    config: EngineConfig,
    scorer: CandidateScorer,
}

impl AssignmentEngine {
    /// Creates an engine with the default configuration.
    pub fn new() -> Self {
        let config = EngineConfig::default();
        let scorer = CandidateScorer::from_config(&config);
        Self { config, scorer }
    }

    /// Creates an engine from a validated configuration.
    pub fn from_config(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let scorer = CandidateScorer::from_config(&config);
        Ok(Self { config, scorer })
    }

    /// Replaces the scorer (e.g., to add a custom rule).
    pub fn with_scorer(mut self, scorer: CandidateScorer) -> Self {
        self.scorer = scorer;
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Produces one recommendation per affected period.
    ///
    /// # Errors
    /// `InvalidInput` if no absent teacher is given or an absent id is not
    /// on the roster. An empty result means nothing needs covering.
    pub fn recommend(
        &self,
        timetable: &Timetable,
        request: &AssignmentRequest,
    ) -> Result<Vec<Recommendation>> {
        if request.absent_teacher_ids.is_empty() {
            return Err(SubstituteError::InvalidInput(
                "at least one absent teacher is required".into(),
            ));
        }
        if let Some(unknown) = request
            .absent_teacher_ids
            .iter()
            .find(|&&id| timetable.teacher(id).is_none())
        {
            return Err(SubstituteError::InvalidInput(format!(
                "absent teacher {unknown} is not on the roster"
            )));
        }

        let day = request.day_of_week();
        let affected = Self::affected_entries(timetable, &request.absent_teacher_ids, day);

        info!(
            date = %request.date,
            day,
            absent = request.absent_teacher_ids.len(),
            affected = affected.len(),
            "finding substitutes"
        );

        if affected.is_empty() {
            if !is_school_day(request.date) {
                debug!(date = %request.date, "not a school day, nothing to cover");
            }
            return Ok(Vec::new());
        }

        let absent: HashSet<TeacherId> = request.absent_teacher_ids.iter().copied().collect();
        let pool: Vec<TeacherId> = timetable
            .teachers()
            .iter()
            .map(|t| t.id)
            .filter(|id| !absent.contains(id))
            .collect();

        let detector = ConflictDetector::new(timetable);
        // Defaults chosen so far in this run: teacher -> period numbers.
        let mut defaulted: HashSet<TeacherId> = HashSet::new();
        let mut defaulted_at: HashSet<(TeacherId, u8)> = HashSet::new();
        let mut recommendations = Vec::with_capacity(affected.len());

        for (entry, absent_teacher_id) in affected {
            let period_no = timetable.period_number_of(entry);

            let available = pool.iter().copied().filter(|&c| {
                detector.is_free(c, day, period_no)
                    && !defaulted_at.contains(&(c, period_no))
                    && !(self.config.one_default_per_day && defaulted.contains(&c))
            });

            let ctx = ScoringContext::new(timetable, entry, &request.history);
            let candidates = self.scorer.rank(available, &ctx);
            let default_teacher = candidates.first().map(|c| c.teacher_id);

            match candidates.first() {
                Some(best) => debug!(
                    schedule_id = entry.id,
                    period_no,
                    available = candidates.len(),
                    best = best.teacher_id,
                    score = best.score,
                    "period ranked"
                ),
                None => warn!(
                    schedule_id = entry.id,
                    period_no,
                    "no teacher available for period"
                ),
            }

            if let Some(t) = default_teacher {
                defaulted.insert(t);
                defaulted_at.insert((t, period_no));
            }

            recommendations.push(Recommendation {
                entry: entry.clone(),
                absent_teacher_id,
                period_no,
                candidates,
                default_teacher,
            });
        }

        Ok(recommendations)
    }

    /// Runs the engine and wraps the result in a caller-owned session
    /// pre-filled with the defaults.
    pub fn find_substitutes(
        &self,
        timetable: &Timetable,
        request: &AssignmentRequest,
    ) -> Result<AssignmentSession> {
        let recommendations = self.recommend(timetable, request)?;
        Ok(AssignmentSession::new(
            request.date,
            request.absent_teacher_ids.clone(),
            recommendations,
        ))
    }

    fn affected_entries<'t>(
        timetable: &'t Timetable,
        absent_teacher_ids: &[TeacherId],
        day: u8,
    ) -> Vec<(&'t ScheduleEntry, TeacherId)> {
        absent_teacher_ids
            .iter()
            .flat_map(|&t| {
                timetable
                    .schedules_for_teacher_on_day(t, day)
                    .map(move |e| (e, t))
            })
            .collect()
    }
}

impl Default for AssignmentEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::models::{ClassGroup, Period, Subject, Teacher};
    use crate::scoring::rules;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    // 2024-06-03 is a Monday.
    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
    }

    fn periods(n: u8) -> Vec<Period> {
        (1..=n).map(|p| Period::new(u32::from(p), p)).collect()
    }

    /// T1 (absent) teaches A p2 and B p4 on Monday. T2 teaches A on
    /// Tuesday p5. T3 teaches nothing.
    fn scenario() -> Timetable {
        Timetable::new(
            vec![Teacher::new(1, "T1"), Teacher::new(2, "T2"), Teacher::new(3, "T3")],
            vec![ClassGroup::new(10, "A"), ClassGroup::new(11, "B")],
            vec![],
            periods(6),
            vec![
                Subject::new(50, 1, 10).with_class(11),
                Subject::new(51, 2, 10),
            ],
            vec![
                ScheduleEntry::new(500, 50, 10, 1, 2),
                ScheduleEntry::new(501, 50, 11, 1, 4),
                ScheduleEntry::new(502, 51, 10, 2, 5),
            ],
        )
        .unwrap()
    }

    fn defaults(recs: &[Recommendation]) -> Vec<Option<TeacherId>> {
        recs.iter().map(|r| r.default_teacher).collect()
    }

    #[test]
    fn test_continuity_then_one_default_per_day() {
        let tt = scenario();
        let request = AssignmentRequest::new(monday(), [1]).with_substitution_count(3, 3);
        let recs = AssignmentEngine::new().recommend(&tt, &request).unwrap();

        assert_eq!(recs.len(), 2);

        assert_eq!(recs[0].schedule_id(), 500);
        assert_eq!(recs[0].period_no, 2);
        let scores: Vec<_> = recs[0]
            .candidates
            .iter()
            .map(|c| (c.teacher_id, c.score))
            .collect();
        assert_eq!(scores, vec![(2, -1000), (3, 15)]);
        assert_eq!(recs[0].default_teacher, Some(2));

        // T2 already defaulted to period 2, leaving T3.
        assert_eq!(recs[1].schedule_id(), 501);
        assert_eq!(recs[1].candidates.len(), 1);
        assert_eq!(recs[1].default_teacher, Some(3));
    }

    #[test]
    fn test_empty_absent_set_rejected() {
        let tt = scenario();
        let err = AssignmentEngine::new()
            .recommend(&tt, &AssignmentRequest::new(monday(), []))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_unknown_absent_teacher_rejected() {
        let tt = scenario();
        let err = AssignmentEngine::new()
            .recommend(&tt, &AssignmentRequest::new(monday(), [1, 99]))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_nothing_to_cover() {
        let tt = scenario();
        // T3 has no lessons; Saturday has no lessons for anyone.
        let engine = AssignmentEngine::new();
        assert!(engine
            .recommend(&tt, &AssignmentRequest::new(monday(), [3]))
            .unwrap()
            .is_empty());
        let saturday = monday() + chrono::Duration::days(5);
        assert!(engine
            .recommend(&tt, &AssignmentRequest::new(saturday, [1]))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_busy_candidate_excluded() {
        // T2 teaches class B at period 2 on Monday, so cannot cover T1's period 2.
        let tt = Timetable::new(
            vec![Teacher::new(1, "T1"), Teacher::new(2, "T2"), Teacher::new(3, "T3")],
            vec![ClassGroup::new(10, "A"), ClassGroup::new(11, "B")],
            vec![],
            periods(4),
            vec![Subject::new(50, 1, 10), Subject::new(51, 2, 11)],
            vec![
                ScheduleEntry::new(500, 50, 10, 1, 2),
                ScheduleEntry::new(501, 51, 11, 1, 2),
            ],
        )
        .unwrap();
        let recs = AssignmentEngine::new()
            .recommend(&tt, &AssignmentRequest::new(monday(), [1]))
            .unwrap();
        assert!(!recs[0].has_candidate(2));
        assert_eq!(recs[0].default_teacher, Some(3));
    }

    #[test]
    fn test_no_candidates_is_not_an_error() {
        let tt = Timetable::new(
            vec![Teacher::new(1, "T1"), Teacher::new(2, "T2")],
            vec![ClassGroup::new(10, "A")],
            vec![],
            periods(4),
            vec![Subject::new(50, 1, 10), Subject::new(51, 2, 10)],
            vec![
                ScheduleEntry::new(500, 50, 10, 1, 1),
                ScheduleEntry::new(501, 51, 10, 1, 2),
            ],
        )
        .unwrap();
        let recs = AssignmentEngine::new()
            .recommend(&tt, &AssignmentRequest::new(monday(), [1, 2]))
            .unwrap();
        assert_eq!(recs.len(), 2);
        assert!(recs.iter().all(Recommendation::is_unresolvable));
        assert!(recs[0].warning().unwrap().contains("period 1"));
        assert_eq!(defaults(&recs), vec![None, None]);
    }

    #[test]
    fn test_one_default_per_day_can_be_disabled() {
        let tt = scenario();
        let config = EngineConfig::default().with_one_default_per_day(false);
        let engine = AssignmentEngine::from_config(config).unwrap();
        let request = AssignmentRequest::new(monday(), [1]).with_substitution_count(3, 3);
        let recs = engine.recommend(&tt, &request).unwrap();
        // Period 4: T2 (load 0, history 0) = 0 beats T3 = 15.
        assert_eq!(defaults(&recs), vec![Some(2), Some(2)]);
    }

    #[test]
    fn test_same_period_never_double_defaulted() {
        // Two absent teachers both teach period 1; one free teacher.
        let tt = Timetable::new(
            vec![Teacher::new(1, "T1"), Teacher::new(2, "T2"), Teacher::new(3, "T3")],
            vec![ClassGroup::new(10, "A"), ClassGroup::new(11, "B")],
            vec![],
            periods(2),
            vec![Subject::new(50, 1, 10), Subject::new(51, 2, 11)],
            vec![
                ScheduleEntry::new(500, 50, 10, 1, 1),
                ScheduleEntry::new(501, 51, 11, 1, 1),
            ],
        )
        .unwrap();
        let config = EngineConfig::default().with_one_default_per_day(false);
        let recs = AssignmentEngine::from_config(config)
            .unwrap()
            .recommend(&tt, &AssignmentRequest::new(monday(), [1, 2]))
            .unwrap();
        assert_eq!(defaults(&recs), vec![Some(3), None]);
    }

    #[test]
    fn test_affected_order_follows_absent_selection() {
        let tt = Timetable::new(
            vec![Teacher::new(1, "T1"), Teacher::new(2, "T2"), Teacher::new(3, "T3")],
            vec![ClassGroup::new(10, "A"), ClassGroup::new(11, "B")],
            vec![],
            periods(4),
            vec![Subject::new(50, 1, 10), Subject::new(51, 2, 11)],
            vec![
                ScheduleEntry::new(500, 50, 10, 1, 3),
                ScheduleEntry::new(501, 51, 11, 1, 1),
            ],
        )
        .unwrap();
        let engine = AssignmentEngine::new();
        let ids = |absent: [TeacherId; 2]| -> Vec<_> {
            engine
                .recommend(&tt, &AssignmentRequest::new(monday(), absent))
                .unwrap()
                .iter()
                .map(Recommendation::schedule_id)
                .collect()
        };
        assert_eq!(ids([1, 2]), vec![500, 501]);
        assert_eq!(ids([2, 1]), vec![501, 500]);
    }

    #[test]
    fn test_custom_scorer() {
        let tt = scenario();
        // Only history counts: T3 (3 subs) loses to T2 even without continuity.
        let engine = AssignmentEngine::new()
            .with_scorer(CandidateScorer::new().with_rule(rules::SubstitutionHistory, 1));
        let request = AssignmentRequest::new(monday(), [1]).with_substitution_count(3, 3);
        let recs = engine.recommend(&tt, &request).unwrap();
        assert_eq!(recs[0].candidates[0].score, 0);
        assert_eq!(recs[0].default_teacher, Some(2));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = AssignmentEngine::from_config(EngineConfig::default().with_load_weight(-3))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        let err = AssignmentEngine::from_config(
            EngineConfig::default().with_history_weight(i64::MAX),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_extreme_custom_weight_does_not_overflow() {
        let tt = scenario();
        let engine = AssignmentEngine::new()
            .with_scorer(CandidateScorer::new().with_rule(rules::SubstitutionHistory, i64::MAX));
        let request = AssignmentRequest::new(monday(), [1]).with_substitution_count(3, 2);
        let recs = engine.recommend(&tt, &request).unwrap();
        assert_eq!(recs[0].candidate(3).unwrap().score, i64::MAX);
        assert_eq!(recs[0].default_teacher, Some(2));
    }

    #[test]
    fn test_request_from_iso_date() {
        let tt = scenario();
        let request = AssignmentRequest::parse("2024-06-03", [1]).unwrap();
        assert_eq!(request.day_of_week(), 1);
        assert_eq!(AssignmentEngine::new().recommend(&tt, &request).unwrap().len(), 2);
        let err = AssignmentRequest::parse("03/06/2024", [1]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn test_find_substitutes_session() {
        let tt = scenario();
        let session = AssignmentEngine::new()
            .find_substitutes(&tt, &AssignmentRequest::new(monday(), [1, 1]))
            .unwrap();
        assert_eq!(session.absent_teacher_ids(), &[1]);
        assert_eq!(session.choice(500), Some(2));
        assert_eq!(session.choice(501), Some(3));
    }

    // ======================== Randomized properties ========================

    /// Random timetable: `n_teachers` teachers, one subject each over a
    /// random class, entries placed so no class is double-booked.
    fn random_timetable(rng: &mut StdRng, n_teachers: u32) -> Timetable {
        let n_classes = 6u32;
        let n_periods = 8u8;
        let teachers = (1..=n_teachers).map(|i| Teacher::new(i, format!("T{i}"))).collect();
        let classes = (1..=n_classes).map(|c| ClassGroup::new(c, format!("C{c}"))).collect();
        let subjects: Vec<Subject> = (1..=n_teachers)
            .map(|t| {
                let mut s = Subject::new(100 + t, t, rng.random_range(1..=n_classes));
                if rng.random_bool(0.3) {
                    s = s.with_class(rng.random_range(1..=n_classes));
                }
                s
            })
            .collect();

        let mut entries = Vec::new();
        let mut next_id = 1000;
        for day in 1..=5u8 {
            for period in 1..=n_periods {
                let mut teacher_used = HashSet::new();
                for class in 1..=n_classes {
                    if !rng.random_bool(0.6) {
                        continue;
                    }
                    let candidates: Vec<&Subject> = subjects
                        .iter()
                        .filter(|s| s.teaches_class(class) && !teacher_used.contains(&s.teacher_id))
                        .collect();
                    if candidates.is_empty() {
                        continue;
                    }
                    let s = candidates[rng.random_range(0..candidates.len())];
                    teacher_used.insert(s.teacher_id);
                    entries.push(ScheduleEntry::new(next_id, s.id, class, day, period));
                    next_id += 1;
                }
            }
        }

        Timetable::new(teachers, classes, vec![], periods(n_periods), subjects, entries).unwrap()
    }

    fn random_request(rng: &mut StdRng, n_teachers: u32) -> AssignmentRequest {
        let date = monday() + chrono::Duration::days(rng.random_range(0..5));
        let absent: Vec<TeacherId> = (0..rng.random_range(1..=4))
            .map(|_| rng.random_range(1..=n_teachers))
            .collect();
        let history = (1..=n_teachers)
            .map(|t| (t, rng.random_range(0..10)))
            .collect();
        AssignmentRequest::new(date, absent).with_history(history)
    }

    #[test]
    fn test_random_no_self_conflict_and_no_double_default() {
        let mut rng = StdRng::seed_from_u64(42);
        let engine = AssignmentEngine::new();
        for _ in 0..50 {
            let tt = random_timetable(&mut rng, 20);
            let request = random_request(&mut rng, 20);
            let recs = engine.recommend(&tt, &request).unwrap();
            let detector = ConflictDetector::new(&tt);
            let day = request.day_of_week();

            let mut seen = HashSet::new();
            for rec in &recs {
                if let Some(d) = rec.default_teacher {
                    assert!(!detector.is_busy(d, day, rec.period_no));
                    assert!(!request.absent_teacher_ids.contains(&d));
                    assert!(seen.insert(d), "teacher {d} defaulted twice");
                }
                for c in &rec.candidates {
                    assert!(detector.is_free(c.teacher_id, day, rec.period_no));
                }
            }
        }
    }

    #[test]
    fn test_random_continuity_sorts_first() {
        let mut rng = StdRng::seed_from_u64(7);
        let engine = AssignmentEngine::new();
        for _ in 0..50 {
            let tt = random_timetable(&mut rng, 15);
            let request = random_request(&mut rng, 15);
            for rec in engine.recommend(&tt, &request).unwrap() {
                let first_without = rec
                    .candidates
                    .iter()
                    .position(|c| !c.teaches_class)
                    .unwrap_or(rec.candidates.len());
                assert!(rec.candidates[first_without..].iter().all(|c| !c.teaches_class));
                assert!(rec.candidates.windows(2).all(|w| w[0].score <= w[1].score));
            }
        }
    }

    #[test]
    fn test_random_deterministic() {
        let mut rng = StdRng::seed_from_u64(2024);
        let engine = AssignmentEngine::new();
        for _ in 0..20 {
            let tt = random_timetable(&mut rng, 12);
            let request = random_request(&mut rng, 12);
            let a = engine.recommend(&tt, &request).unwrap();
            let b = engine.recommend(&tt, &request).unwrap();
            assert_eq!(
                serde_json::to_string(&a).unwrap(),
                serde_json::to_string(&b).unwrap()
            );
        }
    }
}
