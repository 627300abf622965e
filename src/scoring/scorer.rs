//! Weighted candidate scorer.
//!
//! Combines candidate rules into one integer score per candidate and
//! ranks a pool by it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{rules, CandidateRule, RuleScore, ScoringContext};
use crate::config::EngineConfig;
use crate::models::TeacherId;

#[derive(Clone)]
struct WeightedRule {
    rule: Arc<dyn CandidateRule>,
    weight: i64,
}

/// A scored candidate for one affected period.
///
/// Carries the factor values next to the total so a presentation layer
/// can explain the ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedCandidate {
    /// Candidate teacher.
    pub teacher_id: TeacherId,
    /// Total weighted score (lower = better).
    pub score: i64,
    /// Candidate already teaches the affected class.
    pub teaches_class: bool,
    /// Periods the candidate teaches that weekday.
    pub periods_today: usize,
    /// Candidate's substitutions so far this term.
    pub previous_substitutions: u32,
}

/// Sums weighted rule scores and ranks candidates.
///
/// # Example
/// ```
/// use u_substitute::scoring::CandidateScorer;
/// use u_substitute::EngineConfig;
///
/// let scorer = CandidateScorer::from_config(&EngineConfig::default());
/// assert_eq!(scorer.rule_names().len(), 3);
/// ```
#[derive(Clone)]
pub struct CandidateScorer {
    rules: Vec<WeightedRule>,
}

impl CandidateScorer {
    /// Creates a scorer with no rules (every candidate scores 0).
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Creates the standard continuity / day-load / history scorer with
    /// weights from `config`.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new()
            .with_rule(rules::Continuity, config.continuity_bonus)
            .with_rule(rules::DayLoad, config.load_weight)
            .with_rule(rules::SubstitutionHistory, config.history_weight)
    }

    /// Adds a weighted rule.
    pub fn with_rule<R: CandidateRule + 'static>(mut self, rule: R, weight: i64) -> Self {
        self.rules.push(WeightedRule {
            rule: Arc::new(rule),
            weight,
        });
        self
    }

    /// Names of the configured rules, in order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|wr| wr.rule.name()).collect()
    }

    /// Weighted score of each rule for one candidate.
    ///
    /// Products saturate at the `i64` bounds.
    pub fn evaluate(&self, candidate: TeacherId, context: &ScoringContext<'_>) -> Vec<RuleScore> {
        self.rules
            .iter()
            .map(|wr| wr.rule.evaluate(candidate, context).saturating_mul(wr.weight))
            .collect()
    }

    /// Scores one candidate.
    pub fn score(&self, candidate: TeacherId, context: &ScoringContext<'_>) -> RankedCandidate {
        RankedCandidate {
            teacher_id: candidate,
            score: self
                .evaluate(candidate, context)
                .into_iter()
                .fold(0, RuleScore::saturating_add),
            teaches_class: context.teaches_class(candidate),
            periods_today: context.periods_today(candidate),
            previous_substitutions: context.previous_substitutions(candidate),
        }
    }

    /// Scores and sorts candidates ascending by score.
    ///
    /// The sort is stable: equal scores keep the input order, which makes
    /// the ranking reproducible.
    pub fn rank(
        &self,
        candidates: impl IntoIterator<Item = TeacherId>,
        context: &ScoringContext<'_>,
    ) -> Vec<RankedCandidate> {
        let mut ranked: Vec<RankedCandidate> = candidates
            .into_iter()
            .map(|c| self.score(c, context))
            .collect();
        ranked.sort_by_key(|c| c.score);
        ranked
    }
}

impl Default for CandidateScorer {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl std::fmt::Debug for CandidateScorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CandidateScorer")
            .field(
                "rules",
                &self
                    .rules
                    .iter()
                    .map(|r| format!("{}(w={})", r.rule.name(), r.weight))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}
