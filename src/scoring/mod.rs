//! Candidate scoring for substitute selection.
//!
//! Each factor of the ranking is a [`CandidateRule`]; a
//! [`CandidateScorer`] sums their weighted scores. With the default
//! weights the total is exactly
//!
//! ```text
//! score = (teaches_class ? -1000 : 0) + periods_today * 10 + previous_substitutions * 5
//! ```
//!
//! # Score Convention
//! **Lower score = more preferred.** Ties keep pool order.
//!
//! # Usage
//!
//! ```
//! use u_substitute::scoring::{rules, CandidateScorer};
//!
//! let scorer = CandidateScorer::new()
//!     .with_rule(rules::Continuity, 1000)
//!     .with_rule(rules::DayLoad, 10)
//!     .with_rule(rules::SubstitutionHistory, 5);
//! assert_eq!(scorer.rule_names(), vec!["CONTINUITY", "DAY_LOAD", "HISTORY"]);
//! ```

mod context;
pub mod rules;
mod scorer;

pub use context::{ScoringContext, SubstitutionCounts};
pub use scorer::{CandidateScorer, RankedCandidate};

use crate::models::TeacherId;
use std::fmt::Debug;

/// Raw (unweighted) score returned by a rule.
pub type RuleScore = i64;

/// A single ranking factor for substitute candidates.
///
/// # Score Convention
/// **Lower score = more preferred.** Rules return raw factor values;
/// the scorer multiplies them by the configured weight.
pub trait CandidateRule: Send + Sync + Debug {
    /// Rule name (e.g., "CONTINUITY").
    fn name(&self) -> &'static str;

    /// Evaluates a candidate for the period described by `context`.
    fn evaluate(&self, candidate: TeacherId, context: &ScoringContext<'_>) -> RuleScore;

    /// Rule description.
    fn description(&self) -> &'static str {
        self.name()
    }
}
