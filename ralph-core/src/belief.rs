//! Belief scores: per-strategy Bernoulli gate probabilities.

use crate::id::StrategyName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Score used for a strategy that has no stored belief.
pub const DEFAULT_BELIEF_SCORE: f64 = 0.5;

/// Mapping from strategy name to belief score.
///
/// Scores should lie in `[0, 1]` but nothing here clips them: a score of
/// `1.5` simply always admits, `-0.2` never does. Rewrite rules that care
/// about the range clip their own output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BeliefScores(BTreeMap<StrategyName, f64>);

impl BeliefScores {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// The stored score, or [`DEFAULT_BELIEF_SCORE`] if absent.
    pub fn score(&self, name: &StrategyName) -> f64 {
        self.0.get(name).copied().unwrap_or(DEFAULT_BELIEF_SCORE)
    }

    /// The stored score, if any.
    pub fn get(&self, name: &StrategyName) -> Option<f64> {
        self.0.get(name).copied()
    }

    /// Insert or overwrite a score.
    pub fn set(&mut self, name: StrategyName, score: f64) {
        self.0.insert(name, score);
    }

    /// Overwrite every score present in `other`; keep the rest.
    pub fn merge(&mut self, other: &BeliefScores) {
        for (name, score) in other.iter() {
            self.0.insert(name.clone(), score);
        }
    }

    /// Iterate `(name, score)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&StrategyName, f64)> {
        self.0.iter().map(|(k, v)| (k, *v))
    }

    /// Number of stored scores.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no score is stored.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<N: Into<StrategyName>> FromIterator<(N, f64)> for BeliefScores {
    fn from_iter<I: IntoIterator<Item = (N, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}
