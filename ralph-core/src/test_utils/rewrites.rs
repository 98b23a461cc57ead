//! Scripted belief-rewrite rules.

use crate::belief::BeliefScores;
use crate::error::RewriteError;
use crate::result::ExecutionResult;
use crate::strategy::BeliefRewrite;
use async_trait::async_trait;
use std::sync::Mutex;

/// Returns the same scores every cycle and records how many results it saw.
pub struct ScriptedRewrite {
    scores: BeliefScores,
    seen: Mutex<Vec<usize>>,
}

impl ScriptedRewrite {
    /// Create a rewrite that always answers with `scores`.
    pub fn new(scores: BeliefScores) -> Self {
        Self {
            scores,
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Result-slice length passed on each call.
    pub fn calls(&self) -> Vec<usize> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl BeliefRewrite for ScriptedRewrite {
    async fn rewrite(
        &self,
        results: &[ExecutionResult],
        _current: &BeliefScores,
    ) -> Result<BeliefScores, RewriteError> {
        self.seen.lock().unwrap().push(results.len());
        Ok(self.scores.clone())
    }
}

/// A rewrite rule that always fails.
pub struct FailingRewrite;

#[async_trait]
impl BeliefRewrite for FailingRewrite {
    async fn rewrite(
        &self,
        _results: &[ExecutionResult],
        _current: &BeliefScores,
    ) -> Result<BeliefScores, RewriteError> {
        Err(RewriteError::Failed("scoring model unavailable".into()))
    }
}
