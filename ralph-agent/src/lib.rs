#![deny(missing_docs)]
//! The belief-weighted strategy agent.
//!
//! [`RalphAgent`] owns a registry of named strategies (`Vec<(StrategyName,
//! Arc<dyn Strategy>)>`, registration order is execution order), a cache of
//! belief scores, and handles to a store, a rewrite rule, a notifier and a
//! gate. One call to [`RalphAgent::execute_cycle`] runs the whole per-cycle
//! protocol and returns a [`CycleReport`]. Every failure below the cycle is
//! isolated into [`CycleFault`]s.

mod gate;
mod report;

pub use gate::RandomGate;
pub use report::{CycleFault, CycleReport, format_summary};

use ralph_core::belief::BeliefScores;
use ralph_core::error::{CycleError, StoreError};
use ralph_core::gate::Gate;
use ralph_core::id::StrategyName;
use ralph_core::notify::Notifier;
use ralph_core::result::{CycleSummary, ExecutionRecord, ExecutionResult};
use ralph_core::store::{StrategyRecord, StrategyStore, StrategyUpdate};
use ralph_core::strategy::{BeliefRewrite, Strategy};
use std::sync::Arc;

/// Registry key of the strategy that runs regardless of gate or flag.
pub const DEFAULT_BELIEF_STRATEGY: &str = "belief";

/// Drives registered strategies through one cycle at a time.
///
/// Takes `&mut self` per cycle: the caller serializes cycles (the loop
/// driver holds the agent behind an async mutex).
pub struct RalphAgent {
    strategies: Vec<(StrategyName, Arc<dyn Strategy>)>,
    belief: StrategyName,
    rewrite: Arc<dyn BeliefRewrite>,
    store: Arc<dyn StrategyStore>,
    notifier: Arc<dyn Notifier>,
    gate: Box<dyn Gate>,
    scores: BeliefScores,
    initialized: bool,
    cycles_completed: u64,
}

impl RalphAgent {
    /// Create an agent with no strategies, a [`RandomGate`] and
    /// [`DEFAULT_BELIEF_STRATEGY`] as the always-run strategy.
    pub fn new(
        store: Arc<dyn StrategyStore>,
        rewrite: Arc<dyn BeliefRewrite>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            strategies: Vec::new(),
            belief: StrategyName::new(DEFAULT_BELIEF_STRATEGY),
            rewrite,
            store,
            notifier,
            gate: Box::new(RandomGate::new()),
            scores: BeliefScores::new(),
            initialized: false,
            cycles_completed: 0,
        }
    }

    /// Replace the gate.
    #[must_use]
    pub fn with_gate(mut self, gate: impl Gate + 'static) -> Self {
        self.gate = Box::new(gate);
        self
    }

    /// Name the strategy that bypasses the enabled flag and the gate.
    #[must_use]
    pub fn with_belief_strategy(mut self, name: impl Into<StrategyName>) -> Self {
        self.belief = name.into();
        self
    }

    /// Register every `(name, strategy)` pair in order.
    #[must_use]
    pub fn with_strategies(
        mut self,
        strategies: impl IntoIterator<Item = (StrategyName, Arc<dyn Strategy>)>,
    ) -> Self {
        for (name, strategy) in strategies {
            self.register(name, strategy);
        }
        self
    }

    /// Register a strategy. Re-registering a name replaces the strategy
    /// and keeps its original position.
    pub fn register(&mut self, name: impl Into<StrategyName>, strategy: Arc<dyn Strategy>) {
        let name = name.into();
        match self.strategies.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = strategy,
            None => self.strategies.push((name, strategy)),
        }
    }

    /// Registered names, in execution order.
    pub fn strategy_names(&self) -> impl Iterator<Item = &StrategyName> {
        self.strategies.iter().map(|(name, _)| name)
    }

    /// The always-run strategy's name.
    pub fn belief_strategy(&self) -> &StrategyName {
        &self.belief
    }

    /// The in-memory belief cache.
    pub fn belief_scores(&self) -> &BeliefScores {
        &self.scores
    }

    /// Cycles finished so far.
    pub fn cycles_completed(&self) -> u64 {
        self.cycles_completed
    }

    /// Whether [`RalphAgent::initialize`] has succeeded.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Seed a registry row (enabled, default belief) for every registered
    /// strategy the store does not know, then load every stored belief
    /// score into the cache.
    ///
    /// Called lazily by the first [`RalphAgent::execute_cycle`]. Safe to
    /// call again; it reloads the cache.
    pub async fn initialize(&mut self) -> Result<(), StoreError> {
        let existing = self.store.find_many().await?;
        for (name, _) in &self.strategies {
            if existing.iter().any(|row| &row.name == name) {
                continue;
            }
            match self.store.create(StrategyRecord::new(name.clone())).await {
                Ok(()) => tracing::info!(strategy = %name, "ralph.agent.seeded"),
                // Another writer got there first.
                Err(StoreError::AlreadyExists(_)) => {}
                Err(e) => return Err(e),
            }
        }

        let rows = self.store.find_many().await?;
        self.scores = rows
            .into_iter()
            .map(|row| (row.name, row.belief_score))
            .collect();
        self.initialized = true;

        tracing::info!(
            strategies = self.strategies.len(),
            scores = self.scores.len(),
            "ralph.agent.initialized"
        );
        Ok(())
    }

    /// Run one full cycle: gate and execute each strategy, log every
    /// attempt, rewrite beliefs, send the summary.
    ///
    /// Only a failed initialization is an error. Everything else lands in
    /// [`CycleReport::faults`].
    pub async fn execute_cycle(&mut self) -> Result<CycleReport, CycleError> {
        if !self.initialized {
            self.initialize().await?;
        }

        let cycle = self.cycles_completed + 1;
        tracing::info!(cycle, strategies = self.strategies.len(), "ralph.cycle.start");

        let mut results = Vec::new();
        let mut faults = Vec::new();

        for (name, strategy) in &self.strategies {
            let is_belief = *name == self.belief;

            let enabled = match self.store.find(name).await {
                Ok(row) => row.is_some_and(|row| row.enabled),
                Err(e) => {
                    tracing::warn!(strategy = %name, error = %e, "ralph.strategy.lookup_failed");
                    faults.push(CycleFault::Persistence {
                        strategy: name.clone(),
                        error: e.to_string(),
                    });
                    continue;
                }
            };
            if !enabled && !is_belief {
                tracing::debug!(strategy = %name, "ralph.strategy.disabled");
                continue;
            }

            let score = self.scores.score(name);
            let draw = self.gate.draw();
            if !(draw < score || is_belief) {
                tracing::debug!(strategy = %name, score, draw, "ralph.strategy.skipped");
                continue;
            }

            let logged = match strategy.execute().await {
                Ok(result) => {
                    let result = result.with_strategy(name.clone());
                    tracing::info!(
                        strategy = %name,
                        action = %result.action,
                        success = result.success,
                        "ralph.strategy.executed"
                    );
                    results.push(result.clone());
                    result
                }
                Err(e) => {
                    tracing::warn!(strategy = %name, error = %e, "ralph.strategy.failed");
                    faults.push(CycleFault::Strategy {
                        strategy: name.clone(),
                        error: e.to_string(),
                    });
                    ExecutionResult::failure(e.to_string()).with_strategy(name.clone())
                }
            };
            self.log_execution(logged, &mut faults).await;
        }

        self.rewrite_beliefs(&results, &mut faults).await;

        let summary = CycleSummary::from_results(&results);
        if let Err(e) = self.notifier.send(&format_summary(&summary)).await {
            tracing::warn!(cycle, error = %e, "ralph.notify.failed");
            faults.push(CycleFault::Notification {
                error: e.to_string(),
            });
        }

        self.cycles_completed = cycle;
        tracing::info!(
            cycle,
            executed = summary.executed,
            successful = summary.successful,
            total_profit = summary.total_profit,
            faults = faults.len(),
            "ralph.cycle.complete"
        );

        Ok(CycleReport {
            cycle,
            results,
            summary,
            faults,
        })
    }

    /// Append the log row and bump the counters. The two writes are
    /// independent: one failing does not skip the other.
    async fn log_execution(&self, result: ExecutionResult, faults: &mut Vec<CycleFault>) {
        let name = result.strategy.clone();
        let record = ExecutionRecord::now(result);
        let update = StrategyUpdate::execution(
            record.result.success,
            record.result.profit_loss,
            record.executed_at,
        );

        if let Err(e) = self.store.append_execution(record).await {
            tracing::warn!(strategy = %name, error = %e, "ralph.store.append_failed");
            faults.push(CycleFault::Persistence {
                strategy: name.clone(),
                error: e.to_string(),
            });
        }
        if let Err(e) = self.store.update(&name, update).await {
            tracing::warn!(strategy = %name, error = %e, "ralph.store.update_failed");
            faults.push(CycleFault::Persistence {
                strategy: name,
                error: e.to_string(),
            });
        }
    }

    async fn rewrite_beliefs(&mut self, results: &[ExecutionResult], faults: &mut Vec<CycleFault>) {
        let scores = match self.rewrite.rewrite(results, &self.scores).await {
            Ok(scores) => scores,
            Err(e) => {
                tracing::warn!(error = %e, "ralph.belief.rewrite_failed");
                faults.push(CycleFault::Rewrite {
                    error: e.to_string(),
                });
                return;
            }
        };

        for (name, score) in scores.iter() {
            tracing::debug!(strategy = %name, score, "ralph.belief.updated");
            let update = StrategyUpdate::new().belief_score(score);
            if let Err(e) = self.store.update(name, update).await {
                tracing::warn!(strategy = %name, error = %e, "ralph.store.update_failed");
                faults.push(CycleFault::Persistence {
                    strategy: name.clone(),
                    error: e.to_string(),
                });
            }
        }
        self.scores.merge(&scores);
    }
}

impl std::fmt::Debug for RalphAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RalphAgent")
            .field(
                "strategies",
                &self.strategies.iter().map(|(n, _)| n).collect::<Vec<_>>(),
            )
            .field("belief", &self.belief)
            .field("scores", &self.scores)
            .field("cycles_completed", &self.cycles_completed)
            .finish_non_exhaustive()
    }
}
