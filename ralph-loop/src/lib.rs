#![deny(missing_docs)]
//! Interval driver for a [`RalphAgent`].
//!
//! [`RalphLoop`] is an explicit handle owned by the host. `start` spawns a
//! single task that runs a cycle, sleeps for the interval, and repeats until
//! `stop`. Stopping never cancels an in-flight cycle: it flips the state,
//! wakes the sleep, and the task exits at its next check.
//!
//! The agent lives behind an async mutex, so even a `start` that races a
//! just-stopped task still finishing its cycle cannot overlap two cycles.

use chrono::{DateTime, Utc};
use ralph_agent::RalphAgent;
use ralph_core::notify::Notifier;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Delay between the end of one cycle and the start of the next.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(60_000);

/// Whether a loop task is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopState {
    /// No task, or the task was told to stop.
    Stopped,
    /// A task is cycling.
    Running,
}

impl LoopState {
    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Running => "running",
        }
    }
}

/// Result of [`RalphLoop::start`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// A new task was spawned.
    Started,
    /// A task was already live; nothing changed.
    AlreadyRunning,
}

/// Result of [`RalphLoop::stop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    /// The live task was told to stop. An in-flight cycle may still finish.
    Stopping,
    /// There was nothing to stop.
    NotRunning,
}

/// Snapshot of the loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoopStatus {
    /// Current state.
    pub state: LoopState,
    /// Configured delay between cycles.
    pub interval_ms: u64,
    /// Cycles that finished without a cycle-level error.
    pub cycles_completed: u64,
    /// When the most recent successful cycle finished.
    pub last_cycle_at: Option<DateTime<Utc>>,
}

#[derive(Default)]
struct Stats {
    cycles_completed: u64,
    last_cycle_at: Option<DateTime<Utc>>,
}

struct Run {
    stop: CancellationToken,
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct Control {
    live: Option<Run>,
    // Stopped tasks that may still be finishing a cycle.
    draining: Vec<JoinHandle<()>>,
}

/// Start/stop handle around one agent.
pub struct RalphLoop {
    agent: Arc<Mutex<RalphAgent>>,
    alerts: Option<Arc<dyn Notifier>>,
    interval: Duration,
    stats: Arc<RwLock<Stats>>,
    control: Mutex<Control>,
}

impl RalphLoop {
    /// Create a stopped loop.
    pub fn new(agent: Arc<Mutex<RalphAgent>>, interval: Duration) -> Self {
        Self {
            agent,
            alerts: None,
            interval,
            stats: Arc::new(RwLock::new(Stats::default())),
            control: Mutex::new(Control::default()),
        }
    }

    /// Send an alert through `notifier` when a cycle fails.
    #[must_use]
    pub fn with_alerts(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.alerts = Some(notifier);
        self
    }

    /// The shared agent handle.
    pub fn agent(&self) -> &Arc<Mutex<RalphAgent>> {
        &self.agent
    }

    /// Configured delay between cycles.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Spawn the cycle task unless one is live.
    pub async fn start(&self) -> StartOutcome {
        let mut control = self.control.lock().await;
        if control.live.is_some() {
            return StartOutcome::AlreadyRunning;
        }
        control.draining.retain(|handle| !handle.is_finished());

        let stop = CancellationToken::new();
        let handle = tokio::spawn(run(
            Arc::clone(&self.agent),
            Arc::clone(&self.stats),
            self.alerts.clone(),
            self.interval,
            stop.clone(),
        ));
        control.live = Some(Run { stop, handle });

        tracing::info!(interval_ms = interval_ms(self.interval), "ralph.loop.started");
        StartOutcome::Started
    }

    /// Tell the live task to stop. Returns immediately; an in-flight cycle
    /// finishes and no further cycle begins.
    pub async fn stop(&self) -> StopOutcome {
        let mut control = self.control.lock().await;
        let Some(run) = control.live.take() else {
            return StopOutcome::NotRunning;
        };
        run.stop.cancel();
        control.draining.push(run.handle);

        tracing::info!("ralph.loop.stopping");
        StopOutcome::Stopping
    }

    /// [`RalphLoop::stop`], then wait until every task has exited.
    pub async fn stop_and_wait(&self) -> StopOutcome {
        let (outcome, handles) = {
            let mut control = self.control.lock().await;
            let outcome = match control.live.take() {
                Some(run) => {
                    run.stop.cancel();
                    control.draining.push(run.handle);
                    StopOutcome::Stopping
                }
                None => StopOutcome::NotRunning,
            };
            (outcome, std::mem::take(&mut control.draining))
        };

        for handle in handles {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "ralph.loop.task_failed");
            }
        }
        tracing::info!("ralph.loop.stopped");
        outcome
    }

    /// Current state and counters.
    pub async fn status(&self) -> LoopStatus {
        let state = if self.control.lock().await.live.is_some() {
            LoopState::Running
        } else {
            LoopState::Stopped
        };
        let stats = self.stats.read().await;
        LoopStatus {
            state,
            interval_ms: interval_ms(self.interval),
            cycles_completed: stats.cycles_completed,
            last_cycle_at: stats.last_cycle_at,
        }
    }
}

fn interval_ms(interval: Duration) -> u64 {
    u64::try_from(interval.as_millis()).unwrap_or(u64::MAX)
}

async fn run(
    agent: Arc<Mutex<RalphAgent>>,
    stats: Arc<RwLock<Stats>>,
    alerts: Option<Arc<dyn Notifier>>,
    interval: Duration,
    stop: CancellationToken,
) {
    while !stop.is_cancelled() {
        let outcome = {
            let mut agent = agent.lock().await;
            // Stop may have landed while another task held the agent.
            if stop.is_cancelled() {
                break;
            }
            agent.execute_cycle().await
        };

        match outcome {
            Ok(report) => {
                let mut stats = stats.write().await;
                stats.cycles_completed += 1;
                stats.last_cycle_at = Some(Utc::now());
                tracing::debug!(
                    cycle = report.cycle,
                    faults = report.faults.len(),
                    "ralph.loop.cycle_done"
                );
            }
            Err(e) => {
                tracing::error!(error = %e, "ralph.loop.cycle_failed");
                if let Some(alerts) = &alerts {
                    let message = format!("Ralph cycle failed: {e}");
                    if let Err(e) = alerts.alert(&message).await {
                        tracing::warn!(error = %e, "ralph.loop.alert_failed");
                    }
                }
            }
        }

        tokio::select! {
            _ = stop.cancelled() => break,
            _ = tokio::time::sleep(interval) => {}
        }
    }
    tracing::debug!("ralph.loop.exited");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(LoopState::Running).unwrap(),
            serde_json::json!("running")
        );
        assert_eq!(LoopState::Stopped.as_str(), "stopped");
    }

    #[test]
    fn default_interval_is_one_minute() {
        assert_eq!(interval_ms(DEFAULT_INTERVAL), 60_000);
    }
}
