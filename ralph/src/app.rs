use crate::config::{RalphConfig, StoreKind};
use crate::RalphError;
use ralph_agent::{CycleReport, RalphAgent};
use ralph_core::notify::Notifier;
use ralph_core::store::StrategyStore;
use ralph_loop::RalphLoop;
use ralph_notify::{LogNotifier, TelegramNotifier};
use ralph_server::AppState;
use ralph_store_fs::FsStore;
use ralph_store_memory::MemoryStore;
use ralph_strategies::{BeliefStrategy, RpcClient, names, standard_strategies};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Everything wired from one config.
pub struct Services {
    /// Registry and execution log.
    pub store: Arc<dyn StrategyStore>,
    /// Summary and alert channel.
    pub notifier: Arc<dyn Notifier>,
    /// Chain connection shared by the strategies.
    pub rpc: Arc<RpcClient>,
    /// The agent, not yet initialized.
    pub agent: RalphAgent,
}

impl Services {
    /// Build the store, notifier, RPC handle and agent.
    pub fn from_config(config: &RalphConfig) -> Self {
        let store = build_store(config);
        let notifier = build_notifier(config);
        let rpc = Arc::new(RpcClient::new(config.rpc_endpoint.clone()));

        let belief = Arc::new(BeliefStrategy::from_mode(config.belief_mode, config.learning_rate));
        let agent = RalphAgent::new(Arc::clone(&store), belief.clone(), Arc::clone(&notifier))
            .with_belief_strategy(names::BELIEF)
            .with_strategies(standard_strategies(Arc::clone(&rpc), belief));

        Self {
            store,
            notifier,
            rpc,
            agent,
        }
    }
}

/// The configured registry backend.
pub fn build_store(config: &RalphConfig) -> Arc<dyn StrategyStore> {
    match config.store {
        StoreKind::Fs => {
            tracing::info!(dir = %config.data_dir.display(), "ralph.store.fs");
            Arc::new(FsStore::new(&config.data_dir))
        }
        StoreKind::Memory => {
            tracing::info!("ralph.store.memory");
            Arc::new(MemoryStore::new())
        }
    }
}

/// Telegram when configured, otherwise log only.
pub fn build_notifier(config: &RalphConfig) -> Arc<dyn Notifier> {
    match &config.telegram {
        Some(telegram) => {
            let mut notifier = TelegramNotifier::new(&telegram.bot_token, &telegram.chat_id);
            if let Some(url) = &telegram.base_url {
                notifier = notifier.base_url(url);
            }
            Arc::new(notifier)
        }
        None => {
            tracing::info!("ralph.notify.telegram_unconfigured");
            Arc::new(LogNotifier::new())
        }
    }
}

/// Log whether the RPC endpoint answers. Never fails startup.
pub async fn probe_rpc(rpc: &RpcClient) -> bool {
    match rpc.get_health().await {
        Ok(()) => {
            tracing::info!(endpoint = rpc.endpoint(), "ralph.rpc.healthy");
            true
        }
        Err(e) => {
            tracing::warn!(endpoint = rpc.endpoint(), error = %e, "ralph.rpc.unhealthy");
            false
        }
    }
}

/// Run exactly one cycle and return its report.
pub async fn run_cycle(config: &RalphConfig) -> Result<CycleReport, RalphError> {
    let mut services = Services::from_config(config);
    if config.probe_rpc {
        probe_rpc(&services.rpc).await;
    }
    Ok(services.agent.execute_cycle().await?)
}

/// Serve the control surface until `shutdown` resolves, then stop the
/// loop and wait for any in-flight cycle.
pub async fn serve(
    config: &RalphConfig,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), RalphError> {
    let mut services = Services::from_config(config);
    if config.probe_rpc {
        probe_rpc(&services.rpc).await;
    }
    services.agent.initialize().await?;

    let ralph = Arc::new(
        RalphLoop::new(
            Arc::new(Mutex::new(services.agent)),
            Duration::from_millis(config.interval_ms),
        )
        .with_alerts(Arc::clone(&services.notifier)),
    );

    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    let state = AppState::new(Arc::clone(&ralph), services.store);
    ralph_server::serve(listener, state, shutdown).await?;

    ralph.stop_and_wait().await;
    tracing::info!("ralph.shutdown");
    Ok(())
}

/// Install the fmt subscriber, filtered by `RUST_LOG` (default `info`).
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // Already installed (tests, embedding hosts) is fine.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
