use crate::RalphError;
use ralph_loop::DEFAULT_INTERVAL;
use ralph_strategies::{BeliefMode, DEFAULT_ENDPOINT, ReinforcementRewrite};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File read when `--config` is not given, if it exists.
pub const DEFAULT_CONFIG_FILE: &str = "ralph.json";

/// Which [`ralph_core::StrategyStore`] backs the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreKind {
    /// JSON files under `data_dir`.
    #[default]
    Fs,
    /// Process memory. Lost on restart.
    Memory,
}

/// Telegram channel credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot API token.
    pub bot_token: String,
    /// Target chat.
    pub chat_id: String,
    /// API base URL override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Service configuration.
///
/// Resolution order: defaults, then the JSON file, then environment
/// variables, then CLI flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RalphConfig {
    /// HTTP listen address.
    pub bind: String,
    /// Delay between cycles.
    pub interval_ms: u64,
    /// Registry backend.
    pub store: StoreKind,
    /// Root for the fs store.
    pub data_dir: PathBuf,
    /// Chain RPC endpoint shared by the strategies.
    pub rpc_endpoint: String,
    /// Probe `getHealth` at startup. A failed probe only logs.
    pub probe_rpc: bool,
    /// Telegram delivery. Summaries are only logged when absent.
    pub telegram: Option<TelegramConfig>,
    /// Belief-rewrite rule.
    pub belief_mode: BeliefMode,
    /// Step size for [`BeliefMode::Reinforce`].
    pub learning_rate: f64,
}

impl Default for RalphConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".into(),
            interval_ms: u64::try_from(DEFAULT_INTERVAL.as_millis()).unwrap_or(60_000),
            store: StoreKind::Fs,
            data_dir: PathBuf::from(".ralph"),
            rpc_endpoint: DEFAULT_ENDPOINT.into(),
            probe_rpc: true,
            telegram: None,
            belief_mode: BeliefMode::Fixed,
            learning_rate: ReinforcementRewrite::DEFAULT_LEARNING_RATE,
        }
    }
}

impl RalphConfig {
    /// Read a config file.
    pub fn from_path(path: &Path) -> Result<Self, RalphError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            RalphError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Read `path`, or [`DEFAULT_CONFIG_FILE`] if it exists, or defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, RalphError> {
        match path {
            Some(path) => Self::from_path(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_path(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<(), RalphError> {
        self.apply_vars(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any variable source.
    ///
    /// | Variable | Field |
    /// |----------|-------|
    /// | `RALPH_BIND` | `bind` |
    /// | `RALPH_INTERVAL_MS` | `interval_ms` |
    /// | `RALPH_DATA_DIR` | `data_dir`, selects the fs store |
    /// | `RALPH_RPC_ENDPOINT` (or `NEXT_PUBLIC_RPC_ENDPOINT`) | `rpc_endpoint` |
    /// | `TELEGRAM_BOT_TOKEN` + `TELEGRAM_CHAT_ID` | `telegram` |
    /// | `RALPH_BELIEF_MODE` | `belief_mode` (`fixed` or `reinforce`) |
    /// | `RALPH_LEARNING_RATE` | `learning_rate` |
    pub fn apply_vars(&mut self, get: impl Fn(&str) -> Option<String>) -> Result<(), RalphError> {
        let get = |key: &str| get(key).filter(|value| !value.trim().is_empty());

        if let Some(bind) = get("RALPH_BIND") {
            self.bind = bind;
        }
        if let Some(raw) = get("RALPH_INTERVAL_MS") {
            self.interval_ms = parse_var("RALPH_INTERVAL_MS", &raw)?;
        }
        if let Some(dir) = get("RALPH_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
            self.store = StoreKind::Fs;
        }
        if let Some(endpoint) = get("RALPH_RPC_ENDPOINT").or_else(|| get("NEXT_PUBLIC_RPC_ENDPOINT")) {
            self.rpc_endpoint = endpoint;
        }
        if let (Some(bot_token), Some(chat_id)) = (get("TELEGRAM_BOT_TOKEN"), get("TELEGRAM_CHAT_ID")) {
            let base_url = self.telegram.take().and_then(|t| t.base_url);
            self.telegram = Some(TelegramConfig {
                bot_token,
                chat_id,
                base_url,
            });
        }
        if let Some(raw) = get("RALPH_BELIEF_MODE") {
            self.belief_mode = parse_belief_mode(&raw)?;
        }
        if let Some(raw) = get("RALPH_LEARNING_RATE") {
            self.learning_rate = parse_var("RALPH_LEARNING_RATE", &raw)?;
        }
        Ok(())
    }

    /// Reject values no component can run with.
    pub fn validate(&self) -> Result<(), RalphError> {
        if self.bind.parse::<std::net::SocketAddr>().is_err() {
            return Err(RalphError::Config(format!(
                "bind must be host:port, got {:?}",
                self.bind
            )));
        }
        if self.rpc_endpoint.trim().is_empty() {
            return Err(RalphError::Config("rpc_endpoint must not be empty".into()));
        }
        if !(self.learning_rate > 0.0 && self.learning_rate <= 1.0) {
            return Err(RalphError::Config(format!(
                "learning_rate must be in (0, 1], got {}",
                self.learning_rate
            )));
        }
        Ok(())
    }
}

fn parse_var<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, RalphError>
where
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| RalphError::Config(format!("invalid {key}={raw:?}: {e}")))
}

fn parse_belief_mode(raw: &str) -> Result<BeliefMode, RalphError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "fixed" => Ok(BeliefMode::Fixed),
        "reinforce" => Ok(BeliefMode::Reinforce),
        other => Err(RalphError::Config(format!(
            "invalid RALPH_BELIEF_MODE={other:?}: expected fixed or reinforce"
        ))),
    }
}
