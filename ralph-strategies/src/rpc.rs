//! Chain connection handle shared by every strategy.

use ralph_core::error::StrategyError;
use serde::Deserialize;
use serde_json::json;

/// Default public RPC endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.mainnet-beta.solana.com";

/// Minimal JSON-RPC client for a Solana-style endpoint.
///
/// Strategies hold an `Arc<RpcClient>` so the whole set shares one HTTP
/// connection pool. The stubs never call it; the binary probes
/// [`RpcClient::get_health`] at startup.
///
/// # Example
///
/// ```no_run
/// use ralph_strategies::RpcClient;
///
/// let rpc = RpcClient::new("https://api.devnet.solana.com");
/// ```
#[derive(Debug, Clone)]
pub struct RpcClient {
    endpoint: String,
    client: reqwest::Client,
}

#[derive(Deserialize)]
struct RpcResponse {
    result: Option<serde_json::Value>,
    error: Option<RpcErrorBody>,
}

#[derive(Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

impl RpcClient {
    /// Create a client for the given endpoint URL.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::Client::new(),
        }
    }

    /// The endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Call `getHealth`. `Ok(())` means the node answered `"ok"`.
    pub async fn get_health(&self) -> Result<(), StrategyError> {
        let result = self.call("getHealth", json!([])).await?;
        match result.as_str() {
            Some("ok") => Ok(()),
            _ => Err(StrategyError::Rpc(format!("unhealthy node: {result}"))),
        }
    }

    /// Issue one JSON-RPC request and return its `result` field.
    pub async fn call(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, StrategyError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        tracing::debug!(endpoint = %self.endpoint, method, "ralph.rpc.request");

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| StrategyError::Rpc(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(StrategyError::Rpc(format!("HTTP {status}: {text}")));
        }

        let parsed: RpcResponse = response
            .json()
            .await
            .map_err(|e| StrategyError::Rpc(format!("invalid JSON-RPC response: {e}")))?;

        if let Some(err) = parsed.error {
            return Err(StrategyError::Rpc(format!("{} ({})", err.message, err.code)));
        }
        parsed
            .result
            .ok_or_else(|| StrategyError::Rpc(format!("{method}: missing result")))
    }
}

impl Default for RpcClient {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}
