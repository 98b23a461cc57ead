//! End-to-end: the standard registry on a filesystem store, driven
//! through the HTTP control surface.
//!
//! 1. **Control**: start, observe a cycle, stop over HTTP
//! 2. **Registry toggle**: a disabled strategy stops being admitted
//! 3. **Store swap**: the same agent logic on memory and fs backends
//!
//! No network beyond loopback: the RPC endpoint is never called by the
//! stub strategies.

use ralph_agent::RalphAgent;
use ralph_core::id::StrategyName;
use ralph_core::store::{ExecutionQuery, StrategyStore};
use ralph_core::test_utils::{ConstGate, RecordingNotifier};
use ralph_loop::RalphLoop;
use ralph_server::AppState;
use ralph_store_fs::FsStore;
use ralph_store_memory::MemoryStore;
use ralph_strategies::{BeliefMode, BeliefStrategy, FixedBeliefs, RpcClient, names, standard_strategies};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Helpers
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn standard_agent(store: Arc<dyn StrategyStore>, notifier: Arc<RecordingNotifier>) -> RalphAgent {
    let rpc = Arc::new(RpcClient::new("http://127.0.0.1:1"));
    let belief = Arc::new(BeliefStrategy::from_mode(BeliefMode::Fixed, 0.2));
    RalphAgent::new(store, belief.clone(), notifier)
        .with_gate(ConstGate(0.0))
        .with_strategies(standard_strategies(rpc, belief))
}

async fn wait_for_cycles(ralph: &RalphLoop, n: u64) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while ralph.status().await.cycles_completed < n {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("cycle finished in time");
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// 1 + 2. Control surface over a real registry
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[tokio::test]
async fn http_controls_loop_over_fs_store() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn StrategyStore> = Arc::new(FsStore::new(dir.path()));
    let notifier = Arc::new(RecordingNotifier::new());
    let mut agent = standard_agent(Arc::clone(&store), notifier.clone());
    agent.initialize().await.unwrap();

    let ralph = Arc::new(RalphLoop::new(
        Arc::new(Mutex::new(agent)),
        Duration::from_secs(3600),
    ));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(ralph_server::serve(
        listener,
        AppState::new(Arc::clone(&ralph), Arc::clone(&store)),
        std::future::pending(),
    ));
    let client = reqwest::Client::new();

    // Disable `signal` before the first cycle.
    let toggled: Value = client
        .patch(format!("{base}/api/ralph/strategies/{}", names::SIGNAL))
        .json(&json!({ "enabled": false }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(toggled["enabled"], false);

    let started: Value = client
        .post(format!("{base}/api/ralph"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(started["status"], "initiated");

    wait_for_cycles(&ralph, 1).await;

    let stopped: Value = client
        .delete(format!("{base}/api/ralph"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stopped["status"], "stopped");
    ralph.stop_and_wait().await;

    // Everything but the disabled strategy ran once.
    let log: Value = client
        .get(format!("{base}/api/ralph/executions"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let mut ran: Vec<&str> = log
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["strategy"].as_str().unwrap())
        .collect();
    ran.sort_unstable();
    assert_eq!(
        ran,
        vec![names::BELIEF, names::LIQUIDITY, names::YIELD, names::ZK]
    );

    // The fixed rule wrote its table through to disk.
    let zk = store
        .find(&StrategyName::new(names::ZK))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(zk.belief_score, 0.7);
    assert_eq!(zk.total_executions, 1);

    let messages = notifier.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("Strategies Executed: 4"));
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// 3. Store swap
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

async fn run_two_cycles(store: Arc<dyn StrategyStore>) -> Vec<(String, u64, f64)> {
    let mut agent = standard_agent(Arc::clone(&store), Arc::new(RecordingNotifier::new()));
    agent.execute_cycle().await.unwrap();
    agent.execute_cycle().await.unwrap();

    store
        .find_many()
        .await
        .unwrap()
        .into_iter()
        .map(|row| (row.name.to_string(), row.total_executions, row.belief_score))
        .collect()
}

#[tokio::test]
async fn memory_and_fs_stores_agree() {
    let dir = tempfile::tempdir().unwrap();
    let memory = run_two_cycles(Arc::new(MemoryStore::new())).await;
    let fs = run_two_cycles(Arc::new(FsStore::new(dir.path()))).await;

    assert_eq!(memory, fs);
    assert_eq!(memory.len(), FixedBeliefs::scores().len());
    assert!(memory.iter().all(|(_, runs, _)| *runs == 2));

    let fs_store = FsStore::new(dir.path());
    let log = fs_store.executions(&ExecutionQuery::all().limit(100)).await.unwrap();
    assert_eq!(log.len(), 10);
}
