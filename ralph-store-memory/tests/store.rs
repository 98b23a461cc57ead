use chrono::Utc;
use ralph_core::error::StoreError;
use ralph_core::id::StrategyName;
use ralph_core::result::{ExecutionRecord, ExecutionResult};
use ralph_core::store::{ExecutionQuery, StrategyRecord, StrategyStore, StrategyUpdate};
use ralph_store_memory::MemoryStore;
use std::sync::Arc;

fn name(s: &str) -> StrategyName {
    StrategyName::new(s)
}

fn logged(strategy: &str, action: &str) -> ExecutionRecord {
    ExecutionRecord::now(ExecutionResult::success(action).with_strategy(name(strategy)))
}

// --- Registry ---

#[tokio::test]
async fn create_then_find() {
    let store = MemoryStore::new();
    store.create(StrategyRecord::new("yield")).await.unwrap();

    let row = store.find(&name("yield")).await.unwrap().unwrap();
    assert_eq!(row.name, name("yield"));
    assert!(row.enabled);
    assert_eq!(row.total_executions, 0);
}

#[tokio::test]
async fn find_missing_returns_none() {
    let store = MemoryStore::new();
    assert_eq!(store.find(&name("missing")).await.unwrap(), None);
}

#[tokio::test]
async fn create_duplicate_is_rejected() {
    let store = MemoryStore::new();
    store.create(StrategyRecord::new("zk")).await.unwrap();

    let err = store.create(StrategyRecord::new("zk")).await.unwrap_err();
    assert!(matches!(err, StoreError::AlreadyExists(n) if n == name("zk")));
}

#[tokio::test]
async fn find_many_keeps_creation_order() {
    let store = MemoryStore::new();
    for n in ["yield", "signal", "liquidity"] {
        store.create(StrategyRecord::new(n)).await.unwrap();
    }

    let names: Vec<String> = store
        .find_many()
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.name.0)
        .collect();
    assert_eq!(names, vec!["yield", "signal", "liquidity"]);
}

#[tokio::test]
async fn update_increments_counters() {
    let store = MemoryStore::with_strategies([StrategyRecord::new("yield")]);
    let now = Utc::now();

    store
        .update(&name("yield"), StrategyUpdate::execution(true, Some(1.25), now))
        .await
        .unwrap();
    let row = store
        .update(&name("yield"), StrategyUpdate::execution(false, Some(-0.25), now))
        .await
        .unwrap();

    assert_eq!(row.total_executions, 2);
    assert_eq!(row.successful_executions, 1);
    assert!((row.total_profit - 1.0).abs() < 1e-12);
    assert_eq!(row.last_executed, Some(now));
}

#[tokio::test]
async fn update_missing_is_not_found() {
    let store = MemoryStore::new();
    let err = store
        .update(&name("ghost"), StrategyUpdate::new().enabled(false))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound(_)));
}

// --- Execution log ---

#[tokio::test]
async fn executions_are_newest_first() {
    let store = MemoryStore::new();
    store.append_execution(logged("yield", "first")).await.unwrap();
    store.append_execution(logged("yield", "second")).await.unwrap();

    let rows = store.executions(&ExecutionQuery::all()).await.unwrap();
    assert_eq!(rows[0].result.action, "second");
    assert_eq!(rows[1].result.action, "first");
}

#[tokio::test]
async fn executions_filter_and_limit() {
    let store = MemoryStore::new();
    for i in 0..5 {
        store
            .append_execution(logged("signal", &format!("seek-{i}")))
            .await
            .unwrap();
        store.append_execution(logged("zk", "farm")).await.unwrap();
    }

    let rows = store
        .executions(&ExecutionQuery::all().strategy("signal").limit(2))
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|r| r.result.strategy == name("signal")));
    assert_eq!(rows[0].result.action, "seek-4");
}

// --- Concurrency ---

#[tokio::test]
async fn concurrent_updates_are_not_lost() {
    let store = Arc::new(MemoryStore::with_strategies([StrategyRecord::new("yield")]));
    let mut handles = Vec::new();
    for _ in 0..20 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            store
                .update(
                    &StrategyName::new("yield"),
                    StrategyUpdate::execution(true, None, Utc::now()),
                )
                .await
                .unwrap();
        }));
    }
    for h in handles {
        h.await.unwrap();
    }

    let row = store.find(&name("yield")).await.unwrap().unwrap();
    assert_eq!(row.total_executions, 20);
    assert_eq!(row.successful_executions, 20);
}

#[test]
fn memory_store_is_object_safe() {
    fn _assert(_: &dyn StrategyStore) {}
    _assert(&MemoryStore::new());
}
