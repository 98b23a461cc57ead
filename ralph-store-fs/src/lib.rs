#![deny(missing_docs)]
//! Filesystem-backed implementation of ralph-core's StrategyStore trait.
//!
//! The registry is one JSON array rewritten atomically (temp file plus
//! rename) on every change. The execution log is JSON lines, appended.
//! Provides true persistence across process restarts.

use async_trait::async_trait;
use ralph_core::error::StoreError;
use ralph_core::id::StrategyName;
use ralph_core::result::ExecutionRecord;
use ralph_core::store::{ExecutionQuery, StrategyRecord, StrategyStore, StrategyUpdate};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

const REGISTRY_FILE: &str = "strategies.json";
const LOG_FILE: &str = "executions.jsonl";

/// Filesystem-backed strategy store.
///
/// Directory layout:
/// ```text
/// root/
///   strategies.json     # registry rows, creation order
///   executions.jsonl    # one ExecutionRecord per line, oldest first
/// ```
///
/// Writers inside one process are serialized by an internal lock.
/// Concurrent writers from other processes are not accounted for.
pub struct FsStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

impl FsStore {
    /// Create a new filesystem store rooted at the given directory.
    ///
    /// The directory is created lazily on first write.
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    /// The directory this store writes to.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn registry_path(&self) -> PathBuf {
        self.root.join(REGISTRY_FILE)
    }

    fn log_path(&self) -> PathBuf {
        self.root.join(LOG_FILE)
    }

    async fn load_registry(&self) -> Result<Vec<StrategyRecord>, StoreError> {
        match tokio::fs::read_to_string(self.registry_path()).await {
            Ok(contents) => serde_json::from_str(&contents)
                .map_err(|e| StoreError::Serialization(e.to_string())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(vec![]),
            Err(e) => Err(StoreError::ReadFailed(e.to_string())),
        }
    }

    async fn save_registry(&self, rows: &[StrategyRecord]) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;

        let contents = serde_json::to_string_pretty(rows)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let tmp = self.root.join(format!("{REGISTRY_FILE}.tmp"));
        tokio::fs::write(&tmp, contents)
            .await
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        tokio::fs::rename(&tmp, self.registry_path())
            .await
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        Ok(())
    }

    async fn load_log(&self) -> Result<Vec<ExecutionRecord>, StoreError> {
        let contents = match tokio::fs::read_to_string(self.log_path()).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(vec![]),
            Err(e) => return Err(StoreError::ReadFailed(e.to_string())),
        };
        Ok(parse_log(&contents))
    }
}

/// Parse JSON lines, skipping blank and malformed lines. A crash mid-append
/// leaves at most one torn line at the end.
fn parse_log(contents: &str) -> Vec<ExecutionRecord> {
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .filter_map(|(idx, line)| match serde_json::from_str(line) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(line = idx + 1, error = %e, "ralph.store_fs.skip_malformed_line");
                None
            }
        })
        .collect()
}

#[async_trait]
impl StrategyStore for FsStore {
    async fn find(&self, name: &StrategyName) -> Result<Option<StrategyRecord>, StoreError> {
        let rows = self.load_registry().await?;
        Ok(rows.into_iter().find(|r| &r.name == name))
    }

    async fn find_many(&self) -> Result<Vec<StrategyRecord>, StoreError> {
        self.load_registry().await
    }

    async fn create(&self, record: StrategyRecord) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut rows = self.load_registry().await?;
        if rows.iter().any(|r| r.name == record.name) {
            return Err(StoreError::AlreadyExists(record.name));
        }
        rows.push(record);
        self.save_registry(&rows).await
    }

    async fn update(
        &self,
        name: &StrategyName,
        update: StrategyUpdate,
    ) -> Result<StrategyRecord, StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut rows = self.load_registry().await?;
        let record = rows
            .iter_mut()
            .find(|r| &r.name == name)
            .ok_or_else(|| StoreError::NotFound(name.clone()))?;
        update.apply(record);
        let updated = record.clone();
        self.save_registry(&rows).await?;
        Ok(updated)
    }

    async fn append_execution(&self, record: ExecutionRecord) -> Result<(), StoreError> {
        let mut line =
            serde_json::to_string(&record).map_err(|e| StoreError::Serialization(e.to_string()))?;
        line.push('\n');

        let _guard = self.write_lock.lock().await;
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.log_path())
            .await
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        file.flush()
            .await
            .map_err(|e| StoreError::WriteFailed(e.to_string()))?;
        Ok(())
    }

    async fn executions(&self, query: &ExecutionQuery) -> Result<Vec<ExecutionRecord>, StoreError> {
        let log = self.load_log().await?;
        Ok(log
            .into_iter()
            .rev()
            .filter(|r| query.matches(r))
            .take(query.limit)
            .collect())
    }
}
