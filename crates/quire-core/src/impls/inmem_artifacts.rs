//! In-memory job registry.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::warn;

use crate::domain::{Artifact, JobId};
use crate::ports::ArtifactStore;

/// InMemoryArtifactStore は JobId をキーにした成果物のレジストリ
///
/// # ロック
/// - map 全体を 1 つの排他ロックで守り、各操作はロックを 1 回だけ取る
/// - ロックは map 操作の間しか保持しない
/// - clone したストアは同じ map を共有する
#[derive(Clone, Default)]
pub struct InMemoryArtifactStore {
    entries: Arc<Mutex<HashMap<JobId, Artifact>>>,
}

impl InMemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ArtifactStore for InMemoryArtifactStore {
    async fn put(&self, id: JobId, artifact: Artifact) {
        let replaced = {
            let mut entries = self.entries.lock().await;
            entries.insert(id, artifact)
        };

        // Collisions are not prevented, only made visible.
        if let Some(previous) = replaced {
            warn!(
                target = "quire::registry",
                op = "registry::put",
                job_id = %id,
                replaced_bytes = previous.len(),
                "Job id collision; previous artifact overwritten"
            );
        }
    }

    async fn get(&self, id: JobId) -> Option<Artifact> {
        let entries = self.entries.lock().await;
        entries.get(&id).cloned()
    }

    async fn remove(&self, id: JobId) {
        let mut entries = self.entries.lock().await;
        entries.remove(&id);
    }

    async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}
