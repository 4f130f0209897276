//! ExpiryScheduler - 成果物の期限切れ削除
//!
//! エントリごとに 1 回だけ発火する遅延タスクを spawn します。
//! 一度スケジュールしたら取り消しはできず、読み出しによる延長もありません。

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::info;

use crate::domain::{JobId, JobState};
use crate::ports::ArtifactStore;

/// ExpiryScheduler は保持期間の経過後に registry からエントリを削除する
///
/// # フロー
/// 1. schedule() で削除タスクを spawn（呼び出し元はブロックしない）
/// 2. retention だけ sleep
/// 3. ArtifactStore::remove()（既に無くても問題ない）
#[derive(Clone)]
pub struct ExpiryScheduler {
    store: Arc<dyn ArtifactStore>,
    retention: Duration,
}

impl ExpiryScheduler {
    pub fn new(store: Arc<dyn ArtifactStore>, retention: Duration) -> Self {
        Self { store, retention }
    }

    pub fn retention(&self) -> Duration {
        self.retention
    }

    /// `id` の遅延削除を spawn する
    ///
    /// ハンドルはテスト用。本番の呼び出し側は捨て、タスクは切り離されたまま動く。
    pub fn schedule(&self, id: JobId) -> JoinHandle<()> {
        let store = Arc::clone(&self.store);
        let retention = self.retention;
        tokio::spawn(async move {
            tokio::time::sleep(retention).await;
            store.remove(id).await;
            info!(
                target = "quire::expiry",
                op = "expiry::remove",
                job_id = %id,
                from = %JobState::ScheduledForExpiry,
                to = %JobState::Expired,
                retention_secs = retention.as_secs(),
                "compile: cleaning id"
            );
        })
    }
}
