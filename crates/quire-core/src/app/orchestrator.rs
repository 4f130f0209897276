//! JobOrchestrator - 1 リクエスト = 1 ジョブのライフサイクル
//!
//! # submit フロー
//! 1. provision: スクラッチ領域を確保
//! 2. materialize: 添付を書き出す（失敗したら renderer は呼ばない）
//! 3. render: 成果物を生成
//! 4. register: 新しい JobId で registry に登録（ID を返す前に必ず完了）
//! 5. schedule: 期限切れ削除を予約
//!
//! スクラッチ領域はどの経路で抜けても破棄されます。

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::app::expiry::ExpiryScheduler;
use crate::domain::{Artifact, JobId, JobState, RetrieveError, SubmitError, Submission};
use crate::ports::{
    ArtifactStore, IdGenerator, Materializer, Renderer, ScratchArea, ScratchProvisioner,
};

/// Lifecycle は 1 件の投入を [`JobState`] に沿って追跡し、遷移ごとにログを出す
struct Lifecycle {
    state: JobState,
    started_at: Instant,
}

impl Lifecycle {
    fn new() -> Self {
        Self {
            state: JobState::Received,
            started_at: Instant::now(),
        }
    }

    fn advance(&mut self, next: JobState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal job transition {} -> {}",
            self.state,
            next
        );
        debug!(
            target = "quire::job",
            from = %self.state,
            to = %next,
            elapsed_ms = self.started_at.elapsed().as_millis() as u64,
            "Job state transition"
        );
        self.state = next;
    }

    fn elapsed_ms(&self) -> u64 {
        self.started_at.elapsed().as_millis() as u64
    }
}

/// JobOrchestrator は submit / retrieve の 2 操作を提供する
///
/// ポートはすべて `Arc<dyn ...>` で保持するので、複数のリクエストから
/// 同時に呼び出せます。構築は [`OrchestratorBuilder`](crate::app::OrchestratorBuilder) で。
pub struct JobOrchestrator {
    pub(crate) store: Arc<dyn ArtifactStore>,
    pub(crate) ids: Arc<dyn IdGenerator>,
    pub(crate) provisioner: Arc<dyn ScratchProvisioner>,
    pub(crate) materializer: Arc<dyn Materializer>,
    pub(crate) renderer: Arc<dyn Renderer>,
    pub(crate) expiry: ExpiryScheduler,
}

impl JobOrchestrator {
    /// 登録済み成果物を取得できる期間
    pub fn retention(&self) -> Duration {
        self.expiry.retention()
    }

    /// submit は 1 件の投入を最後まで処理し、成果物の ID を返す
    ///
    /// `Ok` が返った時点で成果物は取得可能。エラー時は何も登録されていない。
    pub async fn submit(&self, submission: Submission) -> Result<JobId, SubmitError> {
        let mut lifecycle = Lifecycle::new();

        let scratch = self.provisioner.provision().await.map_err(|err| {
            warn!(
                target = "quire::job",
                op = "job::provision",
                error = %err,
                "Failed to provision scratch area"
            );
            SubmitError::Provision(err)
        })?;
        lifecycle.advance(JobState::Provisioned);

        let result = self.run_in(&scratch, &submission, &mut lifecycle).await;
        scratch.close().await;

        match &result {
            Ok(id) => info!(
                target = "quire::job",
                op = "job::submit",
                job_id = %id,
                attachments = submission.attachments.len(),
                elapsed_ms = lifecycle.elapsed_ms(),
                "compile: document ready"
            ),
            Err(err) => warn!(
                target = "quire::job",
                op = "job::submit",
                state = %lifecycle.state,
                kind = ?err.kind(),
                elapsed_ms = lifecycle.elapsed_ms(),
                error = %err,
                "compile: job failed"
            ),
        }
        result
    }

    async fn run_in(
        &self,
        scratch: &ScratchArea,
        submission: &Submission,
        lifecycle: &mut Lifecycle,
    ) -> Result<JobId, SubmitError> {
        if let Err(err) = self
            .materializer
            .materialize(&submission.attachments, scratch.path())
            .await
        {
            lifecycle.advance(JobState::MaterializationFailed);
            return Err(err.into());
        }
        lifecycle.advance(JobState::Materialized);

        let artifact = match self
            .renderer
            .render(&submission.source, scratch.path())
            .await
        {
            Ok(artifact) => artifact,
            Err(err) => {
                lifecycle.advance(JobState::RenderFailed);
                return Err(err.into());
            }
        };
        lifecycle.advance(JobState::Rendered);

        let id = self.ids.generate_job_id();
        self.store.put(id, artifact).await;
        lifecycle.advance(JobState::Registered);

        // Detached; the returned handle is not needed here.
        drop(self.expiry.schedule(id));
        lifecycle.advance(JobState::ScheduledForExpiry);

        Ok(id)
    }

    /// retrieve は発行済みの ID で成果物を引く
    ///
    /// 形式不正・未発行・期限切れの ID はすべて同じエラーになる。
    pub async fn retrieve(&self, raw_id: &str) -> Result<Artifact, RetrieveError> {
        let found = match raw_id.parse::<JobId>() {
            Ok(id) => self.store.get(id).await,
            Err(_) => None,
        };

        match found {
            Some(artifact) => {
                info!(
                    target = "quire::job",
                    op = "job::retrieve",
                    job_id = raw_id,
                    bytes = artifact.len(),
                    "pdf: serving document"
                );
                Ok(artifact)
            }
            None => {
                info!(
                    target = "quire::job",
                    op = "job::retrieve",
                    job_id = raw_id,
                    "pdf: unknown document id"
                );
                Err(RetrieveError::UnknownId(raw_id.to_string()))
            }
        }
    }
}
