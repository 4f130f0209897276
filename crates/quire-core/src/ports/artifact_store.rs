//! ArtifactStore port - ジョブ ID から成果物への対応表（registry）
//!
//! # 実装
//! - **InMemoryArtifactStore**: プロセス内の HashMap（再起動で消える）

use async_trait::async_trait;

use crate::domain::{Artifact, JobId};

/// ArtifactStore は JobId → Artifact の対応を保持する
///
/// # 設計原則
/// - 操作は put / get / remove の 3 つだけ。内部の map は外に出さない
/// - 各操作は外から見て atomic（書きかけの entry は観測されない）
/// - remove は冪等（存在しなくてもエラーにしない）
/// - put は上書き（後勝ち）。ID 衝突の検出はしない
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// `id` のエントリを追加または上書き
    async fn put(&self, id: JobId, artifact: Artifact);

    /// `id` のエントリを参照（変更はしない）
    async fn get(&self, id: JobId) -> Option<Artifact>;

    /// `id` のエントリがあれば削除
    async fn remove(&self, id: JobId);

    /// 現在のエントリ数
    async fn len(&self) -> usize;

    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
