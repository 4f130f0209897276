//! ScratchProvisioner port - ジョブごとの作業ディレクトリ
//!
//! スクラッチ領域はジョブ間で共有されないので、ロックは不要です。

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::runtime::Handle;
use tracing::warn;

/// ScratchArea はジョブ専用のディレクトリ
///
/// close() か drop で中身ごと削除される。どちらも削除はブロッキングプールで行い、
/// ランタイムのワーカースレッドを塞がない。
#[derive(Debug)]
pub struct ScratchArea {
    path: PathBuf,
    dir: Option<TempDir>,
}

impl ScratchArea {
    pub fn new(dir: TempDir) -> Self {
        Self {
            path: dir.path().to_path_buf(),
            dir: Some(dir),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// ディレクトリを今すぐ削除し、失敗は握りつぶさずログに残す
    pub async fn close(mut self) {
        let Some(dir) = self.dir.take() else {
            return;
        };
        let err = match tokio::task::spawn_blocking(move || dir.close()).await {
            Ok(Ok(())) => return,
            Ok(Err(err)) => err,
            Err(join) => std::io::Error::other(join),
        };
        warn!(
            target = "quire::scratch",
            op = "scratch::close",
            path = %self.path.display(),
            error = %err,
            "Failed to remove scratch area"
        );
    }
}

impl Drop for ScratchArea {
    fn drop(&mut self) {
        let Some(dir) = self.dir.take() else {
            return;
        };
        match Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(move || drop(dir));
            }
            Err(_) => drop(dir),
        }
    }
}

/// ScratchProvisioner は作業ディレクトリを確保する
#[async_trait]
pub trait ScratchProvisioner: Send + Sync {
    async fn provision(&self) -> std::io::Result<ScratchArea>;
}
