//! TempDirProvisioner - tempfile ベースのスクラッチ領域

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::ports::{ScratchArea, ScratchProvisioner};

/// TempDirProvisioner は共有ルート直下に `job-XXXXXX` ディレクトリを確保する
#[derive(Debug, Clone)]
pub struct TempDirProvisioner {
    root: PathBuf,
}

impl TempDirProvisioner {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl ScratchProvisioner for TempDirProvisioner {
    async fn provision(&self) -> std::io::Result<ScratchArea> {
        let root = self.root.clone();
        // tempfile is synchronous; keep the runtime threads free.
        let dir = tokio::task::spawn_blocking(move || {
            std::fs::create_dir_all(&root)?;
            tempfile::Builder::new().prefix("job-").tempdir_in(&root)
        })
        .await
        .map_err(std::io::Error::other)??;
        Ok(ScratchArea::new(dir))
    }
}
