//! OrchestratorBuilder - JobOrchestrator の構築とワイヤリング
//!
//! # Fail-fast 設計
//! - renderer は必須（既定の実装は選ばない）
//! - retention = 0 は登録直後に消える設定なので拒否する
//! - それ以外の port は既定の実装で埋める

use std::sync::Arc;
use std::time::Duration;

use crate::app::expiry::ExpiryScheduler;
use crate::app::orchestrator::JobOrchestrator;
use crate::impls::{FsMaterializer, InMemoryArtifactStore, TempDirProvisioner};
use crate::ports::{
    ArtifactStore, IdGenerator, Materializer, Renderer, ScratchProvisioner, SystemClock,
    UlidGenerator,
};

/// OrchestratorBuilder は JobOrchestrator を構築
///
/// # 使用例
/// ```ignore
/// let orchestrator = OrchestratorBuilder::new()
///     .renderer(PdfLatexRenderer::new("pdflatex"))
///     .provisioner(TempDirProvisioner::new("/tmp/quire"))
///     .retention(Duration::from_secs(300))
///     .build()?;
/// ```
///
/// # 既定値
/// - store: InMemoryArtifactStore
/// - ids: UlidGenerator<SystemClock>
/// - provisioner: OS の一時ディレクトリ直下の TempDirProvisioner
/// - materializer: FsMaterializer
/// - retention: 5 分
pub struct OrchestratorBuilder {
    store: Option<Arc<dyn ArtifactStore>>,
    ids: Option<Arc<dyn IdGenerator>>,
    provisioner: Option<Arc<dyn ScratchProvisioner>>,
    materializer: Option<Arc<dyn Materializer>>,
    renderer: Option<Arc<dyn Renderer>>,
    retention: Duration,
}

/// BuildError は構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("No renderer configured. Call `renderer()` before `build()`.")]
    MissingRenderer,

    #[error("Retention must be greater than zero.")]
    ZeroRetention,
}

impl OrchestratorBuilder {
    pub const DEFAULT_RETENTION: Duration = Duration::from_secs(5 * 60);

    pub fn new() -> Self {
        Self {
            store: None,
            ids: None,
            provisioner: None,
            materializer: None,
            renderer: None,
            retention: Self::DEFAULT_RETENTION,
        }
    }

    pub fn store(mut self, store: impl ArtifactStore + 'static) -> Self {
        self.store = Some(Arc::new(store));
        self
    }

    pub fn id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Some(Arc::new(ids));
        self
    }

    pub fn provisioner(mut self, provisioner: impl ScratchProvisioner + 'static) -> Self {
        self.provisioner = Some(Arc::new(provisioner));
        self
    }

    pub fn materializer(mut self, materializer: impl Materializer + 'static) -> Self {
        self.materializer = Some(Arc::new(materializer));
        self
    }

    pub fn renderer(self, renderer: impl Renderer + 'static) -> Self {
        self.renderer_arc(Arc::new(renderer))
    }

    /// 呼び出し側がハンドルを保持しているレンダラーを使う
    pub fn renderer_arc(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn retention(mut self, retention: Duration) -> Self {
        self.retention = retention;
        self
    }

    /// 検証して JobOrchestrator を生成
    pub fn build(self) -> Result<JobOrchestrator, BuildError> {
        let renderer = self.renderer.ok_or(BuildError::MissingRenderer)?;
        if self.retention.is_zero() {
            return Err(BuildError::ZeroRetention);
        }

        let store = self
            .store
            .unwrap_or_else(|| Arc::new(InMemoryArtifactStore::new()));
        let ids = self
            .ids
            .unwrap_or_else(|| Arc::new(UlidGenerator::new(SystemClock)));
        let provisioner = self
            .provisioner
            .unwrap_or_else(|| Arc::new(TempDirProvisioner::new(std::env::temp_dir())));
        let materializer = self
            .materializer
            .unwrap_or_else(|| Arc::new(FsMaterializer::new()));

        Ok(JobOrchestrator {
            expiry: ExpiryScheduler::new(Arc::clone(&store), self.retention),
            store,
            ids,
            provisioner,
            materializer,
            renderer,
        })
    }
}

impl Default for OrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
