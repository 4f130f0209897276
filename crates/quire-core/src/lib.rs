//! quire-core
//!
//! Core building blocks for the Quire document compilation service.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（ids, artifact, submission, state, errors）
//! - **ports**: 抽象化レイヤー（ArtifactStore, Renderer, Materializer, ScratchProvisioner, IdGenerator, Clock）
//! - **impls**: 実装（InMemoryArtifactStore, PdfLatexRenderer, FsMaterializer, TempDirProvisioner）
//! - **app**: アプリケーションロジック（builder, orchestrator, expiry, watchdog）

pub mod app;
pub mod domain;
pub mod impls;
pub mod ports;

pub use app::{BuildError, JobOrchestrator, OrchestratorBuilder, UptimeWatchdog};
pub use domain::{
    Artifact, AttachmentSpec, ErrorKind, JobId, RetrieveError, SubmitError, Submission,
};
