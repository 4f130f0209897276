//! Impls - port の実装
//!
//! # 含まれる実装
//! - **InMemoryArtifactStore**: プロセス内の job registry
//! - **TempDirProvisioner**: tempfile によるスクラッチ領域
//! - **FsMaterializer**: 添付のデコードと書き出し
//! - **PdfLatexRenderer**: pdflatex の実行

pub mod fs_materializer;
pub mod inmem_artifacts;
pub mod pdflatex;
pub mod tempdir_provisioner;

// 主要な型を再エクスポート
pub use self::fs_materializer::FsMaterializer;
pub use self::inmem_artifacts::InMemoryArtifactStore;
pub use self::pdflatex::PdfLatexRenderer;
pub use self::tempdir_provisioner::TempDirProvisioner;
