//! Renderer port - 外部コンパイラによるレンダリング
//!
//! # 実装
//! - **PdfLatexRenderer**: pdflatex を複数パス実行して PDF を得る

use std::path::Path;

use async_trait::async_trait;

use crate::domain::{Artifact, RenderError};

/// Renderer はソースと作業ディレクトリから成果物を作る
///
/// # 設計原則
/// - 内部で何パス実行してもよい（相互参照の解決など）
/// - 実行時間には上限を設けること。ハングは RenderError として返す
/// - 失敗時は呼び出し元に見せる診断テキストを RenderError に含める
#[async_trait]
pub trait Renderer: Send + Sync {
    async fn render(&self, source: &[u8], dir: &Path) -> Result<Artifact, RenderError>;
}
