//! Materializer port - 添付ファイルをスクラッチ領域に書き出す

use std::path::Path;

use async_trait::async_trait;

use crate::domain::{AttachmentSpec, MaterializeError};

/// Materializer は添付をデコードして `<name>.<type>` として書き出す
///
/// 最初の失敗で中断します。途中まで書かれたファイルはスクラッチ領域ごと破棄されます。
#[async_trait]
pub trait Materializer: Send + Sync {
    /// 書き出したファイル数を返す
    async fn materialize(
        &self,
        attachments: &[AttachmentSpec],
        dir: &Path,
    ) -> Result<usize, MaterializeError>;
}
