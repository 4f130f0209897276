//! FsMaterializer - 添付をデコードしてファイルとして書き出す
//!
//! # フロー
//! 1. data の有無を確認（無ければ MissingData）
//! 2. URL-safe base64 でデコード（失敗すれば Decode）
//! 3. ファイル名を検証（スクラッチ領域の外には書かない）
//! 4. `<name>.<type>` を 0600 で書き込み

use std::path::Path;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::domain::{AttachmentSpec, MaterializeError};
use crate::ports::Materializer;

#[derive(Debug, Clone, Copy, Default)]
pub struct FsMaterializer;

impl FsMaterializer {
    pub fn new() -> Self {
        Self
    }
}

/// 名前の要素が結合先ディレクトリの外に出られないことを確認する
fn is_safe_component(part: &str) -> bool {
    !part.is_empty()
        && part != "."
        && part != ".."
        && !part.contains(['/', '\\', '\0'])
}

async fn write_private(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut options = tokio::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o600);

    let mut file = options.open(path).await?;
    file.write_all(data).await?;
    file.flush().await
}

#[async_trait]
impl Materializer for FsMaterializer {
    async fn materialize(
        &self,
        attachments: &[AttachmentSpec],
        dir: &Path,
    ) -> Result<usize, MaterializeError> {
        for attachment in attachments {
            let position = attachment.position;
            let encoded = attachment
                .data
                .as_deref()
                .ok_or(MaterializeError::MissingData { position })?;
            let bytes = URL_SAFE
                .decode(encoded)
                .map_err(|source| MaterializeError::Decode { position, source })?;

            if !is_safe_component(&attachment.name) || !is_safe_component(&attachment.kind) {
                return Err(MaterializeError::InvalidName {
                    position,
                    name: attachment.file_name(),
                });
            }

            let path = dir.join(attachment.file_name());
            write_private(&path, &bytes)
                .await
                .map_err(|source| MaterializeError::Write {
                    path: path.clone(),
                    source,
                })?;

            debug!(
                target = "quire::materialize",
                op = "materialize::write",
                position,
                path = %path.display(),
                bytes = bytes.len(),
                "Attachment written"
            );
        }
        Ok(attachments.len())
    }
}
