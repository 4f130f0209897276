//! Artifact model: the rendered output of a successful job.

use bytes::Bytes;

/// Artifact はレンダリング済みの不変バイト列と、レンダラーが宣言した content type
///
/// `Bytes` は参照カウントなので clone は安価。レジストリはロックを保持せずに
/// 並行する読み手へコピーを渡せる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    bytes: Bytes,
    content_type: &'static str,
}

impl Artifact {
    pub const PDF: &'static str = "application/pdf";

    pub fn new(bytes: impl Into<Bytes>, content_type: &'static str) -> Self {
        Self {
            bytes: bytes.into(),
            content_type,
        }
    }

    pub fn pdf(bytes: impl Into<Bytes>) -> Self {
        Self::new(bytes, Self::PDF)
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn content_type(&self) -> &'static str {
        self.content_type
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }
}
