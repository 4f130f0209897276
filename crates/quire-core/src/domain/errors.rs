//! Errors - エラー型と分類
//!
//! すべてのエラーはリクエスト単位で処理され、呼び出し元への応答に変換されます。
//! プロセスを落とすエラーは存在しません（稼働時間の上限による終了は障害ではない）。

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// ErrorKind はエラーの運用分類
///
/// # 分類
/// - Input: 入力不備（添付データの欠落、base64 デコード失敗）
/// - Render: レンダラの失敗（コンパイラの非ゼロ終了、出力なし、タイムアウト）
/// - NotFound: 未知または期限切れの ID（両者は区別しない）
/// - Fatal: スクラッチ領域の確保失敗などの I/O 障害
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Input,
    Render,
    NotFound,
    Fatal,
}

/// MaterializeError は添付のデコード・書き込み失敗
#[derive(Debug, Error)]
pub enum MaterializeError {
    #[error("no data for image #{position}")]
    MissingData { position: usize },

    #[error("failed to decode data for image #{position}: {source}")]
    Decode {
        position: usize,
        #[source]
        source: base64::DecodeError,
    },

    #[error("invalid file name for image #{position}: {name:?}")]
    InvalidName { position: usize, name: String },

    #[error("failed to write image {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MaterializeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            MaterializeError::Write { .. } => ErrorKind::Fatal,
            _ => ErrorKind::Input,
        }
    }
}

/// RenderError はレンダリング段階の失敗。診断テキストがそのまま呼び出し側へ返る
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to write source file: {0}")]
    WriteSource(#[source] std::io::Error),

    #[error("failed to start compiler: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("failed to compile latex:\n\n{log}")]
    Compile {
        pass: u32,
        exit_code: Option<i32>,
        log: String,
    },

    #[error("compiler did not finish within {0:?}")]
    TimedOut(Duration),

    #[error("failed to read rendered output: {0}")]
    MissingOutput(#[source] std::io::Error),
}

/// SubmitError は投入の失敗。ライフサイクルのエラー出口ごとに 1 バリアント
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("failed to provision scratch area: {0}")]
    Provision(#[source] std::io::Error),

    #[error(transparent)]
    Materialize(#[from] MaterializeError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl SubmitError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SubmitError::Provision(_) => ErrorKind::Fatal,
            SubmitError::Materialize(err) => err.kind(),
            SubmitError::Render(_) => ErrorKind::Render,
        }
    }
}

/// RetrieveError は取得の失敗。「存在しない」と「期限切れ」は同じように報告する
#[derive(Debug, Error)]
pub enum RetrieveError {
    #[error("bad document ID: {0}")]
    UnknownId(String),
}

impl RetrieveError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::NotFound
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine;

    #[test]
    fn materialize_kinds() {
        let missing = MaterializeError::MissingData { position: 2 };
        assert_eq!(missing.kind(), ErrorKind::Input);
        assert_eq!(missing.to_string(), "no data for image #2");

        let decode = base64::engine::general_purpose::URL_SAFE
            .decode("***")
            .unwrap_err();
        let decode = MaterializeError::Decode {
            position: 1,
            source: decode,
        };
        assert_eq!(decode.kind(), ErrorKind::Input);

        let write = MaterializeError::Write {
            path: PathBuf::from("/nope/x.png"),
            source: std::io::Error::other("disk full"),
        };
        assert_eq!(write.kind(), ErrorKind::Fatal);
    }

    #[test]
    fn submit_error_kind_follows_source() {
        let err = SubmitError::from(MaterializeError::MissingData { position: 1 });
        assert_eq!(err.kind(), ErrorKind::Input);

        let err = SubmitError::from(RenderError::TimedOut(Duration::from_secs(1)));
        assert_eq!(err.kind(), ErrorKind::Render);

        let err = SubmitError::Provision(std::io::Error::other("no space"));
        assert_eq!(err.kind(), ErrorKind::Fatal);
    }

    #[test]
    fn compile_error_carries_compiler_log() {
        let err = SubmitError::from(RenderError::Compile {
            pass: 1,
            exit_code: Some(1),
            log: "! Undefined control sequence.".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "failed to compile latex:\n\n! Undefined control sequence."
        );
    }
}
