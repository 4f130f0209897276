//! Job identifiers.
//!
//! # ULID ベースの ID
//! JobId は ULID (Universally Unique Lexicographically Sortable Identifier) を包む型です。
//!
//! ## ULID の特性
//! - **時刻でソート可能**: timestamp が先頭にあるため、発行順序でソートできる
//! - **衝突しにくい**: 1ms あたり 80-bit のランダム部を持つ
//! - **UUID互換**: 128-bit で UUID と同じサイズ
//!
//! 外部に渡すテキスト表現は `job-<ULID>` です。これが結果取得の唯一の capability になります。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ulid::Ulid;

const PREFIX: &str = "job-";

/// JobId は投入済みジョブの識別子（呼び出し側に返すトークン）
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct JobId {
    ulid: Ulid,
}

impl JobId {
    pub fn from_ulid(ulid: Ulid) -> Self {
        Self { ulid }
    }

    /// 内部の ULID を取得
    pub fn as_ulid(&self) -> Ulid {
        self.ulid
    }
}

impl From<Ulid> for JobId {
    fn from(ulid: Ulid) -> Self {
        Self::from_ulid(ulid)
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{PREFIX}{}", self.ulid)
    }
}

/// ParseJobIdError は `job-<ULID>` 形式でない文字列を表す
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed job id: {0:?}")]
pub struct ParseJobIdError(String);

impl FromStr for JobId {
    type Err = ParseJobIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s
            .strip_prefix(PREFIX)
            .ok_or_else(|| ParseJobIdError(s.to_string()))?;
        Ulid::from_string(raw)
            .map(Self::from_ulid)
            .map_err(|_| ParseJobIdError(s.to_string()))
    }
}
