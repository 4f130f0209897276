//! Job state machine.

use std::fmt;

/// JobState は投入 1 件ごとのジョブ状態
///
/// 状態遷移:
/// - Received -> Provisioned -> Materialized -> Rendered -> Registered
///   -> ScheduledForExpiry -> Expired
/// - Provisioned -> MaterializationFailed
/// - Materialized -> RenderFailed
///
/// 取得は状態ではない。参照は成果物を見つけるか、ジョブの状態によらず
/// 一律の「未知の識別子」を返すかのどちらか。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobState {
    /// リクエスト受理。まだ何も確保していない
    Received,

    /// スクラッチ領域を確保済み
    Provisioned,

    /// すべての添付をスクラッチ領域に書き込み済み
    Materialized,

    /// レンダラーが成果物を生成した
    Rendered,

    /// 新しい ID で成果物を格納し、ID を返却済み
    Registered,

    /// 遅延削除を予約済み
    ScheduledForExpiry,

    /// 保持期間が過ぎ、エントリを削除した
    Expired,

    /// 添付のデコード・書き込みに失敗。エントリは作られない
    MaterializationFailed,

    /// レンダラーが失敗またはタイムアウト。エントリは作られない
    RenderFailed,
}

impl JobState {
    /// 終端状態（これ以上遷移しない）かどうか
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobState::Expired | JobState::MaterializationFailed | JobState::RenderFailed
        )
    }

    /// `next` が `self` の正当な次状態かどうか
    pub fn can_transition_to(self, next: JobState) -> bool {
        use JobState::*;
        matches!(
            (self, next),
            (Received, Provisioned)
                | (Provisioned, Materialized)
                | (Provisioned, MaterializationFailed)
                | (Materialized, Rendered)
                | (Materialized, RenderFailed)
                | (Rendered, Registered)
                | (Registered, ScheduledForExpiry)
                | (ScheduledForExpiry, Expired)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            JobState::Received => "received",
            JobState::Provisioned => "provisioned",
            JobState::Materialized => "materialized",
            JobState::Rendered => "rendered",
            JobState::Registered => "registered",
            JobState::ScheduledForExpiry => "scheduled_for_expiry",
            JobState::Expired => "expired",
            JobState::MaterializationFailed => "materialization_failed",
            JobState::RenderFailed => "render_failed",
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
