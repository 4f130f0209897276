//! UptimeWatchdog - プロセス稼働時間の上限
//!
//! 上限に達したらプロセスを終了させるためのタイマーです。実際の終了
//! （exit code の決定）は呼び出し側が行います。in-flight のジョブは待たず、
//! 保持中の成果物もすべて失われます。

use std::time::Duration;

use tracing::info;

/// UptimeWatchdog はプロセスが `max_uptime` だけ稼働した時点で完了する
#[derive(Debug, Clone, Copy)]
pub struct UptimeWatchdog {
    max_uptime: Duration,
}

impl UptimeWatchdog {
    pub const DEFAULT_MAX_UPTIME: Duration = Duration::from_secs(24 * 60 * 60);

    pub fn new(max_uptime: Duration) -> Self {
        Self { max_uptime }
    }

    pub fn max_uptime(&self) -> Duration {
        self.max_uptime
    }

    /// 稼働時間の上限まで sleep する。`tokio::select!` でサーバーの future と競わせて使う
    pub async fn expired(self) {
        info!(
            target = "quire::watchdog",
            op = "watchdog::arm",
            max_uptime_secs = self.max_uptime.as_secs(),
            "Shutting down after uptime limit"
        );
        tokio::time::sleep(self.max_uptime).await;
    }
}

impl Default for UptimeWatchdog {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_UPTIME)
    }
}
