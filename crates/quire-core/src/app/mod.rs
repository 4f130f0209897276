//! App - アプリケーション層
//!
//! このモジュールは、ports を組み合わせてアプリケーションロジックを実装します。
//!
//! # 主要コンポーネント
//! - **OrchestratorBuilder**: ワイヤリングと起動時検証
//! - **JobOrchestrator**: submit / retrieve
//! - **ExpiryScheduler**: 成果物の期限切れ削除
//! - **UptimeWatchdog**: プロセス稼働時間の上限

pub mod builder;
pub mod expiry;
pub mod orchestrator;
pub mod watchdog;

// 主要な型を再エクスポート
pub use self::builder::{BuildError, OrchestratorBuilder};
pub use self::expiry::ExpiryScheduler;
pub use self::orchestrator::JobOrchestrator;
pub use self::watchdog::UptimeWatchdog;
