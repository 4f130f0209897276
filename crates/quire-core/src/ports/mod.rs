//! Ports - 抽象化レイヤー
//!
//! このモジュールは Hexagonal Architecture の「ポート」を定義します。
//! 各 trait は外部の協力者（コンパイラ、ファイルシステム、時刻、成果物の保存先）への
//! インターフェースを提供し、実装の詳細を隠蔽します。
//!
//! # 設計原則
//! - 共有される可変状態は ArtifactStore だけ
//! - ほかの port はリクエストごとに独立して使われる

pub mod artifact_store;
pub mod clock;
pub mod id_generator;
pub mod materializer;
pub mod provisioner;
pub mod renderer;

// 主要な trait を再エクスポート
pub use self::artifact_store::ArtifactStore;
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::materializer::Materializer;
pub use self::provisioner::{ScratchArea, ScratchProvisioner};
pub use self::renderer::Renderer;
