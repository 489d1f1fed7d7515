//! # OrderDesk 共有ユーティリティ
//!
//! ワイヤ形式のレスポンス型と Observability 基盤を提供する。
//!
//! ## 設計方針
//!
//! - 他のすべてのクレート（domain, infra, order-service）から依存される
//! - ビジネスロジックを含まない純粋なユーティリティのみを配置
//! - tower / tracing-subscriber などの重い依存は `observability` feature の背後に置く

#[cfg(feature = "observability")]
pub mod canonical_log;
pub mod error_response;
pub mod health;
pub mod observability;

pub use error_response::{ErrorResponse, Violation};
pub use health::{CheckStatus, HealthResponse, ReadinessResponse, ReadinessStatus};
