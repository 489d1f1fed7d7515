//! # ユースケース層
//!
//! Order Service のビジネスロジックを実装する。
//!
//! ## 設計方針
//!
//! - **依存性注入**: リポジトリを `Arc<dyn Trait>` で外部から注入
//! - **トランザクション境界**: 存在確認と更新系の操作は同じトランザクションで行う
//! - **薄いハンドラ**: 入力の検証はハンドラでコマンドに変換済みの前提とする

pub mod customer;
pub mod order;

pub use customer::CustomerUseCaseImpl;
pub use order::{CreateOrderOutcome, OrderUseCaseImpl};
