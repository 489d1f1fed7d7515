//! # リポジトリ実装
//!
//! 顧客・注文テーブルへのアクセスをトレイトの背後に隠す。
//!
//! ## 設計方針
//!
//! - **読み取りはプール直結**: 単発の SELECT はプールから借りた接続で実行する
//! - **書き込みは TxContext 必須**: 存在確認と更新を同じトランザクションで行う
//! - **テスタビリティ**: トレイト経由でモック可能な設計

pub mod customer_repository;
pub mod order_repository;

pub use customer_repository::{CustomerRepository, PostgresCustomerRepository};
pub use order_repository::{OrderRepository, PostgresOrderRepository};
