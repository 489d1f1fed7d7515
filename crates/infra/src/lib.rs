//! # OrderDesk インフラ層
//!
//! PostgreSQL との接続・通信を担当するインフラストラクチャ層。
//!
//! ## 責務
//!
//! - **データベース接続**: 接続プールの作成と死活確認
//! - **トランザクション管理**: 確認してから更新する一連の操作を 1 トランザクションにまとめる
//! - **リポジトリ実装**: 顧客・注文テーブルへのクエリ
//!
//! ## 依存関係
//!
//! ```text
//! order-service → infra → domain → shared
//! ```
//!
//! ## モジュール構成
//!
//! - [`db`] - 接続プール、TxContext、TransactionManager
//! - [`error`] - インフラ層エラー定義
//! - [`repository`] - リポジトリ実装
//! - `mock` - テスト用インメモリ実装（`test-utils` feature）

pub mod db;
pub mod error;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod repository;

pub use error::{InfraError, InfraErrorKind};
