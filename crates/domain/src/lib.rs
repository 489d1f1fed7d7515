//! # OrderDesk ドメイン層
//!
//! 顧客・注文の値オブジェクトと、エンドポイントごとの入力検証を定義する。
//!
//! ## 依存関係の方向
//!
//! ```text
//! order-service → infra → domain → shared
//! ```
//!
//! ドメイン層は `shared` のみに依存し、DB や HTTP フレームワークには依存しない。
//! 検証はすべてここで完結し、違反があれば DB アクセス前にリクエストを拒否できる。
//!
//! ## モジュール構成
//!
//! - [`validation`] - 検証ルールと違反のコレクタ
//! - [`customer`] - 顧客コードと顧客の読み取りモデル
//! - [`order`] - 注文の値オブジェクト、書き込み・読み取りモデル
//! - [`command`] - エンドポイント別の入力コマンド
//! - [`error`] - ドメイン層で発生するエラーの定義
//!
//! ## 使用例
//!
//! ```rust
//! use orderdesk_domain::command::CustomerPath;
//!
//! let path = CustomerPath::parse("C00001").unwrap();
//! assert_eq!(path.id.as_str(), "C00001");
//!
//! let errors = CustomerPath::parse("C1").unwrap_err();
//! assert!(errors.has_param("id"));
//! ```

#[macro_use]
mod macros;

pub mod command;
pub mod customer;
pub mod error;
pub mod order;
pub mod validation;

pub use error::{DomainError, ValidationErrors};
