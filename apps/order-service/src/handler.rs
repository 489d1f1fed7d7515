//! # HTTP リクエストハンドラ
//!
//! axum のルートに対応するハンドラ関数を定義する。
//!
//! ## 設計方針
//!
//! - 各ハンドラはサブモジュールに配置
//! - 親モジュール（この `handler.rs`）で re-export し、フラットな API を提供
//! - ハンドラは「入力をコマンドに変換 → ユースケース呼び出し → レスポンス変換」だけを行う

pub mod customer;
pub mod docs;
pub mod health;
pub mod order;

use axum::http::StatusCode;
pub use customer::{CustomerState, get_customer, list_customers};
pub use docs::openapi_json;
pub use health::{ReadinessState, health_check, readiness_check};
pub use order::{
    OrderState,
    create_order,
    delete_order,
    get_order,
    list_orders,
    patch_order,
    replace_order,
};

/// 未定義のパス・メソッドに対するフォールバック（空ボディの 404）
pub async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}
