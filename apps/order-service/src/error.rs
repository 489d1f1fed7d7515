//! # Order Service エラー定義
//!
//! Order Service 固有のエラーと、HTTP レスポンスへの変換を定義する。
//!
//! | バリアント | ステータス | ボディ |
//! |------------|------------|--------|
//! | `Validation` | 400 | 全違反を列挙した `{"errors": [...]}` |
//! | `NotFound` | 404 | 空 |
//! | `Database` | 500 | エラーメッセージ 1 件の `{"errors": [...]}` |

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use orderdesk_domain::ValidationErrors;
use orderdesk_infra::InfraError;
use orderdesk_shared::{ErrorResponse, Violation};
use thiserror::Error;

/// Order Service で発生するエラー
#[derive(Debug, Error)]
pub enum ApiError {
    /// 入力値の検証エラー（DB にはアクセスしていない）
    #[error("入力値が不正です（{} 件）", .0.len())]
    Validation(Vec<Violation>),

    /// 参照先の顧客または注文が存在しない
    #[error("リソースが見つかりません")]
    NotFound,

    /// データベースエラー
    #[error("データベースエラー: {0}")]
    Database(#[from] InfraError),
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors.into_violations())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(violations) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(violations)),
            )
                .into_response(),
            ApiError::NotFound => StatusCode::NOT_FOUND.into_response(),
            ApiError::Database(e) => {
                tracing::error!(
                    error.kind = "database",
                    error = %e,
                    span_trace = %e.span_trace(),
                    "データベースエラー"
                );
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::backend(e.to_string())),
                )
                    .into_response()
            }
        }
    }
}
