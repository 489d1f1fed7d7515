//! # API ドキュメント
//!
//! `GET /docs` でハンドラの注釈から生成した OpenAPI ドキュメントを JSON で返す。

use axum::Json;
use utoipa::{OpenApi, openapi::OpenApi as OpenApiDocument};

use crate::openapi::ApiDoc;

/// GET /docs
pub async fn openapi_json() -> Json<OpenApiDocument> {
    Json(ApiDoc::openapi())
}
