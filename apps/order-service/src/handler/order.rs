//! # 注文ハンドラ
//!
//! ## エンドポイント
//!
//! - `GET /customers/{id}/orders` - 顧客の注文一覧
//! - `POST /customers/{id}/orders` - 注文作成（作成済み・重複ともに 303）
//! - `GET /customers/{id}/orders/{num}` - 注文取得（該当なしは空配列）
//! - `PUT /customers/{id}/orders/{num}` - 注文の全置換
//! - `PATCH /customers/{id}/orders/{num}` - 注文の部分更新
//! - `DELETE /customers/{id}/orders/{num}` - 注文削除

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::Redirect,
};
use orderdesk_domain::{
    command::{CreateOrderCommand, CustomerPath, OrderPath, PatchOrderCommand, ReplaceOrderCommand},
    order::OrderRecord,
};
use orderdesk_shared::ErrorResponse;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{error::ApiError, extract::JsonBody, usecase::OrderUseCaseImpl};

/// 注文 API の共有状態
pub struct OrderState {
    pub usecase: OrderUseCaseImpl,
}

// --- リクエスト/レスポンス型 ---

/// 注文 DTO
#[derive(Debug, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct OrderDto {
    #[schema(example = "200100")]
    pub ord_num:         String,
    #[schema(example = "1000.00")]
    pub ord_amount:      String,
    #[schema(example = "600.00")]
    pub advance_amount:  String,
    #[schema(example = "2008-08-01")]
    pub ord_date:        String,
    #[schema(example = "C00001")]
    pub cust_code:       String,
    #[schema(example = "A003")]
    pub agent_code:      String,
    pub ord_description: String,
}

impl From<OrderRecord> for OrderDto {
    fn from(record: OrderRecord) -> Self {
        Self {
            ord_num:         record.ord_num,
            ord_amount:      record.ord_amount,
            advance_amount:  record.advance_amount,
            ord_date:        record.ord_date,
            cust_code:       record.cust_code,
            agent_code:      record.agent_code,
            ord_description: record.ord_description,
        }
    }
}

/// 注文作成リクエスト
///
/// 文字列の代わりに数値を送ってもよい。
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    /// 6 桁の数字
    #[schema(example = "200101")]
    pub ord_num:         String,
    /// 通貨形式（桁区切りのカンマ可）
    #[schema(example = "3,000.00")]
    pub ord_amount:      String,
    #[schema(example = "500.00")]
    pub advance_amount:  String,
    /// ISO 8601 の日付
    #[schema(example = "2008-08-15")]
    pub ord_date:        String,
    /// 4 文字（前後の空白は除去される）
    #[schema(example = "A005")]
    pub agent_code:      String,
    /// 1〜60 文字（前後の空白は除去される）
    pub ord_description: String,
}

/// 注文の全置換リクエスト（`ord_num` は変更できない）
#[derive(Debug, Deserialize, ToSchema)]
pub struct ReplaceOrderRequest {
    pub ord_amount:      String,
    pub advance_amount:  String,
    pub ord_date:        String,
    pub agent_code:      String,
    pub ord_description: String,
}

/// 注文の部分更新リクエスト（1 フィールド以上）
#[derive(Debug, Deserialize, ToSchema)]
pub struct PatchOrderRequest {
    pub ord_amount:      Option<String>,
    pub advance_amount:  Option<String>,
    pub ord_date:        Option<String>,
    pub agent_code:      Option<String>,
    pub ord_description: Option<String>,
}

fn to_dtos(records: Vec<OrderRecord>) -> Json<Vec<OrderDto>> {
    Json(records.into_iter().map(OrderDto::from).collect())
}

// --- ハンドラ ---

/// GET /customers/{id}/orders
#[utoipa::path(
   get,
   path = "/customers/{id}/orders",
   tag = "orders",
   params(("id" = String, Path, description = "顧客コード（6 文字）")),
   responses(
      (status = 200, description = "顧客の注文一覧", body = Vec<OrderDto>),
      (status = 400, description = "顧客コードが不正", body = ErrorResponse),
      (status = 500, description = "データベースエラー", body = ErrorResponse)
   )
)]
#[tracing::instrument(skip_all, fields(%id))]
pub async fn list_orders(
    State(state): State<Arc<OrderState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<OrderDto>>, ApiError> {
    let path = CustomerPath::parse(&id)?;

    let orders = state.usecase.list_orders(&path.id).await?;
    Ok(to_dtos(orders))
}

/// POST /customers/{id}/orders
///
/// ## レスポンス
///
/// - `303 See Other`: 作成した注文、または同じ注文番号の既存注文へ
/// - `400 Bad Request`: 検証エラー（全違反を列挙）
/// - `404 Not Found`: 顧客が存在しない
#[utoipa::path(
   post,
   path = "/customers/{id}/orders",
   tag = "orders",
   params(("id" = String, Path, description = "顧客コード（6 文字）")),
   request_body = CreateOrderRequest,
   responses(
      (status = 303, description = "作成した注文（または既存の注文）へのリダイレクト"),
      (status = 400, description = "検証エラー", body = ErrorResponse),
      (status = 404, description = "顧客が存在しない"),
      (status = 500, description = "データベースエラー", body = ErrorResponse)
   )
)]
#[tracing::instrument(skip_all, fields(%id))]
pub async fn create_order(
    State(state): State<Arc<OrderState>>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody,
) -> Result<Redirect, ApiError> {
    let command = CreateOrderCommand::parse(&id, &body)?;

    let outcome = state.usecase.create_order(&command.order).await?;
    Ok(Redirect::to(outcome.location()))
}

/// GET /customers/{id}/orders/{num}
#[utoipa::path(
   get,
   path = "/customers/{id}/orders/{num}",
   tag = "orders",
   params(
      ("id" = String, Path, description = "顧客コード（6 文字）"),
      ("num" = String, Path, description = "注文番号（数値）")
   ),
   responses(
      (status = 200, description = "一致した注文（該当なしは空配列）", body = Vec<OrderDto>),
      (status = 400, description = "パスパラメータが不正", body = ErrorResponse),
      (status = 500, description = "データベースエラー", body = ErrorResponse)
   )
)]
#[tracing::instrument(skip_all, fields(%id, %num))]
pub async fn get_order(
    State(state): State<Arc<OrderState>>,
    Path((id, num)): Path<(String, String)>,
) -> Result<Json<Vec<OrderDto>>, ApiError> {
    let path = OrderPath::parse(&id, &num)?;

    let orders = state.usecase.get_order(&path.key).await?;
    Ok(to_dtos(orders))
}

/// PUT /customers/{id}/orders/{num}
#[utoipa::path(
   put,
   path = "/customers/{id}/orders/{num}",
   tag = "orders",
   params(
      ("id" = String, Path, description = "顧客コード（6 文字）"),
      ("num" = String, Path, description = "注文番号（数値）")
   ),
   request_body = ReplaceOrderRequest,
   responses(
      (status = 204, description = "置換成功"),
      (status = 400, description = "検証エラー", body = ErrorResponse),
      (status = 404, description = "注文が存在しない"),
      (status = 500, description = "データベースエラー", body = ErrorResponse)
   )
)]
#[tracing::instrument(skip_all, fields(%id, %num))]
pub async fn replace_order(
    State(state): State<Arc<OrderState>>,
    Path((id, num)): Path<(String, String)>,
    JsonBody(body): JsonBody,
) -> Result<StatusCode, ApiError> {
    let command = ReplaceOrderCommand::parse(&id, &num, &body)?;

    state
        .usecase
        .replace_order(&command.key, &command.fields)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /customers/{id}/orders/{num}
#[utoipa::path(
   patch,
   path = "/customers/{id}/orders/{num}",
   tag = "orders",
   params(
      ("id" = String, Path, description = "顧客コード（6 文字）"),
      ("num" = String, Path, description = "注文番号（数値）")
   ),
   request_body = PatchOrderRequest,
   responses(
      (status = 204, description = "更新成功"),
      (status = 400, description = "検証エラー（空のボディを含む）", body = ErrorResponse),
      (status = 404, description = "注文が存在しない"),
      (status = 500, description = "データベースエラー", body = ErrorResponse)
   )
)]
#[tracing::instrument(skip_all, fields(%id, %num))]
pub async fn patch_order(
    State(state): State<Arc<OrderState>>,
    Path((id, num)): Path<(String, String)>,
    JsonBody(body): JsonBody,
) -> Result<StatusCode, ApiError> {
    let command = PatchOrderCommand::parse(&id, &num, &body)?;

    state
        .usecase
        .patch_order(&command.key, &command.patch)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /customers/{id}/orders/{num}
#[utoipa::path(
   delete,
   path = "/customers/{id}/orders/{num}",
   tag = "orders",
   params(
      ("id" = String, Path, description = "顧客コード（6 文字）"),
      ("num" = String, Path, description = "注文番号（数値）")
   ),
   responses(
      (status = 204, description = "削除成功"),
      (status = 400, description = "パスパラメータが不正", body = ErrorResponse),
      (status = 404, description = "注文が存在しない"),
      (status = 500, description = "データベースエラー", body = ErrorResponse)
   )
)]
#[tracing::instrument(skip_all, fields(%id, %num))]
pub async fn delete_order(
    State(state): State<Arc<OrderState>>,
    Path((id, num)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let path = OrderPath::parse(&id, &num)?;

    state.usecase.delete_order(&path.key).await?;
    Ok(StatusCode::NO_CONTENT)
}
