//! # OpenAPI 仕様定義
//!
//! utoipa を使用して Order Service の OpenAPI 仕様を Rust の型から自動生成する。
//! `ApiDoc::openapi()` で OpenAPI ドキュメントを取得できる。

use orderdesk_shared::{
    CheckStatus,
    ErrorResponse,
    HealthResponse,
    ReadinessResponse,
    ReadinessStatus,
    Violation,
};
use utoipa::OpenApi;

use crate::handler::{
    customer::{self, CustomerDto},
    health,
    order::{self, CreateOrderRequest, OrderDto, PatchOrderRequest, ReplaceOrderRequest},
};

#[derive(OpenApi)]
#[openapi(
   info(
      title = "OrderDesk API",
      version = "0.1.0",
      description = "顧客と注文を管理する OrderDesk の REST API"
   ),
   paths(
      // health
      health::health_check,
      health::readiness_check,
      // customers
      customer::list_customers,
      customer::get_customer,
      // orders
      order::list_orders,
      order::create_order,
      order::get_order,
      order::replace_order,
      order::patch_order,
      order::delete_order,
   ),
   components(schemas(
      CustomerDto,
      OrderDto,
      CreateOrderRequest,
      ReplaceOrderRequest,
      PatchOrderRequest,
      ErrorResponse,
      Violation,
      HealthResponse,
      ReadinessResponse,
      ReadinessStatus,
      CheckStatus,
   )),
   tags(
      (name = "health", description = "ヘルスチェック"),
      (name = "customers", description = "顧客の参照"),
      (name = "orders", description = "注文の作成・参照・更新・削除")
   )
)]
pub struct ApiDoc;
