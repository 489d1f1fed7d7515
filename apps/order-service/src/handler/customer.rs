//! # 顧客ハンドラ
//!
//! ## エンドポイント
//!
//! - `GET /customers` - 全顧客
//! - `GET /customers/{id}` - 顧客コードで検索（該当なしは空配列）

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use orderdesk_domain::{command::CustomerPath, customer::CustomerRecord};
use orderdesk_shared::ErrorResponse;
use serde::Serialize;
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::{error::ApiError, usecase::CustomerUseCaseImpl};

/// 顧客 API の共有状態
pub struct CustomerState {
    pub usecase: CustomerUseCaseImpl,
}

/// 顧客行（列構成はテーブル定義に従う）
#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct CustomerDto(Map<String, Value>);

impl From<CustomerRecord> for CustomerDto {
    fn from(record: CustomerRecord) -> Self {
        Self(record.into_inner())
    }
}

/// GET /customers
#[utoipa::path(
   get,
   path = "/customers",
   tag = "customers",
   responses(
      (status = 200, description = "全顧客", body = Vec<CustomerDto>),
      (status = 500, description = "データベースエラー", body = ErrorResponse)
   )
)]
#[tracing::instrument(skip_all)]
pub async fn list_customers(
    State(state): State<Arc<CustomerState>>,
) -> Result<Json<Vec<CustomerDto>>, ApiError> {
    let customers = state.usecase.list_customers().await?;
    Ok(Json(customers.into_iter().map(CustomerDto::from).collect()))
}

/// GET /customers/{id}
#[utoipa::path(
   get,
   path = "/customers/{id}",
   tag = "customers",
   params(("id" = String, Path, description = "顧客コード（6 文字）")),
   responses(
      (status = 200, description = "一致した顧客（該当なしは空配列）", body = Vec<CustomerDto>),
      (status = 400, description = "顧客コードが不正", body = ErrorResponse),
      (status = 500, description = "データベースエラー", body = ErrorResponse)
   )
)]
#[tracing::instrument(skip_all, fields(%id))]
pub async fn get_customer(
    State(state): State<Arc<CustomerState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<CustomerDto>>, ApiError> {
    let path = CustomerPath::parse(&id)?;

    let customers = state.usecase.get_customer(&path.id).await?;
    Ok(Json(customers.into_iter().map(CustomerDto::from).collect()))
}

#[cfg(test)]
mod tests {
    use axum::{Router, body::Body, http::Request, http::StatusCode, routing::get};
    use orderdesk_infra::mock::MockCustomerRepository;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tower::ServiceExt;

    use super::*;

    // --- ヘルパー ---

    fn create_test_app(repo: MockCustomerRepository) -> Router {
        let state = Arc::new(CustomerState {
            usecase: CustomerUseCaseImpl::new(Arc::new(repo)),
        });

        Router::new()
            .route("/customers", get(list_customers))
            .route("/customers/{id}", get(get_customer))
            .with_state(state)
    }

    fn seeded_repo() -> MockCustomerRepository {
        let repo = MockCustomerRepository::new();
        for (code, name) in [("C00001", "Holmes"), ("C00002", "Watson")] {
            if let Value::Object(columns) = json!({ "cust_code": code, "cust_name": name }) {
                repo.add_customer(CustomerRecord::new(columns));
            }
        }
        repo
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn response_json(response: axum::http::Response<Body>) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    // --- テストケース ---

    #[tokio::test]
    async fn test_get_全顧客を配列で返す() {
        // Given
        let sut = create_test_app(seeded_repo());

        // When
        let response = sut.oneshot(get_request("/customers")).await.unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::OK);
        let body = response_json(response).await;
        assert_eq!(body.as_array().unwrap().len(), 2);
        assert_eq!(body[1]["cust_name"], json!("Watson"));
    }

    #[tokio::test]
    async fn test_get_顧客コードで1件返す() {
        let sut = create_test_app(seeded_repo());

        let response = sut.oneshot(get_request("/customers/C00002")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response_json(response).await,
            json!([{ "cust_code": "C00002", "cust_name": "Watson" }])
        );
    }

    #[tokio::test]
    async fn test_get_該当がなければ空配列の200() {
        let sut = create_test_app(seeded_repo());

        let response = sut.oneshot(get_request("/customers/C09999")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response_json(response).await, json!([]));
    }

    #[tokio::test]
    async fn test_get_6文字でない顧客コードはidの違反で400() {
        let sut = create_test_app(seeded_repo());

        let response = sut.oneshot(get_request("/customers/C001")).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = response_json(response).await;
        assert_eq!(body["errors"][0]["param"], json!("id"));
        assert_eq!(body["errors"][0]["value"], json!("C001"));
    }

    #[tokio::test]
    async fn test_get_db障害は500() {
        let repo = seeded_repo();
        repo.set_unavailable(true);
        let sut = create_test_app(repo);

        let response = sut.oneshot(get_request("/customers")).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = response_json(response).await;
        assert_eq!(body["errors"].as_array().unwrap().len(), 1);
    }
}
