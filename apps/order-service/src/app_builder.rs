//! # Order Service アプリケーション構築
//!
//! DI（ユースケース・State）の初期化とルーター構築を担当する。
//! `main.rs` はインフラ初期化とサーバー起動に集中する。

use std::{sync::Arc, time::Duration};

use axum::{Router, http::StatusCode, routing::get};
use orderdesk_infra::{
    db::TransactionManager,
    repository::{CustomerRepository, OrderRepository},
};
use orderdesk_shared::{
    canonical_log::CanonicalLogLineLayer,
    observability::{MakeRequestUuidV7, make_request_span},
};
use sqlx::PgPool;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    handler::{
        CustomerState,
        OrderState,
        ReadinessState,
        create_order,
        delete_order,
        get_customer,
        get_order,
        health_check,
        list_customers,
        list_orders,
        not_found,
        openapi_json,
        patch_order,
        readiness_check,
        replace_order,
    },
    usecase::{CustomerUseCaseImpl, OrderUseCaseImpl},
};

/// ルーター構築に必要なインフラ依存
pub struct AppDependencies {
    pub customer_repository: Arc<dyn CustomerRepository>,
    pub order_repository:    Arc<dyn OrderRepository>,
    pub tx_manager:          Arc<dyn TransactionManager>,
    /// Readiness Check で ping する接続プール
    pub pool:                PgPool,
}

/// DI コンテナの構築とルーター定義を行う
///
/// リポジトリ → ユースケース → State → Router の順に組み立てる。
/// 処理が `request_timeout` を超えたリクエストには 408 を返す。
pub fn build_app(deps: AppDependencies, request_timeout: Duration) -> Router {
    let customer_state = Arc::new(CustomerState {
        usecase: CustomerUseCaseImpl::new(deps.customer_repository.clone()),
    });

    let order_state = Arc::new(OrderState {
        usecase: OrderUseCaseImpl::new(
            deps.customer_repository,
            deps.order_repository,
            deps.tx_manager,
        ),
    });

    let readiness_state = Arc::new(ReadinessState { pool: deps.pool });

    Router::new()
        .route("/health", get(health_check))
        .route("/docs", get(openapi_json))
        .merge(
            Router::new()
                .route("/health/ready", get(readiness_check))
                .with_state(readiness_state),
        )
        // 顧客 API
        .merge(
            Router::new()
                .route("/customers", get(list_customers))
                .route("/customers/{id}", get(get_customer))
                .with_state(customer_state),
        )
        // 注文 API
        .merge(
            Router::new()
                .route("/customers/{id}/orders", get(list_orders).post(create_order))
                .route(
                    "/customers/{id}/orders/{num}",
                    get(get_order)
                        .put(replace_order)
                        .patch(patch_order)
                        .delete(delete_order),
                )
                .with_state(order_state),
        )
        .method_not_allowed_fallback(not_found)
        .fallback(not_found)
        .layer(request_timeout_layer(request_timeout))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(CanonicalLogLineLayer)
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
}

/// 処理時間の上限を超えたリクエストを 408 で打ち切るレイヤー
fn request_timeout_layer(request_timeout: Duration) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, request_timeout)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode},
    };
    use orderdesk_infra::mock::{
        MockCustomerRepository,
        MockOrderRepository,
        MockTransactionManager,
    };
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::*;

    fn create_test_app() -> Router {
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(200))
            .connect_lazy("postgres://orderdesk@127.0.0.1:1/orderdesk")
            .unwrap();
        build_app(
            AppDependencies {
                customer_repository: Arc::new(MockCustomerRepository::new()),
                order_repository: Arc::new(MockOrderRepository::new()),
                tx_manager: Arc::new(MockTransactionManager),
                pool,
            },
            Duration::from_secs(30),
        )
    }

    fn request(method: Method, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_len(response: axum::http::Response<Body>) -> usize {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .len()
    }

    #[rstest]
    #[case::未定義のパス(Method::GET, "/orders")]
    #[case::顧客一覧へのpost(Method::POST, "/customers")]
    #[case::注文一覧へのdelete(Method::DELETE, "/customers/C00001/orders")]
    #[case::顧客へのput(Method::PUT, "/customers/C00001")]
    #[tokio::test]
    async fn test_未定義のルートは空ボディの404(#[case] method: Method, #[case] uri: &str) {
        let sut = create_test_app();

        let response = sut.oneshot(request(method, uri)).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_len(response).await, 0);
    }

    #[tokio::test]
    async fn test_レスポンスにリクエストidが付与される() {
        let sut = create_test_app();

        let response = sut
            .oneshot(request(Method::GET, "/customers"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_クライアントのリクエストidをそのまま返す() {
        let sut = create_test_app();
        let request = Request::builder()
            .uri("/health")
            .header("x-request-id", "req-123")
            .body(Body::empty())
            .unwrap();

        let response = sut.oneshot(request).await.unwrap();

        assert_eq!(response.headers().get("x-request-id").unwrap(), "req-123");
    }

    #[tokio::test]
    async fn test_docsはopenapiドキュメントを返す() {
        let sut = create_test_app();

        let response = sut.oneshot(request(Method::GET, "/docs")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let doc: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(doc["paths"]["/customers/{id}/orders"]["post"].is_object());
    }

    #[tokio::test]
    async fn test_readinessはdbに接続できなければ503() {
        let sut = create_test_app();

        let response = sut
            .oneshot(request(Method::GET, "/health/ready"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_上限を超えた処理は408で打ち切る() {
        let app = Router::new()
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    "done"
                }),
            )
            .layer(request_timeout_layer(Duration::from_millis(20)));

        let response = app
            .oneshot(Request::builder().uri("/slow").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    }
}
