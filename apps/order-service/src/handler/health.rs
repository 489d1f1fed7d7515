//! # ヘルスチェックハンドラ
//!
//! - `/health` - Liveness Check（常に `"healthy"` を返す）
//! - `/health/ready` - Readiness Check（DB への接続を確認する）
//!
//! レスポンス型は [`orderdesk_shared::HealthResponse`] / [`orderdesk_shared::ReadinessResponse`] を参照。

use std::{collections::BTreeMap, sync::Arc, time::Duration};

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use orderdesk_infra::db;
use orderdesk_shared::{CheckStatus, HealthResponse, ReadinessResponse};
use sqlx::PgPool;

/// DB チェックのタイムアウト
const CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Order Service のヘルスチェックエンドポイント
#[utoipa::path(
   get,
   path = "/health",
   tag = "health",
   responses(
      (status = 200, description = "サーバー稼働中", body = HealthResponse)
   )
)]
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse::healthy(env!("CARGO_PKG_VERSION")))
}

/// Readiness Check 用の State
pub struct ReadinessState {
    pub pool: PgPool,
}

/// Order Service の Readiness Check エンドポイント
///
/// DB に `SELECT 1` を送り、応答があれば 200、なければ 503。
#[utoipa::path(
   get,
   path = "/health/ready",
   tag = "health",
   responses(
      (status = 200, description = "DB 接続可能", body = ReadinessResponse),
      (status = 503, description = "DB に接続できない", body = ReadinessResponse)
   )
)]
#[tracing::instrument(skip_all)]
pub async fn readiness_check(State(state): State<Arc<ReadinessState>>) -> impl IntoResponse {
    let mut checks = BTreeMap::new();
    checks.insert("database".to_string(), check_database(&state.pool).await);

    let response = ReadinessResponse::from_checks(checks);
    let http_status = if response.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (http_status, Json(response))
}

async fn check_database(pool: &PgPool) -> CheckStatus {
    match tokio::time::timeout(CHECK_TIMEOUT, db::ping(pool)).await {
        Ok(Ok(())) => CheckStatus::Ok,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "readiness check: database ping failed");
            CheckStatus::Error
        }
        Err(_) => {
            tracing::warn!("readiness check: database check timed out");
            CheckStatus::Error
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{Router, body::Body, http::Request, routing::get};
    use orderdesk_shared::ReadinessStatus;
    use pretty_assertions::assert_eq;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::*;

    #[tokio::test]
    async fn test_livenessは常にhealthyを返す() {
        let sut = Router::new().route("/health", get(health_check));

        let response = sut
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: HealthResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.status, "healthy");
    }

    #[tokio::test]
    async fn test_dbに接続できなければ503を返す() {
        // Given: 到達できない接続先を遅延接続で指定する
        let pool = PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(200))
            .connect_lazy("postgres://orderdesk@127.0.0.1:1/orderdesk")
            .unwrap();
        let sut = Router::new()
            .route("/health/ready", get(readiness_check))
            .with_state(Arc::new(ReadinessState { pool }));

        // When
        let response = sut
            .oneshot(
                Request::builder()
                    .uri("/health/ready")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        // Then
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: ReadinessResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.status, ReadinessStatus::NotReady);
        assert_eq!(body.checks.get("database"), Some(&CheckStatus::Error));
    }
}
