//! # リクエストボディ抽出
//!
//! ボディを JSON オブジェクト（フィールド名 → 値のフラットなマップ）として取り出す。
//! 型付きのデシリアライズは行わず、フィールドごとの検証はドメイン層のコマンドに任せる。
//!
//! 解析の失敗はここでは拒否しない。パスパラメータの違反と合わせて
//! 1 つの 400 で返せるよう、理由を [`BodyInput`] の `Err` としてコマンドへ渡す。

use std::convert::Infallible;

use axum::{
    Json,
    extract::{FromRequest, Request},
};
use orderdesk_domain::validation::BodyInput;
use serde_json::Value;

/// JSON オブジェクトのリクエストボディ
///
/// JSON として解釈できない、Content-Type が不正、またはオブジェクト以外の場合は
/// `Err` に違反メッセージを持つ。
#[derive(Debug)]
pub struct JsonBody(pub BodyInput);

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = match Json::<Value>::from_request(req, state).await {
            Ok(Json(Value::Object(map))) => Ok(map),
            Ok(Json(_)) => Err("リクエストボディは JSON オブジェクトである必要があります".to_string()),
            Err(rejection) => {
                tracing::debug!(error = %rejection, "リクエストボディの解析に失敗");
                Err(format!(
                    "リクエストボディを解析できません: {}",
                    rejection.body_text()
                ))
            }
        };
        Ok(JsonBody(body))
    }
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, http::Request as HttpRequest};
    use pretty_assertions::assert_eq;

    use super::*;

    fn json_request(body: &str) -> Request {
        HttpRequest::builder()
            .method("POST")
            .uri("/")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn extract(request: Request) -> BodyInput {
        let JsonBody(body) = JsonBody::from_request(request, &()).await.unwrap();
        body
    }

    #[tokio::test]
    async fn test_jsonオブジェクトをマップとして取り出す() {
        let body = extract(json_request(r#"{"ord_num":"200101"}"#))
            .await
            .unwrap();

        assert_eq!(body.get("ord_num"), Some(&Value::from("200101")));
    }

    #[tokio::test]
    async fn test_壊れたjsonは解析失敗になる() {
        let reason = extract(json_request("{\"ord_num\":")).await.unwrap_err();

        assert!(reason.starts_with("リクエストボディを解析できません"));
    }

    #[tokio::test]
    async fn test_配列のボディは解析失敗になる() {
        let reason = extract(json_request("[1, 2]")).await.unwrap_err();

        assert_eq!(
            reason,
            "リクエストボディは JSON オブジェクトである必要があります"
        );
    }

    #[tokio::test]
    async fn test_content_typeがなければ解析失敗になる() {
        let request = HttpRequest::builder()
            .method("POST")
            .uri("/")
            .body(Body::from("{}"))
            .unwrap();

        let reason = extract(request).await.unwrap_err();

        assert!(reason.starts_with("リクエストボディを解析できません"));
    }
}
