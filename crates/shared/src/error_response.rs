//! # エラーレスポンス
//!
//! 全エンドポイントで共通のエラーレスポンス構造体を提供する。
//!
//! ## 形式
//!
//! ```json
//! { "errors": [ { "msg": "...", "value": "...", "param": "id" } ] }
//! ```
//!
//! - 400 Bad Request: 検証に失敗したすべてのフィールドを列挙する
//! - 500 Internal Server Error: バックエンドのエラーメッセージを 1 件だけ格納する
//!
//! ## 設計
//!
//! - `ErrorResponse` は純粋なデータ構造（`Serialize` / `Deserialize` のみ）
//! - axum の `IntoResponse` 変換はサービス側の責務（shared に axum 依存を入れない）

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 検証違反 1 件
///
/// `value` は違反の原因となった入力値（未指定なら `null`）、
/// `param` は違反したパスパラメータ名またはボディのフィールド名。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Violation {
    pub msg:   String,
    #[cfg_attr(feature = "openapi", schema(value_type = Object, nullable))]
    pub value: Option<Value>,
    pub param: Option<String>,
}

impl Violation {
    /// フィールドに紐づく違反を作成する
    pub fn field(param: impl Into<String>, msg: impl Into<String>, value: Option<Value>) -> Self {
        Self {
            msg: msg.into(),
            value,
            param: Some(param.into()),
        }
    }

    /// 特定のフィールドに紐づかない違反を作成する
    pub fn general(msg: impl Into<String>) -> Self {
        Self {
            msg:   msg.into(),
            value: None,
            param: None,
        }
    }
}

/// エラーレスポンス
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorResponse {
    pub errors: Vec<Violation>,
}

impl ErrorResponse {
    /// 違反リストからレスポンスを作成する
    pub fn new(errors: Vec<Violation>) -> Self {
        Self { errors }
    }

    /// 500 Internal Server Error 用
    ///
    /// バックエンドのエラーメッセージをそのまま 1 件の違反として格納する。
    pub fn backend(message: impl Into<String>) -> Self {
        Self::new(vec![Violation::general(message)])
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_fieldの違反がjsonにシリアライズされる() {
        let response = ErrorResponse::new(vec![Violation::field(
            "id",
            "顧客コードは 6 文字である必要があります",
            Some(json!("C001")),
        )]);

        let actual = serde_json::to_value(&response).unwrap();

        assert_eq!(
            actual,
            json!({
                "errors": [{
                    "msg": "顧客コードは 6 文字である必要があります",
                    "value": "C001",
                    "param": "id"
                }]
            })
        );
    }

    #[test]
    fn test_backendはvalueとparamがnullの1件を返す() {
        let response = ErrorResponse::backend("connection refused");

        let actual = serde_json::to_value(&response).unwrap();

        assert_eq!(
            actual,
            json!({
                "errors": [{ "msg": "connection refused", "value": null, "param": null }]
            })
        );
    }

    #[test]
    fn test_jsonデシリアライズが正しく動作する() {
        let raw = r#"{"errors":[{"msg":"必須です","value":null,"param":"ord_num"}]}"#;

        let response: ErrorResponse = serde_json::from_str(raw).unwrap();

        assert_eq!(response.errors.len(), 1);
        assert_eq!(response.errors[0].param.as_deref(), Some("ord_num"));
        assert!(response.errors[0].value.is_none());
    }
}
