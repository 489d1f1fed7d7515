//! # OpenAPI YAML 生成ツール
//!
//! Order Service の Rust 型から OpenAPI 仕様を YAML 形式で標準出力に出力する。
//! 生成後、どこからも参照されないコンポーネントスキーマを除去する。
//!
//! ## 使い方
//!
//! ```bash
//! cargo run --bin generate-openapi -p orderdesk-order-service > openapi/openapi.yaml
//! ```

use std::collections::HashSet;

use anyhow::Context;
use orderdesk_order_service::openapi::ApiDoc;
use utoipa::OpenApi;

fn main() -> anyhow::Result<()> {
    let mut openapi = ApiDoc::openapi();
    remove_unused_schemas(&mut openapi)?;
    let yaml = openapi
        .to_yaml()
        .context("OpenAPI YAML 生成に失敗しました")?;
    print!("{yaml}");
    Ok(())
}

/// どこからも `$ref` されていないコンポーネントスキーマを除去する
///
/// `components(schemas(...))` に列挙したもののうち、パスの定義から
/// 到達できないもの（リクエスト型の内部で inline 展開されたものなど）が対象。
fn remove_unused_schemas(openapi: &mut utoipa::openapi::OpenApi) -> anyhow::Result<()> {
    // JSON にシリアライズして全 $ref ターゲットを収集する
    let json = serde_json::to_string(openapi).context("JSON シリアライズに失敗しました")?;

    // JSON 形式: "$ref":"#/components/schemas/SchemaName"
    let prefix = "#/components/schemas/";
    let used_schemas: HashSet<String> = json
        .match_indices(prefix)
        .filter_map(|(start, _)| {
            let rest = &json[start + prefix.len()..];
            rest.find('"').map(|end| rest[..end].to_string())
        })
        .collect();

    if let Some(components) = &mut openapi.components {
        components
            .schemas
            .retain(|name, _| used_schemas.contains(name.as_str()));
    }
    Ok(())
}
