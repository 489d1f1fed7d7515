//! # 顧客
//!
//! 顧客はこのシステムの外で作成・削除され、ここでは参照のみ行う。
//! コード以外の属性はテーブル定義に従う不透明な JSON オブジェクトとして扱う。

use serde::Serialize;
use serde_json::{Map, Value};

use crate::validation::Rule;

define_validated_string! {
    /// 顧客コード（6 文字固定）
    ///
    /// 顧客の識別子であり、注文の外部キーでもある。
    pub struct CustomerCode {
        label: "顧客コード",
        rules: [Rule::ExactLength(6)],
    }
}

/// 顧客行の読み取りモデル
///
/// 列構成はテーブル定義に依存するため、型を持たない JSON オブジェクトのまま返す。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CustomerRecord(Map<String, Value>);

impl CustomerRecord {
    pub fn new(columns: Map<String, Value>) -> Self {
        Self(columns)
    }

    /// 顧客コード列の値（存在すれば）
    pub fn code(&self) -> Option<&str> {
        self.0.get("cust_code").and_then(Value::as_str)
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.0
    }
}
