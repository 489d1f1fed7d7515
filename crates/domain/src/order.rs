//! # 注文
//!
//! 注文に関する値オブジェクト、書き込みモデル、読み取りモデルを定義する。
//!
//! ## 注文番号の 2 つのルール
//!
//! - [`OrderNumber`]: 作成時の番号。6 桁の半角数字のみ
//! - [`OrderRef`]: パスで注文を参照するときの番号。符号・小数点を含む数値を許容する
//!
//! 参照時のルールは作成時より緩い。エンドポイントごとの仕様であり、統一しない。
//!
//! ## 更新可能な列
//!
//! 部分更新で書き換えられる列は [`OrderColumn`] に列挙したものに限られる。
//! SQL の列名はこの列挙からのみ組み立てられ、リクエストのキーを直接使うことはない。

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum::{EnumString, IntoStaticStr};

use crate::{DomainError, customer::CustomerCode, validation::Rule};

define_validated_string! {
    /// 注文番号（作成時のルール: 6 桁の半角数字）
    ///
    /// 全顧客を通じて一意。
    pub struct OrderNumber {
        label: "注文番号",
        rules: [Rule::ExactLength(6), Rule::DigitsOnly],
    }
}

define_validated_string! {
    /// 注文番号（参照時のルール: 数値文字列）
    ///
    /// DB では `numeric` にキャストして比較する。
    pub struct OrderRef {
        label: "注文番号",
        rules: [Rule::Numeric],
    }
}

define_validated_string! {
    /// 担当者コード（トリム後 4 文字）
    pub struct AgentCode {
        label: "担当者コード",
        rules: [Rule::ExactLength(4)],
        trim: true,
    }
}

define_validated_string! {
    /// 注文の説明（トリム後 1〜60 文字）
    pub struct OrderDescription {
        label: "注文の説明",
        rules: [Rule::LengthBetween { min: 1, max: 60 }],
        trim: true,
    }
}

impl From<OrderNumber> for OrderRef {
    fn from(number: OrderNumber) -> Self {
        Self(number.into_string())
    }
}

/// 金額
///
/// 記号なし、小数点以下 2 桁必須、負数不可。3 桁区切りのカンマを許容する。
/// 内部では区切りを除いた正規形（例: `1000.00`）を保持し、DB へはこの形でバインドする。
/// 整数部は列の精度 `NUMERIC(12,2)` に収まる 10 桁まで。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, derive_more::Display)]
#[serde(transparent)]
#[display("{_0}")]
pub struct Amount(String);

impl Amount {
    /// 整数部の最大桁数
    pub const MAX_INTEGER_DIGITS: usize = 10;

    pub fn new(value: impl Into<String>) -> Result<Self, DomainError> {
        let value = value.into();
        Rule::Currency.check("金額", &value)?;

        let normalized = value.replace(',', "");
        let integer_digits = normalized
            .split('.')
            .next()
            .map_or(0, |integer| integer.trim_start_matches('0').len());
        if integer_digits > Self::MAX_INTEGER_DIGITS {
            return Err(DomainError::Validation(format!(
                "金額の整数部は {} 桁以内である必要があります",
                Self::MAX_INTEGER_DIGITS
            )));
        }
        Ok(Self(normalized))
    }

    /// 区切りを除いた数値文字列
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Amount {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// 注文日（ISO 8601 の暦日）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct OrderDate(NaiveDate);

impl OrderDate {
    pub fn new(value: &str) -> Result<Self, DomainError> {
        Rule::IsoDate.check("注文日", value)?;
        NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Self)
            .map_err(|_| DomainError::Validation(format!("注文日が不正です: {value}")))
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn as_date(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for OrderDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for OrderDate {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// 更新可能な注文列の許可リスト
///
/// 文字列表現はそのまま SQL の列名・リクエストボディのキーになる。
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, IntoStaticStr, strum::VariantArray,
)]
#[strum(serialize_all = "snake_case")]
pub enum OrderColumn {
    OrdAmount,
    AdvanceAmount,
    OrdDate,
    AgentCode,
    OrdDescription,
}

impl OrderColumn {
    /// 列名
    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    /// すべての列名（宣言順）
    pub fn names() -> Vec<&'static str> {
        <Self as strum::VariantArray>::VARIANTS
            .iter()
            .map(OrderColumn::as_str)
            .collect()
    }
}

/// 注文の可変フィールド一式（作成・全置換で使用）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderFields {
    pub ord_amount:      Amount,
    pub advance_amount:  Amount,
    pub ord_date:        OrderDate,
    pub agent_code:      AgentCode,
    pub ord_description: OrderDescription,
}

/// 作成する注文
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub number:   OrderNumber,
    pub customer: CustomerCode,
    pub fields:   OrderFields,
}

/// 注文を一意に特定するキー（顧客コード + 注文番号）
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrderKey {
    pub customer: CustomerCode,
    pub number:   OrderRef,
}

impl OrderKey {
    pub fn new(customer: CustomerCode, number: OrderRef) -> Self {
        Self { customer, number }
    }

    /// リソースの URL パス
    pub fn location(&self) -> String {
        order_location(&self.customer, self.number.as_str())
    }
}

/// 注文リソースの URL パス（`/customers/{id}/orders/{num}`）
pub fn order_location(customer: &CustomerCode, number: &str) -> String {
    format!("/customers/{customer}/orders/{number}")
}

/// 1 列分の変更
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderChange {
    OrdAmount(Amount),
    AdvanceAmount(Amount),
    OrdDate(OrderDate),
    AgentCode(AgentCode),
    OrdDescription(OrderDescription),
}

impl OrderChange {
    pub fn column(&self) -> OrderColumn {
        match self {
            OrderChange::OrdAmount(_) => OrderColumn::OrdAmount,
            OrderChange::AdvanceAmount(_) => OrderColumn::AdvanceAmount,
            OrderChange::OrdDate(_) => OrderColumn::OrdDate,
            OrderChange::AgentCode(_) => OrderColumn::AgentCode,
            OrderChange::OrdDescription(_) => OrderColumn::OrdDescription,
        }
    }
}

/// 部分更新の内容（1 列以上）
///
/// 変更は列の宣言順に並ぶ。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderPatch(Vec<OrderChange>);

impl OrderPatch {
    /// 変更が 1 件もなければ `None`
    pub fn new(changes: Vec<OrderChange>) -> Option<Self> {
        if changes.is_empty() {
            None
        } else {
            Some(Self(changes))
        }
    }

    pub fn changes(&self) -> &[OrderChange] {
        &self.0
    }

    pub fn columns(&self) -> Vec<OrderColumn> {
        self.0.iter().map(OrderChange::column).collect()
    }
}

impl From<OrderFields> for OrderPatch {
    fn from(fields: OrderFields) -> Self {
        Self(vec![
            OrderChange::OrdAmount(fields.ord_amount),
            OrderChange::AdvanceAmount(fields.advance_amount),
            OrderChange::OrdDate(fields.ord_date),
            OrderChange::AgentCode(fields.agent_code),
            OrderChange::OrdDescription(fields.ord_description),
        ])
    }
}

/// 注文行の読み取りモデル
///
/// 数値・日付も文字列で保持し、クライアントが送った値をそのまま返せるようにする。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub ord_num:         String,
    pub ord_amount:      String,
    pub advance_amount:  String,
    pub ord_date:        String,
    pub cust_code:       String,
    pub agent_code:      String,
    pub ord_description: String,
}

impl OrderRecord {
    /// 作成内容から読み取りモデルを組み立てる
    pub fn from_new(order: &NewOrder) -> Self {
        let fields = &order.fields;
        Self {
            ord_num:         order.number.to_string(),
            ord_amount:      fields.ord_amount.to_string(),
            advance_amount:  fields.advance_amount.to_string(),
            ord_date:        fields.ord_date.to_string(),
            cust_code:       order.customer.to_string(),
            agent_code:      fields.agent_code.to_string(),
            ord_description: fields.ord_description.to_string(),
        }
    }

    /// 変更を適用する
    pub fn apply(&mut self, patch: &OrderPatch) {
        for change in patch.changes() {
            match change {
                OrderChange::OrdAmount(v) => self.ord_amount = v.to_string(),
                OrderChange::AdvanceAmount(v) => self.advance_amount = v.to_string(),
                OrderChange::OrdDate(v) => self.ord_date = v.to_string(),
                OrderChange::AgentCode(v) => self.agent_code = v.to_string(),
                OrderChange::OrdDescription(v) => self.ord_description = v.to_string(),
            }
        }
    }
}
