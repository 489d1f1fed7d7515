//! # エンドポイント別の入力コマンド
//!
//! 各エンドポイントが受け付ける入力と、その検証ルールをまとめた構造体。
//! ルールは値オブジェクトの型として宣言され、[`Validator`] が全フィールドを評価する。
//!
//! 違反の並びは「パスパラメータ → ボディフィールド（宣言順）→ 不明なキー」。
//! ボディを解析できなかった場合も、パスパラメータの違反は必ず報告する。

use crate::{
    customer::CustomerCode,
    error::ValidationErrors,
    order::{
        AgentCode,
        Amount,
        NewOrder,
        OrderChange,
        OrderColumn,
        OrderDate,
        OrderDescription,
        OrderFields,
        OrderKey,
        OrderNumber,
        OrderPatch,
        OrderRef,
    },
    validation::{BodyInput, RequestBody, Validator},
};

/// POST で受け付けるボディのキー
const CREATE_KEYS: [&str; 6] = [
    "ord_num",
    "ord_amount",
    "advance_amount",
    "ord_date",
    "agent_code",
    "ord_description",
];

/// `/customers/{id}` 系のパス
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerPath {
    pub id: CustomerCode,
}

impl CustomerPath {
    pub fn parse(id: &str) -> Result<Self, ValidationErrors> {
        let mut v = Validator::new();
        let id = v.path::<CustomerCode>("id", id);
        v.finish(|| Some(Self { id: id? }))
    }
}

/// `/customers/{id}/orders/{num}` 系のパス
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderPath {
    pub key: OrderKey,
}

impl OrderPath {
    pub fn parse(id: &str, num: &str) -> Result<Self, ValidationErrors> {
        let mut v = Validator::new();
        let (id, num) = order_path(&mut v, id, num);
        v.finish(|| {
            Some(Self {
                key: OrderKey::new(id?, num?),
            })
        })
    }
}

/// 注文作成（POST /customers/{id}/orders）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOrderCommand {
    pub order: NewOrder,
}

impl CreateOrderCommand {
    pub fn parse(id: &str, body: &BodyInput) -> Result<Self, ValidationErrors> {
        let mut v = Validator::new();
        let customer = v.path::<CustomerCode>("id", id);
        let Some(body) = v.body(body) else {
            return v.finish(|| None);
        };
        let number = v.required::<OrderNumber>(body, "ord_num");
        let fields = required_fields(&mut v, body);
        v.reject_unknown(body, &CREATE_KEYS);

        v.finish(|| {
            Some(Self {
                order: NewOrder {
                    number:   number?,
                    customer: customer?,
                    fields:   fields?,
                },
            })
        })
    }
}

/// 注文の全置換（PUT /customers/{id}/orders/{num}）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceOrderCommand {
    pub key:    OrderKey,
    pub fields: OrderFields,
}

impl ReplaceOrderCommand {
    pub fn parse(id: &str, num: &str, body: &BodyInput) -> Result<Self, ValidationErrors> {
        let mut v = Validator::new();
        let (customer, number) = order_path(&mut v, id, num);
        let Some(body) = v.body(body) else {
            return v.finish(|| None);
        };
        let fields = required_fields(&mut v, body);
        v.reject_unknown(body, &OrderColumn::names());

        v.finish(|| {
            Some(Self {
                key:    OrderKey::new(customer?, number?),
                fields: fields?,
            })
        })
    }
}

/// 注文の部分更新（PATCH /customers/{id}/orders/{num}）
///
/// 指定されたフィールドのみ検証・更新する。空のボディは拒否する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchOrderCommand {
    pub key:   OrderKey,
    pub patch: OrderPatch,
}

impl PatchOrderCommand {
    pub fn parse(id: &str, num: &str, body: &BodyInput) -> Result<Self, ValidationErrors> {
        let mut v = Validator::new();
        let (customer, number) = order_path(&mut v, id, num);
        let Some(body) = v.body(body) else {
            return v.finish(|| None);
        };

        let ord_amount = v.optional::<Amount>(body, "ord_amount");
        let advance_amount = v.optional::<Amount>(body, "advance_amount");
        let ord_date = v.optional::<OrderDate>(body, "ord_date");
        let agent_code = v.optional::<AgentCode>(body, "agent_code");
        let ord_description = v.optional::<OrderDescription>(body, "ord_description");
        v.reject_unknown(body, &OrderColumn::names());
        if body.is_empty() {
            v.reject("no fields supplied");
        }

        v.finish(|| {
            let changes = [
                ord_amount?.map(OrderChange::OrdAmount),
                advance_amount?.map(OrderChange::AdvanceAmount),
                ord_date?.map(OrderChange::OrdDate),
                agent_code?.map(OrderChange::AgentCode),
                ord_description?.map(OrderChange::OrdDescription),
            ]
            .into_iter()
            .flatten()
            .collect();

            Some(Self {
                key:   OrderKey::new(customer?, number?),
                patch: OrderPatch::new(changes)?,
            })
        })
    }
}

fn order_path(v: &mut Validator, id: &str, num: &str) -> (Option<CustomerCode>, Option<OrderRef>) {
    let id = v.path::<CustomerCode>("id", id);
    let num = v.path::<OrderRef>("num", num);
    (id, num)
}

/// 5 つの可変フィールドをすべて必須として検証する
fn required_fields(v: &mut Validator, body: &RequestBody) -> Option<OrderFields> {
    let ord_amount = v.required::<Amount>(body, "ord_amount");
    let advance_amount = v.required::<Amount>(body, "advance_amount");
    let ord_date = v.required::<OrderDate>(body, "ord_date");
    let agent_code = v.required::<AgentCode>(body, "agent_code");
    let ord_description = v.required::<OrderDescription>(body, "ord_description");

    Some(OrderFields {
        ord_amount:      ord_amount?,
        advance_amount:  advance_amount?,
        ord_date:        ord_date?,
        agent_code:      agent_code?,
        ord_description: ord_description?,
    })
}
