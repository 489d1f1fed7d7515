//! テスト共通フィクスチャ
//!
//! DB を使用する統合テストで共通利用するシードデータ定数と
//! 値オブジェクト生成ヘルパー。

// 各テストファイルが独立したクレートとしてコンパイルされるため、
// 使用しない関数に dead_code 警告が出る。モジュール全体で抑制する。
#![allow(dead_code)]

use orderdesk_domain::{
    customer::CustomerCode,
    order::{
        AgentCode,
        Amount,
        NewOrder,
        OrderDate,
        OrderDescription,
        OrderFields,
        OrderKey,
        OrderNumber,
        OrderRef,
    },
};

/// 注文を 2 件持つ顧客
pub fn seed_customer() -> CustomerCode {
    CustomerCode::new("C00001").unwrap()
}

/// 注文を持たない顧客
pub fn customer_without_orders() -> CustomerCode {
    CustomerCode::new("C00003").unwrap()
}

/// `seed_customer` の注文のキー
pub fn seed_order_key() -> OrderKey {
    OrderKey::new(seed_customer(), OrderRef::new("200100").unwrap())
}

pub fn fields(amount: &str, description: &str) -> OrderFields {
    OrderFields {
        ord_amount:      Amount::new(amount).unwrap(),
        advance_amount:  Amount::new("100.00").unwrap(),
        ord_date:        OrderDate::new("2008-09-10").unwrap(),
        agent_code:      AgentCode::new("A005").unwrap(),
        ord_description: OrderDescription::new(description).unwrap(),
    }
}

pub fn new_order(number: &str, customer: CustomerCode) -> NewOrder {
    NewOrder {
        number: OrderNumber::new(number).unwrap(),
        customer,
        fields: fields("2,500.00", "New order"),
    }
}
