//! # OrderRepository
//!
//! 注文の永続化を担当するリポジトリ。
//!
//! ## 設計方針
//!
//! - **文字列で読み出す**: 金額・注文番号・日付は SQL 側で text に変換して取得し、
//!   クライアントが送った表記のまま返す
//! - **悲観的ロック**: 更新・削除前の存在確認は `SELECT ... FOR UPDATE` で行ごとロックし、
//!   確認から更新までの間に他のリクエストが割り込めないようにする
//! - **列名の許可リスト**: 部分更新の SET 句は [`OrderColumn`] からのみ組み立てる

use async_trait::async_trait;
use orderdesk_domain::{
    customer::CustomerCode,
    order::{NewOrder, OrderChange, OrderFields, OrderKey, OrderNumber, OrderPatch, OrderRecord},
};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::{db::TxContext, error::InfraError};

/// 注文行を text 列として取り出す SELECT 文を組み立てる
///
/// 注文番号は作成時と同じ 6 桁（先頭ゼロ埋め）で返す。
macro_rules! select_orders {
    ($tail:literal) => {
        concat!(
            r#"
            SELECT
                to_char(ord_num, 'FM000000') AS ord_num,
                ord_amount::text AS ord_amount,
                advance_amount::text AS advance_amount,
                to_char(ord_date, 'YYYY-MM-DD') AS ord_date,
                cust_code,
                agent_code,
                ord_description
            FROM orders
            "#,
            $tail
        )
    };
}

/// 注文リポジトリトレイト
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// 顧客の注文を注文番号順で取得する
    async fn find_by_customer(
        &self,
        customer: &CustomerCode,
    ) -> Result<Vec<OrderRecord>, InfraError>;

    /// 顧客コード + 注文番号で検索する
    ///
    /// 一致しなければ空の Vec を返す（Not Found にはしない）。
    async fn find_by_key(&self, key: &OrderKey) -> Result<Vec<OrderRecord>, InfraError>;

    /// 注文番号が使用済みか確認する（全顧客を通じて一意）
    async fn exists_by_number(
        &self,
        tx: &mut TxContext,
        number: &OrderNumber,
    ) -> Result<bool, InfraError>;

    /// 顧客コード + 注文番号の注文が存在するか確認し、存在すればロックする
    async fn exists_by_key(&self, tx: &mut TxContext, key: &OrderKey) -> Result<bool, InfraError>;

    /// 注文を挿入する
    ///
    /// 注文番号が重複した場合は一意制約違反（[`InfraError::is_unique_violation`]）になる。
    async fn insert(&self, tx: &mut TxContext, order: &NewOrder) -> Result<(), InfraError>;

    /// 可変列をすべて置き換える
    ///
    /// 更新した行数を返す。
    async fn replace(
        &self,
        tx: &mut TxContext,
        key: &OrderKey,
        fields: &OrderFields,
    ) -> Result<u64, InfraError>;

    /// 指定された列だけを更新する
    ///
    /// 更新した行数を返す。
    async fn patch(
        &self,
        tx: &mut TxContext,
        key: &OrderKey,
        patch: &OrderPatch,
    ) -> Result<u64, InfraError>;

    /// 注文を削除する
    ///
    /// 削除した行数を返す。
    async fn delete(&self, tx: &mut TxContext, key: &OrderKey) -> Result<u64, InfraError>;
}

/// PostgreSQL 実装の OrderRepository
#[derive(Debug, Clone)]
pub struct PostgresOrderRepository {
    pool: PgPool,
}

impl PostgresOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    ord_num:         String,
    ord_amount:      String,
    advance_amount:  String,
    ord_date:        String,
    cust_code:       String,
    agent_code:      String,
    ord_description: String,
}

impl From<OrderRow> for OrderRecord {
    fn from(row: OrderRow) -> Self {
        Self {
            ord_num:         row.ord_num,
            ord_amount:      row.ord_amount,
            advance_amount:  row.advance_amount,
            ord_date:        row.ord_date,
            cust_code:       row.cust_code,
            agent_code:      row.agent_code,
            ord_description: row.ord_description,
        }
    }
}

/// 部分更新の UPDATE 文を組み立てる
///
/// SET 句の列は変更の宣言順に並び、WHERE 句のバインドは最後に来る。
fn build_patch_query<'a>(key: &'a OrderKey, patch: &'a OrderPatch) -> QueryBuilder<'a, Postgres> {
    let mut qb = QueryBuilder::new("UPDATE orders SET ");

    let mut set = qb.separated(", ");
    for change in patch.changes() {
        set.push(change.column().as_str());
        set.push_unseparated(" = ");
        match change {
            OrderChange::OrdAmount(v) | OrderChange::AdvanceAmount(v) => {
                set.push_bind_unseparated(v.as_str());
                set.push_unseparated("::numeric");
            }
            OrderChange::OrdDate(v) => {
                set.push_bind_unseparated(v.as_date());
            }
            OrderChange::AgentCode(v) => {
                set.push_bind_unseparated(v.as_str());
            }
            OrderChange::OrdDescription(v) => {
                set.push_bind_unseparated(v.as_str());
            }
        }
    }

    qb.push(" WHERE cust_code = ")
        .push_bind(key.customer.as_str())
        .push(" AND ord_num = ")
        .push_bind(key.number.as_str())
        .push("::numeric");

    qb
}

#[async_trait]
impl OrderRepository for PostgresOrderRepository {
    #[tracing::instrument(skip_all, level = "debug", fields(%customer))]
    async fn find_by_customer(
        &self,
        customer: &CustomerCode,
    ) -> Result<Vec<OrderRecord>, InfraError> {
        let rows: Vec<OrderRow> = sqlx::query_as(select_orders!(
            r#"
            WHERE cust_code = $1
            ORDER BY ord_num
            "#
        ))
        .bind(customer.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(OrderRecord::from).collect())
    }

    #[tracing::instrument(
        skip_all,
        level = "debug",
        fields(cust_code = %key.customer, ord_num = %key.number)
    )]
    async fn find_by_key(&self, key: &OrderKey) -> Result<Vec<OrderRecord>, InfraError> {
        let rows: Vec<OrderRow> = sqlx::query_as(select_orders!(
            r#"
            WHERE cust_code = $1 AND ord_num = $2::numeric
            "#
        ))
        .bind(key.customer.as_str())
        .bind(key.number.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(OrderRecord::from).collect())
    }

    #[tracing::instrument(skip_all, level = "debug", fields(ord_num = %number))]
    async fn exists_by_number(
        &self,
        tx: &mut TxContext,
        number: &OrderNumber,
    ) -> Result<bool, InfraError> {
        let found: Option<i32> = sqlx::query_scalar(
            r#"
            SELECT 1
            FROM orders
            WHERE ord_num = $1::numeric
            "#,
        )
        .bind(number.as_str())
        .fetch_optional(tx.conn()?)
        .await?;

        Ok(found.is_some())
    }

    #[tracing::instrument(
        skip_all,
        level = "debug",
        fields(cust_code = %key.customer, ord_num = %key.number)
    )]
    async fn exists_by_key(&self, tx: &mut TxContext, key: &OrderKey) -> Result<bool, InfraError> {
        let found: Option<i32> = sqlx::query_scalar(
            r#"
            SELECT 1
            FROM orders
            WHERE cust_code = $1 AND ord_num = $2::numeric
            FOR UPDATE
            "#,
        )
        .bind(key.customer.as_str())
        .bind(key.number.as_str())
        .fetch_optional(tx.conn()?)
        .await?;

        Ok(found.is_some())
    }

    #[tracing::instrument(
        skip_all,
        level = "debug",
        fields(cust_code = %order.customer, ord_num = %order.number)
    )]
    async fn insert(&self, tx: &mut TxContext, order: &NewOrder) -> Result<(), InfraError> {
        let fields = &order.fields;
        sqlx::query(
            r#"
            INSERT INTO orders (
                ord_num, ord_amount, advance_amount, ord_date,
                cust_code, agent_code, ord_description
            )
            VALUES ($1::numeric, $2::numeric, $3::numeric, $4, $5, $6, $7)
            "#,
        )
        .bind(order.number.as_str())
        .bind(fields.ord_amount.as_str())
        .bind(fields.advance_amount.as_str())
        .bind(fields.ord_date.as_date())
        .bind(order.customer.as_str())
        .bind(fields.agent_code.as_str())
        .bind(fields.ord_description.as_str())
        .execute(tx.conn()?)
        .await?;

        Ok(())
    }

    #[tracing::instrument(
        skip_all,
        level = "debug",
        fields(cust_code = %key.customer, ord_num = %key.number)
    )]
    async fn replace(
        &self,
        tx: &mut TxContext,
        key: &OrderKey,
        fields: &OrderFields,
    ) -> Result<u64, InfraError> {
        let result = sqlx::query(
            r#"
            UPDATE orders
            SET ord_amount = $3::numeric,
                advance_amount = $4::numeric,
                ord_date = $5,
                agent_code = $6,
                ord_description = $7
            WHERE cust_code = $1 AND ord_num = $2::numeric
            "#,
        )
        .bind(key.customer.as_str())
        .bind(key.number.as_str())
        .bind(fields.ord_amount.as_str())
        .bind(fields.advance_amount.as_str())
        .bind(fields.ord_date.as_date())
        .bind(fields.agent_code.as_str())
        .bind(fields.ord_description.as_str())
        .execute(tx.conn()?)
        .await?;

        Ok(result.rows_affected())
    }

    #[tracing::instrument(
        skip_all,
        level = "debug",
        fields(cust_code = %key.customer, ord_num = %key.number, columns = ?patch.columns())
    )]
    async fn patch(
        &self,
        tx: &mut TxContext,
        key: &OrderKey,
        patch: &OrderPatch,
    ) -> Result<u64, InfraError> {
        let result = build_patch_query(key, patch)
            .build()
            .execute(tx.conn()?)
            .await?;

        Ok(result.rows_affected())
    }

    #[tracing::instrument(
        skip_all,
        level = "debug",
        fields(cust_code = %key.customer, ord_num = %key.number)
    )]
    async fn delete(&self, tx: &mut TxContext, key: &OrderKey) -> Result<u64, InfraError> {
        let result = sqlx::query(
            r#"
            DELETE FROM orders
            WHERE cust_code = $1 AND ord_num = $2::numeric
            "#,
        )
        .bind(key.customer.as_str())
        .bind(key.number.as_str())
        .execute(tx.conn()?)
        .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use orderdesk_domain::order::{OrderDescription, OrderRef};
    use pretty_assertions::assert_eq;
    use sqlx::Execute;

    use super::*;

    fn key() -> OrderKey {
        OrderKey::new(
            CustomerCode::new("C00001").unwrap(),
            OrderRef::new("200100").unwrap(),
        )
    }

    #[test]
    fn test_部分更新のsqlは指定列とwhere句のバインドだけを含む() {
        let key = key();
        let patch = OrderPatch::new(vec![OrderChange::OrdDescription(
            OrderDescription::new("updated").unwrap(),
        )])
        .unwrap();

        let mut qb = build_patch_query(&key, &patch);

        assert_eq!(
            qb.build().sql(),
            "UPDATE orders SET ord_description = $1 WHERE cust_code = $2 AND ord_num = $3::numeric"
        );
    }

    #[test]
    fn test_部分更新の金額はnumericにキャストしてバインドする() {
        let key = key();
        let patch = OrderPatch::new(vec![
            OrderChange::OrdAmount("1,000.00".parse().unwrap()),
            OrderChange::OrdDate("2008-08-30".parse().unwrap()),
        ])
        .unwrap();

        let mut qb = build_patch_query(&key, &patch);

        assert_eq!(
            qb.build().sql(),
            "UPDATE orders SET ord_amount = $1::numeric, ord_date = $2 \
             WHERE cust_code = $3 AND ord_num = $4::numeric"
        );
    }
}
