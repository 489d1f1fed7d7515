//! # CustomerRepository
//!
//! 顧客テーブルの参照を担当するリポジトリ。
//!
//! 顧客の列構成はこのサービスの関心外のため、`row_to_json` で行全体を
//! JSON オブジェクトとして取得し、そのまま返す。

use async_trait::async_trait;
use orderdesk_domain::customer::{CustomerCode, CustomerRecord};
use serde_json::Value;
use sqlx::PgPool;

use crate::{db::TxContext, error::InfraError};

/// 顧客リポジトリトレイト
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// 全顧客を顧客コード順で取得する
    async fn find_all(&self) -> Result<Vec<CustomerRecord>, InfraError>;

    /// 顧客コードで検索する
    ///
    /// 一致しなければ空の Vec を返す（Not Found にはしない）。
    async fn find_by_code(&self, code: &CustomerCode) -> Result<Vec<CustomerRecord>, InfraError>;

    /// 顧客が存在するか確認する
    ///
    /// 注文作成のトランザクション内で呼ばれ、コミットまで顧客行を共有ロックする。
    async fn exists(&self, tx: &mut TxContext, code: &CustomerCode) -> Result<bool, InfraError>;
}

/// PostgreSQL 実装の CustomerRepository
#[derive(Debug, Clone)]
pub struct PostgresCustomerRepository {
    pool: PgPool,
}

impl PostgresCustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn into_record(row: Value) -> Result<CustomerRecord, InfraError> {
    match row {
        Value::Object(columns) => Ok(CustomerRecord::new(columns)),
        other => Err(InfraError::unexpected(format!(
            "顧客行が JSON オブジェクトではありません: {other}"
        ))),
    }
}

#[async_trait]
impl CustomerRepository for PostgresCustomerRepository {
    #[tracing::instrument(skip_all, level = "debug")]
    async fn find_all(&self) -> Result<Vec<CustomerRecord>, InfraError> {
        let rows: Vec<Value> = sqlx::query_scalar(
            r#"
            SELECT row_to_json(c)
            FROM customer c
            ORDER BY c.cust_code
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(into_record).collect()
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%code))]
    async fn find_by_code(&self, code: &CustomerCode) -> Result<Vec<CustomerRecord>, InfraError> {
        let rows: Vec<Value> = sqlx::query_scalar(
            r#"
            SELECT row_to_json(c)
            FROM customer c
            WHERE c.cust_code = $1
            "#,
        )
        .bind(code.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(into_record).collect()
    }

    #[tracing::instrument(skip_all, level = "debug", fields(%code))]
    async fn exists(&self, tx: &mut TxContext, code: &CustomerCode) -> Result<bool, InfraError> {
        let found: Option<i32> = sqlx::query_scalar(
            r#"
            SELECT 1
            FROM customer
            WHERE cust_code = $1
            FOR SHARE
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(tx.conn()?)
        .await?;

        Ok(found.is_some())
    }
}
