//! 注文管理ユースケース
//!
//! 更新系の操作は「存在確認 → 変更 → コミット」を 1 トランザクションで行う。
//! 途中で `?` やエラーで抜けた場合、`TxContext` のドロップでロールバックされる。

use std::sync::Arc;

use orderdesk_domain::{
    customer::CustomerCode,
    order::{NewOrder, OrderFields, OrderKey, OrderPatch, OrderRecord, order_location},
};
use orderdesk_infra::{
    db::TransactionManager,
    repository::{CustomerRepository, OrderRepository},
};

use crate::error::ApiError;

/// 注文作成の結果
///
/// どちらの場合も、ハンドラは `location` へ 303 でリダイレクトする。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOrderOutcome {
    /// 新規に作成した
    Created { location: String },
    /// 同じ注文番号の注文が既に存在した（何も書き込んでいない）
    AlreadyExists { location: String },
}

impl CreateOrderOutcome {
    pub fn location(&self) -> &str {
        match self {
            CreateOrderOutcome::Created { location }
            | CreateOrderOutcome::AlreadyExists { location } => location,
        }
    }
}

/// 注文管理ユースケース
pub struct OrderUseCaseImpl {
    customer_repository: Arc<dyn CustomerRepository>,
    order_repository:    Arc<dyn OrderRepository>,
    tx_manager:          Arc<dyn TransactionManager>,
}

impl OrderUseCaseImpl {
    pub fn new(
        customer_repository: Arc<dyn CustomerRepository>,
        order_repository: Arc<dyn OrderRepository>,
        tx_manager: Arc<dyn TransactionManager>,
    ) -> Self {
        Self {
            customer_repository,
            order_repository,
            tx_manager,
        }
    }

    /// 顧客の注文一覧を取得する（顧客の存在は確認しない）
    pub async fn list_orders(&self, customer: &CustomerCode) -> Result<Vec<OrderRecord>, ApiError> {
        Ok(self.order_repository.find_by_customer(customer).await?)
    }

    /// 注文を取得する
    ///
    /// 該当がなければ空の Vec を返す。
    pub async fn get_order(&self, key: &OrderKey) -> Result<Vec<OrderRecord>, ApiError> {
        Ok(self.order_repository.find_by_key(key).await?)
    }

    /// 注文を作成する
    ///
    /// 1. 顧客の存在確認（なければ NotFound）
    /// 2. 注文番号の重複確認（あれば AlreadyExists）
    /// 3. 挿入・コミット
    ///
    /// 確認と挿入の間に別リクエストが同じ注文番号を挿入した場合も、
    /// 一意制約違反を AlreadyExists として扱う。
    pub async fn create_order(&self, order: &NewOrder) -> Result<CreateOrderOutcome, ApiError> {
        let location = order_location(&order.customer, order.number.as_str());

        let mut tx = self.tx_manager.begin().await?;

        if !self
            .customer_repository
            .exists(&mut tx, &order.customer)
            .await?
        {
            return Err(ApiError::NotFound);
        }

        if self
            .order_repository
            .exists_by_number(&mut tx, &order.number)
            .await?
        {
            tracing::info!(ord_num = %order.number, "注文番号が既に存在するため作成をスキップ");
            return Ok(CreateOrderOutcome::AlreadyExists { location });
        }

        match self.order_repository.insert(&mut tx, order).await {
            Ok(()) => {}
            Err(e) if e.is_unique_violation() => {
                tracing::info!(ord_num = %order.number, "同時に作成された注文番号と衝突");
                return Ok(CreateOrderOutcome::AlreadyExists { location });
            }
            Err(e) => return Err(e.into()),
        }

        tx.commit().await?;

        tracing::info!(ord_num = %order.number, cust_code = %order.customer, "注文を作成しました");
        Ok(CreateOrderOutcome::Created { location })
    }

    /// 注文の可変フィールドをすべて置き換える
    pub async fn replace_order(&self, key: &OrderKey, fields: &OrderFields) -> Result<(), ApiError> {
        let mut tx = self.tx_manager.begin().await?;

        if !self.order_repository.exists_by_key(&mut tx, key).await? {
            return Err(ApiError::NotFound);
        }
        self.order_repository.replace(&mut tx, key, fields).await?;

        tx.commit().await?;
        Ok(())
    }

    /// 指定された列だけを更新する
    pub async fn patch_order(&self, key: &OrderKey, patch: &OrderPatch) -> Result<(), ApiError> {
        let mut tx = self.tx_manager.begin().await?;

        if !self.order_repository.exists_by_key(&mut tx, key).await? {
            return Err(ApiError::NotFound);
        }
        self.order_repository.patch(&mut tx, key, patch).await?;

        tx.commit().await?;
        Ok(())
    }

    /// 注文を削除する
    pub async fn delete_order(&self, key: &OrderKey) -> Result<(), ApiError> {
        let mut tx = self.tx_manager.begin().await?;

        if !self.order_repository.exists_by_key(&mut tx, key).await? {
            return Err(ApiError::NotFound);
        }
        self.order_repository.delete(&mut tx, key).await?;

        tx.commit().await?;
        Ok(())
    }
}
