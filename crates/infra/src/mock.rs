//! # テスト用モックリポジトリ
//!
//! ハンドラ・ユースケースのテストで使用するインメモリ実装。
//! `test-utils` feature を有効にすることで、他クレートからも利用可能。
//!
//! ```toml
//! [dev-dependencies]
//! orderdesk-infra = { workspace = true, features = ["test-utils"] }
//! ```

use std::{
    borrow::Cow,
    error::Error as StdError,
    sync::{
        Arc,
        Mutex,
        atomic::{AtomicBool, Ordering},
    },
};

use async_trait::async_trait;
use orderdesk_domain::{
    customer::{CustomerCode, CustomerRecord},
    order::{NewOrder, OrderFields, OrderKey, OrderNumber, OrderPatch, OrderRecord},
};

use crate::{
    db::{TransactionManager, TxContext},
    error::InfraError,
    repository::{CustomerRepository, OrderRepository},
};

/// 障害注入用のスイッチ
///
/// 有効にすると、リポジトリの全メソッドが DB エラーを返す。
#[derive(Clone, Default)]
struct Outage(Arc<AtomicBool>);

impl Outage {
    fn set(&self, down: bool) {
        self.0.store(down, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), InfraError> {
        if self.0.load(Ordering::SeqCst) {
            Err(sqlx::Error::PoolTimedOut.into())
        } else {
            Ok(())
        }
    }
}

/// 一意制約違反（PostgreSQL の SQLSTATE 23505）を模した DB エラー
#[derive(Debug, thiserror::Error)]
#[error("duplicate key value violates unique constraint \"orders_pkey\"")]
struct UniqueViolation;

impl sqlx::error::DatabaseError for UniqueViolation {
    fn message(&self) -> &str {
        "duplicate key value violates unique constraint \"orders_pkey\""
    }

    fn code(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed("23505"))
    }

    fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self
    }

    fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
        self
    }

    fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
        self
    }

    fn kind(&self) -> sqlx::error::ErrorKind {
        sqlx::error::ErrorKind::UniqueViolation
    }
}

/// 注文番号を数値として比較する（DB の `numeric` 比較に合わせる）
fn same_number(stored: &str, requested: &str) -> bool {
    match (stored.parse::<f64>(), requested.parse::<f64>()) {
        (Ok(a), Ok(b)) => a == b,
        _ => stored == requested,
    }
}

fn matches_key(order: &OrderRecord, key: &OrderKey) -> bool {
    order.cust_code == key.customer.as_str() && same_number(&order.ord_num, key.number.as_str())
}

// ===== MockTransactionManager =====

pub struct MockTransactionManager;

#[async_trait]
impl TransactionManager for MockTransactionManager {
    async fn begin(&self) -> Result<TxContext, InfraError> {
        Ok(TxContext::mock())
    }
}

// ===== MockCustomerRepository =====

#[derive(Clone, Default)]
pub struct MockCustomerRepository {
    customers: Arc<Mutex<Vec<CustomerRecord>>>,
    outage:    Outage,
}

impl MockCustomerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_customer(&self, customer: CustomerRecord) {
        self.customers.lock().unwrap().push(customer);
    }

    pub fn set_unavailable(&self, down: bool) {
        self.outage.set(down);
    }
}

#[async_trait]
impl CustomerRepository for MockCustomerRepository {
    async fn find_all(&self) -> Result<Vec<CustomerRecord>, InfraError> {
        self.outage.check()?;
        Ok(self.customers.lock().unwrap().clone())
    }

    async fn find_by_code(&self, code: &CustomerCode) -> Result<Vec<CustomerRecord>, InfraError> {
        self.outage.check()?;
        Ok(self
            .customers
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.code() == Some(code.as_str()))
            .cloned()
            .collect())
    }

    async fn exists(&self, _tx: &mut TxContext, code: &CustomerCode) -> Result<bool, InfraError> {
        Ok(!self.find_by_code(code).await?.is_empty())
    }
}

// ===== MockOrderRepository =====

#[derive(Clone, Default)]
pub struct MockOrderRepository {
    orders:    Arc<Mutex<Vec<OrderRecord>>>,
    outage:    Outage,
    preempted: Arc<Mutex<Option<OrderRecord>>>,
}

impl MockOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_order(&self, order: OrderRecord) {
        self.orders.lock().unwrap().push(order);
    }

    /// 保存されている全注文（検証用）
    pub fn orders(&self) -> Vec<OrderRecord> {
        self.orders.lock().unwrap().clone()
    }

    pub fn set_unavailable(&self, down: bool) {
        self.outage.set(down);
    }

    /// 次の `insert` の直前に、別のトランザクションが `competitor` を作成した状況を再現する
    ///
    /// その `insert` は `competitor` を保存したうえで一意制約違反を返す。
    pub fn preempt_next_insert(&self, competitor: OrderRecord) {
        *self.preempted.lock().unwrap() = Some(competitor);
    }

    fn apply(&self, key: &OrderKey, patch: &OrderPatch) -> u64 {
        let mut orders = self.orders.lock().unwrap();
        let mut affected = 0;
        for order in orders.iter_mut().filter(|o| matches_key(o, key)) {
            order.apply(patch);
            affected += 1;
        }
        affected
    }
}

#[async_trait]
impl OrderRepository for MockOrderRepository {
    async fn find_by_customer(
        &self,
        customer: &CustomerCode,
    ) -> Result<Vec<OrderRecord>, InfraError> {
        self.outage.check()?;
        Ok(self
            .orders
            .lock()
            .unwrap()
            .iter()
            .filter(|o| o.cust_code == customer.as_str())
            .cloned()
            .collect())
    }

    async fn find_by_key(&self, key: &OrderKey) -> Result<Vec<OrderRecord>, InfraError> {
        self.outage.check()?;
        Ok(self
            .orders
            .lock()
            .unwrap()
            .iter()
            .filter(|o| matches_key(o, key))
            .cloned()
            .collect())
    }

    async fn exists_by_number(
        &self,
        _tx: &mut TxContext,
        number: &OrderNumber,
    ) -> Result<bool, InfraError> {
        self.outage.check()?;
        Ok(self
            .orders
            .lock()
            .unwrap()
            .iter()
            .any(|o| same_number(&o.ord_num, number.as_str())))
    }

    async fn exists_by_key(&self, _tx: &mut TxContext, key: &OrderKey) -> Result<bool, InfraError> {
        Ok(!self.find_by_key(key).await?.is_empty())
    }

    async fn insert(&self, _tx: &mut TxContext, order: &NewOrder) -> Result<(), InfraError> {
        self.outage.check()?;
        if let Some(competitor) = self.preempted.lock().unwrap().take() {
            self.orders.lock().unwrap().push(competitor);
            return Err(sqlx::Error::Database(Box::new(UniqueViolation)).into());
        }
        self.orders
            .lock()
            .unwrap()
            .push(OrderRecord::from_new(order));
        Ok(())
    }

    async fn replace(
        &self,
        _tx: &mut TxContext,
        key: &OrderKey,
        fields: &OrderFields,
    ) -> Result<u64, InfraError> {
        self.outage.check()?;
        Ok(self.apply(key, &OrderPatch::from(fields.clone())))
    }

    async fn patch(
        &self,
        _tx: &mut TxContext,
        key: &OrderKey,
        patch: &OrderPatch,
    ) -> Result<u64, InfraError> {
        self.outage.check()?;
        Ok(self.apply(key, patch))
    }

    async fn delete(&self, _tx: &mut TxContext, key: &OrderKey) -> Result<u64, InfraError> {
        self.outage.check()?;
        let mut orders = self.orders.lock().unwrap();
        let before = orders.len();
        orders.retain(|o| !matches_key(o, key));
        Ok((before - orders.len()) as u64)
    }
}
