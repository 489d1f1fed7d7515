//! 顧客参照ユースケース

use std::sync::Arc;

use orderdesk_domain::customer::{CustomerCode, CustomerRecord};
use orderdesk_infra::repository::CustomerRepository;

use crate::error::ApiError;

/// 顧客参照ユースケース
pub struct CustomerUseCaseImpl {
    customer_repository: Arc<dyn CustomerRepository>,
}

impl CustomerUseCaseImpl {
    pub fn new(customer_repository: Arc<dyn CustomerRepository>) -> Self {
        Self {
            customer_repository,
        }
    }

    /// 全顧客を取得する
    pub async fn list_customers(&self) -> Result<Vec<CustomerRecord>, ApiError> {
        Ok(self.customer_repository.find_all().await?)
    }

    /// 顧客コードで顧客を取得する
    ///
    /// 該当がなければ空の Vec を返す。
    pub async fn get_customer(&self, code: &CustomerCode) -> Result<Vec<CustomerRecord>, ApiError> {
        Ok(self.customer_repository.find_by_code(code).await?)
    }
}

#[cfg(test)]
mod tests {
    use orderdesk_infra::mock::MockCustomerRepository;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    fn customer(code: &str) -> CustomerRecord {
        match json!({ "cust_code": code, "cust_name": "Holmes" }) {
            serde_json::Value::Object(columns) => CustomerRecord::new(columns),
            _ => unreachable!(),
        }
    }

    #[tokio::test]
    async fn test_顧客コードに一致する顧客だけを返す() {
        let repo = MockCustomerRepository::new();
        repo.add_customer(customer("C00001"));
        repo.add_customer(customer("C00002"));
        let sut = CustomerUseCaseImpl::new(Arc::new(repo));

        let found = sut
            .get_customer(&CustomerCode::new("C00002").unwrap())
            .await
            .unwrap();

        assert_eq!(found, vec![customer("C00002")]);
    }

    #[tokio::test]
    async fn test_該当がなければ空のvecを返す() {
        let sut = CustomerUseCaseImpl::new(Arc::new(MockCustomerRepository::new()));

        let found = sut
            .get_customer(&CustomerCode::new("C09999").unwrap())
            .await
            .unwrap();

        assert!(found.is_empty());
    }

    #[tokio::test]
    async fn test_db障害はデータベースエラーになる() {
        let repo = MockCustomerRepository::new();
        repo.set_unavailable(true);
        let sut = CustomerUseCaseImpl::new(Arc::new(repo));

        let result = sut.list_customers().await;

        assert!(matches!(result, Err(ApiError::Database(_))));
    }
}
