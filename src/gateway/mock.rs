//! Mock gateway for isolating services in tests.

use async_trait::async_trait;
use mockall::mock;

use crate::domain::account::{Credentials, LoginResult, PasswordChange};
use crate::domain::category::{Category, CategoryDraft};
use crate::domain::configuration::ConfigEntry;
use crate::domain::loan_request::{
    ImageUpload, LoanRequestDetail, LoanRequestSubmission, LoanRequestSummary,
};
use crate::domain::product::{Product, ProductDraft};
use crate::domain::types::{CategoryId, ProductId, RequestCode};
use crate::gateway::errors::GatewayResult;
use crate::gateway::{
    AccountGateway, CategoryReader, CategoryWriter, ConfigurationReader, ConfigurationWriter,
    LoanRequestReader, LoanRequestWriter, ProductReader, ProductWriter,
};
use crate::listing::page::ResultPage;
use crate::listing::query::{KeywordFilters, ListQuery, RequestFilters};

mock! {
    pub Gateway {}

    #[async_trait]
    impl LoanRequestReader for Gateway {
        async fn search_requests(
            &self,
            query: &ListQuery<RequestFilters>,
        ) -> GatewayResult<ResultPage<LoanRequestSummary>>;
        async fn get_request_detail(&self, code: &RequestCode) -> GatewayResult<LoanRequestDetail>;
        async fn export_requests(
            &self,
            query: &ListQuery<RequestFilters>,
        ) -> GatewayResult<Vec<u8>>;
    }

    #[async_trait]
    impl LoanRequestWriter for Gateway {
        async fn submit_request(&self, submission: &LoanRequestSubmission) -> GatewayResult<()>;
        async fn mark_processed(&self, code: &RequestCode, user_name: &str) -> GatewayResult<()>;
    }

    #[async_trait]
    impl CategoryReader for Gateway {
        async fn search_categories(
            &self,
            query: &ListQuery<KeywordFilters>,
        ) -> GatewayResult<ResultPage<Category>>;
    }

    #[async_trait]
    impl CategoryWriter for Gateway {
        async fn create_category(
            &self,
            draft: &CategoryDraft,
            created_by: &str,
        ) -> GatewayResult<CategoryId>;
        async fn update_category(
            &self,
            id: &CategoryId,
            draft: &CategoryDraft,
            created_by: &str,
        ) -> GatewayResult<()>;
        async fn toggle_category_active(&self, id: &CategoryId) -> GatewayResult<()>;
    }

    #[async_trait]
    impl ProductReader for Gateway {
        async fn search_products(
            &self,
            query: &ListQuery<KeywordFilters>,
        ) -> GatewayResult<ResultPage<Product>>;
        async fn get_product(&self, id: &ProductId) -> GatewayResult<Product>;
    }

    #[async_trait]
    impl ProductWriter for Gateway {
        async fn create_product(
            &self,
            draft: &ProductDraft,
            created_by: &str,
        ) -> GatewayResult<ProductId>;
        async fn update_product(
            &self,
            id: &ProductId,
            draft: &ProductDraft,
            created_by: &str,
        ) -> GatewayResult<()>;
        async fn toggle_product_active(&self, id: &ProductId) -> GatewayResult<()>;
    }

    #[async_trait]
    impl ConfigurationReader for Gateway {
        async fn get_configuration(&self) -> GatewayResult<Vec<ConfigEntry>>;
    }

    #[async_trait]
    impl ConfigurationWriter for Gateway {
        async fn save_configuration(
            &self,
            entries: &[ConfigEntry],
            images: &[ImageUpload],
            created_by: &str,
        ) -> GatewayResult<()>;
    }

    #[async_trait]
    impl AccountGateway for Gateway {
        async fn login(&self, credentials: &Credentials) -> GatewayResult<LoginResult>;
        async fn logout(&self) -> GatewayResult<()>;
        async fn change_password(&self, change: &PasswordChange) -> GatewayResult<()>;
    }
}
