//! Outbound access to the REST backend.
//!
//! Services depend on the traits below; [`http::HttpGateway`] implements all
//! of them over HTTP and `mock::MockGateway` stands in for it in tests.

use async_trait::async_trait;

use crate::domain::account::{Credentials, LoginResult, PasswordChange};
use crate::domain::category::{Category, CategoryDraft};
use crate::domain::configuration::ConfigEntry;
use crate::domain::loan_request::{
    ImageUpload, LoanRequestDetail, LoanRequestSubmission, LoanRequestSummary,
};
use crate::domain::product::{Product, ProductDraft};
use crate::domain::types::{CategoryId, ProductId, RequestCode};
use crate::gateway::errors::GatewayResult;
use crate::listing::page::ResultPage;
use crate::listing::query::{KeywordFilters, ListQuery, RequestFilters};

pub mod errors;
pub mod http;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;

pub use errors::GatewayError;

#[async_trait]
pub trait LoanRequestReader: Send + Sync {
    async fn search_requests(
        &self,
        query: &ListQuery<RequestFilters>,
    ) -> GatewayResult<ResultPage<LoanRequestSummary>>;

    async fn get_request_detail(&self, code: &RequestCode) -> GatewayResult<LoanRequestDetail>;

    /// Spreadsheet of every request matching `query`'s filters.
    async fn export_requests(&self, query: &ListQuery<RequestFilters>) -> GatewayResult<Vec<u8>>;
}

#[async_trait]
pub trait LoanRequestWriter: Send + Sync {
    async fn submit_request(&self, submission: &LoanRequestSubmission) -> GatewayResult<()>;

    async fn mark_processed(&self, code: &RequestCode, user_name: &str) -> GatewayResult<()>;
}

#[async_trait]
pub trait CategoryReader: Send + Sync {
    async fn search_categories(
        &self,
        query: &ListQuery<KeywordFilters>,
    ) -> GatewayResult<ResultPage<Category>>;
}

#[async_trait]
pub trait CategoryWriter: Send + Sync {
    /// Returns the id assigned by the backend.
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

    /// Flips active/inactive. The backend exposes this as `DELETE`.
    async fn toggle_category_active(&self, id: &CategoryId) -> GatewayResult<()>;
}

#[async_trait]
pub trait ProductReader: Send + Sync {
    async fn search_products(
        &self,
        query: &ListQuery<KeywordFilters>,
    ) -> GatewayResult<ResultPage<Product>>;

    async fn get_product(&self, id: &ProductId) -> GatewayResult<Product>;
}

#[async_trait]
pub trait ProductWriter: Send + Sync {
    async fn create_product(&self, draft: &ProductDraft, created_by: &str)
    -> GatewayResult<ProductId>;

    async fn update_product(
        &self,
        id: &ProductId,
        draft: &ProductDraft,
        created_by: &str,
    ) -> GatewayResult<()>;

    /// Flips active/inactive. The backend exposes this as `DELETE`.
    async fn toggle_product_active(&self, id: &ProductId) -> GatewayResult<()>;
}

#[async_trait]
pub trait ConfigurationReader: Send + Sync {
    async fn get_configuration(&self) -> GatewayResult<Vec<ConfigEntry>>;
}

#[async_trait]
pub trait ConfigurationWriter: Send + Sync {
    async fn save_configuration(
        &self,
        entries: &[ConfigEntry],
        images: &[ImageUpload],
        created_by: &str,
    ) -> GatewayResult<()>;
}

#[async_trait]
pub trait AccountGateway: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> GatewayResult<LoginResult>;

    async fn logout(&self) -> GatewayResult<()>;

    async fn change_password(&self, change: &PasswordChange) -> GatewayResult<()>;
}
