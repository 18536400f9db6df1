//! `reqwest` implementation of the gateway traits.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use crate::domain::account::{Credentials, LoginResult, PasswordChange};
use crate::domain::category::{Category, CategoryDraft};
use crate::domain::configuration::ConfigEntry;
use crate::domain::loan_request::{
    ImageUpload, LoanRequestDetail, LoanRequestSubmission, LoanRequestSummary,
};
use crate::domain::product::{Product, ProductDraft};
use crate::domain::types::{CategoryId, ProductId, RequestCode, TypeConstraintError};
use crate::gateway::errors::{GatewayError, GatewayResult};
use crate::gateway::{
    AccountGateway, CategoryReader, CategoryWriter, ConfigurationReader, ConfigurationWriter,
    LoanRequestReader, LoanRequestWriter, ProductReader, ProductWriter,
};
use crate::listing::page::ResultPage;
use crate::listing::query::{Filters, KeywordFilters, ListQuery, RequestFilters};
use crate::models::account::{ChangePasswordPayload, LoginPayload, LoginRecord};
use crate::models::category::{CategoryPayload, CategoryRecord};
use crate::models::configuration::{ConfigEntryPayload, ConfigurationRecord};
use crate::models::envelope::{Envelope, PagedResult};
use crate::models::loan_request::{
    FieldPayload, ProcessedPayload, RequestCodePayload, RequestDetailRecord, RequestSummaryRecord,
};
use crate::models::product::{ProductPayload, ProductRecord};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// HTTP client facade bound to one backend base URL.
#[derive(Clone, Debug)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpGateway {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> GatewayResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| GatewayError::Encode(format!("failed to build HTTP client: {err}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Copy of this gateway that sends `token` as a bearer credential.
    #[must_use]
    pub fn with_token(&self, token: &str) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: Some(token.to_string()).filter(|token| !token.is_empty()),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send_raw(
        &self,
        builder: RequestBuilder,
    ) -> GatewayResult<(StatusCode, bool, Vec<u8>)> {
        let response = builder.send().await.map_err(|err| {
            log::error!("Backend unreachable: {err}");
            GatewayError::Transport(err.to_string())
        })?;
        let status = response.status();
        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/json"));
        let bytes = response
            .bytes()
            .await
            .map_err(|err| GatewayError::Transport(err.to_string()))?;

        if !status.is_success() {
            return Err(classify_failure(status, &bytes));
        }
        Ok((status, is_json, bytes.to_vec()))
    }

    async fn envelope<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> GatewayResult<(u16, Envelope<T>)> {
        let (status, _, bytes) = self.send_raw(builder).await?;
        let envelope =
            serde_json::from_slice(&bytes).map_err(|err| GatewayError::Decode(err.to_string()))?;
        Ok((status.as_u16(), envelope))
    }

    /// Sends the request and unwraps the envelope.
    async fn send<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> GatewayResult<Option<T>> {
        let (status, envelope) = self.envelope(builder).await?;
        envelope.into_result(status)
    }

    async fn send_required<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> GatewayResult<T> {
        let (status, envelope) = self.envelope(builder).await?;
        envelope.into_required(status)
    }

    async fn send_unit(&self, builder: RequestBuilder) -> GatewayResult<()> {
        self.send::<serde_json::Value>(builder).await.map(|_| ())
    }

    async fn search<F, R, T>(
        &self,
        path: &str,
        query: &ListQuery<F>,
    ) -> GatewayResult<ResultPage<T>>
    where
        F: Filters,
        R: DeserializeOwned,
        T: TryFrom<R, Error = TypeConstraintError>,
    {
        let builder = self
            .request(Method::GET, path)
            .query(&query.to_search_pairs());
        let paged: PagedResult<R> = self.send_required(builder).await?;
        let total = paged.total();
        let items = paged
            .items
            .into_iter()
            .map(T::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| GatewayError::Decode(err.to_string()))?;
        Ok(ResultPage::new(items, total))
    }
}

/// Error for a non-2xx response: the envelope message when the body carries
/// one, otherwise the body text or the status line.
fn classify_failure(status: StatusCode, body: &[u8]) -> GatewayError {
    let code = status.as_u16();
    let message = match serde_json::from_slice::<Envelope<serde_json::Value>>(body) {
        Ok(envelope) => envelope.failure_message(code),
        Err(_) => {
            let text = String::from_utf8_lossy(body).trim().to_string();
            if text.is_empty() {
                format!("Request failed with status code {code}")
            } else {
                text
            }
        }
    };
    GatewayError::server(code, message)
}

fn image_part(image: &ImageUpload) -> GatewayResult<Part> {
    Part::bytes(image.bytes.clone())
        .file_name(image.file_name.clone())
        .mime_str(&image.content_type)
        .map_err(|err| GatewayError::Encode(err.to_string()))
}

/// Appends `DataImage[i].key` / `DataImage[i].imgFile` parts.
fn with_images(mut form: Form, images: &[ImageUpload]) -> GatewayResult<Form> {
    for (index, image) in images.iter().enumerate() {
        form = form
            .text(format!("DataImage[{index}].key"), image.key.clone())
            .part(format!("DataImage[{index}].imgFile"), image_part(image)?);
    }
    Ok(form)
}

fn to_json<T: serde::Serialize>(value: &T) -> GatewayResult<String> {
    serde_json::to_string(value).map_err(|err| GatewayError::Encode(err.to_string()))
}

#[async_trait]
impl LoanRequestReader for HttpGateway {
    async fn search_requests(
        &self,
        query: &ListQuery<RequestFilters>,
    ) -> GatewayResult<ResultPage<LoanRequestSummary>> {
        self.search::<_, RequestSummaryRecord, _>("/api/request/search", query)
            .await
    }

    async fn get_request_detail(&self, code: &RequestCode) -> GatewayResult<LoanRequestDetail> {
        let builder = self
            .request(Method::POST, "/api/request/detail")
            .json(&RequestCodePayload {
                request_code: code.as_str(),
            });
        let record: RequestDetailRecord = self.send_required(builder).await?;
        Ok(record.into_domain(code.clone()))
    }

    async fn export_requests(&self, query: &ListQuery<RequestFilters>) -> GatewayResult<Vec<u8>> {
        let builder = self
            .request(Method::GET, "/api/request/export")
            .query(&query.filters.to_pairs());
        let (status, is_json, bytes) = self.send_raw(builder).await?;
        if is_json {
            // A JSON body instead of a spreadsheet is a refused export.
            if let Ok(envelope) = serde_json::from_slice::<Envelope<serde_json::Value>>(&bytes) {
                envelope.into_result(status.as_u16())?;
            }
        }
        Ok(bytes)
    }
}

#[async_trait]
impl LoanRequestWriter for HttpGateway {
    async fn submit_request(&self, submission: &LoanRequestSubmission) -> GatewayResult<()> {
        let fields: Vec<FieldPayload<'_>> = submission.fields.iter().map(Into::into).collect();
        let form = Form::new()
            .text("Phone", submission.phone.as_str().to_string())
            .text("ProductId", submission.product_id.as_str().to_string())
            .text("FullName", submission.full_name.clone())
            .text("dataJson", to_json(&fields)?);
        let form = with_images(form, &submission.images)?;
        let builder = self
            .request(Method::POST, "/api/request/save")
            .multipart(form);
        self.send_unit(builder).await
    }

    async fn mark_processed(&self, code: &RequestCode, user_name: &str) -> GatewayResult<()> {
        let builder = self
            .request(Method::POST, "/api/request/processed")
            .json(&ProcessedPayload {
                request_code: code.as_str(),
                user_name,
            });
        self.send_unit(builder).await
    }
}

#[async_trait]
impl CategoryReader for HttpGateway {
    async fn search_categories(
        &self,
        query: &ListQuery<KeywordFilters>,
    ) -> GatewayResult<ResultPage<Category>> {
        self.search::<_, CategoryRecord, _>("/api/product/category/search", query)
            .await
    }
}

#[async_trait]
impl CategoryWriter for HttpGateway {
    async fn create_category(
        &self,
        draft: &CategoryDraft,
        created_by: &str,
    ) -> GatewayResult<CategoryId> {
        let builder = self
            .request(Method::POST, "/api/product/category")
            .json(&CategoryPayload::new(None, draft, created_by));
        let id: String = self.send_required(builder).await?;
        CategoryId::new(id).map_err(|err| GatewayError::Decode(err.to_string()))
    }

    async fn update_category(
        &self,
        id: &CategoryId,
        draft: &CategoryDraft,
        created_by: &str,
    ) -> GatewayResult<()> {
        let builder = self
            .request(Method::PUT, "/api/product/category")
            .json(&CategoryPayload::new(Some(id), draft, created_by));
        self.send_unit(builder).await
    }

    async fn toggle_category_active(&self, id: &CategoryId) -> GatewayResult<()> {
        let builder = self.request(Method::DELETE, &format!("/api/product/category/{id}"));
        self.send_unit(builder).await
    }
}

#[async_trait]
impl ProductReader for HttpGateway {
    async fn search_products(
        &self,
        query: &ListQuery<KeywordFilters>,
    ) -> GatewayResult<ResultPage<Product>> {
        self.search::<_, ProductRecord, _>("/api/product/search", query)
            .await
    }

    async fn get_product(&self, id: &ProductId) -> GatewayResult<Product> {
        let builder = self.request(Method::GET, &format!("/api/product/{id}"));
        let record: ProductRecord = self.send_required(builder).await?;
        Product::try_from(record).map_err(|err| GatewayError::Decode(err.to_string()))
    }
}

#[async_trait]
impl ProductWriter for HttpGateway {
    async fn create_product(
        &self,
        draft: &ProductDraft,
        created_by: &str,
    ) -> GatewayResult<ProductId> {
        let builder = self
            .request(Method::POST, "/api/product")
            .json(&ProductPayload::new(None, draft, created_by));
        let id: String = self.send_required(builder).await?;
        ProductId::new(id).map_err(|err| GatewayError::Decode(err.to_string()))
    }

    async fn update_product(
        &self,
        id: &ProductId,
        draft: &ProductDraft,
        created_by: &str,
    ) -> GatewayResult<()> {
        let builder = self
            .request(Method::PUT, "/api/product")
            .json(&ProductPayload::new(Some(id), draft, created_by));
        self.send_unit(builder).await
    }

    async fn toggle_product_active(&self, id: &ProductId) -> GatewayResult<()> {
        let builder = self.request(Method::DELETE, &format!("/api/product/{id}"));
        self.send_unit(builder).await
    }
}

#[async_trait]
impl ConfigurationReader for HttpGateway {
    async fn get_configuration(&self) -> GatewayResult<Vec<ConfigEntry>> {
        let builder = self.request(Method::GET, "/api/configuration/getall");
        let record: Option<ConfigurationRecord> = self.send(builder).await?;
        Ok(record.map(Into::into).unwrap_or_default())
    }
}

#[async_trait]
impl ConfigurationWriter for HttpGateway {
    async fn save_configuration(
        &self,
        entries: &[ConfigEntry],
        images: &[ImageUpload],
        created_by: &str,
    ) -> GatewayResult<()> {
        let data: Vec<ConfigEntryPayload<'_>> = entries.iter().map(Into::into).collect();
        let form = Form::new()
            .text("CreateUser", created_by.to_string())
            .text("dataJson", to_json(&data)?);
        let form = with_images(form, images)?;
        let builder = self
            .request(Method::POST, "/api/configuration/save")
            .multipart(form);
        self.send_unit(builder).await
    }
}

#[async_trait]
impl AccountGateway for HttpGateway {
    async fn login(&self, credentials: &Credentials) -> GatewayResult<LoginResult> {
        let builder = self
            .request(Method::POST, "/api/user/login")
            .json(&LoginPayload {
                user_name: credentials.user_name.as_str(),
                password: &credentials.password,
            });
        let record: LoginRecord = self.send_required(builder).await?;
        if record.token.trim().is_empty() {
            return Err(GatewayError::MissingResult);
        }
        Ok(record.into())
    }

    async fn logout(&self) -> GatewayResult<()> {
        let builder = self.request(Method::POST, "/api/user/logout");
        self.send_unit(builder).await
    }

    async fn change_password(&self, change: &PasswordChange) -> GatewayResult<()> {
        let builder = self
            .request(Method::POST, "/api/user/change-password")
            .json(&ChangePasswordPayload {
                user_name: change.user_name.as_str(),
                current_password: &change.current_password,
                new_password: &change.new_password,
            });
        self.send_unit(builder).await
    }
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;
    use crate::domain::types::{ActiveStatus, CategoryName, PhoneNumber};
    use crate::gateway::errors::TRANSPORT_MESSAGE;

    fn gateway_for(server: &MockServer) -> HttpGateway {
        HttpGateway::new(server.base_url(), Duration::from_secs(5)).expect("client builds")
    }

    #[tokio::test]
    async fn search_sends_filters_and_pagination() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/request/search")
                .query_param("phone", "0901")
                .query_param("page", "1")
                .query_param("pageSize", "10")
                .header("authorization", "Bearer tok");
            then.status(200).json_body(json!({
                "isSuccess": true,
                "statusCode": 200,
                "message": "",
                "result": {
                    "items": [
                        {"requestCode": "RQ1", "phone": "0901", "fullName": "An",
                         "isProcessed": false},
                        {"requestCode": "RQ2", "phone": "0901", "fullName": "Bình",
                         "isProcessed": true},
                        {"requestCode": "RQ3", "phone": "0901", "fullName": "Chi",
                         "isProcessed": false}
                    ],
                    "totalItems": 3
                }
            }));
        });

        let query = ListQuery::<RequestFilters>::from_query_str("phone=0901&fullName=");
        let page = gateway_for(&server)
            .with_token("tok")
            .search_requests(&query)
            .await
            .expect("search succeeds");

        mock.assert();
        assert_eq!(page.total, 3);
        assert_eq!(page.items.len(), 3);
        assert!(page.items[1].state.is_processed());
    }

    #[tokio::test]
    async fn is_success_false_is_a_server_error() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/product/category");
            then.status(200).json_body(json!({
                "isSuccess": false,
                "statusCode": 409,
                "message": "Tên danh mục đã tồn tại"
            }));
        });

        let draft = CategoryDraft::new(
            CategoryName::new("Vay tiêu dùng").expect("name"),
            ActiveStatus::Active,
        );
        let err = gateway_for(&server)
            .create_category(&draft, "admin")
            .await
            .expect_err("rejected");

        assert_eq!(err, GatewayError::server(409, "Tên danh mục đã tồn tại"));
    }

    #[tokio::test]
    async fn http_error_uses_body_message() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(DELETE).path("/api/product/category/c1");
            then.status(500).json_body(json!({
                "isSuccess": false,
                "statusCode": 500,
                "message": "Lỗi hệ thống"
            }));
        });

        let id = CategoryId::new("c1").expect("id");
        let err = gateway_for(&server)
            .toggle_category_active(&id)
            .await
            .expect_err("server failure");

        assert_eq!(err.to_string(), "Lỗi hệ thống");
        assert!(!err.is_transport());
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_transport_error() {
        let gateway =
            HttpGateway::new("http://127.0.0.1:9", Duration::from_millis(500)).expect("client");
        let err = gateway.get_configuration().await.expect_err("no server");
        assert!(err.is_transport());
        assert_eq!(err.to_string(), TRANSPORT_MESSAGE);
    }

    #[tokio::test]
    async fn submit_posts_multipart_payload() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/request/save")
                .body_includes("name=\"Phone\"")
                .body_includes("name=\"dataJson\"")
                .body_includes("name=\"DataImage[0].imgFile\"");
            then.status(200)
                .json_body(json!({"isSuccess": true, "statusCode": 200, "result": true}));
        });

        let submission = LoanRequestSubmission {
            phone: PhoneNumber::new("0901234567").expect("phone"),
            full_name: "Nguyễn An".into(),
            product_id: ProductId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("id"),
            fields: vec![crate::domain::loan_request::RequestField::new("fullname", "Nguyễn An")],
            images: vec![ImageUpload {
                key: "image1".into(),
                file_name: "cccd.jpg".into(),
                content_type: "image/jpeg".into(),
                bytes: vec![0xFF, 0xD8, 0xFF],
            }],
        };
        gateway_for(&server)
            .submit_request(&submission)
            .await
            .expect("saved");
        mock.assert();
    }

    #[tokio::test]
    async fn export_returns_spreadsheet_bytes() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/request/export")
                .query_param("isProcessed", "true");
            then.status(200)
                .header(
                    "content-type",
                    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
                )
                .body([0x50, 0x4B, 0x03, 0x04]);
        });

        let query = ListQuery::<RequestFilters>::from_query_str("isProcessed=true&page=4");
        let bytes = gateway_for(&server)
            .export_requests(&query)
            .await
            .expect("exported");
        mock.assert();
        assert_eq!(bytes, vec![0x50, 0x4B, 0x03, 0x04]);
    }

    #[tokio::test]
    async fn login_maps_record() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST)
                .path("/api/user/login")
                .json_body(json!({"userName": "admin", "password": "secret"}));
            then.status(200).json_body(json!({
                "isSuccess": true,
                "statusCode": 200,
                "result": {
                    "token": "jwt",
                    "fullName": "Quản trị viên",
                    "expireAt": "2026-01-01T00:00:00Z",
                    "permission": "admin"
                }
            }));
        });

        let credentials = Credentials {
            user_name: crate::domain::types::UserName::new("admin").expect("name"),
            password: "secret".into(),
        };
        let result = gateway_for(&server).login(&credentials).await.expect("login");
        assert_eq!(result.token, "jwt");
        assert_eq!(result.full_name.as_deref(), Some("Quản trị viên"));
        assert!(result.expire_at.is_some());
    }

    #[tokio::test]
    async fn login_without_result_is_missing() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/user/login");
            then.status(200).json_body(json!({"isSuccess": true, "statusCode": 200}));
        });

        let credentials = Credentials {
            user_name: crate::domain::types::UserName::new("admin").expect("name"),
            password: "secret".into(),
        };
        let err = gateway_for(&server).login(&credentials).await.unwrap_err();
        assert_eq!(err, GatewayError::MissingResult);
    }
}
