//! Back-office loan request screens: table, export, detail and approval.

use async_trait::async_trait;

use crate::domain::loan_request::LoanRequestSummary;
use crate::domain::types::{ProcessState, RequestCode};
use crate::dto::requests::{RequestDetailData, RequestRow};
use crate::dto::{ListPageData, ListScreen};
use crate::gateway::errors::GatewayResult;
use crate::gateway::{GatewayError, LoanRequestReader, LoanRequestWriter};
use crate::listing::page::with_query;
use crate::listing::{ListController, ListEntity, ListQuery, ListSource, RequestFilters, ResultPage};
use crate::notifications::NotificationStore;
use crate::services::{ServiceError, ServiceResult};

pub const REQUESTS_PATH: &str = "/admin/requests";
pub const EXPORT_FILE_NAME: &str = "Report.xlsx";
pub const PROCESSED_SUCCESS: &str = "Đã duyệt yêu cầu";

impl ListEntity for LoanRequestSummary {
    type Key = RequestCode;

    fn key(&self) -> RequestCode {
        self.request_code.clone()
    }
}

/// Request table backed by the loan request endpoints. Requests are created
/// by customers, so the table only searches, approves and exports.
pub struct RequestSource<'a, R: ?Sized> {
    gateway: &'a R,
    user_name: String,
}

impl<'a, R: ?Sized> RequestSource<'a, R> {
    pub fn new(gateway: &'a R, user_name: impl Into<String>) -> Self {
        Self {
            gateway,
            user_name: user_name.into(),
        }
    }
}

#[async_trait]
impl<R> ListSource for RequestSource<'_, R>
where
    R: LoanRequestReader + LoanRequestWriter + ?Sized,
{
    type Entity = LoanRequestSummary;
    type Filters = RequestFilters;
    type Draft = ();

    async fn search(
        &self,
        query: &ListQuery<RequestFilters>,
    ) -> GatewayResult<ResultPage<LoanRequestSummary>> {
        self.gateway.search_requests(query).await
    }

    /// Approval is one-way: a processed request stays processed.
    async fn toggle_status(
        &self,
        current: &LoanRequestSummary,
    ) -> GatewayResult<LoanRequestSummary> {
        if current.state.is_processed() {
            return Err(GatewayError::Unsupported);
        }
        self.gateway
            .mark_processed(&current.request_code, &self.user_name)
            .await?;
        Ok(LoanRequestSummary {
            state: ProcessState::Processed,
            ..current.clone()
        })
    }

    async fn export(&self, query: &ListQuery<RequestFilters>) -> GatewayResult<Vec<u8>> {
        self.gateway.export_requests(query).await
    }
}

fn controller<'a, R>(
    gateway: &'a R,
    user_name: &str,
    query: ListQuery<RequestFilters>,
    notifications: &NotificationStore,
) -> ListController<RequestSource<'a, R>>
where
    R: LoanRequestReader + LoanRequestWriter + ?Sized,
{
    ListController::new(
        RequestSource::new(gateway, user_name),
        query,
        notifications.clone(),
    )
}

/// Loads one page of the request table.
pub async fn load_requests_page<R>(
    gateway: &R,
    query: ListQuery<RequestFilters>,
    notifications: &NotificationStore,
) -> ServiceResult<ListScreen<RequestRow>>
where
    R: LoanRequestReader + LoanRequestWriter + ?Sized,
{
    let mut controller = controller(gateway, "", query, notifications);
    controller.fetch_page().await;
    if controller.session_expired() {
        return Err(ServiceError::Unauthorized);
    }
    if let Some(clamped) = controller.clamped_query() {
        return Ok(ListScreen::Redirect(with_query(
            REQUESTS_PATH,
            &clamped.to_query_string(),
        )));
    }
    Ok(ListScreen::Page(ListPageData::from_controller(
        &controller,
        REQUESTS_PATH,
        |request| RequestRow::from(request),
    )))
}

/// Applies a filter, page or page size change and returns where to go.
pub async fn navigate_requests<R>(
    gateway: &R,
    query: ListQuery<RequestFilters>,
    pairs: &[(String, String)],
    notifications: &NotificationStore,
) -> String
where
    R: LoanRequestReader + LoanRequestWriter + ?Sized,
{
    let mut controller = controller(gateway, "", query, notifications);
    controller.navigate(pairs).await;
    controller.location(REQUESTS_PATH)
}

/// Marks a request processed from the table and returns where to go.
pub async fn approve_request<R>(
    gateway: &R,
    user_name: &str,
    code: &RequestCode,
    query: ListQuery<RequestFilters>,
    notifications: &NotificationStore,
) -> ServiceResult<String>
where
    R: LoanRequestReader + LoanRequestWriter + ?Sized,
{
    let mut controller = controller(gateway, user_name, query, notifications);
    controller.fetch_page().await;
    match controller.toggle_status(code).await {
        Err(err) if err.is_unauthorized() => Err(err.into()),
        _ => Ok(controller.location(REQUESTS_PATH)),
    }
}

/// Spreadsheet of every request matching the filters of `query`.
pub async fn export_requests<R>(
    gateway: &R,
    query: ListQuery<RequestFilters>,
    notifications: &NotificationStore,
) -> ServiceResult<Vec<u8>>
where
    R: LoanRequestReader + LoanRequestWriter + ?Sized,
{
    let controller = controller(gateway, "", query, notifications);
    Ok(controller.export_current_view().await?)
}

/// Loads every submitted field of one request.
pub async fn load_request_detail<R>(
    gateway: &R,
    code: &str,
    return_query: String,
) -> ServiceResult<RequestDetailData>
where
    R: LoanRequestReader + ?Sized,
{
    let code = RequestCode::new(code).map_err(|_| ServiceError::NotFound)?;
    let detail = gateway.get_request_detail(&code).await.map_err(|err| {
        log::error!("Failed to load request {code}: {err}");
        err
    })?;
    Ok(RequestDetailData::new(&detail, return_query))
}

/// Marks a request processed from its detail page.
pub async fn mark_processed<R>(
    gateway: &R,
    user_name: &str,
    code: &str,
    notifications: &NotificationStore,
) -> ServiceResult<()>
where
    R: LoanRequestWriter + ?Sized,
{
    let code = RequestCode::new(code).map_err(|_| ServiceError::NotFound)?;
    match gateway.mark_processed(&code, user_name).await {
        Ok(()) => {
            notifications.success(PROCESSED_SUCCESS);
            Ok(())
        }
        Err(err) => {
            log::error!("Failed to mark request {code} processed: {err}");
            if !err.is_unauthorized() {
                notifications.error(err.to_string());
            }
            Err(err.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::mock::MockGateway;
    use crate::notifications::NotificationKind;

    fn summary(code: &str, processed: bool) -> LoanRequestSummary {
        LoanRequestSummary {
            request_code: RequestCode::new(code).unwrap(),
            phone: "0901234567".into(),
            full_name: "An".into(),
            product_id: None,
            state: ProcessState::from_processed(processed),
            created_date: None,
        }
    }

    fn two_rows(gateway: &mut MockGateway, total: usize) {
        gateway.expect_search_requests().returning(move |_| {
            Ok(ResultPage::new(
                vec![summary("RQ1", false), summary("RQ2", false)],
                total,
            ))
        });
    }

    #[tokio::test]
    async fn page_lists_rows_with_range_text() {
        let mut gateway = MockGateway::new();
        two_rows(&mut gateway, 2);
        let store = NotificationStore::new();
        let screen = load_requests_page(&gateway, ListQuery::default(), &store)
            .await
            .unwrap();
        let ListScreen::Page(page) = screen else {
            panic!("expected a page");
        };
        assert_eq!(page.rows.len(), 2);
        assert_eq!(page.pagination.range_text, "Hiển thị 1 - 2 trên 2 mục");
        assert!(store.take().is_none());
    }

    #[tokio::test]
    async fn out_of_range_page_redirects_to_last_page() {
        let mut gateway = MockGateway::new();
        two_rows(&mut gateway, 12);
        let query = ListQuery::<RequestFilters>::from_query_str("phone=09&page=7");
        let screen = load_requests_page(&gateway, query, &NotificationStore::new())
            .await
            .unwrap();
        match screen {
            ListScreen::Redirect(location) => {
                assert_eq!(location, "/admin/requests?phone=09&page=2")
            }
            ListScreen::Page(_) => panic!("expected a redirect"),
        }
    }

    #[tokio::test]
    async fn expired_token_on_search_is_unauthorized() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_search_requests()
            .returning(|_| Err(GatewayError::server(401, "Hết phiên")));
        let store = NotificationStore::new();
        let result = load_requests_page(&gateway, ListQuery::default(), &store).await;
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[tokio::test]
    async fn approving_patches_row_and_notifies() {
        let mut gateway = MockGateway::new();
        two_rows(&mut gateway, 2);
        gateway
            .expect_mark_processed()
            .withf(|code, user| code.as_str() == "RQ2" && user == "admin")
            .times(1)
            .returning(|_, _| Ok(()));
        let store = NotificationStore::new();
        let code = RequestCode::new("RQ2").unwrap();
        let location = approve_request(&gateway, "admin", &code, ListQuery::default(), &store)
            .await
            .unwrap();
        assert_eq!(location, "/admin/requests");
        assert_eq!(store.take().map(|n| n.kind), Some(NotificationKind::Success));
    }

    #[tokio::test]
    async fn detail_marks_processed_failure_is_notified() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_mark_processed()
            .returning(|_, _| Err(GatewayError::server(400, "Yêu cầu đã bị xóa")));
        let store = NotificationStore::new();
        let result = mark_processed(&gateway, "admin", "RQ1", &store).await;
        assert!(matches!(result, Err(ServiceError::Gateway(_))));
        assert_eq!(
            store.take().map(|n| n.message).as_deref(),
            Some("Yêu cầu đã bị xóa")
        );
    }

    #[tokio::test]
    async fn export_ignores_pagination() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_export_requests()
            .withf(|query| query.page == 1 && query.filters.phone.as_deref() == Some("09"))
            .returning(|_| Ok(vec![0x50, 0x4b]));
        let query = ListQuery::<RequestFilters>::from_query_str("phone=09&page=4&pageSize=50");
        let bytes = export_requests(&gateway, query, &NotificationStore::new())
            .await
            .unwrap();
        assert_eq!(bytes, vec![0x50, 0x4b]);
    }
}
