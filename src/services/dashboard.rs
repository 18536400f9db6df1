//! Back-office landing page with request counters.

use serde::Serialize;

use crate::gateway::LoanRequestReader;
use crate::listing::{ListQuery, PageSize, RequestFilters};
use crate::services::ServiceResult;

#[derive(Debug, Default, Serialize, PartialEq, Eq)]
pub struct DashboardData {
    pub total: usize,
    pub pending: usize,
    pub processed: usize,
}

async fn count<R>(gateway: &R, is_processed: Option<bool>) -> ServiceResult<usize>
where
    R: LoanRequestReader + ?Sized,
{
    let query = ListQuery {
        filters: RequestFilters {
            is_processed,
            ..RequestFilters::default()
        },
        page: 1,
        page_size: PageSize::Five,
    };
    let page = gateway.search_requests(&query).await.map_err(|err| {
        log::error!("Failed to count requests: {err}");
        err
    })?;
    Ok(page.total)
}

pub async fn load_dashboard<R>(gateway: &R) -> ServiceResult<DashboardData>
where
    R: LoanRequestReader + ?Sized,
{
    Ok(DashboardData {
        total: count(gateway, None).await?,
        pending: count(gateway, Some(false)).await?,
        processed: count(gateway, Some(true)).await?,
    })
}
