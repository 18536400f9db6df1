//! Loan request table and detail page.

use serde::Serialize;

use crate::domain::loan_request::{LoanRequestDetail, LoanRequestSummary};
use crate::dto::display_date;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RequestRow {
    pub request_code: String,
    pub phone: String,
    pub full_name: String,
    pub product_id: String,
    pub is_processed: bool,
    pub state_label: &'static str,
    pub created_date: String,
}

impl From<&LoanRequestSummary> for RequestRow {
    fn from(summary: &LoanRequestSummary) -> Self {
        Self {
            request_code: summary.request_code.to_string(),
            phone: summary.phone.clone(),
            full_name: summary.full_name.clone(),
            product_id: summary.product_id.clone().unwrap_or_default(),
            is_processed: summary.state.is_processed(),
            state_label: summary.state.label(),
            created_date: display_date(summary.created_date),
        }
    }
}

/// One submitted field. Free text is sanitized before it reaches the page.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DetailField {
    pub key: String,
    pub label: String,
    pub value: String,
    pub image_urls: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RequestDetailData {
    pub request_code: String,
    pub is_processed: bool,
    pub state_label: &'static str,
    pub is_deleted: bool,
    pub fields: Vec<DetailField>,
    pub images: Vec<DetailField>,
    pub return_query: String,
}

impl RequestDetailData {
    pub fn new(detail: &LoanRequestDetail, return_query: String) -> Self {
        let (images, fields): (Vec<DetailField>, Vec<DetailField>) = detail
            .fields
            .iter()
            .map(|field| DetailField {
                key: field.key.clone(),
                label: ammonia::clean_text(field.label()),
                value: ammonia::clean_text(&field.value),
                image_urls: if field.is_image() {
                    field.image_urls()
                } else {
                    Vec::new()
                },
            })
            .partition(|field| !field.image_urls.is_empty());
        Self {
            request_code: detail.request_code.to_string(),
            is_processed: detail.state.is_processed(),
            state_label: detail.state.label(),
            is_deleted: detail.is_deleted,
            fields,
            images,
            return_query,
        }
    }
}
