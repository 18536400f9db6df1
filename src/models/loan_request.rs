use serde::{Deserialize, Serialize};

use crate::domain::loan_request::{LoanRequestDetail, LoanRequestSummary, RequestField};
use crate::domain::types::{ProcessState, RequestCode, TypeConstraintError};
use crate::models::envelope::KeyValueRecord;
use crate::models::parse_backend_date;

/// Row of `/api/request/search`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RequestSummaryRecord {
    pub request_code: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub is_processed: bool,
    #[serde(default)]
    pub created_date: Option<String>,
    /// Older backends only send the submitted fields.
    #[serde(default)]
    pub list_request_customer: Vec<KeyValueRecord>,
}

impl RequestSummaryRecord {
    fn field(&self, key: &str) -> Option<String> {
        self.list_request_customer
            .iter()
            .find(|field| field.key.eq_ignore_ascii_case(key))
            .and_then(|field| field.value.clone())
    }
}

impl TryFrom<RequestSummaryRecord> for LoanRequestSummary {
    type Error = TypeConstraintError;

    fn try_from(record: RequestSummaryRecord) -> Result<Self, Self::Error> {
        let full_name = record
            .full_name
            .clone()
            .or_else(|| record.field("fullname"))
            .unwrap_or_default();
        let phone = record
            .phone
            .clone()
            .or_else(|| record.field("phone"))
            .unwrap_or_default();
        Ok(Self {
            request_code: RequestCode::new(record.request_code)?,
            phone,
            full_name,
            product_id: record.product_id,
            state: ProcessState::from_processed(record.is_processed),
            created_date: record.created_date.as_deref().and_then(parse_backend_date),
        })
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RequestCodePayload<'a> {
    pub request_code: &'a str,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedPayload<'a> {
    pub request_code: &'a str,
    pub user_name: &'a str,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RequestStatusRecord {
    #[serde(default)]
    pub is_processed: bool,
    /// The backend spells this flag `isDeleled`.
    #[serde(default, alias = "isDeleled")]
    pub is_deleted: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RequestDetailRow {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub request_code: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub created_date: Option<String>,
}

/// Payload of `/api/request/detail`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RequestDetailRecord {
    #[serde(default)]
    pub data: Option<RequestStatusRecord>,
    #[serde(default)]
    pub details: Vec<RequestDetailRow>,
}

impl RequestDetailRecord {
    pub fn into_domain(self, code: RequestCode) -> LoanRequestDetail {
        let status = self.data.unwrap_or(RequestStatusRecord {
            is_processed: false,
            is_deleted: false,
        });
        LoanRequestDetail {
            request_code: code,
            state: ProcessState::from_processed(status.is_processed),
            is_deleted: status.is_deleted,
            fields: self
                .details
                .into_iter()
                .map(|row| RequestField::new(row.key, row.value.unwrap_or_default()))
                .collect(),
        }
    }
}

/// Element of the `dataJson` part sent with a submission.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldPayload<'a> {
    pub key: &'a str,
    pub value: &'a str,
}

impl<'a> From<&'a RequestField> for FieldPayload<'a> {
    fn from(field: &'a RequestField) -> Self {
        Self {
            key: &field.key,
            value: &field.value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_falls_back_to_submitted_fields() {
        let record: RequestSummaryRecord = serde_json::from_str(
            r#"{"requestCode":"RQ1","productId":"p","createdDate":"2025-01-10T10:30:00Z",
                "listRequestCustomer":[{"key":"fullname","value":"Nguyễn An"},
                                       {"key":"phone","value":"0901"}]}"#,
        )
        .expect("valid record");
        let summary = LoanRequestSummary::try_from(record).expect("valid summary");
        assert_eq!(summary.full_name, "Nguyễn An");
        assert_eq!(summary.phone, "0901");
        assert_eq!(summary.state, ProcessState::Pending);
        assert!(summary.created_date.is_some());
    }

    #[test]
    fn empty_request_code_is_rejected() {
        let record: RequestSummaryRecord =
            serde_json::from_str(r#"{"requestCode":"  "}"#).expect("valid record");
        assert!(LoanRequestSummary::try_from(record).is_err());
    }

    #[test]
    fn detail_reads_misspelled_deleted_flag() {
        let record: RequestDetailRecord = serde_json::from_str(
            r#"{"data":{"isProcessed":true,"isDeleled":true},
                "details":[{"key":"fullname","value":"An"},{"key":"image1","value":null}]}"#,
        )
        .expect("valid record");
        let detail = record.into_domain(RequestCode::new("RQ1").expect("code"));
        assert!(detail.state.is_processed());
        assert!(detail.is_deleted);
        let values: Vec<_> = detail
            .fields
            .iter()
            .map(|field| (field.key.as_str(), field.value.as_str()))
            .collect();
        assert_eq!(values, [("fullname", "An"), ("image1", "")]);
    }
}
