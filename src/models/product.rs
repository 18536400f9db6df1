use serde::{Deserialize, Serialize};

use crate::domain::product::{Product, ProductDraft};
use crate::domain::types::{ActiveStatus, CategoryId, ProductId, ProductName, TypeConstraintError};
use crate::models::parse_backend_date;

/// Product as returned by `/api/product/search` and `/api/product/{id}`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub category_name: Option<String>,
    #[serde(default)]
    pub loan_amount: Option<String>,
    #[serde(default)]
    pub loan_term: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub inactive: bool,
    #[serde(default)]
    pub created_date: Option<String>,
    #[serde(default)]
    pub created_by_name: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl TryFrom<ProductRecord> for Product {
    type Error = TypeConstraintError;

    fn try_from(record: ProductRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ProductId::new(record.id)?,
            name: ProductName::new(record.name)?,
            category_id: non_empty(record.category_id)
                .map(CategoryId::new)
                .transpose()?,
            category_name: non_empty(record.category_name),
            loan_amount: non_empty(record.loan_amount),
            loan_term: non_empty(record.loan_term),
            image_url: non_empty(record.image_url),
            status: ActiveStatus::from_inactive(record.inactive),
            created_date: record.created_date.as_deref().and_then(parse_backend_date),
            created_by_name: non_empty(record.created_by_name),
        })
    }
}

/// Body of `POST`/`PUT` `/api/product`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<&'a str>,
    pub name: &'a str,
    pub category_id: Option<&'a str>,
    pub loan_amount: Option<&'a str>,
    pub loan_term: Option<&'a str>,
    pub image_url: Option<&'a str>,
    pub inactive: bool,
    pub created_by: &'a str,
}

impl<'a> ProductPayload<'a> {
    pub fn new(id: Option<&'a ProductId>, draft: &'a ProductDraft, created_by: &'a str) -> Self {
        Self {
            id: id.map(ProductId::as_str),
            name: draft.name.as_str(),
            category_id: draft.category_id.as_ref().map(CategoryId::as_str),
            loan_amount: draft.loan_amount.as_deref(),
            loan_term: draft.loan_term.as_deref(),
            image_url: draft.image_url.as_deref(),
            inactive: draft.status.is_inactive(),
            created_by,
        }
    }
}
