use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{ActiveStatus, CategoryId, ProductId, ProductName};

/// Loan product offered on the public site.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub name: ProductName,
    pub category_id: Option<CategoryId>,
    pub category_name: Option<String>,
    /// Free-form amount description, e.g. `02 tỷ VND` or `Linh hoạt`.
    pub loan_amount: Option<String>,
    /// Free-form term description, e.g. `84 tháng`.
    pub loan_term: Option<String>,
    pub image_url: Option<String>,
    pub status: ActiveStatus,
    pub created_date: Option<NaiveDateTime>,
    pub created_by_name: Option<String>,
}

/// Editable part of a product shared by create and update.
#[derive(Clone, Debug, PartialEq)]
pub struct ProductDraft {
    pub name: ProductName,
    pub category_id: Option<CategoryId>,
    pub loan_amount: Option<String>,
    pub loan_term: Option<String>,
    pub image_url: Option<String>,
    pub status: ActiveStatus,
}

impl ProductDraft {
    #[must_use]
    pub fn new(
        name: ProductName,
        category_id: Option<CategoryId>,
        loan_amount: Option<String>,
        loan_term: Option<String>,
        image_url: Option<String>,
        status: ActiveStatus,
    ) -> Self {
        Self {
            name,
            category_id,
            loan_amount: loan_amount
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            loan_term: loan_term
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            image_url: image_url
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            status,
        }
    }
}

impl Product {
    /// Returns a copy with the draft applied. The category name is kept only
    /// when the category did not change.
    #[must_use]
    pub fn with_draft(&self, draft: &ProductDraft) -> Self {
        let category_name = if draft.category_id == self.category_id {
            self.category_name.clone()
        } else {
            None
        };
        Self {
            name: draft.name.clone(),
            category_id: draft.category_id.clone(),
            category_name,
            loan_amount: draft.loan_amount.clone(),
            loan_term: draft.loan_term.clone(),
            image_url: draft.image_url.clone(),
            status: draft.status,
            ..self.clone()
        }
    }
}
