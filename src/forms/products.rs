use serde::Deserialize;
use validator::Validate;

use crate::domain::product::ProductDraft;
use crate::domain::types::{ActiveStatus, CategoryId, ProductId, ProductName};
use crate::forms::FormError;

#[derive(Debug, Deserialize, Validate)]
/// Product editor form, shared by create and update.
pub struct SaveProductForm {
    /// Empty for a new product.
    #[serde(default)]
    pub id: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[serde(default)]
    pub category_id: String,
    #[serde(default)]
    pub loan_amount: String,
    #[serde(default)]
    pub loan_term: String,
    #[serde(default)]
    #[validate(length(max = 2048))]
    pub image_url: String,
    #[serde(default)]
    pub inactive: Option<String>,
    #[serde(default)]
    pub return_query: String,
}

/// Validated product form.
pub struct ProductPayload {
    pub id: Option<ProductId>,
    pub draft: ProductDraft,
}

impl TryFrom<SaveProductForm> for ProductPayload {
    type Error = FormError;

    fn try_from(form: SaveProductForm) -> Result<Self, Self::Error> {
        form.validate()?;
        let name = ProductName::new(form.name).map_err(|_| FormError::InvalidName)?;
        let status = ActiveStatus::from_inactive(form.inactive.is_some());
        Ok(Self {
            id: ProductId::new(form.id).ok(),
            draft: ProductDraft::new(
                name,
                CategoryId::new(form.category_id).ok(),
                Some(form.loan_amount),
                Some(form.loan_term),
                Some(form.image_url),
                status,
            ),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ProductKeyForm {
    pub id: String,
    #[serde(default)]
    pub return_query: String,
}
