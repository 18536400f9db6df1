//! Rows and editor data of the category and product screens.

use serde::Serialize;

use crate::domain::category::Category;
use crate::domain::product::Product;
use crate::dto::display_date;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CategoryRow {
    pub id: String,
    pub name: String,
    pub inactive: bool,
    pub created_date: String,
    pub created_by_name: String,
}

impl From<&Category> for CategoryRow {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id.to_string(),
            name: category.name.to_string(),
            inactive: category.status.is_inactive(),
            created_date: display_date(category.created_date),
            created_by_name: category.created_by_name.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProductRow {
    pub id: String,
    pub name: String,
    pub category_id: String,
    pub category_name: String,
    pub loan_amount: String,
    pub loan_term: String,
    pub image_url: Option<String>,
    pub inactive: bool,
    pub created_date: String,
    pub created_by_name: String,
}

impl From<&Product> for ProductRow {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.to_string(),
            category_id: product
                .category_id
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            category_name: product.category_name.clone().unwrap_or_default(),
            loan_amount: product.loan_amount.clone().unwrap_or_default(),
            loan_term: product.loan_term.clone().unwrap_or_default(),
            image_url: product.image_url.clone(),
            inactive: product.status.is_inactive(),
            created_date: display_date(product.created_date),
            created_by_name: product.created_by_name.clone().unwrap_or_default(),
        }
    }
}

/// Choice in the product editor's category select.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CategoryOption {
    pub id: String,
    pub name: String,
}

/// Product editor page. `product` is `None` when creating.
#[derive(Debug, Serialize)]
pub struct ProductEditorData {
    pub product: Option<ProductRow>,
    pub categories: Vec<CategoryOption>,
    pub return_query: String,
}
