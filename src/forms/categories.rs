use serde::Deserialize;
use validator::Validate;

use crate::domain::category::CategoryDraft;
use crate::domain::types::{ActiveStatus, CategoryId, CategoryName};
use crate::forms::FormError;

#[derive(Debug, Deserialize, Validate)]
/// Inline create/edit form of the category table.
pub struct SaveCategoryForm {
    /// Empty for a new category.
    #[serde(default)]
    pub id: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Checkbox; present when ticked.
    #[serde(default)]
    pub inactive: Option<String>,
    /// Query string of the list the form was posted from.
    #[serde(default)]
    pub return_query: String,
}

/// Validated category form.
pub struct CategoryPayload {
    pub id: Option<CategoryId>,
    pub draft: CategoryDraft,
}

impl TryFrom<SaveCategoryForm> for CategoryPayload {
    type Error = FormError;

    fn try_from(form: SaveCategoryForm) -> Result<Self, Self::Error> {
        form.validate()?;
        let name = CategoryName::new(form.name).map_err(|_| FormError::InvalidName)?;
        let status = ActiveStatus::from_inactive(form.inactive.is_some());
        Ok(Self {
            id: CategoryId::new(form.id).ok(),
            draft: CategoryDraft::new(name, status),
        })
    }
}

#[derive(Debug, Deserialize)]
/// Row action form carrying only the key and the list to return to.
pub struct CategoryKeyForm {
    pub id: String,
    #[serde(default)]
    pub return_query: String,
}
