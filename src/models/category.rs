use serde::{Deserialize, Serialize};

use crate::domain::category::{Category, CategoryDraft};
use crate::domain::types::{ActiveStatus, CategoryId, CategoryName, TypeConstraintError};
use crate::models::parse_backend_date;

/// Row of `/api/product/category/search`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub inactive: bool,
    #[serde(default)]
    pub created_date: Option<String>,
    #[serde(default)]
    pub created_by_name: Option<String>,
}

impl TryFrom<CategoryRecord> for Category {
    type Error = TypeConstraintError;

    fn try_from(record: CategoryRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: CategoryId::new(record.id)?,
            name: CategoryName::new(record.name)?,
            status: ActiveStatus::from_inactive(record.inactive),
            created_date: record.created_date.as_deref().and_then(parse_backend_date),
            created_by_name: record.created_by_name.filter(|name| !name.is_empty()),
        })
    }
}

/// Body of `POST` (without `id`) and `PUT` (with `id`) `/api/product/category`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<&'a str>,
    pub name: &'a str,
    pub inactive: bool,
    pub created_by: &'a str,
}

impl<'a> CategoryPayload<'a> {
    pub fn new(id: Option<&'a CategoryId>, draft: &'a CategoryDraft, created_by: &'a str) -> Self {
        Self {
            id: id.map(CategoryId::as_str),
            name: draft.name.as_str(),
            inactive: draft.status.is_inactive(),
            created_by,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_maps_inactive_flag() {
        let record: CategoryRecord = serde_json::from_str(
            r#"{"id":"c1","name":"Vay tiêu dùng","inactive":true,"createdByName":""}"#,
        )
        .expect("valid record");
        let category = Category::try_from(record).expect("valid category");
        assert_eq!(category.status, ActiveStatus::Inactive);
        assert_eq!(category.created_by_name, None);
    }

    #[test]
    fn create_payload_omits_id() {
        let draft = CategoryDraft::new(
            CategoryName::new("Vay mua ô tô").expect("name"),
            ActiveStatus::Active,
        );
        let json = serde_json::to_value(CategoryPayload::new(None, &draft, "admin"))
            .expect("serializable");
        assert_eq!(
            json,
            serde_json::json!({"name": "Vay mua ô tô", "inactive": false, "createdBy": "admin"})
        );
    }
}
