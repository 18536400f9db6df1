use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{ActiveStatus, CategoryId, CategoryName};

/// Product category shown in the admin catalogue.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: CategoryId,
    pub name: CategoryName,
    pub status: ActiveStatus,
    pub created_date: Option<NaiveDateTime>,
    pub created_by_name: Option<String>,
}

/// Editable part of a category shared by create and update.
#[derive(Clone, Debug, PartialEq)]
pub struct CategoryDraft {
    pub name: CategoryName,
    pub status: ActiveStatus,
}

impl CategoryDraft {
    #[must_use]
    pub fn new(name: CategoryName, status: ActiveStatus) -> Self {
        Self { name, status }
    }
}

impl Category {
    /// Returns a copy with the draft applied, leaving audit fields intact.
    #[must_use]
    pub fn with_draft(&self, draft: &CategoryDraft) -> Self {
        Self {
            name: draft.name.clone(),
            status: draft.status,
            ..self.clone()
        }
    }
}
