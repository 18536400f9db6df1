//! DTO modules that bridge services with templates.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::listing::{Filters, ListController, ListSource, PageView};

pub mod catalogue;
pub mod configuration;
pub mod loan_request;
pub mod public;
pub mod requests;

/// Audit timestamps as shown in the admin tables.
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y %H:%M";

pub fn display_date(date: Option<NaiveDateTime>) -> String {
    date.map(|date| date.format(DISPLAY_DATE_FORMAT).to_string())
        .unwrap_or_default()
}

/// Everything a list template needs besides the screen-specific row type.
#[derive(Debug, Serialize)]
pub struct ListPageData<T> {
    pub rows: Vec<T>,
    pub pagination: PageView,
    /// Current filter values keyed by wire name, for the search form.
    pub filters: BTreeMap<String, String>,
    /// Encoded query of this view, posted back by row actions.
    pub return_query: String,
}

impl<T> ListPageData<T> {
    pub fn from_controller<S, F>(controller: &ListController<S>, base_path: &str, row: F) -> Self
    where
        S: ListSource,
        F: Fn(&S::Entity) -> T,
    {
        let query = controller.query();
        Self {
            rows: controller.items().iter().map(row).collect(),
            pagination: controller.page_view(base_path),
            filters: query.filters.to_pairs().into_iter().collect(),
            return_query: query.to_query_string(),
        }
    }
}

/// Outcome of loading a list screen.
#[derive(Debug)]
pub enum ListScreen<T> {
    Page(ListPageData<T>),
    /// The requested page no longer exists; go here instead.
    Redirect(String),
}
