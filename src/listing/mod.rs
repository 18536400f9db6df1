//! Paginated list-search-mutate screens shared by the admin area.

pub mod controller;
pub mod page;
pub mod query;

pub use controller::{FetchTicket, ListController, ListEntity, ListSource};
pub use page::{PageView, ResultPage};
pub use query::{Filters, KeywordFilters, ListQuery, PageSize, RequestFilters};
