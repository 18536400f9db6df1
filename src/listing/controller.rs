//! Generic controller behind every paginated admin table.
//!
//! A [`ListController`] owns the query of one screen, the rows currently
//! shown and the mutation calls. Backend access goes through a [`ListSource`];
//! failures are reported once, through the injected [`NotificationStore`].

use async_trait::async_trait;

use crate::gateway::errors::{GatewayError, GatewayResult};
use crate::listing::page::{PageView, ResultPage, clamp_page, last_page, with_query};
use crate::listing::query::{Filters, ListQuery, PAGE_KEY, PAGE_SIZE_KEY, PageSize};
use crate::notifications::NotificationStore;

pub const CREATE_SUCCESS: &str = "Lưu thành công";
pub const CREATE_FAILURE: &str = "Lưu thất bại";
pub const UPDATE_SUCCESS: &str = "Cập nhật thành công";
pub const UPDATE_FAILURE: &str = "Cập nhật thất bại";
pub const NOT_FOUND: &str = "Không tìm thấy dữ liệu.";

/// Row of a list screen, identified by an opaque key.
pub trait ListEntity: Clone + Send + Sync {
    type Key: PartialEq + Clone + Send + Sync;

    fn key(&self) -> Self::Key;
}

/// Backend operations behind one list screen. Operations a screen does not
/// offer keep the default, which reports [`GatewayError::Unsupported`].
#[async_trait]
pub trait ListSource: Send + Sync {
    type Entity: ListEntity;
    type Filters: Filters;
    type Draft: Send + Sync;

    async fn search(
        &self,
        query: &ListQuery<Self::Filters>,
    ) -> GatewayResult<ResultPage<Self::Entity>>;

    async fn create(&self, _draft: &Self::Draft) -> GatewayResult<Self::Entity> {
        Err(GatewayError::Unsupported)
    }

    async fn update(
        &self,
        _current: &Self::Entity,
        _draft: &Self::Draft,
    ) -> GatewayResult<Self::Entity> {
        Err(GatewayError::Unsupported)
    }

    /// Flips the soft status of `current` and returns the patched row.
    async fn toggle_status(&self, _current: &Self::Entity) -> GatewayResult<Self::Entity> {
        Err(GatewayError::Unsupported)
    }

    /// Spreadsheet bytes for all rows matching the filters of `query`.
    async fn export(&self, _query: &ListQuery<Self::Filters>) -> GatewayResult<Vec<u8>> {
        Err(GatewayError::Unsupported)
    }
}

/// Proof that a search was started; only the latest one may land.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

pub struct ListController<S: ListSource> {
    source: S,
    query: ListQuery<S::Filters>,
    items: Vec<S::Entity>,
    total: usize,
    generation: u64,
    session_expired: bool,
    notifications: NotificationStore,
}

impl<S: ListSource> ListController<S> {
    pub fn new(
        source: S,
        query: ListQuery<S::Filters>,
        notifications: NotificationStore,
    ) -> Self {
        Self {
            source,
            query,
            items: Vec::new(),
            total: 0,
            generation: 0,
            session_expired: false,
            notifications,
        }
    }

    pub fn query(&self) -> &ListQuery<S::Filters> {
        &self.query
    }

    pub fn items(&self) -> &[S::Entity] {
        &self.items
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Whether the last search was rejected because the token expired.
    pub fn session_expired(&self) -> bool {
        self.session_expired
    }

    pub fn last_page(&self) -> usize {
        last_page(self.total, self.query.page_size.get())
    }

    pub fn find(&self, key: &<S::Entity as ListEntity>::Key) -> Option<&S::Entity> {
        self.items.iter().find(|item| &item.key() == key)
    }

    /// Merges the supplied filters, resets to page 1.
    pub fn apply_filter(&mut self, pairs: &[(String, String)]) {
        self.query.filters.merge(pairs);
        self.query.page = 1;
    }

    /// Moves to page `n` clamped into `[1, last_page]`.
    pub fn go_to_page(&mut self, n: usize) {
        self.query.page = clamp_page(n, self.total, self.query.page_size.get());
    }

    pub fn change_page_size(&mut self, size: PageSize) {
        self.query.page_size = size;
        self.query.page = 1;
    }

    /// Applies a navigation form posted from a list screen. A page number
    /// wins over a page size, which wins over filters. Jumping to a page
    /// needs the total, so it searches first.
    pub async fn navigate(&mut self, pairs: &[(String, String)]) {
        let value = |key: &str| {
            pairs
                .iter()
                .find(|(name, _)| name == key)
                .and_then(|(_, raw)| raw.trim().parse::<usize>().ok())
        };
        if let Some(page) = value(PAGE_KEY) {
            self.fetch_page().await;
            self.go_to_page(page);
        } else if let Some(size) = value(PAGE_SIZE_KEY) {
            self.change_page_size(PageSize::try_from(size).unwrap_or_default());
        } else {
            self.apply_filter(pairs);
        }
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        FetchTicket(self.generation)
    }

    /// Applies a search result. Returns `false` when `ticket` is no longer
    /// current, in which case the result is dropped.
    pub fn finish_fetch(
        &mut self,
        ticket: FetchTicket,
        result: GatewayResult<ResultPage<S::Entity>>,
    ) -> bool {
        if ticket.0 != self.generation {
            log::debug!("Discarding stale search response {}", ticket.0);
            return false;
        }
        match result {
            Ok(page) => {
                self.items = page.items;
                self.total = page.total;
                self.session_expired = false;
            }
            Err(err) => {
                log::error!("Failed to search: {err}");
                self.items.clear();
                self.total = 0;
                self.session_expired = err.is_unauthorized();
                self.notifications.error(err.to_string());
            }
        }
        true
    }

    /// Runs exactly one search for the current query.
    pub async fn fetch_page(&mut self) {
        let ticket = self.begin_fetch();
        let result = self.source.search(&self.query).await;
        self.finish_fetch(ticket, result);
    }

    /// Query to redirect to when the fetched total leaves the current page
    /// out of range.
    pub fn clamped_query(&self) -> Option<ListQuery<S::Filters>> {
        let last = self.last_page();
        (self.query.page > last).then(|| {
            let mut query = self.query.clone();
            query.page = last;
            query
        })
    }

    /// Saves a new entity. On page 1 it is prepended locally; on any other
    /// page the query moves to page 1 and the caller re-fetches.
    pub async fn create(&mut self, draft: &S::Draft) -> GatewayResult<()> {
        match self.source.create(draft).await {
            Ok(entity) => {
                if self.query.page == 1 {
                    self.items.insert(0, entity);
                    self.items.truncate(self.query.page_size.get());
                } else {
                    self.query.page = 1;
                }
                self.total += 1;
                self.notifications.success(CREATE_SUCCESS);
                Ok(())
            }
            Err(err) => {
                log::error!("Failed to create: {err}");
                self.notify_failure(&err, CREATE_FAILURE);
                Err(err)
            }
        }
    }

    /// Updates the row with `key` in place.
    pub async fn update(
        &mut self,
        key: &<S::Entity as ListEntity>::Key,
        draft: &S::Draft,
    ) -> GatewayResult<()> {
        let Some(index) = self.position(key) else {
            self.notifications.error(NOT_FOUND);
            return Err(GatewayError::server(404, NOT_FOUND));
        };
        match self.source.update(&self.items[index], draft).await {
            Ok(entity) => {
                self.items[index] = entity;
                self.notifications.success(UPDATE_SUCCESS);
                Ok(())
            }
            Err(err) => {
                log::error!("Failed to update: {err}");
                self.notify_failure(&err, UPDATE_FAILURE);
                Err(err)
            }
        }
    }

    /// Flips the status of the row with `key`; no other row changes.
    pub async fn toggle_status(
        &mut self,
        key: &<S::Entity as ListEntity>::Key,
    ) -> GatewayResult<()> {
        let Some(index) = self.position(key) else {
            self.notifications.error(NOT_FOUND);
            return Err(GatewayError::server(404, NOT_FOUND));
        };
        match self.source.toggle_status(&self.items[index]).await {
            Ok(entity) => {
                self.items[index] = entity;
                self.notifications.success(UPDATE_SUCCESS);
                Ok(())
            }
            Err(err) => {
                log::error!("Failed to toggle status: {err}");
                self.notify_failure(&err, UPDATE_FAILURE);
                Err(err)
            }
        }
    }

    /// Exports every row matching the current filters, ignoring pagination.
    pub async fn export_current_view(&self) -> GatewayResult<Vec<u8>> {
        let query = ListQuery {
            filters: self.query.filters.clone(),
            ..ListQuery::default()
        };
        self.source.export(&query).await.inspect_err(|err| {
            log::error!("Failed to export: {err}");
            self.notifications.error(err.to_string());
        })
    }

    /// Address-bar location of the current view under `base_path`.
    pub fn location(&self, base_path: &str) -> String {
        with_query(base_path, &self.query.to_query_string())
    }

    pub fn page_view(&self, base_path: &str) -> PageView {
        PageView::new(base_path, &self.query, self.total)
    }

    fn position(&self, key: &<S::Entity as ListEntity>::Key) -> Option<usize> {
        self.items.iter().position(|item| &item.key() == key)
    }

    fn notify_failure(&self, err: &GatewayError, fallback: &str) {
        let message = err.to_string();
        if message.trim().is_empty() {
            self.notifications.error(fallback);
        } else {
            self.notifications.error(message);
        }
    }
}
