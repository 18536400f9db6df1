//! Product category table with inline create, edit and status toggle.

use async_trait::async_trait;

use crate::domain::category::{Category, CategoryDraft};
use crate::domain::types::CategoryId;
use crate::dto::catalogue::CategoryRow;
use crate::dto::{ListPageData, ListScreen};
use crate::forms::categories::{CategoryPayload, SaveCategoryForm};
use crate::gateway::errors::GatewayResult;
use crate::gateway::{CategoryReader, CategoryWriter};
use crate::listing::page::with_query;
use crate::listing::{
    KeywordFilters, ListController, ListEntity, ListQuery, ListSource, PageSize, ResultPage,
};
use crate::notifications::NotificationStore;
use crate::services::{ServiceError, ServiceResult};

pub const CATEGORIES_PATH: &str = "/admin/categories";

impl ListEntity for Category {
    type Key = CategoryId;

    fn key(&self) -> CategoryId {
        self.id.clone()
    }
}

pub struct CategorySource<'a, R: ?Sized> {
    gateway: &'a R,
    user_name: String,
}

impl<'a, R: ?Sized> CategorySource<'a, R> {
    pub fn new(gateway: &'a R, user_name: impl Into<String>) -> Self {
        Self {
            gateway,
            user_name: user_name.into(),
        }
    }
}

#[async_trait]
impl<R> ListSource for CategorySource<'_, R>
where
    R: CategoryReader + CategoryWriter + ?Sized,
{
    type Entity = Category;
    type Filters = KeywordFilters;
    type Draft = CategoryDraft;

    async fn search(
        &self,
        query: &ListQuery<KeywordFilters>,
    ) -> GatewayResult<ResultPage<Category>> {
        self.gateway.search_categories(query).await
    }

    async fn create(&self, draft: &CategoryDraft) -> GatewayResult<Category> {
        let id = self
            .gateway
            .create_category(draft, &self.user_name)
            .await?;
        Ok(Category {
            id,
            name: draft.name.clone(),
            status: draft.status,
            created_date: Some(chrono::Local::now().naive_local()),
            created_by_name: Some(self.user_name.clone()),
        })
    }

    async fn update(&self, current: &Category, draft: &CategoryDraft) -> GatewayResult<Category> {
        self.gateway
            .update_category(&current.id, draft, &self.user_name)
            .await?;
        Ok(current.with_draft(draft))
    }

    async fn toggle_status(&self, current: &Category) -> GatewayResult<Category> {
        self.gateway.toggle_category_active(&current.id).await?;
        Ok(Category {
            status: current.status.toggled(),
            ..current.clone()
        })
    }
}

fn controller<'a, R>(
    gateway: &'a R,
    user_name: &str,
    query: ListQuery<KeywordFilters>,
    notifications: &NotificationStore,
) -> ListController<CategorySource<'a, R>>
where
    R: CategoryReader + CategoryWriter + ?Sized,
{
    ListController::new(
        CategorySource::new(gateway, user_name),
        query,
        notifications.clone(),
    )
}

pub async fn load_categories_page<R>(
    gateway: &R,
    query: ListQuery<KeywordFilters>,
    notifications: &NotificationStore,
) -> ServiceResult<ListScreen<CategoryRow>>
where
    R: CategoryReader + CategoryWriter + ?Sized,
{
    let mut controller = controller(gateway, "", query, notifications);
    controller.fetch_page().await;
    if controller.session_expired() {
        return Err(ServiceError::Unauthorized);
    }
    if let Some(clamped) = controller.clamped_query() {
        return Ok(ListScreen::Redirect(with_query(
            CATEGORIES_PATH,
            &clamped.to_query_string(),
        )));
    }
    Ok(ListScreen::Page(ListPageData::from_controller(
        &controller,
        CATEGORIES_PATH,
        |category| CategoryRow::from(category),
    )))
}

pub async fn navigate_categories<R>(
    gateway: &R,
    query: ListQuery<KeywordFilters>,
    pairs: &[(String, String)],
    notifications: &NotificationStore,
) -> String
where
    R: CategoryReader + CategoryWriter + ?Sized,
{
    let mut controller = controller(gateway, "", query, notifications);
    controller.navigate(pairs).await;
    controller.location(CATEGORIES_PATH)
}

/// Creates or updates a category from the inline form and returns the list
/// location to go back to.
pub async fn save_category<R>(
    gateway: &R,
    user_name: &str,
    form: SaveCategoryForm,
    notifications: &NotificationStore,
) -> ServiceResult<String>
where
    R: CategoryReader + CategoryWriter + ?Sized,
{
    let query = ListQuery::from_query_str(&form.return_query);
    let payload = CategoryPayload::try_from(form).map_err(|err| {
        log::error!("Failed to validate category form: {err}");
        ServiceError::from(err)
    })?;

    let mut controller = controller(gateway, user_name, query, notifications);
    let result = match &payload.id {
        Some(id) => {
            controller.fetch_page().await;
            controller.update(id, &payload.draft).await
        }
        None => controller.create(&payload.draft).await,
    };
    match result {
        Err(err) if err.is_unauthorized() => Err(err.into()),
        _ => Ok(controller.location(CATEGORIES_PATH)),
    }
}

pub async fn toggle_category<R>(
    gateway: &R,
    user_name: &str,
    id: &str,
    query: ListQuery<KeywordFilters>,
    notifications: &NotificationStore,
) -> ServiceResult<String>
where
    R: CategoryReader + CategoryWriter + ?Sized,
{
    let id = CategoryId::new(id).map_err(|_| ServiceError::NotFound)?;
    let mut controller = controller(gateway, user_name, query, notifications);
    controller.fetch_page().await;
    match controller.toggle_status(&id).await {
        Err(err) if err.is_unauthorized() => Err(err.into()),
        _ => Ok(controller.location(CATEGORIES_PATH)),
    }
}

/// Every active category, for select inputs.
pub async fn list_active_categories<R>(gateway: &R) -> ServiceResult<Vec<Category>>
where
    R: CategoryReader + ?Sized,
{
    let query = ListQuery {
        page_size: PageSize::Fifty,
        ..ListQuery::default()
    };
    let page = gateway.search_categories(&query).await.map_err(|err| {
        log::error!("Failed to list categories: {err}");
        err
    })?;
    Ok(page
        .items
        .into_iter()
        .filter(|category| !category.status.is_inactive())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{ActiveStatus, CategoryName};
    use crate::gateway::GatewayError;
    use crate::gateway::mock::MockGateway;
    use crate::notifications::NotificationKind;

    fn category(id: &str, name: &str) -> Category {
        Category {
            id: CategoryId::new(id).unwrap(),
            name: CategoryName::new(name).unwrap(),
            status: ActiveStatus::Active,
            created_date: None,
            created_by_name: None,
        }
    }

    fn form(id: &str, name: &str, return_query: &str) -> SaveCategoryForm {
        SaveCategoryForm {
            id: id.into(),
            name: name.into(),
            inactive: None,
            return_query: return_query.into(),
        }
    }

    #[tokio::test]
    async fn page_lists_category_rows() {
        let mut gateway = MockGateway::new();
        gateway.expect_search_categories().times(1).returning(|_| {
            Ok(ResultPage::new(
                vec![category("c-1", "Vay mua nhà"), category("c-2", "Vay tiêu dùng")],
                2,
            ))
        });
        let screen = load_categories_page(&gateway, ListQuery::default(), &NotificationStore::new())
            .await
            .unwrap();
        let ListScreen::Page(page) = screen else {
            panic!("expected a page");
        };
        let names: Vec<_> = page.rows.iter().map(|row| row.name.as_str()).collect();
        assert_eq!(names, ["Vay mua nhà", "Vay tiêu dùng"]);
        assert!(!page.rows[0].inactive);
    }

    #[tokio::test]
    async fn create_on_first_page_skips_search() {
        let mut gateway = MockGateway::new();
        gateway.expect_search_categories().times(0);
        gateway
            .expect_create_category()
            .withf(|draft, user| draft.name.as_str() == "Vay mua nhà" && user == "admin")
            .returning(|_, _| Ok(CategoryId::new("c-9").unwrap()));
        let store = NotificationStore::new();
        let posted = form("", "Vay mua nhà", "keyword=vay");
        let location = save_category(&gateway, "admin", posted, &store).await.unwrap();
        assert_eq!(location, "/admin/categories?keyword=vay");
        let note = store.take().unwrap();
        assert_eq!(note.kind, NotificationKind::Success);
        assert_eq!(note.message, "Lưu thành công");
    }

    #[tokio::test]
    async fn create_on_later_page_returns_to_first_page() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_create_category()
            .returning(|_, _| Ok(CategoryId::new("c-9").unwrap()));
        let location = save_category(
            &gateway,
            "admin",
            form("", "Vay", "page=3&pageSize=20"),
            &NotificationStore::new(),
        )
        .await
        .unwrap();
        assert_eq!(location, "/admin/categories?pageSize=20");
    }

    #[tokio::test]
    async fn failed_update_shows_backend_message() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_search_categories()
            .returning(|_| Ok(ResultPage::new(vec![category("c-1", "Cũ")], 1)));
        gateway
            .expect_update_category()
            .returning(|_, _, _| Err(GatewayError::server(400, "Tên đã tồn tại")));
        let store = NotificationStore::new();
        save_category(&gateway, "admin", form("c-1", "Mới", ""), &store)
            .await
            .unwrap();
        assert_eq!(store.take().map(|n| n.message).as_deref(), Some("Tên đã tồn tại"));
    }

    #[tokio::test]
    async fn invalid_form_never_reaches_backend() {
        let mut gateway = MockGateway::new();
        gateway.expect_create_category().times(0);
        let store = NotificationStore::new();
        let result = save_category(&gateway, "admin", form("", " ", ""), &store).await;
        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[tokio::test]
    async fn toggle_calls_delete_endpoint_once() {
        let mut gateway = MockGateway::new();
        gateway.expect_search_categories().returning(|_| {
            Ok(ResultPage::new(
                vec![category("c-1", "A"), category("c-2", "B")],
                2,
            ))
        });
        gateway
            .expect_toggle_category_active()
            .withf(|id| id.as_str() == "c-2")
            .times(1)
            .returning(|_| Ok(()));
        let store = NotificationStore::new();
        toggle_category(&gateway, "admin", "c-2", ListQuery::default(), &store)
            .await
            .unwrap();
        assert_eq!(store.take().map(|n| n.kind), Some(NotificationKind::Success));
    }
}
