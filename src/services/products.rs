//! Loan product table, product editor and the public catalogue.

use async_trait::async_trait;

use crate::domain::product::{Product, ProductDraft};
use crate::domain::types::ProductId;
use crate::dto::catalogue::{CategoryOption, ProductEditorData, ProductRow};
use crate::dto::{ListPageData, ListScreen};
use crate::forms::products::{ProductPayload, SaveProductForm};
use crate::gateway::errors::GatewayResult;
use crate::gateway::{CategoryReader, ProductReader, ProductWriter};
use crate::listing::controller::{UPDATE_FAILURE, UPDATE_SUCCESS};
use crate::listing::page::with_query;
use crate::listing::{KeywordFilters, ListController, ListEntity, ListQuery, ListSource, ResultPage};
use crate::notifications::NotificationStore;
use crate::services::categories::list_active_categories;
use crate::services::{ServiceError, ServiceResult};

pub const PRODUCTS_PATH: &str = "/admin/products";
pub const PUBLIC_PRODUCTS_PATH: &str = "/products";

impl ListEntity for Product {
    type Key = ProductId;

    fn key(&self) -> ProductId {
        self.id.clone()
    }
}

pub struct ProductSource<'a, R: ?Sized> {
    gateway: &'a R,
    user_name: String,
}

impl<'a, R: ?Sized> ProductSource<'a, R> {
    pub fn new(gateway: &'a R, user_name: impl Into<String>) -> Self {
        Self {
            gateway,
            user_name: user_name.into(),
        }
    }
}

#[async_trait]
impl<R> ListSource for ProductSource<'_, R>
where
    R: ProductReader + ProductWriter + ?Sized,
{
    type Entity = Product;
    type Filters = KeywordFilters;
    type Draft = ProductDraft;

    async fn search(
        &self,
        query: &ListQuery<KeywordFilters>,
    ) -> GatewayResult<ResultPage<Product>> {
        self.gateway.search_products(query).await
    }

    async fn create(&self, draft: &ProductDraft) -> GatewayResult<Product> {
        let id = self.gateway.create_product(draft, &self.user_name).await?;
        Ok(Product {
            id,
            name: draft.name.clone(),
            category_id: draft.category_id.clone(),
            category_name: None,
            loan_amount: draft.loan_amount.clone(),
            loan_term: draft.loan_term.clone(),
            image_url: draft.image_url.clone(),
            status: draft.status,
            created_date: Some(chrono::Local::now().naive_local()),
            created_by_name: Some(self.user_name.clone()),
        })
    }

    async fn update(&self, current: &Product, draft: &ProductDraft) -> GatewayResult<Product> {
        self.gateway
            .update_product(&current.id, draft, &self.user_name)
            .await?;
        Ok(current.with_draft(draft))
    }

    async fn toggle_status(&self, current: &Product) -> GatewayResult<Product> {
        self.gateway.toggle_product_active(&current.id).await?;
        Ok(Product {
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
) -> ListController<ProductSource<'a, R>>
where
    R: ProductReader + ProductWriter + ?Sized,
{
    ListController::new(
        ProductSource::new(gateway, user_name),
        query,
        notifications.clone(),
    )
}

pub async fn load_products_page<R>(
    gateway: &R,
    query: ListQuery<KeywordFilters>,
    notifications: &NotificationStore,
) -> ServiceResult<ListScreen<ProductRow>>
where
    R: ProductReader + ProductWriter + ?Sized,
{
    load_page(gateway, PRODUCTS_PATH, query, notifications).await
}

/// Public catalogue. Inactive products are hidden.
pub async fn load_public_products<R>(
    gateway: &R,
    query: ListQuery<KeywordFilters>,
    notifications: &NotificationStore,
) -> ServiceResult<ListScreen<ProductRow>>
where
    R: ProductReader + ProductWriter + ?Sized,
{
    let mut screen = load_page(gateway, PUBLIC_PRODUCTS_PATH, query, notifications).await?;
    if let ListScreen::Page(page) = &mut screen {
        page.rows.retain(|row| !row.inactive);
    }
    Ok(screen)
}

async fn load_page<R>(
    gateway: &R,
    base_path: &str,
    query: ListQuery<KeywordFilters>,
    notifications: &NotificationStore,
) -> ServiceResult<ListScreen<ProductRow>>
where
    R: ProductReader + ProductWriter + ?Sized,
{
    let mut controller = controller(gateway, "", query, notifications);
    controller.fetch_page().await;
    if controller.session_expired() {
        return Err(ServiceError::Unauthorized);
    }
    if let Some(clamped) = controller.clamped_query() {
        return Ok(ListScreen::Redirect(with_query(
            base_path,
            &clamped.to_query_string(),
        )));
    }
    Ok(ListScreen::Page(ListPageData::from_controller(
        &controller,
        base_path,
        |product| ProductRow::from(product),
    )))
}

pub async fn navigate_products<R>(
    gateway: &R,
    query: ListQuery<KeywordFilters>,
    pairs: &[(String, String)],
    notifications: &NotificationStore,
) -> String
where
    R: ProductReader + ProductWriter + ?Sized,
{
    let mut controller = controller(gateway, "", query, notifications);
    controller.navigate(pairs).await;
    controller.location(PRODUCTS_PATH)
}

/// Active products featured on the home page.
pub async fn load_featured_products<R>(gateway: &R, limit: usize) -> ServiceResult<Vec<ProductRow>>
where
    R: ProductReader + ?Sized,
{
    let page = gateway
        .search_products(&ListQuery::default())
        .await
        .map_err(|err| {
            log::error!("Failed to load featured products: {err}");
            err
        })?;
    Ok(page
        .items
        .iter()
        .filter(|product| !product.status.is_inactive())
        .take(limit)
        .map(ProductRow::from)
        .collect())
}

/// Product shown on the public detail page; inactive products are hidden.
pub async fn load_public_product<R>(gateway: &R, id: &str) -> ServiceResult<ProductRow>
where
    R: ProductReader + ?Sized,
{
    let id = ProductId::new(id).map_err(|_| ServiceError::NotFound)?;
    let product = gateway.get_product(&id).await.map_err(|err| {
        log::error!("Failed to load product {id}: {err}");
        err
    })?;
    if product.status.is_inactive() {
        return Err(ServiceError::NotFound);
    }
    Ok(ProductRow::from(&product))
}

/// Editor for product `id`, or a blank editor when `id` is `new`.
pub async fn load_product_editor<R>(
    gateway: &R,
    id: &str,
    return_query: String,
) -> ServiceResult<ProductEditorData>
where
    R: ProductReader + CategoryReader + ?Sized,
{
    let product = if id == "new" {
        None
    } else {
        let id = ProductId::new(id).map_err(|_| ServiceError::NotFound)?;
        let product = gateway.get_product(&id).await.map_err(|err| {
            log::error!("Failed to load product {id}: {err}");
            err
        })?;
        Some(ProductRow::from(&product))
    };
    let categories = list_active_categories(gateway)
        .await?
        .into_iter()
        .map(|category| CategoryOption {
            id: category.id.to_string(),
            name: category.name.to_string(),
        })
        .collect();
    Ok(ProductEditorData {
        product,
        categories,
        return_query,
    })
}

/// Saves the product editor and returns the list location to go back to.
///
/// Updates go through the list controller when the product is on the page
/// the editor was opened from; otherwise the backend is called directly.
pub async fn save_product<R>(
    gateway: &R,
    user_name: &str,
    form: SaveProductForm,
    notifications: &NotificationStore,
) -> ServiceResult<String>
where
    R: ProductReader + ProductWriter + ?Sized,
{
    let query = ListQuery::from_query_str(&form.return_query);
    let payload = ProductPayload::try_from(form).map_err(|err| {
        log::error!("Failed to validate product form: {err}");
        ServiceError::from(err)
    })?;

    let mut controller = controller(gateway, user_name, query, notifications);
    let result = match &payload.id {
        None => controller.create(&payload.draft).await,
        Some(id) => {
            controller.fetch_page().await;
            if controller.find(id).is_some() {
                controller.update(id, &payload.draft).await
            } else {
                update_directly(gateway, user_name, id, &payload.draft, notifications).await
            }
        }
    };
    match result {
        Err(err) if err.is_unauthorized() => Err(err.into()),
        _ => Ok(controller.location(PRODUCTS_PATH)),
    }
}

async fn update_directly<R>(
    gateway: &R,
    user_name: &str,
    id: &ProductId,
    draft: &ProductDraft,
    notifications: &NotificationStore,
) -> GatewayResult<()>
where
    R: ProductWriter + ?Sized,
{
    match gateway.update_product(id, draft, user_name).await {
        Ok(()) => {
            notifications.success(UPDATE_SUCCESS);
            Ok(())
        }
        Err(err) => {
            log::error!("Failed to update product {id}: {err}");
            let message = err.to_string();
            notifications.error(if message.trim().is_empty() {
                UPDATE_FAILURE.to_string()
            } else {
                message
            });
            Err(err)
        }
    }
}

pub async fn toggle_product<R>(
    gateway: &R,
    user_name: &str,
    id: &str,
    query: ListQuery<KeywordFilters>,
    notifications: &NotificationStore,
) -> ServiceResult<String>
where
    R: ProductReader + ProductWriter + ?Sized,
{
    let id = ProductId::new(id).map_err(|_| ServiceError::NotFound)?;
    let mut controller = controller(gateway, user_name, query, notifications);
    controller.fetch_page().await;
    match controller.toggle_status(&id).await {
        Err(err) if err.is_unauthorized() => Err(err.into()),
        _ => Ok(controller.location(PRODUCTS_PATH)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::category::Category;
    use crate::domain::types::{ActiveStatus, CategoryId, CategoryName, ProductName};
    use crate::gateway::mock::MockGateway;
    use crate::notifications::NotificationKind;

    fn product(id: &str, status: ActiveStatus) -> Product {
        Product {
            id: ProductId::new(id).unwrap(),
            name: ProductName::new(format!("Sản phẩm {id}")).unwrap(),
            category_id: None,
            category_name: None,
            loan_amount: Some("Linh hoạt".into()),
            loan_term: Some("84 tháng".into()),
            image_url: None,
            status,
            created_date: None,
            created_by_name: None,
        }
    }

    fn form(id: &str) -> SaveProductForm {
        SaveProductForm {
            id: id.into(),
            name: "Vay tín chấp".into(),
            category_id: "c-1".into(),
            loan_amount: "".into(),
            loan_term: "".into(),
            image_url: "".into(),
            inactive: None,
            return_query: "".into(),
        }
    }

    #[tokio::test]
    async fn public_catalogue_hides_inactive_products() {
        let mut gateway = MockGateway::new();
        gateway.expect_search_products().returning(|_| {
            Ok(ResultPage::new(
                vec![
                    product("p1", ActiveStatus::Active),
                    product("p2", ActiveStatus::Inactive),
                ],
                2,
            ))
        });
        let screen = load_public_products(&gateway, ListQuery::default(), &NotificationStore::new())
            .await
            .unwrap();
        let ListScreen::Page(page) = screen else {
            panic!("expected a page");
        };
        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.rows[0].id, "p1");
    }

    #[tokio::test]
    async fn update_of_product_off_page_calls_backend_directly() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_search_products()
            .returning(|_| Ok(ResultPage::new(vec![product("p1", ActiveStatus::Active)], 1)));
        gateway
            .expect_update_product()
            .withf(|id, draft, _| id.as_str() == "p9" && draft.category_id.is_some())
            .times(1)
            .returning(|_, _, _| Ok(()));
        let store = NotificationStore::new();
        let location = save_product(&gateway, "admin", form("p9"), &store)
            .await
            .unwrap();
        assert_eq!(location, "/admin/products");
        assert_eq!(store.take().map(|n| n.kind), Some(NotificationKind::Success));
    }

    #[tokio::test]
    async fn editor_lists_only_active_categories() {
        let mut gateway = MockGateway::new();
        gateway.expect_search_categories().returning(|_| {
            let category = |id: &str, status| Category {
                id: CategoryId::new(id).unwrap(),
                name: CategoryName::new(id).unwrap(),
                status,
                created_date: None,
                created_by_name: None,
            };
            Ok(ResultPage::new(
                vec![
                    category("c-1", ActiveStatus::Active),
                    category("c-2", ActiveStatus::Inactive),
                ],
                2,
            ))
        });
        let editor = load_product_editor(&gateway, "new", String::new())
            .await
            .unwrap();
        assert!(editor.product.is_none());
        assert_eq!(editor.categories.len(), 1);
    }

    #[tokio::test]
    async fn inactive_product_is_not_public() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_get_product()
            .returning(|_| Ok(product("p2", ActiveStatus::Inactive)));
        let result = load_public_product(&gateway, "p2").await;
        assert!(matches!(result, Err(ServiceError::NotFound)));
    }
}
