use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::dto::ListScreen;
use crate::dto::public::HomePageData;
use crate::gateway::http::HttpGateway;
use crate::listing::ListQuery;
use crate::notifications::NotificationStore;
use crate::routes::{public_context, redirect, redirect_with, render_template};
use crate::services::news::{NEWS_PLACEHOLDER_IMAGE, list_news, news_detail};
use crate::services::products::{
    PUBLIC_PRODUCTS_PATH, load_featured_products, load_public_product, load_public_products,
};

/// Number of products featured on the home page.
const FEATURED_PRODUCTS: usize = 6;

#[get("/")]
pub async fn show_home(
    session: Session,
    gateway: web::Data<HttpGateway>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let notifications = NotificationStore::new();
    let products = load_featured_products(gateway.get_ref(), FEATURED_PRODUCTS)
        .await
        .unwrap_or_else(|err| {
            log::warn!("Rendering home page without products: {err}");
            Vec::new()
        });
    let data = HomePageData::new(products, list_news());

    let mut context = public_context(
        &flash_messages,
        &notifications,
        &session,
        gateway.get_ref(),
        "home",
    )
    .await;
    context.insert("home", &data);
    context.insert("news_placeholder", NEWS_PLACEHOLDER_IMAGE);
    render_template(&tera, "main/index.html", &context)
}

#[get("/products")]
pub async fn show_products(
    req: HttpRequest,
    session: Session,
    gateway: web::Data<HttpGateway>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let notifications = NotificationStore::new();
    let query = ListQuery::from_query_str(req.query_string());
    let page = match load_public_products(gateway.get_ref(), query, &notifications).await {
        Ok(ListScreen::Page(page)) => page,
        Ok(ListScreen::Redirect(location)) => return redirect(&location),
        Err(err) => {
            log::error!("Failed to list products: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let mut context = public_context(
        &flash_messages,
        &notifications,
        &session,
        gateway.get_ref(),
        "products",
    )
    .await;
    context.insert("page", &page);
    render_template(&tera, "main/products.html", &context)
}

#[get("/product/{id}")]
pub async fn show_product(
    id: web::Path<String>,
    session: Session,
    gateway: web::Data<HttpGateway>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let notifications = NotificationStore::new();
    let product = match load_public_product(gateway.get_ref(), &id).await {
        Ok(product) => product,
        Err(err) => {
            log::warn!("Product {id} is not available: {err}");
            notifications.error("Sản phẩm không tồn tại hoặc đã ngừng cung cấp");
            return redirect_with(&notifications, PUBLIC_PRODUCTS_PATH);
        }
    };

    let mut context = public_context(
        &flash_messages,
        &notifications,
        &session,
        gateway.get_ref(),
        "products",
    )
    .await;
    context.insert("product", &product);
    render_template(&tera, "main/product.html", &context)
}

#[get("/news")]
pub async fn show_news(
    session: Session,
    gateway: web::Data<HttpGateway>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let notifications = NotificationStore::new();
    let mut context = public_context(
        &flash_messages,
        &notifications,
        &session,
        gateway.get_ref(),
        "news",
    )
    .await;
    context.insert("news", list_news());
    context.insert("news_placeholder", NEWS_PLACEHOLDER_IMAGE);
    render_template(&tera, "main/news.html", &context)
}

#[get("/news/{id}")]
pub async fn show_news_detail(
    id: web::Path<String>,
    session: Session,
    gateway: web::Data<HttpGateway>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let notifications = NotificationStore::new();
    let mut context = public_context(
        &flash_messages,
        &notifications,
        &session,
        gateway.get_ref(),
        "news",
    )
    .await;
    context.insert("article", news_detail(&id));
    context.insert("news_placeholder", NEWS_PLACEHOLDER_IMAGE);
    render_template(&tera, "main/news_detail.html", &context)
}
