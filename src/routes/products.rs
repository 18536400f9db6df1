use actix_web::{HttpRequest, Responder, get, post, web};
use actix_web_flash_messages::IncomingFlashMessages;
use serde::Deserialize;
use tera::Tera;

use crate::dto::ListScreen;
use crate::forms::products::{ProductKeyForm, SaveProductForm};
use crate::forms::split_return_query;
use crate::gateway::http::HttpGateway;
use crate::listing::ListQuery;
use crate::listing::page::with_query;
use crate::notifications::NotificationStore;
use crate::routes::{
    admin_gateway, base_context, error_response, redirect, redirect_with, render_template,
};
use crate::services::products::{
    PRODUCTS_PATH, load_product_editor, load_products_page, navigate_products, save_product,
    toggle_product,
};
use crate::session::AdminSession;

#[derive(Deserialize)]
struct EditorQueryParams {
    #[serde(default)]
    return_query: String,
}

#[get("/admin/products")]
pub async fn show_products_admin(
    req: HttpRequest,
    admin: AdminSession,
    gateway: web::Data<HttpGateway>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let notifications = NotificationStore::new();
    let gateway = admin_gateway(&gateway, &admin);
    let query = ListQuery::from_query_str(req.query_string());
    let page = match load_products_page(&gateway, query, &notifications).await {
        Ok(ListScreen::Page(page)) => page,
        Ok(ListScreen::Redirect(location)) => return redirect(&location),
        Err(err) => return error_response(err, &notifications, PRODUCTS_PATH),
    };

    let mut context = base_context(&flash_messages, &notifications, Some(&admin.0), "products");
    context.insert("page", &page);
    render_template(&tera, "products/index.html", &context)
}

#[post("/admin/products/navigate")]
pub async fn navigate_products_view(
    admin: AdminSession,
    gateway: web::Data<HttpGateway>,
    web::Form(pairs): web::Form<Vec<(String, String)>>,
) -> impl Responder {
    let notifications = NotificationStore::new();
    let gateway = admin_gateway(&gateway, &admin);
    let (return_query, pairs) = split_return_query(pairs);
    let query = ListQuery::from_query_str(&return_query);
    let location = navigate_products(&gateway, query, &pairs, &notifications).await;
    redirect_with(&notifications, &location)
}

#[post("/admin/products/save")]
pub async fn save_product_editor(
    admin: AdminSession,
    gateway: web::Data<HttpGateway>,
    web::Form(form): web::Form<SaveProductForm>,
) -> impl Responder {
    let notifications = NotificationStore::new();
    let gateway = admin_gateway(&gateway, &admin);
    let back = with_query(PRODUCTS_PATH, &form.return_query);
    let user_name = admin.user_name();
    match save_product(&gateway, user_name, form, &notifications).await {
        Ok(location) => redirect_with(&notifications, &location),
        Err(err) => error_response(err, &notifications, &back),
    }
}

#[post("/admin/products/toggle")]
pub async fn toggle_product_row(
    admin: AdminSession,
    gateway: web::Data<HttpGateway>,
    web::Form(form): web::Form<ProductKeyForm>,
) -> impl Responder {
    let notifications = NotificationStore::new();
    let gateway = admin_gateway(&gateway, &admin);
    let back = with_query(PRODUCTS_PATH, &form.return_query);
    let query = ListQuery::from_query_str(&form.return_query);
    let user_name = admin.user_name();
    match toggle_product(&gateway, user_name, &form.id, query, &notifications).await {
        Ok(location) => redirect_with(&notifications, &location),
        Err(err) => error_response(err, &notifications, &back),
    }
}

#[get("/admin/products/{id}")]
pub async fn show_product_editor(
    id: web::Path<String>,
    params: web::Query<EditorQueryParams>,
    admin: AdminSession,
    gateway: web::Data<HttpGateway>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let notifications = NotificationStore::new();
    let gateway = admin_gateway(&gateway, &admin);
    let return_query = params.into_inner().return_query;
    let back = with_query(PRODUCTS_PATH, &return_query);
    let editor = match load_product_editor(&gateway, &id, return_query).await {
        Ok(editor) => editor,
        Err(err) => return error_response(err, &notifications, &back),
    };

    let mut context = base_context(&flash_messages, &notifications, Some(&admin.0), "products");
    context.insert("editor", &editor);
    context.insert("back", &back);
    render_template(&tera, "products/editor.html", &context)
}
