use actix_web::{HttpRequest, Responder, get, post, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::dto::ListScreen;
use crate::forms::categories::{CategoryKeyForm, SaveCategoryForm};
use crate::forms::split_return_query;
use crate::gateway::http::HttpGateway;
use crate::listing::ListQuery;
use crate::listing::page::with_query;
use crate::notifications::NotificationStore;
use crate::routes::{
    admin_gateway, base_context, error_response, redirect, redirect_with, render_template,
};
use crate::services::categories::{
    CATEGORIES_PATH, load_categories_page, navigate_categories, save_category, toggle_category,
};
use crate::session::AdminSession;

#[get("/admin/categories")]
pub async fn show_categories(
    req: HttpRequest,
    admin: AdminSession,
    gateway: web::Data<HttpGateway>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let notifications = NotificationStore::new();
    let gateway = admin_gateway(&gateway, &admin);
    let query = ListQuery::from_query_str(req.query_string());
    let page = match load_categories_page(&gateway, query, &notifications).await {
        Ok(ListScreen::Page(page)) => page,
        Ok(ListScreen::Redirect(location)) => return redirect(&location),
        Err(err) => return error_response(err, &notifications, CATEGORIES_PATH),
    };

    let mut context = base_context(&flash_messages, &notifications, Some(&admin.0), "categories");
    context.insert("page", &page);
    render_template(&tera, "categories/index.html", &context)
}

#[post("/admin/categories/navigate")]
pub async fn navigate_categories_view(
    admin: AdminSession,
    gateway: web::Data<HttpGateway>,
    web::Form(pairs): web::Form<Vec<(String, String)>>,
) -> impl Responder {
    let notifications = NotificationStore::new();
    let gateway = admin_gateway(&gateway, &admin);
    let (return_query, pairs) = split_return_query(pairs);
    let query = ListQuery::from_query_str(&return_query);
    let location = navigate_categories(&gateway, query, &pairs, &notifications).await;
    redirect_with(&notifications, &location)
}

#[post("/admin/categories/save")]
pub async fn save_category_row(
    admin: AdminSession,
    gateway: web::Data<HttpGateway>,
    web::Form(form): web::Form<SaveCategoryForm>,
) -> impl Responder {
    let notifications = NotificationStore::new();
    let gateway = admin_gateway(&gateway, &admin);
    let back = with_query(CATEGORIES_PATH, &form.return_query);
    let user_name = admin.user_name();
    match save_category(&gateway, user_name, form, &notifications).await {
        Ok(location) => redirect_with(&notifications, &location),
        Err(err) => error_response(err, &notifications, &back),
    }
}

#[post("/admin/categories/toggle")]
pub async fn toggle_category_row(
    admin: AdminSession,
    gateway: web::Data<HttpGateway>,
    web::Form(form): web::Form<CategoryKeyForm>,
) -> impl Responder {
    let notifications = NotificationStore::new();
    let gateway = admin_gateway(&gateway, &admin);
    let back = with_query(CATEGORIES_PATH, &form.return_query);
    let query = ListQuery::from_query_str(&form.return_query);
    let user_name = admin.user_name();
    match toggle_category(&gateway, user_name, &form.id, query, &notifications).await {
        Ok(location) => redirect_with(&notifications, &location),
        Err(err) => error_response(err, &notifications, &back),
    }
}
