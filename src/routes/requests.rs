use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::domain::types::RequestCode;
use crate::dto::ListScreen;
use crate::forms::requests::{RequestDetailQuery, RequestKeyForm};
use crate::forms::{RETURN_QUERY_FIELD, split_return_query};
use crate::gateway::http::HttpGateway;
use crate::listing::page::with_query;
use crate::listing::query::encode_pairs;
use crate::listing::{ListQuery, RequestFilters};
use crate::notifications::NotificationStore;
use crate::routes::{
    admin_gateway, base_context, error_response, redirect, redirect_with, render_template,
};
use crate::services::ServiceError;
use crate::services::requests::{
    EXPORT_FILE_NAME, REQUESTS_PATH, approve_request, export_requests, load_request_detail,
    load_requests_page, mark_processed, navigate_requests,
};
use crate::session::AdminSession;

const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[get("/admin/requests")]
pub async fn show_requests(
    req: HttpRequest,
    admin: AdminSession,
    gateway: web::Data<HttpGateway>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let notifications = NotificationStore::new();
    let gateway = admin_gateway(&gateway, &admin);
    let query = ListQuery::<RequestFilters>::from_query_str(req.query_string());
    let page = match load_requests_page(&gateway, query, &notifications).await {
        Ok(ListScreen::Page(page)) => page,
        Ok(ListScreen::Redirect(location)) => return redirect(&location),
        Err(err) => return error_response(err, &notifications, REQUESTS_PATH),
    };

    let mut context = base_context(&flash_messages, &notifications, Some(&admin.0), "requests");
    context.insert("page", &page);
    render_template(&tera, "requests/index.html", &context)
}

#[post("/admin/requests/navigate")]
pub async fn navigate_requests_view(
    admin: AdminSession,
    gateway: web::Data<HttpGateway>,
    web::Form(pairs): web::Form<Vec<(String, String)>>,
) -> impl Responder {
    let notifications = NotificationStore::new();
    let gateway = admin_gateway(&gateway, &admin);
    let (return_query, pairs) = split_return_query(pairs);
    let query = ListQuery::from_query_str(&return_query);
    let location = navigate_requests(&gateway, query, &pairs, &notifications).await;
    redirect_with(&notifications, &location)
}

#[post("/admin/requests/approve")]
pub async fn approve_request_row(
    admin: AdminSession,
    gateway: web::Data<HttpGateway>,
    web::Form(form): web::Form<RequestKeyForm>,
) -> impl Responder {
    let notifications = NotificationStore::new();
    let gateway = admin_gateway(&gateway, &admin);
    let back = with_query(REQUESTS_PATH, &form.return_query);
    let Ok(code) = RequestCode::new(form.request_code) else {
        return error_response(ServiceError::NotFound, &notifications, &back);
    };
    let query = ListQuery::from_query_str(&form.return_query);
    let user_name = admin.user_name();
    match approve_request(&gateway, user_name, &code, query, &notifications).await {
        Ok(location) => redirect_with(&notifications, &location),
        Err(err) => error_response(err, &notifications, &back),
    }
}

#[get("/admin/requests/export")]
pub async fn export_requests_view(
    req: HttpRequest,
    admin: AdminSession,
    gateway: web::Data<HttpGateway>,
) -> impl Responder {
    let notifications = NotificationStore::new();
    let gateway = admin_gateway(&gateway, &admin);
    let query = ListQuery::<RequestFilters>::from_query_str(req.query_string());
    let back = with_query(REQUESTS_PATH, &query.to_query_string());
    match export_requests(&gateway, query, &notifications).await {
        Ok(bytes) => HttpResponse::Ok()
            .content_type(XLSX_CONTENT_TYPE)
            .insert_header(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(EXPORT_FILE_NAME.to_string())],
            })
            .body(bytes),
        Err(err) => error_response(err, &notifications, &back),
    }
}

#[get("/admin/requests/{code}")]
pub async fn show_request(
    code: web::Path<String>,
    params: web::Query<RequestDetailQuery>,
    admin: AdminSession,
    gateway: web::Data<HttpGateway>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let notifications = NotificationStore::new();
    let gateway = admin_gateway(&gateway, &admin);
    let return_query = params.into_inner().return_query;
    let back = with_query(REQUESTS_PATH, &return_query);
    let detail = match load_request_detail(&gateway, &code, return_query).await {
        Ok(detail) => detail,
        Err(err) => return error_response(err, &notifications, &back),
    };

    let mut context = base_context(&flash_messages, &notifications, Some(&admin.0), "requests");
    context.insert("detail", &detail);
    context.insert("back", &back);
    render_template(&tera, "requests/detail.html", &context)
}

#[post("/admin/requests/{code}/processed")]
pub async fn mark_request_processed(
    code: web::Path<String>,
    admin: AdminSession,
    gateway: web::Data<HttpGateway>,
    web::Form(form): web::Form<RequestDetailQuery>,
) -> impl Responder {
    let notifications = NotificationStore::new();
    let gateway = admin_gateway(&gateway, &admin);
    let detail_path = with_query(
        &format!("{REQUESTS_PATH}/{code}"),
        &encode_pairs(&[(RETURN_QUERY_FIELD.to_string(), form.return_query)]),
    );
    let user_name = admin.user_name();
    match mark_processed(&gateway, user_name, &code, &notifications).await {
        Ok(()) => redirect_with(&notifications, &detail_path),
        Err(ServiceError::Unauthorized) => {
            error_response(ServiceError::Unauthorized, &notifications, &detail_path)
        }
        Err(_) => redirect_with(&notifications, &detail_path),
    }
}
