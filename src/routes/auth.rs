use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::forms::auth::{ChangePasswordForm, LoginForm};
use crate::gateway::http::HttpGateway;
use crate::middleware::LOGIN_PATH;
use crate::notifications::NotificationStore;
use crate::routes::{admin_gateway, base_context, error_response, redirect, render_template};
use crate::services::ServiceError;
use crate::services::auth::{
    CHANGE_PASSWORD_PATH, DASHBOARD_PATH, LOGIN_SUCCESS, PASSWORD_CHANGED, change_password, login,
    logout,
};
use crate::session::{AdminSession, SessionState};

#[get("/admin/login")]
pub async fn show_login(
    state: SessionState,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    if state.admin().is_some() {
        return redirect(DASHBOARD_PATH);
    }
    let context = base_context(&flash_messages, &NotificationStore::new(), None, "login");
    render_template(&tera, "auth/login.html", &context)
}

#[post("/admin/login")]
pub async fn post_login(
    session: Session,
    mut state: SessionState,
    gateway: web::Data<HttpGateway>,
    web::Form(form): web::Form<LoginForm>,
) -> impl Responder {
    let auth = match login(gateway.get_ref(), form).await {
        Ok(auth) => auth,
        Err(ServiceError::Form(message)) => {
            FlashMessage::error(message).send();
            return redirect(LOGIN_PATH);
        }
        Err(err) => {
            log::error!("Failed to sign in: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    match state.login(&session, auth) {
        Ok(cookie) => {
            FlashMessage::success(LOGIN_SUCCESS).send();
            let mut response = redirect(DASHBOARD_PATH);
            if let Err(err) = response.add_cookie(&cookie) {
                log::error!("Failed to set auth cookie: {err}");
            }
            response
        }
        Err(err) => {
            log::error!("Failed to store session: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/admin/logout")]
pub async fn post_logout(
    req: HttpRequest,
    session: Session,
    gateway: web::Data<HttpGateway>,
) -> impl Responder {
    let mut state = SessionState::load(&req);
    if let Some(token) = state.token() {
        logout(&gateway.with_token(token)).await;
    }
    let cookie = state.logout(&session);
    let mut response = redirect(LOGIN_PATH);
    if let Err(err) = response.add_cookie(&cookie) {
        log::error!("Failed to clear auth cookie: {err}");
    }
    response
}

#[get("/admin/change-password")]
pub async fn show_change_password(
    admin: AdminSession,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let context = base_context(
        &flash_messages,
        &NotificationStore::new(),
        Some(&admin.0),
        "change_password",
    );
    render_template(&tera, "auth/change_password.html", &context)
}

#[post("/admin/change-password")]
pub async fn post_change_password(
    admin: AdminSession,
    gateway: web::Data<HttpGateway>,
    web::Form(form): web::Form<ChangePasswordForm>,
) -> impl Responder {
    let notifications = NotificationStore::new();
    let gateway = admin_gateway(&gateway, &admin);
    match change_password(&gateway, Some(admin.user_name()), form).await {
        Ok(()) => {
            FlashMessage::success(PASSWORD_CHANGED).send();
            redirect(CHANGE_PASSWORD_PATH)
        }
        Err(err) => error_response(err, &notifications, CHANGE_PASSWORD_PATH),
    }
}
