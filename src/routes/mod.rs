//! HTTP handlers. Each module maps one screen group onto its service.

use actix_session::Session;
use actix_web::http::header;
use actix_web::{HttpResponse, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages, Level};
use serde::Serialize;
use tera::{Context, Tera};

use crate::domain::account::AuthSession;
use crate::domain::configuration::WebConfig;
use crate::gateway::http::HttpGateway;
use crate::middleware::LOGIN_PATH;
use crate::notifications::{NotificationKind, NotificationStore};
use crate::services::configuration::load_web_config;
use crate::services::ServiceError;
use crate::session::{AdminSession, cache_web_config, cached_web_config};

pub mod auth;
pub mod categories;
pub mod configuration;
pub mod dashboard;
pub mod loan_request;
pub mod main;
pub mod products;
pub mod requests;

pub const SESSION_EXPIRED: &str = "Phiên đăng nhập đã hết hạn, vui lòng đăng nhập lại";
pub const NOT_FOUND: &str = "Không tìm thấy dữ liệu.";

#[derive(Debug, Serialize)]
struct CurrentUser<'a> {
    user_name: &'a str,
    display_name: &'a str,
}

pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        Level::Info | Level::Debug => "info",
    }
}

fn notification_level(kind: NotificationKind) -> &'static str {
    match kind {
        NotificationKind::Error => "danger",
        NotificationKind::Warning => "warning",
        NotificationKind::Success => "success",
    }
}

/// Context shared by every page: alerts, the signed-in user and the page
/// highlighted in the navigation. A notification still open in `notifications`
/// is shown after the flash messages.
pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    notifications: &NotificationStore,
    user: Option<&AuthSession>,
    current_page: &str,
) -> Context {
    let mut alerts = flash_messages
        .iter()
        .map(|f| (f.content().to_string(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();
    if let Some(notification) = notifications.take() {
        alerts.push((notification.message, notification_level(notification.kind)));
    }

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_page", current_page);
    if let Some(user) = user {
        context.insert(
            "current_user",
            &CurrentUser {
                user_name: user.user_name.as_deref().unwrap_or_default(),
                display_name: user.display_name(),
            },
        );
    }
    context
}

/// Public page context: [`base_context`] plus the cached site settings.
pub async fn public_context(
    flash_messages: &IncomingFlashMessages,
    notifications: &NotificationStore,
    session: &Session,
    gateway: &HttpGateway,
    current_page: &str,
) -> Context {
    let mut context = base_context(flash_messages, notifications, None, current_page);
    context.insert("web_config", &web_config(session, gateway).await);
    context
}

/// Site settings from the session cache, loaded once per browser session.
pub async fn web_config(session: &Session, gateway: &HttpGateway) -> WebConfig {
    if let Some(config) = cached_web_config(session) {
        return config;
    }
    match load_web_config(gateway).await {
        Ok(config) => {
            cache_web_config(session, &config);
            config
        }
        Err(err) => {
            log::warn!("Rendering without site settings: {err}");
            WebConfig::default()
        }
    }
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(err) => {
            log::error!("Failed to render template '{template}': {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Moves the open notification into a flash message so it survives the
/// redirect that follows.
pub fn flash_notifications(notifications: &NotificationStore) {
    if let Some(notification) = notifications.take() {
        let flash = match notification.kind {
            NotificationKind::Error => FlashMessage::error(notification.message),
            NotificationKind::Warning => FlashMessage::warning(notification.message),
            NotificationKind::Success => FlashMessage::success(notification.message),
        };
        flash.send();
    }
}

/// Redirects to `location` carrying the open notification along.
pub fn redirect_with(notifications: &NotificationStore, location: &str) -> HttpResponse {
    flash_notifications(notifications);
    redirect(location)
}

/// Backend client acting as the signed-in account.
pub fn admin_gateway(gateway: &web::Data<HttpGateway>, admin: &AdminSession) -> HttpGateway {
    gateway.with_token(admin.token())
}

/// Response for a failed service call of an admin screen. `back` is where
/// recoverable failures return to.
pub fn error_response(
    err: ServiceError,
    notifications: &NotificationStore,
    back: &str,
) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => {
            notifications.close();
            FlashMessage::error(SESSION_EXPIRED).send();
            redirect(LOGIN_PATH)
        }
        ServiceError::NotFound => {
            FlashMessage::error(NOT_FOUND).send();
            redirect(back)
        }
        ServiceError::Form(message) => {
            FlashMessage::error(message).send();
            redirect(back)
        }
        ServiceError::Gateway(err) => {
            log::error!("Backend call failed: {err}");
            if notifications.current().is_none() {
                notifications.error(err.to_string());
            }
            redirect_with(notifications, back)
        }
        ServiceError::Internal(message) => {
            log::error!("Internal error: {message}");
            HttpResponse::InternalServerError().finish()
        }
    }
}
