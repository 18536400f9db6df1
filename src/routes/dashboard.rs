use actix_web::{Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::gateway::http::HttpGateway;
use crate::notifications::NotificationStore;
use crate::routes::{admin_gateway, base_context, error_response, render_template};
use crate::services::ServiceError;
use crate::services::auth::DASHBOARD_PATH;
use crate::services::dashboard::{DashboardData, load_dashboard};
use crate::session::AdminSession;

#[get("/admin")]
pub async fn show_dashboard(
    admin: AdminSession,
    gateway: web::Data<HttpGateway>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let notifications = NotificationStore::new();
    let gateway = admin_gateway(&gateway, &admin);
    let data = match load_dashboard(&gateway).await {
        Ok(data) => data,
        Err(ServiceError::Gateway(err)) => {
            notifications.error(err.to_string());
            DashboardData::default()
        }
        Err(err) => return error_response(err, &notifications, DASHBOARD_PATH),
    };

    let mut context = base_context(&flash_messages, &notifications, Some(&admin.0), "dashboard");
    context.insert("dashboard", &data);
    render_template(&tera, "admin/dashboard.html", &context)
}
