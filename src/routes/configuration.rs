use actix_multipart::form::MultipartForm;
use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::forms::configuration::{ConfigurationPayload, SaveConfigurationForm};
use crate::gateway::http::HttpGateway;
use crate::notifications::NotificationStore;
use crate::routes::{admin_gateway, base_context, error_response, redirect_with, render_template};
use crate::services::ServiceError;
use crate::services::auth::DASHBOARD_PATH;
use crate::services::configuration::{
    CONFIGURATION_PATH, compress_picked_images, load_configuration, save_configuration,
};
use crate::session::{AdminSession, forget_web_config};

#[get("/admin/configuration")]
pub async fn show_configuration(
    admin: AdminSession,
    gateway: web::Data<HttpGateway>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let notifications = NotificationStore::new();
    let gateway = admin_gateway(&gateway, &admin);
    let page = match load_configuration(&gateway).await {
        Ok(page) => page,
        Err(err) => return error_response(err, &notifications, DASHBOARD_PATH),
    };

    let mut context =
        base_context(&flash_messages, &notifications, Some(&admin.0), "configuration");
    context.insert("configuration", &page);
    render_template(&tera, "configuration/index.html", &context)
}

#[post("/admin/configuration")]
pub async fn save_configuration_view(
    admin: AdminSession,
    session: Session,
    gateway: web::Data<HttpGateway>,
    MultipartForm(form): MultipartForm<SaveConfigurationForm>,
) -> impl Responder {
    let notifications = NotificationStore::new();
    let gateway = admin_gateway(&gateway, &admin);
    let payload = match ConfigurationPayload::try_from(form) {
        Ok(payload) => payload,
        Err(err) => {
            return error_response(ServiceError::from(err), &notifications, CONFIGURATION_PATH);
        }
    };

    let images = payload.images;
    let uploads = match web::block(move || compress_picked_images(images)).await {
        Ok(Ok(uploads)) => uploads,
        Ok(Err(err)) => return error_response(err, &notifications, CONFIGURATION_PATH),
        Err(err) => {
            log::error!("Image compression was cancelled: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let user_name = admin.user_name();
    match save_configuration(&gateway, user_name, payload.values, uploads, &notifications).await {
        Ok(()) => {
            forget_web_config(&session);
            redirect_with(&notifications, CONFIGURATION_PATH)
        }
        Err(err) => error_response(err, &notifications, CONFIGURATION_PATH),
    }
}
