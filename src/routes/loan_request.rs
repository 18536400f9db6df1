use actix_multipart::form::MultipartForm;
use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::IncomingFlashMessages;
use serde::Deserialize;
use tera::Tera;
use uuid::Uuid;

use crate::forms::loan_request::{LoanStepForm, RemoveImageForm, StageImagesForm, StepAction};
use crate::gateway::http::HttpGateway;
use crate::models::config::ServerConfig;
use crate::notifications::NotificationStore;
use crate::routes::{public_context, redirect, redirect_with, render_template};
use crate::services::loan_request::{
    REQUEST_PATH, apply_step, compress_files, open_wizard, remaining_slots, remove_image,
    stage_images, staged_image, submit_request,
};
use crate::session::draft_id;
use crate::wizard::DraftStore;

#[derive(Deserialize)]
struct RequestQueryParams {
    product: Option<String>,
}

#[get("/request")]
pub async fn show_request_form(
    params: web::Query<RequestQueryParams>,
    session: Session,
    drafts: web::Data<DraftStore>,
    gateway: web::Data<HttpGateway>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let notifications = NotificationStore::new();
    let id = draft_id(&session);
    let wizard = open_wizard(&drafts, id, params.product.as_deref());

    let mut context = public_context(
        &flash_messages,
        &notifications,
        &session,
        gateway.get_ref(),
        "request",
    )
    .await;
    context.insert("wizard", &wizard);
    render_template(&tera, "loan_request/index.html", &context)
}

#[post("/request/step")]
pub async fn post_request_step(
    session: Session,
    drafts: web::Data<DraftStore>,
    gateway: web::Data<HttpGateway>,
    server_config: web::Data<ServerConfig>,
    web::Form(form): web::Form<LoanStepForm>,
) -> impl Responder {
    let notifications = NotificationStore::new();
    let id = draft_id(&session);
    if apply_step(&drafts, id, &form) == StepAction::Submit {
        submit_request(
            gateway.get_ref(),
            &drafts,
            id,
            &server_config.default_product_id,
            &notifications,
        )
        .await;
    }
    redirect_with(&notifications, REQUEST_PATH)
}

#[post("/request/images")]
pub async fn upload_request_images(
    session: Session,
    drafts: web::Data<DraftStore>,
    MultipartForm(form): MultipartForm<StageImagesForm>,
) -> impl Responder {
    let notifications = NotificationStore::new();
    let id = draft_id(&session);
    let files = match form.read_files(remaining_slots(&drafts, id)) {
        Ok(files) => files,
        Err(err) => {
            log::error!("Failed to read uploaded images: {err}");
            notifications.error(err.to_string());
            return redirect_with(&notifications, REQUEST_PATH);
        }
    };

    match web::block(move || compress_files(files)).await {
        Ok((images, rejected)) => {
            stage_images(&drafts, id, images, rejected, &notifications);
        }
        Err(err) => {
            log::error!("Image compression was cancelled: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    }
    redirect_with(&notifications, REQUEST_PATH)
}

#[post("/request/images/remove")]
pub async fn remove_request_image(
    session: Session,
    drafts: web::Data<DraftStore>,
    web::Form(form): web::Form<RemoveImageForm>,
) -> impl Responder {
    let id = draft_id(&session);
    remove_image(&drafts, id, &form.preview_url);
    redirect(REQUEST_PATH)
}

#[get("/request/images/{image_id}")]
pub async fn show_request_image(
    image_id: web::Path<Uuid>,
    session: Session,
    drafts: web::Data<DraftStore>,
) -> impl Responder {
    let id = draft_id(&session);
    match staged_image(&drafts, id, image_id.into_inner()) {
        Ok(image) => HttpResponse::Ok()
            .content_type(image.content_type)
            .body(image.bytes),
        Err(_) => HttpResponse::NotFound().finish(),
    }
}
