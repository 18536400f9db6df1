#[cfg(feature = "server")]
use std::time::Duration;

#[cfg(feature = "server")]
use actix_cors::Cors;
#[cfg(feature = "server")]
use actix_files::Files;
#[cfg(feature = "server")]
use actix_session::{SessionMiddleware, config::PersistentSession, storage::CookieSessionStore};
#[cfg(feature = "server")]
use actix_web::cookie::{Key, time::Duration as CookieDuration};
#[cfg(feature = "server")]
use actix_web::middleware::{Compress, Logger};
#[cfg(feature = "server")]
use actix_web::{App, HttpServer, web};
#[cfg(feature = "server")]
use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
#[cfg(feature = "server")]
use tera::Tera;

#[cfg(feature = "server")]
use crate::gateway::http::HttpGateway;
#[cfg(feature = "server")]
use crate::middleware::RedirectUnauthorized;
#[cfg(feature = "server")]
use crate::models::config::ServerConfig;
#[cfg(feature = "server")]
use crate::routes::auth::{
    post_change_password, post_login, post_logout, show_change_password, show_login,
};
#[cfg(feature = "server")]
use crate::routes::categories::{
    navigate_categories_view, save_category_row, show_categories, toggle_category_row,
};
#[cfg(feature = "server")]
use crate::routes::configuration::{save_configuration_view, show_configuration};
#[cfg(feature = "server")]
use crate::routes::dashboard::show_dashboard;
#[cfg(feature = "server")]
use crate::routes::loan_request::{
    post_request_step, remove_request_image, show_request_form, show_request_image,
    upload_request_images,
};
#[cfg(feature = "server")]
use crate::routes::main::{show_home, show_news, show_news_detail, show_product, show_products};
#[cfg(feature = "server")]
use crate::routes::products::{
    navigate_products_view, save_product_editor, show_product_editor, show_products_admin,
    toggle_product_row,
};
#[cfg(feature = "server")]
use crate::routes::requests::{
    approve_request_row, export_requests_view, mark_request_processed, navigate_requests_view,
    show_request, show_requests,
};
#[cfg(feature = "server")]
use crate::session::AUTH_COOKIE_DAYS;
#[cfg(feature = "server")]
use crate::wizard::DraftStore;

pub mod domain;
pub mod gateway;
pub mod listing;
pub mod media;
pub mod models;
pub mod notifications;

#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod middleware;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;
#[cfg(feature = "server")]
pub mod session;
#[cfg(feature = "server")]
pub mod wizard;

/// Builds and runs the Actix-Web HTTP server using the provided configuration.
#[cfg(feature = "server")]
pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
    let gateway = HttpGateway::new(
        server_config.api_base_url.clone(),
        Duration::from_secs(server_config.api_timeout_secs),
    )
    .map_err(|e| std::io::Error::other(format!("Failed to build backend client: {e}")))?;

    // Staged loan drafts, shared by all workers.
    let drafts = DraftStore::new();

    // Keys and stores for sessions and flash messages.
    let secret_key = Key::from(server_config.secret.as_bytes());

    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let message_framework = FlashMessagesFramework::builder(message_store).build();

    let tera = Tera::new(&server_config.templates_dir)
        .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

    let bind_address = (server_config.address.clone(), server_config.port);
    log::info!(
        "Serving on {}:{} against {}",
        bind_address.0,
        bind_address.1,
        server_config.api_base_url
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Cors::permissive())
            .wrap(message_framework.clone())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(false) // set to true in prod
                    .session_lifecycle(
                        PersistentSession::default()
                            .session_ttl(CookieDuration::days(AUTH_COOKIE_DAYS)),
                    )
                    .cookie_domain(
                        (server_config.domain != "localhost")
                            .then(|| server_config.domain.clone()),
                    )
                    .build(),
            )
            .wrap(Compress::default())
            .wrap(Logger::default())
            .service(Files::new("/assets", "./assets"))
            .service(
                web::scope("")
                    .wrap(RedirectUnauthorized)
                    .service(show_home)
                    .service(show_products)
                    .service(show_product)
                    .service(show_news)
                    .service(show_news_detail)
                    .service(show_request_form)
                    .service(post_request_step)
                    .service(upload_request_images)
                    .service(remove_request_image)
                    .service(show_request_image)
                    .service(show_login)
                    .service(post_login)
                    .service(post_logout)
                    .service(show_change_password)
                    .service(post_change_password)
                    .service(show_dashboard)
                    .service(show_requests)
                    .service(navigate_requests_view)
                    .service(approve_request_row)
                    .service(export_requests_view)
                    .service(show_request)
                    .service(mark_request_processed)
                    .service(show_categories)
                    .service(navigate_categories_view)
                    .service(save_category_row)
                    .service(toggle_category_row)
                    .service(show_products_admin)
                    .service(navigate_products_view)
                    .service(save_product_editor)
                    .service(toggle_product_row)
                    .service(show_product_editor)
                    .service(show_configuration)
                    .service(save_configuration_view),
            )
            .app_data(web::Data::new(tera.clone()))
            .app_data(web::Data::new(gateway.clone()))
            .app_data(web::Data::new(drafts.clone()))
            .app_data(web::Data::new(server_config.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
