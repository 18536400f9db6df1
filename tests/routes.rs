use std::time::Duration;

use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::{Cookie, Key};
use actix_web::http::{StatusCode, header};
use actix_web::{App, test as actix_test, web};
use actix_web_flash_messages::storage::CookieMessageStore;
use actix_web_flash_messages::{FlashMessagesFramework, Level};
use tera::Tera;

use loan_desk::gateway::http::HttpGateway;
use loan_desk::middleware::{LOGIN_PATH, RedirectUnauthorized};
use loan_desk::routes::alert_level_to_str;
use loan_desk::routes::auth::show_login;
use loan_desk::routes::dashboard::show_dashboard;
use loan_desk::routes::loan_request::show_request_form;
use loan_desk::routes::main::{show_news, show_news_detail};
use loan_desk::session::AUTH_COOKIE;
use loan_desk::wizard::DraftStore;

// Nothing listens on the discard port; site settings fall back to defaults.
const OFFLINE_BACKEND: &str = "http://127.0.0.1:9";

macro_rules! test_app {
    ($($service:expr),+ $(,)?) => {{
        let key = Key::generate();
        let store = CookieMessageStore::builder(key.clone()).build();
        let flash = FlashMessagesFramework::builder(store).build();
        let gateway = HttpGateway::new(OFFLINE_BACKEND, Duration::from_millis(500))
            .expect("gateway");
        let tera = Tera::new("templates/**/*").expect("templates");
        actix_test::init_service(
            App::new()
                .wrap(flash)
                .wrap(SessionMiddleware::new(CookieSessionStore::default(), key))
                .app_data(web::Data::new(tera))
                .app_data(web::Data::new(gateway))
                .app_data(web::Data::new(DraftStore::new()))
                .service(web::scope("").wrap(RedirectUnauthorized)$(.service($service))+),
        )
        .await
    }};
}

#[test]
fn test_alert_level_to_str_mappings() {
    assert_eq!(alert_level_to_str(&Level::Error), "danger");
    assert_eq!(alert_level_to_str(&Level::Warning), "warning");
    assert_eq!(alert_level_to_str(&Level::Success), "success");
    assert_eq!(alert_level_to_str(&Level::Info), "info");
    assert_eq!(alert_level_to_str(&Level::Debug), "info");
}

#[test]
fn templates_parse() {
    let tera = Tera::new("templates/**/*").unwrap();
    for name in [
        "base.html",
        "admin/base.html",
        "loan_request/index.html",
        "requests/index.html",
        "configuration/index.html",
    ] {
        assert!(tera.get_template_names().any(|t| t == name), "{name}");
    }
}

#[actix_web::test]
async fn admin_page_without_session_redirects_to_login() {
    let app = test_app!(show_dashboard);

    let req = actix_test::TestRequest::get().uri("/admin").to_request();
    let resp = actix_test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), LOGIN_PATH);
}

#[actix_web::test]
async fn token_cookie_without_user_name_must_sign_in_again() {
    let app = test_app!(show_dashboard, show_login);

    let req = actix_test::TestRequest::get()
        .uri("/admin")
        .cookie(Cookie::new(AUTH_COOKIE, "tok"))
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), LOGIN_PATH);

    let req = actix_test::TestRequest::get()
        .uri(LOGIN_PATH)
        .cookie(Cookie::new(AUTH_COOKIE, "tok"))
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn news_renders_without_backend() {
    let app = test_app!(show_news, show_news_detail);

    let req = actix_test::TestRequest::get().uri("/news").to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = String::from_utf8(actix_test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("/news/4"));

    let req = actix_test::TestRequest::get().uri("/news/unknown").to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = String::from_utf8(actix_test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("Nghị định 198"));
}

#[actix_web::test]
async fn wizard_opens_on_personal_step() {
    let app = test_app!(show_request_form);

    let req = actix_test::TestRequest::get()
        .uri("/request?product=p7")
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = String::from_utf8(actix_test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("name=\"fullname\""));
    assert!(body.contains("value=\"next\""));
    assert!(!body.contains("value=\"back\""));
}
