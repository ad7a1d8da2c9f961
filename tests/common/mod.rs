//! Shared test infrastructure for store and route tests.
//!
//! Everything runs against the in-memory backend.
//!
//! # Setup
//! - `backend()` - empty `MemoryService`
//! - `owner()` / `admin()` - sign up an account, optionally with the admin role
//! - `test_app!(svc)` - the full route table over `svc`
//! - `sign_in!(app, email, password)` - session cookie and CSRF token of a signed-in user

#![allow(dead_code, unused_macros)]

use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::test;
use regex::Regex;
use serde_json::{Value, json};
use uuid::Uuid;

use attini::models::user_role;
use attini::remote::AuthService;
use attini::remote::memory::MemoryService;
use attini::store::Owner;

// ============================================================================
// TEST CONSTANTS
// ============================================================================

pub const BUCKET: &str = "campaign-covers";
pub const USER_EMAIL: &str = "ana@example.com";
pub const ADMIN_EMAIL: &str = "chefe@example.com";
pub const PASSWORD: &str = "segredo123";

// ============================================================================
// BACKEND SETUP
// ============================================================================

pub fn backend() -> Arc<MemoryService> {
    Arc::new(MemoryService::new())
}

/// Sign up `email` and return it as a store owner.
pub async fn owner_for(svc: &MemoryService, email: &str) -> Owner {
    let session = svc
        .sign_up(email, PASSWORD)
        .await
        .expect("sign up failed")
        .expect("memory sign up returns a session");
    Owner { user_id: session.user_id, access_token: session.access_token }
}

pub async fn owner(svc: &MemoryService) -> Owner {
    owner_for(svc, USER_EMAIL).await
}

/// An account holding the `admin` role.
pub async fn admin(svc: &MemoryService) -> Owner {
    let owner = owner_for(svc, ADMIN_EMAIL).await;
    svc.seed(user_role::TABLE, json!({ "user_id": owner.user_id, "role": "admin" }));
    owner
}

/// A campaign row owned by `owner` with the given section flags.
pub fn seed_campaign(svc: &MemoryService, owner: &Owner, title: &str, sections: [bool; 3]) -> Uuid {
    let row = svc.seed(
        "campaigns",
        json!({
            "user_id": owner.user_id,
            "title": title,
            "description": "Campanha de teste",
            "status": "active",
            "show_pecas_graficas": sections[0],
            "show_solicitacao_spot": sections[1],
            "show_material_explicativo": sections[2],
        }),
    );
    row_id(&row)
}

pub fn row_id(row: &Value) -> Uuid {
    row["id"].as_str().and_then(|s| Uuid::parse_str(s).ok()).expect("row has an id")
}

// ============================================================================
// HTTP HELPERS
// ============================================================================

/// The session cookie set by a response, if any.
pub fn session_cookie<B>(resp: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    resp.response().cookies().find(|c| c.name() == "id").map(|c| c.into_owned())
}

pub fn location<B>(resp: &ServiceResponse<B>) -> String {
    resp.headers()
        .get("Location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// Pull the CSRF token out of a rendered form.
pub fn extract_csrf(body: &str) -> String {
    let re = Regex::new(r#"name="csrf_token" value="([^"]+)""#).expect("valid regex");
    re.captures(body)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .expect("page carries a csrf_token input")
}

pub async fn body_text<B: MessageBody>(resp: ServiceResponse<B>) -> String {
    let bytes = test::read_body(resp).await;
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

pub fn form(pairs: &[(&str, &str)]) -> String {
    serde_urlencoded::to_string(pairs).expect("encodable form")
}

/// The full application over `svc`, as `main` assembles it.
macro_rules! test_app {
    ($svc:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(attini::app::session_middleware(actix_web::cookie::Key::generate()))
                .app_data(actix_web::web::Data::new(attini::app::AppState::with_memory(
                    $svc.clone(),
                    attini::config::AppConfig::memory(),
                )))
                .app_data(actix_web::web::Data::new(attini::auth::rate_limit::RateLimiter::new()))
                .configure(attini::app::routes)
                .default_service(actix_web::web::to(attini::app::not_found)),
        )
        .await
    };
}

/// Log in through the form. Evaluates to `(cookie, csrf_token)`.
macro_rules! sign_in {
    ($app:expr, $email:expr, $password:expr) => {{
        let resp = actix_web::test::call_service(
            &$app,
            actix_web::test::TestRequest::get().uri("/auth").to_request(),
        )
        .await;
        let cookie = common::session_cookie(&resp).expect("auth page sets a session");
        let csrf = common::extract_csrf(&common::body_text(resp).await);

        let resp = actix_web::test::call_service(
            &$app,
            actix_web::test::TestRequest::post()
                .uri("/auth/login")
                .cookie(cookie)
                .insert_header(("Content-Type", "application/x-www-form-urlencoded"))
                .set_payload(common::form(&[
                    ("email", $email),
                    ("password", $password),
                    ("csrf_token", csrf.as_str()),
                ]))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::SEE_OTHER, "login should redirect");
        assert_eq!(common::location(&resp), "/");
        let cookie = common::session_cookie(&resp).expect("login sets a session");
        (cookie, csrf)
    }};
}
