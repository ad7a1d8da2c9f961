#[macro_use]
mod common;

use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};

use common::{ADMIN_EMAIL, PASSWORD, USER_EMAIL};

fn post(uri: &str, cookie: Cookie<'static>, pairs: &[(&str, &str)]) -> TestRequest {
    TestRequest::post()
        .uri(uri)
        .cookie(cookie)
        .insert_header(("Content-Type", "application/x-www-form-urlencoded"))
        .set_payload(common::form(pairs))
}

// ============================================================================
// PERMISSIONS
// ============================================================================

#[actix_rt::test]
async fn test_non_admin_cannot_create_campaign() {
    let svc = common::backend();
    common::owner(&svc).await;
    let app = test_app!(svc);

    let (cookie, csrf) = sign_in!(app, USER_EMAIL, PASSWORD);
    let req = post(
        "/campanhas",
        cookie,
        &[("nome", "Verão"), ("descricao", "Campanha de verão"), ("csrf_token", csrf.as_str())],
    );
    let resp = test::call_service(&app, req.to_request()).await;

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert!(svc.rows("campaigns").is_empty());
}

#[actix_rt::test]
async fn test_non_admin_cannot_open_edit_form() {
    let svc = common::backend();
    let ana = common::owner(&svc).await;
    let id = common::seed_campaign(&svc, &ana, "Verão", [true; 3]);
    let app = test_app!(svc);

    let (cookie, _) = sign_in!(app, USER_EMAIL, PASSWORD);
    let uri = format!("/campanhas/{id}/editar");
    let resp = test::call_service(&app, TestRequest::get().uri(&uri).cookie(cookie).to_request()).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

// ============================================================================
// ADMIN CRUD
// ============================================================================

#[actix_rt::test]
async fn test_admin_creates_campaign_and_sees_toast() {
    let svc = common::backend();
    let admin = common::admin(&svc).await;
    let app = test_app!(svc);

    let (cookie, csrf) = sign_in!(app, ADMIN_EMAIL, PASSWORD);
    let req = post(
        "/campanhas",
        cookie,
        &[
            ("nome", "Verão"),
            ("descricao", "Campanha de verão"),
            ("status", "active"),
            ("show_pecas_graficas", "on"),
            ("csrf_token", csrf.as_str()),
        ],
    );
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(common::location(&resp), "/");
    let cookie = common::session_cookie(&resp).expect("flash stored");

    let rows = svc.rows("campaigns");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["user_id"], admin.user_id.to_string());
    assert_eq!(rows[0]["show_pecas_graficas"], true);
    assert_eq!(rows[0]["show_solicitacao_spot"], false);

    let resp = test::call_service(&app, TestRequest::get().uri("/").cookie(cookie).to_request()).await;
    let body = common::body_text(resp).await;
    assert!(body.contains("Campanha criada!"));
    assert!(body.contains("Verão"));
    let id = common::row_id(&rows[0]);
    assert!(body.contains(&format!("/campanha/{id}/pecas-graficas")));
    assert!(!body.contains(&format!("/campanha/{id}/solicitacao-spot")));
}

#[actix_rt::test]
async fn test_blank_campaign_name_rerenders_with_error() {
    let svc = common::backend();
    common::admin(&svc).await;
    let app = test_app!(svc);

    let (cookie, csrf) = sign_in!(app, ADMIN_EMAIL, PASSWORD);
    let req = post(
        "/campanhas",
        cookie,
        &[("nome", "   "), ("descricao", "Sem nome"), ("csrf_token", csrf.as_str())],
    );
    let resp = test::call_service(&app, req.to_request()).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(common::body_text(resp).await.contains("Nome da campanha é obrigatório"));
    assert!(svc.rows("campaigns").is_empty());
}

#[actix_rt::test]
async fn test_admin_updates_and_deletes_campaign() {
    let svc = common::backend();
    let admin = common::admin(&svc).await;
    let id = common::seed_campaign(&svc, &admin, "Antes", [true; 3]);
    let app = test_app!(svc);

    let (cookie, csrf) = sign_in!(app, ADMIN_EMAIL, PASSWORD);
    let uri = format!("/campanhas/{id}/editar");
    let resp = test::call_service(&app, TestRequest::get().uri(&uri).cookie(cookie.clone()).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(common::body_text(resp).await.contains(r#"value="Antes""#));

    let req = post(
        &format!("/campanhas/{id}"),
        cookie.clone(),
        &[("nome", "Depois"), ("descricao", "Editada"), ("status", "paused"), ("csrf_token", csrf.as_str())],
    );
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let rows = svc.rows("campaigns");
    assert_eq!(rows[0]["title"], "Depois");
    assert_eq!(rows[0]["status"], "paused");
    assert_eq!(rows[0]["show_material_explicativo"], false);

    let req = post(&format!("/campanhas/{id}/excluir"), cookie, &[("csrf_token", csrf.as_str())]);
    let resp = test::call_service(&app, req.to_request()).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert!(svc.rows("campaigns").is_empty());
}

#[actix_rt::test]
async fn test_edit_form_of_unknown_campaign_is_404() {
    let svc = common::backend();
    common::admin(&svc).await;
    let app = test_app!(svc);

    let (cookie, _) = sign_in!(app, ADMIN_EMAIL, PASSWORD);
    let uri = format!("/campanhas/{}/editar", uuid::Uuid::new_v4());
    let resp = test::call_service(&app, TestRequest::get().uri(&uri).cookie(cookie).to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
