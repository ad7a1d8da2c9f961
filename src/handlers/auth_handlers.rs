use std::net::{IpAddr, Ipv4Addr};

use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;

use crate::app::AppState;
use crate::auth::{csrf, rate_limit::RateLimiter, session, validate};
use crate::errors::{AppError, render};
use crate::models::user_role;
use crate::remote::{AuthSession, RemoteError};
use crate::store::{Owner, Toast};
use crate::templates_structs::{AuthMode, AuthTemplate};

use super::{CsrfOnly, see_other};

#[derive(Deserialize)]
pub struct AuthQuery {
    pub modo: Option<String>,
}

#[derive(Deserialize)]
pub struct CredentialsForm {
    pub email: String,
    pub password: String,
    pub csrf_token: String,
}

fn auth_page_template(
    state: &AppState,
    session: &Session,
    mode: AuthMode,
    email: &str,
    error: Option<String>,
    notice: Option<String>,
) -> AuthTemplate {
    AuthTemplate {
        app_name: state.config.app_name.clone(),
        csrf_token: csrf::get_or_create_token(session),
        theme: session::get_theme(session),
        mode,
        email: email.to_string(),
        error,
        notice,
    }
}

fn client_ip(req: &HttpRequest) -> IpAddr {
    req.peer_addr()
        .map(|addr| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

/// Put the backend session into the cookie. The admin flag is read once
/// here; a failed role lookup signs in without admin rights.
async fn establish(state: &AppState, session: &Session, auth: &AuthSession) -> Result<(), AppError> {
    let owner = Owner { user_id: auth.user_id, access_token: auth.access_token.clone() };
    let is_admin = match user_role::is_admin(state.data.as_ref(), &owner).await {
        Ok(admin) => admin,
        Err(e) => {
            log::error!("Role lookup for {} failed: {}", auth.email, e);
            false
        }
    };
    session::sign_in(session, auth, is_admin)?;
    log::info!("{} signed in (admin: {})", auth.email, is_admin);
    Ok(())
}

/// GET /auth
pub async fn auth_page(
    state: web::Data<AppState>,
    session: Session,
    query: web::Query<AuthQuery>,
) -> Result<HttpResponse, AppError> {
    if session::current_owner(&session).is_some() {
        return Ok(see_other("/"));
    }

    let mode = AuthMode::from_query(query.modo.as_deref());
    let notice = session::take_flash(&session)
        .into_iter()
        .map(|t| format!("{} {}", t.title, t.description))
        .reduce(|a, b| format!("{a} {b}"));
    render(auth_page_template(&state, &session, mode, "", None, notice))
}

/// POST /auth/login
pub async fn login(
    req: HttpRequest,
    state: web::Data<AppState>,
    session: Session,
    form: web::Form<CredentialsForm>,
    limiter: web::Data<RateLimiter>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    // Rate-limit check BEFORE contacting the auth server
    let ip = client_ip(&req);
    let email = form.email.trim();
    if limiter.is_blocked(ip) {
        let error = "Muitas tentativas de login. Tente novamente mais tarde.".to_string();
        return render(auth_page_template(&state, &session, AuthMode::Login, email, Some(error), None));
    }

    if email.is_empty() || form.password.is_empty() {
        let error = "Informe e-mail e senha.".to_string();
        return render(auth_page_template(&state, &session, AuthMode::Login, email, Some(error), None));
    }

    match state.auth.sign_in(email, &form.password).await {
        Ok(auth) => {
            limiter.clear(ip);
            establish(&state, &session, &auth).await?;
            Ok(see_other("/"))
        }
        Err(e) => {
            limiter.record_failure(ip);
            let error = match e {
                RemoteError::Api { status: 400, .. } | RemoteError::Unauthorized => {
                    log::warn!("Failed sign-in for {email}");
                    "E-mail ou senha inválidos.".to_string()
                }
                other => {
                    log::error!("Sign-in request failed: {other}");
                    "Não foi possível entrar. Tente novamente.".to_string()
                }
            };
            render(auth_page_template(&state, &session, AuthMode::Login, email, Some(error), None))
        }
    }
}

/// POST /auth/signup
pub async fn signup(
    state: web::Data<AppState>,
    session: Session,
    form: web::Form<CredentialsForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let email = form.email.trim();
    let errors: Vec<String> = [validate::validate_email(email), validate::validate_password(&form.password)]
        .into_iter()
        .flatten()
        .collect();
    if !errors.is_empty() {
        let error = errors.join(" ");
        return render(auth_page_template(&state, &session, AuthMode::Signup, email, Some(error), None));
    }

    match state.auth.sign_up(email, &form.password).await {
        Ok(Some(auth)) => {
            establish(&state, &session, &auth).await?;
            session::push_flash(&session, vec![Toast::success("Conta criada!", "Bem-vindo ao painel de campanhas.")]);
            Ok(see_other("/"))
        }
        Ok(None) => {
            let notice = "Conta criada! Verifique seu e-mail para confirmar o cadastro.".to_string();
            render(auth_page_template(&state, &session, AuthMode::Login, email, None, Some(notice)))
        }
        Err(e) => {
            let error = match e {
                RemoteError::Api { status: 422, .. } => "Este e-mail já está cadastrado.".to_string(),
                other => {
                    log::error!("Sign-up request failed: {other}");
                    "Não foi possível criar a conta. Tente novamente.".to_string()
                }
            };
            render(auth_page_template(&state, &session, AuthMode::Signup, email, Some(error), None))
        }
    }
}

/// POST /logout
pub async fn logout(
    state: web::Data<AppState>,
    session: Session,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    if let Some(owner) = session::current_owner(&session) {
        if let Err(e) = state.auth.sign_out(&owner.access_token).await {
            log::warn!("Remote sign-out failed: {e}");
        }
    }
    session::end(&session);
    Ok(see_other("/auth"))
}
