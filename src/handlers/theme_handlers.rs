use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, web};

use crate::auth::{csrf, session};
use crate::errors::AppError;

use super::{CsrfOnly, see_other};

/// POST /tema
/// Flips between dark and light, then returns to the page the form was on.
pub async fn toggle(
    req: HttpRequest,
    session: Session,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let theme = session::toggle_theme(&session);
    log::debug!("Theme set to {theme}");
    Ok(see_other(&back_to(&req)))
}

/// Path of the Referer when it points into this site, else `/`.
fn back_to(req: &HttpRequest) -> String {
    let referer = req
        .headers()
        .get("Referer")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let host = req.connection_info().host().to_string();

    let path = referer
        .split_once("://")
        .and_then(|(_, rest)| rest.strip_prefix(host.as_str()))
        .unwrap_or(referer);
    if path.starts_with('/') && !path.starts_with("//") {
        path.to_string()
    } else {
        "/".to_string()
    }
}
