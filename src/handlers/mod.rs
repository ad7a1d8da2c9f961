pub mod auth_handlers;
pub mod campaign_handlers;
pub mod graphic_asset_handlers;
pub mod material_handlers;
pub mod multipart;
pub mod spot_handlers;
pub mod theme_handlers;

use actix_session::Session;
use actix_web::HttpResponse;
use serde::Deserialize;
use uuid::Uuid;

use crate::app::AppState;
use crate::auth::session;
use crate::errors::AppError;
use crate::models::campaign::{self, Campaign, Section};
use crate::remote::RemoteError;
use crate::store::{Owner, Resource, ResourceStore, Toast};

#[derive(Deserialize)]
pub struct CsrfOnly {
    pub csrf_token: String,
}

pub(crate) fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header(("Location", location))
        .finish()
}

const SESSION_EXPIRED: (&str, &str) = ("Sessão expirada", "Entre novamente para continuar.");

/// Send the user back to /auth once the backend has rejected the token.
pub(crate) fn expired_session(session: &Session) -> HttpResponse {
    session::end(session);
    session::push_flash(session, vec![Toast::error(SESSION_EXPIRED.0, SESSION_EXPIRED.1)]);
    see_other("/auth")
}

/// POST-redirect-GET tail shared by every mutation: the store's toasts go
/// to the flash, then redirect to `location` (or to /auth if the session died).
pub(crate) fn finish<R: Resource>(session: &Session, store: &mut ResourceStore<R>, location: &str) -> HttpResponse {
    if store.session_expired() {
        return expired_session(session);
    }
    session::push_flash(session, store.take_toasts());
    see_other(location)
}

/// The owner's campaign behind a sub-resource route, 404 when it is
/// unknown or the section is switched off for it.
pub(crate) async fn load_campaign(
    state: &AppState,
    owner: &Owner,
    id: Uuid,
    section: Section,
) -> Result<Campaign, AppError> {
    match campaign::queries::find_by_id(state.data.as_ref(), owner, id).await? {
        Some(c) if c.shows(section) => Ok(c),
        _ => Err(AppError::NotFound),
    }
}

/// Owner for a mutation under `/campanha/{id}/...`. Same 404 rules as
/// [`load_campaign`], so hidden sections cannot be written to either.
pub(crate) async fn section_owner(
    state: &AppState,
    session: &Session,
    campaign_id: Uuid,
    section: Section,
) -> Result<Owner, AppError> {
    let owner = session::require_owner(session)?;
    load_campaign(state, &owner, campaign_id, section).await?;
    Ok(owner)
}

/// GET pages answer a rejected token with the sign-in page.
pub(crate) fn or_expired(session: &Session, result: Result<HttpResponse, AppError>) -> Result<HttpResponse, AppError> {
    match result {
        Err(AppError::Remote(RemoteError::Unauthorized)) => Ok(expired_session(session)),
        other => other,
    }
}
