use actix_session::Session;
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use uuid::Uuid;

use crate::app::AppState;
use crate::auth::{csrf, session};
use crate::errors::{AppError, render};
use crate::models::campaign::Section;
use crate::models::spot_request::{DurationEstimate, SpotForm, SpotRequest, SpotStatus};
use crate::templates_structs::{CampaignHeader, PageContext, SpotRequestsTemplate};

use super::{CsrfOnly, expired_session, finish, load_campaign, or_expired, section_owner};

#[derive(Deserialize)]
pub struct EstimateQuery {
    #[serde(default)]
    pub texto: String,
}

fn page_path(campaign_id: Uuid) -> String {
    Section::SpotRequests.href(campaign_id)
}

async fn render_index(
    state: &AppState,
    session: &Session,
    campaign_id: Uuid,
    draft: String,
    errors: Vec<String>,
) -> Result<HttpResponse, AppError> {
    let owner = session::require_owner(session)?;
    let campaign = load_campaign(state, &owner, campaign_id, Section::SpotRequests).await?;

    let mut store = state.scoped_store::<SpotRequest>(owner, campaign_id);
    store.list().await;
    if store.session_expired() {
        return Ok(expired_session(session));
    }

    let ctx = PageContext::build(session, state)?.with_toasts(store.take_toasts());
    render(SpotRequestsTemplate {
        ctx,
        campaign: CampaignHeader::from(&campaign),
        spots: store.into_rows(),
        statuses: SpotStatus::ALL,
        draft,
        errors,
    })
}

/// GET /campanha/{id}/solicitacao-spot
pub async fn index(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let result = render_index(&state, &session, path.into_inner(), String::new(), vec![]).await;
    or_expired(&session, result)
}

/// GET /campanha/{id}/solicitacao-spot/estimativa?texto=
/// Live duration estimate while the script is typed.
pub async fn estimate(query: web::Query<EstimateQuery>) -> HttpResponse {
    HttpResponse::Ok().json(DurationEstimate::for_text(&query.texto))
}

/// POST /campanha/{id}/solicitacao-spot
pub async fn create(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<Uuid>,
    form: web::Form<SpotForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let campaign_id = path.into_inner();

    let errors = form.validate();
    if !errors.is_empty() {
        let result = render_index(&state, &session, campaign_id, form.texto.clone(), errors).await;
        return or_expired(&session, result);
    }

    let owner = match section_owner(&state, &session, campaign_id, Section::SpotRequests).await {
        Ok(owner) => owner,
        Err(e) => return or_expired(&session, Err(e)),
    };
    let mut store = state.scoped_store::<SpotRequest>(owner, campaign_id);
    store.create(&form.to_new()).await;
    Ok(finish(&session, &mut store, &page_path(campaign_id)))
}

/// POST /campanha/{id}/solicitacao-spot/{spot_id}
pub async fn update(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<(Uuid, Uuid)>,
    form: web::Form<SpotForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let (campaign_id, spot_id) = path.into_inner();

    let errors = form.validate();
    if !errors.is_empty() {
        let result = render_index(&state, &session, campaign_id, String::new(), errors).await;
        return or_expired(&session, result);
    }

    let owner = match section_owner(&state, &session, campaign_id, Section::SpotRequests).await {
        Ok(owner) => owner,
        Err(e) => return or_expired(&session, Err(e)),
    };
    let mut store = state.scoped_store::<SpotRequest>(owner, campaign_id);
    store.update(spot_id, &form.to_update()).await;
    Ok(finish(&session, &mut store, &page_path(campaign_id)))
}

/// POST /campanha/{id}/solicitacao-spot/{spot_id}/excluir
pub async fn delete(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<(Uuid, Uuid)>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let (campaign_id, spot_id) = path.into_inner();

    let owner = match section_owner(&state, &session, campaign_id, Section::SpotRequests).await {
        Ok(owner) => owner,
        Err(e) => return or_expired(&session, Err(e)),
    };
    let mut store = state.scoped_store::<SpotRequest>(owner, campaign_id);
    store.delete(spot_id).await;
    Ok(finish(&session, &mut store, &page_path(campaign_id)))
}
