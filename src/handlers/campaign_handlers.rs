use actix_multipart::Multipart;
use actix_session::Session;
use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::app::AppState;
use crate::auth::{csrf, session};
use crate::errors::{AppError, render};
use crate::models::campaign::{self, Campaign, CampaignForm};
use crate::store::Toast;
use crate::store::upload::MAX_UPLOAD_BYTES;
use crate::templates_structs::{CampaignCard, CampaignEditTemplate, CampaignsTemplate, PageContext};

use super::{CsrfOnly, expired_session, finish, multipart, or_expired};

/// Campaign grid, with `errors` from a rejected create form.
async fn render_index(state: &AppState, session: &Session, errors: Vec<String>) -> Result<HttpResponse, AppError> {
    let owner = session::require_owner(session)?;
    let mut store = state.store::<Campaign>(owner);
    store.list().await;
    if store.session_expired() {
        return Ok(expired_session(session));
    }

    let ctx = PageContext::build(session, state)?.with_toasts(store.take_toasts());
    let campaigns = store.rows().iter().map(CampaignCard::from).collect();
    render(CampaignsTemplate { ctx, campaigns, errors })
}

/// GET /
pub async fn index(state: web::Data<AppState>, session: Session) -> Result<HttpResponse, AppError> {
    render_index(&state, &session, vec![]).await
}

/// POST /campanhas
pub async fn create(
    state: web::Data<AppState>,
    session: Session,
    form: web::Form<CampaignForm>,
) -> Result<HttpResponse, AppError> {
    session::require_admin(&session)?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let errors = form.validate();
    if !errors.is_empty() {
        return render_index(&state, &session, errors).await;
    }

    let owner = session::require_owner(&session)?;
    let mut store = state.store::<Campaign>(owner);
    store.create(&form.to_new()).await;
    Ok(finish(&session, &mut store, "/"))
}

async fn render_edit(
    state: &AppState,
    session: &Session,
    id: Uuid,
    errors: Vec<String>,
) -> Result<HttpResponse, AppError> {
    let owner = session::require_owner(session)?;
    let campaign = campaign::queries::find_by_id(state.data.as_ref(), &owner, id)
        .await?
        .ok_or(AppError::NotFound)?;
    let ctx = PageContext::build(session, state)?;
    render(CampaignEditTemplate { ctx, campaign, errors })
}

/// GET /campanhas/{id}/editar
pub async fn edit_form(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    session::require_admin(&session)?;
    let result = render_edit(&state, &session, path.into_inner(), vec![]).await;
    or_expired(&session, result)
}

/// POST /campanhas/{id}
pub async fn update(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<Uuid>,
    form: web::Form<CampaignForm>,
) -> Result<HttpResponse, AppError> {
    session::require_admin(&session)?;
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let id = path.into_inner();

    let errors = form.validate();
    if !errors.is_empty() {
        let result = render_edit(&state, &session, id, errors).await;
        return or_expired(&session, result);
    }

    let owner = session::require_owner(&session)?;
    let mut store = state.store::<Campaign>(owner);
    store.update(id, &form.to_update()).await;
    Ok(finish(&session, &mut store, "/"))
}

/// POST /campanhas/{id}/excluir
pub async fn delete(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<Uuid>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    session::require_admin(&session)?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let owner = session::require_owner(&session)?;
    let mut store = state.store::<Campaign>(owner);
    store.delete(path.into_inner()).await;
    Ok(finish(&session, &mut store, "/"))
}

/// POST /campanhas/{id}/capa
/// Multipart: `capa` (image file) and `csrf_token`.
pub async fn upload_cover(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<Uuid>,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    session::require_admin(&session)?;
    let form = multipart::read(payload, "capa", MAX_UPLOAD_BYTES).await?;
    csrf::validate_csrf(&session, form.csrf_token())?;

    let owner = session::require_owner(&session)?;
    let mut store = state.store::<Campaign>(owner);
    match &form.file {
        Some(file) => {
            store
                .attach_cover(state.storage.as_ref(), &state.config.storage_bucket, path.into_inner(), file)
                .await;
        }
        None => {
            session::push_flash(&session, vec![Toast::error("Nenhum arquivo", "Selecione uma imagem para a capa.")]);
        }
    }
    Ok(finish(&session, &mut store, "/"))
}
