use actix_multipart::Multipart;
use actix_session::Session;
use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::app::AppState;
use crate::auth::{csrf, session};
use crate::errors::{AppError, render};
use crate::models::campaign::Section;
use crate::models::graphic_asset::{GraphicAsset, GraphicAssetForm};
use crate::store::upload::MAX_UPLOAD_BYTES;
use crate::templates_structs::{CampaignHeader, GraphicAssetsTemplate, PageContext};

use super::{CsrfOnly, expired_session, finish, load_campaign, multipart, or_expired, section_owner};

fn page_path(campaign_id: Uuid) -> String {
    Section::GraphicAssets.href(campaign_id)
}

async fn render_index(
    state: &AppState,
    session: &Session,
    campaign_id: Uuid,
    errors: Vec<String>,
) -> Result<HttpResponse, AppError> {
    let owner = session::require_owner(session)?;
    let campaign = load_campaign(state, &owner, campaign_id, Section::GraphicAssets).await?;

    let mut store = state.scoped_store::<GraphicAsset>(owner, campaign_id);
    store.list().await;
    if store.session_expired() {
        return Ok(expired_session(session));
    }

    let ctx = PageContext::build(session, state)?.with_toasts(store.take_toasts());
    render(GraphicAssetsTemplate {
        ctx,
        campaign: CampaignHeader::from(&campaign),
        assets: store.into_rows(),
        errors,
    })
}

/// GET /campanha/{id}/pecas-graficas
pub async fn index(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let result = render_index(&state, &session, path.into_inner(), vec![]).await;
    or_expired(&session, result)
}

/// POST /campanha/{id}/pecas-graficas
/// Multipart: `nome`, `tipo`, `link`, `status`, `csrf_token` and an optional `arquivo`.
pub async fn create(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<Uuid>,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let campaign_id = path.into_inner();
    let upload = multipart::read(payload, "arquivo", MAX_UPLOAD_BYTES).await?;
    csrf::validate_csrf(&session, upload.csrf_token())?;
    let form: GraphicAssetForm = upload.parse()?;

    let errors = form.validate();
    if !errors.is_empty() {
        let result = render_index(&state, &session, campaign_id, errors).await;
        return or_expired(&session, result);
    }

    let owner = match section_owner(&state, &session, campaign_id, Section::GraphicAssets).await {
        Ok(owner) => owner,
        Err(e) => return or_expired(&session, Err(e)),
    };
    let mut store = state.scoped_store::<GraphicAsset>(owner, campaign_id);
    store
        .create_with_file(
            state.storage.as_ref(),
            &state.config.storage_bucket,
            form.to_new(),
            upload.file.as_ref(),
        )
        .await;
    Ok(finish(&session, &mut store, &page_path(campaign_id)))
}

/// POST /campanha/{id}/pecas-graficas/{asset_id}
/// Multipart, same fields as create. A new `arquivo` replaces the stored file.
pub async fn update(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<(Uuid, Uuid)>,
    payload: Multipart,
) -> Result<HttpResponse, AppError> {
    let (campaign_id, asset_id) = path.into_inner();
    let upload = multipart::read(payload, "arquivo", MAX_UPLOAD_BYTES).await?;
    csrf::validate_csrf(&session, upload.csrf_token())?;
    let form: GraphicAssetForm = upload.parse()?;

    let errors = form.validate();
    if !errors.is_empty() {
        let result = render_index(&state, &session, campaign_id, errors).await;
        return or_expired(&session, result);
    }

    let owner = match section_owner(&state, &session, campaign_id, Section::GraphicAssets).await {
        Ok(owner) => owner,
        Err(e) => return or_expired(&session, Err(e)),
    };
    let mut store = state.scoped_store::<GraphicAsset>(owner, campaign_id);
    store
        .update_with_file(
            state.storage.as_ref(),
            &state.config.storage_bucket,
            asset_id,
            form.to_update(),
            upload.file.as_ref(),
        )
        .await;
    Ok(finish(&session, &mut store, &page_path(campaign_id)))
}

/// POST /campanha/{id}/pecas-graficas/{asset_id}/excluir
pub async fn delete(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<(Uuid, Uuid)>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let (campaign_id, asset_id) = path.into_inner();

    let owner = match section_owner(&state, &session, campaign_id, Section::GraphicAssets).await {
        Ok(owner) => owner,
        Err(e) => return or_expired(&session, Err(e)),
    };
    let mut store = state.scoped_store::<GraphicAsset>(owner, campaign_id);
    store.delete(asset_id).await;
    Ok(finish(&session, &mut store, &page_path(campaign_id)))
}
