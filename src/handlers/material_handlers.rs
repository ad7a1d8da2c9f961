use actix_session::Session;
use actix_web::{HttpResponse, http::header, web};
use uuid::Uuid;

use crate::app::AppState;
use crate::auth::{csrf, session};
use crate::errors::{AppError, render};
use crate::models::campaign::Section;
use crate::models::explanatory_material::{
    CAMPAIGN_GUIDE, ExplanatoryMaterial, MaterialForm, ReorderForm, download_file_name,
};
use crate::store::Toast;
use crate::templates_structs::{CampaignHeader, MaterialRow, MaterialsTemplate, PageContext};

use super::{CsrfOnly, expired_session, finish, load_campaign, or_expired, section_owner};

fn page_path(campaign_id: Uuid) -> String {
    Section::Material.href(campaign_id)
}

async fn render_index(
    state: &AppState,
    session: &Session,
    campaign_id: Uuid,
    errors: Vec<String>,
) -> Result<HttpResponse, AppError> {
    let owner = session::require_owner(session)?;
    let campaign = load_campaign(state, &owner, campaign_id, Section::Material).await?;

    let mut store = state.scoped_store::<ExplanatoryMaterial>(owner, campaign_id);
    store.list().await;
    if store.session_expired() {
        return Ok(expired_session(session));
    }

    let ctx = PageContext::build(session, state)?.with_toasts(store.take_toasts());
    render(MaterialsTemplate {
        ctx,
        campaign: CampaignHeader::from(&campaign),
        materials: MaterialRow::build(store.into_rows()),
        guide: CAMPAIGN_GUIDE,
        errors,
    })
}

/// GET /campanha/{id}/material-explicativo
pub async fn index(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let result = render_index(&state, &session, path.into_inner(), vec![]).await;
    or_expired(&session, result)
}

/// POST /campanha/{id}/material-explicativo
/// New material goes to the end of the list.
pub async fn create(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<Uuid>,
    form: web::Form<MaterialForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let campaign_id = path.into_inner();

    let errors = form.validate();
    if !errors.is_empty() {
        let result = render_index(&state, &session, campaign_id, errors).await;
        return or_expired(&session, result);
    }

    let owner = match section_owner(&state, &session, campaign_id, Section::Material).await {
        Ok(owner) => owner,
        Err(e) => return or_expired(&session, Err(e)),
    };
    let mut store = state.scoped_store::<ExplanatoryMaterial>(owner, campaign_id);
    let existing = store.list().await.len();
    let listed = !store.toasts().iter().any(|t| t.is_error());
    if listed {
        store.create(&form.to_new(existing)).await;
    }
    Ok(finish(&session, &mut store, &page_path(campaign_id)))
}

/// POST /campanha/{id}/material-explicativo/ordem
pub async fn reorder(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<Uuid>,
    form: web::Form<ReorderForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let campaign_id = path.into_inner();

    let Some(ids) = form.ids() else {
        session::push_flash(&session, vec![Toast::error("Ordem inválida", "A lista de materiais enviada é inválida.")]);
        return Ok(super::see_other(&page_path(campaign_id)));
    };

    let owner = match section_owner(&state, &session, campaign_id, Section::Material).await {
        Ok(owner) => owner,
        Err(e) => return or_expired(&session, Err(e)),
    };
    let mut store = state.scoped_store::<ExplanatoryMaterial>(owner, campaign_id);
    let outcome = store.reorder(&ids).await;
    log::debug!("Reorder of campaign {campaign_id} materials: {outcome:?}");
    Ok(finish(&session, &mut store, &page_path(campaign_id)))
}

/// GET /campanha/{id}/material-explicativo/download
/// The campaign guide as a text attachment.
pub async fn download(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let campaign_id = path.into_inner();
    if let Err(e) = section_owner(&state, &session, campaign_id, Section::Material).await {
        return or_expired(&session, Err(e));
    }

    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", download_file_name(campaign_id)),
        ))
        .body(CAMPAIGN_GUIDE))
}

/// POST /campanha/{id}/material-explicativo/{material_id}
pub async fn update(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<(Uuid, Uuid)>,
    form: web::Form<MaterialForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let (campaign_id, material_id) = path.into_inner();

    let errors = form.validate();
    if !errors.is_empty() {
        let result = render_index(&state, &session, campaign_id, errors).await;
        return or_expired(&session, result);
    }

    let owner = match section_owner(&state, &session, campaign_id, Section::Material).await {
        Ok(owner) => owner,
        Err(e) => return or_expired(&session, Err(e)),
    };
    let mut store = state.scoped_store::<ExplanatoryMaterial>(owner, campaign_id);
    store.update(material_id, &form.to_update()).await;
    Ok(finish(&session, &mut store, &page_path(campaign_id)))
}

/// POST /campanha/{id}/material-explicativo/{material_id}/excluir
pub async fn delete(
    state: web::Data<AppState>,
    session: Session,
    path: web::Path<(Uuid, Uuid)>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let (campaign_id, material_id) = path.into_inner();

    let owner = match section_owner(&state, &session, campaign_id, Section::Material).await {
        Ok(owner) => owner,
        Err(e) => return or_expired(&session, Err(e)),
    };
    let mut store = state.scoped_store::<ExplanatoryMaterial>(owner, campaign_id);
    store.delete(material_id).await;
    Ok(finish(&session, &mut store, &page_path(campaign_id)))
}
