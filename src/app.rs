//! Shared state, route table and the pieces `main` and the route tests
//! assemble into an `App`.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::{HttpResponse, cookie::Key, middleware::from_fn, web};
use uuid::Uuid;

use crate::auth::middleware::require_auth;
use crate::config::{AppConfig, BackendKind};
use crate::handlers::{
    auth_handlers, campaign_handlers, graphic_asset_handlers, material_handlers, spot_handlers,
    theme_handlers,
};
use crate::remote::memory::MemoryService;
use crate::remote::rest::RestClient;
use crate::remote::{AuthService, DataService, ObjectStorage, RemoteError};
use crate::store::{Owner, Resource, ResourceStore};

/// Account created when running on the memory backend.
pub const DEMO_ADMIN_EMAIL: &str = "admin@attini.local";
pub const DEMO_ADMIN_PASSWORD: &str = "attini123";

/// Handles to the backend plus configuration, shared by all workers.
#[derive(Clone)]
pub struct AppState {
    pub data: Arc<dyn DataService>,
    pub storage: Arc<dyn ObjectStorage>,
    pub auth: Arc<dyn AuthService>,
    pub config: AppConfig,
}

impl AppState {
    pub async fn connect(config: AppConfig) -> Result<Self, RemoteError> {
        match config.backend {
            BackendKind::Rest => {
                let client = Arc::new(RestClient::new(&config.remote_url, &config.anon_key, config.http_timeout)?);
                log::info!("Using remote backend at {}", config.remote_url);
                Ok(Self { data: client.clone(), storage: client.clone(), auth: client, config })
            }
            BackendKind::Memory => {
                let service = Arc::new(MemoryService::new());
                seed_demo_admin(&service).await?;
                log::warn!(
                    "Using in-memory backend, data is lost on exit. Sign in as {} / {}",
                    DEMO_ADMIN_EMAIL,
                    DEMO_ADMIN_PASSWORD
                );
                Ok(Self::with_memory(service, config))
            }
        }
    }

    pub fn with_memory(service: Arc<MemoryService>, config: AppConfig) -> Self {
        Self { data: service.clone(), storage: service.clone(), auth: service, config }
    }

    /// Store over an owner's top-level rows.
    pub fn store<R: Resource>(&self, owner: Owner) -> ResourceStore<R> {
        ResourceStore::new(self.data.clone(), owner)
    }

    /// Store over one campaign's child rows.
    pub fn scoped_store<R: Resource>(&self, owner: Owner, campaign_id: Uuid) -> ResourceStore<R> {
        ResourceStore::scoped(self.data.clone(), owner, campaign_id)
    }
}

async fn seed_demo_admin(service: &MemoryService) -> Result<(), RemoteError> {
    if let Some(admin) = service.sign_up(DEMO_ADMIN_EMAIL, DEMO_ADMIN_PASSWORD).await? {
        service.seed(
            crate::models::user_role::TABLE,
            serde_json::json!({ "user_id": admin.user_id, "role": "admin" }),
        );
    }
    Ok(())
}

pub fn session_middleware(key: Key) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_secure(false)
        .cookie_http_only(true)
        .build()
}

/// Every route. The catch-all 404 is registered by the caller with
/// `default_service(web::to(app::not_found))`.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg
        // Static files
        .service(actix_files::Files::new("/static", "./static"))
        // Public routes
        .route("/auth", web::get().to(auth_handlers::auth_page))
        .route("/auth/login", web::post().to(auth_handlers::login))
        .route("/auth/signup", web::post().to(auth_handlers::signup))
        // Protected routes
        .service(
            web::scope("")
                .wrap(from_fn(require_auth))
                .route("/", web::get().to(campaign_handlers::index))
                .route("/logout", web::post().to(auth_handlers::logout))
                .route("/tema", web::post().to(theme_handlers::toggle))
                // Campaigns
                .route("/campanhas", web::post().to(campaign_handlers::create))
                .route("/campanhas/{id}/editar", web::get().to(campaign_handlers::edit_form))
                .route("/campanhas/{id}", web::post().to(campaign_handlers::update))
                .route("/campanhas/{id}/excluir", web::post().to(campaign_handlers::delete))
                .route("/campanhas/{id}/capa", web::post().to(campaign_handlers::upload_cover))
                // Graphic assets
                .route("/campanha/{id}/pecas-graficas", web::get().to(graphic_asset_handlers::index))
                .route("/campanha/{id}/pecas-graficas", web::post().to(graphic_asset_handlers::create))
                .route("/campanha/{id}/pecas-graficas/{asset_id}", web::post().to(graphic_asset_handlers::update))
                .route("/campanha/{id}/pecas-graficas/{asset_id}/excluir", web::post().to(graphic_asset_handlers::delete))
                // Spot requests: /estimativa BEFORE /{spot_id}
                .route("/campanha/{id}/solicitacao-spot", web::get().to(spot_handlers::index))
                .route("/campanha/{id}/solicitacao-spot", web::post().to(spot_handlers::create))
                .route("/campanha/{id}/solicitacao-spot/estimativa", web::get().to(spot_handlers::estimate))
                .route("/campanha/{id}/solicitacao-spot/{spot_id}", web::post().to(spot_handlers::update))
                .route("/campanha/{id}/solicitacao-spot/{spot_id}/excluir", web::post().to(spot_handlers::delete))
                // Explanatory material: /ordem and /download BEFORE /{material_id}
                .route("/campanha/{id}/material-explicativo", web::get().to(material_handlers::index))
                .route("/campanha/{id}/material-explicativo", web::post().to(material_handlers::create))
                .route("/campanha/{id}/material-explicativo/ordem", web::post().to(material_handlers::reorder))
                .route("/campanha/{id}/material-explicativo/download", web::get().to(material_handlers::download))
                .route("/campanha/{id}/material-explicativo/{material_id}", web::post().to(material_handlers::update))
                .route("/campanha/{id}/material-explicativo/{material_id}/excluir", web::post().to(material_handlers::delete)),
        );
}

pub fn not_found_page() -> HttpResponse {
    let html = include_str!("../templates/errors/404.html");
    HttpResponse::NotFound()
        .content_type("text/html; charset=utf-8")
        .body(html)
}

pub async fn not_found() -> HttpResponse {
    not_found_page()
}
