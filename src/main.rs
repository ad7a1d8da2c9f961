use actix_web::{App, HttpServer, middleware, web};

use attini::app::{self, AppState};
use attini::auth::rate_limit::RateLimiter;
use attini::config::AppConfig;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let bind_addr = config.bind_addr.clone();
    let secret_key = config.session_key();
    let state = AppState::connect(config)
        .await
        .map_err(|e| std::io::Error::other(format!("Failed to set up backend: {e}")))?;
    let limiter = RateLimiter::new();

    log::info!("Starting {} at http://{}", state.config.app_name, bind_addr);

    HttpServer::new(move || {
        App::new()
            .wrap(app::session_middleware(secret_key.clone()))
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(limiter.clone()))
            .configure(app::routes)
            // Default 404 handler (must be registered last)
            .default_service(web::to(app::not_found))
    })
    .bind(bind_addr)?
    .run()
    .await
}
