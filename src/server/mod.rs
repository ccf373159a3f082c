pub mod handlers;
pub mod page;

use crate::{config::Config, gemini::Generator, models::AnimationSet};
use actix_web::{web, App, HttpServer};
use std::sync::Arc;

/// Largest accepted request body; uploads arrive base64-encoded inside JSON.
pub const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Shared by every request and never mutated after start-up.
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<dyn Generator>,
    pub animations: Arc<AnimationSet>,
}

impl AppState {
    pub fn new(generator: Arc<dyn Generator>, animations: AnimationSet) -> Self {
        Self {
            generator,
            animations: Arc::new(animations),
        }
    }
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(MAX_BODY_BYTES)
            .error_handler(handlers::json_error),
    )
        .route("/", web::get().to(handlers::index))
        .route("/healthz", web::get().to(handlers::healthz))
        .route("/api/animations", web::get().to(handlers::animations))
        .route("/api/generate", web::post().to(handlers::generate));
}

pub async fn run(config: &Config, state: AppState) -> std::io::Result<()> {
    let data = web::Data::new(state);

    HttpServer::new(move || App::new().app_data(data.clone()).configure(routes))
        .workers(config.workers)
        .bind(config.bind_address())?
        .run()
        .await
}
