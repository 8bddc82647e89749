pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod sessions;
pub mod sheet_client;
pub mod controllers;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use sessions::SessionStore;
use sheet_client::SheetClient;

pub use sessions::PageHandle;

// Shared state для всего приложения
pub struct AppState {
    pub config: config::Config,
    pub sheet: SheetClient,
    /// Открытые страницы бронирования по идентификатору сессии.
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(config: config::Config) -> Result<Arc<Self>, reqwest::Error> {
        let sheet = SheetClient::new(&config.backend)?;
        let sessions = SessionStore::new(config.sessions.ttl);
        Ok(Arc::new(Self {
            config,
            sheet,
            sessions,
        }))
    }
}

// Главный роутер приложения
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "Seat booking widget v0.1" }))
        .route("/health", get(|| async { "OK" }))
        .nest("/api", controllers::routes())
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
