pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod search;
pub mod store;
pub mod upload;
pub mod templates;
pub mod controllers;

use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

// Shared state для всего приложения: пул соединений и неизменяемый конфиг
#[derive(Clone)]
pub struct AppState {
    pub db: database::Database,
    pub config: config::Config,
    pub search: search::SeatSearch,
    pub uploads: upload::UploadProcessor,
}

impl AppState {
    pub async fn new(config: config::Config) -> Result<Arc<Self>, Box<dyn std::error::Error>> {
        let db = database::Database::new(&config.database.url, config.database.pool_size).await?;

        db.run_migrations().await?;

        Ok(Self::with_database(db, config))
    }

    /// Состояние поверх уже подготовленной базы (тесты, in-memory)
    pub fn with_database(db: database::Database, config: config::Config) -> Arc<Self> {
        let search = search::SeatSearch::new(db.pool.clone());
        let uploads = upload::UploadProcessor::new(db.clone(), config.admin.reject_empty_upload);

        Arc::new(Self {
            db,
            config,
            search,
            uploads,
        })
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(controllers::routes(&state.config.admin))
        .fallback(controllers::not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
