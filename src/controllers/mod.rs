pub mod search;
pub mod admin;

use axum::{http::StatusCode, Router};
use std::sync::Arc;

use crate::config::AdminConfig;

pub fn routes(admin: &AdminConfig) -> Router<Arc<crate::AppState>> {
    Router::new()
        .merge(search::routes())
        .merge(admin::routes(&admin.path()))
}

// Всё, что не совпало ни с путём, ни с методом
pub async fn not_found() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not Found")
}
