use axum::{
    extract::{RawQuery, State},
    response::Html,
    routing::get,
    Router,
};
use std::sync::Arc;
use tracing::error;

use crate::error::AppError;
use crate::models::SeatRecord;
use crate::search::{SearchQuery, TRUNCATION_WARNING};
use crate::templates::{self, Notice};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(search_seats).fallback(super::not_found))
}

pub const SEARCH_FAILED: &str = "Error: failed to look up seats";

/// Первое значение `name` из строки запроса; повторы игнорируются
pub fn first_name_param(raw_query: Option<&str>) -> Option<String> {
    // Битая строка запроса - просто пустая форма
    let pairs: Vec<(String, String)> = serde_urlencoded::from_str(raw_query?).ok()?;
    pairs
        .into_iter()
        .find(|(key, _)| key == "name")
        .map(|(_, value)| value)
}

// GET /?name=...
pub async fn search_seats(
    State(state): State<Arc<AppState>>,
    RawQuery(raw_query): RawQuery,
) -> Html<String> {
    let Some(name) = first_name_param(raw_query.as_deref()) else {
        return Html(templates::search_page(&[], &[], ""));
    };

    let query = SearchQuery::parse(&name);
    if query.is_empty() {
        let notice = Notice::warning(AppError::EmptySearchInput.to_string());
        return Html(templates::search_page(&[notice], &[], ""));
    }

    match state.search.search(&query).await {
        Ok(results) => {
            let notices = search_notices(&query, &results);
            Html(templates::search_page(&notices, &results, &name))
        }
        Err(e) => {
            error!("Failed to search seats for {:?}: {:?}", name, e);
            let notice = Notice::warning(SEARCH_FAILED);
            Html(templates::search_page(&[notice], &[], &name))
        }
    }
}

/// Сообщения к результатам: «не найдено» и предупреждение об обрезке слов
pub fn search_notices(query: &SearchQuery, results: &[SeatRecord]) -> Vec<Notice> {
    let mut notices = Vec::new();
    if results.is_empty() {
        notices.push(Notice::warning(AppError::NoRecordFound.to_string()));
    }
    if query.truncated {
        notices.push(Notice::warning(TRUNCATION_WARNING));
    }
    notices
}
