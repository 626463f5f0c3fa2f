//! Search endpoints.
//!
//! ```text
//! GET    /          -> search (?q=)
//! GET    /history   -> list_history
//! DELETE /history   -> clear_history
//! ```

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::api::views::NoteView;
use crate::models::{NewSearchHistoryItem, SearchHistoryItem};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(search))
        .route("/history", get(list_history).delete(clear_history))
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// GET /api/search?q=
///
/// Matching notes with their tags. A non-blank query is recorded in the
/// search history.
pub async fn search(
    State(state): State<AppState>,
    query: Result<Query<SearchQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(SearchQuery { q }) = query?;
    if q.trim().is_empty() {
        return Ok(Json(Vec::<NoteView>::new()));
    }

    let mut store = state.store()?;
    let results: Vec<NoteView> = store
        .search_notes(&q)
        .into_iter()
        .map(|note| NoteView::with_tags(&store, note))
        .collect();
    store.add_search_history(NewSearchHistoryItem::new(q));
    tracing::debug!(hits = results.len(), "Search completed");

    Ok(Json(results))
}

/// GET /api/search/history
///
/// The most recent searches, capped at the configured limit.
pub async fn list_history(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let limit = state.config.search_history_limit;
    let history: Vec<SearchHistoryItem> = state
        .store()?
        .get_search_history()
        .into_iter()
        .take(limit)
        .collect();
    Ok(Json(history))
}

/// DELETE /api/search/history
pub async fn clear_history(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let removed = state.store()?.clear_search_history();
    tracing::info!(removed, "Search history cleared");
    Ok(StatusCode::NO_CONTENT)
}
