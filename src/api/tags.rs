//! Tag endpoints.
//!
//! ```text
//! GET    /            -> list_tags
//! POST   /            -> create_tag
//! PATCH  /{id}        -> update_tag
//! DELETE /{id}        -> delete_tag
//! GET    /{id}/notes  -> list_tag_notes
//! ```

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, patch};
use axum::{Json, Router};

use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::EntityId;
use crate::api::state::AppState;
use crate::api::views::{NoteView, TagView};
use crate::models::{NewTag, TagUpdate};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tags).post(create_tag))
        .route("/{id}", patch(update_tag).delete(delete_tag))
        .route("/{id}/notes", get(list_tag_notes))
}

fn clean_name(name: &str) -> ApiResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::Validation("Tag name must not be empty".to_string()));
    }
    Ok(name.to_string())
}

/// GET /api/tags
///
/// Every tag with the number of notes carrying it.
pub async fn list_tags(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let store = state.store()?;
    let tags: Vec<TagView> = store
        .get_tags()
        .into_iter()
        .map(|tag| TagView::build(&store, tag))
        .collect();
    Ok(Json(tags))
}

/// GET /api/tags/{id}/notes
pub async fn list_tag_notes(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> ApiResult<impl IntoResponse> {
    let store = state.store()?;
    if store.get_tag(id).is_none() {
        return Err(ApiError::not_found("Tag", id));
    }

    let notes: Vec<NoteView> = store
        .get_note_ids_by_tag(id)
        .into_iter()
        .filter_map(|note_id| store.get_note(note_id))
        .map(|note| NoteView::with_tags(&store, note))
        .collect();
    Ok(Json(notes))
}

/// POST /api/tags
///
/// Returns the existing tag when the name is already taken (ignoring case).
pub async fn create_tag(
    State(state): State<AppState>,
    payload: Result<Json<NewTag>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(input) = payload?;
    let name = clean_name(&input.name)?;

    let tag = state.store()?.create_tag(NewTag::new(name));
    tracing::info!(tag_id = tag.id, name = %tag.name, "Tag created");

    Ok((StatusCode::CREATED, Json(tag)))
}

/// PATCH /api/tags/{id}
///
/// Renaming onto a name another tag already has is a conflict.
pub async fn update_tag(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    payload: Result<Json<TagUpdate>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(input) = payload?;
    let mut store = state.store()?;
    if store.get_tag(id).is_none() {
        return Err(ApiError::not_found("Tag", id));
    }

    let name = match input.name {
        Some(name) => {
            let name = clean_name(&name)?;
            if let Some(other) = store.get_tag_by_name(&name) {
                if other.id != id {
                    return Err(ApiError::Conflict(format!(
                        "Tag \"{}\" already exists",
                        other.name
                    )));
                }
            }
            Some(name)
        }
        None => None,
    };

    let tag = store
        .update_tag(id, TagUpdate { name })
        .ok_or(ApiError::not_found("Tag", id))?;
    tracing::info!(tag_id = id, "Tag updated");

    Ok(Json(tag))
}

/// DELETE /api/tags/{id}
///
/// Detaches the tag from every note before removing it.
pub async fn delete_tag(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> ApiResult<impl IntoResponse> {
    if !state.store()?.delete_tag(id) {
        return Err(ApiError::not_found("Tag", id));
    }
    tracing::info!(tag_id = id, "Tag deleted");

    Ok(StatusCode::NO_CONTENT)
}
