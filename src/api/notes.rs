//! Note endpoints.
//!
//! ```text
//! GET    /            -> list_notes (?notebookId=&includeTags=true)
//! POST   /            -> create_note
//! GET    /{id}        -> get_note
//! PATCH  /{id}        -> update_note
//! DELETE /{id}        -> delete_note
//! GET    /{id}/html   -> render_note
//! ```

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::EntityId;
use crate::api::state::AppState;
use crate::api::views::{NoteView, RenderedNote};
use crate::markdown::render_markdown;
use crate::models::{NewNote, NoteUpdate};
use crate::utils::clean_tag_names;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_notes).post(create_note))
        .route(
            "/{id}",
            get(get_note).patch(update_note).delete(delete_note),
        )
        .route("/{id}/html", get(render_note))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotesQuery {
    pub notebook_id: Option<i64>,
    #[serde(default)]
    pub include_tags: bool,
}

/// Note fields plus an optional list of tag names to attach.
#[derive(Debug, Deserialize)]
pub struct CreateNoteRequest {
    #[serde(flatten)]
    pub note: NewNote,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// Partial note fields plus an optional target tag set. When `tags` is
/// present the note's tags are reconciled to exactly that list.
#[derive(Debug, Deserialize)]
pub struct UpdateNoteRequest {
    #[serde(flatten)]
    pub changes: NoteUpdate,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// GET /api/notes
///
/// Most recently updated first, optionally limited to one notebook.
pub async fn list_notes(
    State(state): State<AppState>,
    query: Result<Query<NotesQuery>, QueryRejection>,
) -> ApiResult<impl IntoResponse> {
    let Query(params) = query?;
    let store = state.store()?;

    let notes: Vec<NoteView> = store
        .get_notes(params.notebook_id)
        .into_iter()
        .map(|note| {
            if params.include_tags {
                NoteView::with_tags(&store, note)
            } else {
                NoteView::bare(note)
            }
        })
        .collect();
    tracing::debug!(count = notes.len(), notebook_id = ?params.notebook_id, "Listed notes");

    Ok(Json(notes))
}

/// GET /api/notes/{id}
pub async fn get_note(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> ApiResult<impl IntoResponse> {
    let store = state.store()?;
    let note = store.get_note(id).ok_or(ApiError::not_found("Note", id))?;
    Ok(Json(NoteView::with_tags(&store, note)))
}

/// GET /api/notes/{id}/html
///
/// The note's content rendered to sanitized HTML.
pub async fn render_note(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> ApiResult<impl IntoResponse> {
    let note = state
        .store()?
        .get_note(id)
        .ok_or(ApiError::not_found("Note", id))?;
    let html = render_markdown(&note.content);
    Ok(Json(RenderedNote { id, html }))
}

/// POST /api/notes
pub async fn create_note(
    State(state): State<AppState>,
    payload: Result<Json<CreateNoteRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(input) = payload?;
    let mut store = state.store()?;

    let note = store.create_note(input.note);
    let view = match input.tags {
        Some(tags) => {
            let names = clean_tag_names(&tags);
            let tags = store.set_note_tags(note.id, &names);
            NoteView {
                note,
                tags: Some(tags),
            }
        }
        None => NoteView::bare(note),
    };
    tracing::info!(note_id = view.note.id, "Note created");

    Ok((StatusCode::CREATED, Json(view)))
}

/// PATCH /api/notes/{id}
///
/// Always responds with the note's tags, whether or not they changed.
pub async fn update_note(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    payload: Result<Json<UpdateNoteRequest>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(input) = payload?;
    let mut store = state.store()?;

    let note = store
        .update_note(id, input.changes)
        .ok_or(ApiError::not_found("Note", id))?;
    if let Some(tags) = input.tags {
        let names = clean_tag_names(&tags);
        store.set_note_tags(id, &names);
    }
    tracing::info!(note_id = id, "Note updated");

    Ok(Json(NoteView::with_tags(&store, note)))
}

/// DELETE /api/notes/{id}
pub async fn delete_note(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> ApiResult<impl IntoResponse> {
    if !state.store()?.delete_note(id) {
        return Err(ApiError::not_found("Note", id));
    }
    tracing::info!(note_id = id, "Note deleted");

    Ok(StatusCode::NO_CONTENT)
}
