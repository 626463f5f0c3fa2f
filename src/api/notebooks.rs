//! Notebook endpoints.
//!
//! ```text
//! GET    /         -> list_notebooks
//! POST   /         -> create_notebook
//! GET    /{id}     -> get_notebook
//! PATCH  /{id}     -> update_notebook
//! DELETE /{id}     -> delete_notebook
//! ```

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::EntityId;
use crate::api::state::AppState;
use crate::api::views::NotebookView;
use crate::models::{NewNotebook, NotebookUpdate};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_notebooks).post(create_notebook))
        .route(
            "/{id}",
            get(get_notebook)
                .patch(update_notebook)
                .delete(delete_notebook),
        )
}

fn require_name(name: &str) -> ApiResult<()> {
    if name.trim().is_empty() {
        return Err(ApiError::Validation(
            "Notebook name must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// GET /api/notebooks
///
/// Every notebook with the number of notes it holds.
pub async fn list_notebooks(State(state): State<AppState>) -> ApiResult<impl IntoResponse> {
    let store = state.store()?;
    let notebooks: Vec<NotebookView> = store
        .get_notebooks()
        .into_iter()
        .map(|nb| NotebookView::build(&store, nb))
        .collect();
    Ok(Json(notebooks))
}

/// GET /api/notebooks/{id}
pub async fn get_notebook(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> ApiResult<impl IntoResponse> {
    let store = state.store()?;
    let notebook = store
        .get_notebook(id)
        .ok_or(ApiError::not_found("Notebook", id))?;
    Ok(Json(NotebookView::build(&store, notebook)))
}

/// POST /api/notebooks
pub async fn create_notebook(
    State(state): State<AppState>,
    payload: Result<Json<NewNotebook>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(input) = payload?;
    require_name(&input.name)?;

    let notebook = state.store()?.create_notebook(input);
    tracing::info!(notebook_id = notebook.id, name = %notebook.name, "Notebook created");

    Ok((StatusCode::CREATED, Json(notebook)))
}

/// PATCH /api/notebooks/{id}
pub async fn update_notebook(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    payload: Result<Json<NotebookUpdate>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(input) = payload?;
    if let Some(name) = &input.name {
        require_name(name)?;
    }

    let notebook = state
        .store()?
        .update_notebook(id, input)
        .ok_or(ApiError::not_found("Notebook", id))?;
    tracing::info!(notebook_id = id, "Notebook updated");

    Ok(Json(notebook))
}

/// DELETE /api/notebooks/{id}
///
/// Notes in the notebook are left untouched and keep pointing at it.
pub async fn delete_notebook(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> ApiResult<impl IntoResponse> {
    if !state.store()?.delete_notebook(id) {
        return Err(ApiError::not_found("Notebook", id));
    }
    tracing::info!(notebook_id = id, "Notebook deleted");

    Ok(StatusCode::NO_CONTENT)
}
