//! Serving of stored recipe images

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::{error::ApiError, state::AppState};

/// Serve a stored recipe image by filename
pub async fn serve_recipe_image(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Response {
    match state.image_store.read(&filename).await {
        Some((data, content_type)) => {
            ([(header::CONTENT_TYPE, content_type)], data).into_response()
        }
        None => ApiError::NotFound.into_response(),
    }
}
