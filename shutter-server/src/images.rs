//! Image upload and download routes.
//!
//! Uploaded images are stored as `<id>.jpg` under the uploads directory,
//! with ids from the store's document-id generator. Download only serves
//! names matching `^\w+\.jpg$`, so a request can never walk out of the
//! uploads directory.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use regex::Regex;
use serde::Serialize;
use std::io;
use std::sync::LazyLock;

use crate::app::AppState;
use crate::error::ApiError;

static IMAGE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\w+\.jpg$").expect("valid pattern"));

pub async fn get_image(State(state): State<AppState>, Path(file_name): Path<String>) -> Response {
    if !IMAGE_NAME.is_match(&file_name) {
        return StatusCode::NOT_FOUND.into_response();
    }
    let path = state.uploads_dir.join(&file_name);
    match tokio::fs::read(&path).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, "image/jpeg")], bytes).into_response(),
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            StatusCode::NOT_FOUND.into_response()
        }
        Err(error) => {
            log::error!("Failed to read image '{}': {}", path.display(), error);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
}

pub async fn upload_image(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<UploadResponse>, ApiError> {
    tokio::fs::create_dir_all(&state.uploads_dir).await?;
    let file_name = format!("{}.jpg", shutter::new_document_id());
    let path = state.uploads_dir.join(&file_name);
    tokio::fs::write(&path, &body).await?;
    log::info!("Stored upload '{}' ({} bytes)", file_name, body.len());
    Ok(Json(UploadResponse {
        url: format!("/images/{file_name}"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_names_are_strictly_validated() {
        assert!(IMAGE_NAME.is_match("abc123.jpg"));
        assert!(IMAGE_NAME.is_match("a_b.jpg"));
        assert!(!IMAGE_NAME.is_match("abc.png"));
        assert!(!IMAGE_NAME.is_match("../etc/passwd"));
        assert!(!IMAGE_NAME.is_match("a/b.jpg"));
        assert!(!IMAGE_NAME.is_match(".jpg"));
        assert!(!IMAGE_NAME.is_match("a.b.jpg"));
    }
}
