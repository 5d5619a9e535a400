use crate::routes::constants::ERROR_SOMETHING_WENT_WRONG;
use crate::routes::utils::json_error;
use crate::startup::AppState;
use crate::telemetry::error_chain_fmt;
use crate::uploads::{ImageTypeError, image_extension, public_url, store_image};
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use bytes::Bytes;
use serde::Serialize;

const FILE_FIELD: &str = "file";

#[derive(thiserror::Error)]
pub enum UploadError {
    #[error("Es wurde keine Datei hochgeladen.")]
    MissingFile,
    #[error(transparent)]
    InvalidType(#[from] ImageTypeError),
    #[error("Die Datei ist zu groß.")]
    TooLarge,
    #[error(transparent)]
    Multipart(#[from] MultipartError),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for UploadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        match self {
            UploadError::MissingFile => json_error(StatusCode::BAD_REQUEST, self.to_string()),
            UploadError::InvalidType(_) => {
                json_error(StatusCode::UNSUPPORTED_MEDIA_TYPE, self.to_string())
            }
            UploadError::TooLarge => json_error(StatusCode::PAYLOAD_TOO_LARGE, self.to_string()),
            UploadError::Multipart(ref e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                json_error(StatusCode::PAYLOAD_TOO_LARGE, UploadError::TooLarge.to_string())
            }
            UploadError::Multipart(ref e) => json_error(e.status(), e.body_text()),
            UploadError::UnexpectedError(ref e) => {
                tracing::error!(error.cause_chain = ?e, "Image upload failed");
                json_error(StatusCode::INTERNAL_SERVER_ERROR, ERROR_SOMETHING_WENT_WRONG)
            }
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct UploadResponse {
    /// Public URL of the stored image
    pub url: String,
}

/// Admin: Upload a blog image
///
/// Expects a multipart body with an image in the `file` field.
#[utoipa::path(
    post,
    path = "/api/admin/blog/images",
    tag = "admin-blog",
    responses(
        (status = 200, description = "Image stored", body = UploadResponse),
        (status = 400, description = "No file in the request"),
        (status = 413, description = "File too large"),
        (status = 415, description = "Not a supported image"),
    )
)]
#[tracing::instrument(name = "Admin: Upload blog image", skip(state, multipart))]
pub async fn admin_upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, UploadError> {
    let mut upload: Option<(&'static str, Bytes)> = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let extension = image_extension(field.content_type())?;
        let data = field.bytes().await?;
        upload = Some((extension, data));
        break;
    }
    let (extension, data) = upload.ok_or(UploadError::MissingFile)?;
    if data.is_empty() {
        return Err(UploadError::MissingFile);
    }
    if data.len() > state.storage.max_upload_bytes {
        return Err(UploadError::TooLarge);
    }

    let file_name = store_image(&state.storage.upload_dir, &data, extension).await?;
    Ok(Json(UploadResponse {
        url: public_url(&state.storage.public_path, &file_name),
    }))
}
