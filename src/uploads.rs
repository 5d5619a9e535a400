//! Blog image storage on the local filesystem.

use anyhow::Context;
use std::path::Path;
use uuid::Uuid;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ImageTypeError {
    #[error("Bitte laden Sie nur Bilddateien hoch.")]
    NotAnImage,
    #[error("Dieses Bildformat wird nicht unterstützt.")]
    UnsupportedImage,
}

/// File extension for an accepted image MIME type. SVG is refused because
/// it can carry scripts.
pub fn image_extension(content_type: Option<&str>) -> Result<&'static str, ImageTypeError> {
    let mime = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|ct| ct.trim().to_ascii_lowercase())
        .ok_or(ImageTypeError::NotAnImage)?;
    let Some(subtype) = mime.strip_prefix("image/") else {
        return Err(ImageTypeError::NotAnImage);
    };
    match subtype {
        "jpeg" | "jpg" | "pjpeg" => Ok("jpg"),
        "png" => Ok("png"),
        "gif" => Ok("gif"),
        "webp" => Ok("webp"),
        "avif" => Ok("avif"),
        _ => Err(ImageTypeError::UnsupportedImage),
    }
}

/// Writes the image under a fresh random name and returns that name.
#[tracing::instrument(name = "Store uploaded image", skip(data), fields(size = data.len()))]
pub async fn store_image(
    upload_dir: &Path,
    data: &[u8],
    extension: &str,
) -> Result<String, anyhow::Error> {
    tokio::fs::create_dir_all(upload_dir)
        .await
        .with_context(|| format!("Failed to create {}", upload_dir.display()))?;
    let file_name = format!("{}.{}", Uuid::new_v4(), extension);
    tokio::fs::write(upload_dir.join(&file_name), data)
        .await
        .context("Failed to write the uploaded image.")?;
    Ok(file_name)
}

pub fn public_url(public_path: &str, file_name: &str) -> String {
    format!("{}/{}", public_path.trim_end_matches('/'), file_name)
}
