//! Loading a local image for upload.

use postcraft_core::error::{PostcraftError, Result};
use postcraft_core::gateway::{ImageUpload, MAX_IMAGE_BYTES};
use std::path::Path;

/// Reads `path` into an `ImageUpload`, guessing the MIME type from the extension.
///
/// The size limit is checked from file metadata before the bytes are read.
pub async fn load_image(path: &Path) -> Result<ImageUpload> {
    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > MAX_IMAGE_BYTES as u64 {
        return Err(PostcraftError::upload(format!(
            "File size ({:.1} MB) exceeds the 10MB limit",
            metadata.len() as f64 / (1024.0 * 1024.0)
        )));
    }

    let mime = mime_guess::from_path(path).first_or_octet_stream();
    if mime.type_() != mime_guess::mime::IMAGE {
        return Err(PostcraftError::upload(format!(
            "{} is not an image ({})",
            path.display(),
            mime
        )));
    }

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| PostcraftError::upload("Path has no file name"))?;
    let bytes = tokio::fs::read(path).await?;

    Ok(ImageUpload::new(file_name, mime.essence_str(), bytes))
}
