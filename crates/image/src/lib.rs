//! Image buffers for the pose pipeline.
//!
//! `Image` is the only pixel container the pipeline accepts. Decoding from
//! encoded bytes goes through the `image` crate and always yields `Rgb8`.

pub mod error;
pub mod image;
pub mod pixelformat;

pub use error::ImageError;
pub use image::Image;
pub use pixelformat::PixelFormat;

use std::path::{Path, PathBuf};

fn decode_image_inner(data: &[u8]) -> Result<Image, ImageError> {
    let decoded = crates_image::load_from_memory(data)?;
    Ok(Image::from_rgb_image(decoded.to_rgb8()))
}

/// Decodes an encoded image (format auto-detected) into an `Rgb8` `Image`.
///
/// The CPU-bound decoding work runs on tokio's blocking thread pool.
///
/// # Errors
///
/// Returns `ImageError::Decode` if the data is invalid or the format is unsupported.
pub async fn decode_image(data: &[u8]) -> Result<Image, ImageError> {
    let owned = data.to_vec();
    tokio::task::spawn_blocking(move || decode_image_inner(&owned))
        .await
        .map_err(|e| ImageError::Decode(e.to_string()))?
}

/// Reads and decodes an image file into an `Rgb8` `Image`.
pub async fn load_image(path: impl AsRef<Path>) -> Result<Image, ImageError> {
    let path: PathBuf = path.as_ref().to_path_buf();
    tokio::task::spawn_blocking(move || {
        let bytes = std::fs::read(&path)?;
        decode_image_inner(&bytes)
    })
    .await
    .map_err(|e| ImageError::Io(e.to_string()))?
}
