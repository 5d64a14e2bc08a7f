use crate::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Rgb8,
    Rgba8,
    Argb8,
    /// Encoded JPEG bytes; `size` is advisory until decoded.
    Jpeg,
}

impl PixelFormat {
    /// Bytes per pixel for packed formats, `None` for encoded ones.
    pub fn bytes_per_pixel(&self) -> Option<usize> {
        match self {
            PixelFormat::Rgb8 => Some(3),
            PixelFormat::Rgba8 | PixelFormat::Argb8 => Some(4),
            PixelFormat::Jpeg => None,
        }
    }
}

pub(crate) fn rgba_to_rgb(data: &[u8]) -> Vec<u8> {
    data.chunks_exact(4).flat_map(|c| [c[0], c[1], c[2]]).collect()
}

pub(crate) fn argb_to_rgb(data: &[u8]) -> Vec<u8> {
    data.chunks_exact(4).flat_map(|c| [c[1], c[2], c[3]]).collect()
}

pub(crate) fn jpeg_to_rgb(data: &[u8]) -> Result<Image, ImageError> {
    let decoded = crates_image::load_from_memory_with_format(data, crates_image::ImageFormat::Jpeg)?;
    Ok(Image::from_rgb_image(decoded.to_rgb8()))
}
