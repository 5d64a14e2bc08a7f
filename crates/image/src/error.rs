use std::fmt;

use crate::PixelFormat;

#[derive(Debug)]
pub enum ImageError {
    Decode(String),
    Io(String),
    InvalidSize { expected: usize, got: usize },
    UnsupportedFormat(PixelFormat),
}

impl fmt::Display for ImageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageError::Decode(msg) => write!(f, "decode error: {msg}"),
            ImageError::Io(msg) => write!(f, "io error: {msg}"),
            ImageError::InvalidSize { expected, got } => {
                write!(f, "pixel buffer holds {got} bytes, expected {expected}")
            }
            ImageError::UnsupportedFormat(format) => {
                write!(f, "unsupported pixel format: {format:?}")
            }
        }
    }
}

impl std::error::Error for ImageError {}

impl From<crates_image::ImageError> for ImageError {
    fn from(err: crates_image::ImageError) -> Self {
        ImageError::Decode(err.to_string())
    }
}

impl From<std::io::Error> for ImageError {
    fn from(err: std::io::Error) -> Self {
        ImageError::Io(err.to_string())
    }
}
