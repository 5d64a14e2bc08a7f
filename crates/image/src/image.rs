use {base::Vec2, std::borrow::Cow};

use crate::{ImageError, PixelFormat, pixelformat};

/// A pixel buffer with row-major, top-left-origin layout.
///
/// Images are never mutated once handed to the pose pipeline; every stage
/// that needs different pixels builds a new `Image`.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub size: Vec2<usize>,
    pub data: Vec<u8>,
    pub format: PixelFormat,
}

impl Image {
    pub fn new(size: Vec2<usize>, data: Vec<u8>, format: PixelFormat) -> Self {
        Self { size, data, format }
    }

    /// Like `new`, but checks the buffer length against `size` for packed formats.
    pub fn try_new(size: Vec2<usize>, data: Vec<u8>, format: PixelFormat) -> Result<Self, ImageError> {
        if let Some(bpp) = format.bytes_per_pixel() {
            let expected = size.area() * bpp;
            if data.len() != expected {
                return Err(ImageError::InvalidSize {
                    expected,
                    got: data.len(),
                });
            }
        }
        Ok(Self { size, data, format })
    }

    /// Solid RGB image.
    pub fn filled(size: Vec2<usize>, color: [u8; 3]) -> Self {
        let data = color.iter().copied().cycle().take(size.area() * 3).collect();
        Self::new(size, data, PixelFormat::Rgb8)
    }

    pub(crate) fn from_rgb_image(buffer: crates_image::RgbImage) -> Self {
        let (width, height) = buffer.dimensions();
        Self::new(
            Vec2::new(width as usize, height as usize),
            buffer.into_raw(),
            PixelFormat::Rgb8,
        )
    }

    pub fn width(&self) -> usize {
        self.size.x
    }

    pub fn height(&self) -> usize {
        self.size.y
    }

    pub fn is_empty(&self) -> bool {
        self.size.x == 0 || self.size.y == 0
    }

    /// True for an `Rgb8` image whose buffer matches its size.
    pub fn is_well_formed_rgb(&self) -> bool {
        self.format == PixelFormat::Rgb8 && !self.is_empty() && self.data.len() == self.size.area() * 3
    }

    /// Convert to `Rgb8`, decoding JPEG and dropping alpha where needed.
    pub fn to_rgb8(&self) -> Result<Image, ImageError> {
        self.as_rgb8().map(Cow::into_owned)
    }

    /// Like `to_rgb8`, but borrows images that are already `Rgb8`.
    pub fn as_rgb8(&self) -> Result<Cow<'_, Image>, ImageError> {
        let converted = match self.format {
            PixelFormat::Rgb8 => return Ok(Cow::Borrowed(self)),
            PixelFormat::Rgba8 => Image::try_new(self.size, pixelformat::rgba_to_rgb(&self.data), PixelFormat::Rgb8)?,
            PixelFormat::Argb8 => Image::try_new(self.size, pixelformat::argb_to_rgb(&self.data), PixelFormat::Rgb8)?,
            PixelFormat::Jpeg => pixelformat::jpeg_to_rgb(&self.data)?,
        };
        Ok(Cow::Owned(converted))
    }

    /// RGB value at integer pixel coordinates, or `None` outside the image.
    ///
    /// Only meaningful for `Rgb8` images.
    pub fn pixel(&self, x: isize, y: isize) -> Option<[u8; 3]> {
        if x < 0 || y < 0 || x as usize >= self.size.x || y as usize >= self.size.y {
            return None;
        }
        let i = (y as usize * self.size.x + x as usize) * 3;
        self.data.get(i..i + 3).map(|p| [p[0], p[1], p[2]])
    }

    /// Bilinear sample of an `Rgb8` image at continuous pixel coordinates,
    /// where `(0.0, 0.0)` is the center of the top-left pixel.
    ///
    /// Neighbors outside the image contribute `fill`.
    pub fn sample_bilinear(&self, x: f32, y: f32, fill: [u8; 3]) -> [f32; 3] {
        let x0 = x.floor();
        let y0 = y.floor();
        let fx = x - x0;
        let fy = y - y0;
        let (x0, y0) = (x0 as isize, y0 as isize);

        let fetch = |px: isize, py: isize| self.pixel(px, py).unwrap_or(fill);
        let p00 = fetch(x0, y0);
        let p10 = fetch(x0 + 1, y0);
        let p01 = fetch(x0, y0 + 1);
        let p11 = fetch(x0 + 1, y0 + 1);

        let mut out = [0.0f32; 3];
        for (c, value) in out.iter_mut().enumerate() {
            *value = p00[c] as f32 * (1.0 - fx) * (1.0 - fy)
                + p10[c] as f32 * fx * (1.0 - fy)
                + p01[c] as f32 * (1.0 - fx) * fy
                + p11[c] as f32 * fx * fy;
        }
        out
    }
}
