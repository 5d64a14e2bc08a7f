//! Rotated region-of-interest extraction.
//!
//! Regions live in normalized image UV: origin at the bottom-left, y up, the
//! unit square covering the whole image. Rotations are applied in pixel
//! proportions so a square region stays square on non-square images.

use {
    crate::PoseError,
    base::{Mat3, Rect, Vec2},
    image::Image,
};

/// Transform mapping a point of the ROI unit square (UV) to image UV.
///
/// Recentres the unit square, scales it to the region's pixel extents,
/// rotates by `-rotation` so the subject appears upright in the ROI, moves it
/// to the region center and renormalizes by the image size.
pub fn region_to_image(region: Rect<f32>, rotation: f32, image_size: Vec2<usize>) -> Result<Mat3<f32>, PoseError> {
    if !region.is_valid() {
        return Err(PoseError::InvalidRegion(format!("degenerate region {region:?}")));
    }
    if !rotation.is_finite() {
        return Err(PoseError::InvalidRegion(format!("non-finite rotation {rotation}")));
    }
    if image_size.x == 0 || image_size.y == 0 {
        return Err(PoseError::InvalidInput("empty image".to_string()));
    }
    let pixels = image_size.as_f32();
    let center = region.center();
    let center_px = Vec2::new(center.x * pixels.x, center.y * pixels.y);
    let size_px = Vec2::new(region.size.x * pixels.x, region.size.y * pixels.y);

    let transform = Mat3::from_scale(Vec2::new(1.0 / pixels.x, 1.0 / pixels.y))
        * Mat3::from_translation(center_px)
        * Mat3::from_rotation(-rotation)
        * Mat3::from_scale(size_px)
        * Mat3::from_translation(Vec2::new(-0.5, -0.5));
    Ok(transform)
}

/// Scale of one ROI unit in image units: `|M(1, 0) - M(0, 0)|`.
///
/// Exact only when the transform scales uniformly, which holds for square
/// regions on square images.
pub fn depth_scale(transform: &Mat3<f32>) -> f32 {
    transform
        .transform_point(Vec2::new(1.0, 0.0))
        .distance_to(transform.transform_point(Vec2::new(0.0, 0.0)))
}

/// Crop `region` out of `source`, rotated by `rotation`, into a fresh
/// `roi_size` RGB image.
///
/// Samples that land outside the source get `fill_color`. Returns the ROI and
/// the (un-inverted) ROI-to-image transform.
pub fn extract_roi(
    source: &Image,
    region: Rect<f32>,
    rotation: f32,
    fill_color: [u8; 3],
    roi_size: Vec2<usize>,
) -> Result<(Image, Mat3<f32>), PoseError> {
    if !source.is_well_formed_rgb() {
        return Err(PoseError::InvalidInput(format!(
            "ROI source must be a non-empty Rgb8 image, got {:?} {}x{}",
            source.format,
            source.width(),
            source.height()
        )));
    }
    if roi_size.x == 0 || roi_size.y == 0 {
        return Err(PoseError::InvalidInput(format!("empty ROI size {roi_size:?}")));
    }
    let transform = region_to_image(region, rotation, source.size)?;
    if transform.inverse().is_none() {
        return Err(PoseError::InvalidRegion(format!("non-invertible transform for {region:?}")));
    }

    let source_px = source.size.as_f32();
    let roi_px = roi_size.as_f32();
    let mut data = Vec::with_capacity(roi_size.area() * 3);
    for y in 0..roi_size.y {
        for x in 0..roi_size.x {
            let roi_uv = Vec2::new((x as f32 + 0.5) / roi_px.x, 1.0 - (y as f32 + 0.5) / roi_px.y);
            let image_uv = transform.transform_point(roi_uv);
            let rgb = source.sample_bilinear(
                image_uv.x * source_px.x - 0.5,
                (1.0 - image_uv.y) * source_px.y - 0.5,
                fill_color,
            );
            data.extend(rgb.iter().map(|v| v.round().clamp(0.0, 255.0) as u8));
        }
    }

    Ok((Image::new(roi_size, data, image::PixelFormat::Rgb8), transform))
}
