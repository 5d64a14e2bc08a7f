mod common;

use {
    base::{Rect, Vec2},
    blazepose::{
        PoseError, extract_roi,
        roi::{depth_scale, region_to_image},
    },
    common::*,
    image::{Image, PixelFormat},
    std::f32::consts::{FRAC_PI_2, PI},
};

fn full_frame() -> Rect<f32> {
    Rect::new(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0))
}

fn quadrants() -> Image {
    // top-left red, top-right green, bottom-left blue, bottom-right white
    let data = vec![255, 0, 0, 0, 255, 0, 0, 0, 255, 255, 255, 255];
    Image::try_new(Vec2::new(2, 2), data, PixelFormat::Rgb8).unwrap()
}

#[test]
fn full_frame_region_is_identity() {
    let transform = region_to_image(full_frame(), 0.0, Vec2::new(320, 240)).unwrap();
    for p in [Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0), Vec2::new(0.25, 0.6)] {
        let q = transform.transform_point(p);
        assert_close(q.x, p.x, 1e-5);
        assert_close(q.y, p.y, 1e-5);
    }
}

#[test]
fn rotation_keeps_region_center_fixed() {
    let region = Rect::from_center(Vec2::new(0.3, 0.6), Vec2::new(0.2, 0.2));
    let transform = region_to_image(region, 1.1, Vec2::new(200, 200)).unwrap();
    let center = transform.transform_point(Vec2::new(0.5, 0.5));
    assert_close(center.x, 0.3, 1e-5);
    assert_close(center.y, 0.6, 1e-5);
}

#[test]
fn quarter_turn_keeps_depth_scale() {
    let region = Rect::from_center(Vec2::new(0.5, 0.5), Vec2::new(0.3, 0.3));
    let upright = region_to_image(region, 0.0, Vec2::new(128, 128)).unwrap();
    let turned = region_to_image(region, FRAC_PI_2, Vec2::new(128, 128)).unwrap();
    assert_close(depth_scale(&upright), 0.3, 1e-5);
    assert_close(depth_scale(&turned), 0.3, 1e-5);
}

#[test]
fn zero_area_region_is_invalid() {
    let flat = Rect::new(Vec2::new(0.2, 0.2), Vec2::new(0.0, 0.5));
    assert!(matches!(
        extract_roi(&quadrants(), flat, 0.0, [0, 0, 0], Vec2::new(4, 4)),
        Err(PoseError::InvalidRegion(_))
    ));
    let nan = Rect::new(Vec2::new(f32::NAN, 0.2), Vec2::new(0.5, 0.5));
    assert!(matches!(
        region_to_image(nan, 0.0, Vec2::new(4, 4)),
        Err(PoseError::InvalidRegion(_))
    ));
    assert!(matches!(
        region_to_image(full_frame(), f32::INFINITY, Vec2::new(4, 4)),
        Err(PoseError::InvalidRegion(_))
    ));
}

#[test]
fn non_rgb_source_is_invalid_input() {
    let rgba = Image::new(Vec2::new(2, 2), vec![0; 16], PixelFormat::Rgba8);
    assert!(matches!(
        extract_roi(&rgba, full_frame(), 0.0, [0, 0, 0], Vec2::new(2, 2)),
        Err(PoseError::InvalidInput(_))
    ));
}

#[test]
fn full_frame_crop_reproduces_the_image() {
    let source = quadrants();
    let (roi, _) = extract_roi(&source, full_frame(), 0.0, [0, 0, 0], Vec2::new(2, 2)).unwrap();
    assert_eq!(roi.data, source.data);
    assert_eq!(roi.format, PixelFormat::Rgb8);
}

#[test]
fn half_turn_flips_both_axes() {
    let source = quadrants();
    let (roi, transform) = extract_roi(&source, full_frame(), PI, [0, 0, 0], Vec2::new(2, 2)).unwrap();
    assert_eq!(roi.pixel(0, 0), Some([255, 255, 255]));
    assert_eq!(roi.pixel(1, 0), Some([0, 0, 255]));
    assert_eq!(roi.pixel(0, 1), Some([0, 255, 0]));
    assert_eq!(roi.pixel(1, 1), Some([255, 0, 0]));
    let corner = transform.transform_point(Vec2::new(0.0, 0.0));
    assert_close(corner.x, 1.0, 1e-5);
    assert_close(corner.y, 1.0, 1e-5);
}

#[test]
fn region_outside_the_image_is_filled() {
    let region = Rect::from_center(Vec2::new(3.0, 3.0), Vec2::new(0.5, 0.5));
    let (roi, _) = extract_roi(&gray_image(16, 16), region, 0.3, [10, 20, 30], Vec2::new(8, 8)).unwrap();
    assert_eq!(roi.size, Vec2::new(8, 8));
    assert!(roi.data.chunks_exact(3).all(|p| p == [10, 20, 30]));
}

#[test]
fn crop_of_a_uniform_image_is_uniform() {
    let region = Rect::from_center(Vec2::new(0.5, 0.5), Vec2::new(0.25, 0.25));
    let (roi, _) = extract_roi(&gray_image(64, 48), region, 0.7, [0, 0, 0], Vec2::new(16, 16)).unwrap();
    assert!(roi.data.iter().all(|&v| v == 128));
}

#[test]
fn depth_scale_follows_rotation_on_non_square_frames() {
    // a 200 pixel square on 640x480: the unit step spans 200 pixels along
    // whichever image axis it is rotated onto, normalized by that axis
    let region = Rect::from_center(Vec2::new(0.5, 0.5), Vec2::new(200.0 / 640.0, 200.0 / 480.0));
    let size = Vec2::new(640, 480);
    let upright = region_to_image(region, 0.0, size).unwrap();
    let quarter = region_to_image(region, FRAC_PI_2, size).unwrap();
    assert_close(depth_scale(&upright), 200.0 / 640.0, 1e-5);
    assert_close(depth_scale(&quarter), 200.0 / 480.0, 1e-5);
}
