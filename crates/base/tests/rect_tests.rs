use base::{Rect, Vec2};

#[test]
fn test_from_center_round_trip() {
    let r = Rect::from_center(Vec2::new(0.5, 0.5), Vec2::new(0.2, 0.4));
    assert!((r.origin.x - 0.4).abs() < 1e-6);
    assert!((r.origin.y - 0.3).abs() < 1e-6);
    assert_eq!(r.center(), Vec2::new(0.5, 0.5));
}

#[test]
fn test_area() {
    let r = Rect::new(Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0));
    assert_eq!(r.area(), 12.0);
}

#[test]
fn test_is_valid_rejects_zero_and_nan() {
    assert!(Rect::new(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0)).is_valid());
    assert!(!Rect::new(Vec2::new(0.0, 0.0), Vec2::new(0.0, 1.0)).is_valid());
    assert!(!Rect::new(Vec2::new(0.0, 0.0), Vec2::new(1.0, -1.0)).is_valid());
    assert!(!Rect::new(Vec2::new(f32::NAN, 0.0), Vec2::new(1.0, 1.0)).is_valid());
}

#[test]
fn test_intersection_partial_overlap() {
    let a = Rect::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
    let b = Rect::new(Vec2::new(5.0, 5.0), Vec2::new(10.0, 10.0));
    let i = a.intersection(b).expect("overlap");
    assert_eq!(i.origin, Vec2::new(5.0, 5.0));
    assert_eq!(i.size, Vec2::new(5.0, 5.0));
}

#[test]
fn test_intersection_disjoint_and_touching() {
    let a = Rect::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
    let far = Rect::new(Vec2::new(20.0, 20.0), Vec2::new(5.0, 5.0));
    let touching = Rect::new(Vec2::new(10.0, 0.0), Vec2::new(5.0, 5.0));
    assert!(a.intersection(far).is_none());
    assert!(a.intersection(touching).is_none());
}
