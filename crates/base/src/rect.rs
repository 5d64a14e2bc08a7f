use crate::Vec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect<T> {
    pub origin: Vec2<T>,
    pub size: Vec2<T>,
}

impl<T: Default> Default for Rect<T> {
    fn default() -> Self {
        Self {
            origin: Vec2::zero(),
            size: Vec2::zero(),
        }
    }
}

impl<T> Rect<T> {
    pub fn new(origin: Vec2<T>, size: Vec2<T>) -> Self {
        Self { origin, size }
    }
}

impl Rect<f32> {
    pub fn from_center(center: Vec2<f32>, size: Vec2<f32>) -> Self {
        Self {
            origin: center - size * 0.5,
            size,
        }
    }

    pub fn from_min_max(min: Vec2<f32>, max: Vec2<f32>) -> Self {
        Self {
            origin: min,
            size: max - min,
        }
    }

    pub fn max(&self) -> Vec2<f32> {
        self.origin + self.size
    }

    pub fn center(&self) -> Vec2<f32> {
        self.origin + self.size * 0.5
    }

    pub fn area(&self) -> f32 {
        self.size.x * self.size.y
    }

    /// True when both extents are strictly positive and every field is finite.
    pub fn is_valid(&self) -> bool {
        self.origin.is_finite() && self.size.is_finite() && self.size.x > 0.0 && self.size.y > 0.0
    }

    pub fn intersection(&self, other: Rect<f32>) -> Option<Rect<f32>> {
        let self_max = self.max();
        let other_max = other.max();
        let min = Vec2::new(
            self.origin.x.max(other.origin.x),
            self.origin.y.max(other.origin.y),
        );
        let max = Vec2::new(self_max.x.min(other_max.x), self_max.y.min(other_max.y));
        if max.x <= min.x || max.y <= min.y {
            return None;
        }
        Some(Rect::from_min_max(min, max))
    }
}
