use core::ops::{Add, Mul, Neg, Sub};

/// 2D vector in pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2::new(0.0, 0.0);

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Unit vector in the same direction, or `None` for a zero-length vector.
    #[inline]
    pub fn try_normalize(self) -> Option<Vec2> {
        let len = self.length();
        if len > 0.0 && len.is_finite() {
            Some(Vec2::new(self.x / len, self.y / len))
        } else {
            None
        }
    }

    /// Counter-clockwise perpendicular in +Y-down space.
    #[inline]
    pub fn perp(self) -> Vec2 {
        Vec2::new(-self.y, self.x)
    }

    /// Rotates the vector by `degrees` around `origin`.
    ///
    /// Positive angles rotate clockwise on screen because +Y points down.
    pub fn rotate_around(self, origin: Vec2, degrees: f32) -> Vec2 {
        if degrees == 0.0 {
            return self;
        }
        let (sin, cos) = degrees.to_radians().sin_cos();
        let d = self - origin;
        Vec2::new(
            origin.x + d.x * cos - d.y * sin,
            origin.y + d.x * sin + d.y * cos,
        )
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    #[inline]
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < 1e-4 && (a.y - b.y).abs() < 1e-4
    }

    #[test]
    fn zero_length_does_not_normalize() {
        assert!(Vec2::ZERO.try_normalize().is_none());
    }

    #[test]
    fn normalize_unit_length() {
        let n = Vec2::new(3.0, 4.0).try_normalize().unwrap();
        assert!(close(n, Vec2::new(0.6, 0.8)));
    }

    #[test]
    fn rotate_quarter_turn_is_clockwise_on_screen() {
        // +X rotated 90° lands on +Y, which is "down" in pixel space.
        let p = Vec2::new(10.0, 0.0).rotate_around(Vec2::ZERO, 90.0);
        assert!(close(p, Vec2::new(0.0, 10.0)));
    }

    #[test]
    fn rotate_zero_is_identity() {
        let p = Vec2::new(5.0, -2.0);
        assert_eq!(p.rotate_around(Vec2::new(1.0, 1.0), 0.0), p);
    }
}
