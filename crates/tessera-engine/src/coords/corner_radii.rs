/// Per-corner radii for a rounded rectangle (pixels).
///
/// Field order follows the vertex attribute order of the shape buffer:
/// top-left, bottom-left, bottom-right, top-right.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct CornerRadii {
    pub top_left: f32,
    pub bottom_left: f32,
    pub bottom_right: f32,
    pub top_right: f32,
}

impl CornerRadii {
    #[inline]
    pub const fn new(top_left: f32, bottom_left: f32, bottom_right: f32, top_right: f32) -> Self {
        Self { top_left, bottom_left, bottom_right, top_right }
    }

    /// Uniform radius on all four corners.
    #[inline]
    pub const fn all(r: f32) -> Self {
        Self { top_left: r, bottom_left: r, bottom_right: r, top_right: r }
    }

    /// No rounding.
    #[inline]
    pub const fn zero() -> Self {
        Self::all(0.0)
    }

    /// Clamps every radius into `[0, max]`.
    #[inline]
    pub fn clamped(self, max: f32) -> Self {
        let max = max.max(0.0);
        Self {
            top_left: self.top_left.clamp(0.0, max),
            bottom_left: self.bottom_left.clamp(0.0, max),
            bottom_right: self.bottom_right.clamp(0.0, max),
            top_right: self.top_right.clamp(0.0, max),
        }
    }
}
