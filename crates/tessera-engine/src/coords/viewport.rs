use super::Vec2;

/// Viewport size in pixels.
///
/// Generators use it as the basis for converting pixel positions to NDC.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Maps a pixel position (top-left origin, +Y down) to NDC (+Y up).
    ///
    /// Degenerate viewports are treated as 1×1 so the result stays finite.
    #[inline]
    pub fn to_ndc(self, p: Vec2) -> [f32; 2] {
        let w = self.width.max(1.0);
        let h = self.height.max(1.0);
        [p.x / w * 2.0 - 1.0, 1.0 - p.y / h * 2.0]
    }
}
