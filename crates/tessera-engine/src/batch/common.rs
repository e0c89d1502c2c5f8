//! Pieces shared by the textured generators (textures and glyphs).

use bytemuck::{Pod, Zeroable};

use crate::coords::{Rect, Vec2, Viewport};
use crate::error::{BatchError, Result};
use crate::gpu::AttributeSpec;
use crate::paint::Color;

use super::VERTICES_PER_ITEM;

/// Raw flip selector carried by texture items.
///
/// Kept open like a C enum; resolved when the item is encoded.
#[repr(transparent)]
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct RenderEffects(pub u32);

impl RenderEffects {
    pub const NONE: RenderEffects = RenderEffects(0);
    pub const FLIP_HORIZONTALLY: RenderEffects = RenderEffects(1);
    pub const FLIP_VERTICALLY: RenderEffects = RenderEffects(2);
    pub const FLIP_BOTH: RenderEffects = RenderEffects(3);

    /// Returns `(flip_horizontally, flip_vertically)`.
    pub fn resolve(self) -> Result<(bool, bool)> {
        match self {
            Self::NONE => Ok((false, false)),
            Self::FLIP_HORIZONTALLY => Ok((true, false)),
            Self::FLIP_VERTICALLY => Ok((false, true)),
            Self::FLIP_BOTH => Ok((true, true)),
            RenderEffects(value) => {
                Err(BatchError::InvalidEnumValue { name: "RenderEffects", value })
            }
        }
    }
}

/// Vertex layout (32 bytes) shared by texture and glyph quads:
///
///  offset  0  position   [f32; 2]   loc 0  (NDC)
///  offset  8  tex_coord  [f32; 2]   loc 1  (0..1)
///  offset 16  tint       [f32; 4]   loc 2
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct TexturedVertex {
    pub position: [f32; 2],
    pub tex_coord: [f32; 2],
    pub tint: [f32; 4],
}

pub(super) const TEXTURED_ATTRIBUTES: [AttributeSpec; 3] = [
    AttributeSpec::new("vertex position", 2),
    AttributeSpec::new("texture coordinate", 2),
    AttributeSpec::new("tint color", 4),
];

/// Source region and placement of one textured quad.
pub(super) struct TexturedQuad {
    /// Region of the texture in texture pixels.
    pub src: Rect,
    /// Full texture (or atlas) size in pixels.
    pub texture_size: Vec2,
    /// On-screen rectangle before rotation.
    pub dest: Rect,
    /// Clockwise rotation in degrees about the center of `dest`.
    pub angle: f32,
    pub tint: Color,
    pub flip_h: bool,
    pub flip_v: bool,
}

impl TexturedQuad {
    pub fn vertices(&self, viewport: Viewport) -> [TexturedVertex; VERTICES_PER_ITEM] {
        let tw = self.texture_size.x.max(1.0);
        let th = self.texture_size.y.max(1.0);

        let (mut u0, mut u1) = (self.src.left() / tw, self.src.right() / tw);
        let (mut v0, mut v1) = (self.src.top() / th, self.src.bottom() / th);
        if self.flip_h {
            std::mem::swap(&mut u0, &mut u1);
        }
        if self.flip_v {
            std::mem::swap(&mut v0, &mut v1);
        }
        let uvs = [[u0, v0], [u1, v0], [u0, v1], [u1, v1]];

        let center = self.dest.center();
        let tint = self.tint.to_array();
        let corners = self.dest.corners();

        std::array::from_fn(|i| TexturedVertex {
            position: viewport.to_ndc(corners[i].rotate_around(center, self.angle)),
            tex_coord: uvs[i],
            tint,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad(flip_h: bool, flip_v: bool) -> TexturedQuad {
        TexturedQuad {
            src: Rect::new(0.0, 0.0, 50.0, 25.0),
            texture_size: Vec2::new(100.0, 100.0),
            dest: Rect::new(0.0, 0.0, 100.0, 50.0),
            angle: 0.0,
            tint: Color::WHITE,
            flip_h,
            flip_v,
        }
    }

    #[test]
    fn tex_coords_are_normalized_by_texture_size() {
        let v = quad(false, false).vertices(Viewport::new(100.0, 100.0));
        assert_eq!(v[0].tex_coord, [0.0, 0.0]);
        assert_eq!(v[1].tex_coord, [0.5, 0.0]);
        assert_eq!(v[2].tex_coord, [0.0, 0.25]);
        assert_eq!(v[3].tex_coord, [0.5, 0.25]);
    }

    #[test]
    fn flip_both_swaps_corners() {
        let v = quad(true, true).vertices(Viewport::new(100.0, 100.0));
        assert_eq!(v[0].tex_coord, [0.5, 0.25]);
        assert_eq!(v[3].tex_coord, [0.0, 0.0]);
    }

    #[test]
    fn positions_are_ndc() {
        let v = quad(false, false).vertices(Viewport::new(100.0, 100.0));
        assert_eq!(v[0].position, [-1.0, 1.0]);
        assert_eq!(v[1].position, [1.0, 1.0]);
        assert_eq!(v[2].position, [-1.0, 0.0]);
        assert_eq!(v[3].position, [1.0, 0.0]);
    }

    #[test]
    fn unknown_effect_is_rejected() {
        assert_eq!(
            RenderEffects(4).resolve(),
            Err(BatchError::InvalidEnumValue { name: "RenderEffects", value: 4 })
        );
        assert_eq!(RenderEffects::FLIP_VERTICALLY.resolve(), Ok((false, true)));
    }

    #[test]
    fn layout_matches_vertex_struct() {
        let layout = crate::gpu::VertexLayout::from_specs(&TEXTURED_ATTRIBUTES);
        assert_eq!(layout.stride() as usize, std::mem::size_of::<TexturedVertex>());
        assert_eq!(layout.stride(), 32);
    }
}
