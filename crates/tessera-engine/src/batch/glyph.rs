use crate::coords::{Rect, Vec2, Viewport};
use crate::error::Result;
use crate::gpu::AttributeSpec;
use crate::paint::Color;

use super::common::{TexturedQuad, TEXTURED_ATTRIBUTES};
use super::{BatchBuffers, BatchKind, GpuBuffer, Primitive, TexturedVertex, VERTICES_PER_ITEM};

/// One glyph sampled from a font atlas.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GlyphItem {
    pub glyph: char,
    /// Atlas texture identity.
    pub texture_id: u32,
    /// Atlas size in pixels.
    pub atlas_size: Vec2,
    /// Glyph bounds inside the atlas, in atlas pixels.
    pub glyph_bounds: Rect,
    /// Center of the glyph quad on screen, in pixels.
    pub position: Vec2,
    pub scale: f32,
    /// Clockwise rotation in degrees.
    pub angle: f32,
    pub tint: Color,
}

impl GlyphItem {
    /// On-screen rectangle before rotation; glyphs keep their atlas size times `scale`.
    pub fn dest_rect(&self) -> Rect {
        Rect::from_center(self.position, self.glyph_bounds.size * self.scale)
    }
}

/// Glyph batch strategy.
#[derive(Debug, Copy, Clone, Default)]
pub struct Glyphs;

impl Primitive for Glyphs {
    const KIND: BatchKind = BatchKind::Glyph;
    type Item = GlyphItem;
    type Vertex = TexturedVertex;

    fn attributes() -> &'static [AttributeSpec] {
        &TEXTURED_ATTRIBUTES
    }

    fn encode(item: &GlyphItem, viewport: Viewport) -> Result<[TexturedVertex; VERTICES_PER_ITEM]> {
        let quad = TexturedQuad {
            src: item.glyph_bounds,
            texture_size: item.atlas_size,
            dest: item.dest_rect(),
            angle: item.angle,
            tint: item.tint,
            flip_h: false,
            flip_v: false,
        };
        Ok(quad.vertices(viewport))
    }

    fn select(buffers: &mut BatchBuffers) -> &mut GpuBuffer<Self> {
        &mut buffers.glyph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyph() -> GlyphItem {
        GlyphItem {
            glyph: 'g',
            texture_id: 3,
            atlas_size: Vec2::new(256.0, 128.0),
            glyph_bounds: Rect::new(64.0, 32.0, 16.0, 32.0),
            position: Vec2::new(100.0, 50.0),
            scale: 1.0,
            angle: 0.0,
            tint: Color::BLACK,
        }
    }

    #[test]
    fn samples_glyph_bounds_from_atlas() {
        let v = Glyphs::encode(&glyph(), Viewport::new(200.0, 100.0)).unwrap();
        assert_eq!(v[0].tex_coord, [0.25, 0.25]);
        assert_eq!(v[3].tex_coord, [0.3125, 0.5]);
    }

    #[test]
    fn quad_matches_scaled_glyph_size() {
        let mut g = glyph();
        g.scale = 0.5;
        assert_eq!(g.dest_rect(), Rect::new(96.0, 42.0, 8.0, 16.0));

        let v = Glyphs::encode(&g, Viewport::new(200.0, 100.0)).unwrap();
        assert_eq!(v[0].position, [96.0 / 100.0 - 1.0, 1.0 - 42.0 / 50.0]);
    }
}
