use crate::coords::{Rect, Vec2, Viewport};
use crate::error::Result;
use crate::gpu::AttributeSpec;
use crate::paint::Color;

use super::common::{TexturedQuad, TEXTURED_ATTRIBUTES};
use super::{
    BatchBuffers, BatchKind, GpuBuffer, Primitive, RenderEffects, TexturedVertex, VERTICES_PER_ITEM,
};

/// One textured quad.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TextureItem {
    /// Texture identity; items sharing it can be drawn in one call.
    pub texture_id: u32,
    /// Full texture size in pixels.
    pub texture_size: Vec2,
    /// Region of the texture to sample, in texture pixels.
    pub src_rect: Rect,
    /// Center of the quad on screen, in pixels.
    pub position: Vec2,
    /// Quad size in pixels before scaling.
    pub size: Vec2,
    pub scale: f32,
    /// Clockwise rotation in degrees.
    pub angle: f32,
    pub tint: Color,
    pub effects: RenderEffects,
}

impl TextureItem {
    /// Draws the whole texture at its natural size, centered on `position`.
    pub fn new(texture_id: u32, texture_size: Vec2, position: Vec2) -> Self {
        Self {
            texture_id,
            texture_size,
            src_rect: Rect::new(0.0, 0.0, texture_size.x, texture_size.y),
            position,
            size: texture_size,
            scale: 1.0,
            angle: 0.0,
            tint: Color::WHITE,
            effects: RenderEffects::NONE,
        }
    }

    /// On-screen rectangle before rotation.
    pub fn dest_rect(&self) -> Rect {
        Rect::from_center(self.position, self.size * self.scale)
    }
}

/// Texture batch strategy.
#[derive(Debug, Copy, Clone, Default)]
pub struct Textures;

impl Primitive for Textures {
    const KIND: BatchKind = BatchKind::Texture;
    type Item = TextureItem;
    type Vertex = TexturedVertex;

    fn attributes() -> &'static [AttributeSpec] {
        &TEXTURED_ATTRIBUTES
    }

    fn encode(
        item: &TextureItem,
        viewport: Viewport,
    ) -> Result<[TexturedVertex; VERTICES_PER_ITEM]> {
        let (flip_h, flip_v) = item.effects.resolve()?;

        let quad = TexturedQuad {
            src: item.src_rect,
            texture_size: item.texture_size,
            dest: item.dest_rect(),
            angle: item.angle,
            tint: item.tint,
            flip_h,
            flip_v,
        };
        Ok(quad.vertices(viewport))
    }

    fn select(buffers: &mut BatchBuffers) -> &mut GpuBuffer<Self> {
        &mut buffers.texture
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BatchError;

    fn close(a: [f32; 2], b: [f32; 2]) -> bool {
        (a[0] - b[0]).abs() < 1e-5 && (a[1] - b[1]).abs() < 1e-5
    }

    #[test]
    fn scale_grows_around_center() {
        let mut item = TextureItem::new(1, Vec2::new(50.0, 50.0), Vec2::new(50.0, 50.0));
        item.scale = 2.0;

        let v = Textures::encode(&item, Viewport::new(100.0, 100.0)).unwrap();
        // 100×100 quad centered on (50, 50) covers the whole viewport.
        assert_eq!(v[0].position, [-1.0, 1.0]);
        assert_eq!(v[3].position, [1.0, -1.0]);
    }

    #[test]
    fn rotation_is_about_center() {
        let mut item = TextureItem::new(1, Vec2::new(20.0, 10.0), Vec2::new(50.0, 50.0));
        item.angle = 90.0;

        let v = Textures::encode(&item, Viewport::new(100.0, 100.0)).unwrap();
        // Top-left (40, 45) rotates clockwise to (55, 40).
        assert!(close(v[0].position, Viewport::new(100.0, 100.0).to_ndc(Vec2::new(55.0, 40.0))));
    }

    #[test]
    fn tint_on_every_vertex() {
        let mut item = TextureItem::new(1, Vec2::new(8.0, 8.0), Vec2::new(4.0, 4.0));
        item.tint = Color::new(0.5, 0.25, 1.0, 0.75);

        let v = Textures::encode(&item, Viewport::new(8.0, 8.0)).unwrap();
        assert!(v.iter().all(|x| x.tint == [0.5, 0.25, 1.0, 0.75]));
    }

    #[test]
    fn horizontal_flip_mirrors_u() {
        let mut item = TextureItem::new(1, Vec2::new(64.0, 64.0), Vec2::new(32.0, 32.0));
        item.effects = RenderEffects::FLIP_HORIZONTALLY;

        let v = Textures::encode(&item, Viewport::new(64.0, 64.0)).unwrap();
        assert_eq!(v[0].tex_coord, [1.0, 0.0]);
        assert_eq!(v[1].tex_coord, [0.0, 0.0]);
    }

    #[test]
    fn invalid_effects_fail() {
        let mut item = TextureItem::new(1, Vec2::new(1.0, 1.0), Vec2::ZERO);
        item.effects = RenderEffects(12);
        assert_eq!(
            Textures::encode(&item, Viewport::new(1.0, 1.0)),
            Err(BatchError::InvalidEnumValue { name: "RenderEffects", value: 12 })
        );
    }
}
