use bytemuck::{Pod, Zeroable};

use crate::coords::{CornerRadii, Rect, Vec2, Viewport};
use crate::error::Result;
use crate::gpu::AttributeSpec;
use crate::paint::{Color, Gradient, GradientType};

use super::{BatchBuffers, BatchKind, GpuBuffer, Primitive, VERTICES_PER_ITEM};

/// Filled or bordered rectangle with per-corner radius and optional gradient.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ShapeItem {
    /// Center of the rectangle in pixels.
    pub position: Vec2,
    pub width: f32,
    pub height: f32,
    /// Fill color, used when no gradient is selected.
    pub color: Color,
    /// `false` draws only the border.
    pub is_solid: bool,
    pub border_thickness: f32,
    pub corner_radius: CornerRadii,
    pub gradient_type: GradientType,
    pub gradient_start: Color,
    pub gradient_stop: Color,
}

impl ShapeItem {
    /// Solid rectangle of `size` centered on `position`.
    pub fn solid(position: Vec2, size: Vec2, color: Color) -> Self {
        Self {
            position,
            width: size.x,
            height: size.y,
            color,
            is_solid: true,
            ..Self::default()
        }
    }

    pub fn with_gradient(mut self, gradient: Gradient, start: Color, stop: Color) -> Self {
        self.gradient_type = gradient.into();
        self.gradient_start = start;
        self.gradient_stop = stop;
        self
    }

    pub fn with_border(mut self, thickness: f32) -> Self {
        self.is_solid = false;
        self.border_thickness = thickness;
        self
    }

    pub fn with_corner_radius(mut self, radii: CornerRadii) -> Self {
        self.corner_radius = radii;
        self
    }
}

/// Vertex layout (64 bytes):
///
///  offset  0  position             [f32; 2]  loc 0  (NDC)
///  offset  8  bounds               [f32; 4]  loc 1  (center x, center y, w, h; px)
///  offset 24  color                [f32; 4]  loc 2
///  offset 40  is_solid             f32       loc 3  (1.0 / 0.0)
///  offset 44  border_thickness     f32       loc 4
///  offset 48  top_left_radius      f32       loc 5
///  offset 52  bottom_left_radius   f32       loc 6
///  offset 56  bottom_right_radius  f32       loc 7
///  offset 60  top_right_radius     f32       loc 8
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct ShapeVertex {
    pub position: [f32; 2],
    pub bounds: [f32; 4],
    pub color: [f32; 4],
    pub is_solid: f32,
    pub border_thickness: f32,
    pub top_left_radius: f32,
    pub bottom_left_radius: f32,
    pub bottom_right_radius: f32,
    pub top_right_radius: f32,
}

const ATTRIBUTES: [AttributeSpec; 9] = [
    AttributeSpec::new("vertex position", 2),
    AttributeSpec::new("bounding box", 4),
    AttributeSpec::new("color", 4),
    AttributeSpec::new("is solid", 1),
    AttributeSpec::new("border thickness", 1),
    AttributeSpec::new("top left corner radius", 1),
    AttributeSpec::new("bottom left corner radius", 1),
    AttributeSpec::new("bottom right corner radius", 1),
    AttributeSpec::new("top right corner radius", 1),
];

/// Shape batch strategy.
#[derive(Debug, Copy, Clone, Default)]
pub struct Shapes;

impl Primitive for Shapes {
    const KIND: BatchKind = BatchKind::Shape;
    type Item = ShapeItem;
    type Vertex = ShapeVertex;

    fn attributes() -> &'static [AttributeSpec] {
        &ATTRIBUTES
    }

    fn encode(item: &ShapeItem, viewport: Viewport) -> Result<[ShapeVertex; VERTICES_PER_ITEM]> {
        let gradient = item.gradient_type.resolve()?;

        let size = Vec2::new(item.width, item.height);
        let rect = Rect::from_center(item.position, size).normalized();
        let max_extent = (rect.size.x.min(rect.size.y) * 0.5).max(0.0);
        let radii = item.corner_radius.clamped(max_extent);
        let border = item.border_thickness.clamp(0.0, max_extent);

        let (start, stop) = (item.gradient_start.to_array(), item.gradient_stop.to_array());
        // Quad order: top-left, top-right, bottom-left, bottom-right.
        let colors = match gradient {
            Gradient::None => [item.color.to_array(); VERTICES_PER_ITEM],
            Gradient::Horizontal => [start, stop, start, stop],
            Gradient::Vertical => [start, start, stop, stop],
        };

        let center = rect.center();
        let bounds = [center.x, center.y, rect.size.x, rect.size.y];
        let corners = rect.corners();

        Ok(std::array::from_fn(|i| ShapeVertex {
            position: viewport.to_ndc(corners[i]),
            bounds,
            color: colors[i],
            is_solid: if item.is_solid { 1.0 } else { 0.0 },
            border_thickness: border,
            top_left_radius: radii.top_left,
            bottom_left_radius: radii.bottom_left,
            bottom_right_radius: radii.bottom_right,
            top_right_radius: radii.top_right,
        }))
    }

    fn select(buffers: &mut BatchBuffers) -> &mut GpuBuffer<Self> {
        &mut buffers.shape
    }
}
