/// Attribute description before offsets and stride are resolved.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct AttributeSpec {
    pub label: &'static str,
    /// Number of `f32` components (1..=4).
    pub components: u32,
}

impl AttributeSpec {
    pub const fn new(label: &'static str, components: u32) -> Self {
        Self { label, components }
    }
}

/// One resolved vertex attribute.
///
/// All attributes are tightly packed `f32` values; `stride` is shared by every
/// attribute of a layout.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct VertexAttribute {
    pub index: u32,
    pub components: u32,
    pub normalized: bool,
    pub stride: u32,
    pub offset: u32,
    pub label: &'static str,
}

/// Fixed per-kind vertex layout.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct VertexLayout {
    attributes: Vec<VertexAttribute>,
    stride: u32,
}

impl VertexLayout {
    const FLOAT_BYTES: u32 = std::mem::size_of::<f32>() as u32;

    /// Resolves shader locations, offsets and stride from `specs`.
    ///
    /// Locations follow the order of `specs`; offsets are the running sum of
    /// the preceding attributes' byte widths.
    pub fn from_specs(specs: &[AttributeSpec]) -> Self {
        let stride = specs.iter().map(|s| s.components * Self::FLOAT_BYTES).sum();

        let mut offset = 0;
        let attributes = specs
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let attr = VertexAttribute {
                    index: i as u32,
                    components: s.components,
                    normalized: false,
                    stride,
                    offset,
                    label: s.label,
                };
                offset += s.components * Self::FLOAT_BYTES;
                attr
            })
            .collect();

        Self { attributes, stride }
    }

    pub fn attributes(&self) -> &[VertexAttribute] {
        &self.attributes
    }

    /// Bytes per vertex.
    pub fn stride(&self) -> u32 {
        self.stride
    }

    pub fn floats_per_vertex(&self) -> u32 {
        self.stride / Self::FLOAT_BYTES
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_are_cumulative() {
        let layout = VertexLayout::from_specs(&[
            AttributeSpec::new("position", 2),
            AttributeSpec::new("color", 4),
            AttributeSpec::new("weight", 1),
        ]);

        let offsets: Vec<u32> = layout.attributes().iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 8, 24]);
        assert_eq!(layout.stride(), 28);
        assert_eq!(layout.floats_per_vertex(), 7);
        assert!(layout.attributes().iter().all(|a| a.stride == 28 && !a.normalized));
        assert_eq!(layout.attributes()[2].index, 2);
    }

    #[test]
    fn empty_layout_has_zero_stride() {
        let layout = VertexLayout::from_specs(&[]);
        assert_eq!(layout.stride(), 0);
        assert!(layout.attributes().is_empty());
    }
}
