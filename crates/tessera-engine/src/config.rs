use crate::batch::BatchKind;

/// Initial batch capacities, one per primitive kind.
///
/// The frame coordinator publishes these values once the graphics context is
/// ready; buffers allocate their GPU storage from them.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchConfig {
    pub shape: u32,
    pub texture: u32,
    pub line: u32,
    pub glyph: u32,
}

impl BatchConfig {
    /// Capacity used for every kind unless configured otherwise.
    pub const DEFAULT_CAPACITY: u32 = 1000;

    /// Same capacity for every kind.
    pub fn uniform(capacity: u32) -> Self {
        Self { shape: capacity, texture: capacity, line: capacity, glyph: capacity }
    }

    /// Returns a copy with `kind` set to `capacity`.
    pub fn with(mut self, kind: BatchKind, capacity: u32) -> Self {
        *self.slot_mut(kind) = capacity;
        self
    }

    pub fn capacity(&self, kind: BatchKind) -> u32 {
        match kind {
            BatchKind::Shape => self.shape,
            BatchKind::Texture => self.texture,
            BatchKind::Line => self.line,
            BatchKind::Glyph => self.glyph,
        }
    }

    fn slot_mut(&mut self, kind: BatchKind) -> &mut u32 {
        match kind {
            BatchKind::Shape => &mut self.shape,
            BatchKind::Texture => &mut self.texture,
            BatchKind::Line => &mut self.line,
            BatchKind::Glyph => &mut self.glyph,
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self::uniform(Self::DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_uniform() {
        let cfg = BatchConfig::default();
        for kind in BatchKind::ALL {
            assert_eq!(cfg.capacity(kind), BatchConfig::DEFAULT_CAPACITY);
        }
    }

    #[test]
    fn with_overrides_single_kind() {
        let cfg = BatchConfig::uniform(10).with(BatchKind::Line, 3);
        assert_eq!(cfg.capacity(BatchKind::Line), 3);
        assert_eq!(cfg.capacity(BatchKind::Glyph), 10);
    }
}
