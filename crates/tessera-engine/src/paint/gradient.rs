use crate::error::{BatchError, Result};

/// Raw gradient selector carried by shape items.
///
/// Items are produced outside the engine (scripts, scene files), so the code
/// is kept open like a C enum and resolved into [`Gradient`] when encoded.
#[repr(transparent)]
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct GradientType(pub u32);

impl GradientType {
    pub const NONE: GradientType = GradientType(0);
    pub const HORIZONTAL: GradientType = GradientType(1);
    pub const VERTICAL: GradientType = GradientType(2);

    /// Resolves the raw code.
    ///
    /// Fails with [`BatchError::InvalidEnumValue`] for codes outside the known set.
    pub fn resolve(self) -> Result<Gradient> {
        match self {
            Self::NONE => Ok(Gradient::None),
            Self::HORIZONTAL => Ok(Gradient::Horizontal),
            Self::VERTICAL => Ok(Gradient::Vertical),
            GradientType(value) => {
                Err(BatchError::InvalidEnumValue { name: "GradientType", value })
            }
        }
    }
}

impl From<Gradient> for GradientType {
    fn from(g: Gradient) -> Self {
        match g {
            Gradient::None => Self::NONE,
            Gradient::Horizontal => Self::HORIZONTAL,
            Gradient::Vertical => Self::VERTICAL,
        }
    }
}

/// Resolved gradient direction.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Gradient {
    /// Solid fill color on every vertex.
    None,
    /// Start color on the left edge, stop color on the right edge.
    Horizontal,
    /// Start color on the top edge, stop color on the bottom edge.
    Vertical,
}
