//! RGBA colors attached to plotted definitions

use serde::{Deserialize, Serialize};

/// Linear RGBA color, each channel in `0..=1`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    /// Color given to newly added definitions
    pub const DEFINITION_DEFAULT: Self = Self::new(0.24, 1.0, 0.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Clamp every channel into `0..=1`
    pub fn clamped(self) -> Self {
        Self::new(
            self.r.clamp(0.0, 1.0),
            self.g.clamp(0.0, 1.0),
            self.b.clamp(0.0, 1.0),
            self.a.clamp(0.0, 1.0),
        )
    }

    /// Same color with a different alpha
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::DEFINITION_DEFAULT
    }
}

impl From<[f32; 4]> for Rgba {
    fn from([r, g, b, a]: [f32; 4]) -> Self {
        Self::new(r, g, b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamped() {
        let c = Rgba::new(-0.5, 0.5, 1.5, 2.0).clamped();
        assert_eq!(c, Rgba::new(0.0, 0.5, 1.0, 1.0));
    }

    #[test]
    fn test_with_alpha() {
        assert_eq!(Rgba::WHITE.with_alpha(0.25).to_array(), [1.0, 1.0, 1.0, 0.25]);
    }
}
