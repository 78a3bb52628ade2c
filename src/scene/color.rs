use std::fmt;

/// An sRGB color with a straight alpha channel, formatted the way the
/// canvas `fillStyle` and gradient stops expect it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel in `[0.0, 1.0]`.
    pub a: f64,
}

impl Rgba {
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// Near-black backdrop color.
    pub const SPACE: Self = Self::rgb(0, 0, 5);

    /// Asteroid fill color.
    pub const ROCK: Self = Self::rgb(150, 150, 150);

    /// Constructs an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Returns the same color with the given alpha.
    pub const fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({},{},{},{})", self.r, self.g, self.b, self.a)
    }
}
