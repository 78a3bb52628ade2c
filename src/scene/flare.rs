//! Pulsing lens-flare glows.

use rand::Rng;

use super::color::Rgba;

/// A radial gradient centered on a point, fading out at `radius`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialGlow {
    /// Center x.
    pub x: f64,
    /// Center y.
    pub y: f64,
    /// Outer radius of the gradient.
    pub radius: f64,
    /// Color stops as `(offset, color)` pairs, sorted by offset.
    pub stops: [(f64, Rgba); 3],
}

/// A lens-flare point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlarePoint {
    /// Horizontal position in surface pixels.
    pub x: f64,
    /// Vertical position in surface pixels.
    pub y: f64,
    /// Glow radius in `[65, 155)`.
    pub glow: f64,
    /// Pulse frequency seed in `[0.001, 0.003)`.
    pub pulse: f64,
}

impl FlarePoint {
    /// Places a flare point at a random position on a `width` x `height` surface.
    pub fn random<R: Rng>(rng: &mut R, width: f64, height: f64) -> Self {
        Self {
            x: rng.random::<f64>() * width,
            y: rng.random::<f64>() * height,
            glow: rng.random::<f64>() * 90.0 + 65.0,
            pulse: rng.random::<f64>() * 0.002 + 0.001,
        }
    }

    /// Brightness multiplier at the given timestamp, within `[0.4, 1.0]`.
    pub fn pulse_factor(&self, now: f64) -> f64 {
        0.7 + (now * self.pulse).sin() * 0.3
    }

    /// The gradient to paint at the given timestamp.
    pub fn glow_at(&self, now: f64) -> RadialGlow {
        let pulse = self.pulse_factor(now);
        RadialGlow {
            x: self.x,
            y: self.y,
            radius: self.glow,
            stops: [
                (0.0, Rgba::WHITE.with_alpha(0.4 * pulse)),
                (0.4, Rgba::WHITE.with_alpha(0.15 * pulse)),
                (1.0, Rgba::WHITE.with_alpha(0.0)),
            ],
        }
    }
}
