//! Twinkling parallax stars.

use rand::Rng;

/// Smallest radius any star can have, in pixels.
const MIN_RADIUS: f64 = 0.4;

/// Lower bound of the twinkle seed.
const MIN_TWINKLE: f64 = 0.2;

/// A depth layer of stars.
///
/// Slower layers sit further away and shift less when the pointer moves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarLayer {
    /// Number of stars in the layer.
    pub count: usize,
    /// Parallax speed factor.
    pub speed: f64,
    /// Upper bound of the random part of the radius, in pixels.
    pub max_radius: f64,
}

impl StarLayer {
    /// Constructs a new [`StarLayer`].
    pub const fn new(count: usize, speed: f64, max_radius: f64) -> Self {
        Self {
            count,
            speed,
            max_radius,
        }
    }
}

/// The default far, middle and near layers.
pub const DEFAULT_STAR_LAYERS: [StarLayer; 3] = [
    StarLayer::new(120, 0.12, 1.3),
    StarLayer::new(90, 0.20, 1.3),
    StarLayer::new(75, 0.35, 2.5),
];

/// A single star.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    /// Horizontal position in surface pixels.
    pub x: f64,
    /// Vertical position in surface pixels.
    pub y: f64,
    /// Radius in pixels.
    pub radius: f64,
    /// Index of the [`StarLayer`] this star belongs to.
    pub layer: usize,
    /// Twinkle frequency seed in `[0.2, 1.0)`.
    pub twinkle: f64,
}

impl Star {
    /// Places a star at a random position on a `width` x `height` surface.
    pub fn random<R: Rng>(
        rng: &mut R,
        width: f64,
        height: f64,
        layer: usize,
        max_radius: f64,
    ) -> Self {
        Self {
            x: rng.random::<f64>() * width,
            y: rng.random::<f64>() * height,
            radius: rng.random::<f64>() * max_radius + MIN_RADIUS,
            layer,
            twinkle: rng.random::<f64>() * (1.0 - MIN_TWINKLE) + MIN_TWINKLE,
        }
    }

    /// Opacity at the given timestamp (milliseconds).
    ///
    /// Oscillates within `[0.02, 0.42]`.
    pub fn opacity(&self, now: f64) -> f64 {
        0.22 + (now * 0.0015 * self.twinkle).sin() * 0.2
    }
}

/// Parallax offset along one axis for a normalized pointer coordinate.
pub fn parallax_offset(pointer: f64, speed: f64, strength: f64) -> f64 {
    (pointer - 0.5) * speed * strength
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};

    #[test]
    fn test_random_star_ranges() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..500 {
            let star = Star::random(&mut rng, 800.0, 600.0, 2, 2.5);
            assert!((0.0..800.0).contains(&star.x));
            assert!((0.0..600.0).contains(&star.y));
            assert!((0.4..2.9).contains(&star.radius));
            assert!((0.2..1.0).contains(&star.twinkle));
            assert_eq!(star.layer, 2);
        }
    }

    #[test]
    fn test_opacity_bounds() {
        let star = Star {
            x: 0.0,
            y: 0.0,
            radius: 1.0,
            layer: 0,
            twinkle: 0.73,
        };
        for step in 0..10_000 {
            let opacity = star.opacity(step as f64 * 16.7);
            assert!((0.02 - 1e-9..=0.42 + 1e-9).contains(&opacity));
        }
    }

    #[test]
    fn test_parallax_offset() {
        assert_eq!(parallax_offset(0.5, 0.35, 35.0), 0.0);
        assert!((parallax_offset(1.0, 0.12, 35.0) - 2.1).abs() < 1e-12);
        assert!((parallax_offset(0.0, 0.20, 35.0) + 3.5).abs() < 1e-12);
    }

    #[test]
    fn test_parallax_offset_is_continuous() {
        let speed = DEFAULT_STAR_LAYERS[2].speed;
        let step = 0.001;
        let max_jump = step * speed * 35.0 + 1e-12;
        let mut previous = parallax_offset(0.0, speed, 35.0);
        for i in 1..=1000 {
            let current = parallax_offset(i as f64 * step, speed, 35.0);
            assert!((current - previous).abs() <= max_jump);
            previous = current;
        }
    }
}
