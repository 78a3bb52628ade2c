//! Drifting, spinning asteroids.

use std::f64::consts::TAU;

use rand::Rng;

/// Ratio of an asteroid's minor axis to its major axis.
const ASPECT_RATIO: f64 = 0.55;

/// A filled, rotated ellipse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipse {
    /// Center x.
    pub x: f64,
    /// Center y.
    pub y: f64,
    /// Semi-major axis.
    pub radius_x: f64,
    /// Semi-minor axis.
    pub radius_y: f64,
    /// Rotation in radians.
    pub rotation: f64,
}

/// An asteroid drifting across the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Asteroid {
    /// Horizontal position in surface pixels.
    pub x: f64,
    /// Vertical position in surface pixels.
    pub y: f64,
    /// Heading in radians.
    pub angle: f64,
    /// Distance travelled per frame, in pixels.
    pub speed: f64,
    /// Semi-major axis, in pixels.
    pub size: f64,
    /// Current rotation in radians.
    pub rotation: f64,
    /// Rotation added per frame, in radians.
    pub rotation_speed: f64,
}

impl Asteroid {
    /// Spawns an asteroid at a random position on a `width` x `height` surface.
    pub fn random<R: Rng>(rng: &mut R, width: f64, height: f64) -> Self {
        Self {
            x: rng.random::<f64>() * width,
            y: rng.random::<f64>() * height,
            speed: rng.random::<f64>() * 0.35 + 0.12,
            size: rng.random::<f64>() * 7.0 + 4.0,
            angle: rng.random::<f64>() * TAU,
            rotation: rng.random::<f64>() * TAU,
            rotation_speed: (rng.random::<f64>() - 0.5) * 0.006,
        }
    }

    /// The shape to draw for the current frame.
    pub fn outline(&self) -> Ellipse {
        Ellipse {
            x: self.x,
            y: self.y,
            radius_x: self.size,
            radius_y: self.size * ASPECT_RATIO,
            rotation: self.rotation,
        }
    }

    /// Moves the asteroid by one frame and wraps it around the surface edges.
    pub fn advance(&mut self, width: f64, height: f64, margin: f64) {
        self.x += self.angle.cos() * self.speed;
        self.y += self.angle.sin() * self.speed;
        self.rotation += self.rotation_speed;

        self.x = wrap(self.x, width, margin);
        self.y = wrap(self.y, height, margin);
    }
}

/// Toroidal wrap with a margin: leaving past one edge re-enters at the
/// opposite edge, just outside the visible area.
fn wrap(value: f64, extent: f64, margin: f64) -> f64 {
    if value < -margin {
        extent + margin
    } else if value > extent + margin {
        -margin
    } else {
        value
    }
}
