//! ## Scene
//!
//! The starfield backdrop as plain data: three parallax star layers, a few
//! pulsing lens flares and some drifting asteroids.
//!
//! A [`Scene`] knows nothing about the browser. It paints itself onto any
//! [`Surface`], which the canvas backend implements for
//! [`web_sys::CanvasRenderingContext2d`].
//!
//! Every frame is painted from scratch, in this order:
//!
//! 1. the near-black background (no trails are kept),
//! 2. the stars, shifted by the pointer parallax and faded by their twinkle,
//! 3. the lens flares as full-surface radial gradients,
//! 4. the asteroids, which are then moved and wrapped for the next frame.

use rand::Rng;

use crate::error::Error;

/// Asteroids.
pub mod asteroid;

/// Colors.
pub mod color;

/// Lens flares.
pub mod flare;

/// Stars.
pub mod star;

pub use asteroid::{Asteroid, Ellipse};
pub use color::Rgba;
pub use flare::{FlarePoint, RadialGlow};
pub use star::{Star, StarLayer, DEFAULT_STAR_LAYERS};

/// Something the [`Scene`] can be painted on.
pub trait Surface {
    /// Fills an axis-aligned rectangle.
    fn fill_rect(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Rgba,
    ) -> Result<(), Error>;

    /// Fills a circle.
    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Rgba) -> Result<(), Error>;

    /// Fills the `width` x `height` area with a radial gradient.
    fn fill_glow(&mut self, glow: &RadialGlow, width: f64, height: f64) -> Result<(), Error>;

    /// Fills a rotated ellipse.
    fn fill_ellipse(&mut self, ellipse: &Ellipse, color: Rgba) -> Result<(), Error>;
}

/// Options for the [`Scene`].
#[derive(Debug, Clone, PartialEq)]
pub struct SceneOptions {
    /// Star layers, from the furthest to the nearest.
    layers: Vec<StarLayer>,
    /// Number of lens flares.
    flare_count: usize,
    /// Number of asteroids.
    asteroid_count: usize,
    /// How far outside the surface an asteroid may drift before wrapping.
    wrap_margin: f64,
    /// Pixels of shift per unit of layer speed and pointer displacement
    /// from the center.
    parallax_strength: f64,
    /// Background color painted at the start of every frame.
    background_color: Rgba,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            layers: DEFAULT_STAR_LAYERS.to_vec(),
            flare_count: 3,
            asteroid_count: 4,
            wrap_margin: 60.0,
            parallax_strength: 35.0,
            background_color: Rgba::SPACE,
        }
    }
}

impl SceneOptions {
    /// Constructs a new [`SceneOptions`].
    pub fn new() -> Self {
        Default::default()
    }

    /// Replaces the star layers.
    pub fn layers(mut self, layers: impl IntoIterator<Item = StarLayer>) -> Self {
        self.layers = layers.into_iter().collect();
        self
    }

    /// Sets the number of lens flares.
    pub fn flare_count(mut self, count: usize) -> Self {
        self.flare_count = count;
        self
    }

    /// Sets the number of asteroids.
    pub fn asteroid_count(mut self, count: usize) -> Self {
        self.asteroid_count = count;
        self
    }

    /// Sets the wrap margin, in pixels.
    ///
    /// # Panics
    ///
    /// Panics if `margin` is negative.
    pub fn wrap_margin(mut self, margin: f64) -> Self {
        if margin < 0.0 {
            panic!("Wrap margin must not be negative");
        }
        self.wrap_margin = margin;
        self
    }

    /// Sets the parallax strength.
    pub fn parallax_strength(mut self, strength: f64) -> Self {
        self.parallax_strength = strength;
        self
    }

    /// Sets the background color.
    pub fn background_color(mut self, color: Rgba) -> Self {
        self.background_color = color;
        self
    }

    /// Returns the star layers.
    pub fn star_layers(&self) -> &[StarLayer] {
        &self.layers
    }
}

/// Normalized pointer position. `(0.5, 0.5)` is the center of the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pointer {
    /// Horizontal position in `[0.0, 1.0]`.
    pub x: f64,
    /// Vertical position in `[0.0, 1.0]`.
    pub y: f64,
}

impl Default for Pointer {
    fn default() -> Self {
        Self { x: 0.5, y: 0.5 }
    }
}

/// The animated backdrop.
#[derive(Debug, Clone)]
pub struct Scene {
    /// Surface width in pixels.
    width: f64,
    /// Surface height in pixels.
    height: f64,
    /// Last known pointer position.
    pointer: Pointer,
    /// Stars of every layer.
    stars: Vec<Star>,
    /// Lens flares.
    flares: Vec<FlarePoint>,
    /// Asteroids.
    asteroids: Vec<Asteroid>,
    /// Options.
    options: SceneOptions,
}

impl Scene {
    /// Populates a new scene for a `width` x `height` surface.
    pub fn new<R: Rng>(width: f64, height: f64, options: SceneOptions, rng: &mut R) -> Self {
        let mut stars = Vec::with_capacity(options.layers.iter().map(|l| l.count).sum());
        for (index, layer) in options.layers.iter().enumerate() {
            stars.extend(
                (0..layer.count)
                    .map(|_| Star::random(rng, width, height, index, layer.max_radius)),
            );
        }
        let flares = (0..options.flare_count)
            .map(|_| FlarePoint::random(rng, width, height))
            .collect();
        let asteroids = (0..options.asteroid_count)
            .map(|_| Asteroid::random(rng, width, height))
            .collect();

        Self {
            width,
            height,
            pointer: Pointer::default(),
            stars,
            flares,
            asteroids,
            options,
        }
    }

    /// Updates the surface dimensions.
    ///
    /// Objects keep their positions; anything left outside the new bounds
    /// comes back through the asteroid wrap or simply stays off-screen.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    /// Records the pointer position, given in surface pixels.
    pub fn set_pointer(&mut self, x: f64, y: f64) {
        // Avoid division by zero
        if self.width <= 0.0 || self.height <= 0.0 {
            return;
        }
        self.pointer = Pointer {
            x: (x / self.width).clamp(0.0, 1.0),
            y: (y / self.height).clamp(0.0, 1.0),
        };
    }

    /// Returns the normalized pointer position.
    pub fn pointer(&self) -> Pointer {
        self.pointer
    }

    /// Returns the surface size as `(width, height)`.
    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Returns every star.
    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    /// Returns the lens flares.
    pub fn flares(&self) -> &[FlarePoint] {
        &self.flares
    }

    /// Returns the asteroids.
    pub fn asteroids(&self) -> &[Asteroid] {
        &self.asteroids
    }

    /// Returns the options.
    pub fn options(&self) -> &SceneOptions {
        &self.options
    }

    /// Parallax offset `(dx, dy)` for the given layer at the current pointer.
    pub fn layer_offset(&self, layer: usize) -> (f64, f64) {
        let speed = self
            .options
            .layers
            .get(layer)
            .map(|layer| layer.speed)
            .unwrap_or_default();
        let strength = self.options.parallax_strength;
        (
            star::parallax_offset(self.pointer.x, speed, strength),
            star::parallax_offset(self.pointer.y, speed, strength),
        )
    }

    /// Paints one frame at timestamp `now` (milliseconds) and advances the
    /// asteroids.
    pub fn render<S: Surface + ?Sized>(&mut self, surface: &mut S, now: f64) -> Result<(), Error> {
        surface.fill_rect(
            0.0,
            0.0,
            self.width,
            self.height,
            self.options.background_color,
        )?;
        self.draw_stars(surface, now)?;
        self.draw_flares(surface, now)?;
        self.draw_asteroids(surface)?;
        Ok(())
    }

    fn draw_stars<S: Surface + ?Sized>(&self, surface: &mut S, now: f64) -> Result<(), Error> {
        // One offset per layer rather than per star
        let offsets: Vec<(f64, f64)> = (0..self.options.layers.len())
            .map(|layer| self.layer_offset(layer))
            .collect();

        for star in &self.stars {
            let (dx, dy) = offsets.get(star.layer).copied().unwrap_or_default();
            surface.fill_circle(
                star.x + dx,
                star.y + dy,
                star.radius,
                Rgba::WHITE.with_alpha(star.opacity(now)),
            )?;
        }
        Ok(())
    }

    fn draw_flares<S: Surface + ?Sized>(&self, surface: &mut S, now: f64) -> Result<(), Error> {
        for flare in &self.flares {
            surface.fill_glow(&flare.glow_at(now), self.width, self.height)?;
        }
        Ok(())
    }

    fn draw_asteroids<S: Surface + ?Sized>(&mut self, surface: &mut S) -> Result<(), Error> {
        let (width, height, margin) = (self.width, self.height, self.options.wrap_margin);
        for asteroid in &mut self.asteroids {
            surface.fill_ellipse(&asteroid.outline(), Rgba::ROCK)?;
            asteroid.advance(width, height, margin);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};

    /// Records draw calls instead of painting them.
    #[derive(Default)]
    struct RecordingSurface {
        rects: Vec<(f64, f64, f64, f64, Rgba)>,
        circles: Vec<(f64, f64, f64, Rgba)>,
        glows: Vec<RadialGlow>,
        ellipses: Vec<Ellipse>,
    }

    impl Surface for RecordingSurface {
        fn fill_rect(
            &mut self,
            x: f64,
            y: f64,
            width: f64,
            height: f64,
            color: Rgba,
        ) -> Result<(), Error> {
            self.rects.push((x, y, width, height, color));
            Ok(())
        }

        fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Rgba) -> Result<(), Error> {
            self.circles.push((x, y, radius, color));
            Ok(())
        }

        fn fill_glow(&mut self, glow: &RadialGlow, _: f64, _: f64) -> Result<(), Error> {
            self.glows.push(*glow);
            Ok(())
        }

        fn fill_ellipse(&mut self, ellipse: &Ellipse, _: Rgba) -> Result<(), Error> {
            self.ellipses.push(*ellipse);
            Ok(())
        }
    }

    /// Fails on the first circle.
    struct BrokenSurface;

    impl Surface for BrokenSurface {
        fn fill_rect(&mut self, _: f64, _: f64, _: f64, _: f64, _: Rgba) -> Result<(), Error> {
            Ok(())
        }

        fn fill_circle(&mut self, _: f64, _: f64, _: f64, _: Rgba) -> Result<(), Error> {
            Err(Error::JsError("arc".into()))
        }

        fn fill_glow(&mut self, _: &RadialGlow, _: f64, _: f64) -> Result<(), Error> {
            Ok(())
        }

        fn fill_ellipse(&mut self, _: &Ellipse, _: Rgba) -> Result<(), Error> {
            Ok(())
        }
    }

    fn full_hd_scene() -> Scene {
        let mut rng = SmallRng::seed_from_u64(42);
        Scene::new(1920.0, 1080.0, SceneOptions::default(), &mut rng)
    }

    #[test]
    fn test_full_hd_population() {
        let scene = full_hd_scene();
        assert_eq!(scene.stars().len(), 285);
        assert_eq!(scene.flares().len(), 3);
        assert_eq!(scene.asteroids().len(), 4);

        for (layer, expected) in [(0, 120), (1, 90), (2, 75)] {
            let count = scene.stars().iter().filter(|s| s.layer == layer).count();
            assert_eq!(count, expected);
        }
        assert!(scene
            .stars()
            .iter()
            .filter(|s| s.layer != 2)
            .all(|s| s.radius < 1.7));
    }

    #[test]
    fn test_first_render_draws_everything() {
        let mut scene = full_hd_scene();
        let mut surface = RecordingSurface::default();

        scene.render(&mut surface, 0.0).unwrap();

        assert_eq!(
            surface.rects,
            vec![(0.0, 0.0, 1920.0, 1080.0, Rgba::SPACE)]
        );
        assert_eq!(surface.circles.len(), 285);
        assert_eq!(surface.glows.len(), 3);
        assert_eq!(surface.ellipses.len(), 4);
    }

    #[test]
    fn test_render_propagates_surface_errors() {
        let mut scene = full_hd_scene();
        assert_eq!(
            scene.render(&mut BrokenSurface, 0.0),
            Err(Error::JsError("arc".into()))
        );
    }

    #[test]
    fn test_render_applies_layer_parallax() {
        let mut scene = full_hd_scene();
        scene.set_pointer(1920.0, 0.0);
        let mut surface = RecordingSurface::default();
        scene.render(&mut surface, 1000.0).unwrap();

        for (star, (x, y, _, _)) in scene.stars().iter().zip(&surface.circles) {
            let speed = DEFAULT_STAR_LAYERS[star.layer].speed;
            assert!((x - star.x - 0.5 * speed * 35.0).abs() < 1e-9);
            assert!((y - star.y + 0.5 * speed * 35.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_centered_pointer_has_no_parallax() {
        let scene = full_hd_scene();
        assert_eq!(scene.pointer(), Pointer::default());
        for layer in 0..3 {
            assert_eq!(scene.layer_offset(layer), (0.0, 0.0));
        }
    }

    #[test]
    fn test_pointer_is_normalized_and_clamped() {
        let mut scene = full_hd_scene();
        scene.set_pointer(480.0, 270.0);
        assert_eq!(scene.pointer(), Pointer { x: 0.25, y: 0.25 });

        scene.set_pointer(5000.0, -10.0);
        assert_eq!(scene.pointer(), Pointer { x: 1.0, y: 0.0 });
    }

    #[test]
    fn test_pointer_ignored_on_empty_surface() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut scene = Scene::new(0.0, 0.0, SceneOptions::default(), &mut rng);
        scene.set_pointer(10.0, 10.0);
        assert_eq!(scene.pointer(), Pointer::default());
    }

    #[test]
    fn test_resize_keeps_objects() {
        let mut scene = full_hd_scene();
        let stars = scene.stars().to_vec();
        let asteroids = scene.asteroids().to_vec();

        scene.resize(800.0, 600.0);

        assert_eq!(scene.size(), (800.0, 600.0));
        assert_eq!(scene.stars(), stars.as_slice());
        assert_eq!(scene.asteroids(), asteroids.as_slice());
    }

    #[test]
    fn test_collections_stay_fixed_size() {
        let mut scene = full_hd_scene();
        let mut surface = RecordingSurface::default();
        for frame in 0..120 {
            scene.render(&mut surface, frame as f64 * 16.7).unwrap();
        }
        assert_eq!(scene.stars().len(), 285);
        assert_eq!(scene.flares().len(), 3);
        assert_eq!(scene.asteroids().len(), 4);
    }

    #[test]
    fn test_custom_options() {
        let options = SceneOptions::new()
            .layers([StarLayer::new(10, 0.5, 1.0)])
            .flare_count(0)
            .asteroid_count(1)
            .wrap_margin(10.0)
            .background_color(Rgba::rgb(1, 2, 3));
        let mut rng = SmallRng::seed_from_u64(3);
        let mut scene = Scene::new(100.0, 100.0, options, &mut rng);
        let mut surface = RecordingSurface::default();
        scene.render(&mut surface, 0.0).unwrap();

        assert_eq!(surface.rects[0].4, Rgba::rgb(1, 2, 3));
        assert_eq!(surface.circles.len(), 10);
        assert!(surface.glows.is_empty());
        assert_eq!(surface.ellipses.len(), 1);
        assert_eq!(scene.layer_offset(5), (0.0, 0.0));
    }

    #[test]
    #[should_panic(expected = "Wrap margin must not be negative")]
    fn test_negative_wrap_margin() {
        let _ = SceneOptions::new().wrap_margin(-1.0);
    }
}
