use std::{
    cell::{Ref, RefCell},
    f64::consts::TAU,
    rc::Rc,
};

use rand::{rngs::SmallRng, SeedableRng};
use web_sys::{
    js_sys::{Boolean, Map, Math},
    wasm_bindgen::{JsCast, JsValue},
    CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement,
};

use crate::{
    backend::event_callback::{
        EventCallback, POINTER_EVENT_TYPES, RESIZE_EVENT_TYPES, SCROLL_EVENT_TYPES,
    },
    error::Error,
    event::PointerEvent,
    render::AnimationLoop,
    scene::{Ellipse, RadialGlow, Rgba, Scene, SceneOptions, Surface},
    utils::*,
};

/// Inline style for canvases created by the animator: a fixed, full-viewport
/// layer behind the page that never catches the pointer.
const BACKDROP_STYLE: &str =
    "position: fixed; inset: 0; z-index: -10; pointer-events: none; display: block;";

/// Opacity of the fog layer for a vertical scroll offset.
///
/// The fog thickens as the page scrolls and is fully opaque after 2250px.
pub fn fog_opacity(scroll_offset: f64) -> f64 {
    (0.1 + scroll_offset.max(0.0) / 2500.0).min(1.0)
}

/// Options for the [`BackgroundAnimator`].
#[derive(Debug, Default)]
pub struct BackgroundOptions {
    /// ID of an existing canvas to draw on.
    canvas_id: Option<String>,
    /// ID of the element a new canvas is appended to (`<body>` if unset).
    parent_id: Option<String>,
    /// ID of the element whose opacity follows the scroll offset.
    fog_id: Option<String>,
    /// Override the viewport size.
    size: Option<(u32, u32)>,
    /// Seed for the star, flare and asteroid placement.
    seed: Option<u64>,
    /// Scene options.
    scene: SceneOptions,
}

impl BackgroundOptions {
    /// Constructs a new [`BackgroundOptions`].
    pub fn new() -> Self {
        Default::default()
    }

    /// Draws on the existing canvas with the given ID instead of creating one.
    pub fn canvas_id(mut self, id: &str) -> Self {
        self.canvas_id = Some(id.to_string());
        self
    }

    /// Sets the element id of the created canvas' parent element.
    pub fn parent_id(mut self, id: &str) -> Self {
        self.parent_id = Some(id.to_string());
        self
    }

    /// Sets the element whose opacity follows the scroll offset.
    pub fn fog_id(mut self, id: &str) -> Self {
        self.fog_id = Some(id.to_string());
        self
    }

    /// Sets the size of the canvas, in pixels.
    ///
    /// The canvas still follows the viewport once it is resized.
    pub fn size(mut self, size: (u32, u32)) -> Self {
        self.size = Some(size);
        self
    }

    /// Makes the object placement reproducible.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the scene options.
    pub fn scene(mut self, scene: SceneOptions) -> Self {
        self.scene = scene;
        self
    }
}

/// Canvas renderer.
#[derive(Debug, Clone)]
struct Canvas {
    /// Canvas element.
    inner: HtmlCanvasElement,
    /// Rendering context.
    context: CanvasRenderingContext2d,
    /// Whether the canvas was created by us and must be removed on drop.
    owned: bool,
}

impl Canvas {
    /// Looks up or creates the canvas and acquires its 2D context.
    fn new(options: &BackgroundOptions, width: u32, height: u32) -> Result<Self, Error> {
        let (canvas, owned) = match &options.canvas_id {
            Some(id) => {
                let canvas = get_document()?
                    .get_element_by_id(id)
                    .and_then(|element| element.dyn_into::<HtmlCanvasElement>().ok())
                    .ok_or_else(|| Error::UnableToRetrieveElement(id.clone()))?;
                canvas.set_width(width);
                canvas.set_height(height);
                (canvas, false)
            }
            None => {
                let parent = get_element_by_id_or_body(options.parent_id.as_ref())?;
                let canvas = create_canvas_in_element(&parent, width, height)?;
                canvas.set_attribute("style", BACKDROP_STYLE)?;
                canvas.set_attribute("aria-hidden", "true")?;
                (canvas, true)
            }
        };

        let context_options = Map::new();
        context_options.set(&JsValue::from_str("alpha"), &Boolean::from(JsValue::FALSE));
        context_options.set(
            &JsValue::from_str("desynchronized"),
            &Boolean::from(JsValue::TRUE),
        );
        let context = match canvas
            .get_context_with_context_options("2d", &context_options)
            .ok()
            .flatten()
            .and_then(|context| context.dyn_into::<CanvasRenderingContext2d>().ok())
        {
            Some(context) => context,
            None => {
                if owned {
                    canvas.remove();
                }
                return Err(Error::UnableToRetrieveCanvasContext);
            }
        };

        Ok(Self {
            inner: canvas,
            context,
            owned,
        })
    }

    /// Resizes the canvas to the viewport and returns the new size.
    fn fit_to_viewport(&self) -> Result<(f64, f64), Error> {
        let (width, height) = get_raw_window_size()?;
        self.inner.set_width(width as u32);
        self.inner.set_height(height as u32);
        Ok((width, height))
    }
}

impl Surface for CanvasRenderingContext2d {
    fn fill_rect(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Rgba,
    ) -> Result<(), Error> {
        self.set_fill_style_str(&color.to_string());
        CanvasRenderingContext2d::fill_rect(self, x, y, width, height);
        Ok(())
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Rgba) -> Result<(), Error> {
        self.set_fill_style_str(&color.to_string());
        self.begin_path();
        self.arc(x, y, radius, 0.0, TAU)?;
        self.fill();
        Ok(())
    }

    fn fill_glow(&mut self, glow: &RadialGlow, width: f64, height: f64) -> Result<(), Error> {
        let gradient = self.create_radial_gradient(glow.x, glow.y, 0.0, glow.x, glow.y, glow.radius)?;
        for (offset, color) in glow.stops {
            gradient.add_color_stop(offset as f32, &color.to_string())?;
        }
        self.set_fill_style_canvas_gradient(&gradient);
        CanvasRenderingContext2d::fill_rect(self, 0.0, 0.0, width, height);
        Ok(())
    }

    fn fill_ellipse(&mut self, ellipse: &Ellipse, color: Rgba) -> Result<(), Error> {
        self.set_fill_style_str(&color.to_string());
        self.begin_path();
        self.ellipse(
            ellipse.x,
            ellipse.y,
            ellipse.radius_x,
            ellipse.radius_y,
            ellipse.rotation,
            0.0,
            TAU,
        )?;
        self.fill();
        Ok(())
    }
}

/// Full-viewport animated starfield.
///
/// This animator paints a [`Scene`] onto a HTML canvas element on every
/// animation frame. The stars follow the pointer with a per-layer parallax,
/// the canvas follows the viewport size and, if configured, a fog element
/// follows the scroll offset.
///
/// Nothing is attached to the window until [`start`](Self::start) is called,
/// and everything is detached again by [`stop`](Self::stop) or on drop.
#[derive(Debug)]
pub struct BackgroundAnimator {
    /// Canvas.
    canvas: Canvas,
    /// Scene shared with the frame and event callbacks.
    scene: Rc<RefCell<Scene>>,
    /// Fog element.
    fog: Option<HtmlElement>,
    /// Render loop, while running.
    frame_loop: Option<AnimationLoop>,
    /// `mousemove` listener.
    pointer_callback: Option<EventCallback<web_sys::MouseEvent>>,
    /// `resize` listener.
    resize_callback: Option<EventCallback<web_sys::Event>>,
    /// `scroll` listener, only when a fog element is set.
    scroll_callback: Option<EventCallback<web_sys::Event>>,
}

impl BackgroundAnimator {
    /// Constructs a new [`BackgroundAnimator`] covering the viewport.
    pub fn new() -> Result<Self, Error> {
        Self::new_with_options(BackgroundOptions::default())
    }

    /// Constructs a new [`BackgroundAnimator`] with the given options.
    pub fn new_with_options(options: BackgroundOptions) -> Result<Self, Error> {
        let (width, height) = match options.size {
            Some((width, height)) => (width, height),
            None => {
                let (width, height) = get_raw_window_size()?;
                (width as u32, height as u32)
            }
        };
        let canvas = Canvas::new(&options, width, height)?;
        let fog = options
            .fog_id
            .as_deref()
            .map(get_html_element_by_id)
            .transpose()?;

        let seed = options.seed.unwrap_or_else(random_seed);
        let mut rng = SmallRng::seed_from_u64(seed);
        let scene = Scene::new(width as f64, height as f64, options.scene, &mut rng);

        Ok(Self {
            canvas,
            scene: Rc::new(RefCell::new(scene)),
            fog,
            frame_loop: None,
            pointer_callback: None,
            resize_callback: None,
            scroll_callback: None,
        })
    }

    /// Attaches the listeners and starts the render loop.
    ///
    /// Does nothing if the animator is already running.
    pub fn start(&mut self) -> Result<(), Error> {
        if self.is_running() {
            return Ok(());
        }
        // Leave nothing half-attached if any step fails.
        if let Err(error) = self.attach() {
            self.stop();
            return Err(error);
        }
        Ok(())
    }

    fn attach(&mut self) -> Result<(), Error> {
        let window = get_window()?;

        self.pointer_callback = Some(EventCallback::new(
            window.clone().into(),
            POINTER_EVENT_TYPES,
            {
                let scene = self.scene.clone();
                move |event: web_sys::MouseEvent| {
                    let pointer = PointerEvent::from(event);
                    scene.borrow_mut().set_pointer(pointer.x, pointer.y);
                }
            },
        )?);

        self.resize_callback = Some(EventCallback::new(
            window.clone().into(),
            RESIZE_EVENT_TYPES,
            {
                let scene = self.scene.clone();
                let canvas = self.canvas.clone();
                move |_: web_sys::Event| match canvas.fit_to_viewport() {
                    Ok((width, height)) => scene.borrow_mut().resize(width, height),
                    Err(error) => log_warning(&format!("Failed to resize background: {error}")),
                }
            },
        )?);

        if let Some(fog) = &self.fog {
            update_fog(fog);
            self.scroll_callback = Some(EventCallback::new(
                window.into(),
                SCROLL_EVENT_TYPES,
                {
                    let fog = fog.clone();
                    move |_: web_sys::Event| update_fog(&fog)
                },
            )?);
        }

        self.frame_loop = Some(AnimationLoop::start({
            let scene = self.scene.clone();
            let mut context = self.canvas.context.clone();
            let mut reported = false;
            move |now| {
                if let Err(error) = scene.borrow_mut().render(&mut context, now) {
                    if !reported {
                        log_error(&format!("Failed to render background: {error}"));
                        reported = true;
                    }
                }
            }
        })?);

        Ok(())
    }

    /// Stops the render loop and detaches every listener.
    ///
    /// Calling this more than once is a no-op.
    pub fn stop(&mut self) {
        if let Some(mut frame_loop) = self.frame_loop.take() {
            frame_loop.stop();
        }
        self.pointer_callback = None;
        self.resize_callback = None;
        self.scroll_callback = None;
    }

    /// Returns whether the render loop is running.
    pub fn is_running(&self) -> bool {
        self.frame_loop
            .as_ref()
            .is_some_and(|frame_loop| frame_loop.is_running())
    }

    /// Returns the number of attached window listeners.
    pub fn listener_count(&self) -> usize {
        [
            self.pointer_callback.is_some(),
            self.resize_callback.is_some(),
            self.scroll_callback.is_some(),
        ]
        .into_iter()
        .filter(|attached| *attached)
        .count()
    }

    /// Returns the scene.
    pub fn scene(&self) -> Ref<'_, Scene> {
        self.scene.borrow()
    }

    /// Returns the canvas element.
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas.inner
    }
}

impl Drop for BackgroundAnimator {
    fn drop(&mut self) {
        self.stop();
        if self.canvas.owned {
            self.canvas.inner.remove();
        }
    }
}

/// Creates and starts a [`BackgroundAnimator`].
///
/// Returns `None` and logs a warning if the canvas cannot be set up; the
/// page then simply has no animated backdrop.
pub fn mount_background(options: BackgroundOptions) -> Option<BackgroundAnimator> {
    let mut animator = match BackgroundAnimator::new_with_options(options) {
        Ok(animator) => animator,
        Err(error) => {
            log_warning(&format!("Background disabled: {error}"));
            return None;
        }
    };
    if let Err(error) = animator.start() {
        log_warning(&format!("Background disabled: {error}"));
        return None;
    }
    Some(animator)
}

/// Applies the fog opacity for the current scroll offset.
fn update_fog(fog: &HtmlElement) {
    let offset = get_scroll_offset().unwrap_or_default();
    if let Err(error) = fog
        .style()
        .set_property("opacity", &fog_opacity(offset).to_string())
    {
        log_warning(&format!("Failed to update fog: {}", Error::from(error)));
    }
}

/// Draws a seed from the browser's random number generator.
fn random_seed() -> u64 {
    (Math::random() * u64::MAX as f64) as u64
}
