use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};
use web_sys::wasm_bindgen::{prelude::Closure, JsCast};

use crate::{
    error::Error,
    utils::{get_window, log_error},
};

/// Pending frame and the closure that renders it.
#[derive(Default)]
struct FrameState {
    /// ID of the pending [`requestAnimationFrame`] request.
    ///
    /// [`requestAnimationFrame`]: https://developer.mozilla.org/en-US/docs/Web/API/Window/requestAnimationFrame
    handle: Option<i32>,
    /// The frame callback. `None` once the loop is stopped.
    closure: Option<Closure<dyn FnMut(f64)>>,
}

/// A cancellable render loop driven by [`requestAnimationFrame`].
///
/// The callback receives the frame timestamp in milliseconds and is called
/// once per display refresh until the loop is stopped or dropped.
///
/// The loop must not be stopped from inside its own callback.
///
/// [`requestAnimationFrame`]: https://developer.mozilla.org/en-US/docs/Web/API/Window/requestAnimationFrame
pub struct AnimationLoop {
    state: Rc<RefCell<FrameState>>,
}

impl AnimationLoop {
    /// Starts calling `render_callback` on every animation frame.
    pub fn start<F>(mut render_callback: F) -> Result<Self, Error>
    where
        F: FnMut(f64) + 'static,
    {
        let state = Rc::new(RefCell::new(FrameState::default()));
        let weak: Weak<RefCell<FrameState>> = Rc::downgrade(&state);
        let closure = Closure::<dyn FnMut(f64)>::new(move |now: f64| {
            render_callback(now);
            if let Some(state) = weak.upgrade() {
                schedule_next_frame(&state);
            }
        });
        state.borrow_mut().closure = Some(closure);
        request_next_frame(&state)?;
        Ok(Self { state })
    }

    /// Returns whether frames are still being requested.
    pub fn is_running(&self) -> bool {
        self.state.borrow().closure.is_some()
    }

    /// Cancels the pending frame and releases the callback.
    ///
    /// Calling this more than once is a no-op.
    pub fn stop(&mut self) {
        let mut state = self.state.borrow_mut();
        if let Some(handle) = state.handle.take() {
            if let Ok(window) = get_window() {
                let _ = window.cancel_animation_frame(handle);
            }
        }
        state.closure = None;
    }
}

impl Drop for AnimationLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for AnimationLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnimationLoop")
            .field("handle", &self.state.borrow().handle)
            .field("running", &self.is_running())
            .finish()
    }
}

/// Requests the next frame, unless the loop has been stopped.
fn request_next_frame(state: &Rc<RefCell<FrameState>>) -> Result<(), Error> {
    let mut state = state.borrow_mut();
    let Some(closure) = state.closure.as_ref() else {
        return Ok(());
    };
    let handle = get_window()?.request_animation_frame(closure.as_ref().unchecked_ref())?;
    state.handle = Some(handle);
    Ok(())
}

/// Requests the next frame from within the loop. Failures are logged.
fn schedule_next_frame(state: &Rc<RefCell<FrameState>>) -> bool {
    match request_next_frame(state) {
        Ok(()) => true,
        Err(error) => {
            log_error(&format!("Animation loop stopped: {error}"));
            false
        }
    }
}
