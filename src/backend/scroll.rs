use std::{cell::Cell, rc::Rc};

use crate::{
    backend::event_callback::{EventCallback, SCROLL_EVENT_TYPES},
    error::Error,
    scroll::{ScrollDirection, ScrollTracker},
    utils::{get_scroll_offset, get_window},
};

/// Read-only view of a [`ScrollListener`]'s tracker.
///
/// Cheap to clone into other callbacks, e.g. a reveal observer that needs
/// the scroll direction when its element changes visibility.
#[derive(Debug, Clone, Default)]
pub struct ScrollHandle {
    tracker: Rc<Cell<ScrollTracker>>,
}

impl ScrollHandle {
    /// Returns the last scroll direction.
    pub fn direction(&self) -> ScrollDirection {
        self.tracker.get().direction()
    }

    /// Returns the last vertical scroll offset.
    pub fn offset(&self) -> f64 {
        self.tracker.get().offset()
    }

    /// Whether the page is scrolled further than `threshold` pixels.
    pub fn scrolled_past(&self, threshold: f64) -> bool {
        self.tracker.get().scrolled_past(threshold)
    }
}

/// Tracks the page scroll direction.
///
/// The current offset is sampled on creation, so the first `scroll` event
/// already yields a direction.
#[derive(Debug)]
pub struct ScrollListener {
    /// Shared tracker.
    handle: ScrollHandle,
    /// The `scroll` listener.
    callback: Option<EventCallback<web_sys::Event>>,
}

impl ScrollListener {
    /// Constructs a new [`ScrollListener`].
    pub fn new() -> Result<Self, Error> {
        Self::with_callback(|_, _| {})
    }

    /// Constructs a new [`ScrollListener`] that also calls `callback` with
    /// the direction and offset after every `scroll` event.
    pub fn with_callback<F>(mut callback: F) -> Result<Self, Error>
    where
        F: FnMut(ScrollDirection, f64) + 'static,
    {
        let handle = ScrollHandle::default();
        sample(&handle.tracker, get_scroll_offset()?);

        let tracker = handle.tracker.clone();
        let callback = EventCallback::new(
            get_window()?.into(),
            SCROLL_EVENT_TYPES,
            move |_: web_sys::Event| {
                let Ok(offset) = get_scroll_offset() else {
                    return;
                };
                let direction = sample(&tracker, offset);
                callback(direction, offset);
            },
        )?;

        Ok(Self {
            handle,
            callback: Some(callback),
        })
    }

    /// Returns a handle to the tracked state.
    pub fn handle(&self) -> ScrollHandle {
        self.handle.clone()
    }

    /// Returns the last scroll direction.
    pub fn direction(&self) -> ScrollDirection {
        self.handle.direction()
    }

    /// Returns the last vertical scroll offset.
    pub fn offset(&self) -> f64 {
        self.handle.offset()
    }

    /// Whether the page is scrolled further than `threshold` pixels.
    pub fn scrolled_past(&self, threshold: f64) -> bool {
        self.handle.scrolled_past(threshold)
    }

    /// Detaches the `scroll` listener. The last state stays readable.
    pub fn stop(&mut self) {
        self.callback = None;
    }

    /// Returns whether the listener is attached.
    pub fn is_listening(&self) -> bool {
        self.callback.is_some()
    }
}

fn sample(tracker: &Cell<ScrollTracker>, offset: f64) -> ScrollDirection {
    let mut state = tracker.get();
    let direction = state.sample(offset);
    tracker.set(state);
    direction
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_reflects_samples() {
        let handle = ScrollHandle::default();
        let view = handle.clone();
        sample(&handle.tracker, 300.0);
        assert_eq!(sample(&handle.tracker, 120.0), ScrollDirection::Up);
        assert_eq!(view.direction(), ScrollDirection::Up);
        assert_eq!(view.offset(), 120.0);
        assert!(view.scrolled_past(50.0));
    }
}
