//! Event listener management with automatic cleanup.
//!
//! Every listener the effects attach (pointer, resize, scroll) is held in an
//! [`EventCallback`], so releasing the owner releases the listener.

use std::fmt::Formatter;
use web_sys::{
    wasm_bindgen::{convert::FromWasmAbi, prelude::Closure, JsCast},
    EventTarget,
};

use crate::error::Error;

/// Manages web event listeners with automatic cleanup.
///
/// When this struct is dropped, all registered event listeners are removed
/// from the target, preventing memory leaks.
pub(crate) struct EventCallback<T: 'static> {
    /// The event types this callback is registered for.
    event_types: &'static [&'static str],
    /// The target the listeners are attached to.
    target: EventTarget,
    /// The closure that handles the events.
    #[allow(dead_code)]
    closure: Closure<dyn FnMut(T)>,
}

impl<T: 'static> EventCallback<T> {
    /// Creates a new [`EventCallback`] and attaches listeners to the target.
    pub fn new<F>(
        target: EventTarget,
        event_types: &'static [&'static str],
        callback: F,
    ) -> Result<Self, Error>
    where
        F: FnMut(T) + 'static,
        T: JsCast + FromWasmAbi,
    {
        let closure = Closure::<dyn FnMut(T)>::new(callback);

        for event_type in event_types {
            target.add_event_listener_with_callback(event_type, closure.as_ref().unchecked_ref())?;
        }

        Ok(Self {
            event_types,
            target,
            closure,
        })
    }
}

impl<T: 'static> Drop for EventCallback<T> {
    fn drop(&mut self) {
        for event_type in self.event_types {
            let _ = self.target.remove_event_listener_with_callback(
                event_type,
                self.closure.as_ref().unchecked_ref(),
            );
        }
    }
}

impl<T: 'static> std::fmt::Debug for EventCallback<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventCallback")
            .field("event_types", &self.event_types)
            .field("target", &self.target)
            .finish()
    }
}

/// Pointer event types.
pub(crate) const POINTER_EVENT_TYPES: &[&str] = &["mousemove"];

/// Viewport resize event types.
pub(crate) const RESIZE_EVENT_TYPES: &[&str] = &["resize"];

/// Scroll event types.
pub(crate) const SCROLL_EVENT_TYPES: &[&str] = &["scroll"];
