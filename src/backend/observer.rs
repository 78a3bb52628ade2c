use std::{cell::RefCell, rc::Rc};

use web_sys::{
    js_sys::Array,
    wasm_bindgen::{prelude::Closure, JsCast, JsValue},
    Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
};

use crate::{
    error::Error,
    reveal::{RevealOptions, RevealPose, RevealState},
    utils::{log_warning, supports_constructor},
};

/// Boxed visibility change callback.
type ChangeCallback = Box<dyn FnMut(bool)>;

/// State shared with the observer callback.
struct Shared<T = Element> {
    /// Visibility of the observed element.
    state: RevealState,
    /// Called on every visibility flip.
    on_change: Option<ChangeCallback>,
    /// Cleared on disconnect; late entries are ignored afterwards.
    active: bool,
    /// The observed element. Entries for any other element are ignored.
    target: Option<T>,
}

impl<T> Shared<T> {
    fn new(state: RevealState, active: bool) -> Self {
        Self {
            state,
            on_change: None,
            active,
            target: None,
        }
    }
}

/// Reports whether an element is in the viewport.
///
/// Backed by [`IntersectionObserver`]. The flag starts `false` and flips
/// every time the visible fraction of the element crosses the configured
/// threshold.
///
/// If the browser has no `IntersectionObserver`, the flag is stuck at
/// `true` so that revealed content is never left hidden.
///
/// [`IntersectionObserver`]: https://developer.mozilla.org/en-US/docs/Web/API/IntersectionObserver
pub struct RevealObserver {
    /// Options.
    options: RevealOptions,
    /// State shared with the callback.
    shared: Rc<RefCell<Shared>>,
    /// The browser observer. `None` when unsupported or disconnected.
    observer: Option<IntersectionObserver>,
    /// The observer callback.
    #[allow(dead_code)]
    closure: Option<Closure<dyn FnMut(Array)>>,
}

impl RevealObserver {
    /// Constructs a new [`RevealObserver`].
    ///
    /// Falls back to an always-visible observer if intersection observation
    /// is unavailable.
    pub fn new(options: RevealOptions) -> Self {
        match Self::try_new(options.clone()) {
            Ok(observer) => observer,
            Err(error) => {
                log_warning(&format!("Reveal animations disabled: {error}"));
                Self::always_visible(options)
            }
        }
    }

    /// Constructs a new [`RevealObserver`], failing if intersection
    /// observation is unavailable.
    pub fn try_new(options: RevealOptions) -> Result<Self, Error> {
        if !supports_constructor("IntersectionObserver") {
            return Err(Error::ObserverUnsupported);
        }

        let shared = Rc::new(RefCell::new(Shared::new(
            RevealState::new(options.get_threshold()),
            true,
        )));

        let closure = Closure::<dyn FnMut(Array)>::new({
            let shared = shared.clone();
            move |entries: Array| {
                for entry in entries.iter() {
                    let entry: IntersectionObserverEntry = entry.unchecked_into();
                    handle_entry(
                        &shared,
                        &entry.target(),
                        entry.intersection_ratio(),
                        entry.is_intersecting(),
                    );
                }
            }
        });

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(options.get_threshold()));
        if let Some(margin) = options.get_root_margin() {
            init.set_root_margin(margin);
        }
        let observer =
            IntersectionObserver::new_with_options(closure.as_ref().unchecked_ref(), &init)?;

        Ok(Self {
            options,
            shared,
            observer: Some(observer),
            closure: Some(closure),
        })
    }

    /// An observer that always reports the element as visible.
    fn always_visible(options: RevealOptions) -> Self {
        Self {
            options,
            shared: Rc::new(RefCell::new(Shared::new(
                RevealState::always_visible(),
                false,
            ))),
            observer: None,
            closure: None,
        }
    }

    /// Sets the callback invoked with the new flag on every visibility flip.
    pub fn on_change<F>(&mut self, callback: F)
    where
        F: FnMut(bool) + 'static,
    {
        self.shared.borrow_mut().on_change = Some(Box::new(callback));
    }

    /// Starts observing `element`.
    ///
    /// If another element was observed, it is released first and the flag
    /// goes back to `false` until the browser reports on the new element.
    /// Reports still queued for the previous element are dropped.
    /// Observing the same element again does nothing.
    pub fn observe(&mut self, element: &Element) {
        if self.observer.is_none() || self.target().as_ref() == Some(element) {
            return;
        }
        self.unobserve();
        {
            let mut shared = self.shared.borrow_mut();
            shared.state = RevealState::new(self.options.get_threshold());
            shared.target = Some(element.clone());
        }
        if let Some(observer) = &self.observer {
            observer.observe(element);
        }
    }

    /// Stops observing the current element, if any.
    pub fn unobserve(&mut self) {
        let Some(previous) = self.shared.borrow_mut().target.take() else {
            return;
        };
        if let Some(observer) = &self.observer {
            // Pending entries belong to the released element.
            observer.take_records();
            observer.unobserve(&previous);
        }
    }

    /// Stops all observation. No callback runs afterwards.
    ///
    /// Calling this more than once is a no-op.
    pub fn disconnect(&mut self) {
        {
            let mut shared = self.shared.borrow_mut();
            shared.active = false;
            shared.on_change = None;
        }
        if let Some(observer) = self.observer.take() {
            observer.disconnect();
        }
        self.shared.borrow_mut().target = None;
        self.closure = None;
    }

    /// Returns whether the element currently counts as visible.
    pub fn is_visible(&self) -> bool {
        self.shared.borrow().state.is_visible()
    }

    /// Returns whether an element is being observed.
    pub fn is_observing(&self) -> bool {
        self.observer.is_some() && self.shared.borrow().target.is_some()
    }

    /// Returns the observed element.
    pub fn target(&self) -> Option<Element> {
        self.shared.borrow().target.clone()
    }

    /// Returns the options.
    pub fn options(&self) -> &RevealOptions {
        &self.options
    }
}

impl Drop for RevealObserver {
    fn drop(&mut self) {
        self.disconnect();
    }
}

impl std::fmt::Debug for RevealObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevealObserver")
            .field("options", &self.options)
            .field("visible", &self.is_visible())
            .field("target", &self.target())
            .finish()
    }
}

/// Feeds one intersection report into the shared state and notifies the
/// change callback outside of the borrow.
///
/// Reports for anything but the observed element are ignored.
fn handle_entry<T: PartialEq>(
    shared: &Rc<RefCell<Shared<T>>>,
    target: &T,
    ratio: f64,
    is_intersecting: bool,
) {
    let changed = {
        let mut shared = shared.borrow_mut();
        if !shared.active || shared.target.as_ref() != Some(target) {
            return;
        }
        shared.state.update(ratio, is_intersecting)
    };
    let Some(visible) = changed else {
        return;
    };

    let callback = shared.borrow_mut().on_change.take();
    if let Some(mut callback) = callback {
        callback(visible);
        let mut shared = shared.borrow_mut();
        // A replacement or a disconnect made during the call wins.
        if shared.active && shared.on_change.is_none() {
            shared.on_change = Some(callback);
        }
    }
}

/// Replaces the reveal classes of `element` with those of `pose`.
pub fn apply_pose(element: &Element, pose: RevealPose) -> Result<(), Error> {
    let class_list = element.class_list();
    for other in [
        RevealPose::Shown,
        RevealPose::BelowViewport,
        RevealPose::AboveViewport,
    ] {
        for class in other.css_classes().split_whitespace() {
            class_list.remove_1(class)?;
        }
    }
    for class in pose.css_classes().split_whitespace() {
        class_list.add_1(class)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Shared state observing the element with the given ID.
    fn shared(threshold: f64, target: u32) -> Rc<RefCell<Shared<u32>>> {
        let mut shared = Shared::new(RevealState::new(threshold), true);
        shared.target = Some(target);
        Rc::new(RefCell::new(shared))
    }

    fn record_flips(shared: &Rc<RefCell<Shared<u32>>>) -> Rc<RefCell<Vec<bool>>> {
        let flips = Rc::new(RefCell::new(Vec::new()));
        shared.borrow_mut().on_change = Some(Box::new({
            let flips = flips.clone();
            move |visible| flips.borrow_mut().push(visible)
        }));
        flips
    }

    #[test]
    fn test_entries_notify_on_flips_only() {
        let shared = shared(0.2, 1);
        let flips = record_flips(&shared);

        for ratio in [0.0, 0.1, 0.25, 0.8, 0.3, 0.15, 0.0] {
            handle_entry(&shared, &1, ratio, ratio > 0.0);
        }
        assert_eq!(*flips.borrow(), vec![true, false]);
        assert!(shared.borrow().on_change.is_some());
    }

    #[test]
    fn test_inactive_state_ignores_entries() {
        let shared = shared(0.2, 1);
        let calls = Rc::new(Cell::new(0));
        shared.borrow_mut().on_change = Some(Box::new({
            let calls = calls.clone();
            move |_| calls.set(calls.get() + 1)
        }));
        shared.borrow_mut().active = false;

        handle_entry(&shared, &1, 1.0, true);
        assert_eq!(calls.get(), 0);
        assert!(!shared.borrow().state.is_visible());
    }

    #[test]
    fn test_entries_for_released_element_are_ignored() {
        let shared = shared(0.2, 1);
        let flips = record_flips(&shared);
        handle_entry(&shared, &1, 1.0, true);
        assert!(shared.borrow().state.is_visible());

        // Switch to element 2, as `observe` does.
        {
            let mut shared = shared.borrow_mut();
            shared.state = RevealState::new(0.2);
            shared.target = Some(2);
        }
        handle_entry(&shared, &1, 1.0, true);
        assert!(!shared.borrow().state.is_visible());
        assert_eq!(*flips.borrow(), vec![true]);

        handle_entry(&shared, &2, 0.5, true);
        assert!(shared.borrow().state.is_visible());
        assert_eq!(*flips.borrow(), vec![true, true]);
    }

    #[test]
    fn test_unobserved_state_ignores_entries() {
        let shared = shared(0.0, 1);
        shared.borrow_mut().target = None;

        handle_entry(&shared, &1, 1.0, true);
        assert!(!shared.borrow().state.is_visible());
    }

    #[test]
    fn test_fallback_is_always_visible() {
        let calls = Rc::new(Cell::new(0));
        let mut observer = RevealObserver::always_visible(RevealOptions::new().threshold(0.5));
        observer.on_change({
            let calls = calls.clone();
            move |_| calls.set(calls.get() + 1)
        });

        assert!(observer.is_visible());
        assert!(!observer.is_observing());
        assert_eq!(observer.target(), None);
        assert_eq!(observer.options().get_threshold(), 0.5);

        observer.unobserve();
        observer.disconnect();
        observer.disconnect();
        assert!(observer.is_visible());
        assert_eq!(calls.get(), 0);
    }
}
