//! ## Backends
//!
//! Browser bindings for the effects. The simulation and state machines live
//! in [`scene`](crate::scene), [`reveal`](crate::reveal),
//! [`scroll`](crate::scroll) and [`typewriter`](crate::typewriter); the
//! types here connect them to the DOM:
//!
//! - [`BackgroundAnimator`]: paints the starfield [`Scene`] onto a
//!   full-viewport canvas on every animation frame and follows the pointer,
//!   the viewport size and (optionally) the scroll offset.
//!
//! - [`RevealObserver`]: an `IntersectionObserver` reporting whether an
//!   element is in view. Fails open where the API is missing.
//!
//! - [`ScrollListener`]: the scroll direction used to pick the edge hidden
//!   sections enter from.
//!
//! - [`TypewriterTicker`]: types a sequence of lines into elements with a
//!   single pending timeout.
//!
//! ## Lifecycle
//!
//! | Type                   | Starts on      | Stops on                 |
//! |------------------------|----------------|--------------------------|
//! | [`BackgroundAnimator`] | `start()`      | `stop()` or drop         |
//! | [`RevealObserver`]     | `observe()`    | `disconnect()` or drop   |
//! | [`ScrollListener`]     | construction   | `stop()` or drop         |
//! | [`TypewriterTicker`]   | `start()`      | `cancel()` or drop       |
//!
//! Every stop method is idempotent, and no callback runs after it returns.
//!
//! [`BackgroundAnimator`]: background::BackgroundAnimator
//! [`RevealObserver`]: observer::RevealObserver
//! [`ScrollListener`]: scroll::ScrollListener
//! [`TypewriterTicker`]: typewriter::TypewriterTicker
//! [`Scene`]: crate::scene::Scene

/// Canvas background.
pub mod background;

/// Viewport reveal observer.
pub mod observer;

/// Scroll direction listener.
pub mod scroll;

/// Typewriter ticker.
pub mod typewriter;

/// Event listener management.
pub(crate) mod event_callback;
