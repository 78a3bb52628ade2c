#![warn(missing_docs, clippy::unwrap_used)]
#![doc = include_str!("../README.md")]

/// Custom error type.
pub mod error;

/// Event handling.
pub mod event;

/// Web utility functions.
pub mod utils;

/// Starfield scene.
pub mod scene;

/// Viewport reveal state.
pub mod reveal;

/// Scroll direction tracking.
pub mod scroll;

/// Typewriter text reveal.
pub mod typewriter;

/// Backend.
pub mod backend;

/// Rendering.
mod render;

// Re-export web_sys crate.
pub use web_sys;

pub use backend::{
    background::{fog_opacity, mount_background, BackgroundAnimator, BackgroundOptions},
    observer::{apply_pose, RevealObserver},
    scroll::{ScrollHandle, ScrollListener},
    typewriter::TypewriterTicker,
};
pub use render::AnimationLoop;
pub use reveal::{RevealOptions, RevealPose, RevealState};
pub use scene::{Scene, SceneOptions, StarLayer};
pub use scroll::{ScrollDirection, ScrollTracker};
pub use typewriter::{Typewriter, TypewriterState, TypingSequence};
