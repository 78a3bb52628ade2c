//! Viewport reveal state.
//!
//! [`RevealState`] turns the intersection ratios reported by the browser
//! into a single "is visible" flag, and [`RevealPose`] picks the transition
//! classes for a section from that flag and the scroll direction.

use crate::scroll::ScrollDirection;

/// Options for the [`RevealObserver`](crate::backend::observer::RevealObserver).
#[derive(Debug, Clone, PartialEq)]
pub struct RevealOptions {
    /// Minimum visible fraction of the element that counts as visible.
    threshold: f64,
    /// Margin around the viewport, in CSS `margin` syntax.
    root_margin: Option<String>,
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self {
            threshold: 0.2,
            root_margin: None,
        }
    }
}

impl RevealOptions {
    /// Constructs a new [`RevealOptions`].
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the visible fraction that flips the state to visible.
    ///
    /// The default value is 0.2.
    ///
    /// # Panics
    ///
    /// Panics if `threshold` is not within `[0.0, 1.0]`.
    pub fn threshold(mut self, threshold: f64) -> Self {
        if !(0.0..=1.0).contains(&threshold) {
            panic!("Threshold must be between 0 and 1");
        }
        self.threshold = threshold;
        self
    }

    /// Sets the root margin, e.g. `"0px 0px -10% 0px"`.
    pub fn root_margin(mut self, margin: &str) -> Self {
        self.root_margin = Some(margin.to_string());
        self
    }

    /// Returns the threshold.
    pub fn get_threshold(&self) -> f64 {
        self.threshold
    }

    /// Returns the root margin.
    pub fn get_root_margin(&self) -> Option<&str> {
        self.root_margin.as_deref()
    }
}

/// Visibility of one observed element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealState {
    /// Whether the element currently counts as visible.
    visible: bool,
    /// Minimum visible fraction.
    threshold: f64,
}

impl RevealState {
    /// Constructs a hidden [`RevealState`].
    pub fn new(threshold: f64) -> Self {
        Self {
            visible: false,
            threshold,
        }
    }

    /// Constructs a state that is permanently visible.
    ///
    /// Used when the browser cannot observe intersections, so that content
    /// is never left hidden.
    pub fn always_visible() -> Self {
        Self {
            visible: true,
            threshold: 0.0,
        }
    }

    /// Returns whether the element counts as visible.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Applies an intersection report and returns the new flag if it flipped.
    pub fn update(&mut self, ratio: f64, is_intersecting: bool) -> Option<bool> {
        let visible = is_intersecting && ratio >= self.threshold;
        if visible == self.visible {
            return None;
        }
        self.visible = visible;
        Some(visible)
    }
}

/// Where a section sits relative to its final position.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum RevealPose {
    /// In view, at its final position.
    Shown,
    /// Hidden and waiting below the viewport, while scrolling down.
    BelowViewport,
    /// Hidden and waiting above the viewport, while scrolling up.
    AboveViewport,
}

impl RevealPose {
    /// Picks the pose for the given visibility and scroll direction.
    pub fn resolve(visible: bool, direction: ScrollDirection) -> Self {
        match (visible, direction) {
            (true, _) => RevealPose::Shown,
            (false, ScrollDirection::Down) => RevealPose::BelowViewport,
            (false, ScrollDirection::Up) => RevealPose::AboveViewport,
        }
    }

    /// Returns the utility classes for this pose.
    pub fn css_classes(&self) -> &'static str {
        match self {
            RevealPose::Shown => "opacity-100 translate-y-0",
            RevealPose::BelowViewport => "opacity-0 translate-y-16",
            RevealPose::AboveViewport => "opacity-0 -translate-y-16",
        }
    }
}
