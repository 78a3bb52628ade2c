//! Scroll direction tracking.

/// Direction of the last scroll movement.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash)]
pub enum ScrollDirection {
    /// Content moved towards the top of the page.
    Up,
    /// Content moved towards the bottom of the page.
    #[default]
    Down,
}

impl ScrollDirection {
    /// Returns the lowercase name, e.g. for a `data-scroll` attribute.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScrollDirection::Up => "up",
            ScrollDirection::Down => "down",
        }
    }
}

/// Classifies scroll motion by comparing each offset to the previous one.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollTracker {
    /// Last sampled offset, if any.
    last_offset: Option<f64>,
    /// Current direction.
    direction: ScrollDirection,
}

impl ScrollTracker {
    /// Constructs a new [`ScrollTracker`] heading [`ScrollDirection::Down`].
    pub fn new() -> Self {
        Default::default()
    }

    /// Feeds a vertical scroll offset and returns the resulting direction.
    ///
    /// The first sample only establishes the baseline. Equal offsets keep
    /// the previous direction.
    pub fn sample(&mut self, offset: f64) -> ScrollDirection {
        if let Some(last) = self.last_offset {
            if offset > last {
                self.direction = ScrollDirection::Down;
            } else if offset < last {
                self.direction = ScrollDirection::Up;
            }
        }
        self.last_offset = Some(offset);
        self.direction
    }

    /// Returns the current direction.
    pub fn direction(&self) -> ScrollDirection {
        self.direction
    }

    /// Returns the last sampled offset, or `0.0` before the first sample.
    pub fn offset(&self) -> f64 {
        self.last_offset.unwrap_or_default()
    }

    /// Whether the page is scrolled strictly further than `threshold` pixels.
    pub fn scrolled_past(&self, threshold: f64) -> bool {
        self.offset() > threshold
    }

    /// Forgets the baseline; the direction is kept.
    pub fn reset(&mut self) {
        self.last_offset = None;
    }
}
