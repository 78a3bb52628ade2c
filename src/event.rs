/// A pointer position in viewport (client) pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// The x coordinate of the pointer.
    pub x: f64,
    /// The y coordinate of the pointer.
    pub y: f64,
}

/// Convert a [`web_sys::MouseEvent`] to a [`PointerEvent`].
impl From<web_sys::MouseEvent> for PointerEvent {
    fn from(event: web_sys::MouseEvent) -> Self {
        PointerEvent {
            x: event.client_x() as f64,
            y: event.client_y() as f64,
        }
    }
}
