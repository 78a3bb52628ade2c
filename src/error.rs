use std::io::{Error as IoError, ErrorKind};

use web_sys::wasm_bindgen::JsValue;

/// Error type.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// Unable to retrieve the window.
    #[error("Unable to retrieve window")]
    UnableToRetrieveWindow,

    /// Unable to retrieve the document.
    #[error("Unable to retrieve document")]
    UnableToRetrieveDocument,

    /// Unable to retrieve the document body.
    #[error("Unable to retrieve body")]
    UnableToRetrieveBody,

    /// Unable to retrieve the 2D canvas context.
    #[error("Unable to retrieve canvas context")]
    UnableToRetrieveCanvasContext,

    /// No element with the given ID (or of the expected type) exists.
    #[error("Unable to retrieve element: {0}")]
    UnableToRetrieveElement(String),

    /// The browser does not provide `IntersectionObserver`.
    #[error("IntersectionObserver is not supported")]
    ObserverUnsupported,

    /// An exception thrown by a browser API.
    #[error("JavaScript error: {0}")]
    JsError(String),
}

impl From<JsValue> for Error {
    fn from(value: JsValue) -> Self {
        let message = value
            .as_string()
            .unwrap_or_else(|| format!("{value:?}"));
        Self::JsError(message)
    }
}

impl From<Error> for IoError {
    fn from(error: Error) -> Self {
        IoError::new(ErrorKind::Other, error.to_string())
    }
}
