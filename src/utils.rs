use web_sys::{
    js_sys::{Function, Reflect},
    wasm_bindgen::{JsCast, JsValue},
    Document, Element, HtmlCanvasElement, HtmlElement, Window,
};

use crate::error::Error;

/// Returns the global window.
pub fn get_window() -> Result<Window, Error> {
    web_sys::window().ok_or(Error::UnableToRetrieveWindow)
}

/// Returns the document of the global window.
pub fn get_document() -> Result<Document, Error> {
    get_window()?
        .document()
        .ok_or(Error::UnableToRetrieveDocument)
}

/// Returns the viewport size in CSS pixels as `(width, height)`.
pub fn get_raw_window_size() -> Result<(f64, f64), Error> {
    let window = get_window()?;
    let width = window.inner_width()?.as_f64().unwrap_or_default();
    let height = window.inner_height()?.as_f64().unwrap_or_default();
    Ok((width, height))
}

/// Returns the vertical scroll offset of the page.
pub fn get_scroll_offset() -> Result<f64, Error> {
    Ok(get_window()?.scroll_y()?)
}

/// Returns the element with the given ID, or `<body>` if no ID is given.
pub fn get_element_by_id_or_body(id: Option<&String>) -> Result<Element, Error> {
    let document = get_document()?;
    match id {
        Some(id) => document
            .get_element_by_id(id)
            .ok_or_else(|| Error::UnableToRetrieveElement(id.clone())),
        None => document
            .body()
            .map(Element::from)
            .ok_or(Error::UnableToRetrieveBody),
    }
}

/// Returns the HTML element with the given ID.
pub fn get_html_element_by_id(id: &str) -> Result<HtmlElement, Error> {
    get_document()?
        .get_element_by_id(id)
        .and_then(|element| element.dyn_into::<HtmlElement>().ok())
        .ok_or_else(|| Error::UnableToRetrieveElement(id.to_string()))
}

/// Creates a canvas element and appends it to `parent`.
pub fn create_canvas_in_element(
    parent: &Element,
    width: u32,
    height: u32,
) -> Result<HtmlCanvasElement, Error> {
    let canvas = get_document()?
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| Error::UnableToRetrieveElement("canvas".into()))?;
    canvas.set_width(width);
    canvas.set_height(height);
    parent.append_child(&canvas)?;
    Ok(canvas)
}

/// Returns whether the window exposes a constructor with the given name,
/// e.g. `"IntersectionObserver"`.
pub fn supports_constructor(name: &str) -> bool {
    get_window()
        .ok()
        .and_then(|window| Reflect::get(&window, &JsValue::from_str(name)).ok())
        .is_some_and(|value| value.is_instance_of::<Function>())
}

/// Logs a warning to the browser console.
pub fn log_warning(message: &str) {
    web_sys::console::warn_1(&JsValue::from_str(message));
}

/// Logs an error to the browser console.
pub fn log_error(message: &str) {
    web_sys::console::error_1(&JsValue::from_str(message));
}

/// Forwards Rust panics to the browser console.
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}
