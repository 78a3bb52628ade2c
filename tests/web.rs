#![cfg(target_arch = "wasm32")]

use std::{cell::Cell, rc::Rc};

use orbitfx::{
    error::Error,
    fog_opacity, mount_background,
    utils::{get_document, get_scroll_offset, get_window},
    web_sys::{
        js_sys::Reflect,
        wasm_bindgen::{JsCast, JsValue},
        HtmlElement,
    },
    BackgroundAnimator, BackgroundOptions, RevealObserver, RevealOptions, SceneOptions,
    ScrollDirection, ScrollListener, TypewriterTicker, TypingSequence,
};
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn test_mount_populates_scene() {
    let animator = mount_background(BackgroundOptions::new().size((1920, 1080)).seed(7))
        .expect("background should mount");

    let scene = animator.scene();
    assert_eq!(scene.stars().len(), 285);
    assert_eq!(scene.flares().len(), 3);
    assert_eq!(scene.asteroids().len(), 4);
    assert_eq!(scene.size(), (1920.0, 1080.0));
    drop(scene);

    assert!(animator.is_running());
    assert_eq!(animator.listener_count(), 2);
    assert_eq!(animator.canvas().width(), 1920);
}

#[wasm_bindgen_test]
fn test_stop_detaches_everything() {
    let mut animator = BackgroundAnimator::new_with_options(
        BackgroundOptions::new()
            .size((800, 600))
            .scene(SceneOptions::new().asteroid_count(1)),
    )
    .expect("animator should be created");
    assert!(!animator.is_running());
    assert_eq!(animator.listener_count(), 0);

    animator.start().expect("animator should start");
    animator.start().expect("second start is a no-op");
    assert!(animator.is_running());

    animator.stop();
    animator.stop();
    assert!(!animator.is_running());
    assert_eq!(animator.listener_count(), 0);
}

#[wasm_bindgen_test]
fn test_drop_removes_owned_canvas() {
    let animator = mount_background(BackgroundOptions::new().size((320, 200)))
        .expect("background should mount");
    let canvas = animator.canvas().clone();
    assert!(canvas.is_connected());
    assert_eq!(canvas.get_attribute("aria-hidden").as_deref(), Some("true"));

    drop(animator);
    assert!(!canvas.is_connected());
}

#[wasm_bindgen_test]
fn test_reveal_observer_disconnects_twice() {
    let document = get_document().expect("document");
    let section = document.create_element("section").expect("section");

    let calls = Rc::new(Cell::new(0));
    let mut observer = RevealObserver::new(RevealOptions::new().threshold(0.2));
    observer.on_change({
        let calls = calls.clone();
        move |_| calls.set(calls.get() + 1)
    });
    observer.observe(&section);
    assert!(observer.is_observing());
    assert!(!observer.is_visible());

    observer.disconnect();
    observer.disconnect();
    assert!(!observer.is_observing());
    assert_eq!(calls.get(), 0);
}

#[wasm_bindgen_test]
fn test_scroll_listener_stops() {
    let mut listener = ScrollListener::new().expect("listener");
    let handle = listener.handle();
    assert!(listener.is_listening());
    assert_eq!(handle.direction(), ScrollDirection::Down);

    listener.stop();
    listener.stop();
    assert!(!listener.is_listening());
}

#[wasm_bindgen_test]
fn test_typewriter_renders_caret_and_cancels() {
    let document = get_document().expect("document");
    let heading = document.create_element("h1").expect("h1");
    let paragraph = document.create_element("p").expect("p");

    let finished = Rc::new(Cell::new(false));
    let mut ticker = TypewriterTicker::start(
        TypingSequence::hero("Hi", "Hello"),
        vec![heading.clone(), paragraph.clone()],
        {
            let finished = finished.clone();
            move || finished.set(true)
        },
    )
    .expect("ticker should start");

    assert_eq!(heading.text_content().as_deref(), Some("|"));
    assert_eq!(paragraph.text_content().as_deref(), Some("|"));
    assert!(ticker.is_pending());
    assert!(!ticker.is_finished());

    ticker.cancel();
    ticker.cancel();
    assert!(!ticker.is_pending());
    assert!(!finished.get());
}

#[wasm_bindgen_test]
fn test_reveal_observer_switches_elements() {
    let document = get_document().expect("document");
    let first = document.create_element("section").expect("section");
    let second = document.create_element("section").expect("section");

    let mut observer = RevealObserver::new(RevealOptions::new());
    observer.observe(&first);
    assert_eq!(observer.target(), Some(first.clone()));

    observer.observe(&second);
    assert!(observer.is_observing());
    assert!(!observer.is_visible());
    assert_eq!(observer.target(), Some(second.clone()));

    observer.observe(&second);
    assert_eq!(observer.target(), Some(second));

    observer.unobserve();
    assert!(!observer.is_observing());
    assert_eq!(observer.target(), None);
}

#[wasm_bindgen_test]
fn test_reveal_observer_fails_open_without_api() {
    let window = get_window().expect("window");
    let key = JsValue::from_str("IntersectionObserver");
    let constructor = Reflect::get(&window, &key).expect("constructor");
    Reflect::set(&window, &key, &JsValue::UNDEFINED).expect("shadow");

    let section = get_document()
        .expect("document")
        .create_element("section")
        .expect("section");
    let mut observer = RevealObserver::new(RevealOptions::new().threshold(0.5));
    let unsupported = RevealObserver::try_new(RevealOptions::new()).err();
    Reflect::set(&window, &key, &constructor).expect("restore");

    assert_eq!(unsupported, Some(Error::ObserverUnsupported));
    assert!(observer.is_visible());
    observer.observe(&section);
    assert!(!observer.is_observing());
    assert!(observer.is_visible());
    observer.disconnect();
    assert!(observer.is_visible());
}

#[wasm_bindgen_test]
fn test_fog_follows_scroll_offset() {
    let document = get_document().expect("document");
    let fog: HtmlElement = document
        .create_element("div")
        .expect("div")
        .dyn_into()
        .expect("html element");
    fog.set_id("fog-test");
    document
        .body()
        .expect("body")
        .append_child(&fog)
        .expect("append");

    let animator = mount_background(
        BackgroundOptions::new()
            .size((320, 200))
            .fog_id("fog-test"),
    )
    .expect("background should mount");
    assert_eq!(animator.listener_count(), 3);

    let opacity = fog
        .style()
        .get_property_value("opacity")
        .expect("opacity")
        .parse::<f64>()
        .expect("number");
    let expected = fog_opacity(get_scroll_offset().expect("scroll offset"));
    assert!((opacity - expected).abs() < 1e-6);

    drop(animator);
    fog.remove();
}
