use std::io;

use orbitfx::{
    apply_pose, mount_background,
    utils::{get_document, get_html_element_by_id, log_warning},
    BackgroundOptions, RevealObserver, RevealOptions, RevealPose, ScrollListener,
    TypewriterTicker, TypingSequence,
};

const SECTIONS: [&str; 3] = ["about", "projects", "contact"];

fn main() -> io::Result<()> {
    console_error_panic_hook::set_once();

    // Everything below lives as long as the page does.
    let background = mount_background(BackgroundOptions::new().fog_id("fog"));
    std::mem::forget(background);

    let scroll = ScrollListener::new()?;
    for id in SECTIONS {
        let section = get_html_element_by_id(id)?;
        apply_pose(&section, RevealPose::BelowViewport)?;

        let mut observer = RevealObserver::new(RevealOptions::new().threshold(0.2));
        observer.on_change({
            let section = section.clone();
            let scroll = scroll.handle();
            move |visible| {
                let pose = RevealPose::resolve(visible, scroll.direction());
                if let Err(error) = apply_pose(&section, pose) {
                    log_warning(&format!("Failed to reveal section: {error}"));
                }
            }
        });
        observer.observe(&section);
        if observer.is_visible() {
            apply_pose(&section, RevealPose::Shown)?;
        }
        std::mem::forget(observer);
    }
    std::mem::forget(scroll);

    let document = get_document()?;
    let targets = ["hero-heading", "hero-paragraph"]
        .into_iter()
        .filter_map(|id| document.get_element_by_id(id))
        .collect();
    let ticker = TypewriterTicker::start(
        TypingSequence::hero("Hi, I'm Orbit.", "I build things for the web, in Rust."),
        targets,
        || {
            if let Ok(cta) = get_html_element_by_id("cta") {
                let _ = cta.class_list().add_1("ready");
            }
        },
    )?;
    std::mem::forget(ticker);

    Ok(())
}
