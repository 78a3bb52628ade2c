use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use web_sys::{
    wasm_bindgen::{prelude::Closure, JsCast},
    Element,
};

use crate::{
    error::Error,
    typewriter::TypingSequence,
    utils::{get_window, log_error},
};

/// Caret appended to lines that are not fully typed yet.
const CARET: &str = "|";

/// Ticker state shared with the timeout callback.
struct TickerState {
    /// The sequence being typed.
    sequence: TypingSequence,
    /// One element per sequence line.
    targets: Vec<Element>,
    /// Called once when the sequence finishes.
    on_finish: Option<Box<dyn FnOnce()>>,
    /// ID of the pending timeout.
    handle: Option<i32>,
    /// The timeout callback. `None` once cancelled.
    closure: Option<Closure<dyn FnMut()>>,
}

impl TickerState {
    /// Writes every line's visible text into its element.
    fn render(&self) {
        for (line, target) in self.sequence.lines().iter().zip(&self.targets) {
            let typewriter = &line.typewriter;
            let text = if typewriter.shows_caret() {
                format!("{}{CARET}", typewriter.visible())
            } else {
                typewriter.visible().to_string()
            };
            target.set_text_content(Some(&text));
        }
    }

    /// Arms the single timeout for the next step.
    fn schedule(&mut self, delay_ms: u32) -> Result<(), Error> {
        let Some(closure) = self.closure.as_ref() else {
            return Ok(());
        };
        let handle = get_window()?.set_timeout_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            delay_ms.min(i32::MAX as u32) as i32,
        )?;
        self.handle = Some(handle);
        Ok(())
    }
}

/// Types a [`TypingSequence`] into DOM elements.
///
/// Only one timeout is pending at any time, so cancelling the ticker (or
/// dropping it) stops the whole sequence at once.
pub struct TypewriterTicker {
    state: Rc<RefCell<TickerState>>,
}

impl TypewriterTicker {
    /// Starts typing `sequence`, writing line `i` into `targets[i]`.
    ///
    /// `on_finish` runs once, after the sequence's settle delay.
    pub fn start<F>(
        sequence: TypingSequence,
        targets: Vec<Element>,
        on_finish: F,
    ) -> Result<Self, Error>
    where
        F: FnOnce() + 'static,
    {
        let first_delay = sequence.first_delay();
        let state = Rc::new(RefCell::new(TickerState {
            sequence,
            targets,
            on_finish: Some(Box::new(on_finish)),
            handle: None,
            closure: None,
        }));

        let weak: Weak<RefCell<TickerState>> = Rc::downgrade(&state);
        let closure = Closure::<dyn FnMut()>::new(move || {
            if let Some(state) = weak.upgrade() {
                tick(&state);
            }
        });

        {
            let mut state = state.borrow_mut();
            state.closure = Some(closure);
            state.render();
            state.schedule(first_delay)?;
        }
        Ok(Self { state })
    }

    /// Returns whether the sequence has finished.
    pub fn is_finished(&self) -> bool {
        self.state.borrow().sequence.is_finished()
    }

    /// Returns whether a step is still pending.
    pub fn is_pending(&self) -> bool {
        let state = self.state.borrow();
        state.closure.is_some() && state.handle.is_some()
    }

    /// Stops typing where it is.
    ///
    /// Calling this more than once is a no-op.
    pub fn cancel(&mut self) {
        let mut state = self.state.borrow_mut();
        if let Some(handle) = state.handle.take() {
            if let Ok(window) = get_window() {
                window.clear_timeout_with_handle(handle);
            }
        }
        state.closure = None;
        state.on_finish = None;
    }
}

impl Drop for TypewriterTicker {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for TypewriterTicker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("TypewriterTicker")
            .field("phase", &state.sequence.phase())
            .field("handle", &state.handle)
            .finish()
    }
}

/// Advances the sequence by one step and re-arms the timeout.
fn tick(state: &Rc<RefCell<TickerState>>) {
    let on_finish = {
        let mut state = state.borrow_mut();
        state.handle = None;
        let next = state.sequence.advance();
        state.render();
        match next {
            Some(delay_ms) => {
                if let Err(error) = state.schedule(delay_ms) {
                    log_error(&format!("Typewriter stopped: {error}"));
                }
                None
            }
            None => state.on_finish.take(),
        }
    };
    if let Some(on_finish) = on_finish {
        on_finish();
    }
}
