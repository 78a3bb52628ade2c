//! Typewriter text reveal.
//!
//! A [`Typewriter`] reveals one more character per tick. A
//! [`TypingSequence`] chains several typewriters with their own pacing and
//! tells its driver how long to wait before the next tick, so a single
//! timer can run the whole sequence.

use compact_str::CompactString;

/// State of a [`Typewriter`].
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum TypewriterState {
    /// Nothing typed yet.
    #[default]
    Idle,
    /// The given number of characters is visible.
    Typing(usize),
    /// The whole text is visible.
    Done,
}

/// Reveals a text one character at a time.
#[derive(Debug, Clone, PartialEq)]
pub struct Typewriter {
    /// Full text.
    text: CompactString,
    /// Number of characters in `text`.
    char_count: usize,
    /// Current state.
    state: TypewriterState,
}

impl Typewriter {
    /// Constructs an idle [`Typewriter`].
    pub fn new(text: &str) -> Self {
        Self {
            text: CompactString::from(text),
            char_count: text.chars().count(),
            state: TypewriterState::Idle,
        }
    }

    /// Returns the full text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the current state.
    pub fn state(&self) -> TypewriterState {
        self.state
    }

    /// Returns whether the whole text is visible.
    pub fn is_done(&self) -> bool {
        self.state == TypewriterState::Done
    }

    /// Whether a caret should follow the visible text.
    pub fn shows_caret(&self) -> bool {
        !self.is_done()
    }

    /// Reveals one more character.
    pub fn tick(&mut self) -> TypewriterState {
        let next = match self.state {
            TypewriterState::Idle => 1,
            TypewriterState::Typing(index) => index + 1,
            TypewriterState::Done => return self.state,
        };
        self.state = if next >= self.char_count {
            TypewriterState::Done
        } else {
            TypewriterState::Typing(next)
        };
        self.state
    }

    /// Returns the visible prefix of the text.
    pub fn visible(&self) -> &str {
        let count = match self.state {
            TypewriterState::Idle => 0,
            TypewriterState::Typing(index) => index,
            TypewriterState::Done => return &self.text,
        };
        let end = self
            .text
            .char_indices()
            .nth(count)
            .map(|(offset, _)| offset)
            .unwrap_or(self.text.len());
        &self.text[..end]
    }

    /// Goes back to [`TypewriterState::Idle`].
    pub fn reset(&mut self) {
        self.state = TypewriterState::Idle;
    }
}

/// A line of a [`TypingSequence`].
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceLine {
    /// The line's typewriter.
    pub typewriter: Typewriter,
    /// Delay between two characters, in milliseconds.
    pub interval_ms: u32,
}

/// Phase of a [`TypingSequence`].
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum SequencePhase {
    /// Waiting for the lead-in delay.
    #[default]
    Waiting,
    /// Typing the line with the given index.
    Typing(usize),
    /// Every line is typed; waiting for the settle delay.
    Settling,
    /// Nothing left to do.
    Finished,
}

/// Types several lines one after another.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypingSequence {
    /// Lines in typing order.
    lines: Vec<SequenceLine>,
    /// Delay before the first character, in milliseconds.
    lead_in_ms: u32,
    /// Delay between the last character and [`SequencePhase::Finished`].
    settle_ms: u32,
    /// Current phase.
    phase: SequencePhase,
}

impl TypingSequence {
    /// Constructs an empty [`TypingSequence`].
    pub fn new() -> Self {
        Default::default()
    }

    /// The landing-page intro: a heading and a tagline, typed after a short
    /// loading pause, followed by a pause before the call-to-action shows.
    pub fn hero(heading: &str, paragraph: &str) -> Self {
        Self::new()
            .lead_in(1500)
            .line(heading, 250)
            .line(paragraph, 50)
            .settle(1000)
    }

    /// Appends a line typed at `interval_ms` per character.
    pub fn line(mut self, text: &str, interval_ms: u32) -> Self {
        self.lines.push(SequenceLine {
            typewriter: Typewriter::new(text),
            interval_ms,
        });
        self
    }

    /// Sets the delay before the first character.
    pub fn lead_in(mut self, ms: u32) -> Self {
        self.lead_in_ms = ms;
        self
    }

    /// Sets the delay after the last character.
    pub fn settle(mut self, ms: u32) -> Self {
        self.settle_ms = ms;
        self
    }

    /// Returns the lines.
    pub fn lines(&self) -> &[SequenceLine] {
        &self.lines
    }

    /// Returns the current phase.
    pub fn phase(&self) -> SequencePhase {
        self.phase
    }

    /// Returns whether the sequence is over.
    pub fn is_finished(&self) -> bool {
        self.phase == SequencePhase::Finished
    }

    /// Delay before the first call to [`advance`](Self::advance).
    pub fn first_delay(&self) -> u32 {
        self.lead_in_ms
    }

    /// Moves the sequence forward by one step.
    ///
    /// Returns the delay in milliseconds until the next step, or `None`
    /// once the sequence is finished.
    pub fn advance(&mut self) -> Option<u32> {
        match self.phase {
            SequencePhase::Waiting => self.type_line(0),
            SequencePhase::Typing(index) => self.type_line(index),
            SequencePhase::Settling => {
                self.phase = SequencePhase::Finished;
                None
            }
            SequencePhase::Finished => None,
        }
    }

    /// Types the next character of line `index`, skipping lines that are
    /// already done.
    fn type_line(&mut self, index: usize) -> Option<u32> {
        let Some(line) = self.lines.get_mut(index) else {
            return self.settle_or_finish();
        };
        line.typewriter.tick();
        if !line.typewriter.is_done() {
            self.phase = SequencePhase::Typing(index);
            return Some(line.interval_ms);
        }

        match self.lines.get(index + 1) {
            Some(next) => {
                self.phase = SequencePhase::Typing(index + 1);
                Some(next.interval_ms)
            }
            None => self.settle_or_finish(),
        }
    }

    fn settle_or_finish(&mut self) -> Option<u32> {
        if self.settle_ms == 0 {
            self.phase = SequencePhase::Finished;
            None
        } else {
            self.phase = SequencePhase::Settling;
            Some(self.settle_ms)
        }
    }

    /// Goes back to [`SequencePhase::Waiting`] with every line idle.
    pub fn reset(&mut self) {
        self.phase = SequencePhase::Waiting;
        for line in &mut self.lines {
            line.typewriter.reset();
        }
    }
}
