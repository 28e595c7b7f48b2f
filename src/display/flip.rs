//! Flip-card digit transitions
//!
//! Each digit flips independently when its value changes. A flip takes
//! [`FLIP_DURATION_MS`]; during it the card holds both the outgoing and the
//! incoming digit. A change that arrives mid-flip retargets the card to the
//! newest value and restarts the flip, so rapid changes never queue up.

/// Duration of one digit transition
pub const FLIP_DURATION_MS: i64 = 600;

/// A single flip-card digit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlipDigit {
    shown: char,
    incoming: char,
    flip_started: Option<i64>,
}

impl FlipDigit {
    pub fn new(value: char) -> Self {
        Self {
            shown: value,
            incoming: value,
            flip_started: None,
        }
    }

    /// Value currently committed on the card
    pub fn shown(&self) -> char {
        self.shown
    }

    /// Value the card is flipping towards
    pub fn incoming(&self) -> char {
        self.incoming
    }

    pub fn is_flipping(&self) -> bool {
        self.flip_started.is_some()
    }

    /// Feed the latest value at `now`
    pub fn update(&mut self, value: char, now: i64) {
        if value == self.shown {
            // back to the committed value before the flip finished
            self.incoming = value;
            self.flip_started = None;
        } else if value != self.incoming || self.flip_started.is_none() {
            self.incoming = value;
            self.flip_started = Some(now);
        }
    }

    /// Commit the incoming value once the flip has run its course.
    ///
    /// Returns true when a new value was committed.
    pub fn tick(&mut self, now: i64) -> bool {
        match self.flip_started {
            Some(started) if now - started >= FLIP_DURATION_MS => {
                self.shown = self.incoming;
                self.flip_started = None;
                true
            }
            _ => false,
        }
    }

    /// When the running flip completes
    pub fn deadline(&self) -> Option<i64> {
        self.flip_started.map(|started| started + FLIP_DURATION_MS)
    }
}

/// A row of flip digits rendering a `HH:MM:SS` string.
///
/// Separators are passed through; only digits get cards.
#[derive(Debug, Clone, Default)]
pub struct FlipBoard {
    layout: String,
    digits: Vec<FlipDigit>,
}

impl FlipBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the latest text at `now`. A change in layout (for instance a
    /// third hour digit appearing) resets the board without animating.
    pub fn update(&mut self, text: &str, now: i64) {
        let layout = layout_of(text);
        if layout != self.layout {
            self.layout = layout;
            self.digits = text.chars().filter(char::is_ascii_digit).map(FlipDigit::new).collect();
            return;
        }
        for (digit, value) in self.digits.iter_mut().zip(text.chars().filter(char::is_ascii_digit)) {
            digit.update(value, now);
        }
    }

    /// Commit finished flips; true if anything changed
    pub fn tick(&mut self, now: i64) -> bool {
        self.digits
            .iter_mut()
            .fold(false, |changed, digit| digit.tick(now) || changed)
    }

    /// Earliest pending flip completion
    pub fn next_deadline(&self) -> Option<i64> {
        self.digits.iter().filter_map(FlipDigit::deadline).min()
    }

    pub fn is_flipping(&self) -> bool {
        self.digits.iter().any(FlipDigit::is_flipping)
    }

    /// The committed text
    pub fn shown(&self) -> String {
        let mut digits = self.digits.iter().map(FlipDigit::shown);
        self.layout
            .chars()
            .map(|c| if c == '#' { digits.next().unwrap_or('0') } else { c })
            .collect()
    }
}

fn layout_of(text: &str) -> String {
    text.chars().map(|c| if c.is_ascii_digit() { '#' } else { c }).collect()
}
