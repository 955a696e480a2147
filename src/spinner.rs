use std::time::{Duration, Instant};

/// Wall-clock interval between spinner frames, independent of how often the
/// block is repainted.
pub(crate) const SPINNER_INTERVAL: Duration = Duration::from_millis(100);

/// A time-based spinner animation.
///
/// The coordinator advances the spinner once per paint; it steps to its
/// next frame only when 100 ms of wall clock have passed since the previous
/// step, so its cadence stays steady no matter how frequently bars mutate.
///
/// ```rust,ignore
/// let mb = MultiBar::new().with_spinner(Spinner::line());
/// ```
pub struct Spinner {
    frames: &'static [&'static str],
    index: usize,
    last_step: Option<Instant>,
}

impl Spinner {
    /// Braille dot spinner (the default).
    pub fn dots() -> Self {
        Self::custom(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
    }

    /// Classic line spinner.
    pub fn line() -> Self {
        Self::custom(&["|", "/", "-", "\\"])
    }

    /// Custom frames. Each frame should occupy one terminal cell so the
    /// label column stays aligned.
    pub fn custom(frames: &'static [&'static str]) -> Self {
        Self {
            frames,
            index: 0,
            last_step: None,
        }
    }

    /// Step to the next frame if the cadence interval has elapsed.
    pub(crate) fn advance(&mut self, now: Instant) {
        let due = self
            .last_step
            .is_none_or(|t| now.duration_since(t) >= SPINNER_INTERVAL);
        if due {
            self.index = (self.index + 1) % self.frames.len();
            self.last_step = Some(now);
        }
    }

    /// Current frame.
    pub(crate) fn frame(&self) -> &'static str {
        self.frames[self.index]
    }
}

impl Default for Spinner {
    fn default() -> Self {
        Self::dots()
    }
}

impl std::fmt::Display for Spinner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.frame())
    }
}
