use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;

use crate::multi::Shared;

/// Sentinel max meaning the total amount of work is unknown.
///
/// Bars created with an `UNDEFINED` max render a sweeping marker instead of
/// a fill bar, leave the percentage and ETA columns blank, and never finish
/// on their own — call [`Bar::finish`] when the work is done.
pub const UNDEFINED: i64 = -1;

/// One bar's mutable state. Guarded by the handle's mutex; the renderer
/// works from a cloned snapshot taken under that lock.
#[derive(Debug, Clone)]
pub(crate) struct BarState {
    pub(crate) value: i64,
    pub(crate) max: i64,
    pub(crate) description: String,
    pub(crate) started_at: Instant,
    pub(crate) updated_at: Instant,
    pub(crate) finished: bool,
}

impl BarState {
    pub(crate) fn new(max: i64, description: String) -> Self {
        let now = Instant::now();
        Self {
            value: 0,
            max,
            description,
            started_at: now,
            updated_at: now,
            finished: false,
        }
    }

    /// Display label: an empty description falls back to a placeholder so
    /// the line never collapses to zero label width.
    pub(crate) fn label(&self) -> &str {
        if self.description.is_empty() {
            "Working"
        } else {
            &self.description
        }
    }

    /// Overshoot past a defined max renders with a red accent.
    pub(crate) fn is_error(&self) -> bool {
        self.max != UNDEFINED && self.value > self.max
    }
}

/// Handle to one progress bar registered with a [`MultiBar`].
///
/// Handles are cheap to clone and safe to update from any thread: each
/// mutation locks only this bar's state, then asks the coordinator for a
/// repaint of the whole block. Anomalous inputs are never rejected — a value
/// past the max renders as an error state (red), a negative [`add`] moves
/// the bar backwards.
///
/// [`MultiBar`]: crate::MultiBar
/// [`add`]: Bar::add
#[derive(Clone)]
pub struct Bar {
    pub(crate) state: Arc<Mutex<BarState>>,
    shared: Arc<Shared>,
}

impl Bar {
    pub(crate) fn new(shared: Arc<Shared>, max: i64, description: String) -> Self {
        Self {
            state: Arc::new(Mutex::new(BarState::new(max, description))),
            shared,
        }
    }

    /// Advances progress by `n` (which may be negative).
    ///
    /// The bar finishes automatically when the value lands exactly on a
    /// defined max; overshooting the max does not finish it, it switches the
    /// bar into the error visual state instead.
    pub fn add(&self, n: i64) {
        let force = {
            let mut s = self.state.lock();
            s.value += n;
            let was_finished = s.finished;
            s.finished = s.max != UNDEFINED && s.value == s.max;
            s.updated_at = Instant::now();
            s.finished && !was_finished
        };
        self.shared.repaint(force);
    }

    /// Sets the progress value outright. Does not touch the finished flag.
    pub fn set_value(&self, value: i64) {
        {
            let mut s = self.state.lock();
            s.value = value;
            s.updated_at = Instant::now();
        }
        self.shared.repaint(false);
    }

    /// Sets the target value, or [`UNDEFINED`] to switch the bar to the
    /// indeterminate sweep.
    pub fn set_max(&self, max: i64) {
        self.state.lock().max = max;
        self.shared.repaint(false);
    }

    /// Replaces the bar's label and realigns the label column across all
    /// bars of the coordinator.
    pub fn set_description(&self, description: impl Into<String>) {
        self.state.lock().description = description.into();
        self.shared.recompute_label_width();
        self.shared.repaint(false);
    }

    /// Rewinds the bar to zero and restarts its clock. Keeps the finished
    /// flag and the description.
    pub fn reset(&self) {
        {
            let mut s = self.state.lock();
            let now = Instant::now();
            s.value = 0;
            s.started_at = now;
            s.updated_at = now;
        }
        self.shared.repaint(false);
    }

    /// Marks the bar finished, freezing its elapsed time.
    ///
    /// Idempotent: a second call is a no-op and does not refresh the frozen
    /// timestamp. Bars with an [`UNDEFINED`] max never finish without this
    /// call.
    pub fn finish(&self) {
        {
            let mut s = self.state.lock();
            if s.finished {
                return;
            }
            s.finished = true;
            s.updated_at = Instant::now();
        }
        self.shared.repaint(true);
    }

    /// Current progress value.
    pub fn value(&self) -> i64 {
        self.state.lock().value
    }

    /// Current target value, or [`UNDEFINED`].
    pub fn max(&self) -> i64 {
        self.state.lock().max
    }

    /// Whether the bar has finished.
    pub fn is_finished(&self) -> bool {
        self.state.lock().finished
    }
}
