use std::io::{self, Write};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::bar::{Bar, BarState};
use crate::render;
use crate::spinner::Spinner;

/// Minimum wall-clock spacing between two repaints. Mutation bursts faster
/// than this are coalesced: the dropped frames are never queued, the next
/// allowed paint reads fresh state.
pub(crate) const RENDER_INTERVAL: Duration = Duration::from_millis(10);

/// Layout state shared by every bar of one coordinator. Guarded by its own
/// mutex, never held across the sink write loop.
struct Layout {
    /// Max label width over all bars, in code points.
    max_label_len: usize,
    spinner: Spinner,
    /// Lines written by the previous paint; how far the cursor moves up
    /// before the block is overwritten.
    rendered_lines: usize,
    last_render: Option<Instant>,
    /// No output is produced before [`MultiBar::start`].
    started: bool,
}

/// State shared between a [`MultiBar`] and the [`Bar`] handles it hands out.
pub(crate) struct Shared {
    /// Registration order is render order; append-only.
    bars: Mutex<Vec<Arc<Mutex<BarState>>>>,
    layout: Mutex<Layout>,
    /// Paint serialization: holding the sink spans the whole paint, from the
    /// cursor-up sequence through the last line, so concurrent repaint
    /// requests can never interleave their output.
    sink: Mutex<Box<dyn Write + Send>>,
}

impl Shared {
    /// Recomputes the shared label column width as the max code-point count
    /// over all display labels.
    pub(crate) fn recompute_label_width(&self) {
        let width = {
            let bars = self.bars.lock();
            bars.iter()
                .map(|state| state.lock().label().chars().count())
                .max()
                .unwrap_or(0)
        };
        self.layout.lock().max_label_len = width;
    }

    /// Requests a repaint of the whole block. Unforced requests are dropped
    /// while the throttle window is open; sink errors are absorbed (a closed
    /// sink is the caller's fault to notice, not ours to report).
    pub(crate) fn repaint(&self, force: bool) {
        let _ = self.paint(force);
    }

    fn paint(&self, force: bool) -> io::Result<()> {
        let mut sink = self.sink.lock();
        let now = Instant::now();

        let (label_width, glyph, prev_lines) = {
            let mut layout = self.layout.lock();
            if !layout.started {
                return Ok(());
            }
            let throttled = !force
                && layout
                    .last_render
                    .is_some_and(|t| now.duration_since(t) < RENDER_INTERVAL);
            if throttled {
                return Ok(());
            }
            layout.last_render = Some(now);
            layout.spinner.advance(now);
            (
                layout.max_label_len,
                layout.spinner.frame(),
                layout.rendered_lines,
            )
        };

        // Snapshot the ordered handles; each bar's state is read fresh under
        // its own lock at render time.
        let bars: Vec<_> = self.bars.lock().clone();

        if prev_lines > 0 {
            write!(sink, "\x1b[{prev_lines}A")?;
        }
        for state in &bars {
            let snapshot = state.lock().clone();
            writeln!(
                sink,
                "{}",
                render::render_line(&snapshot, label_width, glyph, now)
            )?;
        }
        sink.flush()?;

        self.layout.lock().rendered_lines = bars.len();
        Ok(())
    }
}

/// Coordinator for a block of progress bars painted to one sink.
///
/// The coordinator owns the ordered set of bars, the shared label column
/// width, the spinner phase, and the screen position of the previously
/// painted block. Every bar mutation requests a full repaint; repaints are
/// serialized and throttled to a 10 ms minimum interval.
///
/// The sink must not be written by anything else while the coordinator is
/// live — the block is overwritten with relative cursor movement.
///
/// ```rust,no_run
/// use multibar::{MultiBar, UNDEFINED};
///
/// let mb = MultiBar::new();
/// let copy = mb.new_bar(128, "Copy");
/// let scan = mb.new_bar(UNDEFINED, "");
/// mb.start();
/// copy.add(64);
/// scan.finish();
/// ```
pub struct MultiBar {
    shared: Arc<Shared>,
}

impl Default for MultiBar {
    fn default() -> Self {
        Self::new()
    }
}

impl MultiBar {
    /// A coordinator painting to stdout.
    pub fn new() -> Self {
        Self::with_sink(io::stdout())
    }

    /// A coordinator painting to an arbitrary sink. The sink only needs to
    /// accept bytes; it is assumed to interpret ANSI CSI sequences.
    pub fn with_sink(sink: impl Write + Send + 'static) -> Self {
        Self {
            shared: Arc::new(Shared {
                bars: Mutex::new(Vec::new()),
                layout: Mutex::new(Layout {
                    max_label_len: 0,
                    spinner: Spinner::default(),
                    rendered_lines: 0,
                    last_render: None,
                    started: false,
                }),
                sink: Mutex::new(Box::new(sink)),
            }),
        }
    }

    /// Replaces the spinner animation. Call before [`start`](Self::start).
    pub fn with_spinner(self, spinner: Spinner) -> Self {
        self.shared.layout.lock().spinner = spinner;
        self
    }

    /// Registers a new bar at the bottom of the block and returns its
    /// handle. `max` may be [`UNDEFINED`](crate::UNDEFINED) when the total
    /// is unknown.
    pub fn new_bar(&self, max: i64, description: impl Into<String>) -> Bar {
        let bar = Bar::new(self.shared.clone(), max, description.into());
        self.shared.bars.lock().push(bar.state.clone());
        self.shared.recompute_label_width();
        bar
    }

    /// Performs the first paint. Call after registering the initial bars;
    /// mutations before this produce no output.
    pub fn start(&self) {
        self.shared.layout.lock().started = true;
        self.shared.repaint(true);
    }

    /// Finishes every registered bar, then repaints once.
    pub fn finish_all(&self) {
        let bars: Vec<_> = self.shared.bars.lock().clone();
        let now = Instant::now();
        for state in &bars {
            let mut s = state.lock();
            if !s.finished {
                s.finished = true;
                s.updated_at = now;
            }
        }
        self.shared.repaint(true);
    }

    #[cfg(test)]
    pub(crate) fn label_width(&self) -> usize {
        self.shared.layout.lock().max_label_len
    }
}
