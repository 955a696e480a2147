//! Pure line rendering: turns a [`BarState`] snapshot plus the
//! coordinator-supplied spinner glyph and label width into one terminal
//! line. Everything here is a function of its arguments — no locks, no
//! clock reads beyond the `now` passed in.

use std::iter::repeat_n;
use std::time::{Duration, Instant};

use crate::bar::{BarState, UNDEFINED};

// SGR sequences, sorted by code.
const RESET: &str = "\x1b[0m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const MAGENTA: &str = "\x1b[35m";
const CYAN: &str = "\x1b[36m";
const INVERT_ON: &str = "\x1b[7m";
const INVERT_OFF: &str = "\x1b[27m";

/// Bar width in terminal cells.
pub(crate) const BAR_WIDTH: usize = 30;
/// Fill gradations per cell; `BLOCKS[1..=GRADATIONS]` are the eighth-block
/// glyphs from U+258F up to the full block.
pub(crate) const GRADATIONS: usize = 8;
const BLOCKS: [char; 9] = [' ', '▏', '▎', '▍', '▌', '▋', '▊', '▉', '█'];

const TOTAL_UNITS: usize = BAR_WIDTH * GRADATIONS;

/// Renders one bar line: `spinner label bar percent elapsed eta`.
pub(crate) fn render_line(
    state: &BarState, label_width: usize, spinner: &str, now: Instant,
) -> String {
    let error = state.is_error();
    let elapsed = elapsed_of(state, now);

    let label = state.label();
    let pad = label_width.saturating_sub(label.chars().count());
    let mut label_out = label.to_string();
    label_out.extend(repeat_n(' ', pad));

    let glyph = if state.finished { " " } else { spinner };
    let spinner_out = if error {
        format!("{RED}{glyph}{RESET}")
    } else if state.finished {
        format!("{GREEN}{glyph}{RESET}")
    } else {
        glyph.to_string()
    };

    let bar = bar_cells(state, error);
    let percent = percent_field(state);
    let eta = eta_field(state, elapsed);

    format!(
        "{spinner_out} {label_out} {bar} {MAGENTA}{percent}{RESET} {YELLOW}{}{RESET} {CYAN}{eta}{RESET}",
        format_duration(elapsed)
    )
}

/// Elapsed time, frozen at the finishing mutation once the bar is finished.
pub(crate) fn elapsed_of(state: &BarState, now: Instant) -> Duration {
    if state.finished {
        state.updated_at.duration_since(state.started_at)
    } else {
        now.duration_since(state.started_at)
    }
}

/// Fixed 4-character percent column. Overshoot past 100% is rendered as-is
/// and may widen the field; blank when the max is undefined.
pub(crate) fn percent_field(state: &BarState) -> String {
    if state.finished && state.max != UNDEFINED {
        "100%".to_string()
    } else if state.max != UNDEFINED {
        let percent = if state.max == 0 {
            0
        } else {
            state.value * 100 / state.max
        };
        format!("{percent:>3}%")
    } else {
        "    ".to_string()
    }
}

/// Projected total time (`elapsed * max / value`), left-padded to 7
/// characters; blank once finished, when the max is undefined, or before the
/// first unit of progress.
pub(crate) fn eta_field(state: &BarState, elapsed: Duration) -> String {
    if state.finished || state.max <= 0 || state.value <= 0 {
        " ".repeat(7)
    } else {
        let projected = elapsed.as_secs_f64() * state.max as f64 / state.value as f64;
        format!("{:>7}", format_duration(Duration::from_secs_f64(projected)))
    }
}

/// Number of filled eighth-cell units for a determinate bar, saturating at
/// the full width.
pub(crate) fn filled_units(value: i64, max: i64) -> usize {
    if max <= 0 {
        return 0;
    }
    let total = TOTAL_UNITS as i64;
    (value.saturating_mul(total) / max).clamp(0, total) as usize
}

fn bar_cells(state: &BarState, error: bool) -> String {
    if state.finished {
        let full: String = repeat_n(BLOCKS[GRADATIONS], BAR_WIDTH).collect();
        return format!("{GREEN}{full}{RESET}");
    }
    if state.max == UNDEFINED {
        return sweep_cells(state.value);
    }
    let bar = fill_cells(filled_units(state.value, state.max));
    if error {
        format!("{RED}{bar}{RESET}")
    } else {
        bar
    }
}

/// Determinate fill: full blocks, then at most one partial glyph for the
/// remainder, then spaces.
pub(crate) fn fill_cells(filled: usize) -> String {
    let full = filled / GRADATIONS;
    let remainder = filled % GRADATIONS;

    let mut bar = String::with_capacity(BAR_WIDTH * 3);
    bar.extend(repeat_n(BLOCKS[GRADATIONS], full));
    let mut cells = full;
    if remainder > 0 && cells < BAR_WIDTH {
        bar.push(BLOCKS[remainder]);
        cells += 1;
    }
    bar.extend(repeat_n(' ', BAR_WIDTH - cells));
    bar
}

/// Indeterminate sweep: the accumulated value acts as a phase counter. The
/// full block sits at cell `u / 8`; its neighbours carry the `u % 8` partial
/// glyph, reverse-video on the left so the marker reads as a gradient in
/// both directions.
pub(crate) fn sweep_cells(value: i64) -> String {
    let u = value.rem_euclid(TOTAL_UNITS as i64) as usize;
    let center = u / GRADATIONS;
    let remainder = u % GRADATIONS;

    let mut bar = String::with_capacity(BAR_WIDTH * 3);
    for cell in 0..BAR_WIDTH {
        if cell + 1 == center {
            bar.push_str(INVERT_ON);
            bar.push(BLOCKS[remainder]);
            bar.push_str(INVERT_OFF);
        } else if cell == center {
            bar.push(BLOCKS[GRADATIONS]);
        } else if cell == center + 1 {
            bar.push(BLOCKS[remainder]);
        } else {
            bar.push(' ');
        }
    }
    bar
}

/// `H:MM:SS`, hours unbounded.
pub(crate) fn format_duration(d: Duration) -> String {
    let total = d.as_secs();
    format!("{}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}
