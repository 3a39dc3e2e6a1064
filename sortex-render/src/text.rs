//! Plain-text presentation for terminals.

use sortex_core::{Context, MAX_SCORE, Side};
use sortex_experiment::{SessionObserver, SessionSummary, SessionView};
use std::fmt::Write as _;
use std::io::Write;
use tracing::warn;

const BUCKET_WIDTH: usize = 14;

fn bucket(label: &str, first_context: bool, dropping: Option<&str>) -> String {
    // [ ] for first-context styling, { } after the switch
    let (open, close) = if first_context { ('[', ']') } else { ('{', '}') };
    let inner = match dropping {
        Some(symbol) => format!("{label} {symbol}"),
        None => label.to_string(),
    };
    format!("{open}{inner:^width$}{close}", width = BUCKET_WIDTH)
}

/// One screen of the trial view, or the results once finished
pub fn render_frame(view: &SessionView<'_>) -> String {
    if let Some(history) = view.results() {
        return render_results(&SessionSummary::from_history(history));
    }

    let mut out = String::new();
    let _ = writeln!(out, "Trial {} of {}", view.trial_number(), view.total_trials);
    let _ = writeln!(out);

    let first = view.is_first_context_styled();
    let symbol = view.current_item.map(|i| i.symbol).unwrap_or("");
    let target = view.animate_toward();
    let dropping = |side: Side| (target == Some(side)).then_some(symbol);
    let _ = writeln!(
        out,
        "{}      {}",
        bucket("LEFT", first, dropping(Side::Left)),
        bucket("RIGHT", first, dropping(Side::Right)),
    );
    let _ = writeln!(out);

    if target.is_none() {
        let _ = writeln!(out, "{:^34}", symbol);
    } else {
        let _ = writeln!(out);
    }
    let _ = writeln!(out);

    if view.inputs_enabled() {
        let _ = writeln!(out, "  <- [l]eft            [r]ight ->");
    } else {
        let _ = writeln!(out, "  (waiting)");
    }
    let _ = writeln!(out, "Score: {}", view.score);
    let _ = writeln!(out, "{}", view.feedback_text());
    out
}

/// The post-game "Learning Journey" screen
pub fn render_results(summary: &SessionSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Learning Journey");
    let _ = writeln!(out);

    for panel in &summary.patterns {
        let _ = writeln!(
            out,
            "{:<16} left: {} {:<12} right: {} {}",
            panel.title,
            panel.left.label(),
            panel.left_symbols.concat(),
            panel.right.label(),
            panel.right_symbols.concat(),
        );
    }
    let _ = writeln!(out);

    let mut symbols = String::new();
    let mut labels = String::new();
    for entry in &summary.timeline {
        if entry.trial == summary.switch_point {
            symbols.push_str("| ");
            labels.push_str("| ");
        }
        let mark = if entry.correct { ' ' } else { '!' };
        let _ = write!(symbols, "{:^7}", format!("{}{mark}", entry.symbol));
        let _ = write!(labels, "{:^7}", entry.label);
    }
    let _ = writeln!(out, "{symbols}");
    let _ = writeln!(out, "{labels}");
    let _ = writeln!(out, "{:>w$}", "^ Pattern Switch", w = 7 * summary.switch_point + 16);
    let _ = writeln!(out);

    for stats in [&summary.first, &summary.second] {
        let _ = writeln!(
            out,
            "Context {}: {}/{} correct ({:.0}%)",
            stats.context.number(),
            stats.correct,
            stats.trials,
            stats.accuracy() * 100.0
        );
    }
    let _ = writeln!(out, "Perseverative errors: {}", summary.perseverative_errors);
    match summary.adapted_at {
        Some(trial) if trial == Context::SWITCH_POINT => {
            let _ = writeln!(out, "Adapted immediately after the switch");
        }
        Some(trial) => {
            let _ = writeln!(out, "Adapted from trial {}", trial + 1);
        }
        None => {
            let _ = writeln!(out, "Did not adapt to the second pattern");
        }
    }
    let _ = writeln!(out, "Score: {} / {MAX_SCORE}", summary.score);
    let _ = writeln!(out, "Type 'reset' to try again.");
    out
}

/// Redraws the whole screen on every session change
pub struct TextRenderer<W: Write> {
    out: W,
    clear_screen: bool,
    frames: usize,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            clear_screen: false,
            frames: 0,
        }
    }

    /// Emit an ANSI clear before each frame
    pub fn with_clear_screen(mut self, clear: bool) -> Self {
        self.clear_screen = clear;
        self
    }

    pub fn draw(&mut self, view: &SessionView<'_>) -> std::io::Result<()> {
        if self.clear_screen {
            write!(self.out, "\x1b[2J\x1b[H")?;
        }
        write!(self.out, "{}", render_frame(view))?;
        self.out.flush()?;
        self.frames += 1;
        Ok(())
    }

    pub fn frames(&self) -> usize {
        self.frames
    }
}

impl<W: Write> SessionObserver for TextRenderer<W> {
    fn on_change(&mut self, view: &SessionView<'_>) {
        if let Err(e) = self.draw(view) {
            warn!("failed to draw frame: {e}");
        }
    }
}
