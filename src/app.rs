use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use sortex_core::{ResponseRecord, Side};
use sortex_experiment::{
    Participant, SessionController, SessionEvent, SessionSummary, Strategy, play_through,
};
use sortex_render::{TextRenderer, render_frame, save_timeline_png};
use sortex_timing::{HighPrecisionTimer, Timer};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::settings::Settings;

/// One line typed by the participant
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Choose(Side),
    Reset,
    Quit,
    Unknown(String),
}

pub fn parse_input(line: &str) -> Option<Input> {
    let word = line.trim().to_ascii_lowercase();
    if word.is_empty() {
        return None;
    }
    Some(match word.as_str() {
        "l" | "left" | "a" => Input::Choose(Side::Left),
        "r" | "right" | "d" => Input::Choose(Side::Right),
        "reset" | "again" => Input::Reset,
        "q" | "quit" | "exit" => Input::Quit,
        _ => Input::Unknown(word),
    })
}

/// Where to write results once a session finishes
#[derive(Debug, Clone, Default)]
pub struct ExportTargets {
    pub json: Option<PathBuf>,
    pub timeline_png: Option<PathBuf>,
    pub png_size: (u32, u32),
}

#[derive(Serialize)]
struct ResultsExport<'a> {
    responses: &'a [ResponseRecord],
    summary: SessionSummary,
}

impl ExportTargets {
    pub fn is_empty(&self) -> bool {
        self.json.is_none() && self.timeline_png.is_none()
    }

    pub fn write(&self, history: &[ResponseRecord]) -> Result<()> {
        let summary = SessionSummary::from_history(history);
        if let Some(path) = &self.timeline_png {
            let (w, h) = self.png_size;
            save_timeline_png(&summary, path, w, h)?;
            info!(path = %path.display(), "timeline written");
        }
        if let Some(path) = &self.json {
            let export = ResultsExport {
                responses: history,
                summary,
            };
            let body = serde_json::to_string_pretty(&export).context("serializing results")?;
            std::fs::write(path, body)
                .with_context(|| format!("writing results to {}", path.display()))?;
            info!(path = %path.display(), "results written");
        }
        Ok(())
    }
}

pub struct App {
    session: SessionController<HighPrecisionTimer>,
    settings: Settings,
    exports: ExportTargets,
    exported_epoch: Option<u64>,
}

impl App {
    pub fn new(settings: Settings, exports: ExportTargets) -> Self {
        let session = SessionController::new(settings.session.clone(), HighPrecisionTimer::new());
        Self {
            session,
            settings,
            exports,
            exported_epoch: None,
        }
    }

    /// Reads commands from stdin until quit or end of input.
    pub fn run_interactive(mut self) -> Result<()> {
        self.draw_initial()?;
        self.session.subscribe(
            TextRenderer::new(io::stdout()).with_clear_screen(self.settings.clear_screen),
        );

        let inputs = spawn_stdin_reader();
        let tick = Duration::from_millis(self.settings.tick_ms.max(1));

        loop {
            match inputs.recv_timeout(tick) {
                Ok(Input::Quit) => break,
                Ok(Input::Choose(side)) => {
                    if !self.session.handle_event(SessionEvent::SideChosen(side)) {
                        debug!(%side, "input ignored while feedback is showing");
                    }
                }
                Ok(Input::Reset) => {
                    self.session.handle_event(SessionEvent::Reset);
                }
                Ok(Input::Unknown(word)) => warn!("unknown command {word:?}, try l, r, reset or q"),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    // stdin closed; let a pending transition land before leaving
                    if let Some(wait) = self.session.time_to_transition() {
                        self.session.timer.sleep(wait);
                        self.session.tick();
                        self.export_if_finished()?;
                    }
                    break;
                }
            }

            for event in self.session.update() {
                self.session.handle_event(event);
            }
            self.export_if_finished()?;
        }

        info!(score = self.session.score(), "leaving");
        Ok(())
    }

    /// Lets a simulated participant play one full session.
    pub fn run_autoplay(mut self, strategy: Strategy, seed: Option<u64>) -> Result<()> {
        let seed = seed.unwrap_or_else(|| rand::rng().random());
        info!(?strategy, seed, "autoplay");

        self.draw_initial()?;
        self.session.subscribe(
            TextRenderer::new(io::stdout()).with_clear_screen(self.settings.clear_screen),
        );

        let mut participant = Participant::new(strategy, StdRng::seed_from_u64(seed));
        play_through(&mut self.session, &mut participant);
        self.export_if_finished()?;
        Ok(())
    }

    fn draw_initial(&self) -> Result<()> {
        let mut out = io::stdout().lock();
        if self.settings.clear_screen {
            write!(out, "\x1b[2J\x1b[H")?;
        }
        write!(out, "{}", render_frame(&self.session.view()))?;
        out.flush()?;
        Ok(())
    }

    fn export_if_finished(&mut self) -> Result<()> {
        if !self.session.phase().is_finished() || self.exports.is_empty() {
            return Ok(());
        }
        let epoch = self.session.epoch();
        if self.exported_epoch == Some(epoch) {
            return Ok(());
        }
        self.exports.write(self.session.history())?;
        self.exported_epoch = Some(epoch);
        Ok(())
    }
}

fn spawn_stdin_reader() -> Receiver<Input> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if let Some(input) = parse_input(&line) {
                if tx.send(input).is_err() {
                    break;
                }
            }
        }
    });
    rx
}
