use anyhow::{Context, Result};
use serde::Deserialize;
use sortex_experiment::SessionConfig;
use std::fs;
use std::path::Path;

pub const DEFAULT_SETTINGS_FILE: &str = "sortex.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub session: SessionConfig,
    /// `tracing` filter directive, used when `RUST_LOG` is unset
    pub log: String,
    /// Poll interval of the interactive loop
    pub tick_ms: u64,
    pub clear_screen: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            log: "info".into(),
            tick_ms: 16,
            clear_screen: true,
        }
    }
}

impl Settings {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("parsing settings")
    }

    /// Applies `SORTEX_*` overrides. `lookup` is usually `std::env::var`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(v) = lookup("SORTEX_FEEDBACK_DELAY_MS") {
            self.session.feedback_delay_ms = v
                .trim()
                .parse()
                .with_context(|| format!("SORTEX_FEEDBACK_DELAY_MS={v:?} is not a number"))?;
        }
        if let Some(v) = lookup("SORTEX_LOG") {
            self.log = v;
        }
        if let Some(v) = lookup("SORTEX_CLEAR_SCREEN") {
            self.clear_screen = matches!(v.trim(), "1" | "true" | "yes");
        }
        Ok(())
    }
}

/// Defaults, then the settings file, then the environment.
///
/// An explicitly named file has to exist; the default one is optional.
pub fn load_settings(path: Option<&Path>) -> Result<Settings> {
    let mut settings = match path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading settings from {}", path.display()))?;
            Settings::from_toml_str(&raw)?
        }
        None => match fs::read_to_string(DEFAULT_SETTINGS_FILE) {
            Ok(raw) => Settings::from_toml_str(&raw)?,
            Err(_) => Settings::default(),
        },
    };
    settings.apply_env(|key| std::env::var(key).ok())?;
    Ok(settings)
}
