//! Dark/light theme preference

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Mutex;

use anyhow::Result;

pub const THEME_KEY: &str = "theme";

/// Durable key/value storage for user preferences
pub trait PreferenceStore: Debug + Send {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Source of the system colour-scheme preference
pub trait SchemeProbe: Send {
    /// `Some(true)` when the system prefers a dark scheme, `None` when unknown
    fn prefers_dark(&self) -> Option<bool>;
}

/// Reads `SECDASH_COLOR_SCHEME` (`dark`/`light`), then `COLORFGBG`
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvSchemeProbe;

impl SchemeProbe for EnvSchemeProbe {
    fn prefers_dark(&self) -> Option<bool> {
        if let Ok(value) = std::env::var("SECDASH_COLOR_SCHEME") {
            if let Some(dark) = parse_scheme(&value) {
                return Some(dark);
            }
        }
        std::env::var("COLORFGBG")
            .ok()
            .and_then(|value| dark_from_colorfgbg(&value))
    }
}

fn parse_scheme(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "dark" => Some(true),
        "light" => Some(false),
        _ => None,
    }
}

/// `COLORFGBG` is `fg;bg` (sometimes `fg;default;bg`); ANSI backgrounds 0-6 and 8 are dark
fn dark_from_colorfgbg(value: &str) -> Option<bool> {
    let bg: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
    Some(matches!(bg, 0..=6 | 8))
}

/// Theme flag backed by a [`PreferenceStore`]
#[derive(Debug)]
pub struct ThemeStore {
    dark_mode: bool,
    storage: Box<dyn PreferenceStore>,
}

impl ThemeStore {
    /// Persisted choice wins; otherwise the system preference, defaulting to light
    pub fn load(storage: Box<dyn PreferenceStore>, system_prefers_dark: Option<bool>) -> Self {
        let saved = match storage.get(THEME_KEY) {
            Ok(saved) => saved,
            Err(err) => {
                tracing::warn!("theme preference unreadable: {err:#}");
                None
            }
        };
        let dark_mode = saved
            .as_deref()
            .map(|value| value == "dark")
            .unwrap_or_else(|| system_prefers_dark.unwrap_or(false));
        Self { dark_mode, storage }
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    /// Whether the user made an explicit, persisted choice
    pub fn has_explicit_choice(&self) -> bool {
        matches!(self.storage.get(THEME_KEY), Ok(Some(_)))
    }

    /// Flip the theme and persist it. The in-memory flag flips even if persisting fails.
    pub fn toggle(&mut self) -> Result<bool> {
        self.set(!self.dark_mode)?;
        Ok(self.dark_mode)
    }

    /// Select a theme explicitly and persist it. Returns true when the theme changed.
    pub fn set(&mut self, dark: bool) -> Result<bool> {
        let changed = self.dark_mode != dark;
        self.dark_mode = dark;
        let value = if dark { "dark" } else { "light" };
        if changed {
            tracing::info!(theme = value, "theme changed");
        }
        self.storage.set(THEME_KEY, value)?;
        Ok(changed)
    }

    /// Apply a system preference change; ignored once a choice is persisted.
    /// Returns true when the theme changed.
    pub fn apply_system_preference(&mut self, prefers_dark: bool) -> bool {
        if self.has_explicit_choice() || self.dark_mode == prefers_dark {
            return false;
        }
        tracing::debug!(prefers_dark, "following system colour scheme");
        self.dark_mode = prefers_dark;
        true
    }
}

/// Non-durable store, used when the settings database is unavailable
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    values: Mutex<BTreeMap<String, String>>,
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|_| anyhow::anyhow!("preferences lock poisoned"))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| anyhow::anyhow!("preferences lock poisoned"))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
