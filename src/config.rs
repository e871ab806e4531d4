//! Editor configuration parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::collections::HashMap;
use std::env::VarError;

use crate::consts::{DEFAULT_PAGE_HEIGHT_MM, MAX_HISTORY_ENTRIES, ZOOM_MAX, ZOOM_MIN};

pub const HISTORY_LIMIT_VAR: &str = "LABEL_EDITOR_HISTORY_LIMIT";
pub const INITIAL_ZOOM_VAR: &str = "LABEL_EDITOR_INITIAL_ZOOM";
pub const PAGE_HEIGHT_VAR: &str = "LABEL_EDITOR_PAGE_HEIGHT";

/// Error returned by [`EditorConfig::from_env`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: '{value}' ({reason})")]
    Invalid { var: &'static str, value: String, reason: &'static str },
}

/// Session tunables; see [`EditorConfig::from_env`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorConfig {
    /// Maximum number of undo snapshots.
    pub history_limit: usize,
    /// Zoom factor a new session starts at.
    pub initial_zoom: f64,
    /// Page height budget passed to the paginator.
    pub page_height: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self { history_limit: MAX_HISTORY_ENTRIES, initial_zoom: 1.0, page_height: DEFAULT_PAGE_HEIGHT_MM }
    }
}

impl EditorConfig {
    /// Build config from the process environment.
    ///
    /// Optional:
    /// - `LABEL_EDITOR_HISTORY_LIMIT`: default 50, must be at least 1
    /// - `LABEL_EDITOR_INITIAL_ZOOM`: default 1.0, clamped to the zoom limits
    /// - `LABEL_EDITOR_PAGE_HEIGHT`: default 297 (mm), must be positive
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a variable is set but malformed
    /// or not valid unicode.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut values = HashMap::new();
        for var in [HISTORY_LIMIT_VAR, INITIAL_ZOOM_VAR, PAGE_HEIGHT_VAR] {
            if let Some(value) = env_value(var, std::env::var(var))? {
                values.insert(var, value);
            }
        }
        Self::from_lookup(|key| values.get(key).cloned())
    }

    /// Build config from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a value is present but malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let history_limit = match lookup(HISTORY_LIMIT_VAR) {
            None => defaults.history_limit,
            Some(raw) => match raw.trim().parse::<usize>() {
                Ok(n) if n >= 1 => n,
                Ok(_) => return Err(invalid(HISTORY_LIMIT_VAR, raw, "must be at least 1")),
                Err(_) => return Err(invalid(HISTORY_LIMIT_VAR, raw, "not an integer")),
            },
        };

        let initial_zoom = match lookup(INITIAL_ZOOM_VAR) {
            None => defaults.initial_zoom,
            Some(raw) => match raw.trim().parse::<f64>() {
                Ok(z) if z.is_finite() => z.clamp(ZOOM_MIN, ZOOM_MAX),
                _ => return Err(invalid(INITIAL_ZOOM_VAR, raw, "not a finite number")),
            },
        };

        let page_height = match lookup(PAGE_HEIGHT_VAR) {
            None => defaults.page_height,
            Some(raw) => match raw.trim().parse::<f64>() {
                Ok(h) if h.is_finite() && h > 0.0 => h,
                _ => return Err(invalid(PAGE_HEIGHT_VAR, raw, "must be a positive number")),
            },
        };

        Ok(Self { history_limit, initial_zoom, page_height })
    }
}

fn invalid(var: &'static str, value: String, reason: &'static str) -> ConfigError {
    ConfigError::Invalid { var, value, reason }
}

/// Unset reads as `None`; a set but non-unicode value is an error.
fn env_value(var: &'static str, result: Result<String, VarError>) -> Result<Option<String>, ConfigError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(raw)) => Err(invalid(var, raw.to_string_lossy().into_owned(), "not valid unicode")),
    }
}
