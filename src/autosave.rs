//! Autosave and template-store collaborator contracts.
//!
//! The scheduler decides *when* to save (debounce, interval, on blur); the
//! store decides *where*. The editor supplies a dirty flag and a save
//! callback that always writes the design as it is at invocation time.
//! Overlapping saves are the scheduler's concern.

#[cfg(test)]
#[path = "autosave_test.rs"]
mod autosave_test;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::doc::Design;

/// Error returned by a [`TemplateStore`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SaveError {
    #[error("template store rejected the design: {0}")]
    Rejected(String),
    #[error("template store unavailable: {0}")]
    Unavailable(String),
}

/// What the save indicator shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveStatus {
    #[default]
    Saved,
    Unsaved,
    Saving,
    Error,
}

/// Destination for saved designs.
pub trait TemplateStore {
    /// Persist `design`.
    ///
    /// # Errors
    ///
    /// Returns a [`SaveError`] when the design could not be stored.
    fn save(&mut self, design: &Design) -> Result<(), SaveError>;
}

/// Decides whether and when to run a save.
pub trait AutosaveScheduler {
    /// Offer a save. `save` writes the latest design when called.
    fn schedule(&mut self, dirty: bool, save: &mut dyn FnMut() -> Result<(), SaveError>) -> SaveStatus;
}

/// Saves synchronously whenever the design is dirty.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateAutosave;

impl AutosaveScheduler for ImmediateAutosave {
    fn schedule(&mut self, dirty: bool, save: &mut dyn FnMut() -> Result<(), SaveError>) -> SaveStatus {
        if !dirty {
            return SaveStatus::Saved;
        }
        match save() {
            Ok(()) => SaveStatus::Saved,
            Err(e) => {
                warn!(error = %e, "autosave failed");
                SaveStatus::Error
            }
        }
    }
}

/// In-memory store keeping every saved revision.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub revisions: Vec<Design>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently saved design.
    #[must_use]
    pub fn latest(&self) -> Option<&Design> {
        self.revisions.last()
    }
}

impl TemplateStore for MemoryStore {
    fn save(&mut self, design: &Design) -> Result<(), SaveError> {
        self.revisions.push(design.clone());
        Ok(())
    }
}
