//! Stored designs: JSON (de)serialization with invariant validation.
//!
//! Loading always yields an independent value; a session clones it again before
//! editing so the stored original is never mutated.

#[cfg(test)]
#[path = "template_test.rs"]
mod template_test;

use crate::doc::{Design, InvariantError};

/// Error returned when a stored design cannot be used.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("malformed design JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("design violates invariants: {0}")]
    Invariant(#[from] InvariantError),
}

/// Parse and validate a stored design.
///
/// # Errors
///
/// Returns [`TemplateError::Json`] for malformed input and
/// [`TemplateError::Invariant`] when the design is structurally inconsistent.
pub fn design_from_json(json: &str) -> Result<Design, TemplateError> {
    let design: Design = serde_json::from_str(json)?;
    design.check_invariants()?;
    Ok(design)
}

/// Serialize a design as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`TemplateError::Json`] if serialization fails.
pub fn design_to_json(design: &Design) -> Result<String, TemplateError> {
    Ok(serde_json::to_string_pretty(design)?)
}
