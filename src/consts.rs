//! Shared numeric constants for the label editor.

// ── History ─────────────────────────────────────────────────────

/// Maximum number of design snapshots kept by the undo/redo log.
pub const MAX_HISTORY_ENTRIES: usize = 50;

// ── Zoom ────────────────────────────────────────────────────────

/// Smallest allowed preview zoom factor.
pub const ZOOM_MIN: f64 = 0.25;

/// Largest allowed preview zoom factor.
pub const ZOOM_MAX: f64 = 4.0;

/// Multiplicative step applied by zoom-in / zoom-out.
pub const ZOOM_STEP: f64 = 1.25;

// ── Page ────────────────────────────────────────────────────────

/// Default page height budget handed to the paginator, in millimetres (A4).
pub const DEFAULT_PAGE_HEIGHT_MM: f64 = 297.0;
