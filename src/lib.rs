//! Label document editing engine for the master label editor.
//!
//! This crate owns the in-memory model of a printable label (sections holding
//! ordered elements), the pure mutation functions that keep that model
//! consistent, a bounded snapshot history for undo/redo, and the drag/drop
//! reconciler that turns pointer-drag lifecycle events into edits. Rendering,
//! PDF export, pagination internals and persistence are external; this crate
//! only consumes their contracts ([`pagination::Paginator`],
//! [`autosave::AutosaveScheduler`], [`autosave::TemplateStore`]).
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`doc`] | Design, sections, element variants and ordering queries |
//! | [`mutation`] | Pure edit functions and the serializable [`mutation::Edit`] |
//! | [`history`] | Bounded undo/redo log of design snapshots |
//! | [`drag`] | Drag lifecycle state machine and drop classification |
//! | [`view`] | Selection, hover, zoom and side-panel state |
//! | [`pagination`] | Page slice contract and rendered-to-full index translation |
//! | [`autosave`] | Autosave and template store collaborator contracts |
//! | [`template`] | Loading and serializing stored designs |
//! | [`session`] | [`session::EditorSession`], the explicit editor context |
//! | [`config`] | Environment-driven editor configuration |
//! | [`consts`] | Shared numeric constants (history bound, zoom limits) |

pub mod autosave;
pub mod config;
pub mod consts;
pub mod doc;
pub mod drag;
pub mod history;
pub mod mutation;
pub mod pagination;
pub mod session;
pub mod template;
pub mod view;
