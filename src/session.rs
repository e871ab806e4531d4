//! Editor session: the one context object the UI binds to.
//!
//! `EditorSession` owns the live design, its history, the drag reconciler and
//! the view state. Every edit goes through [`EditorSession::apply`], which runs
//! the pure mutation, installs the result, and records it in history unless
//! the edit is view-only or changed nothing. Events are handled one at a time
//! on the UI loop, so there is no locking here.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use tracing::{debug, info};

use crate::autosave::{AutosaveScheduler, SaveError, SaveStatus, TemplateStore};
use crate::config::EditorConfig;
use crate::doc::{Design, DesignSettings, Element, ElementId, ElementType, SectionId, SectionStyle};
use crate::drag::{DragItem, DropTarget, Reconciler};
use crate::history::History;
use crate::mutation::{Direction, Edit, InsertPosition};
use crate::pagination::{PageSlice, Paginator, paginate_design};
use crate::view::{ViewState, adjacent_element};

/// What a completed drop did.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DropOutcome {
    /// The edit applied, or `None` for a cancelled or no-op drop.
    pub edit: Option<Edit>,
    /// Element created by a palette drop; it is also selected.
    pub created: Option<ElementId>,
}

/// Editing context: the live design with its undo history, drag state, view
/// state and save status. Every edit flows through [`EditorSession::apply`].
pub struct EditorSession {
    design: Design,
    history: History,
    drag: Reconciler,
    pub view: ViewState,
    dirty: bool,
    save_status: SaveStatus,
    page_height: f64,
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl EditorSession {
    /// Start a session on a blank design.
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        let design = Design::blank();
        let mut history = History::with_limit(config.history_limit);
        history.reset(&design);
        Self {
            design,
            history,
            drag: Reconciler::new(),
            view: ViewState::with_zoom(config.initial_zoom),
            dirty: false,
            save_status: SaveStatus::Saved,
            page_height: config.page_height,
        }
    }

    /// Start a session on a copy of a stored template.
    #[must_use]
    pub fn from_template(template: &Design, config: EditorConfig) -> Self {
        let mut session = Self::new(config);
        session.load_template(template);
        session
    }

    // --- Document lifecycle ---

    /// Replace the design with a copy of `template` and reset history.
    pub fn load_template(&mut self, template: &Design) {
        self.replace_document(template.clone());
        info!(elements = self.design.elements.len(), "template loaded");
    }

    /// Discard the current design and start blank.
    pub fn new_blank(&mut self) {
        self.replace_document(Design::blank());
        info!("blank design started");
    }

    fn replace_document(&mut self, design: Design) {
        self.design = design;
        self.history.reset(&self.design);
        self.drag.cancel();
        self.view.prune(&self.design);
        self.dirty = false;
        self.save_status = SaveStatus::Saved;
    }

    // --- Queries ---

    #[must_use]
    pub fn design(&self) -> &Design {
        &self.design
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    #[must_use]
    pub fn drag(&self) -> &Reconciler {
        &self.drag
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[must_use]
    pub fn save_status(&self) -> SaveStatus {
        self.save_status
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// The selected element, if it still exists.
    #[must_use]
    pub fn selected_element(&self) -> Option<&Element> {
        self.view.selected.and_then(|id| self.design.element(&id))
    }

    /// Page slices for the visible sections at the configured page height.
    #[must_use]
    pub fn pages(&self, paginator: &dyn Paginator) -> Vec<PageSlice> {
        paginate_design(&self.design, paginator, self.page_height)
    }

    // --- Editing ---

    /// Apply `edit` and record it. Returns the id of a created element, which
    /// becomes the selection.
    pub fn apply(&mut self, edit: &Edit) -> Option<ElementId> {
        let applied = edit.apply(&self.design);
        if applied.design == self.design {
            debug!(?edit, "edit changed nothing");
            return None;
        }

        self.design = applied.design;
        if edit.records_history() {
            self.history.push(&self.design);
            self.mark_dirty();
        }
        if let Some(id) = applied.created {
            self.view.select(id);
        }
        self.view.prune(&self.design);
        applied.created
    }

    pub fn insert_element(
        &mut self,
        element_type: ElementType,
        section_id: SectionId,
        position: InsertPosition,
    ) -> Option<ElementId> {
        self.apply(&Edit::InsertElement { element_type, section_id, position })
    }

    pub fn update_element(&mut self, element: Element) {
        self.apply(&Edit::UpdateElement { element });
    }

    pub fn delete_element(&mut self, element_id: ElementId) {
        self.apply(&Edit::DeleteElement { element_id });
        self.view.forget(&element_id);
    }

    /// Delete the selected element, if any (Delete / Backspace).
    pub fn delete_selected(&mut self) {
        if let Some(id) = self.view.selected {
            self.delete_element(id);
        }
    }

    pub fn duplicate_element(&mut self, element_id: ElementId) -> Option<ElementId> {
        self.apply(&Edit::DuplicateElement { element_id })
    }

    pub fn move_element_adjacent(&mut self, element_id: ElementId, direction: Direction) {
        self.apply(&Edit::MoveElementAdjacent { element_id, direction });
    }

    pub fn reorder_element(&mut self, section_id: SectionId, from_index: usize, to_index: usize) {
        self.apply(&Edit::ReorderElement { section_id, from_index, to_index });
    }

    pub fn move_element_to_section(
        &mut self,
        element_id: ElementId,
        from_section_id: SectionId,
        to_section_id: SectionId,
        to_index: usize,
    ) {
        self.apply(&Edit::MoveElementToSection { element_id, from_section_id, to_section_id, to_index });
    }

    pub fn reorder_sections(&mut self, from_index: usize, to_index: usize) {
        self.apply(&Edit::ReorderSections { from_index, to_index });
    }

    pub fn toggle_section_collapsed(&mut self, section_id: SectionId) {
        self.apply(&Edit::ToggleSectionCollapsed { section_id });
    }

    pub fn set_section_visible(&mut self, section_id: SectionId, visible: bool) {
        self.apply(&Edit::SetSectionVisible { section_id, visible });
    }

    pub fn update_section_style(&mut self, section_id: SectionId, style: SectionStyle) {
        self.apply(&Edit::UpdateSectionStyle { section_id, style });
    }

    pub fn update_settings(&mut self, settings: DesignSettings) {
        self.apply(&Edit::UpdateSettings { settings });
    }

    /// Move the selection to the previous or next sibling (arrow keys).
    pub fn select_adjacent(&mut self, direction: Direction) -> Option<ElementId> {
        let current = self.view.selected?;
        let next = adjacent_element(&self.design, &current, direction)?;
        self.view.select(next);
        Some(next)
    }

    // --- History ---

    /// Step back one snapshot. Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.history.undo() else {
            return false;
        };
        self.restore(snapshot);
        true
    }

    /// Step forward one snapshot. Returns `false` when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.history.redo() else {
            return false;
        };
        self.restore(snapshot);
        true
    }

    fn restore(&mut self, snapshot: Design) {
        self.design = snapshot;
        // Same record path as a normal edit; the history latch swallows it.
        let recorded = self.history.push(&self.design);
        debug_assert!(!recorded, "undo/redo replay must not branch history");
        self.view.prune(&self.design);
        self.mark_dirty();
    }

    // --- Drag and drop ---

    pub fn drag_start(&mut self, item: DragItem) {
        self.drag.start(item);
    }

    pub fn drag_over(&mut self, target: Option<DropTarget>) {
        self.drag.over(target);
    }

    pub fn drag_cancel(&mut self) {
        self.drag.cancel();
    }

    /// Finish a drag on `target` and apply the resulting edit.
    pub fn drag_end(&mut self, target: Option<DropTarget>) -> DropOutcome {
        let Some(edit) = self.drag.end(&self.design, target) else {
            return DropOutcome::default();
        };
        let created = self.apply(&edit);
        DropOutcome { edit: Some(edit), created }
    }

    // --- Saving ---

    fn mark_dirty(&mut self) {
        self.dirty = true;
        self.save_status = SaveStatus::Unsaved;
    }

    /// Save now (Ctrl/Cmd+S), regardless of the dirty flag.
    ///
    /// # Errors
    ///
    /// Propagates the store's [`SaveError`]; the design stays dirty.
    pub fn save(&mut self, store: &mut dyn TemplateStore) -> Result<(), SaveError> {
        self.save_status = SaveStatus::Saving;
        match store.save(&self.design) {
            Ok(()) => {
                self.dirty = false;
                self.save_status = SaveStatus::Saved;
                Ok(())
            }
            Err(e) => {
                self.save_status = SaveStatus::Error;
                Err(e)
            }
        }
    }

    /// Offer the current design to an autosave scheduler.
    ///
    /// The callback reads the design at invocation time, so a deferred save
    /// writes the latest state rather than a stale capture.
    pub fn autosave(&mut self, scheduler: &mut dyn AutosaveScheduler, store: &mut dyn TemplateStore) -> SaveStatus {
        let design = &self.design;
        let mut saved = false;
        let status = scheduler.schedule(self.dirty, &mut || -> Result<(), SaveError> {
            store.save(design)?;
            saved = true;
            Ok(())
        });
        if saved {
            self.dirty = false;
        }
        self.save_status = status;
        status
    }
}
