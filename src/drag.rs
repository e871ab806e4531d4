//! Drag model: draggable items, drop targets, and the drag state machine.
//!
//! `DragState` is the gesture tracked between drag-start and drop/cancel. While
//! dragging it remembers the hovered target for highlight feedback. On drop,
//! [`resolve_drop`] classifies the (item, target) pair into an [`Edit`].
//!
//! Indices carried by a drag item reflect whatever the renderer showed when
//! the drag began, which may be one page of a paginated section. Resolution
//! ignores them and re-derives every index from the design's full-section
//! ordering at drop time.

#[cfg(test)]
#[path = "drag_test.rs"]
mod drag_test;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::doc::{Design, ElementId, ElementType, SectionId};
use crate::mutation::{Edit, InsertPosition};

/// Something the user picked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum DragItem {
    /// An existing element.
    Element {
        element_id: ElementId,
        /// Section at drag start.
        section_id: SectionId,
        /// Full-section index at drag start; informational only.
        index: usize,
    },
    /// An existing section.
    Section {
        section_id: SectionId,
        /// Section index at drag start; informational only.
        index: usize,
    },
    /// A new element from the palette; has no identity until dropped.
    Palette { element_type: ElementType },
}

/// Something an item can be dropped on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum DropTarget {
    /// An existing element; drop lands at its position.
    Element { element_id: ElementId },
    /// A section's empty area or header; drop appends.
    Section { section_id: SectionId },
}

/// Internal state for the drag state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    /// No drag in progress.
    #[default]
    Idle,
    /// An item is being dragged.
    Dragging {
        /// The item picked up at drag start.
        active: DragItem,
        /// Target currently under the pointer, if any.
        over: Option<DropTarget>,
    },
}

/// Drives [`DragState`] through start → over* → end | cancel.
#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    state: DragState,
}

impl Reconciler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> DragState {
        self.state
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// The item being dragged, if any.
    #[must_use]
    pub fn active(&self) -> Option<DragItem> {
        match self.state {
            DragState::Dragging { active, .. } => Some(active),
            DragState::Idle => None,
        }
    }

    /// The hovered drop target, if any.
    #[must_use]
    pub fn hovered(&self) -> Option<DropTarget> {
        match self.state {
            DragState::Dragging { over, .. } => over,
            DragState::Idle => None,
        }
    }

    /// Begin dragging `item`. A drag already in progress is replaced.
    pub fn start(&mut self, item: DragItem) {
        if self.is_dragging() {
            debug!("drag start while dragging; replacing active item");
        }
        self.state = DragState::Dragging { active: item, over: None };
    }

    /// Update the hovered target. Ignored while idle.
    pub fn over(&mut self, target: Option<DropTarget>) {
        if let DragState::Dragging { over, .. } = &mut self.state {
            *over = target;
        }
    }

    /// Abandon the drag without editing.
    pub fn cancel(&mut self) {
        self.state = DragState::Idle;
    }

    /// Finish the drag on `target` and return the edit to apply, if any.
    ///
    /// Always returns to idle. Dropping on nothing behaves like cancel.
    pub fn end(&mut self, design: &Design, target: Option<DropTarget>) -> Option<Edit> {
        let state = std::mem::take(&mut self.state);
        let DragState::Dragging { active, .. } = state else {
            return None;
        };
        let target = target?;
        resolve_drop(design, active, target)
    }
}

/// Classify a drop and translate it into an edit against full-section indices.
///
/// Returns `None` when the drop changes nothing or references something that
/// no longer exists.
#[must_use]
pub fn resolve_drop(design: &Design, item: DragItem, target: DropTarget) -> Option<Edit> {
    match (item, target) {
        (DragItem::Element { element_id, .. }, DropTarget::Element { element_id: over_id }) => {
            if element_id == over_id {
                return None;
            }
            let source = design.element(&element_id)?;
            let over = design.element(&over_id)?;
            let to_index = design.element_index(&over_id)?;
            if source.section_id == over.section_id {
                let from_index = design.element_index(&element_id)?;
                Some(Edit::ReorderElement { section_id: source.section_id, from_index, to_index })
            } else {
                Some(Edit::MoveElementToSection {
                    element_id,
                    from_section_id: source.section_id,
                    to_section_id: over.section_id,
                    to_index,
                })
            }
        }
        (DragItem::Element { element_id, .. }, DropTarget::Section { section_id }) => {
            let source = design.element(&element_id)?;
            design.section(section_id)?;
            if source.section_id == section_id {
                return None;
            }
            Some(Edit::MoveElementToSection {
                element_id,
                from_section_id: source.section_id,
                to_section_id: section_id,
                to_index: design.section_len(section_id),
            })
        }
        (DragItem::Palette { element_type }, DropTarget::Element { element_id }) => {
            let over = design.element(&element_id)?;
            Some(Edit::InsertElement {
                element_type,
                section_id: over.section_id,
                position: InsertPosition::At(over.sort_order),
            })
        }
        (DragItem::Palette { element_type }, DropTarget::Section { section_id }) => {
            design.section(section_id)?;
            Some(Edit::InsertElement { element_type, section_id, position: InsertPosition::End })
        }
        (DragItem::Section { section_id, .. }, target) => {
            let over_section = match target {
                DropTarget::Section { section_id: over } => over,
                DropTarget::Element { element_id } => design.element(&element_id)?.section_id,
            };
            let from_index = design.section_index(section_id)?;
            let to_index = design.section_index(over_section)?;
            (from_index != to_index).then_some(Edit::ReorderSections { from_index, to_index })
        }
    }
}

/// Whether dropping `item` on `target` would change the design.
#[must_use]
pub fn can_drop(design: &Design, item: DragItem, target: DropTarget) -> bool {
    resolve_drop(design, item, target).is_some()
}
