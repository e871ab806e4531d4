//! Mutation engine: one pure function per edit intent.
//!
//! Every function takes the current [`Design`] by reference and returns a new
//! one; the input is never touched, so history snapshots stay valid. Edits
//! that name an element or section which no longer exists are no-ops and
//! return an unchanged copy. Drag events and keyboard shortcuts can race, so
//! stale references are expected. Index arguments are clamped.
//!
//! Ordering rules:
//! - insert and duplicate shift later siblings up by one and keep gaps;
//! - delete leaves a gap;
//! - reorder and cross-section moves renumber the affected sections to
//!   contiguous `0..N` positions.

#[cfg(test)]
#[path = "mutation_test.rs"]
mod mutation_test;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::doc::{Design, DesignSettings, Element, ElementId, ElementType, Section, SectionId, SectionStyle};

/// Where a new element goes within its section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "kind", content = "value")]
pub enum InsertPosition {
    /// Take sort order `index + 1`, shifting siblings at or above it.
    /// Clamped to an append past the last sibling.
    After(usize),
    /// Take sort order `slot`, shifting siblings at or above it.
    /// Clamped to an append past the last sibling.
    At(usize),
    /// Go after every current sibling.
    End,
}

/// Step direction among siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

/// Result of an edit that may create an element.
#[derive(Debug, Clone, PartialEq)]
pub struct Applied {
    pub design: Design,
    /// Id of the element the edit created, if any.
    pub created: Option<ElementId>,
}

impl Applied {
    fn unchanged(design: Design) -> Self {
        Self { design, created: None }
    }
}

// =============================================================
// Element edits
// =============================================================

/// Insert a new element of `element_type` with default content.
///
/// Returns the created id in [`Applied::created`]; inserting into a section the
/// design does not hold is a no-op.
#[must_use]
pub fn insert_element(
    design: &Design,
    element_type: ElementType,
    section_id: SectionId,
    position: InsertPosition,
) -> Applied {
    if design.section(section_id).is_none() {
        debug!(%section_id, "insert_element: unknown section");
        return Applied::unchanged(design.clone());
    }

    let mut next = design.clone();
    compact_if_saturated(&mut next, section_id);

    // Slots past the last sibling append.
    let end = next.next_sort_order(section_id);
    let slot = match position {
        InsertPosition::After(index) => index.saturating_add(1),
        InsertPosition::At(slot) => slot,
        InsertPosition::End => end,
    }
    .min(end);

    shift_from(&mut next, section_id, slot);
    let element = Element::new(element_type, section_id, slot);
    let id = element.id;
    next.elements.push(element);
    Applied { design: next, created: Some(id) }
}

/// Replace the element with the same id, keeping its ordering and ownership.
#[must_use]
pub fn update_element(design: &Design, updated: &Element) -> Design {
    let mut next = design.clone();
    let Some(existing) = next.elements.iter_mut().find(|e| e.id == updated.id) else {
        debug!(id = %updated.id, "update_element: unknown element");
        return next;
    };
    existing.content = updated.content.clone();
    next
}

/// Remove an element. Remaining siblings keep their sort orders.
#[must_use]
pub fn delete_element(design: &Design, id: &ElementId) -> Design {
    let mut next = design.clone();
    let before = next.elements.len();
    next.elements.retain(|e| e.id != *id);
    if next.elements.len() == before {
        debug!(%id, "delete_element: unknown element");
    }
    next
}

/// Clone an element directly after its source with a fresh id.
#[must_use]
pub fn duplicate_element(design: &Design, id: &ElementId) -> Applied {
    let Some(section) = design.element(id).map(|e| e.section_id) else {
        debug!(%id, "duplicate_element: unknown element");
        return Applied::unchanged(design.clone());
    };

    let mut next = design.clone();
    compact_if_saturated(&mut next, section);
    let Some(source) = next.element(id) else {
        return Applied::unchanged(design.clone());
    };
    let mut copy = source.clone();
    copy.id = Uuid::new_v4();
    copy.sort_order = source.sort_order.saturating_add(1);

    shift_from(&mut next, copy.section_id, copy.sort_order);
    let created = copy.id;
    next.elements.push(copy);
    Applied { design: next, created: Some(created) }
}

/// Swap sort orders with the neighbouring sibling in `direction`.
///
/// No-op at either end of the sibling list.
#[must_use]
pub fn move_element_adjacent(design: &Design, id: &ElementId, direction: Direction) -> Design {
    let Some(element) = design.element(id) else {
        debug!(%id, "move_element_adjacent: unknown element");
        return design.clone();
    };
    let siblings = design.section_elements(element.section_id);
    let Some(pos) = siblings.iter().position(|e| e.id == *id) else {
        return design.clone();
    };
    let neighbour = match direction {
        Direction::Up => pos.checked_sub(1),
        Direction::Down => Some(pos + 1).filter(|n| *n < siblings.len()),
    };
    let Some(neighbour) = neighbour.map(|n| (siblings[n].id, siblings[n].sort_order)) else {
        return design.clone();
    };
    let own_order = siblings[pos].sort_order;

    let mut next = design.clone();
    for e in &mut next.elements {
        if e.id == *id {
            e.sort_order = neighbour.1;
        } else if e.id == neighbour.0 {
            e.sort_order = own_order;
        }
    }
    next
}

/// Move the element at full index `from` to full index `to` within `section`,
/// then renumber the section contiguously.
#[must_use]
pub fn reorder_element(design: &Design, section: SectionId, from: usize, to: usize) -> Design {
    let mut order: Vec<ElementId> = design.section_elements(section).iter().map(|e| e.id).collect();
    if order.is_empty() {
        return design.clone();
    }
    let last = order.len() - 1;
    let (from, to) = (from.min(last), to.min(last));
    if from == to {
        return design.clone();
    }

    let moved = order.remove(from);
    order.insert(to, moved);

    let mut next = design.clone();
    renumber(&mut next, &order);
    next
}

/// Move an element into another section at `to_index`.
///
/// Both sections are renumbered contiguously afterwards. The element's current
/// section is authoritative; `from_section` only matters for logging when the
/// caller's view is stale. Moving within one section falls back to
/// [`reorder_element`].
#[must_use]
pub fn move_element_to_section(
    design: &Design,
    id: &ElementId,
    from_section: SectionId,
    to_section: SectionId,
    to_index: usize,
) -> Design {
    let Some(element) = design.element(id) else {
        debug!(%id, "move_element_to_section: unknown element");
        return design.clone();
    };
    if design.section(to_section).is_none() {
        debug!(%id, %to_section, "move_element_to_section: unknown target section");
        return design.clone();
    }
    let source = element.section_id;
    if source != from_section {
        debug!(%id, expected = %from_section, actual = %source, "move_element_to_section: stale source section");
    }
    if source == to_section {
        let from = design.element_index(id).unwrap_or(0);
        return reorder_element(design, source, from, to_index);
    }

    let remaining: Vec<ElementId> = design
        .section_elements(source)
        .iter()
        .filter(|e| e.id != *id)
        .map(|e| e.id)
        .collect();
    let mut target: Vec<ElementId> = design.section_elements(to_section).iter().map(|e| e.id).collect();
    let at = to_index.min(target.len());
    target.insert(at, *id);

    let mut next = design.clone();
    if let Some(moved) = next.elements.iter_mut().find(|e| e.id == *id) {
        moved.section_id = to_section;
    }
    renumber(&mut next, &remaining);
    renumber(&mut next, &target);
    next
}

// =============================================================
// Section edits
// =============================================================

/// Move the section at index `from` to index `to` and renumber all sections.
#[must_use]
pub fn reorder_sections(design: &Design, from: usize, to: usize) -> Design {
    let mut order: Vec<SectionId> = design.sorted_sections().iter().map(|s| s.id).collect();
    if order.is_empty() {
        return design.clone();
    }
    let last = order.len() - 1;
    let (from, to) = (from.min(last), to.min(last));
    if from == to {
        return design.clone();
    }

    let moved = order.remove(from);
    order.insert(to, moved);

    let mut next = design.clone();
    for section in &mut next.sections {
        if let Some(pos) = order.iter().position(|id| *id == section.id) {
            section.sort_order = pos;
        }
    }
    next
}

/// Flip a section's collapsed flag. View state only.
#[must_use]
pub fn toggle_section_collapsed(design: &Design, section: SectionId) -> Design {
    with_section(design, section, |s| s.collapsed = !s.collapsed)
}

/// Show or hide a section. Sections are never removed.
#[must_use]
pub fn set_section_visible(design: &Design, section: SectionId, visible: bool) -> Design {
    with_section(design, section, |s| s.visible = visible)
}

/// Replace a section's styling.
#[must_use]
pub fn update_section_style(design: &Design, section: SectionId, style: &SectionStyle) -> Design {
    with_section(design, section, |s| s.style = style.clone())
}

/// Replace the design-level settings.
#[must_use]
pub fn update_settings(design: &Design, settings: &DesignSettings) -> Design {
    let mut next = design.clone();
    next.settings = settings.clone();
    next
}

// =============================================================
// Serializable edits
// =============================================================

/// A single edit intent, applied through [`Edit::apply`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum Edit {
    InsertElement { element_type: ElementType, section_id: SectionId, position: InsertPosition },
    UpdateElement { element: Element },
    DeleteElement { element_id: ElementId },
    DuplicateElement { element_id: ElementId },
    MoveElementAdjacent { element_id: ElementId, direction: Direction },
    ReorderElement { section_id: SectionId, from_index: usize, to_index: usize },
    MoveElementToSection { element_id: ElementId, from_section_id: SectionId, to_section_id: SectionId, to_index: usize },
    ReorderSections { from_index: usize, to_index: usize },
    ToggleSectionCollapsed { section_id: SectionId },
    SetSectionVisible { section_id: SectionId, visible: bool },
    UpdateSectionStyle { section_id: SectionId, style: SectionStyle },
    UpdateSettings { settings: DesignSettings },
}

impl Edit {
    /// Apply this edit to `design`, producing a new design.
    #[must_use]
    pub fn apply(&self, design: &Design) -> Applied {
        match self {
            Self::InsertElement { element_type, section_id, position } => {
                insert_element(design, *element_type, *section_id, *position)
            }
            Self::DuplicateElement { element_id } => duplicate_element(design, element_id),
            Self::UpdateElement { element } => Applied::unchanged(update_element(design, element)),
            Self::DeleteElement { element_id } => Applied::unchanged(delete_element(design, element_id)),
            Self::MoveElementAdjacent { element_id, direction } => {
                Applied::unchanged(move_element_adjacent(design, element_id, *direction))
            }
            Self::ReorderElement { section_id, from_index, to_index } => {
                Applied::unchanged(reorder_element(design, *section_id, *from_index, *to_index))
            }
            Self::MoveElementToSection { element_id, from_section_id, to_section_id, to_index } => Applied::unchanged(
                move_element_to_section(design, element_id, *from_section_id, *to_section_id, *to_index),
            ),
            Self::ReorderSections { from_index, to_index } => {
                Applied::unchanged(reorder_sections(design, *from_index, *to_index))
            }
            Self::ToggleSectionCollapsed { section_id } => {
                Applied::unchanged(toggle_section_collapsed(design, *section_id))
            }
            Self::SetSectionVisible { section_id, visible } => {
                Applied::unchanged(set_section_visible(design, *section_id, *visible))
            }
            Self::UpdateSectionStyle { section_id, style } => {
                Applied::unchanged(update_section_style(design, *section_id, style))
            }
            Self::UpdateSettings { settings } => Applied::unchanged(update_settings(design, settings)),
        }
    }

    /// Whether applying this edit should enter the undo history.
    #[must_use]
    pub fn records_history(&self) -> bool {
        !matches!(self, Self::ToggleSectionCollapsed { .. })
    }
}

// =============================================================
// Helpers
// =============================================================

/// Bump every sibling in `section` whose sort order is `>= slot`.
fn shift_from(design: &mut Design, section: SectionId, slot: usize) {
    for e in &mut design.elements {
        if e.section_id == section && e.sort_order >= slot {
            e.sort_order = e.sort_order.saturating_add(1);
        }
    }
}

/// Renumber `section` to `0..N` when a sibling sits at `usize::MAX`, so there
/// is room to shift. Only reachable from hand-edited stored designs.
fn compact_if_saturated(design: &mut Design, section: SectionId) {
    let saturated = design.elements.iter().any(|e| e.section_id == section && e.sort_order == usize::MAX);
    if !saturated {
        return;
    }
    debug!(%section, "sort orders saturated; renumbering section");
    let order: Vec<ElementId> = design.section_elements(section).iter().map(|e| e.id).collect();
    renumber(design, &order);
}

/// Assign each listed element its position in `order` as sort order.
fn renumber(design: &mut Design, order: &[ElementId]) {
    for e in &mut design.elements {
        if let Some(pos) = order.iter().position(|id| *id == e.id) {
            e.sort_order = pos;
        }
    }
}

fn with_section(design: &Design, section: SectionId, f: impl FnOnce(&mut Section)) -> Design {
    let mut next = design.clone();
    match next.sections.iter_mut().find(|s| s.id == section) {
        Some(s) => f(s),
        None => debug!(%section, "section edit: unknown section"),
    }
    next
}
