//! Editor view state: selection, hover, zoom and the active side-panel tab.
//!
//! None of this is part of the design or its history.

#[cfg(test)]
#[path = "view_test.rs"]
mod view_test;

use serde::{Deserialize, Serialize};

use crate::consts::{ZOOM_MAX, ZOOM_MIN, ZOOM_STEP};
use crate::doc::{Design, ElementId};
use crate::mutation::Direction;

/// Which side-panel tab is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelTab {
    /// The element palette.
    #[default]
    Elements,
    /// Properties of the selected element.
    Properties,
    /// Section order, visibility and style.
    Sections,
    /// Design-level settings.
    Settings,
}

/// Selection and viewport state for one editor session.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub selected: Option<ElementId>,
    pub hovered: Option<ElementId>,
    pub active_tab: PanelTab,
    zoom: f64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self { selected: None, hovered: None, active_tab: PanelTab::default(), zoom: 1.0 }
    }
}

impl ViewState {
    /// View state starting at `zoom` (clamped).
    #[must_use]
    pub fn with_zoom(zoom: f64) -> Self {
        let mut view = Self::default();
        view.set_zoom(zoom);
        view
    }

    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Set zoom, clamped to `[ZOOM_MIN, ZOOM_MAX]`. Non-finite input resets to 1.0.
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = if zoom.is_finite() { zoom.clamp(ZOOM_MIN, ZOOM_MAX) } else { 1.0 };
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom * ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom / ZOOM_STEP);
    }

    /// Select an element and switch to the properties tab.
    pub fn select(&mut self, id: ElementId) {
        self.selected = Some(id);
        self.active_tab = PanelTab::Properties;
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Forget `id` wherever it is referenced.
    pub fn forget(&mut self, id: &ElementId) {
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
        if self.hovered.as_ref() == Some(id) {
            self.hovered = None;
        }
    }

    /// Drop selection and hover that no longer resolve in `design`.
    pub fn prune(&mut self, design: &Design) {
        if self.selected.is_some_and(|id| design.element(&id).is_none()) {
            self.selected = None;
        }
        if self.hovered.is_some_and(|id| design.element(&id).is_none()) {
            self.hovered = None;
        }
    }
}

/// The sibling before (`Up`) or after (`Down`) `id` in full-section order.
#[must_use]
pub fn adjacent_element(design: &Design, id: &ElementId, direction: Direction) -> Option<ElementId> {
    let element = design.element(id)?;
    let siblings = design.section_elements(element.section_id);
    let pos = siblings.iter().position(|e| e.id == *id)?;
    let next = match direction {
        Direction::Up => pos.checked_sub(1)?,
        Direction::Down => pos + 1,
    };
    siblings.get(next).map(|e| e.id)
}
