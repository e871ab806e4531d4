//! Pagination contract consumed by the editor.
//!
//! The page-break algorithm lives outside this crate. It hands back ordered
//! [`PageSlice`]s, each a half-open range into one section's full ordering.
//! The editor only reads slices to translate rendered positions back into
//! full-section indices. Edits never trust rendered positions.

#[cfg(test)]
#[path = "pagination_test.rs"]
mod pagination_test;

use serde::{Deserialize, Serialize};

use crate::doc::{Design, Element, Section, SectionId};

/// A contiguous run of one section's elements rendered on a single page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSlice {
    pub section_id: SectionId,
    /// First full-section index on this page.
    pub start: usize,
    /// One past the last full-section index on this page.
    pub end: usize,
    /// The section continues on another page.
    pub is_partial: bool,
}

impl PageSlice {
    #[must_use]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn contains(&self, full_index: usize) -> bool {
        (self.start..self.end).contains(&full_index)
    }
}

/// Splits a section's ordered elements into page slices.
pub trait Paginator {
    /// Slice `elements` (already in full-section order) for a page budget of
    /// `page_height`. Returned slices must be ordered and non-overlapping.
    fn paginate(&self, section: &Section, elements: &[&Element], page_height: f64) -> Vec<PageSlice>;
}

/// Places every section on one page; pagination disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct SinglePage;

impl Paginator for SinglePage {
    fn paginate(&self, section: &Section, elements: &[&Element], _page_height: f64) -> Vec<PageSlice> {
        vec![PageSlice { section_id: section.id, start: 0, end: elements.len(), is_partial: false }]
    }
}

/// Paginate every visible section of `design` in section order.
#[must_use]
pub fn paginate_design(design: &Design, paginator: &dyn Paginator, page_height: f64) -> Vec<PageSlice> {
    design
        .sorted_sections()
        .into_iter()
        .filter(|s| s.visible)
        .flat_map(|section| {
            let elements = design.section_elements(section.id);
            paginator.paginate(section, &elements, page_height)
        })
        .collect()
}

/// Elements rendered by `slice`, clamped to what the section currently holds.
#[must_use]
pub fn visible_elements<'a>(design: &'a Design, slice: &PageSlice) -> Vec<&'a Element> {
    let elements = design.section_elements(slice.section_id);
    let end = slice.end.min(elements.len());
    let start = slice.start.min(end);
    elements[start..end].to_vec()
}

/// Translate a position within a rendered slice into a full-section index.
#[must_use]
pub fn full_index(slice: &PageSlice, rendered_index: usize) -> Option<usize> {
    let index = slice.start + rendered_index;
    slice.contains(index).then_some(index)
}
