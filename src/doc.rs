//! Document model: the design, its sections, and the element variants.
//!
//! A [`Design`] holds design-level settings plus two independent ordered
//! collections. Sections come from a fixed catalog ([`SectionId`]) and are
//! ordered by `sort_order`. Elements reference their owning section through
//! `section_id` and are ordered among siblings by `sort_order`; gaps between
//! sort orders are allowed, only relative order matters.
//!
//! Everything here is plain data. Cloning a `Design` is a deep copy, so a
//! stored template or a history snapshot never aliases the live document.
//! The query helpers below derive the *full-section ordering* that every
//! index-based edit is resolved against.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an element.
pub type ElementId = Uuid;

// =============================================================
// Sections
// =============================================================

/// The fixed catalog of label sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionId {
    /// Product name, article number, brand.
    Identity,
    /// Dimensions, weight and other product facts.
    Product,
    /// Regulatory marks and declarations.
    Compliance,
    /// Hazard and handling pictograms.
    Pictograms,
    /// Material codes, recycling and sustainability data.
    Sustainability,
    /// Supplier and manufacturer address block.
    Supplier,
    /// Package counters, barcodes and small print.
    Footer,
}

impl SectionId {
    /// Every section in catalog order.
    pub const CATALOG: [SectionId; 7] = [
        Self::Identity,
        Self::Product,
        Self::Compliance,
        Self::Pictograms,
        Self::Sustainability,
        Self::Supplier,
        Self::Footer,
    ];

    /// Kebab-case name used on the wire and in label keys.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Product => "product",
            Self::Compliance => "compliance",
            Self::Pictograms => "pictograms",
            Self::Sustainability => "sustainability",
            Self::Supplier => "supplier",
            Self::Footer => "footer",
        }
    }

    /// Translation key for the section heading.
    #[must_use]
    pub fn default_label_key(self) -> String {
        format!("labelEditor.sections.{}", self.as_str())
    }
}

impl std::fmt::Display for SectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visual styling of a section box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionStyle {
    /// Inner padding in millimetres.
    pub padding: f64,
    /// Border width in millimetres; `0.0` draws no border.
    pub border_width: f64,
    /// Border color as a CSS color string.
    pub border_color: String,
    /// Background fill; `None` inherits the design background.
    pub background_color: Option<String>,
}

impl Default for SectionStyle {
    fn default() -> Self {
        Self {
            padding: 2.0,
            border_width: 0.0,
            border_color: "#000000".into(),
            background_color: None,
        }
    }
}

/// A labeled region of the design that owns an ordered list of elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: SectionId,
    pub label_key: String,
    pub sort_order: usize,
    pub visible: bool,
    /// Editor-only fold state; never recorded in history.
    pub collapsed: bool,
    #[serde(flatten)]
    pub style: SectionStyle,
}

impl Section {
    /// A visible, expanded section with default styling.
    #[must_use]
    pub fn new(id: SectionId, sort_order: usize) -> Self {
        Self {
            id,
            label_key: id.default_label_key(),
            sort_order,
            visible: true,
            collapsed: false,
            style: SectionStyle::default(),
        }
    }
}

// =============================================================
// Elements
// =============================================================

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Stroke pattern for dividers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

/// How an image is scaled into its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFit {
    #[default]
    Contain,
    Cover,
    Fill,
}

/// Symbology for barcode elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BarcodeFormat {
    #[default]
    Ean13,
    Code128,
}

/// Variant-specific payload of an element.
///
/// Serialized as an internally tagged union under `"type"`, flattened into the
/// surrounding [`Element`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum ElementContent {
    /// Static text.
    Text { content: String, font_size: f64, bold: bool, align: TextAlign, color: Option<String> },
    /// A value bound to a product record field.
    FieldValue { field_key: String, show_label: bool, label_text: Option<String>, font_size: f64, bold: bool },
    /// QR code encoding a field value or URL.
    QrCode { data_source: String, size: f64, show_caption: bool },
    /// A hazard or handling pictogram from the pictogram set.
    Pictogram { pictogram_id: String, size: f64 },
    /// A compliance mark (CE, UKCA, ...).
    ComplianceBadge { standard: String, size: f64, show_label: bool },
    /// A raster or vector image.
    Image { src: Option<String>, width: f64, height: f64, fit: ImageFit },
    /// A horizontal rule.
    Divider { thickness: f64, color: String, style: LineStyle },
    /// Vertical whitespace.
    Spacer { height: f64 },
    /// A recycling material code (e.g. `PAP 20`).
    MaterialCode { code: String, show_name: bool, size: f64 },
    /// A linear barcode bound to a field.
    Barcode { field_key: String, format: BarcodeFormat, height: f64, show_text: bool },
    /// An icon followed by a short text.
    IconText { icon: String, text: String, font_size: f64 },
    /// "Package n of m" counter.
    PackageCounter { current: u32, total: u32, format: String },
}

impl ElementContent {
    /// The discriminant of this payload.
    #[must_use]
    pub fn element_type(&self) -> ElementType {
        match self {
            Self::Text { .. } => ElementType::Text,
            Self::FieldValue { .. } => ElementType::FieldValue,
            Self::QrCode { .. } => ElementType::QrCode,
            Self::Pictogram { .. } => ElementType::Pictogram,
            Self::ComplianceBadge { .. } => ElementType::ComplianceBadge,
            Self::Image { .. } => ElementType::Image,
            Self::Divider { .. } => ElementType::Divider,
            Self::Spacer { .. } => ElementType::Spacer,
            Self::MaterialCode { .. } => ElementType::MaterialCode,
            Self::Barcode { .. } => ElementType::Barcode,
            Self::IconText { .. } => ElementType::IconText,
            Self::PackageCounter { .. } => ElementType::PackageCounter,
        }
    }
}

/// Element kind without payload; what the palette offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementType {
    Text,
    FieldValue,
    QrCode,
    Pictogram,
    ComplianceBadge,
    Image,
    Divider,
    Spacer,
    MaterialCode,
    Barcode,
    IconText,
    PackageCounter,
}

impl ElementType {
    /// Every element type in palette order.
    pub const ALL: [ElementType; 12] = [
        Self::Text,
        Self::FieldValue,
        Self::QrCode,
        Self::Pictogram,
        Self::ComplianceBadge,
        Self::Image,
        Self::Divider,
        Self::Spacer,
        Self::MaterialCode,
        Self::Barcode,
        Self::IconText,
        Self::PackageCounter,
    ];

    /// Payload a freshly inserted element of this type starts with.
    #[must_use]
    pub fn default_content(self) -> ElementContent {
        match self {
            Self::Text => ElementContent::Text {
                content: "Text".into(),
                font_size: 10.0,
                bold: false,
                align: TextAlign::Left,
                color: None,
            },
            Self::FieldValue => ElementContent::FieldValue {
                field_key: "name".into(),
                show_label: true,
                label_text: None,
                font_size: 10.0,
                bold: false,
            },
            Self::QrCode => ElementContent::QrCode { data_source: "productUrl".into(), size: 20.0, show_caption: false },
            Self::Pictogram => ElementContent::Pictogram { pictogram_id: "fragile".into(), size: 12.0 },
            Self::ComplianceBadge => {
                ElementContent::ComplianceBadge { standard: "CE".into(), size: 10.0, show_label: false }
            }
            Self::Image => ElementContent::Image { src: None, width: 30.0, height: 20.0, fit: ImageFit::Contain },
            Self::Divider => ElementContent::Divider { thickness: 0.3, color: "#000000".into(), style: LineStyle::Solid },
            Self::Spacer => ElementContent::Spacer { height: 4.0 },
            Self::MaterialCode => ElementContent::MaterialCode { code: "PAP 20".into(), show_name: true, size: 10.0 },
            Self::Barcode => ElementContent::Barcode {
                field_key: "gtin".into(),
                format: BarcodeFormat::Ean13,
                height: 15.0,
                show_text: true,
            },
            Self::IconText => ElementContent::IconText { icon: "info".into(), text: "Text".into(), font_size: 9.0 },
            Self::PackageCounter => {
                ElementContent::PackageCounter { current: 1, total: 1, format: "{current}/{total}".into() }
            }
        }
    }
}

/// A positioned content item within a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub id: ElementId,
    /// Owning section; the only ownership relation an element has.
    pub section_id: SectionId,
    /// Rank among siblings in the same section.
    pub sort_order: usize,
    #[serde(flatten)]
    pub content: ElementContent,
}

impl Element {
    /// Create an element of `element_type` with default content and a fresh id.
    #[must_use]
    pub fn new(element_type: ElementType, section_id: SectionId, sort_order: usize) -> Self {
        Self { id: Uuid::new_v4(), section_id, sort_order, content: element_type.default_content() }
    }

    #[must_use]
    pub fn element_type(&self) -> ElementType {
        self.content.element_type()
    }
}

// =============================================================
// Design
// =============================================================

/// Design-level settings inherited by every section and element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignSettings {
    pub background_color: String,
    /// Page padding in millimetres.
    pub padding: f64,
    pub font_family: String,
    /// Base font size in points.
    pub font_size: f64,
    pub text_color: String,
}

impl Default for DesignSettings {
    fn default() -> Self {
        Self {
            background_color: "#FFFFFF".into(),
            padding: 8.0,
            font_family: "Helvetica".into(),
            font_size: 10.0,
            text_color: "#000000".into(),
        }
    }
}

/// A violated structural invariant, reported by [`Design::check_invariants`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantError {
    #[error("duplicate element id: {0}")]
    DuplicateElementId(ElementId),
    #[error("duplicate sort order {sort_order} in section {section}")]
    DuplicateElementSortOrder { section: SectionId, sort_order: usize },
    #[error("element {element} references unknown section {section}")]
    UnknownSection { element: ElementId, section: SectionId },
    #[error("section {0} appears more than once")]
    DuplicateSection(SectionId),
    #[error("duplicate section sort order {0}")]
    DuplicateSectionSortOrder(usize),
}

/// The complete in-memory model of one label being edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Design {
    pub settings: DesignSettings,
    pub sections: Vec<Section>,
    pub elements: Vec<Element>,
}

impl Default for Design {
    fn default() -> Self {
        Self::blank()
    }
}

impl Design {
    /// A design holding the full section catalog and no elements.
    #[must_use]
    pub fn blank() -> Self {
        let sections = SectionId::CATALOG
            .iter()
            .enumerate()
            .map(|(i, id)| Section::new(*id, i))
            .collect();
        Self { settings: DesignSettings::default(), sections, elements: Vec::new() }
    }

    #[must_use]
    pub fn section(&self, id: SectionId) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    #[must_use]
    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == *id)
    }

    /// Sections ordered by `sort_order`.
    #[must_use]
    pub fn sorted_sections(&self) -> Vec<&Section> {
        let mut sections: Vec<&Section> = self.sections.iter().collect();
        sections.sort_by_key(|s| s.sort_order);
        sections
    }

    /// All elements of `section`, ordered by `sort_order`.
    ///
    /// This is the full-section ordering; positions in the returned vector are
    /// full-section indices regardless of how the section is paginated.
    #[must_use]
    pub fn section_elements(&self, section: SectionId) -> Vec<&Element> {
        let mut elements: Vec<&Element> = self.elements.iter().filter(|e| e.section_id == section).collect();
        elements.sort_by_key(|e| e.sort_order);
        elements
    }

    /// Number of elements owned by `section`.
    #[must_use]
    pub fn section_len(&self, section: SectionId) -> usize {
        self.elements.iter().filter(|e| e.section_id == section).count()
    }

    /// Full-section index of an element, or `None` if it no longer exists.
    #[must_use]
    pub fn element_index(&self, id: &ElementId) -> Option<usize> {
        let element = self.element(id)?;
        self.section_elements(element.section_id)
            .iter()
            .position(|e| e.id == *id)
    }

    /// Index of a section in the ordered section list.
    #[must_use]
    pub fn section_index(&self, id: SectionId) -> Option<usize> {
        self.sorted_sections().iter().position(|s| s.id == id)
    }

    /// Sort order that places a new element after every current sibling.
    #[must_use]
    pub fn next_sort_order(&self, section: SectionId) -> usize {
        self.elements
            .iter()
            .filter(|e| e.section_id == section)
            .map(|e| e.sort_order.saturating_add(1))
            .max()
            .unwrap_or(0)
    }

    /// Verify the structural invariants, returning the first violation found.
    ///
    /// # Errors
    ///
    /// Returns the first [`InvariantError`] encountered.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let mut section_ids = HashSet::new();
        let mut section_orders = HashSet::new();
        for section in &self.sections {
            if !section_ids.insert(section.id) {
                return Err(InvariantError::DuplicateSection(section.id));
            }
            if !section_orders.insert(section.sort_order) {
                return Err(InvariantError::DuplicateSectionSortOrder(section.sort_order));
            }
        }

        let mut element_ids = HashSet::new();
        let mut element_orders = HashSet::new();
        for element in &self.elements {
            if !element_ids.insert(element.id) {
                return Err(InvariantError::DuplicateElementId(element.id));
            }
            if !section_ids.contains(&element.section_id) {
                return Err(InvariantError::UnknownSection { element: element.id, section: element.section_id });
            }
            if !element_orders.insert((element.section_id, element.sort_order)) {
                return Err(InvariantError::DuplicateElementSortOrder {
                    section: element.section_id,
                    sort_order: element.sort_order,
                });
            }
        }
        Ok(())
    }
}
