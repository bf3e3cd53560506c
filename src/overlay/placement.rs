//! Static placement table for the CAV certificate template.
//!
//! Each entry maps a logical field to a page and a fixed coordinate on the
//! four-page template. The table is validated against the template's real
//! page count when the generator is constructed, so a template/layout
//! mismatch fails at startup instead of producing a shifted document.

/// Logical fields the overlay can stamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayField {
    LegalName,
    DaySentence,
    ApplicationDate,
    TransmissionDate,
    ControlNo,
    SchoolName,
    SchoolAddress,
    SchoolYearCompleted,
    SchoolYearGraduated,
    PreparedByName,
    PreparedByPosition,
    SubmittedByName,
    SubmittedByPosition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Regular,
    Bold,
}

/// Font size for a placement: fixed, or the auto-fitted name size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextSize {
    Fixed(f32),
    FittedName,
}

#[derive(Debug, Clone, Copy)]
pub struct Placement {
    pub field: OverlayField,
    /// Zero-based template page index.
    pub page: usize,
    pub x: f32,
    pub y: f32,
    pub style: FontStyle,
    pub size: TextSize,
}

const fn place(
    field: OverlayField,
    page: usize,
    x: f32,
    y: f32,
    style: FontStyle,
    size: TextSize,
) -> Placement {
    Placement {
        field,
        page,
        x,
        y,
        style,
        size,
    }
}

use FontStyle::{Bold, Regular};
use OverlayField::*;
use TextSize::{Fixed, FittedName};

/// Coordinate layout of the four-page CAV template.
pub const PLACEMENTS: &[Placement] = &[
    // Page 1 — certification proper
    place(LegalName, 0, 340.0, 645.0, Bold, FittedName),
    place(LegalName, 0, 120.0, 493.0, Bold, FittedName),
    place(DaySentence, 0, 291.0, 505.0, Bold, Fixed(10.0)),
    place(PreparedByName, 0, 120.0, 450.0, Bold, FittedName),
    place(PreparedByPosition, 0, 120.0, 435.0, Bold, Fixed(10.0)),
    place(SubmittedByName, 0, 350.0, 450.0, Bold, FittedName),
    place(SubmittedByPosition, 0, 350.0, 435.0, Bold, Fixed(10.0)),
    // Page 2 — authentication sheet
    place(ApplicationDate, 1, 257.0, 758.0, Bold, Fixed(12.0)),
    place(LegalName, 1, 137.0, 689.0, Bold, FittedName),
    // Page 3 — transmittal register line
    place(ControlNo, 2, 100.0, 697.0, Regular, Fixed(10.0)),
    place(LegalName, 2, 180.0, 697.0, Bold, FittedName),
    place(ApplicationDate, 2, 325.0, 697.0, Regular, Fixed(12.0)),
    place(TransmissionDate, 2, 450.0, 697.0, Regular, Fixed(12.0)),
    // Page 4 — verification sheet
    place(LegalName, 3, 285.0, 675.0, Bold, FittedName),
    place(SchoolName, 3, 270.0, 605.0, Bold, FittedName),
    place(SchoolAddress, 3, 270.0, 590.0, Bold, FittedName),
    place(SchoolYearCompleted, 3, 270.0, 570.0, Bold, Fixed(12.0)),
    place(SchoolYearGraduated, 3, 270.0, 555.0, Bold, Fixed(12.0)),
    place(DaySentence, 3, 291.0, 450.0, Bold, Fixed(10.0)),
];

/// Number of template pages the placement table requires.
pub fn required_page_count() -> usize {
    PLACEMENTS
        .iter()
        .map(|p| p.page + 1)
        .max()
        .unwrap_or(0)
}
