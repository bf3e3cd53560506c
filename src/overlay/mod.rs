//! Overlay module - stamps form data onto the fixed CAV certificate template.
//!
//! The template is a four-page PDF with a fixed layout; generation loads it,
//! derives the display text for each field, and draws the text at the
//! coordinates in the placement table. The template itself is never
//! modified on disk.

pub mod generator;
pub mod metrics;
pub mod placement;
pub mod text;

pub use generator::{CavOverlayGenerator, SignatoryBlock};
pub use placement::{FontStyle, OverlayField, Placement, TextSize, PLACEMENTS};

use thiserror::Error;

/// Errors that can occur while loading the template or rendering an overlay.
#[derive(Debug, Error)]
pub enum OverlayError {
    #[error("failed to read CAV template: {0}")]
    TemplateIo(#[source] std::io::Error),
    #[error("failed to parse CAV template: {0}")]
    TemplateParse(#[source] lopdf::Error),
    #[error("CAV template has {actual} pages but the field layout needs {required}")]
    PageCount { required: usize, actual: usize },
    #[error("failed to render overlay: {0}")]
    Render(#[source] lopdf::Error),
}

/// Result of a successful document generation.
#[derive(Debug)]
pub struct GeneratedDocument {
    pub filename: String,
    pub pdf: Vec<u8>,
}
