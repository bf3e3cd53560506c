//! Text measurement for the name auto-fit.
//!
//! The student name is stamped with the standard Helvetica-Bold base font,
//! so advance widths come straight from the Adobe AFM tables (units per
//! 1000 em). Only the printable ASCII range is tabulated; anything outside
//! it measures as the average glyph width, which is close enough for the
//! shrink-to-fit decision.

/// Helvetica-Bold advance widths for 0x20..=0x7E.
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // 0x20-0x2F
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // 0x30-0x3F
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // 0x40-0x4F
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // 0x50-0x5F
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // 0x60-0x6F
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // 0x70-0x7E
];

const FALLBACK_WIDTH: u16 = 556;

/// Base font size the name starts at.
pub const NAME_BASE_SIZE: f32 = 11.0;
/// Maximum width the name may occupy on the certificate line.
pub const NAME_MAX_WIDTH: f32 = 120.0;
/// The name never shrinks below this size; overflow is accepted.
pub const NAME_MIN_SIZE: f32 = 9.0;

const FIT_STEP: f32 = 0.5;

/// Measured width of `text` in Helvetica-Bold at `size`, in PDF units.
pub fn text_width(text: &str, size: f32) -> f32 {
    let units: u32 = text
        .chars()
        .map(|ch| {
            let code = ch as u32;
            if (0x20..=0x7E).contains(&code) {
                HELVETICA_BOLD_WIDTHS[(code - 0x20) as usize] as u32
            } else {
                FALLBACK_WIDTH as u32
            }
        })
        .sum();
    units as f32 * size / 1000.0
}

/// Shrink the name font size in half-point steps until it fits the line.
pub fn fit_name_size(name: &str) -> f32 {
    let mut size = NAME_BASE_SIZE;
    let mut width = text_width(name, size);
    while width > NAME_MAX_WIDTH && size > NAME_MIN_SIZE {
        size -= FIT_STEP;
        width = text_width(name, size);
    }
    size
}
