//! CAV overlay generator.
//!
//! Loads the certificate template once, then produces a stamped copy per
//! record. Generation is pure over its inputs: the same record and
//! signatory blocks always derive the same stamped bytes, and the loaded
//! template bytes are never touched.

use std::fs;
use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, StringFormat};

use super::metrics::fit_name_size;
use super::placement::{FontStyle, OverlayField, TextSize, PLACEMENTS};
use super::text::{day_sentence, format_long_date, sanitize_filename};
use super::{GeneratedDocument, OverlayError};
use crate::forms::models::CavFormFields;

const TEMPLATE_FILE: &str = "CAV_Template.pdf";

const REGULAR_FONT_NAME: &str = "CavHelv";
const BOLD_FONT_NAME: &str = "CavHelvB";

/// Get the static assets directory path.
pub fn get_static_dir() -> &'static Path {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/static"))
}

/// Resolved signatory block for the "Prepared by" / "Submitted by" lines.
#[derive(Debug, Clone)]
pub struct SignatoryBlock {
    pub name: String,
    pub position: String,
}

/// Stateless generator over the immutable CAV template.
pub struct CavOverlayGenerator {
    template: Vec<u8>,
    page_count: usize,
}

impl CavOverlayGenerator {
    /// Load the template from the static assets directory.
    pub fn from_static_dir() -> Result<Self, OverlayError> {
        let template_path = get_static_dir().join(TEMPLATE_FILE);
        let bytes = fs::read(&template_path).map_err(OverlayError::TemplateIo)?;
        Self::from_bytes(bytes)
    }

    /// Build a generator from raw template bytes, validating the page
    /// layout up front.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, OverlayError> {
        let document = Document::load_mem(&bytes).map_err(OverlayError::TemplateParse)?;
        let actual = document.get_pages().len();
        let required = super::placement::required_page_count();
        if actual < required {
            return Err(OverlayError::PageCount { required, actual });
        }
        Ok(Self {
            template: bytes,
            page_count: actual,
        })
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Stamp a record onto a fresh copy of the template.
    ///
    /// Empty field values are skipped entirely; a record with no signatory
    /// references renders with the corresponding blocks left blank.
    pub fn generate(
        &self,
        fields: &CavFormFields,
        prepared_by: Option<&SignatoryBlock>,
        submitted_by: Option<&SignatoryBlock>,
    ) -> Result<GeneratedDocument, OverlayError> {
        let mut document =
            Document::load_mem(&self.template).map_err(OverlayError::TemplateParse)?;
        let pages: Vec<ObjectId> = document.get_pages().values().copied().collect();

        let name = fields.full_legal_name.trim().to_uppercase();
        let fitted_size = fit_name_size(&name);

        let mut per_page: Vec<Vec<Operation>> = vec![Vec::new(); pages.len()];
        for placement in PLACEMENTS {
            let value = derived_text(placement.field, fields, &name, prepared_by, submitted_by);
            if value.is_empty() {
                continue;
            }

            let size = match placement.size {
                TextSize::Fixed(s) => s,
                TextSize::FittedName => fitted_size,
            };
            let font_name = match placement.style {
                FontStyle::Regular => REGULAR_FONT_NAME,
                FontStyle::Bold => BOLD_FONT_NAME,
            };
            per_page[placement.page].extend(stamp_ops(font_name, size, placement.x, placement.y, &value));
        }

        let regular_font = document.add_object(standard_font("Helvetica"));
        let bold_font = document.add_object(standard_font("Helvetica-Bold"));

        for (index, operations) in per_page.into_iter().enumerate() {
            if operations.is_empty() {
                continue;
            }
            let page_id = pages[index];
            ensure_page_font(&mut document, page_id, REGULAR_FONT_NAME, regular_font)?;
            ensure_page_font(&mut document, page_id, BOLD_FONT_NAME, bold_font)?;

            let existing = document
                .get_page_content(page_id)
                .map_err(OverlayError::Render)?;
            let mut content = Content::decode(&existing).map_err(OverlayError::Render)?;
            content.operations.extend(operations);
            let encoded = content.encode().map_err(OverlayError::Render)?;
            document
                .change_page_content(page_id, encoded)
                .map_err(OverlayError::Render)?;
        }

        let mut pdf = Vec::new();
        document
            .save_to(&mut pdf)
            .map_err(|e| OverlayError::Render(e.into()))?;

        Ok(GeneratedDocument {
            filename: format!(
                "cav-{}.pdf",
                sanitize_filename(&fields.full_legal_name, "record")
            ),
            pdf,
        })
    }
}

fn standard_font(base_font: &str) -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base_font,
        "Encoding" => "WinAnsiEncoding",
    }
}

fn derived_text(
    field: OverlayField,
    fields: &CavFormFields,
    name: &str,
    prepared_by: Option<&SignatoryBlock>,
    submitted_by: Option<&SignatoryBlock>,
) -> String {
    match field {
        OverlayField::LegalName => name.to_string(),
        OverlayField::DaySentence => day_sentence(&fields.date_issued),
        OverlayField::ApplicationDate => format_long_date(&fields.date_of_application),
        OverlayField::TransmissionDate => format_long_date(&fields.date_of_transmission),
        OverlayField::ControlNo => fields.control_no.trim().to_string(),
        OverlayField::SchoolName => fields.school_name.trim().to_string(),
        OverlayField::SchoolAddress => fields.school_address.trim().to_string(),
        OverlayField::SchoolYearCompleted => fields.school_year_completed.trim().to_string(),
        OverlayField::SchoolYearGraduated => format_long_date(&fields.school_year_graduated),
        OverlayField::PreparedByName => prepared_by
            .map(|s| s.name.trim().to_uppercase())
            .unwrap_or_default(),
        OverlayField::PreparedByPosition => prepared_by
            .map(|s| s.position.trim().to_string())
            .unwrap_or_default(),
        OverlayField::SubmittedByName => submitted_by
            .map(|s| s.name.trim().to_uppercase())
            .unwrap_or_default(),
        OverlayField::SubmittedByPosition => submitted_by
            .map(|s| s.position.trim().to_string())
            .unwrap_or_default(),
    }
}

fn stamp_ops(font_name: &str, size: f32, x: f32, y: f32, value: &str) -> Vec<Operation> {
    vec![
        Operation::new("BT", vec![]),
        Operation::new(
            "Tf",
            vec![
                Object::Name(font_name.as_bytes().to_vec()),
                Object::Real(size),
            ],
        ),
        Operation::new("Td", vec![Object::Real(x), Object::Real(y)]),
        Operation::new(
            "rg",
            vec![Object::Real(0.0), Object::Real(0.0), Object::Real(0.0)],
        ),
        Operation::new(
            "Tj",
            vec![Object::String(encode_win_ansi(value), StringFormat::Literal)],
        ),
        Operation::new("ET", vec![]),
    ]
}

/// Register a font under `name` in the page's resource dictionary.
///
/// The Font entry may be inline, missing, or an indirect reference shared
/// between pages; all three shapes are handled.
fn ensure_page_font(
    document: &mut Document,
    page_id: ObjectId,
    name: &str,
    font_id: ObjectId,
) -> Result<(), OverlayError> {
    enum FontSlot {
        Missing,
        Inline,
        Indirect(ObjectId),
    }

    let slot = {
        let resources = document
            .get_or_create_resources(page_id)
            .map_err(OverlayError::Render)?
            .as_dict_mut()
            .map_err(OverlayError::Render)?;
        match resources.get(b"Font") {
            Ok(Object::Reference(id)) => FontSlot::Indirect(*id),
            Ok(_) => FontSlot::Inline,
            Err(_) => FontSlot::Missing,
        }
    };

    match slot {
        FontSlot::Missing => {
            let resources = document
                .get_or_create_resources(page_id)
                .map_err(OverlayError::Render)?
                .as_dict_mut()
                .map_err(OverlayError::Render)?;
            let mut fonts = Dictionary::new();
            fonts.set(name, Object::Reference(font_id));
            resources.set("Font", Object::Dictionary(fonts));
        }
        FontSlot::Inline => {
            let resources = document
                .get_or_create_resources(page_id)
                .map_err(OverlayError::Render)?
                .as_dict_mut()
                .map_err(OverlayError::Render)?;
            let fonts = resources
                .get_mut(b"Font")
                .map_err(OverlayError::Render)?
                .as_dict_mut()
                .map_err(OverlayError::Render)?;
            fonts.set(name, Object::Reference(font_id));
        }
        FontSlot::Indirect(id) => {
            let mut fonts = document
                .get_dictionary(id)
                .map_err(OverlayError::Render)?
                .clone();
            fonts.set(name, Object::Reference(font_id));
            document.objects.insert(id, Object::Dictionary(fonts));
        }
    }

    Ok(())
}

/// Encode text for a WinAnsi string literal. Characters outside the
/// encoding degrade to '?'.
fn encode_win_ansi(value: &str) -> Vec<u8> {
    value
        .chars()
        .map(|ch| match ch {
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            c if (c as u32) <= 0xFF => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn win_ansi_passes_ascii_through() {
        assert_eq!(encode_win_ansi("JUAN DELA CRUZ"), b"JUAN DELA CRUZ".to_vec());
    }

    #[test]
    fn win_ansi_maps_typographic_punctuation() {
        assert_eq!(encode_win_ansi("\u{2019}"), vec![0x92]);
        assert_eq!(encode_win_ansi("\u{4E00}"), vec![b'?']);
    }

    #[test]
    fn stamp_ops_wrap_a_text_object() {
        let ops = stamp_ops(BOLD_FONT_NAME, 11.0, 120.0, 493.0, "JUAN");
        assert_eq!(ops.first().unwrap().operator, "BT");
        assert_eq!(ops.last().unwrap().operator, "ET");
        assert!(ops.iter().any(|op| op.operator == "Tj"));
    }
}
