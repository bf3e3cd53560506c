//! Shared helpers for integration tests.

use std::sync::Arc;

use async_trait::async_trait;
use lopdf::content::Content;
use lopdf::{dictionary, Document, Object, Stream};
use tokio::sync::Mutex;

use cav_registrar_server::audit::{AuditSink, NewAuditEntry};
use cav_registrar_server::forms::models::CavFormFields;

/// Build a minimal blank PDF with the given page count, standing in for
/// the real CAV template.
pub fn synthetic_template(page_count: usize) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids: Vec<Object> = Vec::new();
    for _ in 0..page_count {
        let content_id = doc.add_object(Stream::new(dictionary! {}, Vec::new()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "Contents" => Object::Reference(content_id),
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(612),
                Object::Integer(792),
            ],
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .expect("failed to serialize synthetic template");
    bytes
}

/// Stamped text per page, in page order.
pub fn stamped_text_by_page(pdf: &[u8]) -> Vec<Vec<String>> {
    let doc = Document::load_mem(pdf).expect("generated PDF should parse");
    let mut pages = Vec::new();
    for (_number, page_id) in doc.get_pages() {
        let data = doc
            .get_page_content(page_id)
            .expect("page content should be readable");
        let content = Content::decode(&data).expect("page content should decode");
        let mut texts = Vec::new();
        for op in content.operations {
            if op.operator == "Tj" {
                if let Some(Object::String(bytes, _)) = op.operands.first() {
                    texts.push(String::from_utf8_lossy(bytes).to_string());
                }
            }
        }
        pages.push(texts);
    }
    pages
}

/// Font sizes selected by Tf operations across the whole document.
pub fn selected_font_sizes(pdf: &[u8]) -> Vec<f32> {
    let doc = Document::load_mem(pdf).expect("generated PDF should parse");
    let mut sizes = Vec::new();
    for (_number, page_id) in doc.get_pages() {
        let data = doc.get_page_content(page_id).unwrap();
        let content = Content::decode(&data).unwrap();
        for op in content.operations {
            if op.operator == "Tf" {
                match op.operands.get(1) {
                    // Integer-valued sizes (e.g. 11.0) round-trip through lopdf
                    // as Integer because the writer drops the trailing ".0".
                    Some(Object::Real(size)) => sizes.push(*size),
                    Some(Object::Integer(size)) => sizes.push(*size as f32),
                    _ => {}
                }
            }
        }
    }
    sizes
}

/// In-memory audit sink recording every appended entry.
pub struct MockAuditSink {
    pub entries: Mutex<Vec<NewAuditEntry>>,
    fail: bool,
}

impl MockAuditSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            entries: Mutex::new(Vec::new()),
            fail: false,
        })
    }

    /// A sink whose every append fails, for the swallow-errors contract.
    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            entries: Mutex::new(Vec::new()),
            fail: true,
        })
    }

    pub async fn recorded(&self) -> Vec<NewAuditEntry> {
        self.entries.lock().await.clone()
    }
}

#[async_trait]
impl AuditSink for MockAuditSink {
    async fn append(&self, entry: NewAuditEntry) -> Result<(), String> {
        if self.fail {
            return Err("audit store unavailable".to_string());
        }
        self.entries.lock().await.push(entry);
        Ok(())
    }
}

pub fn sample_fields() -> CavFormFields {
    CavFormFields {
        full_legal_name: "Juan Dela Cruz".to_string(),
        date_issued: "2025-02-25".to_string(),
        school_name: "Quezon City National High School".to_string(),
        school_address: "14 Mabini St., Quezon City".to_string(),
        school_year_completed: "2019-2020".to_string(),
        school_year_graduated: "2020-04-03".to_string(),
        date_of_application: "2025-02-10".to_string(),
        date_of_transmission: "2025-02-20".to_string(),
        control_no: "CAV-2025-0193".to_string(),
    }
}
