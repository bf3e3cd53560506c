//! Required-field validation for form submissions.
//!
//! Every certificate field is required; missing ones are reported by their
//! form label, not the column key, so the message reads the way the form
//! does.

use serde::Serialize;
use utoipa::ToSchema;

use super::models::CavFormFields;

/// Column key → form label, in form display order.
pub const FIELD_LABELS: [(&str, &str); 9] = [
    ("full_legal_name", "Complete Name"),
    ("date_issued", "Date Issued"),
    ("school_name", "Name of School"),
    ("school_address", "School Address"),
    ("school_year_completed", "School Year Completed"),
    ("school_year_graduated", "School Year Graduated"),
    ("date_of_application", "Date of Application"),
    ("date_of_transmission", "Date of Transmission"),
    ("control_no", "Control No."),
];

pub fn label_for(key: &str) -> &'static str {
    FIELD_LABELS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, label)| *label)
        .unwrap_or("Unknown Field")
}

/// Labels of the required fields that are empty after trimming.
pub fn missing_required_labels(fields: &CavFormFields) -> Vec<&'static str> {
    fields
        .entries()
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(key, _)| label_for(key))
        .collect()
}

/// 400 body for a submission with missing required fields.
#[derive(Debug, Serialize, ToSchema)]
pub struct ValidationFailure {
    pub error: String,
    pub message: String,
    pub missing: Vec<String>,
}

impl ValidationFailure {
    pub fn missing_fields(labels: Vec<&'static str>) -> Self {
        let message = format!("Please fill in: {}.", labels.join(", "));
        Self {
            error: "ValidationError".to_string(),
            message,
            missing: labels.into_iter().map(String::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> CavFormFields {
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

    #[test]
    fn complete_submission_passes() {
        assert!(missing_required_labels(&filled()).is_empty());
    }

    #[test]
    fn missing_fields_are_reported_by_label() {
        let mut fields = filled();
        fields.school_address.clear();
        fields.control_no = "   ".to_string();

        let missing = missing_required_labels(&fields);
        assert_eq!(missing, vec!["School Address", "Control No."]);
    }

    #[test]
    fn empty_submission_reports_every_label() {
        let fields = CavFormFields {
            full_legal_name: String::new(),
            date_issued: String::new(),
            school_name: String::new(),
            school_address: String::new(),
            school_year_completed: String::new(),
            school_year_graduated: String::new(),
            date_of_application: String::new(),
            date_of_transmission: String::new(),
            control_no: String::new(),
        };
        assert_eq!(missing_required_labels(&fields).len(), 9);
    }

    #[test]
    fn failure_body_lists_labels() {
        let failure = ValidationFailure::missing_fields(vec!["Complete Name", "Date Issued"]);
        assert_eq!(failure.error, "ValidationError");
        assert!(failure.message.contains("Complete Name, Date Issued"));
        assert_eq!(failure.missing.len(), 2);
    }
}
