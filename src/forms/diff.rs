//! Change-diff util for edit auditing.
//!
//! Compares two snapshots of a record's editable fields and keeps only the
//! keys whose values actually differ. The pair of partial mappings feeds
//! the audit trail's `old_data` / `new_data` columns; a `(None, None)`
//! result means the edit was a no-op and nothing should be written.

use serde_json::{Map, Value};

pub type FieldMap = Map<String, Value>;

/// Minimal set of changed fields between an original and an edited
/// snapshot.
///
/// Iterates the candidate's keys, so both mappings are expected to carry
/// the same key set. Values compare by strict equality; key order has no
/// effect on the result.
pub fn changed_fields(original: &FieldMap, candidate: &FieldMap) -> (Option<FieldMap>, Option<FieldMap>) {
    let mut old_values = FieldMap::new();
    let mut new_values = FieldMap::new();

    for (key, new_value) in candidate {
        let old_value = original.get(key).cloned().unwrap_or(Value::Null);
        if old_value != *new_value {
            old_values.insert(key.clone(), old_value);
            new_values.insert(key.clone(), new_value.clone());
        }
    }

    (
        (!old_values.is_empty()).then_some(old_values),
        (!new_values.is_empty()).then_some(new_values),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(pairs: &[(&str, &str)]) -> FieldMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), Value::String(v.to_string())))
            .collect()
    }

    #[test]
    fn identical_snapshots_diff_to_nothing() {
        let a = snapshot(&[("full_legal_name", "Juan"), ("control_no", "CAV-1")]);
        let (old, new) = changed_fields(&a, &a);
        assert!(old.is_none());
        assert!(new.is_none());
    }

    #[test]
    fn single_changed_field_is_isolated() {
        let original = snapshot(&[
            ("full_legal_name", "Juan Dela Cruz"),
            ("school_address", "Old Address"),
            ("control_no", "CAV-1"),
        ]);
        let candidate = snapshot(&[
            ("full_legal_name", "Juan Dela Cruz"),
            ("school_address", "New Address"),
            ("control_no", "CAV-1"),
        ]);

        let (old, new) = changed_fields(&original, &candidate);
        let old = old.unwrap();
        let new = new.unwrap();

        assert_eq!(old.len(), 1);
        assert_eq!(new.len(), 1);
        assert_eq!(old["school_address"], Value::String("Old Address".into()));
        assert_eq!(new["school_address"], Value::String("New Address".into()));
    }

    #[test]
    fn result_is_key_order_independent() {
        let a1 = snapshot(&[("a", "1"), ("b", "2")]);
        let mut a2 = FieldMap::new();
        a2.insert("b".to_string(), Value::String("2".to_string()));
        a2.insert("a".to_string(), Value::String("1".to_string()));

        let b = snapshot(&[("a", "1"), ("b", "changed")]);

        let (old1, new1) = changed_fields(&a1, &b);
        let (old2, new2) = changed_fields(&a2, &b);
        assert_eq!(old1, old2);
        assert_eq!(new1, new2);
    }

    #[test]
    fn null_to_value_counts_as_change() {
        let mut original = snapshot(&[("full_legal_name", "Juan")]);
        original.insert("prepared_by".to_string(), Value::Null);
        let mut candidate = snapshot(&[("full_legal_name", "Juan")]);
        candidate.insert(
            "prepared_by".to_string(),
            Value::String("8e7a0a48-0000-0000-0000-000000000001".to_string()),
        );

        let (old, new) = changed_fields(&original, &candidate);
        assert_eq!(old.unwrap()["prepared_by"], Value::Null);
        assert!(new.unwrap().contains_key("prepared_by"));
    }

    #[test]
    fn every_changed_field_is_reported() {
        let original = snapshot(&[("a", "1"), ("b", "2"), ("c", "3")]);
        let candidate = snapshot(&[("a", "x"), ("b", "2"), ("c", "y")]);

        let (old, new) = changed_fields(&original, &candidate);
        let old = old.unwrap();
        let new = new.unwrap();
        assert_eq!(old.len(), 2);
        assert!(old.contains_key("a") && old.contains_key("c"));
        assert!(!new.contains_key("b"));
    }
}
