//! Schema-level validation of uploaded tables.
//!
//! Only column presence is checked. Values are not inspected here; a
//! non-numeric cell surfaces later as an inference failure for the batch.

use crate::error::SchemaError;
use crate::feature_extractor::REQUIRED_COLUMNS;
use std::collections::HashSet;

/// Required columns absent from `columns`, in canonical feature order.
pub fn missing_columns<S: AsRef<str>>(columns: &[S]) -> Vec<String> {
    let present: HashSet<&str> = columns.iter().map(AsRef::as_ref).collect();

    REQUIRED_COLUMNS
        .iter()
        .filter(|name| !present.contains(*name))
        .map(|name| name.to_string())
        .collect()
}

/// True iff every required column is present. Order and extra columns are irrelevant.
pub fn validate<S: AsRef<str>>(columns: &[S]) -> bool {
    missing_columns(columns).is_empty()
}

/// Like [`validate`], but reports which columns are missing.
pub fn check<S: AsRef<str>>(columns: &[S]) -> Result<(), SchemaError> {
    let missing = missing_columns(columns);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(SchemaError { missing })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn required() -> Vec<String> {
        REQUIRED_COLUMNS.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_exact_schema_passes() {
        assert!(validate(&required()));
    }

    #[test]
    fn test_extra_columns_and_any_order_pass() {
        let mut columns = required();
        columns.reverse();
        columns.insert(0, "Time".to_string());
        columns.push("Class".to_string());

        assert!(validate(&columns));
        assert!(check(&columns).is_ok());
    }

    #[test]
    fn test_missing_v15_fails() {
        let columns: Vec<String> = required().into_iter().filter(|c| c != "V15").collect();

        assert!(!validate(&columns));
        let err = check(&columns).unwrap_err();
        assert_eq!(err.missing, vec!["V15".to_string()]);
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let columns: Vec<String> = required()
            .into_iter()
            .map(|c| if c == "Amount" { "amount".to_string() } else { c })
            .collect();

        assert_eq!(missing_columns(&columns), vec!["Amount".to_string()]);
    }

    #[test]
    fn test_empty_header_misses_everything() {
        let columns: Vec<String> = Vec::new();
        assert_eq!(missing_columns(&columns).len(), 29);
    }
}
