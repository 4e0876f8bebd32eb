//! Uploaded CSV table

use crate::error::ParseError;
use csv::{ReaderBuilder, StringRecord};
use serde::Serialize;
use std::io::Read;

/// A parsed upload: header plus rows, all of the same width.
///
/// Cells are kept as text so extra columns can be previewed untouched;
/// numeric conversion happens in the feature extractor.
#[derive(Debug, Clone)]
pub struct Dataset {
    columns: Vec<String>,
    records: Vec<StringRecord>,
}

/// First rows of a table, ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TablePreview {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Dataset {
    /// Parse a CSV stream with a header row.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ParseError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(reader);

        let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
        if columns.is_empty() {
            return Err(ParseError::Empty);
        }

        let records = reader.records().collect::<Result<Vec<_>, _>>()?;

        Ok(Self { columns, records })
    }

    /// Parse an in-memory upload.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ParseError> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(ParseError::Empty);
        }
        Self::from_reader(bytes)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[StringRecord] {
        &self.records
    }

    /// Number of data rows (header excluded)
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Index of the first column with this exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// First `n` rows with every column, including ones the model ignores.
    pub fn head(&self, n: usize) -> TablePreview {
        TablePreview {
            columns: self.columns.clone(),
            rows: self
                .records
                .iter()
                .take(n)
                .map(|record| record.iter().map(str::to_string).collect())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_header_and_rows() {
        let data = Dataset::from_bytes(b"a,b,c\n1,2,3\n4,5,6\n").unwrap();

        assert_eq!(data.columns(), &["a", "b", "c"]);
        assert_eq!(data.len(), 2);
        assert_eq!(data.column_index("c"), Some(2));
        assert_eq!(data.column_index("C"), None);
        assert_eq!(&data.records()[1][0], "4");
    }

    #[test]
    fn test_header_only_is_empty_dataset() {
        let data = Dataset::from_bytes(b"a,b\n").unwrap();
        assert!(data.is_empty());
        assert_eq!(data.columns().len(), 2);
    }

    #[test]
    fn test_empty_upload_rejected() {
        assert!(matches!(Dataset::from_bytes(b""), Err(ParseError::Empty)));
        assert!(matches!(Dataset::from_bytes(b"\n \n"), Err(ParseError::Empty)));
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let result = Dataset::from_bytes(b"a,b\n1,2\n3\n");
        assert!(matches!(result, Err(ParseError::Csv(_))));
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        let result = Dataset::from_bytes(b"a,b\n\xff\xfe,1\n");
        assert!(matches!(result, Err(ParseError::Csv(_))));
    }

    #[test]
    fn test_head_keeps_all_columns() {
        let data = Dataset::from_bytes(b"id,x\n1,a\n2,b\n3,c\n").unwrap();
        let preview = data.head(2);

        assert_eq!(preview.columns, vec!["id", "x"]);
        assert_eq!(preview.rows, vec![vec!["1", "a"], vec!["2", "b"]]);
        assert_eq!(data.head(10).rows.len(), 3);
    }
}
