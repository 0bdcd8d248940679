use crate::error::ArtForgeError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single cell of the dataset. The backend serves plain JSON scalars, so
/// numbers and strings are the only shapes that occur.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn is_number(&self) -> bool {
        matches!(self, CellValue::Number(_))
    }

    /// The text shown in an edit buffer for this value. Integral floats
    /// print without a fractional part ("1", not "1.0"), matching what the
    /// backend round-trips through JSON.
    pub fn display(&self) -> String {
        match self {
            CellValue::Number(n) => n.to_string(),
            CellValue::Text(s) => s.clone(),
        }
    }
}

/// One record of the dataset, keyed by column name. Row identity is purely
/// positional; there is no stable key.
pub type Row = HashMap<String, CellValue>;

/// The full dataset for a session together with its column order. Replaced
/// wholesale by a new load, never mutated in place.
#[derive(Debug, Clone, PartialEq)]
pub struct DataTable {
    pub rows: Vec<Row>,
    pub columns: Vec<String>,
}

impl DataTable {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Result of a successful generation call.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedArt {
    pub image_url: String,
    pub message: String,
}

/// Wire shape of `GET /api/load-data`.
#[derive(Deserialize, Debug)]
pub struct LoadReply {
    pub success: bool,
    #[serde(default)]
    pub data: Option<Vec<Row>>,
    #[serde(default)]
    pub columns: Option<Vec<String>>,
    #[serde(default)]
    pub error: Option<String>,
}

impl LoadReply {
    pub fn into_table(self) -> Result<DataTable, ArtForgeError> {
        if !self.success {
            return Err(ArtForgeError::Backend(
                self.error.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }
        match (self.data, self.columns) {
            (Some(rows), Some(columns)) => Ok(DataTable { rows, columns }),
            _ => Err(ArtForgeError::Backend(
                "load reply missing data or columns".to_string(),
            )),
        }
    }
}

/// Wire shape of the `POST /api/generate-art` body.
#[derive(Serialize, Debug)]
pub struct GenerateRequest {
    pub data: Vec<Row>,
}

/// Wire shape of the `POST /api/generate-art` reply.
#[derive(Deserialize, Debug)]
pub struct GenerateReply {
    pub success: bool,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl GenerateReply {
    pub fn into_art(self) -> Result<GeneratedArt, ArtForgeError> {
        if !self.success {
            return Err(ArtForgeError::Backend(
                self.error.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }
        match self.image_url {
            Some(image_url) => Ok(GeneratedArt {
                image_url,
                message: self.message.unwrap_or_default(),
            }),
            None => Err(ArtForgeError::Backend(
                "generate reply missing image_url".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_values_deserialize_untagged() {
        let row: Row = serde_json::from_str(r#"{"a": 1.5, "b": "setosa", "c": 3}"#).unwrap();
        assert_eq!(row["a"], CellValue::Number(1.5));
        assert_eq!(row["b"], CellValue::Text("setosa".to_string()));
        assert_eq!(row["c"], CellValue::Number(3.0));
    }

    #[test]
    fn number_display_drops_trailing_zero() {
        assert_eq!(CellValue::Number(1.0).display(), "1");
        assert_eq!(CellValue::Number(2.5).display(), "2.5");
        assert_eq!(CellValue::Text("x".to_string()).display(), "x");
    }

    #[test]
    fn load_reply_success() {
        let reply: LoadReply = serde_json::from_str(
            r#"{"success": true, "data": [{"a": 1, "b": "x"}], "columns": ["a", "b"]}"#,
        )
        .unwrap();
        let table = reply.into_table().unwrap();
        assert_eq!(table.row_count(), 1);
        assert_eq!(table.columns, vec!["a", "b"]);
        assert_eq!(table.rows[0]["a"], CellValue::Number(1.0));
    }

    #[test]
    fn load_reply_reported_failure() {
        let reply: LoadReply =
            serde_json::from_str(r#"{"success": false, "error": "no such file"}"#).unwrap();
        match reply.into_table() {
            Err(ArtForgeError::Backend(msg)) => assert_eq!(msg, "no such file"),
            other => panic!("expected backend error, got {:?}", other),
        }
    }

    #[test]
    fn load_reply_missing_fields_is_malformed() {
        let reply: LoadReply = serde_json::from_str(r#"{"success": true}"#).unwrap();
        assert!(reply.into_table().is_err());
    }

    #[test]
    fn generate_reply_success() {
        let reply: GenerateReply = serde_json::from_str(
            r#"{"success": true, "image_url": "/api/get-image/generated_art.png", "message": "done"}"#,
        )
        .unwrap();
        let art = reply.into_art().unwrap();
        assert_eq!(art.image_url, "/api/get-image/generated_art.png");
        assert_eq!(art.message, "done");
    }

    #[test]
    fn generate_request_serializes_nan_as_null() {
        let mut row = Row::new();
        row.insert("a".to_string(), CellValue::Number(f64::NAN));
        let body = serde_json::to_string(&GenerateRequest { data: vec![row] }).unwrap();
        assert_eq!(body, r#"{"data":[{"a":null}]}"#);
    }
}
