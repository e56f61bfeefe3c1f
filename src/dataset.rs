use std::io::Cursor;
use std::path::Path;

use calamine::Reader;
use thiserror::Error;

use crate::pipeline::RowRecord;

/// Fatal input errors, raised before any row is processed.
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("dataset is empty")]
    Empty,

    #[error("column '{0}' was not found in the dataset")]
    MissingColumn(String),

    #[error("failed to parse delimited text: {0}")]
    Delimited(#[from] csv::Error),

    #[error("failed to read workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("unsupported file extension: {0}")]
    UnsupportedExtension(String),

    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),
}

/// An in-memory tabular dataset: a header row of column names plus rows of
/// text cells. This is the only view of the uploaded data the pipeline
/// needs: resolve a column name to a per-row value, and count rows.
#[derive(Debug, Clone)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Dataset {
    /// Parse delimited text. The first record is the header. Input is
    /// decoded as UTF-8 with a Latin-1 fallback, matching the encodings
    /// the original exports come in; a leading BOM is tolerated.
    pub fn from_delimited(bytes: &[u8], delimiter: u8) -> Result<Dataset, DatasetError> {
        let text = decode_text(bytes);
        let text = text.trim_start_matches('\u{FEFF}');

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(text.as_bytes());

        let columns: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        if columns.is_empty() {
            return Err(DatasetError::Empty);
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            // Ragged rows are padded so column lookups stay in bounds.
            let mut row: Vec<String> = record.iter().map(|v| v.to_string()).collect();
            row.resize(columns.len(), String::new());
            rows.push(row);
        }

        Ok(Dataset { columns, rows })
    }

    /// Read the first sheet of a workbook held in memory. The first row
    /// is the header.
    pub fn from_workbook_bytes(bytes: &[u8]) -> Result<Dataset, DatasetError> {
        let cursor = Cursor::new(bytes.to_vec());
        let mut workbook = calamine::open_workbook_auto_from_rs(cursor)?;

        let sheet_name = workbook
            .sheet_names()
            .first()
            .ok_or(DatasetError::Empty)?
            .clone();
        let range = workbook.worksheet_range(&sheet_name)?;

        let mut iter = range.rows();
        let columns: Vec<String> = match iter.next() {
            Some(header) => header.iter().map(cell_to_string).collect(),
            None => return Err(DatasetError::Empty),
        };

        let rows = iter
            .map(|row| {
                let mut cells: Vec<String> = row.iter().map(cell_to_string).collect();
                cells.resize(columns.len(), String::new());
                cells
            })
            .collect();

        Ok(Dataset { columns, rows })
    }

    /// Detect the format from the file extension and load accordingly.
    /// Delimited text is read with the `;` separator the original tool
    /// expects.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Dataset, DatasetError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .unwrap_or_default();

        let bytes = std::fs::read(path)?;
        match extension.as_str() {
            "csv" | "txt" | "tsv" => {
                let delimiter = if extension == "tsv" { b'\t' } else { b';' };
                Dataset::from_delimited(&bytes, delimiter)
            }
            "xlsx" | "xls" | "xlsb" | "ods" => Dataset::from_workbook_bytes(&bytes),
            other => Err(DatasetError::UnsupportedExtension(other.to_string())),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Position of a column by name. The match is exact (headers are
    /// trimmed at load time, so surrounding whitespace does not count):
    /// `Codigo` and `CODIGO` are distinct columns.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        self.columns.iter().position(|c| c == name)
    }

    /// Extract the (product name, code) pairs the row processor consumes.
    /// A missing column is fatal; it is reported before any row work.
    pub fn records(&self, product_col: &str, code_col: &str) -> Result<Vec<RowRecord>, DatasetError> {
        let product_idx = self
            .column_index(product_col)
            .ok_or_else(|| DatasetError::MissingColumn(product_col.to_string()))?;
        let code_idx = self
            .column_index(code_col)
            .ok_or_else(|| DatasetError::MissingColumn(code_col.to_string()))?;

        Ok(self
            .rows
            .iter()
            .map(|row| RowRecord {
                product_name: row[product_idx].clone(),
                code: row[code_idx].clone(),
            })
            .collect())
    }
}

fn cell_to_string(cell: &calamine::Data) -> String {
    match cell {
        calamine::Data::Empty => String::new(),
        calamine::Data::String(s) => s.clone(),
        // Codes come in as numbers more often than not; keep integers
        // free of a trailing ".0".
        calamine::Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        other => other.to_string(),
    }
}

// Strict UTF-8 first; Latin-1 maps bytes straight to code points, so the
// fallback cannot fail.
fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}
