use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::encoder::BarcodeEncoder;
use crate::render::RenderConfig;
use crate::symbology::Symbology;

lazy_static! {
    // Everything outside [A-Za-z0-9_-] becomes '_' in entry names.
    static ref UNSAFE_CHARS: Regex = Regex::new(r"[^A-Za-z0-9_-]").unwrap();
}

/// One input row: a product name and its code value, both free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowRecord {
    pub product_name: String,
    pub code: String,
}

/// One finished barcode image, named and ready for packaging.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedArtifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// A row that was skipped, with enough context to report it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowFailure {
    /// Zero-based position of the row in the input.
    pub row: usize,
    pub product_name: String,
    pub reason: String,
}

/// Result of one generation run: successful artifacts in input order plus
/// the rows that were skipped, also in input order.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub artifacts: Vec<GeneratedArtifact>,
    pub failures: Vec<RowFailure>,
}

/// Replace every character outside `[A-Za-z0-9_-]` with `_`.
pub fn sanitize_file_name(name: &str) -> String {
    UNSAFE_CHARS.replace_all(name, "_").into_owned()
}

// Entry names always carry the code so that two products with the same
// sanitized name end up as distinct entries. A name that sanitizes to
// nothing falls back to the code alone.
fn entry_name(product_name: &str, code: &str) -> String {
    let name = sanitize_file_name(product_name);
    let code = sanitize_file_name(code);
    match (name.is_empty(), code.is_empty()) {
        (false, false) => format!("{}_{}.png", name, code),
        (false, true) => format!("{}.png", name),
        (true, _) => format!("{}.png", code),
    }
}

/// Row Processor: run every record through the encoder, collecting the
/// successful artifacts and recording a failure for every row the encoder
/// rejects. A pure function of its inputs; no row failure aborts the
/// batch, and an all-failed batch simply yields an empty artifact list.
pub fn process_rows(
    records: &[RowRecord],
    symbology: Symbology,
    config: &RenderConfig,
    encoder: &dyn BarcodeEncoder,
) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();

    for (row, record) in records.iter().enumerate() {
        let product_name = record.product_name.trim();
        let code = record.code.trim();

        match encoder.encode(symbology, code, config) {
            Ok(bytes) => {
                let file_name = entry_name(product_name, code);
                log::info!("row {}: generated {}", row, file_name);
                outcome.artifacts.push(GeneratedArtifact { file_name, bytes });
            }
            Err(e) => {
                log::warn!("row {}: skipping '{}': {}", row, product_name, e);
                outcome.failures.push(RowFailure {
                    row,
                    product_name: product_name.to_string(),
                    reason: e.to_string(),
                });
            }
        }
    }

    outcome
}
