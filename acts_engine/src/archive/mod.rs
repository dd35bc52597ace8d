//! # Certificate archives
//!
//! The marketplace delivers certificates as a zip archive, which may itself contain further zip archives. Every
//! spreadsheet found anywhere in the tree is parsed into an [`ExtractedDocument`].
//!
//! Extraction is tolerant: a corrupt nested archive or spreadsheet is logged and skipped so that its siblings are
//! still read. Only an outer archive that cannot be opened at all is an error. Nesting depth and decompressed sizes
//! are capped by [`ExtractionLimits`].
mod errors;
mod extractor;
mod sheet;

use chrono::NaiveDate;
pub use errors::ArchiveError;
pub use extractor::ArchiveExtractor;
use serde::{Deserialize, Serialize};
pub use sheet::{certificate_rows, parse_certificate_workbook, supply_id_from_entry_name, TOTALS_SENTINEL};

const DEFAULT_MAX_DEPTH: usize = 8;
const DEFAULT_MAX_ENTRY_SIZE: u64 = 64 * 1024 * 1024;
const DEFAULT_MAX_TOTAL_SIZE: u64 = 512 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionLimits {
    /// How many archives deep extraction may go. The outer archive is depth 0.
    pub max_depth: usize,
    /// The largest decompressed size accepted for a single entry.
    pub max_entry_size: u64,
    /// The decompressed byte budget for one extraction, across all entries at all depths.
    pub max_total_size: u64,
}

impl Default for ExtractionLimits {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_entry_size: DEFAULT_MAX_ENTRY_SIZE,
            max_total_size: DEFAULT_MAX_TOTAL_SIZE,
        }
    }
}

/// One certificate line: an order, the sticker printed for it and the accepted unit count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateRow {
    pub order_id: i64,
    pub sticker: i64,
    pub count: Option<i64>,
}

/// A parsed certificate spreadsheet. Only spreadsheets with at least one row produce one of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedDocument {
    /// Location of the spreadsheet inside the archive tree, e.g. `batch.zip/act-income-mp-123.xlsx`
    pub path: String,
    pub supply_id: String,
    pub document_date: Option<NaiveDate>,
    pub rows: Vec<CertificateRow>,
}
