//! Defensive coercion of spreadsheet cells.
//!
//! Certificates are produced by hand-maintained templates, so the same column can hold an integer, a float, or the
//! text `"123.0"` depending on who exported it. Everything that reads a cell goes through these helpers.
use std::sync::OnceLock;

use calamine::{Data, DataType};
use chrono::{Datelike, NaiveDate};
use regex::Regex;
use thiserror::Error;

/// Tried in this order. The first format that parses wins.
pub const DOCUMENT_DATE_FORMATS: [&str; 5] = ["%d.%m.%Y", "%d/%m/%Y", "%Y-%m-%d", "%d-%m-%Y", "%d.%m.%y"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Cell value '{0}' cannot be read as an integer")]
pub struct CellError(pub String);

fn locale_suffix() -> &'static Regex {
    static SUFFIX: OnceLock<Regex> = OnceLock::new();
    SUFFIX.get_or_init(|| Regex::new(r"\s*г\.?$").unwrap())
}

/// Parses a certificate date such as `01.03.2024 г.`
///
/// Returns `None` when no known format matches. Four-digit-year formats must produce a four-digit year, so that
/// `01.03.24` falls through to the two-digit-year format instead of being read as the year 24.
pub fn parse_document_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let cleaned = locale_suffix().replace(trimmed, "");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    DOCUMENT_DATE_FORMATS.iter().find_map(|fmt| {
        NaiveDate::parse_from_str(cleaned, fmt).ok().filter(|d| !fmt.contains("%Y") || d.year() >= 1000)
    })
}

/// Reads a date out of either a native date cell or a text cell.
pub fn cell_to_date(cell: Option<&Data>) -> Option<NaiveDate> {
    match cell? {
        Data::String(s) => parse_document_date(s),
        Data::DateTimeIso(s) => s.get(..10).and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()),
        c @ Data::DateTime(_) => c.as_date(),
        _ => None,
    }
}

/// Reads an integer out of a cell, truncating floats. Blank cells are `Ok(None)`; anything that is present but not
/// numeric is an error.
pub fn cell_to_integer(cell: Option<&Data>) -> Result<Option<i64>, CellError> {
    match cell {
        None | Some(Data::Empty) => Ok(None),
        Some(Data::Int(i)) => Ok(Some(*i)),
        Some(Data::Float(f)) => truncate(*f).map(Some),
        Some(Data::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            let value = s.parse::<f64>().map_err(|_| CellError(s.to_string()))?;
            truncate(value).map(Some)
        },
        Some(other) => Err(CellError(other.to_string())),
    }
}

/// The trimmed text form of a cell, or `None` for blank cells.
pub fn cell_to_text(cell: Option<&Data>) -> Option<String> {
    match cell? {
        Data::Empty => None,
        Data::String(s) if s.trim().is_empty() => None,
        Data::String(s) => Some(s.trim().to_string()),
        other => Some(other.to_string()),
    }
}

fn truncate(value: f64) -> Result<i64, CellError> {
    #[allow(clippy::cast_precision_loss)]
    let in_range = value.is_finite() && value.abs() < i64::MAX as f64;
    if in_range {
        #[allow(clippy::cast_possible_truncation)]
        Ok(value.trunc() as i64)
    } else {
        Err(CellError(value.to_string()))
    }
}
