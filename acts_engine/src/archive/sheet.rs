use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use log::*;

use super::{ArchiveError, CertificateRow, ExtractedDocument};
use crate::{
    db_types::supply_id_for_document,
    helpers::{cell_to_date, cell_to_integer, cell_to_text, CellError},
};

/// Marks the totals line at the bottom of a certificate.
pub const TOTALS_SENTINEL: &str = "Итого";

// Absolute (row, column) positions in the certificate template.
const DATE_CELL: (u32, u32) = (2, 3);
const FIRST_DATA_ROW: u32 = 12;
const MIN_DATA_SHEET_ROWS: u32 = 11;
const ORDER_ID_COLUMN: u32 = 1;
const STICKER_COLUMN: u32 = 3;
const COUNT_COLUMN: u32 = 4;

/// Parses a certificate spreadsheet. Returns `Ok(None)` when the first sheet holds no certificate rows.
pub fn parse_certificate_workbook(
    path: &str,
    entry_name: &str,
    contents: Vec<u8>,
) -> Result<Option<ExtractedDocument>, ArchiveError> {
    let unreadable = |reason: String| ArchiveError::UnreadableSpreadsheet { path: path.to_string(), reason };
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(contents)).map_err(|e| unreadable(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| unreadable("The workbook has no worksheets".to_string()))?
        .map_err(|e| unreadable(e.to_string()))?;
    let rows = certificate_rows(&range);
    if rows.is_empty() {
        debug!("📦️ {path} contains no certificate rows");
        return Ok(None);
    }
    let document_date = cell_to_date(range.get_value(DATE_CELL));
    if document_date.is_none() {
        warn!("📦️ Could not read a certificate date from {path}. The document is kept without one.");
    }
    let supply_id = supply_id_from_entry_name(entry_name);
    trace!("📦️ {path}: {} rows for supply {supply_id}", rows.len());
    Ok(Some(ExtractedDocument { path: path.to_string(), supply_id, document_date, rows }))
}

/// Reads the certificate rows out of a worksheet.
///
/// Sheets with 10 rows or fewer carry no data. Otherwise rows from index 12 onwards are read until the end of the
/// sheet. Rows without a sticker, the totals row, rows with an unreadable number and rows missing an order id or
/// sticker are all dropped.
pub fn certificate_rows(range: &Range<Data>) -> Vec<CertificateRow> {
    let Some((last_row, _)) = range.end() else {
        return Vec::new();
    };
    if last_row + 1 < MIN_DATA_SHEET_ROWS {
        return Vec::new();
    }
    (FIRST_DATA_ROW..=last_row).filter_map(|row| parse_row(range, row)).collect()
}

fn parse_row(range: &Range<Data>, row: u32) -> Option<CertificateRow> {
    let sticker_cell = range.get_value((row, STICKER_COLUMN));
    match cell_to_text(sticker_cell) {
        None => return None,
        Some(text) if text == TOTALS_SENTINEL => return None,
        Some(_) => {},
    }
    let parsed = || -> Result<_, CellError> {
        let order_id = cell_to_integer(range.get_value((row, ORDER_ID_COLUMN)))?;
        let sticker = cell_to_integer(sticker_cell)?;
        let count = cell_to_integer(range.get_value((row, COUNT_COLUMN)))?;
        Ok((order_id, sticker, count))
    };
    match parsed() {
        Ok((Some(order_id), Some(sticker), count)) if order_id != 0 && sticker != 0 => {
            Some(CertificateRow { order_id, sticker, count })
        },
        Ok(_) => {
            debug!("📦️ Row {} has no order id or sticker. Skipping it.", row + 1);
            None
        },
        Err(e) => {
            warn!("📦️ Skipping row {}. {e}", row + 1);
            None
        },
    }
}

/// `act-income-mp-31337.xlsx` (in any directory) belongs to supply `WB-GI-31337`.
pub fn supply_id_from_entry_name(entry_name: &str) -> String {
    let file_name = entry_name.rsplit('/').next().unwrap_or(entry_name);
    let stem = file_name.split('.').next().unwrap_or(file_name);
    let document_number = stem.rsplit('-').next().unwrap_or(stem);
    supply_id_for_document(document_number)
}
