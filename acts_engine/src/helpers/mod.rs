mod cells;

pub use cells::{cell_to_date, cell_to_integer, cell_to_text, parse_document_date, CellError, DOCUMENT_DATE_FORMATS};
