use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArchiveError {
    #[error("The archive could not be opened. {0}")]
    UnreadableContainer(String),
    #[error("Spreadsheet {path} could not be read. {reason}")]
    UnreadableSpreadsheet { path: String, reason: String },
    #[error("Entry {path} exceeds the {limit} limit")]
    LimitExceeded { path: String, limit: &'static str },
    #[error("Could not read {path} from the archive. {reason}")]
    Io { path: String, reason: String },
}
