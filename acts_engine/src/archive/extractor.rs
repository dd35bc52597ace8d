use std::io::{Cursor, Read, Seek};

use log::*;
use zip::ZipArchive;

use super::{parse_certificate_workbook, ArchiveError, ExtractedDocument, ExtractionLimits};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    Archive,
    Spreadsheet,
    Other,
}

impl EntryKind {
    fn classify(name: &str) -> Self {
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(".zip") {
            Self::Archive
        } else if [".xlsx", ".xlsm", ".xls"].iter().any(|ext| lower.ends_with(ext)) {
            Self::Spreadsheet
        } else {
            Self::Other
        }
    }
}

/// Unpacks certificate archives. See the [module documentation](super) for the rules it follows.
#[derive(Debug, Clone, Default)]
pub struct ArchiveExtractor {
    limits: ExtractionLimits,
}

impl ArchiveExtractor {
    pub fn new(limits: ExtractionLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &ExtractionLimits {
        &self.limits
    }

    /// Extracts every certificate spreadsheet in `archive`, however deeply nested (up to the configured depth).
    pub fn extract(&self, archive: &[u8]) -> Result<Vec<ExtractedDocument>, ArchiveError> {
        let mut outer =
            ZipArchive::new(Cursor::new(archive)).map_err(|e| ArchiveError::UnreadableContainer(e.to_string()))?;
        let mut budget = self.limits.max_total_size;
        let mut documents = Vec::new();
        self.walk(&mut outer, "", 0, &mut budget, &mut documents);
        debug!("📦️ Extracted {} certificate documents", documents.len());
        Ok(documents)
    }

    fn walk<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        prefix: &str,
        depth: usize,
        budget: &mut u64,
        documents: &mut Vec<ExtractedDocument>,
    ) {
        for index in 0..archive.len() {
            let (name, kind, contents) = match self.read_entry(archive, index, prefix, depth, budget) {
                Ok(Some(entry)) => entry,
                Ok(None) => continue,
                Err(e) => {
                    warn!("📦️ Skipping entry #{index} of '{prefix}'. {e}");
                    continue;
                },
            };
            let path = if prefix.is_empty() { name.clone() } else { format!("{prefix}/{name}") };
            match kind {
                EntryKind::Archive => match ZipArchive::new(Cursor::new(contents)) {
                    Ok(mut nested) => self.walk(&mut nested, &path, depth + 1, budget, documents),
                    Err(e) => warn!("📦️ Nested archive {path} could not be opened. Skipping it. {e}"),
                },
                EntryKind::Spreadsheet => match parse_certificate_workbook(&path, &name, contents) {
                    Ok(Some(document)) => documents.push(document),
                    Ok(None) => {},
                    Err(e) => warn!("📦️ {e}"),
                },
                EntryKind::Other => {},
            }
        }
    }

    /// Reads one entry into memory, charging its decompressed size against `budget`. Directories, entries that are
    /// neither archives nor spreadsheets, and archives nested too deeply are not read and yield `None`. Entries that
    /// break a limit are not charged.
    fn read_entry<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
        index: usize,
        prefix: &str,
        depth: usize,
        budget: &mut u64,
    ) -> Result<Option<(String, EntryKind, Vec<u8>)>, ArchiveError> {
        let io_error = |path: &str, e: String| ArchiveError::Io { path: path.to_string(), reason: e };
        let mut file = archive.by_index(index).map_err(|e| io_error(prefix, e.to_string()))?;
        let name = file.name().to_string();
        let kind = EntryKind::classify(&name);
        if file.is_dir() || kind == EntryKind::Other {
            trace!("📦️ Ignoring {name}");
            return Ok(None);
        }
        if kind == EntryKind::Archive && depth >= self.limits.max_depth {
            let path = if prefix.is_empty() { name } else { format!("{prefix}/{name}") };
            warn!("📦️ {path} is nested more than {} archives deep. Skipping it.", self.limits.max_depth);
            return Ok(None);
        }
        let limit_exceeded = |limit| ArchiveError::LimitExceeded { path: name.clone(), limit };
        if file.size() > self.limits.max_entry_size {
            return Err(limit_exceeded("entry size"));
        }
        if file.size() > *budget {
            return Err(limit_exceeded("total extraction size"));
        }
        // The declared size may lie, so the read itself is bounded too.
        let allowance = self.limits.max_entry_size.min(*budget);
        let mut contents = Vec::new();
        file.by_ref().take(allowance + 1).read_to_end(&mut contents).map_err(|e| io_error(&name, e.to_string()))?;
        let size = contents.len() as u64;
        if size > self.limits.max_entry_size {
            return Err(limit_exceeded("entry size"));
        }
        if size > *budget {
            return Err(limit_exceeded("total extraction size"));
        }
        *budget -= size;
        Ok(Some((name, kind, contents)))
    }
}
