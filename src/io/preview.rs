//! CSV preview for the import screen.
//!
//! This is deliberately *not* a CSV parser: lines are split on `,` with no
//! quoting or escaping, every cell stays a string, and only the first
//! `PREVIEW_ROWS` non-blank lines are kept (header + 10 data rows).

use std::path::Path;

use crate::error::ImportError;

/// Header plus ten data rows.
pub const PREVIEW_ROWS: usize = 11;

/// Parsed preview rows. The first row is conventionally the header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvPreview {
    pub rows: Vec<Vec<String>>,
}

impl CsvPreview {
    pub fn header(&self) -> Option<&[String]> {
        self.rows.first().map(Vec::as_slice)
    }

    /// Data rows (everything after the header). Empty for 0- or 1-line files.
    pub fn body(&self) -> &[Vec<String>] {
        self.rows.get(1..).unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Split raw text into at most `PREVIEW_ROWS` rows of trimmed cells.
///
/// Blank and whitespace-only lines are dropped silently.
pub fn parse_preview(text: &str) -> CsvPreview {
    let rows = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .take(PREVIEW_ROWS)
        .map(|line| line.split(',').map(|cell| cell.trim().to_string()).collect())
        .collect();
    CsvPreview { rows }
}

/// Reject anything whose file name does not end in `.csv`.
///
/// Purely a name check (case-sensitive); the content is never inspected.
/// Returns the file name for messages.
pub fn ensure_csv_extension(path: &Path) -> Result<String, ImportError> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if !file_name.ends_with(".csv") {
        return Err(ImportError::WrongExtension { file_name });
    }
    Ok(file_name)
}

/// Check the extension, read the file, and build its preview.
///
/// Invalid UTF-8 is replaced rather than rejected (Latin-1 spreadsheet exports).
pub fn preview_file(path: &Path) -> Result<CsvPreview, ImportError> {
    let file_name = ensure_csv_extension(path)?;
    let bytes = std::fs::read(path).map_err(|source| ImportError::Read { file_name, source })?;
    Ok(parse_preview(&String::from_utf8_lossy(&bytes)))
}
