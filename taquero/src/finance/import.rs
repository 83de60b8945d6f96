//! File import with a per-file report

use std::path::Path;

use encoding_rs::{UTF_8, WINDOWS_1252};
use serde::Serialize;
use shared::{AppError, AppResult, ErrorCode};

use super::detect::CsvKind;
use super::parsers::{FinanceRows, ParsedFile, SkippedRow, parse_csv};

/// Decode an export: UTF-8 (BOM stripped) or else Windows-1252
pub fn decode(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    match UTF_8.decode_without_bom_handling_and_without_replacement(bytes) {
        Some(text) => text.into_owned(),
        None => {
            let (text, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
            text.into_owned()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FileOutcome {
    Imported {
        kind: CsvKind,
        rows: usize,
        skipped: Vec<SkippedRow>,
    },
    Failed {
        reason: String,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub name: String,
    #[serde(flatten)]
    pub outcome: FileOutcome,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportReport {
    pub files: Vec<FileReport>,
}

impl ImportReport {
    pub fn succeeded(&self) -> usize {
        self.files
            .iter()
            .filter(|f| matches!(f.outcome, FileOutcome::Imported { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.files.len() - self.succeeded()
    }

    pub fn rows(&self) -> usize {
        self.files
            .iter()
            .map(|f| match &f.outcome {
                FileOutcome::Imported { rows, .. } => *rows,
                FileOutcome::Failed { .. } => 0,
            })
            .sum()
    }

    pub fn skipped(&self) -> usize {
        self.files
            .iter()
            .map(|f| match &f.outcome {
                FileOutcome::Imported { skipped, .. } => skipped.len(),
                FileOutcome::Failed { .. } => 0,
            })
            .sum()
    }
}

/// Parse raw bytes of one export
pub fn import_bytes(bytes: &[u8]) -> AppResult<ParsedFile> {
    parse_csv(&decode(bytes))
}

/// Parse a file from disk
pub fn import_file(path: &Path) -> AppResult<ParsedFile> {
    let bytes = std::fs::read(path).map_err(|e| {
        AppError::with_message(ErrorCode::CsvUnreadable, format!("Cannot read {}: {e}", path.display()))
    })?;
    import_bytes(&bytes)
}

/// Import several files; one bad file does not stop the others
pub fn import_files<P: AsRef<Path>>(paths: &[P]) -> (FinanceRows, ImportReport) {
    let mut rows = FinanceRows::default();
    let mut report = ImportReport::default();

    for path in paths {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        let outcome = match import_file(path) {
            Ok(parsed) => {
                tracing::info!(
                    file = %name,
                    kind = %parsed.kind,
                    rows = parsed.rows.len(),
                    skipped = parsed.skipped.len(),
                    "Imported export"
                );
                for skip in &parsed.skipped {
                    tracing::debug!(file = %name, line = skip.line, reason = %skip.reason, "Skipped row");
                }
                let outcome = FileOutcome::Imported {
                    kind: parsed.kind,
                    rows: parsed.rows.len(),
                    skipped: parsed.skipped,
                };
                rows.extend(parsed.rows);
                outcome
            }
            Err(e) => {
                tracing::warn!(file = %name, error = %e, "Import failed");
                FileOutcome::Failed { reason: e.message }
            }
        };
        report.files.push(FileReport { name, outcome });
    }
    (rows, report)
}
