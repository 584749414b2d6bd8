//! Plain-text extraction from uploaded resume files.
//!
//! PDF goes through `pdf-extract`. DOCX is a zip archive; the body lives in
//! `word/document.xml`, read here with `quick-xml`. Body paragraphs come
//! first, then one line per table row with cells joined by " | ".
//! Extraction is CPU-bound and runs on the blocking pool.

use std::io::{Cursor, Read};
use std::path::Path;

use once_cell::sync::Lazy;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;

use crate::errors::AppError;

pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const MIN_MEANINGFUL_CHARS: usize = 10;
const DOCX_BODY: &str = "word/document.xml";

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));
static CONTROL_CHARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\x00-\x08\x0b\x0c\x0e-\x1f\x7f-\u{9f}]").expect("control pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
}

impl DocumentKind {
    /// Maps a lowercase extension (with leading dot) to a kind.
    /// `.doc` is accepted and read as DOCX.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            ".pdf" => Some(DocumentKind::Pdf),
            ".docx" | ".doc" => Some(DocumentKind::Docx),
            _ => None,
        }
    }

    fn label(self) -> &'static str {
        match self {
            DocumentKind::Pdf => "PDF",
            DocumentKind::Docx => "DOCX",
        }
    }
}

/// Lowercased extension of `file_name` including the dot, e.g. ".pdf".
pub fn file_extension(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
}

/// Trims lines, drops blank ones, collapses whitespace runs to a single
/// space and strips control characters left over from extraction.
pub fn clean_text(raw: &str) -> String {
    let joined = raw
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n");
    let collapsed = WHITESPACE_RUN.replace_all(&joined, " ");
    CONTROL_CHARS.replace_all(&collapsed, "").trim().to_string()
}

/// Extracts and cleans text. Fails when nothing meaningful is left.
pub fn extract_text(bytes: &[u8], kind: DocumentKind) -> Result<String, AppError> {
    let raw = match kind {
        DocumentKind::Pdf => pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| AppError::Extraction(format!("Failed to process PDF file: {e}")))?,
        DocumentKind::Docx => docx_text(bytes)?,
    };

    let cleaned = clean_text(&raw);
    if cleaned.chars().count() < MIN_MEANINGFUL_CHARS {
        return Err(AppError::Extraction(format!(
            "Could not extract meaningful text from {} file. \
             The file might be corrupted, password-protected, or contain only images.",
            kind.label()
        )));
    }
    Ok(cleaned)
}

/// Runs `extract_text` on the blocking pool.
pub async fn extract_document(bytes: Vec<u8>, kind: DocumentKind) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || extract_text(&bytes, kind))
        .await
        .map_err(|e| {
            AppError::Extraction(format!("Failed to process {} file: {e}", kind.label()))
        })?
}

// ────────────────────────────────────────────────────────────────────────────
// DOCX
// ────────────────────────────────────────────────────────────────────────────

fn docx_error(e: impl std::fmt::Display) -> AppError {
    AppError::Extraction(format!("Failed to process DOCX file: {e}"))
}

fn docx_text(bytes: &[u8]) -> Result<String, AppError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).map_err(docx_error)?;
    let mut xml = String::new();
    archive
        .by_name(DOCX_BODY)
        .map_err(docx_error)?
        .read_to_string(&mut xml)
        .map_err(docx_error)?;
    document_xml_text(&xml)
}

/// Walks `word/document.xml`. Text inside tables is gathered per cell.
fn document_xml_text(xml: &str) -> Result<String, AppError> {
    let mut reader = Reader::from_str(xml);

    let mut paragraphs: Vec<String> = Vec::new();
    let mut table_rows: Vec<String> = Vec::new();

    let mut table_depth = 0usize;
    let mut in_text_run = false;
    let mut paragraph = String::new();
    let mut cell_paragraphs: Vec<String> = Vec::new();
    let mut row_cells: Vec<String> = Vec::new();

    loop {
        match reader.read_event().map_err(docx_error)? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:tbl" => table_depth += 1,
                b"w:p" => paragraph.clear(),
                b"w:t" => in_text_run = true,
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:tab" => paragraph.push('\t'),
                b"w:br" | b"w:cr" => paragraph.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_text_run => {
                paragraph.push_str(&t.unescape().map_err(docx_error)?);
            }
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text_run = false,
                b"w:p" => {
                    let text = std::mem::take(&mut paragraph);
                    if table_depth > 0 {
                        cell_paragraphs.push(text);
                    } else if !text.trim().is_empty() {
                        paragraphs.push(text.trim().to_string());
                    }
                }
                b"w:tc" if table_depth == 1 => {
                    let cell = cell_paragraphs.join("\n");
                    cell_paragraphs.clear();
                    if !cell.trim().is_empty() {
                        row_cells.push(cell.trim().to_string());
                    }
                }
                b"w:tr" if table_depth == 1 => {
                    if !row_cells.is_empty() {
                        table_rows.push(row_cells.join(" | "));
                    }
                    row_cells.clear();
                }
                b"w:tbl" => table_depth = table_depth.saturating_sub(1),
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    paragraphs.extend(table_rows);
    Ok(paragraphs.join("\n"))
}
