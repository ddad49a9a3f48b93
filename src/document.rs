use std::path::Path;

use crate::docx_reader::read_docx_lines;
use crate::error::ExtractError;
use crate::model::SourceLine;
use crate::options::PageSelection;
use crate::pdf_reader::read_pdf_lines;
use crate::text_reader::read_text_lines;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Docx,
    Text,
}

impl DocumentKind {
    /// Detects the kind from a file extension, case-insensitively.
    pub fn from_path(path: &Path) -> Result<Self, ExtractError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            "txt" | "text" => Ok(Self::Text),
            _ => Err(ExtractError::UnsupportedDocument(path.display().to_string())),
        }
    }
}

/// Ordered `(page, text)` lines for one document. `full_text` is the
/// whole-document PDF text, kept for the fallback pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentText {
    pub kind: DocumentKind,
    pub lines: Vec<SourceLine>,
    pub full_text: Option<String>,
}

fn select_lines(
    lines: Vec<SourceLine>,
    page_selection: Option<&PageSelection>,
) -> Result<Vec<SourceLine>, ExtractError> {
    let Some(selection) = page_selection else {
        return Ok(lines);
    };
    let selected = lines
        .into_iter()
        .filter(|line| selection.contains(line.page))
        .collect::<Vec<_>>();
    if selected.is_empty() {
        return Err(ExtractError::NoLinesSelected);
    }
    Ok(selected)
}

pub fn read_document_bytes(
    bytes: &[u8],
    kind: DocumentKind,
    page_selection: Option<&PageSelection>,
) -> Result<DocumentText, ExtractError> {
    let (lines, full_text) = match kind {
        DocumentKind::Pdf => {
            let pdf = read_pdf_lines(bytes, page_selection)?;
            (pdf.lines, pdf.full_text)
        }
        DocumentKind::Docx => (select_lines(read_docx_lines(bytes)?, page_selection)?, None),
        DocumentKind::Text => (select_lines(read_text_lines(bytes), page_selection)?, None),
    };

    Ok(DocumentText {
        kind,
        lines,
        full_text,
    })
}

pub fn read_document_lines(
    path: &Path,
    page_selection: Option<&PageSelection>,
) -> Result<DocumentText, ExtractError> {
    let kind = DocumentKind::from_path(path)?;
    let bytes = std::fs::read(path)?;
    read_document_bytes(&bytes, kind, page_selection)
}
