use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to load PDF: {0}")]
    PdfLoad(#[from] lopdf::Error),

    #[error("failed to open DOCX archive: {0}")]
    DocxArchive(#[from] zip::result::ZipError),

    #[error("failed to read DOCX body: {0}")]
    DocxXml(#[from] quick_xml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV output is not valid UTF-8: {0}")]
    OutputEncoding(#[from] std::string::FromUtf8Error),

    #[error("unsupported document type: {0}")]
    UnsupportedDocument(String),

    #[error("invalid option: {0}")]
    InvalidOption(String),

    #[error("no lines available after applying page selection")]
    NoLinesSelected,
}
