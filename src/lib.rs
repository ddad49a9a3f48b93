mod consecutive;
mod csv_out;
mod document;
mod docx_reader;
mod error;
mod filter;
mod line_classify;
mod model;
mod number_scan;
mod options;
mod pdf_reader;
mod rules;
mod sheets;
mod summary;
mod table_group;
mod table_structure;
mod text_reader;
mod value_parse;
mod warning;

use std::path::{Path, PathBuf};

use crate::pdf_reader::{page_lines, split_text_into_pages};
use crate::summary::{table_statistics, table_summary};
use crate::warning::WarningCode;

pub use consecutive::{count_consecutive, count_consecutive_tokens};
pub use csv_out::{
    BatchEntry, CsvDirectorySink, TabularSink, sheet_to_csv_string, write_batch_summary,
};
pub use document::{DocumentKind, DocumentText, read_document_bytes, read_document_lines};
pub use error::ExtractError;
pub use filter::{EvidencePolicy, filter_records};
pub use line_classify::{
    ClassifiedLine, classify_line, clean_text, extract_records, looks_like_section_heading,
};
pub use model::{
    CellValue, LineRecord, LogicalTable, RowMetadata, Sheet, SourceLine, StructuredRow,
    StructuredTable,
};
pub use number_scan::{NumberScan, NumberToken, scan_numbers};
pub use options::{ExtractOptions, PageSelection};
pub use rules::RuleSet;
pub use sheets::{extraction_sheets, sanitize_sheet_name};
pub use summary::{TableStatistics, TableSummary};
pub use table_group::group_tables;
pub use table_structure::{clean_line_item, column_names, modal_value_count, structure_table};
pub use value_parse::parse_value;
pub use warning::{ExtractWarning, WarningCode as ExtractWarningCode};

/// Everything extracted from one document, stage by stage.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentExtraction {
    /// Every line the classifier kept, before evidence filtering.
    pub records: Vec<LineRecord>,
    pub tables: Vec<LogicalTable>,
    pub structured: Vec<StructuredTable>,
    pub statistics: Vec<TableStatistics>,
    pub summaries: Vec<TableSummary>,
    pub warnings: Vec<ExtractWarning>,
}

impl DocumentExtraction {
    /// Rows that made it into a table.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.tables.iter().map(LogicalTable::len).sum()
    }

    #[must_use]
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionReport {
    pub row_count: usize,
    pub table_count: usize,
    pub warnings: Vec<ExtractWarning>,
    pub written: Vec<PathBuf>,
}

fn validate_options(options: &ExtractOptions) -> Result<(), ExtractError> {
    if options.evidence.min_regular_count == 0 {
        return Err(ExtractError::InvalidOption(
            "min_regular_count must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// Runs classification, filtering, grouping and structuring over ordered
/// document lines. Never fails: malformed input yields fewer rows and
/// warnings.
#[must_use]
pub fn run_pipeline(lines: &[SourceLine], options: &ExtractOptions) -> DocumentExtraction {
    let mut warnings = Vec::new();

    let records = extract_records(lines, &options.rules);
    if records.is_empty() {
        warnings.push(ExtractWarning::new(
            WarningCode::NoFinancialLines,
            "no financial lines were found in the selected text",
        ));
    }

    let kept = filter_records(&records, &options.evidence);
    let tables = group_tables(kept);
    if tables.is_empty() {
        warnings.push(ExtractWarning::new(
            WarningCode::NoTablesDetected,
            "no lines passed the evidence filter",
        ));
    }

    let structured = tables.iter().map(structure_table).collect::<Vec<_>>();
    for table in structured.iter().filter(|table| table.column_count_mismatch) {
        let mut warning = ExtractWarning::new(
            WarningCode::ColumnCountMismatch,
            format!(
                "rows disagree on value count; shaped to {} column(s)",
                table.column_names.len()
            ),
        )
        .with_table_id(table.table_id);
        if let Some(page) = table
            .rows
            .first()
            .and_then(|row| row.metadata.as_ref())
            .map(|metadata| metadata.page)
        {
            warning = warning.with_page(page);
        }
        warnings.push(warning);
    }

    let statistics = tables.iter().map(table_statistics).collect::<Vec<_>>();
    let summaries = structured.iter().map(table_summary).collect::<Vec<_>>();

    let extraction = DocumentExtraction {
        records,
        tables,
        structured,
        statistics,
        summaries,
        warnings,
    };
    tracing::info!(
        lines = lines.len(),
        records = extraction.records.len(),
        rows = extraction.row_count(),
        tables = extraction.table_count(),
        "extracted document"
    );
    extraction
}

fn fallback_lines(full_text: &str, page_selection: Option<&PageSelection>) -> Vec<SourceLine> {
    split_text_into_pages(full_text)
        .iter()
        .enumerate()
        .filter_map(|(index, text)| {
            let page = u32::try_from(index + 1).ok()?;
            Some((page, text))
        })
        .filter(|(page, _)| page_selection.is_none_or(|selection| selection.contains(*page)))
        .flat_map(|(page, text)| page_lines(page, text).collect::<Vec<_>>())
        .collect()
}

fn extract_from_text(document: &DocumentText, options: &ExtractOptions) -> DocumentExtraction {
    let extraction = run_pipeline(&document.lines, options);
    if !extraction.records.is_empty() || document.kind != DocumentKind::Pdf {
        return extraction;
    }

    let Some(full_text) = document.full_text.as_deref().filter(|text| !text.trim().is_empty())
    else {
        return extraction;
    };
    let lines = fallback_lines(full_text, options.pages.as_ref());
    let mut fallback = run_pipeline(&lines, options);
    if fallback.records.is_empty() {
        return extraction;
    }

    fallback.warnings.push(ExtractWarning::new(
        WarningCode::PdfTextFallback,
        "no financial lines in page-level text; retried with document-level text extraction",
    ));
    fallback
}

pub fn extract_document(
    input: &Path,
    options: &ExtractOptions,
) -> Result<DocumentExtraction, ExtractError> {
    validate_options(options)?;
    let document = read_document_lines(input, options.pages.as_ref())?;
    Ok(extract_from_text(&document, options))
}

pub fn extract_document_bytes(
    bytes: &[u8],
    kind: DocumentKind,
    options: &ExtractOptions,
) -> Result<DocumentExtraction, ExtractError> {
    validate_options(options)?;
    let document = read_document_bytes(bytes, kind, options.pages.as_ref())?;
    Ok(extract_from_text(&document, options))
}

/// Hands every output sheet of `extraction` to `sink`, in order.
pub fn write_extraction<S: TabularSink>(
    extraction: &DocumentExtraction,
    sink: &mut S,
) -> Result<(), ExtractError> {
    for sheet in extraction_sheets(extraction)? {
        sink.write_sheet(&sheet)?;
    }
    Ok(())
}

/// Extracts `input` and writes one CSV per sheet into `output_dir`, named
/// after the input's file stem.
pub fn extract_document_to_csv(
    input: &Path,
    output_dir: &Path,
    options: &ExtractOptions,
) -> Result<ExtractionReport, ExtractError> {
    let extraction = extract_document(input, options)?;
    let stem = input
        .file_stem()
        .map_or_else(|| "document".to_string(), |stem| stem.to_string_lossy().into_owned());

    let mut sink = CsvDirectorySink::new(output_dir, &stem, options.delimiter)?;
    write_extraction(&extraction, &mut sink)?;

    Ok(ExtractionReport {
        row_count: extraction.row_count(),
        table_count: extraction.table_count(),
        written: sink.written().to_vec(),
        warnings: extraction.warnings,
    })
}
