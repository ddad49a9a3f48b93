use std::collections::BTreeSet;

use crate::DocumentExtraction;
use crate::error::ExtractError;
use crate::model::{LineRecord, LogicalTable, Sheet, StructuredTable};
use crate::summary::{TableStatistics, TableSummary, table_name};

const MAX_SHEET_NAME: usize = 31;
const MAX_JOINED_CHARS: usize = 100;
const FORBIDDEN_SHEET_CHARS: &[char] = &['\\', '/', '*', '?', ':', '[', ']'];

const RECORD_HEADERS: &[&str] = &[
    "Page",
    "Section",
    "Label",
    "Raw_Line",
    "Regular_Numbers",
    "Excluded_Numbers",
    "All_Numbers",
    "Regular_Count",
    "Excluded_Count",
    "Total_Count",
    "Consecutive_Count",
];

fn headers(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| (*name).to_string()).collect()
}

fn truncate_chars(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}

fn record_cells(record: &LineRecord) -> Result<Vec<String>, ExtractError> {
    Ok(vec![
        record.page.to_string(),
        record.section.clone().unwrap_or_default(),
        record.label.clone(),
        record.raw_line.clone(),
        serde_json::to_string(&record.regular_numbers)?,
        serde_json::to_string(&record.excluded_numbers)?,
        serde_json::to_string(&record.all_numbers)?,
        record.regular_count.to_string(),
        record.excluded_count.to_string(),
        record.total_count.to_string(),
        record.consecutive_count.to_string(),
    ])
}

/// Every extracted record, before evidence filtering.
pub fn raw_extraction_sheet(records: &[LineRecord]) -> Result<Sheet, ExtractError> {
    let rows = records
        .iter()
        .map(record_cells)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Sheet {
        name: "Raw_Extraction".to_string(),
        headers: headers(RECORD_HEADERS),
        rows,
    })
}

/// Kept records, each prefixed with the number of the table it landed in.
pub fn all_tables_sheet(tables: &[LogicalTable]) -> Result<Sheet, ExtractError> {
    let mut sheet_headers = vec!["Table_Number".to_string()];
    sheet_headers.extend(headers(RECORD_HEADERS));

    let mut rows = Vec::new();
    for table in tables {
        for record in &table.records {
            let mut row = vec![table.table_id.to_string()];
            row.extend(record_cells(record)?);
            rows.push(row);
        }
    }

    Ok(Sheet {
        name: "All_Tables".to_string(),
        headers: sheet_headers,
        rows,
    })
}

#[must_use]
pub fn statistics_sheet(statistics: &[TableStatistics]) -> Sheet {
    let rows = statistics
        .iter()
        .map(|stats| {
            vec![
                stats.table_number.to_string(),
                stats.row_count.to_string(),
                stats.regular_count.to_string(),
                stats.consecutive_count.to_string(),
                stats.counts_match.to_string(),
                stats.section_count().to_string(),
                stats.page_count().to_string(),
                truncate_chars(&stats.sections.join(", "), MAX_JOINED_CHARS),
                truncate_chars(&stats.sample_labels.join(", "), MAX_JOINED_CHARS),
            ]
        })
        .collect();

    Sheet {
        name: "Table_Statistics".to_string(),
        headers: headers(&[
            "Table_Number",
            "Row_Count",
            "Regular_Count",
            "Consecutive_Count",
            "Counts_Match",
            "Section_Count",
            "Page_Count",
            "Sections",
            "Sample_Labels",
        ]),
        rows,
    }
}

/// One structured table: `Line Item`, then each value column followed by its
/// parsed `<col>_Num` twin, then a `_metadata` JSON object.
pub fn structured_table_sheet(table: &StructuredTable) -> Result<Sheet, ExtractError> {
    let mut sheet_headers = vec!["Line Item".to_string()];
    for column in &table.column_names {
        sheet_headers.push(column.clone());
        sheet_headers.push(format!("{column}_Num"));
    }
    sheet_headers.push("_metadata".to_string());

    let mut rows = Vec::with_capacity(table.rows.len());
    for structured in &table.rows {
        let mut row = Vec::with_capacity(sheet_headers.len());
        row.push(structured.line_item.clone());
        for (_, cell) in &structured.cells {
            row.push(cell.raw.clone());
            row.push(cell.numeric.map(|value| value.to_string()).unwrap_or_default());
        }
        row.push(match &structured.metadata {
            Some(metadata) => serde_json::to_string(metadata)?,
            None => String::new(),
        });
        rows.push(row);
    }

    Ok(Sheet {
        name: table_name(table.table_id),
        headers: sheet_headers,
        rows,
    })
}

#[must_use]
pub fn summary_sheet(summaries: &[TableSummary]) -> Sheet {
    let rows = summaries
        .iter()
        .map(|summary| {
            vec![
                summary.table_name.clone(),
                summary.rows.to_string(),
                summary.value_columns.to_string(),
                summary.column_names.join(", "),
                summary.sample_line_item.clone(),
                summary.sample_value.clone(),
            ]
        })
        .collect();

    Sheet {
        name: "Summary".to_string(),
        headers: headers(&[
            "Table_Name",
            "Rows",
            "Value_Columns",
            "Column_Names",
            "Sample_Line_Item",
            "Sample_Value",
        ]),
        rows,
    }
}

/// Strips characters spreadsheet tools reject, caps the length and appends
/// `_<n>` until the name is unused.
pub fn sanitize_sheet_name(name: &str, used: &mut BTreeSet<String>) -> String {
    let cleaned = name
        .chars()
        .filter(|ch| !FORBIDDEN_SHEET_CHARS.contains(ch))
        .collect::<String>();
    let cleaned = cleaned.trim();
    let base = if cleaned.is_empty() { "Sheet" } else { cleaned };

    let mut candidate = truncate_chars(base, MAX_SHEET_NAME);
    let mut counter = 1_usize;
    while used.contains(&candidate) {
        let suffix = format!("_{counter}");
        let keep = MAX_SHEET_NAME.saturating_sub(suffix.chars().count());
        candidate = format!("{}{suffix}", truncate_chars(base, keep));
        counter += 1;
    }

    used.insert(candidate.clone());
    candidate
}

/// All output sheets for one document, in emission order, with sanitized and
/// unique names.
pub fn extraction_sheets(extraction: &DocumentExtraction) -> Result<Vec<Sheet>, ExtractError> {
    let mut sheets = vec![
        raw_extraction_sheet(&extraction.records)?,
        all_tables_sheet(&extraction.tables)?,
        statistics_sheet(&extraction.statistics),
    ];
    for table in &extraction.structured {
        sheets.push(structured_table_sheet(table)?);
    }
    sheets.push(summary_sheet(&extraction.summaries));

    let mut used = BTreeSet::new();
    for sheet in &mut sheets {
        sheet.name = sanitize_sheet_name(&sheet.name, &mut used);
    }
    Ok(sheets)
}
