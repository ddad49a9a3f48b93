use serde::Serialize;

/// One line of document text as produced by a document reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    pub page: u32,
    pub text: String,
}

impl SourceLine {
    #[must_use]
    pub fn new(page: u32, text: impl Into<String>) -> Self {
        Self {
            page,
            text: text.into(),
        }
    }
}

/// A candidate financial fact extracted from a single source line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineRecord {
    pub page: u32,
    pub section: Option<String>,
    pub label: String,
    pub raw_line: String,
    pub regular_numbers: Vec<String>,
    pub excluded_numbers: Vec<String>,
    pub all_numbers: Vec<String>,
    pub regular_count: usize,
    pub excluded_count: usize,
    pub total_count: usize,
    pub consecutive_count: usize,
}

impl LineRecord {
    /// The `(regular_count, consecutive_count)` pair tables are grouped by.
    #[must_use]
    pub fn signature(&self) -> (usize, usize) {
        (self.regular_count, self.consecutive_count)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalTable {
    pub table_id: usize,
    pub regular_count: usize,
    pub consecutive_count: usize,
    pub records: Vec<LineRecord>,
}

impl LogicalTable {
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CellValue {
    pub raw: String,
    pub numeric: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowMetadata {
    pub page: u32,
    pub section: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructuredRow {
    pub line_item: String,
    pub cells: Vec<(String, CellValue)>,
    pub metadata: Option<RowMetadata>,
}

impl StructuredRow {
    #[must_use]
    pub fn cell(&self, column: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructuredTable {
    pub table_id: usize,
    pub column_names: Vec<String>,
    pub rows: Vec<StructuredRow>,
    pub column_count_mismatch: bool,
}

/// A named matrix handed to a [`crate::TabularSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}
