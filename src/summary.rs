//! Per-table reporting layered on top of grouping and structuring.

use crate::model::{LogicalTable, StructuredTable};

const SAMPLE_LABELS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableStatistics {
    pub table_number: usize,
    pub row_count: usize,
    pub regular_count: usize,
    pub consecutive_count: usize,
    pub counts_match: bool,
    pub sections: Vec<String>,
    pub pages: Vec<u32>,
    pub sample_labels: Vec<String>,
}

impl TableStatistics {
    #[must_use]
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSummary {
    pub table_name: String,
    pub rows: usize,
    pub value_columns: usize,
    pub column_names: Vec<String>,
    pub sample_line_item: String,
    pub sample_value: String,
}

#[must_use]
pub fn table_statistics(table: &LogicalTable) -> TableStatistics {
    let mut sections: Vec<String> = Vec::new();
    let mut pages: Vec<u32> = Vec::new();
    for record in &table.records {
        if let Some(section) = record.section.as_deref().filter(|s| !s.is_empty()) {
            if !sections.iter().any(|seen| seen == section) {
                sections.push(section.to_string());
            }
        }
        if !pages.contains(&record.page) {
            pages.push(record.page);
        }
    }

    TableStatistics {
        table_number: table.table_id,
        row_count: table.len(),
        regular_count: table.regular_count,
        consecutive_count: table.consecutive_count,
        counts_match: table.regular_count == table.consecutive_count,
        sections,
        pages,
        sample_labels: table
            .records
            .iter()
            .take(SAMPLE_LABELS)
            .map(|record| record.label.clone())
            .collect(),
    }
}

#[must_use]
pub fn table_name(table_id: usize) -> String {
    format!("Table_{table_id}")
}

#[must_use]
pub fn table_summary(table: &StructuredTable) -> TableSummary {
    let first = table.rows.first();
    TableSummary {
        table_name: table_name(table.table_id),
        rows: table.rows.len(),
        value_columns: table.column_names.len(),
        column_names: table.column_names.clone(),
        sample_line_item: first.map(|row| row.line_item.clone()).unwrap_or_default(),
        sample_value: first
            .and_then(|row| row.cells.first())
            .map(|(_, cell)| cell.raw.clone())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use crate::filter::tests::record;
    use crate::model::LogicalTable;
    use crate::summary::{table_statistics, table_summary};
    use crate::table_structure::structure_table;

    fn sample_table() -> LogicalTable {
        let mut first = record("Revenue", &["10", "9", "1"], 3);
        first.section = Some("Income Statement".to_string());
        let mut second = record("Costs", &["5", "4", "1"], 3);
        second.section = Some("Income Statement".to_string());
        second.page = 2;
        let third = record("Other", &["1", "1", "0"], 3);
        LogicalTable {
            table_id: 4,
            regular_count: 3,
            consecutive_count: 3,
            records: vec![first, second, third],
        }
    }

    #[test]
    fn collects_unique_sections_pages_and_samples() {
        let stats = table_statistics(&sample_table());
        assert_eq!(stats.table_number, 4);
        assert_eq!(stats.row_count, 3);
        assert!(stats.counts_match);
        assert_eq!(stats.sections, vec!["Income Statement"]);
        assert_eq!(stats.pages, vec![1, 2]);
        assert_eq!(stats.section_count(), 1);
        assert_eq!(stats.page_count(), 2);
        assert_eq!(stats.sample_labels, vec!["Revenue", "Costs", "Other"]);
    }

    #[test]
    fn summarizes_structured_table() {
        let summary = table_summary(&structure_table(&sample_table()));
        assert_eq!(summary.table_name, "Table_4");
        assert_eq!(summary.rows, 3);
        assert_eq!(summary.value_columns, 3);
        assert_eq!(summary.column_names, vec!["Current", "Prior", "Change"]);
        assert_eq!(summary.sample_line_item, "Revenue");
        assert_eq!(summary.sample_value, "10");
    }
}
