use crate::model::{CellValue, LineRecord, LogicalTable, RowMetadata, StructuredRow, StructuredTable};
use crate::value_parse::parse_value;

/// Most frequent number of regular values across `records`. Ties go to the
/// count seen first.
#[must_use]
pub fn modal_value_count(records: &[LineRecord]) -> usize {
    let mut freq: Vec<(usize, usize)> = Vec::new();
    for count in records.iter().map(|record| record.regular_numbers.len()) {
        match freq.iter_mut().find(|(seen, _)| *seen == count) {
            Some((_, hits)) => *hits += 1,
            None => freq.push((count, 1)),
        }
    }

    let mut best: Option<(usize, usize)> = None;
    for (count, hits) in freq {
        if best.is_none_or(|(_, best_hits)| hits > best_hits) {
            best = Some((count, hits));
        }
    }
    best.map_or(0, |(count, _)| count)
}

#[must_use]
pub fn column_names(column_count: usize) -> Vec<String> {
    let fixed: &[&str] = match column_count {
        2 => &["Current", "Prior"],
        3 => &["Current", "Prior", "Change"],
        4 => &["Q1", "Q2", "Q3", "Q4"],
        _ => {
            return (1..=column_count)
                .map(|index| format!("Value{index}"))
                .collect();
        }
    };
    fixed.iter().map(|name| (*name).to_string()).collect()
}

fn title_case_word(word: &str) -> String {
    let has_letters = word.chars().any(char::is_alphabetic);
    let is_acronym = has_letters
        && word
            .chars()
            .filter(|ch| ch.is_alphabetic())
            .all(char::is_uppercase);
    if word.starts_with(|ch: char| ch.is_ascii_digit()) || is_acronym {
        return word.to_string();
    }

    let mut out = String::with_capacity(word.len());
    let mut after_letter = false;
    for ch in word.chars() {
        if ch.is_alphabetic() {
            if after_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            after_letter = true;
        } else {
            out.push(ch);
            after_letter = false;
        }
    }
    out
}

/// Presentation form of a record label: trailing separators removed and
/// words title-cased, leaving acronyms and numbers alone.
#[must_use]
pub fn clean_line_item(label: &str) -> String {
    label
        .trim()
        .trim_end_matches(|ch: char| ch.is_whitespace() || matches!(ch, ':' | ';' | ',' | '-'))
        .split_whitespace()
        .map(title_case_word)
        .collect::<Vec<_>>()
        .join(" ")
}

fn structure_row(record: &LineRecord, column_names: &[String]) -> StructuredRow {
    let cells = column_names
        .iter()
        .enumerate()
        .map(|(index, name)| {
            let value = record.regular_numbers.get(index).map_or("", String::as_str);
            let (numeric, raw) = parse_value(value);
            (name.clone(), CellValue { raw, numeric })
        })
        .collect();

    StructuredRow {
        line_item: clean_line_item(&record.label),
        cells,
        metadata: Some(RowMetadata {
            page: record.page,
            section: record.section.clone(),
        }),
    }
}

/// Shapes one logical table into rows with a fixed column scheme.
#[must_use]
pub fn structure_table(table: &LogicalTable) -> StructuredTable {
    let column_count = modal_value_count(&table.records);
    let column_count_mismatch = table
        .records
        .iter()
        .any(|record| record.regular_numbers.len() != column_count);
    if column_count_mismatch {
        tracing::warn!(
            table_id = table.table_id,
            column_count,
            "records disagree on value count; using the most common count"
        );
    }

    let column_names = column_names(column_count);
    let rows = table
        .records
        .iter()
        .map(|record| structure_row(record, &column_names))
        .collect();

    StructuredTable {
        table_id: table.table_id,
        column_names,
        rows,
        column_count_mismatch,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::filter::tests::record;
    use crate::model::LogicalTable;
    use crate::table_structure::{
        clean_line_item, column_names, modal_value_count, structure_table,
    };

    fn table(records: Vec<crate::model::LineRecord>) -> LogicalTable {
        LogicalTable {
            table_id: 7,
            regular_count: records.first().map_or(0, |r| r.regular_count),
            consecutive_count: records.first().map_or(0, |r| r.consecutive_count),
            records,
        }
    }

    #[test]
    fn names_columns_by_count() {
        assert_eq!(column_names(2), vec!["Current", "Prior"]);
        assert_eq!(column_names(3), vec!["Current", "Prior", "Change"]);
        assert_eq!(column_names(4), vec!["Q1", "Q2", "Q3", "Q4"]);
        assert_eq!(
            column_names(5),
            vec!["Value1", "Value2", "Value3", "Value4", "Value5"]
        );
        assert_eq!(column_names(1), vec!["Value1"]);
        assert!(column_names(0).is_empty());
    }

    #[test]
    fn modal_count_prefers_first_seen_on_ties() {
        let records = vec![
            record("a", &["1", "2"], 2),
            record("b", &["1", "2", "3"], 3),
            record("c", &["1", "2", "3"], 3),
            record("d", &["1", "2"], 2),
        ];
        assert_eq!(modal_value_count(&records), 2);
        assert_eq!(modal_value_count(&records[1..]), 3);
        assert_eq!(modal_value_count(&[]), 0);
    }

    #[test]
    fn structures_rows_with_raw_and_numeric_cells() {
        let structured = structure_table(&table(vec![
            record("operating income", &["5,147", "4,904", "5%"], 3),
            record("profit before tax", &["(1,234.50)", "n/a", "120bps"], 3),
        ]));

        assert_eq!(structured.table_id, 7);
        assert_eq!(structured.column_names, vec!["Current", "Prior", "Change"]);
        assert!(!structured.column_count_mismatch);

        let first = &structured.rows[0];
        assert_eq!(first.line_item, "Operating Income");
        let current = first.cell("Current").expect("current cell");
        assert_eq!(current.raw, "5,147");
        assert_eq!(current.numeric, Some(5147.0));

        let second = &structured.rows[1];
        assert_eq!(second.cell("Current").and_then(|c| c.numeric), Some(-1234.5));
        assert_eq!(second.cell("Prior").map(|c| c.raw.as_str()), Some("n/a"));
        assert_eq!(second.cell("Prior").and_then(|c| c.numeric), None);
        assert_eq!(
            second.metadata.as_ref().map(|m| m.page),
            Some(1)
        );
    }

    #[test]
    fn pads_and_truncates_mismatched_records() {
        let structured = structure_table(&table(vec![
            record("a", &["1", "2"], 2),
            record("b", &["3", "4"], 2),
            record("c", &["5"], 1),
            record("d", &["6", "7", "8"], 3),
        ]));

        assert!(structured.column_count_mismatch);
        assert_eq!(structured.column_names, vec!["Current", "Prior"]);
        let short = &structured.rows[2];
        assert_eq!(short.cell("Prior").map(|c| c.raw.as_str()), Some(""));
        assert_eq!(short.cell("Prior").and_then(|c| c.numeric), None);
        let long = &structured.rows[3];
        assert_eq!(long.cells.len(), 2);
        assert_eq!(long.cell("Prior").map(|c| c.raw.as_str()), Some("7"));
    }

    #[test]
    fn empty_labels_are_still_emitted() {
        let structured = structure_table(&table(vec![record("", &["1", "2", "3"], 3)]));
        assert_eq!(structured.rows.len(), 1);
        assert_eq!(structured.rows[0].line_item, "");
    }

    #[test]
    fn cleans_line_items() {
        assert_eq!(clean_line_item("net interest income:"), "Net Interest Income");
        assert_eq!(clean_line_item("CET1 ratio -"), "CET1 Ratio");
        assert_eq!(clean_line_item("non-interest income"), "Non-Interest Income");
        assert_eq!(clean_line_item("2024 revenue"), "2024 Revenue");
        assert_eq!(clean_line_item("   "), "");
    }
}
