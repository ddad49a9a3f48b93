use crate::model::{LineRecord, LogicalTable};

/// Splits `records` into maximal runs that share one
/// `(regular_count, consecutive_count)` signature. Tables are numbered from 1
/// in document order.
#[must_use]
pub fn group_tables(records: Vec<LineRecord>) -> Vec<LogicalTable> {
    let mut tables: Vec<LogicalTable> = Vec::new();
    let mut current: Vec<LineRecord> = Vec::new();

    let flush_current = |rows: &mut Vec<LineRecord>, tables: &mut Vec<LogicalTable>| {
        let Some(first) = rows.first() else {
            return;
        };
        let (regular_count, consecutive_count) = first.signature();
        tables.push(LogicalTable {
            table_id: tables.len() + 1,
            regular_count,
            consecutive_count,
            records: std::mem::take(rows),
        });
    };

    for record in records {
        let same_table = current
            .last()
            .is_none_or(|previous| previous.signature() == record.signature());
        if !same_table {
            flush_current(&mut current, &mut tables);
        }
        current.push(record);
    }

    flush_current(&mut current, &mut tables);
    tracing::debug!(tables = tables.len(), "grouped records into tables");
    tables
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::filter::tests::record;
    use crate::model::{LineRecord, LogicalTable};
    use crate::table_group::group_tables;

    fn with_signature(regular: usize, consecutive: usize) -> LineRecord {
        let values = vec!["1"; regular];
        record("Item", &values, consecutive)
    }

    fn flatten(tables: Vec<LogicalTable>) -> Vec<LineRecord> {
        tables.into_iter().flat_map(|table| table.records).collect()
    }

    #[test]
    fn splits_on_signature_change() {
        let records = [(3, 3), (3, 3), (2, 1), (2, 1), (2, 1)]
            .into_iter()
            .map(|(regular, consecutive)| with_signature(regular, consecutive))
            .collect();
        let tables = group_tables(records);
        let sizes = tables.iter().map(LogicalTable::len).collect::<Vec<_>>();
        assert_eq!(sizes, vec![2, 3]);
        assert_eq!(tables[0].table_id, 1);
        assert_eq!((tables[1].regular_count, tables[1].consecutive_count), (2, 1));
    }

    #[test]
    fn single_record_tables_are_kept() {
        let records = vec![with_signature(3, 3), with_signature(4, 4), with_signature(3, 3)];
        let tables = group_tables(records);
        assert_eq!(tables.len(), 3);
        assert!(tables.iter().all(|table| table.len() == 1));
    }

    #[test]
    fn empty_input_yields_no_tables() {
        assert!(group_tables(Vec::new()).is_empty());
    }

    proptest! {
        #[test]
        fn grouping_conserves_records_and_is_idempotent(
            signatures in prop::collection::vec((0usize..4, 0usize..4), 0..40)
        ) {
            let records = signatures
                .iter()
                .map(|&(regular, consecutive)| with_signature(regular, consecutive))
                .collect::<Vec<_>>();
            let tables = group_tables(records.clone());
            prop_assert_eq!(tables.iter().map(LogicalTable::len).sum::<usize>(), records.len());

            let sizes = tables.iter().map(LogicalTable::len).collect::<Vec<_>>();
            let regrouped = group_tables(flatten(tables));
            let regrouped_sizes = regrouped.iter().map(LogicalTable::len).collect::<Vec<_>>();
            prop_assert_eq!(sizes, regrouped_sizes);
            prop_assert_eq!(flatten(regrouped), records);
        }
    }
}
