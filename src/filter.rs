use crate::model::LineRecord;

/// Which extracted records count as table rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvidencePolicy {
    /// Fewest regular numbers a record must carry.
    pub min_regular_count: usize,
    /// Require every regular number to sit in one whitespace-separated run.
    pub require_consecutive: bool,
}

impl Default for EvidencePolicy {
    fn default() -> Self {
        Self {
            min_regular_count: 3,
            require_consecutive: true,
        }
    }
}

impl EvidencePolicy {
    #[must_use]
    pub fn accepts(&self, record: &LineRecord) -> bool {
        record.regular_count >= self.min_regular_count
            && (!self.require_consecutive || record.regular_count == record.consecutive_count)
    }
}

#[must_use]
pub fn filter_records(records: &[LineRecord], policy: &EvidencePolicy) -> Vec<LineRecord> {
    let kept = records
        .iter()
        .filter(|record| policy.accepts(record))
        .cloned()
        .collect::<Vec<_>>();

    tracing::debug!(
        total = records.len(),
        kept = kept.len(),
        min_regular_count = policy.min_regular_count,
        require_consecutive = policy.require_consecutive,
        "filtered records by evidence"
    );
    kept
}

#[cfg(test)]
pub(crate) mod tests {
    use crate::filter::{EvidencePolicy, filter_records};
    use crate::model::LineRecord;

    pub(crate) fn record(label: &str, regular: &[&str], consecutive_count: usize) -> LineRecord {
        let regular_numbers = regular.iter().map(|value| (*value).to_string()).collect::<Vec<_>>();
        LineRecord {
            page: 1,
            section: None,
            label: label.to_string(),
            raw_line: format!("{label} {}", regular.join(" ")),
            regular_count: regular_numbers.len(),
            excluded_count: 0,
            total_count: regular_numbers.len(),
            consecutive_count,
            all_numbers: regular_numbers.clone(),
            excluded_numbers: Vec::new(),
            regular_numbers,
        }
    }

    #[test]
    fn keeps_consistent_records_with_enough_values() {
        let records = vec![
            record("Revenue", &["1", "2", "3"], 3),
            record("Costs", &["1", "2", "3"], 2),
            record("Margin", &["1", "2"], 2),
            record("Assets", &["4", "5", "6", "7"], 4),
        ];
        let kept = filter_records(&records, &EvidencePolicy::default());
        let labels = kept.iter().map(|r| r.label.as_str()).collect::<Vec<_>>();
        assert_eq!(labels, vec!["Revenue", "Assets"]);
    }

    #[test]
    fn relaxed_policy_keeps_scattered_values() {
        let policy = EvidencePolicy {
            min_regular_count: 2,
            require_consecutive: false,
        };
        let records = vec![
            record("Costs", &["1", "2", "3"], 1),
            record("Note", &["9"], 1),
        ];
        assert_eq!(filter_records(&records, &policy).len(), 1);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(filter_records(&[], &EvidencePolicy::default()).is_empty());
    }
}
