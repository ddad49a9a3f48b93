use std::sync::LazyLock;

use regex::Regex;

use crate::consecutive::count_consecutive_tokens;
use crate::model::{LineRecord, SourceLine};
use crate::number_scan::{NumberScan, scan_numbers};
use crate::rules::RuleSet;

static LINE_ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([^:\d]+?):\s*(.+)$").expect("hardcoded line item regex is valid")
});

const MAX_HEADING_WORDS: usize = 6;
const MAX_HEADING_CHARS: usize = 80;

/// A kept line, split into label and scanned values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLine {
    pub label: String,
    pub raw_line: String,
    pub numbers: NumberScan,
    pub consecutive_count: usize,
}

impl ClassifiedLine {
    #[must_use]
    pub fn into_record(self, page: u32, section: Option<String>) -> LineRecord {
        let regular_numbers = self.numbers.regular_strings();
        let excluded_numbers = self.numbers.excluded_strings();
        let all_numbers = self.numbers.all_strings();
        LineRecord {
            page,
            section,
            label: self.label,
            raw_line: self.raw_line,
            regular_count: regular_numbers.len(),
            excluded_count: excluded_numbers.len(),
            total_count: all_numbers.len(),
            consecutive_count: self.consecutive_count,
            regular_numbers,
            excluded_numbers,
            all_numbers,
        }
    }
}

/// Collapses whitespace runs and folds en/em dashes to `-`.
#[must_use]
pub fn clean_text(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .replace(['\u{2013}', '\u{2014}'], "-")
}

fn clean_label(label: &str) -> String {
    label
        .chars()
        .filter(|&ch| ch.is_ascii_alphanumeric() || matches!(ch, ' ' | '-' | '(' | ')' | '[' | ']'))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Decides whether `line` carries a financial fact and, if so, splits it into
/// a label and the numbers that follow it.
#[must_use]
pub fn classify_line(line: &str, rules: &RuleSet) -> Option<ClassifiedLine> {
    let line = clean_text(line);
    if line.is_empty() {
        return None;
    }

    let colon_split = LINE_ITEM.captures(&line).and_then(|captures| {
        let label = captures.get(1)?.as_str();
        let values = captures.get(2)?.as_str();
        Some((label.to_string(), values.to_string()))
    });
    let line_scan = scan_numbers(&line, rules);

    let keep = colon_split.is_some()
        || rules.mentions_financial_term(&line.to_lowercase())
        || line_scan.regular.len() >= 2;
    if !keep {
        return None;
    }

    let (label, numbers, consecutive_count) = match colon_split {
        Some((label, values)) => {
            let numbers = scan_numbers(&values, rules);
            let consecutive = count_consecutive_tokens(&values, &numbers.regular);
            (label.trim().to_string(), numbers, consecutive)
        }
        None => {
            let label = line_scan.regular.first().map_or(line.as_str(), |first| {
                line[..first.start].trim_end_matches(|ch: char| {
                    ch.is_whitespace() || matches!(ch, ':' | '-')
                })
            });
            let label = label.to_string();
            let consecutive = count_consecutive_tokens(&line, &line_scan.regular);
            (label, line_scan, consecutive)
        }
    };

    let label = clean_label(&label);
    if label.is_empty() && numbers.regular.is_empty() {
        return None;
    }

    Some(ClassifiedLine {
        label,
        raw_line: line,
        numbers,
        consecutive_count,
    })
}

/// A short, digit-free, title-like line that is not itself a financial line.
#[must_use]
pub fn looks_like_section_heading(line: &str) -> bool {
    let line = line.trim();
    if line.is_empty() || line.chars().count() > MAX_HEADING_CHARS {
        return false;
    }
    if line.chars().any(|ch| ch.is_ascii_digit()) {
        return false;
    }
    if line.split_whitespace().count() > MAX_HEADING_WORDS {
        return false;
    }
    let looks_like_sentence = ['.', '!', '?', ','].iter().any(|end| line.ends_with(*end));
    if looks_like_sentence {
        return false;
    }

    line.chars()
        .find(|ch| ch.is_alphabetic())
        .is_some_and(char::is_uppercase)
}

/// Runs line classification over a document, tracking the most recent
/// section heading for every kept line.
#[must_use]
pub fn extract_records(lines: &[SourceLine], rules: &RuleSet) -> Vec<LineRecord> {
    let mut records = Vec::new();
    let mut section: Option<String> = None;

    for source in lines {
        match classify_line(&source.text, rules) {
            Some(classified) => records.push(classified.into_record(source.page, section.clone())),
            None => {
                let cleaned = clean_text(&source.text);
                if looks_like_section_heading(&cleaned) {
                    section = Some(cleaned.trim_end_matches(':').trim().to_string());
                }
            }
        }
    }

    tracing::debug!(
        lines = lines.len(),
        records = records.len(),
        "classified document lines"
    );
    records
}
