//! Number-token discovery and regular/excluded classification.
//!
//! A token is any `(`-optional, sign/currency-prefixed, comma-grouped number with
//! an optional fraction, closing parenthesis and unit suffix. `bps` and `%` may
//! follow a space ("30 bps", "14.2 %"); `k`, `m` and `b` must be glued to the
//! digits so "2024 budget" stays a bare year. Tokens that sit inside a
//! configured exclusion phrase ("Tier 1", "Q3") and whose digits belong to that
//! phrase are label parts, not data.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::rules::RuleSet;

pub(crate) static NUMBER_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\(?-?\$?\d+(?:,\d+)*(?:\.\d+)?\)?(?:\s*bps\b|\s*%|[kmb]\b)?")
        .expect("hardcoded number token regex is valid")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberToken {
    pub text: String,
    /// Byte offset of the first character in the scanned text.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NumberScan {
    pub regular: Vec<NumberToken>,
    pub excluded: Vec<NumberToken>,
    pub all: Vec<NumberToken>,
}

impl NumberScan {
    #[must_use]
    pub fn regular_strings(&self) -> Vec<String> {
        token_strings(&self.regular)
    }

    #[must_use]
    pub fn excluded_strings(&self) -> Vec<String> {
        token_strings(&self.excluded)
    }

    #[must_use]
    pub fn all_strings(&self) -> Vec<String> {
        token_strings(&self.all)
    }
}

fn token_strings(tokens: &[NumberToken]) -> Vec<String> {
    tokens.iter().map(|token| token.text.clone()).collect()
}

struct ExclusionSpan<'a> {
    start: usize,
    end: usize,
    digits: &'a BTreeSet<String>,
}

fn phrase_occurrences(haystack: &str, phrase: &str) -> Vec<usize> {
    let mut out = Vec::new();
    if phrase.is_empty() {
        return out;
    }

    let mut from = 0;
    while let Some(offset) = haystack[from..].find(phrase) {
        let start = from + offset;
        out.push(start);
        from = start + haystack[start..].chars().next().map_or(1, char::len_utf8);
    }
    out
}

fn exclusion_spans<'a>(text: &str, rules: &'a RuleSet) -> Vec<ExclusionSpan<'a>> {
    // ASCII lowering keeps byte offsets aligned with `text`.
    let lowered = text.to_ascii_lowercase();
    let mut spans = Vec::new();
    for (phrase, digits) in rules.exclusion_phrases() {
        for start in phrase_occurrences(&lowered, phrase) {
            spans.push(ExclusionSpan {
                start,
                end: start + phrase.len(),
                digits,
            });
        }
    }
    spans
}

pub(crate) fn digit_content(token: &str) -> String {
    token.chars().filter(char::is_ascii_digit).collect()
}

/// Finds every number token in `text` and splits them into regular and
/// excluded tokens according to `rules`.
#[must_use]
pub fn scan_numbers(text: &str, rules: &RuleSet) -> NumberScan {
    let spans = exclusion_spans(text, rules);
    let mut scan = NumberScan::default();

    for found in NUMBER_TOKEN.find_iter(text) {
        let token = NumberToken {
            text: found.as_str().to_string(),
            start: found.start(),
            end: found.end(),
        };
        let digits = digit_content(&token.text);
        let excluded = spans.iter().any(|span| {
            token.start >= span.start && token.end <= span.end && span.digits.contains(&digits)
        });

        scan.all.push(token.clone());
        if excluded {
            scan.excluded.push(token);
        } else {
            scan.regular.push(token);
        }
    }

    scan
}
