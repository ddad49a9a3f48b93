//! Measures how tightly a line's regular numbers are packed together.
//!
//! Each number is located in the text by byte span, spans are ordered by
//! offset, and the answer is the longest chain of neighbouring spans whose gaps
//! contain only whitespace.

use crate::number_scan::{NUMBER_TOKEN, NumberToken};

type Span = (usize, usize);

fn overlaps(claimed: &[Span], start: usize, end: usize) -> bool {
    claimed
        .iter()
        .any(|&(claimed_start, claimed_end)| start < claimed_end && claimed_start < end)
}

/// First whole number token equal to `number` that is not already claimed,
/// falling back to the first unclaimed raw substring occurrence.
fn locate(text: &str, number: &str, tokens: &[Span], claimed: &[Span]) -> Option<Span> {
    let whole_token = tokens.iter().copied().find(|&(start, end)| {
        &text[start..end] == number && !overlaps(claimed, start, end)
    });
    if whole_token.is_some() {
        return whole_token;
    }

    text.match_indices(number)
        .map(|(start, found)| (start, start + found.len()))
        .find(|&(start, end)| !overlaps(claimed, start, end))
}

fn longest_whitespace_run(text: &str, spans: &[Span]) -> usize {
    let mut best = usize::from(!spans.is_empty());
    let mut run = best;
    for pair in spans.windows(2) {
        let (_, previous_end) = pair[0];
        let (next_start, _) = pair[1];
        let adjacent = previous_end <= next_start
            && text[previous_end..next_start].chars().all(char::is_whitespace);
        run = if adjacent { run + 1 } else { 1 };
        best = best.max(run);
    }
    best
}

/// Same measure as [`count_consecutive`] for tokens whose spans are already
/// known, as produced by [`crate::scan_numbers`] over the same `text`.
#[must_use]
pub fn count_consecutive_tokens(text: &str, tokens: &[NumberToken]) -> usize {
    if tokens.len() <= 1 {
        return tokens.len();
    }

    let mut spans = tokens
        .iter()
        .map(|token| (token.start, token.end))
        .collect::<Vec<_>>();
    spans.sort_unstable();
    longest_whitespace_run(text, &spans)
}

/// Length of the longest run of `regular` numbers that appear next to each
/// other in `text`, separated by nothing but whitespace.
#[must_use]
pub fn count_consecutive<S: AsRef<str>>(text: &str, regular: &[S]) -> usize {
    if regular.len() <= 1 {
        return regular.len();
    }

    let tokens = NUMBER_TOKEN
        .find_iter(text)
        .map(|found| (found.start(), found.end()))
        .collect::<Vec<_>>();

    let mut claimed: Vec<Span> = Vec::with_capacity(regular.len());
    for number in regular {
        let number = number.as_ref();
        if number.is_empty() {
            continue;
        }
        if let Some(span) = locate(text, number, &tokens, &claimed) {
            claimed.push(span);
        }
    }
    claimed.sort_unstable();

    longest_whitespace_run(text, &claimed).clamp(1, regular.len())
}
