const SENTINELS: &[&str] = &["-", "nm", "n/a", "na", "n.a."];

fn keep_numeric_chars(value: &str) -> String {
    value
        .chars()
        .filter(|&ch| ch.is_ascii_digit() || matches!(ch, '.' | '-'))
        .collect()
}

fn parse_plain(value: &str) -> Option<f64> {
    let value = value.trim();
    let is_plain = !value.is_empty()
        && value.chars().any(|ch| ch.is_ascii_digit())
        && value
            .chars()
            .all(|ch| ch.is_ascii_digit() || matches!(ch, '.' | '-'));
    if !is_plain {
        return None;
    }
    value.parse::<f64>().ok()
}

fn unit_multiplier(value: &str) -> (f64, &str) {
    let Some(last) = value.chars().next_back() else {
        return (1.0, value);
    };
    let multiplier = match last.to_ascii_lowercase() {
        'k' => 1e3,
        'm' => 1e6,
        'b' => 1e9,
        _ => return (1.0, value),
    };
    (multiplier, &value[..value.len() - last.len_utf8()])
}

/// Converts a display value such as `5,147`, `(1.2)`, `3.4%`, `120bps` or
/// `2.1m` into a number.
///
/// Returns the numeric value (`None` when the text is blank, a sentinel like
/// `n/a`, or not a number) together with the trimmed original text.
#[must_use]
pub fn parse_value(display: &str) -> (Option<f64>, String) {
    let original = display.trim().to_string();
    if original.is_empty() || SENTINELS.contains(&original.to_ascii_lowercase().as_str()) {
        return (None, original);
    }

    let mut working = original.clone();
    if working.len() >= 2 && working.starts_with('(') && working.ends_with(')') {
        working = format!("-{}", &working[1..working.len() - 1]);
    }

    let lowered = working.to_ascii_lowercase();
    if let Some(stripped) = lowered.strip_suffix("bps") {
        let numeric = parse_plain(&keep_numeric_chars(stripped)).map(|value| value / 10_000.0);
        return (numeric, original);
    }

    if let Some(stripped) = working.strip_suffix('%') {
        let numeric = parse_plain(&keep_numeric_chars(stripped)).map(|value| value / 100.0);
        return (numeric, original);
    }

    let cleaned = working.replace(['$', ','], "");
    let (multiplier, digits) = unit_multiplier(cleaned.trim());
    let numeric = parse_plain(digits).map(|value| value * multiplier);
    (numeric, original)
}

#[cfg(test)]
mod tests {
    use crate::value_parse::parse_value;

    fn assert_close(actual: Option<f64>, expected: f64) {
        let actual = actual.expect("value should parse");
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn parses_bracketed_negative_with_grouping() {
        let (numeric, display) = parse_value("(1,234.50)");
        assert_close(numeric, -1234.5);
        assert_eq!(display, "(1,234.50)");
    }

    #[test]
    fn converts_percent_and_basis_points() {
        assert_close(parse_value("3.4%").0, 0.034);
        assert_close(parse_value("120bps").0, 0.012);
        assert_close(parse_value("45BPS").0, 0.0045);
        assert_close(parse_value("(2.5%)").0, -0.025);
    }

    #[test]
    fn unit_suffix_after_a_space_still_scales() {
        assert_close(parse_value("30 bps").0, 0.003);
        assert_close(parse_value("14.2 %").0, 0.142);
        assert_eq!(parse_value("30 bps").1, "30 bps");
    }

    #[test]
    fn applies_unit_multipliers() {
        assert_close(parse_value("2.1m").0, 2_100_000.0);
        assert_close(parse_value("$3k").0, 3_000.0);
        assert_close(parse_value("1.5B").0, 1_500_000_000.0);
        assert_close(parse_value("5,147").0, 5147.0);
        assert_close(parse_value("-$7").0, -7.0);
    }

    #[test]
    fn sentinels_and_blanks_have_no_value() {
        for value in ["n/a", "N/A", "nm", "NA", "n.a.", "-", "", "   "] {
            let (numeric, _) = parse_value(value);
            assert_eq!(numeric, None, "value {value:?}");
        }
        assert_eq!(parse_value("n/a"), (None, "n/a".to_string()));
    }

    #[test]
    fn non_numeric_residue_is_not_a_value() {
        assert_eq!(parse_value("abc"), (None, "abc".to_string()));
        assert_eq!(parse_value("1.2.3").0, None);
        assert_eq!(parse_value("inf").0, None);
        assert_eq!(parse_value("bps").0, None);
        assert_eq!(parse_value("()").0, None);
    }
}
