//! Monetary token normalization for Brazilian-locale statements and
//! receipts. Tokens arrive with currency symbols, thousands separators and
//! sign markers in any mix; the output is always a non-negative magnitude.
//! Income/expense classification is the extractor's job, not this module's.

/// Parse a free-form monetary token into a non-negative magnitude.
///
/// Comma/period roles follow pt-BR conventions: `1.234,56` and `1234,56`
/// both parse to 1234.56. A lone period is treated as a decimal point only
/// when followed by exactly two digits, otherwise as a thousands separator.
/// Any failure yields 0.0; this function never errors out of the pipeline.
pub fn parse_amount(raw: &str) -> f64 {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '+' | '-'))
        .collect();
    let unsigned = kept.replace(['+', '-'], "");

    let has_comma = unsigned.contains(',');
    let has_period = unsigned.contains('.');

    let normalized = if has_comma && has_period {
        if digits_after(&unsigned, ',') == Some(2) {
            // 1.234,56 — periods group thousands, comma is the decimal point
            unsigned.replace('.', "").replace(',', ".")
        } else {
            unsigned.replace(',', "")
        }
    } else if has_comma {
        unsigned.replace(',', ".")
    } else if has_period {
        if digits_after(&unsigned, '.') == Some(2) {
            unsigned
        } else {
            // 1.234 — thousands separator
            unsigned.replace('.', "")
        }
    } else {
        unsigned
    };

    match normalized.parse::<f64>() {
        Ok(v) if v.is_finite() => v.abs(),
        _ => 0.0,
    }
}

fn digits_after(s: &str, sep: char) -> Option<usize> {
    s.rfind(sep).map(|i| s.len() - i - 1)
}

/// Whether the raw token carries an explicit minus sign.
pub fn has_minus(raw: &str) -> bool {
    raw.contains('-')
}

/// Whether the raw token carries an explicit plus sign.
pub fn has_plus(raw: &str) -> bool {
    raw.contains('+')
}
