//! FILENAME: core/engine/src/number_format.rs
//! PURPOSE: Conversion between numbers and their report display strings.

/// Format a number in general format: integers without a decimal point,
/// fractions trimmed of trailing zeros.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }

    // Tiny fractions would round to "0" or "-0" below
    if value.abs() < 1e-4 {
        return format_scientific(value);
    }

    // For integers, don't show decimal point
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{:.0}", value);
    }

    let formatted = format!("{:.10}", value);
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// `1e-12`, `-2.5e-7`: mantissa trimmed of trailing zeros.
fn format_scientific(value: f64) -> String {
    let formatted = format!("{:.5e}", value);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => {
            let mantissa = mantissa.trim_end_matches('0').trim_end_matches('.');
            format!("{}e{}", mantissa, exponent)
        }
        None => formatted,
    }
}

/// Parse a number typed by a person or sent by the backend as text.
/// Accepts a comma decimal separator and space/nbsp thousands separators.
pub fn parse_number(text: &str) -> Option<f64> {
    let cleaned: String = text
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '\u{a0}' | '\u{202f}'))
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}
