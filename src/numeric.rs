//! Decimal-precision helpers for abscissa reconstruction.
//!
//! Abscissa samples are rounded to the resolution stated by the increment
//! in the source file, so downstream consumers can compare them as exact
//! decimal values.

/// Digits after the decimal point of the shortest textual form of `value`
///
/// An integral value counts as one decimal, the way "1.0" reads.
pub fn decimal_places(value: f64) -> usize {
    let text = value.to_string();
    match text.split_once('.') {
        Some((_, fraction)) => fraction.len(),
        None if value.is_finite() => 1,
        None => 0,
    }
}

/// Round half-to-even on the exact binary value, to `decimals` places
pub fn round_to(value: f64, decimals: usize) -> f64 {
    format!("{:.*}", decimals, value)
        .parse::<f64>()
        .unwrap_or(value)
}

/// Abscissa sample `index` of a regular scan
pub fn abscissa_value(start: f64, increment: f64, index: usize, decimals: usize) -> f64 {
    round_to(start + index as f64 * increment, decimals)
}

/// Full abscissa of `count` samples
pub fn abscissa_series(start: f64, increment: f64, count: usize) -> Vec<f64> {
    let decimals = decimal_places(increment);
    (0..count)
        .map(|i| abscissa_value(start, increment, i, decimals))
        .collect()
}

/// Render `value` with `precision` significant digits in C `%g` style
///
/// Trailing zeros are dropped, and the exponent form is used when the
/// decimal exponent is below -4 or at least `precision`.
pub fn format_general(value: f64, precision: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let precision = precision.max(1);
    let scientific = format!("{:.*e}", precision - 1, value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((m, e)) => (m.to_string(), e.parse::<i32>().unwrap_or(0)),
        None => return scientific,
    };

    if exponent < -4 || exponent >= precision as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{}{:02}",
            strip_trailing_zeros(&mantissa),
            sign,
            exponent.abs()
        )
    } else {
        let decimals = (precision as i32 - 1 - exponent).max(0) as usize;
        strip_trailing_zeros(&format!("{:.*}", decimals, value))
    }
}

fn strip_trailing_zeros(text: &str) -> String {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text.to_string()
    }
}
