//! Fixed-decimal number formatting with explicit separators.
//!
//! Mirrors the classic `number_format` contract: round to a fixed number of
//! decimal places, group the integer part in threes with a thousands
//! separator, and join with a decimal point.

/// Format `value` with `decimals` fractional digits, using `decimal_point`
/// between the integer and fractional parts and `thousand_sep` between
/// groups of three integer digits.
///
/// ```
/// use shopcart::format::number_format;
/// assert_eq!(number_format(6000.0, 2, ",", "."), "6.000,00");
/// assert_eq!(number_format(1234567.891, 2, ".", ","), "1,234,567.89");
/// ```
pub fn number_format(value: f64, decimals: u32, decimal_point: &str, thousand_sep: &str) -> String {
    let factor = 10f64.powi(decimals as i32);
    // Round half away from zero on the absolute value.
    let rounded = (value.abs() * factor).round() / factor;
    let negative = value < 0.0 && rounded != 0.0;

    let fixed = format!("{:.*}", decimals as usize, rounded);
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut out = String::with_capacity(fixed.len() + 4);
    if negative {
        out.push('-');
    }
    let digits = int_part.as_bytes();
    for (i, b) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push_str(thousand_sep);
        }
        out.push(*b as char);
    }
    if let Some(frac) = frac_part {
        out.push_str(decimal_point);
        out.push_str(frac);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_two_decimals() {
        assert_eq!(number_format(10.0, 2, ".", ","), "10.00");
        assert_eq!(number_format(29.97, 2, ".", ","), "29.97");
    }

    #[test]
    fn test_thousands_grouping() {
        assert_eq!(number_format(6000.0, 2, ",", "."), "6.000,00");
        assert_eq!(number_format(1050.0, 2, ",", "."), "1.050,00");
        assert_eq!(number_format(1234567.891, 2, ".", ","), "1,234,567.89");
    }

    #[test]
    fn test_empty_separator() {
        assert_eq!(number_format(5000.0, 2, ",", ""), "5000,00");
    }

    #[test]
    fn test_zero_decimals() {
        assert_eq!(number_format(1500.4, 0, ".", ","), "1,500");
    }

    #[test]
    fn test_rounding() {
        assert_eq!(number_format(9.999, 2, ".", ","), "10.00");
        // 0.125 scales to exactly 12.5, which rounds half away from zero.
        assert_eq!(number_format(0.125, 2, ".", ","), "0.13");
    }

    #[test]
    fn test_negative() {
        assert_eq!(number_format(-1234.5, 2, ".", ","), "-1,234.50");
        assert_eq!(number_format(-0.001, 2, ".", ","), "0.00");
    }
}
