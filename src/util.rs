// Utility helpers for parsing, statistics and number formatting.
//
// Raw CSV cells arrive as optional strings; everything here turns them into
// plain numbers so the deriver can assume clean, typed values.
use num_format::{Locale, ToFormattedString};
use std::cmp::Ordering;

/// Parse a string-like value into `f64` while being forgiving about
/// formatting issues that are common in CSV exports.
///
/// - Trims whitespace.
/// - Rejects values that contain alphabetic characters (`"n/a"`, `"TBD"`).
/// - Strips thousands separators like `","` before parsing.
/// - Returns `None` for anything that cannot be safely parsed, including
///   non-finite results.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
        return None;
    }
    let s = s.replace(',', "");
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Trimmed, non-empty text cell.
pub fn clean_text(s: Option<&str>) -> Option<String> {
    let s = s?.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Smallest and largest value of a slice, `None` when empty.
pub fn min_max(v: &[f64]) -> Option<(f64, f64)> {
    let mut it = v.iter().copied();
    let first = it.next()?;
    Some(it.fold((first, first), |(lo, hi), x| (lo.min(x), hi.max(x))))
}

/// Min-max scale `value` into `[0, 1]` given the observed bounds.
///
/// Returns `None` when the range is degenerate (`min == max`); callers
/// decide what a flat column maps to.
pub fn min_max_scale(value: f64, min: f64, max: f64) -> Option<f64> {
    let range = max - min;
    if range.abs() < f64::EPSILON {
        return None;
    }
    Some((value - min) / range)
}

pub fn sort_ascending(mut v: Vec<f64>) -> Vec<f64> {
    v.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    v
}

/// Quantile of an already sorted slice using linear interpolation between
/// the closest ranks (`h = (n - 1) * p`).
pub fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let h = (sorted.len() - 1) as f64 * p.clamp(0.0, 1.0);
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
}

pub fn mean(v: &[f64]) -> f64 {
    // Returns 0 for an empty slice to avoid NaNs.
    if v.is_empty() {
        return 0.0;
    }
    v.iter().sum::<f64>() / v.len() as f64
}

/// Sample standard deviation (n - 1). Fewer than two values give 0.
pub fn sample_stdev(v: &[f64]) -> f64 {
    if v.len() < 2 {
        return 0.0;
    }
    let m = mean(v);
    let ss: f64 = v.iter().map(|x| (x - m).powi(2)).sum();
    (ss / (v.len() - 1) as f64).sqrt()
}

/// Ratio that yields 0 instead of dividing by zero.
pub fn safe_ratio(num: f64, den: f64) -> f64 {
    if den.abs() < f64::EPSILON {
        0.0
    } else {
        num / den
    }
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimal places plus locale-aware thousands separators
    // (e.g., `1,234,567.89`).
    let neg = n.is_sign_negative() && n != 0.0;
    let s = format!("{:.*}", decimals, n.abs());
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    }
    if neg && res.chars().any(|c| c.is_ascii_digit() && c != '0') {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

/// Round a count held as `f64` and group its thousands (`1,234,567`).
pub fn format_count(n: f64) -> String {
    format_int(n.round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_grouped_and_blank_cells() {
        assert_eq!(parse_f64_safe(Some(" 1,250,000 ")), Some(1_250_000.0));
        assert_eq!(parse_f64_safe(Some("3.5e6")), Some(3_500_000.0));
        assert_eq!(parse_f64_safe(Some("")), None);
        assert_eq!(parse_f64_safe(Some("n/a")), None);
        assert_eq!(parse_f64_safe(None), None);
    }

    #[test]
    fn quantile_interpolates_linearly() {
        let v = sort_ascending(vec![0.8, 0.25, 0.5, 0.25]);
        assert!((quantile_sorted(&v, 0.25) - 0.25).abs() < 1e-12);
        assert!((quantile_sorted(&v, 0.5) - 0.375).abs() < 1e-12);
        assert!((quantile_sorted(&v, 0.75) - 0.575).abs() < 1e-12);
        assert_eq!(quantile_sorted(&[7.0], 0.75), 7.0);
    }

    #[test]
    fn min_max_scale_flags_flat_columns() {
        assert_eq!(min_max_scale(3.0, 3.0, 3.0), None);
        assert_eq!(min_max_scale(2.0, 1.0, 3.0), Some(0.5));
        assert_eq!(min_max(&[]), None);
        assert_eq!(min_max(&[2.0, -1.0, 4.0]), Some((-1.0, 4.0)));
    }

    #[test]
    fn stdev_uses_sample_denominator() {
        assert_eq!(sample_stdev(&[5.0]), 0.0);
        assert!((sample_stdev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]) - 2.138089935).abs() < 1e-6);
    }

    #[test]
    fn formats_with_grouping() {
        assert_eq!(format_number(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(-0.1234, 3), "-0.123");
        assert_eq!(format_number(-0.0001, 2), "0.00");
        assert_eq!(format_count(1_500_000.4), "1,500,000");
    }
}
