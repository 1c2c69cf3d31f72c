//! Formatting of numbers for display to the user.
//!
//! Only used when reporting results; output files always contain full-precision values.
use itertools::Itertools;

/// Values at or above this are shown in millions
const MILLION: f64 = 1_000_000.0;

/// Values below this are shown with two decimal places
const THOUSAND: f64 = 1_000.0;

/// Round to `decimals` places, with ties rounded away from zero.
///
/// The formatter on its own rounds ties to even, so `0.125` would be shown as `0.12`.
fn round_half_away(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// Round to a whole number and insert a space between every group of three digits
fn group_thousands(value: f64) -> String {
    let digits = format!("{:.0}", round_half_away(value, 0));
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits.as_str()),
    };

    let first_group_len = match digits.len() % 3 {
        0 => 3,
        n => n,
    };
    let (head, tail) = digits.split_at(first_group_len.min(digits.len()));
    let groups = std::iter::once(head).chain(
        tail.as_bytes()
            .chunks(3)
            .map(|chunk| std::str::from_utf8(chunk).expect("Digits are ASCII")),
    );

    format!("{sign}{}", groups.format(" "))
}

/// Format a number for display.
///
/// * Values of a million or more are shown as a whole number of millions, e.g. `12 M`
/// * Values below a thousand are shown with two decimal places, e.g. `2.08`
/// * Anything else is rounded to a whole number with grouped thousands, e.g. `16 650`
///
/// Percentages get a `%` suffix unless they are shown in millions.
pub fn format_number(value: f64, is_percentage: bool) -> String {
    let suffix = if is_percentage { "%" } else { "" };
    if value >= MILLION {
        format!("{} M", group_thousands(value / MILLION))
    } else if value < THOUSAND {
        format!("{:.2}{suffix}", round_half_away(value, 2))
    } else {
        format!("{}{suffix}", group_thousands(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, "0")]
    #[case(999.0, "999")]
    #[case(1000.0, "1 000")]
    #[case(16650.0, "16 650")]
    #[case(123_456_789.0, "123 456 789")]
    #[case(-1234.0, "-1 234")]
    #[case(2500.5, "2 501")]
    #[case(-2.5, "-3")]
    fn test_group_thousands(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(group_thousands(value), expected);
    }

    #[rstest]
    #[case(0.0, false, "0.00")]
    #[case(2.08125, true, "2.08%")]
    #[case(999.994, false, "999.99")]
    #[case(2164.0, false, "2 164")]
    #[case(16650.0, false, "16 650")]
    #[case(869_130.0, false, "869 130")]
    #[case(1000.0, true, "1 000%")]
    #[case(1_000_000.0, false, "1 M")]
    #[case(68_704_120.0, false, "69 M")]
    #[case(1_234_567_890.0, false, "1 235 M")]
    // Ties round away from zero
    #[case(0.125, false, "0.13")]
    #[case(0.375, true, "0.38%")]
    #[case(2500.5, false, "2 501")]
    #[case(2_500_000.0, false, "3 M")]
    fn test_format_number(#[case] value: f64, #[case] is_percentage: bool, #[case] expected: &str) {
        assert_eq!(format_number(value, is_percentage), expected);
    }
}
