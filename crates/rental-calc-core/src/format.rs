//! Display strings for money, percentages and sensitivity step labels.

use rust_decimal::{Decimal, RoundingStrategy};

/// `$1,234.56` with `decimals` fraction digits; negatives lead with `-`.
pub fn format_currency(value: Decimal, decimals: u32) -> String {
    let rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.*}", decimals as usize, rounded.abs());
    let (whole, fraction) = match text.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::new();
    for (i, c) in whole.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let grouped: String = grouped.chars().rev().collect();

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    match fraction {
        Some(f) => format!("{sign}${grouped}.{f}"),
        None => format!("{sign}${grouped}"),
    }
}

/// Percent figure with two decimals, e.g. `7.25%`.
pub fn format_percent(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{rounded:.2}%")
}

/// Step change with an explicit sign for increases: `+5%`, `-1.5%`, `0%`.
pub fn format_step(step: Decimal) -> String {
    let step = step.normalize();
    if step > Decimal::ZERO {
        format!("+{step}%")
    } else {
        format!("{step}%")
    }
}
