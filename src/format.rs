use chrono::NaiveDate;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const NOT_AVAILABLE: &str = "--";

/// Inserts `,` separators into the integer part of an already formatted number.
pub fn group_thousands(formatted: &str) -> String {
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (unsigned, None),
    };
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

pub fn trim_formatted_number(mut formatted: String) -> String {
    if formatted.contains('.') {
        formatted = formatted
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string();
    }
    if formatted == "-0" || formatted == "+0" {
        formatted = "0".to_string();
    }
    formatted
}

/// Shortest decimal rendering, e.g. `0.5`, `10`, `1.39`.
pub fn format_plain(value: f64) -> String {
    const PLAIN_PRECISION: usize = 8;
    let formatted = format!("{value:.prec$}", value = value, prec = PLAIN_PRECISION);
    trim_formatted_number(formatted)
}

/// Grouped number with at most three fraction digits: `43,250`, `2,285.5`.
pub fn format_grouped(value: f64) -> String {
    let formatted = trim_formatted_number(format!("{value:.3}"));
    group_thousands(&formatted)
}

pub fn format_usd(value: f64) -> String {
    if value < 0.0 {
        format!("-${}", format_grouped(value.abs()))
    } else {
        format!("${}", format_grouped(value))
    }
}

/// Two-decimal currency amount: `$1323.45`, `-$228.60`.
pub fn format_money(value: f64) -> String {
    if value < 0.0 {
        format!("-${:.2}", value.abs())
    } else {
        format!("${:.2}", value.abs())
    }
}

/// `+$1125.00` for non-negative values, `-$228.60` otherwise.
pub fn format_signed_usd(value: f64) -> String {
    if value >= 0.0 {
        format!("+${:.2}", value.abs())
    } else {
        format!("-${:.2}", value.abs())
    }
}

pub fn format_signed_percent(value: f64) -> String {
    if value >= 0.0 {
        format!("+{}%", format_plain(value.abs()))
    } else {
        format!("-{}%", format_plain(value.abs()))
    }
}

pub fn format_optional_percent(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(value) if value.is_finite() => {
            format!("{value:.prec$}%", value = value, prec = decimals)
        }
        _ => NOT_AVAILABLE.to_string(),
    }
}

pub fn format_trade_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}

#[derive(Clone, Copy)]
pub enum ColumnAlign {
    Left,
    Right,
}

pub fn format_column_value(value: &str, align: ColumnAlign, width: usize) -> String {
    let clipped = clip_to_width(value, width);
    pad_to_width(&clipped, width, align)
}

pub fn clip_to_width(value: &str, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    if UnicodeWidthStr::width(value) <= width {
        return value.to_string();
    }
    let mut result = String::new();
    let mut remaining = width.saturating_sub(1);
    for ch in value.chars() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if ch_width > remaining {
            break;
        }
        result.push(ch);
        remaining = remaining.saturating_sub(ch_width);
    }
    result.push('…');
    result
}

fn pad_to_width(value: &str, width: usize, align: ColumnAlign) -> String {
    let current = UnicodeWidthStr::width(value);
    if current >= width {
        return value.to_string();
    }
    let padding = " ".repeat(width - current);
    match align {
        ColumnAlign::Left => format!("{value}{padding}"),
        ColumnAlign::Right => format!("{padding}{value}"),
    }
}

pub fn clamp_index(idx: usize, len: usize) -> usize {
    if len == 0 { 0 } else { idx.min(len - 1) }
}

/// Window of `visible` rows out of `len` that keeps `selected` on screen.
pub fn visible_range(len: usize, visible: usize, selected: usize) -> (usize, usize) {
    if len == 0 || visible == 0 {
        return (0, 0);
    }
    if len <= visible {
        return (0, len);
    }
    let max_start = len - visible;
    let clamped = clamp_index(selected, len);
    let start = clamped.saturating_sub(visible - 1).min(max_start);
    (start, start + visible)
}
