//! Formatting utilities used for CLI output.

use rust_decimal::Decimal;

pub fn bold(s: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", s)
}

pub fn pad_right(s: &str, width: usize) -> String {
    format!("{:<width$}", s, width = width)
}

pub fn pad_left(s: &str, width: usize) -> String {
    format!("{:>width$}", s, width = width)
}

/// `5400` → `"01h 30m"`, negative values get a leading `-`.
pub fn secs2readable(secs: i64) -> String {
    let sign = if secs < 0 { "-" } else { "" };
    let mins = secs.abs() / 60;
    format!("{}{:02}h {:02}m", sign, mins / 60, mins % 60)
}

/// Currency with two decimals, e.g. `1234.5` → `"1234.50"`.
pub fn money(value: Decimal) -> String {
    format!("{:.2}", value)
}

/// Red for negative, green otherwise.
pub fn signed_money(value: Decimal) -> String {
    let s = money(value);
    if value.is_sign_negative() && !value.is_zero() {
        format!("\x1b[31m{}\x1b[0m", s)
    } else {
        format!("\x1b[32m{}\x1b[0m", s)
    }
}
