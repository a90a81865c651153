//! Data size parsing and formatting, 1024-based like the NiFi data units

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ConfigError;

const KB: f64 = 1024.0;
const MB: f64 = KB * 1024.0;
const GB: f64 = MB * 1024.0;
const TB: f64 = GB * 1024.0;

static DATA_SIZE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(\d+(?:\.\d+)?)\s*(B|KB|MB|GB|TB)?\s*$").expect("valid data size regex")
});

/// Parse a data size such as `"10 MB"`, `"1.5GB"` or `"512"` into bytes.
pub fn parse_data_size(input: &str) -> Result<u64, ConfigError> {
    let invalid = || ConfigError::InvalidDataSize(input.to_string());

    let captures = DATA_SIZE.captures(input).ok_or_else(invalid)?;
    let value: f64 = captures[1].parse().map_err(|_| invalid())?;

    let multiplier = match captures
        .get(2)
        .map(|unit| unit.as_str().to_ascii_uppercase())
        .as_deref()
    {
        None | Some("B") => 1.0,
        Some("KB") => KB,
        Some("MB") => MB,
        Some("GB") => GB,
        Some("TB") => TB,
        Some(_) => return Err(invalid()),
    };

    let bytes = value * multiplier;
    if !bytes.is_finite() || bytes > u64::MAX as f64 {
        return Err(invalid());
    }

    Ok(bytes as u64)
}

/// Human readable data size, e.g. `"12.4 MB"` or `"512 bytes"`.
pub fn format_data_size(bytes: u64) -> String {
    let size = bytes as f64;

    for (unit, divisor) in [("TB", TB), ("GB", GB), ("MB", MB), ("KB", KB)] {
        let scaled = size / divisor;
        if scaled > 1.0 {
            return format!("{} {unit}", format_number(scaled));
        }
    }

    format!("{} bytes", format_number(size))
}

/// At most two fractional digits, trailing zeros trimmed, grouped integer part.
fn format_number(value: f64) -> String {
    let fixed = format!("{value:.2}");
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    if fraction.is_empty() {
        grouped
    } else {
        format!("{grouped}.{fraction}")
    }
}
