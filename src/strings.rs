use crate::utils::{Result, UtilError};

pub fn append_string(parts: &[&str]) -> String {
    let mut buffer = String::with_capacity(parts.iter().map(|s| s.len()).sum());

    for part in parts.iter().filter(|s| !s.is_empty()) {
        buffer.push_str(part);
    }

    buffer
}

/// Parses an integer, accepting decimal text and truncating the fraction
/// toward zero (`"123.456"` -> 123).
pub fn string_to_i64(text: &str) -> Result<i64> {
    if text.contains('.') {
        let value = string_to_f64(text)?;
        return Ok(value as i64);
    }

    text.parse::<i64>()
        .map_err(|_| UtilError::InvalidNumber(text.to_string()))
}

pub fn string_to_f64(text: &str) -> Result<f64> {
    text.parse::<f64>()
        .map_err(|_| UtilError::InvalidNumber(text.to_string()))
}
