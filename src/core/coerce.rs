//! Conversions from [`Value`] to concrete types.
//!
//! Every function takes the key the value was read from so the error can
//! name it.

use crate::core::value::Value;
use crate::error::{ConfigError, Result};
use std::time::Duration;

/// The value must already be a string.
pub fn string(key: &str, value: Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s),
        _ => Err(ConfigError::wrong_type(key, "string")),
    }
}

/// The value must be an integer, or a float without a fractional part.
pub fn int(key: &str, value: Value) -> Result<i64> {
    integral(&value).ok_or_else(|| ConfigError::wrong_type(key, "integer"))
}

/// Like [`int`], and additionally rejects negative values.
pub fn uint(key: &str, value: Value) -> Result<u64> {
    integral(&value)
        .and_then(|i| u64::try_from(i).ok())
        .ok_or_else(|| ConfigError::wrong_type(key, "unsigned integer"))
}

/// Any numeric value.
pub fn float(key: &str, value: Value) -> Result<f64> {
    match value {
        Value::Float(x) => Ok(x),
        Value::Int(i) => Ok(i as f64),
        _ => Err(ConfigError::wrong_type(key, "float")),
    }
}

/// The value must be a boolean. Strings such as `"true"` are rejected.
pub fn bool(key: &str, value: Value) -> Result<bool> {
    match value {
        Value::Bool(b) => Ok(b),
        _ => Err(ConfigError::wrong_type(key, "boolean")),
    }
}

/// A duration given as a number of nanoseconds, a duration literal such as
/// `"10s"` or `"1h30m"`, or a numeric string of nanoseconds.
///
/// Negative durations are rejected.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use treeconf::core::{coerce, Value};
///
/// assert_eq!(coerce::duration("t", Value::from("1m30s")).unwrap(), Duration::from_secs(90));
/// assert_eq!(coerce::duration("t", Value::from(1500)).unwrap(), Duration::from_nanos(1500));
/// assert_eq!(coerce::duration("t", Value::from("1e3")).unwrap(), Duration::from_micros(1));
/// ```
pub fn duration(key: &str, value: Value) -> Result<Duration> {
    let parsed = match &value {
        Value::Int(i) => u64::try_from(*i).ok().map(Duration::from_nanos),
        Value::Float(x) => float_nanos(*x),
        Value::String(s) => parse_duration(s).or_else(|| {
            s.trim()
                .parse::<f64>()
                .ok()
                .and_then(float_nanos)
        }),
        _ => None,
    };
    parsed.ok_or_else(|| ConfigError::wrong_type(key, "duration"))
}

/// Every element of a sequence in its natural textual form.
pub fn list(key: &str, value: Value) -> Result<Vec<String>> {
    match value {
        Value::Sequence(items) => Ok(items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => s,
                other => other.to_string(),
            })
            .collect()),
        _ => Err(ConfigError::wrong_type(key, "list")),
    }
}

fn integral(value: &Value) -> Option<i64> {
    match value {
        Value::Int(i) => Some(*i),
        Value::Float(x) if x.fract() == 0.0 && *x >= i64::MIN as f64 && *x < i64::MAX as f64 => {
            Some(*x as i64)
        }
        _ => None,
    }
}

fn float_nanos(x: f64) -> Option<Duration> {
    if !x.is_finite() || x < 0.0 || x >= u64::MAX as f64 {
        return None;
    }
    Some(Duration::from_nanos(x as u64))
}

/// Parse a duration literal with [`humantime`], e.g. `"300ms"`, `"2h45m"`,
/// `"1h 30m"` or `"2days"`. A leading `+`, a bare `"0"` and `µs` for
/// microseconds are accepted.
///
/// A single number with a fraction and one unit (`"1.5h"`, `".5s"`) is
/// accepted as well, scaled from the unit's length.
pub fn parse_duration(input: &str) -> Option<Duration> {
    let literal = input.trim().replace(['µ', 'μ'], "u");
    let literal = literal.strip_prefix('+').unwrap_or(&literal);
    if literal == "0" {
        return Some(Duration::ZERO);
    }
    humantime::parse_duration(literal)
        .ok()
        .or_else(|| fractional(literal))
}

fn fractional(literal: &str) -> Option<Duration> {
    let split = literal.find(|c: char| !c.is_ascii_digit() && c != '.')?;
    let (number, unit) = literal.split_at(split);
    if !unit.chars().all(char::is_alphabetic) {
        return None;
    }
    let number: f64 = number.parse().ok()?;
    let unit = humantime::parse_duration(&format!("1{unit}")).ok()?;
    Duration::try_from_secs_f64(unit.as_secs_f64() * number).ok()
}
