//! Format-kind registry: maps a column's format tag to a pure
//! value-to-string function.
//!
//! Tags are resolved once, when column definitions are installed on a
//! table. An unknown tag is a configuration bug, not a runtime condition,
//! and aborts the installation instead of mis-rendering cells.

use chrono::{DateTime, Local};
use perfdash_protocol::Value;
use thiserror::Error;

/// A pure cell formatter.
pub type Formatter = fn(&Value) -> String;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown column format kind {0:?}")]
pub struct ConfigurationError(pub String);

/// Resolve a format-kind tag to its formatter.
pub fn lookup(tag: &str) -> Result<Formatter, ConfigurationError> {
    match tag {
        "string" => Ok(format_string),
        "number" => Ok(format_number),
        "time" => Ok(format_time),
        "datetime" => Ok(format_datetime),
        other => Err(ConfigurationError(other.to_owned())),
    }
}

fn format_string(value: &Value) -> String {
    value.display()
}

fn format_number(value: &Value) -> String {
    value.display()
}

/// Duration in seconds, rendered as milliseconds with three fractional
/// digits. Non-numeric values fall back to the raw display.
fn format_time(value: &Value) -> String {
    match value.as_f64() {
        Some(seconds) => format!("{:.3} ms", seconds * 1000.0),
        None => value.display(),
    }
}

/// Epoch seconds, rendered as the local human-readable date-time string.
/// Non-numeric or out-of-range values fall back to the raw display.
fn format_datetime(value: &Value) -> String {
    let Some(epoch) = value.as_f64() else {
        return value.display();
    };
    if !epoch.is_finite() {
        return value.display();
    }
    let secs = epoch.floor();
    let nanos = ((epoch - secs) * 1e9) as u32;
    match DateTime::from_timestamp(secs as i64, nanos) {
        Some(utc) => utc.with_timezone(&Local).to_string(),
        None => value.display(),
    }
}
