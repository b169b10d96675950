//! Built-in validation rules
//!
//! Every rule except `required` passes on an empty value, so optional
//! fields are only checked once the user has entered something.

use super::rule::{RuleCategory, RuleDefBuilder, ValidationRuleDefinition};
use anyhow::Result;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));
static URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^https?://[^\s/$.?#][^\s]*$").expect("url pattern compiles")
});
static PHONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9][0-9\s\-().]{5,19}$").expect("phone pattern compiles"));

/// Configured `pattern` values, compiled on first use
static PATTERNS: Lazy<RwLock<HashMap<String, Check<Regex>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

type Check<T = ()> = std::result::Result<T, String>;

/// All built-in rules in presentation order
pub fn standard_rules() -> Result<Vec<ValidationRuleDefinition>> {
    Ok(vec![
        RuleDefBuilder::new("required")
            .label("Required")
            .description("The field must have a value")
            .binary()
            .message("This field is required")
            .validator(|_, value, _| {
                if is_empty(value) {
                    Err("value is empty".into())
                } else {
                    Ok(())
                }
            })
            .build()?,
        RuleDefBuilder::new("minLength")
            .label("Minimum length")
            .with_value(1)
            .message("Must be at least {value} characters")
            .conflicts_with(&["exactLength"])
            .validator(|configured, value, _| {
                let min = configured_count(configured)?;
                check_len(value, |len| len >= min)
            })
            .build()?,
        RuleDefBuilder::new("maxLength")
            .label("Maximum length")
            .with_value(255)
            .message("Must be at most {value} characters")
            .conflicts_with(&["exactLength"])
            .validator(|configured, value, _| {
                let max = configured_count(configured)?;
                check_len(value, |len| len <= max)
            })
            .build()?,
        RuleDefBuilder::new("exactLength")
            .label("Exact length")
            .with_value(10)
            .category(RuleCategory::Advanced)
            .message("Must be exactly {value} characters")
            .conflicts_with(&["minLength", "maxLength"])
            .validator(|configured, value, _| {
                let exact = configured_count(configured)?;
                check_len(value, |len| len == exact)
            })
            .build()?,
        RuleDefBuilder::new("pattern")
            .label("Pattern")
            .description("Regular expression the value must match")
            .with_value("")
            .category(RuleCategory::Advanced)
            .message("Invalid format")
            .validator(|configured, value, _| {
                let Some(text) = text_of(value) else {
                    return Ok(());
                };
                let pattern = configured
                    .as_str()
                    .ok_or_else(|| "pattern must be a string".to_string())?;
                let re = compiled_pattern(pattern)?;
                if re.is_match(&text) {
                    Ok(())
                } else {
                    Err(format!("'{}' does not match {}", text, pattern))
                }
            })
            .build()?,
        RuleDefBuilder::new("email")
            .label("Email address")
            .binary()
            .message("Enter a valid email address")
            .validator(|_, value, _| check_regex(&EMAIL, value))
            .build()?,
        RuleDefBuilder::new("url")
            .label("URL")
            .binary()
            .message("Enter a valid URL")
            .validator(|_, value, _| check_regex(&URL, value))
            .build()?,
        RuleDefBuilder::new("phone")
            .label("Phone number")
            .binary()
            .message("Enter a valid phone number")
            .validator(|_, value, _| check_regex(&PHONE, value))
            .build()?,
        RuleDefBuilder::new("min")
            .label("Minimum value")
            .with_value(0)
            .message("Must be at least {value}")
            .validator(|configured, value, _| {
                let min = configured_number(configured)?;
                check_number(value, |n| n >= min)
            })
            .build()?,
        RuleDefBuilder::new("max")
            .label("Maximum value")
            .with_value(100)
            .message("Must be at most {value}")
            .validator(|configured, value, _| {
                let max = configured_number(configured)?;
                check_number(value, |n| n <= max)
            })
            .build()?,
        RuleDefBuilder::new("integer")
            .label("Whole number")
            .binary()
            .message("Must be a whole number")
            .validator(|_, value, _| check_number(value, |n| n.fract() == 0.0))
            .build()?,
        RuleDefBuilder::new("minSelected")
            .label("Minimum selections")
            .with_value(1)
            .message("Select at least {value} options")
            .depends_on(&["required"])
            .validator(|configured, value, _| {
                let min = configured_count(configured)?;
                check_selected(value, |count| count >= min)
            })
            .build()?,
        RuleDefBuilder::new("maxSelected")
            .label("Maximum selections")
            .with_value(3)
            .message("Select at most {value} options")
            .validator(|configured, value, _| {
                let max = configured_count(configured)?;
                check_selected(value, |count| count <= max)
            })
            .build()?,
        RuleDefBuilder::new("minDate")
            .label("Earliest date")
            .with_value("")
            .category(RuleCategory::Advanced)
            .message("Date must be on or after {value}")
            .validator(|configured, value, _| {
                let bound = configured_moment(configured)?;
                check_moment(value, |moment| compare_moments(&moment, &bound).is_ge())
            })
            .build()?,
        RuleDefBuilder::new("maxDate")
            .label("Latest date")
            .with_value("")
            .category(RuleCategory::Advanced)
            .message("Date must be on or before {value}")
            .validator(|configured, value, _| {
                let bound = configured_moment(configured)?;
                check_moment(value, |moment| compare_moments(&moment, &bound).is_le())
            })
            .build()?,
        RuleDefBuilder::new("futureDate")
            .label("Future date")
            .binary()
            .category(RuleCategory::Advanced)
            .message("Date must be in the future")
            .conflicts_with(&["pastDate"])
            .validator(|_, value, _| {
                let now = Moment::now();
                check_moment(value, |moment| compare_moments(&moment, &now).is_gt())
            })
            .build()?,
        RuleDefBuilder::new("pastDate")
            .label("Past date")
            .binary()
            .category(RuleCategory::Advanced)
            .message("Date must be in the past")
            .conflicts_with(&["futureDate"])
            .validator(|_, value, _| {
                let now = Moment::now();
                check_moment(value, |moment| compare_moments(&moment, &now).is_lt())
            })
            .build()?,
        RuleDefBuilder::new("fileTypes")
            .label("Allowed file types")
            .description("Extensions (pdf, .png) or MIME patterns (image/*)")
            .with_value(Value::Array(Vec::new()))
            .message("File type not allowed")
            .validator(|configured, value, _| check_file_types(configured, value))
            .build()?,
        RuleDefBuilder::new("maxFileSize")
            .label("Maximum file size")
            .description("Largest accepted file, in bytes")
            .with_value(10 * 1024 * 1024)
            .message("File is too large")
            .validator(|configured, value, _| {
                let max = configured_number(configured)?;
                for file in files_of(value) {
                    if let Some(size) = file.get("size").and_then(Value::as_f64) {
                        if size > max {
                            return Err(format!("{} bytes exceeds {}", size, max));
                        }
                    }
                }
                Ok(())
            })
            .build()?,
        RuleDefBuilder::new("maxFiles")
            .label("Maximum number of files")
            .with_value(1)
            .message("Upload at most {value} files")
            .validator(|configured, value, _| {
                let max = configured_count(configured)?;
                let count = files_of(value).len();
                if count <= max {
                    Ok(())
                } else {
                    Err(format!("{} files uploaded", count))
                }
            })
            .build()?,
    ])
}

/// Whether a field value counts as "nothing entered"
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(checked) => !checked,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Number(_) => false,
    }
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Compiled regex for a configured pattern; compile errors are cached too
fn compiled_pattern(pattern: &str) -> Check<Regex> {
    if let Some(cached) = PATTERNS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(pattern)
    {
        return cached.clone();
    }
    let compiled = Regex::new(pattern).map_err(|e| format!("invalid pattern: {}", e));
    PATTERNS
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .entry(pattern.to_string())
        .or_insert(compiled)
        .clone()
}

fn configured_number(configured: &Value) -> Check<f64> {
    let number = match configured {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.ok_or_else(|| format!("expected a number, got {}", configured))
}

fn configured_count(configured: &Value) -> Check<usize> {
    let n = configured_number(configured)?;
    if n < 0.0 || n.fract() != 0.0 {
        return Err(format!("expected a non-negative whole number, got {}", n));
    }
    Ok(n as usize)
}

fn check_len(value: &Value, accept: impl Fn(usize) -> bool) -> Check {
    let len = match value {
        Value::String(s) if !s.is_empty() => s.chars().count(),
        Value::Array(items) if !items.is_empty() => items.len(),
        _ => return Ok(()),
    };
    if accept(len) {
        Ok(())
    } else {
        Err(format!("length {} rejected", len))
    }
}

fn check_regex(re: &Regex, value: &Value) -> Check {
    match value {
        Value::String(s) if s.trim().is_empty() => Ok(()),
        Value::String(s) if re.is_match(s.trim()) => Ok(()),
        Value::Null => Ok(()),
        other => Err(format!("{} does not match {}", other, re.as_str())),
    }
}

fn check_number(value: &Value, accept: impl Fn(f64) -> bool) -> Check {
    let n = match value {
        Value::Null => return Ok(()),
        Value::String(s) if s.trim().is_empty() => return Ok(()),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match n {
        Some(n) if accept(n) => Ok(()),
        Some(n) => Err(format!("{} is out of range", n)),
        None => Err(format!("{} is not a number", value)),
    }
}

fn check_selected(value: &Value, accept: impl Fn(usize) -> bool) -> Check {
    let count = match value {
        Value::Array(items) => items.len(),
        Value::Null => return Ok(()),
        Value::String(s) if s.is_empty() => return Ok(()),
        _ => 1,
    };
    if count == 0 || accept(count) {
        Ok(())
    } else {
        Err(format!("{} selected", count))
    }
}

/// A point in time from a date or datetime input
#[derive(Debug, Clone, Copy)]
struct Moment {
    at: NaiveDateTime,
    has_time: bool,
}

impl Moment {
    fn now() -> Self {
        Self {
            at: Local::now().naive_local(),
            has_time: true,
        }
    }

    fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(Self {
                at: dt.with_timezone(&Local).naive_local(),
                has_time: true,
            });
        }
        for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
            if let Ok(at) = NaiveDateTime::parse_from_str(s, format) {
                return Some(Self { at, has_time: true });
            }
        }
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|at| Self { at, has_time: false })
    }
}

/// Compare at day precision unless both sides carry a time
fn compare_moments(a: &Moment, b: &Moment) -> std::cmp::Ordering {
    if a.has_time && b.has_time {
        a.at.cmp(&b.at)
    } else {
        a.at.date().cmp(&b.at.date())
    }
}

fn configured_moment(configured: &Value) -> Check<Moment> {
    configured
        .as_str()
        .and_then(Moment::parse)
        .ok_or_else(|| format!("expected a date, got {}", configured))
}

fn check_moment(value: &Value, accept: impl Fn(Moment) -> bool) -> Check {
    match value {
        Value::Null => Ok(()),
        Value::String(s) if s.trim().is_empty() => Ok(()),
        Value::String(s) => match Moment::parse(s) {
            Some(moment) if accept(moment) => Ok(()),
            Some(_) => Err(format!("{} is out of range", s)),
            None => Err(format!("'{}' is not a date", s)),
        },
        other => Err(format!("{} is not a date", other)),
    }
}

/// File descriptors of an upload value: `{name, size, type}` objects or bare names
fn files_of(value: &Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items.iter().map(normalize_file).collect(),
        Value::Object(_) | Value::String(_) if !is_empty(value) => vec![normalize_file(value)],
        _ => Vec::new(),
    }
}

fn normalize_file(value: &Value) -> Value {
    match value {
        Value::String(name) => serde_json::json!({ "name": name }),
        other => other.clone(),
    }
}

fn check_file_types(configured: &Value, value: &Value) -> Check {
    let allowed: Vec<String> = match configured {
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(|s| s.trim().to_lowercase())
            .collect(),
        Value::String(s) => s.split(',').map(|s| s.trim().to_lowercase()).collect(),
        other => return Err(format!("expected a list of file types, got {}", other)),
    };
    let allowed: Vec<String> = allowed.into_iter().filter(|s| !s.is_empty()).collect();
    if allowed.is_empty() {
        return Ok(());
    }

    for file in files_of(value) {
        let name = file.get("name").and_then(Value::as_str).unwrap_or_default();
        let mime = file.get("type").and_then(Value::as_str).unwrap_or_default();
        if !allowed.iter().any(|pattern| file_matches(pattern, name, mime)) {
            return Err(format!("'{}' is not an accepted file type", name));
        }
    }
    Ok(())
}

fn file_matches(pattern: &str, name: &str, mime: &str) -> bool {
    let mime = mime.to_lowercase();
    if let Some(prefix) = pattern.strip_suffix("/*") {
        return mime
            .split_once('/')
            .is_some_and(|(major, _)| major == prefix);
    }
    if pattern.contains('/') {
        return mime == pattern;
    }
    let ext = pattern.trim_start_matches('.');
    name.rsplit_once('.')
        .is_some_and(|(_, file_ext)| file_ext.to_lowercase() == ext)
}
