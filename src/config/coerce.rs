//! Literal parsing for environment values.

use super::schema::Kind;
use crate::error::{ConfigError, ConfigResult};
use serde_json::Value;

/// Convert the raw string of `var` into a document value of the given kind.
pub fn coerce(var: &str, kind: Kind, raw: &str) -> ConfigResult<Value> {
    let fail = || ConfigError::coercion(var, kind.expected(), raw);
    let trimmed = raw.trim();

    match kind {
        Kind::String => Ok(Value::String(raw.to_string())),
        Kind::Bool => parse_bool(trimmed).map(Value::Bool).ok_or_else(fail),
        Kind::Int => trimmed.parse::<i64>().map(Value::from).map_err(|_| fail()),
        Kind::Port => trimmed.parse::<u16>().map(Value::from).map_err(|_| fail()),
        Kind::Duration => {
            let duration = humantime::parse_duration(trimmed).map_err(|_| fail())?;
            Ok(Value::String(humantime::format_duration(duration).to_string()))
        }
        Kind::StringList => Ok(Value::Array(
            split_list(raw).map(|item| Value::String(item.to_string())).collect(),
        )),
        Kind::IntList => split_list(raw)
            .map(|item| item.parse::<i64>().map(Value::from).map_err(|_| fail()))
            .collect::<ConfigResult<Vec<_>>>()
            .map(Value::Array),
        Kind::Choice(allowed) => {
            let lowered = trimmed.to_ascii_lowercase();
            if allowed.contains(&lowered.as_str()) {
                Ok(Value::String(lowered))
            } else {
                Err(ConfigError::Coercion {
                    var: var.to_string(),
                    expected: choice_expected(allowed),
                    value: raw.to_string(),
                })
            }
        }
    }
}

/// Case-insensitive `true` / `false`.
pub fn parse_bool(raw: &str) -> Option<bool> {
    if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Items of a comma-separated value, trimmed, empty items dropped.
fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|item| !item.is_empty())
}

fn choice_expected(allowed: &[&str]) -> &'static str {
    match allowed {
        ["name", "image"] => "one of: name, image",
        ["notice", "text"] => "one of: notice, text",
        _ => "one of the allowed values",
    }
}
