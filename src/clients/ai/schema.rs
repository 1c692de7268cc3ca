//! Validation of the completion text into strategies.
//!
//! Accepted shapes, after trimming and removing one optional Markdown fence:
//! a JSON array of strategy objects, or an object whose `strategies` key holds
//! that array. Each entry needs a non-empty `name`, a string `description`,
//! and a numeric `probability` between 0 and 100. Anything else is rejected
//! as a whole.

use crate::types::Strategy;
use crate::{AppError, Result};
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

const SERVICE: &str = "OpenAI API";

fn fence_pattern() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(r"(?s)^```[A-Za-z]*\s*\n?(.*?)\s*```$").expect("fence pattern is a valid literal")
    })
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    fence_pattern()
        .captures(trimmed)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or(trimmed)
}

pub fn parse_strategies(text: &str) -> Result<Vec<Strategy>> {
    let body = strip_code_fence(text);
    if body.is_empty() {
        return Err(AppError::unparseable(SERVICE, "completion text is empty"));
    }

    let value: Value = serde_json::from_str(body)
        .map_err(|e| AppError::unparseable(SERVICE, format!("completion is not JSON: {}", e)))?;

    let entries = match value {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("strategies") {
            Some(Value::Array(items)) => items,
            Some(_) => {
                return Err(AppError::unparseable(
                    SERVICE,
                    "\"strategies\" is not a list",
                ))
            }
            None => {
                return Err(AppError::unparseable(
                    SERVICE,
                    "expected a list of strategies",
                ))
            }
        },
        _ => {
            return Err(AppError::unparseable(
                SERVICE,
                "expected a list of strategies",
            ))
        }
    };

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| parse_strategy(index, entry))
        .collect()
}

fn parse_strategy(index: usize, entry: &Value) -> Result<Strategy> {
    let obj = entry.as_object().ok_or_else(|| {
        AppError::unparseable(SERVICE, format!("strategy {} is not an object", index))
    })?;

    let name = string_field(index, obj, "name")?;
    if name.trim().is_empty() {
        return Err(AppError::unparseable(
            SERVICE,
            format!("strategy {} has an empty \"name\"", index),
        ));
    }
    let description = string_field(index, obj, "description")?;

    let probability = obj
        .get("probability")
        .ok_or_else(|| missing(index, "probability"))?
        .as_f64()
        .ok_or_else(|| {
            AppError::unparseable(
                SERVICE,
                format!("strategy {} field \"probability\" is not a number", index),
            )
        })?;

    if !probability.is_finite() || !(0.0..=100.0).contains(&probability) {
        return Err(AppError::unparseable(
            SERVICE,
            format!(
                "strategy {} field \"probability\" is out of range: {}",
                index, probability
            ),
        ));
    }

    Ok(Strategy {
        name,
        description,
        probability,
    })
}

fn string_field(index: usize, obj: &Map<String, Value>, field: &str) -> Result<String> {
    match obj.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(AppError::unparseable(
            SERVICE,
            format!("strategy {} field \"{}\" is not a string", index, field),
        )),
        None => Err(missing(index, field)),
    }
}

fn missing(index: usize, field: &str) -> AppError {
    AppError::unparseable(
        SERVICE,
        format!("strategy {} is missing \"{}\"", index, field),
    )
}
