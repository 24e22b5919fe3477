//! Class-name joining and merging
//!
//! `class_names` flattens loosely typed values (strings, numbers, arrays,
//! `{class: condition}` objects) into a single space separated class list.
//! `merge_class_names` applies that join key-wise across several partial
//! `{slot: classes}` mappings, which is how component style overrides are
//! layered on top of defaults.

use serde_json::{Number, Value};
use std::collections::BTreeMap;

/// Merged class lists keyed by component slot (e.g. "root", "label")
pub type ClassNameSet = BTreeMap<String, String>;

/// Join the truthy tokens of `values` with single spaces
///
/// - non-empty strings are kept as-is
/// - non-zero numbers are stringified
/// - arrays are flattened recursively
/// - objects contribute every key whose value is truthy
/// - booleans, null and empty strings are dropped
pub fn class_names<'a, I>(values: I) -> String
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut tokens = Vec::new();
    for value in values {
        collect_tokens(value, &mut tokens);
    }
    tokens.join(" ")
}

/// Merge partial class-name mappings key by key, left to right
///
/// Non-object arguments are ignored. A key appears in the result only if at
/// least one partial contributed a non-empty class list for it.
pub fn merge_class_names<'a, I>(partials: I) -> ClassNameSet
where
    I: IntoIterator<Item = &'a Value>,
{
    partials
        .into_iter()
        .fold(ClassNameSet::new(), |mut acc, partial| {
            if let Value::Object(entries) = partial {
                for (key, value) in entries {
                    let current = acc
                        .get(key)
                        .map(|s| Value::String(s.clone()))
                        .unwrap_or(Value::Null);

                    let class_name = class_names([&current, value]);
                    if !class_name.is_empty() {
                        acc.insert(key.clone(), class_name);
                    }
                }
            }
            acc
        })
}

fn collect_tokens(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) if !s.is_empty() => out.push(s.clone()),
        Value::Number(n) => out.extend(number_token(n)),
        Value::Array(items) => {
            for item in items {
                collect_tokens(item, out);
            }
        }
        Value::Object(entries) => {
            for (key, condition) in entries {
                if !key.is_empty() && is_truthy(condition) {
                    out.push(key.clone());
                }
            }
        }
        _ => {}
    }
}

fn number_token(n: &Number) -> Option<String> {
    if let Some(i) = n.as_i64() {
        return (i != 0).then(|| i.to_string());
    }
    if let Some(u) = n.as_u64() {
        return (u != 0).then(|| u.to_string());
    }

    let f = n.as_f64()?;
    if f == 0.0 || !f.is_finite() {
        return None;
    }
    if f.fract() == 0.0 {
        Some(format!("{:.0}", f))
    } else {
        Some(f.to_string())
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => number_token(n).is_some(),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
