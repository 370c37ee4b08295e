// Copyright 2026 The optschema contributors
//
// This file is part of the `optschema` command-line argument parsing library.
//
// Licensed under the MIT license or the Apache license (version 2.0), at your option. You may not
// copy, modify, or distribute this file except in compliance with said license. You can find copies
// of these licenses either in the LICENSE-MIT and LICENSE-APACHE files, or alternatively at
// <http://opensource.org/licenses/MIT> and <http://www.apache.org/licenses/LICENSE-2.0>
// respectively.

//! The parameter handler: turns raw parameter strings into stored [`Value`]s.
//!
//! Covers the per-value pipeline shared by `single` and `array` options (normalize, then
//! regex/choices constraints, then mapping) and the accumulation policy for `array` options
//! (separator splitting, `append`/`unique`/`limit`). `function` options bypass this pipeline
//! entirely in favor of their own `parse` callback, invoked through [`invoke_parse`].

#[cfg(feature = "regex-constraints")]
use regex::Regex;

use crate::error::{Error, Result};
use crate::schema::{OptionDef, ParamInfo, Separator};
use crate::value::{deep_eq, Value};

/// Apply an option's `normalize` callback, if any, to one raw parameter.
pub fn normalize(opt: &OptionDef, raw: &str) -> String {
    match &opt.normalize {
        Some(f) => f(raw),
        None => raw.to_string(),
    }
}

/// Check a normalized parameter against `regex` and `choices`, in that order.
pub fn check_constraints(key: &str, opt: &OptionDef, normalized: &str) -> Result<()> {
    if !opt.choices.is_empty() && !opt.choices.iter().any(|c| c == normalized) {
        return Err(Error::ChoiceConstraintViolation { key: key.to_string(), value: normalized.to_string() });
    }
    if let Some(pattern) = &opt.regex {
        #[cfg(feature = "regex-constraints")]
        {
            let matches = Regex::new(pattern).map(|re| re.is_match(normalized)).unwrap_or(false);
            if !matches {
                return Err(Error::RegexConstraintViolation {
                    key: key.to_string(),
                    value: normalized.to_string(),
                    pattern: pattern.clone(),
                });
            }
        }
        #[cfg(not(feature = "regex-constraints"))]
        {
            log::warn!(target: "optschema::params", "option `{key}` declares a regex constraint but the `regex-constraints` feature is disabled; skipping");
        }
    }
    Ok(())
}

/// Map a normalized parameter to a stored value, honoring `mapping` if present.
pub fn map_value(opt: &OptionDef, normalized: &str) -> Value {
    if let Some(mapping) = &opt.mapping {
        if let Some(v) = mapping.get(normalized) {
            return v.clone();
        }
    }
    Value::String(normalized.to_string())
}

/// Run one raw parameter through normalize, constraint-check, and mapping.
pub fn process_scalar(key: &str, opt: &OptionDef, raw: &str) -> Result<Value> {
    let normalized = normalize(opt, raw);
    check_constraints(key, opt, &normalized)?;
    Ok(map_value(opt, &normalized))
}

/// Split one raw parameter into pieces per an `array` option's `separator`, if any.
pub fn split_separator(opt: &OptionDef, raw: &str) -> Vec<String> {
    match &opt.separator {
        Some(Separator::Literal(sep)) if !sep.is_empty() => raw.split(sep.as_str()).map(str::to_string).collect(),
        #[cfg(feature = "regex-constraints")]
        Some(Separator::Regex(pattern)) => match Regex::new(pattern) {
            Ok(re) => re.split(raw).map(str::to_string).collect(),
            Err(_) => vec![raw.to_string()],
        },
        _ => vec![raw.to_string()],
    }
}

/// Merge freshly produced array items into an option's accumulated value, honoring `append`,
/// `unique`, and `limit`.
pub fn merge_array(key: &str, opt: &OptionDef, existing: Option<&Value>, new_items: Vec<Value>) -> Result<Value> {
    let mut items: Vec<Value> = match existing {
        Some(Value::Array(v)) if opt.append => v.clone(),
        _ => Vec::new(),
    };
    for item in new_items {
        if opt.unique && items.iter().any(|v| deep_eq(v, &item)) {
            continue;
        }
        items.push(item);
        if let Some(limit) = opt.limit {
            if items.len() > limit {
                return Err(Error::LimitConstraintViolation { key: key.to_string(), limit });
            }
        }
    }
    Ok(Value::Array(items))
}

/// Invoke a `function` option's `parse` callback (or, absent one, fall back to storing the raw
/// parameters verbatim as a JSON array of strings).
pub fn invoke_parse(key: &str, opt: &OptionDef, raw_params: &[String], info: ParamInfo<'_>) -> Result<Value> {
    match &opt.parse {
        Some(f) => f(raw_params, info)
            .map_err(|message| Error::ParseCallbackFailed { key: key.to_string(), message }),
        None => Ok(Value::Array(raw_params.iter().cloned().map(Value::String).collect())),
    }
}
