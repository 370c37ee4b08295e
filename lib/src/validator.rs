// Copyright 2026 The optschema contributors
//
// This file is part of the `optschema` command-line argument parsing library.
//
// Licensed under the MIT license or the Apache license (version 2.0), at your option. You may not
// copy, modify, or distribute this file except in compliance with said license. You can find copies
// of these licenses either in the LICENSE-MIT and LICENSE-APACHE files, or alternatively at
// <http://opensource.org/licenses/MIT> and <http://www.apache.org/licenses/LICENSE-2.0>
// respectively.

//! The schema validator: enforces the well-formedness invariants parsing depends on.
//!
//! Recurses into `command` nested schemas with a visited-set keyed on [`SchemaSource::callback_identity`]
//! to guard against a provider callback returning the same schema it was already asked to validate.

use std::collections::{HashMap, HashSet};

use crate::context::DEFAULT_SIMILARITY_THRESHOLD;
use crate::error::{Error, Result, Warning};
use crate::niladic;
use crate::schema::{OptionDef, OptionKind, Schema, Separator, Source};
use crate::value::Value;

/// Validate `schema` and every nested `command` schema it (transitively) resolves to. Returns the
/// accumulated warnings, or the first fatal error encountered.
pub fn validate(schema: &Schema, similarity_threshold: f64) -> Result<Vec<Warning>> {
    let mut visited: HashSet<*const ()> = HashSet::new();
    let mut warnings = Vec::new();
    validate_level(schema, similarity_threshold, &mut visited, &mut warnings)?;
    Ok(warnings)
}

fn validate_level(
    schema: &Schema,
    similarity_threshold: f64,
    visited: &mut HashSet<*const ()>,
    warnings: &mut Vec<Warning>,
) -> Result<()> {
    check_names(schema)?;
    check_cluster_letters(schema)?;
    check_positional(schema)?;
    check_per_option(schema)?;
    check_requirements(schema)?;
    collect_warnings(schema, similarity_threshold, warnings);

    for (key, opt) in schema {
        if opt.kind != OptionKind::Command {
            continue;
        }
        let spec = opt.command.as_ref().expect("command option missing its CommandSpec");
        if let Some(identity) = spec.options.callback_identity() {
            if !visited.insert(identity) {
                log::trace!(target: "optschema::validator", "skipping already-visited nested schema for `{key}`");
                continue;
            }
        }
        let nested = niladic::resolve_schema(key, &spec.options)?;
        log::debug!(target: "optschema::validator", "recursing into nested command `{key}`");
        validate_level(&nested, similarity_threshold, visited, warnings)?;
    }
    Ok(())
}

/// Every identifier a single schema level must keep unique: option names, trailing markers, and
/// environment-variable source names, all sharing one namespace.
fn check_names(schema: &Schema) -> Result<()> {
    let mut seen: HashMap<String, String> = HashMap::new();
    for (key, opt) in schema {
        let mut identifiers: Vec<&str> = opt.present_names().collect();
        if let Some(marker) = &opt.trailing_marker {
            identifiers.push(marker.as_str());
        }
        let env_names: Vec<&str> = opt
            .sources
            .iter()
            .filter_map(|s| if let Source::EnvVar(name) = s { Some(name.as_str()) } else { None })
            .collect();
        identifiers.extend(env_names);

        for name in identifiers {
            if name.is_empty() || name.chars().any(|c| c.is_whitespace() || c == '=') {
                return Err(Error::InvalidName(name.to_string()));
            }
            if let Some(owner) = seen.insert(name.to_string(), key.clone()) {
                if owner != *key {
                    return Err(Error::DuplicateName(name.to_string()));
                }
            }
        }
    }
    Ok(())
}

fn check_cluster_letters(schema: &Schema) -> Result<()> {
    let mut seen: HashMap<char, String> = HashMap::new();
    for (key, opt) in schema {
        for letter in &opt.cluster {
            if !letter.is_alphanumeric() {
                return Err(Error::InvalidClusterLetter(*letter));
            }
            if let Some(owner) = seen.insert(*letter, key.clone()) {
                if owner != *key {
                    return Err(Error::DuplicateClusterLetter(*letter));
                }
            }
        }
    }
    Ok(())
}

fn check_positional(schema: &Schema) -> Result<()> {
    let positional: Vec<&String> = schema.iter().filter(|(_, o)| o.positional).map(|(k, _)| k).collect();
    if positional.len() > 1 {
        return Err(Error::DuplicatePositionalOption {
            first: positional[0].clone(),
            second: positional[1].clone(),
        });
    }
    Ok(())
}

fn check_per_option(schema: &Schema) -> Result<()> {
    for (key, opt) in schema {
        check_choices(key, opt)?;
        check_param_count(key, opt)?;
        check_inline_policy(key, opt)?;
        check_array_default(key, opt)?;
        check_separator_kind(key, opt)?;
        check_required_conflict(key, opt)?;
    }
    Ok(())
}

/// `required` excludes `default` and `required_if`: a fallback that can never be consulted,
/// since `fallback::run` only reaches the default/`required_if` checks once the `required` branch
/// has already raised `MissingRequiredOption` for an absent value.
fn check_required_conflict(key: &str, opt: &OptionDef) -> Result<()> {
    if opt.required && (opt.default.is_some() || opt.required_if.is_some()) {
        return Err(Error::RequiredWithFallback { key: key.to_string() });
    }
    Ok(())
}

fn check_choices(key: &str, opt: &OptionDef) -> Result<()> {
    let mut seen = HashSet::new();
    for choice in &opt.choices {
        if !seen.insert(choice) {
            return Err(Error::DuplicateChoiceValue { key: key.to_string(), value: choice.clone() });
        }
    }
    Ok(())
}

fn check_param_count(key: &str, opt: &OptionDef) -> Result<()> {
    if opt.kind == OptionKind::Function && !opt.param_count.is_valid() {
        return Err(Error::InvalidParamCount { key: key.to_string() });
    }
    Ok(())
}

fn check_inline_policy(key: &str, opt: &OptionDef) -> Result<()> {
    use crate::schema::InlinePolicy;
    if opt.inline == InlinePolicy::Required && opt.is_variadic() && opt.separator.is_none() && !opt.append {
        return Err(Error::InvalidInlineConstraint { key: key.to_string() });
    }
    Ok(())
}

fn check_array_default(key: &str, opt: &OptionDef) -> Result<()> {
    if opt.kind != OptionKind::Array {
        return Ok(());
    }
    if let Some(crate::schema::DefaultValue::Literal(Value::Array(items))) = &opt.default {
        if opt.unique {
            let mut seen = Vec::new();
            for item in items {
                if seen.iter().any(|v| crate::value::deep_eq(v, item)) {
                    return Err(Error::InvalidArrayDefault { key: key.to_string() });
                }
                seen.push(item.clone());
            }
        }
        if let Some(limit) = opt.limit {
            if items.len() > limit {
                return Err(Error::InvalidArrayDefault { key: key.to_string() });
            }
        }
    }
    Ok(())
}

fn check_separator_kind(key: &str, opt: &OptionDef) -> Result<()> {
    if let Some(Separator::Literal(sep)) = &opt.separator {
        if sep.is_empty() {
            log::warn!(target: "optschema::validator", "option `{key}` declares an empty literal separator; it will not split anything");
        }
    }
    Ok(())
}

fn check_requirements(schema: &Schema) -> Result<()> {
    for (key, opt) in schema {
        for req in [&opt.requires, &opt.required_if].into_iter().flatten() {
            let mut referenced = HashSet::new();
            req.referenced_keys(&mut referenced);
            for target in &referenced {
                if target == key {
                    return Err(Error::SelfRequirement { key: key.clone() });
                }
                let target_opt = schema
                    .get(target)
                    .ok_or_else(|| Error::UnknownRequiredOption { key: key.clone(), target: target.clone() })?;
                if target_opt.kind.is_message_kind() {
                    return Err(Error::InvalidRequiredOption { key: key.clone(), target: target.clone() });
                }
            }
            let mut equals_targets = Vec::new();
            req.equals_targets(&mut equals_targets);
            for target in &equals_targets {
                if let Some(target_opt) = schema.get(target) {
                    if target_opt.required || target_opt.default.is_some() {
                        return Err(Error::InvalidRequiredValue { key: key.clone(), target: target.clone() });
                    }
                }
            }
        }
    }
    Ok(())
}

/// Collect non-fatal warnings: mixed naming convention per name slot, suspiciously similar names,
/// and variadic options carrying a cluster letter.
fn collect_warnings(schema: &Schema, similarity_threshold: f64, warnings: &mut Vec<Warning>) {
    warn_mixed_conventions(schema, warnings);
    warn_similar_names(schema, similarity_threshold, warnings);
    warn_variadic_cluster(schema, warnings);
}

#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash)]
enum DashStyle {
    None,
    Single,
    Double,
}

#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash)]
enum CaseStyle {
    Lower,
    Upper,
    Capitalized,
    Mixed,
}

/// The word-separator convention a multi-word name body follows: hyphens (`foo-bar`), underscores
/// (`foo_bar`), colons (`foo:bar`), or none of those (a single word, or a mix of separators).
#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash)]
enum WordSeparatorStyle {
    Kebab,
    Snake,
    Colon,
    None,
}

fn dash_style(name: &str) -> DashStyle {
    let dashes = name.chars().take_while(|&c| c == '-').count();
    match dashes {
        0 => DashStyle::None,
        1 => DashStyle::Single,
        _ => DashStyle::Double,
    }
}

fn word_separator_style(name: &str) -> WordSeparatorStyle {
    let body = name.trim_start_matches('-');
    let has = |c: char| body.contains(c);
    match (has('-'), has('_'), has(':')) {
        (true, false, false) => WordSeparatorStyle::Kebab,
        (false, true, false) => WordSeparatorStyle::Snake,
        (false, false, true) => WordSeparatorStyle::Colon,
        _ => WordSeparatorStyle::None,
    }
}

fn case_style(name: &str) -> CaseStyle {
    let body: String = name.trim_start_matches('-').chars().filter(|c| c.is_alphabetic()).collect();
    if body.is_empty() {
        return CaseStyle::Lower;
    }
    if body.chars().all(|c| c.is_lowercase()) {
        CaseStyle::Lower
    } else if body.chars().all(|c| c.is_uppercase()) {
        CaseStyle::Upper
    } else if body.chars().next().unwrap().is_uppercase() && body.chars().skip(1).all(|c| c.is_lowercase()) {
        CaseStyle::Capitalized
    } else {
        CaseStyle::Mixed
    }
}

fn warn_mixed_conventions(schema: &Schema, warnings: &mut Vec<Warning>) {
    let max_slots = schema.values().map(|o| o.names.len()).max().unwrap_or(0);
    for slot in 0..max_slots {
        let names: Vec<&str> =
            schema.values().filter_map(|o| o.names.get(slot).and_then(|n| n.as_deref())).collect();
        if names.len() < 2 {
            continue;
        }
        let dash_styles: HashSet<DashStyle> = names.iter().map(|n| dash_style(n)).collect();
        let case_styles: HashSet<CaseStyle> = names.iter().map(|n| case_style(n)).collect();
        let separator_styles: HashSet<WordSeparatorStyle> =
            names.iter().map(|n| word_separator_style(n)).filter(|s| *s != WordSeparatorStyle::None).collect();
        if dash_styles.len() > 1 || case_styles.len() > 1 || separator_styles.len() > 1 {
            warnings.push(Warning::MixedNamingConvention { slot });
        }
    }
}

fn warn_similar_names(schema: &Schema, threshold: f64, warnings: &mut Vec<Warning>) {
    #[cfg(not(feature = "suggestions"))]
    {
        let _ = (schema, threshold, warnings);
        return;
    }
    #[cfg(feature = "suggestions")]
    {
        let all_names: Vec<&str> = schema.values().flat_map(|o| o.present_names()).collect();
        for i in 0..all_names.len() {
            for j in (i + 1)..all_names.len() {
                let score = strsim::jaro_winkler(all_names[i], all_names[j]);
                if score >= threshold && all_names[i] != all_names[j] {
                    warnings.push(Warning::TooSimilarNames {
                        a: all_names[i].to_string(),
                        b: all_names[j].to_string(),
                        score,
                    });
                }
            }
        }
    }
}

fn warn_variadic_cluster(schema: &Schema, warnings: &mut Vec<Warning>) {
    for (key, opt) in schema {
        if opt.is_variadic() {
            for letter in &opt.cluster {
                warnings.push(Warning::VariadicWithClusterLetter { key: key.clone(), letter: *letter });
            }
        }
    }
}

/// The similarity threshold used when no caller override is given.
pub const DEFAULT_THRESHOLD: f64 = DEFAULT_SIMILARITY_THRESHOLD;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requirement::Requirement;
    use crate::schema::OptionDef;

    #[test]
    fn rejects_duplicate_names() {
        let mut schema = Schema::new();
        schema.insert("a".into(), OptionDef::flag().name("-f"));
        schema.insert("b".into(), OptionDef::flag().name("-f"));
        let err = validate(&schema, DEFAULT_THRESHOLD).unwrap_err();
        assert!(matches!(err, Error::DuplicateName(n) if n == "-f"));
    }

    #[test]
    fn rejects_self_requirement() {
        let mut schema = Schema::new();
        schema.insert("a".into(), OptionDef::flag().name("-a").requires(Requirement::key("a")));
        let err = validate(&schema, DEFAULT_THRESHOLD).unwrap_err();
        assert!(matches!(err, Error::SelfRequirement { key } if key == "a"));
    }

    #[test]
    fn rejects_requirement_on_unknown_key() {
        let mut schema = Schema::new();
        schema.insert("a".into(), OptionDef::flag().name("-a").requires(Requirement::key("ghost")));
        let err = validate(&schema, DEFAULT_THRESHOLD).unwrap_err();
        assert!(matches!(err, Error::UnknownRequiredOption { target, .. } if target == "ghost"));
    }

    #[test]
    fn rejects_requirement_on_message_option() {
        let mut schema = Schema::new();
        schema.insert("h".into(), OptionDef::help().name("--help"));
        schema.insert("a".into(), OptionDef::flag().name("-a").requires(Requirement::key("h")));
        let err = validate(&schema, DEFAULT_THRESHOLD).unwrap_err();
        assert!(matches!(err, Error::InvalidRequiredOption { target, .. } if target == "h"));
    }

    #[test]
    fn rejects_duplicate_positional_options() {
        let mut schema = Schema::new();
        schema.insert("a".into(), OptionDef::single().positional(true));
        schema.insert("b".into(), OptionDef::single().positional(true));
        assert!(validate(&schema, DEFAULT_THRESHOLD).is_err());
    }

    #[test]
    fn rejects_required_option_with_a_default() {
        use crate::value::Value;
        let mut schema = Schema::new();
        schema.insert(
            "a".into(),
            OptionDef::single().name("-a").required(true).default_value(Value::String("x".into())),
        );
        let err = validate(&schema, DEFAULT_THRESHOLD).unwrap_err();
        assert!(matches!(err, Error::RequiredWithFallback { key } if key == "a"));
    }

    #[test]
    fn rejects_required_option_with_a_required_if() {
        let mut schema = Schema::new();
        schema.insert("b".into(), OptionDef::flag().name("-b"));
        schema.insert(
            "a".into(),
            OptionDef::single().name("-a").required(true).required_if(Requirement::key("b")),
        );
        let err = validate(&schema, DEFAULT_THRESHOLD).unwrap_err();
        assert!(matches!(err, Error::RequiredWithFallback { key } if key == "a"));
    }

    #[test]
    fn warns_on_mixed_naming_convention() {
        let mut schema = Schema::new();
        schema.insert("a".into(), OptionDef::flag().name("--fooBar"));
        schema.insert("b".into(), OptionDef::flag().name("--foo-baz"));
        let warnings = validate(&schema, DEFAULT_THRESHOLD).unwrap();
        assert!(warnings.iter().any(|w| matches!(w, Warning::MixedNamingConvention { .. })));
    }

    #[test]
    fn warns_on_mixed_word_separator_convention() {
        let mut schema = Schema::new();
        schema.insert("a".into(), OptionDef::flag().name("--foo-bar"));
        schema.insert("b".into(), OptionDef::flag().name("--foo_bar"));
        let warnings = validate(&schema, DEFAULT_THRESHOLD).unwrap();
        assert!(warnings.iter().any(|w| matches!(w, Warning::MixedNamingConvention { .. })));
    }
}
