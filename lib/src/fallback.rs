// Copyright 2026 The optschema contributors
//
// This file is part of the `optschema` command-line argument parsing library.
//
// Licensed under the MIT license or the Apache license (version 2.0), at your option. You may not
// copy, modify, or distribute this file except in compliance with said license. You can find copies
// of these licenses either in the LICENSE-MIT and LICENSE-APACHE files, or alternatively at
// <http://opensource.org/licenses/MIT> and <http://www.apache.org/licenses/LICENSE-2.0>
// respectively.

//! Default and environment fallback, run once per scope after the main parse loop.
//!
//! For each option not yet specified, in schema declaration order: try reading standard input,
//! then each configured source, then enforce `required`, then apply `default`.

use std::io::IsTerminal;

use crate::context::ParseContext;
use crate::error::{Error, Result};
use crate::params;
use crate::schema::{DefaultValue, OptionDef, OptionKind, ParamInfo, Source};
use crate::value::Value;

/// Run fallback resolution over every unspecified key in `ctx.schema`.
pub fn run(ctx: &mut ParseContext) -> Result<()> {
    let keys: Vec<String> = ctx.schema.keys().cloned().collect();
    for key in keys {
        if ctx.is_specified(&key) {
            continue;
        }
        let opt = ctx.schema.get(&key).expect("schema key came from this schema").clone();
        if matches!(opt.kind, OptionKind::Help | OptionKind::Version | OptionKind::Command) {
            continue;
        }

        if try_stdin(ctx, &key, &opt)? {
            continue;
        }
        if try_sources(ctx, &key, &opt)? {
            continue;
        }
        if opt.required {
            log::warn!(target: "optschema::fallback", "required option `{key}` was never specified");
            return Err(Error::MissingRequiredOption { key: key.clone() });
        }
        if let Some(default) = opt.default.clone() {
            apply_default(ctx, &key, &opt, &default)?;
        }
    }
    Ok(())
}

fn try_stdin(ctx: &mut ParseContext, key: &str, opt: &OptionDef) -> Result<bool> {
    if !opt.stdin || ctx.stdin_used.get() {
        return Ok(false);
    }
    let non_interactive = !std::io::stdin().is_terminal();
    if !(opt.required || non_interactive) {
        return Ok(false);
    }

    use std::io::Read;
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .map_err(|source| Error::SourceReadFailed { key: key.to_string(), source })?;
    ctx.stdin_used.set(true);
    log::debug!(target: "optschema::fallback", "option `{key}` filled from standard input");
    store_fallback_value(ctx, key, opt, "0", buf.trim_end_matches('\n'))?;
    Ok(true)
}

fn try_sources(ctx: &mut ParseContext, key: &str, opt: &OptionDef) -> Result<bool> {
    for source in &opt.sources {
        let found = match source {
            Source::EnvVar(name) => std::env::var(name).ok(),
            Source::File(path) => std::fs::read_to_string(path).ok(),
        };
        if let Some(raw) = found {
            if raw.is_empty() {
                continue;
            }
            log::debug!(target: "optschema::fallback", "option `{key}` filled from `{}`", source.synthetic_name());
            store_fallback_value(ctx, key, opt, &source.synthetic_name(), raw.trim_end_matches('\n'))?;
            return Ok(true);
        }
    }
    Ok(false)
}

/// Feed one fallback-sourced string through the same per-kind storage pipeline a CLI-supplied
/// occurrence of the option would use, then mark it specified.
fn store_fallback_value(ctx: &mut ParseContext, key: &str, opt: &OptionDef, name: &str, raw: &str) -> Result<()> {
    let value = match opt.kind {
        OptionKind::Function => {
            let params_list = [raw.to_string()];
            let skip_count = std::cell::Cell::new(0);
            let info =
                ParamInfo { values: &ctx.values, index: 0, name, comp: ctx.is_completing(), skip_count: &skip_count };
            params::invoke_parse(key, opt, &params_list, info)?
        }
        OptionKind::Array => {
            let pieces = params::split_separator(opt, raw);
            let mut items = Vec::with_capacity(pieces.len());
            for piece in &pieces {
                items.push(params::process_scalar(key, opt, piece)?);
            }
            let existing = ctx.values.get(key).cloned();
            params::merge_array(key, opt, existing.as_ref(), items)?
        }
        _ => params::process_scalar(key, opt, raw)?,
    };
    ctx.values.insert(key.to_string(), value);
    ctx.mark_specified(key);
    Ok(())
}

fn apply_default(ctx: &mut ParseContext, key: &str, opt: &OptionDef, default: &DefaultValue) -> Result<()> {
    let value = match default {
        DefaultValue::Literal(v) => v.clone(),
        DefaultValue::Callback(f) => f(&ctx.values),
    };
    let value = match (&opt.kind, value) {
        (OptionKind::Array, Value::Array(items)) => params::merge_array(key, opt, None, items)?,
        (_, v) => v,
    };
    log::debug!(target: "optschema::fallback", "option `{key}` filled from its default");
    ctx.values.insert(key.to_string(), value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ParseFlags;
    use crate::schema::{OptionDef, Schema};

    #[test]
    fn missing_required_option_errors() {
        let mut schema = Schema::new();
        schema.insert("s".into(), OptionDef::single().name("-s").required(true));
        let mut ctx = ParseContext::new(&schema, ParseFlags::default());
        let err = run(&mut ctx).unwrap_err();
        assert!(matches!(err, Error::MissingRequiredOption { key } if key == "s"));
    }

    #[test]
    fn literal_default_is_stored() {
        let mut schema = Schema::new();
        schema.insert("s".into(), OptionDef::single().name("-s").default_value(Value::String("x".into())));
        let mut ctx = ParseContext::new(&schema, ParseFlags::default());
        run(&mut ctx).unwrap();
        assert_eq!(ctx.values.get("s"), Some(&Value::String("x".into())));
    }

    #[test]
    fn env_source_is_preferred_over_default() {
        std::env::set_var("OPTSCHEMA_TEST_FALLBACK_VAR", "from-env");
        let mut schema = Schema::new();
        schema.insert(
            "s".into(),
            OptionDef::single()
                .name("-s")
                .source_env("OPTSCHEMA_TEST_FALLBACK_VAR")
                .default_value(Value::String("default".into())),
        );
        let mut ctx = ParseContext::new(&schema, ParseFlags::default());
        run(&mut ctx).unwrap();
        assert_eq!(ctx.values.get("s"), Some(&Value::String("from-env".into())));
        std::env::remove_var("OPTSCHEMA_TEST_FALLBACK_VAR");
    }
}
