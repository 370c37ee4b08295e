// Copyright 2026 The optschema contributors
//
// This file is part of the `optschema` command-line argument parsing library.
//
// Licensed under the MIT license or the Apache license (version 2.0), at your option. You may not
// copy, modify, or distribute this file except in compliance with said license. You can find copies
// of these licenses either in the LICENSE-MIT and LICENSE-APACHE files, or alternatively at
// <http://opensource.org/licenses/MIT> and <http://www.apache.org/licenses/LICENSE-2.0>
// respectively.

//! The niladic handler: executes `flag`, `command`, `help` and `version` options.
//!
//! `command` recursion calls back into [`crate::engine::run`] with a fresh, nested context; the
//! two modules are mutually dependent at the function-call level, which is unremarkable in a
//! single crate and avoids inventing an indirection layer neither the schema nor the engine needs.

use crate::context::ParseContext;
use crate::error::{Error, Message, Result};
use crate::schema::{OptionDef, ParamInfo, Schema, SchemaSource, VersionSpec};
use crate::value::Value;

/// Resolve a `command` option's nested schema. `Module` sources are a documented gap: Rust has no
/// analogue of dynamically importing a schema value from a module specifier string, so this
/// implementation supports only schemas that are already in hand (`Inline`) or produced by a
/// callback (`Callback`).
pub fn resolve_schema(key: &str, source: &SchemaSource) -> Result<Schema> {
    match source {
        SchemaSource::Inline(schema) => Ok(schema.clone()),
        SchemaSource::Callback(f) => Ok(f()),
        SchemaSource::Module(_) => Err(Error::ModuleSchemaUnsupported { key: key.to_string() }),
    }
}

/// Handle a `flag` option: store its value and mark it specified.
pub fn handle_flag(ctx: &mut ParseContext, key: &str, opt: &OptionDef, matched_name: &str) -> Result<()> {
    let value = match &opt.parse {
        Some(f) => {
            let skip_count = std::cell::Cell::new(0);
            let info = ParamInfo {
                values: &ctx.values,
                index: 0,
                name: matched_name,
                comp: ctx.is_completing(),
                skip_count: &skip_count,
            };
            f(&[], info).map_err(|message| Error::ParseCallbackFailed { key: key.to_string(), message })?
        }
        None => Value::Bool(true),
    };
    log::debug!(target: "optschema::niladic", "flag `{key}` set via `{matched_name}`");
    ctx.values.insert(key.to_string(), value);
    ctx.mark_specified(key);
    Ok(())
}

/// Handle a `command` option: resolve the nested schema, recursively parse the remainder of the
/// argument list in a fresh scope, and store the result. Consumes every remaining top-level token.
pub fn handle_command(
    ctx: &mut ParseContext,
    key: &str,
    opt: &OptionDef,
    matched_name: &str,
    remaining: Vec<String>,
) -> Result<()> {
    let spec = opt.command.as_ref().expect("command option missing its CommandSpec");
    let nested_schema = resolve_schema(key, &spec.options)?;
    let nested_flags =
        ctx.flags.nested(matched_name, spec.cluster_prefix.as_deref(), spec.option_prefix.as_deref());

    log::debug!(target: "optschema::niladic", "entering nested command `{matched_name}` for option `{key}`");
    let (inner_values, inner_warnings) =
        crate::engine::run(&nested_schema, nested_flags, remaining, ctx.stdin_used.clone())?;
    ctx.warnings.extend(inner_warnings);

    let stored = match &spec.parse {
        Some(f) => f(&inner_values),
        None => Value::Object(inner_values.into_iter().collect()),
    };
    ctx.values.insert(key.to_string(), stored);
    ctx.mark_specified(key);
    Ok(())
}

/// Handle a `version` option: always terminates with a version message.
pub fn handle_version(ctx: &ParseContext, key: &str, opt: &OptionDef) -> Result<()> {
    let spec = opt.version.as_ref().expect("version option missing its VersionSpec");
    let text = match spec {
        VersionSpec::Literal(text) => Some(text.clone()),
        VersionSpec::JsonFile(path) => {
            let resolver = ctx
                .flags
                .resolver
                .as_ref()
                .ok_or_else(|| Error::MissingResolveCallback { key: key.to_string() })?;
            let resolved = resolver(&path.display().to_string());
            let contents = std::fs::read_to_string(&resolved)
                .map_err(|_| Error::VersionFileNotFound(resolved.clone()))?;
            let json: Value =
                serde_json::from_str(&contents).map_err(|_| Error::VersionFileNotFound(resolved.clone()))?;
            json.get("version").and_then(|v| v.as_str()).map(str::to_string)
        }
    };
    log::debug!(target: "optschema::niladic", "version option `{key}` resolved");
    Err(Error::from(Message::Version(text)))
}

/// Handle a `help` option. Returns the number of tokens in `remaining` consumed by
/// `use_command`/`use_filter` navigation. Terminates with a help message unless `save_message` is
/// set, in which case the rendered text is stored at `key` and parsing continues.
pub fn handle_help(ctx: &mut ParseContext, key: &str, opt: &OptionDef, remaining: &[String]) -> Result<usize> {
    let spec = opt.help.as_ref().expect("help option missing its HelpSpec");

    let mut program_name = ctx.flags.program_name.clone();
    let mut nested_schema: Option<Schema> = None;
    let mut consumed = 0usize;

    if spec.use_command {
        if let Some(first) = remaining.first() {
            if let Some(sub_key) = ctx.registry.key_for_name(first) {
                if let Some(cmd_spec) = ctx.schema.get(sub_key).and_then(|o| o.command.as_ref()) {
                    nested_schema = Some(resolve_schema(sub_key, &cmd_spec.options)?);
                    program_name = format!("{program_name} {first}");
                    consumed += 1;
                }
            }
        }
    }

    let filter: Option<Vec<String>> = if spec.use_filter && remaining.len() > consumed {
        let f = remaining[consumed..].to_vec();
        consumed = remaining.len();
        Some(f)
    } else {
        None
    };

    let target_schema = nested_schema.as_ref().unwrap_or(ctx.schema);
    let text = crate::help::format(target_schema, &program_name, filter.as_deref());
    log::debug!(target: "optschema::niladic", "help requested for option `{key}`");

    if spec.save_message {
        ctx.values.insert(key.to_string(), Value::String(text));
        ctx.mark_specified(key);
        Ok(consumed)
    } else {
        Err(Error::from(Message::Help(text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{ParseContext, ParseFlags};
    use crate::schema::OptionDef;

    #[test]
    fn flag_without_parse_stores_true() {
        let mut schema = Schema::new();
        schema.insert("f".into(), OptionDef::flag().name("-f"));
        let mut ctx = ParseContext::new(&schema, ParseFlags::default());
        handle_flag(&mut ctx, "f", schema.get("f").unwrap(), "-f").unwrap();
        assert_eq!(ctx.values.get("f"), Some(&Value::Bool(true)));
        assert!(ctx.is_specified("f"));
    }

    #[test]
    fn version_literal_raises_message() {
        let mut schema = Schema::new();
        schema.insert("v".into(), OptionDef::version(VersionSpec::Literal("1.2.3".into())).name("-v"));
        let ctx = ParseContext::new(&schema, ParseFlags::default());
        let err = handle_version(&ctx, "v", schema.get("v").unwrap()).unwrap_err();
        match err {
            Error::Message(Message::Version(Some(v))) => assert_eq!(v, "1.2.3"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn help_with_save_message_stores_instead_of_terminating() {
        let mut schema = Schema::new();
        schema.insert("h".into(), OptionDef::help().save_message(true).name("--help"));
        let mut ctx = ParseContext::new(&schema, ParseFlags::default());
        let consumed = handle_help(&mut ctx, "h", schema.get("h").unwrap(), &[]).unwrap();
        assert_eq!(consumed, 0);
        assert!(matches!(ctx.values.get("h"), Some(Value::String(_))));
    }
}
