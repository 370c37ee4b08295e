// Copyright 2026 The optschema contributors
//
// This file is part of the `optschema` command-line argument parsing library.
//
// Licensed under the MIT license or the Apache license (version 2.0), at your option. You may not
// copy, modify, or distribute this file except in compliance with said license. You can find copies
// of these licenses either in the LICENSE-MIT and LICENSE-APACHE files, or alternatively at
// <http://opensource.org/licenses/MIT> and <http://www.apache.org/licenses/LICENSE-2.0>
// respectively.

//! The parser state machine and the crate's four public entry points.
//!
//! `run_loop` scans the token list left to right, dispatching each matched option to either the
//! niladic handler or the parameter handler in one atomic step rather than threading an explicit
//! "collecting" enum across loop iterations: every non-niladic option consumes exactly the tokens
//! it needs (one, for `single`/`array`; a `param_count`-bounded run, for `function`) before control
//! returns to the scan. This is observationally the same state machine the design note describes,
//! expressed with the call stack standing in for the `collecting` state instead of a stored enum.

use std::cell::Cell;
use std::rc::Rc;

use crate::classify;
use crate::cluster::{self, ClusterOutcome};
use crate::completion;
use crate::context::{ParseContext, ParseFlags};
use crate::error::{Error, Message, Result, Warning};
use crate::fallback;
use crate::help::{self, FormatFlags};
use crate::niladic;
use crate::params;
use crate::requirement;
use crate::schema::{InlinePolicy, OptionDef, OptionKind, ParamInfo, Schema};
use crate::tokenize;
use crate::validator;
use crate::value::ValuesMap;

/// A command line as accepted by [`parse`]/[`parse_into`]: either a raw string to be tokenized, or
/// an already-split sequence of tokens (in which case no completion sentinel is inserted - embed
/// one directly in a token if needed).
pub enum CommandLine {
    Raw(String),
    Tokens(Vec<String>),
}

impl From<&str> for CommandLine {
    fn from(s: &str) -> Self {
        CommandLine::Raw(s.to_string())
    }
}

impl From<String> for CommandLine {
    fn from(s: String) -> Self {
        CommandLine::Raw(s)
    }
}

impl From<Vec<String>> for CommandLine {
    fn from(v: Vec<String>) -> Self {
        CommandLine::Tokens(v)
    }
}

impl<const N: usize> From<[&str; N]> for CommandLine {
    fn from(v: [&str; N]) -> Self {
        CommandLine::Tokens(v.iter().map(|s| s.to_string()).collect())
    }
}

fn resolve_tokens(command_line: CommandLine, flags: &ParseFlags) -> Vec<String> {
    match command_line {
        CommandLine::Raw(line) => tokenize::tokenize(&line, flags.completion_index),
        CommandLine::Tokens(tokens) => tokens,
    }
}

/// The outcome of a successful [`parse`] call.
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    pub values: ValuesMap,
    pub warnings: Vec<Warning>,
}

/// Parse `command_line` against `schema`, starting from an empty values map.
pub fn parse(schema: &Schema, command_line: impl Into<CommandLine>, flags: Option<ParseFlags>) -> Result<ParseOutcome> {
    let flags = flags.unwrap_or_default();
    let tokens = resolve_tokens(command_line.into(), &flags);
    let (values, warnings) = run(schema, flags, tokens, Rc::new(Cell::new(false)))?;
    Ok(ParseOutcome { values, warnings })
}

/// Parse `command_line` against `schema`, mutating `values` in place. Keys already present in
/// `values` before the call count as specified, so later requirement checks and fallback
/// resolution treat them exactly as if the caller had supplied them on the command line.
pub fn parse_into(
    schema: &Schema,
    values: &mut ValuesMap,
    command_line: impl Into<CommandLine>,
    flags: Option<ParseFlags>,
) -> Result<Vec<Warning>> {
    let flags = flags.unwrap_or_default();
    let tokens = resolve_tokens(command_line.into(), &flags);
    let seed = std::mem::take(values);
    let (produced, warnings) = run_seeded(schema, flags, tokens, Rc::new(Cell::new(false)), seed)?;
    *values = produced;
    Ok(warnings)
}

/// Validate `schema` (and every nested `command` schema it resolves to).
pub fn validate(schema: &Schema, flags: Option<ParseFlags>) -> Result<Vec<Warning>> {
    let flags = flags.unwrap_or_default();
    validator::validate(schema, flags.similarity_threshold)
}

/// Render `schema` into a plain-text help document.
pub fn format(
    schema: &Schema,
    program_name: &str,
    filter: Option<&[String]>,
    format_flags: Option<FormatFlags>,
) -> String {
    match format_flags {
        Some(f) => help::format_with(schema, program_name, filter, &f),
        None => help::format(schema, program_name, filter),
    }
}

/// Run one parse over `schema`, starting from an empty values map. Exposed at `pub(crate)` since
/// `command` options recurse into it directly (see [`crate::niladic::handle_command`]).
pub(crate) fn run(
    schema: &Schema,
    flags: ParseFlags,
    tokens: Vec<String>,
    stdin_used: Rc<Cell<bool>>,
) -> Result<(ValuesMap, Vec<Warning>)> {
    run_seeded(schema, flags, tokens, stdin_used, ValuesMap::new())
}

fn run_seeded(
    schema: &Schema,
    flags: ParseFlags,
    tokens: Vec<String>,
    stdin_used: Rc<Cell<bool>>,
    seed: ValuesMap,
) -> Result<(ValuesMap, Vec<Warning>)> {
    let mut ctx = ParseContext::with_stdin_flag(schema, flags, stdin_used);
    ctx.values = seed;
    let seeded_keys: Vec<String> = ctx.values.keys().cloned().collect();
    for key in seeded_keys {
        ctx.mark_specified(&key);
    }

    let mut tokens = tokens;
    run_loop(&mut ctx, &mut tokens)?;

    if !ctx.completion_done {
        fallback::run(&mut ctx)?;
        check_requirements(&ctx)?;
    }
    Ok((ctx.values, ctx.warnings))
}

/// The main scanning loop: classify each token per the ranked rules and dispatch it, splicing
/// cluster expansions back into `tokens` in place.
fn run_loop(ctx: &mut ParseContext, tokens: &mut Vec<String>) -> Result<()> {
    let mut i = 0;
    while i < tokens.len() {
        if classify::is_completion_token(&tokens[i]) {
            let prefix = classify::strip_sentinel(&tokens[i]);
            return handle_completion(ctx, &prefix, tokens, i);
        }

        let token = tokens[i].clone();
        let (body, inline) = classify::split_inline(&token);

        if let Some(key) = ctx.registry.key_for_name(body).map(str::to_string) {
            let opt = ctx.schema.get(&key).expect("registry key resolves in its own schema").clone();
            if opt.deprecated {
                log::debug!(target: "optschema::engine", "deprecated option `{key}` used as `{body}`");
                ctx.warnings.push(Warning::DeprecatedOptionUsed { key: key.clone() });
            }
            if opt.trailing_marker.as_deref() == Some(body) {
                log::debug!(target: "optschema::engine", "trailing marker `{body}` matched for `{key}`; consuming the rest of the arguments");
                let rest = tokens[i + 1..].to_vec();
                handle_trailing_marker(ctx, &key, &opt, &rest)?;
                break;
            }
            let start = i + 1;
            match dispatch_named(ctx, &key, &opt, body, inline, tokens, start) {
                Ok(next) => i = next,
                Err(e) if ctx.is_completing() && !e.is_message() => {
                    log::debug!(target: "optschema::engine", "swallowing error on `{key}` while completing: {e}");
                    i = start;
                }
                Err(e) => return Err(e),
            }
            if ctx.completion_done {
                return Ok(());
            }
            if opt.brk {
                log::debug!(target: "optschema::engine", "option `{key}` triggered `break`; ending the scan");
                break;
            }
            continue;
        }

        if classify::looks_option_shaped(&token, &ctx.flags.cluster_prefix) {
            let stripped = &token[ctx.flags.cluster_prefix.len()..];
            match cluster::expand(stripped, &ctx.flags.cluster_prefix, &ctx.registry, ctx.schema) {
                Ok(ClusterOutcome::Expanded(names)) => {
                    log::trace!(target: "optschema::engine", "expanded cluster token `{token}` into {names:?}");
                    tokens.splice(i..i + 1, names);
                    continue;
                }
                Ok(ClusterOutcome::NotACluster) => {}
                Err(e) if ctx.is_completing() => {
                    log::debug!(target: "optschema::engine", "swallowing cluster error on `{token}` while completing: {e}");
                    i += 1;
                    continue;
                }
                Err(e) => return Err(e),
            }
        }

        if let Some(pos_key) = ctx.registry.positional_key().map(str::to_string) {
            if !classify::looks_option_shaped(&token, &ctx.flags.option_prefix) {
                let opt = ctx.schema.get(&pos_key).expect("registry key resolves in its own schema").clone();
                match store_one(ctx, &pos_key, &opt, &token, &token) {
                    Ok(()) => {}
                    Err(e) if ctx.is_completing() && !e.is_message() => {
                        log::debug!(target: "optschema::engine", "swallowing positional error on `{token}` while completing: {e}");
                    }
                    Err(e) => return Err(e),
                }
                i += 1;
                continue;
            }
        }

        if ctx.is_completing() {
            log::debug!(target: "optschema::engine", "swallowing unknown token `{token}` while completing");
            i += 1;
            continue;
        }
        let suggestion = suggest(ctx, body);
        log::warn!(target: "optschema::engine", "unknown option `{token}`");
        return Err(Error::UnknownOption { name: token, suggestion });
    }
    Ok(())
}

/// Dispatch a matched option name: niladic kinds go through [`crate::niladic`], everything else
/// through [`consume_params`]. Returns the index to resume scanning from.
fn dispatch_named(
    ctx: &mut ParseContext,
    key: &str,
    opt: &OptionDef,
    matched_name: &str,
    inline: Option<&str>,
    tokens: &mut Vec<String>,
    i: usize,
) -> Result<usize> {
    if opt.kind.is_niladic() {
        if inline.is_some() && !ctx.is_completing() {
            return Err(Error::DisallowedInlineParameter { key: key.to_string() });
        }
        return match opt.kind {
            OptionKind::Flag => {
                niladic::handle_flag(ctx, key, opt, matched_name)?;
                Ok(i)
            }
            OptionKind::Command => {
                let remaining = tokens[i..].to_vec();
                niladic::handle_command(ctx, key, opt, matched_name, remaining)?;
                Ok(tokens.len())
            }
            OptionKind::Help => {
                let remaining = tokens[i..].to_vec();
                let consumed = niladic::handle_help(ctx, key, opt, &remaining)?;
                Ok(i + consumed)
            }
            OptionKind::Version => niladic::handle_version(ctx, key, opt).map(|()| i),
            _ => unreachable!("OptionKind::is_niladic lists exactly these variants"),
        };
    }
    consume_params(ctx, key, opt, matched_name, inline, tokens, i)
}

/// Collect and store the parameters for a matched non-niladic option, returning the index to
/// resume scanning from.
fn consume_params(
    ctx: &mut ParseContext,
    key: &str,
    opt: &OptionDef,
    matched_name: &str,
    inline: Option<&str>,
    tokens: &mut [String],
    mut i: usize,
) -> Result<usize> {
    if inline.is_some() && opt.inline == InlinePolicy::Disallowed {
        return Err(Error::DisallowedInlineParameter { key: key.to_string() });
    }
    if inline.is_none() && opt.inline == InlinePolicy::Required {
        return Err(Error::MissingInlineParameter { key: key.to_string() });
    }

    if opt.kind == OptionKind::Function {
        let mut raw_params = Vec::new();
        if let Some(v) = inline {
            raw_params.push(v.to_string());
        }
        while opt.param_count.wants_more(raw_params.len()) {
            match tokens.get(i) {
                Some(t) if !classify::is_completion_token(t) && !classify::looks_option_shaped(t, &ctx.flags.option_prefix) => {
                    raw_params.push(t.clone());
                    i += 1;
                }
                _ => break,
            }
        }
        if !opt.param_count.accepts(raw_params.len()) {
            return Err(Error::MissingParameter { key: key.to_string(), expected: opt.param_count.describe() });
        }
        let skip_count = Cell::new(0usize);
        let info =
            ParamInfo { values: &ctx.values, index: 0, name: matched_name, comp: ctx.is_completing(), skip_count: &skip_count };
        let value = params::invoke_parse(key, opt, &raw_params, info)?;
        let extra = skip_count.get().min(tokens.len().saturating_sub(i));
        if extra > 0 {
            log::debug!(target: "optschema::engine", "option `{key}`'s parse callback requested {extra} extra skipped token(s)");
        }
        i += extra;
        ctx.values.insert(key.to_string(), value);
        ctx.mark_specified(key);
        return Ok(i);
    }

    let raw = match inline {
        Some(v) => v.to_string(),
        None => match tokens.get(i) {
            Some(t) if !classify::looks_option_shaped(t, &ctx.flags.option_prefix) => {
                let t = t.clone();
                i += 1;
                t
            }
            _ => return Err(Error::MissingParameter { key: key.to_string(), expected: "exactly 1 parameter".to_string() }),
        },
    };
    store_one(ctx, key, opt, matched_name, &raw)?;
    Ok(i)
}

/// Run one raw parameter string through the kind-appropriate storage pipeline. Shared by
/// [`consume_params`] (named `single`/`array`) and the positional branch of [`run_loop`], which
/// both hand exactly one already-selected raw string to the same per-kind logic.
fn store_one(ctx: &mut ParseContext, key: &str, opt: &OptionDef, matched_name: &str, raw: &str) -> Result<()> {
    match opt.kind {
        OptionKind::Array => {
            let pieces = params::split_separator(opt, raw);
            let mut items = Vec::with_capacity(pieces.len());
            for piece in &pieces {
                items.push(params::process_scalar(key, opt, piece)?);
            }
            let existing = ctx.values.get(key).cloned();
            let merged = params::merge_array(key, opt, existing.as_ref(), items)?;
            ctx.values.insert(key.to_string(), merged);
        }
        OptionKind::Function => {
            let skip_count = Cell::new(0usize);
            let info = ParamInfo {
                values: &ctx.values,
                index: 0,
                name: matched_name,
                comp: ctx.is_completing(),
                skip_count: &skip_count,
            };
            let params_list = [raw.to_string()];
            let value = params::invoke_parse(key, opt, &params_list, info)?;
            ctx.values.insert(key.to_string(), value);
        }
        _ => {
            let value = params::process_scalar(key, opt, raw)?;
            ctx.values.insert(key.to_string(), value);
        }
    }
    ctx.mark_specified(key);
    Ok(())
}

/// Handle a trailing-marker match: every remaining token belongs to `opt`, bypassing the usual
/// per-occurrence parameter count entirely (see the "positional and marker" design note).
fn handle_trailing_marker(ctx: &mut ParseContext, key: &str, opt: &OptionDef, rest: &[String]) -> Result<()> {
    match opt.kind {
        OptionKind::Array => {
            let mut items = Vec::new();
            for raw in rest {
                for piece in params::split_separator(opt, raw) {
                    items.push(params::process_scalar(key, opt, &piece)?);
                }
            }
            let existing = ctx.values.get(key).cloned();
            let merged = params::merge_array(key, opt, existing.as_ref(), items)?;
            ctx.values.insert(key.to_string(), merged);
        }
        OptionKind::Function => {
            let skip_count = Cell::new(0usize);
            let info =
                ParamInfo { values: &ctx.values, index: 0, name: key, comp: ctx.is_completing(), skip_count: &skip_count };
            let value = params::invoke_parse(key, opt, rest, info)?;
            ctx.values.insert(key.to_string(), value);
        }
        _ => {
            if let Some(last) = rest.last() {
                let value = params::process_scalar(key, opt, last)?;
                ctx.values.insert(key.to_string(), value);
            }
        }
    }
    ctx.mark_specified(key);
    Ok(())
}

/// Resolve a pending completion request and raise it as a terminating text message.
///
/// Name completion applies at the start of the token stream, or whenever the token immediately
/// before the completion point did not match a parameter-taking option; otherwise the completion
/// is scoped to that option's parameter (its `complete` callback, or `choices`).
fn handle_completion(ctx: &mut ParseContext, prefix: &str, tokens: &[String], i: usize) -> Result<()> {
    ctx.completion_done = true;
    let outcome = if i == 0 {
        completion::complete_name(&ctx.registry, prefix)
    } else {
        let (prev_body, _) = classify::split_inline(&tokens[i - 1]);
        match ctx.registry.key_for_name(prev_body).map(str::to_string) {
            Some(key) if !ctx.schema[key.as_str()].kind.is_niladic() => {
                let opt = ctx.schema[key.as_str()].clone();
                completion::complete_parameter(ctx, &key, &opt, prefix, i)
            }
            _ => completion::complete_name(&ctx.registry, prefix),
        }
    };
    log::debug!(target: "optschema::engine", "completion at token {i} produced {} candidate(s)", outcome.candidates.len());
    Err(Error::from(Message::Completion(outcome.candidates)))
}

/// Evaluate every option's `requires`/`required_if` once the main loop and fallback have finished.
fn check_requirements(ctx: &ParseContext) -> Result<()> {
    for (key, opt) in ctx.schema {
        if let Some(req) = &opt.requires {
            if ctx.is_specified(key) && !requirement::evaluate(req, &ctx.values, false, false) {
                log::warn!(target: "optschema::engine", "unsatisfied requirement for `{key}`");
                return Err(Error::UnsatisfiedRequirement { key: key.clone(), rendering: requirement::render(req) });
            }
        }
        if let Some(req) = &opt.required_if {
            if !ctx.is_specified(key) && requirement::evaluate(req, &ctx.values, true, true) {
                log::warn!(target: "optschema::engine", "unsatisfied conditional requirement for `{key}`");
                return Err(Error::UnsatisfiedConditionalRequirement {
                    key: key.clone(),
                    rendering: requirement::render(req),
                });
            }
        }
    }
    Ok(())
}

/// Suggest a registered name for an unrecognized token, by Gestalt similarity above the
/// configured threshold. A no-op (always `None`) when the `suggestions` feature is disabled.
fn suggest(ctx: &ParseContext, token: &str) -> Option<String> {
    #[cfg(not(feature = "suggestions"))]
    {
        let _ = (ctx, token);
        None
    }
    #[cfg(feature = "suggestions")]
    {
        let mut best: Option<(String, f64)> = None;
        for name in ctx.registry.all_names() {
            let score = strsim::jaro_winkler(token, name);
            if score >= ctx.flags.similarity_threshold && best.as_ref().map(|(_, b)| score > *b).unwrap_or(true) {
                best = Some((name.to_string(), score));
            }
        }
        best.map(|(name, _)| name)
    }
}
