// Copyright 2026 The optschema contributors
//
// This file is part of the `optschema` command-line argument parsing library.
//
// Licensed under the MIT license or the Apache license (version 2.0), at your option. You may not
// copy, modify, or distribute this file except in compliance with said license. You can find copies
// of these licenses either in the LICENSE-MIT and LICENSE-APACHE files, or alternatively at
// <http://opensource.org/licenses/MIT> and <http://www.apache.org/licenses/LICENSE-2.0>
// respectively.

//! Schema description components
//!
//! This module contains components to do with describing the *options* available within a given
//! program: a mapping from an option key to an [`OptionDef`]. There is deliberately a single
//! option type rather than one type per kind - the [`OptionKind`] tag selects which attributes are
//! meaningful, and [`crate::validator`] enforces per-kind presence at validation time. See the
//! design notes in `SPEC_FULL.md` for the rationale (tagged variant over inheritance).

use std::cell::Cell;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::requirement::Requirement;
use crate::value::{Value, ValuesMap};

/// A schema: the full set of options available at one parsing level (the top level, or the
/// nested level introduced by a `command` option). An [`IndexMap`] rather than a [`HashMap`] so
/// that fallback resolution and help rendering can honor declaration order, as the source design
/// assumes.
pub type Schema = IndexMap<String, OptionDef>;

/// The kind of an option, which determines which attributes of [`OptionDef`] apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    /// Prints help text and terminates parsing with [`crate::error::Message::Help`].
    Help,
    /// Prints a version string and terminates parsing with [`crate::error::Message::Version`].
    Version,
    /// Delegates the remainder of the argument list to a nested schema.
    Command,
    /// A niladic boolean-ish switch.
    Flag,
    /// Takes exactly one parameter per occurrence; the last occurrence wins.
    Single,
    /// Takes one or more parameters across occurrences, accumulating into a list.
    Array,
    /// Takes a configurable, possibly variable, number of parameters handled by a single
    /// user-supplied callback.
    Function,
}

impl OptionKind {
    /// Kinds that consume no parameters at all.
    pub fn is_niladic(self) -> bool {
        matches!(self, OptionKind::Help | OptionKind::Version | OptionKind::Command | OptionKind::Flag)
    }

    /// Kinds that terminate parsing with a message rather than storing a value.
    pub fn is_message_kind(self) -> bool {
        matches!(self, OptionKind::Help | OptionKind::Version)
    }
}

/// Where a `default`, `parse`, `normalize`, `complete` or requirement callback reads the other
/// callback-supplied arguments it needs.
#[derive(Clone, Copy)]
pub struct ParamInfo<'a> {
    /// The values map accumulated so far.
    pub values: &'a ValuesMap,
    /// The zero-based index of the parameter within the parameter list passed to this call.
    pub index: usize,
    /// The option name as it appeared on the command line (or the preferred name, for defaults).
    pub name: &'a str,
    /// Whether this call is happening on behalf of a completion request (suppresses side effects
    /// a callback might otherwise want to avoid during completion).
    pub comp: bool,
    /// A `function` option's `parse` callback may write a nonzero count here to request that many
    /// extra following raw tokens be consumed from the argument stream beyond what `param_count`
    /// already collected. Interior mutability because callbacks are `Fn`, not `FnMut`. Ignored for
    /// every other call site that constructs a `ParamInfo`.
    pub skip_count: &'a Cell<usize>,
}

/// Callback producing a default value from the values accumulated so far.
pub type DefaultFn = Arc<dyn Fn(&ValuesMap) -> Value + Send + Sync>;
/// Callback mapping a raw parameter list to a stored value.
pub type ParseFn = Arc<dyn Fn(&[String], ParamInfo<'_>) -> std::result::Result<Value, String> + Send + Sync>;
/// Callback normalizing a single raw parameter before constraint checks.
pub type NormalizeFn = Arc<dyn Fn(&str) -> String + Send + Sync>;
/// Callback producing completion candidates for a parameter, given the prefix typed so far.
pub type CompleteFn = Arc<dyn Fn(&str, ParamInfo<'_>) -> Vec<String> + Send + Sync>;
/// Callback producing a nested schema on demand (for `command` options).
pub type OptionsProvider = Arc<dyn Fn() -> Schema + Send + Sync>;
/// Callback resolving a module specifier or version-file path to a filesystem path.
pub type ModuleResolver = Arc<dyn Fn(&str) -> PathBuf + Send + Sync>;
/// Callback transforming the inner values map of a resolved `command` into the stored value.
pub type CommandParseFn = Arc<dyn Fn(&ValuesMap) -> Value + Send + Sync>;

/// A literal default, or a callback that computes one from the values seen so far.
#[derive(Clone)]
pub enum DefaultValue {
    Literal(Value),
    Callback(DefaultFn),
}

/// Where a fallback value may be read from, in `sources` order, after the main parse loop.
#[derive(Clone, Debug)]
pub enum Source {
    /// An environment variable name.
    EnvVar(String),
    /// A local file path, read as UTF-8 text.
    File(PathBuf),
}

impl Source {
    /// The synthetic "name" recorded in the specified-set/fallback bookkeeping for this source.
    pub fn synthetic_name(&self) -> String {
        match self {
            Source::EnvVar(name) => name.clone(),
            Source::File(path) => path.display().to_string(),
        }
    }
}

/// Parameter-count policy for `function` options.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamCount {
    /// Exactly this many parameters.
    Exact(usize),
    /// Any number of parameters (including zero).
    Unlimited,
    /// Between `min` and `max` parameters inclusive (`0 <= min < max`).
    Range(usize, usize),
}

impl Default for ParamCount {
    fn default() -> Self {
        ParamCount::Unlimited
    }
}

impl ParamCount {
    /// Whether `n` parameters satisfies this policy.
    pub fn accepts(self, n: usize) -> bool {
        match self {
            ParamCount::Exact(k) => n == k,
            ParamCount::Unlimited => true,
            ParamCount::Range(min, max) => n >= min && n <= max,
        }
    }

    /// Whether one more parameter would still be acceptable given `n` already collected.
    pub fn wants_more(self, n: usize) -> bool {
        match self {
            ParamCount::Exact(k) => n < k,
            ParamCount::Unlimited => true,
            ParamCount::Range(_, max) => n < max,
        }
    }

    /// A human description of the expectation, for error messages.
    pub fn describe(self) -> String {
        match self {
            ParamCount::Exact(1) => "exactly 1 parameter".into(),
            ParamCount::Exact(k) => format!("exactly {k} parameters"),
            ParamCount::Unlimited => "any number of parameters".into(),
            ParamCount::Range(min, max) => format!("between {min} and {max} parameters"),
        }
    }

    /// Whether the policy is structurally valid (`0 <= min < max` for a range).
    pub fn is_valid(self) -> bool {
        match self {
            ParamCount::Range(min, max) => min < max,
            _ => true,
        }
    }

    /// Whether this policy can ever accept more than one parameter - i.e. is "variadic".
    pub fn is_variadic(self) -> bool {
        match self {
            ParamCount::Exact(k) => k > 1,
            ParamCount::Unlimited => true,
            ParamCount::Range(_, max) => max > 1,
        }
    }
}

/// How a separator splits each raw parameter of an `array` option.
#[derive(Clone, Debug)]
pub enum Separator {
    Literal(String),
    #[cfg(feature = "regex-constraints")]
    Regex(String),
}

/// Whether `name=value` inline parameters are permitted for an option.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum InlinePolicy {
    /// Neither required nor forbidden.
    #[default]
    Unconstrained,
    /// An inline parameter is an error.
    Disallowed,
    /// An inline parameter is mandatory.
    Required,
}

/// Where a `command` option's nested schema comes from.
#[derive(Clone)]
pub enum SchemaSource {
    /// The schema is already fully built.
    Inline(Schema),
    /// The schema is produced on demand by a callback.
    Callback(OptionsProvider),
    /// The schema lives in an external module, resolved via the caller's resolver.
    Module(String),
}

impl SchemaSource {
    /// A stable identity used for cycle detection: callbacks are identified by their `Arc`
    /// pointer (the same callback returned again is the cycle the spec calls out), inline schemas
    /// and modules never recurse through this mechanism on their own.
    pub fn callback_identity(&self) -> Option<*const ()> {
        match self {
            SchemaSource::Callback(f) => Some(Arc::as_ptr(f) as *const ()),
            _ => None,
        }
    }
}

/// Attributes specific to a `command` option.
#[derive(Clone)]
pub struct CommandSpec {
    pub options: SchemaSource,
    pub cluster_prefix: Option<String>,
    pub option_prefix: Option<String>,
    pub parse: Option<CommandParseFn>,
}

/// Where a `version` option's text comes from.
#[derive(Clone, Debug)]
pub enum VersionSpec {
    /// A literal version string.
    Literal(String),
    /// A path to a JSON file (resolved via the module resolver) whose `version` field is read.
    JsonFile(PathBuf),
}

/// Attributes specific to a `help` option.
#[derive(Clone, Copy, Debug, Default)]
pub struct HelpSpec {
    /// Consume the next argument as a subcommand selector before rendering.
    pub use_command: bool,
    /// Treat any remaining arguments as a filter over which options/sections are shown.
    pub use_filter: bool,
    /// Store the rendered message at the option's key instead of raising it.
    pub save_message: bool,
}

/// A single option description. Only the kinds named in each field's documentation honor it;
/// [`crate::validator`] rejects attributes set on a kind that does not support them.
#[derive(Clone)]
pub struct OptionDef {
    pub kind: OptionKind,

    /// Ordered names; `None` is a "slot skip" reserving a naming-convention column.
    pub names: Vec<Option<String>>,
    /// Display name used when no name applies (e.g. a pure positional).
    pub preferred_name: Option<String>,
    /// A literal token; everything strictly after it belongs to this option.
    pub trailing_marker: Option<String>,
    /// Whether this option is the single positional-argument sink at its schema level.
    pub positional: bool,
    /// Single-character identifiers usable in a short-form cluster.
    pub cluster: Vec<char>,

    // Help metadata.
    pub group: Option<String>,
    pub synopsis: Option<String>,
    pub deprecated: bool,
    pub styles: Vec<String>,
    pub link: Option<String>,

    pub required: bool,
    pub default: Option<DefaultValue>,
    pub parse: Option<ParseFn>,
    pub requires: Option<Requirement>,
    pub required_if: Option<Requirement>,
    pub sources: Vec<Source>,
    pub stdin: bool,
    /// `break`; named `brk` because `break` is a reserved word.
    pub brk: bool,

    /// `function` parameter-count policy.
    pub param_count: ParamCount,
    /// `array` per-parameter splitter.
    pub separator: Option<Separator>,
    pub unique: bool,
    pub limit: Option<usize>,
    pub append: bool,

    pub regex: Option<String>,
    pub choices: Vec<String>,
    pub mapping: Option<HashMap<String, Value>>,
    pub normalize: Option<NormalizeFn>,
    pub complete: Option<CompleteFn>,
    pub inline: InlinePolicy,

    pub command: Option<CommandSpec>,
    pub version: Option<VersionSpec>,
    pub help: Option<HelpSpec>,
}

impl fmt::Debug for OptionDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionDef")
            .field("kind", &self.kind)
            .field("names", &self.names)
            .field("required", &self.required)
            .field("positional", &self.positional)
            .finish_non_exhaustive()
    }
}

impl OptionDef {
    /// Start building an option of the given kind, with every other attribute unset.
    pub fn new(kind: OptionKind) -> Self {
        Self {
            kind,
            names: Vec::new(),
            preferred_name: None,
            trailing_marker: None,
            positional: false,
            cluster: Vec::new(),
            group: None,
            synopsis: None,
            deprecated: false,
            styles: Vec::new(),
            link: None,
            required: false,
            default: None,
            parse: None,
            requires: None,
            required_if: None,
            sources: Vec::new(),
            stdin: false,
            brk: false,
            param_count: ParamCount::default(),
            separator: None,
            unique: false,
            limit: None,
            append: false,
            regex: None,
            choices: Vec::new(),
            mapping: None,
            normalize: None,
            complete: None,
            inline: InlinePolicy::default(),
            command: None,
            version: None,
            help: None,
        }
    }

    pub fn help() -> Self {
        let mut def = Self::new(OptionKind::Help);
        def.help = Some(HelpSpec::default());
        def
    }

    pub fn version(version: VersionSpec) -> Self {
        let mut def = Self::new(OptionKind::Version);
        def.version = Some(version);
        def
    }

    pub fn command(options: SchemaSource) -> Self {
        let mut def = Self::new(OptionKind::Command);
        def.command = Some(CommandSpec { options, cluster_prefix: None, option_prefix: None, parse: None });
        def
    }

    pub fn flag() -> Self {
        Self::new(OptionKind::Flag)
    }

    pub fn single() -> Self {
        Self::new(OptionKind::Single)
    }

    pub fn array() -> Self {
        Self::new(OptionKind::Array)
    }

    pub fn function() -> Self {
        Self::new(OptionKind::Function)
    }

    // -- builder methods; consuming, so options can be built inline in a schema literal --

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.names.push(Some(name.into()));
        self
    }

    pub fn name_slot_skip(mut self) -> Self {
        self.names.push(None);
        self
    }

    pub fn names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names.extend(names.into_iter().map(|n| Some(n.into())));
        self
    }

    pub fn preferred_name(mut self, name: impl Into<String>) -> Self {
        self.preferred_name = Some(name.into());
        self
    }

    pub fn trailing_marker(mut self, marker: impl Into<String>) -> Self {
        self.trailing_marker = Some(marker.into());
        self
    }

    pub fn positional(mut self, positional: bool) -> Self {
        self.positional = positional;
        self
    }

    pub fn cluster(mut self, letters: impl IntoIterator<Item = char>) -> Self {
        self.cluster.extend(letters);
        self
    }

    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn synopsis(mut self, synopsis: impl Into<String>) -> Self {
        self.synopsis = Some(synopsis.into());
        self
    }

    pub fn deprecated(mut self, deprecated: bool) -> Self {
        self.deprecated = deprecated;
        self
    }

    pub fn link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(DefaultValue::Literal(value));
        self
    }

    pub fn default_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&ValuesMap) -> Value + Send + Sync + 'static,
    {
        self.default = Some(DefaultValue::Callback(Arc::new(f)));
        self
    }

    pub fn parse_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&[String], ParamInfo<'_>) -> std::result::Result<Value, String> + Send + Sync + 'static,
    {
        self.parse = Some(Arc::new(f));
        self
    }

    pub fn requires(mut self, req: Requirement) -> Self {
        self.requires = Some(req);
        self
    }

    pub fn required_if(mut self, req: Requirement) -> Self {
        self.required_if = Some(req);
        self
    }

    pub fn source_env(mut self, var: impl Into<String>) -> Self {
        self.sources.push(Source::EnvVar(var.into()));
        self
    }

    pub fn source_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(Source::File(path.into()));
        self
    }

    pub fn stdin(mut self, stdin: bool) -> Self {
        self.stdin = stdin;
        self
    }

    pub fn brk(mut self, brk: bool) -> Self {
        self.brk = brk;
        self
    }

    pub fn param_count(mut self, count: ParamCount) -> Self {
        self.param_count = count;
        self
    }

    pub fn separator_literal(mut self, sep: impl Into<String>) -> Self {
        self.separator = Some(Separator::Literal(sep.into()));
        self
    }

    #[cfg(feature = "regex-constraints")]
    pub fn separator_regex(mut self, pattern: impl Into<String>) -> Self {
        self.separator = Some(Separator::Regex(pattern.into()));
        self
    }

    pub fn unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn append(mut self, append: bool) -> Self {
        self.append = append;
        self
    }

    pub fn regex(mut self, pattern: impl Into<String>) -> Self {
        self.regex = Some(pattern.into());
        self
    }

    pub fn choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.choices.extend(choices.into_iter().map(Into::into));
        self
    }

    pub fn mapping(mut self, mapping: HashMap<String, Value>) -> Self {
        self.mapping = Some(mapping);
        self
    }

    pub fn normalize_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.normalize = Some(Arc::new(f));
        self
    }

    pub fn complete_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&str, ParamInfo<'_>) -> Vec<String> + Send + Sync + 'static,
    {
        self.complete = Some(Arc::new(f));
        self
    }

    pub fn inline(mut self, policy: InlinePolicy) -> Self {
        self.inline = policy;
        self
    }

    pub fn cluster_prefix(mut self, prefix: impl Into<String>) -> Self {
        if let Some(cmd) = self.command.as_mut() {
            cmd.cluster_prefix = Some(prefix.into());
        }
        self
    }

    pub fn option_prefix(mut self, prefix: impl Into<String>) -> Self {
        if let Some(cmd) = self.command.as_mut() {
            cmd.option_prefix = Some(prefix.into());
        }
        self
    }

    pub fn command_parse_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&ValuesMap) -> Value + Send + Sync + 'static,
    {
        if let Some(cmd) = self.command.as_mut() {
            cmd.parse = Some(Arc::new(f));
        }
        self
    }

    pub fn use_command(mut self, use_command: bool) -> Self {
        if let Some(h) = self.help.as_mut() {
            h.use_command = use_command;
        }
        self
    }

    pub fn use_filter(mut self, use_filter: bool) -> Self {
        if let Some(h) = self.help.as_mut() {
            h.use_filter = use_filter;
        }
        self
    }

    pub fn save_message(mut self, save_message: bool) -> Self {
        if let Some(h) = self.help.as_mut() {
            h.save_message = save_message;
        }
        self
    }

    /// Every non-`None` name, in declared order.
    pub fn present_names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().filter_map(|n| n.as_deref())
    }

    /// The name to use when none was matched on the command line (e.g. in error/help text).
    pub fn display_name(&self) -> &str {
        self.preferred_name
            .as_deref()
            .or_else(|| self.present_names().next())
            .unwrap_or("<unnamed>")
    }

    /// Whether this option can, in principle, accept more than one parameter in one occurrence.
    pub fn is_variadic(&self) -> bool {
        match self.kind {
            OptionKind::Array => true,
            OptionKind::Function => self.param_count.is_variadic(),
            _ => false,
        }
    }
}
