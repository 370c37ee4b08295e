// Copyright 2026 The optschema contributors
//
// This file is part of the `optschema` command-line argument parsing library.
//
// Licensed under the MIT license or the Apache license (version 2.0), at your option. You may not
// copy, modify, or distribute this file except in compliance with said license. You can find copies
// of these licenses either in the LICENSE-MIT and LICENSE-APACHE files, or alternatively at
// <http://opensource.org/licenses/MIT> and <http://www.apache.org/licenses/LICENSE-2.0>
// respectively.

//! The transient per-parse-call state: configuration flags and the parsing context built on top
//! of them.

use std::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;

use crate::error::Warning;
use crate::registry::Registry;
use crate::schema::{ModuleResolver, Schema};
use crate::value::ValuesMap;

/// The default Gestalt-similarity threshold above which two option names are flagged as
/// suspiciously similar, or used to suggest a correction for an unknown option. Matches the
/// teacher's own `jaro_winkler` threshold of `0.8`.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.8;

/// Caller-supplied configuration for a `parse`/`parse_into`/`validate` call.
#[derive(Clone)]
pub struct ParseFlags {
    /// The program name used in help text and nested-command scoping (`outer + " " + name`).
    pub program_name: String,
    /// Prefix recognized ahead of a long/registered option name (default `"-"`).
    pub option_prefix: String,
    /// Prefix recognized ahead of a short-option cluster (default `"-"`).
    pub cluster_prefix: String,
    /// Absolute character offset into the raw command line of a pending completion request.
    pub completion_index: Option<usize>,
    /// Resolves a module specifier or version-file path to a filesystem path.
    pub resolver: Option<ModuleResolver>,
    /// Gestalt-similarity threshold for name-warnings and unknown-option suggestions.
    pub similarity_threshold: f64,
}

impl Default for ParseFlags {
    fn default() -> Self {
        Self {
            program_name: String::new(),
            option_prefix: "-".to_string(),
            cluster_prefix: "-".to_string(),
            completion_index: None,
            resolver: None,
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
        }
    }
}

impl ParseFlags {
    /// Derive the flags for a nested `command` scope: own prefixes (if the command overrides
    /// them), extended program name, same completion/resolver/threshold settings.
    pub fn nested(&self, matched_name: &str, cluster_prefix: Option<&str>, option_prefix: Option<&str>) -> Self {
        Self {
            program_name: if self.program_name.is_empty() {
                matched_name.to_string()
            } else {
                format!("{} {}", self.program_name, matched_name)
            },
            option_prefix: option_prefix.unwrap_or(&self.option_prefix).to_string(),
            cluster_prefix: cluster_prefix.unwrap_or(&self.cluster_prefix).to_string(),
            completion_index: self.completion_index,
            resolver: self.resolver.clone(),
            similarity_threshold: self.similarity_threshold,
        }
    }
}

/// Transient state threaded through one parse call (and, recursively, through any nested
/// `command` scopes it enters).
pub struct ParseContext<'a> {
    pub schema: &'a Schema,
    pub registry: Registry,
    pub values: ValuesMap,
    pub specified: HashSet<String>,
    pub warnings: Vec<Warning>,
    pub flags: ParseFlags,
    /// Set once a completion request has been satisfied (a message raised), so that no further
    /// processing of the remaining arguments is attempted.
    pub completion_done: bool,
    /// Shared across nested command scopes so standard input is read at most once per run.
    pub stdin_used: Rc<Cell<bool>>,
}

impl<'a> ParseContext<'a> {
    pub fn new(schema: &'a Schema, flags: ParseFlags) -> Self {
        Self::with_stdin_flag(schema, flags, Rc::new(Cell::new(false)))
    }

    pub fn with_stdin_flag(schema: &'a Schema, flags: ParseFlags, stdin_used: Rc<Cell<bool>>) -> Self {
        Self {
            schema,
            registry: Registry::build(schema),
            values: ValuesMap::new(),
            specified: HashSet::new(),
            warnings: Vec::new(),
            flags,
            completion_done: false,
            stdin_used,
        }
    }

    pub fn is_completing(&self) -> bool {
        self.flags.completion_index.is_some()
    }

    pub fn mark_specified(&mut self, key: &str) {
        self.specified.insert(key.to_string());
    }

    pub fn is_specified(&self, key: &str) -> bool {
        self.specified.contains(key)
    }
}
