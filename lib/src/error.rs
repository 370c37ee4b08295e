// Copyright 2026 The optschema contributors
//
// This file is part of the `optschema` command-line argument parsing library.
//
// Licensed under the MIT license or the Apache license (version 2.0), at your option. You may not
// copy, modify, or distribute this file except in compliance with said license. You can find copies
// of these licenses either in the LICENSE-MIT and LICENSE-APACHE files, or alternatively at
// <http://opensource.org/licenses/MIT> and <http://www.apache.org/licenses/LICENSE-2.0>
// respectively.

//! Error, message and warning taxonomy.
//!
//! The source design distinguishes "failures" (schema/parse errors) from "control-flow messages"
//! (help, version, completion) that terminate parsing with user-visible output rather than a
//! problem report. Both are expressed here as variants of a single [`Error`] enum, since Rust has
//! one throwable-on-`?` type per function; callers that care about the distinction match on
//! [`Error::Message`] before treating anything else as a failure.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error as ThisError;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// A control-flow message: output that stops parsing but isn't a problem report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// Rendered help text for the option that triggered it.
    Help(String),
    /// The resolved version string, or `None` if a JSON version file had no `version` field.
    Version(Option<String>),
    /// Newline-joined completion candidates, ready to hand back to a shell.
    Completion(Vec<String>),
}

impl Message {
    /// The exact text a caller should print for this message.
    pub fn text(&self) -> String {
        match self {
            Message::Help(text) => text.clone(),
            Message::Version(Some(v)) => v.clone(),
            Message::Version(None) => String::new(),
            Message::Completion(words) => words.join("\n"),
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

/// Every way a schema can fail validation, an argument list can fail to parse, or parsing can
/// terminate with a message instead of a value.
#[derive(Debug, ThisError)]
pub enum Error {
    // ---- schema errors (raised by `validate`) ----
    #[error("invalid option name `{0}`: names must not contain whitespace or `=`")]
    InvalidName(String),

    #[error("duplicate name `{0}`")]
    DuplicateName(String),

    #[error("invalid cluster letter `{0:?}`")]
    InvalidClusterLetter(char),

    #[error("duplicate cluster letter `{0}`")]
    DuplicateClusterLetter(char),

    #[error("option `{key}` requires itself")]
    SelfRequirement { key: String },

    #[error("option `{key}` requires unknown option `{target}`")]
    UnknownRequiredOption { key: String, target: String },

    #[error("option `{key}` cannot require `{target}`, which is a message option")]
    InvalidRequiredOption { key: String, target: String },

    #[error("option `{key}`'s requirement on `{target}` specifies an invalid required value")]
    InvalidRequiredValue { key: String, target: String },

    #[error("duplicate positional-accepting option: `{first}` and `{second}`")]
    DuplicatePositionalOption { first: String, second: String },

    #[error("duplicate choice value `{value}` on option `{key}`")]
    DuplicateChoiceValue { key: String, value: String },

    #[error("invalid parameter count on option `{key}`: minimum must be less than maximum")]
    InvalidParamCount { key: String },

    #[error("invalid inline constraint on option `{key}`: `inline: required` cannot be combined with a variadic option that has no separator/append")]
    InvalidInlineConstraint { key: String },

    #[error("array default for option `{key}` violates its `limit`/`unique` policy")]
    InvalidArrayDefault { key: String },

    #[error("option `{key}` is marked `required` but also declares a `default`/`required_if`, which can never be consulted")]
    RequiredWithFallback { key: String },

    // ---- parse errors (user input) ----
    #[error("unknown option `{name}`{}", suggestion_suffix(.suggestion))]
    UnknownOption { name: String, suggestion: Option<String> },

    #[error("option `{key}` is missing {expected}")]
    MissingParameter { key: String, expected: String },

    #[error("option `{key}` does not accept an inline (`=`) parameter")]
    DisallowedInlineParameter { key: String },

    #[error("option `{key}` requires an inline (`=`) parameter")]
    MissingInlineParameter { key: String },

    #[error("invalid cluster option `{letter}`: only the last letter of a cluster may take parameters")]
    InvalidClusterOption { letter: char },

    #[error("missing required option `{key}`")]
    MissingRequiredOption { key: String },

    #[error("unsatisfied requirement for option `{key}`: {rendering}")]
    UnsatisfiedRequirement { key: String, rendering: String },

    #[error("unsatisfied conditional requirement for option `{key}`: {rendering}")]
    UnsatisfiedConditionalRequirement { key: String, rendering: String },

    #[error("value `{value}` for option `{key}` does not match pattern `{pattern}`")]
    RegexConstraintViolation { key: String, value: String, pattern: String },

    #[error("value `{value}` for option `{key}` is not one of the allowed choices")]
    ChoiceConstraintViolation { key: String, value: String },

    #[error("option `{key}` exceeds its limit of {limit} value(s)")]
    LimitConstraintViolation { key: String, limit: usize },

    #[error("option `{key}`'s parse callback rejected its parameters: {message}")]
    ParseCallbackFailed { key: String, message: String },

    // ---- environment / resolution ----
    #[error("option `{key}` names a JSON version file but no resolver callback was configured")]
    MissingResolveCallback { key: String },

    #[error("option `{key}` declares a module-specifier schema source, which this implementation does not resolve; use an inline schema or a schema-producing callback instead")]
    ModuleSchemaUnsupported { key: String },

    #[error("version file not found: {0}")]
    VersionFileNotFound(PathBuf),

    #[error("failed to read fallback source for option `{key}`: {source}")]
    SourceReadFailed { key: String, #[source] source: std::io::Error },

    // ---- control-flow messages (not failures) ----
    #[error("{0}")]
    Message(Message),
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(", did you mean `{s}`?"),
        None => String::new(),
    }
}

impl Error {
    /// True for the control-flow message family (help/version/completion), false for every
    /// genuine schema or parse failure.
    pub fn is_message(&self) -> bool {
        matches!(self, Error::Message(_))
    }

    /// Extract the message payload, if this is one.
    pub fn as_message(&self) -> Option<&Message> {
        match self {
            Error::Message(m) => Some(m),
            _ => None,
        }
    }
}

impl From<Message> for Error {
    fn from(m: Message) -> Self {
        Error::Message(m)
    }
}

/// A non-fatal diagnostic collected during validation or parsing.
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    /// A deprecated option was used on the command line.
    DeprecatedOptionUsed { key: String },
    /// The name in `slot` position mixes naming conventions across the options at this level.
    MixedNamingConvention { slot: usize },
    /// Two option names are suspiciously similar (Gestalt similarity above the threshold).
    TooSimilarNames { a: String, b: String, score: f64 },
    /// A variadic option declared a cluster letter (only valid if it is last in a cluster).
    VariadicWithClusterLetter { key: String, letter: char },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::DeprecatedOptionUsed { key } => {
                write!(f, "option `{key}` is deprecated")
            }
            Warning::MixedNamingConvention { slot } => {
                write!(f, "name slot {slot} mixes naming conventions across options")
            }
            Warning::TooSimilarNames { a, b, score } => {
                write!(f, "names `{a}` and `{b}` are suspiciously similar (score {score:.2})")
            }
            Warning::VariadicWithClusterLetter { key, letter } => {
                write!(f, "variadic option `{key}` declares cluster letter `{letter}`, which must be last in any cluster it appears in")
            }
        }
    }
}
