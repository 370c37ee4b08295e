// Copyright 2026 The optschema contributors
//
// This file is part of the `optschema` command-line argument parsing library.
//
// Licensed under the MIT license or the Apache license (version 2.0), at your option. You may not
// copy, modify, or distribute this file except in compliance with said license. You can find copies
// of these licenses either in the LICENSE-MIT and LICENSE-APACHE files, or alternatively at
// <http://opensource.org/licenses/MIT> and <http://www.apache.org/licenses/LICENSE-2.0>
// respectively.

//! `optschema` is a declarative, schema-driven command-line argument parser and help/usage
//! formatter.
//!
//! A program describes its interface as a [`Schema`] - a map from an option key to an
//! [`OptionDef`] - rather than imperatively registering options one call at a time. The same
//! schema drives three independent operations: [`parse`] turns a command line into a
//! [`ValuesMap`], [`validate`] checks a schema for internal consistency before it is ever used,
//! and [`format`] renders it as a plain-text help document.
//!
//! ```
//! use optschema::{parse, OptionDef, Schema};
//!
//! let mut schema = Schema::new();
//! schema.insert("verbose".into(), OptionDef::flag().name("-v").name("--verbose"));
//! schema.insert("output".into(), OptionDef::single().name("-o").name("--output"));
//!
//! let outcome = parse(&schema, vec!["-v".to_string(), "-o".to_string(), "out.txt".to_string()], None).unwrap();
//! assert_eq!(outcome.values.get("verbose").and_then(|v| v.as_bool()), Some(true));
//! assert_eq!(outcome.values.get("output").and_then(|v| v.as_str()), Some("out.txt"));
//! ```

mod classify;
mod cluster;
mod completion;
mod context;
mod engine;
mod error;
mod fallback;
mod help;
mod niladic;
mod params;
mod registry;
mod requirement;
mod schema;
mod tokenize;
mod validator;
mod value;

pub use completion::CompletionOutcome;
pub use context::{ParseFlags, DEFAULT_SIMILARITY_THRESHOLD};
pub use engine::{format, parse, parse_into, validate, CommandLine, ParseOutcome};
pub use error::{Error, Message, Result, Warning};
pub use help::FormatFlags;
pub use requirement::{Requirement, RequiredValue};
pub use schema::{
    CommandParseFn, CommandSpec, CompleteFn, DefaultFn, DefaultValue, HelpSpec, InlinePolicy,
    ModuleResolver, NormalizeFn, OptionDef, OptionKind, OptionsProvider, ParamCount, ParamInfo,
    ParseFn, Schema, SchemaSource, Separator, Source, VersionSpec,
};
pub use validator::DEFAULT_THRESHOLD;
pub use value::{deep_eq, Value, ValuesMap};
