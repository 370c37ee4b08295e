// Copyright 2026 The optschema contributors
//
// This file is part of the `optschema` command-line argument parsing library.
//
// Licensed under the MIT license or the Apache license (version 2.0), at your option. You may not
// copy, modify, or distribute this file except in compliance with said license. You can find copies
// of these licenses either in the LICENSE-MIT and LICENSE-APACHE files, or alternatively at
// <http://opensource.org/licenses/MIT> and <http://www.apache.org/licenses/LICENSE-2.0>
// respectively.

//! The completion driver: name and parameter completion, surfaced as a terminal message.
//!
//! This crate does not spawn a shell or depend on a specific shell completion protocol; it hands
//! back the candidate list (and the joined text a caller would print) and leaves shell glue to the
//! host binary.

use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::context::ParseContext;
use crate::params;
use crate::registry::Registry;
use crate::schema::{OptionDef, ParamInfo};

/// The result of a completion request: the raw candidates and the exact text a caller should
/// print (one candidate per line).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionOutcome {
    pub candidates: Vec<String>,
}

impl CompletionOutcome {
    pub fn text(&self) -> String {
        self.candidates.join("\n")
    }
}

/// Complete an option name: every registered name starting with `prefix` (all names if `prefix`
/// is empty), sorted and deduplicated.
pub fn complete_name(registry: &Registry, prefix: &str) -> CompletionOutcome {
    let mut candidates: Vec<String> =
        registry.all_names().filter(|n| prefix.is_empty() || n.starts_with(prefix)).map(str::to_string).collect();
    candidates.sort();
    candidates.dedup();
    log::trace!(target: "optschema::completion", "name completion for `{prefix}` found {} candidates", candidates.len());
    CompletionOutcome { candidates }
}

/// Complete a parameter value for `opt`: its `complete` callback if set, else `choices` filtered
/// by (normalized) prefix, else no candidates. A panicking callback is treated the same as one
/// returning no candidates, per the "errors are swallowed" completion contract.
pub fn complete_parameter(ctx: &ParseContext, key: &str, opt: &OptionDef, prefix: &str, index: usize) -> CompletionOutcome {
    let skip_count = std::cell::Cell::new(0);
    let info = ParamInfo { values: &ctx.values, index, name: key, comp: true, skip_count: &skip_count };
    let candidates = if let Some(f) = &opt.complete {
        catch_unwind(AssertUnwindSafe(|| f(prefix, info))).unwrap_or_default()
    } else if !opt.choices.is_empty() {
        let normalized_prefix = params::normalize(opt, prefix);
        opt.choices.iter().filter(|c| c.starts_with(&normalized_prefix)).cloned().collect()
    } else {
        Vec::new()
    };
    log::trace!(target: "optschema::completion", "parameter completion for `{key}` found {} candidates", candidates.len());
    CompletionOutcome { candidates }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{OptionDef, Schema};

    #[test]
    fn complete_name_filters_by_prefix() {
        let mut schema = Schema::new();
        schema.insert("foo".into(), OptionDef::flag().name("--foo"));
        schema.insert("food".into(), OptionDef::flag().name("--food"));
        schema.insert("bar".into(), OptionDef::flag().name("--bar"));
        let registry = Registry::build(&schema);
        let outcome = complete_name(&registry, "--fo");
        assert_eq!(outcome.candidates, vec!["--foo", "--food"]);
    }

    #[test]
    fn complete_parameter_falls_back_to_choices() {
        let schema: Schema = Schema::new();
        let opt = OptionDef::single().choices(["red", "green", "blue"]);
        let flags = crate::context::ParseFlags::default();
        let ctx = ParseContext::new(&schema, flags);
        let outcome = complete_parameter(&ctx, "color", &opt, "r", 0);
        assert_eq!(outcome.candidates, vec!["red"]);
    }
}
