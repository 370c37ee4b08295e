// Copyright 2026 The optschema contributors
//
// This file is part of the `optschema` command-line argument parsing library.
//
// Licensed under the MIT license or the Apache license (version 2.0), at your option. You may not
// copy, modify, or distribute this file except in compliance with said license. You can find copies
// of these licenses either in the LICENSE-MIT and LICENSE-APACHE files, or alternatively at
// <http://opensource.org/licenses/MIT> and <http://www.apache.org/licenses/LICENSE-2.0>
// respectively.

//! The cluster expander.
//!
//! Rewrites a short-form cluster argument (e.g. `-fsval`) into an equivalent sequence of option
//! names and inline parameters, so downstream parsing logic never needs cluster awareness - it
//! only ever sees plain names and `name=value` inline parameters (see the "cluster as
//! preprocessing" design note).

use crate::error::{Error, Result};
use crate::registry::Registry;
use crate::schema::{OptionKind, Schema};

/// The outcome of attempting to expand `token` as a cluster.
#[derive(Debug)]
pub enum ClusterOutcome {
    /// Not a cluster at all (first letter after the prefix is unknown).
    NotACluster,
    /// Fully expanded into a sequence of plain tokens to splice into the argument stream.
    Expanded(Vec<String>),
}

/// Attempt to expand `token` (stripped of its option prefix already, i.e. just the letters) as a
/// cluster, given `prefix` to re-attach to each produced name.
pub fn expand(token_body: &str, prefix: &str, registry: &Registry, schema: &Schema) -> Result<ClusterOutcome> {
    let mut chars = token_body.chars();
    let first = match chars.next() {
        Some(c) => c,
        None => return Ok(ClusterOutcome::NotACluster),
    };

    if registry.key_for_letter(first).is_none() {
        return Ok(ClusterOutcome::NotACluster);
    }

    let letters: Vec<char> = token_body.chars().collect();
    // Check whether every letter is known; if not, treat the remainder as an inline parameter to
    // the first letter's option, per the "first_letter=rest" fallback.
    for (i, letter) in letters.iter().enumerate() {
        if registry.key_for_letter(*letter).is_none() {
            let first_key = registry.key_for_letter(first).unwrap();
            let first_name = registry.preferred_name(first_key);
            let rest: String = letters[i..].iter().collect();
            return Ok(ClusterOutcome::Expanded(vec![format!("{first_name}={rest}")]));
        }
    }

    let mut out = Vec::with_capacity(letters.len());
    let last_index = letters.len() - 1;
    for (i, letter) in letters.iter().enumerate() {
        let key = registry.key_for_letter(*letter).expect("checked above");
        let opt = schema.get(key).expect("registry refers to schema key");
        if i != last_index {
            let variadic_like = matches!(opt.kind, OptionKind::Command) || opt.is_variadic();
            if variadic_like {
                return Err(Error::InvalidClusterOption { letter: *letter });
            }
        }
        out.push(registry.preferred_name(key).to_string());
    }
    let _ = prefix; // names returned are bare; the caller re-applies its own prefix if desired.
    Ok(ClusterOutcome::Expanded(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::OptionDef;

    fn sample_schema() -> Schema {
        let mut schema = Schema::new();
        schema.insert("flag".into(), OptionDef::flag().name("-f").cluster(['f']));
        schema.insert("single".into(), OptionDef::single().name("-s").cluster(['s']));
        schema
    }

    #[test]
    fn expands_known_cluster() {
        let schema = sample_schema();
        let registry = Registry::build(&schema);
        match expand("fs", "-", &registry, &schema).unwrap() {
            ClusterOutcome::Expanded(names) => assert_eq!(names, vec!["-f", "-s"]),
            ClusterOutcome::NotACluster => panic!("expected expansion"),
        }
    }

    #[test]
    fn unknown_first_letter_is_not_a_cluster() {
        let schema = sample_schema();
        let registry = Registry::build(&schema);
        assert!(matches!(expand("xs", "-", &registry, &schema).unwrap(), ClusterOutcome::NotACluster));
    }

    #[test]
    fn unknown_intermediate_letter_becomes_inline_param() {
        let schema = sample_schema();
        let registry = Registry::build(&schema);
        match expand("fval", "-", &registry, &schema).unwrap() {
            ClusterOutcome::Expanded(names) => assert_eq!(names, vec!["-f=val"]),
            ClusterOutcome::NotACluster => panic!("expected expansion"),
        }
    }

    #[test]
    fn non_last_variadic_letter_errors() {
        let mut schema = sample_schema();
        schema.get_mut("single").unwrap().cluster = vec!['s'];
        schema.insert("arr".into(), OptionDef::array().name("-a").cluster(['a']));
        let registry = Registry::build(&schema);
        let err = expand("af", "-", &registry, &schema).unwrap_err();
        assert!(matches!(err, Error::InvalidClusterOption { letter: 'a' }));
    }
}
