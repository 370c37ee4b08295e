// Copyright 2026 The optschema contributors
//
// This file is part of the `optschema` command-line argument parsing library.
//
// Licensed under the MIT license or the Apache license (version 2.0), at your option. You may not
// copy, modify, or distribute this file except in compliance with said license. You can find copies
// of these licenses either in the LICENSE-MIT and LICENSE-APACHE files, or alternatively at
// <http://opensource.org/licenses/MIT> and <http://www.apache.org/licenses/LICENSE-2.0>
// respectively.

//! The registry: schema indexes consumed in constant time by the classifier.
//!
//! Mirrors the teacher's `OptionSet`/`CommandSet` index-building role (`options.rs`,
//! `commands.rs`), generalized from static slices to an owned index over a dynamic,
//! `HashMap`-keyed schema.

use std::collections::HashMap;

use crate::schema::Schema;

/// Indexes built from a [`Schema`], assumed already validated (duplicate names/letters are a
/// validator responsibility; `build` does not re-check them).
#[derive(Debug, Clone, Default)]
pub struct Registry {
    /// Every registered name and trailing-marker string, mapped to its owning option key.
    name_to_key: HashMap<String, String>,
    /// Every registered cluster letter, mapped to its owning option key.
    letter_to_key: HashMap<char, String>,
    /// The key of the one option that accepts bare positional arguments, if any.
    positional_key: Option<String>,
    /// Each option's resolved preferred name: the explicit `preferred_name`, or the first
    /// non-`None` entry in `names`, computed once here rather than mutating the schema.
    preferred_names: HashMap<String, String>,
}

impl Registry {
    /// Build indexes over `schema`. Duplicate names/letters are assumed to have already been
    /// rejected by [`crate::validator::validate`]; the first occurrence wins if they were not.
    pub fn build(schema: &Schema) -> Self {
        let mut reg = Registry::default();
        for (key, opt) in schema {
            for name in opt.present_names() {
                reg.name_to_key.entry(name.to_string()).or_insert_with(|| key.clone());
            }
            if let Some(marker) = &opt.trailing_marker {
                reg.name_to_key.entry(marker.clone()).or_insert_with(|| key.clone());
            }
            for letter in &opt.cluster {
                reg.letter_to_key.entry(*letter).or_insert_with(|| key.clone());
            }
            if opt.positional && reg.positional_key.is_none() {
                reg.positional_key = Some(key.clone());
            }
            let preferred = opt
                .preferred_name
                .clone()
                .or_else(|| opt.present_names().next().map(str::to_string))
                .unwrap_or_else(|| key.clone());
            reg.preferred_names.insert(key.clone(), preferred);
            log::trace!(target: "optschema::registry", "indexed option `{key}`");
        }
        reg
    }

    /// The option key registered for `name` (a plain name or a trailing-marker string).
    pub fn key_for_name(&self, name: &str) -> Option<&str> {
        self.name_to_key.get(name).map(String::as_str)
    }

    /// The option key registered for cluster letter `letter`.
    pub fn key_for_letter(&self, letter: char) -> Option<&str> {
        self.letter_to_key.get(&letter).map(String::as_str)
    }

    /// The key of the positional-accepting option, if any.
    pub fn positional_key(&self) -> Option<&str> {
        self.positional_key.as_deref()
    }

    /// An option's resolved preferred (display) name.
    pub fn preferred_name<'a>(&'a self, key: &'a str) -> &'a str {
        self.preferred_names.get(key).map(String::as_str).unwrap_or(key)
    }

    /// Every registered plain name (not including trailing markers), for completion.
    pub fn all_names(&self) -> impl Iterator<Item = &str> {
        self.name_to_key.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.name_to_key.is_empty() && self.letter_to_key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::OptionDef;

    #[test]
    fn build_indexes_names_letters_and_positional() {
        let mut schema = Schema::new();
        schema.insert("flag".into(), OptionDef::flag().name("-f").cluster(['f']));
        schema.insert("pos".into(), OptionDef::single().positional(true));
        let reg = Registry::build(&schema);
        assert_eq!(reg.key_for_name("-f"), Some("flag"));
        assert_eq!(reg.key_for_letter('f'), Some("flag"));
        assert_eq!(reg.positional_key(), Some("pos"));
    }

    #[test]
    fn preferred_name_falls_back_to_first_name() {
        let mut schema = Schema::new();
        schema.insert("flag".into(), OptionDef::flag().name("-f").name("--flag"));
        let reg = Registry::build(&schema);
        assert_eq!(reg.preferred_name("flag"), "-f");
    }
}
