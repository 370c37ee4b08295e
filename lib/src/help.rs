// Copyright 2026 The optschema contributors
//
// This file is part of the `optschema` command-line argument parsing library.
//
// Licensed under the MIT license or the Apache license (version 2.0), at your option. You may not
// copy, modify, or distribute this file except in compliance with said license. You can find copies
// of these licenses either in the LICENSE-MIT and LICENSE-APACHE files, or alternatively at
// <http://opensource.org/licenses/MIT> and <http://www.apache.org/licenses/LICENSE-2.0>
// respectively.

//! Interface-level help/usage formatting.
//!
//! Renders a schema into a plain-text document: a usage line, an options section grouped by
//! `group`, and a commands section for nested `command` options. Each section writes into a
//! `fmt::Write` sink rather than any particular terminal, so a caller's own styling layer can wrap
//! the same structure; this module never emits escape codes.

use std::fmt;

use crate::registry::Registry;
use crate::requirement;
use crate::schema::{OptionDef, OptionKind, Schema};

/// Controls over rendering, beyond the schema and program name.
#[derive(Debug, Clone)]
pub struct FormatFlags {
    /// Target line width for wrapping synopsis text (best-effort; long single words are not
    /// split).
    pub max_width: usize,
    /// Whether `deprecated` options are included at all.
    pub show_deprecated: bool,
}

impl Default for FormatFlags {
    fn default() -> Self {
        Self { max_width: 80, show_deprecated: true }
    }
}

/// Render `schema` into a plain-text help document using the default [`FormatFlags`].
pub fn format(schema: &Schema, program_name: &str, filter: Option<&[String]>) -> String {
    format_with(schema, program_name, filter, &FormatFlags::default())
}

/// Render `schema` into a plain-text help document.
pub fn format_with(schema: &Schema, program_name: &str, filter: Option<&[String]>, flags: &FormatFlags) -> String {
    let mut out = String::new();
    write_into(&mut out, schema, program_name, filter, flags).expect("writing into a String cannot fail");
    out
}

fn matches_filter(candidates: &[&str], filter: Option<&[String]>) -> bool {
    match filter {
        None => true,
        Some(terms) if terms.is_empty() => true,
        Some(terms) => terms.iter().any(|t| candidates.iter().any(|c| c.contains(t.as_str()))),
    }
}

/// Write a rendered help document for `schema` into `w`.
pub fn write_into<W: fmt::Write>(
    w: &mut W,
    schema: &Schema,
    program_name: &str,
    filter: Option<&[String]>,
    flags: &FormatFlags,
) -> fmt::Result {
    let registry = Registry::build(schema);

    write!(w, "Usage: {program_name}")?;
    if schema.values().any(|opt| !opt.positional) {
        write!(w, " [OPTIONS]")?;
    }
    if let Some(pos_key) = registry.positional_key() {
        write!(w, " <{}>", registry.preferred_name(pos_key))?;
    }
    if schema.values().any(|opt| opt.kind == OptionKind::Command) {
        write!(w, " <COMMAND>")?;
    }
    writeln!(w)?;

    let mut seen_groups: Vec<Option<String>> = Vec::new();
    for opt in schema.values() {
        if opt.positional || opt.kind == OptionKind::Command {
            continue;
        }
        if !seen_groups.contains(&opt.group) {
            seen_groups.push(opt.group.clone());
        }
    }

    for group in &seen_groups {
        let mut wrote_header = false;
        for (key, opt) in schema {
            if opt.positional || opt.kind == OptionKind::Command {
                continue;
            }
            if &opt.group != group {
                continue;
            }
            if opt.deprecated && !flags.show_deprecated {
                continue;
            }
            let names: Vec<&str> = opt.present_names().collect();
            if !matches_filter(&[&names[..], &[key.as_str()]].concat(), filter) {
                continue;
            }
            if !wrote_header {
                writeln!(w)?;
                writeln!(w, "{}:", group.as_deref().unwrap_or("Options"))?;
                wrote_header = true;
            }
            write_option_line(w, &registry, key, opt, flags.max_width)?;
        }
    }

    if let Some(pos_key) = registry.positional_key() {
        let opt = &schema[pos_key];
        if matches_filter(&[registry.preferred_name(pos_key)], filter) {
            writeln!(w)?;
            writeln!(w, "Arguments:")?;
            write_option_line(w, &registry, pos_key, opt, flags.max_width)?;
        }
    }

    let command_keys: Vec<&String> = schema.iter().filter(|(_, o)| o.kind == OptionKind::Command).map(|(k, _)| k).collect();
    if !command_keys.is_empty() {
        writeln!(w)?;
        writeln!(w, "Commands:")?;
        for key in command_keys {
            let opt = &schema[key];
            if !matches_filter(&[registry.preferred_name(key)], filter) {
                continue;
            }
            writeln!(w, "  {:<22} {}", registry.preferred_name(key), opt.synopsis.as_deref().unwrap_or(""))?;
        }
    }

    Ok(())
}

fn write_option_line<W: fmt::Write>(
    w: &mut W,
    registry: &Registry,
    key: &str,
    opt: &OptionDef,
    max_width: usize,
) -> fmt::Result {
    let joined_names = opt.present_names().collect::<Vec<_>>().join(", ");
    let label = if joined_names.is_empty() { registry.preferred_name(key).to_string() } else { joined_names };
    write!(w, "  {label:<22}")?;

    let mut suffix = String::new();
    if let Some(synopsis) = &opt.synopsis {
        suffix.push(' ');
        suffix.push_str(synopsis);
    }
    if opt.deprecated {
        suffix.push_str(" (deprecated)");
    }
    if let Some(req) = &opt.requires {
        suffix.push_str(&format!(" [requires {}]", requirement::render(req)));
    }
    if !opt.choices.is_empty() {
        suffix.push_str(&format!(" [one of: {}]", opt.choices.join(", ")));
    }

    let wrapped = wrap_text(suffix.trim_start(), max_width.saturating_sub(24).max(20));
    writeln!(w, "{wrapped}")
}

/// A minimal greedy line wrapper; long single words are left intact rather than split.
fn wrap_text(text: &str, width: usize) -> String {
    if text.len() <= width {
        return text.to_string();
    }
    let mut out = String::new();
    let mut line_len = 0;
    for word in text.split_whitespace() {
        if line_len > 0 && line_len + 1 + word.len() > width {
            out.push('\n');
            out.push_str(&" ".repeat(24));
            line_len = 0;
        } else if line_len > 0 {
            out.push(' ');
            line_len += 1;
        }
        out.push_str(word);
        line_len += word.len();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::OptionDef;

    #[test]
    fn usage_line_lists_options_and_positional() {
        let mut schema = Schema::new();
        schema.insert("f".into(), OptionDef::flag().name("-f"));
        schema.insert("pos".into(), OptionDef::single().positional(true).preferred_name("FILE"));
        let text = format(&schema, "prog", None);
        assert!(text.starts_with("Usage: prog [OPTIONS] <FILE>"));
    }

    #[test]
    fn groups_render_under_their_own_header() {
        let mut schema = Schema::new();
        schema.insert("a".into(), OptionDef::flag().name("-a").group("Networking"));
        let text = format(&schema, "prog", None);
        assert!(text.contains("Networking:"));
    }

    #[test]
    fn filter_narrows_rendered_options() {
        let mut schema = Schema::new();
        schema.insert("a".into(), OptionDef::flag().name("--alpha"));
        schema.insert("b".into(), OptionDef::flag().name("--beta"));
        let text = format(&schema, "prog", Some(&["alpha".to_string()]));
        assert!(text.contains("--alpha"));
        assert!(!text.contains("--beta"));
    }
}
