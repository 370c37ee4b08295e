// Copyright 2026 The optschema contributors
//
// This file is part of the `optschema` command-line argument parsing library.
//
// Licensed under the MIT license or the Apache license (version 2.0), at your option. You may not
// copy, modify, or distribute this file except in compliance with said license. You can find copies
// of these licenses either in the LICENSE-MIT and LICENSE-APACHE files, or alternatively at
// <http://opensource.org/licenses/MIT> and <http://www.apache.org/licenses/LICENSE-2.0>
// respectively.

//! The argument classifier: pure, stateless helpers implementing the token-shape tests from the
//! component design (inline-value splitting, option-prefix detection). Names are matched against
//! the registry as declared - a schema's `names` are exact strings (typically already carrying
//! their own leading dashes), so no prefix is stripped before a registry lookup. `option_prefix`
//! and `cluster_prefix` are independent knobs: the former decides whether an unmatched token
//! "looks like an option" (forcing rule 2, see `SPEC_FULL.md` §4.3), the latter is consumed
//! separately by [`crate::cluster`].
//!
//! The state machine in [`crate::engine`] applies the ranked rules in order, since the ranking
//! genuinely depends on the engine's running state (what the previous option still wants) as well
//! as the token's own shape.

use crate::tokenize::COMPLETION_SENTINEL;

/// Split a token on its first `=`, giving `(name, inline_value)`.
pub fn split_inline(token: &str) -> (&str, Option<&str>) {
    match token.find('=') {
        Some(pos) => (&token[..pos], Some(&token[pos + 1..])),
        None => (token, None),
    }
}

/// Whether `token` begins with `prefix` and has at least one character beyond it - the forcing
/// test for rule 2 (an option-shaped token past this point is never reinterpreted as positional).
pub fn looks_option_shaped(token: &str, prefix: &str) -> bool {
    !prefix.is_empty() && token.starts_with(prefix) && token.len() > prefix.len()
}

/// Whether `token` carries the completion sentinel anywhere in it.
pub fn is_completion_token(token: &str) -> bool {
    token.contains(COMPLETION_SENTINEL)
}

/// Strip the completion sentinel out of a token, if present.
pub fn strip_sentinel(token: &str) -> String {
    token.chars().filter(|&c| c != COMPLETION_SENTINEL).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_inline_splits_on_first_equals() {
        assert_eq!(split_inline("--foo=bar=baz"), ("--foo", Some("bar=baz")));
        assert_eq!(split_inline("--foo"), ("--foo", None));
    }

    #[test]
    fn looks_option_shaped_requires_body_past_prefix() {
        assert!(looks_option_shaped("-f", "-"));
        assert!(!looks_option_shaped("-", "-"));
        assert!(!looks_option_shaped("file.txt", "-"));
    }

    #[test]
    fn strip_sentinel_removes_every_occurrence() {
        assert_eq!(strip_sentinel(&format!("-f{COMPLETION_SENTINEL}oo")), "-foo");
    }
}
