// Copyright 2026 The optschema contributors
//
// This file is part of the `optschema` command-line argument parsing library.
//
// Licensed under the MIT license or the Apache license (version 2.0), at your option. You may not
// copy, modify, or distribute this file except in compliance with said license. You can find copies
// of these licenses either in the LICENSE-MIT and LICENSE-APACHE files, or alternatively at
// <http://opensource.org/licenses/MIT> and <http://www.apache.org/licenses/LICENSE-2.0>
// respectively.

//! Tokenizing a raw command line into argument tokens.
//!
//! Splits on whitespace, honoring single and double quotes that preserve the enclosed character
//! sequence verbatim (no escape processing beyond the quote characters themselves, matching a
//! typical shell-lite tokenizer). If a completion index is given, a sentinel NUL byte is spliced
//! into the raw line at that absolute character offset before splitting, so it rides along inside
//! whichever token it falls in; a completion index at end-of-line appends a token made solely of
//! the sentinel.

/// The sentinel character marking the exact position of a pending completion request inside a
/// token.
pub const COMPLETION_SENTINEL: char = '\u{0}';

/// Split a raw command line into tokens, per [`crate::tokenize`] module documentation.
///
/// `completion_index`, if given, is an absolute character offset into `line`.
pub fn tokenize(line: &str, completion_index: Option<usize>) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    let chars_len = chars.len();
    let marked: Vec<char> = match completion_index {
        Some(idx) if idx <= chars.len() => {
            let mut out = Vec::with_capacity(chars.len() + 1);
            out.extend_from_slice(&chars[..idx]);
            out.push(COMPLETION_SENTINEL);
            out.extend_from_slice(&chars[idx..]);
            out
        }
        _ => chars,
    };

    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quote: Option<char> = None;
    let mut i = 0;
    while i < marked.len() {
        let c = marked[i];
        match quote {
            Some(q) if c == q => {
                quote = None;
            }
            Some(_) => {
                current.push(c);
            }
            None => {
                if c == '\'' || c == '"' {
                    quote = Some(c);
                    in_token = true;
                } else if c.is_whitespace() {
                    if in_token {
                        tokens.push(std::mem::take(&mut current));
                        in_token = false;
                    }
                } else {
                    current.push(c);
                    in_token = true;
                }
            }
        }
        i += 1;
    }
    if in_token || quote.is_some() {
        tokens.push(current);
    }

    // A completion at end-of-line, with no trailing non-whitespace, yields a bare sentinel token.
    if let Some(idx) = completion_index {
        if idx == chars_len && tokens.last().map(|t| !t.contains(COMPLETION_SENTINEL)).unwrap_or(true) {
            tokens.push(COMPLETION_SENTINEL.to_string());
        }
    }

    tokens
}

/// Whether `token` carries the completion sentinel, and the prefix (sentinel stripped) if so.
pub fn completion_prefix(token: &str) -> Option<String> {
    if token.contains(COMPLETION_SENTINEL) {
        Some(token.chars().filter(|&c| c != COMPLETION_SENTINEL).collect())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_whitespace() {
        assert_eq!(tokenize("-s x -f", None), vec!["-s", "x", "-f"]);
    }

    #[test]
    fn honors_single_and_double_quotes() {
        assert_eq!(tokenize("-s 'hello world' -f", None), vec!["-s", "hello world", "-f"]);
        assert_eq!(tokenize(r#"-s "a b" -f"#, None), vec!["-s", "a b", "-f"]);
    }

    #[test]
    fn completion_index_mid_token_carries_sentinel() {
        let tokens = tokenize("-fo", Some(3));
        assert_eq!(tokens.len(), 1);
        assert_eq!(completion_prefix(&tokens[0]).as_deref(), Some("-fo"));
    }

    #[test]
    fn completion_index_at_end_of_line_appends_bare_token() {
        let tokens = tokenize("-f", Some(2));
        assert_eq!(tokens.last().unwrap(), &COMPLETION_SENTINEL.to_string());
    }
}
