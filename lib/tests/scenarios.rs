// Copyright 2026 The optschema contributors
//
// This file is part of the `optschema` command-line argument parsing library.
//
// Licensed under the MIT license or the Apache license (version 2.0), at your option. You may not
// copy, modify, or distribute this file except in compliance with said license. You can find copies
// of these licenses either in the LICENSE-MIT and LICENSE-APACHE files, or alternatively at
// <http://opensource.org/licenses/MIT> and <http://www.apache.org/licenses/LICENSE-2.0>
// respectively.

//! End-to-end parse scenarios exercising the full engine against a raw command-line string rather
//! than a pre-split token list, so tokenization is part of what each test covers.

use optschema::{parse, Error, Message, OptionDef, Schema};

#[test]
fn flag_and_single_from_a_raw_command_line() {
    let mut schema = Schema::new();
    schema.insert("flag".into(), OptionDef::flag().name("-f"));
    schema.insert("single".into(), OptionDef::single().name("-s"));

    let outcome = parse(&schema, "-s x -f", None).unwrap();
    assert_eq!(outcome.values.get("flag").and_then(|v| v.as_bool()), Some(true));
    assert_eq!(outcome.values.get("single").and_then(|v| v.as_str()), Some("x"));
}

#[test]
fn quoted_parameters_preserve_embedded_whitespace() {
    let mut schema = Schema::new();
    schema.insert("message".into(), OptionDef::single().name("-m"));

    let outcome = parse(&schema, r#"-m "hello world""#, None).unwrap();
    assert_eq!(outcome.values.get("message").and_then(|v| v.as_str()), Some("hello world"));
}

#[test]
fn nested_command_stores_inner_values_at_its_key() {
    let mut inner = Schema::new();
    inner.insert("verbose".into(), OptionDef::flag().name("-v"));

    let mut schema = Schema::new();
    schema.insert(
        "build".into(),
        OptionDef::command(optschema::SchemaSource::Inline(inner)).name("build"),
    );

    let outcome = parse(&schema, "build -v", None).unwrap();
    let inner_values = outcome.values.get("build").unwrap();
    assert_eq!(inner_values.get("verbose").and_then(|v| v.as_bool()), Some(true));
}

#[test]
fn help_option_terminates_with_rendered_text() {
    let mut schema = Schema::new();
    schema.insert("help".into(), OptionDef::help().name("--help"));
    schema.insert("verbose".into(), OptionDef::flag().name("-v").synopsis("talk more"));

    let err = parse(&schema, "--help", None).unwrap_err();
    match err {
        Error::Message(Message::Help(text)) => {
            assert!(text.contains("-v"));
            assert!(text.contains("talk more"));
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn idempotent_reparse_of_the_same_arguments() {
    let mut schema = Schema::new();
    schema.insert("a".into(), OptionDef::array().name("-a").separator_literal(","));

    let first = parse(&schema, "-a 1,2,3", None).unwrap();
    let second = parse(&schema, "-a 1,2,3", None).unwrap();
    assert_eq!(first.values, second.values);
    assert_eq!(first.warnings, second.warnings);
}
