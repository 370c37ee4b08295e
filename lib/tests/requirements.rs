// Copyright 2026 The optschema contributors
//
// This file is part of the `optschema` command-line argument parsing library.
//
// Licensed under the MIT license or the Apache license (version 2.0), at your option. You may not
// copy, modify, or distribute this file except in compliance with said license. You can find copies
// of these licenses either in the LICENSE-MIT and LICENSE-APACHE files, or alternatively at
// <http://opensource.org/licenses/MIT> and <http://www.apache.org/licenses/LICENSE-2.0>
// respectively.

//! `requires`/`required_if` enforcement through a full parse, including the `All`/`One`/`Not`
//! combinators rather than a single key atom.

use optschema::{parse, Error, OptionDef, Requirement, Schema, Value};

#[test]
fn requires_all_of_a_conjunction() {
    let mut schema = Schema::new();
    schema.insert("a".into(), OptionDef::flag().name("-a"));
    schema.insert("b".into(), OptionDef::flag().name("-b"));
    schema.insert(
        "c".into(),
        OptionDef::flag().name("-c").requires(Requirement::all([Requirement::key("a"), Requirement::key("b")])),
    );

    let err = parse(&schema, vec!["-c".to_string(), "-a".to_string()], None).unwrap_err();
    assert!(matches!(err, Error::UnsatisfiedRequirement { key, .. } if key == "c"));

    let outcome = parse(&schema, vec!["-c".to_string(), "-a".to_string(), "-b".to_string()], None).unwrap();
    assert_eq!(outcome.values.get("c").and_then(|v| v.as_bool()), Some(true));
}

#[test]
fn required_if_fires_when_the_condition_holds_and_the_key_is_absent() {
    let mut schema = Schema::new();
    schema.insert("mode".into(), OptionDef::single().name("--mode").choices(["a", "b"]));
    schema.insert(
        "extra".into(),
        OptionDef::single().name("--extra").required_if(Requirement::equals("mode", Value::String("a".into()))),
    );

    let err = parse(&schema, vec!["--mode".to_string(), "a".to_string()], None).unwrap_err();
    assert!(matches!(err, Error::UnsatisfiedConditionalRequirement { key, .. } if key == "extra"));

    let outcome = parse(
        &schema,
        vec!["--mode".to_string(), "a".to_string(), "--extra".to_string(), "x".to_string()],
        None,
    )
    .unwrap();
    assert_eq!(outcome.values.get("extra").and_then(|v| v.as_str()), Some("x"));

    let outcome = parse(&schema, vec!["--mode".to_string(), "b".to_string()], None).unwrap();
    assert_eq!(outcome.values.get("extra"), None);
}

#[test]
fn not_and_one_invert_and_disjoin_as_expected() {
    let mut schema = Schema::new();
    schema.insert("a".into(), OptionDef::flag().name("-a"));
    schema.insert("b".into(), OptionDef::flag().name("-b"));
    schema.insert(
        "c".into(),
        OptionDef::flag()
            .name("-c")
            .requires(Requirement::one([Requirement::key("a"), Requirement::not(Requirement::key("b"))])),
    );

    // Neither "a" present nor "b" absent: Requirement::one fails.
    let err = parse(&schema, vec!["-c".to_string(), "-b".to_string()], None).unwrap_err();
    assert!(matches!(err, Error::UnsatisfiedRequirement { key, .. } if key == "c"));

    // "b" absent satisfies the `Not` branch even without "a".
    let outcome = parse(&schema, vec!["-c".to_string()], None).unwrap();
    assert_eq!(outcome.values.get("c").and_then(|v| v.as_bool()), Some(true));
}
