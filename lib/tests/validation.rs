// Copyright 2026 The optschema contributors
//
// This file is part of the `optschema` command-line argument parsing library.
//
// Licensed under the MIT license or the Apache license (version 2.0), at your option. You may not
// copy, modify, or distribute this file except in compliance with said license. You can find copies
// of these licenses either in the LICENSE-MIT and LICENSE-APACHE files, or alternatively at
// <http://opensource.org/licenses/MIT> and <http://www.apache.org/licenses/LICENSE-2.0>
// respectively.

//! Schema validation through the public [`validate`] entry point, including recursion into a
//! nested `command` schema.

use optschema::{validate, Error, OptionDef, Schema, SchemaSource, Warning};

#[test]
fn validation_recurses_into_nested_command_schemas() {
    let mut inner = Schema::new();
    inner.insert("a".into(), OptionDef::flag().name("-a"));
    inner.insert("b".into(), OptionDef::flag().name("-a"));

    let mut schema = Schema::new();
    schema.insert("build".into(), OptionDef::command(SchemaSource::Inline(inner)).name("build"));

    let err = validate(&schema, None).unwrap_err();
    assert!(matches!(err, Error::DuplicateName(n) if n == "-a"));
}

#[test]
fn a_command_provider_returning_the_same_schema_twice_does_not_loop_forever() {
    use std::sync::Arc;

    let provider: Arc<dyn Fn() -> Schema + Send + Sync> = Arc::new(|| {
        let mut nested = Schema::new();
        nested.insert("x".into(), OptionDef::flag().name("-x"));
        nested
    });

    let mut schema = Schema::new();
    schema.insert(
        "one".into(),
        OptionDef::command(SchemaSource::Callback(provider.clone())).name("one"),
    );
    schema.insert("two".into(), OptionDef::command(SchemaSource::Callback(provider)).name("two"));

    // Distinct option keys pointing at `Arc::clone`s of the same callback are the cycle the
    // callback-identity guard exists to catch; this must still terminate and succeed.
    let warnings = validate(&schema, None).unwrap();
    assert!(warnings.is_empty());
}

#[test]
fn mixed_naming_convention_is_a_warning_not_an_error() {
    let mut schema = Schema::new();
    schema.insert("a".into(), OptionDef::flag().name("--fooBar"));
    schema.insert("b".into(), OptionDef::flag().name("--foo-baz"));

    let warnings = validate(&schema, None).unwrap();
    assert!(warnings.iter().any(|w| matches!(w, Warning::MixedNamingConvention { .. })));
}

#[test]
fn self_requirement_is_rejected() {
    use optschema::Requirement;
    let mut schema = Schema::new();
    schema.insert("a".into(), OptionDef::flag().name("-a").requires(Requirement::key("a")));

    let err = validate(&schema, None).unwrap_err();
    assert!(matches!(err, Error::SelfRequirement { key } if key == "a"));
}
