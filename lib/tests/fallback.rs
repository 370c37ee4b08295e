// Copyright 2026 The optschema contributors
//
// This file is part of the `optschema` command-line argument parsing library.
//
// Licensed under the MIT license or the Apache license (version 2.0), at your option. You may not
// copy, modify, or distribute this file except in compliance with said license. You can find copies
// of these licenses either in the LICENSE-MIT and LICENSE-APACHE files, or alternatively at
// <http://opensource.org/licenses/MIT> and <http://www.apache.org/licenses/LICENSE-2.0>
// respectively.

//! Default/environment fallback precedence, exercised through the public [`parse`] entry point
//! rather than the `fallback` module directly, so the ordering against a real scan is covered.

use optschema::{parse, Error, OptionDef, Schema, Value};

#[test]
fn environment_source_wins_over_default_when_option_absent() {
    std::env::set_var("OPTSCHEMA_IT_FALLBACK", "from-env");
    let mut schema = Schema::new();
    schema.insert(
        "s".into(),
        OptionDef::single().name("-s").source_env("OPTSCHEMA_IT_FALLBACK").default_value(Value::String("fallback".into())),
    );

    let outcome = parse(&schema, Vec::<String>::new(), None).unwrap();
    assert_eq!(outcome.values.get("s").and_then(|v| v.as_str()), Some("from-env"));
    std::env::remove_var("OPTSCHEMA_IT_FALLBACK");
}

#[test]
fn cli_supplied_value_wins_over_every_fallback_source() {
    std::env::set_var("OPTSCHEMA_IT_FALLBACK_2", "from-env");
    let mut schema = Schema::new();
    schema.insert(
        "s".into(),
        OptionDef::single().name("-s").source_env("OPTSCHEMA_IT_FALLBACK_2").default_value(Value::String("fallback".into())),
    );

    let outcome = parse(&schema, vec!["-s".to_string(), "cli".to_string()], None).unwrap();
    assert_eq!(outcome.values.get("s").and_then(|v| v.as_str()), Some("cli"));
    std::env::remove_var("OPTSCHEMA_IT_FALLBACK_2");
}

#[test]
fn missing_required_option_without_any_fallback_source_errors() {
    let mut schema = Schema::new();
    schema.insert("s".into(), OptionDef::single().name("-s").required(true));

    let err = parse(&schema, Vec::<String>::new(), None).unwrap_err();
    assert!(matches!(err, Error::MissingRequiredOption { key } if key == "s"));
}

#[test]
fn array_default_is_stored_verbatim_when_unspecified() {
    let mut schema = Schema::new();
    schema.insert(
        "tags".into(),
        OptionDef::array().name("--tag").default_value(Value::Array(vec![Value::String("default".into())])),
    );

    let outcome = parse(&schema, Vec::<String>::new(), None).unwrap();
    assert_eq!(outcome.values.get("tags"), Some(&Value::Array(vec![Value::String("default".into())])));
}
