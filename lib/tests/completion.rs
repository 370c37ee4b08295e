// Copyright 2026 The optschema contributors
//
// This file is part of the `optschema` command-line argument parsing library.
//
// Licensed under the MIT license or the Apache license (version 2.0), at your option. You may not
// copy, modify, or distribute this file except in compliance with said license. You can find copies
// of these licenses either in the LICENSE-MIT and LICENSE-APACHE files, or alternatively at
// <http://opensource.org/licenses/MIT> and <http://www.apache.org/licenses/LICENSE-2.0>
// respectively.

//! The completion protocol end to end: a raw command line with an embedded completion index
//! raises a terminating text message rather than failing or returning a values map.

use optschema::{parse, Error, Message, OptionDef, ParseFlags, Schema};

#[test]
fn completing_an_option_name_lists_every_matching_registered_name() {
    let mut schema = Schema::new();
    schema.insert("foo".into(), OptionDef::flag().name("-foo"));
    schema.insert("food".into(), OptionDef::flag().name("-food"));
    schema.insert("bar".into(), OptionDef::flag().name("-bar"));

    let flags = ParseFlags { completion_index: Some(3), ..ParseFlags::default() };
    let err = parse(&schema, "-fo", Some(flags)).unwrap_err();
    match err {
        Error::Message(Message::Completion(mut words)) => {
            words.sort();
            assert_eq!(words, vec!["-foo".to_string(), "-food".to_string()]);
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn completing_a_parameter_falls_back_to_choices() {
    let mut schema = Schema::new();
    schema.insert("color".into(), OptionDef::single().name("--color").choices(["red", "green", "blue"]));

    let line = "--color gr";
    let flags = ParseFlags { completion_index: Some(line.len()), ..ParseFlags::default() };
    let err = parse(&schema, line, Some(flags)).unwrap_err();
    match err {
        Error::Message(Message::Completion(words)) => assert_eq!(words, vec!["green".to_string()]),
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn malformed_tokens_before_the_completion_point_do_not_abort_the_scan() {
    let mut schema = Schema::new();
    schema.insert("need".into(), OptionDef::single().name("--need").required(true));
    schema.insert("foo".into(), OptionDef::flag().name("-foo"));

    // "--need" is left without its required parameter ("-foo" looks option-shaped, so it cannot
    // satisfy it), which would normally error; during completion that error must be swallowed so
    // the scan still reaches the completion point.
    let line = "--need -foo -fo";
    let flags = ParseFlags { completion_index: Some(line.len()), ..ParseFlags::default() };
    let err = parse(&schema, line, Some(flags)).unwrap_err();
    match err {
        Error::Message(Message::Completion(words)) => assert_eq!(words, vec!["-foo".to_string()]),
        other => panic!("unexpected: {other:?}"),
    }
}
