// Copyright 2026 The optschema contributors
//
// This file is part of the `optschema` command-line argument parsing library.
//
// Licensed under the MIT license or the Apache license (version 2.0), at your option. You may not
// copy, modify, or distribute this file except in compliance with said license. You can find copies
// of these licenses either in the LICENSE-MIT and LICENSE-APACHE files, or alternatively at
// <http://opensource.org/licenses/MIT> and <http://www.apache.org/licenses/LICENSE-2.0>
// respectively.

//! Interactive playground for the `optschema` library crate.
//!
//! Builds a small sample schema, validates it, then parses the program's own command line
//! arguments against it and prints the resulting values, warnings and any error encountered. Run
//! with `RUST_LOG=debug` to see the engine's own tracing of which rule matched each token.
//!
//! See the `README.md` file for instructions.

use optschema::{format, parse, validate, OptionDef, ParamCount, ParseFlags, Schema};

fn sample_schema() -> Schema {
    let mut schema = Schema::new();
    schema.insert("help".into(), OptionDef::help().name("-h").name("--help").synopsis("print this help text"));
    schema.insert(
        "verbose".into(),
        OptionDef::flag().name("-v").name("--verbose").cluster(['v']).synopsis("enable verbose output"),
    );
    schema.insert(
        "output".into(),
        OptionDef::single()
            .name("-o")
            .name("--output")
            .cluster(['o'])
            .synopsis("write output to FILE")
            .group("Output"),
    );
    schema.insert(
        "tags".into(),
        OptionDef::array()
            .name("--tag")
            .separator_literal(",")
            .unique(true)
            .synopsis("attach a tag (comma-separated, repeatable)")
            .group("Output"),
    );
    schema.insert(
        "jobs".into(),
        OptionDef::function()
            .name("-j")
            .name("--jobs")
            .param_count(ParamCount::Exact(1))
            .synopsis("number of parallel jobs")
            .parse_fn(|params, _info| {
                params[0].parse::<u64>().map(Into::into).map_err(|e| e.to_string())
            }),
    );
    schema.insert("input".into(), OptionDef::single().positional(true).preferred_name("INPUT"));
    schema
}

fn main() {
    env_logger::init();

    let schema = sample_schema();
    if let Err(e) = validate(&schema, None) {
        eprintln!("schema is invalid: {e}");
        std::process::exit(2);
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    println!("[ input arguments ]\n");
    if args.is_empty() {
        println!("(none)");
    }
    for (i, arg) in args.iter().enumerate() {
        println!("[{i}]: {arg}");
    }

    let flags = ParseFlags { program_name: "optschema-playground".to_string(), ..ParseFlags::default() };
    println!("\n[ result ]\n");
    match parse(&schema, args, Some(flags)) {
        Ok(outcome) => {
            let mut keys: Vec<&String> = outcome.values.keys().collect();
            keys.sort();
            for key in keys {
                println!("{key} = {}", outcome.values[key]);
            }
            for warning in &outcome.warnings {
                println!("warning: {warning}");
            }
        }
        Err(e) => match e.as_message() {
            Some(message) => println!("{}", message.text()),
            None => eprintln!("error: {e}"),
        },
    }

    println!("\n[ help text ]\n");
    println!("{}", format(&schema, "optschema-playground", None, None));
}
