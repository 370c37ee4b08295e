// Copyright 2026 The optschema contributors
//
// This file is part of the `optschema` command-line argument parsing library.
//
// Licensed under the MIT license or the Apache license (version 2.0), at your option. You may not
// copy, modify, or distribute this file except in compliance with said license. You can find copies
// of these licenses either in the LICENSE-MIT and LICENSE-APACHE files, or alternatively at
// <http://opensource.org/licenses/MIT> and <http://www.apache.org/licenses/LICENSE-2.0>
// respectively.

//! The dynamic value type stored in a parsed values map.
//!
//! Parsed options do not share a single Rust type (a `flag` stores a bool, an `array` stores a
//! list, a `command` stores a nested map), so the values map is keyed by option key and holds a
//! [`Value`] - a re-export of [`serde_json::Value`]. This gives us deep/structural equality (used
//! throughout the requirement evaluator) and JSON (de)serialization of the version file for free.

use std::collections::HashMap;

/// A single stored or parsed value.
pub type Value = serde_json::Value;

/// The map of option key to parsed value, produced by a parse call.
pub type ValuesMap = HashMap<String, Value>;

/// Deep/structural equality between two values, used by the requirement evaluator.
///
/// Arrays compare element-by-element in order; objects compare by key set, recursively, ignoring
/// field order; everything else compares by strict equality. `serde_json::Value`'s own `PartialEq`
/// already has exactly this shape, so this is a thin, explicitly-named wrapper kept at the call
/// sites that care about the invariant rather than relying on an incidental `==`.
pub fn deep_eq(a: &Value, b: &Value) -> bool {
    a == b
}
