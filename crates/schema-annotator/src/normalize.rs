//! Raw schema → canonical schema text.
//!
//! Canonicalization keeps only the structural keywords of a schema, resolves
//! `type` conflicts with composite keywords, maps `byte` to a number and
//! rewrites OpenAPI `nullable` into JSON Schema. The result is serialized and
//! compacted into a single line so it can be embedded as a literal.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value, json};

use crate::error::Result;

const COMPOSITE_KEYWORDS: [&str; 3] = ["allOf", "anyOf", "oneOf"];

/// Keywords with no bearing on the structural shape of a value.
const STRIPPED_KEYWORDS: &[&str] = &[
    // identity and versioning
    "$id",
    "$schema",
    "$anchor",
    "$comment",
    "$ref",
    // descriptive
    "title",
    "example",
    "examples",
    "deprecated",
    "externalDocs",
    // numeric, length and size bounds
    "minimum",
    "maximum",
    "exclusiveMinimum",
    "exclusiveMaximum",
    "minLength",
    "maxLength",
    "minItems",
    "maxItems",
    "minProperties",
    "maxProperties",
    "pattern",
    // conditional and edge composition
    "if",
    "then",
    "else",
    "dependentSchemas",
    "contains",
    "minContains",
    "maxContains",
    "prefixItems",
    "unevaluatedItems",
    "unevaluatedProperties",
    "propertyNames",
    "const",
    "additionalItems",
    "additionalProperties",
    // content and access
    "contentEncoding",
    "contentMediaType",
    "contentSchema",
    "readOnly",
    "writeOnly",
    "discriminator",
];

const EXTENSION_PREFIX: &str = "x-";

static LINE_BREAKS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\r\n|[\n\x0B\x0C\r\u{85}\u{2028}\u{2029}]").expect("valid regex"));

static PUNCTUATION_SPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*([{}\[\]:,])\s*").expect("valid regex"));

/// Canonicalize `raw` and render it as compact single-line text.
pub fn normalize(mut raw: Value) -> Result<String> {
    canonicalize(&mut raw);
    to_json_schema(&mut raw);
    let pretty = serde_json::to_string_pretty(&raw)?;
    Ok(compact(&pretty))
}

/// Apply the structural canonicalization rules in place, depth first.
pub fn canonicalize(schema: &mut Value) {
    let Value::Object(map) = schema else {
        return;
    };

    for key in ["items", "not"] {
        if let Some(child) = map.get_mut(key) {
            canonicalize(child);
        }
    }
    if let Some(Value::Object(properties)) = map.get_mut("properties") {
        properties.values_mut().for_each(canonicalize);
    }

    for keyword in COMPOSITE_KEYWORDS {
        if let Some(branches) = map.get_mut(keyword) {
            if let Value::Array(branches) = branches {
                branches.iter_mut().for_each(canonicalize);
            }
            // The composite already constrains the type of every branch.
            map.shift_remove("type");
        }
    }

    if map.get("format").and_then(Value::as_str) == Some("byte")
        && map.get("type").and_then(Value::as_str) == Some("string")
    {
        map.shift_remove("format");
        map.insert("type".into(), json!("number"));
    }

    // A stripped reference leaves an unconstrained schema, nil included.
    if map.shift_remove("$ref").is_some() {
        map.shift_remove("nullable");
    }
    strip_keywords(map);
}

fn strip_keywords(map: &mut Map<String, Value>) {
    map.retain(|key, _| {
        !STRIPPED_KEYWORDS.contains(&key.as_str()) && !key.starts_with(EXTENSION_PREFIX)
    });
}

/// Rewrite OpenAPI 3.0 `nullable` into JSON Schema, depth first.
pub fn to_json_schema(schema: &mut Value) {
    let Value::Object(map) = schema else {
        return;
    };

    for key in ["items", "not"] {
        if let Some(child) = map.get_mut(key) {
            to_json_schema(child);
        }
    }
    if let Some(Value::Object(properties)) = map.get_mut("properties") {
        properties.values_mut().for_each(to_json_schema);
    }
    for keyword in COMPOSITE_KEYWORDS {
        if let Some(Value::Array(branches)) = map.get_mut(keyword) {
            branches.iter_mut().for_each(to_json_schema);
        }
    }

    let Some(nullable) = map.shift_remove("nullable") else {
        return;
    };
    if nullable != Value::Bool(true) {
        return;
    }

    match map.get_mut("type") {
        Some(Value::String(ty)) => {
            let ty = std::mem::take(ty);
            map.insert("type".into(), json!([ty, "null"]));
        }
        Some(Value::Array(types)) => {
            if !types.iter().any(|t| t == "null") {
                types.push(json!("null"));
            }
        }
        _ => {
            let null_branch = json!({"type": "null"});
            if let Some(Value::Array(branches)) = map.get_mut("oneOf") {
                branches.push(null_branch);
            } else if let Some(Value::Array(branches)) = map.get_mut("anyOf") {
                branches.push(null_branch);
            } else if map.contains_key("allOf") {
                let all_of = map.shift_remove("allOf").unwrap_or(Value::Null);
                map.insert("anyOf".into(), json!([{"allOf": all_of}, null_branch]));
            } else if map.is_empty() {
                map.insert("type".into(), json!("null"));
            }
        }
    }
}

/// Collapse line breaks and whitespace around JSON punctuation.
pub fn compact(text: &str) -> String {
    let single_line = LINE_BREAKS.replace_all(text, "");
    PUNCTUATION_SPACE.replace_all(&single_line, "$1").into_owned()
}
