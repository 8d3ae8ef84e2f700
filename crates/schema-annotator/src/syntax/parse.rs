//! Parsers for the two node kinds the pass synthesizes from text.

use serde_json::Value;

use super::{Expression, ImportDeclaration, Literal, MappingField};
use crate::error::{AnnotateError, Result};

/// Parse canonical schema text into a mapping-constructor expression.
///
/// Schema text is JSON, which is a subset of the mapping-constructor grammar,
/// so the JSON parser does the work. The top level must be an object.
pub fn parse_mapping_constructor(text: &str) -> Result<Expression> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| AnnotateError::InvalidLiteral(e.to_string()))?;
    match value {
        Value::Object(_) => Ok(from_json(value)),
        other => Err(AnnotateError::InvalidLiteral(format!(
            "expected a mapping, found `{other}`"
        ))),
    }
}

fn from_json(value: Value) -> Expression {
    match value {
        Value::Null => Expression::Literal(Literal::Null),
        Value::Bool(b) => Expression::Literal(Literal::Boolean(b)),
        Value::Number(n) => Expression::Literal(Literal::Number(n.to_string())),
        Value::String(s) => Expression::Literal(Literal::String(s)),
        Value::Array(items) => Expression::List(items.into_iter().map(from_json).collect()),
        Value::Object(map) => Expression::Mapping(
            map.into_iter()
                .map(|(key, value)| MappingField {
                    key,
                    value: from_json(value),
                })
                .collect(),
        ),
    }
}

/// Parse `import org/module[.sub] [as prefix];`.
pub fn parse_import_declaration(text: &str) -> Result<ImportDeclaration> {
    let invalid = || AnnotateError::InvalidImport(text.to_string());

    let body = text
        .trim()
        .strip_prefix("import")
        .and_then(|rest| rest.strip_suffix(';'))
        .filter(|rest| rest.starts_with(char::is_whitespace))
        .ok_or_else(invalid)?;

    let mut words = body.split_whitespace();
    let path = words.next().ok_or_else(invalid)?;
    let prefix = match (words.next(), words.next(), words.next()) {
        (None, _, _) => None,
        (Some("as"), Some(prefix), None) => Some(prefix.to_string()),
        _ => return Err(invalid()),
    };

    let (org, module) = match path.split_once('/') {
        Some((org, module)) => (Some(org.to_string()), module),
        None => (None, path),
    };
    if module.is_empty() || org.as_deref() == Some("") {
        return Err(invalid());
    }
    let module_name: Vec<String> = module.split('.').map(str::to_string).collect();
    if module_name.iter().any(String::is_empty) {
        return Err(invalid());
    }

    Ok(ImportDeclaration {
        org,
        module_name,
        prefix,
    })
}
