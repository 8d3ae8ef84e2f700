//! Type descriptor → OpenAPI 3.0 schema mapping.
//!
//! This is the raw input stage of the pass: its output still carries OpenAPI
//! idioms (`nullable`, `format: byte`, `$ref`, size bounds) that
//! [`crate::normalize`] strips or rewrites afterwards.

use serde_json::{Map, Value, json};

use crate::error::MapperError;
use crate::semantic::SemanticModel;
use crate::types::{RecordType, ScalarKind, TypeDescriptor};

const COMPONENTS_PREFIX: &str = "#/components/schemas/";

/// Produces the raw structural schema of a named type.
pub trait TypeMapper {
    fn schema_for(&self, name: &str, model: &dyn SemanticModel) -> Result<Value, MapperError>;
}

/// Default mapper. Named references are inlined; a reference back into a
/// definition that is already being mapped becomes a `$ref`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenApiTypeMapper;

impl TypeMapper for OpenApiTypeMapper {
    fn schema_for(&self, name: &str, model: &dyn SemanticModel) -> Result<Value, MapperError> {
        let mut stack = Vec::new();
        map_named(name, model, &mut stack)
    }
}

fn map_named(
    name: &str,
    model: &dyn SemanticModel,
    stack: &mut Vec<String>,
) -> Result<Value, MapperError> {
    if stack.iter().any(|n| n == name) {
        return Ok(json!({"$ref": format!("{COMPONENTS_PREFIX}{name}")}));
    }
    let definition = model
        .definition(name)
        .ok_or_else(|| MapperError::UnknownType(name.to_string()))?;
    stack.push(name.to_string());
    let schema = map_type(definition, model, stack);
    stack.pop();
    schema
}

fn map_type(
    ty: &TypeDescriptor,
    model: &dyn SemanticModel,
    stack: &mut Vec<String>,
) -> Result<Value, MapperError> {
    match ty {
        TypeDescriptor::Scalar(kind) => map_scalar(*kind),
        TypeDescriptor::Array(element) => Ok(json!({
            "type": "array",
            "items": map_type(element, model, stack)?,
        })),
        TypeDescriptor::Tuple(members) => map_tuple(members, model, stack),
        TypeDescriptor::Record(record) => map_record(record, model, stack),
        TypeDescriptor::Union(members) => map_union(members, model, stack),
        TypeDescriptor::NamedReference(name) => map_named(name, model, stack),
        TypeDescriptor::Object(object) => Err(MapperError::Unsupported(format!(
            "object type {}:{}",
            object.module, object.name
        ))),
        TypeDescriptor::Error => Err(MapperError::Unsupported("error".into())),
    }
}

fn map_scalar(kind: ScalarKind) -> Result<Value, MapperError> {
    Ok(match kind {
        ScalarKind::Nil => json!({"nullable": true}),
        ScalarKind::Boolean => json!({"type": "boolean"}),
        ScalarKind::Int => json!({"type": "integer", "format": "int64"}),
        ScalarKind::Byte => json!({"type": "string", "format": "byte"}),
        ScalarKind::Float => json!({"type": "number", "format": "float"}),
        ScalarKind::Decimal => json!({"type": "number", "format": "double"}),
        ScalarKind::String => json!({"type": "string"}),
        ScalarKind::Json | ScalarKind::Anydata => json!({}),
        ScalarKind::Any | ScalarKind::Handle => {
            return Err(MapperError::Unsupported(kind.name().to_string()));
        }
    })
}

fn map_tuple(
    members: &[TypeDescriptor],
    model: &dyn SemanticModel,
    stack: &mut Vec<String>,
) -> Result<Value, MapperError> {
    let mut schemas = members
        .iter()
        .map(|m| map_type(m, model, stack))
        .collect::<Result<Vec<_>, _>>()?;

    let mut schema = Map::new();
    schema.insert("type".into(), json!("array"));
    match schemas.len() {
        0 => {}
        1 => {
            schema.insert("items".into(), schemas.remove(0));
        }
        _ => {
            schema.insert("items".into(), json!({"oneOf": schemas}));
        }
    }
    schema.insert("minItems".into(), json!(members.len()));
    schema.insert("maxItems".into(), json!(members.len()));
    Ok(Value::Object(schema))
}

fn map_record(
    record: &RecordType,
    model: &dyn SemanticModel,
    stack: &mut Vec<String>,
) -> Result<Value, MapperError> {
    let mut schema = Map::new();
    schema.insert("type".into(), json!("object"));

    let mut properties = Map::new();
    for (name, field) in &record.fields {
        properties.insert(name.clone(), map_type(&field.ty, model, stack)?);
    }
    if !properties.is_empty() {
        schema.insert("properties".into(), Value::Object(properties));
    }

    if let Some(rest) = record.rest.as_deref() {
        schema.insert("additionalProperties".into(), map_type(rest, model, stack)?);
    }
    Ok(Value::Object(schema))
}

fn map_union(
    members: &[TypeDescriptor],
    model: &dyn SemanticModel,
    stack: &mut Vec<String>,
) -> Result<Value, MapperError> {
    let nullable = members
        .iter()
        .any(|m| matches!(m, TypeDescriptor::Scalar(ScalarKind::Nil)));
    let mut schemas = members
        .iter()
        .filter(|m| !matches!(m, TypeDescriptor::Scalar(ScalarKind::Nil)))
        .map(|m| map_type(m, model, stack))
        .collect::<Result<Vec<_>, _>>()?;

    // An unconstrained member already admits every value, nil included.
    if schemas.iter().any(|s| s.as_object().is_some_and(Map::is_empty)) {
        return Ok(json!({}));
    }

    let mut schema = match schemas.len() {
        0 => return Ok(json!({"nullable": true})),
        1 => schemas.remove(0),
        _ => json!({"oneOf": schemas}),
    };
    if nullable && let Value::Object(map) = &mut schema {
        map.insert("nullable".into(), Value::Bool(true));
    }
    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::ResolvedModel;
    use crate::types::{ModuleId, ObjectType, RecordField};

    fn model() -> ResolvedModel {
        ResolvedModel::new()
            .with_definition(
                "Address",
                TypeDescriptor::closed_record([("city", ScalarKind::String.into())]),
            )
            .with_definition(
                "Person",
                TypeDescriptor::Record(RecordType {
                    fields: [
                        ("name".to_string(), RecordField::required(ScalarKind::String.into())),
                        (
                            "home".to_string(),
                            RecordField::optional(TypeDescriptor::optional(TypeDescriptor::named(
                                "Address",
                            ))),
                        ),
                        (
                            "avatar".to_string(),
                            RecordField::required(TypeDescriptor::array_of(ScalarKind::Byte.into())),
                        ),
                    ]
                    .into_iter()
                    .collect(),
                    rest: Some(Box::new(ScalarKind::Anydata.into())),
                }),
            )
            .with_definition(
                "Node",
                TypeDescriptor::closed_record([(
                    "next",
                    TypeDescriptor::optional(TypeDescriptor::named("Node")),
                )]),
            )
            .with_definition(
                "Client",
                TypeDescriptor::Object(ObjectType::new(ModuleId::new("acme", "x", "1"), "Client")),
            )
    }

    #[test]
    fn test_closed_record() {
        let schema = OpenApiTypeMapper.schema_for("Address", &model()).unwrap();
        assert_eq!(
            schema,
            json!({"type": "object", "properties": {"city": {"type": "string"}}})
        );
    }

    #[test]
    fn test_nested_named_types_are_inlined() {
        let schema = OpenApiTypeMapper.schema_for("Person", &model()).unwrap();
        assert_eq!(
            schema["properties"]["home"],
            json!({"type": "object", "properties": {"city": {"type": "string"}}, "nullable": true})
        );
        assert_eq!(
            schema["properties"]["avatar"],
            json!({"type": "array", "items": {"type": "string", "format": "byte"}})
        );
        assert_eq!(schema["additionalProperties"], json!({}));
    }

    #[test]
    fn test_recursive_reference() {
        let schema = OpenApiTypeMapper.schema_for("Node", &model()).unwrap();
        assert_eq!(
            schema["properties"]["next"],
            json!({"$ref": "#/components/schemas/Node", "nullable": true})
        );
    }

    #[test]
    fn test_tuple_members() {
        let model = model().with_definition(
            "Pair",
            TypeDescriptor::Tuple(vec![ScalarKind::Int.into(), ScalarKind::String.into()]),
        );
        let schema = OpenApiTypeMapper.schema_for("Pair", &model).unwrap();
        assert_eq!(
            schema,
            json!({
                "type": "array",
                "items": {"oneOf": [{"type": "integer", "format": "int64"}, {"type": "string"}]},
                "minItems": 2,
                "maxItems": 2
            })
        );
    }

    #[test]
    fn test_empty_tuple_has_no_items() {
        let model = model().with_definition("Unit", TypeDescriptor::Tuple(vec![]));
        let schema = OpenApiTypeMapper.schema_for("Unit", &model).unwrap();
        assert_eq!(schema, json!({"type": "array", "minItems": 0, "maxItems": 0}));
    }

    #[test]
    fn test_unsupported_and_unknown() {
        assert!(matches!(
            OpenApiTypeMapper.schema_for("Client", &model()),
            Err(MapperError::Unsupported(_))
        ));
        assert!(matches!(
            OpenApiTypeMapper.schema_for("Nope", &model()),
            Err(MapperError::UnknownType(_))
        ));
    }
}
