//! Attaches `@<prefix>:JsonSchema` annotations to type definitions.

use crate::SCHEMA_ANNOTATION_IDENTIFIER;
use crate::syntax::{
    Annotation, Expression, NameReference, TreeModifier, TypeDefinition, parse_mapping_constructor,
};
use crate::table::SchemaTable;

pub struct TypeDefinitionModifier<'a> {
    type_schemas: &'a SchemaTable,
    prefix: &'a str,
    inserted: usize,
}

impl<'a> TypeDefinitionModifier<'a> {
    pub fn new(type_schemas: &'a SchemaTable, prefix: &'a str) -> Self {
        Self {
            type_schemas,
            prefix,
            inserted: 0,
        }
    }

    /// Number of annotations added so far.
    pub fn inserted(&self) -> usize {
        self.inserted
    }

    fn has_schema_annotation(&self, node: &TypeDefinition) -> bool {
        node.annotations()
            .iter()
            .any(|a| a.is_qualified(self.prefix, SCHEMA_ANNOTATION_IDENTIFIER))
    }
}

impl TreeModifier for TypeDefinitionModifier<'_> {
    fn transform_type_definition(&mut self, node: TypeDefinition) -> TypeDefinition {
        let Some(schema) = self.type_schemas.get(&node.name) else {
            return node;
        };
        if self.has_schema_annotation(&node) {
            return node;
        }

        let value = match parse_mapping_constructor(schema) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(type_name = %node.name, error = %e, "Schema is not a valid literal");
                return node;
            }
        };

        tracing::debug!(type_name = %node.name, "Adding schema annotation");
        self.inserted += 1;
        let mut node = node;
        node.metadata
            .get_or_insert_with(Default::default)
            .annotations
            .push(schema_annotation(self.prefix, value));
        node
    }
}

pub fn schema_annotation(prefix: &str, value: Expression) -> Annotation {
    Annotation::new(
        NameReference::qualified(prefix, SCHEMA_ANNOTATION_IDENTIFIER),
        Some(value),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{Metadata, ModuleMember, ModulePart};

    const ADDRESS: &str = r#"{"type":"object","properties":{"city":{"type":"string"}}}"#;

    fn table() -> SchemaTable {
        let mut table = SchemaTable::new();
        table.insert("Address", ADDRESS.to_string());
        table
    }

    fn part(defs: Vec<TypeDefinition>) -> ModulePart {
        ModulePart::new(vec![], defs.into_iter().map(ModuleMember::Type).collect())
    }

    #[test]
    fn test_adds_annotation_after_existing_ones() {
        let table = table();
        let tainted = Annotation::new(NameReference::simple("tainted"), None);
        let root = part(vec![
            TypeDefinition::new("Address", "record {| string city; |}").with_metadata(Metadata {
                documentation: vec![],
                annotations: vec![tainted.clone()],
            }),
            TypeDefinition::new("Other", "int"),
        ]);

        let mut modifier = TypeDefinitionModifier::new(&table, "ai");
        let out = root.apply(&mut modifier);

        assert_eq!(modifier.inserted(), 1);
        let address = out.type_definition("Address").unwrap();
        assert_eq!(address.annotations().len(), 2);
        assert_eq!(address.annotations()[0], tainted);
        assert_eq!(
            address.annotations()[1].to_string(),
            format!("@ai:JsonSchema {ADDRESS}")
        );
        assert_eq!(out.type_definition("Other"), root.type_definition("Other"));
    }

    #[test]
    fn test_existing_annotation_is_kept() {
        let table = table();
        let existing = schema_annotation("llm", Expression::Mapping(vec![]));
        let root = part(vec![TypeDefinition::new("Address", "record {}").with_metadata(
            Metadata {
                documentation: vec!["Where.".into()],
                annotations: vec![existing],
            },
        )]);

        let mut modifier = TypeDefinitionModifier::new(&table, "llm");
        let out = root.apply(&mut modifier);
        assert_eq!(modifier.inserted(), 0);
        assert_eq!(out, root);
    }

    #[test]
    fn test_annotation_under_other_prefix_does_not_count() {
        let table = table();
        let root = part(vec![TypeDefinition::new("Address", "record {}").with_metadata(
            Metadata {
                documentation: vec![],
                annotations: vec![schema_annotation("old", Expression::Mapping(vec![]))],
            },
        )]);

        let mut modifier = TypeDefinitionModifier::new(&table, "ai");
        let out = root.apply(&mut modifier);
        assert_eq!(modifier.inserted(), 1);
        assert_eq!(out.type_definition("Address").unwrap().annotations().len(), 2);
    }

    #[test]
    fn test_invalid_schema_text_is_skipped() {
        let mut table = SchemaTable::new();
        table.insert("Address", "not json".to_string());
        let root = part(vec![TypeDefinition::new("Address", "record {}")]);

        let mut modifier = TypeDefinitionModifier::new(&table, "ai");
        let out = root.apply(&mut modifier);
        assert_eq!(modifier.inserted(), 0);
        assert_eq!(out, root);
    }
}
