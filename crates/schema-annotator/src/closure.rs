//! Type closure walk: every named data type reachable from a result type
//! gets a schema in the table.

use crate::config::{MAX_DEPTH_LIMIT, MapperErrorPolicy, ModifierConfig};
use crate::error::{AnnotateError, Result};
use crate::mapper::TypeMapper;
use crate::normalize::normalize;
use crate::semantic::SemanticModel;
use crate::table::SchemaTable;
use crate::types::TypeDescriptor;

pub struct ClosureWalker<'a> {
    model: &'a dyn SemanticModel,
    mapper: &'a dyn TypeMapper,
    config: &'a ModifierConfig,
    anydata: TypeDescriptor,
    /// Named types whose definitions are being walked, outermost first.
    expanding: Vec<String>,
}

impl<'a> ClosureWalker<'a> {
    pub fn new(
        model: &'a dyn SemanticModel,
        mapper: &'a dyn TypeMapper,
        config: &'a ModifierConfig,
    ) -> Self {
        Self {
            model,
            mapper,
            config,
            anydata: model.anydata(),
            expanding: Vec::new(),
        }
    }

    /// Add a schema for every eligible named type in the closure of `ty`.
    ///
    /// An existing entry for a name is recomputed and overwritten, not
    /// skipped.
    pub fn populate(&mut self, ty: &TypeDescriptor, table: &mut SchemaTable) -> Result<()> {
        self.expanding.clear();
        self.walk(ty, table, 0)
    }

    fn walk(&mut self, ty: &TypeDescriptor, table: &mut SchemaTable, depth: usize) -> Result<()> {
        if depth > self.config.max_depth.min(MAX_DEPTH_LIMIT) {
            let root = self.expanding.first().cloned().unwrap_or_default();
            return Err(AnnotateError::DepthExceeded(root));
        }

        match ty {
            TypeDescriptor::NamedReference(name) => self.walk_named(ty, name, table, depth),
            TypeDescriptor::Array(element) => self.walk(element, table, depth + 1),
            TypeDescriptor::Tuple(members) | TypeDescriptor::Union(members) => {
                for member in members {
                    self.walk(member, table, depth + 1)?;
                }
                Ok(())
            }
            TypeDescriptor::Record(record) => {
                for field in record.fields.values() {
                    self.walk(&field.ty, table, depth + 1)?;
                }
                match record.rest.as_deref() {
                    Some(rest) => self.walk(rest, table, depth + 1),
                    None => Ok(()),
                }
            }
            TypeDescriptor::Scalar(_) | TypeDescriptor::Object(_) | TypeDescriptor::Error => Ok(()),
        }
    }

    fn walk_named(
        &mut self,
        ty: &TypeDescriptor,
        name: &str,
        table: &mut SchemaTable,
        depth: usize,
    ) -> Result<()> {
        if self.config.cycle_guard && self.expanding.iter().any(|n| n == name) {
            tracing::trace!(type_name = name, "Already expanding, not revisiting");
            return Ok(());
        }
        if !self.model.is_subtype(ty, &self.anydata) {
            tracing::debug!(type_name = name, "Not anydata, no schema emitted");
            return Ok(());
        }

        match self.schema_text(name) {
            Ok(schema) => {
                if table.insert(name, schema).is_some() {
                    tracing::trace!(type_name = name, "Schema recomputed");
                } else {
                    tracing::debug!(type_name = name, "Schema added");
                }
            }
            Err(e) => match self.config.mapper_errors {
                MapperErrorPolicy::SkipEntry => {
                    tracing::warn!(type_name = name, error = %e, "Skipping schema for type");
                }
                MapperErrorPolicy::AbortModule => return Err(e),
            },
        }

        let model = self.model;
        let Some(target) = model.definition(name) else {
            return Ok(());
        };
        self.expanding.push(name.to_string());
        let result = self.walk(target, table, depth + 1);
        self.expanding.pop();
        result
    }

    fn schema_for_name(&self, name: &str) -> Result<serde_json::Value> {
        self.mapper
            .schema_for(name, self.model)
            .map_err(|source| AnnotateError::Mapper {
                name: name.to_string(),
                source,
            })
    }

    fn schema_text(&self, name: &str) -> Result<String> {
        normalize(self.schema_for_name(name)?)
    }
}
