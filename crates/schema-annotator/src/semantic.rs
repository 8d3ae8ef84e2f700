//! Semantic model interface and a table-backed implementation.
//!
//! The pass never resolves names itself. It asks the model for the static
//! type of expressions, for type symbols by qualified name, and for named
//! type definitions.

use std::collections::HashMap;

use indexmap::IndexMap;

use crate::syntax::{Expression, NameReference, NodeId};
use crate::types::{self, ModuleId, ObjectType, ScalarKind, TypeDefinitions, TypeDescriptor};

/// Fully qualified name of a module-level type: `org/module:version` + name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedTypeName {
    pub module: ModuleId,
    pub name: String,
}

impl QualifiedTypeName {
    pub fn new(module: ModuleId, name: impl Into<String>) -> Self {
        Self {
            module,
            name: name.into(),
        }
    }
}

/// Result of a qualified type lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Symbol {
    Class(ObjectType),
    Type(TypeDescriptor),
}

pub trait SemanticModel: TypeDefinitions {
    fn type_by_name(&self, name: &QualifiedTypeName) -> Option<Symbol>;

    fn type_of(&self, expression: &Expression) -> Option<TypeDescriptor>;

    fn is_subtype(&self, sub: &TypeDescriptor, sup: &TypeDescriptor) -> bool {
        types::is_subtype(sub, sup, self.as_definitions())
    }

    fn anydata(&self) -> TypeDescriptor {
        TypeDescriptor::Scalar(ScalarKind::Anydata)
    }

    fn as_definitions(&self) -> &dyn TypeDefinitions;
}

/// Semantic model backed by tables the front end fills in after resolution.
#[derive(Debug, Clone, Default)]
pub struct ResolvedModel {
    definitions: IndexMap<String, TypeDescriptor>,
    symbols: HashMap<QualifiedTypeName, Symbol>,
    variables: HashMap<String, TypeDescriptor>,
    expressions: HashMap<NodeId, TypeDescriptor>,
}

impl ResolvedModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module-level type definition.
    pub fn with_definition(mut self, name: impl Into<String>, ty: TypeDescriptor) -> Self {
        self.definitions.insert(name.into(), ty);
        self
    }

    /// Register a type visible from another module.
    pub fn with_symbol(mut self, name: QualifiedTypeName, symbol: Symbol) -> Self {
        self.symbols.insert(name, symbol);
        self
    }

    pub fn with_class(self, class: ObjectType) -> Self {
        let name = QualifiedTypeName::new(class.module.clone(), class.name.clone());
        self.with_symbol(name, Symbol::Class(class))
    }

    /// Static type of a variable, by its simple name.
    pub fn with_variable(mut self, name: impl Into<String>, ty: TypeDescriptor) -> Self {
        self.variables.insert(name.into(), ty);
        self
    }

    /// Static type of the expression node carrying `id`.
    pub fn with_expression(mut self, id: NodeId, ty: TypeDescriptor) -> Self {
        self.expressions.insert(id, ty);
        self
    }
}

impl TypeDefinitions for ResolvedModel {
    fn definition(&self, name: &str) -> Option<&TypeDescriptor> {
        self.definitions.get(name)
    }
}

impl SemanticModel for ResolvedModel {
    fn type_by_name(&self, name: &QualifiedTypeName) -> Option<Symbol> {
        self.symbols.get(name).cloned()
    }

    fn type_of(&self, expression: &Expression) -> Option<TypeDescriptor> {
        match expression {
            Expression::Name(NameReference::Simple(name)) => self.variables.get(name).cloned(),
            Expression::RemoteMethodCall(call) => self.expressions.get(&call.id).cloned(),
            // `check` removes the error members of its operand's type.
            Expression::Check(inner) => self.type_of(inner).map(without_errors),
            _ => None,
        }
    }

    fn as_definitions(&self) -> &dyn TypeDefinitions {
        self
    }
}

fn without_errors(ty: TypeDescriptor) -> TypeDescriptor {
    match ty {
        TypeDescriptor::Union(members) => {
            let mut kept: Vec<TypeDescriptor> = members
                .into_iter()
                .filter(|m| !matches!(m, TypeDescriptor::Error))
                .collect();
            if kept.len() == 1 {
                kept.remove(0)
            } else {
                TypeDescriptor::Union(kept)
            }
        }
        other => other,
    }
}
