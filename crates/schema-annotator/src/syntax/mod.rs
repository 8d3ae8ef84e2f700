//! Syntax tree for a single source document.
//!
//! Only the node kinds the annotation pass reads or rewrites are modelled in
//! detail: imports, type definitions with their metadata, and the expression
//! forms that can contain a remote method call. Everything else is carried
//! verbatim so printing a tree reproduces its source.
//!
//! Trees are values. Rewrites go through [`TreeModifier`], which consumes a
//! node and returns its replacement; the input document is never touched.

mod display;
mod modify;
mod parse;
mod visit;

pub use modify::{
    TreeModifier, modify_expression, modify_function, modify_member, modify_module_part,
    modify_module_variable, modify_statement,
};
pub use parse::{parse_import_declaration, parse_mapping_constructor};
pub use visit::{
    NodeVisitor, walk_annotation, walk_expression, walk_function, walk_member, walk_metadata,
    walk_module_part, walk_module_variable, walk_remote_method_call, walk_statement,
    walk_type_definition,
};

/// Identity of an expression node, assigned by the front end and used by the
/// semantic model to answer `type_of` queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

// ---------------------------------------------------------------------------
// Module part
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ModulePart {
    pub imports: Vec<ImportDeclaration>,
    pub members: Vec<ModuleMember>,
}

impl ModulePart {
    pub fn new(imports: Vec<ImportDeclaration>, members: Vec<ModuleMember>) -> Self {
        Self { imports, members }
    }

    /// Run `modifier` over a copy of this tree and return the result.
    pub fn apply<M: TreeModifier + ?Sized>(&self, modifier: &mut M) -> ModulePart {
        modifier.transform_module_part(self.clone())
    }

    pub fn accept<V: NodeVisitor + ?Sized>(&self, visitor: &mut V) {
        visitor.visit_module_part(self);
    }

    /// Replace the import list, keeping members.
    pub fn with_imports(self, imports: Vec<ImportDeclaration>) -> Self {
        Self {
            imports,
            members: self.members,
        }
    }

    pub fn type_definitions(&self) -> impl Iterator<Item = &TypeDefinition> {
        self.members.iter().filter_map(|m| match m {
            ModuleMember::Type(def) => Some(def),
            _ => None,
        })
    }

    pub fn type_definition(&self, name: &str) -> Option<&TypeDefinition> {
        self.type_definitions().find(|def| def.name == name)
    }

    /// Render the document text.
    pub fn to_source(&self) -> String {
        self.to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDeclaration {
    pub org: Option<String>,
    /// Dotted module name split into components: `ai.ollama` → `["ai", "ollama"]`.
    pub module_name: Vec<String>,
    pub prefix: Option<String>,
}

impl ImportDeclaration {
    pub fn new(org: impl Into<String>, module: &str) -> Self {
        Self {
            org: Some(org.into()),
            module_name: module.split('.').map(str::to_string).collect(),
            prefix: None,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn module(&self) -> String {
        self.module_name.join(".")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModuleMember {
    Type(TypeDefinition),
    Function(FunctionDefinition),
    Variable(ModuleVariable),
    /// Any other declaration, kept as source text.
    Other(String),
}

// ---------------------------------------------------------------------------
// Metadata and annotations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Metadata {
    /// Documentation lines without the leading `# `.
    pub documentation: Vec<String>,
    pub annotations: Vec<Annotation>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub reference: NameReference,
    pub value: Option<Expression>,
}

impl Annotation {
    pub fn new(reference: NameReference, value: Option<Expression>) -> Self {
        Self { reference, value }
    }

    /// `true` for `@prefix:identifier`, with or without a value.
    pub fn is_qualified(&self, prefix: &str, identifier: &str) -> bool {
        matches!(
            &self.reference,
            NameReference::Qualified { prefix: p, identifier: i } if p == prefix && i == identifier
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameReference {
    Simple(String),
    Qualified { prefix: String, identifier: String },
}

impl NameReference {
    pub fn simple(name: impl Into<String>) -> Self {
        Self::Simple(name.into())
    }

    pub fn qualified(prefix: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self::Qualified {
            prefix: prefix.into(),
            identifier: identifier.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Declarations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct TypeDefinition {
    pub metadata: Option<Metadata>,
    pub public: bool,
    pub name: String,
    /// Type descriptor source, e.g. `record {| string city; |}`.
    pub descriptor: String,
}

impl TypeDefinition {
    pub fn new(name: impl Into<String>, descriptor: impl Into<String>) -> Self {
        Self {
            metadata: None,
            public: false,
            name: name.into(),
            descriptor: descriptor.into(),
        }
    }

    pub fn annotations(&self) -> &[Annotation] {
        self.metadata
            .as_ref()
            .map(|m| m.annotations.as_slice())
            .unwrap_or_default()
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub type_desc: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDefinition {
    pub metadata: Option<Metadata>,
    pub public: bool,
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<String>,
    pub body: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModuleVariable {
    pub metadata: Option<Metadata>,
    pub public: bool,
    pub is_final: bool,
    pub type_desc: String,
    pub name: String,
    pub initializer: Option<Expression>,
}

// ---------------------------------------------------------------------------
// Statements and expressions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Local {
        type_desc: String,
        name: String,
        initializer: Option<Expression>,
    },
    Expression(Expression),
    Return(Option<Expression>),
    Other(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    /// Numeric literal text as written.
    Number(String),
    Boolean(bool),
    /// `()`
    Nil,
    /// `null`
    Null,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MappingField {
    pub key: String,
    pub value: Expression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RemoteMethodCall {
    pub id: NodeId,
    pub expression: Expression,
    pub method_name: String,
    pub arguments: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Name(NameReference),
    Literal(Literal),
    Mapping(Vec<MappingField>),
    List(Vec<Expression>),
    /// `receiver->method(args)`
    RemoteMethodCall(Box<RemoteMethodCall>),
    FunctionCall {
        name: NameReference,
        arguments: Vec<Expression>,
    },
    Check(Box<Expression>),
    Verbatim(String),
}

impl Expression {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(NameReference::simple(name))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::Literal(Literal::String(value.into()))
    }

    pub fn remote_call(
        id: NodeId,
        receiver: Expression,
        method_name: impl Into<String>,
        arguments: Vec<Expression>,
    ) -> Self {
        Self::RemoteMethodCall(Box::new(RemoteMethodCall {
            id,
            expression: receiver,
            method_name: method_name.into(),
            arguments,
        }))
    }

    pub fn check(inner: Expression) -> Self {
        Self::Check(Box::new(inner))
    }
}
