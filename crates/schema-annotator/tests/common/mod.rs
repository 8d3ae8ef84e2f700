#![allow(dead_code)]

use schema_annotator::project::ResolvedCompilation;
use schema_annotator::semantic::ResolvedModel;
use schema_annotator::syntax::{
    Expression, FunctionDefinition, ImportDeclaration, ModuleMember, ModulePart, ModuleVariable,
    NodeId, Statement, TypeDefinition, parse_import_declaration,
};
use schema_annotator::types::{ModuleId, ObjectType, ScalarKind, TypeDescriptor};
use schema_annotator::{
    Document, Module, ModifierConfig, OpenApiTypeMapper, Package, PackageModification,
    SchemaAnnotationTask,
};

pub const MODULE: &str = "weather";

pub fn provider_class() -> ObjectType {
    ObjectType::new(ModuleId::new("ballerinax", "ai.ollama", "1"), "ModelProvider")
}

pub fn import(text: &str) -> ImportDeclaration {
    parse_import_declaration(text).unwrap()
}

/// `final ollama:ModelProvider provider = check new (...);`
pub fn provider_variable() -> ModuleMember {
    ModuleMember::Variable(ModuleVariable {
        metadata: None,
        public: false,
        is_final: true,
        type_desc: "ollama:ModelProvider".into(),
        name: "provider".into(),
        initializer: Some(Expression::Verbatim(
            r#"check new ("http://localhost:11434")"#.into(),
        )),
    })
}

/// `<binding> <var> = check provider->generate(`<prompt>`);`
pub fn generate_statement(id: u32, binding: &str, var: &str, prompt: &str) -> Statement {
    Statement::Local {
        type_desc: binding.into(),
        name: var.into(),
        initializer: Some(Expression::check(Expression::remote_call(
            NodeId(id),
            Expression::name("provider"),
            "generate",
            vec![Expression::Verbatim(format!("`{prompt}`"))],
        ))),
    }
}

pub fn main_function(body: Vec<Statement>) -> ModuleMember {
    ModuleMember::Function(FunctionDefinition {
        metadata: None,
        public: true,
        name: "main".into(),
        parameters: vec![],
        return_type: Some("error?".into()),
        body,
    })
}

pub fn type_member(name: &str, descriptor: &str) -> ModuleMember {
    ModuleMember::Type(TypeDefinition::new(name, descriptor))
}

/// Model with the provider visible and `provider` bound to it.
pub fn base_model() -> ResolvedModel {
    ResolvedModel::new()
        .with_class(provider_class())
        .with_variable("provider", TypeDescriptor::Object(provider_class()))
}

pub fn address_type() -> TypeDescriptor {
    TypeDescriptor::closed_record([("city", ScalarKind::String.into())])
}

/// Static type of `provider->generate(...)` when the binding is `ty`.
pub fn generate_result(ty: TypeDescriptor) -> TypeDescriptor {
    TypeDescriptor::Union(vec![ty, TypeDescriptor::Error])
}

/// One module, one document: the `Address` walkthrough with the given
/// imports after `ballerinax/ai.ollama`.
pub fn address_package(extra_imports: &[&str]) -> Package {
    let mut imports = vec![import("import ballerinax/ai.ollama;")];
    imports.extend(extra_imports.iter().map(|text| import(text)));
    let tree = ModulePart::new(
        imports,
        vec![
            type_member("Address", "record {| string city; |}"),
            provider_variable(),
            main_function(vec![generate_statement(
                1,
                "Address",
                "a",
                "Where is the Eiffel tower?",
            )]),
        ],
    );
    Package::new(vec![
        Module::new(MODULE).with_document(Document::new(0, "main.bal", tree)),
    ])
}

pub fn address_compilation() -> ResolvedCompilation {
    let model = base_model()
        .with_definition("Address", address_type())
        .with_expression(NodeId(1), generate_result(TypeDescriptor::named("Address")));
    ResolvedCompilation::new().with_model(MODULE, model)
}

pub fn run(package: &Package, compilation: &ResolvedCompilation) -> PackageModification {
    SchemaAnnotationTask::new(&OpenApiTypeMapper, ModifierConfig::default())
        .modify(package, compilation)
}

/// Text of the first source document of `MODULE` after applying `modification`.
pub fn main_text(package: &Package, modification: &PackageModification) -> String {
    package.apply(modification).modules[0].documents[0]
        .syntax_tree
        .to_source()
}
