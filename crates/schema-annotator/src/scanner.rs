//! Finds `provider->generate(...)` calls and collects their result types.

use crate::semantic::{QualifiedTypeName, SemanticModel, Symbol};
use crate::syntax::{Expression, ModulePart, NodeVisitor, walk_expression};
use crate::types::{ModuleId, TypeDescriptor};
use crate::{
    GENERATE_METHOD_NAME, OLLAMA_MODEL_PROVIDER_MODULE_NAME, OLLAMA_MODEL_PROVIDER_MODULE_ORG,
    OLLAMA_MODEL_PROVIDER_MODULE_VERSION, OLLAMA_MODEL_PROVIDER_NAME,
};

pub fn provider_type_name() -> QualifiedTypeName {
    QualifiedTypeName::new(
        ModuleId::new(
            OLLAMA_MODEL_PROVIDER_MODULE_ORG,
            OLLAMA_MODEL_PROVIDER_MODULE_NAME,
            OLLAMA_MODEL_PROVIDER_MODULE_VERSION,
        ),
        OLLAMA_MODEL_PROVIDER_NAME,
    )
}

/// The provider class as seen from this module, if the module can see it.
pub fn resolve_provider(model: &dyn SemanticModel) -> Option<TypeDescriptor> {
    match model.type_by_name(&provider_type_name())? {
        Symbol::Class(class) => Some(TypeDescriptor::Object(class)),
        Symbol::Type(_) => None,
    }
}

pub struct GenerateCallScanner<'a> {
    model: &'a dyn SemanticModel,
    provider: &'a TypeDescriptor,
    result_types: Vec<TypeDescriptor>,
}

impl<'a> GenerateCallScanner<'a> {
    pub fn new(model: &'a dyn SemanticModel, provider: &'a TypeDescriptor) -> Self {
        Self {
            model,
            provider,
            result_types: Vec::new(),
        }
    }

    /// Result types of qualifying calls in `root`, in source order.
    pub fn scan(mut self, root: &ModulePart) -> Vec<TypeDescriptor> {
        root.accept(&mut self);
        self.result_types
    }

    fn is_provider_call(&self, receiver: &Expression) -> bool {
        self.model
            .type_of(receiver)
            .is_some_and(|ty| self.model.is_subtype(&ty, self.provider))
    }
}

impl NodeVisitor for GenerateCallScanner<'_> {
    fn visit_expression(&mut self, node: &Expression) {
        if let Expression::RemoteMethodCall(call) = node
            && call.method_name == GENERATE_METHOD_NAME
            && self.is_provider_call(&call.expression)
        {
            match self.model.type_of(node) {
                Some(result) => {
                    tracing::trace!(call = %call, "Found generate call");
                    self.result_types.push(result);
                }
                None => tracing::debug!(call = %call, "Generate call has no resolved type"),
            }
        }
        walk_expression(self, node);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::ResolvedModel;
    use crate::syntax::{FunctionDefinition, ModuleMember, NodeId, Statement};
    use crate::types::{ObjectType, ScalarKind};

    fn provider() -> ObjectType {
        ObjectType::new(
            ModuleId::new("ballerinax", "ai.ollama", "1"),
            "ModelProvider",
        )
    }

    fn function(body: Vec<Statement>) -> ModulePart {
        ModulePart::new(
            vec![],
            vec![ModuleMember::Function(FunctionDefinition {
                metadata: None,
                public: false,
                name: "run".into(),
                parameters: vec![],
                return_type: None,
                body,
            })],
        )
    }

    fn call(id: u32, receiver: &str, method: &str, args: Vec<Expression>) -> Expression {
        Expression::remote_call(NodeId(id), Expression::name(receiver), method, args)
    }

    #[test]
    fn test_resolve_provider_requires_class() {
        let model = ResolvedModel::new();
        assert!(resolve_provider(&model).is_none());

        let typed = ResolvedModel::new().with_symbol(
            provider_type_name(),
            Symbol::Type(ScalarKind::String.into()),
        );
        assert!(resolve_provider(&typed).is_none());

        let model = ResolvedModel::new().with_class(provider());
        assert_eq!(resolve_provider(&model), Some(TypeDescriptor::Object(provider())));
    }

    #[test]
    fn test_collects_only_provider_generate_calls() {
        let other = ObjectType::new(ModuleId::new("acme", "llm", "1"), "Client");
        let model = ResolvedModel::new()
            .with_class(provider())
            .with_variable("provider", TypeDescriptor::Object(provider()))
            .with_variable("client", TypeDescriptor::Object(other))
            .with_expression(NodeId(1), TypeDescriptor::named("A"))
            .with_expression(NodeId(2), TypeDescriptor::named("B"))
            .with_expression(NodeId(3), TypeDescriptor::named("C"))
            .with_expression(NodeId(4), TypeDescriptor::named("D"));
        let provider_ty = resolve_provider(&model).unwrap();

        let root = function(vec![
            Statement::Local {
                type_desc: "A".into(),
                name: "a".into(),
                initializer: Some(Expression::check(call(1, "provider", "generate", vec![]))),
            },
            Statement::Expression(call(2, "client", "generate", vec![])),
            Statement::Expression(call(3, "provider", "chat", vec![])),
            Statement::Return(Some(Expression::check(call(4, "provider", "generate", vec![])))),
        ]);

        let found = GenerateCallScanner::new(&model, &provider_ty).scan(&root);
        assert_eq!(found, vec![TypeDescriptor::named("A"), TypeDescriptor::named("D")]);
    }

    #[test]
    fn test_nested_calls_are_visited() {
        let model = ResolvedModel::new()
            .with_class(provider())
            .with_variable("provider", TypeDescriptor::Object(provider()))
            .with_expression(NodeId(1), TypeDescriptor::named("Outer"))
            .with_expression(NodeId(2), TypeDescriptor::named("Inner"));
        let provider_ty = resolve_provider(&model).unwrap();

        // provider->chat(check provider->generate(provider->generate(q)))
        let inner = call(2, "provider", "generate", vec![Expression::name("q")]);
        let outer = call(1, "provider", "generate", vec![inner]);
        let root = function(vec![Statement::Expression(call(
            9,
            "provider",
            "chat",
            vec![Expression::check(outer)],
        ))]);

        let found = GenerateCallScanner::new(&model, &provider_ty).scan(&root);
        assert_eq!(found, vec![TypeDescriptor::named("Outer"), TypeDescriptor::named("Inner")]);
    }

    #[test]
    fn test_subtype_receiver_matches() {
        let base = provider();
        let custom = ObjectType::new(ModuleId::new("acme", "app", "0"), "TracedProvider")
            .including(base.clone());
        let model = ResolvedModel::new()
            .with_class(base)
            .with_variable("traced", TypeDescriptor::Object(custom))
            .with_expression(NodeId(5), TypeDescriptor::named("R"));
        let provider_ty = resolve_provider(&model).unwrap();

        let root = function(vec![Statement::Expression(call(5, "traced", "generate", vec![]))]);
        let found = GenerateCallScanner::new(&model, &provider_ty).scan(&root);
        assert_eq!(found, vec![TypeDescriptor::named("R")]);
    }
}
