//! Owned tree transformation.
//!
//! Each `transform_*` hook takes a node by value and returns the node that
//! replaces it. The defaults rebuild the node from transformed children, so an
//! implementation only overrides the kinds it rewrites.

use super::*;

pub trait TreeModifier {
    fn transform_module_part(&mut self, node: ModulePart) -> ModulePart {
        modify_module_part(self, node)
    }

    fn transform_import(&mut self, node: ImportDeclaration) -> ImportDeclaration {
        node
    }

    fn transform_member(&mut self, node: ModuleMember) -> ModuleMember {
        modify_member(self, node)
    }

    fn transform_type_definition(&mut self, node: TypeDefinition) -> TypeDefinition {
        node
    }

    fn transform_function(&mut self, node: FunctionDefinition) -> FunctionDefinition {
        modify_function(self, node)
    }

    fn transform_module_variable(&mut self, node: ModuleVariable) -> ModuleVariable {
        modify_module_variable(self, node)
    }

    fn transform_statement(&mut self, node: Statement) -> Statement {
        modify_statement(self, node)
    }

    fn transform_expression(&mut self, node: Expression) -> Expression {
        modify_expression(self, node)
    }
}

pub fn modify_module_part<M: TreeModifier + ?Sized>(m: &mut M, node: ModulePart) -> ModulePart {
    ModulePart {
        imports: node
            .imports
            .into_iter()
            .map(|i| m.transform_import(i))
            .collect(),
        members: node
            .members
            .into_iter()
            .map(|member| m.transform_member(member))
            .collect(),
    }
}

pub fn modify_member<M: TreeModifier + ?Sized>(m: &mut M, node: ModuleMember) -> ModuleMember {
    match node {
        ModuleMember::Type(def) => ModuleMember::Type(m.transform_type_definition(def)),
        ModuleMember::Function(func) => ModuleMember::Function(m.transform_function(func)),
        ModuleMember::Variable(var) => ModuleMember::Variable(m.transform_module_variable(var)),
        other @ ModuleMember::Other(_) => other,
    }
}

pub fn modify_function<M: TreeModifier + ?Sized>(
    m: &mut M,
    node: FunctionDefinition,
) -> FunctionDefinition {
    FunctionDefinition {
        body: node
            .body
            .into_iter()
            .map(|s| m.transform_statement(s))
            .collect(),
        ..node
    }
}

pub fn modify_module_variable<M: TreeModifier + ?Sized>(
    m: &mut M,
    node: ModuleVariable,
) -> ModuleVariable {
    ModuleVariable {
        initializer: node.initializer.map(|e| m.transform_expression(e)),
        ..node
    }
}

pub fn modify_statement<M: TreeModifier + ?Sized>(m: &mut M, node: Statement) -> Statement {
    match node {
        Statement::Local {
            type_desc,
            name,
            initializer,
        } => Statement::Local {
            type_desc,
            name,
            initializer: initializer.map(|e| m.transform_expression(e)),
        },
        Statement::Expression(expr) => Statement::Expression(m.transform_expression(expr)),
        Statement::Return(expr) => Statement::Return(expr.map(|e| m.transform_expression(e))),
        other @ Statement::Other(_) => other,
    }
}

pub fn modify_expression<M: TreeModifier + ?Sized>(m: &mut M, node: Expression) -> Expression {
    match node {
        Expression::RemoteMethodCall(call) => {
            let RemoteMethodCall {
                id,
                expression,
                method_name,
                arguments,
            } = *call;
            Expression::RemoteMethodCall(Box::new(RemoteMethodCall {
                id,
                expression: m.transform_expression(expression),
                method_name,
                arguments: arguments
                    .into_iter()
                    .map(|a| m.transform_expression(a))
                    .collect(),
            }))
        }
        Expression::Mapping(fields) => Expression::Mapping(
            fields
                .into_iter()
                .map(|f| MappingField {
                    key: f.key,
                    value: m.transform_expression(f.value),
                })
                .collect(),
        ),
        Expression::List(items) => {
            Expression::List(items.into_iter().map(|e| m.transform_expression(e)).collect())
        }
        Expression::FunctionCall { name, arguments } => Expression::FunctionCall {
            name,
            arguments: arguments
                .into_iter()
                .map(|a| m.transform_expression(a))
                .collect(),
        },
        Expression::Check(inner) => Expression::Check(Box::new(m.transform_expression(*inner))),
        leaf @ (Expression::Name(_) | Expression::Literal(_) | Expression::Verbatim(_)) => leaf,
    }
}
