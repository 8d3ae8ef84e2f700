//! Read-only traversal. Override the `visit_*` hooks you care about and call
//! the matching `walk_*` function to keep descending.

use super::*;

pub trait NodeVisitor {
    fn visit_module_part(&mut self, node: &ModulePart) {
        walk_module_part(self, node);
    }

    fn visit_import(&mut self, _node: &ImportDeclaration) {}

    fn visit_member(&mut self, node: &ModuleMember) {
        walk_member(self, node);
    }

    fn visit_type_definition(&mut self, node: &TypeDefinition) {
        walk_type_definition(self, node);
    }

    fn visit_function(&mut self, node: &FunctionDefinition) {
        walk_function(self, node);
    }

    fn visit_module_variable(&mut self, node: &ModuleVariable) {
        walk_module_variable(self, node);
    }

    fn visit_metadata(&mut self, node: &Metadata) {
        walk_metadata(self, node);
    }

    fn visit_annotation(&mut self, node: &Annotation) {
        walk_annotation(self, node);
    }

    fn visit_statement(&mut self, node: &Statement) {
        walk_statement(self, node);
    }

    fn visit_expression(&mut self, node: &Expression) {
        walk_expression(self, node);
    }

    fn visit_remote_method_call(&mut self, node: &RemoteMethodCall) {
        walk_remote_method_call(self, node);
    }
}

pub fn walk_module_part<V: NodeVisitor + ?Sized>(v: &mut V, node: &ModulePart) {
    for import in &node.imports {
        v.visit_import(import);
    }
    for member in &node.members {
        v.visit_member(member);
    }
}

pub fn walk_member<V: NodeVisitor + ?Sized>(v: &mut V, node: &ModuleMember) {
    match node {
        ModuleMember::Type(def) => v.visit_type_definition(def),
        ModuleMember::Function(func) => v.visit_function(func),
        ModuleMember::Variable(var) => v.visit_module_variable(var),
        ModuleMember::Other(_) => {}
    }
}

pub fn walk_type_definition<V: NodeVisitor + ?Sized>(v: &mut V, node: &TypeDefinition) {
    if let Some(metadata) = &node.metadata {
        v.visit_metadata(metadata);
    }
}

pub fn walk_function<V: NodeVisitor + ?Sized>(v: &mut V, node: &FunctionDefinition) {
    if let Some(metadata) = &node.metadata {
        v.visit_metadata(metadata);
    }
    for stmt in &node.body {
        v.visit_statement(stmt);
    }
}

pub fn walk_module_variable<V: NodeVisitor + ?Sized>(v: &mut V, node: &ModuleVariable) {
    if let Some(metadata) = &node.metadata {
        v.visit_metadata(metadata);
    }
    if let Some(init) = &node.initializer {
        v.visit_expression(init);
    }
}

pub fn walk_metadata<V: NodeVisitor + ?Sized>(v: &mut V, node: &Metadata) {
    for annotation in &node.annotations {
        v.visit_annotation(annotation);
    }
}

pub fn walk_annotation<V: NodeVisitor + ?Sized>(v: &mut V, node: &Annotation) {
    if let Some(value) = &node.value {
        v.visit_expression(value);
    }
}

pub fn walk_statement<V: NodeVisitor + ?Sized>(v: &mut V, node: &Statement) {
    match node {
        Statement::Local {
            initializer: Some(expr),
            ..
        }
        | Statement::Expression(expr)
        | Statement::Return(Some(expr)) => v.visit_expression(expr),
        Statement::Local { .. } | Statement::Return(None) | Statement::Other(_) => {}
    }
}

pub fn walk_expression<V: NodeVisitor + ?Sized>(v: &mut V, node: &Expression) {
    match node {
        Expression::RemoteMethodCall(call) => v.visit_remote_method_call(call),
        Expression::Mapping(fields) => {
            for field in fields {
                v.visit_expression(&field.value);
            }
        }
        Expression::List(items) | Expression::FunctionCall { arguments: items, .. } => {
            for item in items {
                v.visit_expression(item);
            }
        }
        Expression::Check(inner) => v.visit_expression(inner),
        Expression::Name(_) | Expression::Literal(_) | Expression::Verbatim(_) => {}
    }
}

pub fn walk_remote_method_call<V: NodeVisitor + ?Sized>(v: &mut V, node: &RemoteMethodCall) {
    v.visit_expression(&node.expression);
    for arg in &node.arguments {
        v.visit_expression(arg);
    }
}
