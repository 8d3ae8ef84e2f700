//! Package, module and document graph handed to the pass by the host.

use std::collections::HashMap;

use crate::semantic::{ResolvedModel, SemanticModel};
use crate::syntax::ModulePart;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DocumentKind {
    Source,
    Test,
}

/// Identifies a document within its module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentKey {
    pub kind: DocumentKind,
    pub id: DocumentId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: DocumentId,
    pub name: String,
    pub syntax_tree: ModulePart,
}

impl Document {
    pub fn new(id: u32, name: impl Into<String>, syntax_tree: ModulePart) -> Self {
        Self {
            id: DocumentId(id),
            name: name.into(),
            syntax_tree,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Module {
    pub name: String,
    pub documents: Vec<Document>,
    pub test_documents: Vec<Document>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_document(mut self, document: Document) -> Self {
        self.documents.push(document);
        self
    }

    pub fn with_test_document(mut self, document: Document) -> Self {
        self.test_documents.push(document);
        self
    }

    /// Source documents first, then test documents.
    pub fn all_documents(&self) -> impl Iterator<Item = (DocumentKind, &Document)> {
        self.documents
            .iter()
            .map(|d| (DocumentKind::Source, d))
            .chain(self.test_documents.iter().map(|d| (DocumentKind::Test, d)))
    }

    pub fn document(&self, key: DocumentKey) -> Option<&Document> {
        let docs = match key.kind {
            DocumentKind::Source => &self.documents,
            DocumentKind::Test => &self.test_documents,
        };
        docs.iter().find(|d| d.id == key.id)
    }

    fn document_mut(&mut self, key: DocumentKey) -> Option<&mut Document> {
        let docs = match key.kind {
            DocumentKind::Source => &mut self.documents,
            DocumentKind::Test => &mut self.test_documents,
        };
        docs.iter_mut().find(|d| d.id == key.id)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Package {
    pub modules: Vec<Module>,
}

impl Package {
    pub fn new(modules: Vec<Module>) -> Self {
        Self { modules }
    }

    pub fn module(&self, name: &str) -> Option<&Module> {
        self.modules.iter().find(|m| m.name == name)
    }

    /// A copy of this package with every rewritten document swapped in.
    pub fn apply(&self, modification: &crate::task::PackageModification) -> Package {
        let mut package = self.clone();
        for modified in &modification.documents {
            if let Some(doc) = package
                .modules
                .iter_mut()
                .find(|m| m.name == modified.module)
                .and_then(|m| m.document_mut(modified.key))
            {
                doc.syntax_tree = modified.syntax_tree.clone();
            }
        }
        package
    }
}

/// Compilation results the pass depends on.
pub trait PackageCompilation {
    /// Number of error diagnostics across the package.
    fn error_count(&self) -> usize;

    fn semantic_model(&self, module: &str) -> Option<&dyn SemanticModel>;
}

/// Compilation backed by pre-resolved semantic models.
#[derive(Debug, Clone, Default)]
pub struct ResolvedCompilation {
    errors: usize,
    models: HashMap<String, ResolvedModel>,
}

impl ResolvedCompilation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(mut self, module: impl Into<String>, model: ResolvedModel) -> Self {
        self.models.insert(module.into(), model);
        self
    }

    pub fn with_errors(mut self, errors: usize) -> Self {
        self.errors = errors;
        self
    }
}

impl PackageCompilation for ResolvedCompilation {
    fn error_count(&self) -> usize {
        self.errors
    }

    fn semantic_model(&self, module: &str) -> Option<&dyn SemanticModel> {
        self.models.get(module).map(|m| m as &dyn SemanticModel)
    }
}
