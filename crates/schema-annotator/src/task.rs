//! The two-phase modification task.
//!
//! Phase 1 scans every source and test document of a module for qualifying
//! `generate` calls and fills the module's schema table. Phase 2 starts only
//! once that table is final and rewrites every document against it, since a
//! type can be declared in a different document than the call that needs it.

use std::fmt;

use crate::closure::ClosureWalker;
use crate::config::ModifierConfig;
use crate::error::Result;
use crate::imports::{AiImport, ensure_ai_import, resolve_ai_import};
use crate::inject::TypeDefinitionModifier;
use crate::mapper::TypeMapper;
use crate::project::{Document, DocumentKey, DocumentKind, Module, Package, PackageCompilation};
use crate::scanner::{GenerateCallScanner, resolve_provider};
use crate::semantic::SemanticModel;
use crate::syntax::ModulePart;
use crate::table::{ModifierData, SchemaTable};
use crate::types::TypeDescriptor;

/// Why a package or module was left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    CompilationErrors(usize),
    NoSemanticModel,
    ProviderUnresolved,
    AnalysisFailed(String),
    RewriteFailed(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CompilationErrors(n) => write!(f, "package has {n} compilation error(s)"),
            Self::NoSemanticModel => f.write_str("no semantic model for module"),
            Self::ProviderUnresolved => f.write_str("model provider type is not visible"),
            Self::AnalysisFailed(e) => write!(f, "schema analysis failed: {e}"),
            Self::RewriteFailed(e) => write!(f, "rewrite failed: {e}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModifiedDocument {
    pub module: String,
    pub key: DocumentKey,
    pub syntax_tree: ModulePart,
    pub changed: bool,
}

impl ModifiedDocument {
    pub fn text(&self) -> String {
        self.syntax_tree.to_source()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModuleReport {
    pub module: String,
    pub schemas: SchemaTable,
    pub skipped: Option<SkipReason>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PackageModification {
    /// Set when the whole package was skipped.
    pub skipped: Option<SkipReason>,
    pub modules: Vec<ModuleReport>,
    pub documents: Vec<ModifiedDocument>,
}

impl PackageModification {
    pub fn skipped(reason: SkipReason) -> Self {
        Self {
            skipped: Some(reason),
            ..Self::default()
        }
    }

    pub fn module(&self, name: &str) -> Option<&ModuleReport> {
        self.modules.iter().find(|m| m.module == name)
    }

    pub fn document(&self, module: &str, key: DocumentKey) -> Option<&ModifiedDocument> {
        self.documents
            .iter()
            .find(|d| d.module == module && d.key == key)
    }

    pub fn changed_documents(&self) -> impl Iterator<Item = &ModifiedDocument> {
        self.documents.iter().filter(|d| d.changed)
    }
}

pub struct SchemaAnnotationTask<'m> {
    mapper: &'m dyn TypeMapper,
    config: ModifierConfig,
}

impl<'m> SchemaAnnotationTask<'m> {
    pub fn new(mapper: &'m dyn TypeMapper, config: ModifierConfig) -> Self {
        Self { mapper, config }
    }

    pub fn modify(
        &self,
        package: &Package,
        compilation: &dyn PackageCompilation,
    ) -> PackageModification {
        let errors = compilation.error_count();
        if errors > 0 {
            tracing::debug!(errors, "Compilation has errors, skipping schema annotation");
            return PackageModification::skipped(SkipReason::CompilationErrors(errors));
        }

        let mut modification = PackageModification::default();
        for module in &package.modules {
            let (report, documents) = match compilation.semantic_model(&module.name) {
                Some(model) => self.modify_module(module, model),
                None => (
                    ModuleReport {
                        module: module.name.clone(),
                        schemas: SchemaTable::new(),
                        skipped: Some(SkipReason::NoSemanticModel),
                    },
                    Vec::new(),
                ),
            };
            if let Some(reason) = &report.skipped {
                tracing::debug!(module = %module.name, %reason, "Module left untouched");
            }
            modification.modules.push(report);
            modification.documents.extend(documents);
        }
        modification
    }

    fn modify_module(
        &self,
        module: &Module,
        model: &dyn SemanticModel,
    ) -> (ModuleReport, Vec<ModifiedDocument>) {
        let mut report = ModuleReport {
            module: module.name.clone(),
            schemas: SchemaTable::new(),
            skipped: None,
        };

        let Some(provider) = resolve_provider(model) else {
            report.skipped = Some(SkipReason::ProviderUnresolved);
            return (report, Vec::new());
        };

        let mut data = ModifierData::default();

        if let Err(e) = self.analyze_module(module, model, &provider, &mut data.type_schemas) {
            tracing::warn!(module = %module.name, error = %e, "Schema analysis failed");
            report.skipped = Some(SkipReason::AnalysisFailed(e.to_string()));
            return (report, Vec::new());
        }
        tracing::debug!(module = %module.name, schemas = data.type_schemas.len(), "Analysis complete");

        let documents = module
            .all_documents()
            .map(|(kind, doc)| modify_document(&module.name, kind, doc, &mut data))
            .collect::<Result<Vec<_>>>();

        report.schemas = data.type_schemas;
        match documents {
            Ok(documents) => (report, documents),
            Err(e) => {
                tracing::warn!(module = %module.name, error = %e, "Rewrite failed");
                report.skipped = Some(SkipReason::RewriteFailed(e.to_string()));
                (report, Vec::new())
            }
        }
    }

    fn analyze_module(
        &self,
        module: &Module,
        model: &dyn SemanticModel,
        provider: &TypeDescriptor,
        table: &mut SchemaTable,
    ) -> Result<()> {
        let mut walker = ClosureWalker::new(model, self.mapper, &self.config);
        for (_, doc) in module.all_documents() {
            let result_types = GenerateCallScanner::new(model, provider).scan(&doc.syntax_tree);
            for ty in &result_types {
                walker.populate(ty, table)?;
            }
        }
        Ok(())
    }
}

fn modify_document(
    module: &str,
    kind: DocumentKind,
    document: &Document,
    data: &mut ModifierData,
) -> Result<ModifiedDocument> {
    let key = DocumentKey {
        kind,
        id: document.id,
    };
    let root = &document.syntax_tree;
    let ai_import = resolve_ai_import(&root.imports);

    let final_root = match ai_import.annotation_prefix() {
        Some(prefix) => {
            let mut modifier = TypeDefinitionModifier::new(&data.type_schemas, prefix);
            let modified = root.apply(&mut modifier);
            if modifier.inserted() > 0 {
                data.ai_import_required.insert(key);
            }
            modified
        }
        None => {
            if root
                .type_definitions()
                .any(|def| data.type_schemas.contains(&def.name))
            {
                tracing::warn!(
                    document = %document.name,
                    "ballerina/ai is imported as '_'; schema annotations cannot be added"
                );
            }
            root.clone()
        }
    };

    let required = data.ai_import_required.contains(&key);
    let final_root = ensure_ai_import(final_root, required, &ai_import)?;
    if required && ai_import == AiImport::Absent {
        tracing::debug!(document = %document.name, "Added ballerina/ai import");
    }

    Ok(ModifiedDocument {
        module: module.to_string(),
        key,
        changed: final_root != *root,
        syntax_tree: final_root,
    })
}
