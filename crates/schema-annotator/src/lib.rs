pub mod closure;
pub mod config;
pub mod error;
pub mod imports;
pub mod inject;
pub mod logging;
pub mod mapper;
pub mod normalize;
pub mod project;
pub mod scanner;
pub mod semantic;
pub mod syntax;
pub mod table;
pub mod task;
pub mod types;

pub use crate::config::{MapperErrorPolicy, ModifierConfig};
pub use crate::error::{AnnotateError, MapperError, Result};
pub use crate::logging::init_tracing;
pub use crate::mapper::{OpenApiTypeMapper, TypeMapper};
pub use crate::project::{Document, DocumentKey, DocumentKind, Module, Package, PackageCompilation};
pub use crate::table::SchemaTable;
pub use crate::task::{
    ModifiedDocument, ModuleReport, PackageModification, SchemaAnnotationTask, SkipReason,
};

pub const GENERATE_METHOD_NAME: &str = "generate";
pub const SCHEMA_ANNOTATION_IDENTIFIER: &str = "JsonSchema";

pub const AI_MODULE_NAME: &str = "ai";
pub const BALLERINA_ORG_NAME: &str = "ballerina";

pub const OLLAMA_MODEL_PROVIDER_NAME: &str = "ModelProvider";
pub const OLLAMA_MODEL_PROVIDER_MODULE_NAME: &str = "ai.ollama";
pub const OLLAMA_MODEL_PROVIDER_MODULE_ORG: &str = "ballerinax";
pub const OLLAMA_MODEL_PROVIDER_MODULE_VERSION: &str = "1";

/// High-level API: annotate every type a `generate` call can produce.
///
/// `package`: the package's modules and parsed documents
/// `compilation`: diagnostics and per-module semantic models for `package`
///
/// Uses the default mapper and reads configuration from the environment.
/// The input package is not changed; apply the result with
/// [`Package::apply`] to get the rewritten package.
pub fn annotate_package(
    package: &Package,
    compilation: &dyn PackageCompilation,
) -> Result<PackageModification> {
    let config = ModifierConfig::from_env()?;
    let task = SchemaAnnotationTask::new(&OpenApiTypeMapper, config);
    Ok(task.modify(package, compilation))
}
