//! Resolution and insertion of the `ballerina/ai` import.

use crate::error::Result;
use crate::syntax::{ImportDeclaration, ModulePart, parse_import_declaration};
use crate::{AI_MODULE_NAME, BALLERINA_ORG_NAME};

const DISCARD_PREFIX: &str = "_";

/// How the `ai` module is visible in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AiImport {
    /// Imported; annotations are qualified with this prefix.
    Imported(String),
    /// Imported as `_`: no identifier refers to the module.
    Suppressed,
    /// Not imported.
    Absent,
}

impl AiImport {
    /// Prefix used to recognize and build annotations, `None` when no prefix
    /// can refer to the module.
    pub fn annotation_prefix(&self) -> Option<&str> {
        match self {
            Self::Imported(prefix) => Some(prefix),
            Self::Absent => Some(AI_MODULE_NAME),
            Self::Suppressed => None,
        }
    }
}

fn is_ai_import(import: &ImportDeclaration) -> bool {
    import.org.as_deref() == Some(BALLERINA_ORG_NAME)
        && import.module_name.len() == 1
        && import.module_name[0] == AI_MODULE_NAME
}

pub fn resolve_ai_import(imports: &[ImportDeclaration]) -> AiImport {
    let Some(import) = imports.iter().find(|i| is_ai_import(i)) else {
        return AiImport::Absent;
    };
    match import.prefix.as_deref() {
        Some(DISCARD_PREFIX) => AiImport::Suppressed,
        Some(prefix) => AiImport::Imported(prefix.to_string()),
        None => AiImport::Imported(AI_MODULE_NAME.to_string()),
    }
}

pub fn ai_import_declaration() -> Result<ImportDeclaration> {
    parse_import_declaration(&format!("import {BALLERINA_ORG_NAME}/{AI_MODULE_NAME};"))
}

/// Append the default `ai` import when the document needs one and has none.
pub fn ensure_ai_import(root: ModulePart, required: bool, current: &AiImport) -> Result<ModulePart> {
    if !required || *current != AiImport::Absent {
        return Ok(root);
    }
    let mut imports = root.imports.clone();
    imports.push(ai_import_declaration()?);
    Ok(root.with_imports(imports))
}
