use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnnotateError {
    #[error("schema mapping failed for type '{name}': {source}")]
    Mapper {
        name: String,
        #[source]
        source: MapperError,
    },

    #[error("type closure of '{0}' exceeds the maximum walk depth")]
    DepthExceeded(String),

    #[error("schema text is not a mapping constructor: {0}")]
    InvalidLiteral(String),

    #[error("invalid import declaration: {0}")]
    InvalidImport(String),

    #[error("failed to serialize schema: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Failure reported by a [`crate::mapper::TypeMapper`].
#[derive(Debug, Error)]
pub enum MapperError {
    #[error("no definition found for '{0}'")]
    UnknownType(String),

    #[error("unsupported type: {0}")]
    Unsupported(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, AnnotateError>;
