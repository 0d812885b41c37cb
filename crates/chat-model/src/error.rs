//! # Model Errors
//!
//! This module defines the common error types used throughout the object-model
//! toolkit. By centralizing error definitions, we ensure consistent error
//! handling across schemas, references, directories, and caches.

/// Errors that can occur within the object-model toolkit itself.
///
/// Argument-binding failures name the entity type and every offending
/// argument, so a caller handed a bad payload sees the full problem at once
/// rather than one name per attempt.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("{entity}: unexpected arguments {}", quoted(.names))]
    UnexpectedArguments {
        entity: &'static str,
        /// Sorted, deduplicated names of the arguments no attribute matches.
        names: Vec<String>,
    },
    #[error("{entity}: argument '{name}' bound more than once")]
    DuplicateArgument { entity: &'static str, name: String },
    #[error("{entity}: takes at most {max} positional arguments, got {given}")]
    TooManyPositional {
        entity: &'static str,
        max: usize,
        given: usize,
    },
    #[error("{entity}: duplicate attribute '{name}'")]
    DuplicateAttribute { entity: &'static str, name: String },
    #[error("{entity}: no attribute '{name}'")]
    UnknownAttribute { entity: &'static str, name: String },
    #[error("Field '{field}' does not hold {expected}")]
    FieldShape {
        field: String,
        expected: &'static str,
    },
    #[error("Duplicate accessor '{0}'")]
    DuplicateAccessor(String),
    #[error("No accessor '{0}'")]
    UnknownAccessor(String),
    #[error("Accessor '{accessor}' is {actual}, not {requested}")]
    KindMismatch {
        accessor: String,
        requested: &'static str,
        actual: &'static str,
    },
    #[error("{directory}: no entry for '{id}'")]
    LookupMiss { directory: String, id: String },
    #[error("Directory error: {0}")]
    Upstream(Box<dyn std::error::Error + Send + Sync>),
    #[error("Unknown status '{0}'")]
    UnknownStatus(String),
}

fn quoted(names: &[String]) -> String {
    names
        .iter()
        .map(|name| format!("'{name}'"))
        .collect::<Vec<_>>()
        .join(", ")
}
