//! Serialization errors.
//!
//! Every read error carries the dotted path of the offending node, e.g.
//! `missions[1].flights[0].altitude`. None of them are recovered locally.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("Missing field: {path}")]
    MissingField { path: String },

    #[error("Type mismatch at {path}: expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Invalid value at {path}: {reason}")]
    InvalidValue { path: String, reason: String },

    #[error("Missing type discriminator at {path} for {target}")]
    MissingDiscriminator { path: String, target: &'static str },

    #[error("Unknown type '{discriminator}' at {path}: not {target} or a registered subtype")]
    UnknownType {
        path: String,
        discriminator: String,
        target: &'static str,
    },

    #[error("Failed to construct {type_name} at {path}: {source}")]
    Construction {
        type_name: String,
        path: String,
        source: Box<CodecError>,
    },

    #[error("Malformed document: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CodecError>;

impl CodecError {
    pub(crate) fn mismatch(path: impl Into<String>, expected: &'static str, found: &Value) -> Self {
        CodecError::TypeMismatch {
            path: path.into(),
            expected,
            found: kind_of(found),
        }
    }

    pub(crate) fn invalid(path: impl Into<String>, reason: impl Into<String>) -> Self {
        CodecError::InvalidValue {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// The innermost error, below any construction wrappers.
    pub fn root_cause(&self) -> &CodecError {
        match self {
            CodecError::Construction { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

fn kind_of(node: &Value) -> &'static str {
    match node {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
