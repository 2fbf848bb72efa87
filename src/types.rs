use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Every failure the template editor can report.
///
/// All variants are recoverable: the operator corrects the input and
/// resubmits. None of them abort the session.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum FormgenError {
    /// The editor text is not valid JSON.
    #[error("Invalid JSON: {0}")]
    Parse(String),

    /// `schema` is missing or not a JSON object.
    #[error("The \"schema\" field must be a JSON object")]
    SchemaShape,

    /// A schema leaf carries a tag outside the registry.
    #[error("Invalid type \"{tag}\" for field \"{path}\"")]
    SchemaType { path: String, tag: String },

    /// An identity key has an upper-case letter after its first character.
    #[error("Naming convention key \"{key}\" has invalid casing: \"{value}\" (only the first character may be upper-case)")]
    NamingConvention { key: String, value: String },

    /// Valid JSON whose top-level field has the wrong shape.
    #[error("Invalid template field \"{field}\": {reason}")]
    TemplateShape { field: String, reason: String },

    /// The template assembler could not be reached or rejected the request.
    #[error("Failed to generate template: {0}")]
    Network(String),

    /// Two templates in one collection share a uid.
    #[error("A template with uid \"{0}\" already exists")]
    DuplicateUid(String),

    #[error("No template with uid \"{0}\"")]
    UnknownUid(String),

    #[error("Configuration Error: {0}")]
    Configuration(String),

    /// Reading or writing a persisted collection failed.
    #[error("Storage Error: {0}")]
    Storage(String),
}

impl FormgenError {
    /// Shorthand for a schema type failure at `path`.
    pub fn schema_type(path: impl Into<String>, tag: impl Into<String>) -> Self {
        FormgenError::SchemaType {
            path: path.into(),
            tag: tag.into(),
        }
    }

    pub fn template_shape(field: impl Into<String>, reason: impl Into<String>) -> Self {
        FormgenError::TemplateShape {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn naming(key: impl Into<String>, value: impl Into<String>) -> Self {
        FormgenError::NamingConvention {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Returns true for failures caused by the editor content itself, as
    /// opposed to the environment (network, storage, configuration).
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            FormgenError::Parse(_)
                | FormgenError::SchemaShape
                | FormgenError::SchemaType { .. }
                | FormgenError::NamingConvention { .. }
                | FormgenError::TemplateShape { .. }
        )
    }
}

impl From<serde_json::Error> for FormgenError {
    fn from(e: serde_json::Error) -> Self {
        FormgenError::Parse(e.to_string())
    }
}
