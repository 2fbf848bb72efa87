//! Prelude module for formgen
//!
//! This module re-exports commonly used structs, traits, and types to allow
//! for easier usage of the library.
//!
//! # Usage
//!
//! ```rust
//! use formgen::prelude::*;
//! ```

// Core exports
pub use crate::config::{GeneratorConfig, GeneratorConfigBuilder};
pub use crate::descriptor::FieldType;
pub use crate::editor::{EditorState, GenerationReport, SaveReport, TemplateEditor, format_text};
pub use crate::naming::{NamingConvention, validate_naming_value};
pub use crate::registry::{TypeTag, ValueKind, is_known};
pub use crate::schema::{SchemaField, SchemaNode, validate_schema};
pub use crate::store::{SaveOutcome, TemplateStore};
pub use crate::template::{PLACEHOLDER_UID, Template};
pub use crate::types::FormgenError;

// Assemblers
#[cfg(feature = "async")]
pub use crate::assembler::{StaticTemplateAssembler, TemplateAssembler};
#[cfg(feature = "http")]
pub use crate::assembler::HttpTemplateAssembler;
