pub mod config;
pub mod descriptor;
pub mod editor;
pub mod naming;
pub mod prelude;
pub mod registry;
pub mod schema;
pub mod store;
pub mod template;
pub mod types;

#[cfg(feature = "async")]
pub mod assembler;

pub use config::GeneratorConfig;
pub use editor::{EditorState, TemplateEditor};
pub use schema::SchemaNode;
pub use template::Template;
pub use types::FormgenError;
