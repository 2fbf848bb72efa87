//! # Template Editor
//!
//! Orchestrates the three editor actions over raw JSON text:
//!
//! - **Format**: validate, then replace the text with its 2-space pretty form.
//! - **Save**: validate, assign a uid if needed, then update or append in the
//!   template collection.
//! - **Generate**: Format, then hand the formatted template to a
//!   [`TemplateAssembler`](crate::assembler::TemplateAssembler).
//!
//! A failed action leaves both the text and the collection untouched; the
//! operator corrects the text and tries again.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::GeneratorConfig;
use crate::naming::{PLURAL_LOWERCASE, validate_naming_value};
use crate::schema::validate_schema;
use crate::store::{SaveOutcome, TemplateStore};
use crate::template::{Template, check_fields};
use crate::types::FormgenError;

/// Where the editor is in its current action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum EditorState {
    #[default]
    Idle,
    Parsing,
    ValidationFailed,
    Validated,
    Persisted,
    GenerationRequested,
    GenerationSucceeded,
    GenerationFailed,
}

/// Result of a successful Save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReport {
    pub uid: String,
    pub outcome: SaveOutcome,
}

/// Result of a successful Generate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationReport {
    /// Navigable route of the scaffolded pages, e.g. `/dashboard/posts`.
    pub base_path: String,
}

#[derive(Debug, Clone)]
pub struct TemplateEditor {
    text: String,
    store: TemplateStore,
    state: EditorState,
    trail: Vec<EditorState>,
    config: GeneratorConfig,
}

impl TemplateEditor {
    /// An editor showing the default skeleton over an empty collection.
    pub fn new(config: GeneratorConfig) -> Self {
        Self::with_store(config, TemplateStore::new())
    }

    pub fn with_store(config: GeneratorConfig, store: TemplateStore) -> Self {
        Self {
            text: skeleton_text(),
            store,
            state: EditorState::Idle,
            trail: Vec::new(),
            config,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Resets the text to the default skeleton.
    pub fn reset(&mut self) {
        self.text = skeleton_text();
    }

    /// Loads a stored template into the editor.
    pub fn open(&mut self, uid: &str) -> Result<(), FormgenError> {
        let template = self
            .store
            .get(uid)
            .ok_or_else(|| FormgenError::UnknownUid(uid.to_string()))?;
        self.text = template.to_pretty_json()?;
        Ok(())
    }

    pub fn store(&self) -> &TemplateStore {
        &self.store
    }

    /// Consumes the editor, returning its collection.
    pub fn into_store(self) -> TemplateStore {
        self.store
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    /// States visited by the most recent action, `Idle` excluded.
    pub fn last_transitions(&self) -> &[EditorState] {
        &self.trail
    }

    fn begin(&mut self) {
        self.trail.clear();
        self.transition(EditorState::Parsing);
    }

    fn transition(&mut self, next: EditorState) {
        debug!(from = ?self.state, to = ?next, "editor transition");
        self.state = next;
        self.trail.push(next);
    }

    fn finish<T>(&mut self, result: Result<T, FormgenError>) -> Result<T, FormgenError> {
        if let Err(e) = &result
            && e.is_validation()
        {
            warn!("Template rejected: {}", e);
            self.transition(EditorState::ValidationFailed);
        }
        debug!(from = ?self.state, "editor back to idle");
        self.state = EditorState::Idle;
        result
    }

    /// Validates the text and rewrites it pretty-printed.
    ///
    /// Formatting an already formatted text leaves it byte-identical.
    pub fn format(&mut self) -> Result<String, FormgenError> {
        self.begin();
        let result = format_text(&self.text);
        if result.is_ok() {
            self.transition(EditorState::Validated);
        }
        let formatted = self.finish(result)?;
        self.text = formatted.clone();
        Ok(formatted)
    }

    /// Validates the text and stores it in the collection.
    ///
    /// A template saved for the first time gets a fresh uid and the editor is
    /// refilled with it, so saving again updates the same entry. Updating an
    /// existing entry resets the editor to the skeleton.
    pub fn save(&mut self) -> Result<SaveReport, FormgenError> {
        self.begin();
        let parsed = Template::parse(&self.text);
        if parsed.is_ok() {
            self.transition(EditorState::Validated);
        }
        let mut template = self.finish(parsed)?;

        let uid = template.ensure_uid().to_string();
        let (store, outcome) = self.finish(self.store.upsert(template))?;

        self.text = match outcome {
            SaveOutcome::Created => match store.get(&uid) {
                Some(stored) => stored.to_pretty_json()?,
                None => return Err(FormgenError::UnknownUid(uid)),
            },
            SaveOutcome::Updated => skeleton_text(),
        };
        self.store = store;
        self.transition(EditorState::Persisted);
        info!(uid = %uid, ?outcome, "template saved");
        self.state = EditorState::Idle;

        Ok(SaveReport { uid, outcome })
    }

    /// Formats the text and forwards it to `assembler`.
    ///
    /// Takes `&mut self`, so one editor never has two generations in flight.
    #[cfg(feature = "async")]
    pub async fn generate<A>(&mut self, assembler: &A) -> Result<GenerationReport, FormgenError>
    where
        A: crate::assembler::TemplateAssembler + ?Sized,
    {
        let formatted = self.format()?;
        let base_path = base_path(&self.config, &formatted)?;

        self.transition(EditorState::GenerationRequested);
        debug!(base_path = %base_path, "generation requested");

        let result = assembler.assemble(&formatted).await;
        match &result {
            Ok(()) => {
                self.transition(EditorState::GenerationSucceeded);
                info!(base_path = %base_path, "template generated");
            }
            Err(e) => {
                self.transition(EditorState::GenerationFailed);
                warn!("Template generation failed: {}", e);
            }
        }
        self.finish(result)?;

        Ok(GenerationReport { base_path })
    }
}

/// Validates raw editor text and returns its pretty-printed form.
///
/// The schema is checked when present; the naming convention always is.
pub fn format_text(text: &str) -> Result<String, FormgenError> {
    let value: Value = serde_json::from_str(text)?;
    if let Some(schema) = value.get("schema") {
        validate_schema(schema)?;
    }
    if let Some(naming) = value.get("namingConvention") {
        validate_naming_value(naming)?;
    }
    check_fields(&value)?;
    Ok(serde_json::to_string_pretty(&value)?)
}

/// Route of the pages scaffolded from formatted template text:
/// `<prefix>/<plural-lowercase>`.
pub fn base_path(config: &GeneratorConfig, formatted: &str) -> Result<String, FormgenError> {
    let value: Value = serde_json::from_str(formatted)?;
    let naming = value.get("namingConvention");
    let use_generate_folder = naming
        .and_then(|n| n.get("use_generate_folder"))
        .and_then(Value::as_bool)
        .unwrap_or(false);
    let name = naming
        .and_then(|n| n.get(PLURAL_LOWERCASE))
        .and_then(Value::as_str)
        .unwrap_or_default();
    Ok(format!("{}/{}", config.route_prefix(use_generate_folder), name))
}

fn skeleton_text() -> String {
    Template::skeleton().to_pretty_json().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_editor_shows_skeleton() {
        let editor = TemplateEditor::new(GeneratorConfig::default());
        assert!(editor.text().contains("\"uid\": \"000\""));
        assert_eq!(editor.state(), EditorState::Idle);
        assert!(editor.store().is_empty());
    }

    #[test]
    fn test_format_failure_leaves_text() {
        let mut editor = TemplateEditor::new(GeneratorConfig::default());
        editor.set_text("{ nope");
        assert!(matches!(editor.format(), Err(FormgenError::Parse(_))));
        assert_eq!(editor.text(), "{ nope");
        assert_eq!(
            editor.last_transitions(),
            &[EditorState::Parsing, EditorState::ValidationFailed]
        );
        assert_eq!(editor.state(), EditorState::Idle);
    }

    #[test]
    fn test_base_path() {
        let config = GeneratorConfig::default();
        let text = r#"{"namingConvention":{"users_2_000___":"posts","use_generate_folder":true}}"#;
        assert_eq!(base_path(&config, text).unwrap(), "/generate/posts");

        let text = r#"{"namingConvention":{"users_2_000___":"posts"}}"#;
        assert_eq!(base_path(&config, text).unwrap(), "/dashboard/posts");
    }

    #[test]
    fn test_open_unknown_uid() {
        let mut editor = TemplateEditor::new(GeneratorConfig::default());
        assert_eq!(editor.open("nope"), Err(FormgenError::UnknownUid("nope".to_string())));
    }
}
