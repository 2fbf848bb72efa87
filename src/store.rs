//! # Template Collection
//!
//! The set of templates edited in one session. Every operation leaves the
//! receiver untouched and returns the next collection, so the editor swaps
//! stores instead of mutating shared state.
//!
//! Uids are unique within a store: adding a second template with an existing
//! uid is rejected, as is loading a collection that contains duplicates.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::template::Template;
use crate::types::FormgenError;

/// What a save did to the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaveOutcome {
    /// A new entry was appended.
    Created,
    /// An existing entry with the same uid was replaced.
    Updated,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TemplateStore {
    templates: Vec<Template>,
}

impl TemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store, rejecting templates without a uid or with a repeated one.
    pub fn from_templates(templates: Vec<Template>) -> Result<Self, FormgenError> {
        {
            let mut seen = HashSet::new();
            for template in &templates {
                let uid = uid_of(template)?;
                if !seen.insert(uid) {
                    return Err(FormgenError::DuplicateUid(uid.to_string()));
                }
            }
        }
        Ok(Self { templates })
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Template> {
        self.templates.iter()
    }

    pub fn get(&self, uid: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.uid.as_deref() == Some(uid))
    }

    pub fn contains(&self, uid: &str) -> bool {
        self.get(uid).is_some()
    }

    /// Appends a template whose uid is not yet present.
    pub fn with_added(&self, template: Template) -> Result<Self, FormgenError> {
        let uid = uid_of(&template)?;
        if self.contains(uid) {
            return Err(FormgenError::DuplicateUid(uid.to_string()));
        }
        let mut templates = self.templates.clone();
        templates.push(template);
        Ok(Self { templates })
    }

    /// Replaces the entry sharing the template's uid.
    pub fn with_updated(&self, template: Template) -> Result<Self, FormgenError> {
        let uid = uid_of(&template)?;
        let index = self
            .templates
            .iter()
            .position(|t| t.uid.as_deref() == Some(uid))
            .ok_or_else(|| FormgenError::UnknownUid(uid.to_string()))?;
        let mut templates = self.templates.clone();
        templates[index] = template;
        Ok(Self { templates })
    }

    /// Updates in place when the uid is known, appends otherwise.
    pub fn upsert(&self, template: Template) -> Result<(Self, SaveOutcome), FormgenError> {
        let uid = uid_of(&template)?;
        if self.contains(uid) {
            Ok((self.with_updated(template)?, SaveOutcome::Updated))
        } else {
            Ok((self.with_added(template)?, SaveOutcome::Created))
        }
    }

    pub fn without(&self, uid: &str) -> Result<Self, FormgenError> {
        if !self.contains(uid) {
            return Err(FormgenError::UnknownUid(uid.to_string()));
        }
        let templates = self
            .templates
            .iter()
            .filter(|t| t.uid.as_deref() != Some(uid))
            .cloned()
            .collect();
        Ok(Self { templates })
    }

    pub fn cleared(&self) -> Self {
        Self::default()
    }

    /// Loads a collection written by [`TemplateStore::persist`].
    ///
    /// A missing file is an empty collection.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FormgenError> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No template store at {:?}; starting empty", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| FormgenError::Storage(format!("Failed to read {}: {}", path.display(), e)))?;
        let templates: Vec<Template> = serde_json::from_str(&content)
            .map_err(|e| FormgenError::Storage(format!("Failed to parse {}: {}", path.display(), e)))?;

        let store = Self::from_templates(templates)?;
        debug!("Loaded {} templates from {:?}", store.len(), path);
        Ok(store)
    }

    /// Writes the collection as a pretty-printed JSON array.
    pub fn persist(&self, path: impl AsRef<Path>) -> Result<(), FormgenError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .map_err(|e| FormgenError::Storage(format!("Failed to create {}: {}", parent.display(), e)))?;
        }

        let content = serde_json::to_string_pretty(&self.templates)
            .map_err(|e| FormgenError::Storage(e.to_string()))?;
        fs::write(path, content)
            .map_err(|e| FormgenError::Storage(format!("Failed to write {}: {}", path.display(), e)))?;
        info!("Saved {} templates to {:?}", self.len(), path);
        Ok(())
    }
}

impl<'de> Deserialize<'de> for TemplateStore {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let templates = Vec::<Template>::deserialize(deserializer)?;
        TemplateStore::from_templates(templates).map_err(serde::de::Error::custom)
    }
}

fn uid_of(template: &Template) -> Result<&str, FormgenError> {
    match template.uid.as_deref() {
        Some(uid) if !template.needs_uid() => Ok(uid),
        _ => Err(FormgenError::UnknownUid(
            template.uid.clone().unwrap_or_default(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(uid: &str, name: &str) -> Template {
        Template {
            uid: Some(uid.to_string()),
            template_name: name.to_string(),
            ..Template::skeleton()
        }
    }

    #[test]
    fn test_add_is_pure() {
        let empty = TemplateStore::new();
        let one = empty.with_added(named("a", "Posts")).unwrap();
        assert!(empty.is_empty());
        assert_eq!(one.len(), 1);
    }

    #[test]
    fn test_duplicate_uid_rejected() {
        let store = TemplateStore::new().with_added(named("a", "Posts")).unwrap();
        let err = store.with_added(named("a", "Other")).unwrap_err();
        assert_eq!(err, FormgenError::DuplicateUid("a".to_string()));

        let err = TemplateStore::from_templates(vec![named("a", "x"), named("a", "y")]).unwrap_err();
        assert_eq!(err, FormgenError::DuplicateUid("a".to_string()));
    }

    #[test]
    fn test_upsert_creates_then_updates() {
        let (store, outcome) = TemplateStore::new().upsert(named("a", "Posts")).unwrap();
        assert_eq!(outcome, SaveOutcome::Created);

        let (store, outcome) = store.upsert(named("a", "Posts v2")).unwrap();
        assert_eq!(outcome, SaveOutcome::Updated);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("a").unwrap().template_name, "Posts v2");
    }

    #[test]
    fn test_update_keeps_position() {
        let store = TemplateStore::from_templates(vec![named("a", "A"), named("b", "B"), named("c", "C")]).unwrap();
        let store = store.with_updated(named("b", "B2")).unwrap();
        let names: Vec<&str> = store.iter().map(|t| t.template_name.as_str()).collect();
        assert_eq!(names, vec!["A", "B2", "C"]);
    }

    #[test]
    fn test_placeholder_uid_cannot_be_stored() {
        let err = TemplateStore::new().with_added(Template::skeleton()).unwrap_err();
        assert_eq!(err, FormgenError::UnknownUid("000".to_string()));
    }

    #[test]
    fn test_remove_and_clear() {
        let store = TemplateStore::from_templates(vec![named("a", "A"), named("b", "B")]).unwrap();
        let store = store.without("a").unwrap();
        assert!(!store.contains("a"));
        assert_eq!(store.len(), 1);
        assert_eq!(store.without("zzz").unwrap_err(), FormgenError::UnknownUid("zzz".to_string()));
        assert!(store.cleared().is_empty());
    }

    #[test]
    fn test_persist_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("templates.json");

        assert!(TemplateStore::load(&path).unwrap().is_empty());

        let store = TemplateStore::from_templates(vec![named("a", "A"), named("b", "B")]).unwrap();
        store.persist(&path).unwrap();
        assert_eq!(TemplateStore::load(&path).unwrap(), store);
    }

    #[test]
    fn test_load_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("templates.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(TemplateStore::load(&path), Err(FormgenError::Storage(_))));
    }
}
