use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::naming::{NamingConvention, validate_naming_value};
use crate::registry::TypeTag;
use crate::schema::SchemaNode;
use crate::types::FormgenError;

/// Uid carried by templates that have never been saved.
pub const PLACEHOLDER_UID: &str = "000";

/// One generatable entity definition: a schema plus the names to scaffold it under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default)]
    pub template_name: String,
    pub schema: SchemaNode,
    #[serde(default)]
    pub naming_convention: NamingConvention,
}

impl Template {
    /// The starting content of a fresh editor.
    pub fn skeleton() -> Self {
        Self {
            uid: Some(PLACEHOLDER_UID.to_string()),
            template_name: "New Template".to_string(),
            schema: SchemaNode::Node(vec![(
                "title".to_string(),
                SchemaNode::Leaf(TypeTag::String.into()),
            )]),
            naming_convention: NamingConvention::new("Users", "users", "User", "user"),
        }
    }

    /// Parses and fully validates editor text.
    ///
    /// Checks run in a fixed order and stop at the first failure: JSON syntax,
    /// the `schema` shape, every schema leaf, then the naming convention.
    pub fn parse(text: &str) -> Result<Self, FormgenError> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, FormgenError> {
        let schema_value = value.get("schema").ok_or(FormgenError::SchemaShape)?;
        let schema = SchemaNode::from_value(schema_value)?;

        if let Some(naming) = value.get("namingConvention") {
            validate_naming_value(naming)?;
        }

        let template = Template {
            uid: field(&value, "uid")?,
            template_name: field(&value, "templateName")?,
            schema,
            naming_convention: field(&value, "namingConvention")?,
        };

        debug!(uid = ?template.uid, fields = template.schema.fields().len(), "template parsed");
        Ok(template)
    }

    /// True when the template still needs a uid assigned.
    pub fn needs_uid(&self) -> bool {
        match self.uid.as_deref() {
            None => true,
            Some(uid) => uid.is_empty() || uid == PLACEHOLDER_UID,
        }
    }

    /// Replaces an absent or placeholder uid with a fresh one.
    pub fn ensure_uid(&mut self) -> &str {
        if self.needs_uid() {
            self.uid = Some(uuid::Uuid::new_v4().to_string());
        }
        self.uid.as_deref().unwrap_or_default()
    }

    pub fn validate(&self) -> Result<(), FormgenError> {
        self.naming_convention.validate()
    }

    /// Pretty-printed JSON with 2-space indentation.
    pub fn to_pretty_json(&self) -> Result<String, FormgenError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Checks that `uid`, `templateName` and `namingConvention` have their model
/// types, without building a template. Format uses this on schema-less text.
pub fn check_fields(value: &Value) -> Result<(), FormgenError> {
    field::<Option<String>>(value, "uid")?;
    field::<String>(value, "templateName")?;
    field::<NamingConvention>(value, "namingConvention")?;
    Ok(())
}

/// Reads one top-level field, defaulting when absent.
fn field<T: DeserializeOwned + Default>(value: &Value, key: &str) -> Result<T, FormgenError> {
    match value.get(key) {
        None => Ok(T::default()),
        Some(v) => T::deserialize(v).map_err(|e| FormgenError::template_shape(key, e.to_string())),
    }
}

impl Default for Template {
    fn default() -> Self {
        Self::skeleton()
    }
}

impl std::str::FromStr for Template {
    type Err = FormgenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Template::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skeleton_is_valid_and_round_trips() {
        let skeleton = Template::skeleton();
        assert!(skeleton.needs_uid());
        assert!(skeleton.validate().is_ok());

        let text = skeleton.to_pretty_json().unwrap();
        assert_eq!(Template::parse(&text).unwrap(), skeleton);
    }

    #[test]
    fn test_parse_error_is_surfaced() {
        let err = Template::parse("{ \"schema\": ").unwrap_err();
        assert!(matches!(err, FormgenError::Parse(_)));
    }

    #[test]
    fn test_missing_or_bad_schema() {
        assert_eq!(Template::parse(r#"{"templateName":"x"}"#), Err(FormgenError::SchemaShape));
        assert_eq!(Template::parse(r#"{"schema":"STRING"}"#), Err(FormgenError::SchemaShape));
        assert_eq!(Template::parse("[]"), Err(FormgenError::SchemaShape));
    }

    #[test]
    fn test_schema_checked_before_naming() {
        let text = r#"{
            "schema": { "title": "STRNG" },
            "namingConvention": { "Users_1_000___": "PostsABC" }
        }"#;
        assert_eq!(Template::parse(text), Err(FormgenError::schema_type("title", "STRNG")));
    }

    #[test]
    fn test_wrong_field_type_names_field() {
        let err = Template::parse(r#"{"uid":42,"schema":{}}"#).unwrap_err();
        assert!(matches!(err, FormgenError::TemplateShape { ref field, .. } if field == "uid"));
        assert!(err.is_validation());
    }

    #[test]
    fn test_ensure_uid() {
        let mut template = Template::skeleton();
        let uid = template.ensure_uid().to_string();
        assert_ne!(uid, PLACEHOLDER_UID);
        assert!(!template.needs_uid());

        // Already assigned uids are left alone.
        assert_eq!(template.ensure_uid(), uid);

        template.uid = Some(String::new());
        assert!(template.needs_uid());
    }
}
