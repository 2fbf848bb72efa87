//! # Naming Conventions
//!
//! Four identity keys name the generated entity: plural and singular, each in
//! a capitalized and a lower-case form. Folder names, route segments and type
//! names are derived from them, so only the first character of each value may
//! be upper-case (`Posts` is fine, `PostsID` is not).
//!
//! Values are kept as raw JSON: a non-string value is exempt from the casing
//! rule instead of being a parse failure.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::types::FormgenError;

pub const PLURAL_CAPITALIZED: &str = "Users_1_000___";
pub const PLURAL_LOWERCASE: &str = "users_2_000___";
pub const SINGULAR_CAPITALIZED: &str = "User_3_000___";
pub const SINGULAR_LOWERCASE: &str = "user_4_000___";

/// The identity keys in the order they are checked.
pub const IDENTITY_KEYS: [&str; 4] = [
    PLURAL_CAPITALIZED,
    PLURAL_LOWERCASE,
    SINGULAR_CAPITALIZED,
    SINGULAR_LOWERCASE,
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamingConvention {
    #[serde(rename = "Users_1_000___", default, skip_serializing_if = "Value::is_null")]
    pub plural_capitalized: Value,
    #[serde(rename = "users_2_000___", default, skip_serializing_if = "Value::is_null")]
    pub plural_lowercase: Value,
    #[serde(rename = "User_3_000___", default, skip_serializing_if = "Value::is_null")]
    pub singular_capitalized: Value,
    #[serde(rename = "user_4_000___", default, skip_serializing_if = "Value::is_null")]
    pub singular_lowercase: Value,
    /// Scaffold into the `generate` folder instead of the dashboard.
    #[serde(default)]
    pub use_generate_folder: bool,
    /// Fields offered as bulk actions on the generated list page.
    #[serde(default)]
    pub bulk_action: Vec<String>,
    /// Keys this crate does not interpret, kept so they survive a save.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NamingConvention {
    /// Convenience constructor for the four identity names.
    pub fn new(
        plural_capitalized: impl Into<String>,
        plural_lowercase: impl Into<String>,
        singular_capitalized: impl Into<String>,
        singular_lowercase: impl Into<String>,
    ) -> Self {
        Self {
            plural_capitalized: Value::String(plural_capitalized.into()),
            plural_lowercase: Value::String(plural_lowercase.into()),
            singular_capitalized: Value::String(singular_capitalized.into()),
            singular_lowercase: Value::String(singular_lowercase.into()),
            ..Default::default()
        }
    }

    pub fn with_generate_folder(mut self, enabled: bool) -> Self {
        self.use_generate_folder = enabled;
        self
    }

    pub fn with_bulk_action(mut self, fields: Vec<String>) -> Self {
        self.bulk_action = fields;
        self
    }

    fn identity_entries(&self) -> [(&'static str, &Value); 4] {
        [
            (PLURAL_CAPITALIZED, &self.plural_capitalized),
            (PLURAL_LOWERCASE, &self.plural_lowercase),
            (SINGULAR_CAPITALIZED, &self.singular_capitalized),
            (SINGULAR_LOWERCASE, &self.singular_lowercase),
        ]
    }

    /// Applies the casing rule to the identity keys, stopping at the first
    /// offending key.
    pub fn validate(&self) -> Result<(), FormgenError> {
        self.identity_entries()
            .into_iter()
            .try_for_each(|(key, value)| check_identity(key, value))
    }

    /// The plural lower-case name, used as the route segment.
    pub fn route_name(&self) -> Option<&str> {
        self.plural_lowercase.as_str()
    }
}

/// Applies the casing rule to a raw `namingConvention` value.
///
/// Anything other than an object has no identity keys and passes.
pub fn validate_naming_value(value: &Value) -> Result<(), FormgenError> {
    let Some(map) = value.as_object() else {
        return Ok(());
    };
    IDENTITY_KEYS.iter().try_for_each(|key| match map.get(*key) {
        Some(v) => check_identity(key, v),
        None => Ok(()),
    })
}

fn check_identity(key: &str, value: &Value) -> Result<(), FormgenError> {
    let Some(name) = value.as_str() else {
        return Ok(());
    };
    if name.chars().count() <= 1 {
        return Ok(());
    }
    if name.chars().skip(1).any(|c| c.is_ascii_uppercase()) {
        debug!(key, value = name, "naming convention casing violation");
        return Err(FormgenError::naming(key, name));
    }
    Ok(())
}
