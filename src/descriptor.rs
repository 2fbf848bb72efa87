use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::registry::TypeTag;

const READONLY_FLAG: &str = "readonly";

/// A schema leaf's type tag, parsed once from its `#`-delimited text form.
///
/// `SELECT#Draft,Published` yields base `Select` with two options;
/// `EMAIL#readonly` yields base `Email` with the readonly flag set.
/// The original text is kept so stored templates serialize back unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldType {
    pub base: TypeTag,
    pub options: Vec<String>,
    pub readonly: bool,
    raw: String,
}

/// Rejection from [`FieldType::parse`]: the base before the first `#` is not
/// a registry member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTag(pub String);

impl fmt::Display for UnknownTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown field type \"{}\"", self.0)
    }
}

impl std::error::Error for UnknownTag {}

impl FieldType {
    pub fn parse(raw: &str) -> Result<Self, UnknownTag> {
        let (base, rest) = match raw.split_once('#') {
            Some((base, rest)) => (base, Some(rest)),
            None => (raw, None),
        };

        let base = TypeTag::from_str(base).map_err(|_| UnknownTag(raw.to_string()))?;

        let mut options = Vec::new();
        let mut readonly = false;
        for segment in rest.into_iter().flat_map(|r| r.split('#')) {
            if segment == READONLY_FLAG {
                readonly = true;
            } else {
                options.extend(
                    segment
                        .split(',')
                        .map(str::trim)
                        .filter(|o| !o.is_empty())
                        .map(String::from),
                );
            }
        }

        Ok(Self {
            base,
            options,
            readonly,
            raw: raw.to_string(),
        })
    }

    /// The tag exactly as written in the schema.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl From<TypeTag> for FieldType {
    fn from(base: TypeTag) -> Self {
        Self {
            base,
            options: Vec::new(),
            readonly: false,
            raw: base.to_string(),
        }
    }
}

impl FromStr for FieldType {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldType::parse(s)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for FieldType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        FieldType::parse(&raw).map_err(serde::de::Error::custom)
    }
}
