//! # Field Type Registry
//!
//! The closed set of field-type tags a schema leaf may carry. The textual form
//! of each tag is its upper-case name (`STRING`, `DATERANGE`, ...) and lookup is
//! case-sensitive, so `string` is not a known tag.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// A recognized form-field kind.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter, AsRefStr,
)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum TypeTag {
    String,
    Email,
    Password,
    Select,
    Image,
    Images,
    Date,
    Time,
    DateRange,
    TimeRange,
    Boolean,
    IntNumber,
    FloatNumber,
    ColorPicker,
    Phone,
    Url,
    RichText,
    AutoComplete,
    RadioButton,
    Checkbox,
    MultiCheckbox,
    MultiOptions,
    StringArray,
}

/// Broad shape of the value a field holds once filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueKind {
    Text,
    Number,
    Boolean,
    Temporal,
    Range,
    List,
    Media,
}

impl TypeTag {
    /// Every tag in the registry, in declaration order.
    pub fn all() -> Vec<TypeTag> {
        TypeTag::iter().collect()
    }

    pub fn value_kind(&self) -> ValueKind {
        match self {
            TypeTag::String
            | TypeTag::Email
            | TypeTag::Password
            | TypeTag::Select
            | TypeTag::ColorPicker
            | TypeTag::Phone
            | TypeTag::Url
            | TypeTag::RichText
            | TypeTag::AutoComplete
            | TypeTag::RadioButton => ValueKind::Text,
            TypeTag::IntNumber | TypeTag::FloatNumber => ValueKind::Number,
            TypeTag::Boolean | TypeTag::Checkbox => ValueKind::Boolean,
            TypeTag::Date | TypeTag::Time => ValueKind::Temporal,
            TypeTag::DateRange | TypeTag::TimeRange => ValueKind::Range,
            TypeTag::MultiCheckbox | TypeTag::MultiOptions | TypeTag::StringArray => ValueKind::List,
            TypeTag::Image | TypeTag::Images => ValueKind::Media,
        }
    }

    /// TypeScript type emitted for this field in scaffolded interfaces.
    pub fn ts_type(&self) -> &'static str {
        match self {
            TypeTag::Images => "string[]",
            _ => match self.value_kind() {
                ValueKind::Number => "number",
                ValueKind::Boolean => "boolean",
                ValueKind::Range => "[string, string]",
                ValueKind::List => "string[]",
                ValueKind::Text | ValueKind::Temporal | ValueKind::Media => "string",
            },
        }
    }

    /// Tags whose input picks from an operator-supplied option list.
    pub fn accepts_options(&self) -> bool {
        matches!(
            self,
            TypeTag::Select
                | TypeTag::RadioButton
                | TypeTag::AutoComplete
                | TypeTag::MultiCheckbox
                | TypeTag::MultiOptions
        )
    }
}

/// Returns true when `base` names a registry member.
pub fn is_known(base: &str) -> bool {
    TypeTag::from_str(base).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_textual_form_is_uppercase() {
        assert_eq!(TypeTag::DateRange.to_string(), "DATERANGE");
        assert_eq!(TypeTag::IntNumber.as_ref(), "INTNUMBER");
        assert_eq!(TypeTag::from_str("MULTICHECKBOX"), Ok(TypeTag::MultiCheckbox));
    }

    #[test]
    fn test_is_known() {
        for tag in TypeTag::all() {
            assert!(is_known(tag.as_ref()), "{} should be known", tag);
        }
        assert!(!is_known("STRNG"));
        assert!(!is_known("string"));
        assert!(!is_known(""));
        assert!(!is_known("SELECT#A,B"));
    }

    #[test]
    fn test_registry_size() {
        assert_eq!(TypeTag::all().len(), 23);
    }

    #[test]
    fn test_field_type_mapping() {
        assert_eq!(TypeTag::FloatNumber.ts_type(), "number");
        assert_eq!(TypeTag::Images.ts_type(), "string[]");
        assert_eq!(TypeTag::Image.ts_type(), "string");
        assert_eq!(TypeTag::TimeRange.ts_type(), "[string, string]");
        assert_eq!(TypeTag::Checkbox.value_kind(), ValueKind::Boolean);
        assert!(TypeTag::Select.accepts_options());
        assert!(!TypeTag::Email.accepts_options());
    }
}
