//! Value objects passed into generate calls.

use std::collections::BTreeMap;

use bon::Builder;
use serde::Serialize;

use crate::model::{Variant, Visibility};

/// Options for one generate call.
///
/// All fields are optional; the server applies its defaults for anything
/// unset. For JSON generate calls the options serialize inline next to the
/// source URL; for uploads they travel as extra multipart string fields.
#[derive(Debug, Clone, Default, Builder, Serialize)]
pub struct GenerateOptions {
    /// The model variant to generate for.
    #[serde(skip_serializing_if = "Option::is_none")]
    variant: Option<Variant>,

    /// A display name for the generated skin.
    #[builder(into)]
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,

    /// Who can find the generated skin.
    #[serde(skip_serializing_if = "Option::is_none")]
    visibility: Option<Visibility>,
}

impl GenerateOptions {
    /// Returns the options as multipart string fields, omitting anything
    /// unset.
    #[must_use]
    pub fn as_form_fields(&self) -> BTreeMap<String, String> {
        let mut fields = BTreeMap::new();
        if let Some(variant) = self.variant {
            fields.insert("variant".to_owned(), variant.as_str().to_owned());
        }
        if let Some(name) = &self.name {
            fields.insert("name".to_owned(), name.clone());
        }
        if let Some(visibility) = self.visibility {
            fields.insert("visibility".to_owned(), visibility.as_str().to_owned());
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_options_serialize_to_nothing() {
        let options = GenerateOptions::builder().build();
        assert_eq!(serde_json::to_string(&options).unwrap(), "{}");
        assert!(options.as_form_fields().is_empty());
    }

    #[test]
    fn set_options_appear_in_both_encodings() {
        let options = GenerateOptions::builder()
            .variant(Variant::Slim)
            .name("My Skin")
            .visibility(Visibility::Unlisted)
            .build();

        let json = serde_json::to_value(&options).unwrap();
        assert_eq!(json["variant"], "slim");
        assert_eq!(json["name"], "My Skin");
        assert_eq!(json["visibility"], "unlisted");

        let fields = options.as_form_fields();
        assert_eq!(fields.get("variant").map(String::as_str), Some("slim"));
        assert_eq!(fields.get("name").map(String::as_str), Some("My Skin"));
        assert_eq!(fields.get("visibility").map(String::as_str), Some("unlisted"));
    }
}
