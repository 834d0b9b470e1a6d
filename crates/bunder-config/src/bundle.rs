//! Raw bundle records as they appear in the bundles file.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::bool_like::BoolLike;

/// One entry of the bundles file, before any derivation.
///
/// Every entry of `files` is either a source path or the `name` of another
/// bundle. Unknown keys land in `extra` untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct BundleConfig {
    #[serde(default, alias = "name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, alias = "files")]
    pub files: Vec<String>,

    #[serde(
        default,
        alias = "outputFileName",
        alias = "output_file_name",
        skip_serializing_if = "Option::is_none"
    )]
    pub output_file_name: Option<String>,

    #[serde(
        default,
        alias = "subPath",
        alias = "sub_path",
        skip_serializing_if = "Option::is_none"
    )]
    pub sub_path: Option<String>,

    #[serde(
        default,
        alias = "outputDirectory",
        alias = "output_directory",
        skip_serializing_if = "Option::is_none"
    )]
    pub output_directory: Option<String>,

    #[serde(default, alias = "referenceOnly", alias = "reference_only")]
    pub reference_only: BoolLike,

    #[serde(
        default,
        alias = "staticOutputPath",
        alias = "static_output_path",
        skip_serializing_if = "Option::is_none"
    )]
    pub static_output_path: Option<String>,

    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl BundleConfig {
    pub fn new<I, S>(name: impl Into<String>, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: Some(name.into()),
            files: files.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_output_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.output_file_name = Some(file_name.into());
        self
    }

    pub fn with_sub_path(mut self, sub_path: impl Into<String>) -> Self {
        self.sub_path = Some(sub_path.into());
        self
    }

    pub fn with_output_directory(mut self, directory: impl Into<String>) -> Self {
        self.output_directory = Some(directory.into());
        self
    }

    pub fn with_reference_only(mut self, reference_only: bool) -> Self {
        self.reference_only = BoolLike(reference_only);
        self
    }

    pub fn with_static_output_path(mut self, path: impl Into<String>) -> Self {
        self.static_output_path = Some(path.into());
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_original_record_shape() {
        let record: BundleConfig = serde_json::from_value(json!({
            "Name": "Site Scripts",
            "Files": ["jQuery", "/js/site.js"],
            "SubPath": "/site",
            "ReferenceOnly": "no",
            "CdnUrl": "https://cdn.example.com/site.js"
        }))
        .unwrap();

        assert_eq!(record.name.as_deref(), Some("Site Scripts"));
        assert_eq!(record.files, vec!["jQuery", "/js/site.js"]);
        assert_eq!(record.sub_path.as_deref(), Some("/site"));
        assert!(!record.reference_only.get());
        assert_eq!(
            record.extra.get("CdnUrl"),
            Some(&json!("https://cdn.example.com/site.js"))
        );
    }

    #[test]
    fn reference_only_accepts_loose_flags() {
        let record: BundleConfig = serde_json::from_value(json!({
            "name": "jQuery",
            "files": ["/lib/jquery.js"],
            "referenceOnly": "Yes",
            "staticOutputPath": "/lib/jquery.min.js"
        }))
        .unwrap();

        assert!(record.reference_only.get());
        assert_eq!(record.static_output_path.as_deref(), Some("/lib/jquery.min.js"));
    }

    #[test]
    fn missing_files_deserialize_as_empty() {
        let record: BundleConfig = serde_json::from_value(json!({ "Name": "Empty" })).unwrap();
        assert!(record.files.is_empty());
    }
}
