//! Bundle definitions: raw records normalized against the settings.

use std::path::PathBuf;

use bunder_config::{BunderSettings, BundleConfig, ConfigError};
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde_json::Value;
use tracing::debug;

use crate::error::{BuildError, Result};
use crate::minify::Minifier;
use crate::paths::{extension_of, join_file_name, join_fragments};

/// Field names derived by [`BundleDefinition::new`]. Passthrough keys that
/// collide with one of these (ignoring case and underscores) are dropped.
const DERIVED_FIELDS: &[&str] = &[
    "name",
    "files",
    "extension",
    "outputfilename",
    "subpath",
    "outputdirectory",
    "outputpath",
    "referenceonly",
    "staticoutputpath",
];

/// A fully derived bundle, immutable once constructed.
#[derive(Debug, Clone, PartialEq)]
pub struct BundleDefinition {
    name: String,
    extension: String,
    output_file_name: String,
    sub_path: String,
    output_directory: String,
    output_path: String,
    files: Vec<String>,
    reference_only: bool,
    static_output_path: Option<String>,
    extras: IndexMap<String, Value>,
}

impl BundleDefinition {
    /// Derive a bundle from its raw record.
    ///
    /// `base_path` is prefixed to the output path as written; callers pass the
    /// resolved base path (see [`crate::paths::resolve_base_path`]).
    ///
    /// # Errors
    ///
    /// - `ConfigError::MissingName` when the record has no name
    /// - `ConfigError::NoFiles` when `Files` is empty
    /// - `ConfigError::ExtensionNotDetermined` when neither the output file name
    ///   nor any file entry has an extension
    pub fn new(
        config: &BundleConfig,
        settings: &BunderSettings,
        base_path: &str,
    ) -> Result<Self, ConfigError> {
        let name = config
            .name
            .as_deref()
            .filter(|name| !name.is_empty())
            .ok_or(ConfigError::MissingName)?
            .to_string();

        if config.files.is_empty() {
            return Err(ConfigError::NoFiles { bundle: name });
        }

        let declared_file_name = config
            .output_file_name
            .as_deref()
            .filter(|file_name| !file_name.is_empty());

        let extension = declared_file_name
            .into_iter()
            .chain(config.files.iter().map(String::as_str))
            .find_map(extension_of)
            .ok_or_else(|| ConfigError::ExtensionNotDetermined {
                bundle: name.clone(),
            })?;

        let output_file_name = match declared_file_name {
            Some(file_name) => file_name.to_string(),
            None => format!("{}.min.{}", name.replace(' ', ""), extension),
        };

        let output_directory = config
            .output_directory
            .clone()
            .or_else(|| settings.output_directory_for(&extension).map(str::to_string))
            .unwrap_or_default();
        let sub_path = config.sub_path.clone().unwrap_or_default();

        let directory = join_fragments([base_path, output_directory.as_str(), sub_path.as_str()]);
        let output_path = join_file_name(&directory, &output_file_name);

        let extras = config
            .extra
            .iter()
            .filter(|(key, _)| {
                let derived = is_derived_field(key);
                if derived {
                    debug!(
                        "Bundle '{}': ignoring field '{}' shadowed by a derived value",
                        name, key
                    );
                }
                !derived
            })
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Ok(Self {
            name,
            extension,
            output_file_name,
            sub_path,
            output_directory,
            output_path,
            files: config.files.clone(),
            reference_only: config.reference_only.get(),
            static_output_path: config
                .static_output_path
                .clone()
                .filter(|path| !path.is_empty()),
            extras,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lowercase file type, without the dot.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn output_file_name(&self) -> &str {
        &self.output_file_name
    }

    pub fn sub_path(&self) -> &str {
        &self.sub_path
    }

    pub fn output_directory(&self) -> &str {
        &self.output_directory
    }

    pub fn output_path(&self) -> &str {
        &self.output_path
    }

    pub fn output_path_buf(&self) -> PathBuf {
        PathBuf::from(&self.output_path)
    }

    /// Declared entries: source paths or names of other bundles.
    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn is_reference_only(&self) -> bool {
        self.reference_only
    }

    pub fn static_output_path(&self) -> Option<&str> {
        self.static_output_path.as_deref()
    }

    /// Passthrough field from the raw record.
    pub fn extra(&self, key: &str) -> Option<&Value> {
        self.extras.get(key)
    }

    pub fn extras(&self) -> &IndexMap<String, Value> {
        &self.extras
    }

    /// Minifier for this bundle's extension.
    pub fn minifier(&self) -> Result<Minifier> {
        Minifier::for_extension(&self.extension).ok_or_else(|| BuildError::UnsupportedExtension {
            bundle: self.name.clone(),
            extension: self.extension.clone(),
        })
    }
}

fn is_derived_field(key: &str) -> bool {
    let normalized: String = key
        .chars()
        .filter(|c| *c != '_' && *c != '-')
        .map(|c| c.to_ascii_lowercase())
        .collect();
    DERIVED_FIELDS.contains(&normalized.as_str())
}

/// All bundles of a run, in declaration order, addressable by name.
#[derive(Debug, Clone, Default)]
pub struct BundleSet {
    bundles: Vec<BundleDefinition>,
    by_name: FxHashMap<String, usize>,
}

impl BundleSet {
    /// # Errors
    ///
    /// Returns `ConfigError::DuplicateBundle` if two bundles share a name.
    pub fn new(bundles: Vec<BundleDefinition>) -> Result<Self, ConfigError> {
        let mut by_name = FxHashMap::default();
        for (index, bundle) in bundles.iter().enumerate() {
            if by_name.insert(bundle.name.clone(), index).is_some() {
                return Err(ConfigError::DuplicateBundle {
                    name: bundle.name.clone(),
                });
            }
        }
        Ok(Self { bundles, by_name })
    }

    /// Derive every record, stopping at the first invalid one.
    pub fn from_configs(
        configs: &[BundleConfig],
        settings: &BunderSettings,
        base_path: &str,
    ) -> Result<Self, ConfigError> {
        let bundles = configs
            .iter()
            .map(|config| BundleDefinition::new(config, settings, base_path))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(bundles)
    }

    pub fn get(&self, name: &str) -> Option<&BundleDefinition> {
        self.by_name.get(name).map(|&index| &self.bundles[index])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BundleDefinition> {
        self.bundles.iter()
    }

    pub fn as_slice(&self) -> &[BundleDefinition] {
        &self.bundles
    }

    pub fn len(&self) -> usize {
        self.bundles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bundles.is_empty()
    }
}

impl<'a> IntoIterator for &'a BundleSet {
    type Item = &'a BundleDefinition;
    type IntoIter = std::slice::Iter<'a, BundleDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.bundles.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn settings() -> BunderSettings {
        BunderSettings::new()
            .with_output_directory("js", "/out/js")
            .with_output_directory("css", "/out/css/")
    }

    #[test]
    fn derives_output_path_from_settings() {
        let config = BundleConfig::new("App", ["x.js", "y.js"]);
        let bundle = BundleDefinition::new(&config, &settings(), "/root/").unwrap();

        assert_eq!(bundle.extension(), "js");
        assert_eq!(bundle.output_directory(), "/out/js");
        assert_eq!(bundle.output_file_name(), "App.min.js");
        assert_eq!(bundle.output_path(), "/root/out/js/App.min.js");
    }

    #[test]
    fn default_file_name_removes_spaces() {
        let config = BundleConfig::new("Site Styles Bundle", ["/css/site.css"]);
        let bundle = BundleDefinition::new(&config, &settings(), "/root/").unwrap();

        assert_eq!(bundle.output_file_name(), "SiteStylesBundle.min.css");
        assert_eq!(bundle.output_path(), "/root/out/css/SiteStylesBundle.min.css");
    }

    #[test]
    fn exactly_one_separator_before_file_name() {
        for (directory, sub_path) in [
            ("/out/js", "vendor"),
            ("/out/js/", "vendor/"),
            ("/out/js", "/vendor/"),
            ("/out/js/", "/vendor"),
        ] {
            let config = BundleConfig::new("Lib", ["lib.js"])
                .with_output_directory(directory)
                .with_sub_path(sub_path);
            let bundle = BundleDefinition::new(&config, &settings(), "/root/").unwrap();
            assert_eq!(bundle.output_path(), "/root/out/js/vendor/Lib.min.js");
        }
    }

    #[test]
    fn output_file_name_decides_the_extension() {
        let config = BundleConfig::new("Mixed", ["/js/a.js"]).with_output_file_name("mixed.CSS");
        let bundle = BundleDefinition::new(&config, &settings(), "/root/").unwrap();

        assert_eq!(bundle.extension(), "css");
        assert_eq!(bundle.output_file_name(), "mixed.CSS");
        assert_eq!(bundle.output_path(), "/root/out/css/mixed.CSS");
    }

    #[test]
    fn extension_falls_through_to_first_file_with_one() {
        let config = BundleConfig::new("Site", ["jQuery", "Common", "/js/site.js"]);
        let bundle = BundleDefinition::new(&config, &settings(), "/root/").unwrap();
        assert_eq!(bundle.extension(), "js");

        let config =
            BundleConfig::new("Site", ["/js/site.js"]).with_output_file_name("no-extension");
        let bundle = BundleDefinition::new(&config, &settings(), "/root/").unwrap();
        assert_eq!(bundle.extension(), "js");
        assert_eq!(bundle.output_path(), "/root/out/js/no-extension");
    }

    #[test]
    fn unknown_extension_has_empty_directory() {
        let config = BundleConfig::new("Fonts", ["/fonts/icons.woff"]);
        let bundle = BundleDefinition::new(&config, &settings(), "/root/").unwrap();

        assert_eq!(bundle.output_directory(), "");
        assert_eq!(bundle.output_path(), "/root/Fonts.min.woff");
    }

    #[test]
    fn construction_failures() {
        let no_name = BundleConfig {
            files: vec!["a.js".to_string()],
            ..Default::default()
        };
        assert!(matches!(
            BundleDefinition::new(&no_name, &settings(), ""),
            Err(ConfigError::MissingName)
        ));

        let no_files = BundleConfig::new("Empty", Vec::<String>::new());
        assert!(matches!(
            BundleDefinition::new(&no_files, &settings(), ""),
            Err(ConfigError::NoFiles { bundle }) if bundle == "Empty"
        ));

        let no_extension = BundleConfig::new("Refs", ["jQuery", "Common"]);
        assert!(matches!(
            BundleDefinition::new(&no_extension, &settings(), ""),
            Err(ConfigError::ExtensionNotDetermined { bundle }) if bundle == "Refs"
        ));
    }

    #[test]
    fn reference_only_flags_and_static_output() {
        let config = BundleConfig::new("jQuery", ["/lib/jquery/jquery.js"])
            .with_reference_only(true)
            .with_static_output_path("/lib/jquery/jquery.min.js");
        let bundle = BundleDefinition::new(&config, &settings(), "/root/").unwrap();

        assert!(bundle.is_reference_only());
        assert_eq!(bundle.static_output_path(), Some("/lib/jquery/jquery.min.js"));
    }

    #[test]
    fn passthrough_fields_never_shadow_derived_ones() {
        let config = BundleConfig::new("App", ["app.js"])
            .with_extra("Integrity", json!("sha384-abc"))
            .with_extra("OutputPath", json!("/elsewhere/app.js"))
            .with_extra("Extension", json!("css"))
            .with_extra("output_path", json!("/elsewhere"));
        let bundle = BundleDefinition::new(&config, &settings(), "/root/").unwrap();

        assert_eq!(bundle.extra("Integrity"), Some(&json!("sha384-abc")));
        assert_eq!(bundle.extras().len(), 1);
        assert_eq!(bundle.extension(), "js");
        assert_eq!(bundle.output_path(), "/root/out/js/App.min.js");
    }

    #[test]
    fn minifier_selection() {
        let js =
            BundleDefinition::new(&BundleConfig::new("A", ["a.js"]), &settings(), "").unwrap();
        assert_eq!(js.minifier().unwrap(), Minifier::JavaScript);

        let xyz =
            BundleDefinition::new(&BundleConfig::new("X", ["x.xyz"]), &settings(), "").unwrap();
        match xyz.minifier().unwrap_err() {
            BuildError::UnsupportedExtension { bundle, extension } => {
                assert_eq!(bundle, "X");
                assert_eq!(extension, "xyz");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let configs = vec![
            BundleConfig::new("Site", ["a.js"]),
            BundleConfig::new("Other", ["b.js"]),
            BundleConfig::new("Site", ["c.js"]),
        ];
        let err = BundleSet::from_configs(&configs, &settings(), "").unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateBundle { name } if name == "Site"));
    }

    #[test]
    fn bundle_set_keeps_declaration_order() {
        let configs = vec![
            BundleConfig::new("B", ["b.js"]),
            BundleConfig::new("A", ["a.js"]),
        ];
        let set = BundleSet::from_configs(&configs, &settings(), "").unwrap();

        let names: Vec<_> = set.iter().map(BundleDefinition::name).collect();
        assert_eq!(names, vec!["B", "A"]);
        assert_eq!(set.get("A").unwrap().files(), ["a.js"]);
        assert!(set.get("C").is_none());
    }
}
