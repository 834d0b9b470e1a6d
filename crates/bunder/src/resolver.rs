//! Expansion of bundle file lists.
//!
//! A `Files` entry that matches another bundle's name is replaced by that
//! bundle's own expanded list, depth-first and left to right. Everything else
//! is a literal path, prefixed with the source base path.

use tracing::trace;

use crate::definition::{BundleDefinition, BundleSet};
use crate::error::{BuildError, Result};
use crate::paths::prefix_source;

/// Resolves file lists against a fixed set of bundles.
#[derive(Debug, Clone, Copy)]
pub struct FileListResolver<'a> {
    bundles: &'a BundleSet,
    base_path: &'a str,
}

impl<'a> FileListResolver<'a> {
    pub fn new(bundles: &'a BundleSet, base_path: &'a str) -> Self {
        Self { bundles, base_path }
    }

    /// Flattened source paths of `bundle`, in concatenation order.
    ///
    /// Duplicates are kept. A bundle that reaches itself through its
    /// references fails with `BuildError::ResolutionCycle`.
    pub fn resolve(&self, bundle: &BundleDefinition) -> Result<Vec<String>> {
        let mut resolved = Vec::new();
        let mut active = Vec::new();
        self.expand(bundle, &mut active, &mut resolved)?;
        Ok(resolved)
    }

    fn expand<'b>(
        &self,
        bundle: &'b BundleDefinition,
        active: &mut Vec<&'b str>,
        resolved: &mut Vec<String>,
    ) -> Result<()>
    where
        'a: 'b,
    {
        active.push(bundle.name());

        for entry in bundle.files() {
            match self.bundles.get(entry) {
                Some(nested) => {
                    if let Some(start) = active.iter().position(|name| *name == nested.name()) {
                        let mut cycle: Vec<String> =
                            active[start..].iter().map(|name| name.to_string()).collect();
                        cycle.push(nested.name().to_string());
                        return Err(BuildError::ResolutionCycle {
                            bundle: nested.name().to_string(),
                            cycle,
                        });
                    }
                    trace!("Bundle '{}': inlining bundle '{}'", bundle.name(), nested.name());
                    self.expand(nested, active, resolved)?;
                }
                None => resolved.push(prefix_source(self.base_path, entry)),
            }
        }

        active.pop();
        Ok(())
    }
}

/// Resolve one bundle without keeping a resolver around.
pub fn resolve_files(
    bundle: &BundleDefinition,
    bundles: &BundleSet,
    base_path: &str,
) -> Result<Vec<String>> {
    FileListResolver::new(bundles, base_path).resolve(bundle)
}
