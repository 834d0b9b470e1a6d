//! String path synthesis for bundle outputs and sources.
//!
//! Output paths are built by concatenating configured fragments
//! (`base + directory + sub path + file name`). Fragments come straight from
//! config and may or may not carry separators at their edges, so joining
//! normalizes each junction to exactly one separator.

use std::path::Path;

use path_clean::PathClean;

pub const SEPARATOR: char = '/';

pub fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Join path fragments with exactly one separator at every junction.
///
/// Empty fragments are skipped. Leading separators of the first fragment and
/// trailing separators of the last one are kept as written.
pub fn join_fragments<'a, I>(fragments: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut joined = String::new();
    for fragment in fragments.into_iter().filter(|f| !f.is_empty()) {
        if joined.is_empty() {
            joined.push_str(fragment);
            continue;
        }
        if !joined.ends_with(is_separator) {
            joined.push(SEPARATOR);
        }
        joined.push_str(fragment.trim_start_matches(is_separator));
    }
    joined
}

/// Append a file name to a directory, guaranteeing one separator between them.
pub fn join_file_name(directory: &str, file_name: &str) -> String {
    let mut path = directory.to_string();
    if !path.ends_with(is_separator) {
        path.push(SEPARATOR);
    }
    path.push_str(file_name.trim_start_matches(is_separator));
    path
}

/// Prefix a literal source entry with the source base path.
///
/// An empty base leaves the entry untouched.
pub fn prefix_source(base: &str, entry: &str) -> String {
    if base.is_empty() {
        entry.to_string()
    } else {
        join_fragments([base, entry])
    }
}

/// Lowercase extension of the final path segment, if it has one.
///
/// A query or fragment suffix (`app.js?v=2`, `font.svg#icon`) is ignored.
pub fn extension_of(candidate: &str) -> Option<String> {
    let segment = candidate
        .rsplit(is_separator)
        .next()
        .unwrap_or(candidate);
    let segment = segment
        .split(['?', '#'])
        .next()
        .unwrap_or(segment);
    let (_, extension) = segment.rsplit_once('.')?;
    if extension.is_empty() {
        return None;
    }
    Some(extension.to_ascii_lowercase())
}

/// Resolve the configured base path against the working directory.
///
/// The result is normalized and always ends with a separator, so that
/// configured output directories can be appended directly.
pub fn resolve_base_path(cwd: &Path, base_path: &str) -> String {
    let base_path = if base_path.is_empty() { "./" } else { base_path };
    let resolved = cwd.join(base_path).clean();
    let mut resolved = resolved.to_string_lossy().into_owned();
    if !resolved.ends_with(is_separator) {
        resolved.push(SEPARATOR);
    }
    resolved
}
