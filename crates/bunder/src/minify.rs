//! Per-extension minifiers.
//!
//! JavaScript goes through the oxc parser, minifier and codegen; CSS through
//! lightningcss. Both operate on a whole concatenated bundle at once.

use std::fmt;

use lightningcss::stylesheet::{MinifyOptions, ParserOptions, PrinterOptions, StyleSheet};
use oxc_allocator::Allocator;
use oxc_codegen::{Codegen, CodegenOptions};
use oxc_minifier::{Minifier as OxcMinifier, MinifierOptions};
use oxc_parser::Parser;
use oxc_span::SourceType;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MinifyError {
    #[error("failed to parse {filename}: {message}")]
    Parse { filename: String, message: String },

    #[error("failed to minify {filename}: {message}")]
    Minify { filename: String, message: String },

    #[error("failed to print {filename}: {message}")]
    Print { filename: String, message: String },

    #[error("{filename} is not valid UTF-8")]
    InvalidUtf8 { filename: String },
}

/// Minifier selected by a bundle's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Minifier {
    JavaScript,
    Css,
}

impl Minifier {
    /// The minifier registered for `extension`, if any.
    pub fn for_extension(extension: &str) -> Option<Self> {
        match extension {
            "js" => Some(Minifier::JavaScript),
            "css" => Some(Minifier::Css),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Minifier::JavaScript => "js",
            Minifier::Css => "css",
        }
    }

    /// Minify `source`; `filename` is only used in diagnostics.
    pub fn minify(self, source: &str, filename: &str) -> Result<String, MinifyError> {
        match self {
            Minifier::JavaScript => minify_js(source, filename),
            Minifier::Css => minify_css(source, filename),
        }
    }

    /// Minify raw bytes, rejecting content that is not UTF-8.
    pub fn minify_bytes(self, source: Vec<u8>, filename: &str) -> Result<String, MinifyError> {
        let source = String::from_utf8(source).map_err(|_| MinifyError::InvalidUtf8 {
            filename: filename.to_string(),
        })?;
        self.minify(&source, filename)
    }
}

impl fmt::Display for Minifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

fn minify_js(source: &str, filename: &str) -> Result<String, MinifyError> {
    let allocator = Allocator::default();
    // Bundled files are classic scripts, not ES modules.
    let source_type = SourceType::default().with_script(true);

    let ret = Parser::new(&allocator, source, source_type).parse();
    if ret.panicked || !ret.errors.is_empty() {
        let message = ret
            .errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(MinifyError::Parse {
            filename: filename.to_string(),
            message,
        });
    }

    let mut program = ret.program;
    let minified = OxcMinifier::new(MinifierOptions::default()).minify(&allocator, &mut program);

    let code = Codegen::new()
        .with_options(CodegenOptions {
            minify: true,
            ..CodegenOptions::default()
        })
        .with_scoping(minified.scoping)
        .build(&program)
        .code;

    Ok(code)
}

fn minify_css(source: &str, filename: &str) -> Result<String, MinifyError> {
    let mut stylesheet = StyleSheet::parse(
        source,
        ParserOptions {
            filename: filename.to_string(),
            ..Default::default()
        },
    )
    .map_err(|e| MinifyError::Parse {
        filename: filename.to_string(),
        message: e.to_string(),
    })?;

    stylesheet
        .minify(MinifyOptions::default())
        .map_err(|e| MinifyError::Minify {
            filename: filename.to_string(),
            message: e.to_string(),
        })?;

    let result = stylesheet
        .to_css(PrinterOptions {
            minify: true,
            ..Default::default()
        })
        .map_err(|e| MinifyError::Print {
            filename: filename.to_string(),
            message: e.to_string(),
        })?;

    Ok(result.code)
}
