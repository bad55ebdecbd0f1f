//! Compiler backend abstraction and the transform stage.
//!
//! Per-module transpilation (TypeScript stripping, classic JSX lowering,
//! target-level codegen) goes through the `CompilerBackend` trait so the
//! toolchain handle owns a backend object and never calls SWC directly.
//! The `globals` submodule finishes the bundle by binding external
//! specifiers to runtime globals.
//!
//! ## Usage
//!
//! ```ignore
//! use previewer_core::compiler::{CompilerBackend, SwcBackend, TranspileSpec};
//!
//! let backend = SwcBackend::new();
//! let spec = TranspileSpec::new("Section.tsx");
//! let output = backend.transpile(&spec, "export default () => <div />;")?;
//! println!("{}", output.code);
//! ```

pub mod globals;
pub mod spec;
pub mod swc;

pub use globals::wrap_externals;
pub use spec::{Diagnostic, EsTarget, TranspileOutput, TranspileSpec};
pub use swc::SwcBackend;

use crate::codes;
use crate::error::Error;
use std::fmt;

/// Error during compilation of a single module.
#[derive(Debug)]
pub struct CompilerError {
    /// Error code.
    pub code: &'static str,
    /// Human-readable error message.
    pub message: String,
    /// Compiler diagnostics (if available).
    pub diagnostics: Vec<Diagnostic>,
}

impl CompilerError {
    /// Create a new compiler error.
    #[must_use]
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            diagnostics: Vec::new(),
        }
    }

    /// Create an error with diagnostics.
    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: Vec<Diagnostic>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Create a parse error.
    #[must_use]
    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::new(codes::BUNDLE_PARSE_ERROR, message)
    }

    /// Create a transform error.
    #[must_use]
    pub fn transform_error(message: impl Into<String>) -> Self {
        Self::new(codes::BUNDLE_TRANSFORM_ERROR, message)
    }

    /// Create an error for a file the backend cannot compile.
    #[must_use]
    pub fn unsupported_file(message: impl Into<String>) -> Self {
        Self::new(codes::BUNDLE_UNSUPPORTED_SYNTAX, message)
    }

    /// Convert into a pipeline error attributed to `path`.
    ///
    /// The first located diagnostic is folded into the message so a caller
    /// that only shows `Error`'s display still sees where parsing stopped.
    #[must_use]
    pub fn into_bundle_error(self, path: &str) -> Error {
        let location = self.diagnostics.iter().find_map(|d| match (d.line, d.column) {
            (Some(line), Some(col)) => Some(format!(" at {line}:{col}")),
            _ => None,
        });
        let message = match location {
            Some(loc) => format!("{}{loc}", self.message),
            None => self.message,
        };
        Error::bundle(self.code, message, Some(path.to_string()))
    }
}

impl fmt::Display for CompilerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)?;
        for diag in &self.diagnostics {
            write!(f, "\n  - {}", diag.message)?;
            if let (Some(file), Some(line), Some(col)) = (&diag.file, diag.line, diag.column) {
                write!(f, " at {file}:{line}:{col}")?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for CompilerError {}

/// Compiler backend trait for transpilation.
///
/// The trait is `Send + Sync` so one backend can sit behind the shared
/// toolchain handle and serve every compile call.
pub trait CompilerBackend: Send + Sync {
    /// Get the backend name (e.g., "swc").
    fn name(&self) -> &'static str;

    /// Transpile one module as described by `spec`.
    ///
    /// The output keeps its `import`/`export` declarations; linking them
    /// into the bundle registry is the bundler's job.
    ///
    /// # Errors
    ///
    /// Returns a `CompilerError` if the source has syntax errors, the
    /// transformation fails, or the file type is unsupported.
    fn transpile(&self, spec: &TranspileSpec, source: &str) -> Result<TranspileOutput, CompilerError>;

    /// Check if this backend supports the given file extension.
    fn supports_extension(&self, ext: &str) -> bool {
        matches!(ext.to_lowercase().as_str(), "js" | "jsx" | "ts" | "tsx")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compiler_error_display() {
        let error = CompilerError::parse_error("Unexpected token");
        assert!(error.to_string().contains("BUNDLE_PARSE_ERROR"));
        assert!(error.to_string().contains("Unexpected token"));
    }

    #[test]
    fn test_compiler_error_with_diagnostics() {
        let diag = Diagnostic::error("Missing semicolon").with_location("App.tsx", 10, 5);

        let error = CompilerError::parse_error("Parse failed").with_diagnostics(vec![diag]);

        let display = error.to_string();
        assert!(display.contains("App.tsx:10:5"));
        assert!(display.contains("Missing semicolon"));
    }

    #[test]
    fn test_into_bundle_error_carries_location() {
        let diag = Diagnostic::error("Expected '}'").with_location("Card.tsx", 3, 14);
        let err = CompilerError::parse_error("Expected '}'")
            .with_diagnostics(vec![diag])
            .into_bundle_error("Card.tsx");

        assert_eq!(err.code(), codes::BUNDLE_PARSE_ERROR);
        let msg = err.to_string();
        assert!(msg.contains("at 3:14"), "{msg}");
        assert!(msg.contains("(Card.tsx)"), "{msg}");
    }

    #[test]
    fn test_default_extension_support() {
        let backend = SwcBackend::new();

        assert!(backend.supports_extension("js"));
        assert!(backend.supports_extension("jsx"));
        assert!(backend.supports_extension("ts"));
        assert!(backend.supports_extension("tsx"));
        assert!(backend.supports_extension("TSX"));

        assert!(!backend.supports_extension("css"));
        assert!(!backend.supports_extension("json"));
    }
}
