//! Per-module transpile options and results.
//!
//! Two transpiles of the same source under equal specs produce identical
//! output, which keeps compiles of identical input identical.

use serde::{Deserialize, Serialize};

/// Syntax level of the emitted JavaScript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EsTarget {
    #[default]
    ES2015,
    ES2016,
    ES2017,
    ES2018,
    ES2019,
    ES2020,
    ES2021,
    ES2022,
    ESNext,
}

/// Location of a syntax error inside one virtual file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// 1-indexed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    /// 1-indexed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
}

impl Diagnostic {
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            file: None,
            line: None,
            column: None,
        }
    }

    #[must_use]
    pub fn with_location(mut self, file: impl Into<String>, line: u32, column: u32) -> Self {
        self.file = Some(file.into());
        self.line = Some(line);
        self.column = Some(column);
        self
    }
}

/// How to transpile one virtual module.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TranspileSpec {
    /// Normalized virtual filename; its extension selects the syntax.
    pub filename: String,
    pub target: EsTarget,
    pub minify: bool,
}

impl TranspileSpec {
    #[must_use]
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            target: EsTarget::default(),
            minify: false,
        }
    }

    #[must_use]
    pub fn with_target(mut self, target: EsTarget) -> Self {
        self.target = target;
        self
    }

    #[must_use]
    pub fn with_minify(mut self, minify: bool) -> Self {
        self.minify = minify;
        self
    }

    /// Lowercased extension of the filename, without the dot.
    #[must_use]
    pub fn extension(&self) -> String {
        self.filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default()
    }
}

/// A transpiled module, still in ES module form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranspileOutput {
    pub code: String,
}

impl TranspileOutput {
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self { code: code.into() }
    }
}
