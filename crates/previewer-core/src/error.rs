use crate::codes;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for preview compilation.
///
/// Every variant is fatal for the compile call that produced it; no partial
/// document is ever returned alongside one.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Cannot resolve '{specifier}' from '{importer}': no matching file in the virtual filesystem")]
    ModuleNotFound { specifier: String, importer: String },

    #[error("{code}: {message}{}", path.as_deref().map(|p| format!(" ({p})")).unwrap_or_default())]
    BundleFailure {
        code: &'static str,
        message: String,
        path: Option<String>,
    },

    #[error("Toolchain initialization failed: {0}")]
    ToolchainInit(String),

    #[error("No component files to compile")]
    NoInput,

    #[error("Invalid component filename '{0}': the virtual filesystem is flat, names must be non-empty and contain no path separators")]
    InvalidFilename(String),

    #[error("Failed to read config at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {source}")]
    ConfigParse {
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid config: {0}")]
    ConfigInvalid(String),
}

impl Error {
    /// Build a bundle failure with an optional module path.
    #[must_use]
    pub fn bundle(code: &'static str, message: impl Into<String>, path: Option<String>) -> Self {
        Self::BundleFailure {
            code,
            message: message.into(),
            path,
        }
    }

    /// Stable machine-readable code for this error.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::ModuleNotFound { .. } => codes::MODULE_NOT_FOUND,
            Self::BundleFailure { code, .. } => code,
            Self::ToolchainInit(_) => codes::TOOLCHAIN_INIT_FAILED,
            Self::NoInput => codes::NO_INPUT,
            Self::InvalidFilename(_) => codes::INVALID_FILENAME,
            Self::ConfigRead { .. } => codes::CONFIG_READ_ERROR,
            Self::ConfigParse { .. } => codes::CONFIG_PARSE_ERROR,
            Self::ConfigInvalid(_) => codes::CONFIG_INVALID,
        }
    }
}
