//! The compile pipeline: component files in, preview document out.
//!
//! ```text
//! files -> VFS -> entry -> bundle -> externals wrapper -> stylesheet -> HTML
//! ```
//!
//! Every stage runs fresh per call. The only state that survives a call is
//! the shared toolchain and a one-entry cache of the last document.

use crate::bundler::{BundleOptions, Bundler};
use crate::compiler::wrap_externals;
use crate::config::PreviewConfig;
use crate::css::StyleGenerator;
use crate::document::assemble_document;
use crate::entry::synthesize_entry;
use crate::error::{Error, Result};
use crate::files::{fingerprint, main_index, parse_component_files, ComponentFile};
use crate::toolchain::{self, ToolchainCell};
use crate::vfs::{normalize_filename, VirtualFileSystem};
use crate::codes;
use serde_json::Value;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;
use tracing::{debug, info};

/// A compiled preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewDocument {
    /// The complete HTML document.
    pub html: String,
    /// Digest of the input files; lets a host discard stale results.
    pub fingerprint: String,
    /// Bundled module paths in emission order, entry last.
    pub modules: Vec<String>,
    /// External specifiers the bundle reads from runtime globals.
    pub externals: BTreeSet<String>,
    /// Class names that produced a CSS rule.
    pub classes: BTreeSet<String>,
}

/// Compiles component files into preview documents.
pub struct Compiler {
    config: PreviewConfig,
    toolchain: Arc<ToolchainCell>,
    last: Mutex<Option<PreviewDocument>>,
}

impl Compiler {
    /// Create a compiler over the process-wide toolchain.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigInvalid` if `config` fails validation.
    pub fn new(config: PreviewConfig) -> Result<Self> {
        Self::with_toolchain(config, toolchain::shared())
    }

    /// Create a compiler over a specific toolchain cell.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigInvalid` if `config` fails validation.
    pub fn with_toolchain(config: PreviewConfig, toolchain: Arc<ToolchainCell>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            toolchain,
            last: Mutex::new(None),
        })
    }

    #[must_use]
    pub fn config(&self) -> &PreviewConfig {
        &self.config
    }

    /// Compile `files` into a preview document.
    ///
    /// The main component is the first file flagged `is_main`, else the
    /// first file.
    ///
    /// # Errors
    ///
    /// - `Error::NoInput` for an empty file list
    /// - `Error::InvalidFilename` for a name the flat VFS cannot hold
    /// - `Error::ToolchainInit` if the toolchain cannot be built
    /// - `Error::ModuleNotFound` for an unresolvable relative import
    /// - `Error::BundleFailure` for parse or transform failures
    pub async fn compile(&self, files: &[ComponentFile]) -> Result<PreviewDocument> {
        let main = main_index(files).ok_or(Error::NoInput)?;
        let fingerprint = fingerprint(files);

        if let Some(doc) = self.cached(&fingerprint) {
            debug!(fingerprint = %fingerprint, "Reusing last compiled document");
            return Ok(doc);
        }

        let start = Instant::now();
        let vfs = VirtualFileSystem::from_files(files)?;
        let main = normalize_filename(&files[main].filename)?;
        debug!(files = vfs.len(), main = %main, "Registered component files");

        let entry = synthesize_entry(&vfs, &main, &self.config.root_id)?;
        let toolchain = self.toolchain.get().await?;

        let config = self.config.clone();
        let fp = fingerprint.clone();
        let doc = tokio::task::spawn_blocking(move || {
            let options = BundleOptions {
                target: config.target,
                minify: false,
            };
            let bundle = Bundler::new(toolchain.backend(), options).bundle(&entry, &vfs)?;
            let js = wrap_externals(&bundle, &config);
            let sheet = StyleGenerator::new(toolchain.theme(), config.style).generate(&js);
            let html = assemble_document(&js, &sheet.css, &config);
            Ok::<_, Error>(PreviewDocument {
                html,
                fingerprint: fp,
                modules: bundle.modules,
                externals: bundle.externals,
                classes: sheet.classes,
            })
        })
        .await
        .map_err(|e| {
            Error::bundle(
                codes::BUNDLE_INTERNAL_ERROR,
                format!("compile task failed: {e}"),
                None,
            )
        })??;

        info!(
            modules = doc.modules.len(),
            classes = doc.classes.len(),
            bytes = doc.html.len(),
            elapsed_ms = start.elapsed().as_millis(),
            "Compiled preview"
        );

        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = Some(doc.clone());
        Ok(doc)
    }

    /// Compile input in any shape accepted by [`parse_component_files`].
    ///
    /// # Errors
    ///
    /// As [`Compiler::compile`]; input that yields no files is `NoInput`.
    pub async fn compile_value(&self, input: &Value) -> Result<PreviewDocument> {
        let files = parse_component_files(input);
        self.compile(&files).await
    }

    fn cached(&self, fingerprint: &str) -> Option<PreviewDocument> {
        let last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        last.as_ref()
            .filter(|doc| doc.fingerprint == fingerprint)
            .cloned()
    }
}

impl std::fmt::Debug for Compiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compiler")
            .field("config", &self.config)
            .field("toolchain", &self.toolchain)
            .finish_non_exhaustive()
    }
}

/// Compile `files` with the default configuration and return the HTML.
///
/// # Errors
///
/// As [`Compiler::compile`].
pub async fn compile_preview(files: &[ComponentFile]) -> Result<String> {
    let compiler = Compiler::new(PreviewConfig::default())?;
    Ok(compiler.compile(files).await?.html)
}
