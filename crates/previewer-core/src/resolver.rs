//! Import specifier resolution against the flat VFS.
//!
//! Relative-ness is the only discriminator between local and external
//! modules: `./x` and `../x` are looked up in the VFS, anything else is
//! external even when a file of the same name exists.

use crate::error::{Error, Result};
use crate::vfs::{VirtualFileSystem, EXTENSIONS};
use tracing::trace;

/// Outcome of resolving one specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleSpecifier {
    /// A file in the VFS, by normalized name.
    Resolved(String),
    /// Left to a runtime global.
    External,
    /// Relative, but no file matched.
    NotFound,
}

/// Resolves import specifiers for one compile call.
#[derive(Debug, Clone, Copy)]
pub struct ModuleResolver<'a> {
    vfs: &'a VirtualFileSystem,
}

impl<'a> ModuleResolver<'a> {
    /// Create a resolver over `vfs`.
    #[must_use]
    pub fn new(vfs: &'a VirtualFileSystem) -> Self {
        Self { vfs }
    }

    /// Classify `specifier`.
    ///
    /// A relative specifier has its `./` or `../` prefix stripped; the bare
    /// name is tried as-is, then with each of `.tsx`, `.ts`, `.jsx`, `.js`
    /// appended, first hit wins.
    #[must_use]
    pub fn resolve(&self, specifier: &str) -> ModuleSpecifier {
        let Some(bare) = strip_relative_prefix(specifier) else {
            return ModuleSpecifier::External;
        };

        if self.vfs.contains(bare) {
            return ModuleSpecifier::Resolved(bare.to_string());
        }

        for ext in EXTENSIONS {
            let candidate = format!("{bare}.{ext}");
            trace!(specifier, candidate = %candidate, "Trying candidate");
            if self.vfs.contains(&candidate) {
                return ModuleSpecifier::Resolved(candidate);
            }
        }

        ModuleSpecifier::NotFound
    }

    /// Resolve an import of `importer`, turning `NotFound` into an error.
    ///
    /// Returns `Ok(None)` for externals.
    ///
    /// # Errors
    ///
    /// Returns `Error::ModuleNotFound` when a relative specifier matches no
    /// file.
    pub fn resolve_import(&self, specifier: &str, importer: &str) -> Result<Option<String>> {
        match self.resolve(specifier) {
            ModuleSpecifier::Resolved(name) => Ok(Some(name)),
            ModuleSpecifier::External => Ok(None),
            ModuleSpecifier::NotFound => Err(Error::ModuleNotFound {
                specifier: specifier.to_string(),
                importer: importer.to_string(),
            }),
        }
    }
}

/// Whether `specifier` names a local module.
#[must_use]
pub fn is_relative(specifier: &str) -> bool {
    strip_relative_prefix(specifier).is_some()
}

fn strip_relative_prefix(specifier: &str) -> Option<&str> {
    specifier
        .strip_prefix("./")
        .or_else(|| specifier.strip_prefix("../"))
}
