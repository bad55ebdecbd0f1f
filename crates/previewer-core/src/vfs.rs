//! Flat in-memory virtual filesystem.
//!
//! The VFS holds every component file for one compile call under its
//! normalized name. It is deliberately single-level: names never contain a
//! path separator, and relative imports can only reach siblings.
//!
//! ## Normalization
//!
//! A name without one of the recognized extensions gets `.tsx` appended;
//! extension matching is case-insensitive, the stored name keeps the
//! caller's casing. A leading `./` is dropped.
//!
//! ## Conflicts
//!
//! When two files normalize to the same key the later registration's
//! content wins, while the key keeps the position of its first
//! registration.

use crate::error::{Error, Result};
use crate::files::ComponentFile;
use rustc_hash::FxHashMap as HashMap;
use tracing::warn;

/// Extensions the VFS and resolver recognize, in resolution priority order.
pub const EXTENSIONS: [&str; 4] = ["tsx", "ts", "jsx", "js"];

/// Extension appended to names that carry none of [`EXTENSIONS`].
pub const DEFAULT_EXTENSION: &str = "tsx";

/// In-memory mapping of normalized filename to source text.
#[derive(Debug, Default, Clone)]
pub struct VirtualFileSystem {
    /// Files in first-registration order.
    entries: Vec<(String, String)>,
    /// Name to index into `entries`.
    index: HashMap<String, usize>,
}

impl VirtualFileSystem {
    /// Create an empty VFS.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a VFS from component files.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidFilename` for an empty name or one containing
    /// a path separator.
    pub fn from_files(files: &[ComponentFile]) -> Result<Self> {
        let mut vfs = Self::new();
        vfs.register(files)?;
        Ok(vfs)
    }

    /// Register files, normalizing each name.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidFilename` for the first unusable name; files
    /// before it stay registered.
    pub fn register(&mut self, files: &[ComponentFile]) -> Result<()> {
        for file in files {
            self.insert(&file.filename, &file.content)?;
        }
        Ok(())
    }

    /// Insert one file and return its normalized name.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidFilename` if the name cannot be normalized.
    pub fn insert(&mut self, filename: &str, content: &str) -> Result<String> {
        let name = normalize_filename(filename)?;
        if let Some(&idx) = self.index.get(&name) {
            warn!(
                file = %filename,
                normalized = %name,
                "Duplicate component file, later content replaces earlier"
            );
            self.entries[idx].1 = content.to_string();
        } else {
            self.index.insert(name.clone(), self.entries.len());
            self.entries.push((name.clone(), content.to_string()));
        }
        Ok(name)
    }

    /// Source text of a normalized name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.index
            .get(name)
            .map(|&idx| self.entries[idx].1.as_str())
    }

    /// Whether a normalized name is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Normalized names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// `(name, content)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, content)| (name.as_str(), content.as_str()))
    }

    /// Number of files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the VFS holds no files.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Normalize a caller-supplied filename into a VFS key.
///
/// # Errors
///
/// Returns `Error::InvalidFilename` for names that are empty or contain
/// `/` or `\` after the optional leading `./`.
pub fn normalize_filename(filename: &str) -> Result<String> {
    let trimmed = filename.trim();
    let name = trimmed.strip_prefix("./").unwrap_or(trimmed);

    if name.is_empty() || name.contains('/') || name.contains('\\') {
        return Err(Error::InvalidFilename(filename.to_string()));
    }

    if has_known_extension(name) {
        Ok(name.to_string())
    } else {
        Ok(format!("{name}.{DEFAULT_EXTENSION}"))
    }
}

/// Whether `name` ends in one of the recognized extensions.
#[must_use]
pub fn has_known_extension(name: &str) -> bool {
    name.rsplit_once('.').is_some_and(|(stem, ext)| {
        !stem.is_empty() && EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known))
    })
}
