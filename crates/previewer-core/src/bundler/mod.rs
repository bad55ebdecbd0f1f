//! Static bundler for the virtual filesystem.
//!
//! Bundles the entry module and every VFS file it reaches into one script.
//!
//! ## Architecture
//!
//! 1. **Transform** - Transpile each module (TS → JS, JSX → `React.createElement`)
//! 2. **Link** - Rewrite `import`/`export` into registry `__require` calls,
//!    resolving each specifier through the `ModuleResolver`
//! 3. **Graph** - Queue newly reached modules until the walk is closed
//! 4. **Emit** - Write the registry runtime, one function per module, and
//!    the entry require
//!
//! Failure is all-or-nothing: the first unresolved import, parse error or
//! unsupported declaration aborts the whole bundle.

mod emit;
mod graph;
mod link;

pub use emit::{emit_bundle, registry_key};
pub use graph::{Module, ModuleGraph, ModuleId};
pub use link::link_module;

use crate::compiler::{CompilerBackend, EsTarget, TranspileSpec};
use crate::entry::{EntryModule, ENTRY_FILENAME, ENTRY_ID};
use crate::error::{Error, Result};
use crate::resolver::ModuleResolver;
use crate::vfs::VirtualFileSystem;
use crate::codes;
use std::collections::{BTreeSet, VecDeque};
use tracing::{debug, info};

/// Bundle options.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundleOptions {
    /// Target syntax level of each transpiled module.
    pub target: EsTarget,
    /// Minify each transpiled module.
    pub minify: bool,
}

/// One compiled unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    /// Bundled code. Externals are reached through `__external`.
    pub code: String,
    /// External specifiers referenced anywhere in the graph.
    pub externals: BTreeSet<String>,
    /// Module paths in emission order; the entry comes last.
    pub modules: Vec<String>,
}

/// Error raised inside a bundling step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleError {
    pub code: &'static str,
    pub message: String,
    pub path: Option<String>,
}

impl BundleError {
    /// Create a bundle error.
    #[must_use]
    pub fn new(code: &'static str, message: impl Into<String>, path: Option<String>) -> Self {
        Self {
            code,
            message: message.into(),
            path,
        }
    }
}

impl std::fmt::Display for BundleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(path) = &self.path {
            write!(f, "{}: {} ({})", self.code, self.message, path)
        } else {
            write!(f, "{}: {}", self.code, self.message)
        }
    }
}

impl std::error::Error for BundleError {}

impl From<BundleError> for Error {
    fn from(err: BundleError) -> Self {
        Error::bundle(err.code, err.message, err.path)
    }
}

/// The bundler. Borrows the backend of the shared toolchain.
pub struct Bundler<'a> {
    backend: &'a dyn CompilerBackend,
    options: BundleOptions,
}

impl<'a> Bundler<'a> {
    /// Create a bundler over `backend`.
    #[must_use]
    pub fn new(backend: &'a dyn CompilerBackend, options: BundleOptions) -> Self {
        Self { backend, options }
    }

    /// Bundle `entry` and everything it statically reaches in `vfs`.
    ///
    /// # Errors
    ///
    /// Returns `Error::ModuleNotFound` for a relative import with no
    /// matching file and `Error::BundleFailure` for parse, transform or
    /// linking failures.
    pub fn bundle(&self, entry: &EntryModule, vfs: &VirtualFileSystem) -> Result<Bundle> {
        let resolver = ModuleResolver::new(vfs);
        let mut graph = ModuleGraph::new();
        let mut externals = BTreeSet::new();
        let mut queue = VecDeque::new();

        queue.push_back(graph.add(Module::pending(ENTRY_ID)));

        while let Some(id) = queue.pop_front() {
            let path = graph
                .get(id)
                .map(|m| m.path.clone())
                .ok_or_else(|| missing_module(id))?;

            let (filename, source) = if path == ENTRY_ID {
                (ENTRY_FILENAME, entry.source.as_str())
            } else {
                let source = vfs.get(&path).ok_or_else(|| {
                    Error::bundle(
                        codes::BUNDLE_INTERNAL_ERROR,
                        "resolved module is missing from the virtual filesystem",
                        Some(path.clone()),
                    )
                })?;
                (path.as_str(), source)
            };

            let spec = TranspileSpec::new(filename)
                .with_target(self.options.target)
                .with_minify(self.options.minify);
            let output = self
                .backend
                .transpile(&spec, source)
                .map_err(|e| e.into_bundle_error(&path))?;

            let mut deps = Vec::new();
            let code = link_module::<Error>(&path, &output.code, &mut |specifier: &str| {
                match resolver.resolve_import(specifier, &path)? {
                    Some(name) => {
                        let key = registry_key(&name);
                        deps.push(name);
                        Ok(key)
                    }
                    None => {
                        externals.insert(specifier.to_string());
                        Ok(specifier.to_string())
                    }
                }
            })?;

            let mut dependencies = Vec::with_capacity(deps.len());
            for dep in deps {
                let known = graph.id_by_path(&dep);
                let dep_id = graph.add(Module::pending(dep));
                if known.is_none() {
                    queue.push_back(dep_id);
                }
                if !dependencies.contains(&dep_id) {
                    dependencies.push(dep_id);
                }
            }

            debug!(module = %path, deps = dependencies.len(), "Linked module");
            let module = graph.get_mut(id).ok_or_else(|| missing_module(id))?;
            module.code = code;
            module.dependencies = dependencies;
        }

        let mut order = graph.toposort();
        // The entry runs last through the trailing require; keep it last in
        // the text as well.
        if let Some(entry_id) = graph.id_by_path(ENTRY_ID) {
            order.retain(|&id| id != entry_id);
            order.push(entry_id);
        }

        let code = emit_bundle(&graph, &order, ENTRY_ID);
        let modules = order
            .iter()
            .filter_map(|&id| graph.get(id).map(|m| m.path.clone()))
            .collect();

        info!(
            modules = graph.len(),
            externals = externals.len(),
            bytes = code.len(),
            "Bundled component"
        );

        Ok(Bundle {
            code,
            externals,
            modules,
        })
    }
}

fn missing_module(id: ModuleId) -> Error {
    Error::bundle(
        codes::BUNDLE_INTERNAL_ERROR,
        format!("module {id} is missing from the graph"),
        None,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::SwcBackend;
    use crate::entry::synthesize_entry;
    use crate::files::ComponentFile;

    fn bundle_files(files: &[ComponentFile], main: &str) -> Result<Bundle> {
        let vfs = VirtualFileSystem::from_files(files).unwrap();
        let entry = synthesize_entry(&vfs, main, "root").unwrap();
        let backend = SwcBackend::new();
        Bundler::new(&backend, BundleOptions::default()).bundle(&entry, &vfs)
    }

    #[test]
    fn test_bundle_single_file() {
        let bundle = bundle_files(
            &[ComponentFile::new(
                "Section.tsx",
                "export default () => <div className='p-4'>Hi</div>;",
            )
            .main()],
            "Section.tsx",
        )
        .unwrap();

        assert_eq!(bundle.modules, vec!["Section.tsx", ENTRY_ID]);
        assert!(bundle.code.contains("__modules[\"./Section.tsx\"]"));
        assert!(bundle.code.contains("React.createElement"));
        assert!(bundle.code.contains("\"p-4\""));
        assert!(!bundle.code.contains("<div"));
        assert!(bundle.externals.contains("react"));
        assert!(bundle.externals.contains("react-dom"));
    }

    #[test]
    fn test_bundle_resolves_without_extension() {
        let bundle = bundle_files(
            &[
                ComponentFile::new(
                    "Header.tsx",
                    "import Footer from './Footer';\nexport default function Header() { return <header><Footer /></header>; }",
                )
                .main(),
                ComponentFile::new(
                    "Footer.tsx",
                    "export default function Footer(): JSX.Element { return <footer>bye</footer>; }",
                ),
            ],
            "Header.tsx",
        )
        .unwrap();

        assert!(bundle.modules.contains(&"Header.tsx".to_string()));
        assert!(bundle.modules.contains(&"Footer.tsx".to_string()));
        assert!(bundle.code.contains("__require(\"./Footer.tsx\")"));
        let footer = bundle.modules.iter().position(|m| m == "Footer.tsx").unwrap();
        let header = bundle.modules.iter().position(|m| m == "Header.tsx").unwrap();
        assert!(footer < header);
    }

    #[test]
    fn test_bundle_missing_import_fails() {
        let err = bundle_files(
            &[ComponentFile::new(
                "Header.tsx",
                "import Missing from './Missing';\nexport default () => <Missing />;",
            )
            .main()],
            "Header.tsx",
        )
        .unwrap_err();

        assert!(matches!(
            err,
            Error::ModuleNotFound { ref specifier, ref importer }
                if specifier == "./Missing" && importer == "Header.tsx"
        ));
    }

    #[test]
    fn test_bundle_parse_error_names_module() {
        let err = bundle_files(
            &[ComponentFile::new("Broken.tsx", "export default () => <div>").main()],
            "Broken.tsx",
        )
        .unwrap_err();

        match err {
            Error::BundleFailure { code, path, .. } => {
                assert_eq!(code, codes::BUNDLE_PARSE_ERROR);
                assert_eq!(path.as_deref(), Some("Broken.tsx"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_bundle_react_is_external_despite_vfs_file() {
        let bundle = bundle_files(
            &[
                ComponentFile::new(
                    "App.tsx",
                    "import React from 'react';\nexport default function App() { return <p>{React.version}</p>; }",
                )
                .main(),
                ComponentFile::new("react.tsx", "export default 1;"),
            ],
            "App.tsx",
        )
        .unwrap();

        assert!(bundle.externals.contains("react"));
        assert!(bundle.code.contains("__require(\"react\")"));
    }

    #[test]
    fn test_bundle_modules_keep_scope() {
        let bundle = bundle_files(
            &[
                ComponentFile::new("A.tsx", "const label = 'a';\nexport default () => <span>{label}</span>;").main(),
                ComponentFile::new("B.tsx", "const label = 'b';\nexport default () => <span>{label}</span>;"),
            ],
            "A.tsx",
        )
        .unwrap();

        assert!(bundle.code.contains("__modules[\"./A.tsx\"] = function (__module, __exports, __require) {"));
        assert!(bundle.code.contains("__modules[\"./B.tsx\"] = function (__module, __exports, __require) {"));
    }
}
