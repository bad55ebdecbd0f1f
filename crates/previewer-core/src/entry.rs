//! Synthetic entry module.
//!
//! The entry imports the two reserved externals and every file in the VFS,
//! binds the main component to an internal alias, and mounts it into the
//! root container. Mounting feature-detects `ReactDOM.createRoot` and falls
//! back to the legacy `ReactDOM.render`.
//!
//! The entry is plain ES so it never goes through TypeScript's unused-import
//! elision: every imported file stays in the bundle.

use crate::codes;
use crate::error::{Error, Result};
use crate::text::js_string;
use crate::vfs::VirtualFileSystem;
use std::fmt::Write as _;

/// Registry id of the entry module. It has no recognized extension, so no
/// normalized VFS name can ever equal it.
pub const ENTRY_ID: &str = "__entry__";

/// Name the entry is transpiled under, selecting plain ES syntax.
pub const ENTRY_FILENAME: &str = "__entry__.js";

/// Reserved external providing the framework root object.
pub const REACT_SPECIFIER: &str = "react";

/// Reserved external providing the DOM renderer.
pub const REACT_DOM_SPECIFIER: &str = "react-dom";

const RESERVED_WORDS: &[&str] = &[
    "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default",
    "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for", "function",
    "if", "implements", "import", "in", "instanceof", "interface", "let", "new", "null",
    "package", "private", "protected", "public", "return", "static", "super", "switch", "this",
    "throw", "true", "try", "typeof", "var", "void", "while", "with", "yield", "arguments",
    "eval", "undefined", "NaN", "Infinity",
];

/// The synthesized entry module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryModule {
    /// Source text.
    pub source: String,
    /// Normalized name of the mounted file.
    pub main: String,
    /// `(identifier, normalized name)` for each imported file, in VFS order.
    pub bindings: Vec<(String, String)>,
}

/// Identifier a file is imported under.
///
/// The last extension is dropped, every character outside `[A-Za-z0-9_]`
/// becomes `_`, and a leading `_` is added when the result starts with a
/// digit or is a reserved word.
#[must_use]
pub fn sanitize_identifier(filename: &str) -> String {
    let stem = match filename.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => filename,
    };
    let mut ident: String = stem
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if ident.is_empty()
        || ident.starts_with(|c: char| c.is_ascii_digit())
        || RESERVED_WORDS.contains(&ident.as_str())
    {
        ident.insert(0, '_');
    }
    ident
}

/// Build the entry module for `vfs`, mounting `main` into `#root_id`.
///
/// # Errors
///
/// Returns a `BundleFailure` if `main` is not a file in `vfs`.
pub fn synthesize_entry(vfs: &VirtualFileSystem, main: &str, root_id: &str) -> Result<EntryModule> {
    if !vfs.contains(main) {
        return Err(Error::bundle(
            codes::BUNDLE_INTERNAL_ERROR,
            format!("main component '{main}' is not in the virtual filesystem"),
            None,
        ));
    }

    let bindings: Vec<(String, String)> = vfs
        .names()
        .map(|name| (sanitize_identifier(name), name.to_string()))
        .collect();

    let mut source = String::new();
    // Writing to a String cannot fail.
    let _ = writeln!(source, "import __React from {};", js_string(REACT_SPECIFIER));
    let _ = writeln!(source, "import __ReactDOM from {};", js_string(REACT_DOM_SPECIFIER));
    for (ident, name) in &bindings {
        let _ = writeln!(source, "import {ident} from {};", js_string(&format!("./{name}")));
    }

    let main_ident = bindings
        .iter()
        .find(|(_, name)| name == main)
        .map(|(ident, _)| ident.as_str())
        .unwrap_or_default();

    let _ = write!(
        source,
        r#"
const __PreviewMain = {main_ident};
function __PreviewApp() {{
  return __React.createElement(__React.Fragment, null, __React.createElement(__PreviewMain, null));
}}
const __previewContainer = document.getElementById({root});
if (typeof __ReactDOM.createRoot === "function") {{
  __ReactDOM.createRoot(__previewContainer).render(__React.createElement(__PreviewApp, null));
}} else {{
  __ReactDOM.render(__React.createElement(__PreviewApp, null), __previewContainer);
}}
"#,
        root = js_string(root_id),
    );

    Ok(EntryModule {
        source,
        main: main.to_string(),
        bindings,
    })
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::files::ComponentFile;

    #[test]
    fn test_sanitize_identifier() {
        assert_eq!(sanitize_identifier("Header.tsx"), "Header");
        assert_eq!(sanitize_identifier("my-card.v2.tsx"), "my_card_v2");
        assert_eq!(sanitize_identifier("2col.tsx"), "_2col");
        assert_eq!(sanitize_identifier("default.tsx"), "_default");
        assert_eq!(sanitize_identifier("Ünï.tsx"), "_n_");
    }

    #[test]
    fn test_entry_imports_every_file_and_mounts_main() {
        let vfs = VirtualFileSystem::from_files(&[
            ComponentFile::new("Header.tsx", ""),
            ComponentFile::new("Footer", ""),
        ])
        .unwrap();

        let entry = synthesize_entry(&vfs, "Footer.tsx", "root").unwrap();

        assert!(entry.source.contains("import __React from \"react\";"));
        assert!(entry.source.contains("import __ReactDOM from \"react-dom\";"));
        assert!(entry.source.contains("import Header from \"./Header.tsx\";"));
        assert!(entry.source.contains("import Footer from \"./Footer.tsx\";"));
        assert!(entry.source.contains("const __PreviewMain = Footer;"));
        assert!(entry.source.contains("document.getElementById(\"root\")"));
        assert!(entry.source.contains("typeof __ReactDOM.createRoot === \"function\""));
        assert!(entry.source.contains("__ReactDOM.render("));
        assert_eq!(entry.main, "Footer.tsx");
        assert_eq!(entry.bindings.len(), 2);
    }

    #[test]
    fn test_entry_unknown_main_is_error() {
        let vfs = VirtualFileSystem::from_files(&[ComponentFile::new("A.tsx", "")]).unwrap();
        let err = synthesize_entry(&vfs, "B.tsx", "root").unwrap_err();
        assert_eq!(err.code(), codes::BUNDLE_INTERNAL_ERROR);
    }

    #[test]
    fn test_entry_id_never_collides_with_vfs_names() {
        let name = crate::vfs::normalize_filename(ENTRY_ID).unwrap();
        assert_ne!(name, ENTRY_ID);
    }
}
