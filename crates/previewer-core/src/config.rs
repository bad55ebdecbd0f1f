//! Preview compiler configuration.
//!
//! Everything here has a default matching the stock preview document, so
//! `PreviewConfig::default()` is a complete, valid configuration. A config
//! can also be loaded from JSON text or a JSON file; missing fields fall back
//! to their defaults.

use crate::compiler::EsTarget;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use url::Url;

/// Pinned React UMD production build.
pub const DEFAULT_REACT_URL: &str = "https://unpkg.com/react@18.2.0/umd/react.production.min.js";

/// Pinned ReactDOM UMD production build.
pub const DEFAULT_REACT_DOM_URL: &str =
    "https://unpkg.com/react-dom@18.2.0/umd/react-dom.production.min.js";

/// Id of the DOM container the main component mounts into.
pub const DEFAULT_ROOT_ID: &str = "root";

/// Externals bound to the globals the pinned runtime scripts define. A
/// config may add entries but never drop or remap these.
pub const RESERVED_GLOBALS: [(&str, &str); 3] = [
    ("react", "React"),
    ("react-dom", "ReactDOM"),
    ("react-dom/client", "ReactDOM"),
];

/// Options for the generated stylesheet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleOptions {
    /// Minify the stylesheet with lightningcss.
    pub minify: bool,
    /// Add vendor prefixes for the default browser targets.
    pub autoprefixer: bool,
}

impl StyleOptions {
    /// Whether any post-processing pass is requested.
    #[must_use]
    pub fn needs_processing(&self) -> bool {
        self.minify || self.autoprefixer
    }
}

/// Configuration for a `Compiler`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Id of the root container element.
    pub root_id: String,
    /// Script URL providing the `React` global.
    pub react_url: String,
    /// Script URL providing the `ReactDOM` global.
    pub react_dom_url: String,
    /// External specifier -> runtime global name. Configured entries are
    /// merged over [`RESERVED_GLOBALS`].
    #[serde(deserialize_with = "deserialize_globals")]
    pub globals: BTreeMap<String, String>,
    /// JS syntax level of the emitted bundle.
    pub target: EsTarget,
    /// `lang` attribute of the document.
    pub lang: String,
    /// Inline style applied to `<body>`.
    pub body_style: String,
    /// Stylesheet post-processing.
    pub style: StyleOptions,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            root_id: DEFAULT_ROOT_ID.to_string(),
            react_url: DEFAULT_REACT_URL.to_string(),
            react_dom_url: DEFAULT_REACT_DOM_URL.to_string(),
            globals: reserved_globals(),
            target: EsTarget::ES2015,
            lang: "en".to_string(),
            body_style: "background-color:#fff".to_string(),
            style: StyleOptions::default(),
        }
    }
}

impl PreviewConfig {
    /// Parse a config from JSON text and validate it.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigParse` for malformed JSON and
    /// `Error::ConfigInvalid` when a value fails validation.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(text).map_err(|source| Error::ConfigParse { source })?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a JSON file and validate it.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigRead` if the file cannot be read, plus the
    /// errors of [`PreviewConfig::from_json`].
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Set the root container id.
    #[must_use]
    pub fn with_root_id(mut self, id: impl Into<String>) -> Self {
        self.root_id = id.into();
        self
    }

    /// Map an external specifier to a runtime global.
    #[must_use]
    pub fn with_global(mut self, specifier: impl Into<String>, global: impl Into<String>) -> Self {
        self.globals.insert(specifier.into(), global.into());
        self
    }

    /// Set the JS target.
    #[must_use]
    pub fn with_target(mut self, target: EsTarget) -> Self {
        self.target = target;
        self
    }

    /// Set stylesheet post-processing options.
    #[must_use]
    pub fn with_style(mut self, style: StyleOptions) -> Self {
        self.style = style;
        self
    }

    /// Check that every value can be embedded in the document safely.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConfigInvalid` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if !is_html_id(&self.root_id) {
            return Err(Error::ConfigInvalid(format!(
                "root_id '{}' must start with a letter and contain only letters, digits, '-' or '_'",
                self.root_id
            )));
        }

        for (field, value) in [("react_url", &self.react_url), ("react_dom_url", &self.react_dom_url)] {
            let url = Url::parse(value)
                .map_err(|e| Error::ConfigInvalid(format!("{field} '{value}' is not a URL: {e}")))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(Error::ConfigInvalid(format!(
                    "{field} '{value}' must use http or https"
                )));
            }
        }

        for (specifier, global) in RESERVED_GLOBALS {
            if self.globals.get(specifier).map(String::as_str) != Some(global) {
                return Err(Error::ConfigInvalid(format!(
                    "'{specifier}' must stay bound to the runtime global '{global}'"
                )));
            }
        }

        for (specifier, global) in &self.globals {
            if !is_global_path(global) {
                return Err(Error::ConfigInvalid(format!(
                    "global '{global}' for '{specifier}' is not a JavaScript identifier path"
                )));
            }
        }

        if self.lang.is_empty() || !self.lang.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(Error::ConfigInvalid(format!("lang '{}' is not a language tag", self.lang)));
        }

        Ok(())
    }

    /// Runtime global that satisfies `specifier`.
    ///
    /// Configured names win; anything else gets the UMD naming convention.
    #[must_use]
    pub fn global_for(&self, specifier: &str) -> String {
        self.globals
            .get(specifier)
            .cloned()
            .unwrap_or_else(|| umd_global_name(specifier))
    }
}

/// UMD-style global name for a package specifier.
///
/// `lucide-react` becomes `lucideReact`, `@scope/pkg` becomes `scopePkg`.
#[must_use]
pub fn umd_global_name(specifier: &str) -> String {
    let mut name = String::with_capacity(specifier.len());
    let mut upper_next = false;
    for c in specifier.chars() {
        if c.is_ascii_alphanumeric() {
            if upper_next && !name.is_empty() {
                name.push(c.to_ascii_uppercase());
            } else {
                name.push(c);
            }
            upper_next = false;
        } else {
            upper_next = true;
        }
    }
    if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    name
}

fn reserved_globals() -> BTreeMap<String, String> {
    RESERVED_GLOBALS
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

fn deserialize_globals<'de, D>(deserializer: D) -> std::result::Result<BTreeMap<String, String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let configured = BTreeMap::<String, String>::deserialize(deserializer)?;
    let mut globals = reserved_globals();
    globals.extend(configured);
    Ok(globals)
}

fn is_html_id(id: &str) -> bool {
    let mut chars = id.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn is_global_path(path: &str) -> bool {
    !path.is_empty()
        && path.split('.').all(|seg| {
            let mut chars = seg.chars();
            matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = PreviewConfig::default();
        config.validate().unwrap();
        assert_eq!(config.root_id, "root");
        assert_eq!(config.target, EsTarget::ES2015);
        assert_eq!(config.global_for("react"), "React");
        assert_eq!(config.global_for("react-dom"), "ReactDOM");
        assert_eq!(config.global_for("react-dom/client"), "ReactDOM");
    }

    #[test]
    fn test_umd_global_name() {
        assert_eq!(umd_global_name("lucide-react"), "lucideReact");
        assert_eq!(umd_global_name("@scope/pkg"), "scopePkg");
        assert_eq!(umd_global_name("lodash"), "lodash");
        assert_eq!(umd_global_name("3d-lib"), "_3dLib");
    }

    #[test]
    fn test_from_json_partial_uses_defaults() {
        let config = PreviewConfig::from_json(r#"{"root_id": "app", "style": {"minify": true}}"#)
            .unwrap();
        assert_eq!(config.root_id, "app");
        assert!(config.style.minify);
        assert!(!config.style.autoprefixer);
        assert_eq!(config.react_url, DEFAULT_REACT_URL);
    }

    #[test]
    fn test_from_json_rejects_bad_root_id() {
        let err = PreviewConfig::from_json(r#"{"root_id": "1 bad"}"#).unwrap_err();
        assert_eq!(err.code(), crate::codes::CONFIG_INVALID);
    }

    #[test]
    fn test_from_json_rejects_non_http_url() {
        let err = PreviewConfig::from_json(r#"{"react_url": "file:///tmp/react.js"}"#).unwrap_err();
        assert_eq!(err.code(), crate::codes::CONFIG_INVALID);

        let err = PreviewConfig::from_json(r#"{"react_dom_url": "not a url"}"#).unwrap_err();
        assert_eq!(err.code(), crate::codes::CONFIG_INVALID);
    }

    #[test]
    fn test_from_json_rejects_bad_global() {
        let err = PreviewConfig::from_json(r#"{"globals": {"x": "not-valid"}}"#).unwrap_err();
        assert_eq!(err.code(), crate::codes::CONFIG_INVALID);

        let ok = PreviewConfig::from_json(r#"{"globals": {"x": "window.Lib"}}"#).unwrap();
        assert_eq!(ok.global_for("x"), "window.Lib");
    }

    #[test]
    fn test_from_json_globals_merge_over_reserved() {
        let config =
            PreviewConfig::from_json(r#"{"globals": {"lucide-react": "LucideReact"}}"#).unwrap();
        assert_eq!(config.global_for("lucide-react"), "LucideReact");
        assert_eq!(config.global_for("react"), "React");
        assert_eq!(config.global_for("react-dom"), "ReactDOM");
        assert_eq!(config.global_for("react-dom/client"), "ReactDOM");
    }

    #[test]
    fn test_reserved_globals_cannot_be_remapped() {
        let err = PreviewConfig::from_json(r#"{"globals": {"react": "Preact"}}"#).unwrap_err();
        assert_eq!(err.code(), crate::codes::CONFIG_INVALID);

        let mut config = PreviewConfig::default();
        config.globals.remove("react-dom");
        assert_eq!(config.validate().unwrap_err().code(), crate::codes::CONFIG_INVALID);
    }

    #[test]
    fn test_from_json_parse_error() {
        let err = PreviewConfig::from_json("{").unwrap_err();
        assert_eq!(err.code(), crate::codes::CONFIG_PARSE_ERROR);
    }

    #[test]
    fn test_builders() {
        let config = PreviewConfig::default()
            .with_root_id("mount")
            .with_global("lucide-react", "LucideReact")
            .with_target(EsTarget::ES2020)
            .with_style(StyleOptions {
                minify: true,
                autoprefixer: false,
            });
        assert_eq!(config.root_id, "mount");
        assert_eq!(config.global_for("lucide-react"), "LucideReact");
        assert_eq!(config.target, EsTarget::ES2020);
        assert!(config.style.needs_processing());
    }
}
