//! Utility-first CSS generation.
//!
//! The compiled JS is scanned for class-name candidates and a rule is
//! emitted for every candidate that resolves against the fixed theme. The
//! stylesheet always carries three layers in order:
//! - base: element resets
//! - components: `container`, when used
//! - utilities: one rule per resolved candidate
//!
//! Candidates that do not resolve are dropped. Generation never fails; the
//! optional lightningcss pass falls back to the unprocessed text.

pub mod scan;
pub mod theme;
pub mod utilities;
pub mod variants;

use crate::config::StyleOptions;
use lightningcss::printer::PrinterOptions;
use lightningcss::rules::CssRule;
use lightningcss::stylesheet::{MinifyOptions, ParserOptions};
use lightningcss::targets::{Browsers, Targets};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Write as _;
use tracing::{debug, trace, warn};

pub use theme::Theme;
use scan::{escape_class, extract_candidates, parse_candidate};
use utilities::{resolve_utility, Plugin};
use variants::{breakpoint_queries, VariantContext};

/// Element resets emitted ahead of everything else.
const PREFLIGHT: &str = r#"*,
::before,
::after {
  box-sizing: border-box;
  border-width: 0;
  border-style: solid;
  border-color: #e5e7eb;
}
html,
:host {
  line-height: 1.5;
  -webkit-text-size-adjust: 100%;
  tab-size: 4;
  font-family: ui-sans-serif, system-ui, sans-serif, "Apple Color Emoji", "Segoe UI Emoji", "Segoe UI Symbol", "Noto Color Emoji";
}
body {
  margin: 0;
  line-height: inherit;
}
hr {
  height: 0;
  color: inherit;
  border-top-width: 1px;
}
h1, h2, h3, h4, h5, h6 {
  font-size: inherit;
  font-weight: inherit;
}
a {
  color: inherit;
  text-decoration: inherit;
}
b, strong {
  font-weight: bolder;
}
code, kbd, samp, pre {
  font-family: ui-monospace, SFMono-Regular, Menlo, Monaco, Consolas, "Liberation Mono", "Courier New", monospace;
  font-size: 1em;
}
small {
  font-size: 80%;
}
table {
  text-indent: 0;
  border-color: inherit;
  border-collapse: collapse;
}
button, input, optgroup, select, textarea {
  font-family: inherit;
  font-size: 100%;
  font-weight: inherit;
  line-height: inherit;
  color: inherit;
  margin: 0;
  padding: 0;
}
button, select {
  text-transform: none;
}
button, [type="button"], [type="reset"], [type="submit"] {
  -webkit-appearance: button;
  background-color: transparent;
  background-image: none;
}
blockquote, dl, dd, h1, h2, h3, h4, h5, h6, hr, figure, p, pre {
  margin: 0;
}
fieldset {
  margin: 0;
  padding: 0;
}
ol, ul, menu {
  list-style: none;
  margin: 0;
  padding: 0;
}
textarea {
  resize: vertical;
}
input::placeholder, textarea::placeholder {
  opacity: 1;
  color: #9ca3af;
}
button, [role="button"] {
  cursor: pointer;
}
:disabled {
  cursor: default;
}
img, svg, video, canvas, audio, iframe, embed, object {
  display: block;
  vertical-align: middle;
}
img, video {
  max-width: 100%;
  height: auto;
}
[hidden] {
  display: none;
}
"#;

/// Class name of the component-layer container.
const CONTAINER: &str = "container";

/// Generated stylesheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleSheet {
    /// Final CSS text.
    pub css: String,
    /// Class names that produced a rule.
    pub classes: BTreeSet<String>,
}

/// Generates the stylesheet for one compile.
#[derive(Debug, Clone, Copy)]
pub struct StyleGenerator<'a> {
    theme: &'a Theme,
    options: StyleOptions,
}

/// Sort key: variant rank, rule group, class name.
type RuleKey<'t> = (u32, Plugin, &'t str);

impl<'a> StyleGenerator<'a> {
    #[must_use]
    pub fn new(theme: &'a Theme, options: StyleOptions) -> Self {
        Self { theme, options }
    }

    /// Generate the stylesheet for the class names found in `js`.
    #[must_use]
    pub fn generate(&self, js: &str) -> StyleSheet {
        let mut rules: BTreeMap<RuleKey<'_>, String> = BTreeMap::new();
        let mut container = false;
        let mut dropped = 0usize;

        for raw in extract_candidates(js) {
            if raw == CONTAINER {
                container = true;
                continue;
            }
            match self.rule_for(raw) {
                Some((key, text)) => {
                    rules.insert(key, text);
                }
                None => {
                    dropped += 1;
                    trace!(token = raw, "Dropped class candidate");
                }
            }
        }

        let mut css = String::with_capacity(PREFLIGHT.len() + rules.len() * 64 + 256);
        css.push_str("/* base */\n");
        css.push_str(PREFLIGHT);
        css.push_str("/* components */\n");
        if container {
            write_container(&mut css);
        }
        css.push_str("/* utilities */\n");
        for text in rules.values() {
            css.push_str(text);
        }

        let mut classes: BTreeSet<String> =
            rules.keys().map(|(_, _, raw)| (*raw).to_string()).collect();
        if container {
            classes.insert(CONTAINER.to_string());
        }
        debug!(rules = classes.len(), dropped, "Generated utility stylesheet");

        let css = if self.options.needs_processing() {
            match process_css(&css, &self.options) {
                Ok(processed) => processed,
                Err(e) => {
                    warn!(error = %e, "CSS post-processing failed, using unprocessed stylesheet");
                    css
                }
            }
        } else {
            css
        };

        StyleSheet { css, classes }
    }

    /// Resolve one candidate to its sort key and rule text.
    fn rule_for<'t>(&self, raw: &'t str) -> Option<(RuleKey<'t>, String)> {
        let candidate = parse_candidate(raw)?;
        let ctx = VariantContext::from_variants(&candidate.variants, self.theme)?;
        let rule = resolve_utility(candidate.utility, candidate.negative, self.theme)?;

        if rule.arbitrary {
            let mut candidate = String::new();
            write_rule(&mut candidate, ".x", &rule.declarations, false, "");
            if !is_valid_css(&candidate) {
                debug!(token = raw, "Rejected arbitrary value");
                return None;
            }
        }

        let selector = ctx.selector(&escape_class(raw), rule.child);
        let mut text = String::new();
        match ctx.media_query() {
            None => write_rule(&mut text, &selector, &rule.declarations, candidate.important, ""),
            Some(query) => {
                let _ = writeln!(text, "@media {query} {{");
                write_rule(&mut text, &selector, &rule.declarations, candidate.important, "  ");
                text.push_str("}\n");
            }
        }
        Some(((ctx.rank, rule.plugin, raw), text))
    }
}

fn write_rule(
    out: &mut String,
    selector: &str,
    declarations: &[(&str, String)],
    important: bool,
    indent: &str,
) {
    let bang = if important { " !important" } else { "" };
    let _ = writeln!(out, "{indent}{selector} {{");
    for (prop, value) in declarations {
        let _ = writeln!(out, "{indent}  {prop}: {value}{bang};");
    }
    let _ = writeln!(out, "{indent}}}");
}

fn write_container(out: &mut String) {
    out.push_str(".container {\n  width: 100%;\n}\n");
    for (width, query) in breakpoint_queries() {
        let _ = writeln!(
            out,
            "@media {query} {{\n  .container {{\n    max-width: {width};\n  }}\n}}"
        );
    }
}

/// Whether `rule` parses as a style rule with at least one declaration.
fn is_valid_css(rule: &str) -> bool {
    let Ok(sheet) = lightningcss::stylesheet::StyleSheet::parse(rule, ParserOptions::default())
    else {
        return false;
    };
    sheet.rules.0.iter().all(|rule| match rule {
        CssRule::Style(style) => {
            !style.declarations.declarations.is_empty()
                || !style.declarations.important_declarations.is_empty()
        }
        _ => false,
    })
}

/// Run a stylesheet through lightningcss: vendor prefixes for the default
/// browser targets and, optionally, minification.
pub fn process_css(source: &str, options: &StyleOptions) -> Result<String, CssError> {
    let mut stylesheet =
        lightningcss::stylesheet::StyleSheet::parse(source, ParserOptions::default())
            .map_err(|e| CssError::Parse(e.to_string()))?;

    let targets = if options.autoprefixer {
        default_browser_targets()
    } else {
        Browsers::default()
    };

    stylesheet
        .minify(MinifyOptions {
            targets: Targets::from(targets),
            ..Default::default()
        })
        .map_err(|e| CssError::Minify(e.to_string()))?;

    let output = stylesheet
        .to_css(PrinterOptions {
            minify: options.minify,
            targets: Targets::from(targets),
            ..Default::default()
        })
        .map_err(|e| CssError::Print(e.to_string()))?;

    Ok(output.code)
}

/// Chrome 80+, Firefox 75+, Safari 13+, Edge 80+.
fn default_browser_targets() -> Browsers {
    Browsers {
        chrome: Some(80 << 16),
        firefox: Some(75 << 16),
        safari: Some(13 << 16),
        edge: Some(80 << 16),
        ..Default::default()
    }
}

/// Stylesheet post-processing error.
#[derive(Debug, thiserror::Error)]
pub enum CssError {
    #[error("CSS parse error: {0}")]
    Parse(String),
    #[error("CSS minify error: {0}")]
    Minify(String),
    #[error("CSS print error: {0}")]
    Print(String),
}
