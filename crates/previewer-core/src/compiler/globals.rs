//! Binding external modules to runtime globals.
//!
//! The bundle requires externals through `__external(id)`. Wrapping it here
//! supplies that function from a table built at compile time, so the
//! result runs in a plain `<script>` after the framework scripts have
//! defined their globals. Lookups happen on first require, not when the
//! wrapper is evaluated.

use crate::bundler::Bundle;
use crate::config::PreviewConfig;
use crate::text::js_string;
use std::fmt::Write as _;
use tracing::debug;

/// Wrap `bundle` so every external it references reads a runtime global.
///
/// An external whose global is undefined at require time throws
/// `Cannot find external module '<id>'`.
#[must_use]
pub fn wrap_externals(bundle: &Bundle, config: &PreviewConfig) -> String {
    let mut out = String::with_capacity(bundle.code.len() + 512);
    out.push_str("(function (__global) {\n\"use strict\";\nvar __externals = {\n");
    for specifier in &bundle.externals {
        let global = config.global_for(specifier);
        debug!(specifier = %specifier, global = %global, "Binding external to global");
        // Writing to a String cannot fail.
        let _ = writeln!(
            out,
            "  {}: function () {{ return __global.{global}; }},",
            js_string(specifier)
        );
    }
    out.push_str(
        r#"};
function __external(id) {
  var load = Object.prototype.hasOwnProperty.call(__externals, id) ? __externals[id] : null;
  var value = load ? load() : undefined;
  if (value === undefined) {
    throw new Error("Cannot find external module '" + id + "'");
  }
  return value;
}
"#,
    );
    out.push_str(&bundle.code);
    if !bundle.code.ends_with('\n') {
        out.push('\n');
    }
    out.push_str("})(typeof globalThis !== \"undefined\" ? globalThis : window);\n");
    out
}
