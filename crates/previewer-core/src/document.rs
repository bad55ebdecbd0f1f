//! Preview document assembly.
//!
//! The runtime scripts are `defer`red, so they run in order after parsing and
//! before `DOMContentLoaded`. The bundle runs from a `DOMContentLoaded`
//! listener, which therefore always sees both globals and the root container.

use crate::config::PreviewConfig;
use crate::text::{escape_attr, escape_inline_script, escape_inline_style};

/// Build the HTML document for a compiled bundle and its stylesheet.
#[must_use]
pub fn assemble_document(js: &str, css: &str, config: &PreviewConfig) -> String {
    let css = escape_inline_style(css);
    let js = escape_inline_script(js);
    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <style>
{css}
  </style>
</head>
<body style="{body_style}">
  <div id="{root_id}"></div>
  <script crossorigin defer src="{react_url}"></script>
  <script crossorigin defer src="{react_dom_url}"></script>
  <script>
window.addEventListener("DOMContentLoaded", function () {{
{js}
}});
  </script>
</body>
</html>
"#,
        lang = escape_attr(&config.lang),
        body_style = escape_attr(&config.body_style),
        root_id = escape_attr(&config.root_id),
        react_url = escape_attr(&config.react_url),
        react_dom_url = escape_attr(&config.react_dom_url),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_REACT_DOM_URL, DEFAULT_REACT_URL};

    fn doc() -> String {
        assemble_document("mount();", ".p-4 { padding: 1rem; }", &PreviewConfig::default())
    }

    #[test]
    fn test_structure() {
        let html = doc();
        assert!(html.starts_with("<!DOCTYPE html>\n<html lang=\"en\">"));
        assert!(html.contains("<meta charset=\"utf-8\">"));
        assert!(html.contains("<style>\n.p-4 { padding: 1rem; }\n  </style>"));
        assert!(html.contains("<body style=\"background-color:#fff\">"));
        assert!(html.contains("<div id=\"root\"></div>"));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_runtime_scripts_are_deferred_and_pinned() {
        let html = doc();
        assert!(html.contains(&format!(
            "<script crossorigin defer src=\"{DEFAULT_REACT_URL}\"></script>"
        )));
        assert!(html.contains(&format!(
            "<script crossorigin defer src=\"{DEFAULT_REACT_DOM_URL}\"></script>"
        )));
    }

    #[test]
    fn test_order_is_root_then_runtimes_then_bundle() {
        let html = doc();
        let root = html.find("<div id=\"root\">").unwrap();
        let react = html.find(DEFAULT_REACT_URL).unwrap();
        let react_dom = html.find(DEFAULT_REACT_DOM_URL).unwrap();
        let listener = html.find("window.addEventListener(\"DOMContentLoaded\"").unwrap();
        let bundle = html.find("mount();").unwrap();
        assert!(root < react && react < react_dom && react_dom < listener && listener < bundle);
    }

    #[test]
    fn test_no_other_external_references() {
        let html = doc();
        assert_eq!(html.matches("src=").count(), 2);
        assert!(!html.contains("href="));
    }

    #[test]
    fn test_embedded_text_is_escaped() {
        let html = assemble_document(
            "var s = \"</script>\";",
            ".a::after { content: \"</style>\"; }",
            &PreviewConfig::default().with_root_id("app"),
        );
        assert!(html.contains("var s = \"<\\/script>\";"));
        assert!(html.contains("content: \"<\\/style>\""));
        assert!(html.contains("<div id=\"app\"></div>"));
        assert_eq!(html.matches("</script>").count(), 3);
    }
}
