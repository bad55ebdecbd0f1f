//! Escaping for text embedded in generated JS and HTML.

/// Quote `value` as a JS string literal.
#[must_use]
pub fn js_string(value: &str) -> String {
    serde_json::Value::from(value).to_string()
}

/// Escape a double-quoted HTML attribute value.
#[must_use]
pub fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Make JS safe to place inside `<script>`: no `</script` and no `<!--`
/// can end or confuse the element.
///
/// `<!--` becomes `\x3C!--`, which reads the same inside strings, template
/// literals and regular expressions, including `u`-flag ones.
#[must_use]
pub fn escape_inline_script(code: &str) -> String {
    escape_end_tag(code, "script").replace("<!--", "\\x3C!--")
}

/// Make CSS safe to place inside `<style>`.
#[must_use]
pub fn escape_inline_style(css: &str) -> String {
    escape_end_tag(css, "style")
}

/// Rewrite every `</tag` (ASCII case-insensitive) as `<\/tag`, keeping the
/// original casing of the tag name.
fn escape_end_tag(text: &str, tag: &str) -> String {
    let needle = format!("</{tag}");
    let lower = text.to_ascii_lowercase();
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for (at, _) in lower.match_indices(&needle) {
        out.push_str(&text[cursor..at]);
        out.push_str("<\\/");
        cursor = at + 2;
    }
    out.push_str(&text[cursor..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_string() {
        assert_eq!(js_string("./Button.tsx"), "\"./Button.tsx\"");
        assert_eq!(js_string("a\"b\\c\n"), "\"a\\\"b\\\\c\\n\"");
    }

    #[test]
    fn test_escape_attr() {
        assert_eq!(escape_attr("a&b\"<c>"), "a&amp;b&quot;&lt;c&gt;");
        assert_eq!(escape_attr("background-color:#fff"), "background-color:#fff");
    }

    #[test]
    fn test_escape_inline_script() {
        assert_eq!(
            escape_inline_script(r#"var s = "</script><!--";"#),
            r#"var s = "<\/script>\x3C!--";"#
        );
        assert_eq!(
            escape_inline_script(r"const re = /<!--/u;"),
            r"const re = /\x3C!--/u;"
        );
        assert_eq!(escape_inline_script("x = '</SCRIPT>'"), "x = '<\\/SCRIPT>'");
        assert_eq!(escape_inline_script("a < b"), "a < b");
    }

    #[test]
    fn test_escape_inline_style() {
        assert_eq!(
            escape_inline_style(".a::after { content: \"</style>\"; }"),
            ".a::after { content: \"<\\/style>\"; }"
        );
    }
}
