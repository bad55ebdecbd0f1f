//! Candidate extraction.
//!
//! Any run of class-name characters in the compiled JS is a candidate; most
//! of them (identifiers, keywords) simply fail to resolve later. Bracketed
//! arbitrary values may additionally contain parentheses, commas and the
//! other characters CSS values need.

use regex_lite::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Longest token considered a class name.
const MAX_CANDIDATE_LEN: usize = 128;

fn candidate_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r#"(?:[A-Za-z0-9_\-:/.!#%]|\[[^\s\[\]"'`]*\])+"#).ok())
        .as_ref()
}

/// Collect the unique candidate tokens in `text`.
pub fn extract_candidates(text: &str) -> BTreeSet<&str> {
    let Some(pattern) = candidate_pattern() else {
        return BTreeSet::new();
    };
    pattern
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|token| token.len() <= MAX_CANDIDATE_LEN)
        .filter(|token| token.bytes().any(|b| b.is_ascii_alphabetic()))
        .collect()
}

/// A candidate split into its parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate<'a> {
    /// Full token, used verbatim as the class selector.
    pub raw: &'a str,
    /// Variant prefixes in source order (`md`, `hover`).
    pub variants: Vec<&'a str>,
    /// Leading `!`.
    pub important: bool,
    /// Leading `-` on the utility.
    pub negative: bool,
    /// Utility without modifiers, e.g. `bg-red-500/50` or `w-[300px]`.
    pub utility: &'a str,
}

/// Split a token into variants and utility. Returns `None` for tokens that
/// cannot be a utility class at all.
pub fn parse_candidate(raw: &str) -> Option<Candidate<'_>> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (i, ch) in raw.char_indices() {
        match ch {
            '[' => depth += 1,
            ']' => depth = depth.checked_sub(1)?,
            ':' if depth == 0 => {
                parts.push(&raw[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return None;
    }
    let mut utility = &raw[start..];
    if parts.iter().any(|p| p.is_empty()) {
        return None;
    }

    let important = match utility.strip_prefix('!') {
        Some(rest) => {
            utility = rest;
            true
        }
        None => false,
    };
    let negative = match utility.strip_prefix('-') {
        Some(rest) => {
            utility = rest;
            true
        }
        None => false,
    };
    if utility.is_empty() || !utility.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return None;
    }

    Some(Candidate {
        raw,
        variants: parts,
        important,
        negative,
        utility,
    })
}

/// Escape a class name for use in a selector.
pub fn escape_class(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 8);
    for (i, ch) in name.chars().enumerate() {
        let leading_digit = ch.is_ascii_digit()
            && (i == 0 || (i == 1 && name.starts_with('-')));
        if leading_digit {
            out.push_str(&format!("\\{:x} ", u32::from(ch)));
        } else if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || !ch.is_ascii() {
            out.push(ch);
        } else {
            out.push('\\');
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_class_tokens_from_js() {
        let js = r#"__React.createElement("div", { className: "flex px-4 md:text-sm" }, "Hi")"#;
        let found = extract_candidates(js);
        assert!(found.contains("flex"));
        assert!(found.contains("px-4"));
        assert!(found.contains("md:text-sm"));
        assert!(found.contains("className:"));
        assert!(!found.contains("\"flex"));
    }

    #[test]
    fn test_extracts_arbitrary_values() {
        let js = r#"className: "w-[calc(100%-2rem)] bg-[#1da1f2] grid-cols-[1fr,2fr]""#;
        let found = extract_candidates(js);
        assert!(found.contains("w-[calc(100%-2rem)]"));
        assert!(found.contains("bg-[#1da1f2]"));
        assert!(found.contains("grid-cols-[1fr,2fr]"));
    }

    #[test]
    fn test_skips_tokens_without_letters() {
        let found = extract_candidates("1 + 2 === 3 / 4");
        assert!(found.is_empty());
    }

    #[test]
    fn test_parse_plain() {
        let c = parse_candidate("px-4").unwrap();
        assert!(c.variants.is_empty());
        assert!(!c.important);
        assert!(!c.negative);
        assert_eq!(c.utility, "px-4");
    }

    #[test]
    fn test_parse_variants_and_modifiers() {
        let c = parse_candidate("md:hover:!-mt-2").unwrap();
        assert_eq!(c.variants, vec!["md", "hover"]);
        assert!(c.important);
        assert!(c.negative);
        assert_eq!(c.utility, "mt-2");
    }

    #[test]
    fn test_parse_keeps_colons_inside_brackets() {
        let c = parse_candidate("hover:bg-[url(a:b)]").unwrap();
        assert_eq!(c.variants, vec!["hover"]);
        assert_eq!(c.utility, "bg-[url(a:b)]");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(parse_candidate("className:").is_none());
        assert!(parse_candidate(":flex").is_none());
        assert!(parse_candidate("w-[12px").is_none());
        assert!(parse_candidate("-").is_none());
        assert!(parse_candidate("--tw").is_none());
    }

    #[test]
    fn test_escape_class() {
        assert_eq!(escape_class("px-4"), "px-4");
        assert_eq!(escape_class("md:p-4"), "md\\:p-4");
        assert_eq!(escape_class("w-1/2"), "w-1\\/2");
        assert_eq!(escape_class("p-0.5"), "p-0\\.5");
        assert_eq!(escape_class("w-[300px]"), "w-\\[300px\\]");
        assert_eq!(escape_class("!p-4"), "\\!p-4");
        assert_eq!(escape_class("2xl:p-4"), "\\32 xl\\:p-4");
    }
}
