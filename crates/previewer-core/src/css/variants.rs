//! Variant prefixes (`hover:`, `md:`, `dark:`, ...).
//!
//! Each variant either decorates the selector or contributes a media
//! condition. Every known variant owns one bit of the sort rank, so rules
//! order as bare utilities, then state variants, then color scheme, then
//! breakpoints smallest first.

use super::theme::{Theme, BREAKPOINTS};

/// What a variant does to a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Effect {
    /// Appended to the class selector.
    PseudoClass(&'static str),
    /// Appended after everything else; at most one per rule.
    PseudoElement(&'static str),
    /// Ancestor selector placed before the class.
    Group(&'static str),
    /// Media condition such as `(prefers-color-scheme: dark)`.
    Condition(&'static str),
    /// Media type such as `print`.
    MediaType(&'static str),
    /// Responsive breakpoint, resolved through the theme.
    Breakpoint(&'static str),
}

/// Known variants in rank order.
const VARIANTS: &[(&str, Effect)] = &[
    ("first", Effect::PseudoClass(":first-child")),
    ("last", Effect::PseudoClass(":last-child")),
    ("odd", Effect::PseudoClass(":nth-child(odd)")),
    ("even", Effect::PseudoClass(":nth-child(even)")),
    ("visited", Effect::PseudoClass(":visited")),
    ("checked", Effect::PseudoClass(":checked")),
    ("focus-within", Effect::PseudoClass(":focus-within")),
    ("hover", Effect::PseudoClass(":hover")),
    ("focus", Effect::PseudoClass(":focus")),
    ("focus-visible", Effect::PseudoClass(":focus-visible")),
    ("active", Effect::PseudoClass(":active")),
    ("disabled", Effect::PseudoClass(":disabled")),
    ("group-hover", Effect::Group(".group:hover ")),
    ("group-focus", Effect::Group(".group:focus ")),
    ("placeholder", Effect::PseudoElement("::placeholder")),
    ("dark", Effect::Condition("(prefers-color-scheme: dark)")),
    ("print", Effect::MediaType("print")),
    ("sm", Effect::Breakpoint("sm")),
    ("md", Effect::Breakpoint("md")),
    ("lg", Effect::Breakpoint("lg")),
    ("xl", Effect::Breakpoint("xl")),
    ("2xl", Effect::Breakpoint("2xl")),
];

/// Selector and media context accumulated from a candidate's variants.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantContext {
    ancestors: String,
    pseudo_classes: String,
    pseudo_element: Option<&'static str>,
    media_types: Vec<&'static str>,
    conditions: Vec<String>,
    /// Sort rank; zero for a bare utility.
    pub rank: u32,
}

impl VariantContext {
    /// Apply `variants` in order. Returns `None` if any variant is unknown
    /// or a second pseudo-element is requested.
    #[must_use]
    pub fn from_variants(variants: &[&str], theme: &Theme) -> Option<Self> {
        let mut ctx = Self::default();
        for name in variants {
            let (index, effect) = VARIANTS
                .iter()
                .enumerate()
                .find(|(_, (variant, _))| variant == name)
                .map(|(i, (_, effect))| (i, *effect))?;
            ctx.rank |= 1 << index;
            match effect {
                Effect::PseudoClass(pseudo) => ctx.pseudo_classes.push_str(pseudo),
                Effect::PseudoElement(pseudo) => {
                    if ctx.pseudo_element.replace(pseudo).is_some() {
                        return None;
                    }
                }
                Effect::Group(ancestor) => ctx.ancestors.push_str(ancestor),
                Effect::Condition(condition) => {
                    push_unique(&mut ctx.conditions, condition.to_string());
                }
                Effect::MediaType(media) => {
                    if !ctx.media_types.contains(&media) {
                        ctx.media_types.push(media);
                    }
                }
                Effect::Breakpoint(key) => {
                    let width = theme.breakpoint(key)?;
                    push_unique(&mut ctx.conditions, format!("(min-width: {width})"));
                }
            }
        }
        Some(ctx)
    }

    /// Full selector for an escaped class name, with an optional child
    /// combinator suffix.
    #[must_use]
    pub fn selector(&self, escaped_class: &str, child: Option<&str>) -> String {
        format!(
            "{}.{}{}{}{}",
            self.ancestors,
            escaped_class,
            self.pseudo_classes,
            child.unwrap_or(""),
            self.pseudo_element.unwrap_or(""),
        )
    }

    /// The `@media` prelude, if any variant contributed one.
    #[must_use]
    pub fn media_query(&self) -> Option<String> {
        if self.media_types.is_empty() && self.conditions.is_empty() {
            return None;
        }
        let parts: Vec<&str> = self
            .media_types
            .iter()
            .copied()
            .chain(self.conditions.iter().map(String::as_str))
            .collect();
        Some(parts.join(" and "))
    }
}

fn push_unique(list: &mut Vec<String>, value: String) {
    if !list.contains(&value) {
        list.push(value);
    }
}

/// Width and media condition of every breakpoint, smallest first.
pub fn breakpoint_queries() -> impl Iterator<Item = (&'static str, String)> {
    BREAKPOINTS
        .iter()
        .map(|(_, width)| (*width, format!("(min-width: {width})")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(variants: &[&str]) -> Option<VariantContext> {
        VariantContext::from_variants(variants, &Theme::new())
    }

    #[test]
    fn test_bare_utility() {
        let c = ctx(&[]).unwrap();
        assert_eq!(c.rank, 0);
        assert_eq!(c.selector("p-4", None), ".p-4");
        assert_eq!(c.media_query(), None);
    }

    #[test]
    fn test_pseudo_classes_stack() {
        let c = ctx(&["hover", "focus"]).unwrap();
        assert_eq!(c.selector("x", None), ".x:hover:focus");
    }

    #[test]
    fn test_group_and_child() {
        let c = ctx(&["group-hover"]).unwrap();
        assert_eq!(
            c.selector("y", Some(" > :not([hidden]) ~ :not([hidden])")),
            ".group:hover .y > :not([hidden]) ~ :not([hidden])"
        );
    }

    #[test]
    fn test_placeholder_goes_last() {
        let c = ctx(&["placeholder", "hover"]).unwrap();
        assert_eq!(c.selector("z", None), ".z:hover::placeholder");
        assert!(ctx(&["placeholder", "placeholder"]).is_none());
    }

    #[test]
    fn test_media_composition() {
        let c = ctx(&["md"]).unwrap();
        assert_eq!(c.media_query().as_deref(), Some("(min-width: 768px)"));

        let c = ctx(&["dark", "lg"]).unwrap();
        assert_eq!(
            c.media_query().as_deref(),
            Some("(prefers-color-scheme: dark) and (min-width: 1024px)")
        );

        let c = ctx(&["sm", "print"]).unwrap();
        assert_eq!(
            c.media_query().as_deref(),
            Some("print and (min-width: 640px)")
        );
    }

    #[test]
    fn test_unknown_variant() {
        assert!(ctx(&["wat"]).is_none());
        assert!(ctx(&["hover", "3xl"]).is_none());
    }

    #[test]
    fn test_rank_orders_breakpoints_after_states() {
        let hover = ctx(&["hover"]).unwrap().rank;
        let sm = ctx(&["sm"]).unwrap().rank;
        let md = ctx(&["md"]).unwrap().rank;
        let md_hover = ctx(&["md", "hover"]).unwrap().rank;
        assert!(hover < sm);
        assert!(sm < md);
        assert!(md < md_hover);
    }

    #[test]
    fn test_breakpoint_queries() {
        let queries: Vec<_> = breakpoint_queries().collect();
        assert_eq!(queries.len(), 5);
        assert_eq!(queries[0], ("640px", "(min-width: 640px)".to_string()));
    }
}
