//! Utility resolution: a class name (without variants) to declarations.
//!
//! Fixed utilities (`flex`, `italic`) come from a static table. Everything
//! else is `root-value`, where the value is a theme key or a bracketed
//! arbitrary value; the root is found by trying each `-` from the right.

use super::theme::{with_alpha, Theme};

/// Composed transform shared by the translate, rotate and scale utilities.
const TRANSFORM: &str = "translate(var(--tw-translate-x, 0), var(--tw-translate-y, 0)) \
rotate(var(--tw-rotate, 0)) scale(var(--tw-scale-x, 1), var(--tw-scale-y, 1))";

/// Child combinator for `space-x-*` / `space-y-*`.
const SPACE_CHILD: &str = " > :not([hidden]) ~ :not([hidden])";

/// Roots that accept a leading `-`.
const NEGATABLE: &[&str] = &[
    "m", "mx", "my", "mt", "mr", "mb", "ml", "space-x", "space-y", "inset", "inset-x", "inset-y",
    "top", "right", "bottom", "left", "z", "order", "tracking", "scale", "scale-x", "scale-y",
    "rotate", "translate-x", "translate-y",
];

/// Rule groups in output order. Later groups win over earlier ones at equal
/// specificity, so shorthands come before the longhands that refine them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Plugin {
    SrOnly,
    PointerEvents,
    Visibility,
    Position,
    Inset,
    Isolation,
    ZIndex,
    Order,
    GridColumn,
    GridRow,
    Margin,
    BoxSizing,
    LineClamp,
    Display,
    AspectRatio,
    Size,
    Height,
    MaxHeight,
    MinHeight,
    Width,
    MinWidth,
    MaxWidth,
    Flex,
    FlexShrink,
    FlexGrow,
    FlexBasis,
    Transform,
    Cursor,
    UserSelect,
    ListStyle,
    GridTemplateColumns,
    GridTemplateRows,
    FlexDirection,
    FlexWrap,
    AlignContent,
    AlignItems,
    JustifyContent,
    Gap,
    Space,
    AlignSelf,
    Overflow,
    TextOverflow,
    Whitespace,
    WordBreak,
    BorderRadius,
    BorderWidth,
    BorderStyle,
    BorderColor,
    BackgroundColor,
    BackgroundImage,
    GradientStops,
    ObjectFit,
    Padding,
    TextAlign,
    FontFamily,
    FontSize,
    FontWeight,
    TextTransform,
    FontStyle,
    LineHeight,
    LetterSpacing,
    TextColor,
    TextDecoration,
    TextDecorationColor,
    FontSmoothing,
    Opacity,
    BoxShadow,
    Outline,
    Ring,
    RingColor,
    Accent,
    Caret,
    Fill,
    Stroke,
    Transition,
    Delay,
    Duration,
    Ease,
}

/// A resolved utility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UtilityRule {
    pub plugin: Plugin,
    pub declarations: Vec<(&'static str, String)>,
    /// Combinator appended to the selector.
    pub child: Option<&'static str>,
    /// Built from a bracketed value; needs validation before use.
    pub arbitrary: bool,
}

impl UtilityRule {
    fn new(plugin: Plugin, declarations: Vec<(&'static str, String)>) -> Self {
        Self {
            plugin,
            declarations,
            child: None,
            arbitrary: false,
        }
    }

    /// The same value assigned to each of `props`.
    fn each(plugin: Plugin, props: &[&'static str], value: &str) -> Self {
        Self::new(plugin, props.iter().map(|p| (*p, value.to_string())).collect())
    }
}

type Decls = &'static [(&'static str, &'static str)];

const STATIC: &[(&str, Plugin, Decls)] = &[
    ("sr-only", Plugin::SrOnly, &[
        ("position", "absolute"), ("width", "1px"), ("height", "1px"), ("padding", "0"),
        ("margin", "-1px"), ("overflow", "hidden"), ("clip", "rect(0, 0, 0, 0)"),
        ("white-space", "nowrap"), ("border-width", "0"),
    ]),
    ("not-sr-only", Plugin::SrOnly, &[
        ("position", "static"), ("width", "auto"), ("height", "auto"), ("padding", "0"),
        ("margin", "0"), ("overflow", "visible"), ("clip", "auto"), ("white-space", "normal"),
    ]),
    ("pointer-events-none", Plugin::PointerEvents, &[("pointer-events", "none")]),
    ("pointer-events-auto", Plugin::PointerEvents, &[("pointer-events", "auto")]),
    ("visible", Plugin::Visibility, &[("visibility", "visible")]),
    ("invisible", Plugin::Visibility, &[("visibility", "hidden")]),
    ("collapse", Plugin::Visibility, &[("visibility", "collapse")]),
    ("static", Plugin::Position, &[("position", "static")]),
    ("fixed", Plugin::Position, &[("position", "fixed")]),
    ("absolute", Plugin::Position, &[("position", "absolute")]),
    ("relative", Plugin::Position, &[("position", "relative")]),
    ("sticky", Plugin::Position, &[("position", "sticky")]),
    ("isolate", Plugin::Isolation, &[("isolation", "isolate")]),
    ("isolation-auto", Plugin::Isolation, &[("isolation", "auto")]),
    ("col-auto", Plugin::GridColumn, &[("grid-column", "auto")]),
    ("row-auto", Plugin::GridRow, &[("grid-row", "auto")]),
    ("box-border", Plugin::BoxSizing, &[("box-sizing", "border-box")]),
    ("box-content", Plugin::BoxSizing, &[("box-sizing", "content-box")]),
    ("block", Plugin::Display, &[("display", "block")]),
    ("inline-block", Plugin::Display, &[("display", "inline-block")]),
    ("inline", Plugin::Display, &[("display", "inline")]),
    ("flex", Plugin::Display, &[("display", "flex")]),
    ("inline-flex", Plugin::Display, &[("display", "inline-flex")]),
    ("table", Plugin::Display, &[("display", "table")]),
    ("inline-table", Plugin::Display, &[("display", "inline-table")]),
    ("table-row", Plugin::Display, &[("display", "table-row")]),
    ("table-cell", Plugin::Display, &[("display", "table-cell")]),
    ("flow-root", Plugin::Display, &[("display", "flow-root")]),
    ("grid", Plugin::Display, &[("display", "grid")]),
    ("inline-grid", Plugin::Display, &[("display", "inline-grid")]),
    ("contents", Plugin::Display, &[("display", "contents")]),
    ("list-item", Plugin::Display, &[("display", "list-item")]),
    ("hidden", Plugin::Display, &[("display", "none")]),
    ("aspect-auto", Plugin::AspectRatio, &[("aspect-ratio", "auto")]),
    ("aspect-square", Plugin::AspectRatio, &[("aspect-ratio", "1 / 1")]),
    ("aspect-video", Plugin::AspectRatio, &[("aspect-ratio", "16 / 9")]),
    ("flex-1", Plugin::Flex, &[("flex", "1 1 0%")]),
    ("flex-auto", Plugin::Flex, &[("flex", "1 1 auto")]),
    ("flex-initial", Plugin::Flex, &[("flex", "0 1 auto")]),
    ("flex-none", Plugin::Flex, &[("flex", "none")]),
    ("shrink", Plugin::FlexShrink, &[("flex-shrink", "1")]),
    ("shrink-0", Plugin::FlexShrink, &[("flex-shrink", "0")]),
    ("grow", Plugin::FlexGrow, &[("flex-grow", "1")]),
    ("grow-0", Plugin::FlexGrow, &[("flex-grow", "0")]),
    ("transform", Plugin::Transform, &[("transform", TRANSFORM)]),
    ("transform-none", Plugin::Transform, &[("transform", "none")]),
    ("cursor-auto", Plugin::Cursor, &[("cursor", "auto")]),
    ("cursor-default", Plugin::Cursor, &[("cursor", "default")]),
    ("cursor-pointer", Plugin::Cursor, &[("cursor", "pointer")]),
    ("cursor-wait", Plugin::Cursor, &[("cursor", "wait")]),
    ("cursor-text", Plugin::Cursor, &[("cursor", "text")]),
    ("cursor-move", Plugin::Cursor, &[("cursor", "move")]),
    ("cursor-help", Plugin::Cursor, &[("cursor", "help")]),
    ("cursor-not-allowed", Plugin::Cursor, &[("cursor", "not-allowed")]),
    ("cursor-none", Plugin::Cursor, &[("cursor", "none")]),
    ("cursor-grab", Plugin::Cursor, &[("cursor", "grab")]),
    ("cursor-grabbing", Plugin::Cursor, &[("cursor", "grabbing")]),
    ("select-none", Plugin::UserSelect, &[("user-select", "none")]),
    ("select-text", Plugin::UserSelect, &[("user-select", "text")]),
    ("select-all", Plugin::UserSelect, &[("user-select", "all")]),
    ("select-auto", Plugin::UserSelect, &[("user-select", "auto")]),
    ("list-none", Plugin::ListStyle, &[("list-style-type", "none")]),
    ("list-disc", Plugin::ListStyle, &[("list-style-type", "disc")]),
    ("list-decimal", Plugin::ListStyle, &[("list-style-type", "decimal")]),
    ("list-inside", Plugin::ListStyle, &[("list-style-position", "inside")]),
    ("list-outside", Plugin::ListStyle, &[("list-style-position", "outside")]),
    ("flex-row", Plugin::FlexDirection, &[("flex-direction", "row")]),
    ("flex-row-reverse", Plugin::FlexDirection, &[("flex-direction", "row-reverse")]),
    ("flex-col", Plugin::FlexDirection, &[("flex-direction", "column")]),
    ("flex-col-reverse", Plugin::FlexDirection, &[("flex-direction", "column-reverse")]),
    ("flex-wrap", Plugin::FlexWrap, &[("flex-wrap", "wrap")]),
    ("flex-wrap-reverse", Plugin::FlexWrap, &[("flex-wrap", "wrap-reverse")]),
    ("flex-nowrap", Plugin::FlexWrap, &[("flex-wrap", "nowrap")]),
    ("content-center", Plugin::AlignContent, &[("align-content", "center")]),
    ("content-start", Plugin::AlignContent, &[("align-content", "flex-start")]),
    ("content-end", Plugin::AlignContent, &[("align-content", "flex-end")]),
    ("content-between", Plugin::AlignContent, &[("align-content", "space-between")]),
    ("content-around", Plugin::AlignContent, &[("align-content", "space-around")]),
    ("content-evenly", Plugin::AlignContent, &[("align-content", "space-evenly")]),
    ("place-content-center", Plugin::AlignContent, &[("place-content", "center")]),
    ("place-items-center", Plugin::AlignContent, &[("place-items", "center")]),
    ("items-start", Plugin::AlignItems, &[("align-items", "flex-start")]),
    ("items-end", Plugin::AlignItems, &[("align-items", "flex-end")]),
    ("items-center", Plugin::AlignItems, &[("align-items", "center")]),
    ("items-baseline", Plugin::AlignItems, &[("align-items", "baseline")]),
    ("items-stretch", Plugin::AlignItems, &[("align-items", "stretch")]),
    ("justify-start", Plugin::JustifyContent, &[("justify-content", "flex-start")]),
    ("justify-end", Plugin::JustifyContent, &[("justify-content", "flex-end")]),
    ("justify-center", Plugin::JustifyContent, &[("justify-content", "center")]),
    ("justify-between", Plugin::JustifyContent, &[("justify-content", "space-between")]),
    ("justify-around", Plugin::JustifyContent, &[("justify-content", "space-around")]),
    ("justify-evenly", Plugin::JustifyContent, &[("justify-content", "space-evenly")]),
    ("justify-items-start", Plugin::JustifyContent, &[("justify-items", "start")]),
    ("justify-items-end", Plugin::JustifyContent, &[("justify-items", "end")]),
    ("justify-items-center", Plugin::JustifyContent, &[("justify-items", "center")]),
    ("justify-items-stretch", Plugin::JustifyContent, &[("justify-items", "stretch")]),
    ("self-auto", Plugin::AlignSelf, &[("align-self", "auto")]),
    ("self-start", Plugin::AlignSelf, &[("align-self", "flex-start")]),
    ("self-end", Plugin::AlignSelf, &[("align-self", "flex-end")]),
    ("self-center", Plugin::AlignSelf, &[("align-self", "center")]),
    ("self-stretch", Plugin::AlignSelf, &[("align-self", "stretch")]),
    ("self-baseline", Plugin::AlignSelf, &[("align-self", "baseline")]),
    ("truncate", Plugin::TextOverflow, &[
        ("overflow", "hidden"), ("text-overflow", "ellipsis"), ("white-space", "nowrap"),
    ]),
    ("text-ellipsis", Plugin::TextOverflow, &[("text-overflow", "ellipsis")]),
    ("text-clip", Plugin::TextOverflow, &[("text-overflow", "clip")]),
    ("whitespace-normal", Plugin::Whitespace, &[("white-space", "normal")]),
    ("whitespace-nowrap", Plugin::Whitespace, &[("white-space", "nowrap")]),
    ("whitespace-pre", Plugin::Whitespace, &[("white-space", "pre")]),
    ("whitespace-pre-line", Plugin::Whitespace, &[("white-space", "pre-line")]),
    ("whitespace-pre-wrap", Plugin::Whitespace, &[("white-space", "pre-wrap")]),
    ("whitespace-break-spaces", Plugin::Whitespace, &[("white-space", "break-spaces")]),
    ("break-normal", Plugin::WordBreak, &[("overflow-wrap", "normal"), ("word-break", "normal")]),
    ("break-words", Plugin::WordBreak, &[("overflow-wrap", "break-word")]),
    ("break-all", Plugin::WordBreak, &[("word-break", "break-all")]),
    ("border-solid", Plugin::BorderStyle, &[("border-style", "solid")]),
    ("border-dashed", Plugin::BorderStyle, &[("border-style", "dashed")]),
    ("border-dotted", Plugin::BorderStyle, &[("border-style", "dotted")]),
    ("border-double", Plugin::BorderStyle, &[("border-style", "double")]),
    ("border-hidden", Plugin::BorderStyle, &[("border-style", "hidden")]),
    ("border-none", Plugin::BorderStyle, &[("border-style", "none")]),
    ("bg-none", Plugin::BackgroundImage, &[("background-image", "none")]),
    ("object-contain", Plugin::ObjectFit, &[("object-fit", "contain")]),
    ("object-cover", Plugin::ObjectFit, &[("object-fit", "cover")]),
    ("object-fill", Plugin::ObjectFit, &[("object-fit", "fill")]),
    ("object-none", Plugin::ObjectFit, &[("object-fit", "none")]),
    ("object-scale-down", Plugin::ObjectFit, &[("object-fit", "scale-down")]),
    ("text-left", Plugin::TextAlign, &[("text-align", "left")]),
    ("text-center", Plugin::TextAlign, &[("text-align", "center")]),
    ("text-right", Plugin::TextAlign, &[("text-align", "right")]),
    ("text-justify", Plugin::TextAlign, &[("text-align", "justify")]),
    ("text-start", Plugin::TextAlign, &[("text-align", "start")]),
    ("text-end", Plugin::TextAlign, &[("text-align", "end")]),
    ("uppercase", Plugin::TextTransform, &[("text-transform", "uppercase")]),
    ("lowercase", Plugin::TextTransform, &[("text-transform", "lowercase")]),
    ("capitalize", Plugin::TextTransform, &[("text-transform", "capitalize")]),
    ("normal-case", Plugin::TextTransform, &[("text-transform", "none")]),
    ("italic", Plugin::FontStyle, &[("font-style", "italic")]),
    ("not-italic", Plugin::FontStyle, &[("font-style", "normal")]),
    ("underline", Plugin::TextDecoration, &[("text-decoration-line", "underline")]),
    ("overline", Plugin::TextDecoration, &[("text-decoration-line", "overline")]),
    ("line-through", Plugin::TextDecoration, &[("text-decoration-line", "line-through")]),
    ("no-underline", Plugin::TextDecoration, &[("text-decoration-line", "none")]),
    ("antialiased", Plugin::FontSmoothing, &[
        ("-webkit-font-smoothing", "antialiased"), ("-moz-osx-font-smoothing", "grayscale"),
    ]),
    ("subpixel-antialiased", Plugin::FontSmoothing, &[
        ("-webkit-font-smoothing", "auto"), ("-moz-osx-font-smoothing", "auto"),
    ]),
    ("outline-none", Plugin::Outline, &[
        ("outline", "2px solid transparent"), ("outline-offset", "2px"),
    ]),
    ("outline", Plugin::Outline, &[("outline-style", "solid")]),
    ("outline-dashed", Plugin::Outline, &[("outline-style", "dashed")]),
    ("transition", Plugin::Transition, &[
        ("transition-property", "color, background-color, border-color, text-decoration-color, fill, stroke, opacity, box-shadow, transform, filter, backdrop-filter"),
        ("transition-timing-function", "cubic-bezier(0.4, 0, 0.2, 1)"),
        ("transition-duration", "150ms"),
    ]),
    ("transition-all", Plugin::Transition, &[
        ("transition-property", "all"),
        ("transition-timing-function", "cubic-bezier(0.4, 0, 0.2, 1)"),
        ("transition-duration", "150ms"),
    ]),
    ("transition-colors", Plugin::Transition, &[
        ("transition-property", "color, background-color, border-color, text-decoration-color, fill, stroke"),
        ("transition-timing-function", "cubic-bezier(0.4, 0, 0.2, 1)"),
        ("transition-duration", "150ms"),
    ]),
    ("transition-opacity", Plugin::Transition, &[
        ("transition-property", "opacity"),
        ("transition-timing-function", "cubic-bezier(0.4, 0, 0.2, 1)"),
        ("transition-duration", "150ms"),
    ]),
    ("transition-shadow", Plugin::Transition, &[
        ("transition-property", "box-shadow"),
        ("transition-timing-function", "cubic-bezier(0.4, 0, 0.2, 1)"),
        ("transition-duration", "150ms"),
    ]),
    ("transition-transform", Plugin::Transition, &[
        ("transition-property", "transform"),
        ("transition-timing-function", "cubic-bezier(0.4, 0, 0.2, 1)"),
        ("transition-duration", "150ms"),
    ]),
    ("transition-none", Plugin::Transition, &[("transition-property", "none")]),
    ("ease-linear", Plugin::Ease, &[("transition-timing-function", "linear")]),
    ("ease-in", Plugin::Ease, &[("transition-timing-function", "cubic-bezier(0.4, 0, 1, 1)")]),
    ("ease-out", Plugin::Ease, &[("transition-timing-function", "cubic-bezier(0, 0, 0.2, 1)")]),
    ("ease-in-out", Plugin::Ease, &[("transition-timing-function", "cubic-bezier(0.4, 0, 0.2, 1)")]),
];

/// A utility value: theme key or bracketed arbitrary value.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Value<'a> {
    Named(&'a str),
    Arbitrary {
        value: String,
        /// `/NN` after the closing bracket.
        modifier: Option<&'a str>,
    },
}

/// Theme key used for the bare form of `rounded`, `shadow`, `border`, `ring`.
const BARE: Value<'static> = Value::Named("DEFAULT");

impl<'a> Value<'a> {
    fn parse(text: &'a str) -> Option<Self> {
        if text.is_empty() || text == "DEFAULT" {
            return None;
        }
        let Some(rest) = text.strip_prefix('[') else {
            if text.contains(['[', ']']) {
                return None;
            }
            return Some(Value::Named(text));
        };
        let close = rest.rfind(']')?;
        let tail = &rest[close + 1..];
        let modifier = if tail.is_empty() {
            None
        } else {
            Some(tail.strip_prefix('/')?)
        };
        Some(Value::Arbitrary {
            value: decode_arbitrary(&rest[..close])?,
            modifier,
        })
    }

    fn named(&self) -> Option<&'a str> {
        match self {
            Value::Named(key) => Some(*key),
            Value::Arbitrary { .. } => None,
        }
    }

    /// Arbitrary value without an opacity modifier.
    fn arbitrary(&self) -> Option<&str> {
        match self {
            Value::Arbitrary {
                value,
                modifier: None,
            } => Some(value.as_str()),
            _ => None,
        }
    }
}

/// `_` stands for a space inside brackets; `\_` is a literal underscore.
fn decode_arbitrary(inner: &str) -> Option<String> {
    if inner.trim().is_empty() || inner.contains([';', '{', '}']) {
        return None;
    }
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' if chars.peek() == Some(&'_') => {
                chars.next();
                out.push('_');
            }
            '_' => out.push(' '),
            _ => out.push(ch),
        }
    }
    Some(space_math_operators(&out))
}

/// Functions whose arguments are math expressions.
const MATH_FUNCTIONS: [&str; 4] = ["calc", "min", "max", "clamp"];

/// Put spaces around binary operators inside `calc()` and friends, so
/// `calc(100vh-4rem)` becomes `calc(100vh - 4rem)`. A sign that starts an
/// operand stays attached to it; other functions such as `var()` are left
/// alone.
fn space_math_operators(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 8);
    // One entry per open paren: whether its contents are math.
    let mut math: Vec<bool> = Vec::new();
    let mut chars = value.chars().peekable();
    while let Some(ch) = chars.next() {
        let in_math = math.last().copied().unwrap_or(false);
        match ch {
            '(' => {
                let prefix = out.trim_end_matches(|c: char| c.is_ascii_alphanumeric() || c == '-');
                let name = out[prefix.len()..].to_ascii_lowercase();
                math.push(if name.is_empty() {
                    in_math
                } else {
                    MATH_FUNCTIONS.contains(&name.as_str())
                });
                out.push(ch);
            }
            ')' => {
                math.pop();
                out.push(ch);
            }
            '+' | '-' | '*' | '/' if in_math && is_binary_operator(ch, &out) => {
                out.truncate(out.trim_end().len());
                out.push(' ');
                out.push(ch);
                out.push(' ');
                while chars.peek() == Some(&' ') {
                    chars.next();
                }
            }
            _ => out.push(ch),
        }
    }
    out
}

/// `+` and `-` are binary only after the end of an operand.
fn is_binary_operator(op: char, before: &str) -> bool {
    if matches!(op, '*' | '/') {
        return true;
    }
    before
        .trim_end()
        .chars()
        .last()
        .is_some_and(|c| c.is_ascii_alphanumeric() || c == '%' || c == ')')
}

/// Resolve a utility to its declarations.
#[must_use]
pub fn resolve_utility(utility: &str, negative: bool, theme: &Theme) -> Option<UtilityRule> {
    if !negative {
        if let Some((_, plugin, decls)) = STATIC.iter().find(|(name, _, _)| *name == utility) {
            let declarations = decls.iter().map(|(p, v)| (*p, (*v).to_string())).collect();
            return Some(UtilityRule::new(*plugin, declarations));
        }
    }
    if let Some(rule) = functional(utility, &BARE, negative, theme) {
        return Some(rule);
    }
    let limit = utility.find('[').unwrap_or(utility.len());
    for (i, _) in utility[..limit].rmatch_indices('-') {
        let Some(value) = Value::parse(&utility[i + 1..]) else {
            continue;
        };
        if let Some(rule) = functional(&utility[..i], &value, negative, theme) {
            return Some(rule);
        }
    }
    None
}

fn functional(
    root: &str,
    value: &Value<'_>,
    negative: bool,
    theme: &Theme,
) -> Option<UtilityRule> {
    if negative && !NEGATABLE.contains(&root) {
        return None;
    }
    let signed = |v: String| if negative { negate(v) } else { Some(v) };
    let t = theme;

    let mut rule = match root {
        "p" => UtilityRule::each(Plugin::Padding, &["padding"], &spacing(t, value)?),
        "px" => UtilityRule::each(
            Plugin::Padding,
            &["padding-left", "padding-right"],
            &spacing(t, value)?,
        ),
        "py" => UtilityRule::each(
            Plugin::Padding,
            &["padding-top", "padding-bottom"],
            &spacing(t, value)?,
        ),
        "pt" => UtilityRule::each(Plugin::Padding, &["padding-top"], &spacing(t, value)?),
        "pr" => UtilityRule::each(Plugin::Padding, &["padding-right"], &spacing(t, value)?),
        "pb" => UtilityRule::each(Plugin::Padding, &["padding-bottom"], &spacing(t, value)?),
        "pl" => UtilityRule::each(Plugin::Padding, &["padding-left"], &spacing(t, value)?),

        "m" | "mx" | "my" | "mt" | "mr" | "mb" | "ml" => {
            let props: &[&'static str] = match root {
                "m" => &["margin"],
                "mx" => &["margin-left", "margin-right"],
                "my" => &["margin-top", "margin-bottom"],
                "mt" => &["margin-top"],
                "mr" => &["margin-right"],
                "mb" => &["margin-bottom"],
                _ => &["margin-left"],
            };
            let v = signed(keyword_or(t, value, &[("auto", "auto")], false)?)?;
            UtilityRule::each(Plugin::Margin, props, &v)
        }

        "gap" => UtilityRule::each(Plugin::Gap, &["gap"], &spacing(t, value)?),
        "gap-x" => UtilityRule::each(Plugin::Gap, &["column-gap"], &spacing(t, value)?),
        "gap-y" => UtilityRule::each(Plugin::Gap, &["row-gap"], &spacing(t, value)?),

        "space-x" | "space-y" => {
            let prop = if root == "space-x" { "margin-left" } else { "margin-top" };
            UtilityRule {
                child: Some(SPACE_CHILD),
                ..UtilityRule::each(Plugin::Space, &[prop], &signed(spacing(t, value)?)?)
            }
        }

        "inset" | "inset-x" | "inset-y" | "top" | "right" | "bottom" | "left" => {
            let props: &[&'static str] = match root {
                "inset" => &["inset"],
                "inset-x" => &["left", "right"],
                "inset-y" => &["top", "bottom"],
                "top" => &["top"],
                "right" => &["right"],
                "bottom" => &["bottom"],
                _ => &["left"],
            };
            let v = keyword_or(t, value, &[("auto", "auto"), ("full", "100%")], true)?;
            UtilityRule::each(Plugin::Inset, props, &signed(v)?)
        }

        "w" => UtilityRule::each(
            Plugin::Width,
            &["width"],
            &keyword_or(t, value, &[
                ("auto", "auto"), ("full", "100%"), ("screen", "100vw"),
                ("min", "min-content"), ("max", "max-content"), ("fit", "fit-content"),
            ], true)?,
        ),
        "h" => UtilityRule::each(
            Plugin::Height,
            &["height"],
            &keyword_or(t, value, &[
                ("auto", "auto"), ("full", "100%"), ("screen", "100vh"),
                ("min", "min-content"), ("max", "max-content"), ("fit", "fit-content"),
            ], true)?,
        ),
        "size" => UtilityRule::each(
            Plugin::Size,
            &["width", "height"],
            &keyword_or(t, value, &[
                ("auto", "auto"), ("full", "100%"),
                ("min", "min-content"), ("max", "max-content"), ("fit", "fit-content"),
            ], true)?,
        ),
        "min-w" => UtilityRule::each(
            Plugin::MinWidth,
            &["min-width"],
            &keyword_or(t, value, &[
                ("full", "100%"), ("min", "min-content"), ("max", "max-content"),
                ("fit", "fit-content"),
            ], false)?,
        ),
        "min-h" => UtilityRule::each(
            Plugin::MinHeight,
            &["min-height"],
            &keyword_or(t, value, &[
                ("full", "100%"), ("screen", "100vh"), ("min", "min-content"),
                ("max", "max-content"), ("fit", "fit-content"),
            ], false)?,
        ),
        "max-w" => {
            let v = match value.named() {
                Some(key) => t.max_width(key)?.to_string(),
                None => value.arbitrary()?.to_string(),
            };
            UtilityRule::each(Plugin::MaxWidth, &["max-width"], &v)
        }
        "max-h" => UtilityRule::each(
            Plugin::MaxHeight,
            &["max-height"],
            &keyword_or(t, value, &[
                ("none", "none"), ("full", "100%"), ("screen", "100vh"),
                ("min", "min-content"), ("max", "max-content"), ("fit", "fit-content"),
            ], false)?,
        ),
        "basis" => UtilityRule::each(
            Plugin::FlexBasis,
            &["flex-basis"],
            &keyword_or(t, value, &[("auto", "auto"), ("full", "100%")], true)?,
        ),
        "flex" => UtilityRule::each(Plugin::Flex, &["flex"], value.arbitrary()?),

        "text" => {
            if let Some((size, line)) = value.named().and_then(|key| t.font_size(key)) {
                UtilityRule::new(
                    Plugin::FontSize,
                    vec![("font-size", size.to_string()), ("line-height", line.to_string())],
                )
            } else if let Some(c) = color(t, value) {
                UtilityRule::each(Plugin::TextColor, &["color"], &c)
            } else {
                UtilityRule::each(Plugin::FontSize, &["font-size"], value.arbitrary()?)
            }
        }
        "font" => match value {
            Value::Named(key) => {
                if let Some(weight) = t.font_weight(key) {
                    UtilityRule::each(Plugin::FontWeight, &["font-weight"], weight)
                } else {
                    UtilityRule::each(Plugin::FontFamily, &["font-family"], t.font_family(key)?)
                }
            }
            Value::Arbitrary { .. } => {
                let v = value.arbitrary()?;
                if v.bytes().all(|b| b.is_ascii_digit()) {
                    UtilityRule::each(Plugin::FontWeight, &["font-weight"], v)
                } else {
                    UtilityRule::each(Plugin::FontFamily, &["font-family"], v)
                }
            }
        },
        "leading" => UtilityRule::each(
            Plugin::LineHeight,
            &["line-height"],
            &lookup_or_arbitrary(value, |key| t.line_height(key).map(str::to_string))?,
        ),
        "tracking" => {
            let v = lookup_or_arbitrary(value, |key| t.letter_spacing(key).map(str::to_string))?;
            UtilityRule::each(Plugin::LetterSpacing, &["letter-spacing"], &signed(v)?)
        }
        "decoration" => {
            if let Some(c) = color(t, value) {
                UtilityRule::each(Plugin::TextDecorationColor, &["text-decoration-color"], &c)
            } else {
                let v = lookup_or_arbitrary(value, |key| {
                    ["0", "1", "2", "4", "8"].contains(&key).then(|| format!("{key}px"))
                })?;
                UtilityRule::each(Plugin::TextDecoration, &["text-decoration-thickness"], &v)
            }
        }

        "bg" => {
            if let Some(c) = color(t, value) {
                UtilityRule::each(Plugin::BackgroundColor, &["background-color"], &c)
            } else {
                let v = value.arbitrary()?;
                let image = ["url(", "linear-gradient(", "radial-gradient(", "conic-gradient("]
                    .iter()
                    .any(|prefix| v.starts_with(prefix));
                if !image {
                    return None;
                }
                UtilityRule::each(Plugin::BackgroundImage, &["background-image"], v)
            }
        }
        "bg-gradient-to" => {
            let direction = match value.named()? {
                "t" => "top",
                "tr" => "top right",
                "r" => "right",
                "br" => "bottom right",
                "b" => "bottom",
                "bl" => "bottom left",
                "l" => "left",
                "tl" => "top left",
                _ => return None,
            };
            UtilityRule::each(
                Plugin::BackgroundImage,
                &["background-image"],
                &format!("linear-gradient(to {direction}, var(--tw-gradient-stops))"),
            )
        }
        "from" => {
            let c = color(t, value)?;
            UtilityRule::new(
                Plugin::GradientStops,
                vec![
                    ("--tw-gradient-from", c.clone()),
                    ("--tw-gradient-to", transparent_of(&c)),
                    ("--tw-gradient-stops", "var(--tw-gradient-from), var(--tw-gradient-to)".to_string()),
                ],
            )
        }
        "via" => {
            let c = color(t, value)?;
            UtilityRule::new(
                Plugin::GradientStops,
                vec![
                    ("--tw-gradient-to", transparent_of(&c)),
                    (
                        "--tw-gradient-stops",
                        format!("var(--tw-gradient-from), {c}, var(--tw-gradient-to)"),
                    ),
                ],
            )
        }
        "to" => UtilityRule::each(Plugin::GradientStops, &["--tw-gradient-to"], &color(t, value)?),

        "border" => border(t, value, &["border-width"], &["border-color"])?,
        "border-x" => border(
            t,
            value,
            &["border-left-width", "border-right-width"],
            &["border-left-color", "border-right-color"],
        )?,
        "border-y" => border(
            t,
            value,
            &["border-top-width", "border-bottom-width"],
            &["border-top-color", "border-bottom-color"],
        )?,
        "border-t" => border(t, value, &["border-top-width"], &["border-top-color"])?,
        "border-r" => border(t, value, &["border-right-width"], &["border-right-color"])?,
        "border-b" => border(t, value, &["border-bottom-width"], &["border-bottom-color"])?,
        "border-l" => border(t, value, &["border-left-width"], &["border-left-color"])?,

        "rounded" | "rounded-t" | "rounded-r" | "rounded-b" | "rounded-l" | "rounded-tl"
        | "rounded-tr" | "rounded-br" | "rounded-bl" => {
            let props: &[&'static str] = match root {
                "rounded" => &["border-radius"],
                "rounded-t" => &["border-top-left-radius", "border-top-right-radius"],
                "rounded-r" => &["border-top-right-radius", "border-bottom-right-radius"],
                "rounded-b" => &["border-bottom-right-radius", "border-bottom-left-radius"],
                "rounded-l" => &["border-top-left-radius", "border-bottom-left-radius"],
                "rounded-tl" => &["border-top-left-radius"],
                "rounded-tr" => &["border-top-right-radius"],
                "rounded-br" => &["border-bottom-right-radius"],
                _ => &["border-bottom-left-radius"],
            };
            let v = lookup_or_arbitrary(value, |key| t.radius(key).map(str::to_string))?;
            UtilityRule::each(Plugin::BorderRadius, props, &v)
        }

        "shadow" => UtilityRule::each(
            Plugin::BoxShadow,
            &["box-shadow"],
            &lookup_or_arbitrary(value, |key| t.shadow(key).map(str::to_string))?,
        ),
        "ring" => {
            let width = match value.named() {
                Some("DEFAULT") => Some("3px".to_string()),
                Some(key) if ["0", "1", "2", "4", "8"].contains(&key) => Some(format!("{key}px")),
                _ => None,
            };
            match width {
                Some(w) => UtilityRule::each(
                    Plugin::Ring,
                    &["box-shadow"],
                    &format!("0 0 0 {w} var(--tw-ring-color, rgb(59 130 246 / 0.5))"),
                ),
                None => UtilityRule::each(Plugin::RingColor, &["--tw-ring-color"], &color(t, value)?),
            }
        }
        "accent" => UtilityRule::each(Plugin::Accent, &["accent-color"], &color(t, value)?),
        "caret" => UtilityRule::each(Plugin::Caret, &["caret-color"], &color(t, value)?),
        "fill" => UtilityRule::each(Plugin::Fill, &["fill"], &color(t, value)?),
        "stroke" => UtilityRule::each(Plugin::Stroke, &["stroke"], &color(t, value)?),

        "opacity" => UtilityRule::each(
            Plugin::Opacity,
            &["opacity"],
            &lookup_or_arbitrary(value, |key| t.opacity(key))?,
        ),
        "z" => {
            let v = lookup_or_arbitrary(value, |key| t.z_index(key).map(str::to_string))?;
            UtilityRule::each(Plugin::ZIndex, &["z-index"], &signed(v)?)
        }
        "order" => {
            let v = lookup_or_arbitrary(value, |key| match key {
                "first" => Some("-9999".to_string()),
                "last" => Some("9999".to_string()),
                "none" => Some("0".to_string()),
                _ => in_range(key, 1, 12).map(|n| n.to_string()),
            })?;
            UtilityRule::each(Plugin::Order, &["order"], &signed(v)?)
        }

        "grid-cols" | "grid-rows" => {
            let v = lookup_or_arbitrary(value, |key| match key {
                "none" => Some("none".to_string()),
                "subgrid" => Some("subgrid".to_string()),
                _ => in_range(key, 1, 12).map(|n| format!("repeat({n}, minmax(0, 1fr))")),
            })?;
            if root == "grid-cols" {
                UtilityRule::each(Plugin::GridTemplateColumns, &["grid-template-columns"], &v)
            } else {
                UtilityRule::each(Plugin::GridTemplateRows, &["grid-template-rows"], &v)
            }
        }
        "col-span" | "row-span" => {
            let v = lookup_or_arbitrary(value, |key| match key {
                "full" => Some("1 / -1".to_string()),
                _ => in_range(key, 1, 12).map(|n| format!("span {n} / span {n}")),
            })?;
            if root == "col-span" {
                UtilityRule::each(Plugin::GridColumn, &["grid-column"], &v)
            } else {
                UtilityRule::each(Plugin::GridRow, &["grid-row"], &v)
            }
        }
        "col-start" | "col-end" => {
            let v = lookup_or_arbitrary(value, |key| match key {
                "auto" => Some("auto".to_string()),
                _ => in_range(key, 1, 13).map(|n| n.to_string()),
            })?;
            let prop = if root == "col-start" {
                "grid-column-start"
            } else {
                "grid-column-end"
            };
            UtilityRule::each(Plugin::GridColumn, &[prop], &v)
        }

        "duration" => UtilityRule::each(
            Plugin::Duration,
            &["transition-duration"],
            &lookup_or_arbitrary(value, |key| t.duration(key))?,
        ),
        "delay" => UtilityRule::each(
            Plugin::Delay,
            &["transition-delay"],
            &lookup_or_arbitrary(value, |key| t.duration(key))?,
        ),

        "scale" | "scale-x" | "scale-y" => {
            let v = signed(lookup_or_arbitrary(value, |key| t.scale(key))?)?;
            let mut declarations = Vec::with_capacity(3);
            if root != "scale-y" {
                declarations.push(("--tw-scale-x", v.clone()));
            }
            if root != "scale-x" {
                declarations.push(("--tw-scale-y", v));
            }
            declarations.push(("transform", TRANSFORM.to_string()));
            UtilityRule::new(Plugin::Transform, declarations)
        }
        "rotate" => {
            let v = signed(lookup_or_arbitrary(value, |key| t.rotation(key))?)?;
            UtilityRule::new(
                Plugin::Transform,
                vec![("--tw-rotate", v), ("transform", TRANSFORM.to_string())],
            )
        }
        "translate-x" | "translate-y" => {
            let v = signed(keyword_or(t, value, &[("full", "100%")], true)?)?;
            let var = if root == "translate-x" {
                "--tw-translate-x"
            } else {
                "--tw-translate-y"
            };
            UtilityRule::new(
                Plugin::Transform,
                vec![(var, v), ("transform", TRANSFORM.to_string())],
            )
        }

        "overflow" | "overflow-x" | "overflow-y" => {
            let v = value.named()?;
            if !["auto", "hidden", "clip", "visible", "scroll"].contains(&v) {
                return None;
            }
            let prop = match root {
                "overflow" => "overflow",
                "overflow-x" => "overflow-x",
                _ => "overflow-y",
            };
            UtilityRule::each(Plugin::Overflow, &[prop], v)
        }
        "aspect" => UtilityRule::each(Plugin::AspectRatio, &["aspect-ratio"], value.arbitrary()?),
        "line-clamp" => {
            let n = value.named()?;
            if n == "none" {
                UtilityRule::new(
                    Plugin::LineClamp,
                    vec![
                        ("overflow", "visible".to_string()),
                        ("display", "block".to_string()),
                        ("-webkit-box-orient", "horizontal".to_string()),
                        ("-webkit-line-clamp", "none".to_string()),
                    ],
                )
            } else {
                let n = in_range(n, 1, 6)?;
                UtilityRule::new(
                    Plugin::LineClamp,
                    vec![
                        ("overflow", "hidden".to_string()),
                        ("display", "-webkit-box".to_string()),
                        ("-webkit-box-orient", "vertical".to_string()),
                        ("-webkit-line-clamp", n.to_string()),
                    ],
                )
            }
        }

        _ => return None,
    };
    rule.arbitrary = matches!(value, Value::Arbitrary { .. });
    Some(rule)
}

/// Spacing scale or an arbitrary value.
fn spacing(theme: &Theme, value: &Value<'_>) -> Option<String> {
    lookup_or_arbitrary(value, |key| theme.spacing(key))
}

/// Keyword table, then (optionally) fractions, then the spacing scale.
fn keyword_or(
    theme: &Theme,
    value: &Value<'_>,
    keywords: &[(&str, &str)],
    fractions: bool,
) -> Option<String> {
    lookup_or_arbitrary(value, |key| {
        if let Some((_, v)) = keywords.iter().find(|(k, _)| *k == key) {
            return Some((*v).to_string());
        }
        if fractions && key.contains('/') {
            return theme.fraction(key);
        }
        theme.spacing(key)
    })
}

fn lookup_or_arbitrary(
    value: &Value<'_>,
    lookup: impl FnOnce(&str) -> Option<String>,
) -> Option<String> {
    match value {
        Value::Named(key) => lookup(*key),
        Value::Arbitrary { .. } => value.arbitrary().map(str::to_string),
    }
}

fn border(
    theme: &Theme,
    value: &Value<'_>,
    width_props: &[&'static str],
    color_props: &[&'static str],
) -> Option<UtilityRule> {
    if let Some(c) = color(theme, value) {
        return Some(UtilityRule::each(Plugin::BorderColor, color_props, &c));
    }
    let width = lookup_or_arbitrary(value, |key| match key {
        "DEFAULT" => Some("1px".to_string()),
        "0" | "2" | "4" | "8" => Some(format!("{key}px")),
        _ => None,
    })?;
    Some(UtilityRule::each(Plugin::BorderWidth, width_props, &width))
}

/// Palette color (with `/NN` modifier) or a color-like arbitrary value.
fn color(theme: &Theme, value: &Value<'_>) -> Option<String> {
    match value {
        Value::Named(name) => theme.color(name),
        Value::Arbitrary { value, modifier } => {
            if !is_color_like(value) {
                return None;
            }
            match modifier {
                None => Some(value.clone()),
                Some(m) => with_alpha(value, theme.opacity(m)?),
            }
        }
    }
}

fn is_color_like(value: &str) -> bool {
    const FUNCTIONS: &[&str] = &[
        "rgb(", "rgba(", "hsl(", "hsla(", "hwb(", "lab(", "lch(", "oklab(", "oklch(", "color(",
        "color-mix(",
    ];
    value.starts_with('#')
        || FUNCTIONS.iter().any(|f| value.starts_with(f))
        || value == "transparent"
        || value == "currentColor"
}

/// Fully transparent version of a color, for gradient fade-outs.
fn transparent_of(color: &str) -> String {
    with_alpha(color, "0".to_string()).unwrap_or_else(|| "transparent".to_string())
}

/// Negate a length. Keywords have no negative form.
fn negate(value: String) -> Option<String> {
    if value == "0" || value == "0px" {
        return Some(value);
    }
    if let Some(rest) = value.strip_prefix('-') {
        return Some(rest.to_string());
    }
    if value.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        return Some(format!("-{value}"));
    }
    let function = ["calc(", "var(", "min(", "max(", "clamp("]
        .iter()
        .any(|f| value.starts_with(f));
    function.then(|| format!("calc({value} * -1)"))
}

fn in_range(key: &str, min: u32, max: u32) -> Option<u32> {
    if key.starts_with('0') {
        return None;
    }
    key.parse().ok().filter(|n| (min..=max).contains(n))
}
