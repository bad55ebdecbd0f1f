//! Fixed base theme for utility generation.
//!
//! The scales follow the default utility-first theme: a quarter-rem spacing
//! scale, the 22-family color palette with 11 shades each, type scale with
//! paired line heights, and the usual radius, shadow and breakpoint sets.

use rustc_hash::FxHashMap as HashMap;

/// Shade steps shared by every palette family.
const SHADES: [&str; 11] = [
    "50", "100", "200", "300", "400", "500", "600", "700", "800", "900", "950",
];

/// Palette families with one hex value per entry of [`SHADES`].
const PALETTE: &[(&str, [&str; 11])] = &[
    ("slate", ["#f8fafc", "#f1f5f9", "#e2e8f0", "#cbd5e1", "#94a3b8", "#64748b", "#475569", "#334155", "#1e293b", "#0f172a", "#020617"]),
    ("gray", ["#f9fafb", "#f3f4f6", "#e5e7eb", "#d1d5db", "#9ca3af", "#6b7280", "#4b5563", "#374151", "#1f2937", "#111827", "#030712"]),
    ("zinc", ["#fafafa", "#f4f4f5", "#e4e4e7", "#d4d4d8", "#a1a1aa", "#71717a", "#52525b", "#3f3f46", "#27272a", "#18181b", "#09090b"]),
    ("neutral", ["#fafafa", "#f5f5f5", "#e5e5e5", "#d4d4d4", "#a3a3a3", "#737373", "#525252", "#404040", "#262626", "#171717", "#0a0a0a"]),
    ("stone", ["#fafaf9", "#f5f5f4", "#e7e5e4", "#d6d3d1", "#a8a29e", "#78716c", "#57534e", "#44403c", "#292524", "#1c1917", "#0c0a09"]),
    ("red", ["#fef2f2", "#fee2e2", "#fecaca", "#fca5a5", "#f87171", "#ef4444", "#dc2626", "#b91c1c", "#991b1b", "#7f1d1d", "#450a0a"]),
    ("orange", ["#fff7ed", "#ffedd5", "#fed7aa", "#fdba74", "#fb923c", "#f97316", "#ea580c", "#c2410c", "#9a3412", "#7c2d12", "#431407"]),
    ("amber", ["#fffbeb", "#fef3c7", "#fde68a", "#fcd34d", "#fbbf24", "#f59e0b", "#d97706", "#b45309", "#92400e", "#78350f", "#451a03"]),
    ("yellow", ["#fefce8", "#fef9c3", "#fef08a", "#fde047", "#facc15", "#eab308", "#ca8a04", "#a16207", "#854d0e", "#713f12", "#422006"]),
    ("lime", ["#f7fee7", "#ecfccb", "#d9f99d", "#bef264", "#a3e635", "#84cc16", "#65a30d", "#4d7c0f", "#3f6212", "#365314", "#1a2e05"]),
    ("green", ["#f0fdf4", "#dcfce7", "#bbf7d0", "#86efac", "#4ade80", "#22c55e", "#16a34a", "#15803d", "#166534", "#14532d", "#052e16"]),
    ("emerald", ["#ecfdf5", "#d1fae5", "#a7f3d0", "#6ee7b7", "#34d399", "#10b981", "#059669", "#047857", "#065f46", "#064e3b", "#022c22"]),
    ("teal", ["#f0fdfa", "#ccfbf1", "#99f6e4", "#5eead4", "#2dd4bf", "#14b8a6", "#0d9488", "#0f766e", "#115e59", "#134e4a", "#042f2e"]),
    ("cyan", ["#ecfeff", "#cffafe", "#a5f3fc", "#67e8f9", "#22d3ee", "#06b6d4", "#0891b2", "#0e7490", "#155e75", "#164e63", "#083344"]),
    ("sky", ["#f0f9ff", "#e0f2fe", "#bae6fd", "#7dd3fc", "#38bdf8", "#0ea5e9", "#0284c7", "#0369a1", "#075985", "#0c4a6e", "#082f49"]),
    ("blue", ["#eff6ff", "#dbeafe", "#bfdbfe", "#93c5fd", "#60a5fa", "#3b82f6", "#2563eb", "#1d4ed8", "#1e40af", "#1e3a8a", "#172554"]),
    ("indigo", ["#eef2ff", "#e0e7ff", "#c7d2fe", "#a5b4fc", "#818cf8", "#6366f1", "#4f46e5", "#4338ca", "#3730a3", "#312e81", "#1e1b4b"]),
    ("violet", ["#f5f3ff", "#ede9fe", "#ddd6fe", "#c4b5fd", "#a78bfa", "#8b5cf6", "#7c3aed", "#6d28d9", "#5b21b6", "#4c1d95", "#2e1065"]),
    ("purple", ["#faf5ff", "#f3e8ff", "#e9d5ff", "#d8b4fe", "#c084fc", "#a855f7", "#9333ea", "#7e22ce", "#6b21a8", "#581c87", "#3b0764"]),
    ("fuchsia", ["#fdf4ff", "#fae8ff", "#f5d0fe", "#f0abfc", "#e879f9", "#d946ef", "#c026d3", "#a21caf", "#86198f", "#701a75", "#4a044e"]),
    ("pink", ["#fdf2f8", "#fce7f3", "#fbcfe8", "#f9a8d4", "#f472b6", "#ec4899", "#db2777", "#be185d", "#9d174d", "#831843", "#500724"]),
    ("rose", ["#fff1f2", "#ffe4e6", "#fecdd3", "#fda4af", "#fb7185", "#f43f5e", "#e11d48", "#be123c", "#9f1239", "#881337", "#4c0519"]),
];

/// Keys of the spacing scale, in rem quarters except `px`.
const SPACING_KEYS: &[&str] = &[
    "0", "px", "0.5", "1", "1.5", "2", "2.5", "3", "3.5", "4", "5", "6", "7", "8", "9", "10",
    "11", "12", "14", "16", "20", "24", "28", "32", "36", "40", "44", "48", "52", "56", "60",
    "64", "72", "80", "96",
];

const FONT_SIZES: &[(&str, &str, &str)] = &[
    ("xs", "0.75rem", "1rem"),
    ("sm", "0.875rem", "1.25rem"),
    ("base", "1rem", "1.5rem"),
    ("lg", "1.125rem", "1.75rem"),
    ("xl", "1.25rem", "1.75rem"),
    ("2xl", "1.5rem", "2rem"),
    ("3xl", "1.875rem", "2.25rem"),
    ("4xl", "2.25rem", "2.5rem"),
    ("5xl", "3rem", "1"),
    ("6xl", "3.75rem", "1"),
    ("7xl", "4.5rem", "1"),
    ("8xl", "6rem", "1"),
    ("9xl", "8rem", "1"),
];

const FONT_WEIGHTS: &[(&str, &str)] = &[
    ("thin", "100"),
    ("extralight", "200"),
    ("light", "300"),
    ("normal", "400"),
    ("medium", "500"),
    ("semibold", "600"),
    ("bold", "700"),
    ("extrabold", "800"),
    ("black", "900"),
];

const FONT_FAMILIES: &[(&str, &str)] = &[
    ("sans", "ui-sans-serif, system-ui, sans-serif, \"Apple Color Emoji\", \"Segoe UI Emoji\", \"Segoe UI Symbol\", \"Noto Color Emoji\""),
    ("serif", "ui-serif, Georgia, Cambria, \"Times New Roman\", Times, serif"),
    ("mono", "ui-monospace, SFMono-Regular, Menlo, Monaco, Consolas, \"Liberation Mono\", \"Courier New\", monospace"),
];

const RADII: &[(&str, &str)] = &[
    ("none", "0px"),
    ("sm", "0.125rem"),
    ("DEFAULT", "0.25rem"),
    ("md", "0.375rem"),
    ("lg", "0.5rem"),
    ("xl", "0.75rem"),
    ("2xl", "1rem"),
    ("3xl", "1.5rem"),
    ("full", "9999px"),
];

const SHADOWS: &[(&str, &str)] = &[
    ("sm", "0 1px 2px 0 rgb(0 0 0 / 0.05)"),
    ("DEFAULT", "0 1px 3px 0 rgb(0 0 0 / 0.1), 0 1px 2px -1px rgb(0 0 0 / 0.1)"),
    ("md", "0 4px 6px -1px rgb(0 0 0 / 0.1), 0 2px 4px -2px rgb(0 0 0 / 0.1)"),
    ("lg", "0 10px 15px -3px rgb(0 0 0 / 0.1), 0 4px 6px -4px rgb(0 0 0 / 0.1)"),
    ("xl", "0 20px 25px -5px rgb(0 0 0 / 0.1), 0 8px 10px -6px rgb(0 0 0 / 0.1)"),
    ("2xl", "0 25px 50px -12px rgb(0 0 0 / 0.25)"),
    ("inner", "inset 0 2px 4px 0 rgb(0 0 0 / 0.05)"),
    ("none", "0 0 #0000"),
];

/// Responsive breakpoints, smallest first.
pub const BREAKPOINTS: &[(&str, &str)] = &[
    ("sm", "640px"),
    ("md", "768px"),
    ("lg", "1024px"),
    ("xl", "1280px"),
    ("2xl", "1536px"),
];

const MAX_WIDTHS: &[(&str, &str)] = &[
    ("0", "0rem"),
    ("none", "none"),
    ("xs", "20rem"),
    ("sm", "24rem"),
    ("md", "28rem"),
    ("lg", "32rem"),
    ("xl", "36rem"),
    ("2xl", "42rem"),
    ("3xl", "48rem"),
    ("4xl", "56rem"),
    ("5xl", "64rem"),
    ("6xl", "72rem"),
    ("7xl", "80rem"),
    ("full", "100%"),
    ("min", "min-content"),
    ("max", "max-content"),
    ("fit", "fit-content"),
    ("prose", "65ch"),
    ("screen-sm", "640px"),
    ("screen-md", "768px"),
    ("screen-lg", "1024px"),
    ("screen-xl", "1280px"),
    ("screen-2xl", "1536px"),
];

const LINE_HEIGHTS: &[(&str, &str)] = &[
    ("none", "1"),
    ("tight", "1.25"),
    ("snug", "1.375"),
    ("normal", "1.5"),
    ("relaxed", "1.625"),
    ("loose", "2"),
    ("3", ".75rem"),
    ("4", "1rem"),
    ("5", "1.25rem"),
    ("6", "1.5rem"),
    ("7", "1.75rem"),
    ("8", "2rem"),
    ("9", "2.25rem"),
    ("10", "2.5rem"),
];

const LETTER_SPACING: &[(&str, &str)] = &[
    ("tighter", "-0.05em"),
    ("tight", "-0.025em"),
    ("normal", "0em"),
    ("wide", "0.025em"),
    ("wider", "0.05em"),
    ("widest", "0.1em"),
];

const OPACITY_STEPS: &[u32] = &[
    0, 5, 10, 15, 20, 25, 30, 35, 40, 45, 50, 55, 60, 65, 70, 75, 80, 85, 90, 95, 100,
];

const Z_INDEX: &[&str] = &["0", "10", "20", "30", "40", "50", "auto"];

const DURATIONS: &[&str] = &["0", "75", "100", "150", "200", "300", "500", "700", "1000"];

const SCALES: &[&str] = &["0", "50", "75", "90", "95", "100", "105", "110", "125", "150"];

const ROTATIONS: &[&str] = &["0", "1", "2", "3", "6", "12", "45", "90", "180"];

const FRACTION_DENOMINATORS: &[u32] = &[2, 3, 4, 5, 6, 12];

/// The resolved theme.
#[derive(Debug, Clone)]
pub struct Theme {
    colors: HashMap<String, String>,
}

impl Default for Theme {
    fn default() -> Self {
        Self::new()
    }
}

impl Theme {
    /// Build the default theme.
    #[must_use]
    pub fn new() -> Self {
        let mut colors = HashMap::default();
        for (family, hexes) in PALETTE {
            for (shade, hex) in SHADES.iter().zip(hexes.iter()) {
                colors.insert(format!("{family}-{shade}"), (*hex).to_string());
            }
        }
        for (name, value) in [
            ("inherit", "inherit"),
            ("current", "currentColor"),
            ("transparent", "transparent"),
            ("black", "#000"),
            ("white", "#fff"),
        ] {
            colors.insert(name.to_string(), value.to_string());
        }
        Self { colors }
    }

    /// Number of named colors.
    #[must_use]
    pub fn color_count(&self) -> usize {
        self.colors.len()
    }

    /// A named color, optionally with an `/NN` opacity modifier.
    ///
    /// The modifier must be a step of the opacity scale and only applies to
    /// hex colors, which are rewritten to `rgb(r g b / a)`.
    #[must_use]
    pub fn color(&self, name: &str) -> Option<String> {
        let (base, modifier) = match name.rsplit_once('/') {
            Some((base, modifier)) => (base, Some(modifier)),
            None => (name, None),
        };
        let value = self.colors.get(base)?;
        match modifier {
            None => Some(value.clone()),
            Some(modifier) => with_alpha(value, opacity_value(modifier)?),
        }
    }

    /// Spacing scale value.
    #[must_use]
    pub fn spacing(&self, key: &str) -> Option<String> {
        if !SPACING_KEYS.contains(&key) {
            return None;
        }
        match key {
            "0" => Some("0px".to_string()),
            "px" => Some("1px".to_string()),
            _ => {
                let quarters: f64 = key.parse().ok()?;
                Some(format!("{}rem", trim_float(quarters / 4.0)))
            }
        }
    }

    /// Percentage for a fraction such as `1/3`.
    #[must_use]
    pub fn fraction(&self, key: &str) -> Option<String> {
        let (num, den) = key.split_once('/')?;
        let num: u32 = num.parse().ok()?;
        let den: u32 = den.parse().ok()?;
        if num == 0 || num >= den || !FRACTION_DENOMINATORS.contains(&den) {
            return None;
        }
        let pct = f64::from(num) * 100.0 / f64::from(den);
        Some(format!("{}%", trim_float((pct * 1_000_000.0).round() / 1_000_000.0)))
    }

    /// `(font-size, line-height)` for a type scale step.
    #[must_use]
    pub fn font_size(&self, key: &str) -> Option<(&'static str, &'static str)> {
        FONT_SIZES
            .iter()
            .find(|(k, _, _)| *k == key)
            .map(|(_, size, line)| (*size, *line))
    }

    #[must_use]
    pub fn font_weight(&self, key: &str) -> Option<&'static str> {
        lookup(FONT_WEIGHTS, key)
    }

    #[must_use]
    pub fn font_family(&self, key: &str) -> Option<&'static str> {
        lookup(FONT_FAMILIES, key)
    }

    /// Border radius; `DEFAULT` is the bare `rounded` value.
    #[must_use]
    pub fn radius(&self, key: &str) -> Option<&'static str> {
        lookup(RADII, key)
    }

    /// Box shadow; `DEFAULT` is the bare `shadow` value.
    #[must_use]
    pub fn shadow(&self, key: &str) -> Option<&'static str> {
        lookup(SHADOWS, key)
    }

    #[must_use]
    pub fn breakpoint(&self, key: &str) -> Option<&'static str> {
        lookup(BREAKPOINTS, key)
    }

    #[must_use]
    pub fn max_width(&self, key: &str) -> Option<&'static str> {
        lookup(MAX_WIDTHS, key)
    }

    #[must_use]
    pub fn line_height(&self, key: &str) -> Option<&'static str> {
        lookup(LINE_HEIGHTS, key)
    }

    #[must_use]
    pub fn letter_spacing(&self, key: &str) -> Option<&'static str> {
        lookup(LETTER_SPACING, key)
    }

    /// Opacity step as a `0..=1` number.
    #[must_use]
    pub fn opacity(&self, key: &str) -> Option<String> {
        opacity_value(key)
    }

    #[must_use]
    pub fn z_index(&self, key: &str) -> Option<&'static str> {
        Z_INDEX.iter().find(|z| **z == key).copied()
    }

    /// Transition duration in milliseconds.
    #[must_use]
    pub fn duration(&self, key: &str) -> Option<String> {
        DURATIONS
            .iter()
            .find(|d| **d == key)
            .map(|d| format!("{d}ms"))
    }

    #[must_use]
    pub fn scale(&self, key: &str) -> Option<String> {
        let step = SCALES.iter().find(|s| **s == key)?;
        let value: f64 = step.parse().ok()?;
        Some(trim_float(value / 100.0))
    }

    #[must_use]
    pub fn rotation(&self, key: &str) -> Option<String> {
        ROTATIONS
            .iter()
            .find(|r| **r == key)
            .map(|r| format!("{r}deg"))
    }
}

fn lookup(table: &[(&str, &'static str)], key: &str) -> Option<&'static str> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

fn opacity_value(key: &str) -> Option<String> {
    let step: u32 = key.parse().ok()?;
    if !OPACITY_STEPS.contains(&step) {
        return None;
    }
    Some(trim_float(f64::from(step) / 100.0))
}

/// Rewrite a hex color as `rgb(r g b / alpha)`.
#[must_use]
pub fn with_alpha(color: &str, alpha: String) -> Option<String> {
    let (r, g, b) = parse_hex(color)?;
    Some(format!("rgb({r} {g} {b} / {alpha})"))
}

/// Parse `#rgb` or `#rrggbb`.
#[must_use]
pub fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let mut it = hex.chars().map(|c| c.to_digit(16));
            let r = it.next()??;
            let g = it.next()??;
            let b = it.next()??;
            let expand = |d: u32| u8::try_from(d * 17).ok();
            Some((expand(r)?, expand(g)?, expand(b)?))
        }
        6 => Some((
            channel(hex.get(0..2)?)?,
            channel(hex.get(2..4)?)?,
            channel(hex.get(4..6)?)?,
        )),
        _ => None,
    }
}

/// Format a float without trailing zeros (`0.5`, `1`, `2.25`).
fn trim_float(value: f64) -> String {
    let text = format!("{value:.6}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text.is_empty() || text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_size() {
        let theme = Theme::new();
        assert_eq!(theme.color_count(), 22 * 11 + 5);
        assert_eq!(theme.color("red-500").as_deref(), Some("#ef4444"));
        assert_eq!(theme.color("blue-950").as_deref(), Some("#172554"));
        assert_eq!(theme.color("current").as_deref(), Some("currentColor"));
        assert!(theme.color("red-550").is_none());
    }

    #[test]
    fn test_color_opacity_modifier() {
        let theme = Theme::new();
        assert_eq!(
            theme.color("black/50").as_deref(),
            Some("rgb(0 0 0 / 0.5)")
        );
        assert_eq!(
            theme.color("blue-500/25").as_deref(),
            Some("rgb(59 130 246 / 0.25)")
        );
        assert!(theme.color("blue-500/33").is_none());
        assert!(theme.color("current/50").is_none());
    }

    #[test]
    fn test_spacing_scale() {
        let theme = Theme::new();
        assert_eq!(theme.spacing("0").as_deref(), Some("0px"));
        assert_eq!(theme.spacing("px").as_deref(), Some("1px"));
        assert_eq!(theme.spacing("0.5").as_deref(), Some("0.125rem"));
        assert_eq!(theme.spacing("4").as_deref(), Some("1rem"));
        assert_eq!(theme.spacing("96").as_deref(), Some("24rem"));
        assert!(theme.spacing("13").is_none());
    }

    #[test]
    fn test_fractions() {
        let theme = Theme::new();
        assert_eq!(theme.fraction("1/2").as_deref(), Some("50%"));
        assert_eq!(theme.fraction("1/3").as_deref(), Some("33.333333%"));
        assert_eq!(theme.fraction("3/4").as_deref(), Some("75%"));
        assert!(theme.fraction("4/4").is_none());
        assert!(theme.fraction("1/7").is_none());
    }

    #[test]
    fn test_type_scale() {
        let theme = Theme::new();
        assert_eq!(theme.font_size("sm"), Some(("0.875rem", "1.25rem")));
        assert_eq!(theme.font_weight("semibold"), Some("600"));
        assert_eq!(theme.line_height("relaxed"), Some("1.625"));
    }

    #[test]
    fn test_misc_scales() {
        let theme = Theme::new();
        assert_eq!(theme.opacity("75").as_deref(), Some("0.75"));
        assert_eq!(theme.opacity("100").as_deref(), Some("1"));
        assert_eq!(theme.duration("150").as_deref(), Some("150ms"));
        assert_eq!(theme.scale("105").as_deref(), Some("1.05"));
        assert_eq!(theme.rotation("45").as_deref(), Some("45deg"));
        assert_eq!(theme.breakpoint("md"), Some("768px"));
        assert_eq!(theme.z_index("auto"), Some("auto"));
    }

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("#fff"), Some((255, 255, 255)));
        assert_eq!(parse_hex("#3b82f6"), Some((59, 130, 246)));
        assert_eq!(parse_hex("red"), None);
        assert_eq!(parse_hex("#12345"), None);
    }
}
