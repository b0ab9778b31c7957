//! ANSI SGR emission for resolved styles.
//!
//! Colours in a theme are ANSI indices (`"212"`) or hex strings
//! (`"#ff00ff"`, `"#f0f"`). They are downsampled to whatever the active
//! [`ColorProfile`] supports; the `Ascii` profile drops colours entirely
//! but keeps text attributes. Escape sequences are produced by
//! `crossterm::style` commands.

use std::fmt::Write as _;

use crossterm::style::{
    Attribute, Color as TermColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
};

use crate::style::StylePrimitive;

/// Terminal colour capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorProfile {
    /// No colour support. Attributes (bold, italic, ...) are still emitted.
    Ascii,
    /// 16 ANSI colours (4-bit).
    Ansi,
    /// 256 colours (8-bit).
    Ansi256,
    /// True colour (24-bit).
    #[default]
    TrueColor,
}

impl ColorProfile {
    /// Returns true if colours are emitted at all.
    #[must_use]
    pub fn has_color(self) -> bool {
        self != ColorProfile::Ascii
    }
}

/// A parsed theme colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    /// ANSI palette index (0-255).
    Indexed(u8),
    /// 24-bit colour.
    Rgb(u8, u8, u8),
}

impl Color {
    /// Parses an ANSI index or a `#rgb` / `#rrggbb` hex string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex);
        }
        s.parse::<u8>().ok().map(Color::Indexed)
    }

    /// Nearest colour `profile` can display, or `None` for `Ascii`.
    #[must_use]
    pub fn downsample(self, profile: ColorProfile) -> Option<TermColor> {
        let color = match (profile, self) {
            (ColorProfile::Ascii, _) => return None,
            (ColorProfile::TrueColor, Self::Rgb(r, g, b)) => TermColor::Rgb { r, g, b },
            (ColorProfile::TrueColor | ColorProfile::Ansi256, Self::Indexed(n)) => {
                TermColor::AnsiValue(n)
            }
            (ColorProfile::Ansi256, Self::Rgb(r, g, b)) => TermColor::AnsiValue(rgb_to_ansi256(r, g, b)),
            (ColorProfile::Ansi, Self::Rgb(r, g, b)) => TermColor::AnsiValue(rgb_to_ansi16(r, g, b)),
            (ColorProfile::Ansi, Self::Indexed(n)) if n < 16 => TermColor::AnsiValue(n),
            (ColorProfile::Ansi, Self::Indexed(n)) => {
                let (r, g, b) = ansi256_to_rgb(n);
                TermColor::AnsiValue(rgb_to_ansi16(r, g, b))
            }
        };
        Some(color)
    }

    /// Foreground escape sequence for `profile`, empty for `Ascii`.
    #[must_use]
    pub fn fg(self, profile: ColorProfile) -> String {
        self.downsample(profile)
            .map(|c| SetForegroundColor(c).to_string())
            .unwrap_or_default()
    }

    /// Background escape sequence for `profile`, empty for `Ascii`.
    #[must_use]
    pub fn bg(self, profile: ColorProfile) -> String {
        self.downsample(profile)
            .map(|c| SetBackgroundColor(c).to_string())
            .unwrap_or_default()
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        3 => {
            let r = u8::from_str_radix(&hex[0..1], 16).ok()? * 17;
            let g = u8::from_str_radix(&hex[1..2], 16).ok()? * 17;
            let b = u8::from_str_radix(&hex[2..3], 16).ok()? * 17;
            Some(Color::Rgb(r, g, b))
        }
        _ => None,
    }
}

/// Builds the SGR sequence that switches a terminal into `style`.
///
/// Returns an empty string when the style sets nothing visible under the
/// given profile.
#[must_use]
pub fn sgr_start(style: &StylePrimitive, profile: ColorProfile) -> String {
    let mut seq = String::new();
    let attrs = [
        (style.bold, Attribute::Bold),
        (style.faint, Attribute::Dim),
        (style.italic, Attribute::Italic),
        (style.underline, Attribute::Underlined),
        (style.blink, Attribute::SlowBlink),
        (style.inverse, Attribute::Reverse),
        (style.conceal, Attribute::Hidden),
        (style.crossed_out, Attribute::CrossedOut),
        (style.overlined, Attribute::OverLined),
    ];
    for (flag, attribute) in attrs {
        if flag == Some(true) {
            let _ = write!(seq, "{}", SetAttribute(attribute));
        }
    }
    if let Some(color) = style.color.as_deref().and_then(Color::parse) {
        seq.push_str(&color.fg(profile));
    }
    if let Some(color) = style.background_color.as_deref().and_then(Color::parse) {
        seq.push_str(&color.bg(profile));
    }
    seq
}

/// SGR reset.
pub const RESET: &str = "\x1b[0m";

/// Applies the style's case transform (upper, lower, title) to `text`.
#[must_use]
pub fn transform_case(style: &StylePrimitive, text: &str) -> String {
    if style.upper == Some(true) {
        text.to_uppercase()
    } else if style.lower == Some(true) {
        text.to_lowercase()
    } else if style.title == Some(true) {
        title_case(text)
    } else {
        text.to_string()
    }
}

fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.chars() {
        if c.is_whitespace() {
            at_word_start = true;
            out.push(c);
        } else if at_word_start {
            out.extend(c.to_uppercase());
            at_word_start = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Renders `text` in `style`: case transform, then SGR on every line.
///
/// Each line is wrapped in its own start/reset pair so styles never bleed
/// into indentation added later.
#[must_use]
pub fn render_text(style: &StylePrimitive, profile: ColorProfile, text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let text = transform_case(style, text);
    let start = sgr_start(style, profile);
    if start.is_empty() {
        return text;
    }
    let mut out = String::with_capacity(text.len() + start.len() + RESET.len());
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        if !line.is_empty() {
            out.push_str(&start);
            out.push_str(line);
            out.push_str(RESET);
        }
    }
    out
}

/// Display width of `s`, ignoring escape sequences.
#[must_use]
pub fn visible_width(s: &str) -> usize {
    textwrap::core::display_width(s)
}

/// Removes CSI and OSC escape sequences from `s`.
#[must_use]
pub fn strip(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\x1b' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('[') => {
                chars.next();
                for c in chars.by_ref() {
                    if ('@'..='~').contains(&c) {
                        break;
                    }
                }
            }
            Some(']') => {
                chars.next();
                while let Some(c) = chars.next() {
                    if c == '\x07' {
                        break;
                    }
                    if c == '\x1b' && chars.peek() == Some(&'\\') {
                        chars.next();
                        break;
                    }
                }
            }
            _ => {}
        }
    }
    out
}

/// Makes every line of `text` carry its own SGR state.
///
/// After word-wrapping, a styled run can start on one line and end on the
/// next. This closes open styling at the end of each line and re-opens it
/// at the start of the following one, so per-line prefixes (indent tokens,
/// margins) stay unstyled.
#[must_use]
pub fn balance_lines(text: &str) -> String {
    if !text.contains('\x1b') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut active = String::new();
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        if !active.is_empty() && !line.is_empty() {
            out.push_str(&active);
        }
        out.push_str(line);
        track_sgr(line, &mut active);
        if !active.is_empty() && !line.is_empty() {
            out.push_str(RESET);
        }
    }
    out
}

/// Updates `active` with the SGR sequences found in `line`.
fn track_sgr(line: &str, active: &mut String) {
    let mut rest = line;
    while let Some(pos) = rest.find("\x1b[") {
        let seq_start = &rest[pos..];
        let Some(end) = seq_start[2..].find(|c: char| ('@'..='~').contains(&c)) else {
            break;
        };
        let seq = &seq_start[..end + 3];
        if seq.ends_with('m') {
            let params = &seq[2..seq.len() - 1];
            if params.is_empty() || params == "0" {
                active.clear();
            } else {
                active.push_str(seq);
            }
        }
        rest = &seq_start[end + 3..];
    }
}

/// Truncates `s` to `max_width` visible cells, appending `…` if shortened.
///
/// Escape sequences are dropped from truncated output.
#[must_use]
pub fn truncate(s: &str, max_width: usize) -> String {
    if visible_width(s) <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let plain = strip(s);
    let target = max_width - 1;
    let mut out = String::new();
    let mut width = 0;
    for c in plain.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if width + w > target {
            break;
        }
        out.push(c);
        width += w;
    }
    out.push('…');
    out
}

// Color conversion helpers

/// Convert RGB to ANSI 256 color.
#[must_use]
pub fn rgb_to_ansi256(r: u8, g: u8, b: u8) -> u8 {
    if r == g && g == b {
        if r < 8 {
            return 16;
        }
        if r > 248 {
            return 231;
        }
        return ((f64::from(r) - 8.0) / 247.0 * 24.0).round() as u8 + 232;
    }

    let r_idx = (f64::from(r) / 255.0 * 5.0).round() as u8;
    let g_idx = (f64::from(g) / 255.0 * 5.0).round() as u8;
    let b_idx = (f64::from(b) / 255.0 * 5.0).round() as u8;

    16 + 36 * r_idx + 6 * g_idx + b_idx
}

/// Convert ANSI 256 to RGB.
#[must_use]
pub fn ansi256_to_rgb(n: u8) -> (u8, u8, u8) {
    if n < 16 {
        return ANSI_COLORS[n as usize];
    }
    if n >= 232 {
        let gray = (n - 232) * 10 + 8;
        return (gray, gray, gray);
    }
    let n = n - 16;
    ((n / 36) * 51, ((n % 36) / 6) * 51, (n % 6) * 51)
}

/// Convert RGB to the nearest of the 16 ANSI colors.
#[must_use]
pub fn rgb_to_ansi16(r: u8, g: u8, b: u8) -> u8 {
    let mut best = 0u8;
    let mut best_dist = u32::MAX;
    for (i, &(ar, ag, ab)) in ANSI_COLORS.iter().enumerate() {
        let dr = (i32::from(r) - i32::from(ar)).unsigned_abs();
        let dg = (i32::from(g) - i32::from(ag)).unsigned_abs();
        let db = (i32::from(b) - i32::from(ab)).unsigned_abs();
        let dist = dr * dr + dg * dg + db * db;
        if dist < best_dist {
            best_dist = dist;
            best = i as u8;
        }
    }
    best
}

const ANSI_COLORS: [(u8, u8, u8); 16] = [
    (0, 0, 0),
    (128, 0, 0),
    (0, 128, 0),
    (128, 128, 0),
    (0, 0, 128),
    (128, 0, 128),
    (0, 128, 128),
    (192, 192, 192),
    (128, 128, 128),
    (255, 0, 0),
    (0, 255, 0),
    (255, 255, 0),
    (0, 0, 255),
    (255, 0, 255),
    (0, 255, 255),
    (255, 255, 255),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_indexed_and_hex_colors() {
        assert_eq!(Color::parse("212"), Some(Color::Indexed(212)));
        assert_eq!(Color::parse("#ff0000"), Some(Color::Rgb(255, 0, 0)));
        assert_eq!(Color::parse("#0f0"), Some(Color::Rgb(0, 255, 0)));
        assert_eq!(Color::parse("256"), None);
        assert_eq!(Color::parse("red"), None);
        assert_eq!(Color::parse("#12345"), None);
    }

    #[test]
    fn color_sequences_follow_profile() {
        let c = Color::Indexed(63);
        assert_eq!(c.bg(ColorProfile::TrueColor), "\x1b[48;5;63m");
        assert_eq!(c.fg(ColorProfile::Ansi256), "\x1b[38;5;63m");
        assert_eq!(c.fg(ColorProfile::Ascii), "");
        assert_eq!(
            Color::Rgb(1, 2, 3).fg(ColorProfile::TrueColor),
            "\x1b[38;2;1;2;3m"
        );
        assert_eq!(Color::Indexed(1).fg(ColorProfile::Ansi), "\x1b[38;5;1m");
        assert_eq!(Color::Indexed(196).bg(ColorProfile::Ansi), "\x1b[48;5;9m");
    }

    #[test]
    fn reset_matches_crossterm() {
        assert_eq!(SetAttribute(Attribute::Reset).to_string(), RESET);
        assert_eq!(
            sgr_start(&StylePrimitive::new().bold(true).faint(true), ColorProfile::Ascii),
            "\x1b[1m\x1b[2m"
        );
    }

    #[test]
    fn render_text_wraps_each_line() {
        let style = StylePrimitive::new().bold(true);
        let out = render_text(&style, ColorProfile::TrueColor, "a\nb");
        assert_eq!(out, "\x1b[1ma\x1b[0m\n\x1b[1mb\x1b[0m");
    }

    #[test]
    fn render_text_without_style_is_plain() {
        let out = render_text(&StylePrimitive::new(), ColorProfile::TrueColor, "plain");
        assert_eq!(out, "plain");
    }

    #[test]
    fn ascii_profile_keeps_attributes_drops_colors() {
        let style = StylePrimitive::new().italic(true).color("205");
        let out = render_text(&style, ColorProfile::Ascii, "x");
        assert_eq!(out, "\x1b[3mx\x1b[0m");
    }

    #[test]
    fn case_transforms() {
        let upper = StylePrimitive {
            upper: Some(true),
            ..StylePrimitive::default()
        };
        let title = StylePrimitive {
            title: Some(true),
            ..StylePrimitive::default()
        };
        assert_eq!(transform_case(&upper, "hello"), "HELLO");
        assert_eq!(transform_case(&title, "hello big world"), "Hello Big World");
    }

    #[test]
    fn visible_width_ignores_escapes() {
        assert_eq!(visible_width("\x1b[1mhello\x1b[0m"), 5);
        assert_eq!(visible_width("日本"), 4);
    }

    #[test]
    fn strip_removes_csi_and_osc() {
        let s = "\x1b[1mbold\x1b[0m \x1b]8;;http://x\x1b\\link\x1b]8;;\x1b\\";
        assert_eq!(strip(s), "bold link");
    }

    #[test]
    fn balance_lines_reopens_style() {
        let s = "\x1b[1mone\ntwo\x1b[0m three";
        let balanced = balance_lines(s);
        assert_eq!(balanced, "\x1b[1mone\x1b[0m\n\x1b[1mtwo\x1b[0m three");
    }

    #[test]
    fn balance_lines_leaves_closed_runs_alone() {
        let s = "\x1b[1mone\x1b[0m\ntwo";
        assert_eq!(balance_lines(s), s);
    }

    #[test]
    fn truncate_adds_ellipsis() {
        assert_eq!(truncate("Hello, World!", 5), "Hell…");
        assert_eq!(truncate("Hi", 10), "Hi");
        assert_eq!(truncate("\x1b[1mbold text\x1b[0m", 4), "bol…");
    }

    #[test]
    fn grayscale_maps_to_gray_ramp() {
        assert_eq!(rgb_to_ansi256(0, 0, 0), 16);
        assert_eq!(rgb_to_ansi256(255, 255, 255), 231);
        assert_eq!(rgb_to_ansi256(255, 0, 0), 196);
    }
}
