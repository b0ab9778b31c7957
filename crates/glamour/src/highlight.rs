//! Syntax highlighting for fenced code blocks.
//!
//! Highlighting themes are derived from the code block style (its `chroma`
//! palette, or a named built-in syntect theme) and cached in a
//! [`ThemeRegistry`]. The registry is an explicit object: share one between
//! renderers by handing each the same `Arc`.
//!
//! ```rust
//! use std::sync::Arc;
//! use glamour::{Renderer, Style};
//! use glamour::highlight::ThemeRegistry;
//!
//! let registry = Arc::new(ThemeRegistry::new());
//! let a = Renderer::new().with_theme_registry(Arc::clone(&registry));
//! let b = Renderer::new().with_style(Style::Light).with_theme_registry(Arc::clone(&registry));
//! # let _ = (a, b);
//! ```

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, LazyLock, Mutex, PoisonError};

use syntect::easy::HighlightLines;
use syntect::highlighting::{
    Color as SyntectColor, FontStyle, ScopeSelectors, Style as SyntectStyle, StyleModifier, Theme,
    ThemeItem, ThemeSet,
};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;
use tracing::trace;

use crate::ansi::{self, Color, ColorProfile};
use crate::error::HighlightError;
use crate::style::{StyleChroma, StyleCodeBlock, StylePrimitive};

/// Lazily loaded syntax set containing all default language definitions.
pub static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);

/// Lazily loaded built-in syntect themes.
pub static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

// ============================================================================
// Theme Registry
// ============================================================================

/// Cache of highlighting themes, keyed by name.
///
/// Each name is registered at most once. The lock covers only the lookup
/// and insertion, never the highlighting itself.
#[derive(Debug, Default)]
pub struct ThemeRegistry {
    themes: Mutex<HashMap<String, Arc<Theme>>>,
}

impl ThemeRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the theme registered under `name`, building and registering
    /// it first if needed.
    ///
    /// # Errors
    ///
    /// Propagates errors from `build` and reports a poisoned lock.
    pub fn get_or_register(
        &self,
        name: &str,
        build: impl FnOnce() -> Result<Theme, HighlightError>,
    ) -> Result<Arc<Theme>, HighlightError> {
        let mut themes = self.themes.lock().map_err(|_| HighlightError::Poisoned)?;
        if let Some(theme) = themes.get(name) {
            trace!(theme.name = name, "theme registry hit");
            return Ok(Arc::clone(theme));
        }
        trace!(theme.name = name, "theme registry miss");
        let theme = Arc::new(build()?);
        themes.insert(name.to_string(), Arc::clone(&theme));
        Ok(theme)
    }

    /// Whether a theme is registered under `name`.
    ///
    /// Reads through a poisoned lock: entries are inserted whole, so the
    /// map is still consistent.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.themes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    /// Number of registered themes, read through a poisoned lock like
    /// [`ThemeRegistry::contains`].
    #[must_use]
    pub fn len(&self) -> usize {
        self.themes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no theme has been registered yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// Highlighting
// ============================================================================

/// Highlights `code` as `language` using the theme described by
/// `code_block`, appending ANSI-styled text to `out`.
///
/// Nothing is written unless the whole block highlights successfully.
///
/// # Errors
///
/// Returns [`HighlightError`] for an unknown language or theme, or when the
/// highlighter fails. Callers fall back to plain text.
pub fn highlight(
    out: &mut String,
    code: &str,
    language: &str,
    code_block: &StyleCodeBlock,
    registry: &ThemeRegistry,
    profile: ColorProfile,
) -> Result<(), HighlightError> {
    let syntax =
        find_syntax(language).ok_or_else(|| HighlightError::UnknownLanguage(language.to_string()))?;
    let name = code_block.theme_name();
    if name.is_empty() {
        return Err(HighlightError::UnknownTheme(name));
    }
    let theme = registry.get_or_register(&name, || build_theme(&name, code_block))?;

    let default_background = theme.settings.background;
    let mut highlighter = HighlightLines::new(syntax, &theme);
    let mut buf = String::with_capacity(code.len() * 2);
    for line in LinesWithEndings::from(code) {
        for (style, text) in highlighter.highlight_line(line, &SYNTAX_SET)? {
            let primitive = token_style(style, default_background);
            buf.push_str(&ansi::render_text(&primitive, profile, text));
        }
    }
    out.push_str(&buf);
    Ok(())
}

fn build_theme(name: &str, code_block: &StyleCodeBlock) -> Result<Theme, HighlightError> {
    if let Some(chroma) = &code_block.chroma {
        return theme_from_chroma(name, chroma);
    }
    THEME_SET
        .themes
        .get(name)
        .cloned()
        .ok_or_else(|| HighlightError::UnknownTheme(name.to_string()))
}

/// Builds a syntect theme from a palette.
///
/// # Errors
///
/// Returns [`HighlightError::UnknownTheme`] if a palette colour cannot be
/// converted.
pub fn theme_from_chroma(name: &str, chroma: &StyleChroma) -> Result<Theme, HighlightError> {
    let invalid = || HighlightError::UnknownTheme(name.to_string());
    let mut theme = Theme {
        name: Some(name.to_string()),
        ..Theme::default()
    };
    theme.settings.foreground = chroma
        .text
        .as_ref()
        .and_then(|t| t.color.as_deref())
        .and_then(to_syntect_color);
    theme.settings.background = chroma
        .background
        .as_ref()
        .and_then(|b| b.background_color.as_deref())
        .and_then(to_syntect_color);

    for (_, selector, style) in chroma.scoped_entries() {
        let scope = ScopeSelectors::from_str(selector).map_err(|_| invalid())?;
        theme.scopes.push(ThemeItem {
            scope,
            style: StyleModifier {
                foreground: style.color.as_deref().and_then(to_syntect_color),
                background: style.background_color.as_deref().and_then(to_syntect_color),
                font_style: font_style(style),
            },
        });
    }
    Ok(theme)
}

// Palette indices are carried in the red channel with a zero alpha, so they
// come back out as indices rather than approximated RGB.
fn to_syntect_color(value: &str) -> Option<SyntectColor> {
    match Color::parse(value)? {
        Color::Indexed(n) => Some(SyntectColor { r: n, g: 0, b: 0, a: 0 }),
        Color::Rgb(r, g, b) => Some(SyntectColor { r, g, b, a: 0xFF }),
    }
}

fn from_syntect_color(color: SyntectColor) -> String {
    if color.a == 0 {
        color.r.to_string()
    } else {
        format!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b)
    }
}

fn font_style(style: &StylePrimitive) -> Option<FontStyle> {
    let mut font = FontStyle::empty();
    if style.bold == Some(true) {
        font |= FontStyle::BOLD;
    }
    if style.italic == Some(true) {
        font |= FontStyle::ITALIC;
    }
    if style.underline == Some(true) {
        font |= FontStyle::UNDERLINE;
    }
    (!font.is_empty()).then_some(font)
}

fn token_style(style: SyntectStyle, default_background: Option<SyntectColor>) -> StylePrimitive {
    let mut primitive = StylePrimitive::new().color(from_syntect_color(style.foreground));
    if default_background.is_some_and(|bg| bg != style.background) {
        primitive = primitive.background_color(from_syntect_color(style.background));
    }
    if style.font_style.contains(FontStyle::BOLD) {
        primitive = primitive.bold(true);
    }
    if style.font_style.contains(FontStyle::ITALIC) {
        primitive = primitive.italic(true);
    }
    if style.font_style.contains(FontStyle::UNDERLINE) {
        primitive = primitive.underline(true);
    }
    primitive
}

// ============================================================================
// Language Detection
// ============================================================================

/// Finds the syntax definition for a fence language, following common
/// aliases (`rs`, `js`, `py`, ...) and file extensions.
#[must_use]
pub fn find_syntax(language: &str) -> Option<&'static SyntaxReference> {
    let lang = language.trim().to_lowercase();
    if lang.is_empty() {
        return None;
    }
    SYNTAX_SET
        .find_syntax_by_token(&lang)
        .or_else(|| SYNTAX_SET.find_syntax_by_token(resolve_alias(&lang)))
        .or_else(|| SYNTAX_SET.find_syntax_by_extension(&lang))
}

/// Whether a fence language can be highlighted.
#[must_use]
pub fn is_supported(language: &str) -> bool {
    find_syntax(language).is_some()
}

fn resolve_alias(lang: &str) -> &str {
    match lang {
        "js" | "mjs" | "cjs" | "jsx" => "javascript",
        "ts" | "mts" | "cts" | "tsx" => "typescript",
        "rs" => "rust",
        "py" | "python3" | "py3" | "pyw" => "python",
        "rb" => "ruby",
        "sh" | "zsh" | "ksh" | "shell" | "shellscript" | "console" => "bash",
        "md" => "markdown",
        "htm" | "xhtml" => "html",
        "yml" => "yaml",
        "c++" | "cxx" | "hpp" | "hxx" | "cc" | "hh" => "cpp",
        "h" => "c",
        "objc" => "objective-c",
        "cs" | "csharp" => "c#",
        "golang" => "go",
        "kt" | "kts" => "kotlin",
        "clj" | "cljs" | "cljc" => "clojure",
        "ex" | "exs" => "elixir",
        "erl" | "hrl" => "erlang",
        "hs" | "lhs" => "haskell",
        "ml" | "mli" => "ocaml",
        "jsonc" | "json5" => "json",
        "tex" | "latex" => "latex",
        "pl" | "pm" => "perl",
        "bat" | "cmd" => "batch file",
        "make" | "mk" | "mak" => "makefile",
        "patch" => "diff",
        _ => lang,
    }
}
