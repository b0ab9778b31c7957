#![forbid(unsafe_code)]

//! # Glamour
//!
//! Renders markdown as styled text for ANSI terminals.
//!
//! A document is parsed into a typed tree, each node is dispatched to the
//! renderer for its construct, and every block is laid out in its own
//! context (word-wrap, indentation, margins) before being flushed into the
//! enclosing block. Themes are plain data and can be loaded from JSON.
//!
//! - Styled headings, lists, task lists, block quotes and tables
//! - Code blocks with syntax highlighting (feature `syntax-highlighting`)
//! - Links resolved against a base URL, images, emoji shortcodes
//! - Built-in themes (dark, light, ascii, pink, dracula) and custom JSON themes
//!
//! ## Example
//!
//! ```rust
//! use glamour::{render, Renderer, Style};
//!
//! // Quick render with the dark style
//! let output = render("# Hello\n\nThis is **bold** text.", Style::Dark).unwrap();
//! println!("{output}");
//!
//! // Custom renderer with word wrap
//! let renderer = Renderer::new()
//!     .with_style(Style::Light)
//!     .with_word_wrap(60);
//! let output = renderer.render("# Heading\n\nParagraph text.").unwrap();
//! assert!(output.contains("Paragraph text."));
//! ```
//!
//! ## Streaming
//!
//! [`Renderer`] implements [`std::io::Write`] for input and
//! [`std::io::Read`] for output. Input is buffered until
//! [`Renderer::close`] renders it.
//!
//! ```rust
//! use std::io::{Read, Write};
//! use glamour::{Renderer, Style};
//!
//! let mut renderer = Renderer::new().with_style(Style::Ascii);
//! renderer.write_all(b"# Streamed\n").unwrap();
//! renderer.close().unwrap();
//! let mut out = String::new();
//! renderer.read_to_string(&mut out).unwrap();
//! assert!(out.contains("# Streamed"));
//! ```

pub mod ansi;
pub mod ast;
pub mod context;
pub mod dispatch;
pub mod elements;
pub mod emoji;
pub mod error;
pub mod format;
#[cfg(feature = "syntax-highlighting")]
pub mod highlight;
pub mod style;
pub mod table;
pub mod themes;

use std::io::{self, Cursor, Read};
use std::path::Path;
#[cfg(feature = "syntax-highlighting")]
use std::sync::Arc;

use tracing::{debug, warn};

pub use ansi::ColorProfile;
pub use error::{ConfigError, Error, HighlightError, Result, TableError, TemplateError, UrlError};
pub use format::FormatTable;
#[cfg(feature = "syntax-highlighting")]
pub use highlight::ThemeRegistry;
pub use style::{
    StyleBlock, StyleChroma, StyleCodeBlock, StyleConfig, StyleList, StylePrimitive, StyleTable,
    StyleTask,
};
pub use themes::{
    Style, ascii_style, available_styles, dark_style, dracula_style, light_style, pink_style,
};

use ast::{Ast, ParseOptions};
use elements::RenderState;

/// Default width for word wrapping.
const DEFAULT_WIDTH: usize = 80;

/// Environment variable naming a built-in style or a JSON theme file.
pub const STYLE_ENV_VAR: &str = "GLAMOUR_STYLE";

// ============================================================================
// Renderer
// ============================================================================

/// Options for the markdown renderer.
#[derive(Debug, Clone)]
pub struct RendererOptions {
    /// Word wrap width; 0 disables wrapping.
    pub word_wrap: usize,
    /// Base URL for resolving relative links.
    pub base_url: Option<String>,
    /// Whether soft line breaks are kept as newlines.
    pub preserve_newlines: bool,
    /// Style configuration.
    pub styles: StyleConfig,
    /// Colour capability of the target terminal.
    pub color_profile: ColorProfile,
    /// Whether `:shortcode:` runs are replaced with emoji.
    pub emoji: bool,
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            word_wrap: DEFAULT_WIDTH,
            base_url: None,
            preserve_newlines: false,
            styles: dark_style(),
            color_profile: ColorProfile::default(),
            emoji: false,
        }
    }
}

/// Markdown renderer for terminal output.
///
/// Configured once through the `with_*` builder methods and then shared:
/// [`Renderer::render`] takes `&self` and may be called from several
/// threads at once. Highlighting themes are cached in a [`ThemeRegistry`]
/// shared by every clone of the renderer.
#[derive(Debug, Clone)]
pub struct Renderer {
    options: RendererOptions,
    formats: FormatTable,
    #[cfg(feature = "syntax-highlighting")]
    registry: Arc<ThemeRegistry>,
    input: Vec<u8>,
    output: Cursor<Vec<u8>>,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    /// Creates a new renderer with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(RendererOptions::default())
    }

    /// Creates a renderer from a complete set of options.
    #[must_use]
    pub fn with_options(options: RendererOptions) -> Self {
        let formats = FormatTable::compile(&options.styles);
        Self {
            options,
            formats,
            #[cfg(feature = "syntax-highlighting")]
            registry: Arc::new(ThemeRegistry::new()),
            input: Vec::new(),
            output: Cursor::new(Vec::new()),
        }
    }

    /// Current options.
    #[must_use]
    pub const fn options(&self) -> &RendererOptions {
        &self.options
    }

    /// Sets the style for rendering.
    #[must_use]
    pub fn with_style(self, style: Style) -> Self {
        self.with_style_config(style.config())
    }

    /// Sets a custom style configuration.
    ///
    /// The configuration is validated when rendering starts.
    #[must_use]
    pub fn with_style_config(mut self, config: StyleConfig) -> Self {
        self.formats = FormatTable::compile(&config);
        self.options.styles = config;
        self
    }

    /// Loads the style from a JSON theme file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read, is malformed, or
    /// fails validation.
    pub fn with_style_path(self, path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Ok(self.with_style_config(StyleConfig::from_path(path)?))
    }

    /// Loads the style named by the `GLAMOUR_STYLE` environment variable.
    ///
    /// The value may be a built-in style name or the path of a JSON theme.
    /// Unset or empty selects [`Style::Auto`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the value names neither a built-in style
    /// nor a readable, valid theme file.
    pub fn with_environment_config(self) -> Result<Self, ConfigError> {
        let value = std::env::var(STYLE_ENV_VAR).unwrap_or_default();
        Ok(self.with_style_config(style_from_env_value(&value)?))
    }

    /// Sets the word wrap width (0 disables wrapping).
    #[must_use]
    pub const fn with_word_wrap(mut self, width: usize) -> Self {
        self.options.word_wrap = width;
        self
    }

    /// Sets the base URL for resolving relative links.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.options.base_url = Some(url.into());
        self
    }

    /// Sets whether to preserve newlines.
    #[must_use]
    pub const fn with_preserved_newlines(mut self, preserve: bool) -> Self {
        self.options.preserve_newlines = preserve;
        self
    }

    /// Sets the colour profile of the target terminal.
    #[must_use]
    pub const fn with_color_profile(mut self, profile: ColorProfile) -> Self {
        self.options.color_profile = profile;
        self
    }

    /// Enables or disables emoji shortcode replacement.
    #[must_use]
    pub const fn with_emoji(mut self, emoji: bool) -> Self {
        self.options.emoji = emoji;
        self
    }

    /// Shares a highlighting theme registry with other renderers.
    #[cfg(feature = "syntax-highlighting")]
    #[must_use]
    pub fn with_theme_registry(mut self, registry: Arc<ThemeRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// The highlighting theme registry in use.
    #[cfg(feature = "syntax-highlighting")]
    #[must_use]
    pub fn theme_registry(&self) -> Arc<ThemeRegistry> {
        Arc::clone(&self.registry)
    }

    /// Renders markdown to styled terminal output.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the style configuration is invalid
    /// (nothing is rendered), or [`Error::Table`] if a table cannot be laid
    /// out.
    pub fn render(&self, markdown: &str) -> Result<String> {
        self.options.styles.validate()?;
        for (element, err) in self.formats.errors() {
            warn!(style.element = element, error = %err, "malformed format; using raw text");
        }

        let ast = Ast::parse_with(
            markdown,
            ParseOptions {
                emoji: self.options.emoji,
            },
        );
        debug!(
            markdown.len = markdown.len(),
            ast.nodes = ast.len(),
            "rendering document"
        );

        let state = RenderState::new(&self.options, &self.formats);
        #[cfg(feature = "syntax-highlighting")]
        let state = state.with_registry(&self.registry);
        let mut state = state;
        dispatch::walk(&ast, &mut state)?;
        Ok(state.into_output())
    }

    /// Renders markdown bytes to styled terminal output.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Utf8`] if the bytes are not valid UTF-8, otherwise
    /// the same errors as [`Renderer::render`].
    pub fn render_bytes(&self, markdown: &[u8]) -> Result<String> {
        let text = std::str::from_utf8(markdown)?;
        self.render(text)
    }

    /// Renders everything written so far and makes it available to
    /// [`Read`]. The input buffer is cleared.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`Renderer::render_bytes`]. On error the
    /// buffered input is kept.
    pub fn close(&mut self) -> Result<()> {
        let rendered = self.render_bytes(&self.input)?;
        self.input.clear();
        self.output = Cursor::new(rendered.into_bytes());
        Ok(())
    }

    /// Takes the rendered output that has not been read yet.
    pub fn take_output(&mut self) -> String {
        let mut rest = String::new();
        let pos = usize::try_from(self.output.position()).unwrap_or(usize::MAX);
        let bytes = std::mem::take(self.output.get_mut());
        if let Some(unread) = bytes.get(pos..) {
            rest = String::from_utf8_lossy(unread).into_owned();
        }
        self.output = Cursor::new(Vec::new());
        rest
    }
}

impl io::Write for Renderer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.input.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Read for Renderer {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.output.read(buf)
    }
}

fn style_from_env_value(value: &str) -> Result<StyleConfig, ConfigError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(Style::Auto.config());
    }
    if let Some(style) = Style::from_name(value) {
        return Ok(style.config());
    }
    let path = Path::new(value);
    if path.exists() {
        return StyleConfig::from_path(path);
    }
    Err(ConfigError::UnknownStyle(value.to_string()))
}

// ============================================================================
// Convenience Functions
// ============================================================================

/// Renders markdown with the specified style.
///
/// # Errors
///
/// See [`Renderer::render`].
pub fn render(markdown: &str, style: Style) -> Result<String> {
    Renderer::new().with_style(style).render(markdown)
}

/// Renders markdown with a custom style configuration.
///
/// # Errors
///
/// See [`Renderer::render`].
pub fn render_with_config(markdown: &str, config: &StyleConfig) -> Result<String> {
    Renderer::new()
        .with_style_config(config.clone())
        .render(markdown)
}

/// Renders markdown with the style named by `GLAMOUR_STYLE`.
///
/// # Errors
///
/// Returns [`Error::Config`] if the variable names neither a built-in style
/// nor a valid theme file, otherwise see [`Renderer::render`].
pub fn render_with_environment_config(markdown: &str) -> Result<String> {
    Renderer::new().with_environment_config()?.render(markdown)
}

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{
        ColorProfile, Error, Renderer, RendererOptions, Result, Style, StyleBlock, StyleCodeBlock,
        StyleConfig, StyleList, StylePrimitive, StyleTable, StyleTask, ascii_style,
        available_styles, dark_style, dracula_style, light_style, pink_style, render,
        render_with_config, render_with_environment_config,
    };
}

// ============================================================================
// Tests
// ============================================================================
