//! Style model: per-element style primitives, block styles, and the theme
//! document they are loaded from.
//!
//! Every attribute is optional. An absent attribute inherits the resolved
//! value of the enclosing block; see [`StylePrimitive::cascade`] and
//! [`cascade`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ansi::Color;
use crate::error::ConfigError;

/// Default per-level indent for nested lists.
pub const DEFAULT_LIST_LEVEL_INDENT: usize = 2;

// ============================================================================
// Style Primitive
// ============================================================================

/// Primitive style settings for text elements.
///
/// Decorations (`prefix`, `suffix`, `block_prefix`, `block_suffix`,
/// `format`) belong to the element that declares them and are never
/// inherited. An empty string means "none".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StylePrimitive {
    /// Prefix added before the block.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub block_prefix: String,
    /// Suffix added after the block.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub block_suffix: String,
    /// Prefix added before text.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub prefix: String,
    /// Suffix added after text.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub suffix: String,
    /// Foreground color (ANSI color code or hex).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Background color (ANSI color code or hex).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    /// Whether text is underlined.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,
    /// Whether text is bold.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bold: Option<bool>,
    /// Whether text is italic.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub italic: Option<bool>,
    /// Whether text has strikethrough.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crossed_out: Option<bool>,
    /// Whether text is faint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faint: Option<bool>,
    /// Whether text has a line above it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlined: Option<bool>,
    /// Whether foreground and background are swapped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inverse: Option<bool>,
    /// Whether text blinks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blink: Option<bool>,
    /// Whether text is hidden.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conceal: Option<bool>,
    /// Upper-case the text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper: Option<bool>,
    /// Lower-case the text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower: Option<bool>,
    /// Title-case the text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<bool>,
    /// Format string for special elements (e.g., `"Image: {{text}} →"`).
    #[serde(skip_serializing_if = "String::is_empty")]
    pub format: String,
}

impl StylePrimitive {
    /// Creates a new empty style primitive.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the prefix.
    #[must_use]
    pub fn prefix(mut self, p: impl Into<String>) -> Self {
        self.prefix = p.into();
        self
    }

    /// Sets the suffix.
    #[must_use]
    pub fn suffix(mut self, s: impl Into<String>) -> Self {
        self.suffix = s.into();
        self
    }

    /// Sets the block prefix.
    #[must_use]
    pub fn block_prefix(mut self, p: impl Into<String>) -> Self {
        self.block_prefix = p.into();
        self
    }

    /// Sets the block suffix.
    #[must_use]
    pub fn block_suffix(mut self, s: impl Into<String>) -> Self {
        self.block_suffix = s.into();
        self
    }

    /// Sets the foreground color.
    #[must_use]
    pub fn color(mut self, c: impl Into<String>) -> Self {
        self.color = Some(c.into());
        self
    }

    /// Sets the background color.
    #[must_use]
    pub fn background_color(mut self, c: impl Into<String>) -> Self {
        self.background_color = Some(c.into());
        self
    }

    /// Sets bold.
    #[must_use]
    pub const fn bold(mut self, b: bool) -> Self {
        self.bold = Some(b);
        self
    }

    /// Sets italic.
    #[must_use]
    pub const fn italic(mut self, i: bool) -> Self {
        self.italic = Some(i);
        self
    }

    /// Sets underline.
    #[must_use]
    pub const fn underline(mut self, u: bool) -> Self {
        self.underline = Some(u);
        self
    }

    /// Sets strikethrough.
    #[must_use]
    pub const fn crossed_out(mut self, c: bool) -> Self {
        self.crossed_out = Some(c);
        self
    }

    /// Sets faint.
    #[must_use]
    pub const fn faint(mut self, f: bool) -> Self {
        self.faint = Some(f);
        self
    }

    /// Sets overline.
    #[must_use]
    pub const fn overlined(mut self, o: bool) -> Self {
        self.overlined = Some(o);
        self
    }

    /// Sets reverse video.
    #[must_use]
    pub const fn inverse(mut self, i: bool) -> Self {
        self.inverse = Some(i);
        self
    }

    /// Sets blink.
    #[must_use]
    pub const fn blink(mut self, b: bool) -> Self {
        self.blink = Some(b);
        self
    }

    /// Upper-cases rendered text.
    #[must_use]
    pub const fn upper(mut self, u: bool) -> Self {
        self.upper = Some(u);
        self
    }

    /// Lower-cases rendered text.
    #[must_use]
    pub const fn lower(mut self, l: bool) -> Self {
        self.lower = Some(l);
        self
    }

    /// Title-cases rendered text.
    #[must_use]
    pub const fn title(mut self, t: bool) -> Self {
        self.title = Some(t);
        self
    }

    /// Sets the format string.
    #[must_use]
    pub fn format(mut self, f: impl Into<String>) -> Self {
        self.format = f.into();
        self
    }

    /// Resolves `child` against this (already resolved) style.
    ///
    /// Every optional attribute takes the child's value when set and this
    /// style's value otherwise. Decorations come from the child only.
    /// Neither input is modified.
    #[must_use]
    pub fn cascade(&self, child: &Self) -> Self {
        Self {
            block_prefix: child.block_prefix.clone(),
            block_suffix: child.block_suffix.clone(),
            prefix: child.prefix.clone(),
            suffix: child.suffix.clone(),
            color: child.color.clone().or_else(|| self.color.clone()),
            background_color: child
                .background_color
                .clone()
                .or_else(|| self.background_color.clone()),
            underline: child.underline.or(self.underline),
            bold: child.bold.or(self.bold),
            italic: child.italic.or(self.italic),
            crossed_out: child.crossed_out.or(self.crossed_out),
            faint: child.faint.or(self.faint),
            overlined: child.overlined.or(self.overlined),
            inverse: child.inverse.or(self.inverse),
            blink: child.blink.or(self.blink),
            conceal: child.conceal.or(self.conceal),
            upper: child.upper.or(self.upper),
            lower: child.lower.or(self.lower),
            title: child.title.or(self.title),
            format: child.format.clone(),
        }
    }

    /// Same style with all decorations removed.
    #[must_use]
    pub fn undecorated(&self) -> Self {
        Self {
            block_prefix: String::new(),
            block_suffix: String::new(),
            prefix: String::new(),
            suffix: String::new(),
            format: String::new(),
            ..self.clone()
        }
    }

    /// Same style with no case transform.
    #[must_use]
    pub fn without_case(&self) -> Self {
        Self {
            upper: None,
            lower: None,
            title: None,
            ..self.clone()
        }
    }

    fn validate(&self, element: &str) -> Result<(), ConfigError> {
        for value in [&self.color, &self.background_color].into_iter().flatten() {
            if Color::parse(value).is_none() {
                return Err(ConfigError::InvalidColor {
                    element: element.to_string(),
                    value: value.clone(),
                });
            }
        }
        Ok(())
    }
}

// ============================================================================
// Block Styles
// ============================================================================

/// Block-level style settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleBlock {
    /// Primitive style settings.
    #[serde(flatten)]
    pub style: StylePrimitive,
    /// Indentation in repetitions of `indent_token`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indent: Option<usize>,
    /// Token used for indentation. Defaults to a single space.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indent_token: Option<String>,
    /// Blank lines above and below the block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<usize>,
}

impl StyleBlock {
    /// Creates a new empty block style.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the primitive style.
    #[must_use]
    pub fn style(mut self, s: StylePrimitive) -> Self {
        self.style = s;
        self
    }

    /// Sets the indent.
    #[must_use]
    pub const fn indent(mut self, i: usize) -> Self {
        self.indent = Some(i);
        self
    }

    /// Sets the indent token.
    #[must_use]
    pub fn indent_token(mut self, t: impl Into<String>) -> Self {
        self.indent_token = Some(t.into());
        self
    }

    /// Sets the margin.
    #[must_use]
    pub const fn margin(mut self, m: usize) -> Self {
        self.margin = Some(m);
        self
    }

    /// Resolves `child` against this block style.
    ///
    /// With `inherit_block_attrs` the child keeps the parent's indent,
    /// indent token and margin wherever it leaves them unset; without it
    /// the child's own (possibly absent) layout attributes are used as is.
    #[must_use]
    pub fn cascade(&self, child: &Self, inherit_block_attrs: bool) -> Self {
        let style = self.style.cascade(&child.style);
        if inherit_block_attrs {
            Self {
                style,
                indent: child.indent.or(self.indent),
                indent_token: child
                    .indent_token
                    .clone()
                    .or_else(|| self.indent_token.clone()),
                margin: child.margin.or(self.margin),
            }
        } else {
            Self {
                style,
                indent: child.indent,
                indent_token: child.indent_token.clone(),
                margin: child.margin,
            }
        }
    }

    /// Width in cells taken by this block's indentation.
    #[must_use]
    pub fn indent_width(&self) -> usize {
        let indent = self.indent.unwrap_or(0);
        if indent == 0 {
            return 0;
        }
        let token = self.indent_token.as_deref().unwrap_or(" ");
        indent * crate::ansi::visible_width(token)
    }
}

/// Resolves a primitive child style against a block parent.
///
/// The result carries the parent's layout attributes only when
/// `inherit_block_attrs` is set. Cascading the same child twice gives the
/// same result as cascading it once.
#[must_use]
pub fn cascade(parent: &StyleBlock, child: &StylePrimitive, inherit_block_attrs: bool) -> StyleBlock {
    parent.cascade(&StyleBlock::new().style(child.clone()), inherit_block_attrs)
}

/// Code block style settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleCodeBlock {
    /// Block style settings.
    #[serde(flatten)]
    pub block: StyleBlock,
    /// Built-in syntax highlighting theme name, used when no palette is given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    /// Syntax highlighting palette.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chroma: Option<StyleChroma>,
}

impl StyleCodeBlock {
    /// Creates a new code block style.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the block style.
    #[must_use]
    pub fn block(mut self, b: StyleBlock) -> Self {
        self.block = b;
        self
    }

    /// Sets the theme.
    #[must_use]
    pub fn theme(mut self, t: impl Into<String>) -> Self {
        self.theme = Some(t.into());
        self
    }

    /// Sets the highlighting palette.
    #[must_use]
    pub fn chroma(mut self, c: StyleChroma) -> Self {
        self.chroma = Some(c);
        self
    }

    /// Name under which the derived highlighting theme is registered.
    #[must_use]
    pub fn theme_name(&self) -> String {
        match (&self.chroma, &self.theme) {
            (Some(chroma), _) => format!("glamour-{:016x}", chroma.fingerprint()),
            (None, Some(theme)) => theme.clone(),
            (None, None) => String::new(),
        }
    }
}

/// Syntax-highlighting palette, one primitive per token class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleChroma {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<StylePrimitive>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<StylePrimitive>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<StylePrimitive>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_preproc: Option<StylePrimitive>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<StylePrimitive>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword_reserved: Option<StylePrimitive>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword_namespace: Option<StylePrimitive>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword_type: Option<StylePrimitive>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<StylePrimitive>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub punctuation: Option<StylePrimitive>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<StylePrimitive>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_builtin: Option<StylePrimitive>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_tag: Option<StylePrimitive>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_attribute: Option<StylePrimitive>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_class: Option<StylePrimitive>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_constant: Option<StylePrimitive>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_decorator: Option<StylePrimitive>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_function: Option<StylePrimitive>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub literal_number: Option<StylePrimitive>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub literal_string: Option<StylePrimitive>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub literal_string_escape: Option<StylePrimitive>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generic_deleted: Option<StylePrimitive>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generic_inserted: Option<StylePrimitive>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generic_emph: Option<StylePrimitive>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generic_strong: Option<StylePrimitive>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generic_subheading: Option<StylePrimitive>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<StylePrimitive>,
}

impl StyleChroma {
    /// Token classes that map onto highlighter scopes, with their scope
    /// selectors. `text` and `background` are theme-wide and not listed.
    #[must_use]
    pub fn scoped_entries(&self) -> Vec<(&'static str, &'static str, &StylePrimitive)> {
        let table: [(&'static str, &'static str, &Option<StylePrimitive>); 25] = [
            ("error", "invalid", &self.error),
            ("comment", "comment", &self.comment),
            ("comment_preproc", "meta.preprocessor", &self.comment_preproc),
            ("keyword", "keyword, storage", &self.keyword),
            ("keyword_reserved", "keyword.control", &self.keyword_reserved),
            ("keyword_namespace", "keyword.control.import, keyword.other.use", &self.keyword_namespace),
            ("keyword_type", "storage.type", &self.keyword_type),
            ("operator", "keyword.operator", &self.operator),
            ("punctuation", "punctuation", &self.punctuation),
            ("name", "variable", &self.name),
            ("name_builtin", "support, variable.language", &self.name_builtin),
            ("name_tag", "entity.name.tag", &self.name_tag),
            ("name_attribute", "entity.other.attribute-name", &self.name_attribute),
            ("name_class", "entity.name.class, entity.name.type", &self.name_class),
            ("name_constant", "constant.other, variable.other.constant", &self.name_constant),
            ("name_decorator", "meta.annotation, meta.decorator", &self.name_decorator),
            ("name_function", "entity.name.function, support.function", &self.name_function),
            ("literal_number", "constant.numeric", &self.literal_number),
            ("literal_string", "string", &self.literal_string),
            ("literal_string_escape", "constant.character.escape", &self.literal_string_escape),
            ("generic_deleted", "markup.deleted", &self.generic_deleted),
            ("generic_inserted", "markup.inserted", &self.generic_inserted),
            ("generic_emph", "markup.italic", &self.generic_emph),
            ("generic_strong", "markup.bold", &self.generic_strong),
            ("generic_subheading", "markup.heading", &self.generic_subheading),
        ];
        table
            .into_iter()
            .filter_map(|(name, scope, style)| style.as_ref().map(|s| (name, scope, s)))
            .collect()
    }

    fn all_entries(&self) -> Vec<(&'static str, &StylePrimitive)> {
        let mut entries: Vec<_> = self
            .scoped_entries()
            .into_iter()
            .map(|(name, _, style)| (name, style))
            .collect();
        if let Some(text) = &self.text {
            entries.push(("text", text));
        }
        if let Some(background) = &self.background {
            entries.push(("background", background));
        }
        entries
    }

    /// Stable hash of the palette, used to name the derived theme.
    fn fingerprint(&self) -> u64 {
        // FNV-1a over the serialized palette.
        let serialized = serde_json::to_string(self).unwrap_or_default();
        serialized.bytes().fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
            (hash ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
        })
    }
}

/// List style settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleList {
    /// Block style settings.
    #[serde(flatten)]
    pub block: StyleBlock,
    /// Additional indent per nesting level.
    pub level_indent: usize,
}

impl Default for StyleList {
    fn default() -> Self {
        Self {
            block: StyleBlock::default(),
            level_indent: DEFAULT_LIST_LEVEL_INDENT,
        }
    }
}

impl StyleList {
    /// Creates a new list style.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the block style.
    #[must_use]
    pub fn block(mut self, b: StyleBlock) -> Self {
        self.block = b;
        self
    }

    /// Sets the level indent.
    #[must_use]
    pub const fn level_indent(mut self, i: usize) -> Self {
        self.level_indent = i;
        self
    }
}

/// Table style settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleTable {
    /// Block style settings.
    #[serde(flatten)]
    pub block: StyleBlock,
    /// Glyph where the header rule crosses a column boundary.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center_separator: Option<String>,
    /// Glyph between columns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_separator: Option<String>,
    /// Glyph repeated to draw the header rule.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_separator: Option<String>,
}

impl StyleTable {
    /// Creates a new table style.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the block style.
    #[must_use]
    pub fn block(mut self, b: StyleBlock) -> Self {
        self.block = b;
        self
    }

    /// Sets separators.
    #[must_use]
    pub fn separators(
        mut self,
        center: impl Into<String>,
        column: impl Into<String>,
        row: impl Into<String>,
    ) -> Self {
        self.center_separator = Some(center.into());
        self.column_separator = Some(column.into());
        self.row_separator = Some(row.into());
        self
    }
}

/// Task item style settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleTask {
    /// Primitive style settings.
    #[serde(flatten)]
    pub style: StylePrimitive,
    /// Marker for checked items.
    pub ticked: String,
    /// Marker for unchecked items.
    pub unticked: String,
}

impl Default for StyleTask {
    fn default() -> Self {
        Self {
            style: StylePrimitive::default(),
            ticked: "[x] ".to_string(),
            unticked: "[ ] ".to_string(),
        }
    }
}

impl StyleTask {
    /// Creates a new task style.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the ticked marker.
    #[must_use]
    pub fn ticked(mut self, t: impl Into<String>) -> Self {
        self.ticked = t.into();
        self
    }

    /// Sets the unticked marker.
    #[must_use]
    pub fn unticked(mut self, u: impl Into<String>) -> Self {
        self.unticked = u.into();
        self
    }
}

// ============================================================================
// Style Config
// ============================================================================

/// Complete style configuration for rendering.
///
/// Built once per renderer and never mutated while rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub document: StyleBlock,

    pub block_quote: StyleBlock,
    pub paragraph: StyleBlock,
    pub list: StyleList,

    pub heading: StyleBlock,
    pub h1: StyleBlock,
    pub h2: StyleBlock,
    pub h3: StyleBlock,
    pub h4: StyleBlock,
    pub h5: StyleBlock,
    pub h6: StyleBlock,

    pub text: StylePrimitive,
    pub strikethrough: StylePrimitive,
    pub emph: StylePrimitive,
    pub strong: StylePrimitive,
    #[serde(rename = "hr")]
    pub horizontal_rule: StylePrimitive,

    pub item: StylePrimitive,
    pub enumeration: StylePrimitive,
    pub task: StyleTask,

    pub link: StylePrimitive,
    pub link_text: StylePrimitive,
    pub image: StylePrimitive,
    pub image_text: StylePrimitive,

    pub code: StyleBlock,
    pub code_block: StyleCodeBlock,

    pub table: StyleTable,

    pub definition_list: StyleBlock,
    pub definition_term: StylePrimitive,
    pub definition_description: StylePrimitive,

    pub html_block: StyleBlock,
    pub html_span: StyleBlock,
}

impl StyleConfig {
    /// Creates a new empty style config.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and validates a JSON theme document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Malformed`] for invalid JSON or a schema
    /// mismatch and [`ConfigError::InvalidColor`] for an unusable colour.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON theme document from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Unreadable`] if the file cannot be read, plus
    /// everything [`StyleConfig::from_json`] can return.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Serializes the theme as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Malformed`] if serialization fails.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks every colour in the theme.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidColor`] naming the first bad entry.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (element, style) in self.primitives() {
            style.validate(element)?;
        }
        if let Some(chroma) = &self.code_block.chroma {
            for (name, style) in chroma.all_entries() {
                style.validate(&format!("code_block.chroma.{name}"))?;
            }
        }
        Ok(())
    }

    /// Gets the style for a heading level (1-6).
    #[must_use]
    pub fn heading_style(&self, level: u8) -> &StyleBlock {
        match level {
            1 => &self.h1,
            2 => &self.h2,
            3 => &self.h3,
            4 => &self.h4,
            5 => &self.h5,
            _ => &self.h6,
        }
    }

    pub(crate) fn primitives(&self) -> [(&'static str, &StylePrimitive); 31] {
        [
            ("document", &self.document.style),
            ("block_quote", &self.block_quote.style),
            ("paragraph", &self.paragraph.style),
            ("list", &self.list.block.style),
            ("heading", &self.heading.style),
            ("h1", &self.h1.style),
            ("h2", &self.h2.style),
            ("h3", &self.h3.style),
            ("h4", &self.h4.style),
            ("h5", &self.h5.style),
            ("h6", &self.h6.style),
            ("text", &self.text),
            ("strikethrough", &self.strikethrough),
            ("emph", &self.emph),
            ("strong", &self.strong),
            ("hr", &self.horizontal_rule),
            ("item", &self.item),
            ("enumeration", &self.enumeration),
            ("task", &self.task.style),
            ("link", &self.link),
            ("link_text", &self.link_text),
            ("image", &self.image),
            ("image_text", &self.image_text),
            ("code", &self.code.style),
            ("code_block", &self.code_block.block.style),
            ("table", &self.table.block.style),
            ("definition_list", &self.definition_list.style),
            ("definition_term", &self.definition_term),
            ("definition_description", &self.definition_description),
            ("html_block", &self.html_block.style),
            ("html_span", &self.html_span.style),
        ]
    }
}
