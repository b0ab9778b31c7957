//! Renderers and finishers for each markdown construct.
//!
//! Block constructs open a context on the [`BlockStack`] when entered and
//! flush it when exited. Inline constructs render their whole subtree into
//! a string that is written into the innermost block.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};
use url::Url;

use crate::RendererOptions;
use crate::ansi::{self, ColorProfile};
use crate::ast::{Ast, NodeId, NodeKind};
use crate::context::{BlockStack, Flow};
use crate::dispatch::{ElementFinisher, ElementRenderer};
use crate::error::{Result, TableError, UrlError};
use crate::format::FormatTable;
#[cfg(feature = "syntax-highlighting")]
use crate::highlight::{self, ThemeRegistry};
use crate::style::{self, StyleConfig, StylePrimitive};
use crate::table::{self, TableBuilder, TableLayout};

const QUOTE_INDENT_TOKEN: &str = "│ ";

static SCRIPT_OR_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style)\b[^>]*>.*?(</(script|style)\s*>|\z)")
        .expect("script pattern is valid")
});

static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<!--.*?-->|</?[A-Za-z][^>]*>").expect("tag pattern is valid")
});

/// Strips markup from raw HTML, dropping `<script>` and `<style>` elements
/// together with their content.
#[must_use]
pub fn sanitize_html(html: &str) -> String {
    let without_scripts = SCRIPT_OR_STYLE.replace_all(html, "");
    HTML_TAG.replace_all(&without_scripts, "").into_owned()
}

/// Mutable state of a single render.
pub struct RenderState<'r> {
    stack: BlockStack,
    options: &'r RendererOptions,
    formats: &'r FormatTable,
    base_url: Option<Url>,
    tables: Vec<TableBuilder>,
    #[cfg(feature = "syntax-highlighting")]
    registry: Option<&'r ThemeRegistry>,
}

impl<'r> RenderState<'r> {
    /// Creates the state for one render.
    ///
    /// A malformed base URL is logged and ignored.
    #[must_use]
    pub fn new(options: &'r RendererOptions, formats: &'r FormatTable) -> Self {
        let base_url = options
            .base_url
            .as_deref()
            .filter(|base| !base.is_empty())
            .and_then(|base| match Url::parse(base) {
                Ok(url) => Some(url),
                Err(source) => {
                    let err = UrlError::InvalidBase {
                        base: base.to_string(),
                        source,
                    };
                    warn!(error = %err, "ignoring base url");
                    None
                }
            });
        Self {
            stack: BlockStack::new(options.word_wrap, options.color_profile),
            options,
            formats,
            base_url,
            tables: Vec::new(),
            #[cfg(feature = "syntax-highlighting")]
            registry: None,
        }
    }

    /// Enables syntax highlighting through `registry`.
    #[cfg(feature = "syntax-highlighting")]
    #[must_use]
    pub fn with_registry(mut self, registry: &'r ThemeRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Whether soft line breaks are kept.
    #[must_use]
    pub const fn preserve_newlines(&self) -> bool {
        self.options.preserve_newlines
    }

    /// Writes literal text into the innermost block.
    pub fn write(&mut self, s: &str) {
        if !s.is_empty() {
            self.stack.write(s);
        }
    }

    /// Closes every open block and returns the rendered document.
    #[must_use]
    pub fn into_output(self) -> String {
        self.stack.finish()
    }

    const fn styles(&self) -> &'r StyleConfig {
        &self.options.styles
    }

    const fn profile(&self) -> ColorProfile {
        self.options.color_profile
    }

    fn table_builder(&mut self, event: &'static str) -> Result<&mut TableBuilder, TableError> {
        self.tables.last_mut().ok_or(TableError::NoTable(event))
    }

    // ========================================================================
    // Entering
    // ========================================================================

    /// Runs `renderer` for a node being entered.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Table`] when table events arrive out of order.
    pub fn enter(&mut self, renderer: ElementRenderer, ast: &Ast<'_>, id: NodeId) -> Result<()> {
        let styles = self.styles();
        match renderer {
            ElementRenderer::Document => {
                self.stack.push(styles.document.clone(), Flow::Verbatim);
            }
            ElementRenderer::Paragraph => {
                self.separate(ast, id);
                let block = self.stack.style().cascade(&styles.paragraph, false);
                self.stack.push(block, Flow::Wrap);
            }
            ElementRenderer::Heading => self.heading(ast, id),
            ElementRenderer::BlockQuote => {
                self.separate(ast, id);
                let mut block = self.stack.style().cascade(&styles.block_quote, false);
                block.indent_token.get_or_insert_with(|| QUOTE_INDENT_TOKEN.to_string());
                block.indent.get_or_insert(1);
                self.stack.push(block, Flow::Verbatim);
            }
            ElementRenderer::List => self.list(ast, id),
            ElementRenderer::Item => self.item(ast, id),
            ElementRenderer::CodeBlock => self.code_block(ast, id),
            ElementRenderer::HtmlBlock => self.html_block(ast, id),
            ElementRenderer::ThematicBreak => self.thematic_break(ast, id),
            ElementRenderer::Table => self.table(ast, id),
            ElementRenderer::TableHead => self.table_builder("header")?.begin_header()?,
            ElementRenderer::TableRow => self.table_builder("row")?.begin_row()?,
            ElementRenderer::TableCell => self.table_cell(ast, id)?,
            ElementRenderer::DefinitionList => {
                self.separate(ast, id);
                let block = self.stack.style().cascade(&styles.definition_list, false);
                self.stack.push(block, Flow::Verbatim);
            }
            ElementRenderer::DefinitionTerm => {
                let block = style::cascade(self.stack.style(), &styles.definition_term, false);
                self.stack.push(block, Flow::Wrap);
            }
            ElementRenderer::DefinitionDescription => self.definition_description(),
            ElementRenderer::Inline => {
                let parent = self.stack.style().style.clone();
                let mut out = String::new();
                self.inline(ast, id, &parent, &mut out);
                self.write(&out);
            }
        }
        Ok(())
    }

    /// Puts a blank line between this block and a preceding sibling block.
    fn separate(&mut self, ast: &Ast<'_>, id: NodeId) {
        if ast
            .previous_sibling(id)
            .is_some_and(|prev| ast.kind(prev).is_block())
        {
            self.stack.ensure_blank_line();
        }
    }

    fn heading(&mut self, ast: &Ast<'_>, id: NodeId) {
        self.separate(ast, id);
        let styles = self.styles();
        let level = match ast.kind(id) {
            NodeKind::Heading { level } => *level,
            _ => 1,
        };
        let specific = styles.heading_style(level);
        let mut block = self
            .stack
            .style()
            .cascade(&styles.heading, false)
            .cascade(specific, true);

        // Decorations a level leaves empty come from the generic heading.
        let generic = &styles.heading.style;
        for (field, fallback) in [
            (&mut block.style.block_prefix, &generic.block_prefix),
            (&mut block.style.block_suffix, &generic.block_suffix),
            (&mut block.style.prefix, &generic.prefix),
            (&mut block.style.suffix, &generic.suffix),
        ] {
            if field.is_empty() {
                field.clone_from(fallback);
            }
        }

        let prefix = ansi::render_text(&block.style, self.profile(), &block.style.prefix);
        self.stack.push(block, Flow::Wrap);
        self.write(&prefix);
    }

    fn list(&mut self, ast: &Ast<'_>, id: NodeId) {
        self.separate(ast, id);
        let styles = self.styles();
        let nested = ast
            .parent(id)
            .is_some_and(|p| matches!(ast.kind(p), NodeKind::Item { .. }));
        let mut block = self.stack.style().cascade(&styles.list.block, nested);
        if nested {
            block.indent = Some(styles.list.level_indent);
        }
        self.stack.push(block, Flow::Verbatim);
    }

    fn item(&mut self, ast: &Ast<'_>, id: NodeId) {
        let styles = self.styles();
        let profile = self.profile();
        let parent = self.stack.style().clone();
        let (ordered, start) = match ast.parent(id).map(|p| ast.kind(p)) {
            Some(NodeKind::List { ordered, start }) => (*ordered, *start),
            _ => (false, 1),
        };
        let task = match ast.kind(id) {
            NodeKind::Item { task } => *task,
            _ => None,
        };

        let marker = match task {
            Some(checked) => {
                let glyph = if checked {
                    &styles.task.ticked
                } else {
                    &styles.task.unticked
                };
                ansi::render_text(&parent.style.cascade(&styles.task.style), profile, glyph)
            }
            None if ordered => {
                let index = u64::try_from(ast.index_in_parent(id)).unwrap_or(u64::MAX);
                let number = start.saturating_add(index);
                ansi::render_text(
                    &parent.style.cascade(&styles.enumeration),
                    profile,
                    &format!("{number}{}", styles.enumeration.block_prefix),
                )
            }
            None => ansi::render_text(
                &parent.style.cascade(&styles.item),
                profile,
                &styles.item.block_prefix,
            ),
        };

        let block = style::cascade(&parent, &styles.item.undecorated(), false);
        self.stack.push_with_lead(block, Flow::Wrap, marker);
    }

    fn code_block(&mut self, ast: &Ast<'_>, id: NodeId) {
        self.separate(ast, id);
        let styles = self.styles();
        let info = match ast.kind(id) {
            NodeKind::CodeBlock { info, .. } => info.as_str(),
            _ => "",
        };
        let language = info
            .split(|c: char| c.is_whitespace() || c == ',')
            .next()
            .unwrap_or_default();
        let code = ast.text_content(id);
        let block = self.stack.style().cascade(&styles.code_block.block, false);

        let rendered = self.highlighted(&code, language).unwrap_or_else(|| {
            ansi::render_text(&block.style, self.profile(), code.trim_end_matches('\n'))
        });
        self.stack.push(block, Flow::Verbatim);
        self.write(&rendered);
    }

    #[cfg(feature = "syntax-highlighting")]
    fn highlighted(&self, code: &str, language: &str) -> Option<String> {
        let registry = self.registry?;
        if language.is_empty() || !self.profile().has_color() {
            return None;
        }
        let mut out = String::new();
        match highlight::highlight(
            &mut out,
            code,
            language,
            &self.styles().code_block,
            registry,
            self.profile(),
        ) {
            Ok(()) => Some(out),
            Err(err) => {
                debug!(code.language = language, error = %err, "highlighting failed; rendering plain");
                None
            }
        }
    }

    #[cfg(not(feature = "syntax-highlighting"))]
    #[allow(clippy::unused_self)]
    fn highlighted(&self, _code: &str, _language: &str) -> Option<String> {
        None
    }

    fn html_block(&mut self, ast: &Ast<'_>, id: NodeId) {
        self.separate(ast, id);
        let styles = self.styles();
        let html: String = ast
            .children(id)
            .iter()
            .filter_map(|&child| match ast.kind(child) {
                NodeKind::Html(s) | NodeKind::Text(s) => Some(s.as_str()),
                _ => None,
            })
            .collect();
        let text = sanitize_html(&html);
        let block = self.stack.style().cascade(&styles.html_block, false);
        let rendered = ansi::render_text(&block.style, self.profile(), text.trim_matches('\n'));
        self.stack.push(block, Flow::Verbatim);
        self.write(&rendered);
    }

    fn thematic_break(&mut self, ast: &Ast<'_>, id: NodeId) {
        self.separate(ast, id);
        let styles = self.styles();
        let rule = self.formats.apply("hr", ast.literal(id).trim());
        let parent = self.stack.style().style.clone();
        let rendered = self.decorated(&parent, &styles.horizontal_rule, &rule);
        self.write(&rendered);
        self.write("\n");
    }

    fn table(&mut self, ast: &Ast<'_>, id: NodeId) {
        self.separate(ast, id);
        let styles = self.styles();
        let alignments = match ast.kind(id) {
            NodeKind::Table { alignments } => alignments.clone(),
            _ => Vec::new(),
        };
        let block = self.stack.style().cascade(&styles.table.block, false);
        self.stack.push(block, Flow::Verbatim);
        self.tables.push(TableBuilder::new(alignments));
    }

    fn table_cell(&mut self, ast: &Ast<'_>, id: NodeId) -> Result<(), TableError> {
        let parent = self.stack.style().style.clone();
        let mut content = String::new();
        for &child in ast.children(id) {
            self.inline(ast, child, &parent, &mut content);
        }
        self.table_builder("cell")?.add_cell(content)
    }

    fn definition_description(&mut self) {
        let styles = self.styles();
        let element = &styles.definition_description;
        let parent = self.stack.style().clone();

        // Everything up to the last newline of the block prefix separates
        // the description from its term; the rest marks its first line.
        let lead = match element.block_prefix.rsplit_once('\n') {
            Some((_, lead)) => {
                self.stack.ensure_blank_line();
                lead
            }
            None => element.block_prefix.as_str(),
        };

        let mut own = element.undecorated();
        own.block_suffix.clone_from(&element.block_suffix);
        let block = style::cascade(&parent, &own, false);
        if lead.is_empty() {
            self.stack.push(block, Flow::Wrap);
        } else {
            let marker = ansi::render_text(&parent.style.cascade(element), self.profile(), lead);
            self.stack.push_with_lead(block, Flow::Wrap, marker);
        }
    }

    // ========================================================================
    // Exiting
    // ========================================================================

    /// Runs `finisher` for a node being exited.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Table`] when a table cannot be assembled or
    /// laid out. Nothing of that table is written.
    pub fn finish(&mut self, finisher: ElementFinisher) -> Result<()> {
        match finisher {
            ElementFinisher::PopBlock => self.stack.pop(),
            ElementFinisher::Heading => {
                let style = self.stack.style().style.clone();
                let suffix = ansi::render_text(&style, self.profile(), &style.suffix);
                self.write(&suffix);
                self.stack.pop();
            }
            ElementFinisher::TableHead => self.table_builder("header")?.end_header()?,
            ElementFinisher::TableRow => self.table_builder("row")?.end_row()?,
            ElementFinisher::Table => self.finish_table()?,
        }
        Ok(())
    }

    fn finish_table(&mut self) -> Result<(), TableError> {
        let styles = self.styles();
        let builder = self.tables.pop().ok_or(TableError::NoTable("finish"))?;
        let data = builder.finish()?;
        let defaults = TableLayout::default();
        let layout = TableLayout {
            center_separator: styles
                .table
                .center_separator
                .clone()
                .unwrap_or(defaults.center_separator),
            column_separator: styles
                .table
                .column_separator
                .clone()
                .unwrap_or(defaults.column_separator),
            row_separator: styles
                .table
                .row_separator
                .clone()
                .unwrap_or(defaults.row_separator),
            max_width: self.stack.width(),
        };
        let rendered = table::render_table(&data, &layout)?;
        debug!(
            table.columns = data.column_count(),
            table.rows = data.row_count(),
            "rendered table"
        );
        self.write(&rendered);
        self.stack.pop();
        Ok(())
    }

    // ========================================================================
    // Inline content
    // ========================================================================

    /// Renders `element` around `token`: block prefix and suffix in the
    /// parent's style, prefix, token and suffix in the cascaded one.
    fn decorated(&self, parent: &StylePrimitive, element: &StylePrimitive, token: &str) -> String {
        let profile = self.profile();
        let style = parent.cascade(element);
        let mut out = ansi::render_text(parent, profile, &element.block_prefix);
        out.push_str(&ansi::render_text(
            &style,
            profile,
            &format!("{}{token}{}", element.prefix, element.suffix),
        ));
        out.push_str(&ansi::render_text(parent, profile, &element.block_suffix));
        out
    }

    /// Like [`Self::decorated`], but URLs are printed exactly as resolved.
    fn decorated_url(&self, parent: &StylePrimitive, element: &StylePrimitive, url: &str) -> String {
        self.decorated(&parent.without_case(), &element.without_case(), url)
    }

    fn inline(&self, ast: &Ast<'_>, id: NodeId, parent: &StylePrimitive, out: &mut String) {
        let styles = self.styles();
        match ast.kind(id) {
            NodeKind::Text(text) => {
                let token = self.formats.apply("text", text);
                out.push_str(&self.decorated(parent, &styles.text, &token));
            }
            NodeKind::Code(code) => {
                let token = self.formats.apply("code", code);
                out.push_str(&self.decorated(parent, &styles.code.style, &token));
            }
            NodeKind::Emoji { value, .. } => {
                out.push_str(&ansi::render_text(
                    &parent.cascade(&styles.text),
                    self.profile(),
                    value,
                ));
            }
            NodeKind::SoftBreak => {
                out.push_str(if self.preserve_newlines() { "\n" } else { " " });
            }
            NodeKind::HardBreak => out.push('\n'),
            NodeKind::Emphasis => self.span(ast, id, parent, &styles.emph, out),
            NodeKind::Strong => self.span(ast, id, parent, &styles.strong, out),
            NodeKind::Strikethrough => self.span(ast, id, parent, &styles.strikethrough, out),
            NodeKind::Link { dest, .. } => self.link(ast, id, dest, parent, out),
            NodeKind::AutoLink { dest, email } => self.autolink(dest, *email, parent, out),
            NodeKind::Image { dest, .. } => self.image(ast, id, dest, parent, out),
            NodeKind::Html(html) => {
                let text = sanitize_html(html);
                out.push_str(&ansi::render_text(
                    &parent.cascade(&styles.html_span.style),
                    self.profile(),
                    &text,
                ));
            }
            other => {
                debug!(node.kind = other.name(), "no inline renderer; rendering children");
                for &child in ast.children(id) {
                    self.inline(ast, child, parent, out);
                }
            }
        }
    }

    fn span(
        &self,
        ast: &Ast<'_>,
        id: NodeId,
        parent: &StylePrimitive,
        element: &StylePrimitive,
        out: &mut String,
    ) {
        let profile = self.profile();
        let style = parent.cascade(element);
        out.push_str(&ansi::render_text(parent, profile, &element.block_prefix));
        out.push_str(&ansi::render_text(&style, profile, &element.prefix));
        for &child in ast.children(id) {
            self.inline(ast, child, &style, out);
        }
        out.push_str(&ansi::render_text(&style, profile, &element.suffix));
        out.push_str(&ansi::render_text(parent, profile, &element.block_suffix));
    }

    fn link(&self, ast: &Ast<'_>, id: NodeId, dest: &str, parent: &StylePrimitive, out: &mut String) {
        let styles = self.styles();
        let text = ast.text_content(id);
        let url = match self.resolve_url(dest) {
            Ok(url) => url,
            Err(err) => {
                warn!(error = %err, "rendering link as plain text");
                let literal = if text.is_empty() { dest } else { text.as_str() };
                out.push_str(&ansi::render_text(parent, self.profile(), literal));
                return;
            }
        };

        let show_text = !text.is_empty() && text != dest && text != url;
        if show_text {
            let style = parent.cascade(&styles.link_text);
            let mut rendered = String::new();
            for &child in ast.children(id) {
                self.inline(ast, child, &style, &mut rendered);
            }
            out.push_str(&self.formats.apply("link_text", &rendered));
        }

        if url.is_empty() || url.starts_with('#') {
            return;
        }
        if show_text {
            out.push(' ');
        }
        let token = self.formats.apply("link", &url);
        out.push_str(&self.decorated_url(parent, &styles.link, &token));
    }

    fn autolink(&self, dest: &str, email: bool, parent: &StylePrimitive, out: &mut String) {
        let target = if email && !dest.to_ascii_lowercase().starts_with("mailto:") {
            format!("mailto:{dest}")
        } else {
            dest.to_string()
        };
        match self.resolve_url(&target) {
            Ok(url) => {
                let token = self.formats.apply("link", &url);
                out.push_str(&self.decorated_url(parent, &self.styles().link, &token));
            }
            Err(err) => {
                warn!(error = %err, "rendering autolink as plain text");
                out.push_str(&ansi::render_text(parent, self.profile(), dest));
            }
        }
    }

    fn image(&self, ast: &Ast<'_>, id: NodeId, dest: &str, parent: &StylePrimitive, out: &mut String) {
        let styles = self.styles();
        let alt = ast.text_content(id);
        let url = match self.resolve_url(dest) {
            Ok(url) => url,
            Err(err) => {
                warn!(error = %err, "rendering image as plain text");
                let literal = if alt.is_empty() { dest } else { alt.as_str() };
                out.push_str(&ansi::render_text(parent, self.profile(), literal));
                return;
            }
        };

        if !alt.is_empty() {
            let token = self.formats.apply("image_text", &alt);
            out.push_str(&self.decorated(parent, &styles.image_text, &token));
        }
        if !url.is_empty() {
            if !alt.is_empty() {
                out.push(' ');
            }
            let token = self.formats.apply("image", &url);
            out.push_str(&self.decorated_url(parent, &styles.image, &token));
        }
    }

    /// Resolves a link destination against the base URL.
    ///
    /// Absolute URLs and in-page anchors are kept as written, as are
    /// relative URLs when no base URL is set.
    fn resolve_url(&self, dest: &str) -> Result<String, UrlError> {
        if dest.is_empty() || dest.starts_with('#') {
            return Ok(dest.to_string());
        }
        match Url::parse(dest) {
            Ok(_) => Ok(dest.to_string()),
            Err(url::ParseError::RelativeUrlWithoutBase) => match &self.base_url {
                Some(base) => base.join(dest).map(String::from).map_err(|source| {
                    UrlError::InvalidDestination {
                        destination: dest.to_string(),
                        source,
                    }
                }),
                None => Ok(dest.to_string()),
            },
            Err(source) => Err(UrlError::InvalidDestination {
                destination: dest.to_string(),
                source,
            }),
        }
    }
}
