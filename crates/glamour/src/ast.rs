//! Typed document tree built from the pulldown-cmark event stream.
//!
//! The tree is an arena: nodes live in one vector and refer to each other by
//! [`NodeId`]. It is built once per render and never modified afterwards.

use std::ops::Range;

use pulldown_cmark::{CodeBlockKind, Event, LinkType, Options, Parser, Tag};

use crate::emoji::{self, Piece};

/// Index of a node in an [`Ast`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Table column alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    /// No alignment given; rendered left-aligned.
    #[default]
    None,
    /// Left-aligned.
    Left,
    /// Centered.
    Center,
    /// Right-aligned.
    Right,
}

impl From<pulldown_cmark::Alignment> for Alignment {
    fn from(a: pulldown_cmark::Alignment) -> Self {
        match a {
            pulldown_cmark::Alignment::None => Self::None,
            pulldown_cmark::Alignment::Left => Self::Left,
            pulldown_cmark::Alignment::Center => Self::Center,
            pulldown_cmark::Alignment::Right => Self::Right,
        }
    }
}

/// Node kinds with their construct-specific fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Paragraph,
    Heading { level: u8 },
    BlockQuote,
    CodeBlock { info: String, fenced: bool },
    HtmlBlock,
    List { ordered: bool, start: u64 },
    Item { task: Option<bool> },
    ThematicBreak,
    Table { alignments: Vec<Alignment> },
    TableHead,
    TableRow,
    TableCell { alignment: Alignment, head: bool },
    DefinitionList,
    DefinitionTerm,
    DefinitionDescription,
    Text(String),
    Code(String),
    SoftBreak,
    HardBreak,
    Emphasis,
    Strong,
    Strikethrough,
    Link { dest: String, title: String },
    AutoLink { dest: String, email: bool },
    Image { dest: String, title: String },
    Html(String),
    Emoji { shortcode: String, value: String },
    /// A construct the renderer has no style for. Children are still walked.
    Unknown(&'static str),
}

impl NodeKind {
    /// Short name used in diagnostics.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Paragraph => "paragraph",
            Self::Heading { .. } => "heading",
            Self::BlockQuote => "block_quote",
            Self::CodeBlock { .. } => "code_block",
            Self::HtmlBlock => "html_block",
            Self::List { .. } => "list",
            Self::Item { .. } => "item",
            Self::ThematicBreak => "hr",
            Self::Table { .. } => "table",
            Self::TableHead => "table_head",
            Self::TableRow => "table_row",
            Self::TableCell { .. } => "table_cell",
            Self::DefinitionList => "definition_list",
            Self::DefinitionTerm => "definition_term",
            Self::DefinitionDescription => "definition_description",
            Self::Text(_) => "text",
            Self::Code(_) => "code",
            Self::SoftBreak => "soft_break",
            Self::HardBreak => "hard_break",
            Self::Emphasis => "emph",
            Self::Strong => "strong",
            Self::Strikethrough => "strikethrough",
            Self::Link { .. } => "link",
            Self::AutoLink { .. } => "autolink",
            Self::Image { .. } => "image",
            Self::Html(_) => "html_span",
            Self::Emoji { .. } => "emoji",
            Self::Unknown(name) => name,
        }
    }

    /// Whether the node is laid out as its own block.
    #[must_use]
    pub const fn is_block(&self) -> bool {
        matches!(
            self,
            Self::Paragraph
                | Self::Heading { .. }
                | Self::BlockQuote
                | Self::CodeBlock { .. }
                | Self::HtmlBlock
                | Self::List { .. }
                | Self::ThematicBreak
                | Self::Table { .. }
                | Self::DefinitionList
        )
    }
}

/// A node of the tree.
#[derive(Debug, Clone)]
pub struct Node {
    /// Kind and fields.
    pub kind: NodeKind,
    /// Byte range of the construct in the source.
    pub range: Range<usize>,
    /// Parent node; `None` only for the document root.
    pub parent: Option<NodeId>,
    /// Children in document order.
    pub children: Vec<NodeId>,
}

/// Parser settings for [`Ast::parse_with`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    /// Turn known `:shortcode:` runs into [`NodeKind::Emoji`] nodes.
    pub emoji: bool,
}

/// A parsed markdown document.
#[derive(Debug, Clone)]
pub struct Ast<'a> {
    source: &'a str,
    nodes: Vec<Node>,
}

impl<'a> Ast<'a> {
    /// Parses `source` with default options.
    #[must_use]
    pub fn parse(source: &'a str) -> Self {
        Self::parse_with(source, ParseOptions::default())
    }

    /// Parses `source`.
    #[must_use]
    pub fn parse_with(source: &'a str, options: ParseOptions) -> Self {
        let mut builder = Builder {
            ast: Ast {
                source,
                nodes: vec![Node {
                    kind: NodeKind::Document,
                    range: 0..source.len(),
                    parent: None,
                    children: Vec::new(),
                }],
            },
            open: vec![NodeId(0)],
            pending_text: None,
            emoji: options.emoji,
            code_depth: 0,
        };

        let mut parser_options = Options::empty();
        parser_options.insert(Options::ENABLE_TABLES);
        parser_options.insert(Options::ENABLE_STRIKETHROUGH);
        parser_options.insert(Options::ENABLE_TASKLISTS);
        parser_options.insert(Options::ENABLE_DEFINITION_LIST);
        parser_options.insert(Options::ENABLE_FOOTNOTES);

        for (event, range) in Parser::new_ext(source, parser_options).into_offset_iter() {
            builder.event(event, range);
        }
        builder.flush_text();
        builder.ast
    }

    /// The document root.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// The source the tree was built from.
    #[must_use]
    pub const fn source(&self) -> &'a str {
        self.source
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds only the root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Node by id.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Kind of a node.
    #[must_use]
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    /// Parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Literal source text covered by a node.
    #[must_use]
    pub fn literal(&self, id: NodeId) -> &'a str {
        let range = self.nodes[id.0].range.clone();
        self.source.get(range).unwrap_or_default()
    }

    /// Position of a node among its siblings.
    #[must_use]
    pub fn index_in_parent(&self, id: NodeId) -> usize {
        self.parent(id)
            .and_then(|p| self.children(p).iter().position(|&c| c == id))
            .unwrap_or(0)
    }

    /// The sibling immediately before a node.
    #[must_use]
    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.index_in_parent(id);
        index
            .checked_sub(1)
            .map(|i| self.children(parent)[i])
    }

    /// Ancestors of a node, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&p| self.parent(p))
    }

    /// Plain text of a node's inline content.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match self.kind(id) {
            NodeKind::Text(t) | NodeKind::Code(t) => out.push_str(t),
            NodeKind::Emoji { value, .. } => out.push_str(value),
            NodeKind::SoftBreak => out.push(' '),
            NodeKind::HardBreak => out.push('\n'),
            _ => {
                for &child in self.children(id) {
                    self.collect_text(child, out);
                }
            }
        }
    }
}

struct Builder<'a> {
    ast: Ast<'a>,
    open: Vec<NodeId>,
    pending_text: Option<(String, Range<usize>)>,
    emoji: bool,
    code_depth: usize,
}

impl Builder<'_> {
    fn current(&self) -> NodeId {
        self.open.last().copied().unwrap_or(NodeId(0))
    }

    fn add(&mut self, kind: NodeKind, range: Range<usize>) -> NodeId {
        let id = NodeId(self.ast.nodes.len());
        let parent = self.current();
        self.ast.nodes.push(Node {
            kind,
            range,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.ast.nodes[parent.0].children.push(id);
        id
    }

    fn event(&mut self, event: Event<'_>, range: Range<usize>) {
        if let Event::Text(text) = &event {
            match &mut self.pending_text {
                Some((pending, pending_range)) => {
                    pending.push_str(text);
                    pending_range.end = range.end;
                }
                None => self.pending_text = Some((text.to_string(), range)),
            }
            return;
        }
        self.flush_text();

        match event {
            Event::Start(tag) => {
                let kind = self.start_kind(tag);
                if matches!(kind, NodeKind::CodeBlock { .. }) {
                    self.code_depth += 1;
                }
                let id = self.add(kind, range);
                self.open.push(id);
            }
            Event::End(_) => {
                if let Some(id) = self.open.pop() {
                    if matches!(self.ast.kind(id), NodeKind::CodeBlock { .. }) {
                        self.code_depth -= 1;
                    }
                }
            }
            Event::Text(_) => {}
            Event::Code(code) => {
                self.add(NodeKind::Code(code.to_string()), range);
            }
            Event::Html(html) | Event::InlineHtml(html) => {
                self.add(NodeKind::Html(html.to_string()), range);
            }
            Event::InlineMath(_) => {
                self.add(NodeKind::Unknown("inline_math"), range);
            }
            Event::DisplayMath(_) => {
                self.add(NodeKind::Unknown("display_math"), range);
            }
            Event::FootnoteReference(_) => {
                self.add(NodeKind::Unknown("footnote_reference"), range);
            }
            Event::SoftBreak => {
                self.add(NodeKind::SoftBreak, range);
            }
            Event::HardBreak => {
                self.add(NodeKind::HardBreak, range);
            }
            Event::Rule => {
                self.add(NodeKind::ThematicBreak, range);
            }
            Event::TaskListMarker(checked) => {
                let item = std::iter::once(self.current())
                    .chain(self.ast.ancestors(self.current()))
                    .find(|&id| matches!(self.ast.kind(id), NodeKind::Item { .. }));
                if let Some(item) = item {
                    self.ast.nodes[item.0].kind = NodeKind::Item {
                        task: Some(checked),
                    };
                }
            }
        }
    }

    fn start_kind(&self, tag: Tag<'_>) -> NodeKind {
        match tag {
            Tag::Paragraph => NodeKind::Paragraph,
            Tag::Heading { level, .. } => NodeKind::Heading { level: level as u8 },
            Tag::BlockQuote(_) => NodeKind::BlockQuote,
            Tag::CodeBlock(CodeBlockKind::Fenced(info)) => NodeKind::CodeBlock {
                info: info.to_string(),
                fenced: true,
            },
            Tag::CodeBlock(CodeBlockKind::Indented) => NodeKind::CodeBlock {
                info: String::new(),
                fenced: false,
            },
            Tag::HtmlBlock => NodeKind::HtmlBlock,
            Tag::List(start) => NodeKind::List {
                ordered: start.is_some(),
                start: start.unwrap_or(1),
            },
            Tag::Item => NodeKind::Item { task: None },
            Tag::Table(alignments) => NodeKind::Table {
                alignments: alignments.into_iter().map(Alignment::from).collect(),
            },
            Tag::TableHead => NodeKind::TableHead,
            Tag::TableRow => NodeKind::TableRow,
            Tag::TableCell => {
                let parent = self.current();
                let head = matches!(self.ast.kind(parent), NodeKind::TableHead);
                let column = self.ast.children(parent).len();
                let alignment = self
                    .ast
                    .ancestors(parent)
                    .find_map(|id| match self.ast.kind(id) {
                        NodeKind::Table { alignments } => alignments.get(column).copied(),
                        _ => None,
                    })
                    .unwrap_or_default();
                NodeKind::TableCell { alignment, head }
            }
            Tag::DefinitionList => NodeKind::DefinitionList,
            Tag::DefinitionListTitle => NodeKind::DefinitionTerm,
            Tag::DefinitionListDefinition => NodeKind::DefinitionDescription,
            Tag::Emphasis => NodeKind::Emphasis,
            Tag::Strong => NodeKind::Strong,
            Tag::Strikethrough => NodeKind::Strikethrough,
            Tag::Link {
                link_type: LinkType::Autolink,
                dest_url,
                ..
            } => NodeKind::AutoLink {
                dest: dest_url.to_string(),
                email: false,
            },
            Tag::Link {
                link_type: LinkType::Email,
                dest_url,
                ..
            } => NodeKind::AutoLink {
                dest: dest_url.to_string(),
                email: true,
            },
            Tag::Link {
                dest_url, title, ..
            } => NodeKind::Link {
                dest: dest_url.to_string(),
                title: title.to_string(),
            },
            Tag::Image {
                dest_url, title, ..
            } => NodeKind::Image {
                dest: dest_url.to_string(),
                title: title.to_string(),
            },
            Tag::FootnoteDefinition(_) => NodeKind::Unknown("footnote_definition"),
            Tag::MetadataBlock(_) => NodeKind::Unknown("metadata_block"),
            #[allow(unreachable_patterns)]
            _ => NodeKind::Unknown("extension"),
        }
    }

    fn flush_text(&mut self) {
        let Some((text, range)) = self.pending_text.take() else {
            return;
        };
        if !self.emoji || self.code_depth > 0 {
            self.add(NodeKind::Text(text), range);
            return;
        }
        for piece in emoji::split(&text) {
            let kind = match piece {
                Piece::Text(t) => NodeKind::Text(t.to_string()),
                Piece::Emoji { shortcode, value } => NodeKind::Emoji {
                    shortcode: shortcode.to_string(),
                    value: value.to_string(),
                },
            };
            self.add(kind, range.clone());
        }
    }
}
