//! Node dispatch and the document walk.
//!
//! [`dispatch`] maps a node to an [`Element`]: literal markers written on
//! entry and exit, plus the renderer and finisher to run. [`walk`] drives a
//! depth-first traversal with an explicit stack, so deeply nested documents
//! cannot overflow the call stack.

use tracing::debug;

use crate::ast::{Ast, NodeId, NodeKind};
use crate::elements::RenderState;
use crate::error::Result;

/// Work done when a node is entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementRenderer {
    Document,
    Paragraph,
    Heading,
    BlockQuote,
    List,
    Item,
    CodeBlock,
    HtmlBlock,
    ThematicBreak,
    Table,
    TableHead,
    TableRow,
    TableCell,
    DefinitionList,
    DefinitionTerm,
    DefinitionDescription,
    /// Renders an inline node and its whole subtree into the current block.
    Inline,
}

/// Work done when a node is exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementFinisher {
    /// Flush the node's block context into its parent.
    PopBlock,
    /// Write the heading suffix, then flush.
    Heading,
    /// Commit the header row.
    TableHead,
    /// Commit a body row.
    TableRow,
    /// Lay out the table, then flush.
    Table,
}

/// Per-node rendering behaviour.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Written before the renderer runs.
    pub entering: &'static str,
    /// Written after the finisher runs.
    pub exiting: &'static str,
    /// Runs on entry.
    pub renderer: Option<ElementRenderer>,
    /// Runs on exit.
    pub finisher: Option<ElementFinisher>,
}

impl Element {
    const fn block(renderer: ElementRenderer) -> Self {
        Self {
            entering: "",
            exiting: "",
            renderer: Some(renderer),
            finisher: Some(ElementFinisher::PopBlock),
        }
    }

    const fn with(renderer: ElementRenderer, finisher: Option<ElementFinisher>) -> Self {
        Self {
            entering: "",
            exiting: "",
            renderer: Some(renderer),
            finisher,
        }
    }

    const fn marker(entering: &'static str) -> Self {
        Self {
            entering,
            exiting: "",
            renderer: None,
            finisher: None,
        }
    }
}

/// Whether a node renders its own children, so they must not be
/// dispatched on their own.
#[must_use]
pub const fn consumes_children(kind: &NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::CodeBlock { .. }
            | NodeKind::HtmlBlock
            | NodeKind::TableCell { .. }
            | NodeKind::Emphasis
            | NodeKind::Strong
            | NodeKind::Strikethrough
            | NodeKind::Link { .. }
            | NodeKind::AutoLink { .. }
            | NodeKind::Image { .. }
    )
}

/// Maps a node to its element.
///
/// Nodes inside a consuming ancestor get an empty element. Unknown kinds
/// get an empty element and a diagnostic.
#[must_use]
pub fn dispatch(ast: &Ast<'_>, id: NodeId, preserve_newlines: bool) -> Element {
    if ast.ancestors(id).any(|a| consumes_children(ast.kind(a))) {
        return Element::default();
    }
    match ast.kind(id) {
        NodeKind::Document => Element::block(ElementRenderer::Document),
        NodeKind::Paragraph => Element::block(ElementRenderer::Paragraph),
        NodeKind::Heading { .. } => {
            Element::with(ElementRenderer::Heading, Some(ElementFinisher::Heading))
        }
        NodeKind::BlockQuote => Element::block(ElementRenderer::BlockQuote),
        NodeKind::List { .. } => Element::block(ElementRenderer::List),
        NodeKind::Item { .. } => Element::block(ElementRenderer::Item),
        NodeKind::CodeBlock { .. } => Element::block(ElementRenderer::CodeBlock),
        NodeKind::HtmlBlock => Element::block(ElementRenderer::HtmlBlock),
        NodeKind::ThematicBreak => Element::with(ElementRenderer::ThematicBreak, None),
        NodeKind::Table { .. } => {
            Element::with(ElementRenderer::Table, Some(ElementFinisher::Table))
        }
        NodeKind::TableHead => {
            Element::with(ElementRenderer::TableHead, Some(ElementFinisher::TableHead))
        }
        NodeKind::TableRow => {
            Element::with(ElementRenderer::TableRow, Some(ElementFinisher::TableRow))
        }
        NodeKind::TableCell { .. } => Element::with(ElementRenderer::TableCell, None),
        NodeKind::DefinitionList => Element::block(ElementRenderer::DefinitionList),
        NodeKind::DefinitionTerm => Element::block(ElementRenderer::DefinitionTerm),
        NodeKind::DefinitionDescription => Element::block(ElementRenderer::DefinitionDescription),
        NodeKind::Text(_)
        | NodeKind::Code(_)
        | NodeKind::Emphasis
        | NodeKind::Strong
        | NodeKind::Strikethrough
        | NodeKind::Link { .. }
        | NodeKind::AutoLink { .. }
        | NodeKind::Image { .. }
        | NodeKind::Html(_)
        | NodeKind::Emoji { .. } => Element::with(ElementRenderer::Inline, None),
        NodeKind::SoftBreak => Element::marker(if preserve_newlines { "\n" } else { " " }),
        NodeKind::HardBreak => Element::marker("\n"),
        NodeKind::Unknown(name) => {
            debug!(node.kind = name, "no renderer for node");
            Element::default()
        }
    }
}

enum Step {
    Enter(NodeId),
    Exit(Element),
}

/// Walks the tree depth-first, running each element's renderer on entry
/// and its finisher on exit.
///
/// # Errors
///
/// Stops at the first table error.
pub fn walk(ast: &Ast<'_>, state: &mut RenderState<'_>) -> Result<()> {
    let preserve_newlines = state.preserve_newlines();
    let mut steps = vec![Step::Enter(ast.root())];
    while let Some(step) = steps.pop() {
        match step {
            Step::Enter(id) => {
                let element = dispatch(ast, id, preserve_newlines);
                state.write(element.entering);
                if let Some(renderer) = element.renderer {
                    state.enter(renderer, ast, id)?;
                }
                let descend = !consumes_children(ast.kind(id))
                    && element.renderer != Some(ElementRenderer::Inline);
                steps.push(Step::Exit(element));
                if descend {
                    steps.extend(ast.children(id).iter().rev().map(|&c| Step::Enter(c)));
                }
            }
            Step::Exit(element) => {
                if let Some(finisher) = element.finisher {
                    state.finish(finisher)?;
                }
                state.write(element.exiting);
            }
        }
    }
    Ok(())
}
