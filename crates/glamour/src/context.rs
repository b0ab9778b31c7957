//! The stack of open block contexts.
//!
//! Every block-level construct renders into its own buffer. When the
//! construct ends, its buffer is word-wrapped, indented, given its margin
//! and block prefix/suffix, and appended to the enclosing block. Only the
//! outermost block writes to the output sink.
//!
//! Renderers only ever see `&mut BlockStack`, never a buffer of their own,
//! so nothing can write into a block that has already been flushed.

use std::ops::Range;

use textwrap::{Options as WrapOptions, WordSeparator, WrapAlgorithm, wrap};
use tracing::trace;

use crate::ansi::{self, ColorProfile};
use crate::style::StyleBlock;

/// How a block's text is laid out on flush.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Re-flow lines longer than the available width.
    Wrap,
    /// Keep lines exactly as written.
    Verbatim,
}

#[derive(Debug)]
struct BlockContext {
    style: StyleBlock,
    buffer: String,
    flow: Flow,
    /// Marker drawn on the first line (list bullets); later lines get a
    /// hanging indent of the same width.
    lead: Option<String>,
    /// Byte ranges of `buffer` holding flushed child blocks. They are
    /// already laid out and never re-flowed.
    laid_out: Vec<Range<usize>>,
}

impl BlockContext {
    fn new(style: StyleBlock, flow: Flow, lead: Option<String>) -> Self {
        Self {
            style,
            buffer: String::new(),
            flow,
            lead,
            laid_out: Vec::new(),
        }
    }

    /// Splits `body` (a prefix of the buffer) into lines, wrapping only the
    /// text written directly into this block.
    fn layout(&self, body: &str, width: usize) -> Vec<String> {
        if self.flow == Flow::Verbatim || width == 0 {
            return body.split('\n').map(str::to_string).collect();
        }
        let mut lines = Vec::new();
        let mut offset = 0;
        for line in body.split('\n') {
            if self.laid_out.iter().any(|r| r.contains(&offset)) {
                lines.push(line.to_string());
            } else {
                lines.extend(wrap_lines(line, width));
            }
            offset += line.len() + 1;
        }
        lines
    }

    fn decoration_width(&self) -> usize {
        self.style.indent_width() + self.lead.as_deref().map_or(0, ansi::visible_width)
    }
}

/// Stack of open block contexts plus the output sink.
#[derive(Debug)]
pub struct BlockStack {
    entries: Vec<BlockContext>,
    base: StyleBlock,
    width: usize,
    profile: ColorProfile,
    sink: String,
}

impl BlockStack {
    /// Creates an empty stack wrapping at `width` cells (0 disables wrapping).
    #[must_use]
    pub fn new(width: usize, profile: ColorProfile) -> Self {
        Self {
            entries: Vec::new(),
            base: StyleBlock::default(),
            width,
            profile,
            sink: String::new(),
        }
    }

    /// Number of open contexts.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.entries.len()
    }

    /// Colour profile used for decorations.
    #[must_use]
    pub const fn profile(&self) -> ColorProfile {
        self.profile
    }

    /// Opens a new block context on top of the stack.
    pub fn push(&mut self, style: StyleBlock, flow: Flow) {
        self.push_entry(BlockContext::new(style, flow, None));
    }

    /// Opens a block whose first line starts with `marker` and whose other
    /// lines hang under the text after it.
    pub fn push_with_lead(&mut self, style: StyleBlock, flow: Flow, marker: String) {
        self.push_entry(BlockContext::new(style, flow, Some(marker)));
    }

    fn push_entry(&mut self, entry: BlockContext) {
        self.entries.push(entry);
        trace!(block.depth = self.entries.len(), "push block context");
    }

    /// Resolved style of the innermost open block.
    #[must_use]
    pub fn style(&self) -> &StyleBlock {
        self.entries.last().map_or(&self.base, |e| &e.style)
    }

    /// Appends text to the innermost open block, or to the sink if none is
    /// open.
    pub fn write(&mut self, s: &str) {
        match self.entries.last_mut() {
            Some(entry) => entry.buffer.push_str(s),
            None => self.sink.push_str(s),
        }
    }

    /// Makes sure the innermost block ends in a blank line, unless it is
    /// still empty.
    pub fn ensure_blank_line(&mut self) {
        let Some(entry) = self.entries.last_mut() else {
            return;
        };
        if entry.buffer.is_empty() {
            return;
        }
        let trailing = entry.buffer.len() - entry.buffer.trim_end_matches('\n').len();
        for _ in trailing..2 {
            entry.buffer.push('\n');
        }
    }

    /// Cells available for text in the innermost block; 0 means unlimited.
    #[must_use]
    pub fn width(&self) -> usize {
        self.width_at(self.entries.len())
    }

    fn width_at(&self, depth: usize) -> usize {
        if self.width == 0 {
            return 0;
        }
        let used: usize = self.entries[..depth]
            .iter()
            .map(BlockContext::decoration_width)
            .sum();
        self.width.saturating_sub(used).max(1)
    }

    /// Closes the innermost block and flushes it into its parent.
    ///
    /// Applies, in order: word-wrap, the lead marker, the indent token on
    /// every line, the vertical margin, then the block prefix and suffix
    /// (styled like the enclosing block).
    pub fn pop(&mut self) {
        let width = self.width_at(self.entries.len());
        let Some(entry) = self.entries.pop() else {
            return;
        };
        trace!(block.depth = self.entries.len() + 1, "pop block context");

        let body = entry.buffer.trim_end_matches('\n');
        if body.trim().is_empty() && entry.lead.is_none() {
            return;
        }

        let mut lines = entry.layout(body, width);
        if lines.iter().any(|l| l.contains('\x1b')) {
            lines = ansi::balance_lines(&lines.join("\n"))
                .split('\n')
                .map(str::to_string)
                .collect();
        }

        if let Some(marker) = &entry.lead {
            let hang = " ".repeat(ansi::visible_width(marker));
            for (i, line) in lines.iter_mut().enumerate() {
                let lead = if i == 0 { marker.as_str() } else { hang.as_str() };
                if i == 0 || !line.is_empty() {
                    line.insert_str(0, lead);
                }
            }
        }

        let indent = entry.style.indent.unwrap_or(0);
        if indent > 0 {
            let token = entry.style.indent_token.as_deref().unwrap_or(" ").repeat(indent);
            let styled = if token.trim().is_empty() {
                token.clone()
            } else {
                ansi::render_text(&entry.style.style, self.profile, &token)
            };
            let bare = token.trim_end();
            let styled_bare = ansi::render_text(&entry.style.style, self.profile, bare);
            for line in &mut lines {
                if !line.is_empty() {
                    line.insert_str(0, &styled);
                } else if !bare.is_empty() {
                    line.push_str(&styled_bare);
                }
            }
        }

        let parent_style = self.style().style.clone();
        let margin = "\n".repeat(entry.style.margin.unwrap_or(0));
        let mut out = ansi::render_text(&parent_style, self.profile, &entry.style.style.block_prefix);
        out.push_str(&margin);
        out.push_str(&lines.join("\n"));
        out.push('\n');
        out.push_str(&margin);
        out.push_str(&ansi::render_text(
            &parent_style,
            self.profile,
            &entry.style.style.block_suffix,
        ));

        match self.entries.last_mut() {
            Some(parent) => {
                if !parent.buffer.is_empty() && !parent.buffer.ends_with('\n') {
                    parent.buffer.push('\n');
                }
                let start = parent.buffer.len();
                parent.buffer.push_str(&out);
                parent.laid_out.push(start..parent.buffer.len());
            }
            None => {
                if !self.sink.is_empty() && !self.sink.ends_with('\n') {
                    self.sink.push('\n');
                }
                self.sink.push_str(&out);
            }
        }
    }

    /// Closes every open block and returns everything written to the sink.
    pub fn finish(mut self) -> String {
        while !self.entries.is_empty() {
            self.pop();
        }
        self.sink
    }
}

/// Greedy word-wrap of every line in `text` to `width` cells.
///
/// Explicit newlines are kept. Lines that already fit are left untouched.
#[must_use]
pub fn wrap_lines(text: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    for line in text.split('\n') {
        if ansi::visible_width(line) <= width {
            out.push(line.to_string());
            continue;
        }
        let options = WrapOptions::new(width)
            .break_words(true)
            .word_separator(WordSeparator::AsciiSpace)
            .wrap_algorithm(WrapAlgorithm::FirstFit);
        out.extend(wrap(line, options).into_iter().map(|l| l.trim_end().to_string()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::StylePrimitive;

    #[test]
    fn root_pop_goes_to_sink() {
        let mut stack = BlockStack::new(80, ColorProfile::TrueColor);
        stack.push(StyleBlock::new(), Flow::Wrap);
        stack.write("hello");
        stack.pop();
        assert_eq!(stack.finish(), "hello\n");
    }

    #[test]
    fn write_without_context_goes_to_sink() {
        let mut stack = BlockStack::new(80, ColorProfile::TrueColor);
        stack.write("raw");
        assert_eq!(stack.finish(), "raw");
    }

    #[test]
    fn child_flushes_into_parent() {
        let mut stack = BlockStack::new(80, ColorProfile::TrueColor);
        stack.push(StyleBlock::new().indent(2), Flow::Verbatim);
        stack.push(StyleBlock::new(), Flow::Wrap);
        stack.write("inner");
        stack.pop();
        assert_eq!(stack.depth(), 1);
        stack.pop();
        assert_eq!(stack.finish(), "  inner\n");
    }

    #[test]
    fn wraps_to_available_width() {
        let mut stack = BlockStack::new(12, ColorProfile::TrueColor);
        stack.push(StyleBlock::new().indent(2), Flow::Verbatim);
        stack.push(StyleBlock::new(), Flow::Wrap);
        assert_eq!(stack.width(), 10);
        stack.write("one two three four five");
        let out = stack.finish();
        for line in out.lines() {
            assert!(ansi::visible_width(line) <= 12, "line too wide: {line:?}");
        }
        assert!(out.starts_with("  one two\n"));
    }

    #[test]
    fn zero_width_disables_wrapping() {
        let mut stack = BlockStack::new(0, ColorProfile::TrueColor);
        stack.push(StyleBlock::new(), Flow::Wrap);
        let long = "word ".repeat(50);
        stack.write(long.trim_end());
        assert_eq!(stack.finish().lines().count(), 1);
    }

    #[test]
    fn verbatim_blocks_are_not_wrapped() {
        let mut stack = BlockStack::new(5, ColorProfile::TrueColor);
        stack.push(StyleBlock::new(), Flow::Verbatim);
        stack.write("let x = 1;");
        assert_eq!(stack.finish(), "let x = 1;\n");
    }

    #[test]
    fn indent_token_prefixes_every_line() {
        let mut stack = BlockStack::new(80, ColorProfile::Ascii);
        stack.push(StyleBlock::new().indent(1).indent_token("│ "), Flow::Wrap);
        stack.write("a\n\nb");
        assert_eq!(stack.finish(), "│ a\n│\n│ b\n");
    }

    #[test]
    fn lead_marks_first_line_and_hangs_the_rest() {
        let mut stack = BlockStack::new(10, ColorProfile::Ascii);
        stack.push_with_lead(StyleBlock::new(), Flow::Wrap, "• ".into());
        stack.write("alpha beta gamma");
        assert_eq!(stack.finish(), "• alpha\n  beta\n  gamma\n");
    }

    #[test]
    fn margin_adds_blank_lines() {
        let mut stack = BlockStack::new(80, ColorProfile::Ascii);
        stack.push(StyleBlock::new().margin(1), Flow::Wrap);
        stack.write("x");
        assert_eq!(stack.finish(), "\nx\n\n");
    }

    #[test]
    fn block_prefix_and_suffix_wrap_the_body() {
        let mut stack = BlockStack::new(80, ColorProfile::Ascii);
        let style = StyleBlock::new().style(StylePrimitive::new().block_prefix("\n").block_suffix("\n"));
        stack.push(style, Flow::Verbatim);
        stack.write("body");
        assert_eq!(stack.finish(), "\nbody\n\n");
    }

    #[test]
    fn empty_blocks_emit_nothing() {
        let mut stack = BlockStack::new(80, ColorProfile::Ascii);
        stack.push(StyleBlock::new().margin(2), Flow::Wrap);
        stack.write("  \n");
        assert_eq!(stack.finish(), "");
    }

    #[test]
    fn ensure_blank_line_tops_up_newlines() {
        let mut stack = BlockStack::new(80, ColorProfile::Ascii);
        stack.push(StyleBlock::new(), Flow::Verbatim);
        stack.ensure_blank_line();
        stack.write("a\n");
        stack.ensure_blank_line();
        stack.ensure_blank_line();
        stack.write("b");
        assert_eq!(stack.finish(), "a\n\nb\n");
    }

    #[test]
    fn styled_text_is_balanced_across_wrapped_lines() {
        let mut stack = BlockStack::new(6, ColorProfile::TrueColor);
        stack.push_with_lead(StyleBlock::new(), Flow::Wrap, "- ".into());
        stack.write("\x1b[1mbold text\x1b[0m");
        let out = stack.finish();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("- \x1b[1m"));
        assert!(lines[0].ends_with("\x1b[0m"));
        assert!(lines[1].starts_with("  \x1b[1m"));
    }

    #[test]
    fn flushed_children_are_not_wrapped_again() {
        let mut stack = BlockStack::new(20, ColorProfile::Ascii);
        stack.push_with_lead(StyleBlock::new(), Flow::Wrap, "* ".into());
        stack.write("item text that wraps");
        stack.push(StyleBlock::new().indent(2), Flow::Verbatim);
        stack.write("let value = compute(alpha, beta);");
        stack.pop();
        let out = stack.finish();
        assert_eq!(
            out,
            "* item text that\n  wraps\n    let value = compute(alpha, beta);\n"
        );
    }

    #[test]
    fn wrap_lines_breaks_long_words() {
        let lines = wrap_lines("abcdefghij", 4);
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }
}
