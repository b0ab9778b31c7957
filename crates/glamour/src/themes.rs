//! Built-in style themes.

use std::collections::HashMap;

use crate::style::{
    StyleBlock, StyleChroma, StyleCodeBlock, StyleConfig, StyleList, StylePrimitive, StyleTable,
    StyleTask,
};

const DOCUMENT_INDENT: usize = 2;
const CODE_BLOCK_INDENT: usize = 2;
const LIST_LEVEL_INDENT: usize = 2;
const ASCII_LIST_LEVEL_INDENT: usize = 4;

// ============================================================================
// Built-in Styles
// ============================================================================

/// Available built-in styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Style {
    /// ASCII-only style (no special characters).
    Ascii,
    /// Dark terminal style (default).
    #[default]
    Dark,
    /// Light terminal style.
    Light,
    /// Pink accent style.
    Pink,
    /// Dracula palette.
    Dracula,
    /// No TTY style (for non-terminal output).
    NoTty,
    /// Auto-detect based on terminal.
    Auto,
}

impl Style {
    /// Gets the style configuration for this style.
    #[must_use]
    pub fn config(&self) -> StyleConfig {
        match self {
            Self::Ascii | Self::NoTty => ascii_style(),
            Self::Dark | Self::Auto => dark_style(),
            Self::Light => light_style(),
            Self::Pink => pink_style(),
            Self::Dracula => dracula_style(),
        }
    }

    /// Looks up a built-in style by its name (case-insensitive).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "ascii" => Some(Self::Ascii),
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            "pink" => Some(Self::Pink),
            "dracula" => Some(Self::Dracula),
            "notty" => Some(Self::NoTty),
            "auto" => Some(Self::Auto),
            _ => None,
        }
    }
}

/// Returns a map of style names to styles.
#[must_use]
pub fn available_styles() -> HashMap<&'static str, Style> {
    HashMap::from([
        ("ascii", Style::Ascii),
        ("dark", Style::Dark),
        ("light", Style::Light),
        ("pink", Style::Pink),
        ("dracula", Style::Dracula),
        ("notty", Style::NoTty),
        ("auto", Style::Auto),
    ])
}

fn headings(prefixes: [&str; 6]) -> [StyleBlock; 6] {
    prefixes.map(|p| StyleBlock::new().style(StylePrimitive::new().prefix(p)))
}

/// Creates the ASCII style configuration.
#[must_use]
pub fn ascii_style() -> StyleConfig {
    let [h1, h2, h3, h4, h5, h6] = headings(["# ", "## ", "### ", "#### ", "##### ", "###### "]);
    StyleConfig {
        document: StyleBlock::new()
            .style(StylePrimitive::new().block_prefix("\n").block_suffix("\n"))
            .indent(DOCUMENT_INDENT),
        block_quote: StyleBlock::new().indent(1).indent_token("| "),
        list: StyleList::new().level_indent(ASCII_LIST_LEVEL_INDENT),
        heading: StyleBlock::new().style(StylePrimitive::new().block_suffix("\n")),
        h1,
        h2,
        h3,
        h4,
        h5,
        h6,
        strikethrough: StylePrimitive::new().prefix("~~").suffix("~~"),
        emph: StylePrimitive::new().prefix("*").suffix("*"),
        strong: StylePrimitive::new().prefix("**").suffix("**"),
        horizontal_rule: StylePrimitive::new().format("--------"),
        item: StylePrimitive::new().block_prefix("* "),
        enumeration: StylePrimitive::new().block_prefix(". "),
        task: StyleTask::new().ticked("[x] ").unticked("[ ] "),
        image_text: StylePrimitive::new().format("Image: {{text}} ->"),
        code: StyleBlock::new().style(StylePrimitive::new().prefix("`").suffix("`")),
        code_block: StyleCodeBlock::new().block(StyleBlock::new().indent(CODE_BLOCK_INDENT)),
        table: StyleTable::new().separators("|", "|", "-"),
        definition_description: StylePrimitive::new().block_prefix("\n* "),
        ..StyleConfig::default()
    }
}

/// Creates the dark style configuration.
#[must_use]
pub fn dark_style() -> StyleConfig {
    let [h1, h2, h3, h4, h5, _] = headings(["", "## ", "### ", "#### ", "##### ", ""]);
    StyleConfig {
        document: StyleBlock::new()
            .style(
                StylePrimitive::new()
                    .block_prefix("\n")
                    .block_suffix("\n")
                    .color("252"),
            )
            .indent(DOCUMENT_INDENT),
        block_quote: StyleBlock::new().indent(1).indent_token("│ "),
        list: StyleList::new().level_indent(LIST_LEVEL_INDENT),
        heading: StyleBlock::new().style(
            StylePrimitive::new()
                .block_suffix("\n")
                .color("39")
                .bold(true),
        ),
        h1: h1.style(
            StylePrimitive::new()
                .prefix(" ")
                .suffix(" ")
                .color("228")
                .background_color("63")
                .bold(true),
        ),
        h2,
        h3,
        h4,
        h5,
        h6: StyleBlock::new().style(StylePrimitive::new().prefix("###### ").color("35").bold(false)),
        strikethrough: StylePrimitive::new().crossed_out(true),
        emph: StylePrimitive::new().italic(true),
        strong: StylePrimitive::new().bold(true),
        horizontal_rule: StylePrimitive::new().color("240").format("--------"),
        item: StylePrimitive::new().block_prefix("• "),
        enumeration: StylePrimitive::new().block_prefix(". "),
        task: StyleTask::new().ticked("[✓] ").unticked("[ ] "),
        link: StylePrimitive::new().color("30").underline(true),
        link_text: StylePrimitive::new().color("35").bold(true),
        image: StylePrimitive::new().color("212").underline(true),
        image_text: StylePrimitive::new().color("243").format("Image: {{text}} →"),
        code: StyleBlock::new().style(
            StylePrimitive::new()
                .prefix(" ")
                .suffix(" ")
                .color("203")
                .background_color("236"),
        ),
        code_block: StyleCodeBlock::new()
            .block(
                StyleBlock::new()
                    .style(StylePrimitive::new().color("244"))
                    .indent(CODE_BLOCK_INDENT),
            )
            .chroma(dark_chroma()),
        table: StyleTable::new().separators("┼", "│", "─"),
        definition_description: StylePrimitive::new().block_prefix("\n→ "),
        ..StyleConfig::default()
    }
}

fn dark_chroma() -> StyleChroma {
    let c = |color: &str| Some(StylePrimitive::new().color(color));
    StyleChroma {
        text: c("#C4C4C4"),
        error: Some(StylePrimitive::new().color("#F1F1F1").background_color("#F05B5B")),
        comment: c("#676767"),
        comment_preproc: c("#FF875F"),
        keyword: c("#00AAFF"),
        keyword_reserved: c("#FF5FD2"),
        keyword_namespace: c("#FF5F87"),
        keyword_type: c("#6E6ED8"),
        operator: c("#EF8080"),
        punctuation: c("#E8E8A8"),
        name: c("#C4C4C4"),
        name_builtin: c("#FF8EC7"),
        name_tag: c("#B083EA"),
        name_attribute: c("#7A7AE6"),
        name_class: Some(StylePrimitive::new().color("#F1F1F1").underline(true).bold(true)),
        name_decorator: c("#FFFF87"),
        name_function: c("#00D787"),
        literal_number: c("#6EEFC0"),
        literal_string: c("#C69669"),
        literal_string_escape: c("#AFFFD7"),
        generic_deleted: c("#FD5B5B"),
        generic_emph: Some(StylePrimitive::new().italic(true)),
        generic_inserted: c("#00D787"),
        generic_strong: Some(StylePrimitive::new().bold(true)),
        generic_subheading: c("#777777"),
        background: Some(StylePrimitive::new().background_color("#373737")),
        ..StyleChroma::default()
    }
}

/// Creates the light style configuration.
#[must_use]
pub fn light_style() -> StyleConfig {
    let [h1, h2, h3, h4, h5, _] = headings(["", "## ", "### ", "#### ", "##### ", ""]);
    StyleConfig {
        document: StyleBlock::new()
            .style(
                StylePrimitive::new()
                    .block_prefix("\n")
                    .block_suffix("\n")
                    .color("234"),
            )
            .indent(DOCUMENT_INDENT),
        block_quote: StyleBlock::new().indent(1).indent_token("│ "),
        list: StyleList::new().level_indent(LIST_LEVEL_INDENT),
        heading: StyleBlock::new().style(
            StylePrimitive::new()
                .block_suffix("\n")
                .color("27")
                .bold(true),
        ),
        h1: h1.style(
            StylePrimitive::new()
                .prefix(" ")
                .suffix(" ")
                .color("228")
                .background_color("63")
                .bold(true),
        ),
        h2,
        h3,
        h4,
        h5,
        h6: StyleBlock::new().style(StylePrimitive::new().prefix("###### ").bold(false)),
        strikethrough: StylePrimitive::new().crossed_out(true),
        emph: StylePrimitive::new().italic(true),
        strong: StylePrimitive::new().bold(true),
        horizontal_rule: StylePrimitive::new().color("249").format("--------"),
        item: StylePrimitive::new().block_prefix("• "),
        enumeration: StylePrimitive::new().block_prefix(". "),
        task: StyleTask::new().ticked("[✓] ").unticked("[ ] "),
        link: StylePrimitive::new().color("36").underline(true),
        link_text: StylePrimitive::new().color("29").bold(true),
        image: StylePrimitive::new().color("205").underline(true),
        image_text: StylePrimitive::new().color("243").format("Image: {{text}} →"),
        code: StyleBlock::new().style(
            StylePrimitive::new()
                .prefix(" ")
                .suffix(" ")
                .color("203")
                .background_color("254"),
        ),
        code_block: StyleCodeBlock::new()
            .block(
                StyleBlock::new()
                    .style(StylePrimitive::new().color("242"))
                    .indent(CODE_BLOCK_INDENT),
            )
            .chroma(light_chroma()),
        table: StyleTable::new().separators("┼", "│", "─"),
        definition_description: StylePrimitive::new().block_prefix("\n→ "),
        ..StyleConfig::default()
    }
}

fn light_chroma() -> StyleChroma {
    let c = |color: &str| Some(StylePrimitive::new().color(color));
    StyleChroma {
        text: c("#2A2A2A"),
        error: Some(StylePrimitive::new().color("#F1F1F1").background_color("#FF5555")),
        comment: c("#8D8D8D"),
        comment_preproc: c("#FF875F"),
        keyword: c("#279EFC"),
        keyword_reserved: c("#FF5FD2"),
        keyword_namespace: c("#FB406F"),
        keyword_type: c("#7049C2"),
        operator: c("#FF2626"),
        punctuation: c("#FA7878"),
        name_builtin: c("#0A1BB1"),
        name_tag: c("#581290"),
        name_attribute: c("#8362CB"),
        name_class: Some(StylePrimitive::new().color("#212121").underline(true).bold(true)),
        name_decorator: c("#A3A322"),
        name_function: c("#019F57"),
        literal_number: c("#22CCAE"),
        literal_string: c("#7E5B38"),
        literal_string_escape: c("#00AEAE"),
        generic_deleted: c("#FD5B5B"),
        generic_emph: Some(StylePrimitive::new().italic(true)),
        generic_inserted: c("#00D787"),
        generic_strong: Some(StylePrimitive::new().bold(true)),
        generic_subheading: c("#777777"),
        background: Some(StylePrimitive::new().background_color("#373737")),
        ..StyleChroma::default()
    }
}

/// Creates the pink style configuration.
#[must_use]
pub fn pink_style() -> StyleConfig {
    StyleConfig {
        document: StyleBlock::new().indent(DOCUMENT_INDENT),
        block_quote: StyleBlock::new().indent(1).indent_token("│ "),
        list: StyleList::new().level_indent(LIST_LEVEL_INDENT),
        heading: StyleBlock::new().style(
            StylePrimitive::new()
                .block_suffix("\n")
                .color("212")
                .bold(true),
        ),
        h1: StyleBlock::new().style(StylePrimitive::new().block_prefix("\n")),
        h2: StyleBlock::new().style(StylePrimitive::new().prefix("▌ ")),
        h3: StyleBlock::new().style(StylePrimitive::new().prefix("┃ ")),
        h4: StyleBlock::new().style(StylePrimitive::new().prefix("│ ")),
        h5: StyleBlock::new().style(StylePrimitive::new().prefix("┆ ")),
        h6: StyleBlock::new().style(StylePrimitive::new().prefix("┊ ").bold(false)),
        strikethrough: StylePrimitive::new().crossed_out(true),
        emph: StylePrimitive::new().italic(true),
        strong: StylePrimitive::new().bold(true),
        horizontal_rule: StylePrimitive::new().color("212").format("──────"),
        item: StylePrimitive::new().block_prefix("• "),
        enumeration: StylePrimitive::new().block_prefix(". "),
        task: StyleTask::new().ticked("[✓] ").unticked("[ ] "),
        link: StylePrimitive::new().color("99").underline(true),
        link_text: StylePrimitive::new().bold(true),
        image: StylePrimitive::new().underline(true),
        image_text: StylePrimitive::new().format("Image: {{text}}"),
        code: StyleBlock::new().style(
            StylePrimitive::new()
                .prefix(" ")
                .suffix(" ")
                .color("212")
                .background_color("236"),
        ),
        code_block: StyleCodeBlock::new()
            .block(StyleBlock::new().indent(CODE_BLOCK_INDENT))
            .theme("base16-ocean.dark"),
        table: StyleTable::new().separators("┼", "│", "─"),
        definition_description: StylePrimitive::new().block_prefix("\n→ "),
        ..StyleConfig::default()
    }
}

/// Creates the Dracula style configuration.
#[must_use]
pub fn dracula_style() -> StyleConfig {
    let [h1, h2, h3, h4, h5, h6] = headings(["# ", "## ", "### ", "#### ", "##### ", "###### "]);
    StyleConfig {
        document: StyleBlock::new()
            .style(
                StylePrimitive::new()
                    .block_prefix("\n")
                    .block_suffix("\n")
                    .color("#f8f8f2"),
            )
            .indent(DOCUMENT_INDENT),
        block_quote: StyleBlock::new()
            .style(StylePrimitive::new().color("#f1fa8c").italic(true))
            .indent(1)
            .indent_token("│ "),
        list: StyleList::new().level_indent(LIST_LEVEL_INDENT),
        heading: StyleBlock::new().style(
            StylePrimitive::new()
                .block_suffix("\n")
                .color("#bd93f9")
                .bold(true),
        ),
        h1,
        h2,
        h3,
        h4,
        h5,
        h6,
        strikethrough: StylePrimitive::new().crossed_out(true),
        emph: StylePrimitive::new().italic(true).color("#f1fa8c"),
        strong: StylePrimitive::new().bold(true).color("#ffb86c"),
        horizontal_rule: StylePrimitive::new().color("#6272A4").format("--------"),
        item: StylePrimitive::new().block_prefix("• "),
        enumeration: StylePrimitive::new().block_prefix(". ").color("#8be9fd"),
        task: StyleTask::new().ticked("[✓] ").unticked("[ ] "),
        link: StylePrimitive::new().color("#8be9fd").underline(true),
        link_text: StylePrimitive::new().color("#ff79c6"),
        image: StylePrimitive::new().color("#8be9fd").underline(true),
        image_text: StylePrimitive::new().color("#ff79c6").format("Image: {{text}} →"),
        code: StyleBlock::new().style(StylePrimitive::new().color("#50fa7b")),
        code_block: StyleCodeBlock::new()
            .block(
                StyleBlock::new()
                    .style(StylePrimitive::new().color("#ffb86c"))
                    .indent(CODE_BLOCK_INDENT),
            )
            .chroma(dracula_chroma()),
        table: StyleTable::new().separators("┼", "│", "─"),
        definition_description: StylePrimitive::new().block_prefix("\n→ "),
        ..StyleConfig::default()
    }
}

fn dracula_chroma() -> StyleChroma {
    let c = |color: &str| Some(StylePrimitive::new().color(color));
    StyleChroma {
        text: c("#f8f8f2"),
        error: Some(StylePrimitive::new().color("#f8f8f2").background_color("#ff5555")),
        comment: c("#6272A4"),
        comment_preproc: c("#ff79c6"),
        keyword: c("#ff79c6"),
        keyword_reserved: c("#ff79c6"),
        keyword_namespace: c("#ff79c6"),
        keyword_type: c("#8be9fd"),
        operator: c("#ff79c6"),
        punctuation: c("#f8f8f2"),
        name: c("#8be9fd"),
        name_builtin: c("#8be9fd"),
        name_tag: c("#ff79c6"),
        name_attribute: c("#50fa7b"),
        name_class: c("#8be9fd"),
        name_constant: c("#bd93f9"),
        name_decorator: c("#50fa7b"),
        name_function: c("#50fa7b"),
        literal_number: c("#6EEFC0"),
        literal_string: c("#f1fa8c"),
        literal_string_escape: c("#ff79c6"),
        generic_deleted: c("#ff5555"),
        generic_emph: Some(StylePrimitive::new().color("#f1fa8c").italic(true)),
        generic_inserted: c("#50fa7b"),
        generic_strong: Some(StylePrimitive::new().color("#ffb86c").bold(true)),
        generic_subheading: c("#bd93f9"),
        background: Some(StylePrimitive::new().background_color("#282a36")),
    }
}
