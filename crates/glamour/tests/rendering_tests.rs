//! End-to-end rendering tests: block layout, lists, tables, links, themes
//! and the streaming interface.

use std::io::{Read, Write};
use std::sync::Arc;
use std::thread;

use glamour::ansi;
use glamour::highlight::ThemeRegistry;
use glamour::{
    ColorProfile, ConfigError, Error, Renderer, Style, StyleConfig, TableError, render,
};

fn ascii(md: &str) -> String {
    render(md, Style::Ascii).unwrap()
}

fn content_lines(s: &str) -> Vec<String> {
    s.lines()
        .map(ansi::strip)
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.trim_end().to_string())
        .collect()
}

// ===========================================================================
// Blocks
// ===========================================================================

#[test]
fn empty_document_renders_nothing() {
    assert!(content_lines(&ascii("")).is_empty());
}

#[test]
fn document_is_indented() {
    let lines = content_lines(&ascii("hello\n"));
    assert_eq!(lines, vec!["  hello"]);
}

#[test]
fn headings_are_separated_from_paragraphs() {
    let out = ascii("# One\n\ntext\n\n## Two\n\nmore\n");
    let lines: Vec<String> = out.lines().map(str::to_string).collect();
    let one = lines.iter().position(|l| l.contains("# One")).unwrap();
    assert!(lines[one + 1].trim().is_empty());
    assert!(lines[one + 2].contains("text"));
    assert!(lines.iter().any(|l| l.contains("## Two")));
}

#[test]
fn block_quote_lines_carry_the_bar() {
    let out = ascii("> first line\n> second line\n");
    for line in content_lines(&out) {
        assert!(line.trim_start().starts_with('|'), "{line:?}");
    }
}

#[test]
fn code_block_keeps_its_lines() {
    let out = ascii("```\nfn main() {\n    body();\n}\n```\n");
    let lines = content_lines(&out);
    assert!(lines.iter().any(|l| l.ends_with("fn main() {")));
    assert!(lines.iter().any(|l| l.ends_with("    body();")));
}

#[test]
fn thematic_break_renders_a_rule() {
    let out = ascii("above\n\n---\n\nbelow\n");
    assert!(content_lines(&out).iter().any(|l| l.trim() == "--------"));
}

// ===========================================================================
// Lists
// ===========================================================================

#[test]
fn ordered_list_starts_at_its_number() {
    let lines = content_lines(&ascii("3. a\n4. b\n5. c\n"));
    assert_eq!(lines, vec!["  3. a", "  4. b", "  5. c"]);
}

#[test]
fn bullet_list_items() {
    let lines = content_lines(&ascii("- one\n- two\n"));
    assert_eq!(lines, vec!["  * one", "  * two"]);
}

#[test]
fn task_list_items() {
    let lines = content_lines(&ascii("- [x] done\n- [ ] open\n"));
    assert_eq!(lines, vec!["  [x] done", "  [ ] open"]);
}

#[test]
fn code_inside_list_items_is_not_rewrapped() {
    let line = "let value = compute(alpha, beta, gamma, delta, epsilon);";
    let md = format!("- item\n\n  ```\n  {line}\n  ```\n");
    let out = Renderer::new()
        .with_style(Style::Ascii)
        .with_word_wrap(40)
        .render(&md)
        .unwrap();
    let lines = content_lines(&out);
    assert_eq!(lines.len(), 2, "{lines:?}");
    assert_eq!(lines[0], "  * item");
    assert!(lines[1].ends_with(line), "{lines:?}");
    assert!(lines[1].starts_with("      "), "{lines:?}");
}

#[test]
fn long_items_hang_under_their_text() {
    let out = Renderer::new()
        .with_style(Style::Ascii)
        .with_word_wrap(20)
        .render("- alpha beta gamma delta epsilon\n")
        .unwrap();
    let lines = content_lines(&out);
    assert!(lines.len() > 1);
    assert!(lines[0].starts_with("  * alpha"));
    for line in &lines[1..] {
        assert!(line.starts_with("    "), "{line:?}");
    }
}

// ===========================================================================
// Tables
// ===========================================================================

#[test]
fn table_has_header_rule_and_body() {
    let out = ascii("| Name | Qty |\n|:-----|----:|\n| pear | 3 |\n| fig | 12 |\n");
    let lines = content_lines(&out);
    assert_eq!(lines.len(), 4, "{lines:?}");
    assert!(lines[0].contains("Name"));
    assert!(lines[1].contains('-'));
    assert!(lines[2].contains("pear"));
    assert!(lines[3].contains("fig"));
    // right-aligned numbers end at the same column
    assert_eq!(lines[2].len(), lines[3].len());
}

#[test]
fn wide_tables_shrink_to_the_wrap_width() {
    let cell = "word ".repeat(20);
    let md = format!("| a | b |\n|---|---|\n| {cell} | {cell} |\n");
    let out = Renderer::new()
        .with_style(Style::Ascii)
        .with_word_wrap(40)
        .render(&md)
        .unwrap();
    for line in out.lines() {
        assert!(ansi::visible_width(line) <= 40, "{line:?}");
    }
}

#[test]
fn many_columns_fit_a_narrow_wrap_width() {
    let md = "| a | b | c | d | e |\n|---|---|---|---|---|\n| 1 | 2 | 3 | 4 | 5 |\n";
    for width in [6, 10, 14] {
        let out = Renderer::new()
            .with_style(Style::Ascii)
            .with_word_wrap(width)
            .render(md)
            .unwrap();
        for line in out.lines() {
            assert!(ansi::visible_width(line) <= width, "{width}: {line:?}");
        }
    }
}

#[test]
fn tables_inside_lists_render() {
    let out = ascii("- item\n\n  | a |\n  |---|\n  | b |\n");
    let lines = content_lines(&out);
    assert!(lines.iter().any(|l| l.contains('a')));
    assert!(lines.iter().any(|l| l.contains('b')));
}

#[test]
fn table_errors_surface_from_the_builder() {
    let mut builder = glamour::table::TableBuilder::new(vec![glamour::ast::Alignment::None]);
    assert_eq!(
        builder.begin_row(),
        Err(TableError::UnexpectedEvent {
            event: "row",
            state: "awaiting header",
        })
    );
}

// ===========================================================================
// Links, images, HTML, emoji
// ===========================================================================

#[test]
fn link_with_text_and_url() {
    let out = ascii("see [docs](https://x.dev/docs)\n");
    assert!(out.contains("see docs https://x.dev/docs"));
}

#[test]
fn link_with_url_as_text_collapses() {
    let out = ascii("<https://x.dev>\n\n[https://y.dev](https://y.dev)\n");
    assert_eq!(out.matches("https://x.dev").count(), 1);
    assert_eq!(out.matches("https://y.dev").count(), 1);
}

#[test]
fn upper_case_headings_keep_urls_intact() {
    let config = StyleConfig {
        h1: glamour::StyleBlock::new().style(glamour::StylePrimitive::new().upper(true)),
        ..Style::Ascii.config()
    };
    let out = Renderer::new()
        .with_style_config(config)
        .render("# see <https://x.dev/Path>\n")
        .unwrap();
    assert!(out.contains("SEE https://x.dev/Path"), "{out:?}");
}

#[test]
fn relative_links_use_the_base_url() {
    let out = Renderer::new()
        .with_style(Style::Ascii)
        .with_base_url("https://example.com/repo/")
        .render("[readme](README.md) ![logo](img/logo.png)\n")
        .unwrap();
    assert!(out.contains("readme https://example.com/repo/README.md"), "{out:?}");
    assert!(out.contains("https://example.com/repo/img/logo.png"), "{out:?}");
}

#[test]
fn malformed_base_url_is_ignored() {
    let out = Renderer::new()
        .with_style(Style::Ascii)
        .with_base_url("not a url")
        .render("[x](page.md)\n")
        .unwrap();
    assert!(out.contains("x page.md"), "{out:?}");
}

#[test]
fn image_alt_text_is_formatted() {
    let out = ascii("![diagram](https://x.dev/d.png)\n");
    assert!(out.contains("Image: diagram -> https://x.dev/d.png"), "{out:?}");
}

#[test]
fn html_is_reduced_to_text() {
    let out = ascii("<div>\n<b>kept</b>\n<script>lost()</script>\n</div>\n\ninline <em>tags</em> go\n");
    assert!(out.contains("kept"));
    assert!(!out.contains("lost"));
    assert!(!out.contains('<'));
    assert!(out.contains("inline tags go"));
}

#[test]
fn emoji_shortcodes_when_enabled() {
    let md = "ship it :rocket:\n";
    let plain = Renderer::new().with_style(Style::Ascii).render(md).unwrap();
    assert!(plain.contains(":rocket:"));
    let out = Renderer::new()
        .with_style(Style::Ascii)
        .with_emoji(true)
        .render(md)
        .unwrap();
    assert!(out.contains("ship it 🚀"), "{out:?}");
}

#[test]
fn definition_lists_render_term_and_description() {
    let lines = content_lines(&ascii("Rust\n: a language\n"));
    assert_eq!(lines, vec!["  Rust", "  * a language"]);
}

#[test]
fn hard_breaks_split_lines() {
    let lines = content_lines(&ascii("one  \ntwo\n"));
    assert_eq!(lines, vec!["  one", "  two"]);
}

#[test]
fn footnotes_do_not_break_rendering() {
    let out = ascii("text[^1]\n\n[^1]: the note\n");
    assert!(out.contains("text"));
    assert!(out.contains("the note"));
}

// ===========================================================================
// Themes
// ===========================================================================

#[test]
fn theme_round_trips_through_json() {
    for style in [Style::Ascii, Style::Dark, Style::Light, Style::Pink, Style::Dracula] {
        let config = style.config();
        let json = config.to_json().unwrap();
        assert_eq!(StyleConfig::from_json(&json).unwrap(), config, "{style:?}");
    }
}

#[test]
fn theme_file_is_loaded() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{ "document": {{ "indent": 4 }}, "h1": {{ "prefix": ">> " }} }}"#
    )
    .unwrap();
    let out = Renderer::new()
        .with_style_path(file.path())
        .unwrap()
        .render("# Hi\n")
        .unwrap();
    assert_eq!(content_lines(&out), vec!["    >> Hi"]);
}

#[test]
fn malformed_theme_file_is_rejected() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{{ not json").unwrap();
    let err = Renderer::new().with_style_path(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Malformed(_)));
}

#[test]
fn missing_theme_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let err = Renderer::new()
        .with_style_path(dir.path().join("missing.json"))
        .unwrap_err();
    assert!(matches!(err, ConfigError::Unreadable { .. }));
}

#[test]
fn invalid_colour_aborts_the_render() {
    let config = StyleConfig::from_json(r##"{ "text": { "color": "#12" } }"##);
    assert!(matches!(config, Err(ConfigError::InvalidColor { .. })));
}

// ===========================================================================
// Renderer behaviour
// ===========================================================================

#[test]
fn rendering_is_deterministic() {
    let renderer = Renderer::new();
    let md = "# T\n\n> q\n\n1. a\n2. b\n\n| x | y |\n|---|---|\n| 1 | 2 |\n\n```rust\nlet a = 1;\n```\n";
    let first = renderer.render(md).unwrap();
    for _ in 0..3 {
        assert_eq!(renderer.render(md).unwrap(), first);
    }
}

#[test]
fn renderers_share_a_theme_registry_across_threads() {
    let registry = Arc::new(ThemeRegistry::new());
    let md = "```rust\nfn main() {}\n```\n";
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let renderer = Renderer::new().with_theme_registry(Arc::clone(&registry));
            thread::spawn(move || renderer.render(md).unwrap())
        })
        .collect();
    let outputs: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(outputs.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(registry.len(), 1);
}

#[test]
fn wrap_width_zero_disables_wrapping() {
    let long = "word ".repeat(60);
    let out = Renderer::new()
        .with_style(Style::Ascii)
        .with_word_wrap(0)
        .render(long.trim_end())
        .unwrap();
    assert_eq!(content_lines(&out).len(), 1);
}

#[test]
fn preserved_newlines_keep_soft_breaks() {
    let out = Renderer::new()
        .with_style(Style::Ascii)
        .with_preserved_newlines(true)
        .render("one\ntwo\n")
        .unwrap();
    assert_eq!(content_lines(&out), vec!["  one", "  two"]);
}

#[test]
fn streaming_write_close_read() {
    let mut renderer = Renderer::new()
        .with_style(Style::Ascii)
        .with_color_profile(ColorProfile::Ascii);
    renderer.write_all(b"# Streamed\n\n").unwrap();
    renderer.write_all(b"body text\n").unwrap();
    renderer.close().unwrap();
    let mut out = String::new();
    renderer.read_to_string(&mut out).unwrap();
    assert_eq!(content_lines(&out), vec!["  # Streamed", "  body text"]);
}

#[test]
fn streaming_reports_invalid_utf8() {
    let mut renderer = Renderer::new();
    renderer.write_all(&[b'a', 0xff]).unwrap();
    assert!(matches!(renderer.close(), Err(Error::Utf8(_))));
}
