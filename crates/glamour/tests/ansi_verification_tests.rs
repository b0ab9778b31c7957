//! Verifies the ANSI escape sequences produced for each built-in style and
//! colour profile.

use glamour::ansi::{self, ColorProfile};
use glamour::{Renderer, Style, StyleBlock, StyleConfig, StylePrimitive};

// ===========================================================================
// Helpers
// ===========================================================================

fn contains_ansi(s: &str) -> bool {
    s.contains('\x1b')
}

/// Check if output contains a specific SGR code.
fn contains_sgr(s: &str, code: &str) -> bool {
    let standalone = format!("\x1b[{code}m");
    let prefix = format!("\x1b[{code};");
    s.contains(&standalone) || s.contains(&prefix)
}

fn render_with(md: &str, style: Style) -> String {
    Renderer::new().with_style(style).render(md).unwrap()
}

/// Every SGR sequence opened on a line is reset on the same line.
fn assert_lines_balanced(output: &str) {
    for line in output.lines() {
        let opens = line.matches("\x1b[").count() - line.matches("\x1b[0m").count();
        if opens > 0 {
            assert!(
                line.ends_with("\x1b[0m") || line.trim_end().ends_with("\x1b[0m"),
                "line leaves styling open: {line:?}"
            );
        }
    }
}

// ===========================================================================
// Headings and emphasis
// ===========================================================================

#[test]
fn dark_heading_has_ansi_codes() {
    let output = render_with("# Hello World", Style::Dark);
    assert!(contains_ansi(&output), "{output:?}");
    assert!(contains_sgr(&output, "38;5;228"), "{output:?}");
    assert!(contains_sgr(&output, "48;5;63"), "{output:?}");
    assert!(contains_sgr(&output, "1"), "{output:?}");
}

#[test]
fn heading_and_paragraph_end_to_end() {
    let output = render_with("# Title\n\nSome *em* and **strong** text.\n", Style::Dark);
    let plain: Vec<String> = output.lines().map(ansi::strip).collect();
    let title = plain
        .iter()
        .position(|l| l.contains("Title"))
        .expect("heading line");
    assert!(plain[title + 1].trim().is_empty(), "{plain:?}");
    assert!(
        plain[title + 2].contains("Some em and strong text."),
        "{plain:?}"
    );

    assert!(output.contains("\x1b[3m\x1b[38;5;252mem\x1b[0m"), "{output:?}");
    assert!(output.contains("\x1b[1m\x1b[38;5;252mstrong\x1b[0m"), "{output:?}");
    assert!(!output.contains("{{"));
}

#[test]
fn upper_case_headings() {
    let config = StyleConfig {
        h1: StyleBlock::new().style(StylePrimitive::new().upper(true)),
        ..StyleConfig::default()
    };
    let output = Renderer::new()
        .with_style_config(config)
        .render("# hello\n")
        .unwrap();
    assert_eq!(ansi::strip(&output).trim(), "HELLO");
}

#[test]
fn strikethrough_uses_crossed_out() {
    let output = render_with("~~gone~~", Style::Dark);
    assert!(contains_sgr(&output, "9"), "{output:?}");
}

#[test]
fn inline_code_has_background() {
    let output = render_with("run `cargo`", Style::Dark);
    assert!(contains_sgr(&output, "48;5;236"), "{output:?}");
    assert!(ansi::strip(&output).contains(" cargo "));
}

#[test]
fn links_are_underlined() {
    let output = render_with("[docs](https://x.dev)", Style::Dark);
    assert!(contains_sgr(&output, "4"), "{output:?}");
    assert!(ansi::strip(&output).contains("docs https://x.dev"));
}

// ===========================================================================
// Colour profiles
// ===========================================================================

#[test]
fn ascii_profile_has_no_colours() {
    let output = Renderer::new()
        .with_style(Style::Dark)
        .with_color_profile(ColorProfile::Ascii)
        .render("# Title\n\n*em* `code`\n\n```rust\nfn main() {}\n```\n")
        .unwrap();
    assert!(!output.contains("38;"), "{output:?}");
    assert!(!output.contains("48;"), "{output:?}");
    assert!(ansi::strip(&output).contains("fn main() {}"));
}

#[test]
fn ansi256_profile_downsamples_hex_colours() {
    let output = Renderer::new()
        .with_style(Style::Dracula)
        .with_color_profile(ColorProfile::Ansi256)
        .render("# Title\n\nbody\n")
        .unwrap();
    assert!(!output.contains("38;2;"), "{output:?}");
    assert!(output.contains("38;5;"), "{output:?}");
}

#[test]
fn ascii_style_is_plain_text() {
    let output = render_with("# Title\n\n**bold** and *em*\n\n- item\n", Style::Ascii);
    assert!(!contains_ansi(&output), "{output:?}");
    assert!(output.contains("# Title"));
    assert!(output.contains("**bold**"));
    assert!(output.contains("* item"));
}

// ===========================================================================
// Well-formedness
// ===========================================================================

#[test]
fn wrapped_styled_lines_are_balanced() {
    let md = format!("**{}**\n", "styled words that wrap ".repeat(10).trim_end());
    let output = Renderer::new()
        .with_style(Style::Dark)
        .with_word_wrap(30)
        .render(&md)
        .unwrap();
    assert!(output.lines().count() > 3);
    assert_lines_balanced(&output);
}

#[test]
fn indentation_is_never_styled() {
    let output = render_with("plain paragraph\n", Style::Dark);
    let line = output
        .lines()
        .find(|l| ansi::strip(l).contains("plain"))
        .expect("paragraph line");
    assert!(line.starts_with("  \x1b["), "{line:?}");
}

#[test]
fn highlighted_code_uses_palette_colours() {
    let output = render_with("```rust\nlet s = \"hi\";\n```\n", Style::Dark);
    // literal_string colour of the dark palette
    assert!(output.contains("38;2;198;150;105"), "{output:?}");
    assert_lines_balanced(&output);
}

#[test]
fn unknown_fence_language_renders_plain() {
    let output = render_with("```nosuchlang\nkeep me\n```\n", Style::Dark);
    let line = output
        .lines()
        .find(|l| ansi::strip(l).contains("keep me"))
        .expect("code line");
    // code_block colour, not a highlighting palette colour
    assert!(line.contains("38;5;244"), "{line:?}");
}
