//! Property-based tests for wrapping and rendering.
//!
//! - Line width bounds (no paragraph line exceeds the wrap width)
//! - Content preservation (words survive the wrap/render pipeline)
//! - Stability (never panics for any input)
//! - Determinism (same input, same output)

use glamour::ansi::{self, ColorProfile};
use glamour::context::wrap_lines;
use glamour::{Renderer, Style};
use proptest::prelude::*;

fn extract_words(s: &str) -> Vec<String> {
    s.split_whitespace().map(str::to_string).collect()
}

// ===========================================================================
// 1. Stability
// ===========================================================================

proptest! {
    #[test]
    fn render_never_panics(
        text in "\\PC{0,300}",
        wrap_width in 0usize..300,
    ) {
        let renderer = Renderer::new()
            .with_word_wrap(wrap_width)
            .with_style(Style::Ascii);
        let _output = renderer.render(&text);
    }

    #[test]
    fn all_styles_never_panic(
        text in "[a-zA-Z0-9 .,!?*_`#>\\-\\n]{0,200}",
        style_idx in 0usize..6,
    ) {
        let styles = [
            Style::Ascii,
            Style::Dark,
            Style::Dracula,
            Style::Light,
            Style::Pink,
            Style::NoTty,
        ];
        let renderer = Renderer::new()
            .with_word_wrap(60)
            .with_style(styles[style_idx]);
        let _output = renderer.render(&text);
    }

    #[test]
    fn markdown_elements_never_panic(
        heading in "[a-zA-Z ]{1,30}",
        paragraph in "[a-zA-Z ]{1,60}",
        code in "[a-zA-Z0-9_(){}; ]{0,40}",
        list_items in prop::collection::vec("[a-zA-Z ]{1,20}", 1..5),
        wrap_width in 20usize..120,
    ) {
        let list_md: String = list_items.iter()
            .map(|item| format!("- {item}"))
            .collect::<Vec<_>>()
            .join("\n");
        let md = format!(
            "# {heading}\n\n{paragraph}\n\n```rust\n{code}\n```\n\n{list_md}\n\n| a | b |\n|---|---|\n| {paragraph} | x |\n"
        );
        let renderer = Renderer::new()
            .with_word_wrap(wrap_width)
            .with_style(Style::Dark);
        prop_assert!(renderer.render(&md).is_ok());
    }
}

// ===========================================================================
// 2. Width bounds
// ===========================================================================

proptest! {
    #[test]
    fn wrapped_lines_fit(
        words in prop::collection::vec("[a-zA-Z]{1,15}", 1..40),
        width in 1usize..80,
    ) {
        let text = words.join(" ");
        for line in wrap_lines(&text, width) {
            prop_assert!(ansi::visible_width(&line) <= width, "{line:?} > {width}");
        }
    }

    #[test]
    fn paragraph_lines_fit_the_wrap_width(
        words in prop::collection::vec("[a-zA-Z]{1,12}", 1..40),
        wrap_width in 20usize..120,
        style_idx in 0usize..3,
    ) {
        let style = [Style::Ascii, Style::Dark, Style::Light][style_idx];
        let text = words.join(" ");
        let output = Renderer::new()
            .with_word_wrap(wrap_width)
            .with_style(style)
            .render(&text)
            .unwrap();
        for line in output.lines() {
            prop_assert!(
                ansi::visible_width(line) <= wrap_width,
                "line {line:?} wider than {wrap_width}"
            );
        }
    }

    #[test]
    fn list_lines_fit_the_wrap_width(
        items in prop::collection::vec("[a-z]{1,8}( [a-z]{1,8}){0,12}", 1..6),
        wrap_width in 20usize..80,
    ) {
        let md: String = items.iter().map(|i| format!("- {i}\n")).collect();
        let output = Renderer::new()
            .with_word_wrap(wrap_width)
            .with_style(Style::Dark)
            .render(&md)
            .unwrap();
        for line in output.lines() {
            prop_assert!(ansi::visible_width(line) <= wrap_width, "{line:?}");
        }
    }
}

// ===========================================================================
// 3. Content preservation and determinism
// ===========================================================================

proptest! {
    #[test]
    fn paragraph_words_preserved(
        words in prop::collection::vec("[a-zA-Z]{1,12}", 1..20),
        wrap_width in 20usize..120,
    ) {
        let text = words.join(" ");
        let output = Renderer::new()
            .with_word_wrap(wrap_width)
            .with_style(Style::Dark)
            .render(&text)
            .unwrap();
        let plain = ansi::strip(&output);
        prop_assert_eq!(extract_words(&plain), words);
    }

    #[test]
    fn rendering_is_idempotent(
        text in "[a-zA-Z0-9 *_`#>\\-\\n]{0,200}",
    ) {
        let renderer = Renderer::new().with_style(Style::Dark);
        let first = renderer.render(&text).unwrap();
        let second = renderer.render(&text).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn ascii_profile_never_emits_colour(
        text in "[a-zA-Z0-9 *_`#>\\-\\n]{0,200}",
    ) {
        let output = Renderer::new()
            .with_style(Style::Dark)
            .with_color_profile(ColorProfile::Ascii)
            .render(&text)
            .unwrap();
        prop_assert!(!output.contains("38;"));
        prop_assert!(!output.contains("48;"));
    }
}
