//! Theme gallery - preview every built-in style
//!
//! Run with: cargo run -p glamour --example theme_gallery

use glamour::{Renderer, available_styles};

const SAMPLE: &str = r#"# Gallery

Some *emphasis*, **strong text**, `inline code` and a [link](https://example.com).

> A quoted line.

1. first
2. second
   - [x] nested task

| Name | Qty |
|:-----|----:|
| pear | 3 |

```rust
fn fibonacci(n: u64) -> u64 {
    if n < 2 { n } else { fibonacci(n - 1) + fibonacci(n - 2) }
}
```
"#;

fn main() -> glamour::Result<()> {
    let mut styles: Vec<_> = available_styles().into_iter().collect();
    styles.sort_by_key(|(name, _)| *name);

    for (name, style) in styles {
        println!("Style: {name}");
        println!("{}", "-".repeat(40));
        let renderer = Renderer::new().with_style(style).with_word_wrap(60);
        println!("{}", renderer.render(SAMPLE)?);
    }
    Ok(())
}
