//! Syntax highlighting example
//!
//! Run with: cargo run -p glamour --example syntax_highlighting

use glamour::{Renderer, Style, render};

const MARKDOWN: &str = r#"
# Code Examples

## Rust Code

```rust
fn main() {
    let message = "Hello, World!";
    println!("{}", message);
}
```

## Python Code

```python
def greet(name: str) -> str:
    """Return a greeting message."""
    return f"Hello, {name}!"
```

## JSON Data

```json
{ "name": "glamour", "features": ["syntax-highlighting"] }
```

## Unknown Language

```nosuchlang
rendered as plain code
```
"#;

fn main() -> glamour::Result<()> {
    println!("=== Glamour Syntax Highlighting Demo ===\n");

    println!("--- Dark palette ---\n");
    println!("{}", render(MARKDOWN, Style::Dark)?);

    println!("--- Solarized (dark) built-in theme ---\n");
    let mut config = Style::Dark.config();
    config.code_block.chroma = None;
    config.code_block.theme = Some("Solarized (dark)".to_string());
    let renderer = Renderer::new().with_style_config(config);
    println!("{}", renderer.render(MARKDOWN)?);

    Ok(())
}
