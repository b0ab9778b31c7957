//! Error types for markdown rendering.
//!
//! Only configuration problems and table layout failures abort a render.
//! Template, highlighting and URL problems are recovered where they happen
//! and degrade to plain text; their types live here so the fallbacks can
//! log something meaningful.

use std::io;
use std::path::PathBuf;

/// Top-level error returned by [`crate::Renderer`] and the convenience
/// rendering functions.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The style theme could not be loaded or failed validation.
    ///
    /// Reported before any rendering begins.
    #[error("invalid style theme: {0}")]
    Config(#[from] ConfigError),

    /// A table could not be laid out.
    ///
    /// Partial tables are never emitted, so this aborts the whole render.
    #[error("failed to render table: {0}")]
    Table(#[from] TableError),

    /// I/O error while reading a theme document or streaming output.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// Markdown input handed over as bytes was not valid UTF-8.
    #[error("markdown input is not valid utf-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

/// A specialized [`Result`] type for glamour operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Problems with a style theme document.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The document is not valid JSON or does not match the theme schema.
    #[error("malformed theme document: {0}")]
    Malformed(#[from] serde_json::Error),

    /// A colour value is neither an ANSI index nor a hex colour.
    #[error("invalid color {value:?} for {element}")]
    InvalidColor {
        /// Theme element holding the colour (e.g. `h1`, `code_block.chroma.keyword`).
        element: String,
        /// The offending value.
        value: String,
    },

    /// A theme file could not be read.
    #[error("cannot read theme file {path}: {source}")]
    Unreadable {
        /// Path of the theme file.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A style name that is neither built in nor a readable file.
    #[error("unknown style: {0}")]
    UnknownStyle(String),
}

/// A malformed element format string.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// A `{{` without a matching `}}`.
    #[error("unclosed placeholder in format {0:?}")]
    Unclosed(String),

    /// A placeholder other than `{{text}}`.
    #[error("unknown placeholder {{{{{name}}}}} in format {format:?}")]
    UnknownPlaceholder {
        /// Placeholder name as written.
        name: String,
        /// The whole format string.
        format: String,
    },
}

/// Failure of the syntax highlighter for a single code block.
#[derive(thiserror::Error, Debug)]
pub enum HighlightError {
    /// No syntax definition matches the fence language.
    #[error("no syntax definition for language {0:?}")]
    UnknownLanguage(String),

    /// The configured highlighting theme does not exist.
    #[error("unknown highlighting theme {0:?}")]
    UnknownTheme(String),

    /// The highlighter itself failed while tokenizing.
    #[cfg(feature = "syntax-highlighting")]
    #[error("highlighter failed: {0}")]
    Syntect(#[from] syntect::Error),

    /// The highlight lock was poisoned by a panicking thread.
    #[error("theme registry lock poisoned")]
    Poisoned,
}

/// A link or image destination that cannot be resolved.
#[derive(thiserror::Error, Debug)]
pub enum UrlError {
    /// The base URL given to the renderer is itself malformed.
    #[error("invalid base url {base:?}: {source}")]
    InvalidBase {
        /// The configured base URL.
        base: String,
        /// Parser failure.
        #[source]
        source: url::ParseError,
    },

    /// The destination cannot be parsed or joined onto the base.
    #[error("invalid destination {destination:?}: {source}")]
    InvalidDestination {
        /// The destination as written in the document.
        destination: String,
        /// Parser failure.
        #[source]
        source: url::ParseError,
    },
}

/// Structural problems while assembling or laying out a table.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// A table event arrived in a state that cannot accept it.
    #[error("unexpected {event} while {state}")]
    UnexpectedEvent {
        /// The event that arrived (`cell`, `row`, `header`, `finish`).
        event: &'static str,
        /// The builder state at the time.
        state: &'static str,
    },

    /// A table event arrived with no table open.
    #[error("{0} outside of a table")]
    NoTable(&'static str),

    /// A table with rows but no columns.
    #[error("table has no columns")]
    NoColumns,

    /// A body row with more cells than the header declares.
    #[error("row {row} has {cells} cells but the table has {columns} columns")]
    RaggedRow {
        /// Zero-based body row index.
        row: usize,
        /// Number of cells in that row.
        cells: usize,
        /// Number of header columns.
        columns: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_converts_into_top_level() {
        let err: Error = ConfigError::UnknownStyle("neon".into()).into();
        assert!(matches!(err, Error::Config(ConfigError::UnknownStyle(_))));
        assert_eq!(err.to_string(), "invalid style theme: unknown style: neon");
    }

    #[test]
    fn table_error_message_names_row() {
        let err = TableError::RaggedRow {
            row: 2,
            cells: 4,
            columns: 3,
        };
        assert_eq!(
            err.to_string(),
            "row 2 has 4 cells but the table has 3 columns"
        );
    }

    #[test]
    fn template_error_message_shows_placeholder() {
        let err = TemplateError::UnknownPlaceholder {
            name: "url".into(),
            format: "{{url}}".into(),
        };
        assert!(err.to_string().contains("{{url}}"));
    }
}
