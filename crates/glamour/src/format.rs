//! Element format strings.
//!
//! A format is literal text with an optional `{{text}}` placeholder
//! (`{{.text}}` is accepted as well). Formats are compiled once when the
//! renderer is built; a malformed one makes its element fall back to the
//! raw token.

use std::collections::HashMap;

use crate::error::TemplateError;
use crate::style::StyleConfig;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Text,
}

/// A compiled format string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatTemplate {
    segments: Vec<Segment>,
}

impl FormatTemplate {
    /// Compiles a format string.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Unclosed`] for a `{{` without `}}` and
    /// [`TemplateError::UnknownPlaceholder`] for any name but `text`.
    pub fn compile(format: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut rest = format;
        while let Some(open) = rest.find("{{") {
            if open > 0 {
                segments.push(Segment::Literal(rest[..open].to_string()));
            }
            let after = &rest[open + 2..];
            let close = after
                .find("}}")
                .ok_or_else(|| TemplateError::Unclosed(format.to_string()))?;
            let name = after[..close].trim();
            match name.strip_prefix('.').unwrap_or(name) {
                "text" => segments.push(Segment::Text),
                _ => {
                    return Err(TemplateError::UnknownPlaceholder {
                        name: name.to_string(),
                        format: format.to_string(),
                    });
                }
            }
            rest = &after[close + 2..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest.to_string()));
        }
        Ok(Self { segments })
    }

    /// Substitutes `text` into the template.
    #[must_use]
    pub fn apply(&self, text: &str) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(lit) => out.push_str(lit),
                Segment::Text => out.push_str(text),
            }
        }
        out
    }
}

/// Compiled formats for every element of a theme that declares one.
#[derive(Debug, Clone, Default)]
pub struct FormatTable {
    templates: HashMap<&'static str, Result<FormatTemplate, TemplateError>>,
}

impl FormatTable {
    /// Compiles every non-empty format in `config`.
    #[must_use]
    pub fn compile(config: &StyleConfig) -> Self {
        let templates = config
            .primitives()
            .into_iter()
            .filter(|(_, style)| !style.format.is_empty())
            .map(|(element, style)| (element, FormatTemplate::compile(&style.format)))
            .collect();
        Self { templates }
    }

    /// Formats `token` for `element`.
    ///
    /// Elements without a format, or with a malformed one, get the token
    /// back unchanged.
    #[must_use]
    pub fn apply(&self, element: &str, token: &str) -> String {
        match self.templates.get(element) {
            Some(Ok(template)) => template.apply(token),
            _ => token.to_string(),
        }
    }

    /// Malformed formats, by element name.
    pub fn errors(&self) -> impl Iterator<Item = (&'static str, &TemplateError)> {
        self.templates
            .iter()
            .filter_map(|(element, result)| result.as_ref().err().map(|e| (*element, e)))
    }
}
