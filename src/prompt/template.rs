//! Segment-based prompt template
//!
//! Supports `{name}` placeholders. Values substituted at render time, as well as
//! labels baked in with [`Template::partial`], are literal text and never
//! re-scanned for placeholders.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Regex to match `{name}` placeholders
static VARIABLE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern is valid")
});

/// Template processing errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PromptError {
    /// A placeholder had no value at render time
    #[error("Missing required variable: {name}")]
    MissingVariable {
        /// Placeholder name
        name: String,
    },
}

/// A piece of a parsed template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Text copied as is
    Literal(String),
    /// A `{name}` placeholder
    Variable(String),
}

/// A parsed prompt template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    segments: Vec<Segment>,
}

impl Template {
    /// Parse a template string into literal and variable segments
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let mut segments = Vec::new();
        let mut last = 0;

        for cap in VARIABLE_PATTERN.captures_iter(content) {
            let (Some(whole), Some(name)) = (cap.get(0), cap.get(1)) else {
                continue;
            };
            if whole.start() > last {
                segments.push(Segment::Literal(content[last..whole.start()].to_string()));
            }
            segments.push(Segment::Variable(name.as_str().to_string()));
            last = whole.end();
        }
        if last < content.len() {
            segments.push(Segment::Literal(content[last..].to_string()));
        }

        Self { segments }
    }

    /// Parsed segments in template order
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Names of the open variables, in order of first appearance
    #[must_use]
    pub fn variables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for segment in &self.segments {
            if let Segment::Variable(name) = segment {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Bake some variables in as literal text, leaving the rest open
    #[must_use]
    pub fn partial(&self, values: &[(&str, &str)]) -> Self {
        let segments = self
            .segments
            .iter()
            .map(|segment| match segment {
                Segment::Variable(name) => values
                    .iter()
                    .find(|(key, _)| *key == name.as_str())
                    .map_or_else(|| segment.clone(), |(_, v)| Segment::Literal((*v).to_string())),
                Segment::Literal(_) => segment.clone(),
            })
            .collect();
        Self { segments }
    }

    /// Render the template with provided values
    pub fn render(&self, values: &HashMap<&str, &str>) -> Result<String, PromptError> {
        let mut result = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => result.push_str(text),
                Segment::Variable(name) => {
                    let value = values.get(name.as_str()).ok_or_else(|| {
                        PromptError::MissingVariable { name: name.clone() }
                    })?;
                    result.push_str(value);
                }
            }
        }
        Ok(result)
    }
}
