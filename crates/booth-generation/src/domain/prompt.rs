//! Prompt templates and the style attribute substituted into them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The placeholder every template must contain exactly once.
pub const SUBJECT_PLACEHOLDER: &str = "{subject}";

/// Invalid prompt template or attribute.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromptError {
    /// The template does not contain exactly one placeholder.
    #[error("prompt template must contain {{subject}} exactly once, found {found}")]
    Placeholder {
        /// Number of placeholders found.
        found: usize,
    },

    /// The attribute label is not recognized.
    #[error("unknown style attribute {0:?}; expected \"male\" or \"female\"")]
    UnknownAttribute(String),
}

/// Binary gender-style attribute chosen on the biographical entry screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleAttribute {
    /// Rendered as "man".
    Male,
    /// Rendered as "woman".
    Female,
}

impl StyleAttribute {
    /// The noun substituted for the placeholder.
    #[must_use]
    pub fn subject_noun(self) -> &'static str {
        match self {
            Self::Male => "man",
            Self::Female => "woman",
        }
    }
}

impl fmt::Display for StyleAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Male => f.write_str("male"),
            Self::Female => f.write_str("female"),
        }
    }
}

impl FromStr for StyleAttribute {
    type Err = PromptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            _ => Err(PromptError::UnknownAttribute(s.to_owned())),
        }
    }
}

/// A prompt with a single `{subject}` placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PromptTemplate(String);

impl PromptTemplate {
    /// Validates and wraps a template.
    ///
    /// # Errors
    ///
    /// Returns `PromptError::Placeholder` unless the placeholder occurs
    /// exactly once.
    pub fn new(template: impl Into<String>) -> Result<Self, PromptError> {
        let template = template.into();
        let found = template.matches(SUBJECT_PLACEHOLDER).count();
        if found != 1 {
            return Err(PromptError::Placeholder { found });
        }
        Ok(Self(template))
    }

    /// Wraps one of the compiled-in templates.
    pub(crate) fn built_in(template: String) -> Self {
        debug_assert_eq!(template.matches(SUBJECT_PLACEHOLDER).count(), 1);
        Self(template)
    }

    /// Produces the concrete prompt for one submission.
    #[must_use]
    pub fn resolve(&self, attribute: StyleAttribute) -> String {
        self.0
            .replacen(SUBJECT_PLACEHOLDER, attribute.subject_noun(), 1)
    }

    /// The raw template text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PromptTemplate {
    type Error = PromptError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PromptTemplate> for String {
    fn from(template: PromptTemplate) -> Self {
        template.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_substitutes_subject_noun() {
        let template = PromptTemplate::new("a portrait of a {subject} in uniform").unwrap();

        assert_eq!(
            template.resolve(StyleAttribute::Male),
            "a portrait of a man in uniform"
        );
        assert_eq!(
            template.resolve(StyleAttribute::Female),
            "a portrait of a woman in uniform"
        );
    }

    #[test]
    fn test_template_without_placeholder_is_rejected() {
        assert_eq!(
            PromptTemplate::new("a portrait in uniform"),
            Err(PromptError::Placeholder { found: 0 })
        );
    }

    #[test]
    fn test_template_with_two_placeholders_is_rejected() {
        assert_eq!(
            PromptTemplate::new("{subject} and {subject}"),
            Err(PromptError::Placeholder { found: 2 })
        );
    }

    #[test]
    fn test_attribute_parses_case_insensitively() {
        assert_eq!("Male".parse::<StyleAttribute>(), Ok(StyleAttribute::Male));
        assert_eq!(" female ".parse::<StyleAttribute>(), Ok(StyleAttribute::Female));
        assert!("other".parse::<StyleAttribute>().is_err());
    }
}
