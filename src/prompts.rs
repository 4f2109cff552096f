//! Prompt templates for document summarisation.
//!
//! Each template contains exactly one [`CONTEXT_PLACEHOLDER`]; the full
//! extracted document is substituted there and the result is sent to the
//! model as a single user message. Callers choose among the built-in styles
//! through [`crate::config::SummaryType`], or pass their own template to
//! [`crate::pipeline::summarize::build_summarizer`].

use crate::config::SummaryType;
use crate::error::SummarizeError;

/// The substitution marker every template must contain once.
pub const CONTEXT_PLACEHOLDER: &str = "{context}";

/// Used when a caller supplies no template at all.
pub const DEFAULT_PROMPT: &str = "Write a concise summary of the following: {context}";

/// Short prose summary.
pub const CONCISE_PROMPT: &str = r#"Write a concise summary of the following document.
Capture the main question it addresses, the approach it takes, and its key findings.
Keep the summary to a single short paragraph.

"{context}"

CONCISE SUMMARY:"#;

/// Concise summary forced into bullet form.
pub const BULLET_POINT_PROMPT: &str = r#"Write a concise summary of the following document.
Return the summary ONLY as a list of bullet points, one idea per bullet, each starting with "- ".
Do not add an introduction or a conclusion outside the list.

"{context}"

BULLET POINT SUMMARY:"#;

/// Longer prose summary.
pub const DETAILED_PROMPT: &str = r#"Write a detailed summary of the following document.
Cover its motivation, methods, results and conclusions in several paragraphs,
and mention any important limitations the authors acknowledge.

"{context}"

DETAILED SUMMARY:"#;

/// Built-in template for a summary style.
pub fn prompt_for(kind: SummaryType) -> &'static str {
    match kind {
        SummaryType::Concise => CONCISE_PROMPT,
        SummaryType::BulletPoint => BULLET_POINT_PROMPT,
        SummaryType::Detailed => DETAILED_PROMPT,
    }
}

/// Reject templates that do not contain exactly one placeholder.
pub fn validate_template(template: &str) -> Result<(), SummarizeError> {
    match template.matches(CONTEXT_PLACEHOLDER).count() {
        1 => Ok(()),
        found => Err(SummarizeError::InvalidPrompt { found }),
    }
}

/// Substitute `context` into a validated template.
pub fn render_prompt(template: &str, context: &str) -> String {
    template.replacen(CONTEXT_PLACEHOLDER, context, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn built_in_templates_are_valid() {
        validate_template(DEFAULT_PROMPT).unwrap();
        for kind in SummaryType::ALL {
            validate_template(prompt_for(kind)).unwrap();
        }
    }

    #[test]
    fn bullet_prompt_asks_for_bullets() {
        assert!(prompt_for(SummaryType::BulletPoint).contains("bullet"));
        assert_ne!(prompt_for(SummaryType::Concise), prompt_for(SummaryType::Detailed));
    }

    #[test]
    fn template_without_placeholder_is_rejected() {
        let err = validate_template("Summarise this").unwrap_err();
        assert!(matches!(err, SummarizeError::InvalidPrompt { found: 0 }));
    }

    #[test]
    fn template_with_two_placeholders_is_rejected() {
        let err = validate_template("{context} and again {context}").unwrap_err();
        assert!(matches!(err, SummarizeError::InvalidPrompt { found: 2 }));
    }

    #[test]
    fn render_substitutes_once() {
        let out = render_prompt("Summary of: {context}!", "a {context} b");
        assert_eq!(out, "Summary of: a {context} b!");
    }
}
