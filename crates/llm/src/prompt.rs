//! Prompt construction
//!
//! Builds the single-turn grounded prompt sent to the answer model.

use std::fmt;

/// Web-grounded question prompt
#[derive(Debug, Clone, PartialEq)]
pub struct GroundedPrompt {
    context: Vec<String>,
    question: String,
}

impl GroundedPrompt {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            context: Vec::new(),
            question: question.into(),
        }
    }

    /// Append context passages, nearest first
    #[must_use]
    pub fn with_context<I, S>(mut self, passages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.context.extend(passages.into_iter().map(Into::into));
        self
    }

    pub fn context(&self) -> &[String] {
        &self.context
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn build(&self) -> String {
        format!(
            "Using this web context: {}\n\nAnswer the question: {}",
            self.context.join(" "),
            self.question
        )
    }
}

impl fmt::Display for GroundedPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_layout() {
        let prompt = GroundedPrompt::new("Who built the Brihadeeswarar temple?")
            .with_context(["Raja Raja Chola I built it.", "Completed in 1010 CE."]);

        assert_eq!(
            prompt.build(),
            "Using this web context: Raja Raja Chola I built it. Completed in 1010 CE.\n\n\
             Answer the question: Who built the Brihadeeswarar temple?"
        );
    }

    #[test]
    fn test_context_order_preserved() {
        let prompt = GroundedPrompt::new("q").with_context(vec!["second".to_string()]).with_context(["first"]);
        assert_eq!(prompt.context(), ["second", "first"]);
        assert!(prompt.to_string().starts_with("Using this web context: second first"));
    }

    #[test]
    fn test_empty_context() {
        let prompt = GroundedPrompt::new("q");
        assert_eq!(prompt.build(), "Using this web context: \n\nAnswer the question: q");
    }
}
