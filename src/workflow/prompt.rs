//! Prompt token substitution.
//!
//! Stage prompts are static templates carrying `{{goal}}`, `{{industry}}`,
//! and `{{audience}}` tokens; rendering is plain token replacement done once
//! at workflow build time. No LLM call happens here.

use regex::Regex;

/// Regex pattern for prompt template tokens.
const TOKEN_PATTERN: &str = r"\{\{(goal|industry|audience)\}\}";

/// Substitute the known tokens into a prompt template.
pub fn render_prompt(
    template: &str,
    goal: &str,
    industry: &str,
    audience: &str,
) -> String {
    let re = Regex::new(TOKEN_PATTERN).unwrap();
    re.replace_all(template, |caps: &regex::Captures| {
        match &caps[1] {
            "goal" => goal.to_string(),
            "industry" => industry.to_string(),
            _ => audience.to_string(),
        }
    })
    .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_all_tokens() {
        let rendered = render_prompt(
            "Promote {{goal}} to {{audience}} in the {{industry}} market.",
            "our launch",
            "fintech",
            "founders",
        );
        assert_eq!(rendered, "Promote our launch to founders in the fintech market.");
    }

    #[test]
    fn test_render_repeated_token() {
        let rendered = render_prompt("{{goal}} and again {{goal}}", "X", "i", "a");
        assert_eq!(rendered, "X and again X");
    }

    #[test]
    fn test_unknown_braces_left_untouched() {
        let rendered = render_prompt("keep {{budget}} as-is", "g", "i", "a");
        assert_eq!(rendered, "keep {{budget}} as-is");
    }
}
