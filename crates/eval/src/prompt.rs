/// Maximum review length fed into a prompt slot.
pub const REVIEW_CHAR_LIMIT: usize = 500;

pub const PROMPT_DIRECT: &str = r#"Analyze this review and return ONLY a JSON object with no markdown, no extra text.

Review: {review}

Return exactly this format:
{"predicted_stars": <number 1-5>, "explanation": "<one short sentence>"}"#;

pub const PROMPT_STRUCTURED: &str = r#"Analyze this review for sentiment and return ONLY JSON (no markdown, no extra text).

Rating scale:
1=Terrible (major complaints), 2=Poor (mostly negative), 3=Okay (mixed), 4=Good (mostly positive), 5=Excellent (outstanding)

Review: {review}

Return exactly:
{"predicted_stars": <1-5>, "explanation": "<one sentence why>"}"#;

pub const PROMPT_CHAIN_OF_THOUGHT: &str = r#"Analyze this review step by step.

Review: {review}

1. What positive aspects are mentioned? (food, service, value, etc.)
2. What negative aspects are mentioned?
3. Is the reviewer satisfied? Will they return?
4. Rate from 1-5 based on balance.

Return ONLY JSON (no markdown, no extra text):
{"predicted_stars": <1-5>, "explanation": "<one sentence>"}"#;

/// The three fixed prompt variants under comparison, in run order.
pub fn approaches() -> Vec<(&'static str, &'static str)> {
    vec![
        ("Approach 1: Direct Prompt", PROMPT_DIRECT),
        ("Approach 2: Structured with Guidelines", PROMPT_STRUCTURED),
        ("Approach 3: Chain of Thought", PROMPT_CHAIN_OF_THOUGHT),
    ]
}

/// Substitute the review text into a template's `{review}` slot, truncating
/// the review to [`REVIEW_CHAR_LIMIT`] characters first.
pub fn render(template: &str, review: &str) -> String {
    let truncated: String = review.chars().take(REVIEW_CHAR_LIMIT).collect();
    template.replace("{review}", &truncated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_substitutes_the_review_slot() {
        let prompt = render(PROMPT_DIRECT, "Great tacos");
        assert!(prompt.contains("Review: Great tacos"));
        assert!(!prompt.contains("{review}"));
    }

    #[test]
    fn render_truncates_long_reviews() {
        let review = "y".repeat(2000);
        let prompt = render(PROMPT_DIRECT, &review);
        assert!(prompt.contains(&"y".repeat(REVIEW_CHAR_LIMIT)));
        assert!(!prompt.contains(&"y".repeat(REVIEW_CHAR_LIMIT + 1)));
    }

    #[test]
    fn render_leaves_the_json_skeleton_intact() {
        let prompt = render(PROMPT_DIRECT, "ok");
        assert!(prompt.contains(r#"{"predicted_stars": <number 1-5>"#));
    }
}
