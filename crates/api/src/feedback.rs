use tracing::warn;

use llm::{SamplingOptions, TextModel};

/// The three generated artifacts for one submitted review.
#[derive(Debug, Clone)]
pub struct Feedback {
    pub response: String,
    pub summary: String,
    pub actions: String,
}

/// Summary fallback when generation fails or comes back blank.
pub const FALLBACK_SUMMARY: &str = "Review provides customer feedback.";

/// Rating-keyed reply used verbatim when generation fails. Five entries,
/// one per star, no two alike.
pub fn fallback_response(rating: u8) -> &'static str {
    match rating {
        5 => "Thank you so much for the wonderful 5-star review! We're thrilled you had such a great experience with us. Your positive feedback truly motivates our team!",
        4 => "Thank you for your 4-star review! We're glad you enjoyed your experience. We'd love to hear what could make it even better!",
        2 => "Thank you for letting us know about your experience. We're sorry it wasn't quite what you expected. We'd like to make it right!",
        1 => "We sincerely apologize that your experience fell short of expectations. Your feedback is important, and we'd like the opportunity to improve.",
        _ => "Thank you for your feedback. We appreciate you taking the time to share. We're always working to improve our service!",
    }
}

/// Rating-banded action list used when generation fails.
pub fn fallback_actions(rating: u8) -> &'static str {
    if rating >= 4 {
        "1. Share this feedback with the team to reinforce best practices. 2. Feature this positive review in marketing."
    } else if rating == 3 {
        "1. Identify specific pain points mentioned. 2. Create improvement plan and track progress."
    } else {
        "1. Contact customer immediately to resolve issues. 2. Implement corrective actions and follow up."
    }
}

/// Generate reply, summary and recommended actions in one concurrent
/// fan-out. Each call owns its fallback; a failure never cancels or taints
/// its siblings, so a record always carries all three texts.
pub async fn generate_feedback<M: TextModel>(model: &M, review: &str, rating: u8) -> Feedback {
    let (response, summary, actions) = tokio::join!(
        generate_response(model, review, rating),
        generate_summary(model, review),
        generate_actions(model, review, rating),
    );

    Feedback {
        response,
        summary,
        actions,
    }
}

async fn generate_response<M: TextModel>(model: &M, review: &str, rating: u8) -> String {
    let prompt = format!(
        r#"You are a professional and empathetic customer service representative responding to a review.

Customer Rating: {rating}/5 stars
Customer Review: {review}

Write a brief, warm, and professional response that:
- Acknowledges their specific feedback
- If positive: Thanks them and highlights what you appreciated
- If negative: Apologizes, addresses their concerns, and offers to improve
- Maximum 2-3 sentences (under 150 words)

Response:"#
    );

    let opts = SamplingOptions {
        temperature: 0.7,
        max_tokens: 200,
    };
    resolve(
        model.generate(&prompt, &opts).await,
        fallback_response(rating),
        "response",
    )
}

async fn generate_summary<M: TextModel>(model: &M, review: &str) -> String {
    let prompt = format!(
        r#"Extract the key points from this customer review in 1-2 concise sentences (max 50 words).
Focus on specific issues, praise, or problems mentioned.

Review: "{review}"

Summary (be specific, not generic):"#
    );

    let opts = SamplingOptions {
        temperature: 0.3,
        max_tokens: 100,
    };
    resolve(
        model.generate(&prompt, &opts).await,
        FALLBACK_SUMMARY,
        "summary",
    )
}

async fn generate_actions<M: TextModel>(model: &M, review: &str, rating: u8) -> String {
    let prompt = format!(
        r#"Based on this customer feedback, suggest 1-2 specific, concrete business actions.

Rating: {rating}/5 stars
Review: "{review}"

For POSITIVE feedback: How to leverage or reinforce this?
For NEGATIVE feedback: What specific issues need addressing?

Provide 2 actionable items (max 60 words):

Actions:"#
    );

    let opts = SamplingOptions {
        temperature: 0.6,
        max_tokens: 150,
    };
    resolve(
        model.generate(&prompt, &opts).await,
        fallback_actions(rating),
        "actions",
    )
}

/// Resolve a generation result against its fallback: errors and blank text
/// both yield the fallback, so an outage never reaches the end user.
fn resolve(result: anyhow::Result<String>, fallback: &str, artifact: &str) -> String {
    match result {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) => {
            warn!(artifact, "model returned blank text, using fallback");
            fallback.to_string()
        }
        Err(err) => {
            warn!(artifact, error = %err, "model call failed, using fallback");
            fallback.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashSet;

    use llm::{MockLlm, MockReply};

    #[test]
    fn reply_fallbacks_are_distinct_per_rating() {
        let replies: Vec<&str> = (1..=5).map(fallback_response).collect();
        let unique: HashSet<&str> = replies.iter().copied().collect();
        assert_eq!(unique.len(), 5);
        assert!(replies[4].contains("5-star"));
        assert!(replies[0].contains("apologize"));
    }

    #[tokio::test]
    async fn all_failures_fall_back_everywhere() {
        let mock = MockLlm::new().on_prompt_containing("", MockReply::Fail);

        let feedback = generate_feedback(&mock, "Cold food.", 1).await;
        assert_eq!(feedback.response, fallback_response(1));
        assert_eq!(feedback.summary, FALLBACK_SUMMARY);
        assert_eq!(feedback.actions, fallback_actions(1));
    }

    #[tokio::test]
    async fn one_failed_call_leaves_siblings_untouched() {
        let mock = MockLlm::new()
            .on_prompt_containing("customer service representative", MockReply::Text(
                "Thanks for the kind words!".to_string(),
            ))
            .on_prompt_containing("key points", MockReply::Fail)
            .on_prompt_containing("business actions", MockReply::Text(
                "1. Keep doing the thing.".to_string(),
            ));

        let feedback = generate_feedback(&mock, "Lovely evening, will return.", 5).await;
        assert_eq!(feedback.response, "Thanks for the kind words!");
        assert_eq!(feedback.summary, FALLBACK_SUMMARY);
        assert_eq!(feedback.actions, "1. Keep doing the thing.");
    }

    #[tokio::test]
    async fn blank_text_counts_as_a_failure() {
        let mock = MockLlm::new().on_prompt_containing("", MockReply::Text("   \n".to_string()));

        let feedback = generate_feedback(&mock, "Fine.", 3).await;
        assert_eq!(feedback.response, fallback_response(3));
        assert_eq!(feedback.summary, FALLBACK_SUMMARY);
        assert_eq!(feedback.actions, fallback_actions(3));
    }

    #[tokio::test]
    async fn generated_text_is_trimmed() {
        let mock =
            MockLlm::new().on_prompt_containing("", MockReply::Text("  solid reply  ".to_string()));

        let feedback = generate_feedback(&mock, "Nice.", 4).await;
        assert_eq!(feedback.response, "solid reply");
    }

    #[test]
    fn action_fallbacks_cover_all_bands() {
        assert!(fallback_actions(5).contains("marketing"));
        assert!(fallback_actions(4).contains("marketing"));
        assert!(fallback_actions(3).contains("improvement plan"));
        assert!(fallback_actions(2).contains("Contact customer"));
        assert!(fallback_actions(1).contains("Contact customer"));
    }
}
