use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use dataset::{sample_reviews, Review, DEFAULT_SEED};
use extract::parse_prediction;
use llm::{SamplingOptions, TextModel};

use crate::prompt::render;

#[derive(Debug, Clone)]
pub struct HarnessOptions {
    pub sample_size: usize,
    pub seed: u64,
    /// Courtesy pause between items so hosted backends are not hammered.
    /// Zero in tests.
    pub delay: Duration,
}

impl Default for HarnessOptions {
    fn default() -> Self {
        Self {
            sample_size: 200,
            seed: DEFAULT_SEED,
            delay: Duration::from_millis(300),
        }
    }
}

/// One successfully parsed prediction, kept for the detailed audit trail.
/// Failed parses count only toward `total_tested` and leave no record here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub actual: u8,
    pub predicted: u8,
    pub explanation: String,
    pub correct: bool,
    pub review_snippet: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApproachResult {
    pub approach: String,
    pub total_tested: usize,
    pub valid_json_count: usize,
    pub correct_predictions: usize,
    pub predictions: Vec<PredictionRecord>,
    pub json_validity_rate: f64,
    pub accuracy: f64,
}

/// Run one prompt variant over a deterministic sample of the dataset.
///
/// Strictly sequential: one model call in flight at a time, sample order
/// preserved in `predictions`. A failed model call becomes an empty
/// response, which the parser rejects like any other garbage; nothing
/// aborts the run.
pub async fn run_approach<M: TextModel>(
    model: &M,
    reviews: &[Review],
    template: &str,
    approach: &str,
    options: &HarnessOptions,
) -> ApproachResult {
    let sample = sample_reviews(reviews, options.sample_size, options.seed);
    let opts = SamplingOptions::default();

    info!(approach, sample = sample.len(), "starting evaluation run");

    let mut valid_json_count = 0;
    let mut correct_predictions = 0;
    let mut predictions = Vec::new();

    for (idx, review) in sample.iter().enumerate() {
        let prompt = render(template, &review.text);
        let response = model.call(&prompt, &opts).await;

        if idx == 0 {
            let preview: String = response.chars().take(200).collect();
            debug!(approach, %preview, "first raw model response");
        }

        if let Some(prediction) = parse_prediction(&response) {
            valid_json_count += 1;

            let correct = prediction.predicted_stars == review.stars;
            if correct {
                correct_predictions += 1;
            }

            let snippet: String = review.text.chars().take(100).collect();
            predictions.push(PredictionRecord {
                actual: review.stars,
                predicted: prediction.predicted_stars,
                explanation: prediction.explanation,
                correct,
                review_snippet: format!("{snippet}..."),
            });
        }

        if (idx + 1) % 20 == 0 {
            info!(approach, processed = idx + 1, total = sample.len(), "progress");
        }

        if !options.delay.is_zero() {
            tokio::time::sleep(options.delay).await;
        }
    }

    let total_tested = sample.len();
    let json_validity_rate = if total_tested > 0 {
        valid_json_count as f64 / total_tested as f64 * 100.0
    } else {
        0.0
    };
    let accuracy = if valid_json_count > 0 {
        correct_predictions as f64 / valid_json_count as f64 * 100.0
    } else {
        0.0
    };

    info!(
        approach,
        json_validity_rate, accuracy, "evaluation run complete"
    );

    ApproachResult {
        approach: approach.to_string(),
        total_tested,
        valid_json_count,
        correct_predictions,
        predictions,
        json_validity_rate,
        accuracy,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use dataset::sample_data;
    use llm::{MockLlm, MockReply};

    use crate::prompt::PROMPT_DIRECT;

    fn fast_options(sample_size: usize) -> HarnessOptions {
        HarnessOptions {
            sample_size,
            seed: DEFAULT_SEED,
            delay: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn identical_runs_are_identical() {
        let reviews = sample_data();
        let mock = MockLlm::always(r#"{"predicted_stars": 4, "explanation": "solid"}"#);
        let options = fast_options(30);

        let first = run_approach(&mock, &reviews, PROMPT_DIRECT, "direct", &options).await;
        let second = run_approach(&mock, &reviews, PROMPT_DIRECT, "direct", &options).await;

        assert_eq!(first.total_tested, second.total_tested);
        assert_eq!(first.valid_json_count, second.valid_json_count);
        assert_eq!(first.correct_predictions, second.correct_predictions);

        let first_snippets: Vec<_> = first
            .predictions
            .iter()
            .map(|p| p.review_snippet.as_str())
            .collect();
        let second_snippets: Vec<_> = second
            .predictions
            .iter()
            .map(|p| p.review_snippet.as_str())
            .collect();
        assert_eq!(first_snippets, second_snippets);
    }

    #[tokio::test]
    async fn counters_respect_their_invariants() {
        let reviews = sample_data();
        let mock = MockLlm::new();
        // A mix of parseable, garbage and failed calls.
        for i in 0..10 {
            match i % 3 {
                0 => mock.push(MockReply::Text(
                    r#"{"predicted_stars": 3, "explanation": "ok"}"#.to_string(),
                )),
                1 => mock.push(MockReply::Text("no json here".to_string())),
                _ => mock.push(MockReply::Fail),
            }
        }

        let result = run_approach(&mock, &reviews, PROMPT_DIRECT, "mixed", &fast_options(10)).await;

        assert_eq!(result.total_tested, 10);
        assert!(result.valid_json_count <= result.total_tested);
        assert!(result.correct_predictions <= result.valid_json_count);
        assert_eq!(result.predictions.len(), result.valid_json_count);
    }

    #[tokio::test]
    async fn all_failures_score_zero_accuracy() {
        let reviews = sample_data();
        let mock = MockLlm::always("definitely not a rating");

        let result =
            run_approach(&mock, &reviews, PROMPT_DIRECT, "hopeless", &fast_options(15)).await;

        assert_eq!(result.valid_json_count, 0);
        assert_eq!(result.accuracy, 0.0);
        assert_eq!(result.json_validity_rate, 0.0);
        assert!(result.predictions.is_empty());
    }

    #[tokio::test]
    async fn sample_size_clamps_to_dataset() {
        let reviews: Vec<Review> = sample_data().into_iter().take(5).collect();
        let mock = MockLlm::always(r#"{"predicted_stars": 5, "explanation": "yes"}"#);

        let result =
            run_approach(&mock, &reviews, PROMPT_DIRECT, "clamped", &fast_options(200)).await;

        assert_eq!(result.total_tested, 5);
    }

    #[tokio::test]
    async fn correct_predictions_match_actual_stars() {
        // Every review in the dataset rated 5; the mock always answers 5.
        let reviews: Vec<Review> = (0..8)
            .map(|i| Review {
                text: format!("glowing review {i}"),
                stars: 5,
            })
            .collect();
        let mock = MockLlm::always(r#"{"predicted_stars": 5, "explanation": "glowing"}"#);

        let result =
            run_approach(&mock, &reviews, PROMPT_DIRECT, "aligned", &fast_options(8)).await;

        assert_eq!(result.correct_predictions, 8);
        assert_eq!(result.accuracy, 100.0);
        assert_eq!(result.json_validity_rate, 100.0);
    }
}
