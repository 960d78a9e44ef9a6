use std::path::Path;

use anyhow::{Context, Result};
use tracing::warn;

use crate::review::Review;

/// Load a review dataset from a JSON array or JSONL file.
///
/// Records with a rating outside 1..=5 are dropped with a warning rather
/// than failing the whole load.
pub fn load_reviews(path: &Path) -> Result<Vec<Review>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read dataset file {}", path.display()))?;

    let jsonl = path.extension().and_then(|ext| ext.to_str()) == Some("jsonl");
    parse_reviews(&content, jsonl)
}

fn parse_reviews(content: &str, jsonl: bool) -> Result<Vec<Review>> {
    let reviews: Vec<Review> = if jsonl {
        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).context("invalid JSONL review record"))
            .collect::<Result<_>>()?
    } else {
        serde_json::from_str(content).context("invalid JSON review dataset")?
    };

    let total = reviews.len();
    let reviews: Vec<Review> = reviews
        .into_iter()
        .filter(|review| (1..=5).contains(&review.stars))
        .collect();

    if reviews.len() < total {
        warn!(
            dropped = total - reviews.len(),
            "dropped reviews with out-of-range star ratings"
        );
    }

    Ok(reviews)
}

/// Small built-in dataset for smoke-testing the harness without an external
/// file.
pub fn sample_data() -> Vec<Review> {
    let seed_reviews = [
        (
            "Amazing place! Food was delicious and service was excellent. Highly recommend!",
            5,
        ),
        ("Good food but a bit pricey. Service was slow.", 3),
        ("Terrible experience. Food was cold and staff was rude.", 1),
        ("Really great restaurant. Everything was perfect.", 5),
        ("It was okay. Nothing special but not bad either.", 3),
        ("Disappointing. Expected much better quality.", 2),
        ("Fantastic! Best meal I've had in months.", 5),
        ("Not great. Waited too long and food wasn't fresh.", 2),
        (
            "Excellent service and amazing food. Will visit again!",
            5,
        ),
        (
            "Average restaurant. Some good dishes, some not so good.",
            3,
        ),
    ];

    seed_reviews
        .iter()
        .cycle()
        .take(seed_reviews.len() * 20)
        .map(|(text, stars)| Review {
            text: (*text).to_string(),
            stars: *stars,
        })
        .collect()
}
