use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::review::Review;

/// Fixed sampling seed so every prompt variant scores the same reviews.
pub const DEFAULT_SEED: u64 = 42;

/// Select `sample_size` reviews without replacement, clamped to the dataset
/// size. The same dataset, size and seed always produce the same sample in
/// the same order, which is what makes approach comparisons fair.
pub fn sample_reviews(reviews: &[Review], sample_size: usize, seed: u64) -> Vec<Review> {
    let mut rng = StdRng::seed_from_u64(seed);
    let amount = sample_size.min(reviews.len());
    reviews.choose_multiple(&mut rng, amount).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered_reviews(count: usize) -> Vec<Review> {
        (0..count)
            .map(|i| Review {
                text: format!("review {i}"),
                stars: (i % 5 + 1) as u8,
            })
            .collect()
    }

    #[test]
    fn same_seed_gives_identical_sample_order() {
        let reviews = numbered_reviews(100);
        let first = sample_reviews(&reviews, 20, DEFAULT_SEED);
        let second = sample_reviews(&reviews, 20, DEFAULT_SEED);

        let first_texts: Vec<_> = first.iter().map(|r| r.text.as_str()).collect();
        let second_texts: Vec<_> = second.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(first_texts, second_texts);
    }

    #[test]
    fn different_seeds_differ() {
        let reviews = numbered_reviews(100);
        let first = sample_reviews(&reviews, 20, 1);
        let second = sample_reviews(&reviews, 20, 2);

        let first_texts: Vec<_> = first.iter().map(|r| r.text.as_str()).collect();
        let second_texts: Vec<_> = second.iter().map(|r| r.text.as_str()).collect();
        assert_ne!(first_texts, second_texts);
    }

    #[test]
    fn sample_size_clamps_to_dataset() {
        let reviews = numbered_reviews(7);
        assert_eq!(sample_reviews(&reviews, 200, DEFAULT_SEED).len(), 7);
    }
}
