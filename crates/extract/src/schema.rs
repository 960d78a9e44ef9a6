use serde::{Deserialize, Serialize};

/// A validated star-rating prediction recovered from raw model output.
///
/// `predicted_stars` is always in 1..=5; an out-of-range rating fails the
/// parse instead of being clamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub predicted_stars: u8,
    pub explanation: String,
}
