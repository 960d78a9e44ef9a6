pub mod loader;
pub mod review;
pub mod sample;

pub use loader::{load_reviews, sample_data};
pub use review::{star_distribution, Review};
pub use sample::{sample_reviews, DEFAULT_SEED};
