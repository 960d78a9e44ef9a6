pub mod parser;
pub mod schema;

pub use parser::parse_prediction;
pub use schema::Prediction;
