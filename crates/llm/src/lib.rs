pub mod client;
pub mod config;
pub mod mock;

pub use client::{LlmClient, TextModel};
pub use config::{Backend, LlmConfig, SamplingOptions};
pub use mock::{MockLlm, MockReply};
