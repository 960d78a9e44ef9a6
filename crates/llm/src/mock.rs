use std::collections::VecDeque;
use std::sync::Mutex;

use anyhow::Result;

use crate::client::TextModel;
use crate::config::SamplingOptions;

/// Scripted outcome for a single [`MockLlm`] call.
#[derive(Debug, Clone)]
pub enum MockReply {
    Text(String),
    Fail,
}

/// Test double for [`TextModel`].
///
/// Marker rules answer any prompt containing their substring; everything
/// else drains a FIFO queue. An exhausted queue is an error, which callers
/// treat like any other failed call.
#[derive(Default)]
pub struct MockLlm {
    rules: Vec<(String, MockReply)>,
    queue: Mutex<VecDeque<MockReply>>,
}

impl MockLlm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every prompt with the same text.
    pub fn always(text: &str) -> Self {
        Self::new().on_prompt_containing("", MockReply::Text(text.to_string()))
    }

    /// Answer any prompt containing `marker` with `reply`.
    pub fn on_prompt_containing(mut self, marker: &str, reply: MockReply) -> Self {
        self.rules.push((marker.to_string(), reply));
        self
    }

    pub fn push(&self, reply: MockReply) {
        self.queue.lock().unwrap().push_back(reply);
    }
}

impl TextModel for MockLlm {
    async fn generate(&self, prompt: &str, _opts: &SamplingOptions) -> Result<String> {
        let reply = self
            .rules
            .iter()
            .find(|(marker, _)| prompt.contains(marker.as_str()))
            .map(|(_, reply)| reply.clone())
            .or_else(|| self.queue.lock().unwrap().pop_front());

        match reply {
            Some(MockReply::Text(text)) => Ok(text),
            Some(MockReply::Fail) => anyhow::bail!("mock backend failure"),
            None => anyhow::bail!("no scripted reply left"),
        }
    }
}
