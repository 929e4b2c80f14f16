use std::sync::{Arc, Mutex};

use post_forge::{Error, SummaryModel};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkCall {
    pub chunk: String,
    pub min_length: u32,
    pub max_length: u32,
}

/// Answers every chunk with `summary-<n>`, `n` being the call index
#[derive(Clone, Default)]
pub struct MockSummaryModel {
    pub calls: Arc<Mutex<Vec<ChunkCall>>>,
    pub fail_on_call: Option<usize>,
}

impl MockSummaryModel {
    pub fn failing_on(call_idx: usize) -> Self {
        Self {
            fail_on_call: Some(call_idx),
            ..Default::default()
        }
    }
}

impl SummaryModel for MockSummaryModel {
    const SUMMARIZER_MODEL: &'static str = "mock-bart";

    async fn summarize_chunk(
        &self,
        chunk: &str,
        min_length: u32,
        max_length: u32,
    ) -> post_forge::Result<String> {
        let call_idx = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(ChunkCall {
                chunk: chunk.to_string(),
                min_length,
                max_length,
            });
            calls.len() - 1
        };

        if self.fail_on_call == Some(call_idx) {
            return Err(Error::service(Some(503), "Model is currently loading"));
        }
        Ok(format!("summary-{call_idx}"))
    }
}
