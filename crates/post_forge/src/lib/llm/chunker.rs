use crate::{
    error::{Error, Result},
    llm::summarizer::{SummaryModel, Summarizer},
    types::{SummarizationRequest, SummarizationResult},
};

/// Largest slice of text, in characters, sent to the summarization model in one call
pub const MAX_CHUNK_CHARACTERS: usize = 3500;

/// Splits `text` into consecutive, non-overlapping slices of at most `max_chars` characters.
///
/// Every slice but the last holds exactly `max_chars` characters and joining the slices
/// reproduces `text`. Boundaries always fall on `char` boundaries. A zero `max_chars`
/// yields no slices.
pub fn split_chunks(text: &str, max_chars: usize) -> Vec<&str> {
    if max_chars == 0 {
        return Vec::new();
    }

    let mut chunks = Vec::new();
    let mut start = 0;
    let mut count = 0;

    for (idx, _) in text.char_indices() {
        if count == max_chars {
            chunks.push(&text[start..idx]);
            start = idx;
            count = 0;
        }
        count += 1;
    }

    if start < text.len() {
        chunks.push(&text[start..]);
    }

    chunks
}

/// Summarizes arbitrarily long text by summarizing fixed-size chunks one at a time.
///
/// Chunk `n + 1` is only dispatched after chunk `n` answered. The first failing chunk
/// fails the whole request; partial summaries are never returned.
#[derive(Debug, Clone)]
pub struct ChunkedSummarizer<M> {
    model: M,
    max_chunk_chars: usize,
}

impl<M: SummaryModel + Sync> ChunkedSummarizer<M> {
    pub fn new(model: M) -> Self {
        Self {
            model,
            max_chunk_chars: MAX_CHUNK_CHARACTERS,
        }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    #[cfg(test)]
    fn with_max_chunk_chars(mut self, max_chunk_chars: usize) -> Self {
        self.max_chunk_chars = max_chunk_chars;
        self
    }
}

impl<M: SummaryModel + Sync> Summarizer for ChunkedSummarizer<M> {
    #[tracing::instrument(
        skip_all,
        fields(
            model = M::SUMMARIZER_MODEL,
            text_len = request.text.len(),
            max_length = request.max_length,
        )
    )]
    async fn summarize(&self, request: &SummarizationRequest) -> Result<SummarizationResult> {
        if request.text.is_empty() {
            return Err(Error::invalid_input("text is required"));
        }
        if request.max_length == 0 {
            return Err(Error::invalid_input("max_length must be positive"));
        }

        let min_length = request.min_length();
        let max_length = request.max_length;
        let chunks = split_chunks(&request.text, self.max_chunk_chars);
        let total = chunks.len();
        tracing::info!(chunks = total, min_length, "Summarizing text");

        let mut summaries = Vec::with_capacity(total);
        for (idx, chunk) in chunks.into_iter().enumerate() {
            let summary = self
                .model
                .summarize_chunk(chunk, min_length, max_length)
                .await
                .inspect_err(|e| {
                    tracing::error!(error = %e, chunk = idx + 1, total, "Failed to summarize chunk")
                })?;

            tracing::debug!(chunk = idx + 1, total, "Summarized chunk");
            summaries.push(summary);
        }

        Ok(SummarizationResult {
            summary: summaries.join(" "),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[derive(Clone, Default)]
    struct RecordingModel {
        calls: Arc<Mutex<Vec<(String, u32, u32)>>>,
        fail_on_call: Option<usize>,
    }

    impl SummaryModel for RecordingModel {
        const SUMMARIZER_MODEL: &'static str = "recording";

        async fn summarize_chunk(&self, chunk: &str, min: u32, max: u32) -> Result<String> {
            let call_idx = {
                let mut calls = self.calls.lock().unwrap();
                calls.push((chunk.to_string(), min, max));
                calls.len() - 1
            };
            if self.fail_on_call == Some(call_idx) {
                return Err(Error::service(Some(503), "model is loading"));
            }
            Ok(format!("s{call_idx}"))
        }
    }

    #[test]
    fn test_split_reassembles_exactly() {
        let texts = [
            "",
            "a",
            "abc",
            "abcdefghij",
            "abcdefghijk",
            "héllo wörld ünïcödé ✓✓✓",
            "🦀🦀🦀🦀🦀🦀🦀",
        ];

        for text in texts {
            for size in [1, 2, 3, 4, 7, 10, 100] {
                let chunks = split_chunks(text, size);
                assert_eq!(chunks.concat(), text, "size {size} text {text:?}");

                let len = text.chars().count();
                assert_eq!(chunks.len(), len.div_ceil(size), "size {size} text {text:?}");

                if let Some((_last, rest)) = chunks.split_last() {
                    for chunk in rest {
                        assert_eq!(chunk.chars().count(), size);
                    }
                }
                assert!(chunks.iter().all(|c| !c.is_empty()));
            }
        }
    }

    #[test]
    fn test_split_zero_size_yields_nothing() {
        assert!(split_chunks("abc", 0).is_empty());
        assert!(split_chunks("", 0).is_empty());
    }

    #[test]
    fn test_split_default_chunk_size() {
        let text = "x".repeat(MAX_CHUNK_CHARACTERS * 2 + 17);
        let chunks = split_chunks(&text, MAX_CHUNK_CHARACTERS);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), MAX_CHUNK_CHARACTERS);
        assert_eq!(chunks[1].len(), MAX_CHUNK_CHARACTERS);
        assert_eq!(chunks[2].len(), 17);
    }

    #[tokio::test]
    async fn test_short_text_is_one_call_with_quarter_min_length() {
        let model = RecordingModel::default();
        let calls = model.calls.clone();
        let summarizer = ChunkedSummarizer::new(model);

        let text = "y".repeat(MAX_CHUNK_CHARACTERS);
        let result = summarizer
            .summarize(&SummarizationRequest::new(text.clone(), 150))
            .await
            .expect("should summarize");

        assert_eq!(result.summary, "s0");
        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0], (text, 37, 150));
    }

    #[tokio::test]
    async fn test_chunks_are_summarized_in_order_and_joined() {
        let model = RecordingModel::default();
        let calls = model.calls.clone();
        let summarizer = ChunkedSummarizer::new(model).with_max_chunk_chars(4);

        let result = summarizer
            .summarize(&SummarizationRequest::new("aaaabbbbcc", 100))
            .await
            .expect("should summarize");

        assert_eq!(result.summary, "s0 s1 s2");
        let sent: Vec<String> = calls.lock().unwrap().iter().map(|c| c.0.clone()).collect();
        assert_eq!(sent, vec!["aaaa", "bbbb", "cc"]);
    }

    #[tokio::test]
    async fn test_any_failing_chunk_fails_the_whole_request() {
        for failing in 0..3 {
            let model = RecordingModel {
                fail_on_call: Some(failing),
                ..Default::default()
            };
            let calls = model.calls.clone();
            let summarizer = ChunkedSummarizer::new(model).with_max_chunk_chars(4);

            let result = summarizer
                .summarize(&SummarizationRequest::new("aaaabbbbcc", 100))
                .await;

            assert!(
                matches!(result, Err(Error::ExternalService { status: Some(503), .. })),
                "chunk {failing} failure should fail the request"
            );
            // nothing after the failing chunk is dispatched
            assert_eq!(calls.lock().unwrap().len(), failing + 1);
        }
    }

    #[tokio::test]
    async fn test_empty_text_is_rejected_before_any_call() {
        let model = RecordingModel::default();
        let calls = model.calls.clone();
        let summarizer = ChunkedSummarizer::new(model);

        let result = summarizer
            .summarize(&SummarizationRequest::new("", 100))
            .await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));

        let result = summarizer
            .summarize(&SummarizationRequest::new("text", 0))
            .await;
        assert!(matches!(result, Err(Error::InvalidInput(_))));

        assert!(calls.lock().unwrap().is_empty());
    }
}
