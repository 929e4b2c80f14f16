use std::future::Future;

use crate::{
    error::Result,
    types::{SummarizationRequest, SummarizationResult},
};

/// A single remote summarization call over text that fits the model's input window.
pub trait SummaryModel {
    const SUMMARIZER_MODEL: &'static str;

    fn summarize_chunk(
        &self,
        chunk: &str,
        min_length: u32,
        max_length: u32,
    ) -> impl Future<Output = Result<String>> + Send;
}

/// Summarizes text of any length.
pub trait Summarizer {
    fn summarize(
        &self,
        request: &SummarizationRequest,
    ) -> impl Future<Output = Result<SummarizationResult>> + Send;
}

impl<M: SummaryModel + Sync> SummaryModel for &M {
    const SUMMARIZER_MODEL: &'static str = M::SUMMARIZER_MODEL;

    async fn summarize_chunk(&self, chunk: &str, min_length: u32, max_length: u32) -> Result<String> {
        (**self).summarize_chunk(chunk, min_length, max_length).await
    }
}

impl<S: Summarizer + Sync> Summarizer for &S {
    async fn summarize(&self, request: &SummarizationRequest) -> Result<SummarizationResult> {
        (**self).summarize(request).await
    }
}
