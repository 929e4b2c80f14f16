pub mod builder;

use serde::Serialize;

use crate::{
    error::Error,
    llm::{image::ImageSynthesizer, summarizer::Summarizer},
    transcriber::Transcriber,
    types::{
        ImageRequest, ImageResult, SummarizationRequest, SummarizationResult, TranscriptionRequest,
        TranscriptionResult,
    },
};

/// Which operations a single pipeline invocation should run.
///
/// Transcription always runs; summarization and image synthesis are opt-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineRequest {
    pub video_reference: String,
    pub wants_improved_text: bool,
    /// Summarize the transcript down to this many tokens
    pub summary_max_length: Option<u32>,
    pub image_prompt: Option<String>,
}

impl PipelineRequest {
    pub fn new(video_reference: impl Into<String>) -> Self {
        Self {
            video_reference: video_reference.into(),
            wants_improved_text: false,
            summary_max_length: None,
            image_prompt: None,
        }
    }

    pub fn improve(mut self, wants_improved_text: bool) -> Self {
        self.wants_improved_text = wants_improved_text;
        self
    }

    pub fn summarize(mut self, max_length: u32) -> Self {
        self.summary_max_length = Some(max_length);
        self
    }

    pub fn image(mut self, prompt: impl Into<String>) -> Self {
        self.image_prompt = Some(prompt.into());
        self
    }
}

/// Per-operation envelope: the value, or the error message that explains its absence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Outcome<T> {
    Success(T),
    Failure { error: String },
}

impl<T> Outcome<T> {
    pub fn failure(error: impl ToString) -> Self {
        Outcome::Failure {
            error: error.to_string(),
        }
    }

    pub fn ok(&self) -> Option<&T> {
        match self {
            Outcome::Success(value) => Some(value),
            Outcome::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure { error } => Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }
}

impl<T> From<Result<T, Error>> for Outcome<T> {
    fn from(result: Result<T, Error>) -> Self {
        match result {
            Ok(value) => Outcome::Success(value),
            Err(e) => Outcome::failure(e),
        }
    }
}

/// Results of one pipeline invocation. Operations that were not requested are `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineReport {
    pub transcription: Outcome<TranscriptionResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summarization: Option<Outcome<SummarizationResult>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Outcome<ImageResult>>,
}

impl PipelineReport {
    /// True when every requested operation succeeded
    pub fn is_complete(&self) -> bool {
        self.transcription.is_success()
            && self.summarization.as_ref().map_or(true, Outcome::is_success)
            && self.image.as_ref().map_or(true, Outcome::is_success)
    }
}

/// Sequences transcription, summarization and image synthesis for one request.
///
/// Operations run strictly one after another and are never retried. A failing
/// operation does not stop the others from running; it is reported in its own
/// [`Outcome`] and the caller decides what to do with an incomplete report.
#[derive(Debug)]
pub struct PipelineProcessor<T, S, I>
where
    T: Transcriber + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
    I: ImageSynthesizer + Send + Sync + 'static,
{
    transcriber: T,
    summarizer: S,
    image_synthesizer: I,
    default_summary_max_length: u32,
}

impl<T, S, I> PipelineProcessor<T, S, I>
where
    T: Transcriber + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
    I: ImageSynthesizer + Send + Sync + 'static,
{
    pub fn transcriber(&self) -> &T {
        &self.transcriber
    }

    pub fn summarizer(&self) -> &S {
        &self.summarizer
    }

    pub fn image_synthesizer(&self) -> &I {
        &self.image_synthesizer
    }

    pub fn default_summary_max_length(&self) -> u32 {
        self.default_summary_max_length
    }

    #[tracing::instrument(skip(self))]
    pub async fn transcribe(
        &self,
        video_reference: &str,
        wants_improved_text: bool,
    ) -> Outcome<TranscriptionResult> {
        let request = TranscriptionRequest::new(video_reference, wants_improved_text);
        self.transcriber
            .transcribe(&request)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Transcription failed"))
            .into()
    }

    /// Summarizes `text`; a missing or zero `max_length` falls back to the configured default.
    #[tracing::instrument(skip(self, text), fields(text_len = text.len()))]
    pub async fn summarize(
        &self,
        text: &str,
        max_length: Option<u32>,
    ) -> Outcome<SummarizationResult> {
        let max_length = max_length
            .filter(|len| *len > 0)
            .unwrap_or(self.default_summary_max_length);
        let request = SummarizationRequest::new(text, max_length);
        self.summarizer
            .summarize(&request)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Summarization failed"))
            .into()
    }

    #[tracing::instrument(skip(self))]
    pub async fn generate_image(&self, prompt: &str) -> Outcome<ImageResult> {
        self.image_synthesizer
            .synthesize(&ImageRequest::new(prompt))
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Image synthesis failed"))
            .into()
    }

    #[tracing::instrument(skip(self))]
    pub async fn run(&self, request: &PipelineRequest) -> PipelineReport {
        let transcription = self
            .transcribe(&request.video_reference, request.wants_improved_text)
            .await;

        let summarization = match (request.summary_max_length, &transcription) {
            (None, _) => None,
            (Some(max_length), Outcome::Success(transcript)) => {
                Some(self.summarize(transcript.best_text(), Some(max_length)).await)
            }
            (Some(_), Outcome::Failure { .. }) => {
                tracing::warn!("Skipping summarization: no transcript available");
                Some(Outcome::failure(
                    "Summarization skipped: transcription did not produce any text",
                ))
            }
        };

        let image = match &request.image_prompt {
            Some(prompt) => Some(self.generate_image(prompt).await),
            None => None,
        };

        let report = PipelineReport {
            transcription,
            summarization,
            image,
        };
        tracing::info!(complete = report.is_complete(), "Pipeline finished");

        report
    }
}
