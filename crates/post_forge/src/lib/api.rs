//! Caller-facing request bodies and response envelopes.
//!
//! Every reply is either the operation's payload or `{"error": "..."}`:
//!
//! | operation      | request                  | success                           |
//! |----------------|--------------------------|-----------------------------------|
//! | transcribe     | `{url, improve}`         | `{title, original, improved}`     |
//! | summarize      | `{text, max_length}`     | `{summary}`                       |
//! | generate image | `{prompt}`               | `{imageUrl}`                      |
//! | draft          | all of the above         | `{report, draft}`                 |

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{
    draft::PostDraft,
    error::Error,
    llm::{image::ImageSynthesizer, summarizer::Summarizer},
    processor::{Outcome, PipelineProcessor, PipelineReport, PipelineRequest},
    transcriber::Transcriber,
    types::{ImageResult, SummarizationResult, TranscriptionResult},
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TranscribeBody {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub improve: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SummarizeBody {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub max_length: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GenerateImageBody {
    #[serde(default)]
    pub prompt: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DraftBody {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub improve: bool,
    #[serde(default)]
    pub summary_max_length: Option<u32>,
    #[serde(default)]
    pub image_prompt: Option<String>,
}

impl From<DraftBody> for PipelineRequest {
    fn from(body: DraftBody) -> Self {
        PipelineRequest {
            video_reference: body.url,
            wants_improved_text: body.improve,
            summary_max_length: body.summary_max_length,
            image_prompt: body.image_prompt.filter(|p| !p.trim().is_empty()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DraftReply {
    pub report: PipelineReport,
    pub draft: PostDraft,
}

/// Parses a JSON request body, mapping malformed input to an invalid-input error.
pub fn parse_body<B: DeserializeOwned>(raw: &str) -> Result<B, Error> {
    serde_json::from_str(raw).map_err(|e| Error::invalid_input(format!("malformed request body: {e}")))
}

impl<T, S, I> PipelineProcessor<T, S, I>
where
    T: Transcriber + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
    I: ImageSynthesizer + Send + Sync + 'static,
{
    pub async fn handle_transcribe(&self, body: TranscribeBody) -> Outcome<TranscriptionResult> {
        self.transcribe(&body.url, body.improve).await
    }

    pub async fn handle_summarize(&self, body: SummarizeBody) -> Outcome<SummarizationResult> {
        self.summarize(&body.text, body.max_length).await
    }

    pub async fn handle_generate_image(&self, body: GenerateImageBody) -> Outcome<ImageResult> {
        self.generate_image(&body.prompt).await
    }

    pub async fn handle_draft(&self, body: DraftBody) -> DraftReply {
        let report = self.run(&body.into()).await;
        let draft = PostDraft::assemble(&report);
        DraftReply { report, draft }
    }
}
