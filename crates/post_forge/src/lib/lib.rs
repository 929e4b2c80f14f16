pub mod api;
pub mod draft;
mod error;
mod llm;
mod processor;
pub mod tracing;
pub mod transcriber;
pub mod types;

pub use error::{Error, Result};
pub use llm::{
    chunker::{split_chunks, ChunkedSummarizer, MAX_CHUNK_CHARACTERS},
    huggingface,
    image::ImageSynthesizer,
    summarizer::{Summarizer, SummaryModel},
};
pub use processor::{
    builder::PipelineProcessorBuilder, Outcome, PipelineProcessor, PipelineReport,
    PipelineRequest,
};
pub use transcriber::{ScriptTranscriber, Transcriber};
