pub mod chunker;
pub mod huggingface;
pub mod image;
pub mod summarizer;
