#![allow(dead_code)]

pub mod image_synthesizer;
pub mod summarizer;
pub mod transcriber;
