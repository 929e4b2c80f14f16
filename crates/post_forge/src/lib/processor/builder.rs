use crate::{
    llm::{image::ImageSynthesizer, summarizer::Summarizer},
    transcriber::Transcriber,
    PipelineProcessor,
};

pub struct PipelineProcessorBuilder<T = (), S = (), I = ()> {
    transcriber: T,
    summarizer: S,
    image_synthesizer: I,
    default_summary_max_length: u32,
}

impl PipelineProcessorBuilder {
    /// `max_length` used when a summarization request leaves it out
    pub const DEFAULT_SUMMARY_MAX_LENGTH: u32 = 100;

    pub fn new() -> Self {
        Self {
            transcriber: (),
            summarizer: (),
            image_synthesizer: (),
            default_summary_max_length: Self::DEFAULT_SUMMARY_MAX_LENGTH,
        }
    }
}

impl Default for PipelineProcessorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, S, I> PipelineProcessorBuilder<T, S, I> {
    pub fn transcriber<T2: Transcriber + Send + Sync + 'static>(
        self,
        transcriber: T2,
    ) -> PipelineProcessorBuilder<T2, S, I> {
        PipelineProcessorBuilder {
            transcriber,
            summarizer: self.summarizer,
            image_synthesizer: self.image_synthesizer,
            default_summary_max_length: self.default_summary_max_length,
        }
    }

    pub fn summarizer<S2: Summarizer + Send + Sync + 'static>(
        self,
        summarizer: S2,
    ) -> PipelineProcessorBuilder<T, S2, I> {
        PipelineProcessorBuilder {
            transcriber: self.transcriber,
            summarizer,
            image_synthesizer: self.image_synthesizer,
            default_summary_max_length: self.default_summary_max_length,
        }
    }

    pub fn image_synthesizer<I2: ImageSynthesizer + Send + Sync + 'static>(
        self,
        image_synthesizer: I2,
    ) -> PipelineProcessorBuilder<T, S, I2> {
        PipelineProcessorBuilder {
            transcriber: self.transcriber,
            summarizer: self.summarizer,
            image_synthesizer,
            default_summary_max_length: self.default_summary_max_length,
        }
    }

    pub fn default_summary_max_length(mut self, max_length: u32) -> Self {
        self.default_summary_max_length = max_length;
        self
    }
}

impl<T, S, I> PipelineProcessorBuilder<T, S, I>
where
    T: Transcriber + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
    I: ImageSynthesizer + Send + Sync + 'static,
{
    pub fn build(self) -> PipelineProcessor<T, S, I> {
        PipelineProcessor {
            transcriber: self.transcriber,
            summarizer: self.summarizer,
            image_synthesizer: self.image_synthesizer,
            default_summary_max_length: self.default_summary_max_length,
        }
    }
}
