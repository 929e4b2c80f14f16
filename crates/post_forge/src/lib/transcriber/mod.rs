pub mod output;
pub mod script;

use std::future::Future;

use crate::{
    error::Result,
    types::{TranscriptionRequest, TranscriptionResult},
};

pub use script::ScriptTranscriber;

pub trait Transcriber {
    /// Transcribes the referenced video, suspending until the work is finished.
    fn transcribe(
        &self,
        request: &TranscriptionRequest,
    ) -> impl Future<Output = Result<TranscriptionResult>> + Send;
}

impl<T: Transcriber + Sync> Transcriber for &T {
    async fn transcribe(&self, request: &TranscriptionRequest) -> Result<TranscriptionResult> {
        (**self).transcribe(request).await
    }
}
