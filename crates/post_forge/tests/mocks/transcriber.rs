use std::sync::{Arc, Mutex};

use post_forge::{
    types::{TranscriptionRequest, TranscriptionResult},
    Error, Transcriber,
};

#[derive(Clone)]
pub struct MockTranscriber {
    pub result: TranscriptionResult,
    pub calls: Arc<Mutex<Vec<TranscriptionRequest>>>,
    pub fail_with: Option<String>,
}

impl MockTranscriber {
    pub fn new(title: Option<&str>, original: &str, improved: Option<&str>) -> Self {
        Self {
            result: TranscriptionResult::new(
                title.map(str::to_string),
                original,
                improved.map(str::to_string),
            ),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            result: TranscriptionResult::new(None, "", None),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: Some(msg.to_string()),
        }
    }
}

impl Transcriber for MockTranscriber {
    async fn transcribe(
        &self,
        request: &TranscriptionRequest,
    ) -> post_forge::Result<TranscriptionResult> {
        self.calls.lock().unwrap().push(request.clone());
        if let Some(ref msg) = self.fail_with {
            return Err(Error::ExternalProcess {
                message: msg.clone(),
                stderr: format!(r#"{{"error":"{msg}"}}"#),
                exit_code: Some(1),
            });
        }
        Ok(self.result.clone())
    }
}
