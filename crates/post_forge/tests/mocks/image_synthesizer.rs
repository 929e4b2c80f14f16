use std::sync::{Arc, Mutex};

use post_forge::{
    types::{DataUrl, ImageRequest, ImageResult},
    Error, ImageSynthesizer,
};

#[derive(Clone)]
pub struct MockImageSynthesizer {
    pub payload: Vec<u8>,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_with: Option<String>,
}

impl Default for MockImageSynthesizer {
    fn default() -> Self {
        Self {
            payload: b"\x89PNG\r\n\x1a\n".to_vec(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
        }
    }
}

impl MockImageSynthesizer {
    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Default::default()
        }
    }
}

impl ImageSynthesizer for MockImageSynthesizer {
    const IMAGE_MODEL: &'static str = "mock-sdxl";

    async fn synthesize(&self, request: &ImageRequest) -> post_forge::Result<ImageResult> {
        self.calls.lock().unwrap().push(request.prompt.clone());
        if let Some(ref msg) = self.fail_with {
            return Err(Error::service(Some(500), msg.clone()));
        }
        Ok(ImageResult {
            image: DataUrl::new("image/png", self.payload.clone()),
        })
    }
}
