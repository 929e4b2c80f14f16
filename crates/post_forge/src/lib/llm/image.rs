use std::future::Future;

use crate::{
    error::Result,
    types::{ImageRequest, ImageResult},
};

pub trait ImageSynthesizer {
    const IMAGE_MODEL: &'static str;

    /// Generates an image for the prompt and returns it as an embeddable data url.
    fn synthesize(&self, request: &ImageRequest) -> impl Future<Output = Result<ImageResult>> + Send;
}

impl<I: ImageSynthesizer + Sync> ImageSynthesizer for &I {
    const IMAGE_MODEL: &'static str = I::IMAGE_MODEL;

    async fn synthesize(&self, request: &ImageRequest) -> Result<ImageResult> {
        (**self).synthesize(request).await
    }
}
