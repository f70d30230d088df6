//! Image upscaling and enhancement.

use crate::client::VeniceClient;
use crate::error::{Error, Result};
use crate::image::edit::image_part;
use crate::image::types::GeneratedImage;

/// A request to upscale and/or enhance an image.
#[derive(Debug, Clone)]
pub struct UpscaleRequest {
    /// Raw bytes of the image to upscale.
    pub image: Vec<u8>,
    /// Scale factor (1-4). A factor of 1 requires `enhance`.
    pub scale: u8,
    /// Apply AI enhancement on top of (or instead of) scaling.
    pub enhance: bool,
    /// Enhancement creativity (0-1, higher changes more).
    pub enhance_creativity: f64,
    /// Enhancement style prompt (e.g. "crisp details").
    pub enhance_prompt: String,
    /// Replication strength (0-1, higher preserves more of the original).
    pub replication: f64,
}

impl UpscaleRequest {
    /// Creates a new upscale request with a 2x scale factor.
    pub fn new(image: Vec<u8>) -> Self {
        Self {
            image,
            scale: 2,
            enhance: false,
            enhance_creativity: 0.5,
            enhance_prompt: String::new(),
            replication: 0.35,
        }
    }

    /// Sets the scale factor (1-4).
    pub fn with_scale(mut self, scale: u8) -> Self {
        self.scale = scale;
        self
    }

    /// Enables AI enhancement.
    pub fn with_enhance(mut self, enhance: bool) -> Self {
        self.enhance = enhance;
        self
    }

    /// Sets the enhancement creativity (0-1).
    pub fn with_enhance_creativity(mut self, creativity: f64) -> Self {
        self.enhance_creativity = creativity;
        self
    }

    /// Sets the enhancement style prompt.
    pub fn with_enhance_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.enhance_prompt = prompt.into();
        self
    }

    /// Sets the replication strength (0-1).
    pub fn with_replication(mut self, replication: f64) -> Self {
        self.replication = replication;
        self
    }

    fn validate(&self) -> Result<()> {
        if !(1..=4).contains(&self.scale) {
            return Err(Error::InvalidRequest(format!(
                "scale must be 1-4, got {}",
                self.scale
            )));
        }
        // scale 1 means enhancement-only; without enhance it is a no-op
        if self.scale == 1 && !self.enhance {
            return Err(Error::InvalidRequest(
                "enhance is required when scale is 1".into(),
            ));
        }
        Ok(())
    }
}

impl VeniceClient {
    /// Upscales and/or enhances an image. Validation happens before any
    /// network call; the response body is the upscaled image.
    pub async fn upscale_image(&self, request: &UpscaleRequest) -> Result<GeneratedImage> {
        request.validate()?;

        let mut form = reqwest::multipart::Form::new()
            .text("scale", request.scale.to_string())
            .text("enhance", request.enhance.to_string())
            .text("replication", request.replication.to_string())
            .part("image", image_part(request.image.clone())?);

        if request.enhance {
            form = form.text("enhanceCreativity", request.enhance_creativity.to_string());
            if !request.enhance_prompt.is_empty() {
                form = form.text("enhancePrompt", request.enhance_prompt.clone());
            }
        }

        let response = self.post_multipart("/image/upscale", form).await?;
        let data = response.bytes().await?.to_vec();

        tracing::debug!(
            scale = request.scale,
            enhance = request.enhance,
            size_bytes = data.len(),
            "upscale complete"
        );

        Ok(GeneratedImage::from_bytes(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let req = UpscaleRequest::new(vec![1, 2, 3]);
        assert_eq!(req.scale, 2);
        assert!(!req.enhance);
        assert_eq!(req.enhance_creativity, 0.5);
        assert_eq!(req.replication, 0.35);
    }

    #[test]
    fn test_validate_scale_range() {
        assert!(UpscaleRequest::new(vec![]).with_scale(0).validate().is_err());
        assert!(UpscaleRequest::new(vec![]).with_scale(5).validate().is_err());
        assert!(UpscaleRequest::new(vec![]).with_scale(4).validate().is_ok());
    }

    #[test]
    fn test_validate_scale_one_requires_enhance() {
        let req = UpscaleRequest::new(vec![]).with_scale(1);
        assert!(matches!(req.validate(), Err(Error::InvalidRequest(_))));

        let req = UpscaleRequest::new(vec![]).with_scale(1).with_enhance(true);
        assert!(req.validate().is_ok());
    }
}
