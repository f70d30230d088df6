//! Text-to-image generation.

use crate::client::VeniceClient;
use crate::error::{Error, Result};
use crate::image::types::{GeneratedImage, ImageFormat};
use serde::{Deserialize, Serialize};

/// Default model for image generation (fast and inexpensive).
pub const DEFAULT_GENERATE_MODEL: &str = "z-image-turbo";

/// A request to generate one or more images from a text prompt.
#[derive(Debug, Clone)]
pub struct GenerateImageRequest {
    /// The text prompt describing the desired image.
    pub prompt: String,
    /// Model identifier.
    pub model: String,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Aspect ratio (e.g. "16:9"), alternative to width/height.
    pub aspect_ratio: Option<String>,
    /// Resolution tier (e.g. "2K"), premium models only.
    pub resolution: Option<String>,
    /// What to avoid in the image.
    pub negative_prompt: String,
    /// Classifier-free guidance scale (0-20).
    pub cfg_scale: f64,
    /// Seed for reproducible generation.
    pub seed: Option<i64>,
    /// Output format.
    pub format: ImageFormat,
    /// Number of variants to generate (1-4).
    pub variants: u8,
}

impl GenerateImageRequest {
    /// Creates a new request with cost-effective defaults
    /// (z-image-turbo, 1024x576, 16:9).
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: DEFAULT_GENERATE_MODEL.to_string(),
            width: 1024,
            height: 576,
            aspect_ratio: Some("16:9".to_string()),
            resolution: None,
            negative_prompt: String::new(),
            cfg_scale: 7.5,
            seed: None,
            format: ImageFormat::Png,
            variants: 1,
        }
    }

    /// Sets the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the desired dimensions.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Sets the aspect ratio.
    pub fn with_aspect_ratio(mut self, ratio: impl Into<String>) -> Self {
        self.aspect_ratio = Some(ratio.into());
        self
    }

    /// Sets the resolution tier (premium models only).
    pub fn with_resolution(mut self, resolution: impl Into<String>) -> Self {
        self.resolution = Some(resolution.into());
        self
    }

    /// Sets the negative prompt.
    pub fn with_negative_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.negative_prompt = prompt.into();
        self
    }

    /// Sets the CFG scale.
    pub fn with_cfg_scale(mut self, scale: f64) -> Self {
        self.cfg_scale = scale;
        self
    }

    /// Sets the seed for reproducible generation.
    pub fn with_seed(mut self, seed: i64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the output format.
    pub fn with_format(mut self, format: ImageFormat) -> Self {
        self.format = format;
        self
    }

    /// Sets the number of variants (1-4).
    pub fn with_variants(mut self, variants: u8) -> Self {
        self.variants = variants;
        self
    }
}

#[derive(Debug, Serialize)]
struct GenerateWireRequest {
    model: String,
    prompt: String,
    width: u32,
    height: u32,
    negative_prompt: String,
    cfg_scale: f64,
    format: String,
    variants: u8,
    safe_mode: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    aspect_ratio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    resolution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<i64>,
}

impl GenerateWireRequest {
    fn from_request(req: &GenerateImageRequest) -> Self {
        Self {
            model: req.model.clone(),
            prompt: req.prompt.clone(),
            width: req.width,
            height: req.height,
            negative_prompt: req.negative_prompt.clone(),
            cfg_scale: req.cfg_scale,
            format: req.format.as_str().to_string(),
            variants: req.variants,
            safe_mode: false,
            aspect_ratio: req.aspect_ratio.clone(),
            resolution: req.resolution.clone(),
            seed: req.seed,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateWireResponse {
    images: Vec<String>,
}

impl VeniceClient {
    /// Generates one or more images from a text prompt.
    ///
    /// The response carries base64-encoded payloads; each is decoded to raw
    /// bytes before being returned.
    pub async fn generate_image(
        &self,
        request: &GenerateImageRequest,
    ) -> Result<Vec<GeneratedImage>> {
        use base64::Engine;

        let body = GenerateWireRequest::from_request(request);
        let response = self.post_json("/image/generate", &body).await?;
        let payload: GenerateWireResponse = response.json().await?;

        if payload.images.is_empty() {
            return Err(Error::UnexpectedResponse(
                "generate returned no images".into(),
            ));
        }

        tracing::debug!(
            model = %request.model,
            count = payload.images.len(),
            "image generation complete"
        );

        payload
            .images
            .into_iter()
            .map(|b64| {
                base64::engine::general_purpose::STANDARD
                    .decode(&b64)
                    .map(GeneratedImage::from_bytes)
                    .map_err(|e| Error::Decode(e.to_string()))
            })
            .collect()
    }
}
