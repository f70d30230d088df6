//! Image editing, single-shot and chained.

use crate::client::VeniceClient;
use crate::error::{Error, Result};
use crate::image::types::{GeneratedImage, ImageFormat};

/// Default model for image editing.
pub const DEFAULT_EDIT_MODEL: &str = "qwen-edit";

/// A request to edit an image with a text instruction.
#[derive(Debug, Clone)]
pub struct EditImageRequest {
    /// Raw bytes of the image to edit.
    pub image: Vec<u8>,
    /// Edit instruction (e.g. "change the sky to sunset").
    pub prompt: String,
    /// Edit model identifier.
    pub model: String,
    /// Output aspect ratio (e.g. "16:9").
    pub aspect_ratio: Option<String>,
}

impl EditImageRequest {
    /// Creates a new edit request with the default model.
    pub fn new(image: Vec<u8>, prompt: impl Into<String>) -> Self {
        Self {
            image,
            prompt: prompt.into(),
            model: DEFAULT_EDIT_MODEL.to_string(),
            aspect_ratio: None,
        }
    }

    /// Sets the edit model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the output aspect ratio.
    pub fn with_aspect_ratio(mut self, ratio: impl Into<String>) -> Self {
        self.aspect_ratio = Some(ratio.into());
        self
    }
}

/// Builds the file part for an image upload, detecting MIME and extension
/// from magic bytes.
pub(crate) fn image_part(data: Vec<u8>) -> Result<reqwest::multipart::Part> {
    let format = ImageFormat::from_magic_bytes(&data);
    let ext = format.map(|f| f.extension()).unwrap_or("png");
    let mime = format.map(|f| f.mime_type()).unwrap_or("image/png");

    reqwest::multipart::Part::bytes(data)
        .file_name(format!("image.{ext}"))
        .mime_str(mime)
        .map_err(|e| Error::InvalidRequest(e.to_string()))
}

impl VeniceClient {
    /// Edits an image according to a text instruction.
    ///
    /// The response body is the edited image itself, returned byte-for-byte.
    pub async fn edit_image(&self, request: &EditImageRequest) -> Result<GeneratedImage> {
        let mut form = reqwest::multipart::Form::new()
            .text("prompt", request.prompt.clone())
            .text("modelId", request.model.clone())
            .part("image", image_part(request.image.clone())?);

        if let Some(ref ratio) = request.aspect_ratio {
            form = form.text("aspect_ratio", ratio.clone());
        }

        let response = self.post_multipart("/image/edit", form).await?;
        let data = response.bytes().await?.to_vec();

        tracing::debug!(
            model = %request.model,
            size_bytes = data.len(),
            "image edit complete"
        );

        Ok(GeneratedImage::from_bytes(data))
    }

    /// Applies a sequence of edit instructions, the output of each step
    /// feeding the next. Returns every intermediate result in order; the
    /// last element is the final image.
    ///
    /// The whole chain runs in memory, so a failure at step N leaves no
    /// stray files behind.
    pub async fn edit_chain(
        &self,
        image: Vec<u8>,
        prompts: &[String],
        model: &str,
        aspect_ratio: Option<&str>,
    ) -> Result<Vec<GeneratedImage>> {
        if prompts.is_empty() {
            return Err(Error::InvalidRequest(
                "at least one edit prompt is required".into(),
            ));
        }

        let mut current = image;
        let mut steps = Vec::with_capacity(prompts.len());

        for (i, prompt) in prompts.iter().enumerate() {
            tracing::info!(
                step = i + 1,
                total = prompts.len(),
                prompt = %prompt,
                "applying edit"
            );

            let mut request = EditImageRequest::new(current, prompt).with_model(model);
            if let Some(ratio) = aspect_ratio {
                request = request.with_aspect_ratio(ratio);
            }

            let edited = self.edit_image(&request).await?;
            current = edited.data.clone();
            steps.push(edited);
        }

        Ok(steps)
    }
}
