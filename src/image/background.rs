//! Background removal.

use crate::client::VeniceClient;
use crate::error::Result;
use crate::image::edit::image_part;
use crate::image::types::GeneratedImage;

impl VeniceClient {
    /// Removes the background from an image, returning a version with a
    /// transparent background.
    pub async fn remove_background(&self, image: Vec<u8>) -> Result<GeneratedImage> {
        let form = reqwest::multipart::Form::new().part("image", image_part(image)?);

        let response = self.post_multipart("/image/remove-background", form).await?;
        let data = response.bytes().await?.to_vec();

        tracing::debug!(size_bytes = data.len(), "background removal complete");

        Ok(GeneratedImage::from_bytes(data))
    }
}
