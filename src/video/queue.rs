//! Price quoting and job submission.

use crate::client::VeniceClient;
use crate::error::Result;
use crate::image::to_data_uri;
use crate::video::types::{Quote, QueuedJob, VideoJobConfig, VideoJobRequest};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct QuoteWireRequest {
    model: String,
    duration: String,
    resolution: String,
    audio: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    aspect_ratio: Option<String>,
}

impl QuoteWireRequest {
    fn from_config(config: &VideoJobConfig) -> Self {
        Self {
            model: config.model.clone(),
            duration: config.duration.as_str().to_string(),
            resolution: config.resolution.as_str().to_string(),
            audio: config.audio,
            aspect_ratio: config.aspect_ratio.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct QuoteWireResponse {
    quote: f64,
}

#[derive(Debug, Serialize)]
struct QueueWireRequest {
    model: String,
    prompt: String,
    duration: String,
    resolution: String,
    image_url: String,
    audio: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    aspect_ratio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    negative_prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reference_image_urls: Option<Vec<String>>,
}

impl QueueWireRequest {
    fn from_request(request: &VideoJobRequest) -> Self {
        Self {
            model: request.config.model.clone(),
            prompt: request.prompt.clone(),
            duration: request.config.duration.as_str().to_string(),
            resolution: request.config.resolution.as_str().to_string(),
            image_url: to_data_uri(&request.image),
            audio: request.config.audio,
            aspect_ratio: request.config.aspect_ratio.clone(),
            negative_prompt: request
                .negative_prompt
                .as_ref()
                .filter(|p| !p.is_empty())
                .cloned(),
            reference_image_urls: if request.reference_images.is_empty() {
                None
            } else {
                Some(
                    request
                        .reference_images
                        .iter()
                        .map(|img| to_data_uri(img))
                        .collect(),
                )
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct QueueWireResponse {
    queue_id: String,
}

impl VeniceClient {
    /// Obtains a price estimate for a video configuration.
    ///
    /// No side effects beyond the network call; the quote is for display.
    pub async fn video_quote(&self, config: &VideoJobConfig) -> Result<Quote> {
        let body = QuoteWireRequest::from_config(config);
        let response = self.post_json("/video/quote", &body).await?;
        let payload: QuoteWireResponse = response.json().await?;

        tracing::debug!(model = %config.model, quote = payload.quote, "received video quote");

        Ok(Quote {
            amount: payload.quote,
        })
    }

    /// Submits a video job. This creates billable remote state.
    ///
    /// The returned [`QueuedJob`] carries the model the job was enqueued
    /// under; retrieval presents the same model.
    pub async fn queue_video(&self, request: &VideoJobRequest) -> Result<QueuedJob> {
        let body = QueueWireRequest::from_request(request);
        let response = self.post_json("/video/queue", &body).await?;
        let payload: QueueWireResponse = response.json().await?;

        tracing::debug!(queue_id = %payload.queue_id, "video job queued");

        Ok(QueuedJob {
            id: payload.queue_id,
            model: request.config.model.clone(),
        })
    }
}
