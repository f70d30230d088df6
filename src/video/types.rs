//! Core types for the video job workflow.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default model for image-to-video generation.
pub const DEFAULT_VIDEO_MODEL: &str = "wan-2.5-preview-image-to-video";

/// Video clip length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VideoDuration {
    /// A 5 second clip.
    #[default]
    #[serde(rename = "5s")]
    FiveSeconds,
    /// A 10 second clip.
    #[serde(rename = "10s")]
    TenSeconds,
}

impl VideoDuration {
    /// Returns the wire value (e.g. "5s").
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FiveSeconds => "5s",
            Self::TenSeconds => "10s",
        }
    }
}

impl std::fmt::Display for VideoDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Video resolution tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VideoResolution {
    /// 480p.
    #[serde(rename = "480p")]
    P480,
    /// 720p.
    #[default]
    #[serde(rename = "720p")]
    P720,
    /// 1080p.
    #[serde(rename = "1080p")]
    P1080,
}

impl VideoResolution {
    /// Returns the wire value (e.g. "720p").
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::P480 => "480p",
            Self::P720 => "720p",
            Self::P1080 => "1080p",
        }
    }
}

impl std::fmt::Display for VideoResolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Billable configuration of a video job. Constructed once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoJobConfig {
    /// Model identifier.
    pub model: String,
    /// Clip length.
    pub duration: VideoDuration,
    /// Resolution tier.
    pub resolution: VideoResolution,
    /// Aspect ratio (e.g. "16:9").
    pub aspect_ratio: Option<String>,
    /// Generate an audio track.
    pub audio: bool,
}

impl VideoJobConfig {
    /// Creates a configuration with the default model, 5s at 720p, audio on.
    pub fn new() -> Self {
        Self {
            model: DEFAULT_VIDEO_MODEL.to_string(),
            duration: VideoDuration::default(),
            resolution: VideoResolution::default(),
            aspect_ratio: None,
            audio: true,
        }
    }

    /// Sets the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the clip length.
    pub fn with_duration(mut self, duration: VideoDuration) -> Self {
        self.duration = duration;
        self
    }

    /// Sets the resolution tier.
    pub fn with_resolution(mut self, resolution: VideoResolution) -> Self {
        self.resolution = resolution;
        self
    }

    /// Sets the aspect ratio.
    pub fn with_aspect_ratio(mut self, ratio: impl Into<String>) -> Self {
        self.aspect_ratio = Some(ratio.into());
        self
    }

    /// Toggles audio generation.
    pub fn with_audio(mut self, audio: bool) -> Self {
        self.audio = audio;
        self
    }
}

impl Default for VideoJobConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// A price estimate for a [`VideoJobConfig`], shown before committing to a
/// billable job.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quote {
    /// Estimated cost in account currency units.
    pub amount: f64,
}

impl std::fmt::Display for Quote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}", self.amount)
    }
}

/// A queued video job: the opaque queue id together with the model it was
/// enqueued under. Retrieval must present the same model, so the two travel
/// as one value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedJob {
    /// Opaque identifier returned by the queue endpoint.
    pub id: String,
    /// Model the job was enqueued with.
    pub model: String,
}

/// Everything the enqueuer needs: the billable configuration, the motion
/// prompt, and the source/reference images as raw bytes.
#[derive(Debug, Clone)]
pub struct VideoJobRequest {
    /// Billable configuration.
    pub config: VideoJobConfig,
    /// Motion/description prompt.
    pub prompt: String,
    /// Source image bytes (encoded as a data URI on the wire).
    pub image: Vec<u8>,
    /// What to avoid.
    pub negative_prompt: Option<String>,
    /// Reference images for consistency, in order.
    pub reference_images: Vec<Vec<u8>>,
}

impl VideoJobRequest {
    /// Creates a request from a configuration, prompt and source image.
    pub fn new(config: VideoJobConfig, prompt: impl Into<String>, image: Vec<u8>) -> Self {
        Self {
            config,
            prompt: prompt.into(),
            image,
            negative_prompt: None,
            reference_images: Vec::new(),
        }
    }

    /// Sets the negative prompt.
    pub fn with_negative_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.negative_prompt = Some(prompt.into());
        self
    }

    /// Appends a reference image.
    pub fn with_reference_image(mut self, image: Vec<u8>) -> Self {
        self.reference_images.push(image);
        self
    }
}

/// Remote state of a queued job, produced by each poll.
#[derive(Debug, Clone, PartialEq)]
pub enum JobStatus {
    /// Still rendering.
    Processing {
        /// Milliseconds the job has been executing so far.
        execution_duration: Option<f64>,
        /// Average execution time in milliseconds for this model.
        average_execution_time: Option<f64>,
    },
    /// Finished; the media bytes are the response body.
    Ready {
        /// Raw media bytes, exactly as served.
        media: Vec<u8>,
        /// Media content type (e.g. "video/mp4").
        content_type: String,
    },
    /// Terminal failure with the remote-provided status text.
    Failed {
        /// Status string as reported by the service.
        status: String,
    },
}

#[derive(Debug, Deserialize)]
struct StatusBody {
    status: String,
    #[serde(default)]
    execution_duration: Option<f64>,
    #[serde(default)]
    average_execution_time: Option<f64>,
}

impl JobStatus {
    /// Classifies a retrieve response from its content type and body.
    ///
    /// A media content type wins outright: the body is the video, even if it
    /// would also parse as a status document. Anything else must be a
    /// structured status, where only "PROCESSING" is non-terminal.
    pub fn classify(content_type: &str, body: Vec<u8>) -> Result<Self> {
        if is_media_content_type(content_type) {
            return Ok(Self::Ready {
                media: body,
                content_type: content_type.to_string(),
            });
        }

        let parsed: StatusBody = serde_json::from_slice(&body).map_err(|e| {
            Error::UnexpectedResponse(format!(
                "retrieve returned neither media nor a status document ({content_type}): {e}"
            ))
        })?;

        if parsed.status == "PROCESSING" {
            Ok(Self::Processing {
                execution_duration: parsed.execution_duration,
                average_execution_time: parsed.average_execution_time,
            })
        } else {
            Ok(Self::Failed {
                status: parsed.status,
            })
        }
    }
}

fn is_media_content_type(content_type: &str) -> bool {
    content_type
        .trim()
        .to_ascii_lowercase()
        .starts_with("video/")
}
