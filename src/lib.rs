#![warn(missing_docs)]
//! Venigen - client for the Venice.ai media generation API.
//!
//! Thin wrappers over the image endpoints (generate, edit, upscale,
//! background removal) and a complete workflow for the asynchronous video
//! queue: quote, cost confirmation, submission, and polling until the media
//! is ready.
//!
//! # Quick Start - Images
//!
//! ```no_run
//! use venigen::{GenerateImageRequest, VeniceClient};
//!
//! #[tokio::main]
//! async fn main() -> venigen::Result<()> {
//!     let client = VeniceClient::builder().build()?;
//!     let request = GenerateImageRequest::new("A serene landscape at sunset");
//!     let images = client.generate_image(&request).await?;
//!     images[0].save("landscape.png")?;
//!     Ok(())
//! }
//! ```
//!
//! # Quick Start - Video
//!
//! Video generation is billable, so the workflow quotes first and asks a
//! [`Confirm`] implementation before queueing anything:
//!
//! ```no_run
//! use venigen::{
//!     run_video_job, AlwaysConfirm, RetrieveOptions, VeniceClient, VideoJobConfig,
//!     VideoJobRequest,
//! };
//!
//! #[tokio::main]
//! async fn main() -> venigen::Result<()> {
//!     let client = VeniceClient::builder().build()?;
//!     let image = std::fs::read("input.png")?;
//!     let request = VideoJobRequest::new(VideoJobConfig::new(), "Gentle waves", image);
//!     run_video_job(
//!         &client,
//!         &request,
//!         &RetrieveOptions::default(),
//!         &AlwaysConfirm,
//!         "waves.mp4".as_ref(),
//!     )
//!     .await?;
//!     Ok(())
//! }
//! ```
//!
//! The API key is read from the `VENICE_API_KEY` environment variable, or
//! passed explicitly via [`VeniceClientBuilder::api_key`].

mod client;
mod confirm;
mod error;

pub mod image;
pub mod video;

pub use client::{VeniceClient, VeniceClientBuilder, API_BASE, API_KEY_ENV};
pub use confirm::{AlwaysConfirm, Confirm, ConsoleConfirm};
pub use error::{Error, Result};

pub use image::{
    to_data_uri, EditImageRequest, GenerateImageRequest, GeneratedImage, ImageFormat,
    UpscaleRequest, DEFAULT_EDIT_MODEL, DEFAULT_GENERATE_MODEL,
};
pub use video::{
    run_video_job, JobStatus, Quote, QueuedJob, RetrieveOptions, Sleeper, TokioSleeper,
    VideoDuration, VideoJobConfig, VideoJobOutcome, VideoJobRequest, VideoResolution,
    DEFAULT_VIDEO_MODEL,
};
