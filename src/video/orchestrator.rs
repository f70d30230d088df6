//! End-to-end driver for one video job.
//!
//! Sequences quote → confirmation → queue → poll, then writes the media to
//! the destination path byte-for-byte. Declining the confirmation aborts
//! before any billable state exists; the first failure at any stage
//! propagates without retry.

use crate::client::VeniceClient;
use crate::confirm::Confirm;
use crate::error::Result;
use crate::video::poller::RetrieveOptions;
use crate::video::types::{Quote, QueuedJob, VideoJobConfig, VideoJobRequest};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// How a video job run ended (absent an error).
#[derive(Debug, Clone, PartialEq)]
pub enum VideoJobOutcome {
    /// Media was retrieved and written to `output`.
    Completed {
        /// Destination the media was written to.
        output: PathBuf,
        /// Size of the written media in bytes.
        size_bytes: usize,
        /// The quote that was accepted.
        quote: Quote,
    },
    /// The user declined the quoted cost; nothing was queued.
    Cancelled {
        /// The quote that was declined.
        quote: Quote,
    },
}

/// The three remote stages, seamed so the sequencing logic can be driven
/// with fakes.
#[async_trait]
trait JobStages {
    async fn quote(&self, config: &VideoJobConfig) -> Result<Quote>;
    async fn enqueue(&self, request: &VideoJobRequest) -> Result<QueuedJob>;
    async fn retrieve(&self, job: &QueuedJob, options: &RetrieveOptions) -> Result<Vec<u8>>;
}

#[async_trait]
impl JobStages for VeniceClient {
    async fn quote(&self, config: &VideoJobConfig) -> Result<Quote> {
        self.video_quote(config).await
    }

    async fn enqueue(&self, request: &VideoJobRequest) -> Result<QueuedJob> {
        self.queue_video(request).await
    }

    async fn retrieve(&self, job: &QueuedJob, options: &RetrieveOptions) -> Result<Vec<u8>> {
        self.retrieve_video(job, options).await
    }
}

async fn drive(
    stages: &dyn JobStages,
    request: &VideoJobRequest,
    options: &RetrieveOptions,
    confirm: &dyn Confirm,
    output: &Path,
) -> Result<VideoJobOutcome> {
    let quote = stages.quote(&request.config).await?;

    if !confirm.confirm(&quote, &request.config)? {
        tracing::info!(quote = quote.amount, "video generation declined");
        return Ok(VideoJobOutcome::Cancelled { quote });
    }

    let job = stages.enqueue(request).await?;
    tracing::info!(queue_id = %job.id, "video job queued");

    let media = stages.retrieve(&job, options).await?;

    std::fs::write(output, &media)?;
    tracing::info!(
        output = %output.display(),
        size_bytes = media.len(),
        "video saved"
    );

    Ok(VideoJobOutcome::Completed {
        output: output.to_path_buf(),
        size_bytes: media.len(),
        quote,
    })
}

/// Runs one complete video job against the API.
pub async fn run_video_job(
    client: &VeniceClient,
    request: &VideoJobRequest,
    options: &RetrieveOptions,
    confirm: &dyn Confirm,
    output: &Path,
) -> Result<VideoJobOutcome> {
    drive(client, request, options, confirm, output).await
}
