//! Asynchronous video job workflow: quote, queue, poll, retrieve.

mod orchestrator;
mod poller;
mod queue;
mod types;

pub use orchestrator::{run_video_job, VideoJobOutcome};
pub use poller::{RetrieveOptions, Sleeper, TokioSleeper};
pub use types::{
    JobStatus, Quote, QueuedJob, VideoDuration, VideoJobConfig, VideoJobRequest, VideoResolution,
    DEFAULT_VIDEO_MODEL,
};
