//! Polling loop for queued video jobs.
//!
//! The loop is driven entirely by what each retrieve response says: a media
//! body ends it with success, a "PROCESSING" status schedules one more wait,
//! and any other status ends it with failure. There is no local notion of
//! progress. An optional deadline bounds the total time spent waiting;
//! without one the remote service's own timeout behavior is trusted.

use crate::client::VeniceClient;
use crate::error::{Error, Result};
use crate::video::types::{JobStatus, QueuedJob};
use async_trait::async_trait;
use serde::Serialize;
use std::future::Future;
use std::time::Duration;

/// How retrieval waits between polls and when (if ever) it gives up.
#[derive(Debug, Clone)]
pub struct RetrieveOptions {
    /// Wait between status checks.
    pub poll_interval: Duration,
    /// Cap on total time spent waiting; `None` trusts the remote service to
    /// terminate the job.
    pub deadline: Option<Duration>,
    /// Ask the service to discard the media after a successful download.
    pub delete_on_completion: bool,
}

impl Default for RetrieveOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            deadline: None,
            delete_on_completion: false,
        }
    }
}

/// Sleep dependency of the poll loop, injected so tests can run it without a
/// clock.
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Suspends for the given duration.
    async fn sleep(&self, duration: Duration);
}

/// Production sleeper backed by the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// The poll loop itself, separated from HTTP so it can be driven by a
/// scripted fetch in tests.
pub(crate) struct PollLoop {
    interval: Duration,
    deadline: Option<Duration>,
}

impl PollLoop {
    pub(crate) fn new(interval: Duration, deadline: Option<Duration>) -> Self {
        Self { interval, deadline }
    }

    /// Runs `fetch` until it reports a terminal state. The deadline is
    /// accounted in whole intervals, checked before each wait.
    pub(crate) async fn run<F, Fut, S>(&self, mut fetch: F, sleeper: &S) -> Result<Vec<u8>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<JobStatus>>,
        S: Sleeper + ?Sized,
    {
        let mut waited = Duration::ZERO;

        loop {
            match fetch().await? {
                JobStatus::Ready { media, content_type } => {
                    tracing::debug!(
                        content_type = %content_type,
                        size_bytes = media.len(),
                        "video ready"
                    );
                    return Ok(media);
                }
                JobStatus::Processing {
                    execution_duration,
                    average_execution_time,
                } => {
                    if let Some(deadline) = self.deadline {
                        if waited + self.interval > deadline {
                            return Err(Error::Timeout(deadline));
                        }
                    }
                    tracing::debug!(
                        execution_ms = execution_duration,
                        average_ms = average_execution_time,
                        waited_secs = waited.as_secs(),
                        "video still processing"
                    );
                    sleeper.sleep(self.interval).await;
                    waited += self.interval;
                }
                JobStatus::Failed { status } => {
                    return Err(Error::VideoGeneration(status));
                }
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct RetrieveWireRequest<'a> {
    model: &'a str,
    queue_id: &'a str,
    delete_media_on_completion: bool,
}

impl VeniceClient {
    /// Issues one retrieve call and classifies the response.
    pub(crate) async fn retrieve_video_once(
        &self,
        job: &QueuedJob,
        delete_on_completion: bool,
    ) -> Result<JobStatus> {
        let body = RetrieveWireRequest {
            model: &job.model,
            queue_id: &job.id,
            delete_media_on_completion: delete_on_completion,
        };

        let response = self.post_json("/video/retrieve", &body).await?;
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        let bytes = response.bytes().await?.to_vec();

        JobStatus::classify(&content_type, bytes)
    }

    /// Polls a queued job until it completes, returning the media bytes
    /// exactly as served. Failures are never retried; each poll response
    /// alone decides the next step.
    pub async fn retrieve_video(
        &self,
        job: &QueuedJob,
        options: &RetrieveOptions,
    ) -> Result<Vec<u8>> {
        tracing::info!(queue_id = %job.id, "polling for video completion");

        PollLoop::new(options.poll_interval, options.deadline)
            .run(
                || self.retrieve_video_once(job, options.delete_on_completion),
                &TokioSleeper,
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records requested sleep durations instead of waiting.
    #[derive(Default)]
    struct FakeSleeper {
        slept: Mutex<Vec<Duration>>,
    }

    impl FakeSleeper {
        fn durations(&self) -> Vec<Duration> {
            self.slept.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Sleeper for FakeSleeper {
        async fn sleep(&self, duration: Duration) {
            self.slept.lock().unwrap().push(duration);
        }
    }

    fn processing() -> JobStatus {
        JobStatus::Processing {
            execution_duration: None,
            average_execution_time: None,
        }
    }

    /// Drives a PollLoop over a scripted sequence of statuses.
    async fn drive(
        interval: Duration,
        deadline: Option<Duration>,
        script: Vec<Result<JobStatus>>,
        sleeper: &FakeSleeper,
    ) -> Result<Vec<u8>> {
        let script = Mutex::new(script.into_iter());
        PollLoop::new(interval, deadline)
            .run(
                || {
                    let next = script.lock().unwrap().next().expect("script exhausted");
                    async move { next }
                },
                sleeper,
            )
            .await
    }

    #[tokio::test]
    async fn test_immediate_ready_sleeps_zero_times() {
        let sleeper = FakeSleeper::default();
        let media = drive(
            Duration::from_secs(5),
            None,
            vec![Ok(JobStatus::Ready {
                media: vec![9, 9, 9],
                content_type: "video/mp4".into(),
            })],
            &sleeper,
        )
        .await
        .unwrap();

        assert_eq!(media, vec![9, 9, 9]);
        assert!(sleeper.durations().is_empty());
    }

    #[tokio::test]
    async fn test_three_processing_responses_mean_three_interval_waits() {
        let sleeper = FakeSleeper::default();
        let media = drive(
            Duration::from_secs(5),
            None,
            vec![
                Ok(processing()),
                Ok(processing()),
                Ok(processing()),
                Ok(JobStatus::Ready {
                    media: vec![1, 2, 3, 4],
                    content_type: "video/mp4".into(),
                }),
            ],
            &sleeper,
        )
        .await
        .unwrap();

        assert_eq!(media, vec![1, 2, 3, 4]);
        assert_eq!(
            sleeper.durations(),
            vec![
                Duration::from_secs(5),
                Duration::from_secs(5),
                Duration::from_secs(5)
            ]
        );
    }

    #[tokio::test]
    async fn test_terminal_failure_stops_polling() {
        let sleeper = FakeSleeper::default();
        let result = drive(
            Duration::from_secs(5),
            None,
            vec![
                Ok(processing()),
                Ok(JobStatus::Failed {
                    status: "CONTENT_VIOLATION".into(),
                }),
            ],
            &sleeper,
        )
        .await;

        match result {
            Err(Error::VideoGeneration(status)) => assert_eq!(status, "CONTENT_VIOLATION"),
            other => panic!("expected VideoGeneration error, got {other:?}"),
        }
        // Exactly one wait happened, before the terminal failure
        assert_eq!(sleeper.durations(), vec![Duration::from_secs(5)]);
    }

    #[tokio::test]
    async fn test_fetch_error_propagates_without_retry() {
        let sleeper = FakeSleeper::default();
        let result = drive(
            Duration::from_secs(5),
            None,
            vec![Err(Error::Api {
                status: 500,
                message: "Internal Server Error".into(),
            })],
            &sleeper,
        )
        .await;

        assert!(matches!(result, Err(Error::Api { status: 500, .. })));
        assert!(sleeper.durations().is_empty());
    }

    #[tokio::test]
    async fn test_deadline_bounds_total_waiting() {
        let sleeper = FakeSleeper::default();
        let result = drive(
            Duration::from_secs(5),
            Some(Duration::from_secs(10)),
            vec![
                Ok(processing()),
                Ok(processing()),
                Ok(processing()),
                Ok(processing()),
            ],
            &sleeper,
        )
        .await;

        assert!(matches!(result, Err(Error::Timeout(_))));
        // Two 5s waits fit a 10s deadline; the third would exceed it
        assert_eq!(sleeper.durations().len(), 2);
    }

    #[tokio::test]
    async fn test_no_deadline_keeps_polling() {
        let sleeper = FakeSleeper::default();
        let mut script: Vec<Result<JobStatus>> =
            (0..50).map(|_| Ok(processing())).collect();
        script.push(Ok(JobStatus::Ready {
            media: vec![7],
            content_type: "video/mp4".into(),
        }));

        let media = drive(Duration::from_secs(5), None, script, &sleeper)
            .await
            .unwrap();
        assert_eq!(media, vec![7]);
        assert_eq!(sleeper.durations().len(), 50);
    }

    #[test]
    fn test_retrieve_wire_request_shape() {
        let wire = RetrieveWireRequest {
            model: "wan-2.5-preview-image-to-video",
            queue_id: "q-abc123",
            delete_media_on_completion: true,
        };
        let json = serde_json::to_value(&wire).unwrap();
        assert_eq!(json["model"], "wan-2.5-preview-image-to-video");
        assert_eq!(json["queue_id"], "q-abc123");
        assert_eq!(json["delete_media_on_completion"], true);
    }

    #[test]
    fn test_default_options() {
        let options = RetrieveOptions::default();
        assert_eq!(options.poll_interval, Duration::from_secs(5));
        assert!(options.deadline.is_none());
        assert!(!options.delete_on_completion);
    }
}
