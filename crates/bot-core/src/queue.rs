//! The paced job queue: serial, delayed, indicator-wrapped execution of
//! outbound actions.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::client::OutboundClient;
use crate::error::{EnqueueError, SendError};
use crate::job::Job;

/// Pacing interval applied by the implicit-recipient call convention.
pub const DEFAULT_MESSAGE_DELAY: Duration = Duration::from_millis(1000);

/// Lifecycle hooks invoked around every job.
///
/// Hooks are fixed at queue construction and apply to every job
/// uniformly; per-job variation goes through the job's own `delay` and
/// `show_indicator` fields.
#[async_trait]
pub trait JobHooks<A>: Send + Sync {
    /// Runs once the job is head-of-queue, before the remote call.
    async fn before_job(&self, job: &Job<A>);

    /// Runs after the remote call settles, success or failure.
    async fn after_job(&self, job: &Job<A>, result: &Result<(), SendError>);
}

/// Standard hooks: presence indicator on and pre-delay before the call,
/// indicator off after it.
///
/// Indicator toggles are best-effort; a failed toggle is logged and
/// never blocks the job or the queue.
pub struct PacingHooks<A> {
    client: Arc<dyn OutboundClient<A>>,
}

impl<A> PacingHooks<A> {
    pub fn new(client: Arc<dyn OutboundClient<A>>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<A: Send + Sync> JobHooks<A> for PacingHooks<A> {
    async fn before_job(&self, job: &Job<A>) {
        if job.show_indicator {
            if let Err(err) = self.client.indicator_on(&job.target).await {
                debug!("Typing indicator on failed for {}: {}", job.target, err);
            }
        }
        if job.delay.is_zero() {
            // A zero delay still yields one scheduling tick so ordering
            // stays observable.
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(job.delay).await;
        }
    }

    async fn after_job(&self, job: &Job<A>, _result: &Result<(), SendError>) {
        if job.show_indicator {
            if let Err(err) = self.client.indicator_off(&job.target).await {
                debug!("Typing indicator off failed for {}: {}", job.target, err);
            }
        }
    }
}

/// A job the remote platform rejected, paired with its error.
///
/// Failures are reported on the queue's observer channel and logged;
/// they are never silently dropped and never halt the queue.
#[derive(Debug)]
pub struct JobFailure<A> {
    pub job: Job<A>,
    pub error: SendError,
}

/// FIFO executor enforcing serial, delayed, indicator-wrapped delivery.
///
/// `enqueue` never blocks: jobs go onto an unbounded channel and a
/// single drain task (spawned at construction) runs them one at a time
/// in submission order. Dropping the queue lets the drain task finish
/// whatever is already buffered, then exit.
pub struct PacedJobQueue<A> {
    jobs_tx: mpsc::UnboundedSender<Job<A>>,
}

impl<A> PacedJobQueue<A>
where
    A: Copy + fmt::Debug + Send + Sync + 'static,
{
    /// Spawn the drain task and return the queue handle.
    ///
    /// `hooks` run around every job; `failures`, when given, receives
    /// every job the platform rejects.
    pub fn spawn(
        client: Arc<dyn OutboundClient<A>>,
        hooks: Arc<dyn JobHooks<A>>,
        failures: Option<mpsc::UnboundedSender<JobFailure<A>>>,
    ) -> Self {
        let (jobs_tx, jobs_rx) = mpsc::unbounded_channel();
        tokio::spawn(drain(jobs_rx, client, hooks, failures));
        Self { jobs_tx }
    }

    /// Append a job to the tail.
    ///
    /// Returns without suspending; the job runs after everything already
    /// queued, in strict submission order.
    pub fn enqueue(&self, job: Job<A>) -> Result<(), EnqueueError> {
        self.jobs_tx.send(job).map_err(|_| EnqueueError::Closed)
    }
}

async fn drain<A: Copy + fmt::Debug + Send + Sync + 'static>(
    mut jobs_rx: mpsc::UnboundedReceiver<Job<A>>,
    client: Arc<dyn OutboundClient<A>>,
    hooks: Arc<dyn JobHooks<A>>,
    failures: Option<mpsc::UnboundedSender<JobFailure<A>>>,
) {
    while let Some(job) = jobs_rx.recv().await {
        hooks.before_job(&job).await;
        let result = client.invoke(job.action, &job.target, &job.args).await;
        // The after hook is cleanup; it runs whether or not the call
        // succeeded.
        hooks.after_job(&job, &result).await;
        if let Err(error) = result {
            warn!("Outbound {:?} to {} failed: {}", job.action, job.target, error);
            if let Some(failures_tx) = &failures {
                let _ = failures_tx.send(JobFailure { job, error });
            }
        }
    }
}
