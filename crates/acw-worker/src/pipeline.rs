//! The single-call rendition pipeline.
//!
//! Every worker runs the same stages in order:
//! `Init -> Resolving -> Requesting -> AwaitingResponse -> Normalizing -> Writing -> Done`.
//! The first failure moves the invocation to `Failed` with the error's kind.

use std::fmt;
use std::time::{Duration, Instant};

use acw_models::{InvocationParams, Rendition, SourceAsset, WorkerKind};
use async_trait::async_trait;

use crate::config::WorkerConfig;
use crate::error::{ErrorKind, WorkerResult};
use crate::instructions::WorkerOptions;
use crate::logging::InvocationLogger;
use crate::metrics;
use crate::output::{write_artifact, Artifact};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Init,
    Resolving,
    Requesting,
    AwaitingResponse,
    Normalizing,
    Writing,
    Done,
    Failed(ErrorKind),
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Init => f.write_str("init"),
            Stage::Resolving => f.write_str("resolving"),
            Stage::Requesting => f.write_str("requesting"),
            Stage::AwaitingResponse => f.write_str("awaiting_response"),
            Stage::Normalizing => f.write_str("normalizing"),
            Stage::Writing => f.write_str("writing"),
            Stage::Done => f.write_str("done"),
            Stage::Failed(kind) => write!(f, "failed({})", kind),
        }
    }
}

/// Inputs of one invocation.
pub struct Invocation<'a> {
    pub source: &'a SourceAsset,
    pub rendition: &'a Rendition,
    pub params: &'a InvocationParams,
    pub config: &'a WorkerConfig,
    pub logger: &'a InvocationLogger,
}

/// Result of a successful invocation.
#[derive(Debug, Clone)]
pub struct Outcome {
    pub worker: WorkerKind,
    pub stages: Vec<Stage>,
    pub bytes_written: u64,
    pub call_duration: Duration,
}

/// A rendition worker: one vendor call between request building and
/// normalization.
#[async_trait]
pub trait RenditionWorker: Send + Sync {
    type Options: WorkerOptions;
    type Credentials: Send + Sync;
    type Request: Send;
    type Response: Send;

    fn kind(&self) -> WorkerKind {
        <Self::Options as WorkerOptions>::KIND
    }

    /// Name of the call-duration sample sent to the caller's metrics sink.
    fn duration_metric(&self) -> Option<&'static str> {
        None
    }

    fn credentials(&self, inv: &Invocation<'_>) -> WorkerResult<Self::Credentials>;

    async fn build_request(
        &self,
        inv: &Invocation<'_>,
        options: &Self::Options,
    ) -> WorkerResult<Self::Request>;

    async fn call(
        &self,
        inv: &Invocation<'_>,
        options: &Self::Options,
        credentials: &Self::Credentials,
        request: Self::Request,
    ) -> WorkerResult<Self::Response>;

    fn normalize(
        &self,
        inv: &Invocation<'_>,
        options: &Self::Options,
        response: Self::Response,
    ) -> WorkerResult<Artifact>;
}

struct StageTracker<'a> {
    logger: &'a InvocationLogger,
    stages: Vec<Stage>,
}

impl<'a> StageTracker<'a> {
    fn new(logger: &'a InvocationLogger) -> Self {
        Self {
            logger,
            stages: vec![Stage::Init],
        }
    }

    fn enter(&mut self, stage: Stage) {
        self.logger.log_stage(&stage);
        self.stages.push(stage);
    }
}

/// Drive `worker` through every stage.
pub async fn run<W: RenditionWorker>(worker: &W, inv: &Invocation<'_>) -> WorkerResult<Outcome> {
    let mut tracker = StageTracker::new(inv.logger);
    match drive(worker, inv, &mut tracker).await {
        Ok((bytes_written, call_duration)) => {
            tracker.enter(Stage::Done);
            Ok(Outcome {
                worker: worker.kind(),
                stages: tracker.stages,
                bytes_written,
                call_duration,
            })
        }
        Err(e) => {
            tracker.enter(Stage::Failed(e.kind()));
            Err(e)
        }
    }
}

async fn drive<W: RenditionWorker>(
    worker: &W,
    inv: &Invocation<'_>,
    tracker: &mut StageTracker<'_>,
) -> WorkerResult<(u64, Duration)> {
    tracker.enter(Stage::Resolving);
    let options = W::Options::resolve(inv.rendition, inv.config)?;
    let credentials = worker.credentials(inv)?;

    tracker.enter(Stage::Requesting);
    let request = worker.build_request(inv, &options).await?;

    tracker.enter(Stage::AwaitingResponse);
    let started = Instant::now();
    let response = worker.call(inv, &options, &credentials, request).await;
    let elapsed = started.elapsed();
    record_call_duration(worker, inv, elapsed);
    let response = response?;

    tracker.enter(Stage::Normalizing);
    let artifact = worker.normalize(inv, &options, response)?;

    tracker.enter(Stage::Writing);
    let written = write_artifact(artifact, &inv.rendition.path, inv.logger).await?;

    Ok((written, elapsed))
}

/// The caller sink gets milliseconds under the worker's metric name, the
/// process recorder gets seconds on every call.
fn record_call_duration<W: RenditionWorker>(worker: &W, inv: &Invocation<'_>, elapsed: Duration) {
    if let Some(name) = worker.duration_metric() {
        inv.params.record_metric(name, elapsed.as_secs_f64() * 1000.0);
    }
    metrics::record_vendor_call(worker.kind(), elapsed.as_secs_f64());
}
